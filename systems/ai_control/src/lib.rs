#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised computer opponent.

use chess_with_guns_core::{
    AgentContext, CellOffset, Command, PlayerAgent, PlayerSnapshot, PointerInput,
};
use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const MOVE_CHANCE: f64 = 0.5;
const FIRE_CHANCE: f64 = 0.5;

/// Rule used to pick which opponent the AI shoots at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingPolicy {
    /// Uniformly random among living opponents.
    #[default]
    #[serde(alias = "random")]
    RandomOpponent,
    /// The closest living opponent; ties go to the earlier player.
    Nearest,
}

/// Computer-controlled agent with its own seeded random stream.
#[derive(Debug)]
pub struct AiControl {
    rng: ChaCha8Rng,
    targeting: TargetingPolicy,
}

impl AiControl {
    /// Creates an agent seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64, targeting: TargetingPolicy) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            targeting,
        }
    }

    /// Targeting rule used by the agent.
    #[must_use]
    pub const fn targeting(&self) -> TargetingPolicy {
        self.targeting
    }

    fn choose_move(&mut self, context: &AgentContext<'_>) -> Option<CellOffset> {
        let pickup = context
            .destinations()
            .find(|(_, cell)| context.occupancy.occupant(*cell).pickup().is_some())
            .map(|(offset, _)| offset);
        if pickup.is_some() {
            return pickup;
        }
        context.legal_moves.iter().copied().choose(&mut self.rng)
    }

    fn choose_target<'a>(&mut self, context: &'a AgentContext<'_>) -> Option<&'a PlayerSnapshot> {
        match self.targeting {
            TargetingPolicy::RandomOpponent => context.opponents().choose(&mut self.rng),
            TargetingPolicy::Nearest => {
                let origin = context.player.cell;
                context.opponents().fold(None, |best: Option<&PlayerSnapshot>, candidate| {
                    match best {
                        Some(current)
                            if origin.distance(current.cell) <= origin.distance(candidate.cell) =>
                        {
                            Some(current)
                        }
                        _ => Some(candidate),
                    }
                })
            }
        }
    }
}

impl PlayerAgent for AiControl {
    fn act(&mut self, context: &AgentContext<'_>, _pointer: &mut PointerInput, out: &mut Vec<Command>) {
        let player = context.player.id;

        if self.rng.gen_bool(MOVE_CHANCE) {
            if let Some(offset) = self.choose_move(context) {
                out.push(Command::MovePiece { player, offset });
                return;
            }
        }

        if context.player.ammo == 0 || !self.rng.gen_bool(FIRE_CHANCE) {
            return;
        }
        let Some(target) = self.choose_target(context) else {
            return;
        };
        let origin = context.player.cell.center(context.cell_length);
        let heading = origin.heading_to(target.cell.center(context.cell_length));
        out.push(Command::Discharge { player, heading });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_with_guns_core::{
        BoardSize, CellCoord, OccupancyView, Occupant, PickupKind, PieceColor, PieceKind,
        PieceRole, PlayerId, WeaponKind,
    };

    const SIZE: BoardSize = BoardSize::new(6, 6);

    fn snapshot(id: u32, color: PieceColor, cell: CellCoord) -> PlayerSnapshot {
        PlayerSnapshot {
            id: PlayerId::new(id),
            piece: PieceKind::new(color, PieceRole::King),
            weapon: WeaponKind::Pistol,
            cell,
            health: 100.0,
            max_health: 100.0,
            ammo: 20,
            capacity: 20,
            boost: 0,
            alive: true,
            ai: true,
            damage_dealt: 0.0,
        }
    }

    #[test]
    fn prefers_the_first_pickup_destination() {
        let me = snapshot(0, PieceColor::White, CellCoord::new(2, 2));
        let players = [me];
        let mut cells = vec![Occupant::Empty; SIZE.cell_count()];
        cells[SIZE.index(CellCoord::new(3, 3))] = Occupant::Pickup(PickupKind::Boost);
        let legal = [CellOffset::new(0, 1), CellOffset::new(1, 1), CellOffset::new(1, 0)];
        let context = AgentContext {
            player: me,
            legal_moves: &legal,
            occupancy: OccupancyView::new(SIZE, &cells),
            players: &players,
            cell_length: 24.0,
        };

        let mut agent = AiControl::new(9, TargetingPolicy::RandomOpponent);
        for _ in 0..32 {
            assert_eq!(agent.choose_move(&context), Some(CellOffset::new(1, 1)));
        }
    }

    #[test]
    fn nearest_policy_picks_the_closest_live_opponent() {
        let me = snapshot(0, PieceColor::White, CellCoord::new(0, 0));
        let far = snapshot(1, PieceColor::Black, CellCoord::new(5, 5));
        let mut near = snapshot(2, PieceColor::Black, CellCoord::new(1, 1));
        near.piece = PieceKind::new(PieceColor::Black, PieceRole::Rook);
        let mut dead = snapshot(3, PieceColor::White, CellCoord::new(0, 1));
        dead.piece = PieceKind::new(PieceColor::White, PieceRole::Rook);
        dead.alive = false;
        let players = [me, far, near, dead];
        let cells = vec![Occupant::Empty; SIZE.cell_count()];
        let context = AgentContext {
            player: me,
            legal_moves: &[],
            occupancy: OccupancyView::new(SIZE, &cells),
            players: &players,
            cell_length: 24.0,
        };

        let mut agent = AiControl::new(1, TargetingPolicy::Nearest);
        assert_eq!(
            agent.choose_target(&context).map(|target| target.id),
            Some(PlayerId::new(2))
        );
    }

    #[test]
    fn random_policy_never_targets_itself_or_the_dead() {
        let me = snapshot(0, PieceColor::White, CellCoord::new(0, 0));
        let mut dead = snapshot(1, PieceColor::Black, CellCoord::new(5, 5));
        dead.alive = false;
        let mut live = snapshot(2, PieceColor::Black, CellCoord::new(3, 3));
        live.piece = PieceKind::new(PieceColor::Black, PieceRole::Queen);
        let players = [me, dead, live];
        let cells = vec![Occupant::Empty; SIZE.cell_count()];
        let context = AgentContext {
            player: me,
            legal_moves: &[],
            occupancy: OccupancyView::new(SIZE, &cells),
            players: &players,
            cell_length: 24.0,
        };

        let mut agent = AiControl::new(4, TargetingPolicy::RandomOpponent);
        for _ in 0..32 {
            assert_eq!(
                agent.choose_target(&context).map(|target| target.id),
                Some(PlayerId::new(2))
            );
        }
    }

    #[test]
    fn empty_magazine_never_fires() {
        let mut me = snapshot(0, PieceColor::White, CellCoord::new(0, 0));
        me.ammo = 0;
        let other = snapshot(1, PieceColor::Black, CellCoord::new(5, 5));
        let players = [me, other];
        let cells = vec![Occupant::Empty; SIZE.cell_count()];
        let context = AgentContext {
            player: me,
            legal_moves: &[],
            occupancy: OccupancyView::new(SIZE, &cells),
            players: &players,
            cell_length: 24.0,
        };

        let mut agent = AiControl::new(2, TargetingPolicy::RandomOpponent);
        let mut pointer = PointerInput::default();
        let mut out = Vec::new();
        for _ in 0..64 {
            agent.act(&context, &mut pointer, &mut out);
        }
        assert!(out.is_empty());
    }
}
