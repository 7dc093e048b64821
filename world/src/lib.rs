#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Chess with Guns.

mod ballistics;
mod combat;
mod error;
mod grid;
mod rules;

use std::mem;

use chess_with_guns_core::{
    ActionError, BoardSize, CellCoord, CellOffset, Command, DischargeError, Event, Occupant,
    PickupKind, PieceKind, PlayerId, WeaponKind, WeaponTable,
};
use log::{debug, info};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use ballistics::{Flight, Projectile, ProjectilePool};
pub use combat::{
    decay_boost, jitter, roll_damage, Magazine, Vitals, AMMO_PICKUP_ROUNDS, BOOST_PICKUP_LEVEL,
    HEALTH_PICKUP_AMOUNT,
};
pub use error::SetupError;
pub use grid::Grid;
pub use rules::legal_moves;

use combat::Loadout;

const DEFAULT_BOARD: BoardSize = BoardSize::new(6, 6);
const DEFAULT_CELL_LENGTH: f32 = 24.0;
const DEFAULT_MAX_HEALTH: f32 = 100.0;
const DEFAULT_PROJECTILE_SPEED: f32 = 10.0;
const DEFAULT_PROJECTILE_SLOTS: usize = 10;
const DEFAULT_PICKUPS: usize = 2;
const DEFAULT_SEED: u64 = 0x6d1f_03a2_9c4e_b857;

/// Tunable parameters of a single match.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Board dimensions in cells.
    pub board: BoardSize,
    /// Side length of a cell in pixels.
    pub cell_length: f32,
    /// Starting and maximum health of every player.
    pub max_health: f32,
    /// Distance travelled by a projectile each frame, in pixels.
    pub projectile_speed: f32,
    /// Projectile slots owned by each player.
    pub projectile_slots: usize,
    /// Pickups kept on the board at all times.
    pub pickups: usize,
    /// Seed of the world's random stream.
    pub seed: u64,
    /// Weapon balance used by the match.
    pub weapons: WeaponTable,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board: DEFAULT_BOARD,
            cell_length: DEFAULT_CELL_LENGTH,
            max_health: DEFAULT_MAX_HEALTH,
            projectile_speed: DEFAULT_PROJECTILE_SPEED,
            projectile_slots: DEFAULT_PROJECTILE_SLOTS,
            pickups: DEFAULT_PICKUPS,
            seed: DEFAULT_SEED,
            weapons: WeaponTable::classic(),
        }
    }
}

/// Describes a player joining the match.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSetup {
    /// Display name, also used as the statistics column prefix.
    pub name: String,
    /// Piece the player controls.
    pub piece: PieceKind,
    /// Weapon the player carries.
    pub weapon: WeaponKind,
    /// Starting cell.
    pub start: CellCoord,
    /// Whether the player is computer controlled.
    pub ai: bool,
}

impl PlayerSetup {
    /// Creates a human-controlled player setup.
    #[must_use]
    pub fn new(name: impl Into<String>, piece: PieceKind, weapon: WeaponKind, start: CellCoord) -> Self {
        Self {
            name: name.into(),
            piece,
            weapon,
            start,
            ai: false,
        }
    }

    /// Marks the player as computer controlled.
    #[must_use]
    pub fn with_ai(mut self, ai: bool) -> Self {
        self.ai = ai;
        self
    }
}

#[derive(Debug)]
struct Player {
    id: PlayerId,
    name: String,
    piece: PieceKind,
    weapon: WeaponKind,
    cell: CellCoord,
    ai: bool,
    alive: bool,
    loadout: Loadout,
    damage_dealt: f32,
    projectiles: ProjectilePool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pickup {
    kind: PickupKind,
    cell: CellCoord,
}

/// Represents the authoritative Chess with Guns match state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    cell_length: f32,
    projectile_speed: f32,
    weapons: WeaponTable,
    players: Vec<Player>,
    pickups: Vec<Pickup>,
    active: usize,
    dead: usize,
    winner: Option<PlayerId>,
    frame: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Sets up a match: places every piece and scatters the pickups.
    pub fn new(config: MatchConfig, setups: Vec<PlayerSetup>) -> Result<Self, SetupError> {
        if setups.len() < 2 {
            return Err(SetupError::NotEnoughPlayers {
                count: setups.len(),
            });
        }
        if config.board.cell_count() == 0 {
            return Err(SetupError::EmptyBoard);
        }
        if !(config.cell_length.is_finite() && config.cell_length > 0.0) {
            return Err(SetupError::InvalidCellLength {
                length: config.cell_length,
            });
        }
        if setups.len() + config.pickups >= config.board.cell_count() {
            return Err(SetupError::NoRoomForPickups {
                pickups: config.pickups,
            });
        }

        let mut grid = Grid::new(config.board);
        let mut players = Vec::with_capacity(setups.len());
        for (index, setup) in setups.into_iter().enumerate() {
            if players.iter().any(|player: &Player| player.piece == setup.piece) {
                return Err(SetupError::DuplicatePiece { piece: setup.piece });
            }
            if !grid.in_bounds(i64::from(setup.start.column()), i64::from(setup.start.row())) {
                return Err(SetupError::StartOutOfBounds {
                    name: setup.name,
                    cell: setup.start,
                });
            }
            if !grid.get(setup.start).is_empty() {
                return Err(SetupError::StartOccupied {
                    name: setup.name,
                    cell: setup.start,
                });
            }

            grid.set(setup.start, Occupant::Piece(setup.piece));
            let stats = config.weapons.stats(setup.weapon);
            players.push(Player {
                id: PlayerId::new(index as u32),
                name: setup.name,
                piece: setup.piece,
                weapon: setup.weapon,
                cell: setup.start,
                ai: setup.ai,
                alive: true,
                loadout: Loadout {
                    vitals: Vitals::full(config.max_health),
                    magazine: Magazine::full(stats.capacity),
                    boost: 0,
                },
                damage_dealt: 0.0,
                projectiles: ProjectilePool::with_capacity(config.projectile_slots),
            });
        }

        let mut world = Self {
            grid,
            cell_length: config.cell_length,
            projectile_speed: config.projectile_speed,
            weapons: config.weapons,
            players,
            pickups: Vec::with_capacity(config.pickups),
            active: 0,
            dead: 0,
            winner: None,
            frame: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        };

        for _ in 0..config.pickups {
            let cell = world.random_empty_cell();
            let kind = draw_pickup_kind(&mut world.rng);
            world.grid.set(cell, Occupant::Pickup(kind));
            world.pickups.push(Pickup { kind, cell });
        }

        Ok(world)
    }

    fn actor(&self, player: PlayerId) -> Result<usize, ActionError> {
        if self.winner.is_some() {
            return Err(ActionError::MatchOver);
        }
        let index = self.index_of(player);
        if !self.players[index].alive {
            return Err(ActionError::Eliminated);
        }
        if index != self.active {
            return Err(ActionError::NotActivePlayer);
        }
        Ok(index)
    }

    fn index_of(&self, player: PlayerId) -> usize {
        let index = player.get() as usize;
        assert!(
            index < self.players.len(),
            "unknown player {player:?} in a match of {}",
            self.players.len()
        );
        index
    }

    fn move_piece(&mut self, player: PlayerId, offset: CellOffset, out_events: &mut Vec<Event>) {
        let index = match self.actor(player) {
            Ok(index) => index,
            Err(reason) => {
                out_events.push(Event::ActionRejected { player, reason });
                return;
            }
        };

        let piece = self.players[index].piece;
        let origin = self.players[index].cell;
        let legal = rules::legal_moves(piece, origin, self.grid.view());
        assert!(
            legal.contains(&offset),
            "illegal move {offset:?} for {piece:?} at {origin:?}"
        );
        let Some(destination) = self.grid.size().translate(origin, offset) else {
            panic!("legal move {offset:?} from {origin:?} left the board");
        };

        if let Occupant::Pickup(kind) = self.grid.get(destination) {
            self.collect_pickup(index, kind, destination, out_events);
        }

        self.grid.set(origin, Occupant::Empty);
        self.grid.set(destination, Occupant::Piece(piece));
        self.players[index].cell = destination;
        debug!("{} moved {origin:?} -> {destination:?}", self.players[index].name);
        out_events.push(Event::PieceMoved {
            player,
            from: origin,
            to: destination,
        });
    }

    fn collect_pickup(
        &mut self,
        index: usize,
        kind: PickupKind,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        self.players[index].loadout.collect(kind);
        out_events.push(Event::PickupCollected {
            player: self.players[index].id,
            kind,
            cell,
        });

        let Some(slot) = self.pickups.iter().position(|pickup| pickup.cell == cell) else {
            panic!("grid holds {kind:?} at {cell:?} but no pickup is tracked there");
        };
        let target = self.random_empty_cell();
        let relocated = draw_pickup_kind(&mut self.rng);
        self.grid.set(target, Occupant::Pickup(relocated));
        self.grid.set(cell, Occupant::Empty);
        self.pickups[slot] = Pickup {
            kind: relocated,
            cell: target,
        };
        debug!("{kind:?} pickup at {cell:?} collected, {relocated:?} placed at {target:?}");
        out_events.push(Event::PickupRelocated {
            from: cell,
            to: target,
            kind: relocated,
        });
    }

    fn random_empty_cell(&mut self) -> CellCoord {
        let empty = self.grid.empty_cells();
        match empty.choose(&mut self.rng) {
            Some(cell) => *cell,
            None => panic!("no empty cell left on the board"),
        }
    }

    fn discharge(&mut self, player: PlayerId, heading: f32, out_events: &mut Vec<Event>) {
        let index = match self.actor(player) {
            Ok(index) => index,
            Err(reason) => {
                out_events.push(Event::ActionRejected { player, reason });
                return;
            }
        };

        let shooter = &mut self.players[index];
        let stats = self.weapons.stats(shooter.weapon);
        let free = shooter.projectiles.free_slots();
        let rejection = if stats.pellets == 0 {
            Some(DischargeError::Unarmed)
        } else if shooter.loadout.magazine.rounds() == 0 {
            Some(DischargeError::OutOfAmmo)
        } else if free == 0 {
            Some(DischargeError::NoProjectileSlots)
        } else {
            None
        };
        if let Some(reason) = rejection {
            debug!("{} could not fire: {reason:?}", shooter.name);
            out_events.push(Event::DischargeRejected { player, reason });
            return;
        }

        let _ = shooter.loadout.magazine.take_round();
        shooter.loadout.boost = decay_boost(&mut self.rng, shooter.loadout.boost);

        let origin = shooter.cell.center(self.cell_length);
        let pellets = stats.pellets.min(u32::try_from(free).unwrap_or(u32::MAX));
        for _ in 0..pellets {
            let spread = jitter(&mut self.rng, stats.spread);
            let _ = shooter.projectiles.spawn(Projectile::new(
                origin,
                heading + spread,
                self.projectile_speed,
            ));
        }

        debug!(
            "{} fired {} ({pellets} pellets, {} rounds left)",
            shooter.name,
            shooter.weapon.label(),
            shooter.loadout.magazine.rounds()
        );
        out_events.push(Event::WeaponDischarged {
            player,
            weapon: shooter.weapon,
            pellets,
            ammo: shooter.loadout.magazine.rounds(),
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.frame += 1;
        out_events.push(Event::TimeAdvanced { frame: self.frame });

        for index in 0..self.players.len() {
            if self.winner.is_some() {
                return;
            }
            let ignore = self.players[index].piece;
            let mut pool = mem::take(&mut self.players[index].projectiles);
            pool.advance_with(|projectile| {
                let flight = projectile.advance(self.grid.view(), ignore, self.cell_length);
                if let Flight::Struck(piece) = flight {
                    self.resolve_hit(index, piece, out_events);
                }
                flight
            });
            self.players[index].projectiles = pool;
        }
    }

    fn resolve_hit(&mut self, shooter: usize, piece: PieceKind, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            return;
        }
        let Some(victim) = self
            .players
            .iter()
            .position(|player| player.alive && player.piece == piece)
        else {
            panic!("projectile struck {piece:?} but no live player holds it");
        };

        let stats = self.weapons.stats(self.players[shooter].weapon);
        let damage = roll_damage(&mut self.rng, &stats, self.players[shooter].loadout.boost);
        self.players[shooter].damage_dealt += damage;

        let shooter_id = self.players[shooter].id;
        let target = &mut self.players[victim];
        let eliminated = target.loadout.vitals.hurt(damage);
        debug!("{} hit for {damage:.1}", target.name);
        out_events.push(Event::PlayerHit {
            shooter: shooter_id,
            victim: target.id,
            damage,
            health: target.loadout.vitals.health(),
        });

        if !eliminated {
            return;
        }

        target.alive = false;
        let cell = target.cell;
        let victim_id = target.id;
        self.grid.set(cell, Occupant::Empty);
        self.dead += 1;
        info!("{} was eliminated", self.players[victim].name);
        out_events.push(Event::PlayerEliminated {
            player: victim_id,
            cell,
        });

        if self.dead + 1 == self.players.len() {
            let Some(survivor) = self.players.iter().find(|player| player.alive) else {
                panic!("dead count {} leaves no survivor", self.dead);
            };
            info!("{} wins the match", survivor.name);
            self.winner = Some(survivor.id);
            out_events.push(Event::MatchWon {
                winner: survivor.id,
            });
        } else if victim == self.active {
            self.pass_turn(out_events);
        }
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            return;
        }
        self.pass_turn(out_events);
    }

    fn pass_turn(&mut self, out_events: &mut Vec<Event>) {
        out_events.push(Event::TurnEnded {
            player: self.players[self.active].id,
        });
        let count = self.players.len();
        let mut next = self.active;
        for _ in 0..count {
            next = (next + 1) % count;
            if self.players[next].alive {
                break;
            }
        }
        self.active = next;
        out_events.push(Event::TurnStarted {
            player: self.players[next].id,
        });
    }
}

fn draw_pickup_kind<R: Rng + ?Sized>(rng: &mut R) -> PickupKind {
    if rng.gen_range(0..3) != 0 {
        PickupKind::Ammo
    } else if rng.gen_bool(0.5) {
        PickupKind::Boost
    } else {
        PickupKind::Health
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePiece { player, offset } => world.move_piece(player, offset, out_events),
        Command::Discharge { player, heading } => world.discharge(player, heading, out_events),
        Command::Tick => world.tick(out_events),
        Command::EndTurn => world.end_turn(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use chess_with_guns_core::{
        BoardSize, CellOffset, OccupancyView, PickupSnapshot, PlayerId, PlayerSnapshot,
        PlayerView, ProjectileSnapshot,
    };

    /// Dimensions of the board.
    #[must_use]
    pub fn board_size(world: &World) -> BoardSize {
        world.grid.size()
    }

    /// Side length of a cell in pixels.
    #[must_use]
    pub fn cell_length(world: &World) -> f32 {
        world.cell_length
    }

    /// Exposes a read-only view of the occupancy board.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.grid.view()
    }

    /// Captures a snapshot of every player in turn order.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        PlayerView::from_snapshots(
            world
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    id: player.id,
                    piece: player.piece,
                    weapon: player.weapon,
                    cell: player.cell,
                    health: player.loadout.vitals.health(),
                    max_health: player.loadout.vitals.max(),
                    ammo: player.loadout.magazine.rounds(),
                    capacity: player.loadout.magazine.capacity(),
                    boost: player.loadout.boost,
                    alive: player.alive,
                    ai: player.ai,
                    damage_dealt: player.damage_dealt,
                })
                .collect(),
        )
    }

    /// Display name of a player.
    #[must_use]
    pub fn player_name(world: &World, player: PlayerId) -> &str {
        &world.players[world.index_of(player)].name
    }

    /// Player currently allowed to act, `None` once the match is decided.
    #[must_use]
    pub fn active_player(world: &World) -> Option<PlayerId> {
        if world.winner.is_some() {
            None
        } else {
            Some(world.players[world.active].id)
        }
    }

    /// Legal offsets for a player's piece in enumeration order.
    ///
    /// Eliminated players have no moves.
    #[must_use]
    pub fn legal_moves(world: &World, player: PlayerId) -> Vec<CellOffset> {
        let player = &world.players[world.index_of(player)];
        if !player.alive {
            return Vec::new();
        }
        super::rules::legal_moves(player.piece, player.cell, world.grid.view())
    }

    /// Snapshots every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .players
            .iter()
            .flat_map(|player| {
                let boosted = player.loadout.boost > 0;
                player.projectiles.active().map(move |projectile| ProjectileSnapshot {
                    owner: player.id,
                    position: projectile.position(),
                    heading: projectile.heading(),
                    boosted,
                })
            })
            .collect()
    }

    /// Snapshots every pickup lying on the board.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world
            .pickups
            .iter()
            .map(|pickup| PickupSnapshot {
                kind: pickup.kind,
                cell: pickup.cell,
            })
            .collect()
    }

    /// Winner of the match, once decided.
    #[must_use]
    pub fn winner(world: &World) -> Option<PlayerId> {
        world.winner
    }

    /// Number of eliminated players.
    #[must_use]
    pub fn dead_count(world: &World) -> usize {
        world.dead
    }

    /// Number of frames simulated so far.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_with_guns_core::{PieceColor, PieceRole, WeaponStats};

    fn piece(color: PieceColor, role: PieceRole) -> PieceKind {
        PieceKind::new(color, role)
    }

    fn duel(white: PieceRole, black: PieceRole, weapon: WeaponKind) -> World {
        let config = MatchConfig {
            pickups: 0,
            ..MatchConfig::default()
        };
        World::new(
            config,
            vec![
                PlayerSetup::new(
                    "white",
                    piece(PieceColor::White, white),
                    weapon,
                    CellCoord::new(5, 5),
                ),
                PlayerSetup::new(
                    "black",
                    piece(PieceColor::Black, black),
                    weapon,
                    CellCoord::new(0, 0),
                ),
            ],
        )
        .expect("valid setup")
    }

    fn place_pickup(world: &mut World, cell: CellCoord, kind: PickupKind) {
        world.grid.set(cell, Occupant::Pickup(kind));
        world.pickups.push(Pickup { kind, cell });
    }

    #[test]
    fn move_clears_origin_and_fills_destination() {
        let mut world = duel(PieceRole::Rook, PieceRole::Pawn, WeaponKind::Pistol);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePiece {
                player: PlayerId::new(0),
                offset: CellOffset::new(0, -3),
            },
            &mut events,
        );

        let view = query::occupancy_view(&world);
        assert_eq!(view.occupant(CellCoord::new(5, 5)), Occupant::Empty);
        assert_eq!(
            view.occupant(CellCoord::new(5, 2)),
            Occupant::Piece(piece(PieceColor::White, PieceRole::Rook))
        );
        assert_eq!(
            events,
            vec![Event::PieceMoved {
                player: PlayerId::new(0),
                from: CellCoord::new(5, 5),
                to: CellCoord::new(5, 2),
            }]
        );
    }

    #[test]
    #[should_panic(expected = "illegal move")]
    fn illegal_move_is_fatal() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::Pistol);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePiece {
                player: PlayerId::new(0),
                offset: CellOffset::new(1, 0),
            },
            &mut events,
        );
    }

    #[test]
    fn out_of_turn_actions_are_ignored() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::Pistol);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Discharge {
                player: PlayerId::new(1),
                heading: 0.0,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ActionRejected {
                player: PlayerId::new(1),
                reason: ActionError::NotActivePlayer,
            }]
        );
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn collecting_a_pickup_relocates_it() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::Pistol);
        place_pickup(&mut world, CellCoord::new(5, 4), PickupKind::Health);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePiece {
                player: PlayerId::new(0),
                offset: CellOffset::new(0, -1),
            },
            &mut events,
        );

        let pickups = query::pickups(&world);
        assert_eq!(pickups.len(), 1);
        assert_ne!(pickups[0].cell, CellCoord::new(5, 4));
        assert_eq!(
            query::occupancy_view(&world).occupant(pickups[0].cell),
            Occupant::Pickup(pickups[0].kind)
        );
        assert!(matches!(
            events[0],
            Event::PickupCollected {
                kind: PickupKind::Health,
                ..
            }
        ));
        assert!(matches!(events[1], Event::PickupRelocated { .. }));
        assert_eq!(
            query::player_view(&world).get(PlayerId::new(0)).map(|p| p.cell),
            Some(CellCoord::new(5, 4))
        );
    }

    #[test]
    fn ammo_pickup_refills_after_firing() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::Pistol);
        place_pickup(&mut world, CellCoord::new(5, 4), PickupKind::Ammo);
        world.players[0].loadout.magazine = Magazine::full(20);
        for _ in 0..8 {
            let _ = world.players[0].loadout.magazine.take_round();
        }
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePiece {
                player: PlayerId::new(0),
                offset: CellOffset::new(0, -1),
            },
            &mut events,
        );

        assert_eq!(world.players[0].loadout.magazine.rounds(), 17);
    }

    #[test]
    fn empty_magazine_rejects_discharge() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::RocketLauncher);
        let mut events = Vec::new();
        let fire = Command::Discharge {
            player: PlayerId::new(0),
            heading: 0.0,
        };

        apply(&mut world, fire, &mut events);
        events.clear();
        apply(&mut world, fire, &mut events);

        assert_eq!(
            events,
            vec![Event::DischargeRejected {
                player: PlayerId::new(0),
                reason: DischargeError::OutOfAmmo,
            }]
        );
    }

    #[test]
    fn unarmed_players_cannot_fire() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::None);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Discharge {
                player: PlayerId::new(0),
                heading: 0.0,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::DischargeRejected {
                player: PlayerId::new(0),
                reason: DischargeError::Unarmed,
            }]
        );
    }

    #[test]
    fn exhausted_pool_rejects_without_spending_ammo() {
        let mut world = duel(PieceRole::Pawn, PieceRole::Pawn, WeaponKind::Shotgun);
        let mut events = Vec::new();
        let fire = Command::Discharge {
            player: PlayerId::new(0),
            heading: std::f32::consts::PI,
        };

        apply(&mut world, fire, &mut events);
        assert!(matches!(
            events[0],
            Event::WeaponDischarged { pellets: 7, ammo: 14, .. }
        ));

        events.clear();
        apply(&mut world, fire, &mut events);
        assert!(matches!(
            events[0],
            Event::WeaponDischarged { pellets: 3, ammo: 13, .. }
        ));

        events.clear();
        apply(&mut world, fire, &mut events);
        assert_eq!(
            events,
            vec![Event::DischargeRejected {
                player: PlayerId::new(0),
                reason: DischargeError::NoProjectileSlots,
            }]
        );
        assert_eq!(world.players[0].loadout.magazine.rounds(), 13);
    }

    #[test]
    fn boosted_hits_add_the_boost() {
        let quiet = WeaponStats {
            damage: 9.0,
            spread: 0.0,
            variance: 0.0,
            pellets: 1,
            capacity: 20,
        };
        let config = MatchConfig {
            pickups: 0,
            weapons: WeaponTable::classic().with_stats(WeaponKind::Pistol, quiet),
            ..MatchConfig::default()
        };
        let mut world = World::new(
            config,
            vec![
                PlayerSetup::new(
                    "white",
                    piece(PieceColor::White, PieceRole::Pawn),
                    WeaponKind::Pistol,
                    CellCoord::new(0, 0),
                ),
                PlayerSetup::new(
                    "black",
                    piece(PieceColor::Black, PieceRole::Pawn),
                    WeaponKind::Pistol,
                    CellCoord::new(2, 0),
                ),
            ],
        )
        .expect("valid setup");
        world.players[0].loadout.boost = BOOST_PICKUP_LEVEL;
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Discharge {
                player: PlayerId::new(0),
                heading: 0.0,
            },
            &mut events,
        );
        let boost = world.players[0].loadout.boost;
        assert!(boost == 4 || boost == 5);

        for _ in 0..8 {
            apply(&mut world, Command::Tick, &mut events);
        }

        let health = query::player_view(&world)
            .get(PlayerId::new(1))
            .map(|snapshot| snapshot.health);
        assert_eq!(health, Some(100.0 - 9.0 - boost as f32));
    }

    #[test]
    fn setup_rejects_duplicate_pieces() {
        let pawn = piece(PieceColor::White, PieceRole::Pawn);
        let error = World::new(
            MatchConfig::default(),
            vec![
                PlayerSetup::new("a", pawn, WeaponKind::Pistol, CellCoord::new(0, 0)),
                PlayerSetup::new("b", pawn, WeaponKind::Pistol, CellCoord::new(1, 0)),
            ],
        )
        .expect_err("duplicate piece");
        assert_eq!(error, SetupError::DuplicatePiece { piece: pawn });
    }

    #[test]
    fn setup_rejects_starts_off_the_board() {
        let error = World::new(
            MatchConfig::default(),
            vec![
                PlayerSetup::new(
                    "a",
                    piece(PieceColor::White, PieceRole::Pawn),
                    WeaponKind::Pistol,
                    CellCoord::new(6, 0),
                ),
                PlayerSetup::new(
                    "b",
                    piece(PieceColor::Black, PieceRole::Pawn),
                    WeaponKind::Pistol,
                    CellCoord::new(1, 0),
                ),
            ],
        )
        .expect_err("start off board");
        assert!(matches!(error, SetupError::StartOutOfBounds { .. }));
    }

    #[test]
    fn setup_scatters_pickups_on_empty_cells() {
        let world = World::new(
            MatchConfig::default(),
            vec![
                PlayerSetup::new(
                    "a",
                    piece(PieceColor::White, PieceRole::Pawn),
                    WeaponKind::Pistol,
                    CellCoord::new(5, 5),
                ),
                PlayerSetup::new(
                    "b",
                    piece(PieceColor::Black, PieceRole::Pawn),
                    WeaponKind::Pistol,
                    CellCoord::new(0, 0),
                ),
            ],
        )
        .expect("valid setup");

        let pickups = query::pickups(&world);
        assert_eq!(pickups.len(), DEFAULT_PICKUPS);
        for pickup in pickups {
            assert_eq!(
                query::occupancy_view(&world).occupant(pickup.cell),
                Occupant::Pickup(pickup.kind)
            );
        }
    }
}
