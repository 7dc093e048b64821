#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when the active player's turn is over.

use chess_with_guns_core::{Command, Event, PlayerId};

/// Rule that gates turn advancement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TurnPolicy {
    /// A move or a successful discharge ends the turn.
    #[default]
    ActionEndsTurn,
    /// The turn lasts a fixed number of frames regardless of actions taken.
    MoveTimer {
        /// Frames granted to each turn.
        frames: u32,
    },
}

/// Turn controller that emits `Command::EndTurn` according to its policy.
#[derive(Debug, Default)]
pub struct TurnController {
    policy: TurnPolicy,
    elapsed: u32,
    requested: bool,
}

impl TurnController {
    /// Creates a controller enforcing the provided policy.
    #[must_use]
    pub fn new(policy: TurnPolicy) -> Self {
        Self {
            policy,
            elapsed: 0,
            requested: false,
        }
    }

    /// Policy enforced by the controller.
    #[must_use]
    pub const fn policy(&self) -> TurnPolicy {
        self.policy
    }

    /// Frames left before a move timer expires, `None` without a timer.
    #[must_use]
    pub fn remaining_frames(&self) -> Option<u32> {
        match self.policy {
            TurnPolicy::ActionEndsTurn => None,
            TurnPolicy::MoveTimer { frames } => Some(frames.saturating_sub(self.elapsed)),
        }
    }

    /// Consumes the frame's events and requests the end of the active turn when due.
    ///
    /// At most one `Command::EndTurn` is emitted per turn.
    pub fn handle(&mut self, events: &[Event], active: Option<PlayerId>, out: &mut Vec<Command>) {
        let Some(active) = active else {
            return;
        };

        let mut due = false;
        for event in events {
            match *event {
                Event::TurnStarted { .. } => {
                    self.elapsed = 0;
                    self.requested = false;
                    due = false;
                }
                Event::PieceMoved { player, .. } | Event::WeaponDischarged { player, .. } => {
                    if player == active && self.policy == TurnPolicy::ActionEndsTurn {
                        due = true;
                    }
                }
                Event::TimeAdvanced { .. } => {
                    if let TurnPolicy::MoveTimer { frames } = self.policy {
                        self.elapsed = self.elapsed.saturating_add(1);
                        if self.elapsed >= frames {
                            due = true;
                        }
                    }
                }
                _ => {}
            }
        }

        if due && !self.requested {
            self.requested = true;
            out.push(Command::EndTurn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_with_guns_core::{CellCoord, WeaponKind};

    const WHITE: PlayerId = PlayerId::new(0);
    const BLACK: PlayerId = PlayerId::new(1);

    fn moved(player: PlayerId) -> Event {
        Event::PieceMoved {
            player,
            from: CellCoord::new(0, 0),
            to: CellCoord::new(0, 1),
        }
    }

    #[test]
    fn action_ends_turn_once() {
        let mut controller = TurnController::default();
        let mut out = Vec::new();

        controller.handle(&[moved(WHITE)], Some(WHITE), &mut out);
        controller.handle(&[moved(WHITE)], Some(WHITE), &mut out);

        assert_eq!(out, vec![Command::EndTurn]);
    }

    #[test]
    fn turn_start_rearms_the_controller() {
        let mut controller = TurnController::default();
        let mut out = Vec::new();

        controller.handle(&[moved(WHITE)], Some(WHITE), &mut out);
        controller.handle(
            &[
                Event::TurnEnded { player: WHITE },
                Event::TurnStarted { player: BLACK },
            ],
            Some(BLACK),
            &mut out,
        );
        controller.handle(
            &[Event::WeaponDischarged {
                player: BLACK,
                weapon: WeaponKind::Pistol,
                pellets: 1,
                ammo: 19,
            }],
            Some(BLACK),
            &mut out,
        );

        assert_eq!(out, vec![Command::EndTurn, Command::EndTurn]);
    }

    #[test]
    fn actions_of_other_players_are_ignored() {
        let mut controller = TurnController::default();
        let mut out = Vec::new();

        controller.handle(&[moved(BLACK)], Some(WHITE), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn move_timer_ignores_actions_and_counts_frames() {
        let mut controller = TurnController::new(TurnPolicy::MoveTimer { frames: 3 });
        let mut out = Vec::new();

        controller.handle(&[moved(WHITE)], Some(WHITE), &mut out);
        assert!(out.is_empty());

        for frame in 1..=2 {
            controller.handle(&[Event::TimeAdvanced { frame }], Some(WHITE), &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(controller.remaining_frames(), Some(1));

        controller.handle(&[Event::TimeAdvanced { frame: 3 }], Some(WHITE), &mut out);
        assert_eq!(out, vec![Command::EndTurn]);
    }

    #[test]
    fn decided_matches_emit_nothing() {
        let mut controller = TurnController::default();
        let mut out = Vec::new();

        controller.handle(&[moved(WHITE)], None, &mut out);

        assert!(out.is_empty());
    }
}
