#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn match statistics sampled from world events.

mod export;

use chess_with_guns_core::{Event, PlayerView};

pub use export::{format_csv, format_plot_csv};

/// Health and damage of a single player at the end of a turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSample {
    /// Remaining health.
    pub health: f32,
    /// Cumulative damage dealt so far.
    pub damage_dealt: f32,
}

/// Snapshot recorded each time a turn completes.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnSample {
    /// One-based index of the completed turn.
    pub turn: u32,
    /// Samples in player order.
    pub players: Vec<PlayerSample>,
    /// Cell distance between the first two players, when both are on the board.
    pub distance: Option<f32>,
}

/// Pure analytics system that records one sample per completed turn.
#[derive(Debug, Default)]
pub struct MatchStatistics {
    names: Vec<String>,
    samples: Vec<TurnSample>,
}

impl MatchStatistics {
    /// Creates an empty statistics table with one column group per player name.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            samples: Vec::new(),
        }
    }

    /// Player names in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Samples recorded so far.
    #[must_use]
    pub fn samples(&self) -> &[TurnSample] {
        &self.samples
    }

    /// Records a sample for every `Event::TurnEnded` in `events`.
    ///
    /// `players` must reflect the world after the events were applied.
    pub fn handle(&mut self, events: &[Event], players: &PlayerView) {
        for event in events {
            if matches!(event, Event::TurnEnded { .. }) {
                self.record(players);
            }
        }
    }

    fn record(&mut self, players: &PlayerView) {
        let snapshots = players.as_slice();
        let distance = match snapshots {
            [first, second, ..] if first.alive && second.alive => Some(first.cell.distance(second.cell)),
            _ => None,
        };
        self.samples.push(TurnSample {
            turn: self.samples.len() as u32 + 1,
            players: snapshots
                .iter()
                .map(|snapshot| PlayerSample {
                    health: snapshot.health,
                    damage_dealt: snapshot.damage_dealt,
                })
                .collect(),
            distance,
        });
    }
}
