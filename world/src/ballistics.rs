//! Projectile flight and collision against the occupancy board.

use chess_with_guns_core::{BoardPoint, OccupancyView, Occupant, PieceKind};

/// Outcome of advancing a projectile by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flight {
    /// The projectile is still travelling.
    InFlight,
    /// The projectile left the board without striking anything.
    Exited,
    /// The projectile struck the provided piece and stopped.
    Struck(PieceKind),
}

/// A single shot travelling across the board in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    position: BoardPoint,
    heading: f32,
    speed: f32,
}

impl Projectile {
    /// Creates a projectile at `origin` travelling along `heading`.
    #[must_use]
    pub const fn new(origin: BoardPoint, heading: f32, speed: f32) -> Self {
        Self {
            position: origin,
            heading,
            speed,
        }
    }

    /// Physical position used for collision.
    #[must_use]
    pub const fn position(&self) -> BoardPoint {
        self.position
    }

    /// Direction of travel in radians.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        self.heading
    }

    /// Moves the projectile one frame forward and tests the cell it lands in.
    ///
    /// Empty cells, pickups and the `ignore` piece let the projectile pass.
    pub fn advance(&mut self, board: OccupancyView<'_>, ignore: PieceKind, cell_length: f32) -> Flight {
        self.position = self.position.advanced(self.heading, self.speed);

        let column = (self.position.x() / cell_length).floor() as i64;
        let row = (self.position.y() / cell_length).floor() as i64;
        match board.occupant_at(column, row) {
            None => Flight::Exited,
            Some(Occupant::Empty | Occupant::Pickup(_)) => Flight::InFlight,
            Some(Occupant::Piece(piece)) if piece == ignore => Flight::InFlight,
            Some(Occupant::Piece(piece)) => Flight::Struck(piece),
        }
    }
}

/// Fixed-capacity arena of projectile slots with an explicit free-list.
#[derive(Clone, Debug, Default)]
pub struct ProjectilePool {
    slots: Vec<Option<Projectile>>,
    free: Vec<usize>,
}

impl ProjectilePool {
    /// Creates a pool with `capacity` empty slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            free: (0..capacity).rev().collect(),
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots available for new projectiles.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Places a projectile into the most recently released slot.
    ///
    /// A fresh pool hands out slots in ascending order.
    ///
    /// Returns `false` and drops the projectile when every slot is occupied.
    pub fn spawn(&mut self, projectile: Projectile) -> bool {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(projectile);
                true
            }
            None => false,
        }
    }

    /// Iterates over projectiles currently in flight.
    pub fn active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().flatten()
    }

    /// Advances every active projectile using `step`, releasing the slot of
    /// any projectile that stops.
    pub fn advance_with<F>(&mut self, mut step: F)
    where
        F: FnMut(&mut Projectile) -> Flight,
    {
        for index in 0..self.slots.len() {
            let Some(projectile) = self.slots[index].as_mut() else {
                continue;
            };
            if step(projectile) != Flight::InFlight {
                self.slots[index] = None;
                self.free.push(index);
            }
        }
    }
}
