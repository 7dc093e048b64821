#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chess with Guns engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the player agents. Agents and adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems react to deterministically. Systems read immutable snapshots
//! and respond exclusively with new command batches.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Chess with Guns.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Moves the player's piece by a previously enumerated legal offset.
    MovePiece {
        /// Player whose piece should move.
        player: PlayerId,
        /// Offset drawn from the player's legal destinations.
        offset: CellOffset,
    },
    /// Fires the player's weapon toward the provided heading.
    Discharge {
        /// Player pulling the trigger.
        player: PlayerId,
        /// Aim direction measured in radians, zero pointing along +x.
        heading: f32,
    },
    /// Advances every in-flight projectile by one frame and resolves hits.
    Tick,
    /// Passes control to the next living player.
    EndTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one frame.
    TimeAdvanced {
        /// Index of the frame that just completed.
        frame: u64,
    },
    /// Announces the player that may act next.
    TurnStarted {
        /// Player that received control.
        player: PlayerId,
    },
    /// Announces that a player's turn completed.
    TurnEnded {
        /// Player whose turn finished.
        player: PlayerId,
    },
    /// Confirms that a piece moved between two cells.
    PieceMoved {
        /// Owner of the piece.
        player: PlayerId,
        /// Cell the piece occupied before moving.
        from: CellCoord,
        /// Cell the piece occupies after the move.
        to: CellCoord,
    },
    /// Reports that a move landed on a pickup.
    PickupCollected {
        /// Player that collected the pickup.
        player: PlayerId,
        /// Kind of pickup consumed.
        kind: PickupKind,
        /// Cell the pickup occupied.
        cell: CellCoord,
    },
    /// Reports that a consumed pickup reappeared elsewhere on the board.
    PickupRelocated {
        /// Cell the pickup was collected from.
        from: CellCoord,
        /// Cell now holding the pickup.
        to: CellCoord,
        /// Kind drawn for the relocated pickup.
        kind: PickupKind,
    },
    /// Confirms that a weapon fired.
    WeaponDischarged {
        /// Player that fired.
        player: PlayerId,
        /// Weapon used for the discharge.
        weapon: WeaponKind,
        /// Number of projectiles that entered flight.
        pellets: u32,
        /// Ammunition remaining after the discharge.
        ammo: u32,
    },
    /// Reports that a discharge request was refused.
    DischargeRejected {
        /// Player that attempted to fire.
        player: PlayerId,
        /// Specific reason the discharge failed.
        reason: DischargeError,
    },
    /// Reports that a command from a player was ignored.
    ActionRejected {
        /// Player that issued the command.
        player: PlayerId,
        /// Specific reason the action was ignored.
        reason: ActionError,
    },
    /// Reports that a projectile struck a player's piece.
    PlayerHit {
        /// Owner of the projectile.
        shooter: PlayerId,
        /// Player whose piece was struck.
        victim: PlayerId,
        /// Damage applied by the hit.
        damage: f32,
        /// Health remaining after the hit.
        health: f32,
    },
    /// Reports that a player's health was exhausted.
    PlayerEliminated {
        /// Player that was eliminated.
        player: PlayerId,
        /// Cell that was cleared when the piece was removed.
        cell: CellCoord,
    },
    /// Announces the sole surviving player.
    MatchWon {
        /// Player that won the match.
        winner: PlayerId,
    },
}

/// Reasons a discharge request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DischargeError {
    /// The player's magazine is empty.
    OutOfAmmo,
    /// Every projectile slot owned by the player is already in flight.
    NoProjectileSlots,
    /// The equipped weapon spawns no projectiles.
    Unarmed,
}

/// Reasons a player command may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionError {
    /// Another player currently holds the turn.
    NotActivePlayer,
    /// The player has already been eliminated.
    Eliminated,
    /// The match already has a winner.
    MatchOver,
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel-space centre of the cell for the provided cell length.
    #[must_use]
    pub fn center(self, cell_length: f32) -> BoardPoint {
        BoardPoint::new(
            (self.column as f32 + 0.5) * cell_length,
            (self.row as f32 + 0.5) * cell_length,
        )
    }

    /// Euclidean distance between two cells measured in cells.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f32 {
        let dx = self.column as f32 - other.column as f32;
        let dy = self.row as f32 - other.row as f32;
        dx.hypot(dy)
    }
}

/// Signed displacement between two cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellOffset {
    dx: i32,
    dy: i32,
}

impl CellOffset {
    /// Creates a new offset. Positive `dy` points down the board.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the offset.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component of the offset.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Multiplies both components by `steps`.
    #[must_use]
    pub const fn scaled(self, steps: i32) -> Self {
        Self::new(self.dx * steps, self.dy * steps)
    }
}

/// Dimensions of the board measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    columns: u32,
    rows: u32,
}

impl BoardSize {
    /// Creates a new board size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Reports whether the signed coordinate lies on the board. Fails closed.
    #[must_use]
    pub fn contains(&self, column: i64, row: i64) -> bool {
        column >= 0 && row >= 0 && column < i64::from(self.columns) && row < i64::from(self.rows)
    }

    /// Converts a signed coordinate into a cell when it lies on the board.
    #[must_use]
    pub fn cell_at(&self, column: i64, row: i64) -> Option<CellCoord> {
        if self.contains(column, row) {
            Some(CellCoord::new(column as u32, row as u32))
        } else {
            None
        }
    }

    /// Applies an offset to a cell, returning `None` when it leaves the board.
    #[must_use]
    pub fn translate(&self, cell: CellCoord, offset: CellOffset) -> Option<CellCoord> {
        self.cell_at(
            i64::from(cell.column()) + i64::from(offset.dx()),
            i64::from(cell.row()) + i64::from(offset.dy()),
        )
    }

    /// Locates the cell containing a pixel-space point.
    #[must_use]
    pub fn cell_containing(&self, point: BoardPoint, cell_length: f32) -> Option<CellCoord> {
        if cell_length <= 0.0 {
            return None;
        }
        let column = (point.x() / cell_length).floor();
        let row = (point.y() / cell_length).floor();
        if !column.is_finite() || !row.is_finite() {
            return None;
        }
        self.cell_at(column as i64, row as i64)
    }

    /// Row-major storage index of a cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the board.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> usize {
        assert!(
            cell.column() < self.columns && cell.row() < self.rows,
            "cell {cell:?} lies outside a {}x{} board",
            self.columns,
            self.rows
        );
        cell.row() as usize * self.columns as usize + cell.column() as usize
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Continuous pixel-space position on the board.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BoardPoint {
    x: f32,
    y: f32,
}

impl BoardPoint {
    /// Creates a new point from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in pixels.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in pixels.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Heading in radians from this point toward `target`.
    ///
    /// Resolves all four quadrants, so a target left of the origin yields a
    /// heading rotated by π relative to the plain arctangent of the slope.
    #[must_use]
    pub fn heading_to(self, target: BoardPoint) -> f32 {
        (target.y - self.y).atan2(target.x - self.x)
    }

    /// Moves the point `distance` pixels along `heading`.
    #[must_use]
    pub fn advanced(self, heading: f32, distance: f32) -> Self {
        Self::new(
            self.x + distance * heading.cos(),
            self.y + distance * heading.sin(),
        )
    }
}

/// Side a piece fights for. Also selects the piece's render colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceColor {
    /// Pieces whose pawns advance toward row zero.
    White,
    /// Pieces whose pawns advance toward the last row.
    Black,
}

impl PieceColor {
    /// Human readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

/// Chess role that decides how a piece moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceRole {
    /// Single forward step.
    Pawn,
    /// Orthogonal rays.
    Rook,
    /// Diagonal rays.
    Bishop,
    /// L-shaped jumps.
    Knight,
    /// Single step in any direction.
    King,
    /// Rays in all eight directions.
    Queen,
}

impl PieceRole {
    /// Every role in menu order.
    pub const ALL: [PieceRole; 6] = [
        PieceRole::Pawn,
        PieceRole::Rook,
        PieceRole::Bishop,
        PieceRole::Knight,
        PieceRole::King,
        PieceRole::Queen,
    ];

    /// Human readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PieceRole::Pawn => "Pawn",
            PieceRole::Rook => "Rook",
            PieceRole::Bishop => "Bishop",
            PieceRole::Knight => "Knight",
            PieceRole::King => "King",
            PieceRole::Queen => "Queen",
        }
    }
}

/// Geometric rule describing candidate destinations for a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveTemplate {
    /// A single fixed offset.
    Step(CellOffset),
    /// A unit direction extended cell by cell until blocked.
    Ray(CellOffset),
}

const fn step(dx: i32, dy: i32) -> MoveTemplate {
    MoveTemplate::Step(CellOffset::new(dx, dy))
}

const fn ray(dx: i32, dy: i32) -> MoveTemplate {
    MoveTemplate::Ray(CellOffset::new(dx, dy))
}

const WHITE_PAWN_TEMPLATES: [MoveTemplate; 1] = [step(0, -1)];
const BLACK_PAWN_TEMPLATES: [MoveTemplate; 1] = [step(0, 1)];
const ROOK_TEMPLATES: [MoveTemplate; 4] = [ray(0, 1), ray(0, -1), ray(1, 0), ray(-1, 0)];
const BISHOP_TEMPLATES: [MoveTemplate; 4] = [ray(1, 1), ray(1, -1), ray(-1, 1), ray(-1, -1)];
const KNIGHT_TEMPLATES: [MoveTemplate; 8] = [
    step(1, 2),
    step(-1, 2),
    step(1, -2),
    step(-1, -2),
    step(2, 1),
    step(-2, 1),
    step(2, -1),
    step(-2, -1),
];
const KING_TEMPLATES: [MoveTemplate; 8] = [
    step(0, 1),
    step(1, 1),
    step(1, 0),
    step(1, -1),
    step(0, -1),
    step(-1, -1),
    step(-1, 0),
    step(-1, 1),
];
const QUEEN_TEMPLATES: [MoveTemplate; 8] = [
    ray(0, 1),
    ray(1, 1),
    ray(1, 0),
    ray(1, -1),
    ray(0, -1),
    ray(-1, -1),
    ray(-1, 0),
    ray(-1, 1),
];

/// A coloured chess piece standing in for a player on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceKind {
    color: PieceColor,
    role: PieceRole,
}

impl PieceKind {
    /// Creates a piece kind from its colour and role.
    #[must_use]
    pub const fn new(color: PieceColor, role: PieceRole) -> Self {
        Self { color, role }
    }

    /// Colour of the piece.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    /// Role of the piece.
    #[must_use]
    pub const fn role(&self) -> PieceRole {
        self.role
    }

    /// Static movement table for the piece, in declaration order.
    #[must_use]
    pub const fn move_templates(self) -> &'static [MoveTemplate] {
        match (self.role, self.color) {
            (PieceRole::Pawn, PieceColor::White) => &WHITE_PAWN_TEMPLATES,
            (PieceRole::Pawn, PieceColor::Black) => &BLACK_PAWN_TEMPLATES,
            (PieceRole::Rook, _) => &ROOK_TEMPLATES,
            (PieceRole::Bishop, _) => &BISHOP_TEMPLATES,
            (PieceRole::Knight, _) => &KNIGHT_TEMPLATES,
            (PieceRole::King, _) => &KING_TEMPLATES,
            (PieceRole::Queen, _) => &QUEEN_TEMPLATES,
        }
    }
}

/// Consumable items scattered on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Refills part of the magazine.
    Ammo,
    /// Restores some health.
    Health,
    /// Grants a decaying damage bonus.
    Boost,
}

/// Occupant of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Occupant {
    /// Nothing stands on the cell.
    #[default]
    Empty,
    /// A player's piece.
    Piece(PieceKind),
    /// A pickup waiting to be collected.
    Pickup(PickupKind),
}

impl Occupant {
    /// Reports whether the cell holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    /// Reports whether a piece may move onto the cell.
    #[must_use]
    pub const fn is_enterable(&self) -> bool {
        matches!(self, Occupant::Empty | Occupant::Pickup(_))
    }

    /// Piece standing on the cell, if any.
    #[must_use]
    pub const fn piece(&self) -> Option<PieceKind> {
        match self {
            Occupant::Piece(piece) => Some(*piece),
            _ => None,
        }
    }

    /// Pickup lying on the cell, if any.
    #[must_use]
    pub const fn pickup(&self) -> Option<PickupKind> {
        match self {
            Occupant::Pickup(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Movement templates of the occupant. Empty for anything but a piece.
    #[must_use]
    pub const fn move_templates(&self) -> &'static [MoveTemplate] {
        match self {
            Occupant::Piece(piece) => piece.move_templates(),
            _ => &[],
        }
    }
}

/// Weapons a player may carry into a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Cannot fire.
    None,
    /// Calibration weapon that sprays hundreds of pellets.
    AimTest,
    /// Accurate single shot.
    Pistol,
    /// Wide cone of pellets.
    Shotgun,
    /// Three-pellet burst.
    ScienceGun,
    /// Tight two-round burst.
    Rifle,
    /// One heavy rocket.
    RocketLauncher,
}

impl WeaponKind {
    /// Every weapon in menu order.
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::None,
        WeaponKind::AimTest,
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::ScienceGun,
        WeaponKind::Rifle,
        WeaponKind::RocketLauncher,
    ];

    /// Human readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            WeaponKind::None => "None",
            WeaponKind::AimTest => "Aim Test",
            WeaponKind::Pistol => "Pistol",
            WeaponKind::Shotgun => "Shotgun",
            WeaponKind::ScienceGun => "Science Gun",
            WeaponKind::Rifle => "Rifle",
            WeaponKind::RocketLauncher => "Rocket Launcher",
        }
    }

    const fn slot(self) -> usize {
        match self {
            WeaponKind::None => 0,
            WeaponKind::AimTest => 1,
            WeaponKind::Pistol => 2,
            WeaponKind::Shotgun => 3,
            WeaponKind::ScienceGun => 4,
            WeaponKind::Rifle => 5,
            WeaponKind::RocketLauncher => 6,
        }
    }
}

/// Ballistic parameters of a single weapon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Damage dealt by a single projectile before variance and boost.
    pub damage: f32,
    /// Half-width of the uniform aiming cone in radians.
    pub spread: f32,
    /// Half-width of the uniform damage perturbation.
    pub variance: f32,
    /// Projectiles spawned per discharge.
    pub pellets: u32,
    /// Magazine size.
    pub capacity: u32,
}

impl WeaponStats {
    /// Creates weapon stats with the spread expressed in degrees.
    #[must_use]
    pub fn with_spread_degrees(
        damage: f32,
        spread_degrees: f32,
        variance: f32,
        pellets: u32,
        capacity: u32,
    ) -> Self {
        Self {
            damage,
            spread: spread_degrees * PI / 180.0,
            variance,
            pellets,
            capacity,
        }
    }
}

/// Immutable weapon configuration handed to the world at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponTable {
    entries: [WeaponStats; 7],
}

impl WeaponTable {
    /// Stock weapon balance.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            entries: [
                WeaponStats::with_spread_degrees(0.0, 0.0, 0.0, 0, 0),
                WeaponStats::with_spread_degrees(11.0, 15.0, 4.0, 300, 6),
                WeaponStats::with_spread_degrees(9.0, 10.0, 2.0, 1, 20),
                WeaponStats::with_spread_degrees(8.0, 35.0, 1.0, 7, 15),
                WeaponStats::with_spread_degrees(5.0, 15.0, 3.0, 3, 6),
                WeaponStats::with_spread_degrees(11.0, 5.0, 4.0, 2, 10),
                WeaponStats::with_spread_degrees(37.0, 35.0, 10.0, 1, 1),
            ],
        }
    }

    /// Stats of the provided weapon.
    #[must_use]
    pub fn stats(&self, weapon: WeaponKind) -> WeaponStats {
        self.entries[weapon.slot()]
    }

    /// Replaces the stats of a single weapon.
    #[must_use]
    pub fn with_stats(mut self, weapon: WeaponKind, stats: WeaponStats) -> Self {
        self.entries[weapon.slot()] = stats;
        self
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Read-only snapshot describing a player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Identifier of the player.
    pub id: PlayerId,
    /// Piece the player controls.
    pub piece: PieceKind,
    /// Weapon the player carries.
    pub weapon: WeaponKind,
    /// Cell currently holding the player's piece.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: f32,
    /// Health ceiling.
    pub max_health: f32,
    /// Rounds left in the magazine.
    pub ammo: u32,
    /// Magazine size of the equipped weapon.
    pub capacity: u32,
    /// Damage bonus added to each hit.
    pub boost: u32,
    /// Whether the player is still in the match.
    pub alive: bool,
    /// Whether the player is computer controlled.
    pub ai: bool,
    /// Cumulative damage the player has dealt.
    pub damage_dealt: f32,
}

/// Read-only view of every player in turn order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerView {
    snapshots: Vec<PlayerSnapshot>,
}

impl PlayerView {
    /// Creates a view from snapshots ordered by player identifier.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<PlayerSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterates over the player snapshots.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PlayerSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshots as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[PlayerSnapshot] {
        &self.snapshots
    }

    /// Looks up a single player.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&PlayerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == player)
    }

    /// Consumes the view, returning the owned snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PlayerSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Player that fired the projectile.
    pub owner: PlayerId,
    /// Physical position of the projectile.
    pub position: BoardPoint,
    /// Direction of travel in radians.
    pub heading: f32,
    /// Whether the owner carried a damage boost when the projectile was drawn.
    pub boosted: bool,
}

/// Read-only snapshot of a pickup lying on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PickupSnapshot {
    /// Kind of the pickup.
    pub kind: PickupKind,
    /// Cell the pickup occupies.
    pub cell: CellCoord,
}

/// Borrowed view of the board occupancy.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    size: BoardSize,
    cells: &'a [Occupant],
}

impl<'a> OccupancyView<'a> {
    /// Wraps row-major occupant storage.
    ///
    /// # Panics
    ///
    /// Panics when the storage does not match the board size.
    #[must_use]
    pub fn new(size: BoardSize, cells: &'a [Occupant]) -> Self {
        assert_eq!(
            cells.len(),
            size.cell_count(),
            "occupancy storage does not match board size"
        );
        Self { size, cells }
    }

    /// Dimensions of the board.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// Occupant of an on-board cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the board.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Occupant {
        self.cells[self.size.index(cell)]
    }

    /// Occupant at a signed coordinate, or `None` when it lies off the board.
    #[must_use]
    pub fn occupant_at(&self, column: i64, row: i64) -> Option<Occupant> {
        self.size
            .cell_at(column, row)
            .map(|cell| self.cells[self.size.index(cell)])
    }

    /// Iterates over every cell and its occupant in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Occupant)> + 'a {
        let cells = self.cells;
        self.size.cells().zip(cells.iter().copied())
    }
}

/// Pointer state sampled once per frame by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    position: Option<BoardPoint>,
    down: bool,
    pressed: bool,
}

impl PointerInput {
    /// Creates pointer input for a frame without a pending press edge.
    #[must_use]
    pub const fn new(position: Option<BoardPoint>, down: bool) -> Self {
        Self {
            position,
            down,
            pressed: false,
        }
    }

    /// Board-space pointer position, `None` when the pointer left the window.
    #[must_use]
    pub const fn position(&self) -> Option<BoardPoint> {
        self.position
    }

    /// Whether the primary button is held.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        self.down
    }

    /// Latches a press edge for the frame.
    pub fn register_press(&mut self) {
        self.pressed = true;
    }

    /// Returns whether a press edge fired and clears it.
    pub fn take_press(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }
}

/// Everything a [`PlayerAgent`] may inspect while choosing an action.
#[derive(Clone, Copy, Debug)]
pub struct AgentContext<'a> {
    /// The acting player.
    pub player: PlayerSnapshot,
    /// Legal offsets in enumeration order.
    pub legal_moves: &'a [CellOffset],
    /// Current board occupancy.
    pub occupancy: OccupancyView<'a>,
    /// Every player in turn order, including the acting one.
    pub players: &'a [PlayerSnapshot],
    /// Side length of a cell in pixels.
    pub cell_length: f32,
}

impl AgentContext<'_> {
    /// Legal offsets paired with the cells they land on.
    pub fn destinations(&self) -> impl Iterator<Item = (CellOffset, CellCoord)> + '_ {
        let size = self.occupancy.size();
        let origin = self.player.cell;
        self.legal_moves
            .iter()
            .filter_map(move |&offset| size.translate(origin, offset).map(|cell| (offset, cell)))
    }

    /// Living players other than the acting one.
    pub fn opponents(&self) -> impl Iterator<Item = &PlayerSnapshot> + '_ {
        let me = self.player.id;
        self.players
            .iter()
            .filter(move |snapshot| snapshot.alive && snapshot.id != me)
    }
}

/// Decision maker controlling a single player.
///
/// Agents push at most one command per call: a [`Command::MovePiece`] when a
/// move was chosen, otherwise optionally a [`Command::Discharge`].
pub trait PlayerAgent {
    /// Chooses the player's action for the current frame.
    fn act(&mut self, context: &AgentContext<'_>, pointer: &mut PointerInput, out: &mut Vec<Command>);
}

#[cfg(test)]
mod tests {
    use super::{
        BoardPoint, BoardSize, CellCoord, CellOffset, DischargeError, MoveTemplate, Occupant,
        OccupancyView, PieceColor, PieceKind, PieceRole, PlayerId, PointerInput, WeaponKind,
        WeaponTable,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::f32::consts::PI;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn player_id_round_trips_through_bincode() {
        assert_round_trip(&PlayerId::new(7));
    }

    #[test]
    fn piece_kind_round_trips_through_bincode() {
        assert_round_trip(&PieceKind::new(PieceColor::Black, PieceRole::Knight));
    }

    #[test]
    fn weapon_kind_round_trips_through_bincode() {
        assert_round_trip(&WeaponKind::RocketLauncher);
    }

    #[test]
    fn discharge_error_round_trips_through_bincode() {
        assert_round_trip(&DischargeError::NoProjectileSlots);
    }

    #[test]
    fn pawns_advance_toward_the_opposing_side() {
        let white = PieceKind::new(PieceColor::White, PieceRole::Pawn);
        let black = PieceKind::new(PieceColor::Black, PieceRole::Pawn);
        assert_eq!(
            white.move_templates(),
            &[MoveTemplate::Step(CellOffset::new(0, -1))]
        );
        assert_eq!(
            black.move_templates(),
            &[MoveTemplate::Step(CellOffset::new(0, 1))]
        );
    }

    #[test]
    fn sliding_pieces_use_rays_and_jumpers_use_steps() {
        for role in PieceRole::ALL {
            let templates = PieceKind::new(PieceColor::White, role).move_templates();
            let rays = templates
                .iter()
                .filter(|template| matches!(template, MoveTemplate::Ray(_)))
                .count();
            let expected = match role {
                PieceRole::Rook | PieceRole::Bishop => 4,
                PieceRole::Queen => 8,
                PieceRole::Pawn | PieceRole::Knight | PieceRole::King => 0,
            };
            assert_eq!(rays, expected, "{role:?}");
        }
    }

    #[test]
    fn non_piece_occupants_have_no_templates() {
        assert!(Occupant::Empty.move_templates().is_empty());
        assert!(Occupant::Pickup(super::PickupKind::Boost)
            .move_templates()
            .is_empty());
    }

    #[test]
    fn classic_table_matches_pistol_balance() {
        let pistol = WeaponTable::classic().stats(WeaponKind::Pistol);
        assert_eq!(pistol.damage, 9.0);
        assert_eq!(pistol.variance, 2.0);
        assert_eq!(pistol.pellets, 1);
        assert_eq!(pistol.capacity, 20);
        assert!((pistol.spread - 10.0 * PI / 180.0).abs() < 1e-6);
    }

    #[test]
    fn table_overrides_replace_single_entries() {
        let table = WeaponTable::classic();
        let mut quiet = table.stats(WeaponKind::Shotgun);
        quiet.spread = 0.0;
        let table = table.with_stats(WeaponKind::Shotgun, quiet);
        assert_eq!(table.stats(WeaponKind::Shotgun).spread, 0.0);
        assert_eq!(
            table.stats(WeaponKind::Rifle),
            WeaponTable::classic().stats(WeaponKind::Rifle)
        );
    }

    #[test]
    fn board_contains_fails_closed() {
        let size = BoardSize::new(6, 6);
        assert!(size.contains(0, 0));
        assert!(size.contains(5, 5));
        assert!(!size.contains(-1, 0));
        assert!(!size.contains(0, 6));
        assert!(!size.contains(i64::MAX, 2));
    }

    #[test]
    fn translate_returns_none_off_board() {
        let size = BoardSize::new(6, 6);
        let cell = CellCoord::new(5, 0);
        assert_eq!(
            size.translate(cell, CellOffset::new(-2, 3)),
            Some(CellCoord::new(3, 3))
        );
        assert_eq!(size.translate(cell, CellOffset::new(1, 0)), None);
        assert_eq!(size.translate(cell, CellOffset::new(0, -1)), None);
    }

    #[test]
    fn cell_containing_floors_negative_coordinates() {
        let size = BoardSize::new(6, 6);
        assert_eq!(
            size.cell_containing(BoardPoint::new(25.0, 0.5), 24.0),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(size.cell_containing(BoardPoint::new(-0.5, 3.0), 24.0), None);
        assert_eq!(size.cell_containing(BoardPoint::new(144.0, 3.0), 24.0), None);
    }

    #[test]
    fn heading_resolves_every_quadrant() {
        let origin = BoardPoint::new(10.0, 10.0);
        assert!((origin.heading_to(BoardPoint::new(20.0, 10.0))).abs() < 1e-6);
        assert!((origin.heading_to(BoardPoint::new(0.0, 10.0)).abs() - PI).abs() < 1e-6);
        assert!((origin.heading_to(BoardPoint::new(10.0, 20.0)) - PI / 2.0).abs() < 1e-6);
        assert!((origin.heading_to(BoardPoint::new(0.0, 0.0)) + 3.0 * PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn press_edge_is_read_and_clear() {
        let mut pointer = PointerInput::new(Some(BoardPoint::new(1.0, 1.0)), true);
        assert!(!pointer.take_press());
        pointer.register_press();
        assert!(pointer.take_press());
        assert!(!pointer.take_press());
    }

    #[test]
    fn occupancy_view_reads_row_major_storage() {
        let size = BoardSize::new(3, 2);
        let mut cells = vec![Occupant::Empty; 6];
        let piece = PieceKind::new(PieceColor::White, PieceRole::Rook);
        cells[5] = Occupant::Piece(piece);
        let view = OccupancyView::new(size, &cells);
        assert_eq!(view.occupant(CellCoord::new(2, 1)), Occupant::Piece(piece));
        assert_eq!(view.occupant_at(2, 2), None);
        assert_eq!(view.iter().filter(|(_, occupant)| !occupant.is_empty()).count(), 1);
    }
}
