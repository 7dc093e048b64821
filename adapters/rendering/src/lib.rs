#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Chess with Guns adapters.

use anyhow::Result as AnyResult;
use chess_with_guns_core::{
    CellCoord, Event, PickupKind, PieceColor, PieceKind, PieceRole, PlayerId, PointerInput,
    WeaponKind,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// Width of the status sidebar drawn to the right of the board, in pixels.
pub const SIDEBAR_WIDTH: f32 = 192.0;

/// Height of a single player's row in the sidebar.
pub const HUD_ROW_HEIGHT: f32 = 32.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Fixed colors shared by every backend.
pub mod palette {
    use super::Color;
    use chess_with_guns_core::PieceColor;

    /// Frame clear color.
    pub const BACKGROUND: Color = Color::from_rgb_u8(130, 130, 130);
    /// Light board squares.
    pub const LIGHT_SQUARE: Color = Color::from_rgb_u8(238, 238, 210);
    /// Dark board squares.
    pub const DARK_SQUARE: Color = Color::from_rgb_u8(118, 150, 86);
    /// Legal destination markers.
    pub const INDICATOR: Color = Color::new(0.0, 0.9, 0.0, 0.8);
    /// Projectiles fired without a damage boost.
    pub const PROJECTILE: Color = Color::from_rgb_u8(230, 41, 55);
    /// Projectiles fired while boosted.
    pub const BOOSTED_PROJECTILE: Color = Color::from_rgb_u8(0, 121, 241);
    /// Line between the health bars and the ammo pips.
    pub const SEPARATOR: Color = Color::from_rgb_u8(230, 41, 55);
    /// Sidebar background.
    pub const SIDEBAR: Color = Color::from_rgb_u8(40, 40, 40);

    /// Render color associated with a side.
    #[must_use]
    pub const fn side(color: PieceColor) -> Color {
        match color {
            PieceColor::White => Color::from_rgb_u8(245, 245, 245),
            PieceColor::Black => Color::from_rgb_u8(25, 25, 25),
        }
    }
}

/// Whether the frame driver should keep running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FrameControl {
    /// Present the scene and request another frame.
    #[default]
    Continue,
    /// Close the window after this frame.
    Quit,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer state expressed in board pixels.
    pub pointer: PointerInput,
    /// Whether the player asked for a fresh match on this frame.
    pub restart_requested: bool,
}

/// Board geometry and square colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of columns on the board.
    pub columns: u32,
    /// Number of rows on the board.
    pub rows: u32,
    /// Side length of a single cell in pixels.
    pub cell_length: f32,
    /// Color of squares whose column and row sum is even.
    pub light: Color,
    /// Color of the remaining squares.
    pub dark: Color,
}

impl BoardPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_length: f32,
        light: Color,
        dark: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(cell_length.is_finite() && cell_length > 0.0) {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
            light,
            dark,
        })
    }

    /// Total width of the board in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the board in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Width of the window needed to show the board and the sidebar.
    #[must_use]
    pub fn window_width(&self) -> f32 {
        self.width() + SIDEBAR_WIDTH
    }

    /// Top-left corner of a cell in pixels.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
        )
    }

    /// Square color for a cell.
    #[must_use]
    pub fn square_color(&self, cell: CellCoord) -> Color {
        if (cell.column() + cell.row()) % 2 == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

/// Name-addressable asset needed to draw a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKey {
    /// Sprite of a piece.
    Piece(PieceKind),
    /// Sprite of a pickup.
    Pickup(PickupKind),
    /// Sprite of a weapon held over the active piece.
    Weapon(WeaponKind),
}

impl AssetKey {
    /// Every asset a complete catalog provides, in a stable order.
    #[must_use]
    pub fn all() -> Vec<AssetKey> {
        let mut keys = Vec::new();
        for color in [PieceColor::White, PieceColor::Black] {
            for role in PieceRole::ALL {
                keys.push(AssetKey::Piece(PieceKind::new(color, role)));
            }
        }
        for kind in [PickupKind::Ammo, PickupKind::Health, PickupKind::Boost] {
            keys.push(AssetKey::Pickup(kind));
        }
        keys.extend(
            WeaponKind::ALL
                .into_iter()
                .filter(|weapon| *weapon != WeaponKind::None)
                .map(AssetKey::Weapon),
        );
        keys
    }

    /// Name used to refer to the asset in manifests, e.g. `WhitePawn`.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            AssetKey::Piece(piece) => {
                format!("{}{}", piece.color().label(), piece.role().label())
            }
            AssetKey::Pickup(kind) => format!("{}Pickup", pickup_label(kind)),
            AssetKey::Weapon(weapon) => weapon.label().replace(' ', ""),
        }
    }

    /// Looks up the key carrying the provided manifest name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<AssetKey> {
        Self::all().into_iter().find(|key| key.name() == name)
    }
}

fn pickup_label(kind: PickupKind) -> &'static str {
    match kind {
        PickupKind::Ammo => "Ammo",
        PickupKind::Health => "Health",
        PickupKind::Boost => "Boost",
    }
}

/// Capability of resolving assets by key.
///
/// Backends may return `None` for missing assets and fall back to primitives.
pub trait AssetCatalog {
    /// Backend specific asset handle.
    type Asset;

    /// Resolves the asset associated with `key`.
    fn resolve(&self, key: AssetKey) -> Option<&Self::Asset>;
}

/// Sounds requested by the simulation. Playback is fire-and-forget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A new turn began.
    Turn,
    /// A pickup was collected.
    Pickup(PickupKind),
    /// A projectile struck a piece.
    Hit,
    /// A player was eliminated.
    Death,
    /// The match was won.
    Victory,
}

impl SoundCue {
    /// Maps a world event onto the sound that accompanies it, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<SoundCue> {
        match event {
            Event::TurnStarted { .. } => Some(SoundCue::Turn),
            Event::PickupCollected { kind, .. } => Some(SoundCue::Pickup(*kind)),
            Event::PlayerHit { .. } => Some(SoundCue::Hit),
            Event::PlayerEliminated { .. } => Some(SoundCue::Death),
            Event::MatchWon { .. } => Some(SoundCue::Victory),
            _ => None,
        }
    }
}

/// Screen shake applied to draw positions after a hit.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CameraShake {
    intensity: f32,
}

impl CameraShake {
    /// Current maximum offset in pixels.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Restarts the shake at the damage of the latest hit.
    pub fn trigger(&mut self, damage: f32) {
        self.intensity = damage.max(0.0);
    }

    /// Reduces the intensity, never below zero.
    pub fn decay(&mut self, amount: f32) {
        self.intensity = (self.intensity - amount).max(0.0);
    }
}

/// Piece drawn on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePiece {
    /// Owner of the piece.
    pub player: PlayerId,
    /// Kind of the piece, used to pick its sprite.
    pub piece: PieceKind,
    /// Cell the piece stands on.
    pub cell: CellCoord,
}

/// Pickup drawn on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePickup {
    /// Kind of the pickup.
    pub kind: PickupKind,
    /// Cell holding the pickup.
    pub cell: CellCoord,
}

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneProjectile {
    /// Position in board pixels.
    pub position: Vec2,
    /// Whether the owner carried a damage boost.
    pub boosted: bool,
}

/// Weapon drawn over the active piece, rotated toward the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimPreview {
    /// Weapon held by the active player.
    pub weapon: WeaponKind,
    /// Center of the active piece in board pixels.
    pub origin: Vec2,
    /// Direction toward the pointer in radians.
    pub heading: f32,
}

/// Sidebar row describing a single player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerHud {
    /// Display name.
    pub name: String,
    /// Bar color.
    pub color: Color,
    /// Remaining health as a fraction of the maximum.
    pub health_fraction: f32,
    /// Rounds left.
    pub ammo: u32,
    /// Magazine size.
    pub capacity: u32,
    /// Equipped weapon.
    pub weapon: WeaponKind,
    /// Whether the player is still on the board.
    pub alive: bool,
    /// Whether the player holds the turn.
    pub active: bool,
}

/// Notification drawn across the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    /// Headline text.
    pub title: String,
    /// Secondary line.
    pub message: String,
    /// Whether the banner offers to start a fresh match.
    pub offers_restart: bool,
}

impl Banner {
    /// Creates a purely informational banner.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            offers_restart: false,
        }
    }

    /// Marks the banner as the end of a match.
    #[must_use]
    pub fn with_restart(mut self) -> Self {
        self.offers_restart = true;
        self
    }
}

/// Scene description combining the board, its occupants and the sidebar.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board geometry.
    pub board: BoardPresentation,
    /// Pieces currently on the board.
    pub pieces: Vec<ScenePiece>,
    /// Pickups currently on the board.
    pub pickups: Vec<ScenePickup>,
    /// Cells the active human player may move to.
    pub indicators: Vec<CellCoord>,
    /// Projectiles in flight.
    pub projectiles: Vec<SceneProjectile>,
    /// Weapon overlay for the active player.
    pub aim: Option<AimPreview>,
    /// Sidebar rows in turn order.
    pub huds: Vec<PlayerHud>,
    /// Frames left before the move timer passes the turn.
    pub turn_timer: Option<u32>,
    /// Draw offset jitter.
    pub shake: CameraShake,
    /// Notification shown above everything else.
    pub banner: Option<Banner>,
    /// Sounds to play this frame. Backends drain the list.
    pub sounds: Vec<SoundCue>,
}

impl Scene {
    /// Creates an empty scene for the provided board.
    #[must_use]
    pub fn new(board: BoardPresentation) -> Self {
        Self {
            board,
            pieces: Vec::new(),
            pickups: Vec::new(),
            indicators: Vec::new(),
            projectiles: Vec::new(),
            aim: None,
            huds: Vec::new(),
            turn_timer: None,
            shake: CameraShake::default(),
            banner: None,
            sounds: Vec::new(),
        }
    }

    /// Clears every per-frame channel while keeping the board and shake.
    pub fn clear_frame(&mut self) {
        self.pieces.clear();
        self.pickups.clear();
        self.indicators.clear();
        self.projectiles.clear();
        self.aim = None;
        self.huds.clear();
        self.turn_timer = None;
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Chess with Guns scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, the
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered. Returning [`FrameControl::Quit`] closes the window.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive side length.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(f, "cell_length must be positive (received {cell_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardPresentation {
        BoardPresentation::new(
            6,
            6,
            24.0,
            palette::LIGHT_SQUARE,
            palette::DARK_SQUARE,
        )
        .expect("valid board")
    }

    #[test]
    fn board_creation_rejects_non_positive_cell_length() {
        let error = BoardPresentation::new(6, 6, 0.0, palette::LIGHT_SQUARE, palette::DARK_SQUARE)
            .expect_err("zero cell length must be rejected");

        assert_eq!(error, RenderingError::InvalidCellLength { cell_length: 0.0 });
        assert!(BoardPresentation::new(
            6,
            6,
            f32::NAN,
            palette::LIGHT_SQUARE,
            palette::DARK_SQUARE
        )
        .is_err());
    }

    #[test]
    fn board_dimensions_include_the_sidebar() {
        let board = board();

        assert_eq!(board.width(), 144.0);
        assert_eq!(board.height(), 144.0);
        assert_eq!(board.window_width(), 144.0 + SIDEBAR_WIDTH);
        assert_eq!(
            board.cell_origin(CellCoord::new(2, 3)),
            Vec2::new(48.0, 72.0)
        );
    }

    #[test]
    fn squares_alternate() {
        let board = board();

        assert_eq!(board.square_color(CellCoord::new(0, 0)), palette::LIGHT_SQUARE);
        assert_eq!(board.square_color(CellCoord::new(1, 0)), palette::DARK_SQUARE);
        assert_eq!(board.square_color(CellCoord::new(1, 1)), palette::LIGHT_SQUARE);
    }

    #[test]
    fn asset_names_match_manifest_conventions() {
        let pawn = AssetKey::Piece(PieceKind::new(PieceColor::White, PieceRole::Pawn));
        let queen = AssetKey::Piece(PieceKind::new(PieceColor::Black, PieceRole::Queen));

        assert_eq!(pawn.name(), "WhitePawn");
        assert_eq!(queen.name(), "BlackQueen");
        assert_eq!(AssetKey::Pickup(PickupKind::Ammo).name(), "AmmoPickup");
        assert_eq!(AssetKey::Weapon(WeaponKind::AimTest).name(), "AimTest");
        assert_eq!(
            AssetKey::Weapon(WeaponKind::RocketLauncher).name(),
            "RocketLauncher"
        );
    }

    #[test]
    fn every_asset_name_is_unique_and_resolvable() {
        let keys = AssetKey::all();

        assert_eq!(keys.len(), 12 + 3 + 6);
        for key in &keys {
            assert_eq!(AssetKey::from_name(&key.name()), Some(*key));
        }
        assert_eq!(AssetKey::from_name("None"), None);
    }

    #[test]
    fn sound_cues_follow_world_events() {
        let white = PlayerId::new(0);

        assert_eq!(
            SoundCue::from_event(&Event::TurnStarted { player: white }),
            Some(SoundCue::Turn)
        );
        assert_eq!(
            SoundCue::from_event(&Event::PickupCollected {
                player: white,
                kind: PickupKind::Boost,
                cell: CellCoord::new(0, 0),
            }),
            Some(SoundCue::Pickup(PickupKind::Boost))
        );
        assert_eq!(
            SoundCue::from_event(&Event::MatchWon { winner: white }),
            Some(SoundCue::Victory)
        );
        assert_eq!(SoundCue::from_event(&Event::TimeAdvanced { frame: 1 }), None);
    }

    #[test]
    fn camera_shake_decays_to_rest() {
        let mut shake = CameraShake::default();
        shake.trigger(9.0);
        assert_eq!(shake.intensity(), 9.0);

        shake.decay(1.0);
        assert_eq!(shake.intensity(), 8.0);

        shake.decay(20.0);
        assert_eq!(shake.intensity(), 0.0);
    }

    #[test]
    fn clearing_a_frame_keeps_board_and_shake() {
        let mut scene = Scene::new(board());
        scene.shake.trigger(4.0);
        scene.indicators.push(CellCoord::new(1, 1));
        scene.projectiles.push(SceneProjectile {
            position: Vec2::new(12.0, 12.0),
            boosted: false,
        });
        scene.banner = Some(Banner::new("Death", "White Pawn was eliminated"));

        scene.clear_frame();

        assert!(scene.indicators.is_empty());
        assert!(scene.projectiles.is_empty());
        assert_eq!(scene.shake.intensity(), 4.0);
        assert!(scene.banner.is_some());
    }
}
