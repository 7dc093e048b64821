//! Match settings assembled from defaults, an optional TOML file and flags.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use chess_with_guns_core::{
    BoardSize, CellCoord, PieceColor, PieceKind, PieceRole, PlayerId, WeaponKind, WeaponStats,
};
use chess_with_guns_system_ai_control::TargetingPolicy;
use chess_with_guns_system_turns::TurnPolicy;
use chess_with_guns_world::{MatchConfig, PlayerSetup};
use serde::Deserialize;

/// Choices made for one side of the board.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SideSettings {
    pub(crate) name: String,
    pub(crate) color: PieceColor,
    pub(crate) role: PieceRole,
    pub(crate) weapon: WeaponKind,
    pub(crate) ai: bool,
}

impl SideSettings {
    fn new(color: PieceColor, ai: bool) -> Self {
        Self {
            name: color.label().to_owned(),
            color,
            role: PieceRole::Queen,
            weapon: WeaponKind::Pistol,
            ai,
        }
    }
}

/// Column layout of the exported statistics file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StatsLayout {
    /// Header row, a turn column and one column pair per named player.
    #[default]
    Labelled,
    /// Headerless black/white columns read by the plotting script.
    Plot,
}

/// Everything needed to start, run and restart matches.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MatchSettings {
    pub(crate) config: MatchConfig,
    pub(crate) white: SideSettings,
    pub(crate) black: SideSettings,
    pub(crate) turn_policy: TurnPolicy,
    pub(crate) targeting: TargetingPolicy,
    pub(crate) mute: bool,
    pub(crate) stats_layout: StatsLayout,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            config: MatchConfig::default(),
            white: SideSettings::new(PieceColor::White, false),
            black: SideSettings::new(PieceColor::Black, true),
            turn_policy: TurnPolicy::ActionEndsTurn,
            targeting: TargetingPolicy::RandomOpponent,
            mute: false,
            stats_layout: StatsLayout::Labelled,
        }
    }
}

impl MatchSettings {
    /// Player setups in turn order: White starts in the bottom-right corner,
    /// Black in the top-left one.
    pub(crate) fn setups(&self) -> Vec<PlayerSetup> {
        let board = self.config.board;
        let far_corner = CellCoord::new(
            board.columns().saturating_sub(1),
            board.rows().saturating_sub(1),
        );
        [(&self.white, far_corner), (&self.black, CellCoord::new(0, 0))]
            .into_iter()
            .map(|(side, start)| {
                PlayerSetup::new(
                    side.name.clone(),
                    PieceKind::new(side.color, side.role),
                    side.weapon,
                    start,
                )
                .with_ai(side.ai)
            })
            .collect()
    }

    /// Identifiers of the black and white players, in that order.
    pub(crate) fn black_and_white(&self) -> (PlayerId, PlayerId) {
        (PlayerId::new(1), PlayerId::new(0))
    }

    /// Whether every side is computer controlled.
    pub(crate) fn all_ai(&self) -> bool {
        self.white.ai && self.black.ai
    }

    /// Overlays the values present in a parsed match file.
    pub(crate) fn merge_file(&mut self, file: MatchFile) -> Result<()> {
        if let Some(seed) = file.seed {
            self.config.seed = seed;
        }
        if let Some(board) = file.board {
            let columns = board.columns.unwrap_or(self.config.board.columns());
            let rows = board.rows.unwrap_or(self.config.board.rows());
            self.config.board = BoardSize::new(columns, rows);
            if let Some(cell_length) = board.cell_length {
                self.config.cell_length = cell_length;
            }
        }
        if let Some(pickups) = file.pickups {
            self.config.pickups = pickups;
        }
        if let Some(max_health) = file.max_health {
            self.config.max_health = max_health;
        }
        if let Some(frames) = file.move_timer {
            self.turn_policy = TurnPolicy::MoveTimer { frames };
        }
        if let Some(targeting) = file.targeting {
            self.targeting = targeting;
        }
        if let Some(mute) = file.mute {
            self.mute = mute;
        }
        if let Some(layout) = file.stats_layout {
            self.stats_layout = layout;
        }
        if let Some(side) = file.white {
            side.apply_to(&mut self.white);
        }
        if let Some(side) = file.black {
            side.apply_to(&mut self.black);
        }
        for (name, stats) in file.weapons {
            let weapon = parse_weapon(&name).map_err(anyhow::Error::msg)?;
            let base = self.config.weapons.stats(weapon);
            let stats = stats.resolve(base);
            self.config.weapons = self.config.weapons.clone().with_stats(weapon, stats);
        }
        if self.config.board.columns() == 0 || self.config.board.rows() == 0 {
            bail!("board must have at least one row and one column");
        }
        Ok(())
    }
}

/// On-disk layout of a match file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct MatchFile {
    seed: Option<u64>,
    board: Option<BoardSection>,
    pickups: Option<usize>,
    max_health: Option<f32>,
    move_timer: Option<u32>,
    targeting: Option<TargetingPolicy>,
    mute: Option<bool>,
    stats_layout: Option<StatsLayout>,
    white: Option<SideSection>,
    black: Option<SideSection>,
    #[serde(default)]
    weapons: BTreeMap<String, WeaponSection>,
}

impl MatchFile {
    /// Reads and parses a match file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read match file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse match file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct BoardSection {
    columns: Option<u32>,
    rows: Option<u32>,
    cell_length: Option<f32>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct SideSection {
    name: Option<String>,
    piece: Option<PieceRole>,
    weapon: Option<WeaponKind>,
    ai: Option<bool>,
}

impl SideSection {
    fn apply_to(self, side: &mut SideSettings) {
        if let Some(name) = self.name {
            side.name = name;
        }
        if let Some(role) = self.piece {
            side.role = role;
        }
        if let Some(weapon) = self.weapon {
            side.weapon = weapon;
        }
        if let Some(ai) = self.ai {
            side.ai = ai;
        }
    }
}

/// Partial weapon override; missing values keep the classic balance.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct WeaponSection {
    damage: Option<f32>,
    spread_degrees: Option<f32>,
    variance: Option<f32>,
    pellets: Option<u32>,
    capacity: Option<u32>,
}

impl WeaponSection {
    fn resolve(self, base: WeaponStats) -> WeaponStats {
        WeaponStats {
            damage: self.damage.unwrap_or(base.damage),
            spread: self
                .spread_degrees
                .map_or(base.spread, f32::to_radians),
            variance: self.variance.unwrap_or(base.variance),
            pellets: self.pellets.unwrap_or(base.pellets),
            capacity: self.capacity.unwrap_or(base.capacity),
        }
    }
}

/// Parses a piece role from its lowercase name.
pub(crate) fn parse_role(name: &str) -> Result<PieceRole, String> {
    PieceRole::ALL
        .into_iter()
        .find(|role| role.label().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown piece `{name}`"))
}

/// Parses a weapon from its snake_case or display name.
pub(crate) fn parse_weapon(name: &str) -> Result<WeaponKind, String> {
    let wanted: String = name
        .chars()
        .filter(|character| character.is_ascii_alphanumeric())
        .collect();
    WeaponKind::ALL
        .into_iter()
        .find(|weapon| {
            let label: String = weapon.label().chars().filter(|c| *c != ' ').collect();
            label.eq_ignore_ascii_case(&wanted)
        })
        .ok_or_else(|| format!("unknown weapon `{name}`"))
}

/// Parses an AI targeting policy.
pub(crate) fn parse_targeting(name: &str) -> Result<TargetingPolicy, String> {
    match name {
        "random" | "random_opponent" => Ok(TargetingPolicy::RandomOpponent),
        "nearest" => Ok(TargetingPolicy::Nearest),
        _ => Err(format!("unknown targeting policy `{name}`")),
    }
}

/// Parses a statistics layout.
pub(crate) fn parse_stats_layout(name: &str) -> Result<StatsLayout, String> {
    match name {
        "labelled" => Ok(StatsLayout::Labelled),
        "plot" => Ok(StatsLayout::Plot),
        _ => Err(format!("unknown statistics layout `{name}`")),
    }
}
