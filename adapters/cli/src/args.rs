use std::path::PathBuf;

use anyhow::Result;
use chess_with_guns_core::{PieceRole, WeaponKind};
use chess_with_guns_system_ai_control::TargetingPolicy;
use chess_with_guns_system_turns::TurnPolicy;
use clap::{ArgAction, Parser};

use crate::config::{
    parse_role, parse_stats_layout, parse_targeting, parse_weapon, MatchFile, MatchSettings,
    StatsLayout,
};

/// Command-line arguments accepted by the `chess-with-guns` binary.
#[derive(Debug, Parser)]
#[command(
    name = "chess-with-guns",
    about = "Chess pieces settle their differences with firearms."
)]
pub(crate) struct CliArgs {
    /// TOML match file; flags override its values.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Seed of every random stream in the match.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Piece controlled by White.
    #[arg(long, value_parser = parse_role)]
    pub(crate) white_piece: Option<PieceRole>,
    /// Weapon carried by White.
    #[arg(long, value_parser = parse_weapon)]
    pub(crate) white_weapon: Option<WeaponKind>,
    /// Whether White is computer controlled.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub(crate) white_ai: Option<bool>,
    /// Piece controlled by Black.
    #[arg(long, value_parser = parse_role)]
    pub(crate) black_piece: Option<PieceRole>,
    /// Weapon carried by Black.
    #[arg(long, value_parser = parse_weapon)]
    pub(crate) black_weapon: Option<WeaponKind>,
    /// Whether Black is computer controlled.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub(crate) black_ai: Option<bool>,
    /// Ask for pieces, weapons and controllers on the terminal.
    #[arg(long)]
    pub(crate) interactive: bool,
    /// Give every turn a fixed number of frames instead of ending it on the first action.
    #[arg(long, value_name = "FRAMES")]
    pub(crate) move_timer: Option<u32>,
    /// How the computer picks its target: `random` or `nearest`.
    #[arg(long, value_parser = parse_targeting)]
    pub(crate) targeting: Option<TargetingPolicy>,
    /// Write per-turn statistics to this CSV file when a match ends.
    #[arg(long, value_name = "PATH")]
    pub(crate) stats: Option<PathBuf>,
    /// Statistics columns: `labelled` or the headerless `plot` layout.
    #[arg(long, value_parser = parse_stats_layout)]
    pub(crate) stats_layout: Option<StatsLayout>,
    /// Run without a window; both sides must be computer controlled.
    #[arg(long)]
    pub(crate) headless: bool,
    /// Frame limit for headless matches.
    #[arg(long, default_value_t = 100_000)]
    pub(crate) max_frames: u64,
    /// Sprite manifest; pieces are drawn with shapes when omitted.
    #[arg(long, value_name = "PATH")]
    pub(crate) sprites: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub(crate) vsync: bool,
    /// Print frame timing once per second.
    #[arg(long)]
    pub(crate) show_fps: bool,
    /// Suppress sound cues.
    #[arg(long)]
    pub(crate) mute: bool,
}

impl CliArgs {
    /// Resolves the match settings: defaults, then the match file, then flags.
    pub(crate) fn settings(&self) -> Result<MatchSettings> {
        let mut settings = MatchSettings::default();
        if let Some(path) = &self.config {
            settings.merge_file(MatchFile::load(path)?)?;
        }

        if let Some(seed) = self.seed {
            settings.config.seed = seed;
        }
        if let Some(role) = self.white_piece {
            settings.white.role = role;
        }
        if let Some(weapon) = self.white_weapon {
            settings.white.weapon = weapon;
        }
        if let Some(ai) = self.white_ai {
            settings.white.ai = ai;
        }
        if let Some(role) = self.black_piece {
            settings.black.role = role;
        }
        if let Some(weapon) = self.black_weapon {
            settings.black.weapon = weapon;
        }
        if let Some(ai) = self.black_ai {
            settings.black.ai = ai;
        }
        if let Some(frames) = self.move_timer {
            settings.turn_policy = if frames == 0 {
                TurnPolicy::ActionEndsTurn
            } else {
                TurnPolicy::MoveTimer { frames }
            };
        }
        if let Some(targeting) = self.targeting {
            settings.targeting = targeting;
        }
        if let Some(layout) = self.stats_layout {
            settings.stats_layout = layout;
        }
        settings.mute |= self.mute;

        Ok(settings)
    }
}
