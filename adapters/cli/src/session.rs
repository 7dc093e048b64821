//! Frame-by-frame driver tying the world, the agents and the presentation together.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chess_with_guns_core::{AgentContext, Command, Event, PlayerAgent, PlayerId, PointerInput};
use chess_with_guns_rendering::{
    palette, AimPreview, Banner, CameraShake, FrameInput, PlayerHud, Scene, ScenePickup,
    ScenePiece, SceneProjectile, SoundCue,
};
use chess_with_guns_system_ai_control::AiControl;
use chess_with_guns_system_analytics::{format_csv, format_plot_csv, MatchStatistics};
use chess_with_guns_system_pointer_control::PointerControl;
use chess_with_guns_system_turns::TurnController;
use chess_with_guns_world::{self as world, query, World};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{MatchSettings, StatsLayout};

/// Frames an elimination banner stays on screen.
const DEATH_BANNER_FRAMES: u32 = 90;
/// Stream separation constants mixed into the match seed.
const AGENT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const SHAKE_STREAM: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Steps executed, in order, on every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FramePhase {
    /// Restart handling and the active agent's decision.
    Input,
    /// Projectile flight and hit resolution.
    Simulate,
    /// Turn advance, statistics and match end.
    Resolve,
    /// Camera shake decay.
    Present,
}

impl FramePhase {
    const ORDER: [FramePhase; 4] = [
        FramePhase::Input,
        FramePhase::Simulate,
        FramePhase::Resolve,
        FramePhase::Present,
    ];
}

/// Lifecycle of the match shown by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionState {
    /// A fresh match is set up on the next frame.
    Setup,
    /// Players take turns.
    Playing,
    /// The match has a winner; the board stays visible until a restart.
    Finished {
        /// Sole surviving player.
        winner: PlayerId,
    },
}

/// A single match and the systems observing it.
struct Match {
    world: World,
    agents: Vec<Box<dyn PlayerAgent>>,
    turns: TurnController,
    statistics: MatchStatistics,
}

impl Match {
    fn start(settings: &MatchSettings, seed: u64) -> Result<Self> {
        let mut config = settings.config.clone();
        config.seed = seed;
        let setups = settings.setups();
        let names = setups.iter().map(|setup| setup.name.clone()).collect();
        let agents = setups
            .iter()
            .enumerate()
            .map(|(index, setup)| -> Box<dyn PlayerAgent> {
                if setup.ai {
                    let stream = seed ^ AGENT_STREAM.wrapping_mul(index as u64 + 1);
                    Box::new(AiControl::new(stream, settings.targeting))
                } else {
                    Box::new(PointerControl::new())
                }
            })
            .collect();
        let world = World::new(config, setups).context("failed to set up the match")?;

        Ok(Self {
            world,
            agents,
            turns: TurnController::new(settings.turn_policy),
            statistics: MatchStatistics::new(names),
        })
    }

    /// Lets the active player's agent act and applies what it chose.
    fn act(&mut self, pointer: &mut PointerInput, events: &mut Vec<Event>) {
        let Some(active) = query::active_player(&self.world) else {
            return;
        };
        let players = query::player_view(&self.world);
        let Some(player) = players.get(active).copied() else {
            return;
        };
        let legal_moves = query::legal_moves(&self.world, active);
        let context = AgentContext {
            player,
            legal_moves: &legal_moves,
            occupancy: query::occupancy_view(&self.world),
            players: players.as_slice(),
            cell_length: query::cell_length(&self.world),
        };

        let mut commands = Vec::new();
        self.agents[active.get() as usize].act(&context, pointer, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Advances the turn when the controller asks for it.
    fn advance_turn(&mut self, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.turns
            .handle(events, query::active_player(&self.world), &mut commands);
        if commands.is_empty() {
            return;
        }

        let mut handover = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut handover);
        }
        // The controller must observe the new turn so its timer restarts.
        self.turns
            .handle(&handover, query::active_player(&self.world), &mut Vec::new());
        events.extend(handover);
    }
}

/// Everything that survives from one frame to the next.
pub(crate) struct Session {
    settings: MatchSettings,
    stats_path: Option<PathBuf>,
    state: SessionState,
    game: Match,
    matches_started: u64,
    shake: CameraShake,
    shake_rng: ChaCha8Rng,
    banner: Option<(Banner, Option<u32>)>,
    sounds: Vec<SoundCue>,
    pointer: PointerInput,
}

impl Session {
    /// Starts the first match.
    pub(crate) fn new(settings: MatchSettings, stats_path: Option<PathBuf>) -> Result<Self> {
        let seed = settings.config.seed;
        let game = Match::start(&settings, seed)?;
        log::info!(
            "{} vs {}",
            describe(&settings.white),
            describe(&settings.black)
        );

        Ok(Self {
            shake_rng: ChaCha8Rng::seed_from_u64(seed ^ SHAKE_STREAM),
            settings,
            stats_path,
            state: SessionState::Playing,
            game,
            matches_started: 1,
            shake: CameraShake::default(),
            banner: None,
            sounds: Vec::new(),
            pointer: PointerInput::default(),
        })
    }

    /// Current lifecycle state.
    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    /// Frames simulated in the current match.
    pub(crate) fn frame(&self) -> u64 {
        query::frame(&self.game.world)
    }

    /// Runs one frame through every [`FramePhase`].
    pub(crate) fn advance(&mut self, input: FrameInput) -> Result<()> {
        self.pointer = input.pointer;
        // Cues live for one frame; headless runs never present them.
        self.sounds.clear();
        let mut events = Vec::new();

        for phase in FramePhase::ORDER {
            match phase {
                FramePhase::Input => {
                    if input.restart_requested && matches!(self.state, SessionState::Finished { .. })
                    {
                        self.state = SessionState::Setup;
                    }
                    if self.state == SessionState::Setup {
                        self.restart()?;
                    }
                    if self.state == SessionState::Playing {
                        let mut pointer = self.pointer;
                        self.game.act(&mut pointer, &mut events);
                        self.pointer = pointer;
                    }
                }
                FramePhase::Simulate => {
                    if self.state == SessionState::Playing {
                        world::apply(&mut self.game.world, Command::Tick, &mut events);
                    }
                }
                FramePhase::Resolve => {
                    if self.state == SessionState::Playing {
                        self.game.advance_turn(&mut events);
                        let players = query::player_view(&self.game.world);
                        self.game.statistics.handle(&events, &players);
                        self.observe(&events)?;
                    }
                }
                FramePhase::Present => {
                    let decay = self.shake_rng.gen_range(0..=1) as f32;
                    self.shake.decay(decay);
                    let expired = match &mut self.banner {
                        Some((_, Some(frames))) => {
                            *frames = frames.saturating_sub(1);
                            *frames == 0
                        }
                        _ => false,
                    };
                    if expired {
                        self.banner = None;
                    }
                }
            }
        }

        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        let seed = self
            .settings
            .config
            .seed
            .wrapping_add(self.matches_started);
        self.game = Match::start(&self.settings, seed)?;
        self.matches_started += 1;
        self.state = SessionState::Playing;
        self.banner = None;
        self.shake = CameraShake::default();
        log::info!("match {} started", self.matches_started);
        Ok(())
    }

    /// Reacts to the frame's events: sounds, shake, banners and match end.
    fn observe(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            if !self.settings.mute {
                self.sounds.extend(SoundCue::from_event(event));
            }
            match *event {
                Event::PieceMoved { player, from, to } => {
                    log::debug!("{} moved {from:?} -> {to:?}", self.name(player));
                }
                Event::PlayerHit {
                    shooter,
                    victim,
                    damage,
                    health,
                } => {
                    self.shake.trigger(damage);
                    log::debug!(
                        "{} hit {} for {damage:.2} ({health:.2} left)",
                        self.name(shooter),
                        self.name(victim)
                    );
                }
                Event::PlayerEliminated { player, .. } => {
                    let message = format!("{} was eliminated", self.name(player));
                    log::info!("{message}");
                    self.banner = Some((Banner::new("Death", message), Some(DEATH_BANNER_FRAMES)));
                }
                Event::MatchWon { winner } => {
                    let message = format!("{} won!", self.name(winner));
                    log::info!("game over: {message}");
                    self.banner = Some((Banner::new("Game Over", message).with_restart(), None));
                    self.state = SessionState::Finished { winner };
                    self.write_statistics()?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Display name of a player in the current match.
    pub(crate) fn name(&self, player: PlayerId) -> &str {
        query::player_name(&self.game.world, player)
    }

    /// Writes the statistics of the current match when a path was configured.
    pub(crate) fn write_statistics(&self) -> Result<()> {
        let Some(path) = &self.stats_path else {
            return Ok(());
        };
        let statistics = &self.game.statistics;
        let contents = match self.settings.stats_layout {
            StatsLayout::Labelled => format_csv(statistics),
            StatsLayout::Plot => {
                let (black, white) = self.settings.black_and_white();
                format_plot_csv(statistics, black, white)
            }
        };
        fs::write(path, contents)
            .with_context(|| format!("failed to write statistics to {}", path.display()))?;
        log::info!(
            "wrote {} turns of statistics to {}",
            self.game.statistics.samples().len(),
            path.display()
        );
        Ok(())
    }

    /// Rebuilds the per-frame channels of `scene` from the current match.
    pub(crate) fn present(&mut self, scene: &mut Scene) {
        scene.clear_frame();
        let world = &self.game.world;
        let cell_length = query::cell_length(world);
        let players = query::player_view(world);
        let active = query::active_player(world);

        for snapshot in players.iter().filter(|snapshot| snapshot.alive) {
            scene.pieces.push(ScenePiece {
                player: snapshot.id,
                piece: snapshot.piece,
                cell: snapshot.cell,
            });
        }
        scene.pickups.extend(
            query::pickups(world)
                .into_iter()
                .map(|pickup| ScenePickup {
                    kind: pickup.kind,
                    cell: pickup.cell,
                }),
        );
        scene.projectiles.extend(query::projectiles(world).into_iter().map(|projectile| {
            SceneProjectile {
                position: Vec2::new(projectile.position.x(), projectile.position.y()),
                boosted: projectile.boosted,
            }
        }));

        if let Some(current) = active.and_then(|id| players.get(id)) {
            if !current.ai {
                let size = query::board_size(world);
                scene.indicators.extend(
                    query::legal_moves(world, current.id)
                        .into_iter()
                        .filter_map(|offset| size.translate(current.cell, offset)),
                );
                let center = current.cell.center(cell_length);
                if let Some(pointer) = self.pointer.position() {
                    scene.aim = Some(AimPreview {
                        weapon: current.weapon,
                        origin: Vec2::new(center.x(), center.y()),
                        heading: center.heading_to(pointer),
                    });
                }
            }
        }

        for snapshot in players.iter() {
            scene.huds.push(PlayerHud {
                name: query::player_name(world, snapshot.id).to_owned(),
                color: palette::side(snapshot.piece.color()),
                health_fraction: if snapshot.max_health > 0.0 {
                    snapshot.health.max(0.0) / snapshot.max_health
                } else {
                    0.0
                },
                ammo: snapshot.ammo,
                capacity: snapshot.capacity,
                weapon: snapshot.weapon,
                alive: snapshot.alive,
                active: Some(snapshot.id) == active,
            });
        }

        scene.turn_timer = self.game.turns.remaining_frames().filter(|_| active.is_some());
        scene.shake = self.shake;
        scene.banner = self.banner.as_ref().map(|(banner, _)| banner.clone());
        scene.sounds.append(&mut self.sounds);
    }
}

fn describe(side: &crate::config::SideSettings) -> String {
    format!(
        "{} {} with {}{}",
        side.name,
        side.role.label(),
        side.weapon.label(),
        if side.ai { " (AI)" } else { "" }
    )
}
