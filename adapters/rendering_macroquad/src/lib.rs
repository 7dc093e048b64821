#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Chess with Guns.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default `audio`
//! feature. Sound cues emitted by the scene are reported through `log`
//! instead of being played.
//!
//! The end-of-match banner uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module.

mod sprites;
mod ui;

use self::{
    sprites::{DrawParams, SpriteAtlas},
    ui::{draw_banner_ui, BannerUiContext, BannerUiResult},
};
use anyhow::{Context, Result};
use chess_with_guns_core::{BoardPoint, PickupKind, PointerInput};
use chess_with_guns_rendering::{
    palette, AssetKey, Banner, BoardPresentation, CameraShake, Color, FrameControl, FrameInput,
    PlayerHud, Presentation, RenderingBackend, Scene, ScenePickup, ScenePiece, SceneProjectile,
    AimPreview, HUD_ROW_HEIGHT, SIDEBAR_WIDTH,
};
use glam::Vec2;
use macroquad::{
    color::BLACK,
    input::{
        is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position, KeyCode,
        MouseButton,
    },
    math::Vec2 as MacroquadVec2,
};
use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};

/// Factor applied to the logical board size when opening the window.
const WINDOW_SCALE: f32 = 3.0;
/// Side length of a projectile in board pixels.
const PROJECTILE_SIZE: f32 = 4.0;
/// Side length and spacing of a single ammo pip in board pixels.
const AMMO_PIP_SIZE: f32 = 2.0;
const AMMO_PIP_SPACING: f32 = 4.0;
/// Width of the line separating the board from the sidebar.
const SEPARATOR_WIDTH: f32 = 2.0;

/// Latches restart requests raised by the banner button so they reach the
/// simulation on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RestartLatch {
    latched: bool,
}

impl RestartLatch {
    /// Returns whether a restart was requested and clears the latch so the
    /// request fires only once.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.latched)
    }

    /// Records that the banner button requested a restart this frame.
    pub fn register(&mut self) {
        self.latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` starts a fresh match once the current one is over.
    restart_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            restart_requested: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    sprite_manifest: Option<PathBuf>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Draws pieces, pickups and weapons with the sprites listed in `manifest`.
    ///
    /// Without a manifest every asset is drawn with primitive shapes.
    #[must_use]
    pub fn with_sprite_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.sprite_manifest = manifest;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;
        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = self.render_accum / self.frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (scene.board.window_width() * WINDOW_SCALE).round() as i32,
            window_height: (scene.board.height() * WINDOW_SCALE).round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = match sprite_manifest {
                Some(path) => match SpriteAtlas::from_manifest_path(&path)
                    .with_context(|| format!("failed to initialise sprites from {}", path.display()))
                {
                    Ok(atlas) => {
                        log::info!("loaded {} sprites", atlas.texture_count());
                        Some(atlas)
                    }
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                },
                None => None,
            };
            let _ = atlas_init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut restart_latch = RestartLatch::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics = SceneMetrics::from_board(&scene.board, screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    &metrics,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_down(MouseButton::Left),
                    is_mouse_button_pressed(MouseButton::Left),
                    keyboard.restart_requested || restart_latch.take(),
                );

                let control = update_scene(frame_dt, frame_input, &mut scene);
                for cue in scene.sounds.drain(..) {
                    log::debug!("sound cue {cue:?}");
                }

                let render_start = Instant::now();
                let shake = Shake::new(scene.shake);
                draw_board(&scene.board, &metrics, shake);
                draw_pickups(&scene.pickups, &scene.board, &metrics, shake, sprite_atlas.as_ref());
                draw_indicators(&scene, &metrics, shake);
                draw_pieces(&scene.pieces, &scene.board, &metrics, shake, sprite_atlas.as_ref());
                if let Some(aim) = scene.aim {
                    draw_aim(aim, &scene.board, &metrics, shake, sprite_atlas.as_ref());
                }
                draw_projectiles(&scene.projectiles, &metrics, shake);
                draw_sidebar(&scene, &metrics);

                if let Some(banner) = &scene.banner {
                    if draw_banner(banner, &metrics).restart_pressed {
                        restart_latch.register();
                    }
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(frame_dt, render_duration);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                if control == FrameControl::Quit {
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Uniform scale and offset mapping board pixels onto the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    screen: Vec2,
}

impl SceneMetrics {
    fn from_board(board: &BoardPresentation, screen_width: f32, screen_height: f32) -> Self {
        let world_width = board.window_width();
        let world_height = board.height();
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };
        let offset = Vec2::new(
            ((screen_width - world_width * scale) * 0.5).max(0.0),
            ((screen_height - world_height * scale) * 0.5).max(0.0),
        );

        Self {
            scale,
            offset,
            screen: Vec2::new(screen_width, screen_height),
        }
    }

    fn to_screen(&self, board: Vec2) -> Vec2 {
        self.offset + board * self.scale
    }

    fn to_board(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }

    fn contains_screen(&self, screen: Vec2) -> bool {
        screen.x >= 0.0 && screen.y >= 0.0 && screen.x < self.screen.x && screen.y < self.screen.y
    }

    fn fill_rect(&self, origin: Vec2, size: Vec2, color: Color) {
        let screen = self.to_screen(origin);
        macroquad::shapes::draw_rectangle(
            screen.x,
            screen.y,
            size.x * self.scale,
            size.y * self.scale,
            to_macroquad_color(color),
        );
    }

    fn text(&self, text: &str, baseline: Vec2, size: f32, color: Color) {
        let screen = self.to_screen(baseline);
        let _ = macroquad::text::draw_text(
            text,
            screen.x,
            screen.y,
            size * self.scale,
            to_macroquad_color(color),
        );
    }
}

/// Per-draw jitter derived from the scene's camera shake.
#[derive(Clone, Copy, Debug)]
struct Shake {
    intensity: f32,
}

impl Shake {
    fn new(shake: CameraShake) -> Self {
        Self {
            intensity: shake.intensity(),
        }
    }

    /// Random board-space offset; zero when the camera is at rest.
    fn offset(self) -> Vec2 {
        if self.intensity <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            macroquad::rand::gen_range(-self.intensity, self.intensity),
            macroquad::rand::gen_range(-self.intensity, self.intensity),
        )
    }
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    cursor: Vec2,
    button_down: bool,
    button_pressed: bool,
    restart_requested: bool,
) -> FrameInput {
    let position = if metrics.contains_screen(cursor) && metrics.scale > f32::EPSILON {
        let board = metrics.to_board(cursor);
        Some(BoardPoint::new(board.x, board.y))
    } else {
        None
    };

    let mut pointer = PointerInput::new(position, button_down);
    if button_pressed && position.is_some() {
        pointer.register_press();
    }

    FrameInput {
        pointer,
        restart_requested,
    }
}

fn draw_board(board: &BoardPresentation, metrics: &SceneMetrics, shake: Shake) {
    let cell = Vec2::splat(board.cell_length);
    for row in 0..board.rows {
        for column in 0..board.columns {
            let coord = chess_with_guns_core::CellCoord::new(column, row);
            metrics.fill_rect(
                board.cell_origin(coord) + shake.offset(),
                cell,
                board.square_color(coord),
            );
        }
    }
}

fn draw_indicators(scene: &Scene, metrics: &SceneMetrics, shake: Shake) {
    let size = Vec2::splat(scene.board.cell_length * 0.5);
    for cell in &scene.indicators {
        metrics.fill_rect(
            scene.board.cell_origin(*cell) + shake.offset(),
            size,
            palette::INDICATOR,
        );
    }
}

fn draw_pickups(
    pickups: &[ScenePickup],
    board: &BoardPresentation,
    metrics: &SceneMetrics,
    shake: Shake,
    atlas: Option<&SpriteAtlas>,
) {
    let cell = Vec2::splat(board.cell_length);
    for pickup in pickups {
        let origin = board.cell_origin(pickup.cell) + shake.offset();
        if draw_sprite(atlas, AssetKey::Pickup(pickup.kind), origin, cell, metrics) {
            continue;
        }

        let (fill, letter) = pickup_fallback(pickup.kind);
        let inset = board.cell_length * 0.25;
        metrics.fill_rect(origin + Vec2::splat(inset), cell * 0.5, fill);
        metrics.text(
            letter,
            origin + Vec2::new(inset * 1.4, board.cell_length * 0.68),
            board.cell_length * 0.5,
            Color::from_rgb_u8(0, 0, 0),
        );
    }
}

fn pickup_fallback(kind: PickupKind) -> (Color, &'static str) {
    match kind {
        PickupKind::Ammo => (Color::from_rgb_u8(200, 170, 40), "A"),
        PickupKind::Health => (Color::from_rgb_u8(220, 60, 60), "H"),
        PickupKind::Boost => (Color::from_rgb_u8(60, 110, 230), "B"),
    }
}

fn draw_pieces(
    pieces: &[ScenePiece],
    board: &BoardPresentation,
    metrics: &SceneMetrics,
    shake: Shake,
    atlas: Option<&SpriteAtlas>,
) {
    let cell = Vec2::splat(board.cell_length);
    for piece in pieces {
        let origin = board.cell_origin(piece.cell) + shake.offset();
        if draw_sprite(atlas, AssetKey::Piece(piece.piece), origin, cell, metrics) {
            continue;
        }

        let fill = palette::side(piece.piece.color());
        let center = metrics.to_screen(origin + cell * 0.5);
        let radius = board.cell_length * 0.4 * metrics.scale;
        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(fill));
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, metrics.scale, BLACK);

        let initial = role_initial(piece.piece.role());
        let ink = if fill.red > 0.5 {
            Color::from_rgb_u8(0, 0, 0)
        } else {
            Color::from_rgb_u8(255, 255, 255)
        };
        metrics.text(
            initial,
            origin + Vec2::new(board.cell_length * 0.32, board.cell_length * 0.68),
            board.cell_length * 0.55,
            ink,
        );
    }
}

fn role_initial(role: chess_with_guns_core::PieceRole) -> &'static str {
    use chess_with_guns_core::PieceRole;

    match role {
        PieceRole::Pawn => "P",
        PieceRole::Rook => "R",
        PieceRole::Bishop => "B",
        PieceRole::Knight => "N",
        PieceRole::King => "K",
        PieceRole::Queen => "Q",
    }
}

fn draw_aim(
    aim: AimPreview,
    board: &BoardPresentation,
    metrics: &SceneMetrics,
    shake: Shake,
    atlas: Option<&SpriteAtlas>,
) {
    let origin = aim.origin + shake.offset();
    let size = Vec2::new(board.cell_length, board.cell_length * 0.5);
    if let Some(atlas) = atlas {
        let top_left = metrics.to_screen(origin - Vec2::new(0.0, size.y * 0.5));
        let params = DrawParams::new(top_left, size * metrics.scale)
            .with_pivot(Vec2::new(0.0, 0.5))
            .with_rotation(aim.heading);
        match atlas.draw(AssetKey::Weapon(aim.weapon), params) {
            Ok(()) => return,
            Err(error) => log::warn!("{error:#}"),
        }
    }

    let start = metrics.to_screen(origin);
    let direction = Vec2::new(aim.heading.cos(), aim.heading.sin());
    let end = metrics.to_screen(origin + direction * board.cell_length * 0.75);
    macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, 2.0 * metrics.scale, BLACK);
}

fn draw_projectiles(projectiles: &[SceneProjectile], metrics: &SceneMetrics, shake: Shake) {
    for projectile in projectiles {
        let color = if projectile.boosted {
            palette::BOOSTED_PROJECTILE
        } else {
            palette::PROJECTILE
        };
        metrics.fill_rect(
            projectile.position + shake.offset(),
            Vec2::splat(PROJECTILE_SIZE),
            color,
        );
    }
}

/// Draws the named sprite, returning `false` when the primitive fallback
/// should be used instead.
fn draw_sprite(
    atlas: Option<&SpriteAtlas>,
    key: AssetKey,
    origin: Vec2,
    size: Vec2,
    metrics: &SceneMetrics,
) -> bool {
    let Some(atlas) = atlas else {
        return false;
    };
    let params = DrawParams::new(metrics.to_screen(origin), size * metrics.scale);
    match atlas.draw(key, params) {
        Ok(()) => true,
        Err(error) => {
            log::warn!("{error:#}");
            false
        }
    }
}

fn draw_sidebar(scene: &Scene, metrics: &SceneMetrics) {
    let board = &scene.board;
    let left = board.width();
    metrics.fill_rect(
        Vec2::new(left, 0.0),
        Vec2::new(SIDEBAR_WIDTH, board.height()),
        palette::SIDEBAR,
    );

    for (index, hud) in scene.huds.iter().enumerate() {
        let top = index as f32 * HUD_ROW_HEIGHT;
        let color = hud_color(hud);
        metrics.fill_rect(
            Vec2::new(left, top),
            Vec2::new(health_bar_width(hud), HUD_ROW_HEIGHT),
            color,
        );
        let label = if hud.active {
            format!("> {} ({})", hud.name, hud.weapon.label())
        } else {
            format!("{} ({})", hud.name, hud.weapon.label())
        };
        metrics.text(
            &label,
            Vec2::new(left + 6.0, top + HUD_ROW_HEIGHT * 0.6),
            10.0,
            palette::BACKGROUND,
        );

        for pip in ammo_pips(hud.ammo, index, left, board.height()) {
            metrics.fill_rect(pip, Vec2::splat(AMMO_PIP_SIZE), color);
        }
    }

    if let Some(frames) = scene.turn_timer {
        metrics.text(
            &format!("{frames}"),
            Vec2::new(left + SIDEBAR_WIDTH - 28.0, board.height() * 0.5),
            12.0,
            Color::from_rgb_u8(255, 255, 255),
        );
    }

    metrics.fill_rect(
        Vec2::new(left, 0.0),
        Vec2::new(SEPARATOR_WIDTH, board.height()),
        palette::SEPARATOR,
    );
}

fn hud_color(hud: &PlayerHud) -> Color {
    if hud.alive {
        hud.color
    } else {
        hud.color.with_alpha(0.35)
    }
}

fn health_bar_width(hud: &PlayerHud) -> f32 {
    SIDEBAR_WIDTH * hud.health_fraction.clamp(0.0, 1.0)
}

/// Top-left corners of the ammo pips for the player in sidebar row `index`.
///
/// Pips fill the row from the bottom of the sidebar and wrap once the
/// sidebar width is used up.
fn ammo_pips(ammo: u32, index: usize, left: f32, height: f32) -> Vec<Vec2> {
    let per_row = (SIDEBAR_WIDTH / AMMO_PIP_SPACING) as u32;
    let band_top = height - (index as f32 + 1.0) * HUD_ROW_HEIGHT;
    (0..ammo)
        .map(|pip| {
            let column = (pip % per_row) as f32;
            let row = (pip / per_row) as f32;
            Vec2::new(
                left + AMMO_PIP_SPACING * column + 1.0,
                band_top + AMMO_PIP_SPACING * row + 1.0,
            )
        })
        .collect()
}

fn draw_banner(banner: &Banner, metrics: &SceneMetrics) -> BannerUiResult {
    let size = Vec2::new(metrics.screen.x * 0.5, metrics.screen.y * 0.4);
    let origin = (metrics.screen - size) * 0.5;
    let background = macroquad::color::Color::new(0.0, 0.0, 0.0, 0.75);

    if banner.offers_restart {
        let mut root = macroquad::ui::root_ui();
        return draw_banner_ui(
            &mut root,
            BannerUiContext {
                origin: MacroquadVec2::new(origin.x, origin.y),
                size: MacroquadVec2::new(size.x, size.y),
                background,
                title: &banner.title,
                message: &banner.message,
            },
        );
    }

    macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, background);
    let _ = macroquad::text::draw_text(
        &banner.title,
        origin.x + 16.0,
        origin.y + 40.0,
        32.0,
        macroquad::color::WHITE,
    );
    let _ = macroquad::text::draw_text(
        &banner.message,
        origin.x + 16.0,
        origin.y + 72.0,
        20.0,
        macroquad::color::WHITE,
    );
    BannerUiResult::default()
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
