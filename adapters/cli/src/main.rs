#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Chess with Guns.

mod args;
mod config;
mod dialog;
mod session;

use std::io;

use anyhow::{bail, Result};
use chess_with_guns_core::WELCOME_BANNER;
use chess_with_guns_rendering::{
    palette, BoardPresentation, FrameControl, Presentation, RenderingBackend, Scene,
};
use chess_with_guns_rendering_macroquad::MacroquadBackend;
use clap::Parser;

use crate::{
    args::CliArgs,
    config::MatchSettings,
    dialog::{configure_side, TerminalDialog},
    session::{Session, SessionState},
};

/// Entry point for the Chess with Guns command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let mut settings = args.settings()?;
    if args.interactive {
        let stdin = io::stdin();
        let mut dialog = TerminalDialog::new(stdin.lock(), io::stdout());
        configure_side(&mut dialog, &mut settings.white)?;
        configure_side(&mut dialog, &mut settings.black)?;
    }

    log::info!("{WELCOME_BANNER}");
    if args.headless {
        run_headless(settings, &args)
    } else {
        run_windowed(settings, args)
    }
}

fn run_headless(settings: MatchSettings, args: &CliArgs) -> Result<()> {
    if !settings.all_ai() {
        bail!("headless matches need both sides under AI control");
    }

    let mut session = Session::new(settings, args.stats.clone())?;
    while session.frame() < args.max_frames {
        session.advance(Default::default())?;
        if let SessionState::Finished { winner } = session.state() {
            println!("{} won after {} frames", session.name(winner), session.frame());
            return Ok(());
        }
    }

    log::warn!("no winner after {} frames", args.max_frames);
    session.write_statistics()
}

fn run_windowed(settings: MatchSettings, args: CliArgs) -> Result<()> {
    let board = BoardPresentation::new(
        settings.config.board.columns(),
        settings.config.board.rows(),
        settings.config.cell_length,
        palette::LIGHT_SQUARE,
        palette::DARK_SQUARE,
    )?;
    let mut session = Session::new(settings, args.stats)?;
    let mut scene = Scene::new(board);
    session.present(&mut scene);

    let presentation = Presentation::new("Chess with Guns", palette::BACKGROUND, scene);
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_manifest(args.sprites);

    backend.run(presentation, move |_dt, input, scene| {
        match session.advance(input) {
            Ok(()) => {
                session.present(scene);
                FrameControl::Continue
            }
            Err(error) => {
                log::error!("{error:#}");
                FrameControl::Quit
            }
        }
    })
}
