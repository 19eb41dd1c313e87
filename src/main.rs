use std::fs::File;

use anyhow::Context;
use blocked_snake::{app, Game, Settings};
use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    settings.validate().context("invalid settings")?;

    // The terminal belongs to the game, so logs go to a file
    let log_file = File::create(&settings.log_file)
        .with_context(|| format!("cannot create log file {}", settings.log_file.display()))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file)
        .context("failed to initialize logger")?;

    info!("starting on a {}x{} board", settings.width, settings.height);
    let game = Game::new(&settings)?;
    let score = app::run(&settings, game)?;

    println!("Game Over! Final score: {}", score);
    Ok(())
}
