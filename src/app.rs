use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use log::info;

use crate::config::Settings;
use crate::game::{Game, TickOutcome};
use crate::input::{Flow, Intent};
use crate::render::Renderer;

/// Runs the game until the player quits: input every frame, a snake move
/// every tick interval, and a redraw every frame. Returns the final score.
pub fn run(settings: &Settings, mut game: Game) -> anyhow::Result<usize> {
    let tick_interval = settings.tick_interval();
    let frame_interval = settings.frame_interval();

    let mut renderer = Renderer::enter()?;
    renderer.draw(&game)?;

    let mut last_tick = Instant::now();
    loop {
        let frame_start = Instant::now();

        // Handle input for the rest of this frame
        while let Some(remaining) = frame_interval.checked_sub(frame_start.elapsed()) {
            if !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if game.apply_intent(Intent::from_key(key)) == Flow::Exit {
                    info!("quit with score {}", game.score());
                    return Ok(game.score());
                }
            }
        }

        if last_tick.elapsed() >= tick_interval {
            match game.tick() {
                TickOutcome::Collided => info!("lost with score {}", game.score()),
                TickOutcome::Won => info!("won with score {}", game.score()),
                TickOutcome::Idle | TickOutcome::Moved | TickOutcome::Ate => {}
            }
            last_tick = Instant::now();
        }

        renderer.draw(&game)?;
        game.end_frame();

        pace(frame_start, frame_interval);
    }
}

fn pace(frame_start: Instant, frame_interval: Duration) {
    if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
        std::thread::sleep(rest);
    }
}
