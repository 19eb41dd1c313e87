//! A blocky snake on a bordered grid, played in the terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod snake;

pub use config::Settings;
pub use error::GameError;
pub use game::{CheatCodes, Game, Mode, TickOutcome};
pub use grid::{Cell, Grid, Position, TileType};
pub use snake::{Movement, Snake};
