use thiserror::Error;

/// Largest playfield edge, in interior tiles.
pub const MAX_TILES: usize = 36;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("playfield must be between 1x1 and {max}x{max} tiles, got {width}x{height}", max = MAX_TILES)]
    InvalidDimensions { width: usize, height: usize },

    #[error("{name} must be at least 1ms")]
    InvalidInterval { name: &'static str },
}
