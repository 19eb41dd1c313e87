use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{GameError, MAX_TILES};

/// Blocky snake in the terminal.
#[derive(Clone, Debug, Parser)]
#[command(name = "blocked-snake", version, about)]
pub struct Settings {
    /// Playfield width in tiles, border excluded.
    #[arg(long, default_value_t = 16)]
    pub width: usize,

    /// Playfield height in tiles, border excluded.
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Milliseconds between two snake moves.
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,

    /// Milliseconds per rendered frame.
    #[arg(long, default_value_t = 10)]
    pub frame_ms: u64,

    /// Seed for food placement; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log output goes while the terminal is taken over.
    #[arg(long, default_value = "snake.log")]
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 16,
            height: 16,
            tick_ms: 100,
            frame_ms: 10,
            seed: None,
            log_file: PathBuf::from("snake.log"),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width == 0 || self.height == 0 || self.width > MAX_TILES || self.height > MAX_TILES {
            return Err(GameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.tick_ms == 0 {
            return Err(GameError::InvalidInterval { name: "tick interval" });
        }
        if self.frame_ms == 0 {
            return Err(GameError::InvalidInterval { name: "frame interval" });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_defaults_match_default() {
        let parsed = Settings::try_parse_from(["blocked-snake"]).unwrap();
        let default = Settings::default();
        assert_eq!(parsed.width, default.width);
        assert_eq!(parsed.height, default.height);
        assert_eq!(parsed.tick_interval(), Duration::from_millis(100));
        assert_eq!(parsed.frame_interval(), Duration::from_millis(10));
        assert_eq!(parsed.seed, None);
        assert_eq!(parsed.log_file, default.log_file);
    }

    #[test]
    fn parses_overrides() {
        let parsed = Settings::try_parse_from([
            "blocked-snake",
            "--width",
            "10",
            "--height",
            "12",
            "--tick-ms",
            "80",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!((parsed.width, parsed.height), (10, 12));
        assert_eq!(parsed.tick_ms, 80);
        assert_eq!(parsed.seed, Some(7));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let settings = Settings {
            width: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(GameError::InvalidDimensions { width: 0, .. })
        ));

        let settings = Settings {
            tick_ms: 0,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(GameError::InvalidInterval { name: "tick interval" })
        );
    }
}
