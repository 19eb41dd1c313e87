use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{CheatCodes, Game};
use crate::snake::Movement;

/// What a key press asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Quit,
    Restart,
    Pause,
    Move(Movement),
    ToggleNoDeath,
    Other,
}

/// Whether the frame loop keeps going after an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl Intent {
    /// Arrow keys and vi keys steer; letters are case-insensitive.
    pub fn from_key(key: KeyEvent) -> Intent {
        if key.kind == KeyEventKind::Release {
            return Intent::Other;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Intent::Quit;
        }

        match key.code {
            KeyCode::Left => Intent::Move(Movement::Left),
            KeyCode::Up => Intent::Move(Movement::Up),
            KeyCode::Right => Intent::Move(Movement::Right),
            KeyCode::Down => Intent::Move(Movement::Down),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => Intent::Quit,
                'r' => Intent::Restart,
                'p' => Intent::Pause,
                'h' => Intent::Move(Movement::Left),
                'k' => Intent::Move(Movement::Up),
                'l' => Intent::Move(Movement::Right),
                'j' => Intent::Move(Movement::Down),
                'd' => Intent::ToggleNoDeath,
                _ => Intent::Other,
            },
            _ => Intent::Other,
        }
    }
}

impl Game {
    pub fn apply_intent(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::Quit => {
                self.quit();
                return Flow::Exit;
            }
            Intent::Restart => self.restart(),
            Intent::Pause => self.pause(),
            // any other key leaves `Start` or `Pause`
            Intent::Move(movement) => {
                if self.resume() {
                    let _ = self.set_movement(movement);
                }
            }
            Intent::ToggleNoDeath => {
                if self.resume() {
                    self.toggle_cheat(CheatCodes::NO_DEATH);
                }
            }
            Intent::Other => {
                let _ = self.resume();
            }
        }
        Flow::Continue
    }
}
