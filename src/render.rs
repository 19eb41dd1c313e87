use std::io::{stdout, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::game::{CheatCodes, Game, Mode};
use crate::grid::{Position, TileType};

const BLOCK: &str = "██";
const BORDER: Color = Color::Rgb { r: 95, g: 74, b: 201 };
const HEAD: Color = Color::Rgb { r: 0, g: 0, b: 255 };
const FOOD: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const CRASH: Color = Color::Rgb { r: 255, g: 0, b: 0 };

/// Owns the terminal while the game runs; dropping it hands the terminal
/// back in its original state.
pub struct Renderer {
    stdout: Stdout,
}

impl Renderer {
    pub fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Renderer { stdout })
    }

    pub fn draw(&mut self, game: &Game) -> std::io::Result<()> {
        let grid = game.grid();
        let snake = game.snake();
        let crashed = game.mode() == Mode::Quit && snake.has_collided(grid);

        for cell in grid.cells() {
            let colour = match cell.tile {
                TileType::Available => None,
                TileType::SnakeHead => Some(HEAD),
                // drawn below, fading along the body
                TileType::SnakeTail => continue,
                TileType::Food => Some(FOOD),
                _ => Some(BORDER),
            };
            self.block(cell.position, colour)?;
        }

        let score = game.score();
        for (index, &segment) in snake.tail().enumerate() {
            let fade = (255 * index / score.max(1)) as u8;
            let colour = if grid.tile_at(segment) == TileType::SnakeTail {
                Color::Rgb { r: fade, g: 255, b: 255 }
            } else {
                CRASH
            };
            self.block(segment, Some(colour))?;
        }

        // the head goes on top, also over the segment a meal leaves under it
        let head = if crashed { CRASH } else { HEAD };
        self.block(snake.head(), Some(head))?;

        self.status(game, grid.rows() as u16)?;
        self.stdout.flush()
    }

    fn block(&mut self, position: Position, colour: Option<Color>) -> std::io::Result<()> {
        queue!(self.stdout, MoveTo(position.x as u16 * 2, position.y as u16))?;
        match colour {
            Some(colour) => queue!(self.stdout, PrintStyledContent(BLOCK.with(colour))),
            None => queue!(self.stdout, Print("  ")),
        }
    }

    fn status(&mut self, game: &Game, top: u16) -> std::io::Result<()> {
        let keys = match game.mode() {
            Mode::Quit | Mode::Win => "Press: (Q)uit | (R)estart",
            _ => "Press: (Q)uit | (R)estart | (P)ause",
        };
        let banner = match game.mode() {
            Mode::Pause => "Game is Paused. Any key to continue",
            Mode::Quit => "You have lost!",
            Mode::Win => "You have won!",
            Mode::Start | Mode::Continue => "",
        };
        let cheats = if game.cheats().contains(CheatCodes::NO_DEATH) {
            " [no-death]"
        } else {
            ""
        };

        let lines = [format!("Score: {}{}", game.score(), cheats), keys.to_string(), banner.to_string()];
        for (offset, line) in (0u16..).zip(lines) {
            queue!(
                self.stdout,
                MoveTo(0, top + offset),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
