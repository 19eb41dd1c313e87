use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::config::Settings;
use crate::error::GameError;
use crate::grid::{Grid, Position};
use crate::snake::{Movement, Snake};

/// Where the first piece of food of every round lands.
const DEFAULT_FOOD: Position = Position::new(10, 10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Fresh round, waiting for the first key.
    Start,
    Continue,
    Pause,
    /// The snake covers the whole board.
    Win,
    /// Lost, or quitting.
    Quit,
}

/// Cheat toggles, as bit flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheatCodes(u8);

impl CheatCodes {
    pub const NONE: CheatCodes = CheatCodes(0);
    /// Collisions no longer end the round.
    pub const NO_DEATH: CheatCodes = CheatCodes(1);

    pub fn contains(self, other: CheatCodes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn toggle(&mut self, other: CheatCodes) {
        self.0 ^= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// What a single movement tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Moved,
    Collided,
    Ate,
    Won,
}

pub struct Game {
    grid: Grid,
    snake: Snake,
    food: Option<Position>,
    mode: Mode,
    movement: Movement,
    /// Direction of the last move actually made.
    heading: Movement,
    movement_latched: bool,
    cheats: CheatCodes,
    rng: StdRng,
}

impl Game {
    pub fn new(settings: &Settings) -> Result<Self, GameError> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Game::with_rng(settings, rng)
    }

    pub fn with_rng(settings: &Settings, rng: StdRng) -> Result<Self, GameError> {
        settings.validate()?;
        let grid = Grid::new(settings.width, settings.height)?;
        Ok(Game::fresh(grid, rng))
    }

    fn fresh(mut grid: Grid, rng: StdRng) -> Self {
        let (snake, food, mode) = Game::opening(&mut grid);
        Game {
            grid,
            snake,
            food,
            mode,
            movement: Movement::Nothing,
            heading: Movement::Nothing,
            movement_latched: false,
            cheats: CheatCodes::NONE,
            rng,
        }
    }

    /// A length 1 snake in the middle and the food on its fixed spot,
    /// stamped onto `grid`.
    fn opening(grid: &mut Grid) -> (Snake, Option<Position>, Mode) {
        let head = Position::new((grid.width() + 1) / 2, (grid.height() + 1) / 2);
        let snake = Snake::new(head);

        let food = Position::new(
            DEFAULT_FOOD.x.min(grid.width()),
            DEFAULT_FOOD.y.min(grid.height()),
        );
        // only a 1x1 board puts the food under the head: nothing left to win
        let (food, mode) = if food == head {
            (None, Mode::Win)
        } else {
            (Some(food), Mode::Start)
        };
        grid.compute_occupancy(&snake, food);
        (snake, food, mode)
    }

    /// Throws the whole round away and starts over on an empty board. The
    /// random generator carries on.
    pub fn restart(&mut self) {
        let (snake, food, mode) = Game::opening(&mut self.grid);
        self.snake = snake;
        self.food = food;
        self.mode = mode;
        self.movement = Movement::Nothing;
        self.heading = Movement::Nothing;
        self.movement_latched = false;
        self.cheats = CheatCodes::NONE;
        info!("restarted on a {}x{} board", self.grid.width(), self.grid.height());
    }

    /// One movement step: move, re-stamp the board, then check for a crash
    /// and for food, in that order.
    pub fn tick(&mut self) -> TickOutcome {
        if matches!(self.mode, Mode::Quit | Mode::Win) {
            return TickOutcome::Idle;
        }

        let movement = self.movement;
        let moved = movement != Movement::Nothing;
        if !self.snake.advance(movement, &self.grid) {
            warn!("refused to move {:?} off the board from {:?}", movement, self.snake.head());
        } else if moved {
            self.heading = movement;
        }
        self.grid.compute_occupancy(&self.snake, self.food);

        if self.snake.has_collided(&self.grid) {
            if self.cheats.contains(CheatCodes::NO_DEATH) {
                debug!("ignoring collision at {:?}", self.snake.head());
            } else {
                info!("collided at {:?} with score {}", self.snake.head(), self.score());
                self.mode = Mode::Quit;
                self.movement = Movement::Nothing;
                return TickOutcome::Collided;
            }
        }

        if self.consume_food() {
            return match self.mode {
                Mode::Win => TickOutcome::Won,
                _ => TickOutcome::Ate,
            };
        }

        if moved {
            TickOutcome::Moved
        } else {
            TickOutcome::Idle
        }
    }

    /// Grows the snake if its head is on the food and moves the food to a
    /// random free tile. With no free tile left the round is won.
    pub fn consume_food(&mut self) -> bool {
        let Some(food) = self.food else {
            return false;
        };
        if !self.snake.eat(food) {
            return false;
        }

        self.grid.compute_occupancy(&self.snake, None);
        self.food = self.grid.available_tiles().choose(&mut self.rng);
        match self.food {
            Some(next) => debug!("food eaten at {:?}, next at {:?}", food, next),
            None => {
                info!("board filled with score {}", self.score());
                self.mode = Mode::Win;
                self.movement = Movement::Nothing;
            }
        }
        self.grid.compute_occupancy(&self.snake, self.food);
        true
    }

    /// Commits a new direction unless it reverses the committed direction or
    /// the last move, nothing changes, or a change is already pending for
    /// this frame.
    pub fn set_movement(&mut self, movement: Movement) -> bool {
        if self.movement_latched || movement == Movement::Nothing || movement == self.movement {
            return false;
        }

        // the snake has not necessarily moved since the last accepted turn
        if movement == self.movement.opposite() || movement == self.heading.opposite() {
            return false;
        }

        debug!("movement {:?} -> {:?}", self.movement, movement);
        self.movement = movement;
        self.movement_latched = true;
        true
    }

    /// Releases the one-change-per-frame input latch.
    pub fn end_frame(&mut self) {
        self.movement_latched = false;
    }

    pub fn pause(&mut self) {
        if matches!(self.mode, Mode::Start | Mode::Continue) {
            self.movement = Movement::Nothing;
            self.mode = Mode::Pause;
        }
    }

    /// Leaves `Start` or `Pause`. Returns whether the game accepts play input.
    pub fn resume(&mut self) -> bool {
        match self.mode {
            Mode::Start | Mode::Continue | Mode::Pause => {
                self.mode = Mode::Continue;
                true
            }
            Mode::Win | Mode::Quit => false,
        }
    }

    pub fn quit(&mut self) {
        self.mode = Mode::Quit;
        self.movement = Movement::Nothing;
    }

    pub fn toggle_cheat(&mut self, cheat: CheatCodes) {
        self.cheats.toggle(cheat);
        info!("cheats now {:?}", self.cheats);
    }

    /// Puts the food somewhere specific and re-stamps the board.
    pub fn place_food(&mut self, position: Position) {
        assert!(
            self.grid.is_interior(position),
            "food must sit inside the border"
        );
        self.food = Some(position);
        self.grid.compute_occupancy(&self.snake, self.food);
    }

    pub fn score(&self) -> usize {
        self.snake.len() - 1
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn cheats(&self) -> CheatCodes {
        self.cheats
    }

    pub fn top_left_corner(&self) -> Position {
        self.grid.corners()[0]
    }

    pub fn top_right_corner(&self) -> Position {
        self.grid.corners()[1]
    }

    pub fn bottom_left_corner(&self) -> Position {
        self.grid.corners()[2]
    }

    pub fn bottom_right_corner(&self) -> Position {
        self.grid.corners()[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileType;
    use proptest::prelude::*;

    fn new_game(width: usize, height: usize) -> Game {
        let settings = Settings {
            width,
            height,
            ..Settings::default()
        };
        Game::with_rng(&settings, StdRng::seed_from_u64(42)).unwrap()
    }

    /// Commits a direction and runs one tick, as the frame loop would.
    fn step(game: &mut Game, movement: Movement) -> TickOutcome {
        let _ = game.set_movement(movement);
        game.end_frame();
        game.tick()
    }

    #[test]
    fn starts_centred_with_default_food() {
        let game = new_game(10, 10);
        assert_eq!(game.mode(), Mode::Start);
        assert_eq!(game.movement(), Movement::Nothing);
        assert_eq!(game.snake().head(), Position::new(5, 5));
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.food(), Some(Position::new(10, 10)));
        assert_eq!(game.grid().tile_at(Position::new(10, 10)), TileType::Food);
        assert_eq!(game.grid().tile_at(Position::new(5, 5)), TileType::SnakeHead);
        assert_eq!(game.bottom_right_corner(), Position::new(11, 11));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings {
            height: 0,
            ..Settings::default()
        };
        assert!(Game::new(&settings).is_err());
    }

    #[test]
    fn default_food_is_clamped_to_small_boards() {
        let game = new_game(4, 6);
        assert_eq!(game.food(), Some(Position::new(4, 6)));

        let game = new_game(1, 1);
        assert_eq!(game.food(), None);
        assert_eq!(game.mode(), Mode::Win);
    }

    #[test]
    fn move_then_eat_grows_in_place() {
        let mut game = new_game(10, 10);
        let start = game.snake().head();

        assert_eq!(step(&mut game, Movement::Right), TickOutcome::Moved);
        let head = game.snake().head();
        assert_eq!(head, Position::new(start.x + 1, start.y));
        assert_eq!(game.snake().len(), 1);

        game.place_food(head);
        assert!(game.consume_food());
        assert_eq!(game.snake().len(), 2);
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.grid().tile_at(head), TileType::SnakeTail);
        assert_eq!(game.score(), 1);

        let food = game.food().unwrap();
        assert_ne!(food, head);
        assert_eq!(game.grid().tile_at(food), TileType::Food);
    }

    #[test]
    fn eating_twice_in_one_tick_grows_once() {
        let mut game = new_game(10, 10);
        let _ = step(&mut game, Movement::Right);
        game.place_food(game.snake().head());

        assert!(game.consume_food());
        assert!(!game.consume_food());
        assert_eq!(game.snake().len(), 2);
    }

    #[test]
    fn tick_eats_food_in_the_way() {
        let mut game = new_game(10, 10);
        game.place_food(Position::new(6, 5));
        assert_eq!(step(&mut game, Movement::Right), TickOutcome::Ate);
        assert_eq!(game.snake().len(), 2);
        game.place_food(Position::new(1, 1));
        assert_eq!(step(&mut game, Movement::Right), TickOutcome::Moved);
        assert_eq!(game.grid().tile_at(Position::new(7, 5)), TileType::SnakeHead);
        assert_eq!(game.grid().tile_at(Position::new(6, 5)), TileType::SnakeTail);
    }

    #[test]
    fn reversal_is_rejected() {
        let mut game = new_game(10, 10);
        assert!(game.set_movement(Movement::Right));
        game.end_frame();
        assert!(!game.set_movement(Movement::Left));
        assert_eq!(game.movement(), Movement::Right);

        assert!(game.set_movement(Movement::Up));
        game.end_frame();
        assert!(!game.set_movement(Movement::Down));
        assert_eq!(game.movement(), Movement::Up);
    }

    #[test]
    fn double_tap_within_a_tick_cannot_reverse() {
        let mut game = new_game(10, 10);
        game.place_food(Position::new(6, 5));
        assert_eq!(step(&mut game, Movement::Right), TickOutcome::Ate);
        game.place_food(Position::new(1, 1));
        assert_eq!(step(&mut game, Movement::Right), TickOutcome::Moved);
        let head = game.snake().head();

        assert!(game.set_movement(Movement::Up));
        game.end_frame();
        assert!(!game.set_movement(Movement::Left));
        assert_eq!(game.movement(), Movement::Up);

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(game.snake().head(), Position::new(head.x, head.y - 1));
        assert_eq!(game.mode(), Mode::Start);
    }

    #[test]
    fn pausing_after_a_meal_is_safe() {
        let mut game = new_game(10, 10);
        assert!(game.resume());
        game.place_food(Position::new(6, 5));
        assert_eq!(step(&mut game, Movement::Right), TickOutcome::Ate);
        assert!(!game.snake().has_collided(game.grid()));

        game.pause();
        assert_eq!(game.tick(), TickOutcome::Idle);
        assert_eq!(game.mode(), Mode::Pause);
        assert_eq!(game.snake().len(), 2);
    }

    #[test]
    fn one_change_per_frame() {
        let mut game = new_game(10, 10);
        assert!(game.set_movement(Movement::Up));
        assert!(!game.set_movement(Movement::Left));
        assert_eq!(game.movement(), Movement::Up);
        game.end_frame();
        assert!(game.set_movement(Movement::Left));
    }

    #[test]
    fn pause_keeps_the_heading() {
        let mut game = new_game(10, 10);
        assert!(game.resume());
        let _ = step(&mut game, Movement::Right);

        game.pause();
        assert_eq!(game.mode(), Mode::Pause);
        assert_eq!(game.movement(), Movement::Nothing);
        let head = game.snake().head();
        assert_eq!(game.tick(), TickOutcome::Idle);
        assert_eq!(game.snake().head(), head);

        assert!(game.resume());
        assert!(!game.set_movement(Movement::Left));
        assert!(game.set_movement(Movement::Down));
        assert_eq!(game.mode(), Mode::Continue);
    }

    #[test]
    fn hitting_the_border_ends_the_round() {
        let mut game = new_game(10, 10);
        let _ = game.set_movement(Movement::Right);
        for _ in 0..5 {
            game.end_frame();
            assert_eq!(game.tick(), TickOutcome::Moved);
        }
        assert_eq!(game.snake().head(), Position::new(10, 5));

        assert_eq!(game.tick(), TickOutcome::Collided);
        assert_eq!(game.grid().tile_at(game.snake().head()), TileType::RightBorder);
        assert_eq!(game.mode(), Mode::Quit);
        assert_eq!(game.movement(), Movement::Nothing);
        assert_eq!(game.tick(), TickOutcome::Idle);
    }

    #[test]
    fn no_death_survives_the_border() {
        let mut game = new_game(3, 3);
        game.toggle_cheat(CheatCodes::NO_DEATH);
        assert!(game.cheats().contains(CheatCodes::NO_DEATH));
        let _ = step(&mut game, Movement::Left);
        let _ = game.tick();
        assert_eq!(game.snake().head(), Position::new(0, 2));
        assert_eq!(game.mode(), Mode::Start);

        // pressed against the frame, the snake stays put
        let _ = game.tick();
        assert_eq!(game.snake().head(), Position::new(0, 2));

        game.toggle_cheat(CheatCodes::NO_DEATH);
        assert!(game.cheats().is_empty());
    }

    #[test]
    fn restart_after_losing_is_a_clean_board() {
        let mut game = new_game(10, 10);
        game.place_food(Position::new(6, 5));
        let _ = step(&mut game, Movement::Right);
        let _ = step(&mut game, Movement::Right);
        let _ = game.set_movement(Movement::Right);
        while game.mode() != Mode::Quit {
            assert_ne!(game.tick(), TickOutcome::Won);
        }
        let tail: Vec<_> = game.snake().tail().copied().collect();
        assert!(!tail.is_empty());

        game.restart();
        assert_eq!(game.mode(), Mode::Start);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.food(), Some(Position::new(10, 10)));
        assert!(game.cheats().is_empty());
        for position in tail {
            if position != game.snake().head() {
                assert_eq!(game.grid().tile_at(position), TileType::Available);
            }
        }
    }

    #[test]
    fn filling_the_board_wins() {
        let mut game = new_game(2, 1);
        let mut snake = Snake::new(Position::new(1, 1));
        assert!(snake.eat(Position::new(1, 1)));
        assert!(snake.advance(Movement::Right, &game.grid));
        game.snake = snake;
        game.place_food(Position::new(2, 1));

        assert_eq!(game.tick(), TickOutcome::Won);
        assert_eq!(game.mode(), Mode::Win);
        assert_eq!(game.food(), None);
        assert_eq!(game.grid().available_tiles().count(), 0);
        assert_eq!(game.tick(), TickOutcome::Idle);
    }

    #[derive(Clone, Copy, Debug)]
    enum Input {
        Turn(Movement),
        EndFrame,
        Tick,
    }

    fn any_input() -> impl Strategy<Value = Input> {
        prop_oneof![
            Just(Input::Turn(Movement::Left)),
            Just(Input::Turn(Movement::Up)),
            Just(Input::Turn(Movement::Right)),
            Just(Input::Turn(Movement::Down)),
            Just(Input::EndFrame),
            Just(Input::Tick),
        ]
    }

    proptest! {
        #[test]
        fn head_never_steps_back_onto_the_tile_it_left(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(any_input(), 0..200),
        ) {
            let settings = Settings { width: 8, height: 8, ..Settings::default() };
            let mut game = Game::with_rng(&settings, StdRng::seed_from_u64(seed)).unwrap();
            let mut left_behind = None;

            for input in inputs {
                match input {
                    Input::Turn(movement) => {
                        let _ = game.set_movement(movement);
                    }
                    Input::EndFrame => game.end_frame(),
                    Input::Tick => {
                        let before = game.snake().head();
                        let _ = game.tick();
                        let after = game.snake().head();
                        if after != before {
                            prop_assert_ne!(Some(after), left_behind);
                            left_behind = Some(before);
                        }
                    }
                }
            }
        }

        #[test]
        fn relocated_food_lands_on_a_free_tile(seed in any::<u64>()) {
            let settings = Settings { width: 6, height: 6, ..Settings::default() };
            let mut game = Game::with_rng(&settings, StdRng::seed_from_u64(seed)).unwrap();
            let _ = step(&mut game, Movement::Right);
            game.place_food(game.snake().head());
            prop_assert!(game.consume_food());

            let food = game.food().unwrap();
            prop_assert!(game.grid().is_interior(food));
            prop_assert!(!game.snake().occupies(food));
            prop_assert_eq!(game.grid().tile_at(food), TileType::Food);
        }
    }
}
