use std::collections::VecDeque;

use crate::grid::{Grid, Position, TileType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Movement {
    #[default]
    Nothing,
    Left,
    Up,
    Right,
    Down,
}

impl Movement {
    pub fn opposite(self) -> Movement {
        match self {
            Movement::Nothing => Movement::Nothing,
            Movement::Left => Movement::Right,
            Movement::Up => Movement::Down,
            Movement::Right => Movement::Left,
            Movement::Down => Movement::Up,
        }
    }

    /// The neighbouring position in this direction, or `None` when it would
    /// fall off the top or left edge of the coordinate space.
    pub fn step(self, from: Position) -> Option<Position> {
        let Position { x, y } = from;
        match self {
            Movement::Nothing => Some(from),
            Movement::Left => x.checked_sub(1).map(|x| Position::new(x, y)),
            Movement::Up => y.checked_sub(1).map(|y| Position::new(x, y)),
            Movement::Right => Some(Position::new(x + 1, y)),
            Movement::Down => Some(Position::new(x, y + 1)),
        }
    }
}

/// The snake body, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    pub fn new(head: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Snake { body }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn tail(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Moves the head one tile and drags every segment into the place of the
    /// one ahead of it. Returns `false` without moving when the step would
    /// leave the bordered frame.
    pub fn advance(&mut self, movement: Movement, grid: &Grid) -> bool {
        if movement == Movement::Nothing {
            return true;
        }

        let next = match movement.step(self.head()) {
            Some(next) if grid.contains(next) => next,
            _ => return false,
        };

        // shifting every segment forward is the same as a new head plus a
        // dropped last segment
        self.body.push_front(next);
        let _ = self.body.pop_back();
        true
    }

    /// True when the tile under the head is a border or part of the tail.
    /// The segment left under the head by the last meal does not count.
    pub fn has_collided(&self, grid: &Grid) -> bool {
        let head = self.head();
        match grid.tile_at(head) {
            TileType::SnakeTail => self
                .tail()
                .skip(usize::from(self.just_grew()))
                .any(|&segment| segment == head),
            tile => tile.is_collidable(),
        }
    }

    /// The head still shares its tile with the old head it grew from.
    fn just_grew(&self) -> bool {
        self.body.get(1) == Some(&self.head())
    }

    /// Grows by one when the head sits on `food`: the new head is placed on
    /// the food tile and the old head becomes the first tail segment.
    ///
    /// A snake that already grew on this tile does not grow again until it
    /// has moved.
    pub fn eat(&mut self, food: Position) -> bool {
        let head = self.head();
        if head != food || self.just_grew() {
            return false;
        }

        self.body.push_front(food);
        true
    }
}
