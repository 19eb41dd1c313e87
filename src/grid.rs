use crate::error::{GameError, MAX_TILES};
use crate::snake::Snake;

/// A tile position inside the bordered playfield. `(0, 0)` is the top-left
/// corner of the border frame; the interior starts at `(1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

/// What currently occupies a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileType {
    Available,
    SnakeHead,
    SnakeTail,
    Food,
    TopBorder,
    BottomBorder,
    LeftBorder,
    RightBorder,
    TopLeftCorner,
    TopRightCorner,
    BottomLeftCorner,
    BottomRightCorner,
}

impl TileType {
    pub fn is_border(self) -> bool {
        matches!(
            self,
            TileType::TopBorder
                | TileType::BottomBorder
                | TileType::LeftBorder
                | TileType::RightBorder
                | TileType::TopLeftCorner
                | TileType::TopRightCorner
                | TileType::BottomLeftCorner
                | TileType::BottomRightCorner
        )
    }

    /// A head landing on a collidable tile ends the round.
    pub fn is_collidable(self) -> bool {
        self.is_border() || self == TileType::SnakeTail
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub tile: TileType,
}

/// The playfield: `width × height` interior tiles wrapped in a one tile
/// border frame, stored row-major in one buffer.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 || width > MAX_TILES || height > MAX_TILES {
            return Err(GameError::InvalidDimensions { width, height });
        }

        let stride = width + 2;
        let rows = height + 2;
        let cells = (0..stride * rows)
            .map(|index| {
                let position = Position::new(index % stride, index / stride);
                Cell {
                    position,
                    tile: frame_tile(position, stride - 1, rows - 1),
                }
            })
            .collect();

        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Interior width, in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Interior height, in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns including the border frame.
    pub fn stride(&self) -> usize {
        self.width + 2
    }

    /// Rows including the border frame.
    pub fn rows(&self) -> usize {
        self.height + 2
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.stride() && position.y < self.rows()
    }

    pub fn is_interior(&self, position: Position) -> bool {
        (1..=self.width).contains(&position.x) && (1..=self.height).contains(&position.y)
    }

    pub fn to_index(&self, position: Position) -> usize {
        assert!(
            self.contains(position),
            "position ({}, {}) escaped the {}x{} playfield",
            position.x,
            position.y,
            self.width,
            self.height
        );
        position.y * self.stride() + position.x
    }

    pub fn cell_at(&self, position: Position) -> &Cell {
        &self.cells[self.to_index(position)]
    }

    pub fn tile_at(&self, position: Position) -> TileType {
        self.cell_at(position).tile
    }

    pub fn corners(&self) -> [Position; 4] {
        let (right, bottom) = (self.stride() - 1, self.rows() - 1);
        [
            Position::new(0, 0),
            Position::new(right, 0),
            Position::new(0, bottom),
            Position::new(right, bottom),
        ]
    }

    /// Row-major iteration over every cell, border included.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn available_tiles(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.tile == TileType::Available)
            .map(|cell| cell.position)
    }

    /// Clears everything but the border frame.
    pub fn reset_to_available(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| !cell.tile.is_border()) {
            cell.tile = TileType::Available;
        }
    }

    /// Re-stamps the food and the snake onto a freshly reset grid. The head
    /// covers the food it is about to eat, and a tail segment sharing the
    /// head's cell overwrites it.
    pub fn compute_occupancy(&mut self, snake: &Snake, food: Option<Position>) {
        self.reset_to_available();

        if let Some(food) = food {
            self.mark(food, TileType::Food);
        }

        let mut tile = TileType::SnakeHead;
        for &segment in snake.segments() {
            self.mark(segment, tile);
            tile = TileType::SnakeTail;
        }
    }

    fn mark(&mut self, position: Position, tile: TileType) {
        let index = self.to_index(position);
        let cell = &mut self.cells[index];
        // the frame stays intact even when the head sits on it
        if !cell.tile.is_border() {
            cell.tile = tile;
        }
    }
}

fn frame_tile(position: Position, right: usize, bottom: usize) -> TileType {
    match (position.x, position.y) {
        (0, 0) => TileType::TopLeftCorner,
        (x, 0) if x == right => TileType::TopRightCorner,
        (0, y) if y == bottom => TileType::BottomLeftCorner,
        (x, y) if x == right && y == bottom => TileType::BottomRightCorner,
        (_, 0) => TileType::TopBorder,
        (_, y) if y == bottom => TileType::BottomBorder,
        (0, _) => TileType::LeftBorder,
        (x, _) if x == right => TileType::RightBorder,
        _ => TileType::Available,
    }
}
