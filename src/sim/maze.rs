//! Maze grid and generation
//!
//! A randomized depth-first carver run from every odd (x, y) seed cell:
//! each walk knocks down walls two cells at a time, which keeps a lattice
//! of wall lines intact and yields a perfect maze. A walk gives up after
//! four failed directions, so generation always terminates.

use rand::Rng;

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

/// Fixed-size maze grid, row-major. Immutable once generated: players move
/// through it, they don't alter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Entrance cell, forced open by `generate`. Both players start here.
    pub const ENTRANCE: (usize, usize) = (1, 0);

    /// Fully walled grid. Generation starts from this; tests build custom
    /// layouts from it with `open`.
    pub fn walled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        }
    }

    /// Generate a maze. Identical RNG streams produce identical grids.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        let mut maze = Self::walled(width, height);
        maze.open(1, 1);

        // Seed a carving walk at every odd coordinate for full coverage.
        for y in (1..height).step_by(2) {
            for x in (1..width).step_by(2) {
                maze.carve_from(x, y, rng);
            }
        }

        // Entry at the top edge plus one forced-open cell by the far corner.
        maze.open(Self::ENTRANCE.0, Self::ENTRANCE.1);
        maze.open(width - 2, height - 1);
        maze
    }

    /// One randomized depth-first walk. Knocking down a wall advances the
    /// walk two cells and resets the retry count; four consecutive failed
    /// directions end the walk.
    fn carve_from(&mut self, seed_x: usize, seed_y: usize, rng: &mut impl Rng) {
        let (mut x, mut y) = (seed_x, seed_y);
        let mut dir = rng.random_range(0..4u32);
        let mut tries = 0;
        while tries < 4 {
            let (dx, dy): (isize, isize) = match dir {
                0 => (1, 0),
                1 => (0, 1),
                2 => (-1, 0),
                _ => (0, -1),
            };
            let x1 = x as isize + dx;
            let y1 = y as isize + dy;
            let x2 = x1 + dx;
            let y2 = y1 + dy;
            // The far cell must stay strictly inside the border.
            if x2 > 0
                && (x2 as usize) < self.width
                && y2 > 0
                && (y2 as usize) < self.height
                && self.is_wall(x1 as usize, y1 as usize)
                && self.is_wall(x2 as usize, y2 as usize)
            {
                self.open(x1 as usize, y1 as usize);
                self.open(x2 as usize, y2 as usize);
                x = x2 as usize;
                y = y2 as usize;
                dir = rng.random_range(0..4u32);
                tries = 0;
            } else {
                dir = (dir + 1) % 4;
                tries += 1;
            }
        }
    }

    /// The goal tile: scanning from the far corner backward (highest x,
    /// then highest y within each column), the first open cell.
    /// Deterministic for a given grid; reachability from the entrance is
    /// not validated.
    pub fn find_goal(&self) -> (usize, usize) {
        for x in (0..self.width).rev() {
            for y in (0..self.height).rev() {
                if self.is_open(x, y) {
                    return (x, y);
                }
            }
        }
        Self::ENTRANCE
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_open(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x] == Cell::Open
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        !self.is_open(x, y)
    }

    /// Bounds check plus wall check in one step, for movement targets.
    pub fn walkable(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.is_open(x as usize, y as usize)
    }

    /// Knock down the wall at (x, y). Generation-time only.
    pub fn open(&mut self, x: usize, y: usize) {
        self.cells[y * self.width + x] = Cell::Open;
    }
}
