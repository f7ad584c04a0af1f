//! Cell grid owned by the match
//!
//! Stored row-major. Reads outside the grid return `None`, writes outside
//! the grid are ignored.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Contents of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Empty,
    Indestructible,
    Destructible,
    Bomb,
    Explosion,
}

impl CellType {
    /// Decode a level layout code (0 = empty, 1 = indestructible, 2 = destructible)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellType::Empty),
            1 => Some(CellType::Indestructible),
            2 => Some(CellType::Destructible),
            _ => None,
        }
    }

    /// Players may only step onto empty cells
    #[inline]
    pub fn is_walkable(self) -> bool {
        self == CellType::Empty
    }
}

/// Reasons a level layout cannot become a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No rows, or a first row with no columns
    Empty,
    /// A row whose length differs from the first row
    Ragged { row: usize, expected: usize, found: usize },
    /// A code other than 0, 1 or 2
    UnknownCell { x: usize, y: usize, code: u8 },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Empty => write!(f, "layout has no cells"),
            LayoutError::Ragged {
                row,
                expected,
                found,
            } => write!(f, "layout row {row} has {found} cells, expected {expected}"),
            LayoutError::UnknownCell { x, y, code } => {
                write!(f, "layout cell ({x}, {y}) has unknown code {code}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Rectangular cell grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellType>,
}

impl Grid {
    /// All-empty grid
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![CellType::Empty; width as usize * height as usize],
        }
    }

    /// Procedural arena: border and even/even cells are indestructible, the
    /// rest is destructible with `destructible_chance`, otherwise empty.
    pub fn generate<R: Rng>(
        width: i32,
        height: i32,
        destructible_chance: f32,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..grid.height {
            for x in 0..grid.width {
                let border = x == 0 || y == 0 || x == grid.width - 1 || y == grid.height - 1;
                let cell = if border || (x % 2 == 0 && y % 2 == 0) {
                    CellType::Indestructible
                } else if rng.random::<f32>() < destructible_chance {
                    CellType::Destructible
                } else {
                    CellType::Empty
                };
                grid.set(IVec2::new(x, y), cell);
            }
        }
        grid
    }

    /// Build from a row-major layout matrix (`layout[y][x]`)
    pub fn from_layout(layout: &[Vec<u8>]) -> Result<Self, LayoutError> {
        let width = layout.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut grid = Self::new(width as i32, layout.len() as i32);
        for (y, row) in layout.iter().enumerate() {
            if row.len() != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let cell =
                    CellType::from_code(code).ok_or(LayoutError::UnknownCell { x, y, code })?;
                grid.set(IVec2::new(x as i32, y as i32), cell);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Row-major index of a cell, `None` outside the grid
    #[inline]
    pub fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Cell contents, `None` outside the grid
    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<CellType> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrite a cell; ignored outside the grid
    pub fn set(&mut self, pos: IVec2, cell: CellType) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Count cells of one type
    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}
