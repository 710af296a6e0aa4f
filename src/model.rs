use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub(crate) enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub(crate) fn from_bit(value: u8) -> Option<Self> {
        match value {
            0 => Some(CellState::Dead),
            1 => Some(CellState::Alive),
            _ => None,
        }
    }

    pub(crate) fn is_alive(self) -> bool {
        matches!(self, CellState::Alive)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum GridError {
    #[error("grid must be at least 1x1, got {height}x{width}")]
    EmptyDimension { height: usize, width: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell [{row}][{col}] holds {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
    #[error("expected {expected} cells, got {found}")]
    CellCountMismatch { expected: usize, found: usize },
}

/// Rectangular board of cells, stored row-major.
///
/// Dimensions are fixed at construction; every constructor validates its
/// input so the stepper never sees a ragged or out-of-domain board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    height: usize,
    width: usize,
    cells: Vec<CellState>,
}

impl Grid {
    pub(crate) fn dead(height: usize, width: usize) -> Result<Self, GridError> {
        check_dims(height, width)?;
        Ok(Self {
            height,
            width,
            cells: vec![CellState::Dead; height * width],
        })
    }

    pub(crate) fn from_cells(
        height: usize,
        width: usize,
        cells: Vec<CellState>,
    ) -> Result<Self, GridError> {
        check_dims(height, width)?;
        let expected = height * width;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Builds a grid from rows of raw 0/1 values. The first row fixes the width.
    pub(crate) fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        check_dims(height, width)?;

        let mut cells = Vec::with_capacity(height * width);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let cell = CellState::from_bit(value)
                    .ok_or(GridError::InvalidCell { row, col, value })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Dead grid with the listed `(row, col)` cells alive. Out-of-range
    /// coordinates wrap onto the torus.
    pub(crate) fn with_alive(
        height: usize,
        width: usize,
        alive: &[(usize, usize)],
    ) -> Result<Self, GridError> {
        let mut grid = Self::dead(height, width)?;
        for &(r, c) in alive {
            grid.set(r % height, c % width, CellState::Alive);
        }
        Ok(grid)
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Panics if `(row, col)` lies outside the grid.
    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> CellState {
        assert!(row < self.height && col < self.width);
        self.cells[self.idx(row, col)]
    }

    /// Panics if `(row, col)` lies outside the grid.
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: CellState) {
        assert!(row < self.height && col < self.width);
        let i = self.idx(row, col);
        self.cells[i] = cell;
    }

    /// New grid of the same shape, each cell produced by `f(row, col, cell)`.
    pub(crate) fn map_cells<F>(&self, mut f: F) -> Grid
    where
        F: FnMut(usize, usize, CellState) -> CellState,
    {
        let w = self.width;
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| f(i / w, i % w, cell))
            .collect();
        Grid {
            height: self.height,
            width: self.width,
            cells,
        }
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks(self.width)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }
}

fn check_dims(height: usize, width: usize) -> Result<(), GridError> {
    if height == 0 || width == 0 {
        return Err(GridError::EmptyDimension { height, width });
    }
    Ok(())
}
