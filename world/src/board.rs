//! Rectangular cell grid with pixel mapping and the free-cell snapshot.

use snake_arcade_core::{Cell, LayoutError, PixelPos};

/// Describes the discrete cell layout of the board and its pixel surface.
#[derive(Clone, Debug)]
pub struct Board {
    columns: u32,
    rows: u32,
    width: f32,
    height: f32,
    free: FreeCells,
}

impl Board {
    /// Creates a board after validating its dimensions.
    ///
    /// Every cell starts out free.
    pub fn new(columns: u32, rows: u32, width: f32, height: f32) -> Result<Self, LayoutError> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid);
        }
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::DegenerateSurface);
        }
        Ok(Self::unchecked(columns, rows, width, height))
    }

    pub(crate) fn unchecked(columns: u32, rows: u32, width: f32, height: f32) -> Self {
        let mut board = Self {
            columns,
            rows,
            width,
            height,
            free: FreeCells::new(columns, rows),
        };
        let _ = board.recompute_free_cells(std::iter::empty(), false);
        board
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of the board surface in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the board surface in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Width of a single cell in pixels.
    #[must_use]
    pub fn cell_width(&self) -> f32 {
        self.width / self.columns as f32
    }

    /// Height of a single cell in pixels.
    #[must_use]
    pub fn cell_height(&self) -> f32 {
        self.height / self.rows as f32
    }

    /// Reports whether the cell lies inside `[1, columns] x [1, rows]`.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.free.index(cell).is_some()
    }

    /// Centre of the cell in pixel space.
    #[must_use]
    pub fn cell_to_pixel(&self, cell: Cell) -> PixelPos {
        let cell_width = self.cell_width();
        let cell_height = self.cell_height();
        PixelPos::new(
            cell_width / 2.0 + (cell.column() - 1) as f32 * cell_width,
            cell_height / 2.0 + (cell.row() - 1) as f32 * cell_height,
        )
    }

    /// Cell containing the pixel. Positions off the surface map to cells
    /// outside the grid.
    #[must_use]
    pub fn pixel_to_cell(&self, position: PixelPos) -> Cell {
        let column = (position.x / self.cell_width()).floor() as i32 + 1;
        let row = (position.y / self.cell_height()).floor() as i32 + 1;
        Cell::new(column, row)
    }

    /// Iterates every cell of the grid, column by column.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let rows = self.rows as i32;
        (1..=self.columns as i32)
            .flat_map(move |column| (1..=rows).map(move |row| Cell::new(column, row)))
    }

    /// Rebuilds the free-cell snapshot.
    ///
    /// With `relaxed` set every grid cell is free; otherwise the cells in
    /// `occupied` are excluded. Cells outside the grid are never free.
    pub fn recompute_free_cells<I>(&mut self, occupied: I, relaxed: bool) -> &[Cell]
    where
        I: IntoIterator<Item = Cell>,
    {
        self.free.reset();
        if !relaxed {
            for cell in occupied {
                self.free.block(cell);
            }
        }
        let free: Vec<Cell> = self.cells().filter(|cell| self.free.is_open(*cell)).collect();
        self.free.cells = free;
        &self.free.cells
    }

    /// Cells free according to the latest snapshot, in column-major order.
    #[must_use]
    pub fn free_cells(&self) -> &[Cell] {
        &self.free.cells
    }

    /// Reports whether the cell belongs to the latest free-cell snapshot.
    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.free.is_open(cell)
    }
}

#[derive(Clone, Debug)]
struct FreeCells {
    columns: u32,
    rows: u32,
    open: Vec<bool>,
    cells: Vec<Cell>,
}

impl FreeCells {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            open: vec![true; capacity],
            cells: Vec::with_capacity(capacity),
        }
    }

    fn reset(&mut self) {
        self.open.fill(true);
    }

    fn block(&mut self, cell: Cell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.open.get_mut(index) {
                *slot = false;
            }
        }
    }

    fn is_open(&self, cell: Cell) -> bool {
        self.index(cell)
            .and_then(|index| self.open.get(index).copied())
            .unwrap_or(false)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?.checked_sub(1)?;
        let row = u32::try_from(cell.row()).ok()?.checked_sub(1)?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}
