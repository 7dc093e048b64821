use chess_with_guns_core::{BoardSize, CellCoord, OccupancyView, Occupant};

/// Dense occupancy board holding exactly one occupant per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: BoardSize,
    cells: Vec<Occupant>,
}

impl Grid {
    /// Creates an empty board of the provided size.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Occupant::Empty; size.cell_count()],
        }
    }

    /// Dimensions of the board.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// Reports whether the signed coordinate lies on the board.
    #[must_use]
    pub fn in_bounds(&self, column: i64, row: i64) -> bool {
        self.size.contains(column, row)
    }

    /// Reads the occupant of a cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the board.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Occupant {
        self.cells[self.size.index(cell)]
    }

    /// Overwrites the occupant of a cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the board.
    pub fn set(&mut self, cell: CellCoord, occupant: Occupant) {
        let index = self.size.index(cell);
        self.cells[index] = occupant;
    }

    /// Borrows the board as a read-only view.
    #[must_use]
    pub fn view(&self) -> OccupancyView<'_> {
        OccupancyView::new(self.size, &self.cells)
    }

    pub(crate) fn empty_cells(&self) -> Vec<CellCoord> {
        self.view()
            .iter()
            .filter(|(_, occupant)| occupant.is_empty())
            .map(|(cell, _)| cell)
            .collect()
    }
}
