use crate::types::{CellType, DieId, Position};

/// One square: its terrain plus at most one occupying die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub kind: CellType,
    pub die: Option<DieId>,
}

/// Square grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an all-neutral, empty board.
    pub fn new(size: u8) -> Self {
        let len = (size as usize) * (size as usize);
        Self {
            size,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        let idx = self.index(pos)?;
        self.cells.get(idx)
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let idx = self.index(pos)?;
        self.cells.get_mut(idx)
    }

    /// Returns the die on `pos`, or `None` when empty or off the board.
    pub fn occupant(&self, pos: Position) -> Option<DieId> {
        self.cell(pos).and_then(|cell| cell.die)
    }

    /// Removes and returns the die on `pos`.
    pub(crate) fn take(&mut self, pos: Position) -> Option<DieId> {
        self.cell_mut(pos).and_then(|cell| cell.die.take())
    }

    /// Puts `die` on `pos`. Returns `false` when the cell is missing or
    /// already occupied.
    pub(crate) fn put(&mut self, pos: Position, die: DieId) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.die.is_none() => {
                cell.die = Some(die);
                true
            }
            _ => false,
        }
    }

    /// Iterates `(position, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        let size = self.size as usize;
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let pos = Position::new((idx / size) as u8, (idx % size) as u8);
            (pos, cell)
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.die.is_some()).count()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.row as usize) * (self.size as usize) + pos.col as usize)
        } else {
            None
        }
    }
}
