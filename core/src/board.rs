//! Dense board grid holding at most one item per cell.

use serde::{Deserialize, Serialize};

use crate::{BoardError, CellCoord, Item, ItemId, ItemKind};

/// Fixed-size grid of item slots stored in row-major order.
///
/// A `Board` is a value: systems clone it into a working snapshot, mutate the
/// copy, and return the copy only when the whole transition succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Item>>,
}

impl Board {
    /// Creates an empty board with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies within the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the item at `cell`; out-of-bounds cells hold nothing.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&Item> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Returns the item at `cell`, rejecting out-of-bounds coordinates.
    pub fn occupant(&self, cell: CellCoord) -> Result<Option<&Item>, BoardError> {
        if self.contains(cell) {
            Ok(self.get(cell))
        } else {
            Err(BoardError::InvalidCoordinate { cell })
        }
    }

    /// Reports whether `cell` is on the board and holds no item.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.contains(cell) && self.get(cell).is_none()
    }

    /// Places `item` into an empty cell.
    pub fn place(&mut self, cell: CellCoord, item: Item) -> Result<(), BoardError> {
        if !self.contains(cell) {
            return Err(BoardError::InvalidCoordinate { cell });
        }
        if self.get(cell).is_some() {
            return Err(BoardError::OccupiedCell { cell });
        }
        if self.contains_id(item.id()) {
            return Err(BoardError::DuplicateItem { item: item.id() });
        }
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(BoardError::InvalidCoordinate { cell })?;
        *slot = Some(item);
        Ok(())
    }

    /// Removes and returns the item at `cell`, if any.
    pub fn remove(&mut self, cell: CellCoord) -> Option<Item> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(Option::take)
    }

    /// Finds the empty cell closest to `from` by Manhattan distance.
    ///
    /// Ties resolve to the first candidate in row-major scan order.
    #[must_use]
    pub fn find_nearest_empty(&self, from: CellCoord) -> Option<CellCoord> {
        if self.is_full() {
            return None;
        }

        let mut nearest: Option<(u32, CellCoord)> = None;
        for cell in self.coordinates() {
            if !self.is_empty(cell) {
                continue;
            }
            let distance = from.manhattan_distance(cell);
            let closer = match nearest {
                None => true,
                Some((best, _)) => distance < best,
            };
            if closer {
                nearest = Some((distance, cell));
            }
        }
        nearest.map(|(_, cell)| cell)
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Iterates over occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Item)> + '_ {
        self.coordinates()
            .zip(self.cells.iter())
            .filter_map(|(cell, slot)| slot.as_ref().map(|item| (cell, item)))
    }

    /// Number of items on the board.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reports whether no empty cell remains.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.item_count() == self.cells.len()
    }

    /// Number of generators on the board, whatever their color.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.iter()
            .filter(|(_, item)| item.kind() == ItemKind::Generator)
            .count()
    }

    /// Reports whether an item with the identifier is on the board.
    #[must_use]
    pub fn contains_id(&self, id: ItemId) -> bool {
        self.locate(id).is_some()
    }

    /// Finds the cell holding the item with the identifier.
    #[must_use]
    pub fn locate(&self, id: ItemId) -> Option<CellCoord> {
        self.iter()
            .find(|(_, item)| item.id() == id)
            .map(|(cell, _)| cell)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
