use std::collections::HashSet;

use crate::puzzle::{Cell, Grid};

/// The player's in-progress path.
///
/// Every consecutive pair of cells is adjacent and no cell appears twice.
/// Cells that belong to an already-found word are locked and can never be
/// added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    path: Vec<Cell>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `cell` if it is unlocked, not already selected, and adjacent to
    /// the last selected cell. Returns `false` without touching the path otherwise.
    pub fn try_append(&mut self, cell: Cell, locked: &HashSet<Cell>) -> bool {
        if locked.contains(&cell) || self.path.contains(&cell) {
            return false;
        }
        if let Some(last) = self.path.last() {
            if !last.is_adjacent_to(&cell) {
                return false;
            }
        }
        self.path.push(cell);
        true
    }

    /// Pop the last cell, but only when it is `cell`.
    pub fn remove_last(&mut self, cell: Cell) -> bool {
        if self.path.last() == Some(&cell) {
            self.path.pop();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.path.clear();
    }

    /// Hand the path over to the caller, leaving the selection empty.
    pub fn take(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.path)
    }

    pub fn current_letters(&self, grid: &Grid) -> String {
        grid.spell(&self.path)
    }

    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn last(&self) -> Option<Cell> {
        self.path.last().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.path.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}
