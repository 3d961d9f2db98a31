//! The fixed 6×4 TV grid.
//!
//! Slot index `i` shows display position `i + 1`; rows run left to right,
//! top to bottom.

use serde::Serialize;
use tracing::debug;

use crate::model::{PanelProduct, Position};

pub const GRID_COLUMNS: usize = 6;
pub const GRID_ROWS: usize = 4;
pub const GRID_SLOTS: usize = GRID_COLUMNS * GRID_ROWS;

/// Row/column of a slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub index: usize,
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub fn of(index: usize) -> Self {
        Self {
            index,
            row: index / GRID_COLUMNS,
            column: index % GRID_COLUMNS,
        }
    }

    /// The display position rendered in this cell.
    pub fn position(&self) -> Position {
        self.index as Position + 1
    }
}

/// Exactly [`GRID_SLOTS`] slots, each empty or holding one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PositionalGrid {
    slots: Vec<Option<PanelProduct>>,
}

impl Default for PositionalGrid {
    fn default() -> Self {
        Self {
            slots: vec![None; GRID_SLOTS],
        }
    }
}

impl PositionalGrid {
    pub fn slots(&self) -> &[Option<PanelProduct>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&PanelProduct> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&PanelProduct> {
        if row >= GRID_ROWS || column >= GRID_COLUMNS {
            return None;
        }
        self.get(row * GRID_COLUMNS + column)
    }

    /// The grid as [`GRID_ROWS`] rows of [`GRID_COLUMNS`] slots.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PanelProduct>]> {
        self.slots.chunks(GRID_COLUMNS)
    }

    /// Filled slots with their cell coordinates.
    pub fn occupied(&self) -> impl Iterator<Item = (GridCell, &PanelProduct)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (GridCell::of(i), p)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn into_slots(self) -> Vec<Option<PanelProduct>> {
        self.slots
    }

    fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}

/// Active products only, ordered by position.
///
/// The sort is stable; products without a position sort as position 0,
/// ahead of every placed product.
pub fn organize_by_position(products: &[PanelProduct]) -> Vec<PanelProduct> {
    let mut active: Vec<PanelProduct> = products.iter().filter(|p| p.active).cloned().collect();
    active.sort_by_key(|p| p.position.unwrap_or(0));
    active
}

/// Project products onto the grid, in input order.
///
/// - Position in `1..=24`: placed at `position - 1` if that slot is still
///   empty, otherwise dropped (the first writer keeps the slot).
/// - No position, or out of range: placed in the first empty slot scanning
///   left to right, or dropped when the grid is full.
///
/// Never fails. Collisions are reported by conflict detection, not here.
pub fn create_positional_grid(products: &[PanelProduct]) -> PositionalGrid {
    let mut grid = PositionalGrid::default();

    for product in products {
        let target = match product.position {
            Some(p) if (1..=GRID_SLOTS as Position).contains(&p) => {
                let index = (p - 1) as usize;
                if grid.slots[index].is_some() {
                    debug!(product = %product.id, position = p, "grid slot taken, dropping product");
                    continue;
                }
                Some(index)
            }
            _ => grid.first_free(),
        };

        match target {
            Some(index) => grid.slots[index] = Some(product.clone()),
            None => debug!(product = %product.id, "grid full, dropping product"),
        }
    }

    grid
}
