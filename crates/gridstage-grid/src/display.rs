//! Display-index derivation.
//!
//! A `DisplayMap` is the bijection between what the user currently sees
//! (display positions `0..len`) and stable original indices. It is rebuilt
//! from scratch on every overlay or filter change and never stored across
//! them. Ordering guarantee: surviving base rows first in original order,
//! then surviving inserts in insertion order - filters hide rows from that
//! sequence but never reorder it, so original indices stay valid for
//! selections and edit keys no matter what is hidden.

use std::collections::HashMap;

use gridstage_core::{ResultSet, Row, Value};

use crate::filter::FilterSet;
use crate::overlay::ChangeOverlay;

/// Mapping from display position to original index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayMap {
    to_original: Vec<usize>,
    to_display: HashMap<usize, usize>,
}

impl DisplayMap {
    /// Derive the current mapping.
    ///
    /// First pass walks base indices then insert indices in order, skipping
    /// deleted rows; second pass drops rows failing any active filter,
    /// evaluated against overlay-aware cell values.
    pub fn build(base: &ResultSet, overlay: &ChangeOverlay, filters: &FilterSet) -> Self {
        let surviving = (0..overlay.total_row_count(base))
            .filter(|index| !overlay.is_deleted(*index));

        let mut to_original = Vec::new();
        let mut to_display = HashMap::new();
        for original_index in surviving {
            let visible = filters.matches_row(|column| {
                overlay
                    .effective_value(base, original_index, column)
                    .unwrap_or(Value::Null)
            });
            if visible {
                to_display.insert(original_index, to_original.len());
                to_original.push(original_index);
            }
        }
        Self {
            to_original,
            to_display,
        }
    }

    /// Number of visible rows
    pub fn len(&self) -> usize {
        self.to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }

    /// Original index of the row at a display position
    pub fn original_index(&self, display_index: usize) -> Option<usize> {
        self.to_original.get(display_index).copied()
    }

    /// Display position of a row, if currently visible
    pub fn display_index(&self, original_index: usize) -> Option<usize> {
        self.to_display.get(&original_index).copied()
    }

    /// Visible original indices in display order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.to_original.iter().copied()
    }

    /// Materialize the visible rows, overlay edits applied, in display order
    pub fn display_rows(&self, base: &ResultSet, overlay: &ChangeOverlay) -> Vec<Row> {
        self.to_original
            .iter()
            .filter_map(|&original_index| overlay.materialize_row(base, original_index))
            .collect()
    }
}
