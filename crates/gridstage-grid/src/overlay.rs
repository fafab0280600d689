//! The pending-change overlay layered over an immutable result snapshot.
//!
//! The overlay is a true diff: an edit entry exists iff the pending value
//! differs from the base value, a delete is a marker that suppresses display
//! without touching edits, and an insert is a wholly pending row. Original
//! indices are assigned once - `0..base_row_count` for base rows, then one
//! per insert in creation order - and are never renumbered, so selections
//! and edit keys stay valid across deletes, restores, and filtering.

use std::collections::BTreeSet;
use std::fmt;

use gridstage_core::{CellEdit, GridError, ResultSet, Result, Row, RowInsert, Value};
use indexmap::IndexMap;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key of a pending cell edit: `(original index, column name)`.
///
/// Serialized as the string `"{index}-{column}"`, the wire form the
/// frontend debug tooling expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub original_index: usize,
    pub column: String,
}

impl EditKey {
    pub fn new(original_index: usize, column: impl Into<String>) -> Self {
        Self {
            original_index,
            column: column.into(),
        }
    }
}

impl fmt::Display for EditKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.original_index, self.column)
    }
}

impl Serialize for EditKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EditKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = EditKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an edit key of the form \"{index}-{column}\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<EditKey, E> {
                let (index, column) = v
                    .split_once('-')
                    .ok_or_else(|| E::custom(format!("malformed edit key: {v}")))?;
                let original_index = index
                    .parse::<usize>()
                    .map_err(|_| E::custom(format!("malformed edit key index: {v}")))?;
                Ok(EditKey::new(original_index, column))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// Sparse set of pending mutations over one [`ResultSet`].
///
/// The overlay holds no reference to the snapshot; operations that need base
/// values take it as a parameter. Starts empty on every load and is cleared
/// atomically by [`reset`](Self::reset) or a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeOverlay {
    edits: IndexMap<EditKey, CellEdit>,
    deletes: BTreeSet<usize>,
    inserts: Vec<RowInsert>,
    /// Bumped on every reset; lets the commit path recognize a stale
    /// in-flight response. Not part of the wire shape.
    #[serde(skip)]
    epoch: u64,
}

impl ChangeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a new value for a cell.
    ///
    /// For base rows the old value comes from the snapshot; staging a value
    /// equal to it removes any existing entry, so the overlay never holds a
    /// no-op diff. For insert rows the value is written straight into the
    /// pending row data - an insert is already wholly pending and never
    /// produces a `CellEdit`.
    pub fn set_edit(
        &mut self,
        base: &ResultSet,
        original_index: usize,
        column: &str,
        new_value: Value,
    ) -> Result<()> {
        let base_count = base.base_row_count();
        if original_index >= base_count {
            let insert = self
                .inserts
                .get_mut(original_index - base_count)
                .ok_or(GridError::RowOutOfBounds(original_index))?;
            if !insert.row_data.set_by_name(column, new_value) {
                return Err(GridError::ColumnNotFound(column.to_string()));
            }
            return Ok(());
        }

        let row = base
            .row(original_index)
            .ok_or(GridError::RowOutOfBounds(original_index))?;
        let old_value = row
            .get_by_name(column)
            .ok_or_else(|| GridError::ColumnNotFound(column.to_string()))?;

        let key = EditKey::new(original_index, column);
        if new_value == *old_value {
            if self.edits.shift_remove(&key).is_some() {
                tracing::debug!(row = original_index, column, "edit reverted to base value");
            }
            return Ok(());
        }

        self.edits.insert(
            key,
            CellEdit {
                original_index,
                column_name: column.to_string(),
                old_value: old_value.clone(),
                new_value,
            },
        );
        Ok(())
    }

    /// Mark a row for deletion. No effect on edits or inserts; the row's
    /// pending edits are retained, just display-suppressed.
    pub fn mark_deleted(&mut self, original_index: usize) {
        self.deletes.insert(original_index);
    }

    /// Remove a row's delete marker, un-suppressing it with edits intact.
    pub fn restore(&mut self, original_index: usize) {
        self.deletes.remove(&original_index);
    }

    pub fn is_deleted(&self, original_index: usize) -> bool {
        self.deletes.contains(&original_index)
    }

    /// Append a new all-NULL row. Returns its original index, fixed at
    /// creation and never reused.
    pub fn insert_row(&mut self, base: &ResultSet) -> usize {
        self.inserts.push(RowInsert {
            temp_id: Uuid::new_v4().to_string(),
            row_data: Row::all_null(base.columns.clone()),
        });
        let original_index = base.base_row_count() + self.inserts.len() - 1;
        tracing::debug!(row = original_index, "appended pending insert row");
        original_index
    }

    /// Clear all pending changes. Used after a successful commit or an
    /// explicit discard; bumps the overlay epoch so a response to any commit
    /// still in flight is recognized as stale.
    pub fn reset(&mut self) {
        let discarded = self.pending_count();
        self.edits.clear();
        self.deletes.clear();
        self.inserts.clear();
        self.epoch += 1;
        if discarded > 0 {
            tracing::debug!(discarded, "overlay reset");
        }
    }

    /// The pending-change count shown to the user. This sum is the single
    /// source of truth for "N pending changes".
    pub fn pending_count(&self) -> usize {
        self.edits.len() + self.deletes.len() + self.inserts.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The cell value as the user currently sees it: the pending edit if one
    /// exists, the pending row data for inserts, the snapshot otherwise.
    pub fn effective_value(
        &self,
        base: &ResultSet,
        original_index: usize,
        column: &str,
    ) -> Option<Value> {
        let base_count = base.base_row_count();
        if original_index >= base_count {
            return self
                .inserts
                .get(original_index - base_count)?
                .row_data
                .get_by_name(column)
                .cloned();
        }
        if let Some(edit) = self.edits.get(&EditKey::new(original_index, column)) {
            return Some(edit.new_value.clone());
        }
        base.row(original_index)?.get_by_name(column).cloned()
    }

    /// Materialize a full row with pending edits applied, for rendering.
    pub fn materialize_row(&self, base: &ResultSet, original_index: usize) -> Option<Row> {
        let base_count = base.base_row_count();
        if original_index >= base_count {
            return self
                .inserts
                .get(original_index - base_count)
                .map(|insert| insert.row_data.clone());
        }
        let mut row = base.row(original_index)?.clone();
        for edit in self.edits.values() {
            if edit.original_index == original_index {
                row.set_by_name(&edit.column_name, edit.new_value.clone());
            }
        }
        Some(row)
    }

    pub fn edits(&self) -> &IndexMap<EditKey, CellEdit> {
        &self.edits
    }

    pub fn deletes(&self) -> &BTreeSet<usize> {
        &self.deletes
    }

    pub fn inserts(&self) -> &[RowInsert] {
        &self.inserts
    }

    /// Number of rows the overlay knows about: base rows plus inserts.
    pub fn total_row_count(&self, base: &ResultSet) -> usize {
        base.base_row_count() + self.inserts.len()
    }
}

#[cfg(test)]
mod tests;
