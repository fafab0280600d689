//! The owning handle for one editable grid.
//!
//! `GridController` holds the snapshot, overlay, filter set, edit session,
//! and selection behind one struct. The rendering layer reads display rows
//! and summary counts from it and routes every user intent back through its
//! methods; nothing else mutates grid state.

use std::collections::HashSet;
use std::sync::Arc;

use gridstage_core::{
    CommitOutcome, GridError, MutationExecutor, Result, ResultSet, Row, Value,
};

use crate::commit::{self, CommitConfig};
use crate::display::DisplayMap;
use crate::filter::{ColumnFilter, FilterSet};
use crate::overlay::ChangeOverlay;
use crate::session::EditSession;

pub struct GridController {
    result_set: Arc<ResultSet>,
    overlay: ChangeOverlay,
    filters: FilterSet,
    session: EditSession,
    /// Selected rows, keyed by original index so the set survives deletes,
    /// restores, and filtering
    selection: HashSet<usize>,
    config: CommitConfig,
}

impl GridController {
    pub fn new(connection_id: impl Into<String>) -> Self {
        Self {
            result_set: Arc::new(ResultSet::empty()),
            overlay: ChangeOverlay::new(),
            filters: FilterSet::new(),
            session: EditSession::Idle,
            selection: HashSet::new(),
            config: CommitConfig::new(connection_id),
        }
    }

    /// Replace the snapshot after a (re)load. Pending changes, the edit
    /// session, and the selection are dropped - they were keyed to the old
    /// snapshot's indices. Active filters survive: they are the user's
    /// context, and the caller chose to reload under them.
    pub fn load(&mut self, result_set: ResultSet) {
        tracing::debug!(
            rows = result_set.base_row_count(),
            columns = result_set.column_count(),
            "loading result set"
        );
        self.result_set = Arc::new(result_set);
        self.overlay = ChangeOverlay::new();
        self.session = EditSession::Idle;
        self.selection.clear();
    }

    /// Set or clear the commit target for the current result
    pub fn set_table(&mut self, table_name: Option<String>, primary_key_columns: Vec<String>) {
        self.config.table_name = table_name;
        self.config.primary_key_columns = primary_key_columns;
    }

    pub fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    pub fn overlay(&self) -> &ChangeOverlay {
        &self.overlay
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    // --- editing -----------------------------------------------------------

    /// Open the in-place editor on a cell. Any other active edit is saved
    /// (not cancelled) first.
    pub fn start_edit(&mut self, original_index: usize, column: &str) -> Result<()> {
        let current = self
            .overlay
            .effective_value(&self.result_set, original_index, column)
            .ok_or(GridError::RowOutOfBounds(original_index))?;
        if let Some(saved) = self.session.begin(original_index, column, current) {
            self.overlay
                .set_edit(&self.result_set, saved.original_index, &saved.column, saved.value)?;
        }
        Ok(())
    }

    /// Replace the active draft text
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.session.set_draft(text);
    }

    /// Save the active draft into the overlay and close the editor
    pub fn save_edit(&mut self) -> Result<()> {
        if let Some(saved) = self.session.save() {
            self.overlay
                .set_edit(&self.result_set, saved.original_index, &saved.column, saved.value)?;
        }
        Ok(())
    }

    /// Close the editor, discarding the draft
    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    /// The results area scrolled: an open editor saves and closes
    pub fn on_results_scrolled(&mut self) -> Result<()> {
        self.save_edit()
    }

    /// Pagination changed: an open editor saves and closes
    pub fn on_page_changed(&mut self) -> Result<()> {
        self.save_edit()
    }

    // --- rows --------------------------------------------------------------

    /// Toggle a row's delete marker
    pub fn toggle_delete(&mut self, original_index: usize) -> Result<()> {
        if original_index >= self.overlay.total_row_count(&self.result_set) {
            return Err(GridError::RowOutOfBounds(original_index));
        }
        if self.overlay.is_deleted(original_index) {
            self.overlay.restore(original_index);
        } else {
            self.overlay.mark_deleted(original_index);
        }
        Ok(())
    }

    /// Append a new pending row; returns its original index
    pub fn add_row(&mut self) -> usize {
        self.overlay.insert_row(&self.result_set)
    }

    // --- filters ------------------------------------------------------------

    pub fn set_filter(&mut self, filter: ColumnFilter) {
        self.filters.set(filter);
    }

    pub fn remove_filter(&mut self, column: &str) -> bool {
        self.filters.remove(column)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    // --- selection ----------------------------------------------------------

    pub fn select(&mut self, original_index: usize) {
        self.selection.insert(original_index);
    }

    pub fn deselect(&mut self, original_index: usize) {
        self.selection.remove(&original_index);
    }

    pub fn toggle_select(&mut self, original_index: usize) {
        if !self.selection.remove(&original_index) {
            self.selection.insert(original_index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &HashSet<usize> {
        &self.selection
    }

    // --- rendering ----------------------------------------------------------

    /// Derive the current display mapping
    pub fn display_map(&self) -> DisplayMap {
        DisplayMap::build(&self.result_set, &self.overlay, &self.filters)
    }

    /// Materialize the visible rows in display order
    pub fn display_rows(&self) -> Vec<Row> {
        self.display_map()
            .display_rows(&self.result_set, &self.overlay)
    }

    /// The cell value as currently displayed
    pub fn cell_value(&self, original_index: usize, column: &str) -> Option<Value> {
        self.overlay
            .effective_value(&self.result_set, original_index, column)
    }

    /// Pending-change count for the summary badge
    pub fn pending_count(&self) -> usize {
        self.overlay.pending_count()
    }

    pub fn is_dirty(&self) -> bool {
        self.overlay.is_dirty()
    }

    // --- commit / reset -----------------------------------------------------

    /// Whether the commit affordance is enabled
    pub fn can_commit(&self) -> bool {
        commit::can_commit(&self.config, &self.overlay)
    }

    /// Commit all pending changes as one batch. An open editor is saved
    /// first so its draft is part of the batch. On success the overlay is
    /// cleared but the data is not reloaded - the caller decides whether to
    /// re-run the query.
    pub async fn commit(&mut self, executor: &dyn MutationExecutor) -> Result<CommitOutcome> {
        self.save_edit()?;
        commit::commit(executor, &self.result_set, &mut self.overlay, &self.config).await
    }

    /// Discard every pending change and close any open editor. Does not
    /// cancel or wait on an in-flight commit; its late response is ignored.
    pub fn reset(&mut self) {
        self.session.cancel();
        self.overlay.reset();
    }
}

#[cfg(test)]
mod tests;
