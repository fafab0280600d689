//! Gridstage Grid - the client-side staging engine for editable query results
//!
//! This crate overlays pending cell edits, row deletions, row inserts, and
//! column filters on top of an immutable [`gridstage_core::ResultSet`], keeps
//! display indices consistent as rows are hidden or added, and reconciles the
//! overlay into one transactional mutation batch for a
//! [`gridstage_core::MutationExecutor`].
//!
//! The [`GridController`] is the single owning handle: the rendering layer
//! reads display rows and counts from it and routes every user intent back
//! through it. No other component mutates overlay state.

mod coerce;
#[cfg(test)]
mod test_fixtures;
mod commit;
mod controller;
mod display;
mod filter;
mod overlay;
mod session;

pub use coerce::{coerce_draft, is_empty_value};
pub use commit::{CommitConfig, PendingCommit, can_commit, commit, prepare_commit};
pub use controller::GridController;
pub use display::DisplayMap;
pub use filter::{ColumnFilter, FilterOperator, FilterSet, offered_operators};
pub use overlay::{ChangeOverlay, EditKey};
pub use session::{
    CellRef, ClickDecision, ClickTracker, DOUBLE_CLICK_WINDOW, EditSession, SavedEdit,
};
