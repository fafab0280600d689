//! Commit wire types and the mutation-executor seam.
//!
//! The reconciler in `gridstage-grid` builds a [`CommitRequest`] from the
//! pending overlay and hands it to a [`MutationExecutor`]. The executor owns
//! SQL construction and transport; this crate only defines the shape of the
//! batch. A batch either fully succeeds or fails - there is no
//! partial-success reporting.

use crate::{Result, Row, Value};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single pending cell edit.
///
/// Exists iff `new_value != old_value` for the cell - the overlay never
/// holds no-op entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEdit {
    /// Original index of the edited row
    pub original_index: usize,
    /// Edited column
    pub column_name: String,
    /// Value in the base snapshot
    pub old_value: Value,
    /// Pending value
    pub new_value: Value,
}

/// A pending row insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowInsert {
    /// Client-generated id, used to correlate the insert across a commit
    pub temp_id: String,
    /// Row data; starts all-NULL across the declared columns
    pub row_data: Row,
}

/// The full set of pending changes sent in one commit batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridChanges {
    pub edits: Vec<CellEdit>,
    /// Original indices of base rows marked for deletion
    pub deletes: Vec<usize>,
    pub inserts: Vec<RowInsert>,
}

impl GridChanges {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.deletes.is_empty() && self.inserts.is_empty()
    }
}

/// One transactional commit of pending grid changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    pub connection_id: String,
    pub table_name: String,
    /// Primary-key columns used to target updates and deletes.
    /// Key values are read from `original_rows`, never from edited values.
    pub primary_key_columns: Vec<String>,
    pub changes: GridChanges,
    /// Base row snapshots, indexable by original index, for primary-key lookup
    pub original_rows: Vec<Row>,
}

/// Result of a successful commit batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub message: String,
    pub edits_count: usize,
    pub deletes_count: usize,
    pub inserts_count: usize,
}

/// The backing-store mutation executor.
///
/// Implementations translate the batch into whatever the store understands
/// (one SQL transaction, an RPC, ...) and report a single success or failure
/// for the whole batch.
#[async_trait]
pub trait MutationExecutor: Send + Sync {
    async fn commit_changes(&self, request: CommitRequest) -> Result<CommitOutcome>;
}
