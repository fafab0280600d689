//! Commit reconciliation: turning the overlay into one mutation batch.
//!
//! A commit is only possible with a table name and a non-empty primary-key
//! column list - without them the action is disabled outright, never
//! attempted best-effort. The batch is built from the overlay (edits keyed
//! by original row snapshots, base-row deletes, live inserts) and handed to
//! the external executor as a single all-or-nothing unit. On success the
//! overlay is cleared; on failure it is left verbatim for retry. A response
//! that lands after the overlay was manually reset is recognized by epoch
//! and discarded instead of re-applied.

use gridstage_core::{
    CommitOutcome, CommitRequest, GridChanges, GridError, MutationExecutor, Result, ResultSet,
};

use crate::overlay::ChangeOverlay;

/// What the reconciler needs to know about the commit target
#[derive(Debug, Clone, Default)]
pub struct CommitConfig {
    pub connection_id: String,
    /// Commit target; `None` for ad-hoc query results, which cannot commit
    pub table_name: Option<String>,
    /// Primary-key columns used to target updates and deletes
    pub primary_key_columns: Vec<String>,
}

impl CommitConfig {
    pub fn new(connection_id: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            table_name: None,
            primary_key_columns: Vec::new(),
        }
    }

    pub fn with_table(
        mut self,
        table_name: impl Into<String>,
        primary_key_columns: Vec<String>,
    ) -> Self {
        self.table_name = Some(table_name.into());
        self.primary_key_columns = primary_key_columns;
        self
    }

    /// Whether a commit target is fully configured
    pub fn is_commit_ready(&self) -> bool {
        self.table_name.is_some() && !self.primary_key_columns.is_empty()
    }
}

/// Whether the commit affordance should be enabled at all
pub fn can_commit(config: &CommitConfig, overlay: &ChangeOverlay) -> bool {
    config.is_commit_ready() && overlay.is_dirty()
}

/// A built batch awaiting its executor response
#[derive(Debug, Clone)]
pub struct PendingCommit {
    pub request: CommitRequest,
    /// Overlay epoch captured at build time; a mismatch when the response
    /// arrives means the overlay was reset mid-flight
    epoch: u64,
}

/// Build the mutation batch from the current overlay.
///
/// Fails fast on a missing table name or empty primary-key list without
/// touching the executor, and on an empty overlay. Primary-key values are
/// resolved by the executor from `original_rows` - the unedited snapshots -
/// never from values the user just changed. A deleted insert row
/// contributes nothing: its insert is dropped from the batch and no delete
/// record is sent.
pub fn prepare_commit(
    base: &ResultSet,
    overlay: &ChangeOverlay,
    config: &CommitConfig,
) -> Result<PendingCommit> {
    let table_name = config
        .table_name
        .clone()
        .ok_or_else(|| GridError::Configuration("no table name to commit to".into()))?;
    if config.primary_key_columns.is_empty() {
        return Err(GridError::Configuration(
            "cannot commit without primary key columns".into(),
        ));
    }
    if !overlay.is_dirty() {
        return Err(GridError::Commit("no pending changes to commit".into()));
    }

    let base_count = base.base_row_count();
    let changes = GridChanges {
        edits: overlay.edits().values().cloned().collect(),
        deletes: overlay
            .deletes()
            .iter()
            .copied()
            .filter(|&index| index < base_count)
            .collect(),
        inserts: overlay
            .inserts()
            .iter()
            .enumerate()
            .filter(|(position, _)| !overlay.is_deleted(base_count + position))
            .map(|(_, insert)| insert.clone())
            .collect(),
    };

    tracing::debug!(
        table = %table_name,
        edits = changes.edits.len(),
        deletes = changes.deletes.len(),
        inserts = changes.inserts.len(),
        "prepared commit batch"
    );

    Ok(PendingCommit {
        request: CommitRequest {
            connection_id: config.connection_id.clone(),
            table_name,
            primary_key_columns: config.primary_key_columns.clone(),
            changes,
            original_rows: base.rows.clone(),
        },
        epoch: overlay.epoch(),
    })
}

impl PendingCommit {
    /// Apply the executor's response to the overlay.
    ///
    /// Success clears the overlay - unless its epoch moved on (a manual
    /// reset happened while the commit was in flight), in which case the
    /// response is logged and discarded. Failure leaves the overlay
    /// byte-for-byte untouched and surfaces one commit error.
    pub fn apply(
        self,
        response: Result<CommitOutcome>,
        overlay: &mut ChangeOverlay,
    ) -> Result<CommitOutcome> {
        match response {
            Ok(outcome) => {
                if overlay.epoch() != self.epoch {
                    tracing::warn!(
                        "commit response arrived after overlay reset; outcome discarded"
                    );
                    return Ok(outcome);
                }
                tracing::info!(
                    edits = outcome.edits_count,
                    deletes = outcome.deletes_count,
                    inserts = outcome.inserts_count,
                    "commit succeeded"
                );
                overlay.reset();
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(error = %err, "commit failed; overlay retained for retry");
                Err(GridError::Commit(err.to_string()))
            }
        }
    }
}

/// Build, send, and apply one commit batch.
///
/// The overlay is not locked while the call is in flight; callers driving
/// an event loop should use [`prepare_commit`] / [`PendingCommit::apply`]
/// directly and may keep editing in between.
pub async fn commit(
    executor: &dyn MutationExecutor,
    base: &ResultSet,
    overlay: &mut ChangeOverlay,
    config: &CommitConfig,
) -> Result<CommitOutcome> {
    let pending = prepare_commit(base, overlay, config)?;
    let response = executor.commit_changes(pending.request.clone()).await;
    pending.apply(response, overlay)
}
