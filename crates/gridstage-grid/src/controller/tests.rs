//! End-to-end tests through the grid controller

use std::sync::Mutex;

use super::*;
use crate::filter::FilterOperator;
use crate::test_fixtures::people;
use async_trait::async_trait;
use gridstage_core::CommitRequest;
use pretty_assertions::assert_eq;

struct OkExecutor {
    requests: Mutex<Vec<CommitRequest>>,
}

impl OkExecutor {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MutationExecutor for OkExecutor {
    async fn commit_changes(&self, request: CommitRequest) -> gridstage_core::Result<CommitOutcome> {
        let changes = request.changes.clone();
        self.requests.lock().unwrap().push(request);
        Ok(CommitOutcome {
            message: "committed".into(),
            edits_count: changes.edits.len(),
            deletes_count: changes.deletes.len(),
            inserts_count: changes.inserts.len(),
        })
    }
}

fn controller() -> GridController {
    let mut grid = GridController::new("conn-1");
    grid.load(people());
    grid.set_table(Some("people".into()), vec!["id".into()]);
    grid
}

#[test]
fn test_edit_round_trip_through_the_session() {
    let mut grid = controller();

    // Typing the value already in the cell stages nothing.
    grid.start_edit(1, "name").unwrap();
    grid.set_draft("Beta");
    grid.save_edit().unwrap();
    assert_eq!(grid.pending_count(), 0);

    grid.start_edit(1, "name").unwrap();
    grid.set_draft("C");
    grid.save_edit().unwrap();
    assert_eq!(grid.pending_count(), 1);
    assert_eq!(
        grid.cell_value(1, "name"),
        Some(Value::Text("C".into()))
    );
    let edit = grid.overlay().edits().values().next().unwrap();
    assert_eq!(edit.original_index, 1);
    assert_eq!(edit.column_name, "name");
    assert_eq!(edit.old_value, Value::Text("Beta".into()));
    assert_eq!(edit.new_value, Value::Text("C".into()));
}

#[test]
fn test_switching_cells_saves_the_first_edit() {
    let mut grid = controller();

    grid.start_edit(0, "name").unwrap();
    grid.set_draft("Edited");
    grid.start_edit(2, "name").unwrap();

    assert_eq!(grid.cell_value(0, "name"), Some(Value::Text("Edited".into())));
    assert_eq!(grid.session().editing_cell(), Some((2, "name")));
}

#[test]
fn test_cancel_leaves_no_trace() {
    let mut grid = controller();
    grid.start_edit(0, "name").unwrap();
    grid.set_draft("discarded");
    grid.cancel_edit();
    assert_eq!(grid.pending_count(), 0);
    assert!(!grid.session().is_editing());
}

#[test]
fn test_scroll_and_pagination_save_the_open_editor() {
    let mut grid = controller();
    grid.start_edit(0, "name").unwrap();
    grid.set_draft("Scrolled");
    grid.on_results_scrolled().unwrap();
    assert!(!grid.session().is_editing());
    assert_eq!(grid.cell_value(0, "name"), Some(Value::Text("Scrolled".into())));

    grid.start_edit(2, "name").unwrap();
    grid.set_draft("Paged");
    grid.on_page_changed().unwrap();
    assert!(!grid.session().is_editing());
    assert_eq!(grid.cell_value(2, "name"), Some(Value::Text("Paged".into())));
}

#[test]
fn test_delete_insert_and_display() {
    let mut grid = controller();

    grid.toggle_delete(0).unwrap();
    let insert_index = grid.add_row();
    assert_eq!(insert_index, 3);

    let map = grid.display_map();
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(grid.pending_count(), 2);

    // Toggling again restores the row.
    grid.toggle_delete(0).unwrap();
    assert_eq!(grid.display_map().len(), 4);
    assert!(grid.toggle_delete(99).is_err());
}

#[test]
fn test_filter_intents() {
    let mut grid = controller();
    grid.set_filter(ColumnFilter::new("name", FilterOperator::StartsWith, "al"));
    assert_eq!(grid.display_map().iter().collect::<Vec<_>>(), vec![0]);

    assert!(grid.remove_filter("name"));
    assert_eq!(grid.display_map().len(), 3);

    grid.set_filter(ColumnFilter::new("active", FilterOperator::Equals, "true"));
    grid.clear_filters();
    assert!(grid.filters().is_empty());
}

#[test]
fn test_selection_is_keyed_by_original_index() {
    let mut grid = controller();
    grid.select(2);
    grid.toggle_select(0);
    assert_eq!(grid.selection().len(), 2);

    // Deleting and filtering other rows never disturbs the selection.
    grid.toggle_delete(1).unwrap();
    grid.set_filter(ColumnFilter::new("name", FilterOperator::Equals, "gamma"));
    assert!(grid.selection().contains(&2));
    assert!(grid.selection().contains(&0));

    grid.toggle_select(0);
    grid.deselect(2);
    assert!(grid.selection().is_empty());
}

#[test]
fn test_load_drops_changes_but_keeps_filters() {
    let mut grid = controller();
    grid.start_edit(0, "name").unwrap();
    grid.set_draft("pending");
    grid.save_edit().unwrap();
    grid.select(1);
    grid.set_filter(ColumnFilter::new("name", FilterOperator::Contains, "a"));

    grid.load(people());
    assert_eq!(grid.pending_count(), 0);
    assert!(grid.selection().is_empty());
    assert!(!grid.session().is_editing());
    assert_eq!(grid.filters().len(), 1);
}

#[test]
fn test_reset_discards_everything_pending() {
    let mut grid = controller();
    grid.start_edit(0, "name").unwrap();
    grid.set_draft("pending");
    grid.toggle_delete(1).unwrap();
    grid.add_row();

    grid.reset();
    assert_eq!(grid.pending_count(), 0);
    assert!(!grid.session().is_editing());
}

#[tokio::test]
async fn test_commit_saves_open_editor_and_clears_overlay() {
    let mut grid = controller();
    let executor = OkExecutor::new();

    grid.start_edit(1, "name").unwrap();
    grid.set_draft("C");
    // No explicit save: commit folds the open draft into the batch.
    let outcome = grid.commit(&executor).await.unwrap();
    assert_eq!(outcome.edits_count, 1);
    assert_eq!(grid.pending_count(), 0);
    assert!(!grid.session().is_editing());

    let request = executor.requests.lock().unwrap().pop().unwrap();
    assert_eq!(request.changes.edits[0].new_value, Value::Text("C".into()));
    assert_eq!(request.connection_id, "conn-1");
}

#[tokio::test]
async fn test_commit_without_primary_keys_is_disabled() {
    let mut grid = controller();
    grid.set_table(Some("people".into()), Vec::new());
    grid.start_edit(1, "name").unwrap();
    grid.set_draft("C");
    grid.save_edit().unwrap();

    assert!(!grid.can_commit());
    let executor = OkExecutor::new();
    assert!(grid.commit(&executor).await.is_err());
    assert!(executor.requests.lock().unwrap().is_empty());
    // The overlay survives for when a key becomes available.
    assert_eq!(grid.pending_count(), 1);
}
