//! Tests for the pending-change overlay

use super::*;
use crate::test_fixtures::people;
use pretty_assertions::assert_eq;

#[test]
fn test_edit_to_same_value_leaves_no_entry() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 1, "name", Value::Text("Beta".into()))
        .unwrap();
    assert!(overlay.edits().is_empty());
    assert_eq!(overlay.pending_count(), 0);
}

#[test]
fn test_edit_records_old_and_new_value() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 1, "name", Value::Text("C".into()))
        .unwrap();
    assert_eq!(overlay.edits().len(), 1);
    let edit = overlay.edits().get(&EditKey::new(1, "name")).unwrap();
    assert_eq!(edit.original_index, 1);
    assert_eq!(edit.column_name, "name");
    assert_eq!(edit.old_value, Value::Text("Beta".into()));
    assert_eq!(edit.new_value, Value::Text("C".into()));
}

#[test]
fn test_edit_reverted_to_base_value_is_removed() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 0, "name", Value::Text("Omega".into()))
        .unwrap();
    assert_eq!(overlay.edits().len(), 1);

    overlay
        .set_edit(&base, 0, "name", Value::Text("Alpha".into()))
        .unwrap();
    assert!(overlay.edits().is_empty());
}

#[test]
fn test_repeated_edits_keep_original_old_value() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 0, "name", Value::Text("X".into()))
        .unwrap();
    overlay
        .set_edit(&base, 0, "name", Value::Text("Y".into()))
        .unwrap();

    let edit = overlay.edits().get(&EditKey::new(0, "name")).unwrap();
    assert_eq!(edit.old_value, Value::Text("Alpha".into()));
    assert_eq!(edit.new_value, Value::Text("Y".into()));
}

#[test]
fn test_edit_on_insert_row_writes_through() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    let index = overlay.insert_row(&base);
    assert_eq!(index, 3);

    overlay
        .set_edit(&base, index, "name", Value::Text("New".into()))
        .unwrap();
    // Inserts are wholly pending; no CellEdit entry is created.
    assert!(overlay.edits().is_empty());
    assert_eq!(
        overlay.inserts()[0].row_data.get_by_name("name"),
        Some(&Value::Text("New".into()))
    );
}

#[test]
fn test_delete_and_restore_keep_edits_intact() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 1, "name", Value::Text("C".into()))
        .unwrap();
    overlay.mark_deleted(1);
    assert!(overlay.is_deleted(1));
    assert_eq!(overlay.edits().len(), 1);

    overlay.restore(1);
    assert!(!overlay.is_deleted(1));
    assert_eq!(
        overlay.effective_value(&base, 1, "name"),
        Some(Value::Text("C".into()))
    );
}

#[test]
fn test_insert_indices_are_never_renumbered() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    let first = overlay.insert_row(&base);
    overlay.mark_deleted(0);
    overlay.mark_deleted(first);
    let second = overlay.insert_row(&base);

    assert_eq!(first, 3);
    assert_eq!(second, 4);
    overlay.restore(first);
    assert_eq!(
        overlay.effective_value(&base, first, "id"),
        Some(Value::Null)
    );
}

#[test]
fn test_pending_count_sums_all_change_kinds() {
    let base = people();
    let mut overlay = ChangeOverlay::new();
    assert!(!overlay.is_dirty());

    overlay
        .set_edit(&base, 0, "name", Value::Text("X".into()))
        .unwrap();
    overlay.mark_deleted(1);
    overlay.insert_row(&base);
    assert_eq!(overlay.pending_count(), 3);
    assert!(overlay.is_dirty());

    overlay.reset();
    assert_eq!(overlay.pending_count(), 0);
    assert!(overlay.edits().is_empty());
    assert!(overlay.deletes().is_empty());
    assert!(overlay.inserts().is_empty());
}

#[test]
fn test_reset_bumps_epoch() {
    let mut overlay = ChangeOverlay::new();
    let before = overlay.epoch();
    overlay.reset();
    assert_eq!(overlay.epoch(), before + 1);
}

#[test]
fn test_effective_value_prefers_pending_edit() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    assert_eq!(
        overlay.effective_value(&base, 0, "name"),
        Some(Value::Text("Alpha".into()))
    );
    overlay
        .set_edit(&base, 0, "name", Value::Text("Edited".into()))
        .unwrap();
    assert_eq!(
        overlay.effective_value(&base, 0, "name"),
        Some(Value::Text("Edited".into()))
    );
    assert_eq!(overlay.effective_value(&base, 0, "missing"), None);
    assert_eq!(overlay.effective_value(&base, 99, "name"), None);
}

#[test]
fn test_materialize_row_applies_edits() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 2, "score", Value::Float(9.0))
        .unwrap();
    let row = overlay.materialize_row(&base, 2).unwrap();
    assert_eq!(row.get_by_name("score"), Some(&Value::Float(9.0)));
    assert_eq!(row.get_by_name("name"), Some(&Value::Text("Gamma".into())));
}

#[test]
fn test_set_edit_bounds_and_column_errors() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    assert!(matches!(
        overlay.set_edit(&base, 99, "name", Value::Null),
        Err(GridError::RowOutOfBounds(99))
    ));
    assert!(matches!(
        overlay.set_edit(&base, 0, "nope", Value::Null),
        Err(GridError::ColumnNotFound(_))
    ));
}

#[test]
fn test_wire_shape_round_trip() {
    let base = people();
    let mut overlay = ChangeOverlay::new();

    overlay
        .set_edit(&base, 1, "name", Value::Text("C".into()))
        .unwrap();
    overlay.mark_deleted(0);
    overlay.insert_row(&base);

    let json = serde_json::to_value(&overlay).unwrap();
    // Edits are keyed "{index}-{column}"; deletes are a set of integers;
    // inserts carry temp_id and an ordered row_data object.
    assert!(json["edits"]["1-name"].is_object());
    assert_eq!(json["edits"]["1-name"]["original_index"], 1);
    assert_eq!(json["deletes"], serde_json::json!([0]));
    assert!(json["inserts"][0]["temp_id"].is_string());
    assert!(json["inserts"][0]["row_data"]["id"].is_object());

    let back: ChangeOverlay = serde_json::from_value(json).unwrap();
    assert_eq!(back, overlay);
}

#[test]
fn test_edit_key_parsing_tolerates_hyphenated_columns() {
    let key = EditKey::new(7, "created-at");
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, "\"7-created-at\"");
    let back: EditKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}
