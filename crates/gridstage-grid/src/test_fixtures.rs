//! Shared fixtures for grid tests

use gridstage_core::{ColumnMeta, ResultSet, Row, Value};

pub fn columns() -> Vec<String> {
    vec!["id".into(), "name".into(), "score".into(), "active".into()]
}

pub fn person(id: i64, name: &str, score: Value, active: bool) -> Row {
    Row::new(
        columns(),
        vec![
            Value::Int(id),
            Value::Text(name.into()),
            score,
            Value::Bool(active),
        ],
    )
}

/// Three-row people table: Alpha(10.5), Beta(NULL score), Gamma(7.0)
pub fn people() -> ResultSet {
    ResultSet::new(
        columns(),
        vec![
            ColumnMeta::new("id", "int4"),
            ColumnMeta::new("name", "varchar(64)"),
            ColumnMeta::new("score", "numeric"),
            ColumnMeta::new("active", "boolean"),
        ],
        vec![
            person(1, "Alpha", Value::Float(10.5), true),
            person(2, "Beta", Value::Null, false),
            person(3, "Gamma", Value::Float(7.0), true),
        ],
    )
}
