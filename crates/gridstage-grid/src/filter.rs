//! Column filter predicates.
//!
//! A filter set holds at most one predicate per column; a row is visible iff
//! it satisfies every active predicate. Filters only affect visibility -
//! they never mutate the overlay, and a hidden row's pending edits, delete
//! marker, and insert membership all survive until the filter is relaxed.

use gridstage_core::{ColumnType, Value};
use serde::{Deserialize, Serialize};

use crate::coerce::is_empty_value;

/// Filter operators. Wire names are camelCase to match the grid protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Between,
    IsEmpty,
    IsNotEmpty,
}

/// The operators the UI offers for a column of the given type. This is a UI
/// restriction only - the evaluator accepts any operator on any column.
pub fn offered_operators(column_type: ColumnType) -> &'static [FilterOperator] {
    use FilterOperator::*;
    if column_type.is_numeric() {
        &[Equals, GreaterThan, LessThan, Between, IsEmpty, IsNotEmpty]
    } else {
        &[Equals, Contains, StartsWith, EndsWith, IsEmpty, IsNotEmpty]
    }
}

/// One column predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: String,
    /// Upper bound for `between`
    #[serde(default)]
    pub value2: Option<String>,
}

impl ColumnFilter {
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
            value2: None,
        }
    }

    pub fn between(
        column: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: FilterOperator::Between,
            value: low.into(),
            value2: Some(high.into()),
        }
    }

    /// Evaluate this predicate against one cell value.
    ///
    /// Emptiness operators short-circuit before any comparison. For every
    /// other operator a NULL cell is excluded. String operators compare
    /// case-insensitively on the cell's display text; numeric operators are
    /// false whenever the cell or a bound doesn't parse.
    pub fn matches(&self, cell: &Value) -> bool {
        match self.operator {
            FilterOperator::IsEmpty => return is_empty_value(cell),
            FilterOperator::IsNotEmpty => return !is_empty_value(cell),
            _ => {}
        }
        if cell.is_null() {
            return false;
        }
        match self.operator {
            FilterOperator::Equals
            | FilterOperator::Contains
            | FilterOperator::StartsWith
            | FilterOperator::EndsWith => {
                let cell_text = cell.to_string().to_lowercase();
                let needle = self.value.to_lowercase();
                match self.operator {
                    FilterOperator::Equals => cell_text == needle,
                    FilterOperator::Contains => cell_text.contains(&needle),
                    FilterOperator::StartsWith => cell_text.starts_with(&needle),
                    FilterOperator::EndsWith => cell_text.ends_with(&needle),
                    _ => unreachable!(),
                }
            }
            FilterOperator::GreaterThan => match (cell.as_f64(), self.value.trim().parse::<f64>())
            {
                (Some(cell_num), Ok(bound)) => cell_num > bound,
                _ => false,
            },
            FilterOperator::LessThan => match (cell.as_f64(), self.value.trim().parse::<f64>()) {
                (Some(cell_num), Ok(bound)) => cell_num < bound,
                _ => false,
            },
            FilterOperator::Between => {
                let Some(cell_num) = cell.as_f64() else {
                    return false;
                };
                let (Ok(low), Some(Ok(high))) = (
                    self.value.trim().parse::<f64>(),
                    self.value2.as_ref().map(|v| v.trim().parse::<f64>()),
                ) else {
                    return false;
                };
                low <= cell_num && cell_num <= high
            }
            FilterOperator::IsEmpty | FilterOperator::IsNotEmpty => unreachable!(),
        }
    }
}

/// Active filters, at most one per column, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: Vec<ColumnFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the filter for the given column.
    pub fn set(&mut self, filter: ColumnFilter) {
        match self.filters.iter_mut().find(|f| f.column == filter.column) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// Remove the filter for a column, if any. Returns whether one existed.
    pub fn remove(&mut self, column: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.column != column);
        self.filters.len() != before
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.iter().find(|f| f.column == column)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.filters.iter()
    }

    /// Whether a row passes every active filter. `cell_value` resolves a
    /// column name to the row's current (overlay-aware) value; missing
    /// columns resolve to NULL and are excluded by everything but `isEmpty`.
    pub fn matches_row<F>(&self, mut cell_value: F) -> bool
    where
        F: FnMut(&str) -> Value,
    {
        self.filters
            .iter()
            .all(|filter| filter.matches(&cell_value(&filter.column)))
    }
}
