//! Core value and result-set types for Gridstage

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cell value as seen by the data grid.
///
/// This is a closed union: every cell in a `ResultSet` carries exactly one of
/// these tags, and the edit/coercion path only ever produces values of these
/// shapes. Integer and float are distinct tags, but filtering and coercion
/// treat them uniformly as numeric through [`Value::as_f64`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// JSON value (json/jsonb columns)
    Json(serde_json::Value),
    /// Geometry as well-known text (e.g. `POINT(1 2)`)
    Geometry(String),
}

impl Value {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value carries a numeric tag
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Geometry(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Text(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Try to get as f64. Text values that parse as numbers are accepted,
    /// which is what the filter engine's numeric operators rely on.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Json(v) => write!(f, "{}", v),
            Value::Geometry(v) => write!(f, "{}", v),
        }
    }
}

/// A row from a query result
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Column values
    pub values: Vec<Value>,
    /// Column names, parallel to `values`
    columns: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { values, columns }
    }

    /// Create a row with every column set to NULL
    pub fn all_null(columns: Vec<String>) -> Self {
        let values = vec![Value::Null; columns.len()];
        Self { values, columns }
    }

    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Set a value by column name. Returns false if the column doesn't exist.
    pub fn set_by_name(&mut self, name: &str, value: Value) -> bool {
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Get column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Convert to an ordered column -> value map
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

// Rows travel on the wire as ordered JSON objects, matching what the query
// layer hands to the frontend.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = IndexMap::<String, Value>::deserialize(deserializer)?;
        let (columns, values) = map.into_iter().unzip();
        Ok(Self { columns, values })
    }
}

/// Foreign-key reference carried in column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Broad classification of a column's database type.
///
/// Drives which filter operators the UI offers for the column. The filter
/// evaluator itself accepts any operator against any column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Bool,
    Integer,
    Float,
    Text,
    Json,
    Geometry,
    Unknown,
}

impl ColumnType {
    /// Classify a database-specific type name (e.g. `int4`, `varchar`, `jsonb`)
    pub fn from_db_type(data_type: &str) -> Self {
        let t = data_type.to_ascii_lowercase();
        match t.as_str() {
            "bool" | "boolean" | "tinyint(1)" => ColumnType::Bool,
            "int" | "int2" | "int4" | "int8" | "integer" | "smallint" | "bigint" | "tinyint"
            | "mediumint" | "serial" | "bigserial" | "smallserial" => ColumnType::Integer,
            "float4" | "float8" | "real" | "double" | "double precision" | "numeric"
            | "decimal" | "float" | "money" => ColumnType::Float,
            "json" | "jsonb" => ColumnType::Json,
            "geometry" | "geography" | "point" | "polygon" | "linestring" => ColumnType::Geometry,
            _ if t.starts_with("varchar")
                || t.starts_with("char")
                || t.starts_with("text")
                || t.starts_with("enum") =>
            {
                ColumnType::Text
            }
            _ => ColumnType::Unknown,
        }
    }

    /// Whether ordering/range filter operators make sense for this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Column metadata from the query layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name
    pub name: String,
    /// Database-specific type name
    pub data_type: String,
    /// Whether the column can be NULL
    #[serde(default)]
    pub nullable: bool,
    /// Enum values for enum/set columns (feeds the dropdown cell editor)
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
    /// Foreign-key reference, if the column has one
    #[serde(default)]
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            enum_values: None,
            foreign_key: None,
        }
    }

    /// Classified column type derived from `data_type`
    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_db_type(&self.data_type)
    }
}

/// Immutable snapshot of a query or table-view result.
///
/// Created once per load and replaced wholesale on reload, never mutated.
/// All pending user changes live in the overlay, keyed by row indices into
/// this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    /// Unique result ID
    pub id: Uuid,
    /// Column names in display order
    pub columns: Vec<String>,
    /// Per-column metadata, parallel to `columns`
    pub column_meta: Vec<ColumnMeta>,
    /// Base rows
    pub rows: Vec<Row>,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl ResultSet {
    /// Create a new result set
    pub fn new(columns: Vec<String>, column_meta: Vec<ColumnMeta>, rows: Vec<Row>) -> Self {
        Self {
            id: Uuid::new_v4(),
            columns,
            column_meta,
            rows,
            execution_time_ms: 0,
        }
    }

    /// Create an empty result set
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    /// Number of base rows. Original indices `0..base_row_count()` denote
    /// base rows; indices at or above it denote inserted rows.
    pub fn base_row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a base row by original index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Look up column metadata by name
    pub fn column_meta(&self, name: &str) -> Option<&ColumnMeta> {
        self.column_meta.iter().find(|c| c.name == name)
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the result has rows
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}
