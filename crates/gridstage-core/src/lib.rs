//! Gridstage Core - shared foundation for the data grid staging engine
//!
//! This crate provides the types that every other Gridstage crate depends on:
//!
//! - `Value` - closed tagged union of cell scalars
//! - `Row` / `ResultSet` - an immutable query result snapshot
//! - `ColumnMeta` / `ForeignKeyRef` - per-column metadata from the query layer
//! - `MutationExecutor` - the seam to the backing-store mutation executor
//! - `GridError` / `Result` - the crate-wide error type

mod error;
mod mutation;
mod types;

pub use error::*;
pub use mutation::*;
pub use types::*;
