//! SQL generation for query plans.
//!
//! - [`dialect`] - identifier quoting and placeholder style per dialect
//! - [`render`] - `QueryPlan` → `SqlStatement { sql, params }`
//!
//! Rendering is the only place query text is produced. Operand values are
//! always bound parameters; the only identifiers emitted come from the
//! catalog or from validated path segments, and are quoted.

pub mod dialect;
pub mod render;


pub use dialect::Dialect;
pub use render::{render, JoinType, SqlStatement};
