//! # radhoc
//!
//! A declarative ad-hoc query engine. A query spec names a root table, the
//! fields to return (possibly through chains of associations) and filters:
//!
//! ```yaml
//! table: tracks
//! fields:
//!   title:
//!   album.performer.title:
//!     label: "Performer"
//! filter:
//!   - album.title:
//!       exactly: "My great album!"
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Spec text (YAML / JSON)                     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [spec]
//! ┌─────────────────────────────────────────────────────────┐
//! │      QuerySpec (validated fields + filters)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner] + Catalog
//! ┌─────────────────────────────────────────────────────────┐
//! │  QueryPlan (root, deduplicated joins, selections,        │
//! │             parameterized predicates)                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [storage] Executor (e.g. SQLite via [sql])
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Native rows                             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [shape]
//! ┌─────────────────────────────────────────────────────────┐
//! │   raw rows (column keys)  |  interpreted (path keys +    │
//! │                           |  labels)                     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod shape;
pub mod spec;
pub mod sql;
pub mod storage;
pub mod value;

pub use catalog::{Catalog, InMemoryCatalog};
pub use engine::Engine;
pub use error::{QueryError, QueryResult, StorageError};
pub use planner::QueryPlan;
pub use shape::{InterpretedResult, RawRow};
pub use spec::{FieldPath, Operator, QuerySpec};
pub use sql::{Dialect, JoinType};
pub use storage::{Executor, NativeRow, SqliteExecutor};
pub use value::Value;
