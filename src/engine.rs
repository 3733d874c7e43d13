//! Caller-facing entry points.
//!
//! ```text
//! QuerySpec → compile → QueryPlan → Executor::execute → ResultShaper
//!                                                        ├── run_raw
//!                                                        └── run
//! ```
//!
//! # Example
//!
//! ```ignore
//! use radhoc::{Engine, QuerySpec, SqliteExecutor, catalog::introspect_sqlite};
//!
//! let catalog = introspect_sqlite(&conn)?;
//! let engine = Engine::new(&catalog, SqliteExecutor::new(&conn));
//! let spec = QuerySpec::from_yaml("table: tracks\nfields:\n  album.title:\n")?;
//! let result = engine.run(&spec)?;
//! println!("{}", result.labels["album.title"]);
//! ```

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::LabelSettings;
use crate::error::{QueryError, QueryResult};
use crate::planner::{QueryAssembler, QueryPlan};
use crate::shape::{InterpretedResult, RawRow, ResultShaper};
use crate::spec::QuerySpec;
use crate::storage::{Executor, NativeRow};

/// Compiles specs against an injected catalog and runs them on an executor.
///
/// Holds no per-query state; one engine can serve any number of queries.
pub struct Engine<'c, C: Catalog + ?Sized, E: Executor> {
    catalog: &'c C,
    executor: E,
    labels: LabelSettings,
}

impl<'c, C: Catalog + ?Sized, E: Executor> Engine<'c, C, E> {
    pub fn new(catalog: &'c C, executor: E) -> Self {
        Self {
            catalog,
            executor,
            labels: LabelSettings::default(),
        }
    }

    pub fn with_labels(mut self, labels: LabelSettings) -> Self {
        self.labels = labels;
        self
    }

    /// Parse-free compilation: resolve, plan joins, compile filters,
    /// assemble.
    pub fn compile(&self, spec: &QuerySpec) -> QueryResult<QueryPlan> {
        QueryAssembler::new(self.catalog).assemble(spec)
    }

    /// Rows keyed by native column name, values exactly as stored.
    pub fn run_raw(&self, spec: &QuerySpec) -> QueryResult<Vec<RawRow>> {
        let plan = self.compile(spec)?;
        let rows = self.execute(&plan)?;
        ResultShaper::new(&plan, &self.labels).raw(rows)
    }

    /// Rows keyed by dotted field path, plus a label per field.
    pub fn run(&self, spec: &QuerySpec) -> QueryResult<InterpretedResult> {
        let plan = self.compile(spec)?;
        let rows = self.execute(&plan)?;
        ResultShaper::new(&plan, &self.labels).interpret(rows)
    }

    fn execute(&self, plan: &QueryPlan) -> QueryResult<Vec<NativeRow>> {
        debug!(
            root = %plan.root().entity,
            joins = plan.joins().len(),
            "radhoc.execute.start"
        );
        let rows = self.executor.execute(plan).map_err(QueryError::Storage)?;
        debug!(rows = rows.len(), "radhoc.execute.done");
        Ok(rows)
    }
}
