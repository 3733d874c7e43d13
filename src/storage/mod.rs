//! Storage boundary: executing a plan and returning native rows.
//!
//! The engine never talks to a database directly. It hands a finished
//! [`QueryPlan`] to an [`Executor`] and gets back one [`NativeRow`] per
//! result record, values aligned with `plan.selections()`.

mod sqlite;

pub use sqlite::SqliteExecutor;

use crate::error::StorageError;
use crate::planner::QueryPlan;
use crate::value::Value;

/// One result record, values in selection order.
pub type NativeRow = Vec<Value>;

/// Executes query plans against some store.
///
/// Errors are returned as-is to the caller of `run`/`run_raw`. Timeouts or
/// cancellation, if any, belong to the implementation.
pub trait Executor {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<NativeRow>, StorageError>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<NativeRow>, StorageError> {
        (**self).execute(plan)
    }
}
