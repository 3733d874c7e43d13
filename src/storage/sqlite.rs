//! SQLite executor backed by `rusqlite`.

use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::debug;

use super::{Executor, NativeRow};
use crate::catalog::DataType;
use crate::error::StorageError;
use crate::planner::QueryPlan;
use crate::sql::{render, Dialect, JoinType};
use crate::value::Value;

/// Runs plans on a borrowed SQLite connection.
pub struct SqliteExecutor<'a> {
    conn: &'a Connection,
    join_type: JoinType,
}

impl<'a> SqliteExecutor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            join_type: JoinType::default(),
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }
}

impl Executor for SqliteExecutor<'_> {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<NativeRow>, StorageError> {
        let statement = render(plan, Dialect::Sqlite, self.join_type);
        debug!(sql = %statement.sql, params = statement.params.len(), "radhoc.execute.sqlite");

        let types: Vec<DataType> = plan.selections().iter().map(|s| s.data_type).collect();
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let rows = stmt
            .query_map(params_from_iter(statement.params.iter()), |row| {
                types
                    .iter()
                    .enumerate()
                    .map(|(i, data_type)| Ok(from_storage(row.get(i)?, *data_type)))
                    .collect::<rusqlite::Result<NativeRow>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(rows = rows.len(), "radhoc.execute.sqlite.done");
        Ok(rows)
    }
}

/// SQLite has no boolean storage class; booleans come back as 0/1.
fn from_storage(value: Value, data_type: DataType) -> Value {
    match (data_type, value) {
        (DataType::Boolean, Value::Int(i)) => Value::Bool(i != 0),
        (_, value) => value,
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use rusqlite::types::Value as Sql;
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(Sql::Null),
            Value::Bool(b) => ToSqlOutput::Owned(Sql::Integer(i64::from(*b))),
            Value::Int(i) => ToSqlOutput::Owned(Sql::Integer(*i)),
            Value::Float(x) => ToSqlOutput::Owned(Sql::Real(*x)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bytes(bytes) => ToSqlOutput::Borrowed(ValueRef::Blob(bytes)),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Int(i),
            ValueRef::Real(x) => Value::Float(x),
            ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
        })
    }
}
