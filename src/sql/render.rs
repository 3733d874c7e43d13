//! Render a [`QueryPlan`] as parameterized SQL.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;
use crate::planner::{ColumnRef, Condition, JoinPlanNode, QueryPlan};
use crate::value::Value;

/// Join flavour used for every relationship hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    /// Rows missing an associated record are dropped.
    #[default]
    Inner,
    /// Rows missing an associated record keep NULLs for its columns.
    Left,
}

impl JoinType {
    fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Render `plan` for `dialect`.
///
/// Operands are only ever bound as parameters; identifiers are quoted.
pub fn render(plan: &QueryPlan, dialect: Dialect, join_type: JoinType) -> SqlStatement {
    let mut out = Renderer {
        dialect,
        sql: String::new(),
        params: Vec::new(),
    };

    out.sql.push_str("SELECT ");
    for (i, selection) in plan.selections().iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.column(&selection.column);
    }

    let root = plan.root();
    let _ = write!(
        out.sql,
        " FROM {} AS {}",
        dialect.quote_identifier(&root.table),
        dialect.quote_identifier(&root.alias)
    );

    for node in plan.joins() {
        out.join(plan, node, join_type);
    }

    for (i, predicate) in plan.predicates().iter().enumerate() {
        out.sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        let column = &predicate.column;
        match &predicate.condition {
            Condition::Eq(v) => out.compare(column, "=", v),
            Condition::Ne(v) => out.compare(column, "<>", v),
            Condition::Lt(v) => out.compare(column, "<", v),
            Condition::Gt(v) => out.compare(column, ">", v),
            Condition::Contains(needle) => out.contains(column, needle),
            Condition::IsNull => {
                out.column(column);
                out.sql.push_str(" IS NULL");
            }
            Condition::IsNotNull => {
                out.column(column);
                out.sql.push_str(" IS NOT NULL");
            }
        }
    }

    SqlStatement {
        sql: out.sql,
        params: out.params,
    }
}

struct Renderer {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
}

impl Renderer {
    fn column(&mut self, column: &ColumnRef) {
        self.qualified(&column.alias, &column.column);
    }

    fn qualified(&mut self, alias: &str, column: &str) {
        let _ = write!(
            self.sql,
            "{}.{}",
            self.dialect.quote_identifier(alias),
            self.dialect.quote_identifier(column)
        );
    }

    fn join(&mut self, plan: &QueryPlan, node: &JoinPlanNode, join_type: JoinType) {
        let (Some(parent), Some(edge)) = (node.parent, node.edge.as_ref()) else {
            return;
        };
        let parent = plan.join_plan().node(parent);
        let _ = write!(
            self.sql,
            " {} {} AS {} ON ",
            join_type.keyword(),
            self.dialect.quote_identifier(&node.table),
            self.dialect.quote_identifier(&node.alias)
        );
        self.qualified(&node.alias, &edge.join_key.target_column);
        self.sql.push_str(" = ");
        self.qualified(&parent.alias, &edge.join_key.source_column);
    }

    /// Case-sensitive substring test, the same on every dialect.
    fn contains(&mut self, column: &ColumnRef, needle: &str) {
        match self.dialect {
            Dialect::Sqlite | Dialect::DuckDb => {
                self.sql.push_str("instr(");
                self.column(column);
            }
            Dialect::Postgres => {
                self.sql.push_str("strpos(");
                self.column(column);
            }
            Dialect::MySql => {
                self.sql.push_str("INSTR(CAST(");
                self.column(column);
                self.sql.push_str(" AS BINARY)");
            }
        }
        self.sql.push_str(", ");
        self.bind(Value::Text(needle.to_string()));
        self.sql.push_str(") > 0");
    }

    fn compare(&mut self, column: &ColumnRef, op: &str, value: &Value) {
        self.column(column);
        let _ = write!(self.sql, " {} ", op);
        self.bind(value.clone());
    }

    fn bind(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }
}
