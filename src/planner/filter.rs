//! Filter compilation: `FilterSpec` → parameterized predicate.
//!
//! The operand is never turned into query text here; it travels as a bound
//! [`Value`] and the SQL renderer emits a placeholder for it. Adding an
//! operator means adding a [`Condition`] variant and its operand rule below;
//! path resolution and join planning don't change.

use tracing::trace;

use crate::catalog::DataType;
use crate::error::{QueryError, QueryResult};
use crate::planner::join_plan::{JoinNodeId, JoinPlanNode};
use crate::planner::path::ResolvedPath;
use crate::spec::{FilterSpec, Operator};
use crate::value::Value;

/// A column on a planned node: `alias.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub node: JoinNodeId,
    pub alias: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(node: &JoinPlanNode, column: &str) -> Self {
        Self {
            node: node.id,
            alias: node.alias.clone(),
            column: column.to_string(),
        }
    }
}

/// Comparison applied to a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Lt(Value),
    Gt(Value),
    /// Case-sensitive substring match.
    Contains(String),
    IsNull,
    IsNotNull,
}

/// A compiled filter bound to a join alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Dotted path the filter was written against.
    pub path: String,
    pub column: ColumnRef,
    pub condition: Condition,
}

/// Compile `filter` against its resolved path and the node its relationship
/// prefix was joined to.
pub fn compile(
    filter: &FilterSpec,
    resolved: &ResolvedPath<'_>,
    node: &JoinPlanNode,
) -> QueryResult<Predicate> {
    let data_type = resolved.field.data_type;
    let mismatch = |expected: &str| QueryError::OperandTypeMismatch {
        path: filter.path.key(),
        operator: filter.operator.name().to_string(),
        expected: expected.to_string(),
        found: filter.operand.type_name().to_string(),
    };

    if let Value::Bytes(_) = filter.operand {
        return Err(mismatch("a scalar value"));
    }

    let condition = match filter.operator {
        Operator::Null => match filter.operand {
            Value::Bool(true) => Condition::IsNull,
            Value::Bool(false) => Condition::IsNotNull,
            _ => return Err(mismatch("a boolean")),
        },
        Operator::Exactly => Condition::Eq(equality_operand(data_type, &filter.operand, &mismatch)?),
        Operator::Not => Condition::Ne(equality_operand(data_type, &filter.operand, &mismatch)?),
        Operator::LessThan => Condition::Lt(ordered_operand(data_type, &filter.operand, &mismatch)?),
        Operator::GreaterThan => {
            Condition::Gt(ordered_operand(data_type, &filter.operand, &mismatch)?)
        }
        Operator::Contains => {
            if !matches!(data_type, DataType::Text | DataType::Unknown) {
                return Err(mismatch("a text field"));
            }
            match &filter.operand {
                Value::Text(needle) => Condition::Contains(needle.clone()),
                _ => return Err(mismatch("a string")),
            }
        }
    };

    trace!(
        path = %filter.path,
        operator = %filter.operator,
        alias = %node.alias,
        "radhoc.compile.predicate"
    );

    Ok(Predicate {
        path: filter.path.key(),
        column: ColumnRef::new(node, resolved.field.name.as_str()),
        condition,
    })
}

/// Operand for `exactly` / `not`. Scalars compared against a text field are
/// stringified; everything else must match the field type.
fn equality_operand(
    data_type: DataType,
    operand: &Value,
    mismatch: &dyn Fn(&str) -> QueryError,
) -> QueryResult<Value> {
    match (data_type, operand) {
        (_, Value::Null) => Err(mismatch("a non-null value (use 'null: true')")),
        (DataType::Unknown, v) => Ok(v.clone()),
        (DataType::Text, v) => Ok(Value::Text(v.stringify().unwrap_or_default())),
        (DataType::Integer, Value::Int(_)) => Ok(operand.clone()),
        (DataType::Integer, _) => Err(mismatch("an integer")),
        (DataType::Float, Value::Int(_) | Value::Float(_)) => Ok(operand.clone()),
        (DataType::Float, _) => Err(mismatch("a number")),
        (DataType::Boolean, Value::Bool(_)) => Ok(operand.clone()),
        (DataType::Boolean, _) => Err(mismatch("a boolean")),
        (DataType::Timestamp, Value::Text(_) | Value::Int(_)) => Ok(operand.clone()),
        (DataType::Timestamp, _) => Err(mismatch("a timestamp string or integer")),
    }
}

/// Operand for `less_than` / `greater_than`.
fn ordered_operand(
    data_type: DataType,
    operand: &Value,
    mismatch: &dyn Fn(&str) -> QueryError,
) -> QueryResult<Value> {
    if !data_type.is_ordered() {
        return Err(mismatch("an ordered field (number, text or timestamp)"));
    }
    match (data_type, operand) {
        (_, Value::Null | Value::Bool(_)) => Err(mismatch("a number or string")),
        (DataType::Integer | DataType::Float, Value::Int(_) | Value::Float(_)) => {
            Ok(operand.clone())
        }
        (DataType::Integer | DataType::Float, _) => Err(mismatch("a number")),
        (DataType::Text, Value::Text(_)) => Ok(operand.clone()),
        (DataType::Text, _) => Err(mismatch("a string")),
        (DataType::Timestamp, Value::Text(_) | Value::Int(_)) => Ok(operand.clone()),
        (DataType::Timestamp, _) => Err(mismatch("a timestamp string or integer")),
        _ => Ok(operand.clone()),
    }
}
