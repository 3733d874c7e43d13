//! Query specifications: the parsed, validated form of the input text.
//!
//! ```yaml
//! table: tracks
//! fields:
//!   title:
//!     label: "Name"
//!   album.performer.title:
//! filter:
//!   - album.title:
//!       exactly: "My great album!"
//! ```
//!
//! Parsing rejects malformed shapes up front: unknown keys, invalid paths,
//! filter entries naming more than one path, and unknown operators. Nothing
//! downstream has to re-check the structure.

mod path;

pub use path::FieldPath;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{QueryError, QueryResult};
use crate::value::Value;

/// A filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality.
    Exactly,
    /// Inequality.
    Not,
    LessThan,
    GreaterThan,
    /// Substring match on text fields.
    Contains,
    /// `true` → IS NULL, `false` → IS NOT NULL.
    Null,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Exactly,
        Operator::Not,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::Contains,
        Operator::Null,
    ];

    /// Name as written in a query spec.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Exactly => "exactly",
            Operator::Not => "not",
            Operator::LessThan => "less_than",
            Operator::GreaterThan => "greater_than",
            Operator::Contains => "contains",
            Operator::Null => "null",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested output field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub path: FieldPath,
    /// Caller-supplied display label; wins over the humanized default.
    pub label: Option<String>,
}

/// One filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub path: FieldPath,
    pub operator: Operator,
    pub operand: Value,
}

/// A fully parsed query specification.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Root entity name.
    pub table: String,
    /// Requested fields, in input order.
    pub fields: Vec<FieldSpec>,
    /// Filters, in input order. All of them must hold.
    pub filters: Vec<FilterSpec>,
}

impl QuerySpec {
    pub fn from_yaml(text: &str) -> QueryResult<Self> {
        let raw: RawSpec = serde_yaml::from_str(text)?;
        raw.validate()
    }

    pub fn from_json(text: &str) -> QueryResult<Self> {
        let raw: RawSpec = serde_json::from_str(text)?;
        raw.validate()
    }

    /// Read a spec file; `.json` files are parsed as JSON, everything else
    /// as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> QueryResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            QueryError::Parse(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_yaml(&text),
        }
    }
}

impl FromStr for QuerySpec {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml(s)
    }
}

// ============================================================================
// Wire shape
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpec {
    table: String,
    #[serde(default)]
    fields: Option<IndexMap<String, Option<RawFieldOptions>>>,
    #[serde(default)]
    filter: Option<Vec<IndexMap<String, Option<IndexMap<String, Value>>>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldOptions {
    #[serde(default)]
    label: Option<String>,
}

impl RawSpec {
    fn validate(self) -> QueryResult<QuerySpec> {
        let table = self.table.trim().to_string();
        if table.is_empty() {
            return Err(QueryError::Parse("'table' must not be empty".into()));
        }

        let fields = self
            .fields
            .unwrap_or_default()
            .into_iter()
            .map(|(path, options)| {
                Ok(FieldSpec {
                    path: FieldPath::parse(&path)?,
                    label: options.unwrap_or_default().label,
                })
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let mut filters = Vec::new();
        for (index, entry) in self.filter.unwrap_or_default().into_iter().enumerate() {
            if entry.len() != 1 {
                return Err(QueryError::Parse(format!(
                    "Filter entry {} must name exactly one field path, found {}",
                    index,
                    entry.len()
                )));
            }
            for (path, conditions) in entry {
                let field_path = FieldPath::parse(&path)?;
                let conditions = conditions.unwrap_or_default();
                if conditions.is_empty() {
                    return Err(QueryError::Parse(format!(
                        "Filter on '{}' has no operator",
                        path
                    )));
                }
                for (name, operand) in conditions {
                    let operator = Operator::from_name(&name).ok_or_else(|| {
                        QueryError::UnsupportedOperator {
                            path: path.clone(),
                            operator: name.clone(),
                        }
                    })?;
                    filters.push(FilterSpec {
                        path: field_path.clone(),
                        operator,
                        operand,
                    });
                }
            }
        }

        Ok(QuerySpec {
            table,
            fields,
            filters,
        })
    }
}
