//! Dotted field paths: `album.performer.title`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{QueryError, QueryResult};

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A chain of relationship names followed by a terminal field name.
///
/// `title` has no relationships; `album.performer.title` traverses `album`
/// then `performer` and reads `title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    relationships: Vec<String>,
    field: String,
}

impl FieldPath {
    /// Parse a dotted path. Every segment must be an identifier.
    pub fn parse(path: &str) -> QueryResult<Self> {
        let mut segments: Vec<String> = Vec::new();
        for segment in path.split('.') {
            if !SEGMENT.is_match(segment) {
                return Err(QueryError::Parse(format!(
                    "Invalid field path '{}': segment '{}' is not an identifier",
                    path, segment
                )));
            }
            segments.push(segment.to_string());
        }
        // split always yields at least one item, and an empty one fails the regex
        let field = segments.pop().unwrap_or_default();
        Ok(Self {
            relationships: segments,
            field,
        })
    }

    pub fn relationships(&self) -> &[String] {
        &self.relationships
    }

    /// Terminal field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Number of relationship hops.
    pub fn depth(&self) -> usize {
        self.relationships.len()
    }

    /// The dotted form, used as the result key in interpreted mode.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rel in &self.relationships {
            write!(f, "{}.", rel)?;
        }
        f.write_str(&self.field)
    }
}
