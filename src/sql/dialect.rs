//! SQL dialect differences that matter for rendered plans.
//!
//! | Dialect  | Identifier quote | Placeholder |
//! |----------|------------------|-------------|
//! | SQLite   | `"ident"`        | `?`         |
//! | Postgres | `"ident"`        | `$1`, `$2`  |
//! | MySQL    | `` `ident` ``    | `?`         |
//! | DuckDB   | `"ident"`        | `?`         |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    Postgres,
    MySql,
    DuckDb,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Sqlite,
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::DuckDb,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::DuckDb => "duckdb",
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote_identifier(&self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
            Dialect::Sqlite | Dialect::Postgres | Dialect::DuckDb => {
                format!("\"{}\"", ident.replace('"', "\"\""))
            }
        }
    }

    /// Placeholder for the `index`-th bound parameter (1-based).
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite | Dialect::MySql | Dialect::DuckDb => "?".to_string(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "duckdb" => Ok(Dialect::DuckDb),
            other => Err(format!("Unknown dialect: {}", other)),
        }
    }
}
