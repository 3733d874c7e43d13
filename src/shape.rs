//! Result shaping: raw passthrough or interpreted (dotted keys + labels).

use indexmap::IndexMap;
use inflector::Inflector;
use serde::Serialize;

use crate::config::LabelSettings;
use crate::error::{QueryError, QueryResult};
use crate::planner::{QueryPlan, Selection};
use crate::storage::NativeRow;
use crate::value::Value;

/// A raw row: native column name → value.
pub type RawRow = IndexMap<String, Value>;

/// An interpreted row: dotted field path → value.
pub type InterpretedRow = IndexMap<String, Value>;

/// Interpreted result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpretedResult {
    pub data: Vec<InterpretedRow>,
    /// Dotted field path → display label.
    pub labels: IndexMap<String, String>,
}

/// Turns native rows into one of the two caller-facing shapes.
pub struct ResultShaper<'p> {
    plan: &'p QueryPlan,
    labels: &'p LabelSettings,
}

impl<'p> ResultShaper<'p> {
    pub fn new(plan: &'p QueryPlan, labels: &'p LabelSettings) -> Self {
        Self { plan, labels }
    }

    /// Key each value by its native column name, values untouched.
    ///
    /// Two selections sharing a column name collapse to one key holding the
    /// later value, like inserting into any map.
    pub fn raw(&self, rows: Vec<NativeRow>) -> QueryResult<Vec<RawRow>> {
        rows.into_iter()
            .map(|row| {
                self.check_width(&row)?;
                Ok(self
                    .plan
                    .selections()
                    .iter()
                    .map(|s| s.native_name().to_string())
                    .zip(row)
                    .collect())
            })
            .collect()
    }

    /// Key each value by its full dotted path and attach labels.
    pub fn interpret(&self, rows: Vec<NativeRow>) -> QueryResult<InterpretedResult> {
        let keys: Vec<String> = self.plan.selections().iter().map(Selection::key).collect();

        let data = rows
            .into_iter()
            .map(|row| {
                self.check_width(&row)?;
                Ok(keys.iter().cloned().zip(row).collect())
            })
            .collect::<QueryResult<Vec<InterpretedRow>>>()?;

        let labels = self
            .plan
            .selections()
            .iter()
            .map(|s| (s.key(), self.label_for(s)))
            .collect();

        Ok(InterpretedResult { data, labels })
    }

    /// Explicit label verbatim, or the humanized terminal field name.
    pub fn label_for(&self, selection: &Selection) -> String {
        match &selection.label {
            Some(label) => label.clone(),
            None => humanize(selection.path.field(), self.labels.strip_id_suffix),
        }
    }

    fn check_width(&self, row: &NativeRow) -> QueryResult<()> {
        let expected = self.plan.selections().len();
        if row.len() != expected {
            return Err(QueryError::RowShapeMismatch {
                expected,
                found: row.len(),
            });
        }
        Ok(())
    }
}

/// `title` → `Title`, `track_number` → `Track number`, and with
/// `strip_id_suffix`, `album_id` → `Album`.
pub fn humanize(name: &str, strip_id_suffix: bool) -> String {
    let base = match name.strip_suffix("_id") {
        Some(stem) if strip_id_suffix && !stem.is_empty() => stem,
        _ => name,
    };
    base.to_sentence_case()
}
