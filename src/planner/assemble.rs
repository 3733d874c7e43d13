//! Query assembly: spec + catalog → immutable [`QueryPlan`].

use tracing::debug;

use crate::catalog::{Catalog, DataType};
use crate::error::{QueryError, QueryResult};
use crate::planner::filter::{self, ColumnRef, Predicate};
use crate::planner::join_plan::{JoinPlan, JoinPlanNode};
use crate::planner::path::{PathResolver, ResolvedPath};
use crate::spec::{FieldPath, QuerySpec};

/// A selected output column.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub path: FieldPath,
    pub column: ColumnRef,
    pub data_type: DataType,
    /// Explicit label from the spec.
    pub label: Option<String>,
}

impl Selection {
    /// Dotted path key used in interpreted results.
    pub fn key(&self) -> String {
        self.path.key()
    }

    /// Storage-native column name used in raw results.
    pub fn native_name(&self) -> &str {
        &self.column.column
    }
}

/// The unit handed to a storage executor.
///
/// Immutable once assembled: everything is exposed read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    joins: JoinPlan,
    selections: Vec<Selection>,
    predicates: Vec<Predicate>,
}

impl QueryPlan {
    /// Root node (entity, table, alias).
    pub fn root(&self) -> &JoinPlanNode {
        self.joins.root()
    }

    pub fn join_plan(&self) -> &JoinPlan {
        &self.joins
    }

    /// Joins in creation order; a parent always precedes its children.
    pub fn joins(&self) -> &[JoinPlanNode] {
        self.joins.joins()
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Predicates, all of which must hold.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

/// Combines path resolution, join planning and filter compilation.
pub struct QueryAssembler<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    resolver: PathResolver<'c, C>,
}

impl<'c, C: Catalog + ?Sized> QueryAssembler<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            resolver: PathResolver::new(catalog),
        }
    }

    /// Build the plan for `spec`.
    ///
    /// Fields are planned before filters, so aliases follow field order and
    /// filters reuse any join a field already introduced.
    pub fn assemble(&self, spec: &QuerySpec) -> QueryResult<QueryPlan> {
        if spec.fields.is_empty() {
            return Err(QueryError::EmptyFieldList);
        }

        let root = self.resolver.root(&spec.table)?;
        let mut joins = JoinPlan::new(root);

        let mut selections = Vec::with_capacity(spec.fields.len());
        for field in &spec.fields {
            let resolved = self.resolver.resolve(&spec.table, &field.path)?;
            let node = self.plan_node(&mut joins, &resolved);
            selections.push(Selection {
                path: field.path.clone(),
                column: ColumnRef::new(node, &resolved.field.name),
                data_type: resolved.field.data_type,
                label: field.label.clone(),
            });
        }

        let mut predicates = Vec::with_capacity(spec.filters.len());
        for spec_filter in &spec.filters {
            let resolved = self.resolver.resolve(&spec.table, &spec_filter.path)?;
            let node = self.plan_node(&mut joins, &resolved);
            predicates.push(filter::compile(spec_filter, &resolved, node)?);
        }

        debug!(
            root = %spec.table,
            joins = joins.join_count(),
            selections = selections.len(),
            predicates = predicates.len(),
            "radhoc.compile.assembled"
        );

        Ok(QueryPlan {
            joins,
            selections,
            predicates,
        })
    }

    fn plan_node<'p>(&self, joins: &'p mut JoinPlan, resolved: &ResolvedPath<'c>) -> &'p JoinPlanNode {
        let catalog = self.catalog;
        let id = joins.join(resolved.hops.iter().copied(), |entity| {
            catalog
                .entity(entity)
                .map(|e| e.table_name().to_string())
                .unwrap_or_else(|| entity.to_string())
        });
        joins.node(id)
    }
}
