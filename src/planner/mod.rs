//! Query planner - compiles a `QuerySpec` into a `QueryPlan`.
//!
//! Straight-line pipeline, first failure wins:
//! 1. Path resolution: dotted path → relationship hops + terminal field
//! 2. Join planning: hops → deduplicated prefix-tree nodes with aliases
//! 3. Filter compilation: filter → parameterized predicate on a node alias
//! 4. Assembly: root + joins + selections + predicates → `QueryPlan`

pub mod assemble;
pub mod filter;
pub mod join_plan;
pub mod path;

pub use assemble::{QueryAssembler, QueryPlan, Selection};
pub use filter::{ColumnRef, Condition, Predicate};
pub use join_plan::{JoinNodeId, JoinPlan, JoinPlanNode};
pub use path::{PathResolver, ResolvedPath};
