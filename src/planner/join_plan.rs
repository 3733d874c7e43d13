//! Join deduplication as a prefix tree.
//!
//! Every node stands for one relationship-name prefix reached from the root
//! (`[]`, `[album]`, `[album, performer]`, ...). Nodes live in an arena and
//! are indexed by `(parent, relationship name)`, so asking for a prefix that
//! was already seen returns the existing node and a longer prefix grows from
//! its nearest existing ancestor.
//!
//! ```text
//! t0 tracks
//! └── album → t1 albums
//!     ├── performer → t2 performers
//!     └── label     → t3 labels
//! ```
//!
//! Aliases are assigned in creation order (`t0` is the root), which keeps
//! generated queries stable for a given field/filter order.

use std::collections::HashMap;

use tracing::trace;

use crate::catalog::{Cardinality, EntityDef, RelationshipEdge};

/// Index of a node in a [`JoinPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinNodeId(usize);

impl JoinNodeId {
    pub const ROOT: JoinNodeId = JoinNodeId(0);
}

/// One deduplicated join (or the root scan).
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlanNode {
    pub id: JoinNodeId,
    /// `None` for the root.
    pub parent: Option<JoinNodeId>,
    /// Edge traversed from the parent; `None` for the root.
    pub edge: Option<RelationshipEdge>,
    pub entity: String,
    pub table: String,
    pub alias: String,
    /// Relationship names from the root to this node.
    pub prefix: Vec<String>,
}

impl JoinPlanNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Dotted relationship prefix, empty for the root.
    pub fn prefix_key(&self) -> String {
        self.prefix.join(".")
    }
}

/// Arena-backed prefix tree of joins.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan {
    nodes: Vec<JoinPlanNode>,
    children: HashMap<(JoinNodeId, String), JoinNodeId>,
}

impl JoinPlan {
    /// Start a plan rooted at `root`.
    pub fn new(root: &EntityDef) -> Self {
        Self {
            nodes: vec![JoinPlanNode {
                id: JoinNodeId::ROOT,
                parent: None,
                edge: None,
                entity: root.name.clone(),
                table: root.table_name().to_string(),
                alias: alias_for(JoinNodeId::ROOT),
                prefix: Vec::new(),
            }],
            children: HashMap::new(),
        }
    }

    /// Return the node reached by walking `hops` from the root, creating the
    /// nodes that don't exist yet.
    ///
    /// `target_table` maps a hop's target entity to its physical table name.
    pub fn join<'e, I>(
        &mut self,
        hops: I,
        mut target_table: impl FnMut(&str) -> String,
    ) -> JoinNodeId
    where
        I: IntoIterator<Item = &'e RelationshipEdge>,
    {
        let mut current = JoinNodeId::ROOT;
        for edge in hops {
            let key = (current, edge.name.clone());
            current = match self.children.get(&key) {
                Some(&existing) => existing,
                None => {
                    let id = JoinNodeId(self.nodes.len());
                    let mut prefix = self.nodes[current.0].prefix.clone();
                    prefix.push(edge.name.clone());
                    trace!(
                        alias = %alias_for(id),
                        prefix = %prefix.join("."),
                        target = %edge.target,
                        "radhoc.compile.join_node"
                    );
                    self.nodes.push(JoinPlanNode {
                        id,
                        parent: Some(current),
                        edge: Some(edge.clone()),
                        entity: edge.target.clone(),
                        table: target_table(&edge.target),
                        alias: alias_for(id),
                        prefix,
                    });
                    self.children.insert(key, id);
                    id
                }
            };
        }
        current
    }

    pub fn root(&self) -> &JoinPlanNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: JoinNodeId) -> &JoinPlanNode {
        &self.nodes[id.0]
    }

    /// Find the node for a relationship-name prefix, if it was planned.
    pub fn find(&self, prefix: &[String]) -> Option<&JoinPlanNode> {
        let mut current = JoinNodeId::ROOT;
        for rel in prefix {
            current = *self.children.get(&(current, rel.clone()))?;
        }
        Some(self.node(current))
    }

    /// Non-root nodes in creation order. A parent always precedes its
    /// children.
    pub fn joins(&self) -> &[JoinPlanNode] {
        &self.nodes[1..]
    }

    pub fn join_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether any join can multiply root rows.
    pub fn fans_out(&self) -> bool {
        self.joins().iter().any(|node| {
            node.edge
                .as_ref()
                .is_some_and(|edge| edge.cardinality == Cardinality::Many)
        })
    }
}

fn alias_for(id: JoinNodeId) -> String {
    format!("t{}", id.0)
}
