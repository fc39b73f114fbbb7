//! Detection of record types that contain themselves.
//!
//! The check is deliberately coarse: a type that appears among its own
//! ancestors is rejected even when the recursive field is optional and a
//! concrete instance would terminate.

use super::{Node, NodeId, Tree};
use crate::error::ConfigError;

/// A record type found among its own ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// The ancestor carrying the first occurrence of the type.
    pub ancestor: NodeId,
    /// The node repeating it.
    pub node: NodeId,
    /// Rust name of the recurring type.
    pub type_name: &'static str,
}

impl Tree {
    /// Find the first node, in breadth-first order, whose record type recurs
    /// among its ancestors.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Cycle> {
        self.nodes.iter().enumerate().find_map(|(index, node)| {
            let record = node.record_type()?;
            let id = NodeId(index);
            self.ancestors(id)
                .find(|ancestor| self.get(*ancestor).and_then(Node::record_type) == Some(record))
                .map(|ancestor| Cycle {
                    ancestor,
                    node: id,
                    type_name: type_name_of(node),
                })
        })
    }

    /// Whether any record type recurs among its own ancestors.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Fail with [`ConfigError::Cycle`] when the schema is self-referential.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cycle`] describing the first cycle found.
    pub fn ensure_acyclic(&self) -> Result<(), ConfigError> {
        match self.find_cycle() {
            None => Ok(()),
            Some(cycle) => Err(ConfigError::Cycle {
                path: format!("{} -> {}", self.path(cycle.ancestor), self.path(cycle.node)),
                type_name: cycle.type_name,
            }),
        }
    }
}

fn type_name_of(node: &Node) -> &'static str {
    match node.kind {
        super::NodeKind::Interior(record) => record.type_name(),
        super::NodeKind::Leaf(_) | super::NodeKind::Skipped(_) => "",
    }
}
