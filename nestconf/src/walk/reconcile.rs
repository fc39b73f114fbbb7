//! Writes leaf values into a record instance, allocating only the branches
//! that lead to a set leaf.

use tracing::trace;

use super::{NodeId, Storage, Tree};
use crate::error::{ConfigError, ConfigResult};
use crate::schema::{Field, Record};

impl Tree {
    /// Store every set leaf into `root`.
    ///
    /// Each leaf's ancestor chain is collected upward to the root and then
    /// descended. An [`Storage::Absent`] ancestor is allocated with its
    /// default value and marked [`Storage::Present`], so later leaves below
    /// it reuse the same allocation. Branches without a set leaf are left
    /// untouched, as are sibling fields of the branches that are written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFieldType`] when a field rejects the
    /// value offered to it, or [`ConfigError::Unreachable`] when a record's
    /// field accessors disagree with its schema.
    pub fn reconcile(&mut self, root: &mut dyn Field) -> ConfigResult<()> {
        let set: Vec<NodeId> = self
            .leaf_ids()
            .filter(|id| self.get(*id).is_some_and(super::Node::has_value))
            .collect();
        for leaf in set {
            self.write_leaf(leaf, root)?;
        }
        Ok(())
    }

    fn write_leaf(&mut self, leaf: NodeId, root: &mut dyn Field) -> ConfigResult<()> {
        let mut chain: Vec<NodeId> = self.ancestors(leaf).collect();
        chain.reverse();
        let path = self.path(leaf);
        let broken = || ConfigError::Unreachable { path: path.clone() };

        let mut steps = chain.into_iter();
        let Some(root_id) = steps.next() else {
            return Err(broken());
        };
        let mut record: &mut dyn Record = self.materialize(root_id, root).ok_or_else(broken)?;
        for step in steps {
            let name = self.get(step).map(super::Node::field).ok_or_else(broken)?;
            let slot = record.field_mut(name).ok_or_else(broken)?;
            record = self.materialize(step, slot).ok_or_else(broken)?;
        }

        let (name, value) = self
            .get(leaf)
            .and_then(|node| node.value().map(|value| (node.field(), value.clone())))
            .ok_or_else(broken)?;
        let slot = record.field_mut(name).ok_or_else(broken)?;
        slot.assign(value).map_err(|err| ConfigError::UnsupportedFieldType {
            path: path.clone(),
            kind: err.offered,
        })?;
        trace!(path = %path, "leaf written");
        Ok(())
    }

    /// Resolve the record behind `slot`, allocating it on first use.
    fn materialize<'v>(&mut self, id: NodeId, slot: &'v mut dyn Field) -> Option<&'v mut dyn Record> {
        let node = self.nodes.get_mut(id.0)?;
        match node.storage {
            Storage::Absent => {
                trace!(field = node.field, "allocating branch");
                node.storage = Storage::Present;
                slot.allocate()
            }
            Storage::Inline | Storage::Present => slot.as_record_mut(),
        }
    }
}
