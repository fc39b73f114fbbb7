//! Breadth-first flattening of a record schema into a node tree.
//!
//! A [`Tree`] holds one [`Node`] per reachable field plus a synthetic root.
//! Nodes live in a flat vector and refer to their parent by [`NodeId`], so
//! the tree has a single owner and parent links carry no lifetimes.

use std::any::TypeId;
use std::collections::{BTreeMap, HashSet, VecDeque};

use tracing::trace;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{Describe, Field, FieldSchema, Record, RecordRef, Shape, ShapeKind, Tag};
use crate::value::{ParseScalarError, ScalarKind, ScalarValue};

mod cycle;
mod reconcile;

pub use cycle::Cycle;

/// Field name given to the synthetic root node.
pub const ROOT_FIELD: &str = "root";

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in breadth-first order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Role a node plays in loading.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind {
    /// Primitive value filled by sources.
    Leaf(ScalarKind),
    /// Nested record whose fields were expanded.
    Interior(RecordRef),
    /// A field the loader ignores, with the reason.
    Skipped(&'static str),
}

/// Allocation state of an interior node's record storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Behind an `Option` that is currently `None`; allocated on first write.
    Absent,
    /// Stored inline in its parent, so it exists whenever the parent does.
    Inline,
    /// Behind an `Option` that is `Some`, either supplied by the caller or
    /// allocated during reconciliation.
    Present,
}

/// Ordered key fragments per [`Tag`], read from the root to this node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceKeys(BTreeMap<Tag, Vec<&'static str>>);

impl SourceKeys {
    /// Fragments for `tag`; empty for the root.
    #[must_use]
    pub fn fragments(&self, tag: Tag) -> &[&'static str] {
        self.0.get(&tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Fragments for `tag` joined with `separator`.
    #[must_use]
    pub fn joined(&self, tag: Tag, separator: &str) -> String {
        self.fragments(tag).join(separator)
    }

    fn child(&self, field: &FieldSchema) -> Self {
        let mut keys = BTreeMap::new();
        for tag in Tag::ALL {
            let mut fragments = self.fragments(tag).to_vec();
            fragments.push(field.fragment(tag));
            keys.insert(tag, fragments);
        }
        Self(keys)
    }
}

/// One reachable field.
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    field: &'static str,
    shape: Shape,
    kind: NodeKind,
    keys: SourceKeys,
    storage: Storage,
    value: Option<ScalarValue>,
}

impl Node {
    /// Parent node; `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Field identifier used to write into the parent record.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Declared shape of the field.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Role of the node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Composite key fragments per tag.
    #[must_use]
    pub const fn keys(&self) -> &SourceKeys {
        &self.keys
    }

    /// Allocation state of an interior node.
    #[must_use]
    pub const fn storage(&self) -> Storage {
        self.storage
    }

    /// Value written by a source, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&ScalarValue> {
        self.value.as_ref()
    }

    /// Whether some source has set this leaf.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the node is a scalar leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Dereferenced record type of an interior node.
    #[must_use]
    pub const fn record_type(&self) -> Option<TypeId> {
        match self.kind {
            NodeKind::Interior(record) => Some(record.type_id()),
            _ => None,
        }
    }
}

/// Flattened view of a configuration schema.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Walk the schema of `T` without consulting any instance.
    ///
    /// Optional branches start [`Storage::Absent`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedRoot`] unless `T` dereferences to a
    /// record.
    pub fn from_type<T: Describe>() -> ConfigResult<Self> {
        Self::walk(std::any::type_name::<T>(), T::shape(), None)
    }

    /// Walk the schema of `T`, recording which optional branches are already
    /// allocated in `instance`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedRoot`] unless `T` dereferences to a
    /// record.
    pub fn from_instance<T: Describe>(instance: &T) -> ConfigResult<Self> {
        Self::walk(std::any::type_name::<T>(), T::shape(), Some(instance as &dyn Field))
    }

    fn walk(
        type_name: &'static str,
        shape: Shape,
        instance: Option<&dyn Field>,
    ) -> ConfigResult<Self> {
        let ShapeKind::Record(root) = shape.kind() else {
            return Err(ConfigError::UnsupportedRoot {
                type_name,
                kind: format!("{:?}", shape.kind()),
            });
        };
        let live = instance.and_then(|value| value.as_record());
        let storage = record_storage(shape, live.is_some());
        let mut nodes = vec![Node {
            parent: None,
            field: ROOT_FIELD,
            shape,
            kind: NodeKind::Interior(root),
            keys: SourceKeys::default(),
            storage,
            value: None,
        }];
        let mut queue: VecDeque<(NodeId, Option<&dyn Record>)> = VecDeque::new();
        queue.push_back((NodeId(0), live));
        let mut expanded: HashSet<(TypeId, &'static str)> = HashSet::new();

        while let Some((id, live)) = queue.pop_front() {
            let Some(current) = nodes.get(id.0) else {
                continue;
            };
            let NodeKind::Interior(record) = current.kind else {
                continue;
            };
            if !expanded.insert((record.type_id(), current.field)) {
                continue;
            }
            let parent_keys = current.keys.clone();
            for field in record.schema().fields() {
                let child_live = live
                    .and_then(|parent| parent.field_ref(field.name()))
                    .and_then(|value| value.as_record());
                let (kind, storage) = classify(field.shape(), child_live.is_some());
                if let NodeKind::Skipped(reason) = kind {
                    trace!(
                        record = record.type_name(),
                        field = field.name(),
                        reason,
                        "skipping field"
                    );
                }
                let child = NodeId(nodes.len());
                nodes.push(Node {
                    parent: Some(id),
                    field: field.name(),
                    shape: field.shape(),
                    kind,
                    keys: parent_keys.child(field),
                    storage,
                    value: None,
                });
                if matches!(kind, NodeKind::Interior(_)) {
                    queue.push_back((child, child_live));
                }
            }
        }
        Ok(Self { nodes })
    }

    /// Every node in breadth-first order; parents precede children.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Ids of all leaf nodes in breadth-first order.
    pub fn leaf_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(index, _)| NodeId(index))
    }

    /// Iterate the ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(Node::parent), |ancestor| {
            self.get(*ancestor).and_then(Node::parent)
        })
    }

    /// Dotted field path from the root to `id`, e.g. `root.first.string`.
    #[must_use]
    pub fn path(&self, id: NodeId) -> String {
        let mut segments: Vec<&str> = self
            .ancestors(id)
            .filter_map(|ancestor| self.get(ancestor).map(Node::field))
            .collect();
        segments.reverse();
        if let Some(node) = self.get(id) {
            segments.push(node.field);
        }
        segments.join(".")
    }

    /// Composite keys of every leaf for `tag`, joined with `separator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestconf::{NestConfig, Tag, Tree};
    ///
    /// #[derive(Default, NestConfig)]
    /// struct Database {
    ///     #[nestconf(env = "HOST")]
    ///     host: String,
    /// }
    ///
    /// #[derive(Default, NestConfig)]
    /// struct App {
    ///     #[nestconf(env = "DB")]
    ///     database: Option<Database>,
    /// }
    ///
    /// let tree = Tree::from_type::<App>().unwrap();
    /// assert_eq!(tree.keys(Tag::Env, "_"), vec!["DB_HOST".to_owned()]);
    /// ```
    #[must_use]
    pub fn keys(&self, tag: Tag, separator: &str) -> Vec<String> {
        self.leaf_ids()
            .filter_map(|id| self.get(id))
            .map(|node| node.keys.joined(tag, separator))
            .collect()
    }

    /// Borrow the leaves for a value source.
    pub fn leaves_mut(&mut self) -> Leaves<'_> {
        Leaves { tree: self }
    }
}

/// Only optional records can be absent; anything else lives inline.
const fn record_storage(shape: Shape, allocated: bool) -> Storage {
    match (shape.is_optional(), allocated) {
        (false, _) => Storage::Inline,
        (true, true) => Storage::Present,
        (true, false) => Storage::Absent,
    }
}

fn classify(shape: Shape, allocated: bool) -> (NodeKind, Storage) {
    if shape.optional_layers() > 1 {
        return (NodeKind::Skipped("multi-level indirection"), Storage::Inline);
    }
    match shape.kind() {
        ShapeKind::Scalar(kind) => (NodeKind::Leaf(kind), Storage::Inline),
        ShapeKind::Record(record) => {
            (NodeKind::Interior(record), record_storage(shape, allocated))
        }
        ShapeKind::Sequence => (NodeKind::Skipped("sequence"), Storage::Inline),
        ShapeKind::Map => (NodeKind::Skipped("map"), Storage::Inline),
        ShapeKind::Opaque(_) => (NodeKind::Skipped("opaque type"), Storage::Inline),
    }
}

/// Mutable view over the leaf nodes of a [`Tree`], handed to value sources.
///
/// Interior and skipped nodes are not reachable through this view.
pub struct Leaves<'t> {
    tree: &'t mut Tree,
}

impl Leaves<'_> {
    /// Iterate the leaves in breadth-first order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = LeafMut<'_>> {
        let tree: &Tree = self.tree;
        let paths: Vec<String> = tree.leaf_ids().map(|id| tree.path(id)).collect();
        self.tree
            .nodes
            .iter_mut()
            .filter_map(|node| match node.kind {
                NodeKind::Leaf(kind) => Some((node, kind)),
                NodeKind::Interior(_) | NodeKind::Skipped(_) => None,
            })
            .zip(paths)
            .map(|((node, kind), path)| LeafMut { node, kind, path })
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.leaf_ids().count()
    }

    /// Whether the schema has no leaves at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single leaf as seen by a value source.
pub struct LeafMut<'t> {
    node: &'t mut Node,
    kind: ScalarKind,
    path: String,
}

impl LeafMut<'_> {
    /// Composite key for `tag` joined with `separator`.
    #[must_use]
    pub fn key(&self, tag: Tag, separator: &str) -> String {
        self.node.keys.joined(tag, separator)
    }

    /// Raw key fragments for `tag`.
    #[must_use]
    pub fn fragments(&self, tag: Tag) -> &[&'static str] {
        self.node.keys.fragments(tag)
    }

    /// Dotted field path, for diagnostics.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Scalar kind the leaf accepts.
    #[must_use]
    pub const fn scalar_kind(&self) -> ScalarKind {
        self.kind
    }

    /// Value currently recorded for this leaf.
    #[must_use]
    pub fn value(&self) -> Option<&ScalarValue> {
        self.node.value.as_ref()
    }

    /// Coerce `text` and record it as this leaf's value.
    ///
    /// On failure the leaf keeps whatever it held before.
    ///
    /// # Errors
    ///
    /// Returns [`ParseScalarError`] when `text` does not parse as the leaf's
    /// kind.
    pub fn set_text(&mut self, text: &str) -> Result<(), ParseScalarError> {
        let value = self.scalar_kind().coerce(text)?;
        self.node.value = Some(value);
        Ok(())
    }
}
