//! In-memory configuration tree.
//!
//! A [`Node`] is a tagged element with an attribute map and an ordered list of
//! children. Each child is owned by exactly one parent; moving an object
//! between parents goes through [`Node::take`] followed by an insert, so an
//! object is never duplicated.

use std::fmt;

/// Element tag of a configuration node.
///
/// The reconciliation engine only reasons about the named variants; anything
/// else fetched from the document is carried through untouched as
/// [`Tag::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Primitive,
    Clone,
    Master,
    Group,
    RscColocation,
    RscLocation,
    RscOrder,
    ResourceSet,
    ResourceRef,
    MetaAttributes,
    InstanceAttributes,
    Operations,
    Op,
    Nvpair,
    ClusterPropertySet,
    Other(String),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Primitive => "primitive",
            Tag::Clone => "clone",
            Tag::Master => "master",
            Tag::Group => "group",
            Tag::RscColocation => "rsc_colocation",
            Tag::RscLocation => "rsc_location",
            Tag::RscOrder => "rsc_order",
            Tag::ResourceSet => "resource_set",
            Tag::ResourceRef => "resource_ref",
            Tag::MetaAttributes => "meta_attributes",
            Tag::InstanceAttributes => "instance_attributes",
            Tag::Operations => "operations",
            Tag::Op => "op",
            Tag::Nvpair => "nvpair",
            Tag::ClusterPropertySet => "cluster_property_set",
            Tag::Other(name) => name,
        }
    }

    /// Whether this tag wraps primitives and offers replication.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Tag::Clone | Tag::Master)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        match name {
            "primitive" => Tag::Primitive,
            "clone" => Tag::Clone,
            "master" => Tag::Master,
            "group" => Tag::Group,
            "rsc_colocation" => Tag::RscColocation,
            "rsc_location" => Tag::RscLocation,
            "rsc_order" => Tag::RscOrder,
            "resource_set" => Tag::ResourceSet,
            "resource_ref" => Tag::ResourceRef,
            "meta_attributes" => Tag::MetaAttributes,
            "instance_attributes" => Tag::InstanceAttributes,
            "operations" => Tag::Operations,
            "op" => Tag::Op,
            "nvpair" => Tag::Nvpair,
            "cluster_property_set" => Tag::ClusterPropertySet,
            other => Tag::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute map with unique keys.
///
/// Insertion order is kept for serialization; equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of these attributes without `keys`.
    pub fn without(&self, keys: &[&str]) -> Attributes {
        Attributes(
            self.0
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        )
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Attributes {}

/// Position of a node below some root, as child indices from the root down.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }

    /// Path of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        let (_, rest) = self.0.split_last()?;
        Some(NodePath(rest.to_vec()))
    }

    /// Index within the parent, or `None` for the root.
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        NodePath(indices)
    }
}

/// A configuration element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: Tag,
    attributes: Attributes,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: Attributes::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.set(key, value);
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = Node>) {
        self.children.extend(children);
    }

    /// Insert `child` at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, child: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Replace the child at `index`, returning the previous one.
    pub fn replace_child(&mut self, index: usize, child: Node) -> Option<Node> {
        let slot = self.children.get_mut(index)?;
        Some(std::mem::replace(slot, child))
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// First direct child with `tag`.
    pub fn child_by_tag(&self, tag: &Tag) -> Option<&Node> {
        self.children.iter().find(|child| child.tag() == tag)
    }

    pub fn child_by_tag_mut(&mut self, tag: &Tag) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.tag() == tag)
    }

    /// Direct child with the given `id`.
    pub fn child_by_id(&self, id: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.id() == Some(id))
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        path.0
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        path.0
            .iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Detach and return the node at `path`. The root cannot be taken.
    pub fn take(&mut self, path: &NodePath) -> Option<Node> {
        let index = path.index()?;
        let parent = self.node_at_mut(&path.parent()?)?;
        parent.remove_child(index)
    }

    /// Depth-first search for the first descendant matching `predicate`.
    pub fn find_path(&self, predicate: impl Fn(&Node) -> bool) -> Option<NodePath> {
        fn walk(
            node: &Node,
            path: &NodePath,
            predicate: &dyn Fn(&Node) -> bool,
        ) -> Option<NodePath> {
            for (index, child) in node.children.iter().enumerate() {
                let child_path = path.child(index);
                if predicate(child) {
                    return Some(child_path);
                }
                if let Some(found) = walk(child, &child_path, predicate) {
                    return Some(found);
                }
            }
            None
        }

        walk(self, &NodePath::root(), &predicate)
    }

    /// Descendant with the given tag and id.
    pub fn find_path_by_id(&self, tag: &Tag, id: &str) -> Option<NodePath> {
        self.find_path(|node| node.tag() == tag && node.id() == Some(id))
    }

    /// Whether any descendant carries `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.find_path(|node| node.id() == Some(id)).is_some()
    }

    /// Indices of direct children matching `predicate`.
    pub fn child_indices(&self, predicate: impl Fn(&Node) -> bool) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, child)| predicate(child))
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of descendants (including `self`) matching `predicate`.
    pub fn count(&self, predicate: &dyn Fn(&Node) -> bool) -> usize {
        let own = usize::from(predicate(self));
        own + self
            .children
            .iter()
            .map(|child| child.count(predicate))
            .sum::<usize>()
    }
}
