//! # Topology Transformer
//!
//! Moves primitives between their wrapper forms inside the `resources` scope:
//!
//! ```text
//!        +-------- clone <-------+
//!        |           ^           |
//!        v           |           v
//!      bare  <-------+------>  master
//!        ^
//!        |  (membership)
//!        v
//!   group member
//! ```
//!
//! Every move detaches a node with [`Node::take`] and attaches it elsewhere,
//! so a primitive exists exactly once in the scope at every step. Replacements
//! are written back at the position of the node they replace, and wrappers are
//! always rebuilt from the request rather than edited in place. Whether a
//! wrapped primitive needs a change is decided on the whole wrapper.

use crate::build::{self, resource};
use crate::cib::{Node, NodePath, Tag};
use crate::equivalence::Comparator;
use crate::error::{Error, Result};
use crate::request::{GroupSpec, ResourceSpec};
use log::{info, warn};
use std::collections::HashMap;

/// Current form of a primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    Bare,
    /// Inside a clone or master; the tag is the wrapper's.
    Wrapped(Tag),
    /// Member of the group with this id.
    Grouped(String),
}

/// Where a primitive lives in the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: NodePath,
    pub form: Form,
}

/// Find the primitive `name` and classify its form.
pub fn locate_primitive(scope: &Node, name: &str) -> Option<Placement> {
    let path = scope.find_path_by_id(&Tag::Primitive, name)?;
    let form = match path.parent().filter(|p| !p.is_root()) {
        None => Form::Bare,
        Some(parent) => match scope.node_at(&parent) {
            Some(wrapper) if wrapper.tag().is_wrapper() => Form::Wrapped(wrapper.tag().clone()),
            Some(group) if group.tag() == &Tag::Group => {
                Form::Grouped(group.id().unwrap_or_default().to_string())
            }
            _ => Form::Bare,
        },
    };
    Some(Placement { path, form })
}

fn lost(what: &str) -> Error {
    Error::MalformedDocument {
        message: format!("{} vanished while editing the resources scope", what),
    }
}

fn replace_at(scope: &mut Node, path: &NodePath, node: Node) -> Result<()> {
    let slot = scope.node_at_mut(path).ok_or_else(|| lost("node"))?;
    *slot = node;
    Ok(())
}

fn insert_at(scope: &mut Node, parent: &NodePath, index: usize, node: Node) -> Result<()> {
    scope
        .node_at_mut(parent)
        .ok_or_else(|| lost("parent"))?
        .insert(index, node);
    Ok(())
}

/// Fail if `id` is already used by anything other than `except`.
fn ensure_unused(scope: &Node, id: &str, except: Option<&NodePath>) -> Result<()> {
    match scope.find_path(|node| node.id() == Some(id)) {
        Some(path) if Some(&path) != except => Err(Error::validation(format!(
            "id {} is already used in the resources scope",
            id
        ))),
        _ => Ok(()),
    }
}

fn has_wrapper_ancestor(scope: &Node, path: &NodePath) -> bool {
    let mut current = path.parent();
    while let Some(path) = current {
        if path.is_root() {
            return false;
        }
        if scope.node_at(&path).is_some_and(|node| node.tag().is_wrapper()) {
            return true;
        }
        current = path.parent();
    }
    false
}

fn primitive_count(node: &Node) -> usize {
    node.children()
        .iter()
        .filter(|child| child.tag() == &Tag::Primitive)
        .count()
}

/// The node to take out when removing the group at `path`: its clone or
/// master wrapper if it has one, else the group itself.
fn group_or_wrapper(scope: &Node, path: NodePath) -> NodePath {
    match path.parent().filter(|p| !p.is_root()) {
        Some(parent) if scope.node_at(&parent).is_some_and(|n| n.tag().is_wrapper()) => parent,
        _ => path,
    }
}

/// Remove the group at `path` if it has no primitives left. Returns whether
/// it was removed.
fn remove_if_emptied(scope: &mut Node, path: NodePath) -> bool {
    let emptied = scope
        .node_at(&path)
        .is_some_and(|node| primitive_count(node) == 0);
    if emptied {
        let target = group_or_wrapper(scope, path);
        scope.take(&target);
    }
    emptied
}

/// Applies desired resource shapes to a `resources` scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer {
    comparator: Comparator,
}

impl Transformer {
    pub fn new(comparator: Comparator) -> Self {
        Self { comparator }
    }

    fn differs(&self, current: &Node, desired: &Node, force: bool) -> bool {
        force || !self.comparator.compare(current, desired).is_equivalent()
    }

    /// Bring the primitive described by `spec` into its requested form.
    /// Returns whether the scope changed.
    pub fn place_primitive(&self, scope: &mut Node, spec: &ResourceSpec) -> Result<bool> {
        let mut desired = resource::primitive(spec)?;

        let Some(placement) = locate_primitive(scope, &spec.name) else {
            ensure_unused(scope, &spec.name, None)?;
            let node = match &spec.wrapper {
                Some(wrapper) => {
                    let id = resource::wrapper_id(&spec.name, wrapper, None);
                    ensure_unused(scope, &id, None)?;
                    resource::wrapper(wrapper, &id, desired)
                }
                None => desired,
            };
            info!("adding resource {} as {}", spec.name, node.tag());
            scope.push(node);
            return Ok(true);
        };

        let current = scope
            .node_at(&placement.path)
            .ok_or_else(|| lost(&spec.name))?;
        build::carry_target_role(current, &mut desired, &spec.meta);

        match (placement.form, &spec.wrapper) {
            (Form::Grouped(group), Some(wrapper)) => Err(Error::validation(format!(
                "resource {} is a member of group {} and cannot be made a {}",
                spec.name, group, wrapper.tag
            ))),
            (Form::Bare | Form::Grouped(_), None) => {
                if !self.differs(current, &desired, spec.force) {
                    return Ok(false);
                }
                info!("replacing resource {}", spec.name);
                replace_at(scope, &placement.path, desired)?;
                Ok(true)
            }
            (Form::Bare, Some(wrapper)) => {
                let id = resource::wrapper_id(&spec.name, wrapper, None);
                ensure_unused(scope, &id, None)?;
                let parent = placement.path.parent().ok_or_else(|| lost(&spec.name))?;
                let index = placement.path.index().unwrap_or_default();
                scope.take(&placement.path).ok_or_else(|| lost(&spec.name))?;
                info!("wrapping resource {} in {} {}", spec.name, wrapper.tag, id);
                insert_at(scope, &parent, index, resource::wrapper(wrapper, &id, desired))?;
                Ok(true)
            }
            (Form::Wrapped(_), requested) => {
                let wrapper_path = placement.path.parent().ok_or_else(|| lost(&spec.name))?;
                let current_wrapper = scope
                    .node_at(&wrapper_path)
                    .ok_or_else(|| lost(&spec.name))?;

                let replacement = match requested {
                    Some(wrapper) => {
                        let id = resource::wrapper_id(&spec.name, wrapper, Some(current_wrapper));
                        ensure_unused(scope, &id, Some(&wrapper_path))?;
                        let mut fresh = resource::wrapper(wrapper, &id, desired);
                        build::carry_target_role(current_wrapper, &mut fresh, &wrapper.meta);
                        if !self.differs(current_wrapper, &fresh, spec.force) {
                            return Ok(false);
                        }
                        fresh
                    }
                    None => desired,
                };
                info!(
                    "replacing {} {} with {} {}",
                    current_wrapper.tag(),
                    current_wrapper.id().unwrap_or_default(),
                    replacement.tag(),
                    replacement.id().unwrap_or_default()
                );
                replace_at(scope, &wrapper_path, replacement)?;
                Ok(true)
            }
        }
    }

    /// Remove the primitive `name` together with its clone/master wrapper.
    /// A group left without members is removed as well.
    pub fn remove_primitive(&self, scope: &mut Node, name: &str) -> Result<bool> {
        let Some(placement) = locate_primitive(scope, name) else {
            return Ok(false);
        };
        let parent = placement.path.parent().ok_or_else(|| lost(name))?;
        match placement.form {
            Form::Bare => {
                scope.take(&placement.path);
            }
            Form::Wrapped(_) => {
                scope.take(&parent);
            }
            Form::Grouped(group) => {
                scope.take(&placement.path);
                if remove_if_emptied(scope, parent) {
                    warn!("removed group {} left empty by removing {}", group, name);
                }
            }
        }
        info!("removed resource {}", name);
        Ok(true)
    }

    /// Bring the group described by `spec` into shape, moving its members
    /// into it in order. Returns whether the scope changed.
    pub fn place_group(&self, scope: &mut Node, spec: &GroupSpec) -> Result<bool> {
        match build::resource_path(scope, &spec.name) {
            Some(path) if scope.node_at(&path).map(Node::tag) != Some(&Tag::Group) => {
                return Err(Error::validation(format!(
                    "{} already names a resource that is not a group",
                    spec.name
                )))
            }
            _ => {}
        }

        let mut current_members = Vec::with_capacity(spec.members.len());
        for member in &spec.members {
            let Some(path) = scope.find_path_by_id(&Tag::Primitive, member) else {
                return Err(match build::resource_path(scope, member) {
                    Some(_) => Error::validation(format!(
                        "{} is not a primitive and cannot be a group member",
                        member
                    )),
                    None => Error::NoSuchResource {
                        name: member.clone(),
                    },
                });
            };
            let in_target = path
                .parent()
                .and_then(|parent| scope.node_at(&parent))
                .is_some_and(|parent| {
                    parent.tag() == &Tag::Group && parent.id() == Some(spec.name.as_str())
                });
            if !in_target && has_wrapper_ancestor(scope, &path) {
                return Err(Error::validation(format!(
                    "{} is inside a clone or master and cannot be a group member",
                    member
                )));
            }
            current_members.push(scope.node_at(&path).cloned().ok_or_else(|| lost(member))?);
        }

        let existing = scope.find_path_by_id(&Tag::Group, &spec.name);
        if let Some(path) = &existing {
            let current = scope.node_at(path).ok_or_else(|| lost(&spec.name))?;
            let mut desired = resource::group(spec, current_members);
            build::carry_target_role(current, &mut desired, &spec.meta);
            if !self.differs(current, &desired, spec.force) {
                return Ok(false);
            }
        }

        let mut moved = self.detach_members(scope, spec)?;

        let (anchor, old_group) = match scope.find_path_by_id(&Tag::Group, &spec.name) {
            Some(path) => {
                let parent = path.parent().ok_or_else(|| lost(&spec.name))?;
                let index = path.index().unwrap_or_default();
                let old = scope.take(&path).ok_or_else(|| lost(&spec.name))?;
                (Some((parent, index)), Some(old))
            }
            None => (None, None),
        };

        let mut leftovers = Vec::new();
        if let Some(old) = &old_group {
            for child in old.children() {
                if child.tag() != &Tag::Primitive {
                    continue;
                }
                let id = child.id().unwrap_or_default().to_string();
                if spec.members.contains(&id) {
                    moved.insert(id, child.clone());
                } else {
                    leftovers.push(child.clone());
                }
            }
        }

        let mut members = Vec::with_capacity(spec.members.len());
        for member in &spec.members {
            members.push(moved.remove(member).ok_or_else(|| lost(member))?);
        }
        let mut group = resource::group(spec, members);
        if let Some(old) = &old_group {
            build::carry_target_role(old, &mut group, &spec.meta);
        }

        match anchor {
            Some((parent, index)) => {
                info!("replacing group {}", spec.name);
                insert_at(scope, &parent, index, group)?;
                if parent.is_root() {
                    for (offset, leftover) in leftovers.into_iter().enumerate() {
                        scope.insert(index + 1 + offset, leftover);
                    }
                } else {
                    scope.extend(leftovers);
                }
            }
            None => {
                info!("adding group {}", spec.name);
                scope.push(group);
            }
        }
        Ok(true)
    }

    /// Detach requested members that live outside the group itself. Groups
    /// emptied by this are removed.
    fn detach_members(&self, scope: &mut Node, spec: &GroupSpec) -> Result<HashMap<String, Node>> {
        let mut moved = HashMap::new();
        for member in &spec.members {
            let Some(placement) = locate_primitive(scope, member) else {
                return Err(lost(member));
            };
            if placement.form == Form::Grouped(spec.name.clone()) {
                continue;
            }
            let node = scope.take(&placement.path).ok_or_else(|| lost(member))?;
            moved.insert(member.clone(), node);

            if let Form::Grouped(group) = placement.form {
                let parent = placement.path.parent().ok_or_else(|| lost(member))?;
                if remove_if_emptied(scope, parent) {
                    warn!(
                        "removed group {} left empty by moving {} to {}",
                        group, member, spec.name
                    );
                }
            }
        }
        Ok(moved)
    }

    /// Remove group `name`, returning its members to the scope root at the
    /// group's position.
    pub fn remove_group(&self, scope: &mut Node, name: &str) -> Result<bool> {
        let Some(path) = scope.find_path_by_id(&Tag::Group, name) else {
            return Ok(false);
        };
        let target = group_or_wrapper(scope, path);
        let outer = target.parent().ok_or_else(|| lost(name))?;
        let index = target.index().unwrap_or_default();
        let removed = scope.take(&target).ok_or_else(|| lost(name))?;

        let group = if removed.tag() == &Tag::Group {
            removed
        } else {
            removed
                .child_by_tag(&Tag::Group)
                .cloned()
                .ok_or_else(|| lost(name))?
        };
        let members: Vec<Node> = group
            .children()
            .iter()
            .filter(|child| child.tag() == &Tag::Primitive)
            .cloned()
            .collect();

        info!("removing group {} and releasing {} members", name, members.len());
        for (offset, member) in members.into_iter().enumerate() {
            insert_at(scope, &outer, index + offset, member)?;
        }
        Ok(true)
    }

    /// Set or clear the `Stopped` marker on the `tag` object `name`.
    pub fn set_enabled(
        &self,
        scope: &mut Node,
        tag: &Tag,
        name: &str,
        enabled: bool,
    ) -> Result<bool> {
        let path = scope
            .find_path_by_id(tag, name)
            .ok_or_else(|| Error::NoSuchResource {
                name: name.to_string(),
            })?;
        let node = scope.node_at_mut(&path).ok_or_else(|| lost(name))?;
        let changed = build::set_enabled(node, enabled);
        if changed {
            info!(
                "{} {}",
                if enabled { "enabling" } else { "disabling" },
                name
            );
        }
        Ok(changed)
    }
}
