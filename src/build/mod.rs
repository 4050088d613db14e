//! # Desired-Node Builder
//!
//! Pure functions that turn a validated [`Spec`](crate::request::Spec) into
//! the node the configuration should contain. Identifiers are derived from
//! the request's content so the same intent always produces the same node.
//!
//! - **`resource`**: primitives, clone/master wrappers, and groups.
//! - **`constraint`**: colocation, order, order-set, and location constraints,
//!   including role dereferencing and existence checks against the
//!   `resources` and `nodes` scopes.
//! - **`nvset`**: the single well-known nvpair sets for cluster properties and
//!   resource defaults.
//!
//! The helpers in this module are shared by all three.

pub mod constraint;
pub mod nvset;
pub mod resource;

use crate::attrs::AttrMap;
use crate::cib::{Node, NodePath, Tag};
use crate::error::{Error, Result};
use crate::request::{Participant, Role};

/// Name of the nvpair that stops or starts a resource.
pub const TARGET_ROLE: &str = "target-role";
/// Value of [`TARGET_ROLE`] that keeps a resource stopped.
pub const STOPPED: &str = "Stopped";

/// `<nvpair id="<parent_id>-<name>" name=.. value=..>`
pub fn nvpair(parent_id: &str, name: &str, value: &str) -> Node {
    Node::new(Tag::Nvpair)
        .with_attr("id", format!("{}-{}", parent_id, name))
        .with_attr("name", name)
        .with_attr("value", value)
}

/// An attribute container for `owner`, or `None` when `entries` is empty.
///
/// `tag` is `meta_attributes` or `instance_attributes`; the container id is
/// `<owner>-<tag>`.
pub fn attribute_group(tag: Tag, owner: &str, entries: &AttrMap) -> Option<Node> {
    if entries.is_empty() {
        return None;
    }
    let id = format!("{}-{}", owner, tag.as_str());
    let mut group = Node::new(tag).with_attr("id", id.clone());
    for (name, value) in entries {
        group.push(nvpair(&id, name, value));
    }
    Some(group)
}

/// Whether `node` is a configuration object that constraints may reference.
pub fn is_resource(node: &Node) -> bool {
    matches!(
        node.tag(),
        Tag::Primitive | Tag::Clone | Tag::Master | Tag::Group
    )
}

/// Path of the resource object named `name` anywhere below `resources`.
pub fn resource_path(resources: &Node, name: &str) -> Option<NodePath> {
    resources.find_path(|node| is_resource(node) && node.id() == Some(name))
}

/// Fail with `NoSuchResource` unless `name` exists in `resources`.
pub fn require_resource(resources: &Node, name: &str) -> Result<()> {
    match resource_path(resources, name) {
        Some(_) => Ok(()),
        None => Err(Error::NoSuchResource {
            name: name.to_string(),
        }),
    }
}

/// Fail with `NoSuchHost` unless a cluster node with `uname` exists in `nodes`.
pub fn require_host(nodes: &Node, uname: &str) -> Result<()> {
    let found = nodes
        .find_path(|node| node.tag().as_str() == "node" && node.get("uname") == Some(uname))
        .is_some();
    if found {
        Ok(())
    } else {
        Err(Error::NoSuchHost {
            name: uname.to_string(),
        })
    }
}

/// Whether `node` offers the master/slave roles.
fn offers_roles(node: &Node) -> bool {
    match node.tag() {
        Tag::Master => true,
        Tag::Clone => node
            .child_by_tag(&Tag::MetaAttributes)
            .and_then(|meta| {
                meta.children()
                    .iter()
                    .find(|pair| pair.get("name") == Some("promotable"))
            })
            .and_then(|pair| pair.get("value"))
            .is_some_and(|value| value.eq_ignore_ascii_case("true")),
        _ => false,
    }
}

/// Resolve the object a participant refers to.
///
/// Without a role this is the participant's own name. With a role, a
/// primitive (or group) is dereferenced to the enclosing wrapper that offers
/// roles; naming the wrapper itself is also accepted.
pub fn resolve_participant(resources: &Node, participant: &Participant) -> Result<String> {
    let path = resource_path(resources, &participant.name).ok_or_else(|| Error::NoSuchResource {
        name: participant.name.clone(),
    })?;
    let role = match participant.role {
        Some(role) => role,
        None => return Ok(participant.name.clone()),
    };

    let mut current = Some(path);
    while let Some(path) = current {
        let Some(node) = resources.node_at(&path) else {
            break;
        };
        if offers_roles(node) {
            return Ok(node.id().unwrap_or(participant.name.as_str()).to_string());
        }
        match node.tag() {
            Tag::Primitive | Tag::Group => current = path.parent().filter(|p| !p.is_root()),
            _ => return Err(unexpected_wrapper(participant, role, node.tag().as_str())),
        }
    }
    Err(unexpected_wrapper(participant, role, "none"))
}

fn unexpected_wrapper(participant: &Participant, role: Role, found: &str) -> Error {
    Error::UnexpectedWrapper {
        name: format!("{}={}", participant.name, role.as_attr().to_lowercase()),
        expected: Tag::Master.as_str().to_string(),
        found: found.to_string(),
    }
}

/// The `target-role` value of `owner`'s direct `meta_attributes`, if any.
pub fn target_role(owner: &Node) -> Option<&str> {
    owner
        .child_by_tag(&Tag::MetaAttributes)?
        .children()
        .iter()
        .find(|pair| pair.get("name") == Some(TARGET_ROLE))?
        .get("value")
}

/// Copy `from`'s `target-role` marker into `to` unless `explicit` sets one.
pub fn carry_target_role(from: &Node, to: &mut Node, explicit: &AttrMap) {
    if explicit.contains_key(TARGET_ROLE) {
        return;
    }
    if let Some(value) = target_role(from) {
        let value = value.to_string();
        put_target_role(to, &value);
    }
}

fn put_target_role(owner: &mut Node, value: &str) {
    let owner_id = owner.id().unwrap_or_default().to_string();
    if owner.child_by_tag(&Tag::MetaAttributes).is_none() {
        owner.insert(
            0,
            Node::new(Tag::MetaAttributes).with_attr("id", format!("{}-meta_attributes", owner_id)),
        );
    }
    let Some(meta) = owner.child_by_tag_mut(&Tag::MetaAttributes) else {
        return;
    };
    let meta_id = meta.id().unwrap_or_default().to_string();
    match meta
        .children_mut()
        .iter_mut()
        .find(|pair| pair.get("name") == Some(TARGET_ROLE))
    {
        Some(pair) => pair.set("value", value),
        None => meta.push(nvpair(&meta_id, TARGET_ROLE, value)),
    }
}

/// Ensure `owner` is enabled (no `Stopped` marker) or disabled (marker set to
/// `Stopped`). Returns whether anything changed.
pub fn set_enabled(owner: &mut Node, enabled: bool) -> bool {
    let current = target_role(owner).map(str::to_string);
    if enabled {
        if current.as_deref() != Some(STOPPED) {
            return false;
        }
        if let Some(meta) = owner.child_by_tag_mut(&Tag::MetaAttributes) {
            meta.children_mut()
                .retain(|pair| pair.get("name") != Some(TARGET_ROLE));
        }
        true
    } else {
        if current.as_deref() == Some(STOPPED) {
            return false;
        }
        put_target_role(owner, STOPPED);
        true
    }
}
