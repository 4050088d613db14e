//! Builders for constraints.
//!
//! Every builder checks that the resources (and, for locations, the cluster
//! node) it references exist before producing a node, so a failed check never
//! leaves a half-built constraint behind.

use super::{require_host, require_resource, resolve_participant};
use crate::cib::{Node, Tag};
use crate::defaults::DEFAULT_ORDER_KIND;
use crate::error::{Error, Result};
use crate::kinds::ObjectKind;
use crate::request::{ColocationSpec, LocationSpec, OrderSetSpec, OrderSpec, Participant, Role};

/// Ends of a colocation as they appear in the document.
///
/// Roles are dereferenced to their wrappers. When `lenient`, a participant
/// that cannot be resolved keeps its own name, which is what removal needs
/// once a resource is already gone.
pub fn colocation_ends(
    spec: &ColocationSpec,
    resources: &Node,
    lenient: bool,
) -> Result<(String, String)> {
    let resolve = |participant: &Participant| match resolve_participant(resources, participant) {
        Ok(name) => Ok(name),
        Err(_) if lenient => Ok(participant.name.clone()),
        Err(err) => Err(err),
    };
    Ok((resolve(&spec.rsc)?, resolve(&spec.with_rsc)?))
}

pub fn colocation(spec: &ColocationSpec, resources: &Node) -> Result<Node> {
    let (rsc, with_rsc) = colocation_ends(spec, resources, false)?;
    let id = ObjectKind::Colocation
        .descriptor()
        .id_rule
        .derive(&[rsc.as_str(), with_rsc.as_str(), spec.score.as_str()]);

    let mut node = Node::new(Tag::RscColocation)
        .with_attr("id", id)
        .with_attr("rsc", rsc);
    if let Some(role) = spec.rsc.role {
        node.set("rsc-role", role.as_attr());
    }
    node.set("with-rsc", with_rsc);
    if let Some(role) = spec.with_rsc.role {
        node.set("with-rsc-role", role.as_attr());
    }
    node.set("score", spec.score.as_str());
    for (key, value) in &spec.options {
        node.set(key.as_str(), value.as_str());
    }
    Ok(node)
}

/// Lower-cased `kind` parameter, the last part of an order id.
fn order_kind(spec: &OrderSpec) -> String {
    spec.params
        .get("kind")
        .map(|kind| kind.to_lowercase())
        .unwrap_or_else(|| DEFAULT_ORDER_KIND.to_string())
}

pub fn order(spec: &OrderSpec, resources: &Node) -> Result<Node> {
    require_resource(resources, &spec.first)?;
    require_resource(resources, &spec.then)?;

    let kind = order_kind(spec);
    let id = ObjectKind::Order
        .descriptor()
        .id_rule
        .derive(&[spec.first.as_str(), spec.then.as_str(), kind.as_str()]);

    let mut node = Node::new(Tag::RscOrder)
        .with_attr("id", id)
        .with_attr("first", spec.first.as_str());
    if let Some(action) = spec.first_action {
        node.set("first-action", action.as_str());
    }
    node.set("then", spec.then.as_str());
    if let Some(action) = spec.then_action {
        node.set("then-action", action.as_str());
    }
    for (key, value) in &spec.params {
        node.set(key.as_str(), value.as_str());
    }
    Ok(node)
}

pub fn order_set(spec: &OrderSetSpec, resources: &Node) -> Result<Node> {
    let mut node = Node::new(Tag::RscOrder).with_attr("id", spec.name.as_str());
    for (key, value) in &spec.params {
        node.set(key.as_str(), value.as_str());
    }

    let mut set_ids: Vec<String> = Vec::with_capacity(spec.sets.len());
    for members in &spec.sets {
        let mut names = Vec::with_capacity(members.len());
        let mut role: Option<Role> = None;
        for member in members {
            names.push(resolve_participant(resources, member)?);
            match (role, member.role) {
                (Some(set_role), Some(member_role)) if set_role != member_role => {
                    return Err(Error::validation(format!(
                        "conflicting roles in resource set of {}: {} and {}",
                        spec.name,
                        set_role.as_attr(),
                        member_role.as_attr()
                    )))
                }
                (None, Some(member_role)) => role = Some(member_role),
                _ => {}
            }
        }

        let set_id = format!("rsc_set_{}", names.join("_"));
        if set_ids.contains(&set_id) {
            return Err(Error::validation(format!(
                "duplicate resource set {} in {}",
                set_id, spec.name
            )));
        }

        let mut set = Node::new(Tag::ResourceSet).with_attr("id", set_id.as_str());
        for (key, value) in &spec.set_options {
            set.set(key.as_str(), value.as_str());
        }
        if let Some(role) = role {
            set.set("role", role.as_attr());
        }
        for name in names {
            set.push(Node::new(Tag::ResourceRef).with_attr("id", name));
        }
        node.push(set);
        set_ids.push(set_id);
    }
    Ok(node)
}

pub fn location(spec: &LocationSpec, resources: &Node, nodes: &Node) -> Result<Node> {
    require_resource(resources, &spec.resource)?;
    require_host(nodes, &spec.node)?;
    let id = ObjectKind::Location
        .descriptor()
        .id_rule
        .derive(&[spec.resource.as_str(), spec.node.as_str(), spec.score.as_str()]);
    Ok(Node::new(Tag::RscLocation)
        .with_attr("id", id)
        .with_attr("rsc", spec.resource.as_str())
        .with_attr("node", spec.node.as_str())
        .with_attr("score", spec.score.as_str()))
}
