//! Builders for resource objects: primitives, clone/master wrappers, groups.

use super::attribute_group;
use crate::attrs::AttrMap;
use crate::cib::{Node, Tag};
use crate::defaults::DEFAULT_OP_INTERVAL;
use crate::error::{Error, Result};
use crate::request::{GroupSpec, ResourceSpec, WrapperSpec};

/// Build the primitive described by `spec`.
pub fn primitive(spec: &ResourceSpec) -> Result<Node> {
    let agent = spec.agent.as_ref().ok_or_else(|| {
        Error::validation(format!("type is required to define resource {}", spec.name))
    })?;

    let mut node = Node::new(Tag::Primitive)
        .with_attr("id", spec.name.as_str())
        .with_attr("class", agent.class.as_str());
    if let Some(provider) = &agent.provider {
        node.set("provider", provider.as_str());
    }
    node.set("type", agent.kind.as_str());

    if let Some(meta) = attribute_group(Tag::MetaAttributes, &spec.name, &spec.meta) {
        node.push(meta);
    }
    if let Some(params) = attribute_group(Tag::InstanceAttributes, &spec.name, &spec.params) {
        node.push(params);
    }
    if !spec.ops.is_empty() {
        let mut operations = Node::new(Tag::Operations);
        for op in &spec.ops {
            operations.push(operation(&spec.name, op));
        }
        node.push(operations);
    }
    Ok(node)
}

/// `<op id="<rsc>-<name>-interval-<interval>" .../>`
fn operation(resource: &str, entries: &AttrMap) -> Node {
    let name = entries.get("name").map(String::as_str).unwrap_or_default();
    let interval = entries
        .get("interval")
        .map(String::as_str)
        .unwrap_or(DEFAULT_OP_INTERVAL);

    let mut op = Node::new(Tag::Op)
        .with_attr("id", format!("{}-{}-interval-{}", resource, name, interval))
        .with_attr("name", name)
        .with_attr("interval", interval);
    for (key, value) in entries {
        if key != "id" {
            op.set(key.as_str(), value.as_str());
        }
    }
    op
}

/// Identifier for a requested wrapper.
///
/// An explicit `id=` option wins, then the id of an existing wrapper of the
/// same kind, then `<name>-clone` / `<name>-master`.
pub fn wrapper_id(name: &str, wrapper: &WrapperSpec, existing: Option<&Node>) -> String {
    if let Some(id) = &wrapper.id {
        return id.clone();
    }
    if let Some(id) = existing
        .filter(|node| node.tag() == &wrapper.tag)
        .and_then(Node::id)
    {
        return id.to_string();
    }
    format!("{}-{}", name, wrapper.tag.as_str())
}

/// Wrap `primitive` in the requested clone or master node.
pub fn wrapper(wrapper: &WrapperSpec, id: &str, primitive: Node) -> Node {
    let mut node = Node::new(wrapper.tag.clone()).with_attr("id", id);
    let meta = attribute_group(Tag::MetaAttributes, id, &wrapper.meta);
    match wrapper.tag {
        Tag::Master => {
            node.push(primitive);
            node.extend(meta);
        }
        _ => {
            node.extend(meta);
            node.push(primitive);
        }
    }
    node
}

/// Build a group holding `members`, in order.
pub fn group(spec: &GroupSpec, members: Vec<Node>) -> Node {
    let mut node = Node::new(Tag::Group).with_attr("id", spec.name.as_str());
    for member in members {
        node.push(member);
    }
    node.extend(attribute_group(Tag::MetaAttributes, &spec.name, &spec.meta));
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Agent, State};

    fn spec() -> ResourceSpec {
        let mut params = AttrMap::new();
        params.insert("ip".to_string(), "192.168.50.206".to_string());
        let mut monitor = AttrMap::new();
        monitor.insert("name".to_string(), "monitor".to_string());
        monitor.insert("interval".to_string(), "20s".to_string());
        let mut start = AttrMap::new();
        start.insert("name".to_string(), "start".to_string());
        ResourceSpec {
            name: "vip1".to_string(),
            agent: Some(Agent::parse("ocf:heartbeat:IPaddr2").unwrap()),
            params,
            meta: AttrMap::new(),
            ops: vec![monitor, start],
            wrapper: None,
            state: State::Present,
            force: false,
        }
    }

    #[test]
    fn test_primitive_layout() {
        let node = primitive(&spec()).unwrap();
        assert_eq!(node.id(), Some("vip1"));
        assert_eq!(node.get("class"), Some("ocf"));
        assert_eq!(node.get("provider"), Some("heartbeat"));
        assert_eq!(node.get("type"), Some("IPaddr2"));
        // no meta given, so no meta_attributes child
        assert!(node.child_by_tag(&Tag::MetaAttributes).is_none());
        assert_eq!(
            node.child_by_tag(&Tag::InstanceAttributes).unwrap().id(),
            Some("vip1-instance_attributes")
        );

        let ops = node.child_by_tag(&Tag::Operations).unwrap();
        assert_eq!(ops.children()[0].id(), Some("vip1-monitor-interval-20s"));
        assert_eq!(ops.children()[1].id(), Some("vip1-start-interval-0s"));
        assert_eq!(ops.children()[1].get("interval"), Some("0s"));
    }

    #[test]
    fn test_primitive_is_deterministic() {
        assert_eq!(primitive(&spec()).unwrap(), primitive(&spec()).unwrap());
    }

    #[test]
    fn test_primitive_requires_agent() {
        let mut spec = spec();
        spec.agent = None;
        assert!(primitive(&spec).is_err());
    }

    #[test]
    fn test_wrapper_id_precedence() {
        let mut clone = WrapperSpec {
            tag: Tag::Clone,
            id: None,
            meta: AttrMap::new(),
        };
        let existing = Node::new(Tag::Clone).with_attr("id", "cl-vip");
        let other = Node::new(Tag::Master).with_attr("id", "ms-vip");

        assert_eq!(wrapper_id("vip", &clone, None), "vip-clone");
        assert_eq!(wrapper_id("vip", &clone, Some(&existing)), "cl-vip");
        assert_eq!(wrapper_id("vip", &clone, Some(&other)), "vip-clone");
        clone.id = Some("explicit".to_string());
        assert_eq!(wrapper_id("vip", &clone, Some(&existing)), "explicit");
    }

    #[test]
    fn test_wrapper_children() {
        let mut meta = AttrMap::new();
        meta.insert("notify".to_string(), "true".to_string());
        let master = WrapperSpec {
            tag: Tag::Master,
            id: None,
            meta,
        };
        let node = wrapper(&master, "vip1-master", primitive(&spec()).unwrap());
        assert_eq!(node.tag(), &Tag::Master);
        assert_eq!(node.children()[0].id(), Some("vip1"));
        assert_eq!(node.children()[1].id(), Some("vip1-master-meta_attributes"));

        let clone = WrapperSpec {
            tag: Tag::Clone,
            id: None,
            meta: AttrMap::new(),
        };
        let node = wrapper(&clone, "vip1-clone", primitive(&spec()).unwrap());
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn test_group_keeps_member_order() {
        let spec = GroupSpec {
            name: "g".to_string(),
            members: vec!["b".to_string(), "a".to_string()],
            meta: AttrMap::new(),
            state: State::Present,
            force: false,
        };
        let members = vec![
            Node::new(Tag::Primitive).with_attr("id", "b"),
            Node::new(Tag::Primitive).with_attr("id", "a"),
        ];
        let node = group(&spec, members);
        let ids: Vec<_> = node.children().iter().filter_map(Node::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
