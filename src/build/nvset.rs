//! Well-known nvpair sets: cluster properties and resource defaults.
//!
//! Unlike other objects these sets are never replaced as a whole. Each listed
//! pair is merged into (or removed from) the existing set by `name`, and
//! pairs the request does not mention are left alone.

use super::nvpair;
use crate::attrs::AttrMap;
use crate::cib::Node;
use crate::kinds::ObjectKind;

/// Id of the set used by `kind`.
pub fn set_id(kind: ObjectKind) -> String {
    kind.descriptor().id_rule.derive(&[])
}

/// An empty set for `kind`.
pub fn empty_set(kind: ObjectKind) -> Node {
    let descriptor = kind.descriptor();
    Node::new(descriptor.tag.clone()).with_attr("id", set_id(kind))
}

/// Index of `kind`'s set among the direct children of `scope`.
///
/// The well-known id is preferred; otherwise the first set of the right tag
/// is used.
pub fn find_set(scope: &Node, kind: ObjectKind) -> Option<usize> {
    let descriptor = kind.descriptor();
    let id = set_id(kind);
    let children = scope.children();
    children
        .iter()
        .position(|child| child.tag() == &descriptor.tag && child.id() == Some(id.as_str()))
        .or_else(|| children.iter().position(|child| child.tag() == &descriptor.tag))
}

/// Add missing pairs and update differing values. Returns whether the set
/// changed.
pub fn merge_pairs(set: &mut Node, params: &AttrMap) -> bool {
    let set_id = set.id().unwrap_or_default().to_string();
    let mut changed = false;
    for (name, value) in params {
        let existing = set
            .children_mut()
            .iter_mut()
            .find(|pair| pair.get("name") == Some(name.as_str()));
        match existing {
            Some(pair) if pair.get("value") == Some(value.as_str()) => {}
            Some(pair) => {
                pair.set("value", value.as_str());
                changed = true;
            }
            None => {
                set.push(nvpair(&set_id, name, value));
                changed = true;
            }
        }
    }
    changed
}

/// Remove the pairs named in `params`. Returns whether any were removed.
pub fn remove_pairs(set: &mut Node, params: &AttrMap) -> bool {
    let before = set.children().len();
    set.children_mut().retain(|pair| {
        !pair
            .get("name")
            .is_some_and(|name| params.contains_key(name))
    });
    set.children().len() != before
}
