//! # Object Kind Descriptors
//!
//! Every configuration object kind is reconciled by the same engine. What
//! differs between kinds is captured here, in two small tables:
//!
//! - [`KindDescriptor`] (per object kind): the tag of the object's node, the
//!   scope it lives in, how its identifier is derived, how the driver locates
//!   the current node(s), and which target states are accepted.
//! - [`TagRules`] (per tag, used recursively by the comparator): which
//!   attribute pairs mirror each other in a symmetric relation, and which child
//!   tag forms an ordered sequence.

use crate::cib::{Scope, Tag};
use crate::request::State;
use std::fmt;

/// The object kinds the engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Resource,
    Group,
    Colocation,
    Order,
    OrderSet,
    Location,
    PropertySet,
    DefaultSet,
}

/// How an object's identifier is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// The caller supplies the identifier.
    Named,
    /// `<prefix>-<part>-<part>...`
    Composite(&'static str),
    /// A single well-known identifier.
    Fixed(&'static str),
}

impl IdRule {
    /// Derive an identifier. `parts` is the caller's name for [`IdRule::Named`]
    /// and the semantic content for [`IdRule::Composite`].
    pub fn derive(&self, parts: &[&str]) -> String {
        match self {
            IdRule::Named => parts.join("-"),
            IdRule::Composite(prefix) => {
                let mut id = prefix.to_string();
                for part in parts {
                    id.push('-');
                    id.push_str(part);
                }
                id
            }
            IdRule::Fixed(id) => id.to_string(),
        }
    }
}

/// How the driver finds the current node(s) for a desired object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locate {
    /// A single node with the desired identifier.
    ById,
    /// Direct children whose two end attributes match; `symmetric` also
    /// accepts the ends swapped.
    Ends {
        first: &'static str,
        second: &'static str,
        symmetric: bool,
    },
    /// The kind's well-known set; its `nvpair`s are then matched by `name`.
    WellKnownSet,
}

/// Static description of one object kind.
#[derive(Debug)]
pub struct KindDescriptor {
    pub kind: ObjectKind,
    pub name: &'static str,
    pub tag: Tag,
    pub scope: Scope,
    pub id_rule: IdRule,
    pub locate: Locate,
    pub states: &'static [State],
}

const PRESENCE: &[State] = &[State::Present, State::Absent];
const PRESENCE_AND_ROLE: &[State] = &[
    State::Present,
    State::Absent,
    State::Enabled,
    State::Disabled,
];

static DESCRIPTORS: [KindDescriptor; 8] = [
    KindDescriptor {
        kind: ObjectKind::Resource,
        name: "resource",
        tag: Tag::Primitive,
        scope: Scope::Resources,
        id_rule: IdRule::Named,
        locate: Locate::ById,
        states: PRESENCE_AND_ROLE,
    },
    KindDescriptor {
        kind: ObjectKind::Group,
        name: "group",
        tag: Tag::Group,
        scope: Scope::Resources,
        id_rule: IdRule::Named,
        locate: Locate::ById,
        states: PRESENCE_AND_ROLE,
    },
    KindDescriptor {
        kind: ObjectKind::Colocation,
        name: "colocation",
        tag: Tag::RscColocation,
        scope: Scope::Constraints,
        id_rule: IdRule::Composite("colocation"),
        locate: Locate::Ends {
            first: "rsc",
            second: "with-rsc",
            symmetric: true,
        },
        states: PRESENCE,
    },
    KindDescriptor {
        kind: ObjectKind::Order,
        name: "order",
        tag: Tag::RscOrder,
        scope: Scope::Constraints,
        id_rule: IdRule::Composite("order"),
        locate: Locate::Ends {
            first: "first",
            second: "then",
            symmetric: false,
        },
        states: PRESENCE,
    },
    KindDescriptor {
        kind: ObjectKind::OrderSet,
        name: "order-set",
        tag: Tag::RscOrder,
        scope: Scope::Constraints,
        id_rule: IdRule::Named,
        locate: Locate::ById,
        states: PRESENCE,
    },
    KindDescriptor {
        kind: ObjectKind::Location,
        name: "location",
        tag: Tag::RscLocation,
        scope: Scope::Constraints,
        id_rule: IdRule::Composite("location"),
        locate: Locate::Ends {
            first: "rsc",
            second: "node",
            symmetric: false,
        },
        states: PRESENCE,
    },
    KindDescriptor {
        kind: ObjectKind::PropertySet,
        name: "property",
        tag: Tag::ClusterPropertySet,
        scope: Scope::CrmConfig,
        id_rule: IdRule::Fixed(crate::defaults::PROPERTY_SET_ID),
        locate: Locate::WellKnownSet,
        states: PRESENCE,
    },
    KindDescriptor {
        kind: ObjectKind::DefaultSet,
        name: "resource-default",
        tag: Tag::MetaAttributes,
        scope: Scope::RscDefaults,
        id_rule: IdRule::Fixed(crate::defaults::RESOURCE_DEFAULTS_SET_ID),
        locate: Locate::WellKnownSet,
        states: PRESENCE,
    },
];

impl ObjectKind {
    pub fn descriptor(&self) -> &'static KindDescriptor {
        let index = match self {
            ObjectKind::Resource => 0,
            ObjectKind::Group => 1,
            ObjectKind::Colocation => 2,
            ObjectKind::Order => 3,
            ObjectKind::OrderSet => 4,
            ObjectKind::Location => 5,
            ObjectKind::PropertySet => 6,
            ObjectKind::DefaultSet => 7,
        };
        &DESCRIPTORS[index]
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn supports(&self, state: State) -> bool {
        self.descriptor().states.contains(&state)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison rules attached to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagRules {
    /// Attribute pairs that swap places when a symmetric relation is written
    /// from its other end.
    pub mirrored: &'static [(&'static str, &'static str)],
    /// Child tag whose sequence is significant.
    pub ordered_child: Option<Tag>,
}

const COLOCATION_ENDS: &[(&str, &str)] = &[("rsc", "with-rsc"), ("rsc-role", "with-rsc-role")];

/// Rules for comparing nodes with `tag`.
pub fn tag_rules(tag: &Tag) -> TagRules {
    match tag {
        Tag::RscColocation => TagRules {
            mirrored: COLOCATION_ENDS,
            ordered_child: None,
        },
        Tag::ResourceSet => TagRules {
            mirrored: &[],
            ordered_child: Some(Tag::ResourceRef),
        },
        Tag::Group => TagRules {
            mirrored: &[],
            ordered_child: Some(Tag::Primitive),
        },
        Tag::RscOrder => TagRules {
            mirrored: &[],
            ordered_child: Some(Tag::ResourceSet),
        },
        _ => TagRules::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table_is_indexed_by_kind() {
        for kind in [
            ObjectKind::Resource,
            ObjectKind::Group,
            ObjectKind::Colocation,
            ObjectKind::Order,
            ObjectKind::OrderSet,
            ObjectKind::Location,
            ObjectKind::PropertySet,
            ObjectKind::DefaultSet,
        ] {
            assert_eq!(kind.descriptor().kind, kind);
        }
    }

    #[test]
    fn test_composite_id_is_deterministic() {
        let rule = ObjectKind::Colocation.descriptor().id_rule;
        assert_eq!(rule.derive(&["vip1", "vip2", "INFINITY"]), "colocation-vip1-vip2-INFINITY");
        assert_eq!(
            rule.derive(&["vip1", "vip2", "INFINITY"]),
            rule.derive(&["vip1", "vip2", "INFINITY"])
        );
    }

    #[test]
    fn test_fixed_and_named_ids() {
        assert_eq!(
            ObjectKind::PropertySet.descriptor().id_rule.derive(&[]),
            "cib-bootstrap-options"
        );
        assert_eq!(ObjectKind::OrderSet.descriptor().id_rule.derive(&["db-order"]), "db-order");
    }

    #[test]
    fn test_states_per_kind() {
        assert!(ObjectKind::Resource.supports(State::Disabled));
        assert!(ObjectKind::Group.supports(State::Enabled));
        assert!(!ObjectKind::Colocation.supports(State::Enabled));
        assert!(ObjectKind::Location.supports(State::Absent));
    }

    #[test]
    fn test_tag_rules() {
        assert_eq!(tag_rules(&Tag::Group).ordered_child, Some(Tag::Primitive));
        assert_eq!(tag_rules(&Tag::ResourceSet).ordered_child, Some(Tag::ResourceRef));
        assert_eq!(tag_rules(&Tag::RscColocation).mirrored.len(), 2);
        assert_eq!(tag_rules(&Tag::Primitive), TagRules::default());
    }
}
