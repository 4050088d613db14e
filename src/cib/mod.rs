//! # Configuration Document
//!
//! The cluster configuration is one attributed tree owned by the external
//! resource manager. It is partitioned into named [`Scope`]s that are fetched
//! and committed as units:
//!
//! - **`node`**: the in-memory tree ([`Node`], [`Tag`], [`Attributes`],
//!   [`NodePath`]).
//! - **`xml`**: decoding and encoding the document's text form.
//! - **`accessor`**: the [`CibAccessor`] trait and its implementations, the
//!   only place the external document is read or written.

pub mod accessor;
pub mod node;
pub mod xml;

pub use accessor::{CibAccessor, CibadminAccessor, FileAccessor, MemoryAccessor};
pub use node::{Attributes, Node, NodePath, Tag};

use std::fmt;

/// A named subtree of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Resources,
    Constraints,
    Nodes,
    CrmConfig,
    RscDefaults,
}

impl Scope {
    /// Name used on the control surface and as the scope element's tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Resources => "resources",
            Scope::Constraints => "constraints",
            Scope::Nodes => "nodes",
            Scope::CrmConfig => "crm_config",
            Scope::RscDefaults => "rsc_defaults",
        }
    }

    /// An empty scope element.
    pub fn empty_node(&self) -> Node {
        Node::new(Tag::Other(self.as_str().to_string()))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locate a scope element inside a whole document.
///
/// The document root is expected to contain a `configuration` element that
/// holds each scope.
pub(crate) fn scope_path(document: &Node, scope: Scope) -> Option<NodePath> {
    let configuration = Tag::Other("configuration".to_string());
    let scope_tag = Tag::Other(scope.as_str().to_string());

    let (config_index, config) = document
        .children()
        .iter()
        .enumerate()
        .find(|(_, child)| child.tag() == &configuration)?;
    let scope_index = config
        .children()
        .iter()
        .position(|child| child.tag() == &scope_tag)?;

    Some(NodePath::from(vec![config_index, scope_index]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_names() {
        assert_eq!(Scope::Resources.as_str(), "resources");
        assert_eq!(Scope::CrmConfig.to_string(), "crm_config");
        assert_eq!(Scope::RscDefaults.empty_node().tag().as_str(), "rsc_defaults");
    }

    #[test]
    fn test_scope_path_finds_configuration_child() {
        let document = xml::parse(
            "<cib><configuration><crm_config/><nodes/><resources/><constraints/></configuration><status/></cib>",
        )
        .unwrap();
        let path = scope_path(&document, Scope::Constraints).unwrap();
        assert_eq!(path, NodePath::from(vec![0, 3]));
        assert!(scope_path(&document, Scope::RscDefaults).is_none());
    }
}
