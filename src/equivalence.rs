//! # Structural Equivalence
//!
//! Decides whether a node fetched from the document and a freshly built
//! desired node denote the same configuration. The comparison is recursive
//! and driven by the per-tag [`TagRules`](crate::kinds::TagRules):
//!
//! 1. Tags must match.
//! 2. Attributes must be equal as sets of pairs. For symmetric relations the
//!    current node may instead be the exact mirror of the desired one.
//! 3. For a tag with an ordered child tag, children of that tag must match in
//!    count and position by position.
//! 4. Every other desired child with an `id` needs a current child with the
//!    same `id` that is itself equivalent.
//! 5. Every other desired child without an `id` needs an equivalent current
//!    sibling of the same tag (see [`ChildMatching`]).
//!
//! Children present only in the current node are ignored. The verdict is an
//! [`Equivalence`], and a difference carries the path and reason of the first
//! mismatch found.

use crate::cib::{Attributes, Node, Tag};
use crate::kinds::tag_rules;
use log::debug;
use std::fmt;

/// How desired children without an `id` are matched against current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildMatching {
    /// Each current child satisfies at most one desired child.
    #[default]
    OneToOne,
    /// Any equivalent current child satisfies a desired child, even if it
    /// already satisfied another.
    Existential,
}

/// Why two nodes differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    Tag { current: Tag, desired: Tag },
    Attributes,
    OrderedCount { tag: Tag, current: usize, desired: usize },
    MissingChild { id: String },
    UnmatchedChild { tag: Tag },
}

/// The first mismatch between two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Labels of the desired nodes from the compared root down to the
    /// mismatch (`id` when present, tag otherwise).
    pub path: Vec<String>,
    pub reason: Reason,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.path.join("/"))?;
        match &self.reason {
            Reason::Tag { current, desired } => {
                write!(f, "tag {} differs from {}", current, desired)
            }
            Reason::Attributes => f.write_str("attributes differ"),
            Reason::OrderedCount {
                tag,
                current,
                desired,
            } => write!(f, "{} {} children where {} are wanted", current, tag, desired),
            Reason::MissingChild { id } => write!(f, "no child with id {}", id),
            Reason::UnmatchedChild { tag } => write!(f, "no equivalent {} child", tag),
        }
    }
}

/// Result of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Equivalence {
    Equivalent,
    Different(Difference),
}

impl Equivalence {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Equivalence::Equivalent)
    }
}

fn label(node: &Node) -> String {
    node.id().unwrap_or(node.tag().as_str()).to_string()
}

/// Recursive comparator for configuration nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    matching: ChildMatching,
}

impl Comparator {
    pub fn new(matching: ChildMatching) -> Self {
        Self { matching }
    }

    /// Compare `current` with `desired`.
    pub fn compare(&self, current: &Node, desired: &Node) -> Equivalence {
        let verdict = match self.difference(current, desired) {
            None => Equivalence::Equivalent,
            Some(difference) => Equivalence::Different(difference),
        };
        match &verdict {
            Equivalence::Equivalent => debug!("{} is equivalent", label(desired)),
            Equivalence::Different(difference) => {
                debug!("{} differs: {}", label(desired), difference)
            }
        }
        verdict
    }

    /// First difference between any of `currents` and `desired`.
    pub fn first_difference<'a>(
        &self,
        currents: impl IntoIterator<Item = &'a Node>,
        desired: &Node,
    ) -> Option<Difference> {
        currents
            .into_iter()
            .find_map(|current| match self.compare(current, desired) {
                Equivalence::Equivalent => None,
                Equivalence::Different(difference) => Some(difference),
            })
    }

    fn difference(&self, current: &Node, desired: &Node) -> Option<Difference> {
        let here = |reason| {
            Some(Difference {
                path: vec![label(desired)],
                reason,
            })
        };

        if current.tag() != desired.tag() {
            return here(Reason::Tag {
                current: current.tag().clone(),
                desired: desired.tag().clone(),
            });
        }

        let rules = tag_rules(desired.tag());
        if current.attributes() != desired.attributes()
            && !mirrors(current.attributes(), desired.attributes(), rules.mirrored)
        {
            return here(Reason::Attributes);
        }

        let within = |difference: Difference| {
            let mut path = vec![label(desired)];
            path.extend(difference.path);
            Some(Difference {
                path,
                reason: difference.reason,
            })
        };

        if let Some(ordered) = &rules.ordered_child {
            let current_seq: Vec<&Node> = current
                .children()
                .iter()
                .filter(|child| child.tag() == ordered)
                .collect();
            let desired_seq: Vec<&Node> = desired
                .children()
                .iter()
                .filter(|child| child.tag() == ordered)
                .collect();
            if current_seq.len() != desired_seq.len() {
                return here(Reason::OrderedCount {
                    tag: ordered.clone(),
                    current: current_seq.len(),
                    desired: desired_seq.len(),
                });
            }
            for (c, d) in current_seq.iter().zip(&desired_seq) {
                if let Some(difference) = self.difference(c, d) {
                    return within(difference);
                }
            }
        }

        let mut used = vec![false; current.children().len()];
        for child in desired.children() {
            if rules.ordered_child.as_ref() == Some(child.tag()) {
                continue;
            }

            if let Some(id) = child.id() {
                let Some(counterpart) = current.child_by_id(id) else {
                    return here(Reason::MissingChild { id: id.to_string() });
                };
                if let Some(difference) = self.difference(counterpart, child) {
                    return within(difference);
                }
                continue;
            }

            let found = current
                .children()
                .iter()
                .enumerate()
                .filter(|(index, candidate)| {
                    candidate.tag() == child.tag()
                        && (self.matching == ChildMatching::Existential || !used[*index])
                })
                .find(|(_, candidate)| self.difference(candidate, child).is_none())
                .map(|(index, _)| index);
            match found {
                Some(index) => used[index] = true,
                None => {
                    return here(Reason::UnmatchedChild {
                        tag: child.tag().clone(),
                    })
                }
            }
        }

        None
    }
}

/// Whether `current`, with every mirrored pair swapped, equals `desired`
/// apart from `id`.
fn mirrors(current: &Attributes, desired: &Attributes, pairs: &[(&str, &str)]) -> bool {
    if pairs.is_empty() {
        return false;
    }
    let mut swapped = current.without(&["id"]);
    for (a, b) in pairs {
        let first = swapped.remove(a);
        let second = swapped.remove(b);
        if let Some(value) = first {
            swapped.set(*b, value);
        }
        if let Some(value) = second {
            swapped.set(*a, value);
        }
    }
    swapped == desired.without(&["id"])
}
