//! # Reconciliation Driver
//!
//! One reconciliation handles one request:
//!
//! 1. validate the request into a [`Spec`],
//! 2. fetch the scope(s) it needs from the [`CibAccessor`],
//! 3. build the desired node (validation failures stop here, before any
//!    mutation),
//! 4. locate the current node(s), compare, and mutate an owned copy of the
//!    scope,
//! 5. commit that copy if it changed and check mode is off.
//!
//! Every reconciliation fetches fresh state, so repeating a request is safe:
//! the second run finds the equivalent object and reports no change.
//!
//! ## Example
//!
//! ```
//! use cib_reconcile::cib::MemoryAccessor;
//! use cib_reconcile::reconcile::Reconciler;
//! use cib_reconcile::request::Request;
//!
//! let accessor = MemoryAccessor::from_xml(
//!     "<cib><configuration><crm_config/><resources/><constraints/></configuration></cib>",
//! )
//! .unwrap();
//! let request: Request =
//!     serde_yaml::from_str("kind: property\nparams: stonith-enabled=false").unwrap();
//!
//! let reconciler = Reconciler::new(&accessor);
//! assert!(reconciler.reconcile(&request).changed);
//! assert!(!reconciler.reconcile(&request).changed);
//! ```

mod constraints;
mod nvsets;
pub mod report;
mod resources;

pub use report::{Failure, Report};

use crate::build::nvset;
use crate::cib::{CibAccessor, Node, Scope};
use crate::equivalence::Comparator;
use crate::error::Result;
use crate::kinds::{Locate, ObjectKind};
use crate::request::{Request, Spec};
use log::{debug, info, warn};

/// What identifies the current node(s) of a desired object.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Id(String),
    /// Values of the kind's two end attributes, plus extra attributes that
    /// must match when given. An attribute missing from a current node
    /// counts as its implied value.
    Ends {
        first: String,
        second: String,
        extra: Vec<Extra>,
    },
    WellKnownSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Extra {
    attr: &'static str,
    value: Option<String>,
    implied: &'static str,
}

impl Target {
    fn matches(&self, locate: Locate, node: &Node) -> bool {
        match (locate, self) {
            (Locate::ById, Target::Id(id)) => node.id() == Some(id.as_str()),
            (
                Locate::Ends {
                    first: first_attr,
                    second: second_attr,
                    symmetric,
                },
                Target::Ends {
                    first,
                    second,
                    extra,
                },
            ) => {
                let ends = |a: &str, b: &str| {
                    node.get(first_attr) == Some(a) && node.get(second_attr) == Some(b)
                };
                (ends(first.as_str(), second.as_str())
                    || (symmetric && ends(second.as_str(), first.as_str())))
                    && extra.iter().all(|extra| match &extra.value {
                        None => true,
                        Some(value) => {
                            node.get(extra.attr).unwrap_or(extra.implied) == value.as_str()
                        }
                    })
            }
            _ => false,
        }
    }
}

/// Indices of the direct children of `scope` that are current nodes of
/// `target`.
fn locate(scope: &Node, kind: ObjectKind, target: &Target) -> Vec<usize> {
    let descriptor = kind.descriptor();
    if let (Locate::WellKnownSet, Target::WellKnownSet) = (descriptor.locate, target) {
        return nvset::find_set(scope, kind).into_iter().collect();
    }
    scope.child_indices(|child| {
        child.tag() == &descriptor.tag && target.matches(descriptor.locate, child)
    })
}

/// Drives requests against one document accessor.
pub struct Reconciler<'a> {
    accessor: &'a dyn CibAccessor,
    check_mode: bool,
    comparator: Comparator,
}

impl<'a> Reconciler<'a> {
    pub fn new(accessor: &'a dyn CibAccessor) -> Self {
        Self {
            accessor,
            check_mode: false,
            comparator: Comparator::default(),
        }
    }

    /// Compute changes without committing them.
    pub fn check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn is_check_mode(&self) -> bool {
        self.check_mode
    }

    /// Reconcile `request` and report the outcome. Failures are captured in
    /// the report rather than returned.
    pub fn reconcile(&self, request: &Request) -> Report {
        let report = Report::new(request);
        match request.to_spec().and_then(|spec| self.apply(&spec)) {
            Ok(changed) => report.with_changed(changed),
            Err(error) => {
                warn!("{} request failed: {}", request.kind(), error);
                report.with_failure(&error)
            }
        }
    }

    /// Reconcile a validated spec. Returns whether the document changed (or,
    /// in check mode, would have changed).
    pub fn apply(&self, spec: &Spec) -> Result<bool> {
        debug!("reconciling {} ({:?})", spec.kind(), spec);
        match spec {
            Spec::Resource(spec) => self.resource(spec),
            Spec::Group(spec) => self.group(spec),
            Spec::Colocation(spec) => self.colocation(spec),
            Spec::Order(spec) => self.order(spec),
            Spec::OrderSet(spec) => self.order_set(spec),
            Spec::Location(spec) => self.location(spec),
            Spec::Pairs(spec) => self.pairs(spec),
        }
    }

    /// Fetch `scope`, let `edit` mutate it, and commit if it reports a
    /// change.
    fn edit(&self, scope: Scope, edit: impl FnOnce(&mut Node) -> Result<bool>) -> Result<bool> {
        let mut subtree = self.accessor.fetch(scope)?;
        let changed = edit(&mut subtree)?;
        if !changed {
            debug!("scope {} unchanged", scope);
        } else if self.check_mode {
            info!("check mode: scope {} would change, not committing", scope);
        } else {
            self.accessor.commit(scope, subtree)?;
            info!("committed scope {}", scope);
        }
        Ok(changed)
    }
}
