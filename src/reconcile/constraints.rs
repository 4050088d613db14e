//! Constraint reconciliation in the `constraints` scope.
//!
//! All constraint kinds share one decision: locate the current nodes, then
//! remove them (absent), create the desired node (none found), or replace
//! every found node with the desired one when forced or when any of them
//! differs.

use super::{locate, Extra, Reconciler, Target};
use crate::build::constraint;
use crate::cib::{Node, Scope};
use crate::error::{Error, Result};
use crate::kinds::ObjectKind;
use crate::request::{Action, ColocationSpec, LocationSpec, OrderSetSpec, OrderSpec, State};
use log::info;

impl Reconciler<'_> {
    /// Apply the create/replace/remove decision for `target` in the
    /// `constraints` scope. `desired` is `None` for removal.
    fn settle(
        &self,
        kind: ObjectKind,
        target: Target,
        desired: Option<Node>,
        force: bool,
    ) -> Result<bool> {
        let comparator = self.comparator;
        self.edit(Scope::Constraints, |scope| {
            let mut found = locate(scope, kind, &target);
            let Some(desired) = desired else {
                for index in found.iter().rev() {
                    if let Some(removed) = scope.remove_child(*index) {
                        info!("removing {} {}", kind, removed.id().unwrap_or_default());
                    }
                }
                return Ok(!found.is_empty());
            };

            let id = desired.id().unwrap_or_default().to_string();
            // a node already carrying the derived id is the same constraint
            let tag = &kind.descriptor().tag;
            let same_id = scope.child_indices(|child| {
                child.tag() == tag && child.id() == Some(id.as_str())
            });
            for index in same_id {
                if !found.contains(&index) {
                    found.push(index);
                }
            }
            found.sort_unstable();

            let Some(&position) = found.first() else {
                if scope.contains_id(&id) {
                    return Err(Error::validation(format!(
                        "id {} is already used in the constraints scope",
                        id
                    )));
                }
                info!("creating {} {}", kind, id);
                scope.push(desired);
                return Ok(true);
            };

            let currents = found.iter().filter_map(|index| scope.children().get(*index));
            if !force && comparator.first_difference(currents, &desired).is_none() {
                return Ok(false);
            }
            info!("replacing {} existing {} with {}", found.len(), kind, id);
            for index in found.iter().rev() {
                scope.remove_child(*index);
            }
            scope.insert(position, desired);
            Ok(true)
        })
    }

    fn resources(&self) -> Result<Node> {
        self.accessor.fetch(Scope::Resources)
    }

    pub(super) fn colocation(&self, spec: &ColocationSpec) -> Result<bool> {
        let resources = self.resources()?;
        let desired = match spec.state {
            State::Absent => None,
            _ => Some(constraint::colocation(spec, &resources)?),
        };
        let (rsc, with_rsc) = constraint::colocation_ends(spec, &resources, desired.is_none())?;
        let target = Target::Ends {
            first: rsc,
            second: with_rsc,
            extra: Vec::new(),
        };
        self.settle(ObjectKind::Colocation, target, desired, spec.force)
    }

    pub(super) fn order(&self, spec: &OrderSpec) -> Result<bool> {
        let desired = match spec.state {
            State::Absent => None,
            _ => Some(constraint::order(spec, &self.resources()?)?),
        };
        let action = |attr, action: Option<Action>| Extra {
            attr,
            value: action.map(|action| action.as_str().to_string()),
            implied: Action::default().as_str(),
        };
        let target = Target::Ends {
            first: spec.first.clone(),
            second: spec.then.clone(),
            extra: vec![
                action("first-action", spec.first_action),
                action("then-action", spec.then_action),
            ],
        };
        self.settle(ObjectKind::Order, target, desired, spec.force)
    }

    pub(super) fn order_set(&self, spec: &OrderSetSpec) -> Result<bool> {
        let desired = match spec.state {
            State::Absent => None,
            _ => Some(constraint::order_set(spec, &self.resources()?)?),
        };
        let target = Target::Id(spec.name.clone());
        self.settle(ObjectKind::OrderSet, target, desired, spec.force)
    }

    pub(super) fn location(&self, spec: &LocationSpec) -> Result<bool> {
        let desired = match spec.state {
            State::Absent => None,
            _ => {
                let nodes = self.accessor.fetch(Scope::Nodes)?;
                Some(constraint::location(spec, &self.resources()?, &nodes)?)
            }
        };
        let target = Target::Ends {
            first: spec.resource.clone(),
            second: spec.node.clone(),
            extra: Vec::new(),
        };
        self.settle(ObjectKind::Location, target, desired, spec.force)
    }
}
