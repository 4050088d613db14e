//! Cluster properties and resource defaults.

use super::{locate, Reconciler, Target};
use crate::build::nvset;
use crate::error::Result;
use crate::request::{PairsSpec, State};
use log::info;

impl Reconciler<'_> {
    pub(super) fn pairs(&self, spec: &PairsSpec) -> Result<bool> {
        let kind = spec.kind;
        let scope = kind.descriptor().scope;
        self.edit(scope, |scope| {
            let index = match locate(scope, kind, &Target::WellKnownSet).first() {
                Some(&index) => index,
                None if spec.state == State::Absent => return Ok(false),
                None => {
                    info!("creating {} set {}", kind, nvset::set_id(kind));
                    scope.push(nvset::empty_set(kind));
                    scope.children().len() - 1
                }
            };
            let Some(set) = scope.children_mut().get_mut(index) else {
                return Ok(false);
            };
            Ok(match spec.state {
                State::Absent => nvset::remove_pairs(set, &spec.params),
                _ => nvset::merge_pairs(set, &spec.params),
            })
        })
    }
}
