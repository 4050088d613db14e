//! Resource and group reconciliation in the `resources` scope.

use super::Reconciler;
use crate::cib::{Scope, Tag};
use crate::error::Result;
use crate::request::{GroupSpec, ResourceSpec, State};
use crate::transform::Transformer;

impl Reconciler<'_> {
    fn transformer(&self) -> Transformer {
        Transformer::new(self.comparator)
    }

    pub(super) fn resource(&self, spec: &ResourceSpec) -> Result<bool> {
        let transformer = self.transformer();
        self.edit(Scope::Resources, |scope| match spec.state {
            State::Absent => transformer.remove_primitive(scope, &spec.name),
            State::Present => transformer.place_primitive(scope, spec),
            State::Enabled | State::Disabled => {
                let placed = match spec.agent {
                    Some(_) => transformer.place_primitive(scope, spec)?,
                    None => false,
                };
                let marked = transformer.set_enabled(
                    scope,
                    &Tag::Primitive,
                    &spec.name,
                    spec.state == State::Enabled,
                )?;
                Ok(placed || marked)
            }
        })
    }

    pub(super) fn group(&self, spec: &GroupSpec) -> Result<bool> {
        let transformer = self.transformer();
        self.edit(Scope::Resources, |scope| match spec.state {
            State::Absent => transformer.remove_group(scope, &spec.name),
            State::Present => transformer.place_group(scope, spec),
            State::Enabled | State::Disabled => {
                let placed = if spec.members.is_empty() {
                    false
                } else {
                    transformer.place_group(scope, spec)?
                };
                let marked = transformer.set_enabled(
                    scope,
                    &Tag::Group,
                    &spec.name,
                    spec.state == State::Enabled,
                )?;
                Ok(placed || marked)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::cib::{xml, MemoryAccessor, Scope};
    use crate::reconcile::Reconciler;
    use crate::request::Request;

    const DOCUMENT: &str = r#"<cib><configuration><crm_config/><nodes/><resources>
  <primitive id="vip1" class="ocf" provider="heartbeat" type="IPaddr2"/>
</resources><constraints/></configuration></cib>"#;

    fn request(yaml: &str) -> Request {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn resources(accessor: &MemoryAccessor) -> String {
        let document = accessor.document();
        let path = crate::cib::scope_path(&document, Scope::Resources).unwrap();
        xml::serialize(document.node_at(&path).unwrap()).unwrap()
    }

    #[test]
    fn test_disable_existing_resource_without_type() {
        let accessor = MemoryAccessor::from_xml(DOCUMENT).unwrap();
        let reconciler = Reconciler::new(&accessor);
        let disable = request("kind: resource\nname: vip1\nstate: disabled");

        assert!(reconciler.reconcile(&disable).changed);
        assert!(resources(&accessor).contains(r#"value="Stopped""#));
        assert!(!reconciler.reconcile(&disable).changed);

        let enable = request("kind: resource\nname: vip1\nstate: enabled");
        assert!(reconciler.reconcile(&enable).changed);
        assert!(!resources(&accessor).contains("Stopped"));
    }

    #[test]
    fn test_disable_missing_resource_fails() {
        let accessor = MemoryAccessor::from_xml(DOCUMENT).unwrap();
        let report = Reconciler::new(&accessor)
            .reconcile(&request("kind: resource\nname: ghost\nstate: disabled"));
        assert!(report.is_failed());
        assert_eq!(report.message(), Some("no such resource: ghost"));
        assert!(accessor.commits().is_empty());
    }

    #[test]
    fn test_disabled_group_is_created_then_marked() {
        let accessor = MemoryAccessor::from_xml(DOCUMENT).unwrap();
        let reconciler = Reconciler::new(&accessor);
        let report = reconciler.reconcile(&request(
            "kind: group\nname: g1\nresource: [vip1]\nstate: disabled",
        ));
        assert!(report.changed);
        let text = resources(&accessor);
        assert!(text.contains(r#"<group id="g1">"#));
        assert!(text.contains(r#"id="g1-meta_attributes-target-role""#));
        assert_eq!(accessor.commits(), vec![Scope::Resources]);
    }
}
