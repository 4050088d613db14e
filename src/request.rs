//! # Requests
//!
//! A request is the caller's declared intent for one configuration object.
//! Requests arrive in a loose, serializable form ([`Request`]) that mirrors
//! the control surface: parameter blobs are still text or mappings, and
//! participants may still carry an inline `=role` suffix. [`Request::to_spec`]
//! validates a request and turns it into a typed [`Spec`], which is the only
//! form the builders and the driver see.
//!
//! ## Example
//!
//! ```
//! use cib_reconcile::request::{Request, Spec};
//!
//! let request: Request = serde_yaml::from_str(
//!     "kind: colocation\nmaster: db\nslave: vip\nscore: '100'",
//! )
//! .unwrap();
//! match request.to_spec().unwrap() {
//!     Spec::Colocation(spec) => assert_eq!(spec.score, "100"),
//!     _ => unreachable!(),
//! }
//! ```

use crate::attrs::{parse_optional, AttrInput, AttrMap, PairMode};
use crate::cib::Tag;
use crate::defaults;
use crate::error::{Error, Result};
use crate::kinds::ObjectKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const SCORE_PATTERN: &str = r"^[+-]?(INFINITY|[0-9]+)$";

/// Target state of a request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Present,
    Absent,
    Enabled,
    Disabled,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Present => "present",
            State::Absent => "absent",
            State::Enabled => "enabled",
            State::Disabled => "disabled",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource action named by an order constraint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Start,
    Stop,
    Promote,
    Demote,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Promote => "promote",
            Action::Demote => "demote",
        }
    }
}

/// Role offered by a master/replica wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave,
}

impl Role {
    /// Value written into constraint attributes.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Role::Master => "Master",
            Role::Slave => "Slave",
        }
    }

    fn parse(text: &str) -> Result<Role> {
        match text.to_ascii_lowercase().as_str() {
            "master" => Ok(Role::Master),
            "slave" => Ok(Role::Slave),
            _ => Err(Error::InvalidRole {
                role: text.to_string(),
            }),
        }
    }
}

/// A resource named by a constraint, with an optional requested role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub role: Option<Role>,
}

impl Participant {
    pub fn new(name: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Parse `name` or `name=role`.
    pub fn parse(text: &str) -> Result<Participant> {
        let text = text.trim();
        let (name, role) = match text.split_once('=') {
            Some((name, role)) => (name, Some(Role::parse(role)?)),
            None => (text, None),
        };
        if name.is_empty() {
            return Err(Error::validation(format!("empty resource name in '{}'", text)));
        }
        Ok(Participant::new(name, role))
    }
}

/// `resource_sets` accepts one list or a list of lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceSets {
    Nested(Vec<Vec<String>>),
    Flat(Vec<String>),
}

impl ResourceSets {
    pub fn sets(&self) -> Vec<Vec<String>> {
        match self {
            ResourceSets::Nested(sets) => sets.clone(),
            ResourceSets::Flat(set) => vec![set.clone()],
        }
    }
}

impl Default for ResourceSets {
    fn default() -> Self {
        ResourceSets::Nested(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub params: Option<AttrInput>,
    #[serde(default)]
    pub meta: Option<AttrInput>,
    #[serde(default)]
    pub op: Vec<AttrInput>,
    #[serde(default)]
    pub clone: Option<AttrInput>,
    #[serde(default)]
    pub master: Option<AttrInput>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupRequest {
    pub name: String,
    #[serde(default)]
    pub resource: Vec<String>,
    #[serde(default)]
    pub meta: Option<AttrInput>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColocationRequest {
    #[serde(default)]
    pub master: Option<String>,
    #[serde(default)]
    pub slave: Option<String>,
    #[serde(default)]
    pub resource: Vec<String>,
    #[serde(default = "default_score")]
    pub score: String,
    #[serde(default)]
    pub option: Option<AttrInput>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub force: bool,
}

impl Default for ColocationRequest {
    fn default() -> Self {
        Self {
            master: None,
            slave: None,
            resource: Vec::new(),
            score: default_score(),
            option: None,
            state: State::Present,
            force: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderRequest {
    pub resource1: String,
    #[serde(default)]
    pub resource1_action: Option<Action>,
    pub resource2: String,
    #[serde(default)]
    pub resource2_action: Option<Action>,
    #[serde(default)]
    pub params: Option<AttrInput>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderSetRequest {
    pub name: String,
    #[serde(default)]
    pub resource_sets: ResourceSets,
    #[serde(default)]
    pub params: Option<AttrInput>,
    #[serde(default)]
    pub set_options: Option<AttrInput>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub resource: String,
    pub node: String,
    #[serde(default = "default_score")]
    pub score: String,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub force: bool,
}

/// Request for an nvpair set (cluster properties, resource defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsRequest {
    pub params: AttrInput,
    #[serde(default)]
    pub state: State,
}

fn default_score() -> String {
    defaults::DEFAULT_SCORE.to_string()
}

/// One unit of work, tagged by object kind.
///
/// In YAML/JSON the tag is the `kind` field: `resource`, `group`,
/// `colocation`, `order`, `order-set`, `location`, `property`,
/// `resource-default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Request {
    Resource(ResourceRequest),
    Group(GroupRequest),
    Colocation(ColocationRequest),
    Order(OrderRequest),
    OrderSet(OrderSetRequest),
    Location(LocationRequest),
    Property(PairsRequest),
    ResourceDefault(PairsRequest),
}

impl Request {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Request::Resource(_) => ObjectKind::Resource,
            Request::Group(_) => ObjectKind::Group,
            Request::Colocation(_) => ObjectKind::Colocation,
            Request::Order(_) => ObjectKind::Order,
            Request::OrderSet(_) => ObjectKind::OrderSet,
            Request::Location(_) => ObjectKind::Location,
            Request::Property(_) => ObjectKind::PropertySet,
            Request::ResourceDefault(_) => ObjectKind::DefaultSet,
        }
    }

    pub fn state(&self) -> State {
        match self {
            Request::Resource(r) => r.state,
            Request::Group(r) => r.state,
            Request::Colocation(r) => r.state,
            Request::Order(r) => r.state,
            Request::OrderSet(r) => r.state,
            Request::Location(r) => r.state,
            Request::Property(r) | Request::ResourceDefault(r) => r.state,
        }
    }

    /// Validate and convert into a typed [`Spec`].
    pub fn to_spec(&self) -> Result<Spec> {
        let kind = self.kind();
        let state = self.state();
        if !kind.supports(state) {
            return Err(Error::validation(format!(
                "state '{}' is not supported for {}",
                state, kind
            )));
        }

        let spec = match self {
            Request::Resource(r) => Spec::Resource(resource_spec(r)?),
            Request::Group(r) => Spec::Group(group_spec(r)?),
            Request::Colocation(r) => Spec::Colocation(colocation_spec(r)?),
            Request::Order(r) => Spec::Order(order_spec(r)?),
            Request::OrderSet(r) => Spec::OrderSet(order_set_spec(r)?),
            Request::Location(r) => Spec::Location(location_spec(r)?),
            Request::Property(r) => Spec::Pairs(pairs_spec(ObjectKind::PropertySet, r)?),
            Request::ResourceDefault(r) => {
                Spec::Pairs(pairs_spec(ObjectKind::DefaultSet, r)?)
            }
        };
        Ok(spec)
    }
}

/// Resource agent, `class:provider:type` or `class:type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub class: String,
    pub provider: Option<String>,
    pub kind: String,
}

impl Agent {
    pub fn parse(text: &str) -> Result<Agent> {
        let parts: Vec<&str> = text.split(':').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid_agent(text));
        }
        match parts.as_slice() {
            [class, provider, kind] => Ok(Agent {
                class: class.to_string(),
                provider: Some(provider.to_string()),
                kind: kind.to_string(),
            }),
            [class, kind] => Ok(Agent {
                class: class.to_string(),
                provider: None,
                kind: kind.to_string(),
            }),
            _ => Err(invalid_agent(text)),
        }
    }
}

fn invalid_agent(text: &str) -> Error {
    Error::validation(format!(
        "invalid resource type '{}': expected class:provider:type or class:type",
        text
    ))
}

/// Requested clone or master wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperSpec {
    pub tag: Tag,
    /// Explicit wrapper id from an `id=` option.
    pub id: Option<String>,
    pub meta: AttrMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub name: String,
    pub agent: Option<Agent>,
    pub params: AttrMap,
    pub meta: AttrMap,
    pub ops: Vec<AttrMap>,
    pub wrapper: Option<WrapperSpec>,
    pub state: State,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub members: Vec<String>,
    pub meta: AttrMap,
    pub state: State,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColocationSpec {
    pub rsc: Participant,
    pub with_rsc: Participant,
    pub score: String,
    pub options: AttrMap,
    pub state: State,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub first: String,
    pub first_action: Option<Action>,
    pub then: String,
    pub then_action: Option<Action>,
    pub params: AttrMap,
    pub state: State,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSetSpec {
    pub name: String,
    pub sets: Vec<Vec<Participant>>,
    pub params: AttrMap,
    pub set_options: AttrMap,
    pub state: State,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSpec {
    pub resource: String,
    pub node: String,
    pub score: String,
    pub state: State,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairsSpec {
    pub kind: ObjectKind,
    pub params: AttrMap,
    pub state: State,
}

/// Validated desired state for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    Resource(ResourceSpec),
    Group(GroupSpec),
    Colocation(ColocationSpec),
    Order(OrderSpec),
    OrderSet(OrderSetSpec),
    Location(LocationSpec),
    Pairs(PairsSpec),
}

impl Spec {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Spec::Resource(_) => ObjectKind::Resource,
            Spec::Group(_) => ObjectKind::Group,
            Spec::Colocation(_) => ObjectKind::Colocation,
            Spec::Order(_) => ObjectKind::Order,
            Spec::OrderSet(_) => ObjectKind::OrderSet,
            Spec::Location(_) => ObjectKind::Location,
            Spec::Pairs(spec) => spec.kind,
        }
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Check a constraint score.
pub fn validate_score(score: &str) -> Result<()> {
    let pattern = Regex::new(SCORE_PATTERN)?;
    if !pattern.is_match(score) {
        return Err(Error::validation(format!(
            "invalid score '{}': expected an integer or [+-]INFINITY",
            score
        )));
    }
    Ok(())
}

/// Attribute keys a constraint's free-form options may not override.
fn reject_reserved(map: &AttrMap, reserved: &[&str], field: &str) -> Result<()> {
    if let Some(key) = map.keys().find(|key| reserved.contains(&key.as_str())) {
        return Err(Error::validation(format!(
            "{} may not set '{}'",
            field, key
        )));
    }
    Ok(())
}

fn resource_spec(r: &ResourceRequest) -> Result<ResourceSpec> {
    require(&r.name, "name")?;

    let agent = r.agent.as_deref().map(Agent::parse).transpose()?;
    if r.state == State::Present && agent.is_none() {
        return Err(Error::validation("type is required when state is present"));
    }

    let wrapper = match (&r.clone, &r.master) {
        (Some(_), Some(_)) => {
            return Err(Error::validation("clone and master are mutually exclusive"))
        }
        (Some(options), None) => Some(wrapper_spec(Tag::Clone, options)?),
        (None, Some(options)) => Some(wrapper_spec(Tag::Master, options)?),
        (None, None) => None,
    };

    let mut ops = Vec::with_capacity(r.op.len());
    for op in &r.op {
        let map = op.to_map(PairMode::ImplicitName)?;
        if !map.contains_key("name") {
            return Err(Error::validation("op requires an operation name"));
        }
        ops.push(map);
    }

    Ok(ResourceSpec {
        name: r.name.clone(),
        agent,
        params: parse_optional(r.params.as_ref(), PairMode::Strict)?,
        meta: parse_optional(r.meta.as_ref(), PairMode::Strict)?,
        ops,
        wrapper,
        state: r.state,
        force: r.force,
    })
}

fn wrapper_spec(tag: Tag, options: &AttrInput) -> Result<WrapperSpec> {
    let mut meta = options.to_map(PairMode::Strict)?;
    let id = meta.remove("id");
    Ok(WrapperSpec { tag, id, meta })
}

fn group_spec(r: &GroupRequest) -> Result<GroupSpec> {
    require(&r.name, "name")?;
    if r.state == State::Present && r.resource.is_empty() {
        return Err(Error::validation("a group needs at least one resource"));
    }
    let mut members: Vec<String> = Vec::with_capacity(r.resource.len());
    for member in &r.resource {
        require(member, "resource")?;
        if members.contains(member) {
            return Err(Error::validation(format!(
                "resource {} listed twice in group {}",
                member, r.name
            )));
        }
        members.push(member.clone());
    }
    Ok(GroupSpec {
        name: r.name.clone(),
        members,
        meta: parse_optional(r.meta.as_ref(), PairMode::Strict)?,
        state: r.state,
        force: r.force,
    })
}

const COLOCATION_RESERVED: &[&str] = &[
    "id",
    "rsc",
    "with-rsc",
    "rsc-role",
    "with-rsc-role",
    "score",
];
const ORDER_RESERVED: &[&str] = &["id", "first", "first-action", "then", "then-action"];

fn colocation_spec(r: &ColocationRequest) -> Result<ColocationSpec> {
    let pair_given = r.master.is_some() || r.slave.is_some();
    let (rsc, with_rsc) = match (r.resource.len(), pair_given) {
        (2, false) => (
            Participant::parse(&r.resource[0])?,
            Participant::parse(&r.resource[1])?,
        ),
        (0, true) => match (&r.master, &r.slave) {
            (Some(master), Some(slave)) => {
                require(master, "master")?;
                require(slave, "slave")?;
                (
                    Participant::new(master.trim(), Some(Role::Master)),
                    Participant::new(slave.trim(), Some(Role::Slave)),
                )
            }
            _ => return Err(Error::validation("master and slave must be given together")),
        },
        (0, false) => {
            return Err(Error::validation(
                "either master/slave or resource is required",
            ))
        }
        (_, true) => {
            return Err(Error::validation(
                "can't use both master/slave and resource at once",
            ))
        }
        (_, false) => {
            return Err(Error::validation(
                "resource parameter should have 2 resource ids",
            ))
        }
    };
    validate_score(&r.score)?;
    let options = parse_optional(r.option.as_ref(), PairMode::Strict)?;
    reject_reserved(&options, COLOCATION_RESERVED, "option")?;

    Ok(ColocationSpec {
        rsc,
        with_rsc,
        score: r.score.clone(),
        options,
        state: r.state,
        force: r.force,
    })
}

fn order_spec(r: &OrderRequest) -> Result<OrderSpec> {
    require(&r.resource1, "resource1")?;
    require(&r.resource2, "resource2")?;
    let params = parse_optional(r.params.as_ref(), PairMode::Strict)?;
    reject_reserved(&params, ORDER_RESERVED, "params")?;

    let present = r.state == State::Present;
    let action = |action: Option<Action>| {
        if present {
            Some(action.unwrap_or_default())
        } else {
            action
        }
    };

    Ok(OrderSpec {
        first: r.resource1.clone(),
        first_action: action(r.resource1_action),
        then: r.resource2.clone(),
        then_action: action(r.resource2_action),
        params,
        state: r.state,
        force: r.force,
    })
}

fn order_set_spec(r: &OrderSetRequest) -> Result<OrderSetSpec> {
    require(&r.name, "name")?;
    let raw = r.resource_sets.sets();
    if r.state == State::Present && (raw.is_empty() || raw.iter().any(Vec::is_empty)) {
        return Err(Error::validation("resource_sets must contain non-empty sets"));
    }

    let mut sets = Vec::with_capacity(raw.len());
    for set in &raw {
        let members = set
            .iter()
            .map(|member| Participant::parse(member))
            .collect::<Result<Vec<_>>>()?;
        sets.push(members);
    }

    let params = parse_optional(r.params.as_ref(), PairMode::Strict)?;
    reject_reserved(&params, &["id"], "params")?;
    let set_options = parse_optional(r.set_options.as_ref(), PairMode::Strict)?;
    reject_reserved(&set_options, &["id"], "set_options")?;

    Ok(OrderSetSpec {
        name: r.name.clone(),
        sets,
        params,
        set_options,
        state: r.state,
        force: r.force,
    })
}

fn location_spec(r: &LocationRequest) -> Result<LocationSpec> {
    require(&r.resource, "resource")?;
    require(&r.node, "node")?;
    validate_score(&r.score)?;
    Ok(LocationSpec {
        resource: r.resource.clone(),
        node: r.node.clone(),
        score: r.score.clone(),
        state: r.state,
        force: r.force,
    })
}

fn pairs_spec(kind: ObjectKind, r: &PairsRequest) -> Result<PairsSpec> {
    let params = r.params.to_map(PairMode::Strict)?;
    if params.is_empty() {
        return Err(Error::validation("params must name at least one attribute"));
    }
    Ok(PairsSpec {
        kind,
        params,
        state: r.state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn resource(yaml: &str) -> Result<Spec> {
        let request: Request = serde_yaml::from_str(yaml).unwrap();
        request.to_spec()
    }

    #[test]
    fn test_request_is_tagged_by_kind() {
        let request: Request =
            serde_yaml::from_str("kind: order-set\nname: db\nresource_sets: [a, b]").unwrap();
        assert_eq!(request.kind(), ObjectKind::OrderSet);
        assert_eq!(request.state(), State::Present);

        let request: Request =
            serde_yaml::from_str("kind: resource-default\nparams: resource-stickiness=100")
                .unwrap();
        assert_eq!(request.kind(), ObjectKind::DefaultSet);
    }

    #[test]
    fn test_resource_spec_parses_agent_and_ops() {
        let spec = resource(
            "kind: resource\nname: vip1\ntype: ocf:heartbeat:IPaddr2\nparams: ip=10.0.0.1\nop:\n  - monitor interval=20s\n  - start",
        )
        .unwrap();
        let Spec::Resource(spec) = spec else {
            panic!("expected a resource spec");
        };
        let agent = spec.agent.unwrap();
        assert_eq!(agent.class, "ocf");
        assert_eq!(agent.provider.as_deref(), Some("heartbeat"));
        assert_eq!(agent.kind, "IPaddr2");
        assert_eq!(spec.params["ip"], "10.0.0.1");
        assert_eq!(spec.ops.len(), 2);
        assert_eq!(spec.ops[0]["name"], "monitor");
        assert!(spec.wrapper.is_none());
    }

    #[test]
    fn test_agent_without_provider() {
        let agent = Agent::parse("stonith:fence_ipmilan").unwrap();
        assert_eq!(agent.provider, None);
        assert!(Agent::parse("ocf").is_err());
        assert!(Agent::parse("a:b:c:d").is_err());
        assert!(Agent::parse("ocf::IPaddr2").is_err());
    }

    #[test]
    fn test_resource_requires_type_for_present() {
        let err = resource("kind: resource\nname: vip1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(resource("kind: resource\nname: vip1\nstate: disabled").is_ok());
        assert!(resource("kind: resource\nname: vip1\nstate: absent").is_ok());
    }

    #[test]
    fn test_clone_and_master_are_exclusive() {
        let err =
            resource("kind: resource\nname: p\ntype: ocf:pacemaker:Stateful\nclone: ''\nmaster: ''")
                .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_wrapper_id_option_is_split_off() {
        let Spec::Resource(spec) =
            resource("kind: resource\nname: p\ntype: ocf:pacemaker:Stateful\nmaster: id=ms-p notify=true")
                .unwrap()
        else {
            panic!("expected a resource spec");
        };
        let wrapper = spec.wrapper.unwrap();
        assert_eq!(wrapper.tag, Tag::Master);
        assert_eq!(wrapper.id.as_deref(), Some("ms-p"));
        assert_eq!(wrapper.meta.len(), 1);
        assert_eq!(wrapper.meta["notify"], "true");
    }

    #[test]
    fn test_op_without_name_is_rejected() {
        let err =
            resource("kind: resource\nname: p\ntype: ocf:a:b\nop: ['interval=10s']").unwrap_err();
        assert!(err.to_string().contains("operation name"));
    }

    #[test]
    fn test_colocation_master_slave_sugar() {
        let Spec::Colocation(spec) = resource("kind: colocation\nmaster: db\nslave: vip").unwrap()
        else {
            panic!("expected a colocation spec");
        };
        assert_eq!(spec.rsc, Participant::new("db", Some(Role::Master)));
        assert_eq!(spec.with_rsc, Participant::new("vip", Some(Role::Slave)));
        assert_eq!(spec.score, "INFINITY");
    }

    #[test]
    fn test_colocation_resource_forms() {
        assert!(resource("kind: colocation\nresource: [a, b]").is_ok());
        let err = resource("kind: colocation\nresource: [a]").unwrap_err();
        assert!(err.to_string().contains("2 resource ids"));
        let err = resource("kind: colocation\nresource: [a, b]\nmaster: c\nslave: d").unwrap_err();
        assert!(err.to_string().contains("both"));
        let err = resource("kind: colocation").unwrap_err();
        assert!(err.to_string().contains("either"));
    }

    #[test]
    fn test_colocation_role_suffix() {
        let Spec::Colocation(spec) =
            resource("kind: colocation\nresource: ['db=master', vip]").unwrap()
        else {
            panic!("expected a colocation spec");
        };
        assert_eq!(spec.rsc.role, Some(Role::Master));
        assert_eq!(spec.with_rsc.role, None);

        let err = resource("kind: colocation\nresource: ['db=leader', vip]").unwrap_err();
        assert!(matches!(err, Error::InvalidRole { ref role } if role == "leader"));
    }

    #[test]
    fn test_colocation_rejects_enabled_state() {
        let err = resource("kind: colocation\nresource: [a, b]\nstate: enabled").unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_colocation_option_cannot_override_structure() {
        let err = resource("kind: colocation\nresource: [a, b]\noption: rsc=c").unwrap_err();
        assert!(err.to_string().contains("'rsc'"));
        assert!(
            resource("kind: colocation\nresource: [a, b]\noption: node-attribute=rack").is_ok()
        );
    }

    #[test]
    fn test_score_validation() {
        for score in ["INFINITY", "-INFINITY", "+INFINITY", "100", "-200", "0"] {
            assert!(validate_score(score).is_ok(), "{}", score);
        }
        for score in ["inf", "1.5", "", "10a"] {
            assert!(validate_score(score).is_err(), "{}", score);
        }
        let err = resource("kind: location\nresource: a\nnode: n\nscore: high").unwrap_err();
        assert!(err.to_string().contains("invalid score"));
    }

    #[test]
    fn test_order_actions_default_for_present_only() {
        let Spec::Order(spec) = resource("kind: order\nresource1: a\nresource2: b").unwrap() else {
            panic!("expected an order spec");
        };
        assert_eq!(spec.first_action, Some(Action::Start));
        assert_eq!(spec.then_action, Some(Action::Start));

        let Spec::Order(spec) =
            resource("kind: order\nresource1: a\nresource2: b\nstate: absent").unwrap()
        else {
            panic!("expected an order spec");
        };
        assert_eq!(spec.first_action, None);
    }

    #[test]
    fn test_order_set_flat_and_nested() {
        let Spec::OrderSet(spec) =
            resource("kind: order-set\nname: db\nresource_sets: [a, b]").unwrap()
        else {
            panic!("expected an order-set spec");
        };
        assert_eq!(spec.sets.len(), 1);
        assert_eq!(spec.sets[0].len(), 2);

        let Spec::OrderSet(spec) = resource(
            "kind: order-set\nname: db\nresource_sets:\n  - [a, 'b=master']\n  - [c]",
        )
        .unwrap() else {
            panic!("expected an order-set spec");
        };
        assert_eq!(spec.sets.len(), 2);
        assert_eq!(spec.sets[0][1].role, Some(Role::Master));
    }

    #[test]
    fn test_group_rejects_duplicate_members() {
        let err = resource("kind: group\nname: g\nresource: [a, a]").unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_pairs_spec_is_strict() {
        let err = resource("kind: property\nparams: stonith-enabled").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));

        let Spec::Pairs(spec) =
            resource("kind: property\nparams:\n  stonith-enabled: false").unwrap()
        else {
            panic!("expected a pairs spec");
        };
        assert_eq!(spec.kind, ObjectKind::PropertySet);
        assert_eq!(spec.params["stonith-enabled"], "false");
    }
}
