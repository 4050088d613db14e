//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = CibFixture::new(documents::CLUSTER);
//!     let mut cmd = fixture.command();
//!     cmd.arg("property").arg("--params").arg("stonith-enabled=false");
//! }
//! ```

use assert_fs::prelude::*;
use cib_reconcile::cib::{xml, MemoryAccessor, Node, Scope, Tag};
use cib_reconcile::request::Request;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::documents;
    #[allow(unused_imports)]
    pub use super::{memory, request, scope_of, scope_text};
    pub use super::CibFixture;
}

/// Configuration documents used as starting points.
#[allow(dead_code)]
pub mod documents {
    /// Two nodes, a handful of primitives, a master and an empty constraints scope.
    pub const CLUSTER: &str = r#"<cib admin_epoch="0" epoch="12" num_updates="0">
  <configuration>
    <crm_config>
      <cluster_property_set id="cib-bootstrap-options">
        <nvpair id="cib-bootstrap-options-have-watchdog" name="have-watchdog" value="false"/>
      </cluster_property_set>
    </crm_config>
    <nodes>
      <node id="1" uname="control1"/>
      <node id="2" uname="control2"/>
    </nodes>
    <resources>
      <primitive id="vip1" class="ocf" provider="heartbeat" type="IPaddr2">
        <instance_attributes id="vip1-instance_attributes">
          <nvpair id="vip1-instance_attributes-ip" name="ip" value="192.0.2.10"/>
        </instance_attributes>
      </primitive>
      <primitive id="vip2" class="ocf" provider="heartbeat" type="IPaddr2"/>
      <primitive id="haproxy" class="systemd" type="haproxy"/>
      <master id="galera-master">
        <primitive id="galera" class="ocf" provider="heartbeat" type="galera"/>
      </master>
    </resources>
    <constraints/>
    <rsc_defaults/>
  </configuration>
  <status/>
</cib>"#;

    /// A document without the rsc_defaults scope.
    pub const NO_DEFAULTS: &str = r#"<cib>
  <configuration>
    <crm_config/>
    <nodes/>
    <resources/>
    <constraints/>
  </configuration>
</cib>"#;
}

/// An in-memory accessor over `document`.
#[allow(dead_code)]
pub fn memory(document: &str) -> MemoryAccessor {
    MemoryAccessor::from_xml(document).expect("Failed to parse test document")
}

/// Parse a YAML request.
#[allow(dead_code)]
pub fn request(yaml: &str) -> Request {
    serde_yaml::from_str(yaml).expect("Failed to parse test request")
}

/// The `scope` element of a whole document.
#[allow(dead_code)]
pub fn scope_of(document: &Node, scope: Scope) -> Node {
    let configuration = document
        .child_by_tag(&Tag::Other("configuration".to_string()))
        .expect("document has no configuration");
    configuration
        .child_by_tag(&Tag::Other(scope.as_str().to_string()))
        .expect("scope missing")
        .clone()
}

/// Text form of `scope` in the accessor's current document.
#[allow(dead_code)]
pub fn scope_text(accessor: &MemoryAccessor, scope: Scope) -> String {
    xml::serialize(&scope_of(&accessor.document(), scope)).expect("Failed to serialize scope")
}

/// A temporary directory holding a `cib.xml` document file.
pub struct CibFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl CibFixture {
    pub fn new(document: &str) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("cib.xml")
            .write_str(document)
            .expect("Failed to write document");
        Self { temp_dir }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn cib_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("cib.xml")
    }

    /// Current content of the document file.
    pub fn cib(&self) -> String {
        std::fs::read_to_string(self.cib_path()).expect("Failed to read document")
    }

    /// A command for the binary operating on this fixture's document.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cib-reconcile");
        cmd.current_dir(self.path())
            .env_remove("CIB_RECONCILE_FILE")
            .env_remove("RUST_LOG")
            .arg("--cib-file")
            .arg(self.cib_path());
        cmd
    }
}
