//! Default values for cib-reconcile configuration.
//!
//! This module provides centralized default values used across commands and
//! the library, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Environment variable overriding the control binary path.
pub const CIBADMIN_ENV: &str = "CIB_RECONCILE_CIBADMIN";

/// Environment variable selecting an offline document file.
pub const CIB_FILE_ENV: &str = "CIB_RECONCILE_FILE";

/// Score used by colocation and location constraints when none is given.
pub const DEFAULT_SCORE: &str = "INFINITY";

/// Interval assigned to a resource operation that does not name one.
pub const DEFAULT_OP_INTERVAL: &str = "0s";

/// Order kind used in derived order constraint identifiers.
pub const DEFAULT_ORDER_KIND: &str = "mandatory";

/// Identifier of the cluster-wide property set.
pub const PROPERTY_SET_ID: &str = "cib-bootstrap-options";

/// Identifier of the resource defaults set.
pub const RESOURCE_DEFAULTS_SET_ID: &str = "rsc_defaults-options";

/// Returns the default path of the control binary.
///
/// This can be overridden by the `--cibadmin` CLI flag or the
/// `CIB_RECONCILE_CIBADMIN` environment variable.
pub fn default_cibadmin() -> PathBuf {
    PathBuf::from("/usr/sbin/cibadmin")
}
