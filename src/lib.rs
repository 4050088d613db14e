//! # Cluster Configuration Reconciliation Library
//!
//! This library brings objects in a Pacemaker cluster configuration (the
//! CIB) to a requested state idempotently. It is the engine behind the
//! `cib-reconcile` command-line tool and can be embedded wherever the same
//! "declare what should exist, change only what differs" behavior is needed.
//!
//! ## Quick Example
//!
//! ```
//! use cib_reconcile::cib::MemoryAccessor;
//! use cib_reconcile::reconcile::Reconciler;
//! use cib_reconcile::request::Request;
//!
//! let accessor = MemoryAccessor::from_xml(
//!     r#"<cib><configuration><crm_config/><nodes/><resources/><constraints/></configuration></cib>"#,
//! )
//! .unwrap();
//!
//! let request: Request = serde_yaml::from_str(
//!     "kind: resource\nname: vip1\ntype: ocf:heartbeat:IPaddr2\nparams: ip=192.0.2.10",
//! )
//! .unwrap();
//!
//! let reconciler = Reconciler::new(&accessor);
//! let first = reconciler.reconcile(&request);
//! assert!(first.changed);
//!
//! // Nothing left to do the second time.
//! let second = reconciler.reconcile(&request);
//! assert!(!second.changed);
//! ```
//!
//! ## Core Concepts
//!
//! - **Requests (`request`)**: one tagged request per object kind, validated
//!   into a typed spec before anything is fetched.
//! - **Documents (`cib`)**: the in-memory tree, its text codec, and the
//!   accessors that fetch and commit scopes (the external `cibadmin` tool, a
//!   document file, or memory).
//! - **Kinds (`kinds`)**: a small descriptor table holding everything that
//!   differs between object kinds.
//! - **Builders (`build`)**: turn a spec into the desired node.
//! - **Equivalence (`equivalence`)**: decides whether the current node
//!   already satisfies the desired one.
//! - **Transformer (`transform`)**: moves primitives between bare, cloned,
//!   master and grouped forms without ever duplicating them.
//! - **Driver (`reconcile`)**: runs one request end to end and reports
//!   whether anything changed.
//!
//! ## Execution Flow
//!
//! 1.  **Validate**: the request becomes a spec; malformed input fails here.
//! 2.  **Fetch**: the scope(s) the kind needs are read through the accessor.
//! 3.  **Build**: the desired node is built and its references checked.
//! 4.  **Compare and mutate**: the current node(s) are located and created,
//!     replaced, or removed in an owned copy of the scope.
//! 5.  **Commit**: the copy is written back, unless nothing changed or check
//!     mode is on.

pub mod attrs;
pub mod build;
pub mod cib;
pub mod defaults;
pub mod equivalence;
pub mod error;
pub mod kinds;
pub mod output;
pub mod reconcile;
pub mod request;
pub mod transform;

#[cfg(test)]
mod attrs_proptest;
