//! Document access.
//!
//! [`CibAccessor`] is the boundary between the engine and the externally
//! persisted document. `fetch` is read-only and returns an owned copy of one
//! scope; `commit` consumes a scope and replaces it. Implementations:
//!
//! - [`CibadminAccessor`] runs the resource manager's control binary.
//! - [`FileAccessor`] edits a whole document stored in a file.
//! - [`MemoryAccessor`] keeps a document in memory and counts commits; tests
//!   use it in place of the external process.

use super::{scope_path, xml, Node, Scope, Tag};
use crate::error::{Error, Result};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Mutex, MutexGuard};

/// Fetch and commit access to named scopes of the configuration document.
pub trait CibAccessor: Send + Sync {
    /// Fetch a fresh copy of `scope`.
    fn fetch(&self, scope: Scope) -> Result<Node>;

    /// Replace `scope` with `subtree`. Either the whole scope is replaced or
    /// an error is returned.
    fn commit(&self, scope: Scope, subtree: Node) -> Result<()>;
}

/// Accessor backed by the `cibadmin` control binary.
pub struct CibadminAccessor {
    program: PathBuf,
}

impl CibadminAccessor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }
}

impl CibAccessor for CibadminAccessor {
    fn fetch(&self, scope: Scope) -> Result<Node> {
        let args = ["--query", "--scope", scope.as_str()];
        let command = self.describe(&args);
        debug!("running {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::Access {
                command: command.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Access {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        xml::parse(&String::from_utf8_lossy(&output.stdout))
    }

    fn commit(&self, scope: Scope, subtree: Node) -> Result<()> {
        let args = ["--replace", "--scope", scope.as_str(), "--xml-pipe"];
        let command = self.describe(&args);
        let text = xml::serialize(&subtree)?;
        debug!("running {}", command);

        let access_error = |e: std::io::Error| Error::Access {
            command: command.clone(),
            stderr: e.to_string(),
        };

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(access_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(access_error)?;
        }

        let output = child.wait_with_output().map_err(access_error)?;
        if !output.status.success() {
            return Err(Error::Access {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("committed scope {}", scope);
        Ok(())
    }
}

/// Accessor editing a whole document stored in a file.
pub struct FileAccessor {
    path: PathBuf,
}

impl FileAccessor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Node> {
        let text = fs::read_to_string(&self.path)?;
        xml::parse(&text)
    }
}

impl CibAccessor for FileAccessor {
    fn fetch(&self, scope: Scope) -> Result<Node> {
        let document = self.load()?;
        extract_scope(&document, scope).ok_or_else(|| Error::Access {
            command: format!("read {}", self.path.display()),
            stderr: format!("scope {} not found", scope),
        })
    }

    fn commit(&self, scope: Scope, subtree: Node) -> Result<()> {
        let mut document = self.load()?;
        replace_scope(&mut document, scope, subtree)?;
        fs::write(&self.path, xml::serialize(&document)?)?;
        info!("committed scope {} to {}", scope, self.path.display());
        Ok(())
    }
}

/// In-memory accessor holding a whole document.
pub struct MemoryAccessor {
    document: Mutex<Node>,
    commits: Mutex<Vec<Scope>>,
    commit_failure: Option<String>,
}

impl MemoryAccessor {
    pub fn new(document: Node) -> Self {
        Self {
            document: Mutex::new(document),
            commits: Mutex::new(Vec::new()),
            commit_failure: None,
        }
    }

    /// Parse `text` as a whole document.
    pub fn from_xml(text: &str) -> Result<Self> {
        Ok(Self::new(xml::parse(text)?))
    }

    /// Make every commit fail with `stderr`.
    pub fn failing_commits(mut self, stderr: impl Into<String>) -> Self {
        self.commit_failure = Some(stderr.into());
        self
    }

    /// A copy of the current document.
    pub fn document(&self) -> Node {
        lock(&self.document).clone()
    }

    /// Scopes committed so far, in order.
    pub fn commits(&self) -> Vec<Scope> {
        lock(&self.commits).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CibAccessor for MemoryAccessor {
    fn fetch(&self, scope: Scope) -> Result<Node> {
        extract_scope(&lock(&self.document), scope).ok_or_else(|| Error::Access {
            command: "fetch".to_string(),
            stderr: format!("scope {} not found", scope),
        })
    }

    fn commit(&self, scope: Scope, subtree: Node) -> Result<()> {
        if let Some(stderr) = &self.commit_failure {
            return Err(Error::Access {
                command: "commit".to_string(),
                stderr: stderr.clone(),
            });
        }
        replace_scope(&mut lock(&self.document), scope, subtree)?;
        lock(&self.commits).push(scope);
        Ok(())
    }
}

fn extract_scope(document: &Node, scope: Scope) -> Option<Node> {
    let path = scope_path(document, scope)?;
    document.node_at(&path).cloned()
}

fn replace_scope(document: &mut Node, scope: Scope, subtree: Node) -> Result<()> {
    if let Some(path) = scope_path(document, scope) {
        if let Some(slot) = document.node_at_mut(&path) {
            *slot = subtree;
            return Ok(());
        }
    }

    let configuration = Tag::Other("configuration".to_string());
    let config = document
        .child_by_tag_mut(&configuration)
        .ok_or_else(|| Error::MalformedDocument {
            message: "document has no configuration element".to_string(),
        })?;
    config.push(subtree);
    Ok(())
}
