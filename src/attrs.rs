//! # Attribute-List Parsing
//!
//! Object parameters arrive as `key=value key2="quoted value"` text. This
//! module turns that text into an [`AttrMap`] once, at the API boundary, so the
//! builders and the comparator only ever see typed maps.
//!
//! Tokenization is shell-style: whitespace (including newlines) separates
//! tokens, single and double quotes group characters and are removed, and a
//! backslash outside single quotes escapes the next character.
//!
//! Two modes are supported:
//!
//! - [`PairMode::Strict`]: every token must be `key=value`.
//! - [`PairMode::ImplicitName`]: a bare token is stored under the implicit
//!   key [`IMPLICIT_KEY`], so `monitor interval=20s` becomes
//!   `{name: monitor, interval: 20s}`.

use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parsed attribute list. Keys are unique; iteration order is sorted.
pub type AttrMap = BTreeMap<String, String>;

/// Key a bare token is stored under in [`PairMode::ImplicitName`].
pub const IMPLICIT_KEY: &str = "name";

/// How a token without `=` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMode {
    /// Reject bare tokens with [`Error::InvalidParameter`].
    Strict,
    /// Store a bare token under [`IMPLICIT_KEY`].
    ImplicitName,
}

/// Split `input` into shell-style tokens.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unterminated(input)),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(unterminated(input)),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unterminated(input)),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => {
                        return Err(Error::validation(format!(
                            "trailing escape character in: {}",
                            input
                        )))
                    }
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

fn unterminated(input: &str) -> Error {
    Error::validation(format!("unterminated quote in: {}", input))
}

/// Parse an attribute list into a map.
///
/// Duplicate keys keep the last value.
///
/// # Examples
///
/// ```
/// use cib_reconcile::attrs::{parse, PairMode};
///
/// let map = parse("ip=192.168.50.206 label=\"front end\"", PairMode::Strict).unwrap();
/// assert_eq!(map["ip"], "192.168.50.206");
/// assert_eq!(map["label"], "front end");
/// ```
pub fn parse(input: &str, mode: PairMode) -> Result<AttrMap> {
    let mut map = AttrMap::new();

    for token in tokenize(input)? {
        let (key, value) = match token.split_once('=') {
            Some(("", _)) => return Err(Error::InvalidParameter { token }),
            Some((key, value)) => (key.to_string(), strip_quotes(value)),
            None => match mode {
                PairMode::Strict => return Err(Error::InvalidParameter { token }),
                PairMode::ImplicitName => (IMPLICIT_KEY.to_string(), token),
            },
        };

        if let Some(previous) = map.insert(key.clone(), value) {
            warn!(
                "duplicate key '{}' in attribute list (dropping value '{}')",
                key, previous
            );
        }
    }

    Ok(map)
}

fn strip_quotes(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value.trim_matches('"').to_string()
    } else {
        value.to_string()
    }
}

/// A scalar value in a structured attribute mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(value) => write!(f, "{}", value),
            ScalarValue::Int(value) => write!(f, "{}", value),
            ScalarValue::Float(value) => write!(f, "{}", value),
            ScalarValue::Text(value) => f.write_str(value),
        }
    }
}

/// An attribute list as supplied at the API boundary: either the textual
/// `key=value` form or an already structured mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrInput {
    Text(String),
    Map(BTreeMap<String, ScalarValue>),
}

impl AttrInput {
    /// Convert to an [`AttrMap`], parsing the textual form with `mode`.
    pub fn to_map(&self, mode: PairMode) -> Result<AttrMap> {
        match self {
            AttrInput::Text(text) => parse(text, mode),
            AttrInput::Map(map) => Ok(map
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect()),
        }
    }
}

impl From<&str> for AttrInput {
    fn from(text: &str) -> Self {
        AttrInput::Text(text.to_string())
    }
}

impl From<String> for AttrInput {
    fn from(text: String) -> Self {
        AttrInput::Text(text)
    }
}

/// Parse an optional attribute input; `None` yields an empty map.
pub fn parse_optional(input: Option<&AttrInput>, mode: PairMode) -> Result<AttrMap> {
    match input {
        Some(input) => input.to_map(mode),
        None => Ok(AttrMap::new()),
    }
}
