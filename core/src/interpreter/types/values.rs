//! Context value types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Flat name -> value map used for session context and merge updates
pub type ContextMap = BTreeMap<String, Val>;

/// Context value
///
/// Values are stored exactly as supplied. Case-insensitive comparison happens
/// through [`Val::selector`], never by rewriting what is stored, so consumers
/// outside the engine still see the original text and can tell an explicit
/// `false` from an unset key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Val {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl Val {
    /// Normalized text form used to look up transition entries
    ///
    /// Strings are lowercased, booleans become `true`/`false`, whole numbers
    /// drop their fractional part and null becomes `null`.
    pub fn selector(&self) -> String {
        match self {
            Val::Null => "null".to_string(),
            Val::Bool(b) => b.to_string(),
            Val::Num(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Val::Str(s) => s.to_lowercase(),
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Str(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.selector()),
        }
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Str(s.to_string())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::Str(s)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Num(n)
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Self {
        Val::Num(n as f64)
    }
}

/// Lowercase a raw selector (outcome key or transition key)
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}
