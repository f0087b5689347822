//! Context store
//!
//! Session-scoped flow variables consulted by switches and exposed to views.

use super::types::{ContextMap, Val};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    vars: ContextMap,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(vars: ContextMap) -> Self {
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&Val> {
        self.vars.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Val>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Merge updates into the store; incoming values win
    pub fn merge(&mut self, updates: &ContextMap) {
        for (key, value) in updates {
            self.vars.insert(key.clone(), value.clone());
        }
    }

    /// Normalized selector for `key`; an absent key selects as `null`
    pub fn selector_for(&self, key: &str) -> String {
        self.vars.get(key).unwrap_or(&Val::Null).selector()
    }

    /// Current values of `keys`, with absent keys reported as null
    pub fn expose(&self, keys: &[String]) -> ContextMap {
        keys.iter()
            .map(|key| (key.clone(), self.vars.get(key).cloned().unwrap_or(Val::Null)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl From<ContextMap> for Context {
    fn from(vars: ContextMap) -> Self {
        Self::from_map(vars)
    }
}
