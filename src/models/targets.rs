//! Target identifiers
//!
//! Callers pass either one element id or an ordered list of ids. Anything
//! else is rejected before the DOM is touched.

use serde::{Deserialize, Serialize};

/// One identifier or an ordered sequence of identifiers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum TargetSpec {
    Single(String),
    Multiple(Vec<String>),
}

impl TargetSpec {
    /// Identifiers in request order
    pub fn ids(&self) -> &[String] {
        match self {
            TargetSpec::Single(id) => std::slice::from_ref(id),
            TargetSpec::Multiple(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Parse from JSON text: a string or an array of strings
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&str> for TargetSpec {
    fn from(id: &str) -> Self {
        TargetSpec::Single(id.to_string())
    }
}

impl From<String> for TargetSpec {
    fn from(id: String) -> Self {
        TargetSpec::Single(id)
    }
}

impl From<Vec<String>> for TargetSpec {
    fn from(ids: Vec<String>) -> Self {
        TargetSpec::Multiple(ids)
    }
}

impl From<&[&str]> for TargetSpec {
    fn from(ids: &[&str]) -> Self {
        TargetSpec::Multiple(ids.iter().map(|id| id.to_string()).collect())
    }
}
