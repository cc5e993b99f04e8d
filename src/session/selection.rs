use serde::{Deserialize, Serialize};
use std::fmt;

/// Path-like identifier of an external artifact attached for context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextReference(String);

impl ContextReference {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used for compact chips
    pub fn file_name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for ContextReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextReference {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ContextReference {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// What a toggle did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Set of selected context references that remembers insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContextSelection {
    // Selections are a handful of files; a linear scan keeps display order for free.
    items: Vec<ContextReference>,
}

impl ContextSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the reference if absent, remove it if present
    pub fn toggle(&mut self, reference: ContextReference) -> Toggle {
        if let Some(pos) = self.items.iter().position(|r| *r == reference) {
            self.items.remove(pos);
            Toggle::Removed
        } else {
            self.items.push(reference);
            Toggle::Added
        }
    }

    pub fn contains(&self, reference: &ContextReference) -> bool {
        self.items.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// References in the order they were selected
    pub fn iter(&self) -> impl Iterator<Item = &ContextReference> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<ContextReference> {
        self.items.clone()
    }
}
