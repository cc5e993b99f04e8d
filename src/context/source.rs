use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::ContextReference;

/// Rough role of a file in the repository, used for grouping in pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Component,
    Api,
    Hook,
    Util,
    Schema,
    Other,
}

impl ContextKind {
    /// Guess the kind from a repository-relative path
    pub fn infer(path: &str) -> Self {
        let lower = path.to_lowercase();
        let file_name = path.rsplit('/').next().unwrap_or(path);
        // React-style hook names: useThing
        let hook_name = file_name
            .strip_prefix("use")
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()));

        if lower.ends_with(".prisma")
            || lower.ends_with(".sql")
            || lower.contains("/types/")
            || lower.contains("schema")
        {
            Self::Schema
        } else if lower.contains("/hooks/") || hook_name {
            Self::Hook
        } else if lower.contains("/api/") || lower.contains("/routes/") {
            Self::Api
        } else if lower.contains("/components/") || lower.ends_with(".tsx") || lower.ends_with(".jsx") {
            Self::Component
        } else if lower.contains("/lib/") || lower.contains("/utils/") {
            Self::Util
        } else {
            Self::Other
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Component => "component",
            Self::Api => "api",
            Self::Hook => "hook",
            Self::Util => "util",
            Self::Schema => "schema",
            Self::Other => "other",
        }
    }
}

/// A file the user may attach as context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextCandidate {
    pub path: String,
    pub kind: ContextKind,
}

impl ContextCandidate {
    pub fn new(path: impl Into<String>, kind: ContextKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn reference(&self) -> ContextReference {
        ContextReference::new(self.path.clone())
    }
}

/// Where the list of attachable context files comes from
pub trait ContextCatalog: Send + Sync {
    /// Display name of the connected repository
    fn repo_name(&self) -> &str;

    fn candidates(&self) -> Result<Vec<ContextCandidate>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(ContextKind::infer("src/components/Dashboard.tsx"), ContextKind::Component);
        assert_eq!(ContextKind::infer("src/api/customers.ts"), ContextKind::Api);
        assert_eq!(ContextKind::infer("src/hooks/useCustomers.ts"), ContextKind::Hook);
        assert_eq!(ContextKind::infer("src/lib/db.ts"), ContextKind::Util);
        assert_eq!(ContextKind::infer("src/types/customer.ts"), ContextKind::Schema);
        assert_eq!(ContextKind::infer("prisma/schema.prisma"), ContextKind::Schema);
        assert_eq!(ContextKind::infer("README.md"), ContextKind::Other);
        assert_eq!(ContextKind::infer("useAuth.ts"), ContextKind::Hook);
        assert_eq!(ContextKind::infer("users.ts"), ContextKind::Other);
    }
}
