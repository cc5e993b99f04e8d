use anyhow::Result;

use super::source::{ContextCandidate, ContextCatalog, ContextKind};
use crate::constants::DEMO_REPO_NAME;

/// Fixed file list of the demo repository
pub struct DemoRepoCatalog;

impl ContextCatalog for DemoRepoCatalog {
    fn repo_name(&self) -> &str {
        DEMO_REPO_NAME
    }

    fn candidates(&self) -> Result<Vec<ContextCandidate>> {
        Ok(vec![
            ContextCandidate::new("src/components/Dashboard.tsx", ContextKind::Component),
            ContextCandidate::new("src/components/CustomerList.tsx", ContextKind::Component),
            ContextCandidate::new("src/api/customers.ts", ContextKind::Api),
            ContextCandidate::new("src/api/invoices.ts", ContextKind::Api),
            ContextCandidate::new("src/hooks/useCustomers.ts", ContextKind::Hook),
            ContextCandidate::new("src/lib/db.ts", ContextKind::Util),
            ContextCandidate::new("src/types/customer.ts", ContextKind::Schema),
            ContextCandidate::new("prisma/schema.prisma", ContextKind::Schema),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog() {
        let files = DemoRepoCatalog.candidates().unwrap();
        assert_eq!(files.len(), 8);
        assert_eq!(DemoRepoCatalog.repo_name(), "acme/servicepro-app");

        // Declared kinds agree with what inference would pick
        for file in &files {
            assert_eq!(ContextKind::infer(&file.path), file.kind, "{}", file.path);
        }
    }
}
