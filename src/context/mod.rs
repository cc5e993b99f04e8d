// Gateway module for context - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod demo;
mod source;
mod workspace;

// Public re-exports - the ONLY way to access context functionality
pub use demo::DemoRepoCatalog;
pub use source::{ContextCandidate, ContextCatalog, ContextKind};
pub use workspace::WorkspaceCatalog;
