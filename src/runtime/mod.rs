/// Runtime orchestrator module - Gateway

mod host;
mod orchestrator;
mod repl;

pub use host::{HostEvent, IdeationHost};
pub use orchestrator::{build_catalog, Orchestrator};
pub use repl::{Repl, ReplCommand};
