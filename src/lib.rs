pub mod app;
pub mod cli;
pub mod constants;
pub mod context;
pub mod roadmap;
pub mod runtime;
pub mod session;
pub mod utils;

pub use app::{load_config, Config};
pub use roadmap::{GenerationRequest, Roadmap, RoadmapGenerator};
pub use runtime::IdeationHost;
pub use session::{AnswerInput, Phase, SessionController, SessionError};
pub use utils::DossierError;
