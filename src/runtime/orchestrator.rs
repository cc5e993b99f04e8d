use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::{IdeationHost, Repl};
use crate::{
    app::{load_config, load_config_from, Config, ContextSourceKind},
    cli::{handle_command, Cli},
    context::{ContextCatalog, DemoRepoCatalog, WorkspaceCatalog},
    roadmap::TemplateRoadmapGenerator,
    session::{InstantPacer, Pacer, SessionController, Timing, TokioPacer},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = if let Some(config_path) = &cli.config {
            load_config_from(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(error = %e, "Failed to load config, using defaults");
                    Config::default()
                }
            }
        };

        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        let catalog = build_catalog(&self.config, self.cli.path.as_deref())?;

        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config, catalog.as_ref())? {
                return Ok(()); // Command handled, exit
            }
        }

        let host = self.build_host()?;
        info!(
            repo = catalog.repo_name(),
            questions = host.controller().catalog().len(),
            "Starting ideation session"
        );

        let repl = Repl::new(host, catalog, self.config.ui.clone(), self.cli.output_format);
        repl.run().await
    }

    /// Wire controller and generator according to config and flags
    pub fn build_host(&self) -> Result<IdeationHost> {
        let (timing, pacer): (Timing, Arc<dyn Pacer>) = if self.cli.no_delay {
            (Timing::instant(), Arc::new(InstantPacer))
        } else {
            (Timing::from(&self.config.timing), Arc::new(TokioPacer))
        };

        let controller = SessionController::new(self.config.catalog()?)
            .with_acknowledgments(Arc::new(self.config.acknowledgments()))
            .with_pacer(Arc::clone(&pacer))
            .with_timing(timing);
        let generator = TemplateRoadmapGenerator::new(timing.generation).with_pacer(pacer);

        Ok(IdeationHost::new(controller, Arc::new(generator)))
    }
}

/// Pick the context catalog: an explicit path always scans that workspace
pub fn build_catalog(config: &Config, path: Option<&Path>) -> Result<Arc<dyn ContextCatalog>> {
    match (path, config.context.source) {
        (Some(root), _) => Ok(Arc::new(WorkspaceCatalog::new(root, &config.context)?)),
        (None, ContextSourceKind::Workspace) => {
            Ok(Arc::new(WorkspaceCatalog::new(".", &config.context)?))
        }
        (None, ContextSourceKind::Demo) => Ok(Arc::new(DemoRepoCatalog)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;
    use clap::Parser;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_demo_catalog_by_default() {
        let catalog = build_catalog(&Config::default(), None).unwrap();
        assert_eq!(catalog.repo_name(), "acme/servicepro-app");
    }

    #[test]
    fn test_path_selects_workspace_catalog() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();

        let catalog = build_catalog(&Config::default(), Some(dir.path())).unwrap();

        assert_eq!(catalog.candidates().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_delay_host_runs_a_whole_session() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[session.questions]]
id = "only"
prompt = "Anything else?"
"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["dossier", "--no-delay", "--config", path.as_str()]).unwrap();

        let orchestrator = Orchestrator::new(cli).unwrap();
        let host = orchestrator.build_host().unwrap();

        host.submit("a booking app").await.unwrap();
        let event = host
            .answer(crate::session::AnswerInput::typed("no"))
            .await
            .unwrap();

        assert!(matches!(event, super::super::HostEvent::RoadmapReady(_)));
        assert_eq!(host.controller().phase(), Phase::Generating);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let cli = Cli::try_parse_from(["dossier", "--config", "/no/such/dossier.toml"]).unwrap();
        assert!(Orchestrator::new(cli).is_err());
    }
}
