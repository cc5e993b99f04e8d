use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    ANSWER_ACKNOWLEDGMENTS, DEFAULT_ANSWER_ACK_MS, DEFAULT_ASK_QUESTION_MS,
    DEFAULT_ENTER_CLARIFYING_MS, DEFAULT_EXCLUDE_DIRS, DEFAULT_GENERATION_MS,
    DEFAULT_MAX_CONTEXT_FILES, DEFAULT_NEXT_QUESTION_MS, DEFAULT_OPENING_ACK_MS,
    OPENING_ACKNOWLEDGMENT, READY_TO_GENERATE,
};
use crate::session::{ClarifyingQuestion, CyclicAcknowledgments, QuestionCatalog};
use crate::utils::DossierError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Simulated thinking delays
    #[serde(default)]
    pub timing: TimingConfig,

    /// Conversation script
    #[serde(default)]
    pub session: SessionConfig,

    /// Context candidate source
    #[serde(default)]
    pub context: ContextConfig,

    /// Terminal output
    #[serde(default)]
    pub ui: UIConfig,
}

impl Config {
    /// The question catalog to use, falling back to the builtin questions
    pub fn catalog(&self) -> Result<QuestionCatalog, DossierError> {
        match &self.session.questions {
            Some(questions) => QuestionCatalog::new(questions.clone()),
            None => Ok(QuestionCatalog::builtin()),
        }
    }

    pub fn acknowledgments(&self) -> CyclicAcknowledgments {
        CyclicAcknowledgments::new(
            self.session.opening.clone(),
            self.session.acknowledgments.clone(),
            self.session.ready.clone(),
        )
    }
}

/// Delays in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub opening_ack_ms: u64,
    pub enter_clarifying_ms: u64,
    pub ask_question_ms: u64,
    pub answer_ack_ms: u64,
    pub next_question_ms: u64,
    pub generation_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            opening_ack_ms: DEFAULT_OPENING_ACK_MS,
            enter_clarifying_ms: DEFAULT_ENTER_CLARIFYING_MS,
            ask_question_ms: DEFAULT_ASK_QUESTION_MS,
            answer_ack_ms: DEFAULT_ANSWER_ACK_MS,
            next_question_ms: DEFAULT_NEXT_QUESTION_MS,
            generation_ms: DEFAULT_GENERATION_MS,
        }
    }
}

/// Agent lines and question catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Reply to the initial request
    pub opening: String,
    /// Cycled replies to answers
    pub acknowledgments: Vec<String>,
    /// Announcement before generation starts
    pub ready: String,
    /// Replaces the builtin catalog when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<ClarifyingQuestion>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opening: OPENING_ACKNOWLEDGMENT.to_string(),
            acknowledgments: ANSWER_ACKNOWLEDGMENTS.iter().map(|s| s.to_string()).collect(),
            ready: READY_TO_GENERATE.to_string(),
            questions: None,
        }
    }
}

/// Which catalog offers context candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSourceKind {
    /// Built-in demo repository
    Demo,
    /// Files of a local directory
    Workspace,
}

/// Context catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub source: ContextSourceKind,
    /// Maximum number of candidates listed from a workspace
    pub max_files: usize,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            source: ContextSourceKind::Demo,
            max_files: DEFAULT_MAX_CONTEXT_FILES,
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Prefix conversation lines with their time
    pub show_timestamps: bool,
    /// Colorize output
    pub color: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            show_timestamps: false,
            color: true,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".dossier/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    extract(figment)
}

/// Load configuration from an explicit file, still honoring env overrides
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));
    extract(figment)
}

fn extract(figment: Figment) -> Result<Config> {
    // DOSSIER_TIMING__OPENING_ACK_MS=0 style overrides
    figment
        .merge(Env::prefixed("DOSSIER_").split("__"))
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "dossier") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("dossier");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist.
///
/// Returns the paths that were written.
pub fn init_config() -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        written.push(config_file);
    }

    let local_example = PathBuf::from(".dossier/config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# Dossier Project Configuration
# This file overrides global settings for this project

[timing]
opening_ack_ms = 0
answer_ack_ms = 0

[context]
source = "workspace"
max_files = 100

[[session.questions]]
id = "users"
prompt = "Who will use this first?"
options = ["Internal team", "Customers"]

[[session.questions]]
id = "deadline"
prompt = "When does the first version need to ship?"
"#;
        std::fs::write(&local_example, example_config)?;
        written.push(local_example);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AcknowledgmentSource;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timing.opening_ack_ms, 1500);
        assert_eq!(config.context.source, ContextSourceKind::Demo);
        assert_eq!(config.catalog().unwrap().len(), 3);
        assert_eq!(config.acknowledgments().acknowledge(1), "Thanks, that's useful context.");
    }

    #[test]
    fn test_load_from_file_overrides_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[timing]
answer_ack_ms = 10

[session]
acknowledgments = ["ok"]

[[session.questions]]
id = "only"
prompt = "Just one question?"
options = ["yes", "no"]
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.timing.answer_ack_ms, 10);
        assert_eq!(config.timing.opening_ack_ms, 1500);
        assert_eq!(config.acknowledgments().acknowledge(3), "ok");
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().options, vec!["yes", "no"]);
    }

    #[test]
    fn test_empty_question_list_is_rejected() {
        let mut config = Config::default();
        config.session.questions = Some(Vec::new());
        assert!(config.catalog().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config_from(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.ui.show_timestamps = true;

        save_config(&config, Some(path.clone())).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert!(loaded.ui.show_timestamps);
        assert_eq!(loaded.timing, config.timing);
    }
}
