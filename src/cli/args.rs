use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dossier")]
#[command(version)]
#[command(about = "Turn a product idea into an implementation roadmap", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Workspace to offer as project context (defaults to the demo repository)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Skip the simulated thinking delays
    #[arg(long, env = "DOSSIER_NO_DELAY")]
    pub no_delay: bool,

    /// Output format for the generated roadmap
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Start an ideation session (default)
    Chat,
    /// Print the clarifying question catalog
    Questions,
    /// List files that can be attached as context
    Context,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dossier"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output_format, OutputFormat::Text);
        assert!(cli.path.is_none());
    }

    #[test]
    fn test_flags_and_subcommand() {
        let cli = Cli::try_parse_from([
            "dossier",
            "--no-delay",
            "--output-format",
            "json",
            "--path",
            "/tmp/app",
            "context",
        ])
        .unwrap();
        assert!(cli.no_delay);
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert_eq!(cli.path, Some(PathBuf::from("/tmp/app")));
        assert_eq!(cli.command, Some(Commands::Context));
    }
}
