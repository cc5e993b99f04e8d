use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{init_config, Config},
    context::ContextCatalog,
};

use super::Commands;

/// Handle CLI subcommands. Returns `true` when the command was fully handled.
pub fn handle_command(
    command: &Commands,
    config: &Config,
    catalog: &dyn ContextCatalog,
) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Dossier configuration...");
            for path in init_config()? {
                println!("  Created {}", path.display());
            }
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Questions => {
            list_questions(config)?;
            Ok(true)
        }
        Commands::Context => {
            list_context(catalog)?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to the ideation session
    }
}

/// Print the clarifying questions in order
pub fn list_questions(config: &Config) -> Result<()> {
    let catalog = config.catalog()?;
    println!("Clarifying questions:");
    for (i, question) in catalog.iter().enumerate() {
        println!("  {}. {}", i + 1, question.prompt.green());
        for option in &question.options {
            println!("      • {}", option);
        }
    }
    Ok(())
}

/// Print the files that can be attached as context
pub fn list_context(catalog: &dyn ContextCatalog) -> Result<()> {
    println!("Context files in {}:", catalog.repo_name().green());
    for candidate in catalog.candidates()? {
        println!("  • {} ({})", candidate.path, candidate.kind.label());
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("Dossier v{}", env!("CARGO_PKG_VERSION"));
    println!("   Turn a product idea into an implementation roadmap");
}
