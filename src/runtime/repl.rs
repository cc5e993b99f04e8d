use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::host::{HostEvent, IdeationHost};
use crate::{
    app::UIConfig,
    cli::OutputFormat,
    constants::UI_REFRESH_INTERVAL_MS,
    context::{ContextCandidate, ContextCatalog},
    roadmap::Roadmap,
    session::{AnswerInput, ConversationEntry, InvalidInput, Phase, SessionError, Speaker, Toggle},
    utils::DossierError,
};

/// A parsed line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Reset,
    Status,
    Help,
    ListContext,
    /// Toggle a context file by list number or path
    ToggleContext(String),
    /// Pick quick-answer option by zero-based index
    Pick(usize),
    /// Free text: the request or an answer
    Say(String),
}

impl ReplCommand {
    /// Parse a line. `option_count` is the number of quick answers on screen.
    pub fn parse(line: &str, option_count: usize) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(rest) = line.strip_prefix('/') {
            let (name, arg) = match rest.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (rest, ""),
            };
            return Some(match name {
                "quit" | "exit" | "q" => Self::Quit,
                "reset" | "new" => Self::Reset,
                "status" => Self::Status,
                "context" | "files" => Self::ListContext,
                "add" | "toggle" | "remove" if !arg.is_empty() => Self::ToggleContext(arg.to_string()),
                _ => Self::Help,
            });
        }

        if let Ok(n) = line.parse::<usize>() {
            if n >= 1 && n <= option_count {
                return Some(Self::Pick(n - 1));
            }
        }

        Some(Self::Say(line.to_string()))
    }
}

/// Line-oriented front end for an ideation session
pub struct Repl {
    host: IdeationHost,
    catalog: Arc<dyn ContextCatalog>,
    ui: UIConfig,
    output_format: OutputFormat,
    printed: usize,
}

impl Repl {
    pub fn new(
        host: IdeationHost,
        catalog: Arc<dyn ContextCatalog>,
        ui: UIConfig,
        output_format: OutputFormat,
    ) -> Self {
        if !ui.color {
            colored::control::set_override(false);
        }
        Self {
            host,
            catalog,
            ui,
            output_format,
            printed: 0,
        }
    }

    /// Read commands from stdin until `/quit` or end of input
    pub async fn run(mut self) -> Result<()> {
        self.print_banner();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.print_prompt();
        while let Some(line) = lines.next_line().await? {
            if !self.handle_line(&line).await? {
                break;
            }
            self.print_prompt();
        }
        Ok(())
    }

    /// Handle one input line. Returns `false` when the user wants to leave.
    pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
        let option_count = self.host.controller().snapshot().quick_options().len();
        let Some(command) = ReplCommand::parse(line, option_count) else {
            return Ok(true);
        };
        debug!(?command, "REPL command");

        match command {
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Help => print_help(),
            ReplCommand::Status => self.print_status(),
            ReplCommand::ListContext => self.print_context()?,
            ReplCommand::Reset => {
                self.host.controller().reset();
                self.printed = 0;
                println!("{}", "Started a new project.".cyan());
            }
            ReplCommand::ToggleContext(arg) => self.toggle_context(&arg)?,
            ReplCommand::Pick(index) => {
                let snapshot = self.host.controller().snapshot();
                if let Some(option) = snapshot.quick_options().get(index) {
                    let input = AnswerInput::option(option.clone());
                    self.dispatch(Action::Answer(input)).await?;
                }
            }
            ReplCommand::Say(text) => {
                let action = match self.host.controller().phase() {
                    Phase::Collecting => Action::Submit(text),
                    _ => Action::Answer(AnswerInput::typed(text)),
                };
                self.dispatch(action).await?;
            }
        }
        Ok(true)
    }

    async fn dispatch(&mut self, action: Action) -> Result<()> {
        let host = self.host.clone();
        let mut task = tokio::spawn(async move {
            match action {
                Action::Submit(text) => host.submit(&text).await,
                Action::Answer(input) => host.answer(input).await,
            }
        });

        let mut ticker = tokio::time::interval(Duration::from_millis(UI_REFRESH_INTERVAL_MS));
        let mut thinking_shown = false;
        let result = loop {
            tokio::select! {
                joined = &mut task => break joined?,
                _ = ticker.tick() => {
                    if self.flush_entries() > 0 {
                        thinking_shown = false;
                    }
                    if !thinking_shown && self.host.controller().is_thinking() {
                        println!("{}", "  Thinking...".dimmed());
                        thinking_shown = true;
                    }
                }
            }
        };
        self.flush_entries();

        match result {
            Ok(HostEvent::RoadmapReady(roadmap)) => self.print_roadmap(&roadmap)?,
            Ok(HostEvent::RoadmapDiscarded) | Ok(HostEvent::TurnDiscarded) => {
                debug!("Dropped result for an old session");
            }
            Ok(HostEvent::TurnCompleted) => self.print_quick_options(),
            Err(DossierError::Session(err)) => print_rejection(&err),
            Err(err) => println!("{} {}", "Error:".red().bold(), err),
        }
        Ok(())
    }

    /// Print entries that appeared since the last flush; returns how many
    fn flush_entries(&mut self) -> usize {
        let entries = self.host.controller().entries();
        let fresh = entries.get(self.printed..).unwrap_or_default();
        for entry in fresh {
            println!("{}", format_entry(entry, self.ui.show_timestamps));
        }
        let count = fresh.len();
        self.printed = entries.len();
        count
    }

    fn toggle_context(&mut self, arg: &str) -> Result<()> {
        let path = match arg.parse::<usize>() {
            Ok(n) => {
                let candidates = self.catalog.candidates()?;
                match n.checked_sub(1).and_then(|i| candidates.get(i)) {
                    Some(candidate) => candidate.path.clone(),
                    None => {
                        println!(
                            "{}",
                            format!(
                                "No context file numbered {} (1-{}). Use /context to list them.",
                                n,
                                candidates.len()
                            )
                            .yellow()
                        );
                        return Ok(());
                    }
                }
            }
            Err(_) => arg.to_string(),
        };

        match self.host.controller().toggle_context_reference(path.as_str()) {
            Ok(Toggle::Added) => println!("{} {}", "+".green(), path),
            Ok(Toggle::Removed) => println!("{} {}", "-".red(), path),
            Err(err) => print_rejection(&err),
        }
        Ok(())
    }

    fn print_banner(&self) {
        println!("{}", "DOSSIER  New Project".bold());
        println!("Describe your product idea and I'll help you create an implementation roadmap.");
        println!(
            "Connected repository: {}  (/context to browse, /add <n> to attach)",
            self.catalog.repo_name().green()
        );
        println!("{}", "Type /help for commands.".dimmed());
        println!();
        println!("{}", "What would you like to build?".bold());
    }

    fn print_prompt(&self) {
        let phase = self.host.controller().phase();
        if phase.accepts_input() {
            println!("{}", phase.input_hint().dimmed());
        }
    }

    fn print_quick_options(&self) {
        let snapshot = self.host.controller().snapshot();
        for (i, option) in snapshot.quick_options().iter().enumerate() {
            println!("  {} {}", format!("[{}]", i + 1).cyan(), option);
        }
    }

    fn print_status(&self) {
        let snapshot = self.host.controller().snapshot();
        println!("Session:  {}", snapshot.session_id);
        println!("Phase:    {}", snapshot.phase);
        if let Some(index) = snapshot.pending_question_index {
            println!(
                "Question: {} of {}",
                index + 1,
                self.host.controller().catalog().len()
            );
        }
        if let Some(request) = &snapshot.original_request {
            println!("Request:  {}", request);
        }
        if snapshot.selected_context.is_empty() {
            println!("Context:  (none)");
        } else {
            let names: Vec<&str> = snapshot.selected_context.iter().map(|r| r.file_name()).collect();
            println!("Context:  {}", names.join(", "));
        }
    }

    fn print_context(&self) -> Result<()> {
        let candidates = self.catalog.candidates()?;
        let selected = self.host.controller().selected_context();
        println!("Project context from {}:", self.catalog.repo_name().green());
        for (i, candidate) in candidates.iter().enumerate() {
            let mark = if selected.contains(&candidate.reference()) {
                "x".green().to_string()
            } else {
                " ".to_string()
            };
            println!("  [{}] {:>3}. {}", mark, i + 1, describe_candidate(candidate));
        }
        Ok(())
    }

    fn print_roadmap(&self, roadmap: &Roadmap) -> Result<()> {
        println!();
        match self.output_format {
            OutputFormat::Text => println!("{}", roadmap.to_text()),
            OutputFormat::Markdown => println!("{}", roadmap.to_markdown()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(roadmap)?),
        }
        println!("{}", "Type /reset to start another project or /quit to leave.".dimmed());
        Ok(())
    }
}

enum Action {
    Submit(String),
    Answer(AnswerInput),
}

fn format_entry(entry: &ConversationEntry, show_timestamps: bool) -> String {
    let speaker = match entry.speaker() {
        Speaker::User => "You".blue().bold(),
        Speaker::Agent => "Dossier".magenta().bold(),
    };
    if show_timestamps {
        format!(
            "{} {}: {}",
            entry.created_at().format("%H:%M:%S").to_string().dimmed(),
            speaker,
            entry.text()
        )
    } else {
        format!("{}: {}", speaker, entry.text())
    }
}

fn describe_candidate(candidate: &ContextCandidate) -> String {
    format!("{} {}", candidate.path, format!("({})", candidate.kind.label()).dimmed())
}

fn print_rejection(err: &SessionError) {
    let hint = match err {
        SessionError::InvalidInput(InvalidInput::UnknownOption) => {
            "That option isn't offered for this question.".to_string()
        }
        SessionError::InvalidInput(_) => "Please type something first.".to_string(),
        SessionError::IllegalPhase { phase: Phase::Generating, .. } => {
            "The roadmap is already being generated. Type /reset to start over.".to_string()
        }
        SessionError::Busy => "Still thinking, hang on...".to_string(),
        other => other.to_string(),
    };
    println!("{}", hint.yellow());
}

fn print_help() {
    println!("Commands:");
    println!("  <text>          describe your idea or answer the current question");
    println!("  <n>             pick quick answer n");
    println!("  /context        list files you can attach for context");
    println!("  /add <n|path>   attach or detach a context file");
    println!("  /status         show the session state");
    println!("  /reset          start a new project");
    println!("  /quit           leave");
}
