//! REPL (Read-Eval-Print Loop) for the agent

use crate::agent::progress::TurnProgressReporter;
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use termagent_application::{
    AgentSession, NoTurnProgress, RunTurnError, RunTurnUseCase, TurnProgressNotifier,
};
use termagent_domain::TurnOutcome;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Slash commands understood at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Tools,
    Model,
    History,
    Clear,
    Yolo,
    Exit,
    Unknown(String),
}

impl SlashCommand {
    /// Parse a line starting with `/`; `None` for anything else.
    pub fn parse(line: &str) -> Option<Self> {
        let command = line.trim().split_whitespace().next()?;
        if !command.starts_with('/') {
            return None;
        }
        Some(match command.to_lowercase().as_str() {
            "/help" | "/h" | "/?" => SlashCommand::Help,
            "/tools" => SlashCommand::Tools,
            "/model" => SlashCommand::Model,
            "/history" => SlashCommand::History,
            "/clear" => SlashCommand::Clear,
            "/yolo" => SlashCommand::Yolo,
            "/exit" | "/quit" | "/q" => SlashCommand::Exit,
            _ => SlashCommand::Unknown(command.to_string()),
        })
    }
}

enum CommandResult {
    Continue,
    Exit,
}

/// Interactive REPL around [`RunTurnUseCase`]
pub struct AgentRepl {
    use_case: RunTurnUseCase,
    session: AgentSession,
    config: ReplConfig,
}

impl AgentRepl {
    pub fn new(use_case: RunTurnUseCase, session: AgentSession) -> Self {
        Self {
            use_case,
            session,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session(&self) -> &AgentSession {
        &self.session
    }

    fn history_path(&self) -> Option<PathBuf> {
        self.config
            .history_file
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|p| p.join("termagent").join("history.txt")))
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(&format!("{} ", "you>".green().bold())) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if let Some(command) = SlashCommand::parse(line) {
                        match self.handle_command(command) {
                            CommandResult::Exit => break,
                            CommandResult::Continue => continue,
                        }
                    }

                    self.process_request(line).await;
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("{}", ConsoleFormatter::error(&err.to_string()));
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Run exactly one turn and print its answer.
    pub async fn run_once(&mut self, prompt: &str) -> Result<TurnOutcome, RunTurnError> {
        let result = self.run_turn(prompt).await;
        self.report(&result);
        result
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "╭──────────────────────────────────────────╮".cyan());
        println!("{}", "│            termagent                     │".cyan());
        println!("{}", "╰──────────────────────────────────────────╯".cyan());
        println!();
        println!("{} {}", "Model:".bold(), self.session.model);
        println!(
            "{} {}",
            "Tools:".bold(),
            self.use_case.dispatcher().registry().len()
        );
        println!("{} {}", "Auto-approve:".bold(), on_off(self.session.policy.auto_approve()));
        println!();
        println!(
            "{}",
            "Type a request, or /help for commands. Ctrl+C during a turn interrupts it.".dimmed()
        );
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Commands:".bold());
        println!("  /help              - Show this help");
        println!("  /tools             - List available tools");
        println!("  /model             - Show the current model");
        println!("  /history           - Show conversation size");
        println!("  /clear             - Clear conversation history");
        println!("  /yolo              - Toggle auto-approve for moderate tools");
        println!("  /exit, /quit, /q   - Exit");
        println!();
        println!("{}", "Risk tiers:".bold());
        println!("  {} run without asking", "safe".green());
        println!("  {} ask unless auto-approve is on", "moderate".yellow());
        println!("  {} always ask", "dangerous".red());
        println!();
    }

    /// Handle slash commands. Returns whether to continue or exit.
    fn handle_command(&mut self, command: SlashCommand) -> CommandResult {
        match command {
            SlashCommand::Exit => {
                println!("Goodbye!");
                return CommandResult::Exit;
            }
            SlashCommand::Help => self.print_help(),
            SlashCommand::Tools => {
                println!();
                print!(
                    "{}",
                    ConsoleFormatter::tool_list(self.use_case.dispatcher().registry())
                );
            }
            SlashCommand::Model => {
                println!("{} {}", "Model:".bold(), self.session.model);
            }
            SlashCommand::History => {
                println!(
                    "{}",
                    ConsoleFormatter::history_summary(&self.session.conversation.summary())
                );
            }
            SlashCommand::Clear => {
                self.session.conversation.reset();
                println!("{}", ConsoleFormatter::success("Conversation history cleared."));
            }
            SlashCommand::Yolo => {
                let enabled = self.session.policy.toggle_auto_approve();
                let msg = format!("Auto-approve {}", on_off(enabled));
                if enabled {
                    println!("{}", ConsoleFormatter::warning(&msg));
                } else {
                    println!("{}", ConsoleFormatter::success(&msg));
                }
            }
            SlashCommand::Unknown(cmd) => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".cyan());
            }
        }
        CommandResult::Continue
    }

    async fn process_request(&mut self, line: &str) {
        println!();
        let result = self.run_turn(line).await;
        self.report(&result);
        println!();
    }

    /// One turn, with Ctrl+C wired to cancellation.
    async fn run_turn(&mut self, input: &str) -> Result<TurnOutcome, RunTurnError> {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("Ctrl+C received, cancelling turn");
                    cancel.cancel();
                }
            })
        };

        let reporter = TurnProgressReporter::new();
        let progress: &dyn TurnProgressNotifier = if self.config.show_progress {
            &reporter
        } else {
            &NoTurnProgress
        };

        let result = self
            .use_case
            .execute_with_progress(&mut self.session, input, progress, &cancel)
            .await;
        watcher.abort();
        result
    }

    fn report(&self, result: &Result<TurnOutcome, RunTurnError>) {
        match result {
            Ok(outcome) if outcome.transport_failed => {
                println!("{}", ConsoleFormatter::error(&outcome.answer));
            }
            Ok(outcome) => {
                if outcome.hit_iteration_cap() {
                    println!("{}", ConsoleFormatter::warning(&outcome.answer));
                } else if let Some(panel) = answer_display(outcome) {
                    println!("{}", panel);
                }
            }
            Err(RunTurnError::Cancelled) => println!("{}", "Interrupted.".yellow()),
            Err(e) if self.config.debug => {
                println!("{}", ConsoleFormatter::error(&format!("{:?}", e)));
            }
            Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
        }
    }
}

/// Panel for a finished turn; `None` when the model returned no text.
fn answer_display(outcome: &TurnOutcome) -> Option<String> {
    if outcome.answer.trim().is_empty() {
        return None;
    }
    Some(ConsoleFormatter::answer_panel(&outcome.answer))
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled { "ON".yellow().bold() } else { "OFF".green() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(SlashCommand::parse("/help"), Some(SlashCommand::Help));
        assert_eq!(SlashCommand::parse("/tools"), Some(SlashCommand::Tools));
        assert_eq!(SlashCommand::parse("/model"), Some(SlashCommand::Model));
        assert_eq!(SlashCommand::parse("/history"), Some(SlashCommand::History));
        assert_eq!(SlashCommand::parse("/clear"), Some(SlashCommand::Clear));
        assert_eq!(SlashCommand::parse("/YOLO"), Some(SlashCommand::Yolo));
    }

    fn outcome(answer: &str) -> TurnOutcome {
        TurnOutcome {
            answer: answer.to_string(),
            final_state: termagent_domain::TurnState::Done,
            round_trips: 1,
            tool_batches: 0,
            transport_failed: false,
        }
    }

    #[test]
    fn test_empty_answer_has_no_panel() {
        assert_eq!(answer_display(&outcome("")), None);
        assert_eq!(answer_display(&outcome("  \n")), None);
    }

    #[test]
    fn test_answer_panel_for_text() {
        colored::control::set_override(false);
        let panel = answer_display(&outcome("Here are the files.")).unwrap();
        assert!(panel.contains("Here are the files."));
    }

    #[test]
    fn test_parse_exit_aliases() {
        for alias in ["/exit", "/quit", "/q", "  /q  "] {
            assert_eq!(SlashCommand::parse(alias), Some(SlashCommand::Exit), "{}", alias);
        }
    }

    #[test]
    fn test_parse_unknown_and_plain_text() {
        assert_eq!(
            SlashCommand::parse("/council what now"),
            Some(SlashCommand::Unknown("/council".to_string()))
        );
        assert_eq!(SlashCommand::parse("list files in /tmp"), None);
        assert_eq!(SlashCommand::parse(""), None);
    }
}
