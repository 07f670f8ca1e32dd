//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::progress_notifier;
use cafe_application::RunAskUseCase;
use cafe_domain::ConversationHistory;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;
use std::sync::Arc;

const LINE_HISTORY_CAPACITY: usize = 1000;

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Tables,
    Samples,
    Clear,
    ClearHistory,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`; anything else is a question.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        let cmd = line.to_lowercase();
        Some(match cmd.as_str() {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/tables" => ReplCommand::Tables,
            "/sample" | "/samples" | "/examples" => ReplCommand::Samples,
            "/clear" => ReplCommand::Clear,
            "/history" => ReplCommand::ClearHistory,
            _ => ReplCommand::Unknown(cmd),
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    ClearScreen,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<RunAskUseCase>,
    config: ReplConfig,
    schema: String,
    backend: String,
    model: String,
    verbose: bool,
    history: ConversationHistory,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: Arc<RunAskUseCase>, config: ReplConfig) -> Self {
        let history = ConversationHistory::with_capacity(config.max_history_pairs * 2);
        Self {
            use_case,
            config,
            schema: String::new(),
            backend: String::new(),
            model: String::new(),
            verbose: false,
            history,
        }
    }

    /// Schema text shown by `/tables`
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Backend and model named in the welcome banner
    pub fn with_backend(mut self, backend: impl Into<String>, model: impl Into<String>) -> Self {
        self.backend = backend.into();
        self.model = model.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> io::Result<()> {
        let mut line_editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("You".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(buffer)) => {
                    let line = buffer.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        match self.handle_command(command) {
                            CommandOutcome::Exit => break,
                            CommandOutcome::ClearScreen => {
                                line_editor.clear_screen()?;
                                self.print_welcome();
                            }
                            CommandOutcome::Continue => {}
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("{}", "Interrupted. Type /quit to exit.".dimmed());
                }
                Ok(Signal::CtrlD) => {
                    println!();
                    break;
                }
                Ok(_) => continue,
                Err(err) => {
                    eprintln!("{}", ConsoleFormatter::error(&err.to_string()));
                    break;
                }
            }
        }

        Ok(())
    }

    /// Conversation carried into the next question
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    fn line_editor(&self) -> Reedline {
        let line_editor = Reedline::create();
        let Some(path) = &self.config.history_file else {
            return line_editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(LINE_HISTORY_CAPACITY, path.clone()) {
            Ok(history) => line_editor.with_history(Box::new(history)),
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Line history disabled ({}): {}", path.display(), e).yellow()
                );
                line_editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::welcome(&self.backend, &self.model));
    }

    /// Handle slash commands; screen control is left to the caller.
    fn handle_command(&mut self, command: ReplCommand) -> CommandOutcome {
        match command {
            ReplCommand::Quit => {
                println!();
                println!("{}", "Thanks for visiting! Come back soon.".dimmed());
                println!();
                return CommandOutcome::Exit;
            }
            ReplCommand::Help => println!("{}", ConsoleFormatter::help()),
            ReplCommand::Tables => println!("{}", ConsoleFormatter::tables(&self.schema)),
            ReplCommand::Samples => println!("{}", ConsoleFormatter::samples()),
            ReplCommand::Clear => return CommandOutcome::ClearScreen,
            ReplCommand::ClearHistory => {
                self.history.clear();
                println!("{}", "Conversation history cleared.".dimmed());
            }
            ReplCommand::Unknown(cmd) => {
                println!("{}", format!("Unknown command: {}", cmd).yellow());
                println!("{}", "Type /help for available commands".dimmed());
            }
        }
        CommandOutcome::Continue
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        let progress = progress_notifier(self.config.show_progress, self.verbose);
        let result = self
            .use_case
            .ask_with_progress(question, &self.history, progress.as_ref())
            .await;

        println!();
        match result {
            Ok(answer) => {
                println!("{}", ConsoleFormatter::answer(&answer));
                self.history.push_exchange(question, answer);
            }
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::error(&e.to_string()));
            }
        }
        println!();
    }
}
