//! CLI command definitions

use cafe_domain::BackendKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Model backend selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// AWS Bedrock Converse API
    Bedrock,
    /// Local Ollama server
    Ollama,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Bedrock => BackendKind::Bedrock,
            BackendArg::Ollama => BackendKind::Ollama,
        }
    }
}

/// CLI arguments for cafe-assistant
#[derive(Parser, Debug)]
#[command(name = "cafe-assistant")]
#[command(author, version, about = "Natural-language assistant for a board game cafe's business data")]
#[command(long_about = r#"
Cafe Assistant answers questions about a board game cafe's inventory, sales,
table rentals, food & beverage orders and operating expenses.

A language model plans the work one action at a time: it queries the
database, runs calculations, searches games by description and projects
what-if scenarios until it can answer in plain English.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./cafe.toml         Project-level config (or ./.cafe.toml)
3. ~/.config/cafe-assistant/config.toml   Global config
Environment variables prefixed with CAFE_ override all files
(e.g. CAFE_BACKEND__KIND=ollama).

Example:
  cafe-assistant "What are our top 3 selling games?"
  cafe-assistant --backend ollama --model llama3 "What's our net profit?"
  cafe-assistant --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Model backend to use (overrides [backend] kind)
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Model identifier for the selected backend
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path to the SQLite database (overrides [database] path)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Create the database tables and seed the sample data, then continue
    #[arg(long)]
    pub init_db: bool,

    /// Disable semantic game search
    #[arg(long)]
    pub no_search: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append a JSONL transcript of each question to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

impl Cli {
    /// Backend chosen on the command line, if any.
    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.backend.map(BackendKind::from)
    }

    /// Tracing filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
