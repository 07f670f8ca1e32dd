//! CLI entrypoint for Cafe Assistant
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use cafe_application::{ConversationLogger, RunAskUseCase};
use cafe_domain::ConversationHistory;
use cafe_infrastructure::storage::schema::schema_description;
use cafe_infrastructure::{
    CafeDatabase, ConfigLoader, FileConfig, GameSearchIndex, JsonlConversationLogger,
    LocalToolExecutor, build_gateway, init_db,
};
use cafe_presentation::{ChatRepl, Cli, ConsoleFormatter, ReplConfig, progress_notifier};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&cli)?;

    info!("Starting Cafe Assistant");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    check_config(&config)?;

    // === Database ===
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.database.path.clone());
    if cli.init_db || !db_path.exists() {
        seed_database(&db_path, cli.quiet)?;
        if cli.question.is_none() && !cli.chat {
            return Ok(ExitCode::SUCCESS);
        }
    }

    let db = Arc::new(
        CafeDatabase::open_read_only(&db_path)?.with_max_rows(config.database.max_rows),
    );

    // === Dependency Injection ===
    let mut executor = LocalToolExecutor::new(db.clone());
    if config.search.enabled && !cli.no_search {
        match GameSearchIndex::from_database(&db) {
            Ok(index) => {
                info!("Indexed {} games for search", index.len());
                executor = executor
                    .with_search_index(index)
                    .with_search_limit(config.search.top_k);
            }
            Err(e) => warn!("Game search disabled: {}", e),
        }
    }

    let backend = cli
        .backend_kind()
        .unwrap_or_else(|| config.backend.parse_kind().0);
    let gateway = build_gateway(backend, &config, cli.model.as_deref())
        .await
        .with_context(|| format!("Failed to initialize the {} backend", backend))?;
    info!("Using {} backend with model {}", gateway.name(), gateway.model());

    let mut use_case = RunAskUseCase::new(gateway.clone(), Arc::new(executor))
        .with_execution_params(config.agent.to_execution_params());
    if let Some(logger) = conversation_logger(&cli, &config) {
        use_case = use_case.with_conversation_logger(logger);
    }
    let use_case = Arc::new(use_case);

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig::default()
            .with_progress(config.repl.show_progress && !cli.quiet)
            .with_history_file(
                config
                    .repl
                    .history_file
                    .clone()
                    .or_else(ConfigLoader::default_history_path),
            );
        let mut repl = ChatRepl::new(use_case, repl_config)
            .with_schema(schema_description())
            .with_backend(gateway.name(), gateway.model())
            .with_verbose(cli.verbose > 0);

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(ref q) => q.clone(),
        None => bail!("Question is required. Use --chat for interactive mode."),
    };

    if !cli.quiet {
        println!("{}", ConsoleFormatter::question(&question));
        println!();
    }

    let progress = progress_notifier(!cli.quiet, cli.verbose > 0);
    let history = ConversationHistory::new();
    match use_case
        .ask_with_progress(&question, &history, progress.as_ref())
        .await
    {
        Ok(answer) => {
            println!();
            println!("{}", ConsoleFormatter::answer(&answer));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::error(&e.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Install the tracing subscriber; `--log-file` redirects output to a file.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::new(cli.log_level());

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Print configuration warnings and stop on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        eprintln!("Warning: {}", issue.message);
    }
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        for issue in &errors {
            eprintln!("Error: {}", issue.message);
        }
        bail!("Invalid configuration ({} error(s))", errors.len());
    }
    Ok(())
}

fn seed_database(path: &Path, quiet: bool) -> Result<()> {
    let summary = init_db(path)
        .with_context(|| format!("Failed to initialize database at {}", path.display()))?;
    if !quiet {
        println!(
            "Database initialized at {} ({} games, {} sales, {} rentals, {} menu items, {} orders, {} expenses)",
            path.display(),
            summary.games,
            summary.sales,
            summary.rentals,
            summary.menu_items,
            summary.orders,
            summary.expenses
        );
    }
    Ok(())
}

fn conversation_logger(cli: &Cli, config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = cli
        .conversation_log
        .as_ref()
        .or(config.logging.conversation_log.as_ref())?;
    match JsonlConversationLogger::new(path) {
        Some(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Some(Arc::new(logger))
        }
        None => {
            warn!("Could not open conversation log at {}", path.display());
            None
        }
    }
}
