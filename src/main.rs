//! AI Doc Gen - multi-agent documentation generator
//!
//! A command-line dashboard over three documentation workflows: repository
//! analysis, README generation and AI assistant rules. Each subcommand is a
//! page: it collects options, runs its handler once and shows the files the
//! handler wrote.
//!
//! Exit codes:
//!   0 - Success
//!   1 - The page reported an error (missing path, handler failure, bad config)

mod artifacts;
mod cli;
mod config;
mod handlers;
mod llm;
mod models;
mod pages;
mod render;
mod repo;
mod runner;
mod scanner;
mod session;

use anyhow::{Context, Result};
use chrono::Local;
use cli::{Args, Command};
use config::{Config, LoggingConfig, CONFIG_FILE_NAME};
use handlers::{AIRulesHandler, AnalyzeHandler, ReadmeHandler};
use llm::LlmClient;
use pages::Handlers;
use runner::Runner;
use session::SessionState;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        if let Err(e) = handle_init_config() {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    match run(args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .ai-doc-gen.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the models, endpoints and scanner.");
    Ok(())
}

/// Load configuration, install logging and open the selected page once.
/// Returns the exit code.
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    let log_file = init_logging(&args, &config.logging);

    config.apply_env_overrides();
    config.merge_with_args(&args);

    info!("AI Doc Gen v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    if let Some(path) = log_file {
        debug!("Logging to {}", path.display());
    }

    open_page(&args.command, &config).map_err(|e| {
        error!("Run failed: {:#}", e);
        e
    })
}

/// The LLM-backed handlers, one client per agent.
fn build_handlers(
    config: &Config,
) -> Handlers<AnalyzeHandler, ReadmeHandler, AIRulesHandler> {
    Handlers {
        analyze: AnalyzeHandler::new(
            Arc::new(LlmClient::new(config.analyzer.clone())),
            scanner::ScanConfig::from(&config.scanner),
        ),
        readme: ReadmeHandler::new(Arc::new(LlmClient::new(config.documenter.clone()))),
        ai_rules: AIRulesHandler::new(Arc::new(LlmClient::new(config.ai_rules.clone()))),
    }
}

/// Route `command` to its page, print the outcome and export its files.
fn open_page(command: &Command, config: &Config) -> Result<i32> {
    let Some(request) = command.request() else {
        return Ok(0);
    };
    debug!("Opening {:?} page", request.page());

    let handlers = build_handlers(config);
    let runner = Runner::new(config.general.show_progress);
    let mut session = SessionState::new();

    let outcome = pages::route(&request, &handlers, &runner, config, &mut session);
    debug_assert!(!session.analysis_running);
    if session.analysis_complete {
        info!(
            "{} analysis documents available",
            session.generated_files.len()
        );
    }

    let output = command.output().cloned().unwrap_or_default();
    print!("{}", render::render_outcome(&outcome, output.preview));

    if let Some(ref dir) = output.export {
        for path in render::export_artifacts(&outcome, dir)? {
            println!("⬇️  Exported {}", path.display());
        }
    }

    if config.general.verbose {
        println!("\n{}", pages::about::llm_summary(config));
    }

    Ok(if outcome.is_failure() { 1 } else { 0 })
}

/// Initialize logging: a console layer plus, when possible, a per-run log file.
///
/// Returns the log file path if the file layer was installed. Failing to
/// create the file only costs the file layer; console logging always works.
fn init_logging(args: &Args, logging: &LoggingConfig) -> Option<PathBuf> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(console_filter);

    let (file_layer, file_path, file_error) = if logging.file_enabled {
        match open_log_file(&logging.dir) {
            Ok((file, path)) => {
                let layer = fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(LevelFilter::INFO);
                (Some(layer), Some(path), None)
            }
            Err(e) => (None, None, Some(e)),
        }
    } else {
        (None, None, None)
    };

    let installed = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Warning: logging already initialized: {}", e);
    }
    if let Some(e) = file_error {
        warn!("File logging disabled: {:#}", e);
    }

    file_path
}

/// Create `<dir>/<YYYY_MM_DD>/run_<HHMMSS>.log`.
fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    let now = Local::now();
    let day_dir = dir.join(now.format("%Y_%m_%d").to_string());
    std::fs::create_dir_all(&day_dir)
        .with_context(|| format!("Failed to create log directory {}", day_dir.display()))?;

    let path = day_dir.join(format!("run_{}.log", now.format("%H%M%S")));
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok((file, path))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("Warning: failed to load {}: {:#}", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
