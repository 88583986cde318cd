//! Command-line interface argument parsing.
//!
//! Every dashboard page is a subcommand; its form fields are flags with the
//! same defaults and ranges the pages enforce.

use crate::models::{
    DetailLevel, DEFAULT_MAX_AGENTS_LINES, DEFAULT_MAX_CLAUDE_LINES, MAX_AGENTS_LINES_RANGE,
    MAX_CLAUDE_LINES_RANGE, MAX_WORKERS_RANGE,
};
use crate::pages::Request;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI Doc Gen - multi-agent documentation generator
///
/// Analyze a repository with LLM agents, then generate a README and
/// configuration files for AI coding assistants from the analysis.
///
/// Examples:
///   ai-doc-gen analyze --repo ./my-project --max-workers 4
///   ai-doc-gen readme --repo ./my-project --exclude-c4 --preview
///   ai-doc-gen ai-rules --repo ./my-project --detail-level comprehensive
///   ai-doc-gen about
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .ai-doc-gen.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true, env = "AI_DOC_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (no spinner, errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze code structure, dependencies, data flow, request flow and APIs
    Analyze(AnalyzeForm),

    /// Generate README.md from the analysis
    Readme(ReadmeForm),

    /// Generate CLAUDE.md, AGENTS.md and Cursor rules
    #[command(name = "ai-rules")]
    AiRules(AiRulesForm),

    /// Show what the tool does and the current LLM configuration
    About,

    /// Write a default .ai-doc-gen.toml configuration file
    InitConfig,
}

/// How generated files are shown after a successful run.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the content of every generated file
    #[arg(long)]
    pub preview: bool,

    /// Copy generated files into this directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeForm {
    /// Path to the repository you want to analyze
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Maximum concurrent workers (0 = auto-detect CPU count)
    #[arg(
        long,
        default_value_t = 0,
        value_name = "NUM",
        value_parser = RangedU64ValueParser::<usize>::new()
            .range(*MAX_WORKERS_RANGE.start() as u64..=*MAX_WORKERS_RANGE.end() as u64)
    )]
    pub max_workers: usize,

    /// Exclude code structure analysis
    #[arg(long)]
    pub exclude_code_structure: bool,

    /// Exclude dependency analysis
    #[arg(long)]
    pub exclude_dependencies: bool,

    /// Exclude data flow analysis
    #[arg(long)]
    pub exclude_data_flow: bool,

    /// Exclude request flow analysis
    #[arg(long)]
    pub exclude_request_flow: bool,

    /// Exclude API analysis
    #[arg(long)]
    pub exclude_api_analysis: bool,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ReadmeForm {
    /// Path to the repository
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Incorporate existing README content
    #[arg(long)]
    pub use_existing_readme: bool,

    /// Exclude the project overview
    #[arg(long)]
    pub exclude_overview: bool,

    /// Exclude the table of contents
    #[arg(long)]
    pub exclude_toc: bool,

    /// Exclude the architecture section
    #[arg(long)]
    pub exclude_architecture: bool,

    /// Exclude the C4 model
    #[arg(long)]
    pub exclude_c4: bool,

    /// Exclude the repository structure
    #[arg(long)]
    pub exclude_structure: bool,

    /// Exclude dependencies and integration
    #[arg(long)]
    pub exclude_dependencies: bool,

    /// Exclude API documentation
    #[arg(long)]
    pub exclude_api: bool,

    /// Exclude development notes
    #[arg(long)]
    pub exclude_dev_notes: bool,

    /// Exclude known issues and limitations
    #[arg(long)]
    pub exclude_issues: bool,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct AiRulesForm {
    /// Path to the repository
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Skip an existing CLAUDE.md
    #[arg(long)]
    pub skip_claude: bool,

    /// Skip an existing AGENTS.md
    #[arg(long)]
    pub skip_agents: bool,

    /// Skip existing Cursor rules
    #[arg(long)]
    pub skip_cursor: bool,

    /// Level of detail in generated files
    #[arg(long, value_enum, default_value_t = DetailLevel::Standard)]
    pub detail_level: DetailLevel,

    /// Maximum CLAUDE.md lines
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CLAUDE_LINES,
        value_name = "LINES",
        value_parser = RangedU64ValueParser::<usize>::new()
            .range(*MAX_CLAUDE_LINES_RANGE.start() as u64..=*MAX_CLAUDE_LINES_RANGE.end() as u64)
    )]
    pub max_claude_lines: usize,

    /// Maximum AGENTS.md lines
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_AGENTS_LINES,
        value_name = "LINES",
        value_parser = RangedU64ValueParser::<usize>::new()
            .range(*MAX_AGENTS_LINES_RANGE.start() as u64..=*MAX_AGENTS_LINES_RANGE.end() as u64)
    )]
    pub max_agents_lines: usize,

    #[command(flatten)]
    pub output: OutputOptions,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }
        Ok(())
    }

    /// Returns the console log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

impl Command {
    /// The dashboard page this command opens, if it is one.
    pub fn request(&self) -> Option<Request> {
        match self {
            Command::Analyze(form) => Some(Request::Analysis(form.clone())),
            Command::Readme(form) => Some(Request::Readme(form.clone())),
            Command::AiRules(form) => Some(Request::AiRules(form.clone())),
            Command::About => Some(Request::About),
            Command::InitConfig => None,
        }
    }

    /// Output options of the page, when it produces files.
    pub fn output(&self) -> Option<&OutputOptions> {
        match self {
            Command::Analyze(form) => Some(&form.output),
            Command::Readme(form) => Some(&form.output),
            Command::AiRules(form) => Some(&form.output),
            Command::About | Command::InitConfig => None,
        }
    }
}
