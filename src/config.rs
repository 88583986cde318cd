//! Configuration file handling.
//!
//! Settings come from `.ai-doc-gen.toml` (or `--config`), with the per-agent
//! LLM settings overridable through `<AGENT>_LLM_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".ai-doc-gen.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,

    /// LLM used by the analyzer agents.
    pub analyzer: LlmConfig,

    /// LLM used by the README generator.
    pub documenter: LlmConfig,

    /// LLM used by the AI rules generator.
    pub ai_rules: LlmConfig,

    /// Repository scanner settings.
    pub scanner: ScannerConfig,

    /// Log file settings.
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            analyzer: LlmConfig::analyzer(),
            documenter: LlmConfig::documenter(),
            ai_rules: LlmConfig::ai_rules(),
            scanner: ScannerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// The configuration file as written: agent tables may set any subset of fields.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    general: GeneralConfig,
    #[serde(default)]
    analyzer: LlmOverrides,
    #[serde(default)]
    documenter: LlmOverrides,
    #[serde(default)]
    ai_rules: LlmOverrides,
    #[serde(default)]
    scanner: ScannerConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            general: file.general,
            analyzer: file.analyzer.over(LlmConfig::analyzer()),
            documenter: file.documenter.over(LlmConfig::documenter()),
            ai_rules: file.ai_rules.over(LlmConfig::ai_rules()),
            scanner: file.scanner,
            logging: file.logging,
        }
    }
}

/// Fields set in one agent table; unset fields keep that agent's defaults.
#[derive(Debug, Default, Deserialize)]
struct LlmOverrides {
    model: Option<String>,
    base_url: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    timeout_seconds: Option<u64>,
}

impl LlmOverrides {
    fn over(self, base: LlmConfig) -> LlmConfig {
        LlmConfig {
            model: self.model.unwrap_or(base.model),
            base_url: self.base_url.unwrap_or(base.base_url),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
            timeout_seconds: self.timeout_seconds.unwrap_or(base.timeout_seconds),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Show the spinner while a handler runs.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            show_progress: true,
        }
    }
}

/// Settings for one agent's LLM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmConfig {
    /// Model name.
    pub model: String,

    /// Base URL of the Ollama-compatible API.
    pub base_url: String,

    /// Maximum tokens in a response.
    pub max_tokens: u32,

    /// Temperature for generation.
    pub temperature: f64,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl LlmConfig {
    fn analyzer() -> Self {
        Self::default()
    }

    fn documenter() -> Self {
        Self {
            temperature: 0.3,
            ..Self::default()
        }
    }

    fn ai_rules() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 4096,
            ..Self::default()
        }
    }

    /// Apply `<PREFIX>_LLM_*` environment overrides.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env(&mut self, prefix: &str, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{}_LLM_{}", prefix, name));

        if let Some(model) = var("MODEL") {
            self.model = model;
        }
        if let Some(url) = var("BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = var("MAX_TOKENS") {
            match raw.parse() {
                Ok(v) => self.max_tokens = v,
                Err(_) => warn!("Ignoring {}_LLM_MAX_TOKENS={:?}", prefix, raw),
            }
        }
        if let Some(raw) = var("TEMPERATURE") {
            match raw.parse() {
                Ok(v) => self.temperature = v,
                Err(_) => warn!("Ignoring {}_LLM_TEMPERATURE={:?}", prefix, raw),
            }
        }
        if let Some(raw) = var("TIMEOUT") {
            match raw.parse() {
                Ok(v) => self.timeout_seconds = v,
                Err(_) => warn!("Ignoring {}_LLM_TIMEOUT={:?}", prefix, raw),
            }
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f64 {
    0.1
}

fn default_timeout() -> u64 {
    600
}

/// Repository scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Maximum files sent to an analyzer.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// File extensions to include.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory or file names to skip.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,

    /// Maximum file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            extensions: default_extensions(),
            excludes: default_excludes(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_max_files() -> usize {
    60
}

fn default_extensions() -> Vec<String> {
    vec![
        "rs", "py", "js", "ts", "jsx", "tsx", "go", "java", "c", "cpp", "h", "hpp", "cs", "rb",
        "php", "swift", "kt", "scala", "toml", "yaml", "yml", "json",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_excludes() -> Vec<String> {
    vec![
        ".git",
        ".ai",
        "target",
        "node_modules",
        "vendor",
        "dist",
        "build",
        "__pycache__",
        ".venv",
        "venv",
        "package-lock.json",
        "Cargo.lock",
        "yarn.lock",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_file_size() -> usize {
    100 * 1024 // 100KB
}

/// Log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a log file for every run.
    #[serde(default = "default_true")]
    pub file_enabled: bool,

    /// Root directory for log files; a dated subdirectory is created per day.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: true,
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".logs").join("ai-doc-gen")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the current directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Apply process environment overrides to every agent.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.analyzer.apply_env("ANALYZER", &lookup);
        self.documenter.apply_env("DOCUMENTER", &lookup);
        self.ai_rules.apply_env("AI_RULES", &lookup);
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Flags only ever switch settings on; absent flags keep the file value.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.verbose {
            self.general.verbose = true;
        }
        if args.quiet {
            self.general.show_progress = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
