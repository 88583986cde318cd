//! About page and the LLM configuration summary.

use super::{Page, PageOutcome, Status};
use crate::config::{Config, LlmConfig};

const OVERVIEW: &str = "\
### 🎯 What is AI Doc Gen?

AI Doc Gen analyzes codebases with specialized LLM agents and generates
documentation from what they find.

### ✨ Features

- **Multi-Agent Analysis**: up to 5 concurrent agents analyze different aspects of your code
- **Comprehensive Documentation**: README with architecture, structure and API sections
- **AI Assistant Integration**: CLAUDE.md, AGENTS.md and Cursor rules
- **Local Models**: any Ollama-compatible endpoint, configured per agent

### 🏗️ Architecture

**Analysis Agents:**
- 📦 Structure Analyzer - Maps code organization and components
- 🔗 Dependency Analyzer - Identifies internal and external dependencies
- 🔄 Data Flow Analyzer - Tracks data movement through the system
- 🌐 Request Flow Analyzer - Documents API and request handling
- 📡 API Analyzer - Catalogs endpoints and interfaces

**Generation Agents:**
- 📖 README Generator - Creates comprehensive project documentation
- 🤖 AI Rules Generator - Produces assistant configuration files
";

pub fn run(config: &Config) -> PageOutcome {
    PageOutcome {
        page: Page::About,
        status: Status::Info(about_text(config)),
        artifacts: Vec::new(),
    }
}

fn about_text(config: &Config) -> String {
    let mut text = String::from(OVERVIEW);

    text.push_str("\n### 📊 Current Configuration\n\n");
    for (name, llm) in agents(config) {
        text.push_str(&format!("**{}**\n", name));
        text.push_str(&agent_settings(llm));
        text.push('\n');
    }

    text.push_str(&format!("Version: {}\n", env!("CARGO_PKG_VERSION")));
    text
}

fn agents(config: &Config) -> [(&'static str, &LlmConfig); 3] {
    [
        ("Analyzer Agent", &config.analyzer),
        ("Documenter Agent", &config.documenter),
        ("AI Rules Generator", &config.ai_rules),
    ]
}

fn agent_settings(llm: &LlmConfig) -> String {
    format!(
        "  Model: {}\n  URL: {}\n  Max Tokens: {}\n  Temperature: {}\n  Timeout: {}s\n",
        llm.model, llm.base_url, llm.max_tokens, llm.temperature, llm.timeout_seconds
    )
}

/// Short model/URL listing shown under every page in verbose mode.
pub fn llm_summary(config: &Config) -> String {
    let mut text = String::from("🤖 LLM Configuration\n");
    for (name, llm) in agents(config) {
        text.push_str(&format!("  {}: {} @ {}\n", name, llm.model, llm.base_url));
    }
    text.push_str(&format!("  Version: {}\n", env!("CARGO_PKG_VERSION")));
    text
}
