//! AI assistant rule files: CLAUDE.md, AGENTS.md and Cursor rules.

use super::{docs_context, project_name, require_analysis_docs, Handler};
use crate::artifacts::{self, AGENTS_FILE, CLAUDE_FILE};
use crate::llm::{strip_markdown_fence, ChatModel};
use crate::models::AIRulesHandlerConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// File name of the generated Cursor rule inside `.cursor/rules`.
pub const CURSOR_RULE_FILE: &str = "project.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleTarget {
    ClaudeMd,
    AgentsMd,
    CursorRules,
}

impl RuleTarget {
    const ALL: [RuleTarget; 3] = [
        RuleTarget::ClaudeMd,
        RuleTarget::AgentsMd,
        RuleTarget::CursorRules,
    ];

    fn output_path(&self, repo: &Path) -> PathBuf {
        match self {
            RuleTarget::ClaudeMd => repo.join(CLAUDE_FILE),
            RuleTarget::AgentsMd => repo.join(AGENTS_FILE),
            RuleTarget::CursorRules => artifacts::cursor_rules_dir(repo).join(CURSOR_RULE_FILE),
        }
    }

    /// Whether a previous run (or the user) already produced this target.
    fn exists(&self, repo: &Path) -> Result<bool> {
        match self {
            RuleTarget::CursorRules => {
                Ok(!artifacts::list_markdown(&artifacts::cursor_rules_dir(repo))?.is_empty())
            }
            _ => Ok(self.output_path(repo).exists()),
        }
    }

    fn skip_requested(&self, config: &AIRulesHandlerConfig) -> bool {
        match self {
            RuleTarget::ClaudeMd => config.skip_existing_claude_md,
            RuleTarget::AgentsMd => config.skip_existing_agents_md,
            RuleTarget::CursorRules => config.skip_existing_cursor_rules,
        }
    }

    fn max_lines(&self, config: &AIRulesHandlerConfig) -> Option<usize> {
        match self {
            RuleTarget::ClaudeMd => Some(config.max_claude_lines),
            RuleTarget::AgentsMd => Some(config.max_agents_lines),
            RuleTarget::CursorRules => None,
        }
    }

    fn instructions(&self) -> &'static str {
        match self {
            RuleTarget::ClaudeMd => {
                "Write CLAUDE.md: guidance for Claude working in this repository. Cover build, \
                 test and lint commands, the architecture, code style and the rules to follow."
            }
            RuleTarget::AgentsMd => {
                "Write AGENTS.md: a compact briefing for any coding agent. Cover setup, \
                 commands, project layout and conventions."
            }
            RuleTarget::CursorRules => {
                "Write a Cursor project rule in Markdown: the conventions and constraints an \
                 editor assistant must apply when changing files in this repository."
            }
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::ClaudeMd => write!(f, "CLAUDE.md"),
            RuleTarget::AgentsMd => write!(f, "AGENTS.md"),
            RuleTarget::CursorRules => write!(f, "Cursor rules"),
        }
    }
}

pub struct AIRulesHandler {
    model: Arc<dyn ChatModel>,
}

impl AIRulesHandler {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    async fn generate(
        &self,
        target: RuleTarget,
        config: &AIRulesHandlerConfig,
        context: &str,
    ) -> Result<String> {
        let mut prompt = format!(
            "{}\nProject: {}\nDetail level: {}. {}\n",
            target.instructions(),
            project_name(&config.repo_path),
            config.detail_level,
            config.detail_level.guidance(),
        );
        if let Some(limit) = target.max_lines(config) {
            prompt.push_str(&format!("Keep it under {} lines.\n", limit));
        }
        prompt.push('\n');
        prompt.push_str(context);

        let reply = self
            .model
            .complete(AI_RULES_SYSTEM_PROMPT, &prompt)
            .await
            .with_context(|| format!("{} generation failed", target))?;

        let body = strip_markdown_fence(&reply);
        Ok(match target.max_lines(config) {
            Some(limit) => truncate_lines(&body, limit),
            None => body,
        })
    }
}

#[async_trait]
impl Handler for AIRulesHandler {
    type Config = AIRulesHandlerConfig;

    async fn handle(&self, config: &AIRulesHandlerConfig) -> Result<()> {
        config.validate()?;

        let docs = require_analysis_docs(&config.repo_path)?;
        let context = docs_context(&docs);

        for target in RuleTarget::ALL {
            if target.skip_requested(config) && target.exists(&config.repo_path)? {
                info!("Skipping {}: already exists", target);
                continue;
            }

            info!("Generating {} ({})", target, self.model.model_name());
            let body = self.generate(target, config, &context).await?;

            let path = target.output_path(&config.repo_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, format!("{}\n", body))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }

        Ok(())
    }
}

/// Keep at most `max` lines of `text`.
fn truncate_lines(text: &str, max: usize) -> String {
    text.lines().take(max).collect::<Vec<_>>().join("\n")
}

/// System prompt for the AI rules generator
const AI_RULES_SYSTEM_PROMPT: &str = r#"You write configuration files that brief AI coding assistants about a repository.
Base every statement on the analysis documents you are given.
Be direct and imperative. Output only the file content in Markdown."#;
