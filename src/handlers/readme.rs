//! README generation from the analysis documents.

use super::{docs_context, project_name, require_analysis_docs, Handler};
use crate::artifacts::{self, README_FILE};
use crate::llm::{strip_markdown_fence, ChatModel};
use crate::models::ReadmeHandlerConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct ReadmeHandler {
    model: Arc<dyn ChatModel>,
}

impl ReadmeHandler {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Handler for ReadmeHandler {
    type Config = ReadmeHandlerConfig;

    async fn handle(&self, config: &ReadmeHandlerConfig) -> Result<()> {
        config.validate()?;

        let sections = config.enabled_sections();
        if sections.is_empty() {
            anyhow::bail!("Every README section is excluded");
        }

        let docs = require_analysis_docs(&config.repo_path)?;

        let existing = if config.use_existing_readme {
            artifacts::collect_readme(&config.repo_path)?.map(|readme| readme.content)
        } else {
            None
        };

        let mut prompt = format!(
            "Write README.md for the project \"{}\".\n\n\
             Include exactly these sections, in this order, each as a `##` heading:\n",
            project_name(&config.repo_path)
        );
        for (i, section) in sections.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, section));
        }
        prompt.push('\n');

        if let Some(existing) = existing {
            prompt.push_str(
                "The project already has a README. Keep its accurate content and \
                 merge it into the new structure:\n\n=== EXISTING README ===\n",
            );
            prompt.push_str(&existing);
            prompt.push_str("\n=== END OF EXISTING README ===\n\n");
        }

        prompt.push_str(&docs_context(&docs));

        info!(
            "Generating README with {} sections ({})",
            sections.len(),
            self.model.model_name()
        );

        let reply = self
            .model
            .complete(DOCUMENTER_SYSTEM_PROMPT, &prompt)
            .await
            .context("README generator failed")?;

        let path = config.repo_path.join(README_FILE);
        std::fs::write(&path, format!("{}\n", strip_markdown_fence(&reply)))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());

        Ok(())
    }
}

/// System prompt for the README generator
const DOCUMENTER_SYSTEM_PROMPT: &str = r#"You are a technical writer producing a project README.
Base every statement on the analysis documents you are given.
Write clear GitHub-flavoured Markdown. Output only the README content."#;
