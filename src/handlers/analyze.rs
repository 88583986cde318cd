//! Repository analysis: one analyzer agent per enabled section.
//!
//! Source files are scanned once and shared by every agent. Agents run
//! concurrently, at most `max_workers` at a time; the documents are only
//! written once all of them have succeeded.

use super::Handler;
use crate::artifacts;
use crate::llm::{strip_markdown_fence, ChatModel};
use crate::models::{AnalysisSection, AnalyzeHandlerConfig};
use crate::repo::{inspect_repository, RepoContext};
use crate::scanner::{FileScanner, ScanConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AnalyzeHandler {
    model: Arc<dyn ChatModel>,
    scan_config: ScanConfig,
}

impl AnalyzeHandler {
    pub fn new(model: Arc<dyn ChatModel>, scan_config: ScanConfig) -> Self {
        Self { model, scan_config }
    }

    async fn analyze_section(
        &self,
        section: AnalysisSection,
        sources: &str,
    ) -> Result<(AnalysisSection, String)> {
        info!("{} agent started ({})", section, self.model.model_name());

        let prompt = format!(
            "Write the \"{section}\" document for this repository.\n\
             Describe {focus}.\n\
             Start with the heading `# {section}` and use Markdown throughout.\n\
             Reference concrete file paths. Do not invent components that are not in the sources.\n\n\
             {sources}",
            section = section,
            focus = section.focus(),
            sources = sources,
        );

        let reply = self
            .model
            .complete(ANALYZER_SYSTEM_PROMPT, &prompt)
            .await
            .with_context(|| format!("{} agent failed", section))?;

        info!("{} agent finished", section);
        Ok((section, strip_markdown_fence(&reply)))
    }
}

#[async_trait]
impl Handler for AnalyzeHandler {
    type Config = AnalyzeHandlerConfig;

    async fn handle(&self, config: &AnalyzeHandlerConfig) -> Result<()> {
        config.validate()?;

        if !config.repo_path.is_dir() {
            anyhow::bail!("Not a directory: {}", config.repo_path.display());
        }

        let sections = config.enabled_sections();
        if sections.is_empty() {
            warn!("Every analysis section is excluded; nothing to do");
            return Ok(());
        }

        let scanner = FileScanner::new(config.repo_path.clone(), self.scan_config.clone());
        let files = scanner.collect_files()?;
        if files.is_empty() {
            anyhow::bail!(
                "No source files found in {}",
                config.repo_path.display()
            );
        }
        info!("Collected {} source files", files.len());

        let git = inspect_repository(&config.repo_path);
        let sources = build_source_context(&files, git.as_ref());

        let workers = config.effective_workers();
        info!(
            "Running {} analyzer agents with {} workers",
            sections.len(),
            workers
        );

        let documents: Vec<(AnalysisSection, String)> = stream::iter(sections)
            .map(|section| self.analyze_section(section, &sources))
            .buffer_unordered(workers)
            .try_collect()
            .await?;

        let docs_dir = artifacts::docs_dir(&config.repo_path);
        std::fs::create_dir_all(&docs_dir)
            .with_context(|| format!("Failed to create {}", docs_dir.display()))?;

        for (section, body) in documents {
            let path = docs_dir.join(section.file_name());
            std::fs::write(&path, format!("{}\n", body))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }

        Ok(())
    }
}

/// Prompt block with git facts, the file list and every file's content.
fn build_source_context(files: &BTreeMap<String, String>, git: Option<&RepoContext>) -> String {
    let mut context = String::new();

    if let Some(git) = git {
        let described = git.describe();
        if !described.is_empty() {
            context.push_str(&described);
            context.push_str("\n\n");
        }
    }

    context.push_str("File tree:\n");
    for path in files.keys() {
        context.push_str(&format!("- {}\n", path));
    }

    context.push_str("\n=== FILES ===\n\n");
    for (path, content) in files {
        context.push_str(&format!("### FILE: {}\n```\n{}\n```\n\n", path, content));
    }
    context.push_str("=== END OF FILES ===\n");

    context
}

/// System prompt shared by all analyzer agents
const ANALYZER_SYSTEM_PROMPT: &str = r#"You are a senior software architect documenting an unfamiliar codebase.
You receive the repository's source files and write one focused Markdown document.
Be precise and concrete. Prefer short sections, bullet lists and tables.
Output only the Markdown document, without preamble."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::ScriptedModel;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(repo: &Path) -> AnalyzeHandlerConfig {
        AnalyzeHandlerConfig {
            repo_path: repo.to_path_buf(),
            exclude_code_structure: false,
            exclude_dependencies: false,
            exclude_data_flow: true,
            exclude_request_flow: true,
            exclude_api_analysis: false,
            max_workers: 2,
        }
    }

    fn repo_with_source() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src/main.rs"), "fn main() {}\n").unwrap();
        temp_dir
    }

    #[test]
    fn test_writes_one_document_per_enabled_section() {
        let temp_dir = repo_with_source();
        let model = Arc::new(ScriptedModel::replying("```markdown\n# Doc\n\nBody\n```"));
        let handler = AnalyzeHandler::new(model.clone(), ScanConfig::default());

        tokio_test::block_on(handler.handle(&config(temp_dir.path()))).unwrap();

        let docs = artifacts::docs_dir(temp_dir.path());
        let mut names: Vec<_> = fs::read_dir(&docs)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "api_analysis.md",
                "dependency_analysis.md",
                "structure_analysis.md"
            ]
        );
        assert_eq!(
            fs::read_to_string(docs.join("api_analysis.md")).unwrap(),
            "# Doc\n\nBody\n"
        );

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p.contains("### FILE: src/main.rs")));
    }

    #[test]
    fn test_agent_failure_writes_nothing() {
        let temp_dir = repo_with_source();
        let model = Arc::new(ScriptedModel::failing("connection refused"));
        let handler = AnalyzeHandler::new(model, ScanConfig::default());

        let err = tokio_test::block_on(handler.handle(&config(temp_dir.path()))).unwrap_err();
        assert!(format!("{:#}", err).contains("connection refused"));
        assert!(!artifacts::docs_dir(temp_dir.path()).exists());
    }

    #[test]
    fn test_rejects_out_of_range_workers() {
        let temp_dir = repo_with_source();
        let model = Arc::new(ScriptedModel::replying("# Doc"));
        let handler = AnalyzeHandler::new(model.clone(), ScanConfig::default());

        let mut cfg = config(temp_dir.path());
        cfg.max_workers = 64;
        assert!(tokio_test::block_on(handler.handle(&cfg)).is_err());
        assert!(model.prompts().is_empty());
    }

    #[test]
    fn test_empty_repository_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let handler = AnalyzeHandler::new(
            Arc::new(ScriptedModel::replying("# Doc")),
            ScanConfig::default(),
        );
        let err = tokio_test::block_on(handler.handle(&config(temp_dir.path()))).unwrap_err();
        assert!(err.to_string().starts_with("No source files found"));
    }

    #[test]
    fn test_source_context_includes_git_and_tree() {
        let mut files = BTreeMap::new();
        files.insert("src/lib.rs".to_string(), "pub fn a() {}".to_string());
        let git = RepoContext {
            branch: Some("main".to_string()),
            commit: Some("deadbeef".to_string()),
            github: None,
        };

        let context = build_source_context(&files, Some(&git));
        assert!(context.starts_with("Branch: main\nCommit: deadbeef\n\n"));
        assert!(context.contains("- src/lib.rs\n"));
        assert!(context.contains("### FILE: src/lib.rs\n```\npub fn a() {}\n```"));
    }
}
