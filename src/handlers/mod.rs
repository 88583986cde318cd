//! Documentation-generation handlers.
//!
//! A handler performs one workflow end-to-end for one configuration object
//! and leaves its results on disk. Pages only know this trait, so any of the
//! default implementations below can be swapped out.

pub mod ai_rules;
pub mod analyze;
pub mod readme;

pub use ai_rules::AIRulesHandler;
pub use analyze::AnalyzeHandler;
pub use readme::ReadmeHandler;

use crate::artifacts::{self, ArtifactFile};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// One documentation workflow.
#[async_trait]
pub trait Handler: Send + Sync {
    type Config: Send + Sync;

    /// Run the workflow once. Any error aborts the whole run.
    async fn handle(&self, config: &Self::Config) -> Result<()>;
}

/// Analysis documents for `repo`, or an error telling the user to analyze first.
fn require_analysis_docs(repo: &Path) -> Result<Vec<ArtifactFile>> {
    let docs = artifacts::collect_analysis_docs(repo)?;
    if docs.is_empty() {
        anyhow::bail!(
            "No analysis documents found in {}. Run the analysis first.",
            artifacts::docs_dir(repo).display()
        );
    }
    Ok(docs)
}

/// Concatenate analysis documents into one prompt block.
fn docs_context(docs: &[ArtifactFile]) -> String {
    let mut context = String::from("=== ANALYSIS DOCUMENTS ===\n\n");
    for doc in docs {
        context.push_str(&format!("### DOCUMENT: {}\n{}\n\n", doc.label, doc.content.trim()));
    }
    context.push_str("=== END OF ANALYSIS DOCUMENTS ===\n");
    context
}

/// Directory name of the repository, used as the project name in prompts.
fn project_name(repo: &Path) -> String {
    repo.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(repo)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}
