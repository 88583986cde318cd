//! Terminal rendering of page outcomes.
//!
//! Builds the text shown after a page ran and exports generated files
//! (the dashboard's download buttons) into a directory.

use crate::artifacts::{Artifact, ArtifactFile};
use crate::pages::{PageOutcome, Status};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Render a complete page.
pub fn render_outcome(outcome: &PageOutcome, preview: bool) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("{}\n", outcome.page.heading()));
    let subtitle = outcome.page.subtitle();
    if !subtitle.is_empty() {
        output.push_str(&format!("{}\n", subtitle));
    }
    output.push('\n');

    match &outcome.status {
        Status::Success(message) => {
            output.push_str(&format!("✅ {}\n", message));
            output.push_str(&render_artifacts(outcome, preview));
        }
        Status::Failed(error) => {
            output.push_str(&format!("❌ {}\n", error));
        }
        Status::Info(text) => {
            output.push_str(text);
        }
    }

    output
}

/// Generate the section listing generated files.
fn render_artifacts(outcome: &PageOutcome, preview: bool) -> String {
    if outcome.artifacts.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str(&format!("\n{}\n\n", outcome.page.results_heading()));

    for artifact in &outcome.artifacts {
        match artifact {
            Artifact::File(file) => {
                section.push_str(&render_file(file, preview));
            }
            Artifact::Directory { path, members, .. } => {
                section.push_str(&format!("📝 {}\n", artifact.label()));
                section.push_str(&format!("   ℹ️ Directory created: {}\n", path.display()));
                for member in members {
                    section.push_str(&format!("   **{}**\n", member.label));
                    if preview {
                        section.push_str(&fenced(&member.content));
                    }
                }
            }
        }
    }

    section
}

fn render_file(file: &ArtifactFile, preview: bool) -> String {
    let mut entry = format!(
        "📝 {} ({} lines, {} bytes)\n",
        file.label,
        file.content.lines().count(),
        file.content.len()
    );
    entry.push_str(&format!("   {}\n", file.path.display()));
    if preview {
        entry.push('\n');
        entry.push_str(&file.content);
        if !file.content.ends_with('\n') {
            entry.push('\n');
        }
        entry.push('\n');
    }
    entry
}

fn fenced(content: &str) -> String {
    format!("```markdown\n{}\n```\n", content.trim_end())
}

/// Export every downloadable file of a successful outcome into `dir`.
///
/// Directory members are listed but not downloadable, same as on the page.
pub fn export_artifacts(outcome: &PageOutcome, dir: &Path) -> Result<Vec<PathBuf>> {
    if !matches!(outcome.status, Status::Success(_)) {
        return Ok(Vec::new());
    }

    outcome
        .artifacts
        .iter()
        .filter_map(|artifact| match artifact {
            Artifact::File(file) => Some(file.export_to(dir)),
            Artifact::Directory { .. } => None,
        })
        .collect()
}
