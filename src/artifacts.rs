//! Files the handlers leave behind in a repository, and how pages read them back.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const README_FILE: &str = "README.md";
pub const CLAUDE_FILE: &str = "CLAUDE.md";
pub const AGENTS_FILE: &str = "AGENTS.md";

/// `<repo>/.ai/docs`, where analysis documents are written.
pub fn docs_dir(repo: &Path) -> PathBuf {
    repo.join(".ai").join("docs")
}

/// `<repo>/.cursor/rules`, where Cursor rule files are written.
pub fn cursor_rules_dir(repo: &Path) -> PathBuf {
    repo.join(".cursor").join("rules")
}

/// Markdown files directly inside `dir`, sorted by name.
///
/// Symlinks are followed. A missing directory yields an empty list.
pub fn list_markdown(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let is_markdown = entry.path().extension().and_then(|e| e.to_str()) == Some("md");
        if entry.file_type().is_file() && is_markdown {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// A generated file, read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// Name shown to the user and used when exporting.
    pub label: String,
    pub path: PathBuf,
    pub content: String,
}

impl ArtifactFile {
    /// Read `path`, labelling it with its file name.
    pub fn read(path: &Path) -> Result<Self> {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::read_as(path, label)
    }

    pub fn read_as(path: &Path, label: impl Into<String>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            label: label.into(),
            path: path.to_path_buf(),
            content,
        })
    }

    /// Write a copy into `dir` under the artifact's label.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        let target = dir.join(&self.label);
        fs::write(&target, &self.content)
            .with_context(|| format!("Failed to export {}", target.display()))?;
        Ok(target)
    }
}

/// Something a page shows after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    File(ArtifactFile),
    /// A generated directory together with its markdown members.
    Directory {
        label: String,
        path: PathBuf,
        members: Vec<ArtifactFile>,
    },
}

impl Artifact {
    pub fn label(&self) -> &str {
        match self {
            Artifact::File(file) => &file.label,
            Artifact::Directory { label, .. } => label,
        }
    }
}

/// Every markdown document under `<repo>/.ai/docs`.
pub fn collect_analysis_docs(repo: &Path) -> Result<Vec<ArtifactFile>> {
    list_markdown(&docs_dir(repo))?
        .iter()
        .map(|path| ArtifactFile::read(path))
        .collect()
}

/// `<repo>/README.md` if it exists.
pub fn collect_readme(repo: &Path) -> Result<Option<ArtifactFile>> {
    let path = repo.join(README_FILE);
    if path.is_file() {
        Ok(Some(ArtifactFile::read(&path)?))
    } else {
        Ok(None)
    }
}

/// CLAUDE.md, AGENTS.md and the Cursor rules directory, whichever exist.
pub fn collect_ai_rules(repo: &Path) -> Result<Vec<Artifact>> {
    let locations = [
        (repo.join(CLAUDE_FILE), CLAUDE_FILE),
        (repo.join(AGENTS_FILE), AGENTS_FILE),
        (cursor_rules_dir(repo), "Cursor Rules"),
    ];

    let mut artifacts = Vec::new();
    for (path, label) in locations {
        if path.is_dir() {
            let members = list_markdown(&path)?
                .iter()
                .map(|member| ArtifactFile::read(member))
                .collect::<Result<Vec<_>>>()?;
            artifacts.push(Artifact::Directory {
                label: label.to_string(),
                path,
                members,
            });
        } else if path.exists() {
            artifacts.push(Artifact::File(ArtifactFile::read_as(&path, label)?));
        }
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_markdown_is_shallow_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("b.md"), "b").unwrap();
        fs::write(dir.join("a.md"), "a").unwrap();
        fs::write(dir.join("c.txt"), "c").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("d.md"), "d").unwrap();

        let names: Vec<_> = list_markdown(dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_markdown_includes_symlinked_files() {
        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("shared.md");
        fs::write(&shared, "# Shared").unwrap();
        let dir = temp_dir.path().join("rules");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("local.md"), "# Local").unwrap();
        std::os::unix::fs::symlink(&shared, dir.join("linked.md")).unwrap();

        let files = list_markdown(&dir).unwrap();
        assert_eq!(files, vec![dir.join("linked.md"), dir.join("local.md")]);
        assert_eq!(ArtifactFile::read(&files[0]).unwrap().content, "# Shared");
    }

    #[test]
    fn test_list_markdown_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_markdown(&temp_dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_collect_readme() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(collect_readme(temp_dir.path()).unwrap(), None);

        fs::write(temp_dir.path().join("README.md"), "# Title\n").unwrap();
        let readme = collect_readme(temp_dir.path()).unwrap().unwrap();
        assert_eq!(readme.label, "README.md");
        assert_eq!(readme.content, "# Title\n");
    }

    #[test]
    fn test_collect_ai_rules_only_existing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path();
        fs::write(repo.join("AGENTS.md"), "agents").unwrap();
        let rules = cursor_rules_dir(repo);
        fs::create_dir_all(&rules).unwrap();
        fs::write(rules.join("project.md"), "rule").unwrap();
        fs::write(rules.join("ignored.mdc"), "other").unwrap();

        let artifacts = collect_ai_rules(repo).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].label(), "AGENTS.md");
        match &artifacts[1] {
            Artifact::Directory { label, members, .. } => {
                assert_eq!(label, "Cursor Rules");
                assert_eq!(members.len(), 1);
                assert_eq!(members[0].label, "project.md");
                assert_eq!(members[0].content, "rule");
            }
            other => panic!("expected directory, got {:?}", other),
        }
    }

    #[test]
    fn test_export_to_writes_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("api_analysis.md");
        fs::write(&source, "# API").unwrap();

        let artifact = ArtifactFile::read(&source).unwrap();
        let out = temp_dir.path().join("exports");
        let target = artifact.export_to(&out).unwrap();

        assert_eq!(target, out.join("api_analysis.md"));
        assert_eq!(fs::read_to_string(target).unwrap(), "# API");
    }
}
