//! File scanner for discovering the source files handed to analyzer agents.
//!
//! Respects configured extensions, excluded names and file size limits.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["rs", "py", "js"])
    pub extensions: Vec<String>,
    /// Names to exclude (e.g., ["node_modules", "target", ".git"])
    pub excludes: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: usize,
    /// Maximum number of files to scan
    pub max_files: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&crate::config::ScannerConfig::default())
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            excludes: config.excludes.clone(),
            max_file_size: config.max_file_size,
            max_files: Some(config.max_files),
        }
    }
}

/// Scanned file information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Relative path from repo root, `/`-separated
    pub path: String,
    /// File size in bytes
    pub size: u64,
}

/// File scanner for discovering source files.
pub struct FileScanner {
    config: ScanConfig,
    repo_root: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(repo_root: PathBuf, config: ScanConfig) -> Self {
        Self { config, repo_root }
    }

    /// Scan for all matching files, in sorted path order.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.repo_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded_entry(entry));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            if let Some(max) = self.config.max_files {
                if files.len() >= max {
                    debug!("Reached max_files limit of {}", max);
                    break;
                }
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let rel_path = entry
                .path()
                .strip_prefix(&self.repo_root)
                .unwrap_or(entry.path());

            files.push(ScannedFile {
                path: rel_path
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
                size,
            });
        }

        Ok(files)
    }

    /// Collect all matching files with their contents, keyed by relative path.
    pub fn collect_files(&self) -> Result<BTreeMap<String, String>> {
        let scanned = self.scan()?;
        let mut files = BTreeMap::new();

        for file in scanned {
            debug!("Reading {} ({} bytes)", file.path, file.size);
            let full_path = self.repo_root.join(&file.path);
            match fs::read_to_string(&full_path) {
                Ok(content) => {
                    files.insert(file.path, content);
                }
                Err(e) => {
                    warn!("Failed to read {}: {}", file.path, e);
                }
            }
        }

        Ok(files)
    }

    /// Check if a file matches scan criteria.
    pub fn matches(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if self.is_excluded(name) {
                return false;
            }
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.config.extensions.iter().any(|e| e == ext) {
            return false;
        }

        match fs::metadata(path) {
            Ok(metadata) => metadata.len() <= self.config.max_file_size as u64,
            Err(_) => false,
        }
    }

    fn is_excluded_entry(&self, entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|name| self.is_excluded(name))
            .unwrap_or(true)
    }

    /// Check if a name matches exclusion patterns.
    fn is_excluded(&self, name: &str) -> bool {
        // Hidden files
        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern)
    }
}
