//! Handler configuration objects.
//!
//! Each page builds exactly one of these per submission and hands it to its
//! handler. They are plain values: built from the form, never mutated, dropped
//! once the handler returns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use thiserror::Error;

/// Allowed worker counts for the analysis handler (0 means one per CPU).
pub const MAX_WORKERS_RANGE: RangeInclusive<usize> = 0..=20;

/// Allowed line limits for a generated CLAUDE.md.
pub const MAX_CLAUDE_LINES_RANGE: RangeInclusive<usize> = 100..=2000;

/// Allowed line limits for a generated AGENTS.md.
pub const MAX_AGENTS_LINES_RANGE: RangeInclusive<usize> = 50..=500;

pub const DEFAULT_MAX_CLAUDE_LINES: usize = 500;
pub const DEFAULT_MAX_AGENTS_LINES: usize = 150;

/// A field of a handler config holds a value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
        value: usize,
    },
}

fn check_range(
    field: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            value,
        })
    }
}

/// One of the analyses the analyzer agents can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSection {
    CodeStructure,
    Dependencies,
    DataFlow,
    RequestFlow,
    Api,
}

impl AnalysisSection {
    pub const ALL: [AnalysisSection; 5] = [
        AnalysisSection::CodeStructure,
        AnalysisSection::Dependencies,
        AnalysisSection::DataFlow,
        AnalysisSection::RequestFlow,
        AnalysisSection::Api,
    ];

    /// File name of the document written under `.ai/docs`.
    pub fn file_name(&self) -> &'static str {
        match self {
            AnalysisSection::CodeStructure => "structure_analysis.md",
            AnalysisSection::Dependencies => "dependency_analysis.md",
            AnalysisSection::DataFlow => "data_flow_analysis.md",
            AnalysisSection::RequestFlow => "request_flow_analysis.md",
            AnalysisSection::Api => "api_analysis.md",
        }
    }

    /// What the agent responsible for this section is asked to describe.
    pub fn focus(&self) -> &'static str {
        match self {
            AnalysisSection::CodeStructure => {
                "the code organization: top-level modules, main components, entry points and how they relate"
            }
            AnalysisSection::Dependencies => {
                "internal module dependencies and external libraries or services, with what each is used for"
            }
            AnalysisSection::DataFlow => {
                "how data moves through the system: models, transformations, persistence and caches"
            }
            AnalysisSection::RequestFlow => {
                "how requests or commands enter the system and travel through handlers to responses"
            }
            AnalysisSection::Api => {
                "the public interfaces: endpoints, commands, exported functions, their inputs and outputs"
            }
        }
    }
}

impl fmt::Display for AnalysisSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSection::CodeStructure => write!(f, "Code Structure"),
            AnalysisSection::Dependencies => write!(f, "Dependencies"),
            AnalysisSection::DataFlow => write!(f, "Data Flow"),
            AnalysisSection::RequestFlow => write!(f, "Request Flow"),
            AnalysisSection::Api => write!(f, "API Analysis"),
        }
    }
}

/// Sections of a generated README, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadmeSection {
    ProjectOverview,
    TableOfContents,
    Architecture,
    C4Model,
    RepositoryStructure,
    DependenciesAndIntegration,
    ApiDocumentation,
    DevelopmentNotes,
    KnownIssuesAndLimitations,
    AdditionalDocumentation,
}

impl ReadmeSection {
    pub const ALL: [ReadmeSection; 10] = [
        ReadmeSection::ProjectOverview,
        ReadmeSection::TableOfContents,
        ReadmeSection::Architecture,
        ReadmeSection::C4Model,
        ReadmeSection::RepositoryStructure,
        ReadmeSection::DependenciesAndIntegration,
        ReadmeSection::ApiDocumentation,
        ReadmeSection::DevelopmentNotes,
        ReadmeSection::KnownIssuesAndLimitations,
        ReadmeSection::AdditionalDocumentation,
    ];
}

impl fmt::Display for ReadmeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            ReadmeSection::ProjectOverview => "Project Overview",
            ReadmeSection::TableOfContents => "Table of Contents",
            ReadmeSection::Architecture => "Architecture",
            ReadmeSection::C4Model => "C4 Model",
            ReadmeSection::RepositoryStructure => "Repository Structure",
            ReadmeSection::DependenciesAndIntegration => "Dependencies and Integration",
            ReadmeSection::ApiDocumentation => "API Documentation",
            ReadmeSection::DevelopmentNotes => "Development Notes",
            ReadmeSection::KnownIssuesAndLimitations => "Known Issues and Limitations",
            ReadmeSection::AdditionalDocumentation => "Additional Documentation",
        };
        write!(f, "{}", title)
    }
}

/// Verbosity of generated AI assistant rule files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Minimal,
    #[default]
    Standard,
    Comprehensive,
}

impl DetailLevel {
    /// Instruction given to the generator for this level.
    pub fn guidance(&self) -> &'static str {
        match self {
            DetailLevel::Minimal => {
                "Keep it minimal: only build/test commands and the handful of conventions an assistant must not break."
            }
            DetailLevel::Standard => {
                "Cover commands, architecture overview, coding conventions and common pitfalls at a moderate level of detail."
            }
            DetailLevel::Comprehensive => {
                "Be comprehensive: commands, architecture, module responsibilities, conventions, testing strategy, pitfalls and examples."
            }
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailLevel::Minimal => write!(f, "minimal"),
            DetailLevel::Standard => write!(f, "standard"),
            DetailLevel::Comprehensive => write!(f, "comprehensive"),
        }
    }
}

/// Options for one run of the analysis handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeHandlerConfig {
    pub repo_path: PathBuf,
    pub exclude_code_structure: bool,
    pub exclude_dependencies: bool,
    pub exclude_data_flow: bool,
    pub exclude_request_flow: bool,
    pub exclude_api_analysis: bool,
    /// Concurrent analyzer agents, 0 = one per CPU.
    pub max_workers: usize,
}

impl AnalyzeHandlerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_workers", self.max_workers, &MAX_WORKERS_RANGE)
    }

    /// Sections that are not excluded, in a stable order.
    pub fn enabled_sections(&self) -> Vec<AnalysisSection> {
        AnalysisSection::ALL
            .into_iter()
            .filter(|section| !self.is_excluded(*section))
            .collect()
    }

    fn is_excluded(&self, section: AnalysisSection) -> bool {
        match section {
            AnalysisSection::CodeStructure => self.exclude_code_structure,
            AnalysisSection::Dependencies => self.exclude_dependencies,
            AnalysisSection::DataFlow => self.exclude_data_flow,
            AnalysisSection::RequestFlow => self.exclude_request_flow,
            AnalysisSection::Api => self.exclude_api_analysis,
        }
    }

    /// Worker count with `0` resolved to the available parallelism.
    pub fn effective_workers(&self) -> usize {
        if self.max_workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.max_workers
        }
    }
}

/// Options for one run of the README handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadmeHandlerConfig {
    pub repo_path: PathBuf,
    pub use_existing_readme: bool,
    pub exclude_project_overview: bool,
    pub exclude_table_of_contents: bool,
    pub exclude_architecture: bool,
    pub exclude_c4_model: bool,
    pub exclude_repository_structure: bool,
    pub exclude_dependencies_and_integration: bool,
    pub exclude_api_documentation: bool,
    pub exclude_development_notes: bool,
    pub exclude_known_issues_and_limitations: bool,
    pub exclude_additional_documentation: bool,
}

impl ReadmeHandlerConfig {
    /// No ranged fields; kept so every handler config validates the same way.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    pub fn enabled_sections(&self) -> Vec<ReadmeSection> {
        ReadmeSection::ALL
            .into_iter()
            .filter(|section| !self.is_excluded(*section))
            .collect()
    }

    fn is_excluded(&self, section: ReadmeSection) -> bool {
        match section {
            ReadmeSection::ProjectOverview => self.exclude_project_overview,
            ReadmeSection::TableOfContents => self.exclude_table_of_contents,
            ReadmeSection::Architecture => self.exclude_architecture,
            ReadmeSection::C4Model => self.exclude_c4_model,
            ReadmeSection::RepositoryStructure => self.exclude_repository_structure,
            ReadmeSection::DependenciesAndIntegration => self.exclude_dependencies_and_integration,
            ReadmeSection::ApiDocumentation => self.exclude_api_documentation,
            ReadmeSection::DevelopmentNotes => self.exclude_development_notes,
            ReadmeSection::KnownIssuesAndLimitations => self.exclude_known_issues_and_limitations,
            ReadmeSection::AdditionalDocumentation => self.exclude_additional_documentation,
        }
    }
}

/// Options for one run of the AI rules handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AIRulesHandlerConfig {
    pub repo_path: PathBuf,
    pub skip_existing_claude_md: bool,
    pub skip_existing_agents_md: bool,
    pub skip_existing_cursor_rules: bool,
    pub detail_level: DetailLevel,
    pub max_claude_lines: usize,
    pub max_agents_lines: usize,
}

impl AIRulesHandlerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "max_claude_lines",
            self.max_claude_lines,
            &MAX_CLAUDE_LINES_RANGE,
        )?;
        check_range(
            "max_agents_lines",
            self.max_agents_lines,
            &MAX_AGENTS_LINES_RANGE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_config() -> AnalyzeHandlerConfig {
        AnalyzeHandlerConfig {
            repo_path: PathBuf::from("/tmp/repo"),
            exclude_code_structure: false,
            exclude_dependencies: false,
            exclude_data_flow: false,
            exclude_request_flow: false,
            exclude_api_analysis: false,
            max_workers: 0,
        }
    }

    fn rules_config() -> AIRulesHandlerConfig {
        AIRulesHandlerConfig {
            repo_path: PathBuf::from("/tmp/repo"),
            skip_existing_claude_md: false,
            skip_existing_agents_md: false,
            skip_existing_cursor_rules: false,
            detail_level: DetailLevel::Standard,
            max_claude_lines: DEFAULT_MAX_CLAUDE_LINES,
            max_agents_lines: DEFAULT_MAX_AGENTS_LINES,
        }
    }

    #[test]
    fn test_enabled_sections_respects_exclusions() {
        let mut config = analyze_config();
        assert_eq!(config.enabled_sections().len(), 5);

        config.exclude_data_flow = true;
        config.exclude_api_analysis = true;
        assert_eq!(
            config.enabled_sections(),
            vec![
                AnalysisSection::CodeStructure,
                AnalysisSection::Dependencies,
                AnalysisSection::RequestFlow,
            ]
        );
    }

    #[test]
    fn test_max_workers_range() {
        let mut config = analyze_config();
        assert!(config.validate().is_ok());

        config.max_workers = 20;
        assert!(config.validate().is_ok());

        config.max_workers = 21;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "max_workers",
                min: 0,
                max: 20,
                value: 21,
            })
        );
    }

    #[test]
    fn test_effective_workers() {
        let mut config = analyze_config();
        assert!(config.effective_workers() >= 1);

        config.max_workers = 3;
        assert_eq!(config.effective_workers(), 3);
    }

    #[test]
    fn test_rules_line_limits() {
        let mut config = rules_config();
        assert!(config.validate().is_ok());

        config.max_claude_lines = 99;
        assert!(config.validate().is_err());

        config.max_claude_lines = 2000;
        config.max_agents_lines = 501;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "max_agents_lines must be between 50 and 500, got 501"
        );
    }

    #[test]
    fn test_readme_sections_order() {
        let config = ReadmeHandlerConfig {
            repo_path: PathBuf::from("."),
            use_existing_readme: false,
            exclude_project_overview: false,
            exclude_table_of_contents: true,
            exclude_architecture: false,
            exclude_c4_model: true,
            exclude_repository_structure: false,
            exclude_dependencies_and_integration: false,
            exclude_api_documentation: false,
            exclude_development_notes: false,
            exclude_known_issues_and_limitations: false,
            exclude_additional_documentation: false,
        };

        let sections = config.enabled_sections();
        assert_eq!(sections.len(), 8);
        assert_eq!(sections[0], ReadmeSection::ProjectOverview);
        assert_eq!(sections[1], ReadmeSection::Architecture);
        assert!(!sections.contains(&ReadmeSection::C4Model));
    }

    #[test]
    fn test_detail_level_display_and_default() {
        assert_eq!(DetailLevel::default(), DetailLevel::Standard);
        assert_eq!(DetailLevel::Comprehensive.to_string(), "comprehensive");
        assert_eq!(
            serde_json::to_string(&DetailLevel::Minimal).unwrap(),
            "\"minimal\""
        );
    }
}
