//! AI rules generation page.

use super::{failure, invoke, Page, PageError, PageOutcome};
use crate::artifacts;
use crate::cli::AiRulesForm;
use crate::handlers::Handler;
use crate::models::AIRulesHandlerConfig;
use crate::runner::Runner;
use crate::session::SessionState;

const SPINNER: &str = "🤖 Generating AI rules... This may take a few minutes.";

impl From<&AiRulesForm> for AIRulesHandlerConfig {
    fn from(form: &AiRulesForm) -> Self {
        Self {
            repo_path: form.repo.clone(),
            skip_existing_claude_md: form.skip_claude,
            skip_existing_agents_md: form.skip_agents,
            skip_existing_cursor_rules: form.skip_cursor,
            detail_level: form.detail_level,
            max_claude_lines: form.max_claude_lines,
            max_agents_lines: form.max_agents_lines,
        }
    }
}

/// Generate the rule files and show whichever of them exist afterwards.
pub fn run<H>(
    form: &AiRulesForm,
    handler: &H,
    runner: &Runner,
    session: &mut SessionState,
) -> PageOutcome
where
    H: Handler<Config = AIRulesHandlerConfig>,
{
    if !form.repo.exists() {
        return PageOutcome::failed(Page::AiRules, PageError::PathNotFound(form.repo.clone()));
    }

    let config = AIRulesHandlerConfig::from(form);
    let result = invoke(handler, &config, runner, SPINNER, session)
        .and_then(|()| artifacts::collect_ai_rules(&config.repo_path));

    match result {
        Ok(found) => PageOutcome::success(Page::AiRules, "AI rules generated successfully!", found),
        Err(e) => failure(Page::AiRules, "AI rules generation", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::Artifact;
    use crate::cli::OutputOptions;
    use crate::models::DetailLevel;
    use crate::pages::testing::FakeHandler;
    use crate::pages::Status;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn form(repo: &Path) -> AiRulesForm {
        AiRulesForm {
            repo: repo.to_path_buf(),
            skip_claude: true,
            skip_agents: false,
            skip_cursor: false,
            detail_level: DetailLevel::Comprehensive,
            max_claude_lines: 800,
            max_agents_lines: 120,
            output: OutputOptions::default(),
        }
    }

    #[test]
    fn test_missing_path_skips_handler() {
        let handler = FakeHandler::new(|_: &AIRulesHandlerConfig| Ok(()));
        let mut session = SessionState::new();

        let outcome = run(
            &form(Path::new("/definitely/not/here")),
            &handler,
            &Runner::new(false),
            &mut session,
        );

        assert_eq!(handler.calls(), 0);
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_shows_existing_locations_only() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FakeHandler::new(|config: &AIRulesHandlerConfig| {
            let repo = &config.repo_path;
            fs::write(repo.join("CLAUDE.md"), "# Claude")?;
            let rules = artifacts::cursor_rules_dir(repo);
            fs::create_dir_all(&rules)?;
            fs::write(rules.join("project.md"), "# Rule")?;
            fs::write(rules.join("style.md"), "# Style")?;
            Ok(())
        });
        let mut session = SessionState::new();

        let outcome = run(&form(temp_dir.path()), &handler, &Runner::new(false), &mut session);

        assert!(matches!(outcome.status, Status::Success(_)));
        let labels: Vec<_> = outcome.artifacts.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["CLAUDE.md", "Cursor Rules"]);

        match &outcome.artifacts[1] {
            Artifact::Directory { members, .. } => {
                let names: Vec<_> = members.iter().map(|m| m.label.as_str()).collect();
                assert_eq!(names, vec!["project.md", "style.md"]);
            }
            other => panic!("unexpected artifact {:?}", other),
        }
    }

    #[test]
    fn test_handler_error_is_contained() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FakeHandler::new(|_: &AIRulesHandlerConfig| {
            Err(anyhow::anyhow!("timed out"))
        });
        let mut session = SessionState::new();

        let outcome = run(&form(temp_dir.path()), &handler, &Runner::new(false), &mut session);

        match &outcome.status {
            Status::Failed(e) => {
                assert_eq!(e.to_string(), "AI rules generation failed: timed out")
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(!session.analysis_running);
    }

    #[test]
    fn test_form_maps_onto_config() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FakeHandler::new(|_: &AIRulesHandlerConfig| Ok(()));
        let mut session = SessionState::new();

        run(&form(temp_dir.path()), &handler, &Runner::new(false), &mut session);

        let seen = handler.seen.lock().unwrap();
        let config = &seen[0];
        assert!(config.skip_existing_claude_md);
        assert!(!config.skip_existing_cursor_rules);
        assert_eq!(config.detail_level, DetailLevel::Comprehensive);
        assert_eq!(config.max_claude_lines, 800);
        assert_eq!(config.max_agents_lines, 120);
    }
}
