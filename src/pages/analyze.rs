//! Repository analysis page.

use super::{failure, Page, PageError, PageOutcome};
use crate::artifacts::{self, Artifact};
use crate::cli::AnalyzeForm;
use crate::handlers::Handler;
use crate::models::AnalyzeHandlerConfig;
use crate::runner::Runner;
use crate::session::SessionState;
use tracing::info;

const SPINNER: &str =
    "🔍 Analyzing repository... This may take several minutes with local Ollama models.";

impl From<&AnalyzeForm> for AnalyzeHandlerConfig {
    fn from(form: &AnalyzeForm) -> Self {
        Self {
            repo_path: form.repo.clone(),
            exclude_code_structure: form.exclude_code_structure,
            exclude_dependencies: form.exclude_dependencies,
            exclude_data_flow: form.exclude_data_flow,
            exclude_request_flow: form.exclude_request_flow,
            exclude_api_analysis: form.exclude_api_analysis,
            max_workers: form.max_workers,
        }
    }
}

/// Run the analysis and list the documents under `.ai/docs`.
pub fn run<H>(
    form: &AnalyzeForm,
    handler: &H,
    runner: &Runner,
    session: &mut SessionState,
) -> PageOutcome
where
    H: Handler<Config = AnalyzeHandlerConfig>,
{
    if !form.repo.exists() {
        return PageOutcome::failed(Page::Analysis, PageError::PathNotFound(form.repo.clone()));
    }

    session.begin_analysis();

    let config = AnalyzeHandlerConfig::from(form);
    let result = runner
        .run_once(SPINNER, handler.handle(&config))
        .and_then(|()| artifacts::collect_analysis_docs(&config.repo_path));

    match result {
        Ok(docs) => {
            info!("Analysis produced {} documents", docs.len());
            session.finish_analysis(Some(docs.iter().map(|d| d.path.clone()).collect()));
            PageOutcome::success(
                Page::Analysis,
                "Analysis completed successfully!",
                docs.into_iter().map(Artifact::File).collect(),
            )
        }
        Err(e) => {
            session.finish_analysis(None);
            failure(Page::Analysis, "Analysis", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputOptions;
    use crate::pages::testing::FakeHandler;
    use crate::pages::Status;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn form(repo: &Path) -> AnalyzeForm {
        AnalyzeForm {
            repo: repo.to_path_buf(),
            max_workers: 4,
            exclude_code_structure: false,
            exclude_dependencies: true,
            exclude_data_flow: false,
            exclude_request_flow: false,
            exclude_api_analysis: true,
            output: OutputOptions::default(),
        }
    }

    fn writes_docs(names: &'static [&'static str]) -> FakeHandler<AnalyzeHandlerConfig> {
        FakeHandler::new(move |config: &AnalyzeHandlerConfig| {
            let docs = artifacts::docs_dir(&config.repo_path);
            fs::create_dir_all(&docs)?;
            for name in names {
                fs::write(docs.join(name), format!("# {}\n", name))?;
            }
            Ok(())
        })
    }

    #[test]
    fn test_missing_path_skips_handler() {
        let handler = writes_docs(&["a.md"]);
        let mut session = SessionState::new();

        let outcome = run(
            &form(Path::new("/definitely/not/here")),
            &handler,
            &Runner::new(false),
            &mut session,
        );

        assert_eq!(handler.calls(), 0);
        match outcome.status {
            Status::Failed(PageError::PathNotFound(path)) => {
                assert_eq!(path, PathBuf::from("/definitely/not/here"))
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(session, SessionState::new());
    }

    #[test]
    fn test_success_lists_markdown_in_docs_dir() {
        let temp_dir = TempDir::new().unwrap();
        let handler = writes_docs(&["structure_analysis.md", "api_analysis.md", "notes.txt"]);
        let mut session = SessionState::new();

        let outcome = run(&form(temp_dir.path()), &handler, &Runner::new(false), &mut session);

        assert!(matches!(outcome.status, Status::Success(_)));
        let labels: Vec<_> = outcome.artifacts.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["api_analysis.md", "structure_analysis.md"]);

        assert!(!session.analysis_running);
        assert!(session.analysis_complete);
        assert_eq!(session.generated_files.len(), 2);
        assert!(session.generated_files[0].ends_with(".ai/docs/api_analysis.md"));
    }

    #[test]
    fn test_success_without_docs_dir_shows_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FakeHandler::new(|_: &AnalyzeHandlerConfig| Ok(()));
        let mut session = SessionState::new();

        let outcome = run(&form(temp_dir.path()), &handler, &Runner::new(false), &mut session);

        assert!(matches!(outcome.status, Status::Success(_)));
        assert!(outcome.artifacts.is_empty());
        assert!(session.analysis_complete);
    }

    #[test]
    fn test_handler_error_is_contained() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FakeHandler::new(|_: &AnalyzeHandlerConfig| {
            Err(anyhow::anyhow!("Cannot connect to LLM"))
        });
        let mut session = SessionState::new();

        let outcome = run(&form(temp_dir.path()), &handler, &Runner::new(false), &mut session);

        match &outcome.status {
            Status::Failed(e) => {
                assert_eq!(e.to_string(), "Analysis failed: Cannot connect to LLM")
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(!session.analysis_running);
        assert!(!session.analysis_complete);
    }

    #[test]
    fn test_config_is_pure_function_of_form() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FakeHandler::new(|_: &AnalyzeHandlerConfig| Ok(()));
        let mut session = SessionState::new();
        let submitted = form(temp_dir.path());

        run(&submitted, &handler, &Runner::new(false), &mut session);
        run(&submitted, &handler, &Runner::new(false), &mut session);

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[0].max_workers, 4);
        assert!(seen[0].exclude_dependencies);
        assert!(seen[0].exclude_api_analysis);
        assert!(!seen[0].exclude_data_flow);
    }
}
