//! README generation page.

use super::{failure, invoke, Page, PageError, PageOutcome};
use crate::artifacts::{self, Artifact};
use crate::cli::ReadmeForm;
use crate::handlers::Handler;
use crate::models::ReadmeHandlerConfig;
use crate::runner::Runner;
use crate::session::SessionState;

const SPINNER: &str = "📝 Generating README... This may take a few minutes.";

impl From<&ReadmeForm> for ReadmeHandlerConfig {
    fn from(form: &ReadmeForm) -> Self {
        Self {
            repo_path: form.repo.clone(),
            use_existing_readme: form.use_existing_readme,
            exclude_project_overview: form.exclude_overview,
            exclude_table_of_contents: form.exclude_toc,
            exclude_architecture: form.exclude_architecture,
            exclude_c4_model: form.exclude_c4,
            exclude_repository_structure: form.exclude_structure,
            exclude_dependencies_and_integration: form.exclude_dependencies,
            exclude_api_documentation: form.exclude_api,
            exclude_development_notes: form.exclude_dev_notes,
            exclude_known_issues_and_limitations: form.exclude_issues,
            exclude_additional_documentation: false,
        }
    }
}

/// Generate the README and show it when the file exists afterwards.
pub fn run<H>(
    form: &ReadmeForm,
    handler: &H,
    runner: &Runner,
    session: &mut SessionState,
) -> PageOutcome
where
    H: Handler<Config = ReadmeHandlerConfig>,
{
    if !form.repo.exists() {
        return PageOutcome::failed(Page::Readme, PageError::PathNotFound(form.repo.clone()));
    }

    let config = ReadmeHandlerConfig::from(form);
    let result = invoke(handler, &config, runner, SPINNER, session)
        .and_then(|()| artifacts::collect_readme(&config.repo_path));

    match result {
        Ok(readme) => PageOutcome::success(
            Page::Readme,
            "README generated successfully!",
            readme.into_iter().map(Artifact::File).collect(),
        ),
        Err(e) => failure(Page::Readme, "README generation", e),
    }
}
