//! Dashboard pages.
//!
//! A page controller validates its form, builds a handler configuration,
//! runs the handler once through the [`Runner`] and reads back what the
//! handler wrote. Errors never leave a controller; they become a
//! [`PageError`] inside the returned [`PageOutcome`].

pub mod about;
pub mod ai_rules;
pub mod analyze;
pub mod readme;

use crate::artifacts::Artifact;
use crate::cli::{AiRulesForm, AnalyzeForm, ReadmeForm};
use crate::config::Config;
use crate::handlers::Handler;
use crate::models::{AIRulesHandlerConfig, AnalyzeHandlerConfig, ReadmeHandlerConfig};
use crate::runner::Runner;
use crate::session::SessionState;
use std::path::PathBuf;
use thiserror::Error;

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Analysis,
    Readme,
    AiRules,
    About,
}

impl Page {
    pub fn heading(&self) -> &'static str {
        match self {
            Page::Analysis => "📊 Repository Analysis",
            Page::Readme => "📖 README Generator",
            Page::AiRules => "🤖 AI Rules Generator",
            Page::About => "ℹ️ About AI Doc Gen",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Page::Analysis => "Analyze your codebase structure, dependencies, data flow, and APIs",
            Page::Readme => "Generate comprehensive README.md from your analysis",
            Page::AiRules => "Generate CLAUDE.md, AGENTS.md, and Cursor rules for AI assistants",
            Page::About => "",
        }
    }

    /// Heading above the list of generated files.
    pub fn results_heading(&self) -> &'static str {
        match self {
            Page::Analysis => "📄 Generated Analysis Files",
            Page::Readme => "📄 Generated README.md",
            Page::AiRules => "📄 Generated Files",
            Page::About => "",
        }
    }
}

/// A submitted page: the selected page plus its form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Analysis(AnalyzeForm),
    Readme(ReadmeForm),
    AiRules(AiRulesForm),
    About,
}

impl Request {
    pub fn page(&self) -> Page {
        match self {
            Request::Analysis(_) => Page::Analysis,
            Request::Readme(_) => Page::Readme,
            Request::AiRules(_) => Page::AiRules,
            Request::About => Page::About,
        }
    }
}

/// Why a page could not show results.
#[derive(Debug, Error)]
pub enum PageError {
    /// Checked before any handler runs.
    #[error("Repository path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("{action} failed: {error:#}")]
    Failed {
        action: &'static str,
        error: anyhow::Error,
    },
}

#[derive(Debug)]
pub enum Status {
    Success(&'static str),
    Failed(PageError),
    /// Informational page without a handler call.
    Info(String),
}

/// Everything a page has to show after one submission.
#[derive(Debug)]
pub struct PageOutcome {
    pub page: Page,
    pub status: Status,
    pub artifacts: Vec<Artifact>,
}

impl PageOutcome {
    pub fn success(page: Page, message: &'static str, artifacts: Vec<Artifact>) -> Self {
        Self {
            page,
            status: Status::Success(message),
            artifacts,
        }
    }

    pub fn failed(page: Page, error: PageError) -> Self {
        Self {
            page,
            status: Status::Failed(error),
            artifacts: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, Status::Failed(_))
    }
}

/// The three handlers the pages call.
pub struct Handlers<A, R, G> {
    pub analyze: A,
    pub readme: R,
    pub ai_rules: G,
}

/// Run a handler once while the session reports it as running.
fn invoke<H: Handler>(
    handler: &H,
    config: &H::Config,
    runner: &Runner,
    spinner: &str,
    session: &mut SessionState,
) -> anyhow::Result<()> {
    session.analysis_running = true;
    let result = runner.run_once(spinner, handler.handle(config));
    session.analysis_running = false;
    result
}

/// Turn a handler error into the page's failure, logging it on the way.
fn failure(page: Page, action: &'static str, error: anyhow::Error) -> PageOutcome {
    tracing::error!("{} error: {:#}", action, error);
    PageOutcome::failed(page, PageError::Failed { action, error })
}

/// Dispatch a request to its page controller.
pub fn route<A, R, G>(
    request: &Request,
    handlers: &Handlers<A, R, G>,
    runner: &Runner,
    config: &Config,
    session: &mut SessionState,
) -> PageOutcome
where
    A: Handler<Config = AnalyzeHandlerConfig>,
    R: Handler<Config = ReadmeHandlerConfig>,
    G: Handler<Config = AIRulesHandlerConfig>,
{
    match request {
        Request::Analysis(form) => analyze::run(form, &handlers.analyze, runner, session),
        Request::Readme(form) => readme::run(form, &handlers.readme, runner, session),
        Request::AiRules(form) => ai_rules::run(form, &handlers.ai_rules, runner, session),
        Request::About => about::run(config),
    }
}
