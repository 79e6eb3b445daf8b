//! The report pipeline.
//!
//! [`Reporter`] wires the collaborators together: it builds the error
//! report form, shows it, and on submit uploads the session log and opens
//! the browser on a prefilled GitHub issue. One linear async pipeline per
//! invocation; concurrent invocations are independent by design.

use crate::browser::{BrowserError, BrowserOpener, SystemBrowser};
use crate::context::{ErrorLog, InstallerContext};
use crate::environment::{host_display_name, EnvironmentProbe, OsEnvironment};
use crate::form::{FormDescriptor, FormField, ReportData, ReportExtra};
use crate::issue::{IssueTemplate, UNKNOWN_ERROR};
use crate::logs::{LogError, LogFile, LogSource};
use crate::paste::{PasteClient, PasteError, Pastebin};
use crate::prompt::{PromptError, ReportPrompt, TerminalPrompt};
use crate::ReportConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of an installer run, as judged by the user or the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportResult {
    /// Everything worked; nothing to report.
    Pass,
    /// Finished, but something was off.
    Wonky,
    /// The installation failed.
    Fail,
}

impl std::fmt::Display for ReportResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReportResult::Pass => "PASS",
            ReportResult::Wonky => "WONKY",
            ReportResult::Fail => "FAIL",
        };
        f.write_str(label)
    }
}

/// Errors from the send pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Paste(#[from] PasteError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// How a call to [`Reporter::report`] ended.
///
/// Reporting never panics or bubbles an `Err` to the installer; failures
/// are folded into this value and logged as warnings.
#[derive(Debug)]
pub enum ReportOutcome {
    /// The run passed; no report was offered.
    Skipped,
    /// The user cancelled the form.
    Cancelled,
    /// The issue page was opened in the browser.
    Sent { issue_url: String },
    /// Some step of the send pipeline failed.
    Failed(ReportError),
}

/// Bug-report pipeline over pluggable collaborators.
///
/// Generic over its seams so tests (and embedders with their own UI) can
/// substitute any of them; [`DefaultReporter`] wires the shipped
/// implementations.
pub struct Reporter<E, L, S, P, B> {
    config: ReportConfig,
    context: InstallerContext,
    errors: ErrorLog,
    environment: E,
    logs: L,
    paste: S,
    prompt: P,
    browser: B,
}

/// Reporter wired with the shipped collaborators: `os_info` probe, log
/// file on disk, Stikked paste client, terminal prompt, system browser.
pub type DefaultReporter = Reporter<OsEnvironment, LogFile, Pastebin, TerminalPrompt, SystemBrowser>;

impl DefaultReporter {
    pub fn new(config: ReportConfig, context: InstallerContext) -> Self {
        let logs = LogFile::new(config.log_file.clone());
        let paste = Pastebin::new(config.paste_url.clone());
        Self::with_collaborators(
            config,
            context,
            OsEnvironment,
            logs,
            paste,
            TerminalPrompt,
            SystemBrowser,
        )
    }
}

impl<E, L, S, P, B> Reporter<E, L, S, P, B>
where
    E: EnvironmentProbe,
    L: LogSource,
    S: PasteClient,
    P: ReportPrompt,
    B: BrowserOpener,
{
    pub fn with_collaborators(
        config: ReportConfig,
        context: InstallerContext,
        environment: E,
        logs: L,
        paste: S,
        prompt: P,
        browser: B,
    ) -> Self {
        Self {
            config,
            context,
            errors: ErrorLog::new(),
            environment,
            logs,
            paste,
            prompt,
            browser,
        }
    }

    /// Shares a session error history with the installer. Errors recorded
    /// there appear in the "Previous errors" section of issue bodies.
    pub fn with_error_log(mut self, errors: ErrorLog) -> Self {
        self.errors = errors;
        self
    }

    /// One-line description of the host system.
    ///
    /// Probe failures degrade to the bare platform name; reporting never
    /// blocks on environment detection.
    pub async fn environment(&self) -> String {
        match self.environment.query().await {
            Ok(description) => description,
            Err(error) => {
                log::debug!("environment probe failed, using platform name: {error}");
                std::env::consts::OS.to_string()
            }
        }
    }

    /// The three fields common to every report form: device codename,
    /// package identifier and host OS.
    pub fn generic_form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::text("device", "Device codename")
                .with_placeholder("e.g. yggdrasil")
                .with_value(
                    self.context
                        .device
                        .as_ref()
                        .map(|device| device.codename.clone()),
                ),
            FormField::text("package", "Installation package")
                .with_value(Some(self.config.package.clone())),
            FormField::text("hostOs", "Host OS")
                .with_value(host_display_name(std::env::consts::OS).map(String::from)),
        ]
    }

    /// Builds the error-report form for a result and error.
    pub async fn prepare_error_report(
        &self,
        result: ReportResult,
        error: &str,
    ) -> FormDescriptor {
        let template = IssueTemplate::new(&self.config, &self.context);
        let mut fields = vec![
            FormField::text("title", "Issue title")
                .with_value(Some(template.title(Some(error))).filter(|title| !title.is_empty())),
            FormField::multiline("comment", "What happened?")
                .with_placeholder("Please describe what you were doing when the problem occurred"),
        ];
        fields.extend(self.generic_form_fields());
        fields.push(
            FormField::text("environment", "Environment")
                .with_value(Some(self.environment().await)),
        );

        FormDescriptor {
            title: "Report a bug".to_string(),
            description: format!(
                "The installation finished with result {result}. \
                 Help us fix this by sending an anonymous bug report."
            ),
            fields,
            confirm_label: "Send bug report".to_string(),
            extra: ReportExtra {
                result,
                error: Some(error.to_string()),
            },
        }
    }

    /// Uploads the session log and opens the browser on the prefilled
    /// issue page. Returns the issue URL.
    ///
    /// Log, paste and browser failures propagate; [`Self::report`] is the
    /// layer that absorbs them.
    pub async fn send_bug_report(&self, data: &ReportData) -> Result<String, ReportError> {
        let log = self.logs.current_log().await?;
        let paste_title = format!(
            "{} bug report {}",
            self.config.app_name,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        let log_url = self.paste.upload(&paste_title, &log).await?;

        let template = IssueTemplate::new(&self.config, &self.context);
        let title = template.title(data.get("title"));
        let body = template.issue_body(data, Some(&log_url), &self.errors.snapshot());
        let issue_url = template.issue_url(&title, &body);

        self.browser.open(&issue_url)?;
        Ok(issue_url)
    }

    /// Runs the full report pipeline for a finished installer run.
    ///
    /// `Pass` results short-circuit before any I/O. A cancelled prompt is
    /// a normal termination. Failures never propagate to the installer;
    /// they are logged as warnings and returned as [`ReportOutcome::Failed`].
    pub async fn report(&self, result: ReportResult, error: Option<&str>) -> ReportOutcome {
        if result == ReportResult::Pass {
            return ReportOutcome::Skipped;
        }

        let error = error.filter(|error| !error.is_empty()).unwrap_or(UNKNOWN_ERROR);
        let form = self.prepare_error_report(result, error).await;
        let data = match self.prompt.show(&form).await {
            Ok(Some(data)) => data,
            Ok(None) => return ReportOutcome::Cancelled,
            Err(error) => {
                log::warn!("bug report prompt failed: {error}");
                return ReportOutcome::Failed(error.into());
            }
        };

        match self.send_bug_report(&data).await {
            Ok(issue_url) => ReportOutcome::Sent { issue_url },
            Err(error) => {
                log::warn!("failed to send bug report: {error}");
                ReportOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FixedEnvironment;

    impl EnvironmentProbe for FixedEnvironment {
        async fn query(&self) -> Result<String, EnvironmentError> {
            Ok("Test OS 1.0 x86_64".to_string())
        }
    }

    struct FailingEnvironment;

    impl EnvironmentProbe for FailingEnvironment {
        async fn query(&self) -> Result<String, EnvironmentError> {
            Err(EnvironmentError::Lookup("no os here".to_string()))
        }
    }

    struct MockLog {
        calls: Arc<AtomicUsize>,
    }

    impl LogSource for MockLog {
        async fn current_log(&self) -> Result<String, LogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("info: flashing boot.img".to_string())
        }
    }

    struct MockPaste {
        calls: Arc<AtomicUsize>,
    }

    impl PasteClient for MockPaste {
        async fn upload(&self, _title: &str, _text: &str) -> Result<String, PasteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("https://paste.example/view/k3k".to_string())
        }
    }

    struct FailingPaste;

    impl PasteClient for FailingPaste {
        async fn upload(&self, _title: &str, _text: &str) -> Result<String, PasteError> {
            Err(PasteError::Rejected("service down".to_string()))
        }
    }

    /// Prompt double: submits every form with its pre-filled values plus
    /// a canned comment, or cancels.
    struct MockPrompt {
        calls: Arc<AtomicUsize>,
        submit: bool,
    }

    impl ReportPrompt for MockPrompt {
        async fn show(&self, form: &FormDescriptor) -> Result<Option<ReportData>, PromptError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.submit {
                return Ok(None);
            }
            let mut values: std::collections::BTreeMap<String, String> = form
                .fields
                .iter()
                .filter_map(|field| {
                    field
                        .value
                        .clone()
                        .map(|value| (field.name.clone(), value))
                })
                .collect();
            values.insert("comment".to_string(), "it broke".to_string());
            Ok(Some(ReportData {
                values,
                extra: form.extra.clone(),
            }))
        }
    }

    struct MockBrowser {
        calls: Arc<AtomicUsize>,
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl BrowserOpener for MockBrowser {
        fn open(&self, url: &str) -> Result<(), BrowserError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct Counters {
        prompt: Arc<AtomicUsize>,
        log: Arc<AtomicUsize>,
        paste: Arc<AtomicUsize>,
        browser: Arc<AtomicUsize>,
        urls: Arc<Mutex<Vec<String>>>,
    }

    fn reporter(
        submit: bool,
    ) -> (
        Reporter<FixedEnvironment, MockLog, MockPaste, MockPrompt, MockBrowser>,
        Counters,
    ) {
        let counters = Counters {
            prompt: Arc::new(AtomicUsize::new(0)),
            log: Arc::new(AtomicUsize::new(0)),
            paste: Arc::new(AtomicUsize::new(0)),
            browser: Arc::new(AtomicUsize::new(0)),
            urls: Arc::new(Mutex::new(Vec::new())),
        };
        let reporter = Reporter::with_collaborators(
            ReportConfig::default(),
            InstallerContext::default(),
            FixedEnvironment,
            MockLog {
                calls: counters.log.clone(),
            },
            MockPaste {
                calls: counters.paste.clone(),
            },
            MockPrompt {
                calls: counters.prompt.clone(),
                submit,
            },
            MockBrowser {
                calls: counters.browser.clone(),
                urls: counters.urls.clone(),
            },
        );
        (reporter, counters)
    }

    #[tokio::test]
    async fn pass_results_skip_reporting_entirely() {
        let (reporter, counters) = reporter(true);

        let outcome = reporter.report(ReportResult::Pass, Some("boom")).await;

        assert!(matches!(outcome, ReportOutcome::Skipped));
        assert_eq!(counters.prompt.load(Ordering::SeqCst), 0);
        assert_eq!(counters.browser.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_prompt_sends_nothing() {
        let (reporter, counters) = reporter(false);

        let outcome = reporter.report(ReportResult::Fail, Some("boom")).await;

        assert!(matches!(outcome, ReportOutcome::Cancelled));
        assert_eq!(counters.prompt.load(Ordering::SeqCst), 1);
        assert_eq!(counters.log.load(Ordering::SeqCst), 0);
        assert_eq!(counters.paste.load(Ordering::SeqCst), 0);
        assert_eq!(counters.browser.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submitted_report_uploads_once_and_opens_the_issue_page() {
        let (reporter, counters) = reporter(true);

        let outcome = reporter.report(ReportResult::Fail, Some("boom")).await;

        let ReportOutcome::Sent { issue_url } = outcome else {
            panic!("expected Sent, got {outcome:?}");
        };
        assert_eq!(counters.log.load(Ordering::SeqCst), 1);
        assert_eq!(counters.paste.load(Ordering::SeqCst), 1);
        assert_eq!(counters.browser.load(Ordering::SeqCst), 1);

        let opened = counters.urls.lock().unwrap();
        assert_eq!(opened.as_slice(), [issue_url.clone()]);
        assert!(issue_url.starts_with(
            "https://github.com/ubports/ubports-installer/issues/new?title=boom&body="
        ));
        assert!(issue_url.contains("Test%20OS%201.0%20x86_64"));
        assert!(issue_url.contains(&crate::issue::encode(
            "Log: https://paste.example/view/k3k"
        )));
    }

    #[tokio::test]
    async fn send_failure_is_absorbed_as_an_outcome() {
        let prompt_calls = Arc::new(AtomicUsize::new(0));
        let browser_calls = Arc::new(AtomicUsize::new(0));
        let reporter = Reporter::with_collaborators(
            ReportConfig::default(),
            InstallerContext::default(),
            FixedEnvironment,
            MockLog {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            FailingPaste,
            MockPrompt {
                calls: prompt_calls,
                submit: true,
            },
            MockBrowser {
                calls: browser_calls.clone(),
                urls: Arc::new(Mutex::new(Vec::new())),
            },
        );

        let outcome = reporter.report(ReportResult::Fail, Some("boom")).await;

        assert!(matches!(
            outcome,
            ReportOutcome::Failed(ReportError::Paste(_))
        ));
        assert_eq!(browser_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generic_form_fields_are_three_required_fields() {
        let (reporter, _) = reporter(true);

        let fields = reporter.generic_form_fields();

        assert_eq!(fields.len(), 3);
        assert!(fields.iter().all(|field| field.required));
        let host_os = fields.iter().find(|field| field.name == "hostOs").unwrap();
        assert_eq!(
            host_os.value.as_deref(),
            host_display_name(std::env::consts::OS)
        );
    }

    #[tokio::test]
    async fn prepare_error_report_prefills_title_and_environment() {
        let (reporter, _) = reporter(true);

        let form = reporter.prepare_error_report(ReportResult::Wonky, "boom").await;

        assert!(form.description.contains("WONKY"));
        let title = form.fields.iter().find(|field| field.name == "title").unwrap();
        assert_eq!(title.value.as_deref(), Some("boom"));
        let environment = form
            .fields
            .iter()
            .find(|field| field.name == "environment")
            .unwrap();
        assert_eq!(environment.value.as_deref(), Some("Test OS 1.0 x86_64"));
        assert_eq!(form.extra.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn missing_error_defaults_to_the_unknown_sentinel() {
        let (reporter, _) = reporter(false);

        reporter.report(ReportResult::Fail, None).await;

        // MockPrompt(cancel) saw the form; a missing error never reaches
        // the body, but the extra still carries the sentinel.
        let form = reporter.prepare_error_report(ReportResult::Fail, UNKNOWN_ERROR).await;
        assert_eq!(form.extra.error.as_deref(), Some(UNKNOWN_ERROR));
        let title = form.fields.iter().find(|field| field.name == "title").unwrap();
        assert_eq!(title.value.as_deref(), Some(UNKNOWN_ERROR));
    }

    #[tokio::test]
    async fn environment_degrades_to_platform_name_on_probe_failure() {
        let reporter = Reporter::with_collaborators(
            ReportConfig::default(),
            InstallerContext::default(),
            FailingEnvironment,
            MockLog {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            MockPaste {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            MockPrompt {
                calls: Arc::new(AtomicUsize::new(0)),
                submit: false,
            },
            MockBrowser {
                calls: Arc::new(AtomicUsize::new(0)),
                urls: Arc::new(Mutex::new(Vec::new())),
            },
        );

        assert_eq!(reporter.environment().await, std::env::consts::OS);
    }

    #[tokio::test]
    async fn previous_errors_from_the_shared_log_reach_the_body() {
        let errors = ErrorLog::new();
        errors.record("adb device lost");
        let (reporter, counters) = reporter(true);
        let reporter = reporter.with_error_log(errors);

        reporter.report(ReportResult::Fail, Some("boom")).await;

        let opened = counters.urls.lock().unwrap();
        assert!(opened[0].contains(&crate::issue::encode("Previous errors:")));
        assert!(opened[0].contains(&crate::issue::encode("adb device lost")));
    }

    #[test]
    fn result_displays_uppercase() {
        assert_eq!(ReportResult::Pass.to_string(), "PASS");
        assert_eq!(ReportResult::Wonky.to_string(), "WONKY");
        assert_eq!(ReportResult::Fail.to_string(), "FAIL");
    }
}
