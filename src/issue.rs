//! GitHub issue templating.
//!
//! Pure string assembly: device link markdown, title scrubbing, the
//! debug-info issue body and the final "new issue" URL. Everything here
//! is deterministic over the config, context and submitted form data;
//! all I/O lives in the collaborators.

use crate::context::InstallerContext;
use crate::form::ReportData;
use crate::ReportConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Percent-encode set matching JS `encodeURIComponent`: unreserved
/// characters and `!*'()` stay literal, spaces become `%20`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Sentinel error value that carries no information and is dropped from
/// issue bodies.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Placeholder used on the `Log:` line when no paste URL is available.
const MISSING_LOG: &str =
    "*log missing — please attach your log file manually (see the cache directory)*";

/// Trailer appended to every issue body; HTML comments are invisible on
/// GitHub.
const TRAILER: &str = "<!-- Thank you for your report! -->";

/// Percent-encodes a string as a URL query component.
pub fn encode(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Renders issue titles, bodies and URLs for one report invocation.
pub struct IssueTemplate<'a> {
    config: &'a ReportConfig,
    context: &'a InstallerContext,
}

impl<'a> IssueTemplate<'a> {
    pub fn new(config: &'a ReportConfig, context: &'a InstallerContext) -> Self {
        Self { config, context }
    }

    /// Markdown description of the device being reported about.
    ///
    /// With a canonical device config this links to the registry's config
    /// file (pinned to its commit when known) and, when the OS being
    /// installed is covered by the device lookup site, to the device's
    /// page there. Without one it degrades to the fallback codename, or
    /// to a fixed marker when the report concerns no device at all.
    pub fn device_link(&self, codename_fallback: Option<&str>) -> String {
        let mut link = match &self.context.device {
            Some(device) => {
                let blob = device.sha.as_deref().unwrap_or("master");
                let mut link = format!(
                    "[`{codename}`](https://github.com/{registry}/blob/{blob}/v2/devices/{codename}.yml) ({name})",
                    codename = device.codename,
                    registry = self.config.registry_repo,
                    name = device.name,
                );
                if self.context.target_os.as_deref() == Some(self.config.lookup_os_name.as_str()) {
                    link.push_str(&format!(
                        " ([device page]({base}/{codename}))",
                        base = self.config.device_lookup_url,
                        codename = device.codename,
                    ));
                }
                link
            }
            None => match codename_fallback.filter(|codename| !codename.is_empty()) {
                Some(codename) => format!("`{codename}`"),
                None => "(not device dependent)".to_string(),
            },
        };
        if self.context.local_config {
            link.push_str(" (local config file)");
        }
        link
    }

    /// Issue title for an error, with the local cache directory scrubbed.
    ///
    /// Every literal occurrence of the cache directory's absolute path is
    /// replaced with `$CACHE`. Best-effort privacy, not a security
    /// boundary.
    pub fn title(&self, error: Option<&str>) -> String {
        match error {
            Some(error) if !error.is_empty() => {
                error.replace(&*self.config.cache_dir.to_string_lossy(), "$CACHE")
            }
            _ => String::new(),
        }
    }

    /// Plain-text issue body, segments in fixed order, blanks dropped.
    pub fn issue_body(
        &self,
        data: &ReportData,
        log_url: Option<&str>,
        previous_errors: &[String],
    ) -> String {
        let package = data.get("package").unwrap_or(&self.config.package);
        let mut segments = vec![
            format!(
                "{} `{}` ({package})",
                self.config.app_name, self.config.app_version
            ),
            data.get("environment")
                .map(|environment| format!("Environment: `{environment}`"))
                .unwrap_or_default(),
            format!("Device: {}", self.device_link(data.get("device"))),
            self.context
                .target_os
                .as_deref()
                .map(|os| format!("OS to install: {os}"))
                .unwrap_or_default(),
            self.context
                .settings
                .as_ref()
                .map(|settings| format!("Settings: `{settings}`"))
                .unwrap_or_default(),
            format!("Log: {}", log_url.unwrap_or(MISSING_LOG)),
            data.get("comment").unwrap_or_default().to_string(),
        ];

        let error = data.extra.error.as_deref().unwrap_or_default();
        if !error.is_empty() && error != UNKNOWN_ERROR {
            segments.push(format!("Error:\n```\n{error}\n```"));
        }
        if !previous_errors.is_empty() {
            let blocks: Vec<String> = previous_errors
                .iter()
                .map(|error| format!("```\n{error}\n```"))
                .collect();
            segments.push(format!("Previous errors:\n{}", blocks.join("\n")));
        }
        segments.push(TRAILER.to_string());

        segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Percent-encoded issue body, ready for a URL query parameter.
    pub fn debug_info(
        &self,
        data: &ReportData,
        log_url: Option<&str>,
        previous_errors: &[String],
    ) -> String {
        encode(&self.issue_body(data, log_url, previous_errors))
    }

    /// The GitHub "new issue" URL for a title and plain body, each
    /// percent-encoded independently.
    pub fn issue_url(&self, title: &str, body: &str) -> String {
        format!(
            "https://github.com/{repo}/issues/new?title={title}&body={body}",
            repo = self.config.repo,
            title = encode(title),
            body = encode(body),
        )
    }
}
