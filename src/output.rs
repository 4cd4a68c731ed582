//! # Output Formatting
//!
//! Renders the human-facing summary printed after a publish. Markers are
//! emoji when the terminal supports color and bracketed text otherwise, so
//! CI logs without color stay readable.
//!
//! Color is decided from the `--color` flag first, then from the
//! environment:
//! - `NO_COLOR` (any value) disables color
//! - `CLICOLOR=0` disables color, `CLICOLOR_FORCE=1` forces it
//! - `TERM=dumb` disables color
//! - otherwise the terminal's own capabilities decide

use std::env;

use crate::publish::reconcile::AttemptOutcome;
use crate::publish::PublishReport;

/// Output configuration for the CLI summary.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolves the `--color` flag value (`always`, `never`, `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => detect_color_support(),
        };
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Marker for a status line.
    pub fn marker(&self, status: Status) -> &'static str {
        match (self.use_color, status) {
            (true, Status::Success) => "✅",
            (true, Status::Failure) => "❌",
            (true, Status::Retry) => "🔁",
            (true, Status::Tag) => "🏷️",
            (false, Status::Success) => "[OK]",
            (false, Status::Failure) => "[FAIL]",
            (false, Status::Retry) => "[RETRY]",
            (false, Status::Tag) => "[TAG]",
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

fn detect_color_support() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}

/// Kinds of summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    Retry,
    Tag,
}

/// Summary lines for a finished publish.
pub fn summary(config: &OutputConfig, report: &PublishReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} Published {} to '{}' as {}",
        config.marker(Status::Success),
        report.source.short_sha,
        report.branch,
        report.commit
    )];

    for attempt in &report.attempts {
        if let AttemptOutcome::Rejected { .. } = attempt.outcome {
            lines.push(format!(
                "   {} attempt {} was rejected by a concurrent publish",
                config.marker(Status::Retry),
                attempt.number
            ));
        }
    }

    if let Some(tag) = &report.tag {
        lines.push(format!("   {} tagged {}", config.marker(Status::Tag), tag));
    }
    lines
}
