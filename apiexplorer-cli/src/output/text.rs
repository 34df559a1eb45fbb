//! Text output formatting with colors.

use std::fmt::Write as _;
use std::path::Path;

use apiexplorer_core::{ApiResult, ConnectionConfig, ResourceDescriptor};
use apiexplorer_fetch::ProbeReport;
use chrono::Local;
use serde_json::Value;

use super::mask_token;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Width of the label column in the probe table.
const LABEL_WIDTH: usize = 28;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a classified client result on one line.
    pub fn format_result(&self, result: &ApiResult) -> String {
        match result {
            ApiResult::Success {
                status, message, ..
            } => format!("{} {message} {}", self.green("✓"), self.dim(&format!("({status})"))),
            ApiResult::Failure { kind, message, .. } => {
                format!("{} {message} {}", self.red("✗"), self.dim(&format!("[{}]", kind.label())))
            }
        }
    }

    /// Formats the connection config, with the token masked.
    pub fn format_config(&self, config: &ConnectionConfig, path: &Path) -> String {
        let or_unset = |value: &str| {
            if value.is_empty() {
                self.dim("(not set)")
            } else {
                value.to_string()
            }
        };

        let mut lines = vec![
            self.bold("ApiExplorer Configuration"),
            "─".repeat(40),
            format!("API URL:         {}", or_unset(&config.base_url)),
            format!("Token:           {}", or_unset(&mask_token(&config.token))),
            format!("Auth:            {}", config.effective_strategy()),
            format!("Status endpoint: {}", config.status_endpoint),
        ];
        if config.auth_strategy.is_some() {
            lines.push(self.dim("                 (overrides token format)"));
        }
        lines.push(format!("Resources:       {}", config.resources.join(", ")));
        lines.push(String::new());
        lines.push(self.dim(&format!("Config file: {}", path.display())));
        lines.join("\n")
    }

    /// Formats the auth probe results table.
    pub fn format_probe_report(&self, report: &ProbeReport) -> String {
        let mut lines = vec![
            self.bold(&format!(
                "{:<LABEL_WIDTH$} {:<8} {}",
                "Method", "Status", "Result"
            )),
            "─".repeat(LABEL_WIDTH + 24),
        ];

        for attempt in &report.attempts {
            let status = attempt
                .status
                .map_or_else(|| "error".to_string(), |s| s.to_string());
            let outcome = if attempt.success {
                self.green("success")
            } else {
                self.red("failed")
            };
            let mut line = format!(
                "{:<LABEL_WIDTH$} {status:<8} {outcome} {}",
                attempt.label,
                self.dim(&format!("{}ms", attempt.response_time_ms))
            );
            if let Some(error) = &attempt.error {
                let _ = write!(line, "\n  {}", self.dim(error));
            }
            lines.push(line);
        }

        lines.push(String::new());
        match report.first_success() {
            Some(attempt) => lines.push(format!(
                "{} Adopted: {} ({})",
                self.green("✓"),
                attempt.label,
                attempt.strategy
            )),
            None => lines.push(format!("{} No authentication method succeeded", self.red("✗"))),
        }
        lines.push(self.dim(&format!(
            "Probed at {}",
            report.probed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        )));
        lines.join("\n")
    }

    /// Formats one resource descriptor as a card.
    pub fn format_descriptor(&self, index: usize, resource: &ResourceDescriptor) -> String {
        let header = format!("{} {}", self.dim(&format!("[{index}]")), self.bold(&resource.name));
        let body = match &resource.data {
            Value::Object(fields) => fields
                .iter()
                .map(|(key, value)| format!("  {key}: {}", inline_value(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            other => format!("  {}", inline_value(other)),
        };
        format!("{header}\n{body}")
    }

    /// Formats a list of names.
    pub fn format_names(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| format!("  • {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    pub(crate) fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Renders a value on one line: strings unquoted, everything else as JSON.
fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "—".to_string(),
        other => other.to_string(),
    }
}
