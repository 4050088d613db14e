//! # Output Configuration
//!
//! This module controls how reconciliation reports are printed: as one JSON
//! object per line, or as a short colored status line for people.
//!
//! ## Respecting User Preferences
//!
//! Colors and emojis follow the `--color` flag. In `auto` mode:
//! - `NO_COLOR` (any value, including empty) disables them,
//! - `CLICOLOR=0` disables them,
//! - `CLICOLOR_FORCE` (non-empty, not `0`) forces them on a non-TTY,
//! - `TERM=dumb` disables them,
//! - otherwise stdout decides.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cib_reconcile::output::{render, ColorChoice, OutputConfig, OutputFormat};
//!
//! let config = OutputConfig::from_env_and_flag(ColorChoice::Auto);
//! println!("{}", render(&report, OutputFormat::Text, &config)?);
//! ```

use crate::error::Result;
use crate::reconcile::Report;
use console::style;
use serde_json::Value;
use std::env;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    Always,
    Never,
    #[default]
    Auto,
}

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag against the environment.
    pub fn from_env_and_flag(color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => Self::detect_color_support(),
        };
        Self { use_color }
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

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag(ColorChoice::Auto)
    }
}

/// `emoji` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji
    } else {
        plain
    }
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per report
    #[default]
    Json,
    /// A status line per report
    Text,
}

/// Request fields that name the reconciled object, in lookup order.
const NAME_FIELDS: &[&str] = &["name", "resource", "resource1", "master", "params"];

fn object_name(report: &Report) -> String {
    let describe = |value: &Value| match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(map) => Some(map.keys().cloned().collect::<Vec<_>>().join(",")),
        _ => None,
    };
    NAME_FIELDS
        .iter()
        .filter_map(|field| report.echo.get(*field).and_then(describe))
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}

/// Render one report.
pub fn render(report: &Report, format: OutputFormat, config: &OutputConfig) -> Result<String> {
    if format == OutputFormat::Json {
        return report.to_json();
    }

    let name = object_name(report);
    let line = if let Some(message) = report.message() {
        format!(
            "{} {} {} {}: {}",
            emoji(config, "\u{274c}", "[ERR]"),
            style("failed").red().bold().force_styling(config.use_color),
            report.kind,
            name,
            message
        )
    } else if report.changed {
        format!(
            "{} {} {} {}",
            emoji(config, "\u{270f}\u{fe0f}", "[CHG]"),
            style("changed").yellow().force_styling(config.use_color),
            report.kind,
            name
        )
    } else {
        format!(
            "{} {} {} {}",
            emoji(config, "\u{2705}", "[OK]"),
            style("ok").green().force_styling(config.use_color),
            report.kind,
            name
        )
    };
    Ok(line)
}
