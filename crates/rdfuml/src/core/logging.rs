//! Diagnostics output
//!
//! Every pipeline stage emits `tracing` spans (`load`, `context`, `extract`,
//! `draw`, `graphviz`, `convert`) and events carrying counts. Nothing is
//! printed until a subscriber is installed with [`init_logging`].
//!
//! ```rust
//! use rdfuml::core::logging::{init_logging, LogStyle};
//!
//! // a second installation in the same process is reported as an error
//! let _ = init_logging(Some("rdfuml=debug"), Some(LogStyle::Compact));
//! ```
//!
//! Settings not passed explicitly come from `RDFUML_LOG_LEVEL` and
//! `RDFUML_LOG_FORMAT`; a set `RUST_LOG` replaces the level filter. To see
//! the SPARQL each strategy runs:
//!
//! ```bash
//! RUST_LOG="rdfuml::plugins=trace" rdfuml --rdfs ontology.ttl
//! ```

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const LEVEL_VAR: &str = "RDFUML_LOG_LEVEL";
const STYLE_VAR: &str = "RDFUML_LOG_FORMAT";

/// Shape of the lines written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStyle {
    /// One line per event, no targets
    #[default]
    Compact,
    /// Multi-line, with file and line of each event plus span enter/exit
    Pretty,
    /// One JSON object per event, span timings on close
    Json,
}

impl LogStyle {
    pub fn names() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

impl FromStr for LogStyle {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogStyle::Compact),
            "pretty" => Ok(LogStyle::Pretty),
            "json" => Ok(LogStyle::Json),
            other => Err(anyhow!(
                "unknown log format '{}', expected one of {}",
                other,
                Self::names().join("|")
            )),
        }
    }
}

fn level_filter(level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = level
        .map(str::to_string)
        .or_else(|| env::var(LEVEL_VAR).ok())
        .unwrap_or_else(|| "warn".to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn log_style(style: Option<LogStyle>) -> Result<LogStyle> {
    match style {
        Some(style) => Ok(style),
        None => match env::var(STYLE_VAR) {
            Ok(name) => name.parse(),
            Err(_) => Ok(LogStyle::default()),
        },
    }
}

/// Install the global subscriber writing to stderr
///
/// `level` is any `EnvFilter` directive (`info`, `rdfuml::plugins=trace`,
/// `off`). Fails on an unknown `RDFUML_LOG_FORMAT` or when a subscriber is
/// already installed.
pub fn init_logging(level: Option<&str>, style: Option<LogStyle>) -> Result<()> {
    let filter = level_filter(level);
    let registry = Registry::default().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr);

    match log_style(style)? {
        LogStyle::Compact => registry
            .with(layer.compact().with_target(false))
            .try_init()?,
        LogStyle::Pretty => registry
            .with(
                layer
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::ACTIVE),
            )
            .try_init()?,
        LogStyle::Json => registry
            .with(layer.json().with_span_events(FmtSpan::CLOSE))
            .try_init()?,
    }
    Ok(())
}
