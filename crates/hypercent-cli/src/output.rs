//! How `hcent` prints.
//!
//! Every command builds one serializable payload. In JSON mode the payload
//! itself is printed; otherwise its [`Render`] impl writes either a compact
//! line-per-record form (`text`, for pipes) or an aligned report (`pretty`,
//! for terminals).
//!
//! The mode is the first of: `--format` (or the hidden `--json`), the
//! `FORMAT` environment variable, then `pretty` when stdout is a terminal
//! and `text` when it is not. Unknown `FORMAT` values are ignored.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use hypercent_core::error::ErrorCode;
use serde::Serialize;

/// Width of the separator under pretty section headings.
pub const RULE_WIDTH: usize = 72;

/// Column the value starts at in [`field`] lines.
const KEY_WIDTH: usize = 15;

pub fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

/// Heading plus separator.
pub fn section(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{title}")?;
    rule(w)
}

/// One `key: value` line with the value column aligned.
pub fn field(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let key = format!("{key}:");
    writeln!(w, "{key:<KEY_WIDTH$} {}", value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Aligned sections for a terminal.
    Pretty,
    /// One record per line for scripts.
    Text,
    /// The payload as JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn pick(flag: Option<Self>, json: bool, env: Option<&str>, stdout_is_tty: bool) -> Self {
        flag.or_else(|| json.then_some(Self::Json))
            .or_else(|| env.and_then(Self::from_env_value))
            .unwrap_or(if stdout_is_tty { Self::Pretty } else { Self::Text })
    }

    /// Mode for this process from the global flags and the environment.
    pub fn resolve(flag: Option<Self>, json: bool) -> Self {
        let env = std::env::var("FORMAT").ok();
        Self::pick(flag, json, env.as_deref(), io::stdout().is_terminal())
    }
}

/// Human renderings of a command payload.
pub trait Render: Serialize {
    fn text(&self, w: &mut dyn Write) -> io::Result<()>;
    fn pretty(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// Print `payload` to stdout in `mode`.
pub fn emit<R: Render>(mode: OutputMode, payload: &R) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, payload)?;
            writeln!(out)?;
        }
        OutputMode::Text => payload.text(&mut out)?,
        OutputMode::Pretty => payload.pretty(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// A failure as shown to the user: message, optional `E####` code and hint.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl CliError {
    pub fn coded(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            code: Some(code.code()),
            hint: code.hint(),
        }
    }

    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Print to stderr: `{"error": ...}` in JSON mode, else
    /// `error[E####]: message` and an indented hint line.
    pub fn report(&self, mode: OutputMode) -> anyhow::Result<()> {
        let mut err = io::stderr().lock();
        if mode.is_json() {
            serde_json::to_writer_pretty(&mut err, &serde_json::json!({ "error": self }))?;
            writeln!(err)?;
            return Ok(());
        }
        self.write_human(&mut err)?;
        Ok(())
    }

    fn write_human(&self, w: &mut dyn Write) -> io::Result<()> {
        match self.code {
            Some(code) => writeln!(w, "error[{code}]: {}", self.message)?,
            None => writeln!(w, "error: {}", self.message)?,
        }
        if let Some(hint) = self.hint {
            writeln!(w, "  hint: {hint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_json_shorthand_and_env() {
        let mode = OutputMode::pick(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
        let mode = OutputMode::pick(None, true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_value_is_case_insensitive() {
        assert_eq!(OutputMode::pick(None, false, Some(" JSON "), true), OutputMode::Json);
        assert_eq!(OutputMode::pick(None, false, Some("Text"), true), OutputMode::Text);
    }

    #[test]
    fn terminal_decides_when_nothing_else_does() {
        assert_eq!(OutputMode::pick(None, false, Some("yaml"), true), OutputMode::Pretty);
        assert_eq!(OutputMode::pick(None, false, None, false), OutputMode::Text);
    }

    #[test]
    fn coded_error_shows_code_and_hint() {
        let err = CliError::coded("corum (graph): missing", ErrorCode::InputNotFound);
        let mut buf = Vec::new();
        err.write_human(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("error[E2001]: corum (graph): missing\n"));
        assert!(text.contains("  hint: "));
    }

    #[test]
    fn plain_error_serializes_without_code() {
        let err = CliError::plain("no datasets").with_hint("add one");
        let v = serde_json::to_value(&err).expect("json");
        assert_eq!(v["message"], "no datasets");
        assert_eq!(v["hint"], "add one");
        assert!(v.get("code").is_none());
    }

    #[test]
    fn fields_align_values() {
        let mut buf = Vec::new();
        section(&mut buf, "Dataset: toy").expect("write");
        field(&mut buf, "nodes", "12").expect("write");
        field(&mut buf, "representation", "graph").expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Dataset: toy");
        assert_eq!(lines[1].len(), RULE_WIDTH);
        assert_eq!(lines[2], "nodes:          12");
        assert_eq!(lines[3], "representation: graph");
    }
}
