//! Terminal output for commands.
//!
//! Commands write through [`Output`] so tests can capture what would have
//! been printed.

use console::{Style, Term};
use serde::Serialize;
use std::io::Write;

use crate::checks::CheckStatus;
use crate::error::Result;

/// Color palette used for command output.
#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub header: Style,
    pub dim: Style,
    pub key: Style,
}

impl Theme {
    /// Styled theme. `color` forces styling on or off regardless of TTY.
    pub fn new(color: bool) -> Self {
        let style = |s: Style| s.force_styling(color);
        Self {
            success: style(Style::new().green()),
            warning: style(Style::new().color256(208)),
            error: style(Style::new().red().bold()),
            header: style(Style::new().bold().magenta()),
            dim: style(Style::new().dim()),
            key: style(Style::new().bold()),
        }
    }

    /// The style for an outcome status.
    pub fn status(&self, status: CheckStatus) -> &Style {
        match status {
            CheckStatus::Passed => &self.success,
            CheckStatus::Failed | CheckStatus::Error => &self.error,
            CheckStatus::Warning => &self.warning,
            CheckStatus::Skipped => &self.dim,
        }
    }
}

enum Sink {
    Term(Term),
    Buffer(Vec<u8>),
}

/// Where command output goes.
pub struct Output {
    sink: Sink,
    theme: Theme,
}

impl Output {
    /// Write to stdout, colored when stdout is a terminal and `NO_COLOR`
    /// is unset.
    pub fn stdout() -> Self {
        let term = Term::stdout();
        let color = std::env::var_os("NO_COLOR").is_none() && term.is_term();
        Self {
            sink: Sink::Term(term),
            theme: Theme::new(color),
        }
    }

    /// Capture uncolored output in memory.
    pub fn buffer() -> Self {
        Self {
            sink: Sink::Buffer(Vec::new()),
            theme: Theme::new(false),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Captured text; empty when writing to a terminal.
    pub fn contents(&self) -> String {
        match &self.sink {
            Sink::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
            Sink::Term(_) => String::new(),
        }
    }

    /// Write one line.
    pub fn line(&mut self, msg: &str) {
        match &mut self.sink {
            Sink::Term(term) => {
                let _ = term.write_line(msg);
            }
            Sink::Buffer(buf) => {
                let _ = writeln!(buf, "{}", msg);
            }
        }
    }

    pub fn header(&mut self, title: &str) {
        let styled = self.theme.header.apply_to(title).to_string();
        self.line(&styled);
    }

    pub fn success(&mut self, msg: &str) {
        let styled = self.theme.success.apply_to(format!("✓ {}", msg)).to_string();
        self.line(&styled);
    }

    pub fn warning(&mut self, msg: &str) {
        let styled = self.theme.warning.apply_to(format!("⚠ {}", msg)).to_string();
        self.line(&styled);
    }

    pub fn error(&mut self, msg: &str) {
        let styled = self.theme.error.apply_to(format!("✗ {}", msg)).to_string();
        self.line(&styled);
    }

    /// A bold key followed by its value.
    pub fn field(&mut self, key: &str, value: &str) {
        let styled = format!("{} {}", self.theme.key.apply_to(format!("{}:", key)), value);
        self.line(&styled);
    }

    /// Pretty-printed JSON.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
        self.line(&text);
        Ok(())
    }
}
