//! Colored terminal output utilities.

use console::{Style, Term};
use quire_content::Diagnostic;
use serde::Serialize;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    /// Create an output formatter writing to stderr.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::with_term(Term::stderr())
    }

    /// Create an output formatter writing to stdout, for command results
    /// meant to be piped.
    #[must_use]
    pub(crate) fn stdout() -> Self {
        Self::with_term(Term::stdout())
    }

    fn with_term(term: Term) -> Self {
        Self {
            term,
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a validation diagnostic: red location, dimmed rule id, message.
    pub(crate) fn diagnostic(&self, diagnostic: &Diagnostic) {
        let _ = self.term.write_line(&format!(
            "{} {} {}",
            self.red.apply_to(diagnostic.location()),
            self.dim.apply_to(format!("[{}]", diagnostic.rule)),
            diagnostic.message
        ));
    }

    /// Print `value` as pretty JSON. Never styled.
    pub(crate) fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), serde_json::Error> {
        let text = serde_json::to_string_pretty(value)?;
        let _ = self.term.write_line(&text);
        Ok(())
    }
}
