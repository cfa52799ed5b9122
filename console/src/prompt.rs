use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::warn;

/// Blocking operator dialogs.
pub trait Prompter {
    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;

    /// Reads one field; empty input keeps `current`.
    fn input(&mut self, label: &str, current: &str) -> String;
}

pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, question: &str) -> String {
        let mut line = String::new();
        let result = write!(self.writer, "{question}")
            .and_then(|_| self.writer.flush())
            .and_then(|_| self.reader.read_line(&mut line));

        if let Err(e) = result {
            warn!("Failed to read operator input: {e}");
            line.clear();
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.writer, "{}", message.red()) {
            warn!("Failed to show alert: {e}");
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let answer = self.ask(&format!("{} [y/N] ", message.yellow()));
        matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
    }

    fn input(&mut self, label: &str, current: &str) -> String {
        let question = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };

        let answer = self.ask(&question);
        if answer.trim().is_empty() {
            current.to_string()
        } else {
            answer
        }
    }
}
