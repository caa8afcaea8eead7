//! Diagnostic formatting for better error messages
//!
//! Errors only know a character offset; this module turns it into a
//! line/column pair and prints the surrounding source.

use super::PlcError;
use colored::Colorize;

/// A 1-based line and column resolved from a character offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    /// Resolve a character offset against `source`. Offsets past the end map
    /// to the position just after the last character.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        let mut chars = source.chars().peekable();

        for _ in 0..offset {
            let Some(c) = chars.next() else { break };
            // `\r\n` breaks once, on the `\n`
            let breaks = c == '\n' || (c == '\r' && chars.peek() != Some(&'\n'));
            if breaks {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self { line, column }
    }
}

/// Split on `\n`, `\r\n` or a lone `\r`, matching `LineColumn::locate`
fn source_lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => {
                lines.push(&source[start..i]);
                start = i + 1;
            }
            '\r' if chars.peek().map(|&(_, next)| next) == Some('\n') => {
                lines.push(&source[start..i]);
                chars.next();
                start = i + 2;
            }
            '\r' => {
                lines.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < source.len() {
        lines.push(&source[start..]);
    }

    lines
}

/// Diagnostic information for displaying errors with context
pub struct Diagnostic {
    error: PlcError,
    source: Option<String>,
    filename: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: PlcError) -> Self {
        Self {
            error,
            source: None,
            filename: None,
        }
    }

    /// Create a diagnostic with source code context
    pub fn with_source(error: PlcError, source: &str) -> Self {
        Self {
            error,
            source: Some(source.to_string()),
            filename: None,
        }
    }

    /// Attach the file name shown in the `-->` line
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        let kind = self.error.kind().red().bold();
        output.push_str(&format!("{}: ", kind));
        output.push_str(self.error.message());
        output.push('\n');

        if let Some(offset) = self.error.offset() {
            match &self.source {
                Some(source) => {
                    let position = LineColumn::locate(source, offset);
                    let file = self.filename.as_deref().unwrap_or("<input>");
                    output.push_str(&format!(
                        "  {} {}:{}:{}\n",
                        "-->".blue().bold(),
                        file,
                        position.line,
                        position.column
                    ));
                    output.push_str(&self.format_source_context(source, position));
                }
                None => {
                    output.push_str(&format!("  {} offset {}\n", "-->".blue().bold(), offset));
                }
            }
        }

        output
    }

    /// Format source code context around the error location
    fn format_source_context(&self, source: &str, position: LineColumn) -> String {
        let mut output = String::new();
        let lines = source_lines(source);

        if position.line == 0 || position.line > lines.len() {
            return output;
        }

        let line_idx = position.line - 1;
        let line_num_width = position.line.to_string().len();

        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", position.line, width = line_num_width)
                .blue()
                .bold(),
            lines[line_idx]
        ));

        let indicator_padding = " ".repeat(line_num_width + 2 + position.column);
        output.push_str(&format!("{}{}\n", indicator_padding, "^".red().bold()));

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
