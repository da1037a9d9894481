//! Semicolon-delimited statement splitting.
//!
//! Lines are trimmed and buffered until one ends with `;`. The buffered
//! fragments, minus that terminator, are joined with a single space and
//! emitted as one [`Statement`]. Whatever is still buffered at end of input
//! becomes the final statement.
//!
//! The splitter knows nothing about SQL syntax. A `;` that ends a line inside
//! a string literal or a comment still ends the statement, and a `;` in the
//! middle of a line never does.

use std::{fmt, io};

/// One SQL command, without its terminating `;`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement(String);

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Statement(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for statements made only of blank lines, such as a lone `;`.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Statement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement(sql.to_string())
    }
}

/// Lazy iterator of statements over a sequence of input lines.
///
/// A statement is yielded as soon as its terminating line has been read, so
/// callers can execute it before the rest of the input arrives. An I/O error
/// from the underlying lines is yielded once and ends the sequence.
pub struct StatementSplitter<L> {
    lines: L,
    buffer: Vec<String>,
    finished: bool,
}

impl<L> StatementSplitter<L> {
    pub fn new(lines: L) -> Self {
        StatementSplitter { lines, buffer: Vec::new(), finished: false }
    }
}

/// Drain the buffered fragments into one statement. Blank fragments add no separator.
fn take_statement(buffer: &mut Vec<String>) -> Statement {
    let sql = buffer
        .drain(..)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Statement(sql)
}

impl<L, S> Iterator for StatementSplitter<L>
where
    L: Iterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    type Item = io::Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Some(Err(e));
                }
            };

            let trimmed = line.as_ref().trim();
            match trimmed.strip_suffix(';') {
                Some(head) => {
                    self.buffer.push(head.trim_end().to_string());
                    return Some(Ok(take_statement(&mut self.buffer)));
                }
                None => self.buffer.push(trimmed.to_string()),
            }
        }

        self.finished = true;
        if self.buffer.is_empty() {
            None
        } else {
            Some(Ok(take_statement(&mut self.buffer)))
        }
    }
}

/// Split an in-memory script.
pub fn split_str(
    script: &str,
) -> StatementSplitter<impl Iterator<Item = io::Result<&str>> + '_> {
    StatementSplitter::new(script.lines().map(Ok))
}
