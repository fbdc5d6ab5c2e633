//! Display-ready error messages with line/column locations.

use std::fmt::{self, Debug, Display, Formatter};

use serde::Serialize;

use crate::{Error, Errors, Span};

#[derive(Clone, Serialize)]
pub struct ErrorMessage {
    /// Machine-readable identifier of the error
    pub code: Option<String>,
    /// Plain text of the error
    pub reason: String,
    /// Character offset of error origin within the source
    pub span: Option<Span>,
    /// Line and column number of error origin within the source
    pub location: Option<SourceLocation>,
}

/// Location within the source file.
/// Tuples contain:
/// - line number (0-based),
/// - column number within that line (0-based),
#[derive(Debug, Clone, Serialize)]
pub struct SourceLocation {
    pub start: (usize, usize),

    pub end: (usize, usize),
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let code = (self.code.as_ref())
            .map(|c| format!("[{c}] "))
            .unwrap_or_default();

        write!(f, "{}Error: {}", code, &self.reason)?;
        if let Some(location) = &self.location {
            write!(
                f,
                " (line {}, column {})",
                location.start.0 + 1,
                location.start.1 + 1
            )?;
        }
        writeln!(f)
    }
}

impl Debug for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self, f)
    }
}

impl From<Error> for ErrorMessage {
    fn from(e: Error) -> Self {
        log::debug!("{:#?}", e);
        ErrorMessage {
            code: e.code.map(str::to_string),
            reason: e.reason.to_string(),
            span: e.span,
            location: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessages {
    pub inner: Vec<ErrorMessage>,
}

impl std::error::Error for ErrorMessages {}

impl From<ErrorMessage> for ErrorMessages {
    fn from(e: ErrorMessage) -> Self {
        ErrorMessages { inner: vec![e] }
    }
}

impl From<Error> for ErrorMessages {
    fn from(e: Error) -> Self {
        ErrorMessages {
            inner: vec![ErrorMessage::from(e)],
        }
    }
}

impl From<Errors> for ErrorMessages {
    fn from(errs: Errors) -> Self {
        ErrorMessages {
            inner: errs.0.into_iter().map(ErrorMessage::from).collect(),
        }
    }
}

impl Display for ErrorMessages {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for e in &self.inner {
            Display::fmt(&e, f)?;
        }
        Ok(())
    }
}

impl ErrorMessages {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Computes the line/column location of each message from the source.
    pub fn composed(mut self, source: &str) -> Self {
        for e in &mut self.inner {
            let Some(span) = e.span else {
                continue;
            };
            e.location = compose_location(source, span);
        }
        self
    }
}

fn compose_location(source: &str, span: Span) -> Option<SourceLocation> {
    let mut line = 0;
    let mut column = 0;
    let mut start = None;
    let mut end = None;

    for (offset, ch) in source.chars().chain(['\n']).enumerate() {
        if offset == span.start {
            start = Some((line, column));
        }
        if offset == span.end {
            end = Some((line, column));
        }
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    // a span may legitimately point one past the end of the source
    let eof = (line, column);
    Some(SourceLocation {
        start: start.unwrap_or(eof),
        end: end.unwrap_or(eof),
    })
}
