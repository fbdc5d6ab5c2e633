//! Error values shared by every stage of the pipeline.
//!
//! Errors propagate as values only: the lexer and parser accumulate one list
//! per source, later stages return a single error at a time. No stage panics
//! on any legal input.

use crate::span::Span;

/// An error from one pipeline stage.
#[derive(Debug, Clone)]
pub struct Error {
    pub reason: Reason,
    pub span: Option<Span>,
    /// Stable machine-readable identifier: `E0001` lexer, `E0002` parser,
    /// `E0100` schema load, `E0201` translation.
    pub code: Option<&'static str>,
}

/// Every error a source produced, in source order.
#[derive(Debug, Clone)]
pub struct Errors(pub Vec<Error>);

#[derive(Debug, Clone)]
pub enum Reason {
    Simple(String),
    /// The parser needed one of `expected` but the stream held `found`.
    Expected {
        who: Option<String>,
        expected: String,
        found: String,
    },
    /// The lexer hit input no token can start with.
    Unexpected {
        found: String,
    },
}

impl Error {
    pub fn new(reason: Reason) -> Self {
        Error {
            reason,
            span: None,
            code: None,
        }
    }

    pub fn new_simple<S: ToString>(reason: S) -> Self {
        Error::new(Reason::Simple(reason.to_string()))
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Simple(text) => f.write_str(text),
            Reason::Expected {
                who,
                expected,
                found,
            } => {
                if let Some(who) = who {
                    write!(f, "{who} ")?;
                }
                write!(f, "expected {expected}, but found {found}")
            }
            Reason::Unexpected { found } => write!(f, "unexpected {found}"),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = self.code {
            write!(f, "[{code}] ")?;
        }
        write!(f, "{}", self.reason)
    }
}

impl std::fmt::Display for Errors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for error in &self.0 {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl std::error::Error for Errors {}

impl From<Error> for Errors {
    fn from(error: Error) -> Self {
        Errors(vec![error])
    }
}

impl From<Vec<Error>> for Errors {
    fn from(errors: Vec<Error>) -> Self {
        Errors(errors)
    }
}

/// Attach location and code to an error (or to the error of a `Result`)
/// while passing it along.
pub trait WithErrorInfo: Sized {
    fn with_span(self, span: Option<Span>) -> Self;
    fn with_code(self, code: &'static str) -> Self;
}

impl WithErrorInfo for Error {
    fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

impl<T, E: WithErrorInfo> WithErrorInfo for Result<T, E> {
    fn with_span(self, span: Option<Span>) -> Self {
        self.map_err(|e| e.with_span(span))
    }

    fn with_code(self, code: &'static str) -> Self {
        self.map_err(|e| e.with_code(code))
    }
}
