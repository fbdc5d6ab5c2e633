use std::fmt::{self, Debug, Formatter};
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A character range within the single source being compiled.
#[derive(Clone, PartialEq, Eq, Copy, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn merge_opt(a: Option<Span>, b: Option<Span>) -> Option<Span> {
        match (a, b) {
            (None, None) => None,
            (None, Some(s)) => Some(s),
            (Some(s), None) => Some(s),
            (Some(a), Some(b)) => Some(Span::merge(a, b)),
        }
    }

    pub fn merge(a: Span, b: Span) -> Span {
        Span {
            start: usize::min(a.start, b.start),
            end: usize::max(a.end, b.end),
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(a: Span) -> Self {
        a.start..a.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl chumsky::Span for Span {
    type Context = ();

    type Offset = usize;

    fn new(_context: Self::Context, range: Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }

    fn context(&self) -> Self::Context {}

    fn start(&self) -> Self::Offset {
        self.start
    }

    fn end(&self) -> Self::Offset {
        self.end
    }
}
