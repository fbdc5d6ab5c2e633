use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

/// Reserved words of the dialect, upper-cased. Matching is case-insensitive;
/// a reserved word followed by an identifier continuation lexes as an
/// identifier instead.
pub const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "AS", "INNER", "CROSS", "JOIN", "ON",
];

#[derive(Clone, PartialEq, Serialize, Deserialize, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: std::ops::Range<usize>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    Ident(String),
    /// A reserved word, normalized to upper-case.
    Keyword(String),
    Literal(Literal),

    /// single-char control tokens: `*` `,` `.` `(` `)` `;`
    Control(char),

    Eq,  // =
    Ne,  // != or <>
    Lt,  // <
    Lte, // <=
    Gt,  // >
    Gte, // >=
}

#[derive(Debug, EnumAsInner, PartialEq, Clone, Serialize, Deserialize)]
pub enum Literal {
    /// `\d+(\.\d+)?`, held as the host float type.
    Number(f64),
    /// Contents between the quotes; the quote characters are already stripped.
    String(String),
}

// This is here because Literal::Number(f64) does not implement Hash, so we
// cannot simply derive it. There are reasons for that, but chumsky::Error
// needs Hash for the TokenKind, so it can deduplicate tokens in error.
// So this hack could lead to duplicated tokens in error messages. Oh no.
#[allow(clippy::derived_hash_with_manual_eq)]
impl std::hash::Hash for TokenKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
    }
}

impl std::cmp::Eq for TokenKind {}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(s) => {
                if s.is_empty() {
                    // FYI this shows up in errors
                    write!(f, "an identifier")
                } else {
                    write!(f, "{s}")
                }
            }
            TokenKind::Keyword(s) => write!(f, "keyword {s}"),
            TokenKind::Literal(lit) => write!(f, "{lit}"),
            TokenKind::Control(c) => write!(f, "{c}"),

            TokenKind::Eq => f.write_str("="),
            TokenKind::Ne => f.write_str("!="),
            TokenKind::Lt => f.write_str("<"),
            TokenKind::Lte => f.write_str("<="),
            TokenKind::Gt => f.write_str(">"),
            TokenKind::Gte => f.write_str(">="),
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}..{}: {:?}", self.span.start, self.span.end, self.kind)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens(pub Vec<Token>);

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Tokens (")?;
        for token in self.0.iter() {
            writeln!(f, "  {token:?},")?;
        }
        write!(f, ")")
    }
}
