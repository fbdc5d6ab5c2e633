//! Context-aware completion over partial statements.
//!
//! Context is inferred two ways: by attempting to parse the prefix (to
//! recover the FROM relation and alias scope when possible) and by regex
//! checks for the clause the cursor sits in, which covers prefixes the parser
//! cannot accept yet.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use raqc_parser::lexer::lr::KEYWORDS;
use raqc_parser::parse_source;

use crate::pr;
use crate::schema::DatabaseSchema;
use crate::semantic::AliasScope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub label: String,
    pub insert_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Lexicographic sort key; context-appropriate items sort first.
    pub sort_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Keyword,
    Table,
    Column,
    Operator,
}

const OPERATORS: &[&str] = &["=", "!=", "<>", "<", "<=", ">", ">="];

/// Suggest completions for the end of a partial statement.
pub fn complete(text: &str, schema: &DatabaseSchema) -> Vec<Suggestion> {
    let mut builder = Builder {
        schema,
        scope: recover_scope(text, schema),
        word: current_word(text),
        suggestions: Vec::new(),
    };

    if let Some(qualifier) = qualifier_before_cursor(text) {
        builder.columns_of_qualifier(&qualifier, "0");
    } else if after_from_or_join(text) {
        builder.tables("0");
        builder.keywords("2");
    } else if after_condition_keyword(text) {
        builder.columns_in_scope("0");
        builder.operators("1");
        builder.keywords("2");
    } else if after_select(text) {
        builder.columns_in_scope("0");
        builder.keywords("2");
    } else {
        builder.keywords("0");
        builder.tables("1");
    }

    let mut suggestions = builder.suggestions;
    suggestions.sort_by(|a, b| a.sort_text.cmp(&b.sort_text));
    suggestions
}

struct Builder<'a> {
    schema: &'a DatabaseSchema,
    scope: AliasScope,
    word: String,
    suggestions: Vec<Suggestion>,
}

impl Builder<'_> {
    fn keywords(&mut self, priority: &str) {
        for keyword in KEYWORDS {
            if self.matches_word(keyword) {
                self.push(SuggestionKind::Keyword, keyword, None, priority);
            }
        }
    }

    fn operators(&mut self, priority: &str) {
        if !self.word.is_empty() {
            return;
        }
        for op in OPERATORS {
            self.push(SuggestionKind::Operator, op, None, priority);
        }
    }

    fn tables(&mut self, priority: &str) {
        let names: Vec<String> = self.schema.tables.keys().cloned().collect();
        for name in names {
            if self.matches_word(&name) {
                self.push(SuggestionKind::Table, &name, Some("table".to_string()), priority);
            }
        }
    }

    fn columns_in_scope(&mut self, priority: &str) {
        let entries: Vec<(String, String)> = if self.scope.is_empty() {
            // no FROM clause recovered yet; fall back to the whole schema
            self.schema
                .tables
                .keys()
                .map(|t| (t.clone(), t.clone()))
                .collect()
        } else {
            self.scope
                .entries()
                .iter()
                .map(|e| (e.alias.clone(), e.table.clone()))
                .collect()
        };

        for (_, table) in entries {
            self.columns_of_table(&table, priority);
        }
    }

    fn columns_of_qualifier(&mut self, qualifier: &str, priority: &str) {
        let table = match self.scope.lookup(qualifier) {
            Some(table) => table.to_string(),
            // an unknown qualifier may still be a table name typed directly
            None => qualifier.to_string(),
        };
        self.columns_of_table(&table, priority);
    }

    fn columns_of_table(&mut self, table: &str, priority: &str) {
        let Some((canonical, table_schema)) = self.schema.table(table) else {
            return;
        };
        let canonical = canonical.to_string();
        let columns: Vec<(String, String)> = table_schema
            .columns
            .iter()
            .map(|(name, definition)| {
                (name.clone(), format!("{canonical}.{name} {}", definition.ty))
            })
            .collect();

        for (name, detail) in columns {
            if self.matches_word(&name) {
                self.push(SuggestionKind::Column, &name, Some(detail), priority);
            }
        }
    }

    fn matches_word(&self, candidate: &str) -> bool {
        self.word.is_empty()
            || candidate
                .to_ascii_lowercase()
                .starts_with(&self.word.to_ascii_lowercase())
    }

    fn push(&mut self, kind: SuggestionKind, label: &str, detail: Option<String>, priority: &str) {
        if self
            .suggestions
            .iter()
            .any(|s| s.kind == kind && s.label == label)
        {
            return;
        }
        self.suggestions.push(Suggestion {
            kind,
            label: label.to_string(),
            insert_text: label.to_string(),
            detail,
            sort_text: format!("{priority}_{}", label.to_ascii_lowercase()),
        });
    }
}

/// Alias scope of the prefix: from the AST when the prefix parses, otherwise
/// from regex scans over FROM/JOIN clauses.
fn recover_scope(text: &str, schema: &DatabaseSchema) -> AliasScope {
    let mut scope = AliasScope::default();

    if let Ok(stmt) = parse_source(text) {
        if let pr::StmtKind::Select(select) = &stmt.kind {
            if let pr::TableSource::Table(name) = &select.from.source {
                add_relation(&mut scope, schema, name, select.from.alias.as_deref());
            }
            for join in &select.joins {
                add_relation(&mut scope, schema, &join.table, join.alias.as_deref());
            }
            return scope;
        }
    }

    static SOURCES: OnceLock<Regex> = OnceLock::new();
    let re = SOURCES.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:from|join)\s+["']?(\w+)["']?(?:\s+(?:as\s+)?(\w+))?"#).unwrap()
    });

    for captures in re.captures_iter(text) {
        let table = &captures[1];
        let alias = captures
            .get(2)
            .map(|m| m.as_str())
            .filter(|alias| !KEYWORDS.contains(&alias.to_ascii_uppercase().as_str()));
        add_relation(&mut scope, schema, table, alias);
    }
    scope
}

fn add_relation(scope: &mut AliasScope, schema: &DatabaseSchema, table: &str, alias: Option<&str>) {
    let Some((canonical, _)) = schema.table(table) else {
        return;
    };
    let canonical = canonical.to_string();
    scope.add(alias.unwrap_or(table), &canonical);
}

fn current_word(text: &str) -> String {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let re = WORD.get_or_init(|| Regex::new(r"(\w*)$").unwrap());
    re.captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

fn qualifier_before_cursor(text: &str) -> Option<String> {
    static QUALIFIER: OnceLock<Regex> = OnceLock::new();
    let re = QUALIFIER.get_or_init(|| Regex::new(r"(\w+)\.\w*$").unwrap());
    re.captures(text).map(|c| c[1].to_string())
}

fn after_from_or_join(text: &str) -> bool {
    static AFTER: OnceLock<Regex> = OnceLock::new();
    let re = AFTER.get_or_init(|| Regex::new(r#"(?i)\b(?:from|join)\s+["']?\w*$"#).unwrap());
    re.is_match(text)
}

fn after_condition_keyword(text: &str) -> bool {
    static AFTER: OnceLock<Regex> = OnceLock::new();
    let re = AFTER.get_or_init(|| Regex::new(r"(?i)\b(?:where|on|and|or)\s+\w*$").unwrap());
    re.is_match(text)
}

fn after_select(text: &str) -> bool {
    static AFTER: OnceLock<Regex> = OnceLock::new();
    let re =
        AFTER.get_or_init(|| Regex::new(r"(?i)\bselect\s+(?:[\w.]+\s*,\s*)*[\w.]*$").unwrap());
    re.is_match(text)
}
