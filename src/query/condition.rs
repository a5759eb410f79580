//! Conjunctive predicates with positional placeholders.
//!
//! A [`Condition`] is a list of clauses joined by `AND`, plus the values bound to them.
//! Clauses are written with `?` as the placeholder marker; rendering numbers every marker
//! across the whole condition as `$1..$n`, in clause-append order, so the bound values
//! always line up positionally with the rendered text.
//!
//! ```
//! use lifebuoy::Condition;
//! use sea_query::Value;
//!
//! let condition = Condition::new()
//!     .eq("org_id", 7)
//!     .add("age between ? and ?", [Value::from(18), Value::from(65)])
//!     .unwrap();
//!
//! assert_eq!(condition.render(), r#""org_id" = $1 AND (age between $2 and $3)"#);
//! assert_eq!(condition.values().0.len(), 3);
//! ```
//!
//! Raw predicate text that already carries `$n` placeholders goes through
//! [`Predicate::Raw`] instead.

use sea_query::{Value, Values};

use crate::executor::LifeError;
use crate::query::projection::quote_identifier;

/// Placeholder marker inside clause fragments.
pub const PLACEHOLDER_MARKER: char = '?';

/// Rendering of a condition with no clauses.
pub const TAUTOLOGY: &str = "TRUE";

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    text: String,
    // Byte offsets of the placeholder markers in `text`
    markers: Vec<usize>,
    // Single comparisons never need parentheses when conjoined.
    atomic: bool,
}

impl Clause {
    fn new(text: String, atomic: bool) -> Self {
        let markers = marker_offsets(&text);
        Self {
            text,
            markers,
            atomic,
        }
    }
}

/// Offsets of the `?` markers in `text`.
///
/// A `?` inside a single-quoted literal or a double-quoted identifier is text, and so are
/// the jsonb operators `?|` and `?&`.
fn marker_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        match quote {
            // A doubled quote closes and reopens, which leaves the span open
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                PLACEHOLDER_MARKER => {
                    if !matches!(chars.peek(), Some((_, '|' | '&'))) {
                        offsets.push(idx);
                    }
                }
                _ => {}
            },
        }
    }
    offsets
}

/// A conjunction of SQL clauses and their bound values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    clauses: Vec<Clause>,
    values: Vec<Value>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conjoin a clause fragment and the values for its `?` markers.
    ///
    /// Markers inside quoted literals or identifiers are left alone, as are `?|` and `?&`.
    /// The bare jsonb `?` operator cannot be told apart from a marker; write
    /// `jsonb_exists(tags, ?)` instead.
    ///
    /// # Errors
    ///
    /// Returns `LifeError::QueryError` if the number of markers in `fragment` differs from
    /// the number of values.
    pub fn add<I>(mut self, fragment: impl Into<String>, values: I) -> Result<Self, LifeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let clause = Clause::new(fragment.into(), false);
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if clause.markers.len() != values.len() {
            return Err(LifeError::QueryError(format!(
                "clause `{}` has {} placeholders but {} bound values",
                clause.text,
                clause.markers.len(),
                values.len()
            )));
        }
        self.clauses.push(clause);
        self.values.extend(values);
        Ok(self)
    }

    /// Conjoin `"column" = ?` bound to `value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::new(
            format!("{} = {PLACEHOLDER_MARKER}", quote_identifier(column)),
            true,
        ));
        self.values.push(value.into());
        self
    }

    /// One equality clause per entry, in iteration order.
    ///
    /// Iteration order fixes both clause order and bound-value order, so callers that need
    /// byte-identical SQL across calls must pass an ordered source.
    pub fn from_equalities<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |condition, (column, value)| {
                condition.eq(column.as_ref(), value)
            })
    }

    /// Render to SQL with `$1..$n` placeholders. An empty condition renders as `TRUE`.
    pub fn render(&self) -> String {
        if self.clauses.is_empty() {
            return TAUTOLOGY.to_string();
        }

        let wrap = self.clauses.len() > 1;
        let mut sql = String::new();
        let mut position = 0usize;
        for (idx, clause) in self.clauses.iter().enumerate() {
            if idx > 0 {
                sql.push_str(" AND ");
            }
            let parenthesize = wrap && !clause.atomic;
            if parenthesize {
                sql.push('(');
            }
            let mut copied = 0;
            for &offset in &clause.markers {
                position += 1;
                sql.push_str(&clause.text[copied..offset]);
                sql.push('$');
                sql.push_str(&position.to_string());
                copied = offset + PLACEHOLDER_MARKER.len_utf8();
            }
            sql.push_str(&clause.text[copied..]);
            if parenthesize {
                sql.push(')');
            }
        }
        sql
    }

    /// Bound values in clause-append order.
    pub fn values(&self) -> Values {
        Values(self.values.clone())
    }

    /// Rendered text and bound values.
    pub fn into_parts(self) -> (String, Values) {
        let sql = self.render();
        (sql, Values(self.values))
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// The predicate argument of `find_where` / `count_where`.
///
/// A structured [`Condition`] is self-contained: its own values are bound and any values
/// passed alongside it are ignored. Raw text is used verbatim with the values passed
/// alongside it, which must match its `$n` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Condition(Condition),
    Raw(String),
}

impl Predicate {
    /// Predicate text and the values to bind with it.
    pub fn resolve(self, values: Values) -> (String, Values) {
        match self {
            Predicate::Condition(condition) => condition.into_parts(),
            Predicate::Raw(sql) => (sql, values),
        }
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Predicate::Condition(condition)
    }
}

impl From<&str> for Predicate {
    fn from(sql: &str) -> Self {
        Predicate::Raw(sql.to_string())
    }
}

impl From<String> for Predicate {
    fn from(sql: String) -> Self {
        Predicate::Raw(sql)
    }
}
