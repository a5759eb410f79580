//! Trusted SQL fragments.

use std::borrow::Cow;
use std::fmt;

/// SQL text appended to a statement without escaping or validation.
///
/// This is the one unescaped extension point of the read layer, meant for ordering,
/// limit and grouping clauses written by the calling code. It has no `From<String>`:
/// literals go through [`TrustedSql::new`], and runtime-built text has to be marked with
/// [`TrustedSql::assume_trusted`] at the call site. Never build one from user input.
///
/// ```
/// use lifebuoy::TrustedSql;
///
/// let newest_first = TrustedSql::new("order by created_at desc limit 20");
/// assert_eq!(newest_first.as_str(), "order by created_at desc limit 20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrustedSql(Cow<'static, str>);

impl TrustedSql {
    /// Wrap a string literal.
    pub const fn new(text: &'static str) -> Self {
        Self(Cow::Borrowed(text))
    }

    /// Wrap text assembled at runtime. The caller vouches that none of it is untrusted.
    pub fn assume_trusted(text: impl Into<String>) -> Self {
        Self(Cow::Owned(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrustedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append ` <suffix>` to `sql`. An absent or empty suffix leaves `sql` untouched.
pub(crate) fn push_suffix(sql: &mut String, suffix: Option<&TrustedSql>) {
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        sql.push(' ');
        sql.push_str(suffix.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_appended_verbatim() {
        let mut sql = "select id from person".to_string();
        let suffix = TrustedSql::new("order by \"Name\" DESC  limit 5 -- ';");
        push_suffix(&mut sql, Some(&suffix));
        assert_eq!(sql, "select id from person order by \"Name\" DESC  limit 5 -- ';");
    }

    #[test]
    fn test_absent_and_empty_suffix() {
        let mut sql = "select id from person".to_string();
        push_suffix(&mut sql, None);
        push_suffix(&mut sql, Some(&TrustedSql::assume_trusted(String::new())));
        assert_eq!(sql, "select id from person");
    }

    #[test]
    fn test_assume_trusted_runtime_text() {
        let limit = 10;
        let suffix = TrustedSql::assume_trusted(format!("limit {limit}"));
        assert_eq!(suffix.to_string(), "limit 10");
    }
}
