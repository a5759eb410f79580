//! Row-to-map representation of one result row.

use sea_query::Value;

use crate::executor::LifeError;
use crate::value::TryGetable;

/// One result row as an ordered column-name to value map.
///
/// Column order is the order the statement selected them in. Lookups by name return the
/// first column with that name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Append a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Builder form of [`Record::push`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Extract a typed value from `column`.
    ///
    /// # Errors
    ///
    /// Returns `LifeError::ParseError` if the column is absent, null (for non-`Option`
    /// targets) or of a different type.
    pub fn try_get<T: TryGetable>(&self, column: &str) -> Result<T, LifeError> {
        let value = self
            .get(column)
            .ok_or_else(|| LifeError::ParseError(format!("column `{column}` not in row")))?;
        T::try_get(value.clone())
            .map_err(|e| LifeError::ParseError(format!("column `{column}`: {e}")))
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Value)> {
        self.columns
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_column_order() {
        let record = Record::new()
            .with("id", 1i32)
            .with("name", "Ann")
            .with("age", 31i32);

        let names: Vec<&str> = record.columns().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "name", "age"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_typed_access() {
        let record = Record::new().with("id", 7i64).with("nickname", Value::String(None));

        assert_eq!(record.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(record.try_get::<Option<String>>("nickname").unwrap(), None);
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let record = Record::new().with("id", 7i64);
        let err = record.try_get::<String>("name").unwrap_err();
        assert!(err.to_string().contains("column `name` not in row"));
    }

    #[test]
    fn test_null_into_non_option_is_parse_error() {
        let record = Record::new().with("age", Value::Int(None));
        assert!(matches!(
            record.try_get::<i32>("age"),
            Err(LifeError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_iterator() {
        let record: Record = vec![("count", Value::BigInt(Some(2)))].into_iter().collect();
        assert_eq!(record.get("count"), Some(&Value::BigInt(Some(2))));
    }
}
