//! Column lists and identifier quoting.

/// Comma-joined field list: `id, name, age`.
pub fn unaliased<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field list with every column aliased to itself: `id AS id, name AS name`.
///
/// Keeps result column names stable when predicate text references the same columns.
pub fn aliased<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            format!("{field} AS {field}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quote `name` as a PostgreSQL identifier, doubling embedded double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
