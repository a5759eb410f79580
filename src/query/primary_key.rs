//! Primary-key lookups.
//!
//! A key lookup is validated in full before any SQL exists: every declared key field must
//! be present in the caller's map. Presence is what counts, so a key bound to a null value
//! passes the check (and simply matches nothing).

use sea_query::Value;
use std::collections::BTreeMap;

use crate::executor::LifeError;

/// Caller-supplied primary-key values, by field name.
pub type KeyValues = BTreeMap<String, Value>;

/// Check that `keys` covers every field in `key_fields`.
///
/// # Errors
///
/// Returns `LifeError::InvalidKey` naming the first missing field (in declared order) and
/// the full expected key set.
pub fn check_primary_key(keys: &KeyValues, key_fields: &[String]) -> Result<(), LifeError> {
    match key_fields.iter().find(|field| !keys.contains_key(field.as_str())) {
        Some(missing) => Err(LifeError::InvalidKey {
            missing: missing.clone(),
            expected: key_fields.to_vec(),
        }),
        None => Ok(()),
    }
}

/// The key values in declared key-field order. Entries that are not key fields are dropped.
///
/// # Errors
///
/// Same as [`check_primary_key`].
pub fn ordered_key_values<'k>(
    keys: &'k KeyValues,
    key_fields: &'k [String],
) -> Result<Vec<(&'k str, Value)>, LifeError> {
    check_primary_key(keys, key_fields)?;
    Ok(key_fields
        .iter()
        .filter_map(|field| keys.get(field).map(|value| (field.as_str(), value.clone())))
        .collect())
}
