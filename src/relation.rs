//! Relation metadata.
//!
//! The read layer never introspects the database. Whatever supplies schema knowledge
//! (generated code, a migration registry, a config file) hands it over through
//! [`StructuralMetadata`]; [`RelationDescriptor`] is the stock implementation.
//!
//! # Example
//!
//! ```
//! use lifebuoy::{RelationDescriptor, StructuralMetadata};
//! use once_cell::sync::Lazy;
//!
//! static PERSON: Lazy<RelationDescriptor> = Lazy::new(|| {
//!     RelationDescriptor::new("public.person", ["id", "name", "age"], ["id"])
//!         .expect("person metadata is well-formed")
//! });
//!
//! assert_eq!(PERSON.relation_name(), "public.person");
//! assert_eq!(PERSON.primary_key_fields(), ["id"]);
//! ```

use serde::Deserialize;

use crate::executor::LifeError;

/// Structural metadata for one relation.
pub trait StructuralMetadata {
    /// Relation name as it should appear after `from`, optionally schema-qualified.
    fn relation_name(&self) -> &str;

    /// Selectable fields, in projection order.
    fn fields(&self) -> &[String];

    /// Primary-key fields, in declared order. Never empty; always a subset of [`fields`].
    ///
    /// [`fields`]: StructuralMetadata::fields
    fn primary_key_fields(&self) -> &[String];
}

/// Immutable description of a relation: name, fields and primary key.
///
/// Deserializes from `{ "name": ..., "fields": [...], "primary_key": [...] }` with the same
/// validation as [`RelationDescriptor::new`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct RelationDescriptor {
    name: String,
    fields: Vec<String>,
    primary_key: Vec<String>,
}

#[derive(Deserialize)]
struct RawDescriptor {
    name: String,
    fields: Vec<String>,
    primary_key: Vec<String>,
}

impl TryFrom<RawDescriptor> for RelationDescriptor {
    type Error = LifeError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        RelationDescriptor::new(raw.name, raw.fields, raw.primary_key)
    }
}

impl RelationDescriptor {
    /// Build a descriptor, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `LifeError::InvalidDescriptor` if the name is empty, there are no fields,
    /// a field is listed twice, the primary key is empty, or a key field is not a field.
    pub fn new<N, F, K>(name: N, fields: F, primary_key: K) -> Result<Self, LifeError>
    where
        N: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let name = name.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let primary_key: Vec<String> = primary_key.into_iter().map(Into::into).collect();

        if name.trim().is_empty() {
            return Err(LifeError::InvalidDescriptor(
                "relation name cannot be empty".to_string(),
            ));
        }
        if fields.is_empty() {
            return Err(LifeError::InvalidDescriptor(format!(
                "relation `{name}` declares no fields"
            )));
        }
        for (idx, field) in fields.iter().enumerate() {
            if fields[..idx].contains(field) {
                return Err(LifeError::InvalidDescriptor(format!(
                    "relation `{name}` declares field `{field}` twice"
                )));
            }
        }
        if primary_key.is_empty() {
            return Err(LifeError::InvalidDescriptor(format!(
                "relation `{name}` declares no primary key"
            )));
        }
        if let Some(stray) = primary_key.iter().find(|key| !fields.contains(*key)) {
            return Err(LifeError::InvalidDescriptor(format!(
                "primary key field `{stray}` is not a field of `{name}`"
            )));
        }

        Ok(Self {
            name,
            fields,
            primary_key,
        })
    }
}

impl StructuralMetadata for RelationDescriptor {
    fn relation_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn primary_key_fields(&self) -> &[String] {
        &self.primary_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accessors() {
        let person = RelationDescriptor::new("person", ["id", "name", "age"], ["id"]).unwrap();
        assert_eq!(person.relation_name(), "person");
        assert_eq!(person.fields(), ["id", "name", "age"]);
        assert_eq!(person.primary_key_fields(), ["id"]);
    }

    #[test]
    fn test_composite_key_keeps_declared_order() {
        let membership = RelationDescriptor::new(
            "crm.membership",
            ["org_id", "user_id", "role"],
            ["user_id", "org_id"],
        )
        .unwrap();
        assert_eq!(membership.primary_key_fields(), ["user_id", "org_id"]);
    }

    #[test]
    fn test_key_outside_fields_rejected() {
        let err = RelationDescriptor::new("person", ["id", "name"], ["uuid"]).unwrap_err();
        assert!(matches!(err, LifeError::InvalidDescriptor(msg) if msg.contains("`uuid`")));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = RelationDescriptor::new("person", ["id"], Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, LifeError::InvalidDescriptor(_)));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = RelationDescriptor::new("person", ["id", "id"], ["id"]).unwrap_err();
        assert!(matches!(err, LifeError::InvalidDescriptor(msg) if msg.contains("twice")));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(RelationDescriptor::new(" ", ["id"], ["id"]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let person: RelationDescriptor = serde_json::from_str(
            r#"{"name": "person", "fields": ["id", "name", "age"], "primary_key": ["id"]}"#,
        )
        .unwrap();
        assert_eq!(person.primary_key_fields(), ["id"]);

        let bad = serde_json::from_str::<RelationDescriptor>(
            r#"{"name": "person", "fields": ["id"], "primary_key": ["name"]}"#,
        );
        assert!(bad.is_err());
    }
}
