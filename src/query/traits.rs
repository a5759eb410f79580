//! Core traits for models and entities.

use sea_query::Values;

use crate::executor::{LifeError, LifeExecutor};
use crate::query::condition::Predicate;
use crate::query::fragment::TrustedSql;
use crate::query::primary_key::KeyValues;
use crate::query::read::ReadQuery;
use crate::query::sequence::ResultSequence;
use crate::relation::RelationDescriptor;
use crate::value::Record;

/// Trait for types that can be built from a decoded row.
///
/// `Record` itself implements it, so untyped reads need no model at all.
pub trait FromRecord: Sized {
    fn from_record(record: Record) -> Result<Self, LifeError>;
}

impl FromRecord for Record {
    fn from_record(record: Record) -> Result<Self, LifeError> {
        Ok(record)
    }
}

/// Entity-level entry points to the read layer.
///
/// Implement it on a unit entity type to get `find_all`, `find_where`, `find_by_pk` and
/// `count_where` as associated functions.
///
/// # Example
///
/// ```no_run
/// use lifebuoy::{
///     FromRecord, KeyValues, LifeError, LifeExecutor, LifeModelTrait, Record,
///     RelationDescriptor, TrustedSql,
/// };
/// use once_cell::sync::Lazy;
/// use sea_query::Value;
///
/// struct Person;
///
/// struct PersonModel {
///     id: i32,
///     name: String,
/// }
///
/// impl FromRecord for PersonModel {
///     fn from_record(record: Record) -> Result<Self, LifeError> {
///         Ok(Self { id: record.try_get("id")?, name: record.try_get("name")? })
///     }
/// }
///
/// static PERSON: Lazy<RelationDescriptor> = Lazy::new(|| {
///     RelationDescriptor::new("person", ["id", "name", "age"], ["id"]).expect("valid metadata")
/// });
///
/// impl LifeModelTrait for Person {
///     type Model = PersonModel;
///
///     fn relation() -> &'static RelationDescriptor {
///         &PERSON
///     }
/// }
///
/// # fn run(executor: &dyn LifeExecutor) -> Result<(), LifeError> {
/// for person in Person::find_all(executor, Some(TrustedSql::new("order by id")))? {
///     println!("{}", person?.name);
/// }
///
/// let key = KeyValues::from([("id".to_string(), Value::from(7))]);
/// if let Some(person) = Person::find_by_pk(executor, &key)? {
///     println!("found {}", person.id);
/// }
/// # Ok(())
/// # }
/// ```
pub trait LifeModelTrait {
    type Model: FromRecord;

    /// Metadata of the backing relation.
    fn relation() -> &'static RelationDescriptor;

    /// A read query for this entity over `executor`.
    fn reader(executor: &dyn LifeExecutor) -> ReadQuery<'_, Self::Model> {
        ReadQuery::new(executor, Self::relation())
    }

    fn find_all(
        executor: &dyn LifeExecutor,
        suffix: Option<TrustedSql>,
    ) -> Result<ResultSequence<Self::Model>, LifeError> {
        Self::reader(executor).find_all(suffix)
    }

    fn find_where(
        executor: &dyn LifeExecutor,
        predicate: impl Into<Predicate>,
        values: Values,
        suffix: Option<TrustedSql>,
    ) -> Result<ResultSequence<Self::Model>, LifeError> {
        Self::reader(executor).find_where(predicate, values, suffix)
    }

    fn find_by_pk(
        executor: &dyn LifeExecutor,
        keys: &KeyValues,
    ) -> Result<Option<Self::Model>, LifeError> {
        Self::reader(executor).find_by_pk(keys)
    }

    fn count_where(
        executor: &dyn LifeExecutor,
        predicate: impl Into<Predicate>,
        values: Values,
    ) -> Result<usize, LifeError> {
        Self::reader(executor).count_where(predicate, values)
    }
}
