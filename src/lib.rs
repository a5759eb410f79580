//! # Lifebuoy
//!
//! Coroutine-native PostgreSQL read queries over `may_postgres`.
//!
//! Relations are described by their structural metadata (name, fields, primary key) and
//! read through four operations: `find_all`, `find_where`, `find_by_pk` and `count_where`.
//! Every statement is parameterized; the only unescaped text is an explicit
//! [`TrustedSql`] suffix.

pub mod config;
pub mod connection;
pub mod executor;
pub mod metrics;
pub mod query;
pub mod relation;
pub mod value;

#[cfg(test)]
mod tests_cfg;

pub use config::DatabaseConfig;
pub use connection::{connect, validate_connection_string, ConnectionError, ConnectionFormat};
pub use executor::{LifeError, LifeExecutor, MayPostgresExecutor, PgRowSource, RowSource};
pub use query::{
    Condition, FromRecord, KeyValues, LifeModelTrait, Predicate, ReadQuery, ResultSequence,
    Statement, TrustedSql,
};
pub use relation::{RelationDescriptor, StructuralMetadata};
pub use value::{Record, TryGetable, ValueExtractionError};
