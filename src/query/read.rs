//! The read query layer.
//!
//! [`ReadQuery`] turns relation metadata plus a predicate into one parameterized
//! statement, runs it once through a [`LifeExecutor`] and hands the rows back as a lazy
//! [`ResultSequence`]. Four operations:
//!
//! | operation     | SQL                                                                 |
//! |---------------|---------------------------------------------------------------------|
//! | `find_all`    | `select <fields> from <relation> [<suffix>]`                        |
//! | `find_where`  | `select <f AS f, ...> from <relation> where <predicate> [<suffix>]` |
//! | `find_by_pk`  | `find_where` with a derived key equality condition                  |
//! | `count_where` | `select count(*) as count from <relation> where <predicate>`        |

use sea_query::{Value, Values};
use std::marker::PhantomData;

use crate::executor::{LifeError, LifeExecutor};
use crate::query::condition::{Condition, Predicate};
use crate::query::fragment::{push_suffix, TrustedSql};
use crate::query::primary_key::{ordered_key_values, KeyValues};
use crate::query::projection::{aliased, unaliased};
use crate::query::sequence::ResultSequence;
use crate::query::traits::FromRecord;
use crate::relation::StructuralMetadata;

/// Column the count statement aliases its result to.
pub const COUNT_COLUMN: &str = "count";

/// SQL text and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Values,
}

/// Read operations over one relation.
///
/// Holds no state between calls: every operation composes its statement from the
/// (immutable) metadata and its own arguments.
pub struct ReadQuery<'a, M> {
    executor: &'a dyn LifeExecutor,
    relation: &'a dyn StructuralMetadata,
    _model: PhantomData<fn() -> M>,
}

impl<'a, M> ReadQuery<'a, M> {
    pub fn new(executor: &'a dyn LifeExecutor, relation: &'a dyn StructuralMetadata) -> Self {
        Self {
            executor,
            relation,
            _model: PhantomData,
        }
    }

    /// The statement [`find_all`](Self::find_all) executes.
    pub fn find_all_statement(&self, suffix: Option<&TrustedSql>) -> Statement {
        let mut sql = format!(
            "select {} from {}",
            unaliased(self.relation.fields()),
            self.relation.relation_name()
        );
        push_suffix(&mut sql, suffix);
        Statement {
            sql,
            values: Values(Vec::new()),
        }
    }

    /// The statement [`find_where`](Self::find_where) executes.
    pub fn find_where_statement(
        &self,
        predicate: impl Into<Predicate>,
        values: Values,
        suffix: Option<&TrustedSql>,
    ) -> Statement {
        let (predicate_sql, values) = predicate.into().resolve(values);
        let mut sql = format!(
            "select {} from {} where {}",
            aliased(self.relation.fields()),
            self.relation.relation_name(),
            predicate_sql
        );
        push_suffix(&mut sql, suffix);
        Statement { sql, values }
    }

    /// The key equality condition for `keys`, one clause per key field in declared order.
    ///
    /// # Errors
    ///
    /// Returns `LifeError::InvalidKey` if a declared key field is missing from `keys`.
    pub fn key_condition(&self, keys: &KeyValues) -> Result<Condition, LifeError> {
        let ordered = ordered_key_values(keys, self.relation.primary_key_fields())?;
        Ok(Condition::from_equalities(ordered))
    }

    /// The statement [`find_by_pk`](Self::find_by_pk) executes.
    ///
    /// # Errors
    ///
    /// Returns `LifeError::InvalidKey` if a declared key field is missing from `keys`.
    pub fn find_by_pk_statement(&self, keys: &KeyValues) -> Result<Statement, LifeError> {
        let condition = self.key_condition(keys)?;
        Ok(self.find_where_statement(condition, Values(Vec::new()), None))
    }

    /// The statement [`count_where`](Self::count_where) executes.
    pub fn count_where_statement(
        &self,
        predicate: impl Into<Predicate>,
        values: Values,
    ) -> Statement {
        let (predicate_sql, values) = predicate.into().resolve(values);
        Statement {
            sql: format!(
                "select count(*) as {COUNT_COLUMN} from {} where {}",
                self.relation.relation_name(),
                predicate_sql
            ),
            values,
        }
    }

    /// Execute the count statement and coerce its scalar.
    ///
    /// # Errors
    ///
    /// Returns the executor's error, or `LifeError::Consistency` if the result is not a
    /// single non-negative integer.
    pub fn count_where(
        &self,
        predicate: impl Into<Predicate>,
        values: Values,
    ) -> Result<usize, LifeError> {
        let statement = self.count_where_statement(predicate, values);
        log::debug!("count_where: {}", statement.sql);

        let mut source = self.executor.query(&statement.sql, &statement.values)?;
        let scalar = source.scalar(COUNT_COLUMN);
        source.close();

        let value = scalar?.ok_or_else(|| {
            LifeError::Consistency(format!(
                "count over `{}` returned no rows",
                self.relation.relation_name()
            ))
        })?;
        coerce_count(value)
    }
}

impl<'a, M: FromRecord> ReadQuery<'a, M> {
    /// Every row of the relation, optionally ordered or limited by `suffix`.
    ///
    /// # Errors
    ///
    /// Returns the executor's error.
    pub fn find_all(&self, suffix: Option<TrustedSql>) -> Result<ResultSequence<M>, LifeError> {
        let statement = self.find_all_statement(suffix.as_ref());
        self.run("find_all", statement)
    }

    /// Rows matching `predicate`.
    ///
    /// A structured [`Condition`] binds its own values and `values` is ignored; raw text
    /// binds `values` as given.
    ///
    /// # Errors
    ///
    /// Returns the executor's error.
    pub fn find_where(
        &self,
        predicate: impl Into<Predicate>,
        values: Values,
        suffix: Option<TrustedSql>,
    ) -> Result<ResultSequence<M>, LifeError> {
        let statement = self.find_where_statement(predicate, values, suffix.as_ref());
        self.run("find_where", statement)
    }

    /// The row whose primary key equals `keys`, or `None`.
    ///
    /// Keys are validated before anything is executed. Entries that are not key fields
    /// are ignored.
    ///
    /// # Errors
    ///
    /// - `LifeError::InvalidKey` if a declared key field is missing (no query is issued)
    /// - `LifeError::AmbiguousMatch` if more than one row matches
    /// - the executor's or hydration error otherwise
    pub fn find_by_pk(&self, keys: &KeyValues) -> Result<Option<M>, LifeError> {
        let condition = self.key_condition(keys)?;
        let mut rows = self.find_where(condition, Values(Vec::new()), None)?;

        let first = match rows.next() {
            None => return Ok(None),
            Some(row) => row?,
        };
        match rows.next() {
            None => Ok(Some(first)),
            Some(Err(e)) => Err(e),
            Some(Ok(_)) => {
                let matches = 2 + rows.by_ref().count();
                log::warn!(
                    "{matches} rows in `{}` matched primary key {:?}",
                    self.relation.relation_name(),
                    keys
                );
                Err(LifeError::AmbiguousMatch {
                    relation: self.relation.relation_name().to_string(),
                    matches,
                })
            }
        }
    }

    fn run(&self, operation: &str, statement: Statement) -> Result<ResultSequence<M>, LifeError> {
        log::debug!(
            "{operation}: {} ({} bound values)",
            statement.sql,
            statement.values.0.len()
        );
        let source = self.executor.query(&statement.sql, &statement.values)?;
        Ok(ResultSequence::new(source))
    }
}

fn coerce_count(value: Value) -> Result<usize, LifeError> {
    let count: i64 = match value {
        Value::BigInt(Some(n)) => n,
        Value::Int(Some(n)) => i64::from(n),
        Value::SmallInt(Some(n)) => i64::from(n),
        Value::BigUnsigned(Some(n)) => i64::try_from(n)
            .map_err(|_| LifeError::Consistency(format!("count {n} out of range")))?,
        other => {
            return Err(LifeError::Consistency(format!(
                "count returned a non-integer value: {other:?}"
            )))
        }
    };
    usize::try_from(count)
        .map_err(|_| LifeError::Consistency(format!("Count cannot be negative: {count}")))
}
