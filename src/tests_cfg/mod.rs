//! Shared fixtures for unit tests: a scripted executor and a `person` relation.

use once_cell::sync::Lazy;
use sea_query::Values;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::executor::{LifeError, LifeExecutor, RowSource};
use crate::query::read::Statement;
use crate::query::traits::FromRecord;
use crate::relation::RelationDescriptor;
use crate::value::Record;

enum Scripted {
    Rows(Vec<Record>),
    Error(String),
}

/// Executor that records every statement and replays scripted results in order.
///
/// Once the script runs out, each further statement returns no rows.
#[derive(Default)]
pub struct MockExecutor {
    script: Mutex<VecDeque<Scripted>>,
    captured: Arc<Mutex<Vec<Statement>>>,
    released: Arc<AtomicUsize>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<Record>) -> Self {
        self.script.lock().unwrap().push_back(Scripted::Rows(rows));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Error(message.to_string()));
        self
    }

    /// Statements executed so far.
    pub fn captured(&self) -> Vec<Statement> {
        self.captured.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    /// Row sources released so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl LifeExecutor for MockExecutor {
    fn query(&self, sql: &str, values: &Values) -> Result<Box<dyn RowSource>, LifeError> {
        self.captured.lock().unwrap().push(Statement {
            sql: sql.to_string(),
            values: values.clone(),
        });
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Error(message)) => Err(LifeError::QueryError(message)),
            Some(Scripted::Rows(rows)) => Ok(Box::new(MockRowSource::new(
                rows,
                Arc::clone(&self.released),
            ))),
            None => Ok(Box::new(MockRowSource::new(
                Vec::new(),
                Arc::clone(&self.released),
            ))),
        }
    }
}

pub struct MockRowSource {
    rows: Option<std::vec::IntoIter<Record>>,
    released: Arc<AtomicUsize>,
}

impl MockRowSource {
    fn new(rows: Vec<Record>, released: Arc<AtomicUsize>) -> Self {
        Self {
            rows: Some(rows.into_iter()),
            released,
        }
    }
}

impl RowSource for MockRowSource {
    fn next_record(&mut self) -> Option<Result<Record, LifeError>> {
        let next = self.rows.as_mut()?.next();
        if next.is_none() {
            self.close();
        }
        next.map(Ok)
    }

    fn close(&mut self) {
        if self.rows.take().is_some() {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MockRowSource {
    fn drop(&mut self) {
        self.close();
    }
}

static PERSON: Lazy<RelationDescriptor> = Lazy::new(|| {
    RelationDescriptor::new("person", ["id", "name", "age"], ["id"]).expect("valid person metadata")
});

pub fn person() -> &'static RelationDescriptor {
    &PERSON
}

pub fn person_row(id: i32, name: &str, age: i32) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("age", age)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

impl FromRecord for Person {
    fn from_record(record: Record) -> Result<Self, LifeError> {
        Ok(Self {
            id: record.try_get("id")?,
            name: record.try_get("name")?,
            age: record.try_get("age")?,
        })
    }
}
