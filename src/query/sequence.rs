//! Lazy, single-pass result sequences.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::executor::{LifeError, RowSource};
use crate::query::traits::FromRecord;

/// A forward-only stream of hydrated models over one executed statement.
///
/// Rows are pulled from the row source and hydrated one at a time as the sequence is
/// iterated. The row source is released exactly once: when it runs dry, when a row fails
/// to decode or hydrate (the error is yielded, then the sequence ends), on [`close`], or on
/// drop. After that the sequence only yields `None`.
///
/// [`close`]: ResultSequence::close
pub struct ResultSequence<M> {
    source: Option<Box<dyn RowSource>>,
    yielded: usize,
    _model: PhantomData<fn() -> M>,
}

impl<M> ResultSequence<M> {
    pub(crate) fn new(source: Box<dyn RowSource>) -> Self {
        Self {
            source: Some(source),
            yielded: 0,
            _model: PhantomData,
        }
    }

    /// Release the row source now, abandoning any unread rows.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
            log::trace!("result sequence closed after {} rows", self.yielded);
        }
    }

    /// `true` once the row source has been released.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Rows handed out so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl<M: FromRecord> Iterator for ResultSequence<M> {
    type Item = Result<M, LifeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.source.as_mut()?.next_record();
        match next {
            Some(Ok(record)) => match M::from_record(record) {
                Ok(model) => {
                    self.yielded += 1;
                    Some(Ok(model))
                }
                Err(e) => {
                    self.close();
                    Some(Err(e))
                }
            },
            Some(Err(e)) => {
                self.close();
                Some(Err(e))
            }
            None => {
                self.close();
                None
            }
        }
    }
}

impl<M: FromRecord> FusedIterator for ResultSequence<M> {}

impl<M> Drop for ResultSequence<M> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<M> std::fmt::Debug for ResultSequence<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSequence")
            .field("closed", &self.is_closed())
            .field("yielded", &self.yielded)
            .finish()
    }
}
