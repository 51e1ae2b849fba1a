//! Data sources a query can be paginated against.
//!
//! A [`DataSource`] answers the two questions pagination needs: how many
//! records match a query, and which records fall in a window of the query's
//! ordering. The two calls are independent; a source is free to let writes
//! land between them.

use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::{Result, SourceError};
use crate::page::Window;
use crate::query::Query;

/// A collection that can evaluate a composed [`Query`].
///
/// Slices and vectors are sources out of the box. Adapters over a remote
/// store translate the query's filter and order into their own terms.
pub trait DataSource<T> {
    type Error;

    /// Counts records matching the query's filter. Ordering is irrelevant.
    fn count(&self, query: &Query<T>) -> std::result::Result<usize, Self::Error>;

    /// Returns matching records in query order, skipping `window.skip` and
    /// taking at most `window.take`.
    fn fetch(&self, query: &Query<T>, window: Window) -> std::result::Result<Vec<T>, Self::Error>;
}

impl<T: Clone> DataSource<T> for [T] {
    type Error = Infallible;

    fn count(&self, query: &Query<T>) -> std::result::Result<usize, Infallible> {
        Ok(query.count_in(self))
    }

    fn fetch(&self, query: &Query<T>, window: Window) -> std::result::Result<Vec<T>, Infallible> {
        Ok(fetch_window(self, query, window))
    }
}

impl<T: Clone> DataSource<T> for Vec<T> {
    type Error = Infallible;

    fn count(&self, query: &Query<T>) -> std::result::Result<usize, Infallible> {
        self.as_slice().count(query)
    }

    fn fetch(&self, query: &Query<T>, window: Window) -> std::result::Result<Vec<T>, Infallible> {
        self.as_slice().fetch(query, window)
    }
}

fn fetch_window<T: Clone>(records: &[T], query: &Query<T>, window: Window) -> Vec<T> {
    query
        .select(records)
        .into_iter()
        .skip(window.skip)
        .take(window.take)
        .cloned()
        .collect()
}

/// An in-memory record store shared between threads.
///
/// Clones share the same records. Each [`DataSource`] call takes its own
/// read lock, so a writer can slip in between the count and the fetch of a
/// single pagination call.
pub struct SharedSource<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T> SharedSource<T> {
    pub fn new() -> Self {
        SharedSource::from_vec(Vec::new())
    }

    pub fn from_vec(records: Vec<T>) -> Self {
        SharedSource {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Appends a record.
    pub fn insert(&self, record: T) -> Result<()> {
        self.update(|records| records.push(record))
    }

    /// Keeps only records for which `keep` returns `true`. Returns how many
    /// were removed.
    pub fn retain<F>(&self, keep: F) -> Result<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.update(|records| {
            let before = records.len();
            records.retain(keep);
            before - records.len()
        })
    }

    /// Runs `f` with exclusive access to the records.
    pub fn update<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let mut records = self.records.write().map_err(|_| SourceError::Poisoned {
            operation: "writing",
        })?;
        Ok(f(&mut *records))
    }

    /// Total number of stored records, ignoring any query.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read("reading")?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self, operation: &'static str) -> Result<std::sync::RwLockReadGuard<'_, Vec<T>>> {
        self.records
            .read()
            .map_err(|_| SourceError::Poisoned { operation })
    }
}

impl<T: Clone> DataSource<T> for SharedSource<T> {
    type Error = SourceError;

    fn count(&self, query: &Query<T>) -> Result<usize> {
        Ok(query.count_in(&self.read("counting")?))
    }

    fn fetch(&self, query: &Query<T>, window: Window) -> Result<Vec<T>> {
        Ok(fetch_window(&self.read("fetching")?, query, window))
    }
}

impl<T> Clone for SharedSource<T> {
    fn clone(&self) -> Self {
        SharedSource {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> Default for SharedSource<T> {
    fn default() -> Self {
        SharedSource::new()
    }
}

impl<T> fmt::Debug for SharedSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSource")
            .field("len", &self.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn slice_source_windows() {
        let records = vec![1, 2, 3, 4, 5];
        let query = Query::new().filter(|n: &i32| n % 2 == 1);

        assert_eq!(records.count(&query), Ok(3));
        assert_eq!(
            records.fetch(&query, Window { skip: 1, take: 5 }),
            Ok(vec![3, 5])
        );
        assert_eq!(
            records.fetch(&query, Window { skip: 9, take: 5 }),
            Ok(Vec::new())
        );
    }

    #[test]
    fn shared_source_insert_and_retain() {
        let source = SharedSource::from_vec(vec![1, 2, 3]);
        let handle = source.clone();

        handle.insert(4).unwrap();
        assert_eq!(source.len(), Ok(4));

        assert_eq!(source.retain(|n| *n > 2), Ok(2));
        assert_eq!(handle.fetch(&Query::new(), Window { skip: 0, take: 10 }), Ok(vec![3, 4]));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let source = SharedSource::from_vec(vec![1u8]);
        let writer = source.clone();

        let outcome = thread::spawn(move || {
            let _ = writer.update(|_| panic!("writer failed"));
        })
        .join();
        assert!(outcome.is_err());

        assert_eq!(
            source.count(&Query::new()),
            Err(SourceError::Poisoned {
                operation: "counting"
            })
        );
        assert!(matches!(
            source.insert(2),
            Err(SourceError::Poisoned { operation: "writing" })
        ));
    }
}
