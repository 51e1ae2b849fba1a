//! Lazy query composition and pagination.
//!
//! A [`Query`] is a description, not a result: building one never touches
//! data. It carries one combined filter and at most one sort order, and is
//! only evaluated when handed to a [`DataSource`] by
//! [`paginate`](Query::paginate) (or by [`select`](Query::select) for slices).
//!
//! ```text
//! search / where_if / filter  ->  sort_by  ->  paginate
//!        (lazy)                   (lazy)       count + windowed fetch
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::condition::Condition;
use crate::options::QueryOptions;
use crate::page::{PageRequest, PageResult};
use crate::predicate::Predicate;
use crate::record::{Record, Sortable};
use crate::search::{FieldSelector, SearchPattern};
use crate::sort::{Comparator, Dir, SortCatalog};
use crate::source::DataSource;

/// A composable filter plus an optional single-key ordering.
///
/// Every builder method consumes the query and returns the refined one.
/// Filters always AND together, so each call can only narrow the result.
///
/// # Example
///
/// ```
/// use quarry::{Query, Record};
///
/// #[derive(Debug, Clone, Record)]
/// struct Person {
///     #[record(String)]
///     name: String,
///     #[record(Number)]
///     age: u32,
/// }
///
/// fn name(p: &Person) -> Option<&str> {
///     Some(&p.name)
/// }
///
/// let people = vec![
///     Person { name: "Ana".into(), age: 30 },
///     Person { name: "Bea".into(), age: 20 },
///     Person { name: "Carla".into(), age: 25 },
/// ];
///
/// let page = Query::<Person>::new()
///     .search(Some("a"), &[name])
///     .where_if(true, |p: &Person| p.age > 21)
///     .sort_by(Some("age"), false)
///     .paginate(&people, 1, 10)
///     .unwrap();
///
/// let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, ["Carla", "Ana"]);
/// assert_eq!(page.total_count, 2);
/// ```
pub struct Query<T> {
    filter: Option<Predicate<T>>,
    order: Option<SortOrder<T>>,
}

struct SortOrder<T> {
    key: String,
    dir: Dir,
    compare: Comparator<T>,
}

impl<T> Query<T> {
    /// Creates a query that matches everything in source order.
    pub fn new() -> Self {
        Query {
            filter: None,
            order: None,
        }
    }

    /// Returns `true` if the item passes every filter.
    pub fn matches(&self, item: &T) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter.test(item))
    }

    /// Compares two items under the query's ordering. Without an ordering
    /// every pair compares equal.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.order
            .as_ref()
            .map_or(Ordering::Equal, |order| order.dir.apply((order.compare)(a, b)))
    }

    /// Returns `true` if any filter has been applied.
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// The resolved sort key and direction, if any.
    pub fn ordering(&self) -> Option<(&str, Dir)> {
        self.order
            .as_ref()
            .map(|order| (order.key.as_str(), order.dir))
    }

    /// Filters and orders a slice.
    ///
    /// The sort is stable: items with equal keys keep their slice order.
    pub fn select<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut selected: Vec<&'a T> = items.iter().filter(|item| self.matches(item)).collect();
        if self.order.is_some() {
            selected.sort_by(|a, b| self.compare(a, b));
        }
        selected
    }

    /// Counts the items in a slice that pass every filter.
    pub fn count_in(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }

    /// Materialises one page with raw, unclamped parameters.
    ///
    /// Equivalent to [`paginate_with`](Query::paginate_with) on
    /// `PageRequest::new(page_number, page_size)`.
    pub fn paginate<S>(
        &self,
        source: &S,
        page_number: i64,
        page_size: i64,
    ) -> Result<PageResult<T>, S::Error>
    where
        S: DataSource<T> + ?Sized,
    {
        self.paginate_with(source, &PageRequest::new(page_number, page_size))
    }

    /// Materialises one page.
    ///
    /// Issues exactly one count and one windowed fetch against `source`, in
    /// that order. Either error is returned as is and nothing partial comes
    /// back. The two calls are not atomic: if the source changes between
    /// them, `total_count` and `items` may disagree.
    pub fn paginate_with<S>(
        &self,
        source: &S,
        request: &PageRequest,
    ) -> Result<PageResult<T>, S::Error>
    where
        S: DataSource<T> + ?Sized,
    {
        let window = request.window();
        tracing::trace!(
            page_number = request.page_number(),
            page_size = request.page_size(),
            filtered = self.is_filtered(),
            "counting matches"
        );
        let total_count = source.count(self)?;

        tracing::trace!(skip = window.skip, take = window.take, "fetching window");
        let items = source.fetch(self, window)?;

        let page = PageResult::new(items, total_count, *request);
        tracing::debug!(
            page_number = page.page_number,
            page_size = page.page_size,
            total_count = page.total_count,
            total_pages = page.total_pages,
            returned = page.items.len(),
            "page materialised"
        );
        Ok(page)
    }
}

impl<T: 'static> Query<T> {
    /// ANDs a predicate onto the filter.
    pub fn filter<F>(self, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.and_predicate(Predicate::new(test))
    }

    /// ANDs a prebuilt [`Predicate`] onto the filter.
    pub fn and_predicate(mut self, predicate: Predicate<T>) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// ANDs `test` onto the filter only when `condition` holds.
    ///
    /// With `condition == false` the query comes back untouched and `test`
    /// is dropped without ever running.
    pub fn where_if<F>(self, condition: bool, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        if condition {
            self.filter(test)
        } else {
            self
        }
    }

    /// Keeps records where any selector yields text containing `term`.
    ///
    /// Matching is a case-insensitive literal substring test. An absent or
    /// empty term, or an empty selector list, leaves the query untouched.
    /// Selectors returning `None` are skipped for that record; a record
    /// whose selectors all return `None` is excluded.
    pub fn search(self, term: Option<&str>, fields: &[FieldSelector<T>]) -> Self {
        if fields.is_empty() {
            tracing::debug!("search skipped, no fields");
            return self;
        }
        let Some(pattern) = SearchPattern::new(term) else {
            tracing::debug!("search skipped, empty term");
            return self;
        };

        tracing::debug!(term = pattern.term(), fields = fields.len(), "search applied");
        let fields: Arc<[FieldSelector<T>]> = fields.into();
        self.filter(move |item| pattern.matches_any(item, &fields))
    }

    /// ANDs a named-field [`Condition`] onto the filter.
    ///
    /// Unknown field names read as [`Value::None`](crate::Value::None), which
    /// no condition matches.
    pub fn where_field(self, condition: Condition) -> Self
    where
        T: Record,
    {
        self.filter(move |item| condition.matches(&item.field_value(&condition.field)))
    }

    /// [`search`](Query::search) over fields addressed by name.
    ///
    /// Only string-valued fields take part; unknown names and non-text
    /// fields are skipped.
    pub fn search_fields(self, term: Option<&str>, names: &[&str]) -> Self
    where
        T: Record,
    {
        let names: Vec<&'static str> = names
            .iter()
            .filter_map(|name| T::FIELDS.iter().copied().find(|field| field == name))
            .collect();
        if names.is_empty() {
            tracing::debug!("search skipped, no known fields");
            return self;
        }
        let Some(pattern) = SearchPattern::new(term) else {
            tracing::debug!("search skipped, empty term");
            return self;
        };

        tracing::debug!(term = pattern.term(), fields = ?names, "search applied");
        self.filter(move |item| {
            names
                .iter()
                .filter_map(|name| item.field_value(name).as_str())
                .any(|text| pattern.is_match(text))
        })
    }

    /// Orders by a key from the type's own [`SortCatalog`].
    ///
    /// See [`sort_with`](Query::sort_with).
    pub fn sort_by(self, key: Option<&str>, descending: bool) -> Self
    where
        T: Sortable,
    {
        self.sort_with(T::sort_catalog(), key, descending)
    }

    /// Orders by the catalog key named `key`.
    ///
    /// An absent or empty key, or one the catalog does not know, leaves the
    /// query untouched. Lookup is exact and case-sensitive. A resolved key
    /// replaces any earlier ordering; there are no secondary keys.
    pub fn sort_with(
        mut self,
        catalog: &SortCatalog<T>,
        key: Option<&str>,
        descending: bool,
    ) -> Self {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return self;
        };

        match catalog.resolve(key) {
            Some(compare) => {
                self.order = Some(SortOrder {
                    key: key.to_string(),
                    dir: Dir::from_descending(descending),
                    compare: Arc::clone(compare),
                });
            }
            None => {
                tracing::debug!(sort_key = key, "unknown sort key ignored");
            }
        }
        self
    }

    /// Applies the search and sort parts of a [`QueryOptions`].
    ///
    /// Paging is left to the caller:
    ///
    /// ```ignore
    /// let page = Query::new()
    ///     .with_options(&options, &[name, email])
    ///     .paginate_with(&source, &options.page_request())?;
    /// ```
    pub fn with_options(self, options: &QueryOptions, fields: &[FieldSelector<T>]) -> Self
    where
        T: Sortable,
    {
        let query = self.search(options.search_term(), fields);
        match options.sort_spec() {
            Some(spec) => {
                let descending = spec.dir_or(options.sort_descending).is_desc();
                query.sort_by(Some(&spec.key), descending)
            }
            None => query,
        }
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Query::new()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            filter: self.filter.clone(),
            order: self.order.as_ref().map(|order| SortOrder {
                key: order.key.clone(),
                dir: order.dir,
                compare: Arc::clone(&order.compare),
            }),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filtered", &self.is_filtered())
            .field("ordering", &self.ordering())
            .finish()
    }
}
