//! Sort directions, sort catalogs, and sort specs.
//!
//! A [`SortCatalog`] maps sort-key strings to typed comparison closures. It is
//! built once per record type and consulted whenever a caller asks to sort by
//! a name that arrived as text (typically a URL query parameter). Names that
//! are not in the catalog resolve to nothing, and the query is left as is.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::sort_values;

/// Shared comparison closure over two records.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// `Desc` when `descending` is set, `Asc` otherwise.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("asc") || name.eq_ignore_ascii_case("ascending") {
            Some(Dir::Asc)
        } else if name.eq_ignore_ascii_case("desc") || name.eq_ignore_ascii_case("descending") {
            Some(Dir::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from sort-key names to comparators for one record type.
///
/// # Example
///
/// ```
/// use quarry::SortCatalog;
///
/// struct Ride {
///     fare: u32,
///     city: String,
/// }
///
/// let catalog = SortCatalog::new()
///     .key("fare", |r: &Ride| r.fare)
///     .key_by("city", |a: &Ride, b: &Ride| a.city.cmp(&b.city));
///
/// assert!(catalog.contains("fare"));
/// assert!(catalog.resolve("Fare").is_none());
/// ```
pub struct SortCatalog<T> {
    keys: BTreeMap<String, Comparator<T>>,
}

impl<T: 'static> SortCatalog<T> {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        SortCatalog {
            keys: BTreeMap::new(),
        }
    }

    /// Registers a key ordered by the value `extract` returns.
    pub fn key<K, F>(self, name: impl Into<String>, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.key_by(name, move |a, b| extract(a).cmp(&extract(b)))
    }

    /// Registers a key with an explicit ascending comparison.
    ///
    /// A name registered twice keeps the last comparator.
    pub fn key_by<F>(mut self, name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.keys.insert(name.into(), Arc::new(compare));
        self
    }

    /// Builds a catalog with one key per [`Record::FIELDS`] entry.
    ///
    /// Keys order by [`sort_values`](crate::sort_values): NaN after every
    /// other number, mismatched kinds grouped by kind, absent values last.
    pub fn from_record() -> Self
    where
        T: Record,
    {
        T::FIELDS.iter().fold(SortCatalog::new(), |catalog, &field| {
            catalog.key_by(field, move |a: &T, b: &T| {
                sort_values(&a.field_value(field), &b.field_value(field))
            })
        })
    }
}

impl<T> SortCatalog<T> {
    /// Looks up a key by exact, case-sensitive name.
    pub fn resolve(&self, name: &str) -> Option<&Comparator<T>> {
        self.keys.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    /// Registered key names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<T: 'static> Default for SortCatalog<T> {
    fn default() -> Self {
        SortCatalog::new()
    }
}

impl<T> fmt::Debug for SortCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortCatalog")
            .field("keys", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A parsed sort request: a key name and an optional explicit direction.
///
/// Accepted spellings are `age`, `-age`, `+age`, `age:desc`, and `age desc`.
/// Parsing never fails on a non-blank key; an unrecognised direction word
/// leaves the direction unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub dir: Option<Dir>,
}

impl SortSpec {
    /// Parses a sort spec. Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<SortSpec> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(key) = input.strip_prefix('-') {
            return Self::keyed(key, Some(Dir::Desc));
        }
        if let Some(key) = input.strip_prefix('+') {
            return Self::keyed(key, Some(Dir::Asc));
        }

        let split = input
            .split_once(':')
            .or_else(|| input.split_once(char::is_whitespace));
        match split {
            Some((key, dir)) => Self::keyed(key, Dir::from_name(dir.trim())),
            None => Self::keyed(input, None),
        }
    }

    /// Direction to use, falling back to `descending` when none was written.
    pub fn dir_or(&self, descending: bool) -> Dir {
        self.dir.unwrap_or(Dir::from_descending(descending))
    }

    fn keyed(key: &str, dir: Option<Dir>) -> Option<SortSpec> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(SortSpec {
            key: key.to_string(),
            dir,
        })
    }
}
