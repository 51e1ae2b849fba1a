//! Quarry - search, dynamic sorting and pagination for record collections.
//!
//! Quarry shapes list requests of the "page 2, ten per page, matching `ana`,
//! newest first" kind. A [`Query`] is built lazily from:
//!
//! - free-text search across any number of optional text fields
//! - predicates applied only when a guard holds ([`Query::where_if`])
//! - a sort key that arrives as a string and is resolved against the record
//!   type's [`SortCatalog`]
//!
//! and is then materialised one page at a time against a [`DataSource`]:
//! one count, one windowed fetch, one [`PageResult`].
//!
//! # Quick Start
//!
//! ```rust
//! use quarry::{Query, QueryOptions, Record};
//!
//! #[derive(Debug, Clone, Record)]
//! struct Driver {
//!     #[record(String)]
//!     name: String,
//!     #[record(String)]
//!     city: Option<String>,
//!     #[record(Number)]
//!     rating: u8,
//! }
//!
//! fn name(d: &Driver) -> Option<&str> {
//!     Some(&d.name)
//! }
//!
//! fn city(d: &Driver) -> Option<&str> {
//!     d.city.as_deref()
//! }
//!
//! let drivers = vec![
//!     Driver { name: "Ines".into(), city: Some("Porto".into()), rating: 4 },
//!     Driver { name: "Tomas".into(), city: None, rating: 5 },
//!     Driver { name: "Rita".into(), city: Some("Lisbon".into()), rating: 3 },
//! ];
//!
//! let options = QueryOptions {
//!     search_term: Some("o".into()),
//!     sort_by: Some("rating".into()),
//!     sort_descending: true,
//!     page_size: 2,
//!     ..QueryOptions::default()
//! };
//!
//! let page = Query::<Driver>::new()
//!     .with_options(&options, &[name, city])
//!     .paginate_with(&drivers, &options.page_request())
//!     .unwrap();
//!
//! assert_eq!(page.total_count, 3);
//! assert_eq!(page.items[0].name, "Tomas");
//! assert!(page.has_next_page);
//! ```
//!
//! # Leniency
//!
//! Malformed input never fails a query. Page numbers below 1 become 1, page
//! sizes are clamped to `1..=100`, empty search terms and unknown sort keys
//! are ignored. The only errors a caller sees are the ones its
//! [`DataSource`] reports.
//!
//! # Consistency
//!
//! Pagination counts and fetches in two separate source calls. A source that
//! accepts concurrent writes may change between them, in which case the
//! page's `total_count` and `items` describe slightly different data.

extern crate self as quarry;

mod condition;
mod error;
mod options;
mod page;
mod predicate;
mod query;
mod record;
mod search;
mod sort;
mod source;
mod value;

pub use condition::{Condition, Op, Operand};
pub use error::{Result, SourceError};
pub use options::QueryOptions;
pub use page::{PageRequest, PageResult, Window, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use predicate::Predicate;
pub use query::Query;
pub use record::{Record, RecordTimestamp, Sortable};
pub use search::{FieldSelector, SearchPattern};
pub use sort::{Comparator, Dir, SortCatalog, SortSpec};
pub use source::{DataSource, SharedSource};
pub use value::{compare_values, sort_values, Number, Timestamp, Value};

pub use quarry_macros::Record;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
