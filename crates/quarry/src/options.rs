//! Per-request query configuration.

use serde::{Deserialize, Serialize};

use crate::page::{PageRequest, DEFAULT_PAGE_SIZE};
use crate::sort::SortSpec;

/// What a caller asks for in one list request.
///
/// Every key is optional; the defaults are page 1, ten records per page, no
/// search, and no sorting. Keys are camelCase so the struct binds straight
/// from a query string or JSON body.
///
/// ```
/// use quarry::QueryOptions;
///
/// let options: QueryOptions =
///     serde_json::from_str(r#"{"pageSize": 500, "sortBy": "age", "sortDescending": true}"#)
///         .unwrap();
///
/// assert_eq!(options.page_request().page_size(), 100);
/// assert_eq!(options.page_request().page_number(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOptions {
    pub page_number: i64,
    pub page_size: i64,
    pub search_term: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: bool,
}

impl QueryOptions {
    /// The clamped page request.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page_number, self.page_size)
    }

    /// The search term, if present and non-empty.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|t| !t.is_empty())
    }

    /// The parsed sort key. A direction written into `sortBy` (`-age`,
    /// `age:desc`) takes precedence over `sortDescending`.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_by.as_deref().and_then(SortSpec::parse)
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE as i64,
            search_term: None,
            sort_by: None,
            sort_descending: false,
        }
    }
}
