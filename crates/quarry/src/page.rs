//! Page requests and page results.
//!
//! Page numbers are 1-based. Out-of-range input is clamped, never rejected:
//! a page number below 1 becomes 1, and a page size outside
//! `1..=MAX_PAGE_SIZE` is pulled to the nearest bound.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a caller can get.
pub const MAX_PAGE_SIZE: usize = 100;

/// A normalised page request.
///
/// Deserialises from `{"pageNumber": .., "pageSize": ..}` with both keys
/// optional and any integer accepted.
///
/// ```
/// use quarry::PageRequest;
///
/// let request = PageRequest::new(0, 500);
/// assert_eq!(request.page_number(), 1);
/// assert_eq!(request.page_size(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPageRequest", rename_all = "camelCase")]
pub struct PageRequest {
    page_number: usize,
    page_size: usize,
}

impl PageRequest {
    /// Clamps raw parameters: page numbers below 1 become 1, page sizes go
    /// into `1..=MAX_PAGE_SIZE`.
    pub fn new(page_number: i64, page_size: i64) -> Self {
        PageRequest {
            page_number: clamp(page_number, 1, usize::MAX),
            page_size: clamp(page_size, 1, MAX_PAGE_SIZE),
        }
    }

    /// One-based page number.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Records per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The skip/take window this page covers.
    pub fn window(&self) -> Window {
        Window {
            skip: (self.page_number - 1).saturating_mul(self.page_size),
            take: self.page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn clamp(value: i64, min: usize, max: usize) -> usize {
    usize::try_from(value)
        .unwrap_or(if value < 0 { min } else { max })
        .clamp(min, max)
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPageRequest {
    page_number: i64,
    page_size: i64,
}

impl Default for RawPageRequest {
    fn default() -> Self {
        RawPageRequest {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE as i64,
        }
    }
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        PageRequest::new(raw.page_number, raw.page_size)
    }
}

/// Records to skip, then records to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub skip: usize,
    pub take: usize,
}

/// One materialised page and its metadata.
///
/// Serialises as the paginated envelope:
///
/// ```json
/// {"items": [..], "pageNumber": 1, "pageSize": 10, "totalCount": 42,
///  "totalPages": 5, "hasPreviousPage": false, "hasNextPage": true}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PageResult<T> {
    /// Assembles a page from fetched items and the total match count.
    pub fn new(items: Vec<T>, total_count: usize, request: PageRequest) -> Self {
        let total_pages = total_count.div_ceil(request.page_size);
        PageResult {
            items,
            page_number: request.page_number,
            page_size: request.page_size,
            total_count,
            total_pages,
            has_previous_page: request.page_number > 1,
            has_next_page: request.page_number < total_pages,
        }
    }

    /// Converts the items, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
