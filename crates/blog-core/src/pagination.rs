//! Fixed-size page windows over an already ordered sequence.
//!
//! Pagination never sorts or deduplicates; callers must supply a stable
//! order. Requests past the last page yield an empty page, not an error.

use serde::Serialize;

/// Page size used by every post listing.
pub const POSTS_PER_PAGE: u64 = 10;

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u64,
    size: u64,
}

/// Offset/limit pair handed to the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Parse the `page` query parameter. Anything absent or not a positive
    /// integer selects the first page.
    pub fn from_query(raw: Option<&str>, size: u64) -> Self {
        let number = raw
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|number| *number >= 1)
            .unwrap_or(1);
        Self::new(number, size)
    }

    pub fn first(size: u64) -> Self {
        Self::new(1, size)
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn window(&self) -> Window {
        Window {
            offset: (self.number - 1).saturating_mul(self.size),
            limit: self.size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(POSTS_PER_PAGE)
    }
}

/// One page of records plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Build a page from records the store already sliced with `request.window()`.
    pub fn from_window(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        let total_pages = total_items.div_ceil(request.size()).max(1);
        Self {
            items,
            number: request.number(),
            page_size: request.size(),
            total_items,
            total_pages,
            has_next: request.number() < total_pages,
            has_previous: request.number() > 1,
        }
    }

    /// Slice a complete ordered sequence.
    pub fn paginate(sequence: Vec<T>, request: PageRequest) -> Self {
        let total_items = sequence.len() as u64;
        let window = request.window();
        let items = sequence
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .collect();
        Self::from_window(items, total_items, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
