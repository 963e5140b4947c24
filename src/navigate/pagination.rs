//! Listing pagination

/// Entries per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// A bounded slice of an ordered listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice `items` into the page at `page_index`.
///
/// An out-of-range index yields an empty page whose flags still tell the
/// caller which way to go.
pub fn paginate<T: Clone>(items: &[T], page_index: usize, page_size: usize) -> Page<T> {
    let start = page_index.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        index: page_index,
        has_previous: page_index > 0,
        has_next: page_size > 0 && end < items.len(),
    }
}

/// Number of pages needed for `len` items, at least one
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}
