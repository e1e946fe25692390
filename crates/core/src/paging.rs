//! Page slicing over an already filtered sequence.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    /// 1-based page actually shown after clamping the request.
    pub effective_page: usize,
}

/// Number of pages needed for `len` items; never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slices out the requested 1-based page. Out-of-range requests are clamped.
pub fn paginate<T>(filtered: &[T], page_size: usize, requested_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(filtered.len(), page_size);
    let effective_page = requested_page.clamp(1, total_pages);

    let start = ((effective_page - 1) * page_size).min(filtered.len());
    let end = (start + page_size).min(filtered.len());

    Page {
        items: &filtered[start..end],
        total_pages,
        effective_page,
    }
}
