/// Number of records shown per page
pub const PAGE_SIZE: usize = 9;

/// Number of pages needed for `count` records, 0 when there are none
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice out 1-based page `page`
///
/// Pages outside `[1, total_pages]` yield an empty slice; callers clamp.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }

    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
