//! Page slicing
//!
//! Pages are 1-based. A non-positive page or page size disables pagination.

/// Returns page `page` of size `page_size`, or everything when either is `<= 0`
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Vec<T> {
    if page <= 0 || page_size <= 0 {
        return items;
    }

    let size = usize::try_from(page_size).unwrap_or(usize::MAX);
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(size))
        .unwrap_or(usize::MAX);

    items.into_iter().skip(start).take(size).collect()
}
