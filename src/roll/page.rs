use serde::Serialize;

/// One page of results plus the over-fetch-by-one "is there more" signal.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
}

/// Build a page from rows fetched with `LIMIT page_size + 1`. The extra row,
/// if present, only signals that a next page exists and is not returned.
pub fn page_from_overfetch<T>(mut rows: Vec<T>, page_size: usize) -> Page<T> {
    let has_next_page = rows.len() > page_size;
    rows.truncate(page_size);
    Page { items: rows, has_next_page }
}
