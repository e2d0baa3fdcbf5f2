use crate::domain::value_objects::Pagination;

pub mod chatroom;
pub mod information;
pub mod suggestions;
pub mod users;

/// `(page, limit, total_pages)` as echoed back in page envelopes.
pub(crate) fn page_meta(total: u64, pagination: Pagination) -> (u64, u64, u64) {
    let page = if pagination.is_unpaginated() {
        1
    } else {
        pagination.page.max(1)
    };
    (page, pagination.limit, pagination.total_pages(total))
}
