//! Page-by-page collection of list endpoints.

use std::future::Future;

use crate::error::Result;
use crate::types::{Page, PaginationParams};

/// Fetch every page starting at page 1 and concatenate the items.
///
/// Stops when:
/// - a page is empty
/// - an envelope page reports `total_pages` and that page has been reached
/// - a page holds fewer items than `page_size` (bare pages, and envelopes without `total_pages`)
///
/// The total count is never assumed up front.
pub async fn paginate<T, F, Fut>(page_size: u32, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PaginationParams) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut params = PaginationParams { page: 1, page_size }.validated(u32::MAX);
    let mut all = Vec::new();

    loop {
        let page = fetch_page(params).await?;
        let last = is_last_page(&page, params);
        let items = page.into_items();
        log::debug!("page {} returned {} items", params.page, items.len());
        all.extend(items);

        if last {
            return Ok(all);
        }
        params = params.next();
    }
}

fn is_last_page<T>(page: &Page<T>, params: PaginationParams) -> bool {
    let len = page.items().len();
    if len == 0 {
        return true;
    }
    let short = u32::try_from(len).is_ok_and(|n| n < params.page_size);
    match page {
        Page::Envelope {
            total_pages: Some(total),
            ..
        } => params.page >= *total,
        Page::Envelope {
            total_pages: None, ..
        }
        | Page::Bare(_) => short,
    }
}
