//! Cursor pagination driven to completion or to a total-result cap.
//!
//! Every paged read (projects, sections, tasks, comments, filter) goes
//! through [`collect_pages`].

use std::future::Future;

use todoist_client::{ClientResult, Page, PageRequest};
use tracing::debug;

/// Largest page the remote service returns.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Total cap used when the caller omits `nmax` or supplies a negative one.
pub const DEFAULT_NMAX: usize = 100;

/// Per-page size and total cap for one aggregated read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    page_size: u32,
    nmax: Option<usize>,
}

impl PageLimits {
    /// `limit` is the requested page size; `nmax` is the total cap, `None`
    /// meaning unbounded.
    pub fn new(limit: Option<i64>, nmax: Option<i64>) -> Self {
        let requested = match limit {
            Some(l) if l > 0 => u32::try_from(l).unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE),
            _ => MAX_PAGE_SIZE,
        };
        let nmax = nmax.map(|n| usize::try_from(n).unwrap_or(DEFAULT_NMAX));
        let page_size = match nmax {
            Some(cap) if cap > 0 => requested.min(u32::try_from(cap).unwrap_or(MAX_PAGE_SIZE)),
            _ => requested,
        };
        Self { page_size, nmax }
    }

    /// Fetch everything, largest pages.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn nmax(&self) -> Option<usize> {
        self.nmax
    }
}

/// Resolve the tool-level `nmax` argument: absent means the default
/// cap, explicit `null` means unbounded.
pub fn requested_nmax(arg: Option<Option<i64>>) -> Option<i64> {
    match arg {
        None => Some(DEFAULT_NMAX as i64),
        Some(value) => value,
    }
}

/// Drive `fetch` page by page until the cap is reached, a short page
/// arrives, or the service stops returning a cursor.
///
/// Pages are requested strictly in sequence.
pub async fn collect_pages<T, F, Fut>(limits: PageLimits, mut fetch: F) -> ClientResult<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = ClientResult<Page<T>>>,
{
    if limits.nmax == Some(0) {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 0usize;

    loop {
        page_number += 1;
        let page = fetch(PageRequest {
            cursor: cursor.take(),
            limit: limits.page_size,
        })
        .await?;

        let fetched = page.results.len();
        items.extend(page.results);
        debug!(
            page = page_number,
            fetched,
            total = items.len(),
            "Fetched page"
        );

        if let Some(cap) = limits.nmax {
            if items.len() >= cap {
                items.truncate(cap);
                break;
            }
        }
        if fetched < limits.page_size as usize {
            break;
        }
        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}
