//! Incremental search that accumulates result pages.

use tracing::debug;

use super::{AniList, Media, PageInfo};
use crate::error::GatewayError;

/// Running search state: the current term, every result loaded so far, and
/// the pagination metadata of the last page fetched.
///
/// A failed fetch leaves the previous state untouched.
#[derive(Debug, Clone)]
pub struct SearchSession {
    api: AniList,
    term: String,
    results: Vec<Media>,
    page_info: Option<PageInfo>,
}

impl SearchSession {
    pub fn new(api: AniList) -> Self {
        Self {
            api,
            term: String::new(),
            results: Vec::new(),
            page_info: None,
        }
    }

    /// Starts a new search from page 1, replacing previous results.
    ///
    /// A blank term clears the session without touching the network.
    pub async fn search(&mut self, term: &str) -> Result<&[Media], GatewayError> {
        let term = term.trim();
        if term.is_empty() {
            self.reset();
            return Ok(self.results.as_slice());
        }

        let page = self.api.search(term, 1).await?;
        debug!(term, total = page.page_info.total, "search started");
        self.term = term.to_owned();
        self.results = page.media;
        self.page_info = Some(page.page_info);
        Ok(self.results.as_slice())
    }

    /// Appends the next page if there is one; otherwise a no-op.
    pub async fn load_more(&mut self) -> Result<&[Media], GatewayError> {
        let Some(next) = self.next_page() else {
            return Ok(self.results.as_slice());
        };

        let page = self.api.search(&self.term, next).await?;
        debug!(term = %self.term, page = next, "search page appended");
        self.results.extend(page.media);
        self.page_info = Some(page.page_info);
        Ok(self.results.as_slice())
    }

    pub fn reset(&mut self) {
        self.term.clear();
        self.results.clear();
        self.page_info = None;
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn results(&self) -> &[Media] {
        &self.results
    }

    pub fn has_more(&self) -> bool {
        self.next_page().is_some()
    }

    /// Total matches reported by the service, 0 before the first search.
    pub fn total(&self) -> u32 {
        self.page_info.map_or(0, |info| info.total)
    }

    /// Last page loaded, 0 before the first search.
    pub fn current_page(&self) -> u32 {
        self.page_info.map_or(0, |info| info.current_page)
    }

    fn next_page(&self) -> Option<u32> {
        self.page_info
            .filter(|info| info.has_next_page)
            .and_then(|info| info.current_page.checked_add(1))
    }
}
