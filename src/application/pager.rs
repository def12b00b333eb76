//! Cursor-based traversal of paged Graph API results.
//!
//! A [`Pager`] holds the current page payload. Callers decode it, then call
//! [`Pager::next_page`] whether or not decoding worked:
//!
//! ```text
//! loop {
//!     match pager.decode::<Batch<T>>() { ... }
//!     if !pager.next_page().await { break; }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{AppError, GraphApi, Result};

/// Paging state over one edge (conversations, messages, ...).
pub struct Pager<'a, A> {
    api: &'a A,
    kind: &'static str,
    current: Value,
    number: usize,
}

impl<'a, A: GraphApi> Pager<'a, A> {
    /// Start paging from the first response of an edge. `kind` labels log
    /// lines.
    pub fn new(api: &'a A, kind: &'static str, first: Value) -> Self {
        tracing::info!(page = 1, "Process {kind} page 1");
        Self {
            api,
            kind,
            current: first,
            number: 1,
        }
    }

    /// 1-based number of the current page.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Decode the current page into a typed container.
    ///
    /// # Errors
    /// Returns error if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.current).map_err(AppError::json_parse)
    }

    /// The `paging.next` URL of the current page, if any.
    fn next_url(&self) -> Option<&str> {
        self.current
            .get("paging")
            .and_then(|p| p.get("next"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Fetch the next page. `Ok(false)` means the cursor is exhausted.
    ///
    /// # Errors
    /// Returns the fetch error; the current page is left in place.
    pub async fn advance(&mut self) -> Result<bool> {
        let Some(url) = self.next_url() else {
            return Ok(false);
        };
        let next = self.api.get_url(url).await?;

        self.current = next;
        self.number += 1;
        tracing::info!(page = self.number, "Process {} page {}", self.kind, self.number);
        Ok(true)
    }

    /// [`Pager::advance`] with errors logged and treated as the last page.
    pub async fn next_page(&mut self) -> bool {
        match self.advance().await {
            Ok(more) => more,
            Err(e) => {
                tracing::warn!(kind = self.kind, page = self.number, error = %e, "Fetch next page failed, stopping");
                false
            }
        }
    }
}
