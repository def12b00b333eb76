//! Boundaries to the remote Graph API.
//!
//! The application layer only sees these traits; `infrastructure::GraphClient`
//! implements both over HTTP and tests substitute in-memory stubs.

use serde_json::Value;

use super::{LongLivedToken, Result};

/// Read access to Graph API objects.
#[allow(async_fn_in_trait)]
pub trait GraphApi {
    /// GET a node or edge relative to the API root, e.g. `/me` or
    /// `/{page-id}/conversations`.
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value>;

    /// GET an absolute URL handed out by the API, such as `paging.next`.
    async fn get_url(&self, url: &str) -> Result<Value>;
}

/// Exchange of a short-lived token for a long-lived one.
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    async fn exchange_token(
        &self,
        app_id: &str,
        app_secret: &str,
        short_lived_token: &str,
    ) -> Result<LongLivedToken>;
}
