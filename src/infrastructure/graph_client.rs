//! HTTP client for the Facebook Graph API.
//!
//! Implements the domain ports with `reqwest`. Requests are sent one at a
//! time; no retries or timeouts beyond the client defaults.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AppError, GraphApi, LongLivedToken, Result, TokenExchange};

/// Default API root, used unless `--graph-url` / `FB_GRAPH_URL` says otherwise.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

/// Error envelope returned by the Graph API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    code: i64,
}

/// Graph API client bound to one access token.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl GraphClient {
    /// Create a client for the given API root. The access token is empty
    /// until set with [`GraphClient::with_access_token`].
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("fbexporter/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: String::new(),
        })
    }

    /// Bind the client to an access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode the JSON body, mapping API errors.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::http(format!("Request {what} failed"), e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::http(format!("Failed to read response of {what}"), e))?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
            let GraphErrorBody {
                message,
                kind,
                code,
            } = envelope.error;
            tracing::debug!(%what, status = status.as_u16(), %kind, code, "Graph API error");
            return Err(AppError::Graph {
                status: status.as_u16(),
                message: format!("{what}: {message}"),
            });
        }

        if !status.is_success() {
            return Err(AppError::Graph {
                status: status.as_u16(),
                message: format!("{what}: {text}"),
            });
        }

        serde_json::from_str(&text).map_err(AppError::json_parse)
    }
}

impl GraphApi for GraphClient {
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!(%path, "GET");
        let request = self
            .http
            .get(self.url(path))
            .query(params)
            .query(&[("access_token", self.access_token.as_str())]);

        self.send(request, &format!("GET {path}")).await
    }

    async fn get_url(&self, url: &str) -> Result<Value> {
        tracing::trace!(%url, "GET next page");
        self.send(self.http.get(url), "GET next page").await
    }
}

impl TokenExchange for GraphClient {
    async fn exchange_token(
        &self,
        app_id: &str,
        app_secret: &str,
        short_lived_token: &str,
    ) -> Result<LongLivedToken> {
        let request = self.http.post(self.url("/oauth/access_token")).query(&[
            ("grant_type", "fb_exchange_token"),
            ("client_id", app_id),
            ("client_secret", app_secret),
            ("fb_exchange_token", short_lived_token),
        ]);

        let body = self.send(request, "token exchange").await?;
        serde_json::from_value(body).map_err(AppError::json_parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> GraphClient {
        GraphClient::new(server.base_url())
            .unwrap()
            .with_access_token("page-token")
    }

    #[tokio::test]
    async fn test_get_sends_access_token_and_params() {
        let server = MockServer::start_async().await;

        let me_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/me")
                .query_param("access_token", "page-token")
                .query_param("fields", "id,name");
            then.status(200)
                .json_body(json!({"id": "1234", "name": "My Page"}));
        });

        let body = client(&server)
            .get("/me", &[("fields", "id,name")])
            .await
            .unwrap();

        assert_eq!(body["id"], "1234");
        me_mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_get_surfaces_graph_error_message() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(GET).path("/1234/conversations");
            then.status(400).json_body(json!({
                "error": {
                    "message": "Invalid OAuth access token.",
                    "type": "OAuthException",
                    "code": 190
                }
            }));
        });

        let err = client(&server)
            .get("/1234/conversations", &[])
            .await
            .unwrap_err();

        match err {
            AppError::Graph { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid OAuth access token."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_rejects_non_json_success_body() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(GET).path("/me");
            then.status(200).body("<html>oops</html>");
        });

        let err = client(&server).get("/me", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::JsonParse { .. }));
    }

    #[tokio::test]
    async fn test_get_url_follows_absolute_url() {
        let server = MockServer::start_async().await;

        let next_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/t_1/messages")
                .query_param("after", "CURSOR");
            then.status(200).json_body(json!({"data": []}));
        });

        let url = format!("{}?after=CURSOR", server.url("/t_1/messages"));
        let body = client(&server).get_url(&url).await.unwrap();

        assert_eq!(body["data"], json!([]));
        next_mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_exchange_token_parses_response() {
        let server = MockServer::start_async().await;

        let exchange_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth/access_token")
                .query_param("grant_type", "fb_exchange_token")
                .query_param("client_id", "app")
                .query_param("client_secret", "secret")
                .query_param("fb_exchange_token", "short");
            then.status(200).json_body(json!({
                "access_token": "long",
                "token_type": "bearer",
                "expires_in": 5_183_944
            }));
        });

        let token = GraphClient::new(server.base_url())
            .unwrap()
            .exchange_token("app", "secret", "short")
            .await
            .unwrap();

        assert_eq!(
            token,
            LongLivedToken {
                access_token: "long".into(),
                expires_in: 5_183_944,
            }
        );
        exchange_mock.assert_calls(1);
    }

    /// Full error text, including every `source()` in the chain.
    fn error_chain(err: &AppError) -> String {
        let mut text = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(inner) = source {
            text.push_str(&format!(" | {inner}"));
            source = inner.source();
        }
        text
    }

    #[tokio::test]
    async fn test_transport_error_hides_credentials() {
        // Nothing listens on port 1, so every request fails to connect.
        let closed = "http://127.0.0.1:1";

        let err = GraphClient::new(closed)
            .unwrap()
            .exchange_token("app", "TOPSECRET", "SHORTTOK")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http { .. }));
        let text = error_chain(&err);
        assert!(!text.contains("TOPSECRET"), "{text}");
        assert!(!text.contains("SHORTTOK"), "{text}");

        let client = GraphClient::new(closed)
            .unwrap()
            .with_access_token("PAGE_TOKEN_XYZ");

        let err = client.get("/me", &[("fields", "id,name")]).await.unwrap_err();
        assert!(matches!(err, AppError::Http { .. }));
        assert!(!error_chain(&err).contains("PAGE_TOKEN_XYZ"));

        let err = client
            .get_url(&format!("{closed}/t_1/messages?access_token=PAGE_TOKEN_XYZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http { .. }));
        assert!(!error_chain(&err).contains("PAGE_TOKEN_XYZ"));
    }
}
