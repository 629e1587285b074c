//! Authenticated platform HTTP client.
//!
//! One client implementation covers all three platforms; only the auth
//! header scheme and the error-body shape differ, and both are handled
//! here so the per-platform exporters never touch raw HTTP concerns.
//!
//! ## 401 handling
//!
//! An expired access token surfaces as a 401 on an ordinary call. The
//! client then refreshes the token through [`TokenManager`] and retries
//! the call exactly once. A second 401 (or any other failure on the
//! retry) is surfaced as [`ExportError::RefreshRetryFailed`] - there is
//! no refresh loop.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{ExportError, Platform, ProviderAccount};
use super::token::TokenManager;

/// How a platform expects its access token presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Standard OAuth2 `Authorization: Bearer <token>` (Spotify, Google)
    Bearer,
    /// Legacy `Authorization: OAuth <token>` (SoundCloud)
    OAuth,
}

impl AuthScheme {
    fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {token}"),
            AuthScheme::OAuth => format!("OAuth {token}"),
        }
    }
}

/// Authenticated JSON-over-HTTP client for one platform.
pub struct ApiClient {
    http: reqwest::Client,
    platform: Platform,
    scheme: AuthScheme,
    tokens: Arc<TokenManager>,
}

impl ApiClient {
    /// Create a client for the given platform and auth scheme.
    pub fn new(platform: Platform, scheme: AuthScheme, tokens: Arc<TokenManager>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            platform,
            scheme,
            tokens,
        }
    }

    /// The platform this client talks to.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Issue an authenticated request and return the parsed JSON body.
    ///
    /// 200/201 responses parse to a [`Value`] (empty bodies become
    /// `Value::Null`). Any other status becomes
    /// [`ExportError::ApiRequestFailed`] with a best-effort message
    /// extracted from the error body. A 401 triggers the
    /// refresh-and-retry-once policy described in the module docs.
    pub async fn request(
        &self,
        account: &ProviderAccount,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ExportError> {
        let token = self.tokens.valid_access_token(account).await?;

        match self.send(method.clone(), url, body, &token).await {
            Err(err) if err.is_status(401) => {
                debug!(platform = %self.platform, url, "got 401, attempting token refresh");

                if !self.tokens.has_refresh_token(account).await {
                    return Err(ExportError::TokenExpiredNoRefresh);
                }
                let new_token = self.tokens.refresh_access_token(account).await?;

                self.send(method, url, body, &new_token)
                    .await
                    .map_err(|retry_err| ExportError::RefreshRetryFailed(retry_err.to_string()))
            }
            other => other,
        }
    }

    /// One wire round trip with the given token.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: &str,
    ) -> Result<Value, ExportError> {
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, self.scheme.header_value(token));
        if let Some(body) = body {
            request = request.json(body);
        }

        // Wire-level failures collapse into the same error kind as
        // non-2xx responses, with status 0
        let response = request.send().await.map_err(|e| ExportError::ApiRequestFailed {
            platform: self.platform,
            status: 0,
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        if status == 200 || status == 201 {
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| {
                warn!(platform = %self.platform, url, error = %e, "unparseable success body");
                ExportError::ApiRequestFailed {
                    platform: self.platform,
                    status,
                    message: format!("invalid JSON in response: {e}"),
                }
            });
        }

        Err(ExportError::ApiRequestFailed {
            platform: self.platform,
            status,
            message: extract_error_message(&text),
        })
    }
}

/// Pull a human-readable message out of an error body.
///
/// Tries, in order: `error.message`, `error.errors` serialized, a bare
/// top-level `message`, then gives up. The three platforms each use a
/// different one of these shapes.
fn extract_error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return "Unknown error".to_string();
    };

    if let Some(message) = parsed
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return message.to_string();
    }
    if let Some(errors) = parsed.get("error").and_then(|e| e.get("errors")) {
        return errors.to_string();
    }
    if let Some(message) = parsed.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    "Unknown error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::config::ExportConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, scheme: AuthScheme) -> ApiClient {
        let tokens = Arc::new(
            TokenManager::new(Arc::new(ExportConfig::default())).with_token_url(
                Platform::Spotify,
                format!("{}/oauth/token", server.uri()),
            ),
        );
        ApiClient::new(Platform::Spotify, scheme, tokens)
    }

    #[tokio::test]
    async fn test_success_returns_parsed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .and(header("authorization", "Bearer good-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "user-1"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let account = ProviderAccount::connected(Platform::Spotify, "good-token", None);

        let body = client
            .request(&account, Method::GET, &format!("{}/v1/me", server.uri()), None)
            .await
            .unwrap();
        assert_eq!(body["id"], "user-1");
    }

    #[tokio::test]
    async fn test_created_and_empty_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "new"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);

        let created = client
            .request(
                &account,
                Method::POST,
                &format!("{}/create", server.uri()),
                Some(&serde_json::json!({"name": "x"})),
            )
            .await
            .unwrap();
        assert_eq!(created["id"], "new");

        let updated = client
            .request(&account, Method::PUT, &format!("{}/update", server.uri()), None)
            .await
            .unwrap();
        assert!(updated.is_null());
    }

    #[tokio::test]
    async fn test_oauth_scheme_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "OAuth legacy-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::OAuth);
        let account = ProviderAccount::connected(Platform::Spotify, "legacy-token", None);

        client
            .request(&account, Method::GET, &server.uri(), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_message_extraction_order() {
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "Invalid id", "status": 400}}"#),
            "Invalid id"
        );
        let serialized =
            extract_error_message(r#"{"error": {"errors": [{"reason": "quotaExceeded"}]}}"#);
        assert!(serialized.contains("quotaExceeded"));
        assert_eq!(
            extract_error_message(r#"{"message": "Top level"}"#),
            "Top level"
        );
        assert_eq!(extract_error_message(r#"{"code": 500}"#), "Unknown error");
        assert_eq!(extract_error_message("not json"), "Unknown error");
    }

    #[tokio::test]
    async fn test_non_success_status_fails_with_extracted_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"message": "Not found", "status": 404}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);

        let err = client
            .request(&account, Method::GET, &server.uri(), None)
            .await
            .unwrap_err();
        match err {
            ExportError::ApiRequestFailed {
                status, message, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_401_without_refresh_token_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let account = ProviderAccount::connected(Platform::Spotify, "expired", None);

        let err = client
            .request(&account, Method::GET, &server.uri(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::TokenExpiredNoRefresh));
    }

    #[tokio::test]
    async fn test_401_refresh_retry_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/data"))
            .and(header("authorization", "Bearer expired"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/data"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let account =
            ProviderAccount::connected(Platform::Spotify, "expired", Some("refresh".into()));

        let body = client
            .request(
                &account,
                Method::GET,
                &format!("{}/v1/data", server.uri()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(account.access_token().await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_401_after_refresh_is_not_retried_again() {
        let server = MockServer::start().await;
        // Both the original call and the post-refresh retry come back 401;
        // expect exactly two data calls, never a third
        Mock::given(method("GET"))
            .and(path("/v1/data"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let account =
            ProviderAccount::connected(Platform::Spotify, "expired", Some("refresh".into()));

        let err = client
            .request(
                &account,
                Method::GET,
                &format!("{}/v1/data", server.uri()),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::RefreshRetryFailed(_)));
    }
}
