//! Generic JSON request wrapper for the crowdfunding admin API.
//!
//! `HttpClient` resolves endpoints against the configured base URL, appends
//! query parameters, sends JSON bodies and turns every non-success response
//! into a single `ApiError`. Session continuity comes from the cookie jar
//! shared with the [`SessionStore`] and the bearer token read from it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::SessionStore;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Per-request options: method, JSON body, extra headers and query parameters.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
            params: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// API client for the admin backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpClient {
    /// Create a client for `base_url`, sending cookies from the session's jar
    pub fn new(base_url: &str, session: Arc<SessionStore>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(session.jar())
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Build the full request URL.
    ///
    /// Relative endpoints are joined to the base with exactly one slash;
    /// parameters are appended after any query already in the endpoint.
    pub fn resolve_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url, ApiError> {
        let raw = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        };

        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    fn build_headers(&self, options: &RequestOptions, has_body: bool) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if has_body {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidEndpoint(format!("invalid session token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        // Caller-supplied headers win on collision
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidEndpoint(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidEndpoint(format!("invalid header value: {}", e)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Send a request and decode the JSON response as `T`.
    ///
    /// The response shape is trusted; no schema validation beyond `T`'s
    /// deserializer happens here.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let result = self.send(endpoint, &options).await;
        if let Err(ref e) = result {
            warn!(method = %options.method, endpoint, error = %e, "API request failed");
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, options: &RequestOptions) -> Result<T, ApiError> {
        let url = self.resolve_url(endpoint, &options.params)?;

        // Read-only verbs never carry a body
        let read_only = matches!(options.method, Method::GET | Method::HEAD);
        let body = match &options.body {
            Some(body) if !read_only => Some(serde_json::to_vec(body)?),
            Some(_) => {
                debug!(method = %options.method, "Dropping body on read-only request");
                None
            }
            None => None,
        };

        let headers = self.build_headers(options, body.is_some())?;
        let mut builder = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        debug!(method = %options.method, url = %url, "Sending API request");
        let response = builder.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        // Empty bodies decode as JSON null so `()` and `Option<_>` work
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            ApiError::InvalidResponse(format!("{} (body: {})", e, ApiError::truncate_body(text)))
        })
    }

    // ===== Convenience wrappers =====

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::get()).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::get().params(params.iter().cloned()))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::POST).json(body)?)
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::PUT).json(body)?)
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.request(endpoint, RequestOptions::new(Method::DELETE)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthUser;
    use mockito::Matcher;
    use serde_json::json;
    use tokio::net::TcpListener;

    use crate::auth::AuthError;

    fn client_for(base_url: &str) -> HttpClient {
        client_with_timeout(base_url, Duration::from_secs(5))
    }

    fn client_with_timeout(base_url: &str, timeout: Duration) -> HttpClient {
        let cookie_url = Url::parse(base_url).unwrap();
        let session = Arc::new(SessionStore::in_memory(cookie_url));
        HttpClient::new(base_url, session, timeout).unwrap()
    }

    /// Accepts connections and closes them without answering
    async fn closing_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });
        format!("http://{}/api", addr)
    }

    /// Accepts connections and keeps them open without answering
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                open.push(stream);
            }
        });
        format!("http://{}/api", addr)
    }

    #[test]
    fn test_resolve_url_joins_with_single_slash() {
        for base in ["http://api.test/api", "http://api.test/api/"] {
            let client = client_for(base);
            for endpoint in ["/category/all", "category/all"] {
                let url = client.resolve_url(endpoint, &[]).unwrap();
                assert_eq!(url.as_str(), "http://api.test/api/category/all");
            }
        }
    }

    #[test]
    fn test_resolve_url_absolute_endpoint() {
        let client = client_for("http://api.test/api");
        let url = client
            .resolve_url("https://other.test/projects/admin/all", &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://other.test/projects/admin/all");
    }

    #[test]
    fn test_resolve_url_appends_params() {
        let client = client_for("http://api.test/api");

        let params = vec![("page".to_string(), "1".to_string())];
        let url = client.resolve_url("/users", &params).unwrap();
        assert_eq!(url.as_str(), "http://api.test/api/users?page=1");

        let params = vec![
            ("page".to_string(), "2".to_string()),
            ("q".to_string(), "a b&c".to_string()),
        ];
        let url = client.resolve_url("/users?status=active", &params).unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.test/api/users?status=active&page=2&q=a+b%26c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let cookie_url = Url::parse("http://api.test").unwrap();
        let session = Arc::new(SessionStore::in_memory(cookie_url));
        let result = HttpClient::new("not a url", session, Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn test_error_message_from_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/category/all")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"not found"}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        let err = client
            .request::<serde_json::Value>("/category/all", RequestOptions::get().param("page", "1"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_message_from_status_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/stats/dashboard")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        let err = client
            .get::<serde_json::Value>("/stats/dashboard")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/category/create")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "Games"})))
            .with_status(201)
            .with_body(r#"{"id":"9","name":"Games"}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        let created: serde_json::Value = client
            .post("/category/create", &json!({"name": "Games"}))
            .await
            .unwrap();

        assert_eq!(created["id"], "9");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_drops_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/users")
            .match_body("")
            .match_header("content-type", Matcher::Missing)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        let users: Vec<serde_json::Value> = client
            .request("/users", RequestOptions::get().body(json!({"ignored": true})))
            .await
            .unwrap();

        assert!(users.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_caller_headers_override_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/projects/1")
            .match_header("content-type", "application/merge-patch+json")
            .match_header("x-request-source", "tests")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        let options = RequestOptions::new(Method::PUT)
            .body(json!({"status": "paused"}))
            .header("Content-Type", "application/merge-patch+json")
            .header("X-Request-Source", "tests");
        let _: serde_json::Value = client.request("/projects/1", options).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_session_token_sent_as_cookie_and_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/admin/all")
            .match_header("cookie", Matcher::Regex("auth_token=tok-42".to_string()))
            .match_header("authorization", "Bearer tok-42")
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        client
            .session()
            .establish(&AuthUser {
                id: "1".to_string(),
                login: "admin".to_string(),
                name: "Admin".to_string(),
                role: "admin".to_string(),
                token: "tok-42".to_string(),
            })
            .unwrap();

        let projects: Vec<serde_json::Value> = client.get("/projects/admin/all").await.unwrap();
        assert!(projects.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/projects/3")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        client.delete("/projects/3").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/users/1")
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&format!("{}/api", server.url()));
        let err = client.get::<serde_json::Value>("/users/1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 1 on loopback refuses connections
        let client = client_for("http://127.0.0.1:1/api");
        let err = client.get::<serde_json::Value>("/users").await.unwrap_err();
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_connection_closed_without_response() {
        let client = client_for(&closing_server().await);
        let err = client.get::<serde_json::Value>("/users").await.unwrap_err();

        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.is_unreachable());
        assert_eq!(AuthError::from(err), AuthError::Unreachable);
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let client = client_with_timeout(&silent_server().await, Duration::from_millis(300));

        let start = std::time::Instant::now();
        let err = client.get::<serde_json::Value>("/users").await.unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(5));
        match &err {
            ApiError::Network(e) => assert!(e.is_timeout()),
            other => panic!("expected a network error, got {:?}", other),
        }
        assert_eq!(AuthError::from(err), AuthError::Unreachable);
    }
}
