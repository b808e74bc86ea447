//! HTTP client for the `/load` endpoint and the login endpoint.
//!
//! One attempt per call. Failures map onto [`QueryError`]; retrying is up
//! to the caller.

use crate::error::{error_message, QueryError};
use crate::executor::QueryExecutor;
use crate::query::Query;
use crate::response::QueryResponse;
use crate::session::{Session, UserRecord};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout on native targets.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the query travels to `/load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMethod {
    /// `GET /load?query=<url-encoded json>`
    #[default]
    Get,
    /// `POST /load` with `{"query": ...}`, for queries too long for a URL
    Post,
}

/// How the token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// The bare token, which the service accepts as-is
    #[default]
    Raw,
    /// `Bearer <token>`
    Bearer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Ignored on wasm32, where the browser owns request timeouts
    pub timeout: Option<Duration>,
    pub load_method: LoadMethod,
    pub auth_scheme: AuthScheme,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            load_method: LoadMethod::default(),
            auth_scheme: AuthScheme::default(),
        }
    }
}

/// Cheaply cloneable client; the credential is never stored here.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<UserRecord>,
}

fn transport(err: reqwest::Error) -> QueryError {
    if err.is_timeout() {
        QueryError::TransportFailure(format!("request timed out: {}", err))
    } else {
        QueryError::TransportFailure(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_timeout(builder: reqwest::ClientBuilder, timeout: Option<Duration>) -> reqwest::ClientBuilder {
    match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_timeout(builder: reqwest::ClientBuilder, _timeout: Option<Duration>) -> reqwest::ClientBuilder {
    builder
}

impl Client {
    pub fn new() -> Result<Self, QueryError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, QueryError> {
        let http = apply_timeout(reqwest::Client::builder(), config.timeout)
            .build()
            .map_err(|e| QueryError::TransportFailure(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorization(&self, token: &str) -> String {
        match self.config.auth_scheme {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }

    /// Execute `query` against `<session.api_url>/load`.
    ///
    /// Fails with [`QueryError::Unauthenticated`] before touching the
    /// network when the session carries no token.
    pub async fn load(&self, session: &Session, query: &Query) -> Result<QueryResponse, QueryError> {
        let token = session
            .token()
            .ok_or_else(|| QueryError::Unauthenticated("no credential configured".to_string()))?;
        let url = session.endpoint("load");

        info!(
            "Loading {} measures / {} dimensions from {}",
            query.measures().len(),
            query.dimensions().len(),
            url
        );

        let request = match self.config.load_method {
            LoadMethod::Get => {
                let json = query
                    .to_json()
                    .map_err(|e| QueryError::MalformedRequest(format!("unserializable query: {}", e)))?;
                self.http.get(&url).query(&[("query", json)])
            }
            LoadMethod::Post => self.http.post(&url).json(&serde_json::json!({ "query": query })),
        };

        let response = request
            .header(reqwest::header::AUTHORIZATION, self.authorization(token))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            let err = QueryError::from_status(status.as_u16(), error_message(&body));
            warn!("Load from {} failed with {}: {}", url, status, err);
            return Err(err);
        }

        let result = QueryResponse::from_body(query.clone(), &body);
        match &result {
            Ok(response) => info!("Loaded {} rows from {}", response.rows.len(), url),
            Err(err) => warn!("Unusable response from {}: {}", url, err),
        }
        result
    }

    /// Exchange credentials for a token at `login_url`, returning a signed-in
    /// session for `api_url`.
    pub async fn login(
        &self,
        login_url: &str,
        api_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, QueryError> {
        info!("Signing in as {} at {}", username, login_url);
        let response = self
            .http
            .post(login_url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(QueryError::from_status(status.as_u16(), error_message(&body)));
        }

        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| QueryError::RemoteFault(format!("invalid login response: {}", e)))?;
        let mut session = Session::new(api_url);
        session.sign_in(parsed.token, parsed.user);
        Ok(session)
    }
}

/// A client paired with the session it should read its credential from.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated<'a> {
    pub client: &'a Client,
    pub session: &'a Session,
}

impl QueryExecutor for Authenticated<'_> {
    async fn execute(&self, query: &Query) -> Result<QueryResponse, QueryError> {
        self.client.load(self.session, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const OK_BODY: &str = r#"{"data":[{"sales.region":"AMERICA","sales.total_sales_amount":"100.50"}],"annotation":{"measures":{},"dimensions":{},"segments":{},"timeDimensions":{}}}"#;

    /// Serve one canned HTTP response and hand back the raw request head.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(String::from_utf8_lossy(&request).to_string());
        });
        (format!("http://{}/cubejs-api/v1", addr), rx)
    }

    fn query() -> Query {
        Query::builder()
            .measure("sales.total_sales_amount")
            .dimension("sales.region")
            .build()
    }

    #[tokio::test]
    async fn test_load_sends_token_and_query() {
        let (url, request) = serve_once("200 OK", OK_BODY).await;
        let client = Client::new().unwrap();
        let session = Session::new(url).with_token("secret-token");

        let response = client.load(&session, &query()).await.unwrap();
        assert_eq!(response.rows.len(), 1);

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /cubejs-api/v1/load?query="));
        assert!(request.to_lowercase().contains("authorization: secret-token"));
    }

    #[tokio::test]
    async fn test_bearer_scheme_and_post() {
        let (url, request) = serve_once("200 OK", OK_BODY).await;
        let client = Client::with_config(ClientConfig {
            load_method: LoadMethod::Post,
            auth_scheme: AuthScheme::Bearer,
            ..Default::default()
        })
        .unwrap();
        let session = Session::new(url).with_token("secret-token");

        client.load(&session, &query()).await.unwrap();
        let request = request.await.unwrap();
        assert!(request.starts_with("POST /cubejs-api/v1/load"));
        assert!(request.to_lowercase().contains("authorization: bearer secret-token"));
    }

    #[tokio::test]
    async fn test_status_401_is_unauthenticated() {
        let (url, _rx) = serve_once("401 Unauthorized", r#"{"error":"Invalid token"}"#).await;
        let session = Session::new(url).with_token("expired");
        let err = Client::new().unwrap().load(&session, &query()).await.unwrap_err();
        assert_eq!(err, QueryError::Unauthenticated("Invalid token".to_string()));
    }

    #[tokio::test]
    async fn test_status_403_is_forbidden() {
        let (url, _rx) = serve_once("403 Forbidden", r#"{"error":"Access denied"}"#).await;
        let session = Session::new(url).with_token("viewer");
        let err = Client::new().unwrap().load(&session, &query()).await.unwrap_err();
        assert!(matches!(err, QueryError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_status_400_is_malformed_request() {
        let (url, _rx) = serve_once("400 Bad Request", r#"{"error":"'sales.regio' not found"}"#).await;
        let session = Session::new(url).with_token("t");
        let err = Client::new().unwrap().load(&session, &query()).await.unwrap_err();
        assert_eq!(err, QueryError::MalformedRequest("'sales.regio' not found".to_string()));
    }

    #[tokio::test]
    async fn test_status_500_is_remote_fault() {
        let (url, _rx) = serve_once("500 Internal Server Error", "boom").await;
        let session = Session::new(url).with_token("t");
        let err = Client::new().unwrap().load(&session, &query()).await.unwrap_err();
        assert_eq!(err, QueryError::RemoteFault("boom".to_string()));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let client = Client::with_config(ClientConfig {
            timeout: Some(Duration::from_millis(200)),
            ..Default::default()
        })
        .unwrap();
        let session = Session::new(format!("http://{}", addr)).with_token("t");
        let err = client.load(&session, &query()).await.unwrap_err();
        assert!(matches!(err, QueryError::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let session = Session::new(format!("http://{}", addr)).with_token("t");
        let err = Client::new().unwrap().load(&session, &query()).await.unwrap_err();
        assert!(matches!(err, QueryError::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_network() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let contacted = Arc::new(AtomicBool::new(false));
        let flag = contacted.clone();
        tokio::spawn(async move {
            if listener.accept().await.is_ok() {
                flag.store(true, Ordering::SeqCst);
            }
        });

        let session = Session::new(format!("http://{}", addr));
        let err = Client::new().unwrap().load(&session, &query()).await.unwrap_err();
        assert!(matches!(err, QueryError::Unauthenticated(_)));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contacted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_login_returns_signed_in_session() {
        let (url, request) = serve_once(
            "200 OK",
            r#"{"user":{"id":3,"username":"sarah_jones@tpch.com","name":"Sarah Jones"},"token":"jwt.payload.sig"}"#,
        )
        .await;
        let session = Client::new()
            .unwrap()
            .login(&format!("{}/login", url), "http://localhost:4000/cubejs-api/v1", "sarah_jones@tpch.com", "pw")
            .await
            .unwrap();
        assert_eq!(session.token(), Some("jwt.payload.sig"));
        assert_eq!(session.user().map(|u| u.display_name()), Some("Sarah Jones"));
        assert_eq!(session.api_url, "http://localhost:4000/cubejs-api/v1");
        assert!(request.await.unwrap().starts_with("POST /cubejs-api/v1/login"));
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let (url, _rx) = serve_once("401 Unauthorized", r#"{"error":"Invalid credentials"}"#).await;
        let err = Client::new()
            .unwrap()
            .login(&url, "http://localhost:4000", "who", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Unauthenticated(_)));
    }
}
