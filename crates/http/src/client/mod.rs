//! Agendify HTTP client

pub mod address;
pub mod appointments;
pub mod auth;
pub mod error;
pub mod interceptor;
pub mod logs;
pub mod users;

use arc_swap::ArcSwapOption;
use error::ClientError;
use interceptor::{RejectedRequest, RejectionHook};
use reqwest::{Client, ClientBuilder, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// The password-change endpoint answers 401 for a wrong current password,
/// which says nothing about the session.
pub const PASSWORD_CHANGE_PATH: &str = "/api/users/password";

const DEFAULT_USER_AGENT: &str = concat!("agendify-client/", env!("CARGO_PKG_VERSION"));

/// Agendify API client
///
/// Cheap to clone; clones share the held credential and the rejection hook.
#[derive(Clone)]
pub struct AgendifyClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    base_url: String,
    credential: ArcSwapOption<String>,
    exempt_paths: Vec<String>,
    rejection_hook: RejectionHook,
}

impl AgendifyClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> AgendifyClientBuilder {
        AgendifyClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Replace the held bearer credential; `None` drops it
    pub fn set_credential(&self, credential: Option<&str>) {
        self.inner
            .credential
            .store(credential.map(|c| Arc::new(c.to_string())));
    }

    /// Snapshot of the held credential
    pub fn credential(&self) -> Option<Arc<String>> {
        self.inner.credential.load_full()
    }

    pub fn has_credential(&self) -> bool {
        self.inner.credential.load().is_some()
    }

    /// Registry for the callback fired on authentication rejection
    pub fn rejection_hook(&self) -> &RejectionHook {
        &self.inner.rejection_hook
    }

    /// Whether a 401 from `path` is left to the caller
    pub fn is_exempt(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.inner
            .exempt_paths
            .iter()
            .any(|exempt| path.ends_with(exempt.trim_end_matches('/')))
    }

    /// Create a request builder, attaching the bearer credential when one is held
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        let request = self.inner.http.request(method, url);

        // One load: the header is built from a single consistent snapshot
        match self.inner.credential.load_full() {
            Some(credential) => {
                request.header(header::AUTHORIZATION, format!("Bearer {credential}"))
            }
            None => request,
        }
    }

    /// Execute a request and decode the JSON body
    ///
    /// A 401 on a non-exempt path fires the rejection hook before the error
    /// is returned to the caller. The hook learns which credential the
    /// request carried, since the held one may have changed in flight.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let credential = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|credential| Arc::new(credential.to_string()));

        debug!(%method, %path, "sending request");
        let response = self.inner.http.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            // Bodiless successes decode as an empty envelope
            let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"{}"
            } else {
                &bytes
            };
            return Ok(serde_json::from_slice(body)?);
        }

        let raw = response.text().await.unwrap_or_default();
        let error = ClientError::from_status(status, raw);

        if status == StatusCode::UNAUTHORIZED {
            if self.is_exempt(&path) {
                debug!(%method, %path, "authentication rejected on exempt path");
            } else {
                warn!(%method, %path, "authentication rejected");
                self.inner
                    .rejection_hook
                    .trigger(&RejectedRequest {
                        method,
                        path,
                        credential,
                    });
            }
        }

        Err(error)
    }
}

/// Builder for AgendifyClient
#[derive(Default)]
pub struct AgendifyClientBuilder {
    base_url: Option<String>,
    credential: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    exempt_paths: Vec<String>,
}

impl AgendifyClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Start with a credential already held
    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Exempt another path from session invalidation on 401
    pub fn exempt_path(mut self, path: impl Into<String>) -> Self {
        self.exempt_paths.push(path.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<AgendifyClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let http = client_builder.build()?;

        let mut exempt_paths = vec![PASSWORD_CHANGE_PATH.to_string()];
        for path in self.exempt_paths {
            if !exempt_paths.contains(&path) {
                exempt_paths.push(path);
            }
        }

        Ok(AgendifyClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                credential: ArcSwapOption::new(self.credential.map(Arc::new)),
                exempt_paths,
                rejection_hook: RejectionHook::default(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_path_is_exempt_by_default() {
        let client = AgendifyClient::new("http://localhost:3333/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
        assert!(client.is_exempt("/api/users/password"));
        assert!(client.is_exempt("/backend/api/users/password/"));
        assert!(!client.is_exempt("/api/users/profile"));
    }

    #[test]
    fn test_credential_swap() {
        let client = AgendifyClient::builder()
            .base_url(DEFAULT_BASE_URL)
            .credential("tok1")
            .build()
            .unwrap();
        assert_eq!(client.credential().as_deref().map(String::as_str), Some("tok1"));

        let clone = client.clone();
        clone.set_credential(None);
        assert!(!client.has_credential());
    }

    #[test]
    fn test_request_attaches_bearer() {
        let client = AgendifyClient::new(DEFAULT_BASE_URL).unwrap();
        let request = client.request(Method::GET, "/api/auth/me").build().unwrap();
        assert!(request.headers().get(header::AUTHORIZATION).is_none());

        client.set_credential(Some("abc"));
        let request = client.request(Method::GET, "/api/auth/me").build().unwrap();
        assert_eq!(
            request.headers().get(header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
        assert_eq!(request.url().as_str(), "http://localhost:3333/api/auth/me");
    }

    #[test]
    fn test_builder_requires_base_url() {
        assert!(matches!(
            AgendifyClient::builder().build(),
            Err(ClientError::Configuration(_))
        ));
    }
}
