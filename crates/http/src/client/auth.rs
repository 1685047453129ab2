//! Authentication API client methods

use super::{AgendifyClient, ClientError};
use crate::types::{AuthPayload, LoginRequest, RefreshRequest, RegisterRequest};
use agendify_core::{ApiResponse, User};
use reqwest::Method;

impl AgendifyClient {
    /// Exchange email and password for a credential and identity
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthPayload>, ClientError> {
        let request = self
            .request(Method::POST, "/api/auth/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        self.execute(request).await
    }

    /// Create a customer account
    pub async fn register(
        &self,
        data: &RegisterRequest,
    ) -> Result<ApiResponse<AuthPayload>, ClientError> {
        let request = self.request(Method::POST, "/api/auth/register").json(data);
        self.execute(request).await
    }

    /// Current account behind the held credential
    pub async fn me(&self) -> Result<ApiResponse<User>, ClientError> {
        let request = self.request(Method::GET, "/api/auth/me");
        self.execute(request).await
    }

    pub async fn logout(&self) -> Result<ApiResponse<serde_json::Value>, ClientError> {
        let request = self.request(Method::POST, "/api/auth/logout");
        self.execute(request).await
    }

    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<AuthPayload>, ClientError> {
        let request = self
            .request(Method::POST, "/api/auth/refresh")
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            });
        self.execute(request).await
    }
}
