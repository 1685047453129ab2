//! Account endpoints: the caller's own profile and, for administrators,
//! client management

use super::appointments::encode;
use super::{AgendifyClient, ClientError, PASSWORD_CHANGE_PATH};
use crate::types::{CreateUser, ListUsersParams, PasswordChange, PermissionsUpdate, UpdateUser};
use agendify_core::{ApiResponse, Paginated, Permissions, User};
use reqwest::Method;
use serde_json::Value;

impl AgendifyClient {
    pub async fn profile(&self) -> Result<ApiResponse<User>, ClientError> {
        self.me().await
    }

    pub async fn update_profile(&self, data: &UpdateUser) -> Result<ApiResponse<User>, ClientError> {
        let request = self.request(Method::PUT, "/api/users/profile").json(data);
        self.execute(request).await
    }

    /// A wrong `old_password` comes back as a 401 that does not end the session
    pub async fn update_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let request = self
            .request(Method::PUT, PASSWORD_CHANGE_PATH)
            .json(&PasswordChange {
                old_password: old_password.to_string(),
                new_password: new_password.to_string(),
            });
        self.execute(request).await
    }

    pub async fn list_users(
        &self,
        params: &ListUsersParams,
    ) -> Result<Paginated<User>, ClientError> {
        let request = self.request(Method::GET, "/api/users").query(params);
        self.execute(request).await
    }

    pub async fn get_user(&self, id: &str) -> Result<ApiResponse<User>, ClientError> {
        let request = self.request(Method::GET, &format!("/api/users/{}", encode(id)));
        self.execute(request).await
    }

    pub async fn create_user(&self, data: &CreateUser) -> Result<ApiResponse<User>, ClientError> {
        let request = self.request(Method::POST, "/api/users").json(data);
        self.execute(request).await
    }

    pub async fn update_user(
        &self,
        id: &str,
        data: &UpdateUser,
    ) -> Result<ApiResponse<User>, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/users/{}", encode(id)))
            .json(data);
        self.execute(request).await
    }

    /// Flip an account between active and inactive
    pub async fn toggle_user_status(&self, id: &str) -> Result<ApiResponse<User>, ClientError> {
        let request = self.request(
            Method::PATCH,
            &format!("/api/users/{}/toggle-status", encode(id)),
        );
        self.execute(request).await
    }

    pub async fn update_user_permissions(
        &self,
        id: &str,
        permissions: Permissions,
    ) -> Result<ApiResponse<User>, ClientError> {
        let request = self
            .request(
                Method::PATCH,
                &format!("/api/users/{}/permissions", encode(id)),
            )
            .json(&PermissionsUpdate { permissions });
        self.execute(request).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<ApiResponse<Value>, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/users/{}", encode(id)));
        self.execute(request).await
    }
}
