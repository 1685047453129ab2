use super::{Loading, report_failure, report_success};
use crate::notify::Notice;
use crate::session::SessionStore;
use agendify_core::constants::messages;
use agendify_core::{Pagination, Permissions, User};
use agendify_http::types::{CreateUser, ListUsersParams, UpdateUser};
use tokio::sync::watch;

/// The signed-in account's profile and, for administrators, the client list
pub struct UserHook {
    store: SessionStore,
    profile: Option<User>,
    clients: Vec<User>,
    loading: Loading,
    error: Option<String>,
    pagination: Option<Pagination>,
    last_params: ListUsersParams,
}

impl UserHook {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            profile: None,
            clients: Vec::new(),
            loading: Loading::new(),
            error: None,
            pagination: None,
            last_params: ListUsersParams::default(),
        }
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub fn clients(&self) -> &[User] {
        &self.clients
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Follow the loading flag while a fetch is running
    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub async fn fetch_profile(&mut self) -> Option<User> {
        let _loading = self.loading.start();
        self.error = None;

        let result = self.store.client().profile().await;
        match result {
            Ok(response) => {
                self.profile = response.data.clone();
                response.data
            }
            Err(e) => {
                self.error = Some(report_failure(&self.store, &e, "Error loading profile"));
                None
            }
        }
    }

    pub async fn update_profile(&mut self, data: UpdateUser) -> bool {
        let result = self.store.client().update_profile(&data).await;
        match result {
            Ok(response) => {
                if let Some(user) = response.data {
                    self.profile = Some(user);
                }
                report_success(&self.store, &response.message, messages::PROFILE_UPDATED);
                true
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error updating profile");
                false
            }
        }
    }

    /// A wrong current password is reported here; it does not end the session
    pub async fn update_password(&mut self, old_password: &str, new_password: &str) -> bool {
        let result = self
            .store
            .client()
            .update_password(old_password, new_password)
            .await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::PASSWORD_UPDATED);
                true
            }
            Err(e) => {
                self.store
                    .notifier()
                    .notify(Notice::error(e.user_message("Error updating password")));
                false
            }
        }
    }

    pub async fn fetch(&mut self, params: ListUsersParams) {
        let _loading = self.loading.start();
        self.error = None;

        let result = self.store.client().list_users(&params).await;
        match result {
            Ok(response) => {
                self.clients = response.data.data;
                self.pagination = Some(response.data.pagination);
            }
            Err(e) => {
                self.error = Some(report_failure(&self.store, &e, "Error loading clients"));
            }
        }

        self.last_params = params;
    }

    pub async fn refresh(&mut self) {
        let params = self.last_params.clone();
        self.fetch(params).await;
    }

    pub async fn create(&mut self, data: CreateUser) -> Option<User> {
        let result = self.store.client().create_user(&data).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::CLIENT_CREATED);
                self.refresh().await;
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error creating client");
                None
            }
        }
    }

    pub async fn update(&mut self, id: &str, data: UpdateUser) -> Option<User> {
        let result = self.store.client().update_user(id, &data).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::CLIENT_UPDATED);
                self.replace_row(response.data.as_ref());
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error updating client");
                None
            }
        }
    }

    pub async fn toggle_status(&mut self, id: &str) -> Option<User> {
        let result = self.store.client().toggle_user_status(id).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::CLIENT_STATUS_UPDATED);
                self.replace_row(response.data.as_ref());
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error updating client status");
                None
            }
        }
    }

    pub async fn update_permissions(&mut self, id: &str, permissions: Permissions) -> Option<User> {
        let result = self
            .store
            .client()
            .update_user_permissions(id, permissions)
            .await;
        match result {
            Ok(response) => {
                report_success(
                    &self.store,
                    &response.message,
                    messages::CLIENT_PERMISSIONS_UPDATED,
                );
                self.replace_row(response.data.as_ref());
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error updating permissions");
                None
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        let result = self.store.client().delete_user(id).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::CLIENT_DELETED);
                self.clients.retain(|client| client.id != id);
                true
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error deleting client");
                false
            }
        }
    }

    fn replace_row(&mut self, updated: Option<&User>) {
        let Some(updated) = updated else { return };
        if let Some(row) = self.clients.iter_mut().find(|c| c.id == updated.id) {
            *row = updated.clone();
        }
    }
}
