use super::{Loading, report_failure};
use crate::session::SessionStore;
use agendify_core::{Log, Pagination};
use agendify_http::types::LogFilters;
use tokio::sync::watch;

/// Activity log state
///
/// Administrators see every entry; everyone else sees their own.
pub struct LogsHook {
    store: SessionStore,
    logs: Vec<Log>,
    loading: Loading,
    error: Option<String>,
    pagination: Option<Pagination>,
    last_filters: LogFilters,
}

impl LogsHook {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            logs: Vec::new(),
            loading: Loading::new(),
            error: None,
            pagination: None,
            last_filters: LogFilters::default(),
        }
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
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

    pub async fn fetch(&mut self, filters: LogFilters) {
        let Some(identity) = self.store.identity() else {
            self.error = Some("Not signed in".to_string());
            return;
        };

        let _loading = self.loading.start();
        self.error = None;

        let client = self.store.client();
        let result = if identity.role.is_admin() {
            client.list_logs(&filters).await
        } else {
            client
                .logs_by_user(&identity.id, &filters.page_params())
                .await
        };

        match result {
            Ok(response) => {
                self.logs = response.data.data;
                self.pagination = Some(response.data.pagination);
            }
            Err(e) => {
                self.error = Some(report_failure(&self.store, &e, "Error loading logs"));
            }
        }

        self.last_filters = filters;
    }

    pub async fn refresh(&mut self) {
        let filters = self.last_filters.clone();
        self.fetch(filters).await;
    }
}
