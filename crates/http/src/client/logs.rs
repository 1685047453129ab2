//! Activity log endpoints

use super::appointments::encode;
use super::{AgendifyClient, ClientError};
use crate::types::{LogFilters, LogStatsParams, PageParams};
use agendify_core::{ApiResponse, Log, Paginated};
use reqwest::Method;
use serde_json::Value;

impl AgendifyClient {
    pub async fn list_logs(&self, filters: &LogFilters) -> Result<Paginated<Log>, ClientError> {
        let request = self.request(Method::GET, "/api/logs").query(filters);
        self.execute(request).await
    }

    pub async fn get_log(&self, id: &str) -> Result<ApiResponse<Log>, ClientError> {
        let request = self.request(Method::GET, &format!("/api/logs/{}", encode(id)));
        self.execute(request).await
    }

    /// Entries authored by one account
    pub async fn logs_by_user(
        &self,
        user_id: &str,
        params: &PageParams,
    ) -> Result<Paginated<Log>, ClientError> {
        let request = self
            .request(Method::GET, &format!("/api/logs/user/{}", encode(user_id)))
            .query(params);
        self.execute(request).await
    }

    /// The stats payload has no fixed shape
    pub async fn log_stats(&self, params: &LogStatsParams) -> Result<ApiResponse<Value>, ClientError> {
        let request = self.request(Method::GET, "/api/logs/stats").query(params);
        self.execute(request).await
    }
}
