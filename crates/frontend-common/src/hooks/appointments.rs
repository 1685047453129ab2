use super::{Loading, report_failure, report_success};
use crate::session::SessionStore;
use agendify_core::constants::messages;
use agendify_core::{Appointment, Pagination};
use agendify_http::types::{AppointmentFilters, CreateAppointment, UpdateAppointment};
use tokio::sync::watch;
use tracing::debug;

/// Appointment list state
pub struct AppointmentsHook {
    store: SessionStore,
    appointments: Vec<Appointment>,
    loading: Loading,
    error: Option<String>,
    pagination: Option<Pagination>,
    last_filters: AppointmentFilters,
}

impl AppointmentsHook {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            appointments: Vec::new(),
            loading: Loading::new(),
            error: None,
            pagination: None,
            last_filters: AppointmentFilters::default(),
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
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

    pub fn last_filters(&self) -> &AppointmentFilters {
        &self.last_filters
    }

    pub async fn fetch(&mut self, filters: AppointmentFilters) {
        let _loading = self.loading.start();
        self.error = None;

        let result = self.store.client().list_appointments(&filters).await;
        match result {
            Ok(response) => {
                debug!(count = response.data.data.len(), "appointments loaded");
                self.appointments = response.data.data;
                self.pagination = Some(response.data.pagination);
            }
            Err(e) => {
                self.error = Some(report_failure(&self.store, &e, "Error loading appointments"));
            }
        }

        self.last_filters = filters;
    }

    /// Fetch again with the last filters
    pub async fn refresh(&mut self) {
        let filters = self.last_filters.clone();
        self.fetch(filters).await;
    }

    pub async fn create(&mut self, data: CreateAppointment) -> Option<Appointment> {
        let result = self.store.client().create_appointment(&data).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::APPOINTMENT_CREATED);
                self.refresh().await;
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error creating appointment");
                None
            }
        }
    }

    pub async fn update(&mut self, id: &str, data: UpdateAppointment) -> Option<Appointment> {
        let result = self.store.client().update_appointment(id, &data).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::APPOINTMENT_UPDATED);
                self.refresh().await;
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error updating appointment");
                None
            }
        }
    }

    pub async fn cancel(&mut self, id: &str) -> bool {
        let result = self.store.client().cancel_appointment(id).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::APPOINTMENT_CANCELLED);
                self.refresh().await;
                true
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error cancelling appointment");
                false
            }
        }
    }

    /// Approve a request under review
    pub async fn confirm(&mut self, id: &str) -> Option<Appointment> {
        let result = self.store.client().confirm_appointment(id).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::APPOINTMENT_CONFIRMED);
                self.refresh().await;
                response.data
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error confirming appointment");
                None
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        let result = self.store.client().delete_appointment(id).await;
        match result {
            Ok(response) => {
                report_success(&self.store, &response.message, messages::APPOINTMENT_DELETED);
                self.refresh().await;
                true
            }
            Err(e) => {
                report_failure(&self.store, &e, "Error deleting appointment");
                false
            }
        }
    }
}
