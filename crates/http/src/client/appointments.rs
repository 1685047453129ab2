//! Appointment endpoints

use super::{AgendifyClient, ClientError};
use crate::types::{
    AppointmentFilters, CreateAppointment, DateRange, MyAppointmentsParams, UpdateAppointment,
};
use agendify_core::{ApiResponse, Appointment, AppointmentStats, Paginated};
use reqwest::Method;
use serde_json::Value;

impl AgendifyClient {
    pub async fn list_appointments(
        &self,
        filters: &AppointmentFilters,
    ) -> Result<Paginated<Appointment>, ClientError> {
        let request = self
            .request(Method::GET, "/api/appointments")
            .query(filters);
        self.execute(request).await
    }

    pub async fn get_appointment(&self, id: &str) -> Result<ApiResponse<Appointment>, ClientError> {
        let request = self.request(Method::GET, &format!("/api/appointments/{}", encode(id)));
        self.execute(request).await
    }

    pub async fn create_appointment(
        &self,
        data: &CreateAppointment,
    ) -> Result<ApiResponse<Appointment>, ClientError> {
        let request = self.request(Method::POST, "/api/appointments").json(data);
        self.execute(request).await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        data: &UpdateAppointment,
    ) -> Result<ApiResponse<Appointment>, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/appointments/{}", encode(id)))
            .json(data);
        self.execute(request).await
    }

    pub async fn cancel_appointment(&self, id: &str) -> Result<ApiResponse<Value>, ClientError> {
        let request = self.request(
            Method::PATCH,
            &format!("/api/appointments/{}/cancel", encode(id)),
        );
        self.execute(request).await
    }

    /// Approve a request that is under review
    pub async fn confirm_appointment(
        &self,
        id: &str,
    ) -> Result<ApiResponse<Appointment>, ClientError> {
        let request = self.request(
            Method::PATCH,
            &format!("/api/appointments/{}/confirm", encode(id)),
        );
        self.execute(request).await
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<ApiResponse<Value>, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/appointments/{}", encode(id)));
        self.execute(request).await
    }

    /// Appointments owned by the signed-in account
    pub async fn my_appointments(
        &self,
        params: &MyAppointmentsParams,
    ) -> Result<Paginated<Appointment>, ClientError> {
        let request = self
            .request(Method::GET, "/api/appointments/my-appointments")
            .query(params);
        self.execute(request).await
    }

    pub async fn appointments_by_date(
        &self,
        date: &str,
    ) -> Result<ApiResponse<Vec<Appointment>>, ClientError> {
        let request = self.request(
            Method::GET,
            &format!("/api/appointments/by-date/{}", encode(date)),
        );
        self.execute(request).await
    }

    /// Room names contain spaces, so the segment is percent-encoded
    pub async fn appointments_by_room(
        &self,
        room: &str,
        range: &DateRange,
    ) -> Result<ApiResponse<Vec<Appointment>>, ClientError> {
        let request = self
            .request(
                Method::GET,
                &format!("/api/appointments/by-room/{}", encode(room)),
            )
            .query(range);
        self.execute(request).await
    }

    pub async fn appointment_stats(&self) -> Result<ApiResponse<AppointmentStats>, ClientError> {
        let request = self.request(Method::GET, "/api/appointments/stats");
        self.execute(request).await
    }

    pub async fn rooms(&self) -> Result<ApiResponse<Vec<String>>, ClientError> {
        let request = self.request(Method::GET, "/api/appointments/rooms");
        self.execute(request).await
    }
}

pub(crate) fn encode(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}
