//! Records exchanged with the Agendify API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
///
/// The API is not consistent about casing: the account endpoints speak
/// `admin` / `cliente` while the session payloads use `ADMIN` / `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin", alias = "ADMIN")]
    Admin,
    #[serde(
        rename = "cliente",
        alias = "CLIENTE",
        alias = "USER",
        alias = "user",
        alias = "customer"
    )]
    Customer,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Customer => "Customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The authenticated user's profile as held by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn full_name(&self) -> String {
        crate::format::full_name(&self.name, &self.surname)
    }
}

/// Feature permissions an administrator grants to a client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub appointments: bool,
    pub logs: bool,
}

/// Full account record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Appointment lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "analise")]
    UnderReview,
    #[serde(rename = "agendado")]
    Scheduled,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::UnderReview => "Under review",
            Self::Scheduled => "Scheduled",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Wire value, as used in query strings
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnderReview => "analise",
            Self::Scheduled => "agendado",
            Self::Cancelled => "cancelado",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owner summary embedded in appointments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A room booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub room: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub analise: u64,
    pub agendado: u64,
    pub cancelado: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCount {
    pub room: String,
    pub count: u64,
}

/// Aggregate appointment figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStats {
    pub total: u64,
    pub by_status: StatusCounts,
    #[serde(default)]
    pub by_room: Vec<RoomCount>,
    #[serde(default)]
    pub upcoming_appointments: u64,
}

/// Author of a log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAuthor {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    /// Kept verbatim; the log feed mixes role spellings
    #[serde(default)]
    pub role: String,
}

/// Activity log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub entity: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub user: LogAuthor,
}

/// Standard response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    // No `#[serde(default)]`: it would bound `T: Default`
    pub data: Option<T>,
}

/// Pagination block of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: crate::constants::DEFAULT_PAGE,
            limit: crate::constants::DEFAULT_LIMIT,
            total: 0,
            total_pages: 0,
        }
    }
}

/// One page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Page<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_accepts_both_spellings() {
        let admin: Role = serde_json::from_value(json!("ADMIN")).unwrap();
        let customer: Role = serde_json::from_value(json!("USER")).unwrap();
        let cliente: Role = serde_json::from_value(json!("cliente")).unwrap();

        assert_eq!(admin, Role::Admin);
        assert_eq!(customer, Role::Customer);
        assert_eq!(cliente, Role::Customer);
        assert_eq!(serde_json::to_value(Role::Customer).unwrap(), json!("cliente"));
    }

    #[test]
    fn test_user_defaults_missing_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "Ana",
            "email": "ana@example.com",
            "role": "cliente"
        }))
        .unwrap();

        assert!(user.is_active);
        assert_eq!(user.permissions, Permissions::default());
        assert_eq!(Identity::from(&user).full_name(), "Ana");
    }

    #[test]
    fn test_paginated_envelope() {
        let page: Paginated<Appointment> = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "data": [{
                    "id": "a1",
                    "date": "2026-03-02",
                    "time": "09:30",
                    "room": "Sala 012",
                    "status": "analise",
                    "user_id": "u1",
                    "createdAt": "2026-02-20T10:00:00Z",
                    "updatedAt": "2026-02-20T10:00:00Z"
                }],
                "pagination": { "page": 1, "limit": 10, "total": 1, "totalPages": 1 }
            }
        }))
        .unwrap();

        assert_eq!(page.data.data.len(), 1);
        assert_eq!(page.data.data[0].status, AppointmentStatus::UnderReview);
        assert_eq!(page.data.pagination.total_pages, 1);
    }

    #[test]
    fn test_envelope_without_data() {
        let empty: ApiResponse<User> =
            serde_json::from_value(json!({"success": true, "message": "Deleted"})).unwrap();
        assert_eq!(empty.data, None);
        assert_eq!(empty.message, "Deleted");

        let bare: ApiResponse<Appointment> = serde_json::from_value(json!({})).unwrap();
        assert!(!bare.success);
        assert!(bare.data.is_none());
    }
}
