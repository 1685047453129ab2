//! Agendify core types and utilities

pub mod constants;
pub mod error;
pub mod format;
pub mod forms;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use forms::FormError;
pub use types::{
    ApiResponse, Appointment, AppointmentStats, AppointmentStatus, Identity, Log, Page,
    Paginated, Pagination, Permissions, Role, User,
};
