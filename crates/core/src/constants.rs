//! Fixed business values

/// Bookable rooms
pub const ROOMS: [&str; 4] = ["Sala 012", "Sala 015", "Sala 020", "Sala 025"];

/// Opening time, `HH:MM`
pub const BUSINESS_HOURS_START: &str = "08:00";
/// Closing time, `HH:MM`
pub const BUSINESS_HOURS_END: &str = "18:00";
/// Slot length offered by the booking form, in minutes
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const PAGE_LIMITS: [u32; 4] = [10, 20, 50, 100];

pub const MIN_PASSWORD_LEN: usize = 6;

/// User-facing notices
pub mod messages {
    pub const LOGIN: &str = "Signed in successfully";
    pub const LOGOUT: &str = "Signed out";
    pub const REGISTER: &str = "Account created successfully";
    pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";
    pub const LOGIN_FAILED: &str = "Unknown sign-in error. Please try again.";
    pub const GENERIC_ERROR: &str = "Something went wrong. Please try again";

    pub const APPOINTMENT_CREATED: &str = "Appointment created successfully";
    pub const APPOINTMENT_UPDATED: &str = "Appointment updated successfully";
    pub const APPOINTMENT_CANCELLED: &str = "Appointment cancelled successfully";
    pub const APPOINTMENT_CONFIRMED: &str = "Appointment confirmed successfully";
    pub const APPOINTMENT_DELETED: &str = "Appointment deleted successfully";

    pub const PROFILE_UPDATED: &str = "Profile updated successfully";
    pub const PASSWORD_UPDATED: &str = "Password updated successfully";

    pub const CLIENT_CREATED: &str = "Client created successfully";
    pub const CLIENT_UPDATED: &str = "Client updated successfully";
    pub const CLIENT_STATUS_UPDATED: &str = "Client status updated";
    pub const CLIENT_PERMISSIONS_UPDATED: &str = "Permissions updated successfully";
    pub const CLIENT_DELETED: &str = "Client deleted successfully";

    pub const NO_RECORDS: &str = "No records found.";
}
