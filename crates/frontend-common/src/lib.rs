//! Front-end building blocks for Agendify: the authentication session and
//! route guard, durable session storage, and the list state behind the
//! console's pages.

pub mod config;
pub mod hooks;
pub mod navigator;
pub mod notify;
pub mod routes;
pub mod session;
pub mod storage;
pub mod table;

pub use config::{AuthConfig, ConsoleConfig};
pub use navigator::{HistoryNavigator, Navigator};
pub use notify::{LogNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};
pub use routes::{Route, menu_for};
pub use session::{GuardDecision, SessionError, SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StoredSession};
pub use table::DataTable;
