//! List state for the console's pages
//!
//! Each hook owns the rows of one page together with the pagination block,
//! the last error and the filters it last fetched with. Mutations report
//! their outcome through the session's notifier and then bring the rows up
//! to date.

pub mod appointments;
pub mod logs;
pub mod users;

pub use appointments::AppointmentsHook;
pub use logs::LogsHook;
pub use users::UserHook;

use crate::notify::Notice;
use crate::session::SessionStore;
use agendify_http::ClientError;
use tokio::sync::watch;
use tracing::debug;

/// In-flight flag of a hook's fetch
///
/// Published through a watch channel, since the hook itself is mutably
/// borrowed for the whole fetch.
pub(crate) struct Loading {
    flag: watch::Sender<bool>,
}

impl Loading {
    pub(crate) fn new() -> Self {
        Self {
            flag: watch::Sender::new(false),
        }
    }

    pub(crate) fn get(&self) -> bool {
        *self.flag.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// Raise the flag until the returned guard drops
    pub(crate) fn start(&self) -> LoadingGuard<'_> {
        self.flag.send_replace(true);
        LoadingGuard { flag: &self.flag }
    }
}

/// Clears the loading flag on drop, including when the fetch is cancelled
pub(crate) struct LoadingGuard<'a> {
    flag: &'a watch::Sender<bool>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}

/// Notify a failed call and return the message shown
///
/// Rejected credentials are already reported by the session, so they are
/// not shown a second time.
pub(crate) fn report_failure(store: &SessionStore, err: &ClientError, fallback: &str) -> String {
    let message = err.user_message(fallback);
    if err.is_auth_rejection() {
        debug!(error = %err, "left to the session");
    } else {
        store.notifier().notify(Notice::error(&message));
    }
    message
}

/// Notify success with the server's message, or `default` when it sent none
pub(crate) fn report_success(store: &SessionStore, server_message: &str, default: &str) {
    let message = if server_message.trim().is_empty() {
        default
    } else {
        server_message
    };
    store.notifier().notify(Notice::success(message));
}
