//! Navigation seam between the session layer and whatever renders routes

use crate::routes::Route;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::debug;

/// Something that owns the current route
pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;

    fn navigate(&self, to: Route);

    /// Observe route changes
    fn subscribe(&self) -> watch::Receiver<Route>;
}

/// In-process navigator that remembers every route it visited
pub struct HistoryNavigator {
    current: watch::Sender<Route>,
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new(start: Route) -> Self {
        let (current, _) = watch::channel(start.clone());
        Self {
            current,
            history: Mutex::new(vec![start]),
        }
    }

    /// Every route visited, oldest first
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

impl Navigator for HistoryNavigator {
    fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    fn navigate(&self, to: Route) {
        debug!(route = %to, "navigating");
        if let Ok(mut history) = self.history.lock() {
            history.push(to.clone());
        }
        self.current.send_replace(to);
    }

    fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}
