//! Session store
//!
//! Owns the session state, keeps the client's credential and the durable
//! slots in step with it, and reacts to authentication rejections reported
//! by the client.

use super::error::SessionError;
use super::guard::{GuardDecision, evaluate};
use super::state::SessionState;
use crate::navigator::Navigator;
use crate::notify::{Notice, Notifier};
use crate::routes::Route;
use crate::storage::{SessionStorage, StoredSession};
use agendify_core::constants::messages;
use agendify_core::{FormError, Identity};
use agendify_http::AgendifyClient;
use agendify_http::client::interceptor::RejectedRequest;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shared handle to the session
///
/// Clones share one state. Install one store per client: creating the store
/// registers it as the client's rejection hook.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    client: AgendifyClient,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(
        client: AgendifyClient,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        let inner = Arc::new(StoreInner {
            client,
            storage,
            navigator,
            notifier,
            state,
        });

        // Weak: the client must not keep a dropped store alive
        let weak: Weak<StoreInner> = Arc::downgrade(&inner);
        inner
            .client
            .rejection_hook()
            .set(Arc::new(move |rejected: &RejectedRequest| {
                if let Some(inner) = weak.upgrade() {
                    debug!(method = %rejected.method, path = %rejected.path, "credential rejected");
                    inner.invalidate(Some(rejected));
                }
            }));

        Self { inner }
    }

    pub fn client(&self) -> &AgendifyClient {
        &self.inner.client
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Resolve the startup state from durable storage
    ///
    /// A stored session is only adopted after the server accepts its
    /// credential. Every failure resolves to `Anonymous` without a notice.
    /// Calling this again after resolution returns the current state.
    pub async fn initialize(&self) -> SessionState {
        if !self.inner.state.borrow().is_initializing() {
            return self.state();
        }

        let stored = StoredSession::load(self.inner.storage.as_ref()).unwrap_or_else(|e| {
            warn!(error = %e, "could not read stored session");
            None
        });

        let Some(stored) = stored else {
            debug!("no stored session");
            self.resolve(SessionState::Anonymous);
            return self.state();
        };

        self.inner.client.set_credential(Some(&stored.credential));
        match self.inner.client.me().await {
            Ok(response) if response.data.is_some() => {
                info!(user = %stored.identity.email, "restored stored session");
                self.resolve(SessionState::Authenticated(stored.identity));
            }
            Ok(_) => {
                debug!("validation response carried no user");
                self.discard_stored();
            }
            Err(e) => {
                debug!(error = %e, "stored credential no longer valid");
                self.discard_stored();
            }
        }
        self.state()
    }

    /// Leave `Uninitialized`; a no-op once anything else has resolved the state
    fn resolve(&self, next: SessionState) {
        self.inner.state.send_if_modified(|state| {
            if state.is_initializing() {
                *state = next;
                true
            } else {
                false
            }
        });
    }

    fn discard_stored(&self) {
        self.inner.client.set_credential(None);
        self.inner.clear_stored();
        self.resolve(SessionState::Anonymous);
    }

    /// Exchange credentials for a session
    ///
    /// Failures are shown to the user through the notifier and also returned.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        match self.exchange(email, password).await {
            Ok(identity) => {
                info!(user = %identity.email, role = %identity.role, "signed in");
                self.inner.notifier.notify(Notice::success(messages::LOGIN));
                self.inner.navigator.navigate(Route::LANDING);
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                self.inner.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn exchange(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(FormError::RequiredFields.into());
        }

        let response = self
            .inner
            .client
            .login(email, password)
            .await
            .map_err(SessionError::from_client)?;
        let payload = response
            .data
            .ok_or_else(|| SessionError::MalformedResponse("missing data".into()))?;
        let (credential, identity) = payload.into_parts().map_err(SessionError::from_client)?;

        let stored = StoredSession {
            credential,
            identity,
        };
        if let Err(e) = stored.save(self.inner.storage.as_ref()) {
            warn!(error = %e, "could not persist session");
        }
        self.inner.client.set_credential(Some(&stored.credential));
        self.inner
            .state
            .send_replace(SessionState::Authenticated(stored.identity.clone()));
        Ok(stored.identity)
    }

    /// End the session locally; safe to call in any state
    pub fn sign_out(&self) {
        let inner = &self.inner;
        let was_signed_in = inner.state.send_if_modified(|state| {
            inner.client.set_credential(None);
            let changed = *state != SessionState::Anonymous;
            *state = SessionState::Anonymous;
            changed
        });
        inner.clear_stored();
        if was_signed_in {
            info!("signed out");
        }
        inner.navigator.navigate(Route::PUBLIC_ENTRY);
    }

    /// End the current session as expired
    ///
    /// Rejections reported by the client take the same path, but only end
    /// the session when the rejected request carried the held credential.
    /// Returns whether this call ended the session.
    pub fn invalidate(&self) -> bool {
        self.inner.invalidate(None)
    }

    /// Apply the guard to the current route, navigating if it says so
    pub fn guard(&self) -> GuardDecision {
        let route = self.inner.navigator.current();
        let decision = evaluate(&self.inner.state.borrow(), &route);
        if let GuardDecision::Redirect(to) = &decision {
            debug!(from = %route, to = %to, "guard redirect");
            self.inner.navigator.navigate(to.clone());
        }
        decision
    }

    /// Re-apply the guard whenever the state or the route changes
    ///
    /// The task ends once the store is dropped.
    pub fn spawn_route_guard(&self) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let mut state_rx = self.inner.state.subscribe();
        let mut route_rx = self.inner.navigator.subscribe();

        tokio::spawn(async move {
            loop {
                {
                    let Some(inner) = weak.upgrade() else { break };
                    state_rx.mark_unchanged();
                    route_rx.mark_unchanged();
                    SessionStore { inner }.guard();
                }
                tokio::select! {
                    changed = state_rx.changed() => if changed.is_err() { break },
                    changed = route_rx.changed() => if changed.is_err() { break },
                }
            }
            debug!("route guard stopped");
        })
    }
}

impl StoreInner {
    fn invalidate(&self, rejected: Option<&RejectedRequest>) -> bool {
        // Check and transition under the channel's write lock, so concurrent
        // rejections end the session once
        let ended = self.state.send_if_modified(|state| {
            if !state.is_authenticated() {
                return false;
            }
            let superseded = rejected.is_some_and(|r| r.credential != self.client.credential());
            if superseded {
                debug!("rejection was for a credential no longer held");
                return false;
            }
            self.client.set_credential(None);
            *state = SessionState::Anonymous;
            true
        });

        if ended {
            self.clear_stored();
            warn!("session expired");
            self.notifier.notify(Notice::error(messages::SESSION_EXPIRED));
            self.navigator.navigate(Route::PUBLIC_ENTRY);
        }
        ended
    }

    fn clear_stored(&self) {
        if let Err(e) = StoredSession::clear(self.storage.as_ref()) {
            warn!(error = %e, "could not clear stored session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::navigator::HistoryNavigator;
    use crate::notify::{MockNotifier, NoticeLevel};
    use crate::storage::MemoryStorage;
    use agendify_core::Role;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn identity() -> Identity {
        Identity {
            id: "u1".into(),
            name: "Ana".into(),
            surname: "Silva".into(),
            email: "ana@example.com".into(),
            role: Role::Customer,
        }
    }

    fn store_with(
        server: &MockServer,
        storage: Arc<MemoryStorage>,
        notifier: MockNotifier,
    ) -> (SessionStore, Arc<HistoryNavigator>) {
        let client = AgendifyClient::new(server.uri()).unwrap();
        let navigator = Arc::new(HistoryNavigator::new(Route::Appointments));
        let store = SessionStore::new(client, storage, navigator.clone(), Arc::new(notifier));
        (store, navigator)
    }

    async fn mount_me(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "success": status == 200,
                "message": "",
                "data": {
                    "id": "u1", "name": "Ana", "surname": "Silva",
                    "email": "ana@example.com", "role": "USER"
                }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_concurrent_rejections_notify_once() {
        let server = MockServer::start().await;
        mount_me(&server, 200).await;
        Mock::given(method("GET"))
            .and(path("/api/appointments/rooms"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStorage::new());
        StoredSession {
            credential: "tok-1".into(),
            identity: identity(),
        }
        .save(storage.as_ref())
        .unwrap();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error && n.message == messages::SESSION_EXPIRED)
            .times(1)
            .return_const(());

        let (store, navigator) = store_with(&server, storage.clone(), notifier);
        assert!(store.initialize().await.is_authenticated());

        let client = store.client();
        let (a, b, c) = tokio::join!(client.rooms(), client.rooms(), client.rooms());
        assert!(a.unwrap_err().is_auth_rejection());
        assert!(b.unwrap_err().is_auth_rejection());
        assert!(c.unwrap_err().is_auth_rejection());

        assert_eq!(store.state(), SessionState::Anonymous);
        assert!(!store.client().has_credential());
        assert_eq!(storage.get(AuthConfig::TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(AuthConfig::USER_KEY).unwrap(), None);
        let to_login = navigator
            .history()
            .iter()
            .filter(|r| **r == Route::Login)
            .count();
        assert_eq!(to_login, 1);
    }

    #[tokio::test]
    async fn test_invalidate_is_noop_when_not_signed_in() {
        let server = MockServer::start().await;
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let (store, navigator) = store_with(&server, Arc::new(MemoryStorage::new()), notifier);
        assert!(!store.invalidate());
        assert_eq!(store.state(), SessionState::Uninitialized);

        store.initialize().await;
        assert!(!store.invalidate());
        assert_eq!(navigator.history(), vec![Route::Appointments]);
    }

    #[tokio::test]
    async fn test_startup_rejection_is_silent() {
        let server = MockServer::start().await;
        mount_me(&server, 401).await;

        let storage = Arc::new(MemoryStorage::new());
        StoredSession {
            credential: "stale".into(),
            identity: identity(),
        }
        .save(storage.as_ref())
        .unwrap();

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let (store, _) = store_with(&server, storage.clone(), notifier);
        assert_eq!(store.initialize().await, SessionState::Anonymous);
        assert!(!store.client().has_credential());
        assert_eq!(StoredSession::load(storage.as_ref()).unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_fields_skip_network() {
        let server = MockServer::start().await;
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error)
            .times(1)
            .return_const(());

        let (store, _) = store_with(&server, Arc::new(MemoryStorage::new()), notifier);
        let err = store.sign_in("  ", "secret").await.unwrap_err();
        assert!(matches!(err, SessionError::MissingCredentials(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_store_leaves_hook_inert() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments/rooms"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);
        let (store, _) = store_with(&server, Arc::new(MemoryStorage::new()), notifier);
        let client = store.client().clone();
        drop(store);

        assert!(client.rooms().await.unwrap_err().is_auth_rejection());
    }

    /// Records the published session state each time a slot is removed
    #[derive(Default)]
    struct ObservingStorage {
        slots: MemoryStorage,
        state: std::sync::OnceLock<watch::Receiver<SessionState>>,
        seen: std::sync::Mutex<Vec<SessionState>>,
    }

    impl SessionStorage for ObservingStorage {
        fn get(&self, key: &str) -> agendify_core::CoreResult<Option<String>> {
            self.slots.get(key)
        }

        fn set(&self, key: &str, value: &str) -> agendify_core::CoreResult<()> {
            self.slots.set(key, value)
        }

        fn remove(&self, key: &str) -> agendify_core::CoreResult<()> {
            if let Some(state) = self.state.get() {
                self.seen.lock().unwrap().push(state.borrow().clone());
            }
            self.slots.remove(key)
        }
    }

    /// Run a blocking store call off the runtime, failing instead of hanging
    fn within_deadline(work: impl FnOnce() + Send + 'static) {
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            work();
            let _ = done_tx.send(());
        });
        done_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("store call did not finish");
    }

    #[tokio::test]
    async fn test_storage_is_cleared_after_the_transition_is_published() {
        let server = MockServer::start().await;
        mount_me(&server, 200).await;

        let storage = Arc::new(ObservingStorage::default());
        StoredSession {
            credential: "tok-1".into(),
            identity: identity(),
        }
        .save(storage.as_ref())
        .unwrap();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.message == messages::SESSION_EXPIRED)
            .times(1)
            .return_const(());

        let client = AgendifyClient::new(server.uri()).unwrap();
        let navigator = Arc::new(HistoryNavigator::new(Route::Appointments));
        let store = SessionStore::new(client, storage.clone(), navigator, Arc::new(notifier));
        assert!(store.initialize().await.is_authenticated());
        assert!(storage.state.set(store.subscribe()).is_ok());

        let expiring = store.clone();
        within_deadline(move || assert!(expiring.invalidate()));
        let leaving = store.clone();
        within_deadline(move || leaving.sign_out());

        let seen = storage.seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|state| *state == SessionState::Anonymous));
        assert_eq!(StoredSession::load(storage.as_ref()).unwrap(), None);
    }
}
