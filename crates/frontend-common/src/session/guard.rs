//! Route guard rules

use super::state::SessionState;
use crate::routes::Route;

/// What the guard wants done about the current route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Startup validation is still running; render a loading placeholder
    Wait,
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may be shown in `state`
pub fn evaluate(state: &SessionState, route: &Route) -> GuardDecision {
    match state {
        SessionState::Uninitialized => GuardDecision::Wait,
        SessionState::Anonymous if route.is_public() => GuardDecision::Allow,
        SessionState::Anonymous => GuardDecision::Redirect(Route::PUBLIC_ENTRY),
        SessionState::Authenticated(_) if *route == Route::LANDING => GuardDecision::Allow,
        SessionState::Authenticated(_) if route.is_public() => {
            GuardDecision::Redirect(Route::LANDING)
        }
        SessionState::Authenticated(identity) if !route.allows(identity.role) => {
            GuardDecision::Redirect(Route::LANDING)
        }
        SessionState::Authenticated(_) => GuardDecision::Allow,
    }
}
