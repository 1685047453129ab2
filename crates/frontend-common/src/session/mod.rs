//! Authentication session: state machine, store and route guard

pub mod error;
pub mod guard;
pub mod state;
pub mod store;

pub use error::SessionError;
pub use guard::{GuardDecision, evaluate};
pub use state::SessionState;
pub use store::SessionStore;
