use agendify_core::Identity;

/// Where the session stands
///
/// `Uninitialized` only exists until startup validation resolves; nothing
/// transitions back into it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}
