//! Route access decisions.
//!
//! Pure functions of [`SessionState`]; the router layer performs the actual
//! navigation.

use crate::session::SessionState;

/// Where a redirect leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// The notes list (protected).
    Notes,
    /// The sign-in screen.
    Auth,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Notes => "/",
            Destination::Auth => "/auth",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// The initial session is not known yet; render nothing.
    Pending,
    Allow,
    Redirect(Destination),
}

/// Access to the protected notes path.
pub fn notes_access(state: &SessionState) -> Access {
    if state.loading {
        Access::Pending
    } else if state.is_signed_in() {
        Access::Allow
    } else {
        Access::Redirect(Destination::Auth)
    }
}

/// Access to the sign-in path. Signed-in users are sent back to their notes.
pub fn auth_access(state: &SessionState) -> Access {
    if state.loading {
        Access::Pending
    } else if state.is_signed_in() {
        Access::Redirect(Destination::Notes)
    } else {
        Access::Allow
    }
}
