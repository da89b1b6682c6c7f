use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::User;

/// Who is logged in, if anyone.
///
/// `token` and `user` are written together; a reader never sees one from a
/// different login than the other.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            is_authenticated: true,
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("is_authenticated", &self.is_authenticated)
            .finish()
    }
}

/// Observable holder of the current `SessionState`.
///
/// Mutations replace the whole record; subscribers are woken on every
/// change and always read a complete snapshot.
pub struct SessionStore {
    tx: watch::Sender<Arc<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(SessionState::anonymous()));
        Self { tx }
    }

    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.tx.subscribe()
    }

    pub fn replace(&self, state: SessionState) {
        self.tx.send_replace(Arc::new(state));
    }

    /// Replace the record unless it already equals `state`.
    /// Returns whether subscribers were notified.
    pub fn replace_if_changed(&self, state: SessionState) -> bool {
        self.tx.send_if_modified(move |current| {
            if **current == state {
                false
            } else {
                *current = Arc::new(state);
                true
            }
        })
    }

    /// Trusted setter: flips the flag without touching token or user.
    pub fn set_authenticated(&self, value: bool) {
        self.tx
            .send_modify(|current| Arc::make_mut(current).is_authenticated = value);
    }

    /// Trusted setter: swaps the profile without touching token or flag.
    pub fn set_user(&self, user: Option<User>) {
        self.tx.send_modify(move |current| Arc::make_mut(current).user = user);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
