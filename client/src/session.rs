//! Session persistence and the session manager.
//!
//! # Design
//! The token and user profile live under fixed keys in a string key-value
//! store (`SessionStore`). All reads and writes flow through one authority,
//! [`SessionManager`]: call sites never mutate the store directly. The
//! manager notifies subscribers on every transition, so consumers react to
//! session changes (in particular, `Invalidated` after a 401 is the signal
//! to navigate to the login entry point) instead of polling shared state.
//!
//! Last writer wins across threads — a single-user assumption the backend
//! shares.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::User;

/// Store key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Store key for the serialized user profile.
pub const USER_KEY: &str = "user";

/// String key-value persistence for session data.
///
/// The reference implementation is in-process; a host embedding this client
/// can back it with whatever durable store it has.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process `SessionStore` backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
    }
}

/// Session transitions pushed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login stored a fresh token and user.
    Established,
    /// An explicit logout removed the session.
    Cleared,
    /// The server rejected the session (401); it has been removed.
    /// Consumers should treat this as the navigate-to-login trigger.
    Invalidated,
}

type Listener = Box<dyn Fn(SessionEvent) + Send + Sync>;

struct Inner {
    store: Box<dyn SessionStore>,
    listeners: Mutex<Vec<Listener>>,
}

/// Single authority over the persisted session. Cheap to clone; all clones
/// share the same store and subscriber list.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Manager over a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Persist a fresh token and user profile, then notify subscribers.
    pub fn establish(&self, token: &str, user: &User) {
        self.inner.store.set(TOKEN_KEY, token);
        match serde_json::to_string(user) {
            Ok(json) => self.inner.store.set(USER_KEY, &json),
            // A profile that cannot be serialized leaves the previous value
            // in place; the token is still usable.
            Err(e) => tracing::warn!(error = %e, "failed to persist user profile"),
        }
        tracing::debug!(username = %user.username, "session established");
        self.notify(SessionEvent::Established);
    }

    /// Remove the session on explicit logout.
    pub fn clear(&self) {
        self.remove_keys();
        tracing::debug!("session cleared");
        self.notify(SessionEvent::Cleared);
    }

    /// Remove the session after the server rejected it. Called once per 401
    /// response, from any call site.
    pub fn invalidate(&self) {
        self.remove_keys();
        tracing::warn!("session invalidated by server");
        self.notify(SessionEvent::Invalidated);
    }

    pub fn token(&self) -> Option<String> {
        self.inner.store.get(TOKEN_KEY)
    }

    /// The persisted user profile; `None` when absent or unreadable.
    pub fn user(&self) -> Option<User> {
        let json = self.inner.store.get(USER_KEY)?;
        serde_json::from_str(&json).ok()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Register a callback invoked on every session transition.
    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + Send + Sync + 'static) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(listener));
    }

    fn remove_keys(&self) {
        self.inner.store.remove(TOKEN_KEY);
        self.inner.store.remove(USER_KEY);
    }

    fn notify(&self, event: SessionEvent) {
        let listeners = self.inner.listeners.lock().unwrap_or_else(|e| e.into_inner());
        for listener in listeners.iter() {
            listener(event);
        }
    }
}
