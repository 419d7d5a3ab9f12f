//! Session-backed cart.
//!
//! The cart store is synchronous; the session is async. A request reads the
//! serialized cart out of the session once into a [`SessionSnapshot`], runs
//! the store against that snapshot, and [`SessionCart::commit`] writes the
//! snapshot back if anything changed.
//!
//! Two tabs of the same browser share one session, so concurrent cart writes
//! are last-write-wins.

use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::StatusCode, http::request::Parts};
use tower_sessions::Session;

use yoloverse_core::{CART_STORAGE_KEY, CartStorage, CartStore};

/// Single-key copy of the session's cart entry.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    value: Option<String>,
    dirty: bool,
}

impl SessionSnapshot {
    /// Snapshot holding `value` for the cart key.
    #[must_use]
    pub const fn new(value: Option<String>) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    /// Whether the store wrote or removed the cart since loading.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl CartStorage for SessionSnapshot {
    fn read(&self, key: &str) -> Option<String> {
        (key == CART_STORAGE_KEY).then(|| self.value.clone()).flatten()
    }

    fn write(&mut self, key: &str, value: String) {
        if key == CART_STORAGE_KEY {
            self.value = Some(value);
            self.dirty = true;
        }
    }

    fn remove(&mut self, key: &str) {
        if key == CART_STORAGE_KEY {
            self.value = None;
            self.dirty = true;
        }
    }
}

/// The visitor's cart, loaded from their session.
///
/// Derefs to the underlying [`CartStore`]. Call [`commit`](Self::commit)
/// after mutating.
pub struct SessionCart {
    session: Session,
    store: CartStore<SessionSnapshot>,
}

impl SessionCart {
    /// Load the cart stored in `session`.
    ///
    /// A session read failure is logged and treated as an empty cart.
    pub async fn load(session: Session) -> Self {
        let raw = match session.get::<String>(CART_STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart from session");
                None
            }
        };

        Self {
            session,
            store: CartStore::open(SessionSnapshot::new(raw)),
        }
    }

    /// Write changes back to the session.
    ///
    /// # Errors
    ///
    /// Returns error if the session store rejects the write.
    pub async fn commit(self) -> Result<(), tower_sessions::session::Error> {
        let snapshot = self.store.into_storage();
        if !snapshot.is_dirty() {
            return Ok(());
        }

        match snapshot.value {
            Some(value) => self.session.insert(CART_STORAGE_KEY, value).await,
            None => self
                .session
                .remove::<String>(CART_STORAGE_KEY)
                .await
                .map(|_| ()),
        }
    }
}

impl Deref for SessionCart {
    type Target = CartStore<SessionSnapshot>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl DerefMut for SessionCart {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::load(session).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tracks_writes() {
        let mut snapshot = SessionSnapshot::new(None);
        assert!(!snapshot.is_dirty());
        assert!(snapshot.read(CART_STORAGE_KEY).is_none());

        snapshot.write(CART_STORAGE_KEY, "[]".to_string());
        assert!(snapshot.is_dirty());
        assert_eq!(snapshot.read(CART_STORAGE_KEY).as_deref(), Some("[]"));

        snapshot.remove(CART_STORAGE_KEY);
        assert!(snapshot.read(CART_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_snapshot_ignores_other_keys() {
        let mut snapshot = SessionSnapshot::new(Some("[]".to_string()));
        snapshot.write("other", "x".to_string());
        assert!(!snapshot.is_dirty());
        assert!(snapshot.read("other").is_none());
    }

    #[test]
    fn test_malformed_session_value_is_empty_cart() {
        let store = CartStore::open(SessionSnapshot::new(Some("{broken".to_string())));
        assert!(store.is_empty());
        assert!(!store.into_storage().is_dirty());
    }
}
