//! Disposable paging cookies.
//!
//! A cookie is one reference to a server-side cursor entry. Duplicating a
//! cookie takes another reference; releasing gives one back. The entry lives
//! until its last reference is released, so a resume point can be handed to a
//! query before the session lets go of its own handle.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::StoreError;

/// Opaque identifier of a server-side cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CookieToken(Uuid);

impl CookieToken {
    /// Generates a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CookieToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Server side of the cookie protocol: reference counting of cursor entries.
pub trait CursorRegistry: Send + Sync {
    /// Takes an additional reference on the cursor.
    fn retain(&self, token: CookieToken) -> Result<(), StoreError>;
    /// Gives back one reference; the cursor is freed with its last reference.
    fn release(&self, token: CookieToken) -> Result<(), StoreError>;
}

/// Owned handle on a server-side cursor.
///
/// [`release`](PagingCookie::release) consumes the handle, so a cookie cannot
/// be released twice. A handle dropped without release is released on drop
/// and logged.
pub struct PagingCookie {
    token: CookieToken,
    registry: Arc<dyn CursorRegistry>,
    released: bool,
}

impl PagingCookie {
    /// Wraps a reference the caller already holds on `token`.
    pub fn new(token: CookieToken, registry: Arc<dyn CursorRegistry>) -> Self {
        Self {
            token,
            registry,
            released: false,
        }
    }

    /// Token this cookie refers to.
    pub fn token(&self) -> CookieToken {
        self.token
    }

    /// Creates a second handle on the same cursor.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownCookie`] if the cursor no longer exists.
    pub fn duplicate(&self) -> Result<PagingCookie, StoreError> {
        self.registry.retain(self.token)?;
        Ok(Self::new(self.token, Arc::clone(&self.registry)))
    }

    /// Releases this handle.
    pub fn release(mut self) -> Result<(), StoreError> {
        self.released = true;
        self.registry.release(self.token)
    }
}

impl fmt::Debug for PagingCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingCookie")
            .field("token", &self.token)
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for PagingCookie {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::warn!(token = %self.token, "paging cookie dropped without release");
        if let Err(err) = self.registry.release(self.token) {
            tracing::warn!(token = %self.token, error = %err, "failed to release dropped paging cookie");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counting {
        refs: Mutex<HashMap<CookieToken, usize>>,
    }

    impl Counting {
        fn open(self: &Arc<Self>) -> PagingCookie {
            let token = CookieToken::generate();
            self.refs.lock().unwrap().insert(token, 1);
            PagingCookie::new(token, self.clone())
        }

        fn refs(&self, token: CookieToken) -> Option<usize> {
            self.refs.lock().unwrap().get(&token).copied()
        }
    }

    impl CursorRegistry for Counting {
        fn retain(&self, token: CookieToken) -> Result<(), StoreError> {
            let mut refs = self.refs.lock().unwrap();
            let count = refs.get_mut(&token).ok_or(StoreError::UnknownCookie(token))?;
            *count += 1;
            Ok(())
        }

        fn release(&self, token: CookieToken) -> Result<(), StoreError> {
            let mut refs = self.refs.lock().unwrap();
            let count = refs.get_mut(&token).ok_or(StoreError::UnknownCookie(token))?;
            *count -= 1;
            if *count == 0 {
                refs.remove(&token);
            }
            Ok(())
        }
    }

    #[test]
    fn duplicate_keeps_cursor_alive_after_original_release() {
        let registry = Arc::new(Counting::default());
        let cookie = registry.open();
        let token = cookie.token();

        let copy = cookie.duplicate().unwrap();
        assert_eq!(registry.refs(token), Some(2));

        cookie.release().unwrap();
        assert_eq!(registry.refs(token), Some(1));

        copy.release().unwrap();
        assert_eq!(registry.refs(token), None);
    }

    #[test]
    fn drop_releases_forgotten_cookie() {
        let registry = Arc::new(Counting::default());
        let token = {
            let cookie = registry.open();
            cookie.token()
        };
        assert_eq!(registry.refs(token), None);
    }

    #[test]
    fn duplicate_of_freed_cursor_fails() {
        let registry = Arc::new(Counting::default());
        let cookie = registry.open();
        registry.refs.lock().unwrap().clear();

        assert!(matches!(
            cookie.duplicate(),
            Err(StoreError::UnknownCookie(_))
        ));
        assert!(cookie.release().is_err());
    }
}
