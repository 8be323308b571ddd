use infoevents_store::{PagedQuery, PagingCookie, StoreError};

/// Owner of the one paging cookie a session may hold.
///
/// Every cookie that passes through here is released exactly once: when it is
/// superseded, when it has been handed to a query, or at teardown. Release
/// failures are logged and swallowed.
#[derive(Debug, Default)]
pub struct CursorManager {
    current: Option<PagingCookie>,
}

impl CursorManager {
    /// Creates a manager holding no cookie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a cookie is held.
    pub fn is_holding(&self) -> bool {
        self.current.is_some()
    }

    /// Returns to the "no cursor" state.
    pub fn prepare(&mut self) {
        self.release_current();
    }

    /// Replaces the held cookie with `next`, releasing the old one first.
    pub fn advance(&mut self, next: Option<PagingCookie>) {
        self.release_current();
        self.current = next;
    }

    /// Hands the held position to `query` as its resume point.
    ///
    /// A duplicate is applied to the query before the held cookie is
    /// released, so the server-side cursor is never unreferenced in between.
    /// Without a held cookie this does nothing.
    ///
    /// # Errors
    ///
    /// Returns the store error if the cursor can no longer be duplicated; the
    /// held cookie is kept in that case.
    pub fn resume_into<Q: PagedQuery>(&mut self, query: &mut Q) -> Result<(), StoreError> {
        let Some(held) = self.current.take() else {
            return Ok(());
        };

        let resume = match held.duplicate() {
            Ok(resume) => resume,
            Err(err) => {
                self.current = Some(held);
                return Err(err);
            }
        };
        query.set_paging_cookie(resume);
        release(held);
        Ok(())
    }

    /// Releases any held cookie.
    pub fn teardown(&mut self) {
        self.release_current();
    }

    fn release_current(&mut self) {
        if let Some(cookie) = self.current.take() {
            release(cookie);
        }
    }
}

fn release(cookie: PagingCookie) {
    let token = cookie.token();
    if let Err(err) = cookie.release() {
        tracing::warn!(%token, error = %err, "failed to release paging cookie");
    }
}
