//! Atomically swappable locale snapshot.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | [`LocaleHandle::load`] | wait-free, no allocation |
//! | [`LocaleHandle::current`] | wait-free, one refcount bump |
//! | [`LocaleHandle::swap`] | one `Arc` allocation, atomic pointer swap |
//!
//! Readers that already hold a snapshot keep it across a swap; the old
//! [`Translator`] is dropped when its last reader lets go.

use std::path::Path;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::load::load_locale;
use crate::translator::Translator;

/// Shared handle to the active locale.
pub struct LocaleHandle {
    inner: ArcSwap<Translator>,
}

impl LocaleHandle {
    #[must_use]
    pub fn new(translator: Translator) -> Self {
        Self {
            inner: ArcSwap::from_pointee(translator),
        }
    }

    /// Borrow the active snapshot for a short-lived read.
    #[inline]
    pub fn load(&self) -> Guard<Arc<Translator>> {
        self.inner.load()
    }

    /// Owned reference to the active snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Translator> {
        self.inner.load_full()
    }

    /// Install `translator` and return the snapshot it replaced.
    pub fn swap(&self, translator: Translator) -> Arc<Translator> {
        let next = Arc::new(translator);
        let previous = self.inner.swap(Arc::clone(&next));
        tracing::info!(
            target: "tscat.lookup",
            from = %previous.locale(),
            to = %next.locale(),
            "locale swapped"
        );
        previous
    }

    /// Load a catalog file and swap it in.
    ///
    /// On error the active snapshot is left in place.
    pub fn reload(&self, path: impl AsRef<Path>) -> tscat_core::Result<Arc<Translator>> {
        let translator = load_locale(path)?;
        Ok(self.swap(translator))
    }
}

impl std::fmt::Debug for LocaleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleHandle")
            .field("locale", &self.inner.load().locale())
            .finish()
    }
}
