//! Thread-safe registry handle.

use std::borrow::Cow;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Registry, Snapshot};

/// Cloneable handle to a [`Registry`] shared between threads.
///
/// Registration takes the write lock. Document passes take a [`Snapshot`]
/// under the read lock and release it before scanning, so a handler may
/// itself register or remove shortcodes without deadlocking, and a
/// registration racing with a pass never changes handlers mid-document.
///
/// # Example
///
/// ```
/// use scode_engine::SharedRegistry;
///
/// let shared = SharedRegistry::default();
/// shared.update(|registry| {
///     registry.add_fn("hr", |_, _, _| Some("<hr>".to_owned()))
/// }).unwrap();
///
/// let worker = shared.clone();
/// let output = std::thread::spawn(move || worker.expand("[hr]").into_owned())
///     .join()
///     .unwrap();
/// assert_eq!(output, "<hr>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}

impl SharedRegistry {
    /// Wrap a registry for sharing.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Lock the registry for reading.
    ///
    /// A lock poisoned by a panicking handler is recovered: the registry has
    /// no invariant a panic could leave half-updated.
    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the registry for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the registry locked for writing.
    pub fn update<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        f(&mut self.write())
    }

    /// Copy the current handlers and pattern.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }

    /// Whether a handler is registered for `name`.
    #[must_use]
    pub fn shortcode_exists(&self, name: &str) -> bool {
        self.read().shortcode_exists(name)
    }

    /// See [`Registry::expand`].
    #[must_use]
    pub fn expand<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.snapshot().expand(text)
    }

    /// See [`Registry::strip_shortcodes`].
    #[must_use]
    pub fn strip_shortcodes<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.snapshot().strip_shortcodes(text)
    }

    /// See [`Registry::has_shortcode`].
    #[must_use]
    pub fn has_shortcode(&self, text: &str, name: &str) -> bool {
        self.snapshot().has_shortcode(text, name)
    }
}
