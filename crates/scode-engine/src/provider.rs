//! Handler providers.
//!
//! A provider registers the shortcodes it supports right before content is
//! prepared, and may look at the [`PrepareContext`] to decide not to.

use crate::{Registry, ShortcodeError};

/// Which side of the host application is rendering the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Client {
    /// Public site.
    #[default]
    Site,
    /// Administration back end.
    Administrator,
}

/// Information about the content being prepared.
///
/// # Example
///
/// ```
/// use scode_engine::{Client, PrepareContext};
///
/// let ctx = PrepareContext::new("blog.article")
///     .with_client(Client::Administrator)
///     .with_page(2);
///
/// assert!(ctx.is_admin());
/// assert_eq!(ctx.page, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareContext {
    /// Identifier of the content source (e.g. `"blog.article"`).
    pub context: String,
    /// Rendering side.
    pub client: Client,
    /// Page number for paginated content (0 when not paginated).
    pub page: usize,
}

impl PrepareContext {
    /// Create a site-side context for the given content source.
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }

    /// Set the rendering side.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the page number.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Whether the administration back end is rendering.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.client == Client::Administrator
    }
}

/// Source of shortcode handlers.
///
/// Called before every document is prepared. Registering a name that is
/// already registered replaces the handler, so providers may register
/// unconditionally each time.
pub trait ShortcodeProvider: Send + Sync {
    /// Provider name, used in log messages.
    fn name(&self) -> &str;

    /// Register this provider's shortcodes.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the first shortcode that could not
    /// be registered.
    fn prepare(&self, registry: &mut Registry, ctx: &PrepareContext) -> Result<(), ShortcodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SiteOnly;

    impl ShortcodeProvider for SiteOnly {
        fn name(&self) -> &'static str {
            "site-only"
        }

        fn prepare(&self, registry: &mut Registry, ctx: &PrepareContext) -> Result<(), ShortcodeError> {
            if ctx.is_admin() {
                return Ok(());
            }
            registry.add_fn("site", |_, _, _| Some("on site".to_owned()))
        }
    }

    #[test]
    fn test_default_context_is_site() {
        let ctx = PrepareContext::new("sidebar.block");
        assert_eq!(ctx.client, Client::Site);
        assert_eq!(ctx.page, 0);
        assert!(!ctx.is_admin());
    }

    #[test]
    fn test_provider_consults_context() {
        let mut registry = Registry::new();
        let admin = PrepareContext::new("x").with_client(Client::Administrator);
        SiteOnly.prepare(&mut registry, &admin).unwrap();
        assert!(!registry.shortcode_exists("site"));

        SiteOnly.prepare(&mut registry, &PrepareContext::new("x")).unwrap();
        assert_eq!(registry.expand("[site]"), "on site");
        assert_eq!(SiteOnly.name(), "site-only");
    }
}
