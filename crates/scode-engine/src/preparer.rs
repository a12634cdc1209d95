//! Content preparation: providers first, then the shortcode pass.

use std::borrow::Cow;

use crate::{PrepareContext, SharedRegistry, ShortcodeProvider};

/// A piece of content flowing through the preparer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    /// Article title (never expanded).
    pub title: String,
    /// Article body.
    pub text: String,
}

impl Article {
    /// Create an article.
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Prepares document text by letting every provider register its shortcodes
/// and then expanding them.
///
/// # Example
///
/// ```
/// use scode_engine::{
///     ContentPreparer, PrepareContext, Registry, ShortcodeError, ShortcodeProvider,
/// };
///
/// struct Year;
///
/// impl ShortcodeProvider for Year {
///     fn name(&self) -> &str { "year" }
///
///     fn prepare(&self, registry: &mut Registry, _ctx: &PrepareContext) -> Result<(), ShortcodeError> {
///         registry.add_fn("year", |_, _, _| Some("2013".to_owned()))
///     }
/// }
///
/// let preparer = ContentPreparer::new().with_provider(Year);
/// let ctx = PrepareContext::new("blog.article");
///
/// assert_eq!(preparer.prepare(&ctx, "(c) [year]"), "(c) 2013");
/// ```
#[derive(Default)]
pub struct ContentPreparer {
    registry: SharedRegistry,
    providers: Vec<Box<dyn ShortcodeProvider>>,
}

impl ContentPreparer {
    /// Create a preparer with an empty registry and no providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preparer working on an existing registry.
    #[must_use]
    pub fn with_registry(registry: SharedRegistry) -> Self {
        Self {
            registry,
            providers: Vec::new(),
        }
    }

    /// Add a handler provider.
    #[must_use]
    pub fn with_provider<P: ShortcodeProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// The registry handlers are registered into.
    #[must_use]
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Let every provider register its shortcodes for `ctx`.
    ///
    /// A provider that fails to register is logged and skipped; the others
    /// still run.
    pub fn trigger(&self, ctx: &PrepareContext) {
        let mut registry = self.registry.write();
        for provider in &self.providers {
            if let Err(e) = provider.prepare(&mut registry, ctx) {
                tracing::warn!(
                    provider = provider.name(),
                    context = %ctx.context,
                    error = %e,
                    "Shortcode provider failed"
                );
            }
        }
    }

    /// Trigger the providers and expand the shortcodes in `text`.
    #[must_use]
    pub fn prepare(&self, ctx: &PrepareContext, text: &str) -> String {
        self.trigger(ctx);
        self.registry.expand(text).into_owned()
    }

    /// Trigger the providers and expand the shortcodes in an article body.
    pub fn prepare_article(&self, ctx: &PrepareContext, article: &mut Article) {
        self.trigger(ctx);
        if let Some(expanded) = owned_if_changed(self.registry.expand(&article.text)) {
            article.text = expanded;
        }
    }

    /// Trigger the providers and remove the shortcodes from `text`.
    ///
    /// Used where markup is unwanted, such as excerpts and feeds.
    #[must_use]
    pub fn strip(&self, ctx: &PrepareContext, text: &str) -> String {
        self.trigger(ctx);
        self.registry.strip_shortcodes(text).into_owned()
    }
}

fn owned_if_changed(text: Cow<'_, str>) -> Option<String> {
    match text {
        Cow::Owned(s) => Some(s),
        Cow::Borrowed(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Client, Registry, ShortcodeError};
    use pretty_assertions::assert_eq;

    struct Fixed {
        tag: &'static str,
        output: &'static str,
    }

    impl ShortcodeProvider for Fixed {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn prepare(&self, registry: &mut Registry, ctx: &PrepareContext) -> Result<(), ShortcodeError> {
            if ctx.is_admin() {
                return Ok(());
            }
            let output = self.output;
            registry.add_fn(self.tag, move |_, _, _| Some(output.to_owned()))
        }
    }

    struct Broken;

    impl ShortcodeProvider for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn prepare(&self, registry: &mut Registry, _ctx: &PrepareContext) -> Result<(), ShortcodeError> {
            registry.add_fn("not valid", |_, _, _| None)
        }
    }

    fn preparer() -> ContentPreparer {
        ContentPreparer::new()
            .with_provider(Broken)
            .with_provider(Fixed {
                tag: "hello",
                output: "Hello!",
            })
    }

    #[test]
    fn test_prepare_expands_after_trigger() {
        let preparer = preparer();
        let ctx = PrepareContext::new("blog.article");
        assert_eq!(preparer.prepare(&ctx, "[hello] [[hello]]"), "Hello! [hello]");
    }

    #[test]
    fn test_failing_provider_does_not_block_others() {
        let preparer = preparer();
        preparer.trigger(&PrepareContext::new("x"));
        let registry = preparer.registry().read();
        assert_eq!(registry.tags(), vec!["hello"]);
    }

    #[test]
    fn test_admin_context_registers_nothing() {
        let preparer = preparer();
        let ctx = PrepareContext::new("x").with_client(Client::Administrator);
        assert_eq!(preparer.prepare(&ctx, "[hello]"), "[hello]");
    }

    #[test]
    fn test_prepare_article_touches_text_only() {
        let preparer = preparer();
        let mut article = Article::new("[hello]", "Say [hello]");
        preparer.prepare_article(&PrepareContext::new("x"), &mut article);
        assert_eq!(article, Article::new("[hello]", "Say Hello!"));
    }

    #[test]
    fn test_strip() {
        let preparer = preparer();
        let text = preparer.strip(&PrepareContext::new("feed"), "Say [hello]!");
        assert_eq!(text, "Say !");
    }

    #[test]
    fn test_existing_registry_is_used() {
        let mut registry = Registry::new();
        registry.add_fn("pre", |_, _, _| Some("P".to_owned())).unwrap();
        let preparer = ContentPreparer::with_registry(registry.into());
        assert_eq!(preparer.prepare(&PrepareContext::new("x"), "[pre]"), "P");
    }
}
