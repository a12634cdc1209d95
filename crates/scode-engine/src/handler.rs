//! Shortcode handler trait.

use crate::Attributes;

/// Handler producing the replacement text for a shortcode.
///
/// Called once per occurrence with the parsed attributes, the enclosed body
/// (`None` for self-closing or unclosed tags) and the matched tag name.
/// Returning `None` substitutes the empty string.
///
/// Closures with the matching signature implement this trait, so most
/// handlers never name it:
///
/// ```
/// use scode_engine::Registry;
///
/// let mut registry = Registry::new();
/// registry
///     .add_fn("b", |_, content, _| content.map(|body| format!("<strong>{body}</strong>")))
///     .unwrap();
///
/// assert_eq!(registry.expand("[b]bold[/b]"), "<strong>bold</strong>");
/// ```
///
/// # Thread Safety
///
/// Handlers are `Send + Sync` because a [`SharedRegistry`](crate::SharedRegistry)
/// hands the same handler to every thread that expands documents.
pub trait ShortcodeHandler: Send + Sync {
    /// Render one occurrence of the shortcode.
    fn render(&self, attrs: &Attributes, content: Option<&str>, tag: &str) -> Option<String>;
}

impl<F> ShortcodeHandler for F
where
    F: Fn(&Attributes, Option<&str>, &str) -> Option<String> + Send + Sync,
{
    fn render(&self, attrs: &Attributes, content: Option<&str>, tag: &str) -> Option<String> {
        self(attrs, content, tag)
    }
}
