//! YouTube embed shortcode: `[youtube id="dQw4w9WgXcQ" width=640]`.

use scode_engine::{
    AttrValue, Attributes, PrepareContext, Registry, ShortcodeError, ShortcodeHandler,
    ShortcodeProvider, shortcode_atts,
};

/// Tag name the YouTube handler is registered under.
pub const YOUTUBE_TAG: &str = "youtube";

/// Rendering options for the YouTube embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoutubeOptions {
    /// Default player width.
    ///
    /// Default: 480
    pub width: u32,
    /// Default player height.
    ///
    /// Default: 390
    pub height: u32,
    /// URL prefix the video id is appended to.
    pub embed_url: String,
}

impl Default for YoutubeOptions {
    fn default() -> Self {
        Self {
            width: 480,
            height: 390,
            embed_url: "http://www.youtube.com/embed/".to_owned(),
        }
    }
}

/// Handler rendering a YouTube player iframe.
///
/// Recognized attributes: `id` (required), `width` and `height`. Without an
/// id, or with the id `0`, the shortcode renders as nothing.
///
/// # Example
///
/// ```
/// use scode_embed::YoutubeShortcode;
/// use scode_engine::Registry;
///
/// let mut registry = Registry::new();
/// registry.add_shortcode("youtube", YoutubeShortcode::default()).unwrap();
///
/// let html = registry.expand(r#"[youtube id="abc123"]"#);
/// assert!(html.contains(r#"src="http://www.youtube.com/embed/abc123""#));
/// assert_eq!(registry.expand("[youtube]"), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct YoutubeShortcode {
    options: YoutubeOptions,
}

impl YoutubeShortcode {
    /// Create the handler with the given options.
    #[must_use]
    pub fn new(options: YoutubeOptions) -> Self {
        Self { options }
    }
}

impl ShortcodeHandler for YoutubeShortcode {
    fn render(&self, attrs: &Attributes, _content: Option<&str>, _tag: &str) -> Option<String> {
        let atts = shortcode_atts(
            [
                ("id", AttrValue::from("")),
                ("width", self.options.width.into()),
                ("height", self.options.height.into()),
            ],
            attrs,
        );

        let id = atts["id"].to_string();
        let id = id.trim();
        if id.is_empty() || id == "0" {
            tracing::debug!("Skipping youtube shortcode without id");
            return None;
        }

        Some(format!(
            r#"<iframe title="YouTube video player" width="{}" height="{}" src="{}{id}" frameborder="0" allowfullscreen></iframe>"#,
            atts["width"], atts["height"], self.options.embed_url,
        ))
    }
}

/// Provider registering [`YoutubeShortcode`] on the public site.
///
/// Nothing is registered while the administration back end renders.
#[derive(Debug, Clone, Default)]
pub struct YoutubeProvider {
    options: YoutubeOptions,
}

impl YoutubeProvider {
    /// Create the provider with the given options.
    #[must_use]
    pub fn new(options: YoutubeOptions) -> Self {
        Self { options }
    }
}

impl ShortcodeProvider for YoutubeProvider {
    fn name(&self) -> &'static str {
        YOUTUBE_TAG
    }

    fn prepare(&self, registry: &mut Registry, ctx: &PrepareContext) -> Result<(), ShortcodeError> {
        if ctx.is_admin() {
            return Ok(());
        }
        registry.add_shortcode(YOUTUBE_TAG, YoutubeShortcode::new(self.options.clone()))
    }
}
