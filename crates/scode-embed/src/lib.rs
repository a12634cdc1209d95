//! Embed shortcodes for the scode engine.
//!
//! Provides the `youtube` shortcode and the provider that registers it.

mod youtube;

pub use youtube::{YOUTUBE_TAG, YoutubeOptions, YoutubeProvider, YoutubeShortcode};
