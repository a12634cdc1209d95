//! Shortcode engine.
//!
//! Expands bracketed inline markers in document text through registered
//! handlers:
//!
//! - **Self-closing**: `[gallery ids="1,2"/]`
//! - **Open**: `[youtube id="abc123"]`
//! - **Enclosing**: `[quote cite="Ada"]text[/quote]`
//! - **Escaped**: `[[youtube]]` renders as `[youtube]`
//!
//! # Architecture
//!
//! A [`Registry`] maps tag names to [`ShortcodeHandler`]s and compiles one
//! regular expression covering every registered name. A document pass
//! ([`Registry::expand`], [`Registry::strip_shortcodes`]) scans the text with
//! it, tokenizes each occurrence's attributes into [`Attributes`] and splices
//! in the handler's output. Unregistered tags never match and pass through.
//!
//! Hosts that register handlers per request plug in [`ShortcodeProvider`]s
//! and run documents through a [`ContentPreparer`]; hosts sharing one registry
//! between threads use [`SharedRegistry`].
//!
//! # Example
//!
//! ```
//! use scode_engine::{AttrValue, Registry, shortcode_atts};
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_fn("badge", |attrs, content, _| {
//!         let atts = shortcode_atts([("color", AttrValue::from("grey"))], attrs);
//!         Some(format!(
//!             r#"<span class="badge-{}">{}</span>"#,
//!             atts["color"],
//!             content.unwrap_or_default()
//!         ))
//!     })
//!     .unwrap();
//!
//! let html = registry.expand("New: [badge color=green]v2[/badge], [badge]old[/badge]");
//! assert_eq!(
//!     html,
//!     r#"New: <span class="badge-green">v2</span>, <span class="badge-grey">old</span>"#
//! );
//! ```

mod attrs;
mod defaults;
mod error;
mod handler;
mod pattern;
mod preparer;
mod provider;
mod registry;
mod scan;
mod shared;

pub use attrs::Attributes;
pub use defaults::{AttrValue, shortcode_atts};
pub use error::ShortcodeError;
pub use handler::ShortcodeHandler;
pub use preparer::{Article, ContentPreparer};
pub use provider::{Client, PrepareContext, ShortcodeProvider};
pub use registry::{Registry, Snapshot};
pub use scan::{DEFAULT_BACKTRACK_LIMIT, EngineLimits};
pub use shared::SharedRegistry;
