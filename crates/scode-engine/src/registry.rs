//! Shortcode registry.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use fancy_regex::Regex;

use crate::scan::Scanner;
use crate::{Attributes, EngineLimits, ShortcodeError, ShortcodeHandler, pattern};

/// Registry of shortcode handlers keyed by tag name.
///
/// Holds at most one handler per name; adding a name again replaces the
/// previous handler. The tag pattern is compiled lazily and recompiled only
/// when the set of names (or the limits) changes.
///
/// # Example
///
/// ```
/// use scode_engine::Registry;
///
/// let mut registry = Registry::new();
/// registry.add_fn("year", |_, _, _| Some("2013".to_owned())).unwrap();
///
/// assert_eq!(registry.expand("(c) [year]"), "(c) 2013");
/// assert_eq!(registry.expand("[[year]]"), "[year]");
/// assert_eq!(registry.strip_shortcodes("(c) [year]"), "(c) ");
/// assert!(registry.has_shortcode("(c) [year/]", "year"));
/// ```
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Arc<dyn ShortcodeHandler>>,
    limits: EngineLimits,
    pattern: OnceLock<Option<Arc<Regex>>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tags", &self.tags())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given limits.
    #[must_use]
    pub fn with_limits(limits: EngineLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Limits applied to document passes.
    #[must_use]
    pub fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    /// Replace the limits applied to document passes.
    pub fn set_limits(&mut self, limits: EngineLimits) {
        if self.limits.backtrack_limit != limits.backtrack_limit {
            self.invalidate();
        }
        self.limits = limits;
    }

    /// Register `handler` for `name`, replacing any previous handler.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::InvalidName`] if `name` is empty or contains
    /// anything other than word characters and `-`. The registry is left
    /// unchanged.
    pub fn add_shortcode<H>(&mut self, name: &str, handler: H) -> Result<(), ShortcodeError>
    where
        H: ShortcodeHandler + 'static,
    {
        self.add_shared(name, Arc::new(handler))
    }

    /// Register a closure for `name`.
    ///
    /// Same as [`add_shortcode`](Self::add_shortcode), but lets the compiler
    /// infer the closure's argument types.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::InvalidName`] for an invalid name.
    pub fn add_fn<F>(&mut self, name: &str, handler: F) -> Result<(), ShortcodeError>
    where
        F: Fn(&Attributes, Option<&str>, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.add_shared(name, Arc::new(handler))
    }

    /// Register a handler that is shared with other registries.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::InvalidName`] for an invalid name.
    pub fn add_shared(
        &mut self,
        name: &str,
        handler: Arc<dyn ShortcodeHandler>,
    ) -> Result<(), ShortcodeError> {
        validate_name(name)?;
        if self.handlers.insert(name.to_owned(), handler).is_none() {
            self.invalidate();
        }
        tracing::debug!(tag = name, "Registered shortcode");
        Ok(())
    }

    /// Remove the handler for `name`. Returns whether one was registered.
    pub fn remove_shortcode(&mut self, name: &str) -> bool {
        let removed = self.handlers.remove(name).is_some();
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Remove every handler.
    pub fn remove_all_shortcodes(&mut self) {
        self.handlers.clear();
        self.invalidate();
    }

    /// Whether a handler is registered for `name`.
    #[must_use]
    pub fn shortcode_exists(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered tag names, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Replace every registered shortcode in `text` with its handler's output.
    ///
    /// Escaped occurrences (`[[tag]]`) lose one pair of brackets and are not
    /// rendered. Unregistered tags are left alone. Returns the input borrowed
    /// when nothing matched.
    #[must_use]
    pub fn expand<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.scanner().expand(text)
    }

    /// Remove every registered shortcode from `text`.
    ///
    /// Escaped occurrences are unescaped exactly as [`expand`](Self::expand)
    /// does.
    #[must_use]
    pub fn strip_shortcodes<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.scanner().strip(text)
    }

    /// Whether `text` contains an occurrence of the registered tag `name`.
    ///
    /// Always `false` for names that are not registered.
    #[must_use]
    pub fn has_shortcode(&self, text: &str, name: &str) -> bool {
        self.shortcode_exists(name) && self.scanner().contains(text, name)
    }

    /// Take a consistent copy of the handlers and compiled pattern.
    ///
    /// The snapshot shares handlers with the registry but is unaffected by
    /// later registrations.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pattern: self.pattern().cloned(),
            handlers: self.handlers.clone(),
            limits: self.limits.clone(),
        }
    }

    fn pattern(&self) -> Option<&Arc<Regex>> {
        self.pattern
            .get_or_init(|| {
                pattern::build(
                    self.handlers.keys().map(String::as_str),
                    self.limits.backtrack_limit,
                )
                .map(Arc::new)
            })
            .as_ref()
    }

    fn invalidate(&mut self) {
        self.pattern = OnceLock::new();
    }

    fn scanner(&self) -> Scanner<'_> {
        Scanner {
            pattern: self.pattern().map(|re| &**re),
            handlers: &self.handlers,
            limits: &self.limits,
        }
    }
}

/// Point-in-time copy of a [`Registry`] used for one or more document passes.
#[derive(Clone)]
pub struct Snapshot {
    pattern: Option<Arc<Regex>>,
    handlers: HashMap<String, Arc<dyn ShortcodeHandler>>,
    limits: EngineLimits,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&String> = self.handlers.keys().collect();
        tags.sort_unstable();
        f.debug_struct("Snapshot")
            .field("tags", &tags)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Snapshot {
    /// See [`Registry::expand`].
    #[must_use]
    pub fn expand<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.scanner().expand(text)
    }

    /// See [`Registry::strip_shortcodes`].
    #[must_use]
    pub fn strip_shortcodes<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.scanner().strip(text)
    }

    /// See [`Registry::has_shortcode`].
    #[must_use]
    pub fn has_shortcode(&self, text: &str, name: &str) -> bool {
        self.handlers.contains_key(name) && self.scanner().contains(text, name)
    }

    fn scanner(&self) -> Scanner<'_> {
        Scanner {
            pattern: self.pattern.as_deref(),
            handlers: &self.handlers,
            limits: &self.limits,
        }
    }
}

/// Tag names are word characters and hyphens, and at least one character long.
fn validate_name(name: &str) -> Result<(), ShortcodeError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ShortcodeError::InvalidName(name.to_owned()))
    }
}
