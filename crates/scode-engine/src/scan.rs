//! Scan and substitute passes over document text.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use fancy_regex::Regex;

use crate::pattern::TagMatch;
use crate::{Attributes, ShortcodeHandler};

/// Default regex backtracking budget per scan step.
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Bounds applied to every document pass.
///
/// # Example
///
/// ```
/// use scode_engine::{EngineLimits, Registry};
///
/// let limits = EngineLimits::new().with_max_input_len(16);
/// let mut registry = Registry::with_limits(limits);
/// registry.add_fn("x", |_, _, _| Some("X".to_owned())).unwrap();
///
/// assert_eq!(registry.expand("[x]"), "X");
/// // Oversized input is returned untouched.
/// assert_eq!(registry.expand("[x] and a much longer tail"), "[x] and a much longer tail");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLimits {
    /// Inputs longer than this many bytes are passed through unchanged.
    ///
    /// Default: unlimited
    pub max_input_len: Option<usize>,
    /// Backtracking budget handed to the regex engine.
    ///
    /// Default: [`DEFAULT_BACKTRACK_LIMIT`]
    pub backtrack_limit: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineLimits {
    /// Create limits with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_input_len: None,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }

    /// Set the maximum input length in bytes.
    #[must_use]
    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = Some(len);
        self
    }

    /// Set the regex backtracking budget.
    #[must_use]
    pub fn with_backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = limit;
        self
    }
}

/// Borrowed view of everything a pass needs: pattern, handlers and limits.
pub(crate) struct Scanner<'a> {
    pub pattern: Option<&'a Regex>,
    pub handlers: &'a HashMap<String, Arc<dyn ShortcodeHandler>>,
    pub limits: &'a EngineLimits,
}

impl Scanner<'_> {
    pub(crate) fn expand<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.replace(text, |m| {
            if m.is_escaped() {
                return Cow::Borrowed(m.unescaped());
            }
            let Some(handler) = self.handlers.get(m.name) else {
                tracing::warn!(tag = m.name, "No handler for matched shortcode, leaving it unchanged");
                return Cow::Borrowed(m.text);
            };
            let attrs = Attributes::parse(m.attrs);
            let output = handler
                .render(&attrs, m.content, m.name)
                .unwrap_or_default();
            Cow::Owned(format!("{}{output}{}", m.open, m.close))
        })
    }

    pub(crate) fn strip<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.replace(text, |m| {
            if m.is_escaped() {
                Cow::Borrowed(m.unescaped())
            } else {
                Cow::Owned(format!("{}{}", m.open, m.close))
            }
        })
    }

    pub(crate) fn contains(&self, text: &str, tag: &str) -> bool {
        let Some(re) = self.pattern_for(text) else {
            return false;
        };
        for caps in re.captures_iter(text) {
            match caps {
                Ok(caps) => {
                    if TagMatch::from_captures(&caps).is_some_and(|m| m.name == tag) {
                        return true;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Shortcode scan aborted");
                    return false;
                }
            }
        }
        false
    }

    /// Pattern to scan `text` with, or `None` when the pass is a no-op.
    fn pattern_for(&self, text: &str) -> Option<&Regex> {
        let re = self.pattern?;
        if let Some(max) = self.limits.max_input_len
            && text.len() > max
        {
            tracing::warn!(len = text.len(), max, "Input exceeds shortcode size limit, skipping");
            return None;
        }
        Some(re)
    }

    /// Replace every match with the output of `f`.
    ///
    /// Text between matches is copied verbatim. If the regex engine gives up
    /// (backtrack limit), the rest of the input is copied unchanged.
    fn replace<'t, F>(&self, text: &'t str, mut f: F) -> Cow<'t, str>
    where
        F: FnMut(&TagMatch<'t>) -> Cow<'t, str>,
    {
        let Some(re) = self.pattern_for(text) else {
            return Cow::Borrowed(text);
        };

        let mut output = String::new();
        let mut last = 0;
        let mut replaced = 0usize;

        for caps in re.captures_iter(text) {
            let caps = match caps {
                Ok(caps) => caps,
                Err(e) => {
                    tracing::warn!(error = %e, offset = last, "Shortcode scan aborted, keeping remaining text");
                    break;
                }
            };
            let Some(m) = TagMatch::from_captures(&caps) else {
                continue;
            };
            output.push_str(&text[last..m.start]);
            output.push_str(&f(&m));
            last = m.end;
            replaced += 1;
        }

        if replaced == 0 {
            return Cow::Borrowed(text);
        }
        output.push_str(&text[last..]);
        tracing::debug!(replaced, "Shortcode pass completed");
        Cow::Owned(output)
    }
}
