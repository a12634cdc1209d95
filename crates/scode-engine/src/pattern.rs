//! Shortcode tag pattern.
//!
//! One regular expression recognizes every registered tag in all its forms:
//!
//! ```text
//! [name attrs]               opening tag, no body
//! [name attrs/]              self-closing
//! [name attrs]body[/name]    enclosing
//! [[name ...]]               escaped, rendered literally as [name ...]
//! ```

use fancy_regex::{Captures, Regex, RegexBuilder};

/// Build the tag pattern for the given names.
///
/// Returns `None` when there are no names, since an empty alternation would
/// match every bracket.
///
/// Capture groups:
/// 1. `[` opening an escape, or empty
/// 2. tag name
/// 3. attribute span
/// 4. `/` of a self-closing tag
/// 5. enclosed body
/// 6. `]` closing an escape, or empty
pub(crate) fn build<'a, I>(names: I, backtrack_limit: usize) -> Option<Regex>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names: Vec<&str> = names.into_iter().collect();
    if names.is_empty() {
        return None;
    }
    names.sort_unstable();

    let alternation = names
        .iter()
        .map(|name| fancy_regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let source = pattern_source(&alternation);

    match RegexBuilder::new(&source)
        .backtrack_limit(backtrack_limit)
        .build()
    {
        Ok(re) => {
            tracing::debug!(tags = names.len(), "Built shortcode pattern");
            Some(re)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to compile shortcode pattern");
            None
        }
    }
}

/// The body quantifiers are possessive: an opening tag without a closing tag
/// gives up on the body after one linear scan instead of retrying every
/// shorter prefix of the rest of the document.
fn pattern_source(alternation: &str) -> String {
    format!(
        concat!(
            r"(?s)\[(\[?)",
            r"({})",
            r"(?![\w-])",
            r"([^\]/]*(?:/(?!\])[^\]/]*)*?)",
            r"(?:(/)\]|\](?:([^\[]*+(?:\[(?!/\2\])[^\[]*+)*+)\[/\2\])?)",
            r"(\]?)",
        ),
        alternation
    )
}

/// One shortcode occurrence found by the tag pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagMatch<'t> {
    /// Byte offset of the match in the scanned text.
    pub start: usize,
    /// Byte offset just past the match.
    pub end: usize,
    /// Full matched text.
    pub text: &'t str,
    /// Leading escape bracket (`"["` or `""`).
    pub open: &'t str,
    pub name: &'t str,
    pub attrs: &'t str,
    pub self_closing: bool,
    /// Enclosed body; `None` unless a closing tag was found.
    pub content: Option<&'t str>,
    /// Trailing escape bracket (`"]"` or `""`).
    pub close: &'t str,
}

impl<'t> TagMatch<'t> {
    pub(crate) fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        let group = |i| caps.get(i).map_or("", |m| m.as_str());

        Some(Self {
            start: whole.start(),
            end: whole.end(),
            text: whole.as_str(),
            open: group(1),
            name: caps.get(2)?.as_str(),
            attrs: group(3),
            self_closing: caps.get(4).is_some(),
            content: caps.get(5).map(|m| m.as_str()),
            close: group(6),
        })
    }

    /// `[[name]]` form: wrapped in one extra pair of brackets.
    pub(crate) fn is_escaped(&self) -> bool {
        self.open == "[" && self.close == "]"
    }

    /// The match with one bracket removed from each end.
    pub(crate) fn unescaped(&self) -> &'t str {
        &self.text[1..self.text.len() - 1]
    }
}
