//! Shortcode attribute parsing.
//!
//! Tokenizes the span between a tag name and its closing bracket:
//! `[tag id="abc" width=200 autoplay]`.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

use regex::Regex;

/// One attribute per match, tried in order: `name="v"`, `name='v'`, `name=v`,
/// `"v"`, then a bare token. Each must end at whitespace or end of span.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(\w+)\s*=\s*"([^"]*)"(?:\s|$)|(\w+)\s*=\s*'([^']*)'(?:\s|$)|(\w+)\s*=\s*([^\s'"]+)(?:\s|$)|"([^"]*)"(?:\s|$)|(\S+)(?:\s|$)"#,
    )
    .unwrap()
});

/// Runs of no-break space and zero-width space count as a single space.
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[\u{00a0}\u{200b}]+").unwrap());

/// Attributes parsed from a shortcode tag.
///
/// Named pairs and bare tokens live side by side: `[video id=1 autoplay]`
/// yields the named entry `id` and the positional entry `autoplay`. A span
/// holding nothing but whitespace degrades to [`Attributes::Raw`].
///
/// # Example
///
/// ```
/// use scode_engine::Attributes;
///
/// let attrs = Attributes::parse(r#"id="abc" width=200 autoplay"#);
/// assert_eq!(attrs.get("id"), Some("abc"));
/// assert_eq!(attrs.get("width"), Some("200"));
/// assert_eq!(attrs.positional(), ["autoplay"]);
/// assert_eq!(attrs.get("0"), Some("autoplay"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Attributes {
    /// Tokenized attributes.
    Parsed {
        /// Lower-cased attribute names with their unescaped values (last wins).
        named: BTreeMap<String, String>,
        /// Bare or quoted tokens without a name, in source order.
        positional: Vec<String>,
    },
    /// The left-trimmed span, returned when the tokenizer found nothing.
    Raw(String),
}

impl Default for Attributes {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl Attributes {
    /// Parse a raw attribute span.
    #[must_use]
    pub fn parse(span: &str) -> Self {
        let text = SPACE_RE.replace_all(span, " ");

        let mut named = BTreeMap::new();
        let mut positional = Vec::new();
        let mut matched = false;

        for caps in ATTR_RE.captures_iter(&text) {
            matched = true;

            let pair = [(1, 2), (3, 4), (5, 6)].into_iter().find_map(|(key, value)| {
                let key = caps.get(key)?;
                Some((key.as_str(), caps.get(value).map_or("", |m| m.as_str())))
            });

            if let Some((key, value)) = pair {
                named.insert(key.to_lowercase(), unescape(value));
            } else if let Some(quoted) = caps.get(7) {
                if !quoted.as_str().is_empty() {
                    positional.push(unescape(quoted.as_str()));
                }
            } else if let Some(bare) = caps.get(8) {
                positional.push(unescape(bare.as_str()));
            }
        }

        if matched {
            Self::Parsed { named, positional }
        } else {
            Self::Raw(text.trim_start().to_owned())
        }
    }

    /// Look up an attribute by name.
    ///
    /// Names are matched against the lower-cased keys. A decimal name selects
    /// a positional token; the raw form answers to `"0"`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Self::Parsed { named, positional } => named.get(name).map(String::as_str).or_else(|| {
                let index: usize = name.parse().ok()?;
                positional.get(index).map(String::as_str)
            }),
            Self::Raw(raw) => (name == "0").then_some(raw.as_str()),
        }
    }

    /// Named attributes in name order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &str)> {
        let named = match self {
            Self::Parsed { named, .. } => Some(named),
            Self::Raw(_) => None,
        };
        named
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Positional tokens in source order (empty for the raw form).
    #[must_use]
    pub fn positional(&self) -> &[String] {
        match self {
            Self::Parsed { positional, .. } => positional,
            Self::Raw(_) => &[],
        }
    }

    /// The unparsed span, if tokenizing found nothing.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Parsed { .. } => None,
        }
    }

    /// Whether no attribute of any kind was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Parsed { named, positional } => named.is_empty() && positional.is_empty(),
            Self::Raw(raw) => raw.is_empty(),
        }
    }
}

/// Resolve C-style backslash escapes.
///
/// `\n`, `\t`, `\r`, `\a`, `\v`, `\b` and `\f` become control characters,
/// `\xHH` and `\NNN` become the character with that code (0-255), any other
/// escaped character stands for itself. A trailing backslash is kept.
pub(crate) fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_owned();
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'v' => out.push('\x0b'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'x' if chars.peek().is_some_and(char::is_ascii_hexdigit) => {
                out.push(byte_char(take_digits(&mut chars, 16, 2).0));
            }
            '0'..='7' => {
                let lead = next.to_digit(8).unwrap_or_default();
                let rest = take_digits(&mut chars, 8, 2);
                let width = u32::try_from(rest.1).unwrap_or_default();
                out.push(byte_char(lead * 8u32.pow(width) + rest.0));
            }
            other => out.push(other),
        }
    }

    out
}

/// Consume up to `max` digits, returning their value and how many were read.
fn take_digits(chars: &mut Peekable<Chars<'_>>, radix: u32, max: usize) -> (u32, usize) {
    let mut code = 0;
    let mut taken = 0;
    while taken < max {
        let Some(digit) = chars.peek().and_then(|c| c.to_digit(radix)) else {
            break;
        };
        code = code * radix + digit;
        taken += 1;
        chars.next();
    }
    (code, taken)
}

/// Escapes address single bytes; values above 255 wrap like a C `char`.
fn byte_char(code: u32) -> char {
    char::from(u8::try_from(code & 0xff).unwrap_or_default())
}
