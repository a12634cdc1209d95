//! Default filling for shortcode attributes.

use std::collections::BTreeMap;
use std::fmt;

use crate::Attributes;

/// An attribute value after default filling.
///
/// User-supplied values are always [`Text`](Self::Text); defaults keep
/// whatever type the handler declared them with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum AttrValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Boolean flag.
    Bool(bool),
}

impl AttrValue {
    /// Borrow the value as text, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) | Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Combine user attributes with the attributes a handler knows about.
///
/// Every name in `defaults` appears in the result, holding the user's value
/// when one was given and the default otherwise. Names the handler does not
/// know are dropped.
///
/// # Example
///
/// ```
/// use scode_engine::{AttrValue, Attributes, shortcode_atts};
///
/// let attrs = Attributes::parse("id=42 color=red");
/// let atts = shortcode_atts([("id", AttrValue::from("")), ("width", AttrValue::Int(480))], &attrs);
///
/// assert_eq!(atts["id"], AttrValue::from("42"));
/// assert_eq!(atts["width"], AttrValue::Int(480));
/// assert!(!atts.contains_key("color"));
/// ```
pub fn shortcode_atts<I, K, V>(defaults: I, attrs: &Attributes) -> BTreeMap<String, AttrValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttrValue>,
{
    defaults
        .into_iter()
        .map(|(name, default)| {
            let name: String = name.into();
            let value = attrs
                .get(&name)
                .map_or_else(|| default.into(), AttrValue::from);
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn youtube_defaults() -> [(&'static str, AttrValue); 3] {
        [
            ("id", AttrValue::from("")),
            ("width", AttrValue::Int(480)),
            ("height", AttrValue::Int(390)),
        ]
    }

    #[test]
    fn test_fills_missing_with_defaults() {
        let atts = shortcode_atts(youtube_defaults(), &Attributes::parse("id=42"));

        let expected: BTreeMap<String, AttrValue> = [
            ("id".to_owned(), AttrValue::from("42")),
            ("width".to_owned(), AttrValue::Int(480)),
            ("height".to_owned(), AttrValue::Int(390)),
        ]
        .into_iter()
        .collect();
        assert_eq!(atts, expected);
    }

    #[test]
    fn test_user_value_replaces_typed_default() {
        let atts = shortcode_atts(youtube_defaults(), &Attributes::parse("width=wide"));
        assert_eq!(atts["width"], AttrValue::from("wide"));
    }

    #[test]
    fn test_unknown_names_dropped() {
        let atts = shortcode_atts([("id", "")], &Attributes::parse("id=1 extra=2 loose"));
        assert_eq!(atts.len(), 1);
        assert_eq!(atts["id"].as_str(), Some("1"));
    }

    #[test]
    fn test_index_names_read_positional() {
        let atts = shortcode_atts([("0", ""), ("1", "none")], &Attributes::parse("first"));
        assert_eq!(atts["0"], AttrValue::from("first"));
        assert_eq!(atts["1"], AttrValue::from("none"));
    }

    #[test]
    fn test_raw_attributes_keep_defaults() {
        let atts = shortcode_atts(youtube_defaults(), &Attributes::default());
        assert_eq!(atts["id"], AttrValue::from(""));
        assert_eq!(atts["height"].to_string(), "390");
    }

    #[test]
    fn test_display() {
        assert_eq!(AttrValue::from(true).to_string(), "true");
        assert_eq!(AttrValue::from(-3_i64).to_string(), "-3");
        assert_eq!(AttrValue::Int(7).as_str(), None);
    }
}
