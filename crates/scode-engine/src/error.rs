//! Registration errors.

/// Error returned when a shortcode cannot be registered.
///
/// Document passes ([`Registry::expand`](crate::Registry::expand) and friends)
/// never fail; malformed occurrences are left in the text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortcodeError {
    /// Tag name is empty or contains characters other than word characters and `-`.
    #[error("invalid shortcode name {0:?}: expected word characters or '-'")]
    InvalidName(String),
}
