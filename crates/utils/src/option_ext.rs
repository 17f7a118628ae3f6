use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Display the contained value or a fallback
    ///
    /// Generic over anything that implements `Display`. Mostly used for the
    /// optional names on cells, universes, and lattices.
    ///
    /// ```rust
    /// # use pinlat_utils::OptionExt;
    /// let name: Option<&str> = Some("fuel");
    /// assert_eq!(name.display_or("unnamed"), "fuel");
    ///
    /// let name: Option<&str> = None;
    /// assert_eq!(name.display_or("unnamed"), "unnamed");
    /// ```
    fn display_or(&self, fallback: &str) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display_or(&self, fallback: &str) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => fallback.to_string(),
        }
    }
}
