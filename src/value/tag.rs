//! Haystack tag names: the identifiers used for Dict keys and column names.
//!
//! A tag name must start with a lowercase ASCII letter and contain only
//! ASCII alphanumerics after that (Project Haystack's `id` grammar
//! production). Validating this once here keeps `Grid` and `Dict` from
//! having to re-derive the rule at every call site.

use std::fmt;

/// A validated Haystack tag / column identifier.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    pub fn new(name: String) -> Result<Self, ParseTagNameError> {
        if is_tag_name(&name) {
            Ok(TagName(name))
        } else {
            Err(ParseTagNameError::new(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::convert::TryFrom<&str> for TagName {
    type Error = ParseTagNameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        TagName::new(s.to_owned())
    }
}

/// Returns true if `s` is a valid Haystack tag name: starts with a
/// lowercase ASCII letter, and contains only ASCII alphanumerics after that.
pub fn is_tag_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Error denoting that a string is not a valid Haystack tag name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseTagNameError {
    invalid_name: String,
}

impl ParseTagNameError {
    fn new(invalid_name: String) -> Self {
        Self { invalid_name }
    }
}

impl fmt::Display for ParseTagNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid tag name", self.invalid_name)
    }
}

impl std::error::Error for ParseTagNameError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_tag_names() {
        assert!(is_tag_name("id"));
        assert!(is_tag_name("siteRef"));
        assert!(is_tag_name("geoCity2"));
    }

    #[test]
    fn invalid_tag_names() {
        assert!(!is_tag_name(""));
        assert!(!is_tag_name("Id"));
        assert!(!is_tag_name("2bad"));
        assert!(!is_tag_name("bad_name"));
        assert!(!is_tag_name("bad-name"));
    }

    #[test]
    fn tag_name_new() {
        assert!(TagName::new("siteRef".to_owned()).is_ok());
        assert!(TagName::new("BadTagName".to_owned()).is_err());
    }
}
