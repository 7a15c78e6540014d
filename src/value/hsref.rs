//! Haystack `Ref` values: an opaque entity identifier plus an optional,
//! purely advisory display string.

use std::fmt;

/// A Haystack reference. Equality and hashing only ever consider `name`;
/// `display` is advisory and does not participate in identity (spec §3.1).
#[derive(Clone, Debug)]
pub struct Ref {
    name: String,
    display: Option<String>,
}

impl Ref {
    pub fn new(name: String, display: Option<String>) -> Result<Self, ParseRefError> {
        if name.is_empty() {
            return Err(ParseRefError::new("ref name must not be empty"));
        }
        Ok(Ref { name, display })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Parse a Zinc `@name "Display"` cell (the display part is optional).
    pub fn from_zinc_str(s: &str) -> Result<Self, ParseRefError> {
        let s = s
            .strip_prefix('@')
            .ok_or_else(|| ParseRefError::new(s))?;
        let mut parts = s.splitn(2, ' ');
        let name = parts.next().unwrap_or_default().to_owned();
        let display = parts.next().map(|d| {
            d.trim().trim_matches('"').to_owned()
        });
        Ref::new(name, display)
    }

    /// Parse the JSON sigil form, e.g. `r:abc-123` or `r:abc-123 RTU #3`.
    pub fn from_encoded_json_string(s: &str) -> Result<Self, ParseRefError> {
        let s = s
            .strip_prefix("r:")
            .ok_or_else(|| ParseRefError::new(s))?;
        let mut parts = s.splitn(2, ' ');
        let name = parts.next().unwrap_or_default().to_owned();
        let display = parts.next().map(|d| d.to_owned());
        Ref::new(name, display)
    }

    pub fn to_encoded_json_string(&self) -> String {
        match &self.display {
            Some(display) => format!("r:{} {}", self.name, display),
            None => format!("r:{}", self.name),
        }
    }

    pub fn to_zinc_string(&self) -> String {
        match &self.display {
            Some(display) => format!("@{} \"{}\"", self.name, display),
            None => format!("@{}", self.name),
        }
    }
}

impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Ref {}

impl std::hash::Hash for Ref {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl AsRef<str> for Ref {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

/// Error denoting that a `Ref` could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseRefError {
    unparsable_ref: String,
}

impl ParseRefError {
    fn new<S: AsRef<str>>(s: S) -> Self {
        Self {
            unparsable_ref: s.as_ref().to_owned(),
        }
    }
}

impl fmt::Display for ParseRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse Ref from '{}'", self.unparsable_ref)
    }
}

impl std::error::Error for ParseRefError {}
