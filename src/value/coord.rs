//! Haystack `Coord`: a latitude/longitude pair. Kept from the teacher crate
//! almost verbatim; this crate adds the textual-form helpers the teacher
//! left to its HTTP-facing `ValueExt` trait.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    lat: f64,
    lng: f64,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Parse a Zinc coord literal's body, e.g. `37.545,-77.449`
    /// (the `C(` `)` wrapper, if any, is the caller's concern).
    pub fn from_zinc_str(s: &str) -> Result<Self, ParseCoordError> {
        let mut split = s.splitn(2, ',');
        let lat = split.next().and_then(|s| s.parse().ok());
        let lng = split.next().and_then(|s| s.parse().ok());
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(Coord::new(lat, lng)),
            _ => Err(ParseCoordError::new(s)),
        }
    }

    pub fn to_zinc_string(&self) -> String {
        format!("C({},{})", self.lat, self.lng)
    }

    pub fn to_encoded_json_string(&self) -> String {
        format!("c:{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_zinc_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseCoordError {
    unparsable: String,
}

impl ParseCoordError {
    fn new(s: &str) -> Self {
        Self {
            unparsable: s.to_owned(),
        }
    }
}

impl fmt::Display for ParseCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse Coord from '{}'", self.unparsable)
    }
}

impl std::error::Error for ParseCoordError {}
