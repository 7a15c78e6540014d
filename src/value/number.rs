//! Haystack `Number`: a finite double, `NaN`, or `±Inf`, plus an optional
//! unit string. The unit is part of identity: `1kg` and `1` are different
//! Numbers (spec §3.1).

use std::fmt;

#[derive(Clone, Debug)]
pub struct Number {
    value: f64,
    unit: Option<String>,
}

impl Number {
    pub fn new(value: f64, unit: Option<String>) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// True if this Number carries no unit, or a unit recognised by
    /// [`crate::units::is_known_unit`]. An unrecognised unit does not make
    /// the Number invalid (spec §3.1: a Number accepts any unit string) —
    /// this is an advisory check for callers that want one, e.g. before
    /// persisting a point write.
    pub fn has_known_unit(&self) -> bool {
        match &self.unit {
            Some(u) => crate::units::is_known_unit(u),
            None => true,
        }
    }

    /// Parse the JSON sigil form, e.g. `n:154 kg`, `n:NaN`, `n:-INF`.
    pub fn from_encoded_json_string(s: &str) -> Result<Self, ParseNumberError> {
        let s = s.strip_prefix("n:").unwrap_or(s);
        Self::parse_value_and_unit(s.trim())
    }

    /// Parse a bare Zinc number literal (no `n:` prefix), e.g. `154kg`,
    /// `73.2°F`, `NaN`, `INF`, `-INF`. Unlike the JSON form, Zinc has no
    /// space between the value and its unit.
    pub fn from_zinc_str(s: &str) -> Result<Self, ParseNumberError> {
        match s {
            "NaN" => return Ok(Number::new(f64::NAN, None)),
            "INF" => return Ok(Number::new(f64::INFINITY, None)),
            "-INF" => return Ok(Number::new(f64::NEG_INFINITY, None)),
            _ => {}
        }

        let s = s.replace('_', "");
        let split_at = s
            .find(|c: char| {
                c.is_alphabetic() || c == '%' || c == '/' || c == '$'
            })
            .filter(|&i| i > 0 && !s[..i].ends_with('e') && !s[..i].ends_with('E'));

        match split_at {
            Some(i) => {
                let (num, unit) = s.split_at(i);
                let value: f64 = num
                    .parse()
                    .map_err(|_| ParseNumberError::from_str(&s))?;
                Ok(Number::new(value, Some(unit.to_owned())))
            }
            None => {
                let value: f64 =
                    s.parse().map_err(|_| ParseNumberError::from_str(&s))?;
                Ok(Number::new(value, None))
            }
        }
    }

    fn parse_value_and_unit(s: &str) -> Result<Self, ParseNumberError> {
        match s {
            "NaN" => return Ok(Number::new(f64::NAN, None)),
            "INF" => return Ok(Number::new(f64::INFINITY, None)),
            "-INF" => return Ok(Number::new(f64::NEG_INFINITY, None)),
            _ => {}
        }

        let mut split = s.splitn(2, ' ');
        let number_str = split
            .next()
            .ok_or_else(|| ParseNumberError::from_str(s))?;
        let unit_str = split.next();

        let value: f64 = number_str
            .parse()
            .map_err(|_| ParseNumberError::from_str(s))?;
        let unit = unit_str.map(|u| u.trim().to_owned());
        Ok(Number::new(value, unit))
    }

    pub fn to_zinc_string(&self) -> String {
        let value_str = Self::format_value(self.value);
        match &self.unit {
            Some(unit) => format!("{}{}", value_str, unit),
            None => value_str,
        }
    }

    pub fn to_encoded_json_string(&self) -> String {
        let value_str = Self::format_value(self.value);
        match &self.unit {
            Some(unit) => format!("n:{} {}", value_str, unit),
            None => format!("n:{}", value_str),
        }
    }

    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_owned()
        } else if value.is_infinite() {
            if value > 0.0 {
                "INF".to_owned()
            } else {
                "-INF".to_owned()
            }
        } else {
            // `{}` gives the shortest string that round-trips through f64::parse.
            format!("{}", value)
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        let values_eq = if self.value.is_nan() && other.value.is_nan() {
            self.value.to_bits() == other.value.to_bits()
        } else {
            self.value == other.value
        };
        values_eq && self.unit == other.unit
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_zinc_string())
    }
}

/// An error indicating that a `Number` could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseNumberError {
    unparsable_number: String,
}

impl ParseNumberError {
    pub(crate) fn from_str(s: &str) -> Self {
        Self {
            unparsable_number: s.to_string(),
        }
    }
}

impl fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not parse Number from string '{}'",
            self.unparsable_number
        )
    }
}

impl std::error::Error for ParseNumberError {}

#[cfg(test)]
mod test {
    use super::Number;

    #[test]
    fn from_encoded_json_string() {
        let unitless = "n:45.5";
        assert_eq!(
            Number::from_encoded_json_string(unitless).unwrap().value(),
            45.5
        );

        let unit = "n:73.2 °F";
        let number_with_unit = Number::from_encoded_json_string(unit).unwrap();
        assert_eq!(number_with_unit.value(), 73.2);
        assert_eq!(number_with_unit.unit(), Some("°F"));
    }

    #[test]
    fn from_zinc_str_with_unit() {
        let n = Number::from_zinc_str("154kg").unwrap();
        assert_eq!(n.value(), 154.0);
        assert_eq!(n.unit(), Some("kg"));
    }

    #[test]
    fn from_zinc_str_underscore_thousands() {
        let n = Number::from_zinc_str("1_000_000").unwrap();
        assert_eq!(n.value(), 1_000_000.0);
        assert_eq!(n.unit(), None);
    }

    #[test]
    fn nan_and_inf_round_trip() {
        let nan = Number::from_zinc_str("NaN").unwrap();
        assert!(nan.value().is_nan());
        assert_eq!(nan.to_zinc_string(), "NaN");

        let inf = Number::from_zinc_str("INF").unwrap();
        assert_eq!(inf.to_zinc_string(), "INF");

        let neg_inf = Number::from_zinc_str("-INF").unwrap();
        assert_eq!(neg_inf.to_zinc_string(), "-INF");
    }

    #[test]
    fn nan_equality_is_bit_identical() {
        let a = Number::new(f64::NAN, None);
        let b = Number::new(f64::NAN, None);
        assert_eq!(a, b);

        let neg_nan = Number::new(-f64::NAN, None);
        if neg_nan.value().to_bits() != a.value().to_bits() {
            assert_ne!(a, neg_nan);
        }
    }

    #[test]
    fn unit_is_part_of_identity() {
        let with_unit = Number::new(1.0, Some("kg".to_owned()));
        let without_unit = Number::new(1.0, None);
        assert_ne!(with_unit, without_unit);
    }
}
