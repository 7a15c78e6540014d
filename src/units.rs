//! The unit registry (spec §9 "Global mutable state"): a read-only table
//! of known Haystack unit symbols, constructed once per process behind a
//! one-shot guard rather than threaded through every call site as a
//! parameter. This crate does not do unit *conversion* (spec §1
//! Non-goals) — only recognises which symbols are known. Consumed via
//! `Number::has_known_unit`, which the SQL translator's range-comparison
//! compiler checks as an advisory (log-only, non-fatal) signal.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static KNOWN_UNITS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "kg", "lb", "m", "ft", "ft2", "m2", "kWh", "W", "kW", "A", "V", "Hz", "°F", "°C", "%",
        "s", "min", "h", "Pa", "kPa", "psi", "cfm", "L/s", "gal",
    ]
    .into_iter()
    .collect()
});

/// True if `unit` is a recognised Haystack unit symbol. An unrecognised
/// unit is not an error by itself — `Number` accepts any unit string
/// (spec §3.1) — this is only a lookup for callers who want to validate
/// against the known set.
pub fn is_known_unit(unit: &str) -> bool {
    KNOWN_UNITS.contains(unit)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recognises_common_units() {
        assert!(is_known_unit("kWh"));
        assert!(is_known_unit("ft2"));
    }

    #[test]
    fn unknown_unit_is_not_known_but_not_rejected_elsewhere() {
        assert!(!is_known_unit("frobnicate"));
    }
}
