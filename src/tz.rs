//! Haystack DateTime values carry a short IANA zone name suffix (e.g.
//! `New_York`, not `America/New_York`); this module bridges that short form
//! to `chrono_tz`'s full-name `Tz` table, which is already baked in at
//! compile time and needs no separate runtime tzdb load (spec §9 "Global
//! mutable state").

use chrono_tz::{Tz, TZ_VARIANTS};

/// Converts a string containing a Haystack time zone name into the matching
/// `Tz` variant from the chrono_tz crate. Accepts both the short form
/// (`New_York`) and the full IANA name (`America/New_York`).
pub fn haystack_tz_string_to_tz<T>(s: T) -> Option<Tz>
where
    T: AsRef<str>,
{
    let matching_tz = TZ_VARIANTS.iter().find(|tz| {
        let full_name = tz.name();
        let is_full_name_match = full_name == s.as_ref();

        if is_full_name_match {
            true
        } else {
            if let Some(short_name) = full_name.split("/").skip(1).next() {
                // If the Tz name is in the format "RegionName/CityName":
                short_name == s.as_ref()
            } else {
                false
            }
        }
    });
    matching_tz.map(|tz| tz.clone())
}

/// Returns the short Haystack zone name suffix for a full IANA zone, e.g.
/// `America/New_York` -> `New_York`. Used when emitting DateTime literals.
pub fn short_zone_name(tz: &Tz) -> &'static str {
    tz.name().split('/').last().unwrap_or_else(|| tz.name())
}

#[cfg(test)]
mod test {
    use super::haystack_tz_string_to_tz;

    #[test]
    fn short_name_match_works() {
        let tz = haystack_tz_string_to_tz("Sydney").unwrap();
        assert_eq!(tz, chrono_tz::Tz::Australia__Sydney);
    }

    #[test]
    fn full_name_match_works() {
        let tz = haystack_tz_string_to_tz("Australia/Sydney").unwrap();
        assert_eq!(tz, chrono_tz::Tz::Australia__Sydney);
    }
}
