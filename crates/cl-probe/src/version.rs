//! OpenCL version-string handling.
//!
//! Platforms and devices report versions as `"OpenCL <major>.<minor> <vendor
//! specifics>"`. The vendor tail is free-form, so parsing stops after the
//! numeric part. Anything that deviates from the prefix pattern parses to
//! `None`, and callers treat an unparseable version as `0` — a device with a
//! garbled version string never qualifies for a minimum-version check, it is
//! not an error.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClVersion {
    pub major: u32,
    pub minor: u32,
}

impl ClVersion {
    pub const V1_2: ClVersion = ClVersion { major: 1, minor: 2 };

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"OpenCL <major>.<minor> ..."`, failing closed on any deviation.
    pub fn parse(s: &str) -> Option<Self> {
        let mut words = s.split_ascii_whitespace();
        if words.next()? != "OpenCL" {
            return None;
        }
        let (major, minor) = words.next()?.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }

    /// The `major*10 + minor` encoding used for threshold comparisons.
    pub const fn encoded(self) -> u32 {
        self.major * 10 + self.minor
    }

    /// Threshold value of a raw version string; unparseable strings encode
    /// as 0 and therefore fail every positive threshold.
    pub fn encoded_or_zero(s: &str) -> u32 {
        Self::parse(s).map(Self::encoded).unwrap_or(0)
    }
}

impl fmt::Display for ClVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vendor_suffixed_strings() {
        assert_eq!(
            ClVersion::parse("OpenCL 1.2 Vendor-Build"),
            Some(ClVersion::new(1, 2))
        );
        assert_eq!(ClVersion::parse("OpenCL 2.0 XYZ"), Some(ClVersion::new(2, 0)));
        assert_eq!(
            ClVersion::parse("OpenCL 3.0 CUDA 12.2.147"),
            Some(ClVersion::new(3, 0))
        );
    }

    #[test]
    fn encoding_matches_major_times_ten_plus_minor() {
        assert_eq!(ClVersion::encoded_or_zero("OpenCL 1.2 Vendor-Build"), 12);
        assert_eq!(ClVersion::encoded_or_zero("OpenCL 2.0 XYZ"), 20);
    }

    #[test]
    fn short_strings_encode_as_zero() {
        assert_eq!(ClVersion::encoded_or_zero("OpenCL 1"), 0);
        assert_eq!(ClVersion::encoded_or_zero(""), 0);
    }

    #[test]
    fn malformed_strings_fail_closed() {
        assert_eq!(ClVersion::parse("OpenGL 4.6"), None);
        assert_eq!(ClVersion::parse("OpenCL x.y Vendor"), None);
        assert_eq!(ClVersion::parse("OpenCL 1.2.1 Vendor"), None);
        assert_eq!(ClVersion::parse("1.2 OpenCL"), None);
    }

    #[test]
    fn multi_digit_components_are_accepted() {
        // The fixed-offset scheme this replaces could not represent these.
        assert_eq!(ClVersion::parse("OpenCL 10.1 Future"), Some(ClVersion::new(10, 1)));
        assert_eq!(ClVersion::new(10, 1).encoded(), 101);
    }

    #[test]
    fn display_round_trips_the_numeric_part() {
        assert_eq!(ClVersion::new(1, 2).to_string(), "1.2");
    }
}
