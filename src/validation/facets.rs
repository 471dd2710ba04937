//! Value constraints checked at validation time.
//!
//! Facets look at the encoded form of a value, the same string that would be
//! written to the document, so one facet type serves every scalar.

use crate::codec::Scalar;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// ============================================================================
// Spreadsheet Limits (Microsoft Excel 2007+)
// ============================================================================

/// Maximum number of rows in a worksheet (2^20)
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (2^14)
pub const EXCEL_MAX_COLUMNS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LENGTH: usize = 31;

// ============================================================================
// Presentation Limits
// ============================================================================

/// Smallest slide edge in EMU (1 inch)
pub const MIN_SLIDE_EXTENT_EMU: u32 = 914_400;

/// Largest slide edge in EMU (56 inches)
pub const MAX_SLIDE_EXTENT_EMU: u32 = 51_206_400;

// ============================================================================
// Shared Patterns
// ============================================================================

/// `A1`-style cell reference
pub static CELL_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?[A-Z]{1,3}\$?[0-9]+$").expect("cell reference pattern"));

/// `A1:B2`-style range, a single cell also qualifies
pub static CELL_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?[A-Z]{1,3}\$?[0-9]+(:\$?[A-Z]{1,3}\$?[0-9]+)?$").expect("cell range pattern")
});

/// Six hex digit RGB colour
pub static HEX_RGB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{6}$").expect("rgb pattern"));

/// A single constraint on an encoded value
#[derive(Debug, Clone)]
pub enum Facet {
    MinInclusive(f64),
    MaxInclusive(f64),
    Range { min: f64, max: f64 },
    MinLength(usize),
    MaxLength(usize),
    Length(usize),
    Pattern(&'static Lazy<Regex>),
}

impl Facet {
    pub const fn range(min: f64, max: f64) -> Self {
        Facet::Range { min, max }
    }

    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Facet::MinInclusive(min) => {
                let number = numeric(value)?;
                if number < *min {
                    return Err(format!("{} is below the minimum of {}", value, min));
                }
            }
            Facet::MaxInclusive(max) => {
                let number = numeric(value)?;
                if number > *max {
                    return Err(format!("{} exceeds the maximum of {}", value, max));
                }
            }
            Facet::Range { min, max } => {
                let number = numeric(value)?;
                if number < *min || number > *max {
                    return Err(format!("{} is outside the range {}..={}", value, min, max));
                }
            }
            Facet::MinLength(min) => {
                let length = value.chars().count();
                if length < *min {
                    return Err(format!("length {} is below the minimum of {}", length, min));
                }
            }
            Facet::MaxLength(max) => {
                let length = value.chars().count();
                if length > *max {
                    return Err(format!("length {} exceeds the maximum of {}", length, max));
                }
            }
            Facet::Length(expected) => {
                let length = value.chars().count();
                if length != *expected {
                    return Err(format!("length {} is not the required {}", length, expected));
                }
            }
            Facet::Pattern(pattern) => {
                if !pattern.is_match(value) {
                    return Err(format!("'{}' does not match {}", value, pattern.as_str()));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::MinInclusive(min) => write!(f, ">= {}", min),
            Facet::MaxInclusive(max) => write!(f, "<= {}", max),
            Facet::Range { min, max } => write!(f, "{}..={}", min, max),
            Facet::MinLength(min) => write!(f, "length >= {}", min),
            Facet::MaxLength(max) => write!(f, "length <= {}", max),
            Facet::Length(length) => write!(f, "length == {}", length),
            Facet::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

fn numeric(value: &str) -> Result<f64, String> {
    let number = f64::parse_scalar(value).ok_or_else(|| format!("'{}' is not numeric", value))?;
    // NaN compares false against every bound
    if number.is_nan() {
        return Err(format!("'{}' is not a number", value));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_bounds_are_inclusive() {
        let rows = Facet::range(1.0, EXCEL_MAX_ROWS as f64);
        assert!(rows.check("1").is_ok());
        assert!(rows.check("1048576").is_ok());
        assert!(rows.check("0").is_err());
        assert!(rows.check("1048577").is_err());
        assert!(Facet::MinInclusive(0.0).check("-1").is_err());
        assert!(Facet::MaxInclusive(10.0).check("ten").is_err());
    }

    #[test]
    fn nan_fails_every_numeric_bound() {
        assert!(Facet::MinInclusive(0.0).check("NaN").is_err());
        assert!(Facet::MaxInclusive(255.0).check("NaN").is_err());
        assert!(Facet::range(0.0, 255.0).check("NaN").is_err());
        assert!(Facet::range(0.0, 255.0).check("INF").is_err());
        assert!(Facet::MinInclusive(0.0).check("INF").is_ok());
    }

    #[test]
    fn lengths_count_characters() {
        assert!(Facet::MaxLength(MAX_SHEET_NAME_LENGTH).check(&"x".repeat(31)).is_ok());
        assert!(Facet::MaxLength(MAX_SHEET_NAME_LENGTH).check(&"x".repeat(32)).is_err());
        assert!(Facet::Length(2).check("ü!").is_ok());
        assert!(Facet::MinLength(1).check("").is_err());
    }

    #[test]
    fn patterns_match_whole_value() {
        assert!(Facet::Pattern(&CELL_REF).check("XFD1048576").is_ok());
        assert!(Facet::Pattern(&CELL_REF).check("A1:B2").is_err());
        assert!(Facet::Pattern(&CELL_RANGE).check("A1:B2").is_ok());
        assert!(Facet::Pattern(&HEX_RGB).check("FF00FF").is_ok());
        assert!(Facet::Pattern(&HEX_RGB).check("auto").is_err());
    }
}
