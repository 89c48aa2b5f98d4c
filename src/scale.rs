//! Value scaling for labels and totals.
//!
//! Locale aware thousands separators are left to the renderer; this only
//! divides by a power of thousand and formats with a fixed number of decimals.
use core::fmt;
use std::str::FromStr;

/// Unit a value is displayed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScaleUnit {
    /// No scaling
    #[default]
    None,
    /// Divide by 1e3, suffix `k`
    Thousands,
    /// Divide by 1e6, suffix `m`
    Millions,
    /// Divide by 1e9, suffix `b`
    Billions,
}

impl ScaleUnit {
    /// The value is divided by this
    pub const fn divisor(&self) -> f64 {
        match self {
            ScaleUnit::None => 1.0,
            ScaleUnit::Thousands => 1e3,
            ScaleUnit::Millions => 1e6,
            ScaleUnit::Billions => 1e9,
        }
    }

    /// The suffix appended to scaled values
    pub const fn suffix(&self) -> &'static str {
        match self {
            ScaleUnit::None => "",
            ScaleUnit::Thousands => "k",
            ScaleUnit::Millions => "m",
            ScaleUnit::Billions => "b",
        }
    }
}

/// Error returned when parsing an unknown scale code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseScaleError {
    /// The offending code
    pub code: String,
}

impl fmt::Display for ParseScaleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown scale \"{}\" (expected one of \"\", \"none\", \"k\", \"m\", \"b\")",
            self.code
        )
    }
}

impl std::error::Error for ParseScaleError {}

/// Parse the codes used by the property panel: `""` or `"none"`, `"k"`, `"m"`, `"b"`.
/// Matching is case insensitive.
impl FromStr for ScaleUnit {
    type Err = ParseScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(ScaleUnit::None),
            "k" => Ok(ScaleUnit::Thousands),
            "m" => Ok(ScaleUnit::Millions),
            "b" => Ok(ScaleUnit::Billions),
            _ => Err(ParseScaleError {
                code: s.to_string(),
            }),
        }
    }
}

/// A scaled and formatted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaled {
    /// The scaled value, formatted with fixed decimals
    pub value: String,
    /// The unit suffix, empty if unscaled
    pub suffix: &'static str,
}

/// Write the value followed by its suffix, e.g. `1.23b`
impl fmt::Display for Scaled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suffix)
    }
}

/// Scale `value` to `unit` and format it with `decimals` decimal places.
/// Ties round away from zero, e.g. `2500` in thousands with no decimal gives `3k`.
pub fn scale_value(value: f64, unit: ScaleUnit, decimals: usize) -> Scaled {
    let scaled = round_half_away(value / unit.divisor(), decimals);
    Scaled {
        value: format!("{scaled:.decimals$}"),
        suffix: unit.suffix(),
    }
}

/// `format!` rounds ties to even, so round beforehand
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals.min(i32::MAX as usize) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}
