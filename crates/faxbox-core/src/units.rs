//! Lengths and unit conversion
//!
//! Every model dimension is a [`Length`] stored as whole micrometres, so the
//! sums and differences the derivation engine relies on are exact.
//! Handles conversion between Metric (mm) and Imperial (inch) systems and
//! supports decimal and fractional inch parsing for configuration files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

const MM_PER_INCH: f64 = 25.4;
const UM_PER_MM: f64 = 1000.0;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// A physical length with micrometre resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "f64")]
pub struct Length(i64);

impl Length {
    pub const ZERO: Length = Length(0);

    /// Largest magnitude a configured length may have: one kilometre.
    pub const MAX_MM: f64 = 1_000_000.0;

    pub const fn from_um(um: i64) -> Self {
        Self(um)
    }

    /// Rounds to the nearest micrometre.
    pub fn from_mm(mm: f64) -> Self {
        Self((mm * UM_PER_MM).round() as i64)
    }

    pub fn from_inches(inches: f64) -> Self {
        Self::from_mm(inches * MM_PER_INCH)
    }

    pub const fn as_um(self) -> i64 {
        self.0
    }

    /// Like [`Length::from_mm`], but rejects values that are not finite or
    /// lie outside `±MAX_MM`.
    pub fn try_from_mm(mm: f64) -> Result<Self, String> {
        if !mm.is_finite() {
            return Err(format!("Length must be finite, got {}", mm));
        }
        if mm.abs() > Self::MAX_MM {
            return Err(format!(
                "Length {}mm is out of range (at most {}mm)",
                mm,
                Self::MAX_MM
            ));
        }
        Ok(Self::from_mm(mm))
    }

    /// Whether this length lies within `±MAX_MM`.
    pub fn in_range(self) -> bool {
        self.as_mm().abs() <= Self::MAX_MM
    }

    pub fn checked_add(self, rhs: Length) -> Option<Length> {
        self.0.checked_add(rhs.0).map(Length)
    }

    pub fn checked_mul(self, rhs: i64) -> Option<Length> {
        self.0.checked_mul(rhs).map(Length)
    }

    pub fn as_mm(self) -> f64 {
        self.0 as f64 / UM_PER_MM
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Half of this length, truncated to whole micrometres.
    pub const fn half(self) -> Self {
        Self(self.0 / 2)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.as_mm())
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        self.0 += rhs.0;
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl SubAssign for Length {
    fn sub_assign(&mut self, rhs: Length) {
        self.0 -= rhs.0;
    }
}

impl Neg for Length {
    type Output = Length;

    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl Mul<i64> for Length {
    type Output = Length;

    fn mul(self, rhs: i64) -> Length {
        Length(self.0 * rhs)
    }
}

/// Integer division; the remainder is dropped.
impl Div<i64> for Length {
    type Output = Length;

    fn div(self, rhs: i64) -> Length {
        Length(self.0 / rhs)
    }
}

impl Sum for Length {
    fn sum<I: Iterator<Item = Length>>(iter: I) -> Length {
        iter.fold(Length::ZERO, |acc, l| acc + l)
    }
}

impl From<Length> for f64 {
    fn from(length: Length) -> f64 {
        length.as_mm()
    }
}

/// Configuration files may give a length as a bare number of millimetres
/// or as text with a unit: `"304.8 mm"`, `"12 in"`, `"6 1/2 in"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Millimetres(f64),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = String;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Millimetres(mm) => Length::try_from_mm(mm),
            LengthRepr::Text(text) => text.parse(),
        }
    }
}

impl FromStr for Length {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, system) = if let Some(rest) = s.strip_suffix("mm") {
            (rest, MeasurementSystem::Metric)
        } else if let Some(rest) = s.strip_suffix("in") {
            (rest, MeasurementSystem::Imperial)
        } else if let Some(rest) = s.strip_suffix('"') {
            (rest, MeasurementSystem::Imperial)
        } else {
            (s, MeasurementSystem::Metric)
        };

        if number.trim().is_empty() {
            return Err(format!("Missing number in length '{}'", s));
        }

        let mm = parse_length(number, system)?;
        Length::try_from_mm(mm).map_err(|e| format!("{} in '{}'", e, s))
    }
}

/// Format length value for display
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.3}", value_mm),
        MeasurementSystem::Imperial => format!("{:.3}", value_mm / MM_PER_INCH),
    }
}

/// Parse length string to millimeters
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    match system {
        MeasurementSystem::Metric => input.parse::<f64>().map_err(|e| e.to_string()),
        MeasurementSystem::Imperial => {
            if !input.contains('/') {
                let inches = input.parse::<f64>().map_err(|e| e.to_string())?;
                return Ok(inches * MM_PER_INCH);
            }

            // Mixed numbers: "6 1/2" is six and a half inches, "-1/2" is negative.
            let negative = input.starts_with('-');
            let mut total_inches = 0.0;
            for part in input.trim_start_matches('-').split_whitespace() {
                if let Some((num, den)) = part.split_once('/') {
                    if den.contains('/') {
                        return Err("Invalid fraction format".to_string());
                    }
                    let num = num.parse::<f64>().map_err(|_| "Invalid numerator")?;
                    let den = den.parse::<f64>().map_err(|_| "Invalid denominator")?;
                    if den == 0.0 {
                        return Err("Division by zero".to_string());
                    }
                    total_inches += num / den;
                } else {
                    total_inches += part.parse::<f64>().map_err(|_| "Invalid number part")?;
                }
            }
            let sign = if negative { -1.0 } else { 1.0 };
            Ok(sign * total_inches * MM_PER_INCH)
        }
    }
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_metric_conversion() {
        assert_eq!(format_length(10.5, MeasurementSystem::Metric), "10.500");
        assert!(close(parse_length("10.5", MeasurementSystem::Metric).unwrap(), 10.5));
    }

    #[test]
    fn test_imperial_decimal() {
        assert_eq!(format_length(25.4, MeasurementSystem::Imperial), "1.000");
        assert_eq!(format_length(12.7, MeasurementSystem::Imperial), "0.500");
        assert!(close(parse_length("1", MeasurementSystem::Imperial).unwrap(), 25.4));
    }

    #[test]
    fn test_imperial_fraction() {
        assert!(close(parse_length("1 1/2", MeasurementSystem::Imperial).unwrap(), 38.1));
        assert!(close(parse_length("5 1/8", MeasurementSystem::Imperial).unwrap(), 130.175));
        assert!(close(parse_length("1/4", MeasurementSystem::Imperial).unwrap(), 6.35));
        assert!(close(parse_length("-1/2", MeasurementSystem::Imperial).unwrap(), -12.7));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(parse_length("abc", MeasurementSystem::Metric).is_err());
        assert!(parse_length("1/0", MeasurementSystem::Imperial).is_err());
        assert!(parse_length("1/2/3", MeasurementSystem::Imperial).is_err());
    }

    #[test]
    fn test_length_is_exact_in_micrometres() {
        let shell = Length::from_mm(304.8);
        let t = Length::from_mm(3.0);
        let paper = Length::from_mm(76.2);
        let bay = shell - t * 2 - paper - t;
        assert_eq!(bay, Length::from_um(219_600));
        assert_eq!(bay + paper + t, shell - t * 2);
    }

    #[test]
    fn test_length_from_inches_matches_shell_envelope() {
        assert_eq!(Length::from_inches(12.0), Length::from_mm(304.8));
        assert_eq!(Length::from_inches(6.5), Length::from_mm(165.1));
        assert_eq!(Length::from_inches(5.0), Length::from_mm(127.0));
    }

    #[test]
    fn test_length_parsing_with_units() {
        assert_eq!("304.8".parse::<Length>().unwrap(), Length::from_mm(304.8));
        assert_eq!("304.8 mm".parse::<Length>().unwrap(), Length::from_mm(304.8));
        assert_eq!("12in".parse::<Length>().unwrap(), Length::from_mm(304.8));
        assert_eq!("6 1/2 in".parse::<Length>().unwrap(), Length::from_mm(165.1));
        assert_eq!("5\"".parse::<Length>().unwrap(), Length::from_mm(127.0));
        assert!("in".parse::<Length>().is_err());
        assert!("twelve in".parse::<Length>().is_err());
    }

    #[test]
    fn test_length_display() {
        assert_eq!(Length::from_mm(219.6).to_string(), "219.6mm");
        assert_eq!(Length::from_mm(3.0).to_string(), "3mm");
    }

    #[test]
    fn test_length_serde_accepts_numbers_and_text() {
        let lengths: Vec<Length> = serde_json::from_str(r#"[76.2, "3 in", "1/8 in"]"#).unwrap();
        assert_eq!(lengths[0], Length::from_mm(76.2));
        assert_eq!(lengths[1], Length::from_mm(76.2));
        assert_eq!(lengths[2], Length::from_mm(3.175));

        let json = serde_json::to_string(&Length::from_mm(76.2)).unwrap();
        assert_eq!(json, "76.2");
    }

    #[test]
    fn test_measurement_system_names() {
        assert_eq!("in".parse::<MeasurementSystem>().unwrap(), MeasurementSystem::Imperial);
        assert_eq!("Metric".parse::<MeasurementSystem>().unwrap(), MeasurementSystem::Metric);
        assert!("furlong".parse::<MeasurementSystem>().is_err());
        assert_eq!(get_unit_label(MeasurementSystem::Imperial), "in");
    }

    #[test]
    fn test_out_of_range_lengths_are_rejected() {
        assert!(Length::try_from_mm(1_000_000.0).is_ok());
        assert!(Length::try_from_mm(5e15).is_err());
        assert!(Length::try_from_mm(f64::NAN).is_err());
        assert!(serde_json::from_str::<Length>("5e15").is_err());
        assert!(serde_json::from_str::<Length>("-2e6").is_err());
        assert!("1e300 in".parse::<Length>().is_err());
        assert!(!Length::from_mm(5e15).in_range());
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Length::from_um(i64::MAX / 2 + 1);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(Length::from_mm(3.0).checked_mul(2), Some(Length::from_mm(6.0)));
    }
}
