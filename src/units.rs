//! Unit conversion for lengths and weights.
//!
//! Every unit family has a fixed ratio to its base unit (millimeter for lengths,
//! gram for weights). Conversions are total: no rounding happens here, display
//! rounding is left to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kilograms to pounds, used when a rate is charged per pound.
pub const KG_TO_LBS: f64 = 2.20462;

/// Cubic meters to cubic feet, used when a rate is charged per cubic foot.
pub const M3_TO_FT3: f64 = 35.3147;

/// Cubic millimeters per cubic meter.
pub const MM3_PER_M3: f64 = 1_000_000_000.0;

/// Length units accepted for packages and pallets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "in")]
    Inch,
}

impl LengthUnit {
    /// Millimeters per one unit.
    pub const fn ratio_to_mm(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1.0,
            LengthUnit::Centimeter => 10.0,
            LengthUnit::Meter => 1000.0,
            LengthUnit::Inch => 25.4,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Inch => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Weight units accepted for packages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum WeightUnit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "lbs")]
    Pound,
}

impl WeightUnit {
    /// Grams per one unit.
    pub const fn ratio_to_g(self) -> f64 {
        match self {
            WeightUnit::Gram => 1.0,
            WeightUnit::Kilogram => 1000.0,
            WeightUnit::Pound => 453.592,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            WeightUnit::Gram => "g",
            WeightUnit::Kilogram => "kg",
            WeightUnit::Pound => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Converts a length between two units.
///
/// # Examples
/// ```
/// use shipping_calc::units::{LengthUnit, convert_length};
///
/// let mm = convert_length(12.0, LengthUnit::Centimeter, LengthUnit::Millimeter);
/// assert!((mm - 120.0).abs() < 1e-9);
/// ```
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    value * from.ratio_to_mm() / to.ratio_to_mm()
}

/// Converts a weight between two units.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    value * from.ratio_to_g() / to.ratio_to_g()
}

/// Formats a measurement with two decimals for display, e.g. `12.50 cm`.
pub fn format_measurement(value: f64, unit: impl fmt::Display) -> String {
    format!("{:.2} {}", value, unit)
}
