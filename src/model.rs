//! Data model for shipping calculations.
//!
//! This module defines the request-scoped values the engine works on:
//! - `Package`: one package type with dimensions, weight and quantity
//! - `PalletSize`: a pallet from the catalog or entered by hand
//! - `Location`: descriptive origin/destination context
//! - `ShippingCostConfig`: how shipping is charged
//!
//! It also hosts the dimension normalizer (`Package::normalized`,
//! `PalletSize::normalized`), which produces copies in millimeters and kilograms.

use std::fmt;

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::{Dimensional, Dims3, validation};
use crate::units::{LengthUnit, WeightUnit, convert_length, convert_weight};

/// Reserved pallet id for dimensions entered at calculation time.
pub const CUSTOM_PALLET_ID: &str = "custom";

/// Validation error for package, pallet and cost data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid cost configuration: {0}")]
    InvalidCostConfig(String),
}

/// One package type in a shipment.
///
/// Values are immutable once handed to the engine; normalization returns a new
/// `Package`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "1",
    "length": 40.0,
    "width": 30.0,
    "height": 20.0,
    "weight": 5.0,
    "quantity": 10,
    "length_unit": "cm",
    "weight_unit": "kg"
}))]
pub struct Package {
    #[serde(default)]
    pub id: Option<String>,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
    pub length_unit: LengthUnit,
    pub weight_unit: WeightUnit,
}

impl Package {
    /// Creates a package after checking that every value is usable.
    ///
    /// Zero dimensions pass: they are reported by the stacking planner.
    ///
    /// # Examples
    /// ```
    /// use shipping_calc::model::Package;
    /// use shipping_calc::units::{LengthUnit, WeightUnit};
    ///
    /// let ok = Package::new((40.0, 30.0, 20.0), 5.0, 2, LengthUnit::Centimeter, WeightUnit::Kilogram);
    /// assert!(ok.is_ok());
    ///
    /// let bad = Package::new((40.0, 30.0, 20.0), 5.0, 0, LengthUnit::Centimeter, WeightUnit::Kilogram);
    /// assert!(bad.is_err());
    /// ```
    pub fn new(
        dims: (f64, f64, f64),
        weight: f64,
        quantity: u32,
        length_unit: LengthUnit,
        weight_unit: WeightUnit,
    ) -> Result<Self, ValidationError> {
        let package = Self {
            id: None,
            length: dims.0,
            width: dims.1,
            height: dims.2,
            weight,
            quantity,
            length_unit,
            weight_unit,
        };
        package.validate()?;
        Ok(package)
    }

    /// Checks an already constructed package, e.g. one deserialized from JSON.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_dimensions_3d((self.length, self.width, self.height), "Package ")
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_non_negative(self.weight, "Package weight")
            .map_err(ValidationError::InvalidWeight)?;
        validation::validate_quantity(self.quantity).map_err(ValidationError::InvalidQuantity)?;
        Ok(())
    }

    /// Returns a copy with lengths in millimeters and weight in kilograms.
    pub fn normalized(&self) -> Self {
        let to_mm = |value| convert_length(value, self.length_unit, LengthUnit::Millimeter);
        Self {
            id: self.id.clone(),
            length: to_mm(self.length),
            width: to_mm(self.width),
            height: to_mm(self.height),
            weight: convert_weight(self.weight, self.weight_unit, WeightUnit::Kilogram),
            quantity: self.quantity,
            length_unit: LengthUnit::Millimeter,
            weight_unit: WeightUnit::Kilogram,
        }
    }

    /// Weight of all units together, in the package's weight unit.
    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }

    /// Volume of all units together, in the package's length unit cubed.
    pub fn total_volume(&self) -> f64 {
        self.dimensions().volume() * self.quantity as f64
    }
}

impl Dimensional for Package {
    fn dimensions(&self) -> Dims3 {
        Dims3::new(self.length, self.width, self.height)
    }
}

/// A pallet type.
///
/// `max_weight` is always kilograms, independent of `length_unit`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PalletSize {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
    #[serde(default)]
    pub description: String,
    pub length_unit: LengthUnit,
}

impl PalletSize {
    /// Builds the user-entered pallet that goes with [`CUSTOM_PALLET_ID`].
    pub fn custom(
        dims: (f64, f64, f64),
        max_weight: f64,
        length_unit: LengthUnit,
    ) -> Result<Self, ValidationError> {
        let pallet = Self {
            id: CUSTOM_PALLET_ID.to_string(),
            name: "Custom Pallet".to_string(),
            length: dims.0,
            width: dims.1,
            height: dims.2,
            max_weight,
            description: "Custom dimensions".to_string(),
            length_unit,
        };
        pallet.validate()?;
        Ok(pallet)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_dimensions_3d((self.length, self.width, self.height), "Pallet ")
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_non_negative(self.max_weight, "Pallet max weight")
            .map_err(ValidationError::InvalidWeight)?;
        Ok(())
    }

    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_PALLET_ID
    }

    /// Returns a copy with lengths in millimeters. `max_weight` passes through.
    pub fn normalized(&self) -> Self {
        let to_mm = |value| convert_length(value, self.length_unit, LengthUnit::Millimeter);
        Self {
            length: to_mm(self.length),
            width: to_mm(self.width),
            height: to_mm(self.height),
            length_unit: LengthUnit::Millimeter,
            ..self.clone()
        }
    }
}

impl Dimensional for PalletSize {
    fn dimensions(&self) -> Dims3 {
        Dims3::new(self.length, self.width, self.height)
    }
}

/// Origin or destination of a shipment.
///
/// Tax rate and currency here are descriptive only; the cost configuration
/// carries the values that feed the formulas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub country: String,
    pub zip_code: String,
    pub tax_rate: f64,
    pub currency_code: String,
}

/// Product category from the reference catalog. Not used by any formula.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    pub base_rate: f64,
    pub description: String,
}

/// Unit for weight-based rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeightRateUnit {
    Kg,
    Lbs,
}

/// Unit for volume-based rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VolumeRateUnit {
    M3,
    Ft3,
}

/// Unit for distance-based rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistanceRateUnit {
    Km,
    Mi,
}

impl fmt::Display for WeightRateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightRateUnit::Kg => "kg",
            WeightRateUnit::Lbs => "lbs",
        })
    }
}

impl fmt::Display for VolumeRateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VolumeRateUnit::M3 => "m3",
            VolumeRateUnit::Ft3 => "ft3",
        })
    }
}

impl fmt::Display for DistanceRateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DistanceRateUnit::Km => "km",
            DistanceRateUnit::Mi => "mi",
        })
    }
}

/// What the shipping rate is charged on, with the units valid for that basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "unit", rename_all = "lowercase")]
pub enum CostBasis {
    Weight(WeightRateUnit),
    Volume(VolumeRateUnit),
    Distance(DistanceRateUnit),
}

impl CostBasis {
    pub fn code(&self) -> &'static str {
        match self {
            CostBasis::Weight(_) => "weight",
            CostBasis::Volume(_) => "volume",
            CostBasis::Distance(_) => "distance",
        }
    }
}

/// Rate, currency and tax for one calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "basis": { "type": "weight", "unit": "kg" },
    "rate_per_unit": 2.5,
    "currency": "USD",
    "tax_rate": 15.0
}))]
pub struct ShippingCostConfig {
    pub basis: CostBasis,
    pub rate_per_unit: f64,
    pub currency: String,
    /// Percentage, 0 to 100 expected.
    pub tax_rate: f64,
}

impl ShippingCostConfig {
    pub fn new(basis: CostBasis, rate_per_unit: f64, currency: impl Into<String>, tax_rate: f64) -> Self {
        Self {
            basis,
            rate_per_unit,
            currency: currency.into(),
            tax_rate,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_non_negative(self.rate_per_unit, "Rate per unit")
            .map_err(ValidationError::InvalidCostConfig)?;
        validation::validate_non_negative(self.tax_rate, "Tax rate")
            .map_err(ValidationError::InvalidCostConfig)?;
        if self.currency.trim().is_empty() {
            return Err(ValidationError::InvalidCostConfig(
                "Currency code must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
