//! Structured diagnostics produced while calculating.
//!
//! Each record renders to the human-readable line shown to users. The order in
//! which records are pushed is part of the result and is never reshuffled.

use std::fmt;

use crate::model::{DistanceRateUnit, VolumeRateUnit, WeightRateUnit};

/// One line of the derivation trail.
#[derive(Clone, Debug, PartialEq)]
pub enum CalculationStep {
    // stacking planner
    InvalidPackageDimensions,
    ItemsPerRow(u32),
    RowsPerLayer(u32),
    ItemsPerLayer(u32),
    MaxLayers(u32),
    StackHeight { mm: f64 },
    ItemsPerPallet(u32),
    PalletsNeeded(u32),

    // cost engine
    PackageVolume { cubic_meters: f64 },
    TotalPackageWeight { kg: f64 },
    PalletsByVolume(u32),
    PalletsByWeight(u32),
    TotalPallets(u32),
    WeightCost {
        quantity: f64,
        unit: WeightRateUnit,
        rate: f64,
        currency: String,
    },
    VolumeCost {
        quantity: f64,
        unit: VolumeRateUnit,
        rate: f64,
        currency: String,
    },
    DistanceCost {
        distance: f64,
        unit: DistanceRateUnit,
        rate: f64,
        currency: String,
        pallets: u32,
    },
    PalletWeightEach { kg: f64 },
    TotalWeightWithPallets { kg: f64 },
    BaseCost { currency: String, amount: f64 },
    Utilization { percent: f64 },
    Tax { base: f64, rate: f64 },

    // orchestrator
    PackageHeader { number: usize },
}

impl fmt::Display for CalculationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationStep::InvalidPackageDimensions => write!(f, "Invalid package dimensions"),
            CalculationStep::ItemsPerRow(n) => write!(f, "Items per row: {}", n),
            CalculationStep::RowsPerLayer(n) => write!(f, "Rows per layer: {}", n),
            CalculationStep::ItemsPerLayer(n) => write!(f, "Total items per layer: {}", n),
            CalculationStep::MaxLayers(n) => write!(f, "Maximum layers possible: {}", n),
            CalculationStep::StackHeight { mm } => write!(f, "Total stack height: {:.0}mm", mm),
            CalculationStep::ItemsPerPallet(n) => write!(f, "Items per pallet: {}", n),
            CalculationStep::PalletsNeeded(n) => write!(f, "Pallets needed: {}", n),
            CalculationStep::PackageVolume { cubic_meters } => {
                write!(f, "Package volume: {:.3} m³", cubic_meters)
            }
            CalculationStep::TotalPackageWeight { kg } => {
                write!(f, "Total package weight: {:.2} kg", kg)
            }
            CalculationStep::PalletsByVolume(n) => write!(f, "Pallets needed by volume: {}", n),
            CalculationStep::PalletsByWeight(n) => write!(f, "Pallets needed by weight: {}", n),
            CalculationStep::TotalPallets(n) => write!(f, "Total pallets needed: {}", n),
            CalculationStep::WeightCost {
                quantity,
                unit,
                rate,
                currency,
            } => write!(
                f,
                "Weight-based cost: {:.2} {unit} × {rate} {currency}/{unit}",
                quantity
            ),
            CalculationStep::VolumeCost {
                quantity,
                unit,
                rate,
                currency,
            } => write!(
                f,
                "Volume-based cost: {:.2} {unit} × {rate} {currency}/{unit}",
                quantity
            ),
            CalculationStep::DistanceCost {
                distance,
                unit,
                rate,
                currency,
                pallets,
            } => write!(
                f,
                "Distance-based cost: {:.2} {unit} × {rate} {currency}/{unit} × {pallets} pallets",
                distance
            ),
            CalculationStep::PalletWeightEach { kg } => {
                write!(f, "Pallet weight (each): {:.2} kg", kg)
            }
            CalculationStep::TotalWeightWithPallets { kg } => {
                write!(f, "Total weight including pallets: {:.2} kg", kg)
            }
            CalculationStep::BaseCost { currency, amount } => {
                write!(f, "Base shipping cost: {} {:.2}", currency, amount)
            }
            CalculationStep::Utilization { percent } => {
                write!(f, "Pallet utilization: {:.1}%", percent)
            }
            CalculationStep::Tax { base, rate } => {
                write!(f, "Tax calculation: {:.2} × {}%", base, rate)
            }
            CalculationStep::PackageHeader { number } => {
                write!(f, "Package {} calculations:", number)
            }
        }
    }
}

/// Conditions the user should act on.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    PalletOverweight { weight_per_pallet: f64, max_weight: f64 },
    NoPackages,
    InvalidPackageDimensions,
    PackageExceedsPallet,
}

impl Warning {
    pub fn code(&self) -> &'static str {
        match self {
            Warning::PalletOverweight { .. } => "pallet_overweight",
            Warning::NoPackages => "no_packages",
            Warning::InvalidPackageDimensions => "invalid_package_dimensions",
            Warning::PackageExceedsPallet => "package_exceeds_pallet",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PalletOverweight {
                weight_per_pallet,
                max_weight,
            } => write!(
                f,
                "Weight per pallet ({:.2}kg) exceeds pallet maximum capacity of {}kg",
                weight_per_pallet, max_weight
            ),
            Warning::NoPackages => write!(f, "No packages to calculate"),
            Warning::InvalidPackageDimensions => write!(f, "Invalid package dimensions"),
            Warning::PackageExceedsPallet => write!(
                f,
                "Package does not fit on the selected pallet within the stacking height limit"
            ),
        }
    }
}

/// Suggestions that do not block the shipment.
#[derive(Clone, Debug, PartialEq)]
pub enum Recommendation {
    UseSmallerPallet,
    SecureHighUtilization,
    MultiplePallets { count: u32 },
}

impl Recommendation {
    pub fn code(&self) -> &'static str {
        match self {
            Recommendation::UseSmallerPallet => "use_smaller_pallet",
            Recommendation::SecureHighUtilization => "secure_high_utilization",
            Recommendation::MultiplePallets { .. } => "multiple_pallets",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::UseSmallerPallet => {
                write!(f, "Consider using a smaller pallet size for better cost efficiency")
            }
            Recommendation::SecureHighUtilization => {
                write!(f, "High volume utilization - ensure proper securing of goods")
            }
            Recommendation::MultiplePallets { count } => write!(
                f,
                "Multiple pallets required ({}) - consider splitting shipment or using larger pallets if available",
                count
            ),
        }
    }
}

/// Renders any list of records to display strings, keeping order.
pub fn render_all<T: fmt::Display>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
