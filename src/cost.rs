//! Shipping cost for one package type.
//!
//! The number of pallets is bound by whichever of space and weight needs more.
//! The base cost follows the configured basis, tax is a flat percentage on top.

use tracing::debug;

use crate::diagnostics::{CalculationStep, Recommendation, Warning, render_all};
use crate::model::{
    CostBasis, DistanceRateUnit, Location, Package, PalletSize, ShippingCostConfig,
    VolumeRateUnit, WeightRateUnit,
};
use crate::stacking::{EngineConfig, plan_stacking_with_config};
use crate::types::Dimensional;
use crate::units::{KG_TO_LBS, M3_TO_FT3, MM3_PER_M3};

/// Outcome of a cost calculation.
///
/// Amounts are in `currency_code`; `total_weight` is kilograms and includes the
/// estimated self-weight of the pallets.
#[derive(Clone, Debug, PartialEq)]
pub struct ShippingResult {
    pub shipping_cost: f64,
    pub tax: f64,
    pub total_cost: f64,
    pub pallets_needed: u32,
    pub total_weight: f64,
    pub currency_code: String,
    pub warnings: Vec<Warning>,
    pub recommendations: Vec<Recommendation>,
    pub calculations: Vec<CalculationStep>,
}

impl ShippingResult {
    /// All-zero result in the given currency.
    pub fn empty(currency_code: impl Into<String>) -> Self {
        Self {
            shipping_cost: 0.0,
            tax: 0.0,
            total_cost: 0.0,
            pallets_needed: 0,
            total_weight: 0.0,
            currency_code: currency_code.into(),
            warnings: Vec::new(),
            recommendations: Vec::new(),
            calculations: Vec::new(),
        }
    }

    pub fn calculation_lines(&self) -> Vec<String> {
        render_all(&self.calculations)
    }
}

/// Calculates the cost with the default engine constants.
pub fn calculate_shipping_cost(
    package: &Package,
    from: &Location,
    to: &Location,
    pallet: &PalletSize,
    cost_config: &ShippingCostConfig,
) -> ShippingResult {
    calculate_shipping_cost_with_config(
        package,
        from,
        to,
        pallet,
        cost_config,
        &EngineConfig::default(),
    )
}

/// Calculates cost, tax, pallet count, warnings and recommendations for one
/// package type.
///
/// `from` and `to` are carried for context only. Tax rate and currency come
/// from `cost_config`.
pub fn calculate_shipping_cost_with_config(
    package: &Package,
    from: &Location,
    to: &Location,
    pallet: &PalletSize,
    cost_config: &ShippingCostConfig,
    config: &EngineConfig,
) -> ShippingResult {
    debug!(
        from = %from.name,
        to = %to.name,
        pallet = %pallet.id,
        basis = cost_config.basis.code(),
        "calculating shipping cost"
    );

    let pkg = package.normalized();
    let pallet = pallet.normalized();

    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();
    let mut calculations = Vec::new();

    let volume = pkg.total_volume() / MM3_PER_M3;
    calculations.push(CalculationStep::PackageVolume {
        cubic_meters: volume,
    });

    let total_weight = pkg.total_weight();
    calculations.push(CalculationStep::TotalPackageWeight { kg: total_weight });

    let plan = plan_stacking_with_config(&pkg, &pallet, config);
    let per_pallet = plan.items_per_pallet();
    let pallets_by_volume = if per_pallet == 0 {
        if plan.has_invalid_dimensions() {
            warnings.push(Warning::InvalidPackageDimensions);
        } else {
            warnings.push(Warning::PackageExceedsPallet);
        }
        0
    } else {
        pkg.quantity.div_ceil(per_pallet)
    };

    let weight_per_pallet = if pallets_by_volume == 0 {
        total_weight
    } else {
        total_weight / pallets_by_volume as f64
    };
    let pallets_by_weight = if pallet.max_weight > 0.0 {
        (total_weight / pallet.max_weight).ceil() as u32
    } else {
        0
    };
    let pallets_needed = pallets_by_volume.max(pallets_by_weight);

    calculations.push(CalculationStep::PalletsByVolume(pallets_by_volume));
    calculations.push(CalculationStep::PalletsByWeight(pallets_by_weight));
    calculations.push(CalculationStep::TotalPallets(pallets_needed));

    let rate = cost_config.rate_per_unit;
    let currency = cost_config.currency.clone();
    let base_cost = match cost_config.basis {
        CostBasis::Weight(unit) => {
            let quantity = match unit {
                WeightRateUnit::Kg => total_weight,
                WeightRateUnit::Lbs => total_weight * KG_TO_LBS,
            };
            calculations.push(CalculationStep::WeightCost {
                quantity,
                unit,
                rate,
                currency: currency.clone(),
            });
            quantity * rate
        }
        CostBasis::Volume(unit) => {
            let quantity = match unit {
                VolumeRateUnit::M3 => volume,
                VolumeRateUnit::Ft3 => volume * M3_TO_FT3,
            };
            calculations.push(CalculationStep::VolumeCost {
                quantity,
                unit,
                rate,
                currency: currency.clone(),
            });
            quantity * rate
        }
        CostBasis::Distance(unit) => {
            let distance = match unit {
                DistanceRateUnit::Km => config.placeholder_distance_km,
                DistanceRateUnit::Mi => config.placeholder_distance_mi,
            };
            calculations.push(CalculationStep::DistanceCost {
                distance,
                unit,
                rate,
                currency: currency.clone(),
                pallets: pallets_needed,
            });
            distance * rate * pallets_needed as f64
        }
    };

    let pallet_weight = pallet.max_weight * config.pallet_self_weight_ratio;
    let total_weight_with_pallets = total_weight + pallet_weight * pallets_needed as f64;
    calculations.push(CalculationStep::PalletWeightEach { kg: pallet_weight });
    calculations.push(CalculationStep::TotalWeightWithPallets {
        kg: total_weight_with_pallets,
    });
    calculations.push(CalculationStep::BaseCost {
        currency: currency.clone(),
        amount: base_cost,
    });

    if weight_per_pallet > pallet.max_weight {
        warnings.push(Warning::PalletOverweight {
            weight_per_pallet,
            max_weight: pallet.max_weight,
        });
    }

    let allocated_volume = pallet.volume() / MM3_PER_M3 * pallets_needed as f64;
    let utilization = if allocated_volume > 0.0 {
        volume / allocated_volume * 100.0
    } else {
        0.0
    };
    calculations.push(CalculationStep::Utilization {
        percent: utilization,
    });

    if allocated_volume > 0.0 {
        if utilization < config.low_utilization_percent {
            recommendations.push(Recommendation::UseSmallerPallet);
        }
        if utilization > config.high_utilization_percent {
            recommendations.push(Recommendation::SecureHighUtilization);
        }
    }

    if pallets_needed > 1 {
        recommendations.push(Recommendation::MultiplePallets {
            count: pallets_needed,
        });
    }

    let tax = base_cost * (cost_config.tax_rate / 100.0);
    calculations.push(CalculationStep::Tax {
        base: base_cost,
        rate: cost_config.tax_rate,
    });

    ShippingResult {
        shipping_cost: base_cost,
        tax,
        total_cost: base_cost + tax,
        pallets_needed,
        total_weight: total_weight_with_pallets,
        currency_code: currency,
        warnings,
        recommendations,
        calculations,
    }
}
