//! Pallet stacking estimation.
//!
//! Packages of one type are laid out in identical layers on the pallet
//! footprint and stacked until either the requested quantity is covered or the
//! height ceiling is reached. Only the two 90° footprint orientations are
//! tried; there is no tilting and no mixing of orientations within a layer.

use tracing::debug;

use crate::diagnostics::CalculationStep;
use crate::geometry::best_layer_grid;
use crate::model::{Package, PalletSize};
use crate::types::{Dimensional, Dims3};

/// Tunable constants of the calculation engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Highest allowed top of a loaded pallet, pallet included, in millimeters.
    pub max_stack_height_mm: f64,
    /// Estimated pallet self-weight as a fraction of its weight rating.
    pub pallet_self_weight_ratio: f64,
    /// Below this utilization (percent) a smaller pallet is recommended.
    pub low_utilization_percent: f64,
    /// Above this utilization (percent) securing the load is recommended.
    pub high_utilization_percent: f64,
    /// Stand-in route length for kilometer rates.
    pub placeholder_distance_km: f64,
    /// Stand-in route length for mile rates.
    pub placeholder_distance_mi: f64,
}

impl EngineConfig {
    pub const DEFAULT_MAX_STACK_HEIGHT_MM: f64 = 2400.0;
    pub const DEFAULT_PALLET_SELF_WEIGHT_RATIO: f64 = 0.1;
    pub const DEFAULT_LOW_UTILIZATION_PERCENT: f64 = 40.0;
    pub const DEFAULT_HIGH_UTILIZATION_PERCENT: f64 = 90.0;
    pub const DEFAULT_PLACEHOLDER_DISTANCE_KM: f64 = 1000.0;
    pub const DEFAULT_PLACEHOLDER_DISTANCE_MI: f64 = 621.371;

    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_stack_height_mm: Self::DEFAULT_MAX_STACK_HEIGHT_MM,
            pallet_self_weight_ratio: Self::DEFAULT_PALLET_SELF_WEIGHT_RATIO,
            low_utilization_percent: Self::DEFAULT_LOW_UTILIZATION_PERCENT,
            high_utilization_percent: Self::DEFAULT_HIGH_UTILIZATION_PERCENT,
            placeholder_distance_km: Self::DEFAULT_PLACEHOLDER_DISTANCE_KM,
            placeholder_distance_mi: Self::DEFAULT_PLACEHOLDER_DISTANCE_MI,
        }
    }
}

/// Builder for `EngineConfig`.
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn max_stack_height_mm(mut self, height: f64) -> Self {
        self.config.max_stack_height_mm = height;
        self
    }

    pub fn pallet_self_weight_ratio(mut self, ratio: f64) -> Self {
        self.config.pallet_self_weight_ratio = ratio;
        self
    }

    pub fn low_utilization_percent(mut self, percent: f64) -> Self {
        self.config.low_utilization_percent = percent;
        self
    }

    pub fn high_utilization_percent(mut self, percent: f64) -> Self {
        self.config.high_utilization_percent = percent;
        self
    }

    pub fn placeholder_distance_km(mut self, distance: f64) -> Self {
        self.config.placeholder_distance_km = distance;
        self
    }

    pub fn placeholder_distance_mi(mut self, distance: f64) -> Self {
        self.config.placeholder_distance_mi = distance;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Result of planning one package type on one pallet.
#[derive(Clone, Debug, PartialEq)]
pub struct StackingPlan {
    pub layers: u32,
    pub items_per_layer: u32,
    /// Requested quantity, echoed for the visualization.
    pub total_items: u32,
    pub pallets_needed: u32,
    pub calculations: Vec<CalculationStep>,
}

impl StackingPlan {
    fn invalid_dimensions() -> Self {
        Self {
            layers: 0,
            items_per_layer: 0,
            total_items: 0,
            pallets_needed: 0,
            calculations: vec![CalculationStep::InvalidPackageDimensions],
        }
    }

    /// Units one fully built pallet holds.
    pub fn items_per_pallet(&self) -> u32 {
        self.items_per_layer.saturating_mul(self.layers)
    }

    /// True when the package had a zero dimension and nothing was planned.
    pub fn has_invalid_dimensions(&self) -> bool {
        self.calculations.first() == Some(&CalculationStep::InvalidPackageDimensions)
    }
}

/// Plans the stacking with the default height ceiling.
pub fn plan_stacking(package: &Package, pallet: &PalletSize) -> StackingPlan {
    plan_stacking_with_config(package, pallet, &EngineConfig::default())
}

/// Plans how `package` stacks on `pallet`.
///
/// A package with a zero dimension yields an all-zero plan carrying a single
/// "Invalid package dimensions" note. When no unit fits at all the plan reports
/// zero pallets rather than dividing by zero.
///
/// # Examples
/// ```
/// use shipping_calc::model::{Package, PalletSize};
/// use shipping_calc::stacking::plan_stacking;
/// use shipping_calc::units::{LengthUnit, WeightUnit};
///
/// let pallet = PalletSize::custom((120.0, 80.0, 14.4), 1500.0, LengthUnit::Centimeter).unwrap();
/// let package = Package::new((30.0, 20.0, 10.0), 2.0, 20, LengthUnit::Centimeter, WeightUnit::Kilogram).unwrap();
///
/// let plan = plan_stacking(&package, &pallet);
/// assert_eq!(plan.items_per_layer, 16);
/// assert_eq!(plan.layers, 2);
/// assert_eq!(plan.pallets_needed, 1);
/// ```
pub fn plan_stacking_with_config(
    package: &Package,
    pallet: &PalletSize,
    config: &EngineConfig,
) -> StackingPlan {
    let package = package.normalized();
    let pallet = pallet.normalized();
    let pkg_dims = package.dimensions();

    if pkg_dims.has_zero_axis() {
        return StackingPlan::invalid_dimensions();
    }

    let pallet_dims: Dims3 = pallet.dimensions();
    let grid = best_layer_grid(&pkg_dims, &pallet_dims);
    let items_per_layer = grid.capacity();
    debug!(
        orientation = ?grid.orientation,
        per_row = grid.per_row,
        rows = grid.rows,
        "chose footprint orientation"
    );

    let mut calculations = vec![
        CalculationStep::ItemsPerRow(grid.per_row),
        CalculationStep::RowsPerLayer(grid.rows),
        CalculationStep::ItemsPerLayer(items_per_layer),
    ];

    let headroom = config.max_stack_height_mm - pallet_dims.height;
    let max_layers_by_height = (headroom / pkg_dims.height).floor().max(0.0) as u32;
    let layers_for_quantity = if items_per_layer == 0 {
        u32::MAX
    } else {
        package.quantity.div_ceil(items_per_layer)
    };
    let layers = max_layers_by_height.min(layers_for_quantity);

    calculations.push(CalculationStep::MaxLayers(layers));
    calculations.push(CalculationStep::StackHeight {
        mm: layers as f64 * pkg_dims.height + pallet_dims.height,
    });

    let items_per_pallet = items_per_layer.saturating_mul(layers);
    let pallets_needed = if items_per_pallet == 0 {
        0
    } else {
        package.quantity.div_ceil(items_per_pallet)
    };

    calculations.push(CalculationStep::ItemsPerPallet(items_per_pallet));
    calculations.push(CalculationStep::PalletsNeeded(pallets_needed));

    StackingPlan {
        layers,
        items_per_layer,
        total_items: package.quantity,
        pallets_needed,
        calculations,
    }
}
