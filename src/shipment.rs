//! Costing of a whole shipment made of several package types.
//!
//! Without pallets the packages are collapsed into one equivalent-volume cube
//! and costed once. With pallets every package type is costed on its own and
//! the results are summed; package types never share a pallet.

use serde::Serialize;
use tracing::debug;

use crate::aggregate::combine_packages;
use crate::cost::{ShippingResult, calculate_shipping_cost_with_config};
use crate::diagnostics::{CalculationStep, Warning};
use crate::model::{Location, Package, PalletSize, ShippingCostConfig};
use crate::stacking::{EngineConfig, StackingPlan, plan_stacking_with_config};

/// Everything a calculation needs besides the packages.
#[derive(Clone, Debug)]
pub struct ShipmentContext<'a> {
    pub from: &'a Location,
    pub to: &'a Location,
    pub pallet: &'a PalletSize,
    pub cost_config: &'a ShippingCostConfig,
}

/// Progress events, suitable for streaming to a client.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ShipmentEvent {
    /// Packages were collapsed into one cube for the no-pallet path.
    Combined {
        packages: usize,
        side_mm: f64,
        weight_kg: f64,
    },
    /// One package type (1-based `package`) was costed.
    PackageCosted {
        package: usize,
        shipping_cost: f64,
        tax: f64,
        pallets_needed: u32,
        warnings: usize,
    },
    /// Calculation finished.
    Finished {
        shipping_cost: f64,
        tax: f64,
        total_cost: f64,
        pallets_needed: u32,
        currency_code: String,
    },
}

/// Costs a shipment with the default engine constants.
pub fn calculate_shipment(
    packages: &[Package],
    ctx: &ShipmentContext<'_>,
    use_pallet: bool,
) -> ShippingResult {
    calculate_shipment_with_config(packages, ctx, use_pallet, &EngineConfig::default())
}

/// Like `calculate_shipment`, with custom engine constants.
pub fn calculate_shipment_with_config(
    packages: &[Package],
    ctx: &ShipmentContext<'_>,
    use_pallet: bool,
    config: &EngineConfig,
) -> ShippingResult {
    calculate_shipment_with_progress(packages, ctx, use_pallet, config, |_| {})
}

/// Costs a shipment and reports every step through `on_event`.
///
/// An empty package list yields a zero result with a single
/// "No packages to calculate" warning in either mode.
pub fn calculate_shipment_with_progress(
    packages: &[Package],
    ctx: &ShipmentContext<'_>,
    use_pallet: bool,
    config: &EngineConfig,
    mut on_event: impl FnMut(&ShipmentEvent),
) -> ShippingResult {
    let result = if packages.is_empty() {
        let mut empty = ShippingResult::empty(ctx.cost_config.currency.clone());
        empty.warnings.push(Warning::NoPackages);
        empty
    } else if use_pallet {
        per_package_totals(packages, ctx, config, &mut on_event)
    } else {
        combined_result(packages, ctx, config, &mut on_event)
    };

    on_event(&ShipmentEvent::Finished {
        shipping_cost: result.shipping_cost,
        tax: result.tax,
        total_cost: result.total_cost,
        pallets_needed: result.pallets_needed,
        currency_code: result.currency_code.clone(),
    });
    result
}

fn combined_result(
    packages: &[Package],
    ctx: &ShipmentContext<'_>,
    config: &EngineConfig,
    on_event: &mut impl FnMut(&ShipmentEvent),
) -> ShippingResult {
    let Some(combined) = combine_packages(packages) else {
        let mut empty = ShippingResult::empty(ctx.cost_config.currency.clone());
        empty.warnings.push(Warning::NoPackages);
        return empty;
    };

    debug!(
        packages = packages.len(),
        side_mm = combined.length,
        weight_kg = combined.weight,
        "combined packages for no-pallet costing"
    );
    on_event(&ShipmentEvent::Combined {
        packages: packages.len(),
        side_mm: combined.length,
        weight_kg: combined.weight,
    });

    calculate_shipping_cost_with_config(
        &combined,
        ctx.from,
        ctx.to,
        ctx.pallet,
        ctx.cost_config,
        config,
    )
}

fn per_package_totals(
    packages: &[Package],
    ctx: &ShipmentContext<'_>,
    config: &EngineConfig,
    on_event: &mut impl FnMut(&ShipmentEvent),
) -> ShippingResult {
    let mut total = ShippingResult::empty(ctx.cost_config.currency.clone());

    for (index, package) in packages.iter().enumerate() {
        let result = calculate_shipping_cost_with_config(
            package,
            ctx.from,
            ctx.to,
            ctx.pallet,
            ctx.cost_config,
            config,
        );

        on_event(&ShipmentEvent::PackageCosted {
            package: index + 1,
            shipping_cost: result.shipping_cost,
            tax: result.tax,
            pallets_needed: result.pallets_needed,
            warnings: result.warnings.len(),
        });

        total.shipping_cost += result.shipping_cost;
        total.tax += result.tax;
        total.pallets_needed = total.pallets_needed.saturating_add(result.pallets_needed);
        total.total_weight += result.total_weight;

        total
            .calculations
            .push(CalculationStep::PackageHeader { number: index + 1 });
        total.calculations.extend(result.calculations);
        total.warnings.extend(result.warnings);
        total.recommendations.extend(result.recommendations);
    }

    total.total_cost = total.shipping_cost + total.tax;
    total
}

/// Numbers the visualization needs to draw the load.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPreview {
    /// Combined package in mm/kg.
    pub package: Package,
    /// Pallet in mm.
    pub pallet: PalletSize,
    pub stacking: StackingPlan,
}

/// Stacking plan of the combined package, as drawn by the 3D view.
///
/// Returns `None` for an empty list.
pub fn layout_preview(
    packages: &[Package],
    pallet: &PalletSize,
    config: &EngineConfig,
) -> Option<LayoutPreview> {
    let package = combine_packages(packages)?;
    let pallet = pallet.normalized();
    let stacking = plan_stacking_with_config(&package, &pallet, config);
    Some(LayoutPreview {
        package,
        pallet,
        stacking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Recommendation, render_all};
    use crate::model::{CostBasis, VolumeRateUnit, WeightRateUnit};
    use crate::units::{LengthUnit, WeightUnit};

    fn location(id: &str) -> Location {
        Location {
            id: id.to_string(),
            name: id.to_uppercase(),
            country: "Jamaica".to_string(),
            zip_code: "00000".to_string(),
            tax_rate: 0.0,
            currency_code: "USD".to_string(),
        }
    }

    fn euro() -> PalletSize {
        PalletSize {
            id: "euro".to_string(),
            name: "EUR".to_string(),
            length: 120.0,
            width: 80.0,
            height: 14.4,
            max_weight: 1500.0,
            description: String::new(),
            length_unit: LengthUnit::Centimeter,
        }
    }

    fn cm(dims: (f64, f64, f64), weight: f64, quantity: u32) -> Package {
        Package::new(dims, weight, quantity, LengthUnit::Centimeter, WeightUnit::Kilogram).unwrap()
    }

    struct Fixture {
        from: Location,
        to: Location,
        pallet: PalletSize,
        cost: ShippingCostConfig,
    }

    impl Fixture {
        fn new(cost: ShippingCostConfig) -> Self {
            Self {
                from: location("kingston"),
                to: location("montego"),
                pallet: euro(),
                cost,
            }
        }

        fn ctx(&self) -> ShipmentContext<'_> {
            ShipmentContext {
                from: &self.from,
                to: &self.to,
                pallet: &self.pallet,
                cost_config: &self.cost,
            }
        }
    }

    fn by_weight(rate: f64, tax: f64) -> ShippingCostConfig {
        ShippingCostConfig::new(CostBasis::Weight(WeightRateUnit::Kg), rate, "USD", tax)
    }

    #[test]
    fn empty_list_in_both_modes() {
        let fixture = Fixture::new(by_weight(10.0, 10.0));
        for use_pallet in [false, true] {
            let result = calculate_shipment(&[], &fixture.ctx(), use_pallet);
            assert_eq!(result.pallets_needed, 0);
            assert_eq!(result.total_cost, 0.0);
            assert_eq!(result.warnings, vec![Warning::NoPackages]);
            assert_eq!(render_all(&result.warnings), vec!["No packages to calculate"]);
            assert!(result.calculations.is_empty());
            assert_eq!(result.currency_code, "USD");
        }
    }

    #[test]
    fn pallet_mode_sums_per_package_results() {
        let fixture = Fixture::new(by_weight(2.0, 10.0));
        let packages = vec![cm((40.0, 30.0, 20.0), 5.0, 10), cm((60.0, 40.0, 50.0), 20.0, 4)];

        let result = calculate_shipment(&packages, &fixture.ctx(), true);
        let first = crate::cost::calculate_shipping_cost(
            &packages[0],
            &fixture.from,
            &fixture.to,
            &fixture.pallet,
            &fixture.cost,
        );
        let second = crate::cost::calculate_shipping_cost(
            &packages[1],
            &fixture.from,
            &fixture.to,
            &fixture.pallet,
            &fixture.cost,
        );

        assert!((result.shipping_cost - (first.shipping_cost + second.shipping_cost)).abs() < 1e-9);
        assert!((result.tax - (first.tax + second.tax)).abs() < 1e-9);
        assert!((result.total_cost - (result.shipping_cost + result.tax)).abs() < 1e-9);
        assert_eq!(result.pallets_needed, first.pallets_needed + second.pallets_needed);
        assert!((result.total_weight - (first.total_weight + second.total_weight)).abs() < 1e-9);

        let mut expected = vec![CalculationStep::PackageHeader { number: 1 }];
        expected.extend(first.calculations.clone());
        expected.push(CalculationStep::PackageHeader { number: 2 });
        expected.extend(second.calculations.clone());
        assert_eq!(result.calculations, expected);

        let mut recommendations = first.recommendations.clone();
        recommendations.extend(second.recommendations.clone());
        assert_eq!(result.recommendations, recommendations);
    }

    #[test]
    fn no_pallet_mode_costs_the_combined_cube() {
        let fixture = Fixture::new(by_weight(1.0, 0.0));
        let packages = vec![cm((40.0, 30.0, 20.0), 5.0, 2), cm((20.0, 20.0, 20.0), 1.5, 4)];

        let result = calculate_shipment(&packages, &fixture.ctx(), false);
        assert!((result.shipping_cost - 16.0).abs() < 1e-9);
        assert!(!result
            .calculations
            .iter()
            .any(|step| matches!(step, CalculationStep::PackageHeader { .. })));
    }

    #[test]
    fn modes_diverge_for_volume_pricing_of_same_goods() {
        // Identical totals, different geometry: the cube proxy and per-package
        // costing are not expected to agree on pallet-driven numbers.
        let fixture = Fixture::new(ShippingCostConfig::new(
            CostBasis::Volume(VolumeRateUnit::M3),
            100.0,
            "USD",
            0.0,
        ));
        let packages = vec![cm((40.0, 30.0, 20.0), 5.0, 3); 3];

        let combined = calculate_shipment(&packages, &fixture.ctx(), false);
        let per_package = calculate_shipment(&packages, &fixture.ctx(), true);

        // volume pricing depends only on total volume, so the cost agrees
        assert!((combined.shipping_cost - per_package.shipping_cost).abs() < 1e-9);
        // pallet allocation does not: three package types get three pallets
        assert_eq!(per_package.pallets_needed, 3);
        assert_eq!(combined.pallets_needed, 1);
        // each package type fits one pallet, so none of them asks for splitting
        assert!(!per_package
            .recommendations
            .iter()
            .any(|rec| matches!(rec, Recommendation::MultiplePallets { .. })));
    }

    #[test]
    fn progress_events_follow_the_calculation() {
        let fixture = Fixture::new(by_weight(1.0, 0.0));
        let packages = vec![cm((40.0, 30.0, 20.0), 5.0, 2), cm((20.0, 20.0, 20.0), 1.5, 4)];

        let mut events = Vec::new();
        let result = calculate_shipment_with_progress(
            &packages,
            &fixture.ctx(),
            true,
            &EngineConfig::default(),
            |event| events.push(event.clone()),
        );

        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ShipmentEvent::PackageCosted { package: 1, .. }));
        assert!(matches!(events[1], ShipmentEvent::PackageCosted { package: 2, .. }));
        match &events[2] {
            ShipmentEvent::Finished {
                total_cost,
                pallets_needed,
                ..
            } => {
                assert_eq!(*total_cost, result.total_cost);
                assert_eq!(*pallets_needed, result.pallets_needed);
            }
            other => panic!("unexpected last event: {other:?}"),
        }

        let mut events = Vec::new();
        calculate_shipment_with_progress(
            &packages,
            &fixture.ctx(),
            false,
            &EngineConfig::default(),
            |event| events.push(event.clone()),
        );
        assert!(matches!(events[0], ShipmentEvent::Combined { packages: 2, .. }));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = ShipmentEvent::Combined {
            packages: 2,
            side_mm: 300.0,
            weight_kg: 16.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Combined");
        assert_eq!(json["packages"], 2);
    }

    #[test]
    fn layout_preview_uses_combined_package() {
        let packages = vec![cm((10.0, 10.0, 10.0), 1.0, 8)];
        let preview = layout_preview(&packages, &euro(), &EngineConfig::default()).unwrap();

        assert!((preview.package.length - 200.0).abs() < 1e-9);
        assert_eq!(preview.pallet.length_unit, LengthUnit::Millimeter);
        assert_eq!(preview.stacking.items_per_layer, 24);
        assert_eq!(preview.stacking.layers, 1);
        assert_eq!(preview.stacking.total_items, 1);

        assert!(layout_preview(&[], &euro(), &EngineConfig::default()).is_none());
    }
}
