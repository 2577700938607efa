//! Plain-text shipping report.

use std::fmt;

use crate::cost::ShippingResult;
use crate::model::Package;
use crate::units::{WeightUnit, format_measurement};

/// Renders a finished calculation as a text report.
///
/// Only formats what `result` already holds. The pallet count is listed in
/// pallet mode only, warnings and recommendations only when present.
pub fn render_report(packages: &[Package], result: &ShippingResult, use_pallet: bool) -> String {
    ShippingReport {
        packages,
        result,
        use_pallet,
    }
    .to_string()
}

/// A calculation bound to its input packages, displayable as a report.
pub struct ShippingReport<'a> {
    pub packages: &'a [Package],
    pub result: &'a ShippingResult,
    pub use_pallet: bool,
}

impl fmt::Display for ShippingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "Shipping Calculation Report")?;

        section(f, "Package Details")?;
        for (index, pkg) in self.packages.iter().enumerate() {
            writeln!(f, "Package #{}", index + 1)?;
            writeln!(
                f,
                "  Dimensions: {}x{}x{} {}",
                pkg.length, pkg.width, pkg.height, pkg.length_unit
            )?;
            writeln!(f, "  Weight: {} {}", pkg.weight, pkg.weight_unit)?;
            writeln!(f, "  Quantity: {}", pkg.quantity)?;
        }

        let currency = &result.currency_code;
        section(f, "Cost Summary")?;
        writeln!(f, "Shipping Cost: {currency} {:.2}", result.shipping_cost)?;
        writeln!(f, "Tax: {currency} {:.2}", result.tax)?;
        writeln!(f, "Total Cost: {currency} {:.2}", result.total_cost)?;
        writeln!(
            f,
            "Total Weight: {}",
            format_measurement(result.total_weight, WeightUnit::Kilogram)
        )?;
        if self.use_pallet {
            writeln!(f, "Pallets Needed: {}", result.pallets_needed)?;
        }

        if !result.warnings.is_empty() {
            section(f, "Warnings")?;
            for warning in &result.warnings {
                writeln!(f, "- {warning}")?;
            }
        }

        if !result.recommendations.is_empty() {
            section(f, "Recommendations")?;
            for recommendation in &result.recommendations {
                writeln!(f, "- {recommendation}")?;
            }
        }

        section(f, "Calculation Details")?;
        for step in &result.calculations {
            writeln!(f, "{step}")?;
        }
        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(title.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CalculationStep, Recommendation, Warning};
    use crate::units::LengthUnit;

    fn sample_result() -> ShippingResult {
        let mut result = ShippingResult::empty("JMD");
        result.shipping_cost = 500.0;
        result.tax = 50.0;
        result.total_cost = 550.0;
        result.pallets_needed = 2;
        result.total_weight = 220.5;
        result.calculations = vec![
            CalculationStep::TotalPackageWeight { kg: 200.0 },
            CalculationStep::TotalPallets(2),
        ];
        result
    }

    fn sample_packages() -> Vec<Package> {
        vec![
            Package::new((40.0, 30.0, 20.5), 5.0, 4, LengthUnit::Centimeter, WeightUnit::Kilogram)
                .unwrap(),
        ]
    }

    #[test]
    fn renders_all_sections_in_pallet_mode() {
        let report = render_report(&sample_packages(), &sample_result(), true);

        assert!(report.starts_with("Shipping Calculation Report\n"));
        assert!(report.contains("Package #1\n  Dimensions: 40x30x20.5 cm\n  Weight: 5 kg\n  Quantity: 4\n"));
        assert!(report.contains("Shipping Cost: JMD 500.00\n"));
        assert!(report.contains("Tax: JMD 50.00\n"));
        assert!(report.contains("Total Cost: JMD 550.00\n"));
        assert!(report.contains("Total Weight: 220.50 kg\n"));
        assert!(report.contains("Pallets Needed: 2\n"));
        assert!(report.contains("Calculation Details\n-------------------\nTotal package weight: 200.00 kg\nTotal pallets needed: 2\n"));
        assert!(!report.contains("Warnings"));
        assert!(!report.contains("Recommendations"));
    }

    #[test]
    fn display_matches_rendered_report() {
        let packages = sample_packages();
        let result = sample_result();
        let report = ShippingReport {
            packages: &packages,
            result: &result,
            use_pallet: true,
        };
        assert_eq!(format!("{report}"), render_report(&packages, &result, true));
    }

    #[test]
    fn hides_pallet_count_without_pallets() {
        let report = render_report(&sample_packages(), &sample_result(), false);
        assert!(!report.contains("Pallets Needed"));
    }

    #[test]
    fn lists_warnings_and_recommendations_when_present() {
        let mut result = sample_result();
        result.warnings.push(Warning::NoPackages);
        result
            .recommendations
            .push(Recommendation::MultiplePallets { count: 2 });

        let report = render_report(&[], &result, true);
        assert!(report.contains("Warnings\n--------\n- No packages to calculate\n"));
        assert!(report.contains(
            "- Multiple pallets required (2) - consider splitting shipment or using larger pallets if available\n"
        ));
    }
}
