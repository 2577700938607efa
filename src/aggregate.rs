//! Combines a package list into one equivalent-volume package.
//!
//! The result is a cube whose volume equals the summed volume of all packages
//! and whose weight equals their summed weight. It is a proxy for weight and
//! volume based costing, not a packing of the real shapes.

use crate::geometry::cube_side_for_volume;
use crate::model::Package;
use crate::types::Dims3;
use crate::units::{LengthUnit, WeightUnit};

/// Summed volume (mm³) and weight (kg) of a package list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub volume_mm3: f64,
    pub weight_kg: f64,
}

impl Totals {
    pub fn of(packages: &[Package]) -> Self {
        packages
            .iter()
            .map(Package::normalized)
            .fold(Self::default(), |acc, pkg| Self {
                volume_mm3: acc.volume_mm3 + pkg.total_volume(),
                weight_kg: acc.weight_kg + pkg.total_weight(),
            })
    }
}

/// Collapses `packages` into a single cube-shaped package in mm/kg.
///
/// Returns `None` only for an empty list.
///
/// # Examples
/// ```
/// use shipping_calc::aggregate::combine_packages;
/// use shipping_calc::model::Package;
/// use shipping_calc::units::{LengthUnit, WeightUnit};
///
/// let pkg = Package::new((10.0, 10.0, 10.0), 2.0, 8, LengthUnit::Centimeter, WeightUnit::Kilogram).unwrap();
/// let combined = combine_packages(&[pkg]).unwrap();
/// assert!((combined.length - 200.0).abs() < 1e-9);
/// assert_eq!(combined.weight, 16.0);
/// assert_eq!(combined.quantity, 1);
/// ```
pub fn combine_packages(packages: &[Package]) -> Option<Package> {
    if packages.is_empty() {
        return None;
    }

    let totals = Totals::of(packages);
    let cube = Dims3::cube(cube_side_for_volume(totals.volume_mm3));

    Some(Package {
        id: None,
        length: cube.length,
        width: cube.width,
        height: cube.height,
        weight: totals.weight_kg,
        quantity: 1,
        length_unit: LengthUnit::Millimeter,
        weight_unit: WeightUnit::Kilogram,
    })
}
