//! Geometric helpers for pallet footprints.
//!
//! The stacking planner only ever considers two axis-aligned footprints per
//! package: as given, and rotated by 90° about the vertical axis.

use crate::types::Dims3;

/// Which way a package footprint is laid on the pallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Package length along the pallet length.
    AsGiven,
    /// Package width along the pallet length.
    Rotated,
}

/// Grid of one layer for a single orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerGrid {
    pub orientation: Orientation,
    /// Units along the pallet length.
    pub per_row: u32,
    /// Rows along the pallet width.
    pub rows: u32,
}

impl LayerGrid {
    pub fn capacity(&self) -> u32 {
        self.per_row.saturating_mul(self.rows)
    }
}

/// How many whole pieces of `piece` fit into `span`.
///
/// # Examples
/// ```
/// use shipping_calc::geometry::fit_count;
///
/// assert_eq!(fit_count(1200.0, 300.0), 4);
/// assert_eq!(fit_count(800.0, 300.0), 2);
/// ```
pub fn fit_count(span: f64, piece: f64) -> u32 {
    if piece <= 0.0 || span <= 0.0 {
        return 0;
    }
    // `as` saturates, so huge ratios cap at u32::MAX
    (span / piece).floor() as u32
}

/// Grid for one orientation of `package` on `pallet`.
pub fn layer_grid(package: &Dims3, pallet: &Dims3, orientation: Orientation) -> LayerGrid {
    let (along_length, along_width) = match orientation {
        Orientation::AsGiven => (package.length, package.width),
        Orientation::Rotated => (package.width, package.length),
    };
    LayerGrid {
        orientation,
        per_row: fit_count(pallet.length, along_length),
        rows: fit_count(pallet.width, along_width),
    }
}

/// Picks the orientation that fits more units per layer.
///
/// Ties keep the package as given.
pub fn best_layer_grid(package: &Dims3, pallet: &Dims3) -> LayerGrid {
    let as_given = layer_grid(package, pallet, Orientation::AsGiven);
    let rotated = layer_grid(package, pallet, Orientation::Rotated);
    if as_given.capacity() >= rotated.capacity() {
        as_given
    } else {
        rotated
    }
}

/// Side length of the cube with the given volume.
pub fn cube_side_for_volume(volume: f64) -> f64 {
    volume.cbrt()
}
