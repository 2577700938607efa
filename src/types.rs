//! Common value types and traits for package geometry.
//!
//! This module defines the three-axis dimension vector used by packages and
//! pallets, the trait abstractions shared by them, and the input validation
//! helpers applied at the service boundary.

/// Length, width and height of a box-shaped object.
///
/// The engine treats `length` as the axis aligned with the pallet length in the
/// default orientation and `height` as the stacking axis.
///
/// # Examples
/// ```
/// use shipping_calc::types::Dims3;
///
/// let dims = Dims3::new(300.0, 200.0, 150.0);
/// assert_eq!(dims.volume(), 9_000_000.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dims3 {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dims3 {
    #[inline]
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Creates a cube with the given side length.
    #[inline]
    pub const fn cube(side: f64) -> Self {
        Self::new(side, side, side)
    }

    /// Product of all three axes.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// True if any axis is exactly zero.
    #[inline]
    pub fn has_zero_axis(&self) -> bool {
        self.length == 0.0 || self.width == 0.0 || self.height == 0.0
    }
}

/// Objects with a box-shaped extent.
pub trait Dimensional {
    fn dimensions(&self) -> Dims3;

    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }
}

/// Validation helpers used before values enter the engine.
///
/// The engine itself never rejects input; these checks run at the boundary.
pub mod validation {

    /// Accepts finite values that are zero or greater.
    ///
    /// Zero is allowed because a blank form field is a legal, if degenerate,
    /// package. The stacking planner reports it instead of failing.
    pub fn validate_non_negative(value: f64, name: &str) -> Result<(), String> {
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        if value < 0.0 {
            return Err(format!("{} must not be negative, got: {}", name, value));
        }
        Ok(())
    }

    /// Validates all three axes of a box.
    pub fn validate_dimensions_3d(dims: (f64, f64, f64), prefix: &str) -> Result<(), String> {
        validate_non_negative(dims.0, &format!("{prefix}length"))?;
        validate_non_negative(dims.1, &format!("{prefix}width"))?;
        validate_non_negative(dims.2, &format!("{prefix}height"))?;
        Ok(())
    }

    /// Quantities start at one.
    pub fn validate_quantity(quantity: u32) -> Result<(), String> {
        if quantity == 0 {
            return Err("Quantity must be at least 1".to_string());
        }
        Ok(())
    }
}
