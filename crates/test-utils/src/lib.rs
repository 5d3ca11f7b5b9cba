//! Shared test utilities for the climate point service workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Regular coordinate axes and value generators
//! - A NetCDF fixture writer for building small archive files
//! - Approximate floating-point assertions
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(26.850000001_f64, 26.85, 1e-6); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                concat!(
                    "assertion failed: `(left ≈ right)`\n",
                    "  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`"
                ),
                left, right, diff, epsilon
            );
        }
    }};
}

/// Element-wise approximate equality for two slices of the same length.
#[macro_export]
macro_rules! assert_series_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &[f64] = &$left;
        let right: &[f64] = &$right;
        assert_eq!(left.len(), right.len(), "series length mismatch");
        for (l, r) in left.iter().zip(right.iter()) {
            $crate::assert_approx_eq!(*l, *r, $epsilon);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(26.8500001, 26.85, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 1.0, 0.001);
    }

    #[test]
    fn test_assert_series_approx_eq_passes() {
        assert_series_approx_eq!(vec![1.0001, 2.0], vec![1.0, 2.0001], 0.001);
    }
}
