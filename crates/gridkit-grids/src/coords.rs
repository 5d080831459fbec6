//! Coordinate helpers shared by the grid types.

use glam::{DVec3, UVec3};
use gridkit_core::{check_dimensions, GridError, Result};

/// Relative tolerance when checking that consecutive spacings agree.
const SPACING_RTOL: f64 = 1e-9;

/// Returns the sorted unique values of `values`.
///
/// Fails on the first NaN or infinite value; `axis` is only used to label
/// the error.
pub fn unique_sorted(values: &[f64], axis: usize) -> Result<Vec<f64>> {
    if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
        return Err(GridError::NonFiniteCoordinate { axis, value });
    }
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out.dedup();
    Ok(out)
}

/// Returns the unique per-axis coordinates of a point set.
pub fn unique_axes(points: &[DVec3]) -> Result<[Vec<f64>; 3]> {
    let column = |axis: usize| -> Result<Vec<f64>> {
        let values: Vec<f64> = points.iter().map(|p| p[axis]).collect();
        unique_sorted(&values, axis)
    };
    Ok([column(0)?, column(1)?, column(2)?])
}

/// Returns the single spacing between consecutive sorted unique coordinates.
///
/// Axes with fewer than two coordinates have spacing `1.0`. Differences that
/// disagree by more than a relative `1e-9` are rejected.
pub fn uniform_spacing(coords: &[f64], axis: usize) -> Result<f64> {
    if coords.len() < 2 {
        return Ok(1.0);
    }
    let diffs: Vec<f64> = coords.windows(2).map(|w| w[1] - w[0]).collect();
    let largest = diffs.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    let first = diffs[0];
    if diffs
        .iter()
        .any(|d| (d - first).abs() > SPACING_RTOL * largest)
    {
        return Err(GridError::NonUniformSpacing { axis });
    }
    // Span over count is less sensitive to rounding than any single difference.
    Ok((coords[coords.len() - 1] - coords[0]) / diffs.len() as f64)
}

/// Returns `n` evenly spaced coordinates starting at `origin`.
pub fn axis_coordinates(origin: f64, spacing: f64, n: u32) -> Vec<f64> {
    (0..n).map(|i| origin + f64::from(i) * spacing).collect()
}

/// Returns the Cartesian product of three axes, x varying fastest.
pub fn meshgrid_points(x: &[f64], y: &[f64], z: &[f64]) -> Vec<DVec3> {
    let mut points = Vec::with_capacity(x.len() * y.len() * z.len());
    for &zk in z {
        for &yj in y {
            for &xi in x {
                points.push(DVec3::new(xi, yj, zk));
            }
        }
    }
    points
}

/// Converts an axis length to a dimension count.
pub(crate) fn axis_len(coords: &[f64]) -> u32 {
    u32::try_from(coords.len()).unwrap_or(u32::MAX)
}

/// Returns the dimensions of the lattice spanned by three axes.
///
/// Fails if an axis has more than `u32::MAX` nodes or the node count does
/// not fit in `usize`.
pub fn lattice_dimensions(x: &[f64], y: &[f64], z: &[f64]) -> Result<UVec3> {
    let lens = [x.len(), y.len(), z.len()];
    let too_large = || GridError::DimensionsTooLarge { dims: lens };
    let dims = UVec3::new(
        u32::try_from(lens[0]).map_err(|_| too_large())?,
        u32::try_from(lens[1]).map_err(|_| too_large())?,
        u32::try_from(lens[2]).map_err(|_| too_large())?,
    );
    check_dimensions(dims)?;
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unique_sorted() {
        let out = unique_sorted(&[3.0, 1.0, 2.0, 1.0, 3.0], 0).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
        assert!(unique_sorted(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_unique_sorted_rejects_nan() {
        let err = unique_sorted(&[0.0, f64::NAN], 2).unwrap_err();
        assert!(matches!(err, GridError::NonFiniteCoordinate { axis: 2, .. }));
    }

    #[test]
    fn test_uniform_spacing() {
        assert_eq!(uniform_spacing(&[], 0).unwrap(), 1.0);
        assert_eq!(uniform_spacing(&[4.0], 0).unwrap(), 1.0);
        assert_eq!(uniform_spacing(&[-10.0, -5.0, 0.0, 5.0], 0).unwrap(), 5.0);

        let tenths: Vec<f64> = (0..11).map(|i| f64::from(i) * 0.1).collect();
        let dx = uniform_spacing(&tenths, 0).unwrap();
        assert!((dx - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_non_uniform_spacing() {
        let err = uniform_spacing(&[0.0, 1.0, 3.0], 1).unwrap_err();
        assert!(matches!(err, GridError::NonUniformSpacing { axis: 1 }));
    }

    #[test]
    fn test_meshgrid_order() {
        let pts = meshgrid_points(&[0.0, 1.0], &[10.0, 20.0], &[5.0]);
        assert_eq!(
            pts,
            vec![
                DVec3::new(0.0, 10.0, 5.0),
                DVec3::new(1.0, 10.0, 5.0),
                DVec3::new(0.0, 20.0, 5.0),
                DVec3::new(1.0, 20.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_lattice_dimensions() {
        let dims = lattice_dimensions(&[0.0, 1.0, 2.0], &[0.0], &[]).unwrap();
        assert_eq!(dims, UVec3::new(3, 1, 0));
    }

    proptest! {
        #[test]
        fn unique_sorted_is_strictly_increasing(values in prop::collection::vec(-1e6f64..1e6, 0..64)) {
            let out = unique_sorted(&values, 0).unwrap();
            prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
            for v in &values {
                prop_assert!(out.contains(v));
            }
        }

        #[test]
        fn axis_coordinates_round_trip_spacing(origin in -100.0f64..100.0, spacing in 0.01f64..10.0, n in 2u32..50) {
            let coords = axis_coordinates(origin, spacing, n);
            let derived = uniform_spacing(&coords, 0).unwrap();
            prop_assert!((derived - spacing).abs() <= 1e-9 * spacing.max(1.0));
        }
    }
}
