//! Rectilinear grid: independent, sorted coordinate arrays per axis.

use std::fmt;
use std::path::Path;

use glam::{DVec3, UVec3};
use gridkit_core::{
    grid_attributes, n_cells_for_dimensions, n_points_for_dimensions, write_summary,
    ActiveScalars, AttributeArrays, DataSet, FormatRegistry, Grid, GridError, Result,
};
use serde::{Deserialize, Serialize};

use crate::coords::{
    axis_len, lattice_dimensions, meshgrid_points, unique_axes, unique_sorted, uniform_spacing,
};
use crate::io::{native_formats, read_grid, write_grid, GridFile, GridRef};
use crate::structured::StructuredGrid;
use crate::uniform::UniformGrid;

/// An axis-aligned grid with independent spacing along each axis.
///
/// The grid stores one coordinate array per axis. Whatever route coordinates
/// arrive through, they are deduplicated and sorted ascending before being
/// stored, so the dimensions are always the three array lengths.
///
/// # Example
///
/// ```
/// use gridkit_grids::RectilinearGrid;
///
/// let grid = RectilinearGrid::from_arrays(&[2.0, 0.0, 1.0, 2.0], &[0.0, 5.0], &[0.0])?;
/// assert_eq!(grid.x(), &[0.0, 1.0, 2.0]);
/// # Ok::<(), gridkit_core::GridError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectilinearGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,

    #[serde(default)]
    point_data: AttributeArrays,
    #[serde(default)]
    cell_data: AttributeArrays,
    #[serde(default)]
    field_data: AttributeArrays,
    #[serde(default)]
    active_scalars: Option<ActiveScalars>,
}

impl RectilinearGrid {
    /// Creates an empty grid with dimensions `(0, 0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid from the node coordinates along each axis.
    ///
    /// Each array is reduced to its sorted unique values.
    pub fn from_arrays(x: &[f64], y: &[f64], z: &[f64]) -> Result<Self> {
        let (x, y, z) = (unique_sorted(x, 0)?, unique_sorted(y, 1)?, unique_sorted(z, 2)?);
        lattice_dimensions(&x, &y, &z)?;
        let grid = Self {
            x,
            y,
            z,
            ..Self::default()
        };
        log::debug!("created rectilinear grid {:?}", grid.dimensions().to_array());
        Ok(grid)
    }

    /// Creates a planar grid; the z axis is the single coordinate `0.0`.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self> {
        Self::from_arrays(x, y, &[0.0])
    }

    /// Loads a grid from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::readers().lookup(path)?;
        match read_grid(path)? {
            GridFile::RectilinearGrid(grid) => Ok(grid),
            other => Err(GridError::WrongGridKind {
                expected: "RectilinearGrid",
                found: other.kind(),
            }),
        }
    }

    /// Writes the grid to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        Self::writers().lookup(path)?;
        write_grid(path, &GridRef::RectilinearGrid(self))
    }

    /// Formats this grid type can be read from.
    pub fn readers() -> FormatRegistry {
        native_formats()
    }

    /// Formats this grid type can be written to.
    pub fn writers() -> FormatRegistry {
        native_formats()
    }

    /// Returns the coordinates along the X axis.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Returns the coordinates along the Y axis.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Returns the coordinates along the Z axis.
    #[must_use]
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Returns the coordinates along an axis (0, 1 or 2).
    ///
    /// # Panics
    ///
    /// Panics if `axis > 2`.
    #[must_use]
    pub fn axis(&self, axis: usize) -> &[f64] {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("axis index {axis} out of range"),
        }
    }

    /// Sets the coordinates along the X axis.
    pub fn set_x(&mut self, coords: &[f64]) -> Result<()> {
        let x = unique_sorted(coords, 0)?;
        lattice_dimensions(&x, &self.y, &self.z)?;
        self.x = x;
        self.drop_stale_arrays();
        Ok(())
    }

    /// Sets the coordinates along the Y axis.
    pub fn set_y(&mut self, coords: &[f64]) -> Result<()> {
        let y = unique_sorted(coords, 1)?;
        lattice_dimensions(&self.x, &y, &self.z)?;
        self.y = y;
        self.drop_stale_arrays();
        Ok(())
    }

    /// Sets the coordinates along the Z axis.
    pub fn set_z(&mut self, coords: &[f64]) -> Result<()> {
        let z = unique_sorted(coords, 2)?;
        lattice_dimensions(&self.x, &self.y, &z)?;
        self.z = z;
        self.drop_stale_arrays();
        Ok(())
    }

    /// Rebuilds the axes from a point set.
    ///
    /// Each axis becomes the unique values of that coordinate over all
    /// points, so reading [`points`](DataSet::points) back yields the full
    /// Cartesian product of those values.
    pub fn set_points(&mut self, points: &[DVec3]) -> Result<()> {
        let [x, y, z] = unique_axes(points)?;
        lattice_dimensions(&x, &y, &z)?;
        self.x = x;
        self.y = y;
        self.z = z;
        self.drop_stale_arrays();
        Ok(())
    }

    /// Returns the position of the node at a 3D index, if in range.
    #[must_use]
    pub fn position_of_point(&self, i: u32, j: u32, k: u32) -> Option<DVec3> {
        Some(DVec3::new(
            *self.x.get(i as usize)?,
            *self.y.get(j as usize)?,
            *self.z.get(k as usize)?,
        ))
    }

    /// Casts to a [`StructuredGrid`] with explicit points.
    ///
    /// Point, cell and field data and metadata are copied.
    pub fn cast_to_structured_grid(&self) -> StructuredGrid {
        let mut grid = StructuredGrid::from_lattice(self.dimensions(), self.points());
        *grid.point_data_mut() = self.point_data.clone();
        *grid.cell_data_mut() = self.cell_data.clone();
        *grid.field_data_mut() = self.field_data.clone();
        grid.copy_meta_from(self);
        grid
    }

    /// Casts to a [`UniformGrid`].
    ///
    /// Fails with [`GridError::NonUniformSpacing`] if any axis is not evenly
    /// spaced. Point, cell and field data and metadata are copied.
    pub fn cast_to_uniform_grid(&self) -> Result<UniformGrid> {
        let spacing = DVec3::new(
            uniform_spacing(&self.x, 0)?,
            uniform_spacing(&self.y, 1)?,
            uniform_spacing(&self.z, 2)?,
        );
        let origin = DVec3::new(
            self.x.first().copied().unwrap_or(0.0),
            self.y.first().copied().unwrap_or(0.0),
            self.z.first().copied().unwrap_or(0.0),
        );
        let mut grid = UniformGrid::from_specs(self.dimensions(), spacing, origin)?;
        grid.point_data_mut().update(&self.point_data);
        grid.cell_data_mut().update(&self.cell_data);
        grid.field_data_mut().update(&self.field_data);
        grid.copy_meta_from(self);
        log::debug!("cast rectilinear grid to uniform grid, spacing {spacing}");
        Ok(grid)
    }

    /// Re-establishes the coordinate invariants after deserialization.
    pub(crate) fn validated(mut self) -> Result<Self> {
        self.x = unique_sorted(&self.x, 0)?;
        self.y = unique_sorted(&self.y, 1)?;
        self.z = unique_sorted(&self.z, 2)?;
        lattice_dimensions(&self.x, &self.y, &self.z)?;
        self.drop_stale_arrays();
        Ok(self)
    }
}

impl DataSet for RectilinearGrid {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "RectilinearGrid"
    }

    fn n_points(&self) -> usize {
        n_points_for_dimensions(self.dimensions())
    }

    fn n_cells(&self) -> usize {
        n_cells_for_dimensions(self.dimensions())
    }

    fn points(&self) -> Vec<DVec3> {
        meshgrid_points(&self.x, &self.y, &self.z)
    }

    fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let min = DVec3::new(*self.x.first()?, *self.y.first()?, *self.z.first()?);
        let max = DVec3::new(*self.x.last()?, *self.y.last()?, *self.z.last()?);
        Some((min, max))
    }

    fn point_data(&self) -> &AttributeArrays {
        &self.point_data
    }

    fn point_data_mut(&mut self) -> &mut AttributeArrays {
        &mut self.point_data
    }

    fn cell_data(&self) -> &AttributeArrays {
        &self.cell_data
    }

    fn cell_data_mut(&mut self) -> &mut AttributeArrays {
        &mut self.cell_data
    }

    fn field_data(&self) -> &AttributeArrays {
        &self.field_data
    }

    fn field_data_mut(&mut self) -> &mut AttributeArrays {
        &mut self.field_data
    }

    fn active_scalars_info(&self) -> Option<&ActiveScalars> {
        self.active_scalars.as_ref()
    }

    fn set_active_scalars_info(&mut self, info: Option<ActiveScalars>) {
        self.active_scalars = info;
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        grid_attributes(self)
    }
}

impl Grid for RectilinearGrid {
    fn dimensions(&self) -> UVec3 {
        UVec3::new(axis_len(&self.x), axis_len(&self.y), axis_len(&self.z))
    }

    /// Dimensions follow the coordinate arrays; only the current value is
    /// accepted.
    fn set_dimensions(&mut self, dims: UVec3) -> Result<()> {
        let current = self.dimensions();
        if dims != current {
            return Err(GridError::DimensionMismatch {
                expected: current.to_array(),
                actual: dims.to_array(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for RectilinearGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_summary(self.type_name(), &self.attributes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_core::DataArray;

    fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
        let n = ((stop - start) / step).ceil() as usize;
        (0..n).map(|i| start + i as f64 * step).collect()
    }

    #[test]
    fn test_empty_grid() {
        let grid = RectilinearGrid::new();
        assert_eq!(grid.dimensions(), UVec3::ZERO);
        assert_eq!(grid.n_points(), 0);
        assert_eq!(grid.n_cells(), 0);
        assert!(grid.points().is_empty());
        assert!(grid.bounds().is_none());
    }

    #[test]
    fn test_from_arrays() {
        let x = arange(-10.0, 10.0, 2.0);
        let y = arange(-10.0, 10.0, 5.0);
        let z = arange(-10.0, 10.0, 1.0);
        let grid = RectilinearGrid::from_arrays(&x, &y, &z).unwrap();
        assert_eq!(grid.dimensions(), UVec3::new(10, 4, 20));
        assert_eq!(grid.n_points(), 10 * 4 * 20);
        assert_eq!(grid.n_cells(), 9 * 3 * 19);
        assert_eq!(grid.x(), x.as_slice());
    }

    #[test]
    fn test_from_arrays_dedups_and_sorts() {
        let grid =
            RectilinearGrid::from_arrays(&[3.0, 1.0, 1.0, 2.0], &[0.5, 0.5], &[9.0, -9.0]).unwrap();
        assert_eq!(grid.x(), &[1.0, 2.0, 3.0]);
        assert_eq!(grid.y(), &[0.5]);
        assert_eq!(grid.z(), &[-9.0, 9.0]);
        assert_eq!(grid.dimensions(), UVec3::new(3, 1, 2));
    }

    #[test]
    fn test_from_xy() {
        let grid = RectilinearGrid::from_xy(&[0.0, 1.0, 2.0], &[0.0, 1.0]).unwrap();
        assert_eq!(grid.z(), &[0.0]);
        assert_eq!(grid.dimensions(), UVec3::new(3, 2, 1));
        assert_eq!(grid.n_cells(), 2);
    }

    #[test]
    fn test_points_are_x_fastest() {
        let grid = RectilinearGrid::from_arrays(&[0.0, 1.0], &[0.0, 2.0], &[0.0, 3.0]).unwrap();
        let pts = grid.points();
        assert_eq!(pts.len(), 8);
        assert_eq!(pts[1], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(pts[2], DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(pts[4], DVec3::new(0.0, 0.0, 3.0));
        assert_eq!(pts[grid.flatten_point_index(1, 1, 1).unwrap()], DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(grid.flatten_point_index(2, 0, 0), None);
        assert_eq!(grid.position_of_point(1, 1, 1), Some(DVec3::new(1.0, 2.0, 3.0)));
        assert_eq!(grid.position_of_point(2, 0, 0), None);
    }

    #[test]
    fn test_set_points_round_trip() {
        let source = RectilinearGrid::from_arrays(&[0.0, 1.0, 4.0], &[2.0, 3.0], &[5.0]).unwrap();
        let mut points = source.points();
        // Duplicates and shuffled order collapse to the same axes.
        points.reverse();
        points.extend_from_slice(&source.points()[..3]);

        let mut grid = RectilinearGrid::new();
        grid.set_points(&points).unwrap();
        assert_eq!(grid.x(), source.x());
        assert_eq!(grid.y(), source.y());
        assert_eq!(grid.z(), source.z());
        assert_eq!(grid.points(), source.points());
    }

    #[test]
    fn test_set_axis_updates_dimensions() {
        let mut grid = RectilinearGrid::from_arrays(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
        grid.set_x(&[5.0, 0.0, 2.5, 5.0]).unwrap();
        assert_eq!(grid.x(), &[0.0, 2.5, 5.0]);
        assert_eq!(grid.dimensions(), UVec3::new(3, 2, 2));
        assert!(grid.set_y(&[0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_set_dimensions() {
        let mut grid = RectilinearGrid::from_arrays(&[0.0, 1.0], &[0.0], &[0.0]).unwrap();
        assert!(grid.set_dimensions(UVec3::new(2, 1, 1)).is_ok());
        assert!(matches!(
            grid.set_dimensions(UVec3::new(3, 1, 1)),
            Err(GridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_geometry_change_drops_stale_arrays() {
        let mut grid = RectilinearGrid::from_arrays(&[0.0, 1.0], &[0.0, 1.0], &[0.0]).unwrap();
        grid.add_point_array(DataArray::scalars("p", vec![1.0; 4]))
            .unwrap();
        grid.add_field_array(DataArray::scalars("f", vec![7.0])).unwrap();
        grid.set_active_scalars("p").unwrap();

        grid.set_z(&[0.0, 1.0]).unwrap();
        assert!(grid.point_data().is_empty());
        assert!(grid.active_scalars_info().is_none());
        assert!(grid.field_data().contains("f"));
    }

    #[test]
    fn test_cast_to_uniform_grid() {
        let mut grid =
            RectilinearGrid::from_arrays(&[1.0, 3.0, 5.0], &[0.0, 0.5], &[2.0]).unwrap();
        grid.add_point_array(DataArray::scalars("p", (0..6).map(f64::from).collect()))
            .unwrap();
        let uniform = grid.cast_to_uniform_grid().unwrap();
        assert_eq!(uniform.dimensions(), UVec3::new(3, 2, 1));
        assert_eq!(uniform.spacing(), DVec3::new(2.0, 0.5, 1.0));
        assert_eq!(uniform.origin(), DVec3::new(1.0, 0.0, 2.0));
        assert_eq!(uniform.points(), grid.points());
        assert!(uniform.point_data().contains("p"));
    }

    #[test]
    fn test_cast_to_uniform_grid_rejects_uneven_axis() {
        let grid = RectilinearGrid::from_arrays(&[0.0, 1.0, 3.0], &[0.0], &[0.0]).unwrap();
        assert!(matches!(
            grid.cast_to_uniform_grid(),
            Err(GridError::NonUniformSpacing { axis: 0 })
        ));
    }

    #[test]
    fn test_cast_to_structured_grid() {
        let grid = RectilinearGrid::from_arrays(&[0.0, 1.0], &[0.0, 10.0], &[0.0]).unwrap();
        let structured = grid.cast_to_structured_grid();
        assert_eq!(structured.dimensions(), grid.dimensions());
        assert_eq!(structured.points(), grid.points());
    }

    #[test]
    fn test_display() {
        let grid = RectilinearGrid::from_arrays(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let text = grid.to_string();
        assert!(text.starts_with("RectilinearGrid\n"));
        assert!(text.contains("N Points:   8"));
        assert!(text.contains("Dimensions: 2, 2, 2"));
    }
}
