//! Uniform grid (image data): origin, spacing and dimensions.

use std::fmt;
use std::path::Path;

use glam::{DVec3, UVec3};
use gridkit_core::{
    check_dimensions, format_float, grid_attributes, n_cells_for_dimensions, n_points_for_dimensions,
    write_summary, ActiveScalars, AttributeArrays, DataArray, DataSet, FormatRegistry, Grid,
    GridError, Result,
};
use serde::{Deserialize, Serialize};

use crate::coords::{axis_coordinates, lattice_dimensions, unique_axes, uniform_spacing};
use crate::io::{native_formats, read_grid, write_grid, GridFile, GridRef};
use crate::rectilinear::RectilinearGrid;
use crate::structured::StructuredGrid;

/// A regular axis-aligned grid with constant spacing per axis.
///
/// `UniformGrid` is defined by:
/// - Grid dimensions (number of nodes in X, Y, Z)
/// - Spacing between adjacent nodes along each axis
/// - Origin, the position of node `(0, 0, 0)`
///
/// Node positions are derived, never stored.
///
/// # Example
///
/// ```
/// use glam::{DVec3, UVec3};
/// use gridkit_grids::UniformGrid;
///
/// let grid = UniformGrid::from_dimensions(UVec3::new(10, 10, 10))?
///     .with_spacing(DVec3::new(2.0, 1.0, 5.0))?
///     .with_origin(DVec3::new(10.0, 35.0, 50.0))?;
/// assert_eq!(grid.position_of_point(1, 1, 1), Some(DVec3::new(12.0, 36.0, 55.0)));
/// # Ok::<(), gridkit_core::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformGrid {
    dimensions: UVec3,
    spacing: DVec3,
    origin: DVec3,

    #[serde(default)]
    point_data: AttributeArrays,
    #[serde(default)]
    cell_data: AttributeArrays,
    #[serde(default)]
    field_data: AttributeArrays,
    #[serde(default)]
    active_scalars: Option<ActiveScalars>,
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self {
            dimensions: UVec3::ZERO,
            spacing: DVec3::ONE,
            origin: DVec3::ZERO,
            point_data: AttributeArrays::new(),
            cell_data: AttributeArrays::new(),
            field_data: AttributeArrays::new(),
            active_scalars: None,
        }
    }
}

impl UniformGrid {
    /// Creates an empty grid: no nodes, unit spacing, origin at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid with unit spacing and the origin at zero.
    ///
    /// Fails with [`GridError::DimensionsTooLarge`] if the node count does not
    /// fit in `usize`.
    pub fn from_dimensions(dims: UVec3) -> Result<Self> {
        check_dimensions(dims)?;
        Ok(Self {
            dimensions: dims,
            ..Self::default()
        })
    }

    /// Creates a grid from its dimensions, spacing and origin.
    pub fn from_specs(dims: UVec3, spacing: DVec3, origin: DVec3) -> Result<Self> {
        check_dimensions(dims)?;
        check_spacing(spacing)?;
        check_origin(origin)?;
        log::debug!(
            "created uniform grid {:?}, spacing {spacing}, origin {origin}",
            dims.to_array()
        );
        Ok(Self {
            dimensions: dims,
            spacing,
            origin,
            ..Self::default()
        })
    }

    /// Builder form of [`set_spacing`](Self::set_spacing).
    pub fn with_spacing(mut self, spacing: DVec3) -> Result<Self> {
        self.set_spacing(spacing)?;
        Ok(self)
    }

    /// Builder form of [`set_origin`](Self::set_origin).
    pub fn with_origin(mut self, origin: DVec3) -> Result<Self> {
        self.set_origin(origin)?;
        Ok(self)
    }

    /// Loads a grid from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::readers().lookup(path)?;
        match read_grid(path)? {
            GridFile::UniformGrid(grid) => Ok(grid),
            other => Err(GridError::WrongGridKind {
                expected: "UniformGrid",
                found: other.kind(),
            }),
        }
    }

    /// Writes the grid to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        Self::writers().lookup(path)?;
        write_grid(path, &GridRef::UniformGrid(self))
    }

    /// Formats this grid type can be read from.
    pub fn readers() -> FormatRegistry {
        native_formats()
    }

    /// Formats this grid type can be written to.
    pub fn writers() -> FormatRegistry {
        native_formats()
    }

    /// Returns the origin (the minimum corner for positive spacing).
    #[must_use]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Sets the origin.
    pub fn set_origin(&mut self, origin: DVec3) -> Result<()> {
        check_origin(origin)?;
        self.origin = origin;
        Ok(())
    }

    /// Returns the spacing along each axis.
    #[must_use]
    pub fn spacing(&self) -> DVec3 {
        self.spacing
    }

    /// Sets the spacing along each axis.
    pub fn set_spacing(&mut self, spacing: DVec3) -> Result<()> {
        check_spacing(spacing)?;
        self.spacing = spacing;
        Ok(())
    }

    /// Returns the coordinates of the nodes along one axis (0, 1 or 2).
    ///
    /// # Panics
    ///
    /// Panics if `axis > 2`.
    #[must_use]
    pub fn axis_coordinates(&self, axis: usize) -> Vec<f64> {
        axis_coordinates(self.origin[axis], self.spacing[axis], self.dimensions[axis])
    }

    /// Returns the world position of a node at a 3D index, if in range.
    #[must_use]
    pub fn position_of_point(&self, i: u32, j: u32, k: u32) -> Option<DVec3> {
        let index = UVec3::new(i, j, k);
        if index.cmpge(self.dimensions).any() {
            return None;
        }
        Some(self.origin + index.as_dvec3() * self.spacing)
    }

    /// Returns the X coordinate of every point, x varying fastest.
    #[must_use]
    pub fn x(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.x).collect()
    }

    /// Returns the Y coordinate of every point, x varying fastest.
    #[must_use]
    pub fn y(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.y).collect()
    }

    /// Returns the Z coordinate of every point, x varying fastest.
    #[must_use]
    pub fn z(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.z).collect()
    }

    /// Rebuilds the grid from a point set.
    ///
    /// Dimensions are the unique coordinate counts, the origin is the minimum
    /// along each axis and the spacing is the single difference between
    /// consecutive unique coordinates. Points that are not evenly spaced along
    /// some axis are rejected with [`GridError::NonUniformSpacing`].
    pub fn set_points(&mut self, points: &[DVec3]) -> Result<()> {
        let axes = unique_axes(points)?;
        let dims = lattice_dimensions(&axes[0], &axes[1], &axes[2])?;
        let mut spacing = DVec3::ONE;
        let mut origin = DVec3::ZERO;
        for (a, coords) in axes.iter().enumerate() {
            spacing[a] = uniform_spacing(coords, a)?;
            origin[a] = coords.first().copied().unwrap_or(0.0);
        }
        self.dimensions = dims;
        self.spacing = spacing;
        self.origin = origin;
        self.drop_stale_arrays();
        Ok(())
    }

    /// Casts to a [`RectilinearGrid`] with the same node positions.
    ///
    /// Point, cell and field data and metadata are copied. Axes with negative
    /// spacing are flipped so the rectilinear coordinates ascend, and the
    /// point and cell arrays are reordered to match. Zero spacing on an axis
    /// with more than one node cannot be represented and is rejected, as are
    /// coordinates that collapse to the same `f64` (a spacing below the
    /// precision of the origin).
    pub fn cast_to_rectilinear_grid(&self) -> Result<RectilinearGrid> {
        let mut flip = [false; 3];
        for (a, flipped) in flip.iter_mut().enumerate() {
            if self.dimensions[a] > 1 {
                if self.spacing[a] == 0.0 {
                    return Err(GridError::InvalidSpacing {
                        axis: a,
                        value: self.spacing[a],
                    });
                }
                *flipped = self.spacing[a] < 0.0;
            }
        }

        let mut grid = RectilinearGrid::from_arrays(
            &self.axis_coordinates(0),
            &self.axis_coordinates(1),
            &self.axis_coordinates(2),
        )?;
        if grid.dimensions() != self.dimensions {
            return Err(GridError::DimensionMismatch {
                expected: self.dimensions.to_array(),
                actual: grid.dimensions().to_array(),
            });
        }

        let cell_dims = cell_lattice(self.dimensions);
        for array in &self.point_data {
            grid.add_point_array(reorder(array, self.dimensions, flip))?;
        }
        for array in &self.cell_data {
            grid.add_cell_array(reorder(array, cell_dims, flip))?;
        }
        grid.field_data_mut().update(&self.field_data);
        grid.copy_meta_from(self);
        log::debug!(
            "cast uniform grid to rectilinear grid {:?}",
            grid.dimensions().to_array()
        );
        Ok(grid)
    }

    /// Casts to a [`StructuredGrid`] with explicit points.
    ///
    /// Point, cell and field data and metadata are copied.
    pub fn cast_to_structured_grid(&self) -> StructuredGrid {
        let mut grid = StructuredGrid::from_lattice(self.dimensions, self.points());
        *grid.point_data_mut() = self.point_data.clone();
        *grid.cell_data_mut() = self.cell_data.clone();
        *grid.field_data_mut() = self.field_data.clone();
        grid.copy_meta_from(self);
        grid
    }

    /// Re-establishes the grid invariants after deserialization.
    pub(crate) fn validated(mut self) -> Result<Self> {
        check_dimensions(self.dimensions)?;
        check_spacing(self.spacing)?;
        check_origin(self.origin)?;
        self.drop_stale_arrays();
        Ok(self)
    }
}

fn check_spacing(spacing: DVec3) -> Result<()> {
    for axis in 0..3 {
        if !spacing[axis].is_finite() {
            return Err(GridError::InvalidSpacing {
                axis,
                value: spacing[axis],
            });
        }
    }
    Ok(())
}

fn check_origin(origin: DVec3) -> Result<()> {
    for axis in 0..3 {
        if !origin[axis].is_finite() {
            return Err(GridError::NonFiniteCoordinate {
                axis,
                value: origin[axis],
            });
        }
    }
    Ok(())
}

/// The lattice cell arrays are laid out on: one entry per cell along each
/// axis, collapsed axes counting once.
fn cell_lattice(dims: UVec3) -> UVec3 {
    if dims.min_element() == 0 {
        return UVec3::ZERO;
    }
    dims.saturating_sub(UVec3::ONE).max(UVec3::ONE)
}

/// Reorders the tuples of an array laid out on `lattice`, reversing the
/// flagged axes.
fn reorder(array: &DataArray, lattice: UVec3, flip: [bool; 3]) -> DataArray {
    if !flip.contains(&true) || array.n_tuples() != n_points_for_dimensions(lattice) {
        return array.clone();
    }
    let [nx, ny, nz] = lattice.to_array().map(|n| n as usize);
    let src = |i: usize, n: usize, axis: usize| if flip[axis] { n - 1 - i } else { i };
    let width = array.n_components();
    let mut values = Vec::with_capacity(array.values().len());
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let idx = src(i, nx, 0) + src(j, ny, 1) * nx + src(k, nz, 2) * nx * ny;
                values.extend_from_slice(&array.values()[idx * width..(idx + 1) * width]);
            }
        }
    }
    DataArray::new(array.name(), width, values).unwrap_or_else(|_| array.clone())
}

impl DataSet for UniformGrid {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "UniformGrid"
    }

    fn n_points(&self) -> usize {
        n_points_for_dimensions(self.dimensions)
    }

    fn n_cells(&self) -> usize {
        n_cells_for_dimensions(self.dimensions)
    }

    fn points(&self) -> Vec<DVec3> {
        let x = self.axis_coordinates(0);
        let y = self.axis_coordinates(1);
        let z = self.axis_coordinates(2);
        crate::coords::meshgrid_points(&x, &y, &z)
    }

    fn bounds(&self) -> Option<(DVec3, DVec3)> {
        if self.dimensions.min_element() == 0 {
            return None;
        }
        let far = self.origin + (self.dimensions - UVec3::ONE).as_dvec3() * self.spacing;
        Some((self.origin.min(far), self.origin.max(far)))
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
        let mut rows = grid_attributes(self);
        let s = self.spacing;
        rows.push((
            "Spacing",
            format!(
                "{}, {}, {}",
                format_float(s.x),
                format_float(s.y),
                format_float(s.z)
            ),
        ));
        rows
    }
}

impl Grid for UniformGrid {
    fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    /// Resizes the lattice. Point and cell arrays that no longer fit are
    /// dropped.
    fn set_dimensions(&mut self, dims: UVec3) -> Result<()> {
        check_dimensions(dims)?;
        self.dimensions = dims;
        self.drop_stale_arrays();
        Ok(())
    }
}

impl fmt::Display for UniformGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_summary(self.type_name(), &self.attributes()))
    }
}
