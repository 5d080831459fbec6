//! Structured grid: a regular lattice with explicit point positions.

use std::fmt;
use std::path::Path;

use glam::{DVec3, UVec3};
use gridkit_core::{
    check_dimensions, checked_n_points, grid_attributes, n_cells_for_dimensions, write_summary,
    ActiveScalars, AttributeArrays, DataSet, FormatRegistry, Grid, GridError, Result,
};
use serde::{Deserialize, Serialize};

use crate::io::{native_formats, read_grid, write_grid, GridFile, GridRef};

/// A topologically regular grid whose points may sit anywhere.
///
/// This is the target of the `cast_to_structured_grid` conversions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredGrid {
    dimensions: UVec3,
    points: Vec<DVec3>,

    #[serde(default)]
    point_data: AttributeArrays,
    #[serde(default)]
    cell_data: AttributeArrays,
    #[serde(default)]
    field_data: AttributeArrays,
    #[serde(default)]
    active_scalars: Option<ActiveScalars>,
}

impl StructuredGrid {
    /// Creates a grid from its dimensions and points, x varying fastest.
    pub fn new(dims: UVec3, points: Vec<DVec3>) -> Result<Self> {
        let expected = check_dimensions(dims)?;
        if points.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: points.len(),
            });
        }
        Ok(Self::from_lattice(dims, points))
    }

    pub(crate) fn from_lattice(dims: UVec3, points: Vec<DVec3>) -> Self {
        Self {
            dimensions: dims,
            points,
            ..Self::default()
        }
    }

    /// Loads a grid from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::readers().lookup(path)?;
        match read_grid(path)? {
            GridFile::StructuredGrid(grid) => Ok(grid),
            other => Err(GridError::WrongGridKind {
                expected: "StructuredGrid",
                found: other.kind(),
            }),
        }
    }

    /// Writes the grid to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        Self::writers().lookup(path)?;
        write_grid(path, &GridRef::StructuredGrid(self))
    }

    /// Formats this grid type can be read from.
    pub fn readers() -> FormatRegistry {
        native_formats()
    }

    /// Formats this grid type can be written to.
    pub fn writers() -> FormatRegistry {
        native_formats()
    }

    /// Returns the points without copying.
    #[must_use]
    pub fn points_ref(&self) -> &[DVec3] {
        &self.points
    }

    /// Moves the points; the count must stay the same.
    pub fn set_points(&mut self, points: Vec<DVec3>) -> Result<()> {
        if points.len() != self.points.len() {
            return Err(GridError::SizeMismatch {
                expected: self.points.len(),
                actual: points.len(),
            });
        }
        self.points = points;
        Ok(())
    }

    pub(crate) fn validated(self) -> Result<Self> {
        let mut grid = Self::new(self.dimensions, self.points)?;
        grid.point_data = self.point_data;
        grid.cell_data = self.cell_data;
        grid.field_data = self.field_data;
        grid.active_scalars = self.active_scalars;
        grid.drop_stale_arrays();
        Ok(grid)
    }
}

impl DataSet for StructuredGrid {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "StructuredGrid"
    }

    fn n_points(&self) -> usize {
        self.points.len()
    }

    fn n_cells(&self) -> usize {
        n_cells_for_dimensions(self.dimensions)
    }

    fn points(&self) -> Vec<DVec3> {
        self.points.clone()
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

impl Grid for StructuredGrid {
    fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    /// Reshapes the lattice; the point count must not change.
    fn set_dimensions(&mut self, dims: UVec3) -> Result<()> {
        if checked_n_points(dims) != Some(self.points.len()) {
            return Err(GridError::DimensionMismatch {
                expected: self.dimensions.to_array(),
                actual: dims.to_array(),
            });
        }
        self.dimensions = dims;
        self.drop_stale_arrays();
        Ok(())
    }
}

impl fmt::Display for StructuredGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_summary(self.type_name(), &self.attributes()))
    }
}
