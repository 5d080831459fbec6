//! Dataset and grid traits.
//!
//! A [`DataSet`] is anything with points and attribute arrays. A [`Grid`] is a
//! topologically regular dataset whose points are laid out on an
//! `nx * ny * nz` lattice, x varying fastest.

use std::any::Any;
use std::fmt::Write as _;

use glam::{DVec3, UVec3};

use crate::attributes::{ActiveScalars, Association, AttributeArrays, DataArray};
use crate::error::{GridError, Result};
use crate::state::format_float;

/// A dataset with geometry and attached attribute arrays.
pub trait DataSet: Any + Send + Sync {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the type name of this dataset (e.g., "`UniformGrid`").
    fn type_name(&self) -> &'static str;

    /// Returns the number of points.
    fn n_points(&self) -> usize;

    /// Returns the number of cells.
    fn n_cells(&self) -> usize;

    /// Returns every point position, x varying fastest.
    fn points(&self) -> Vec<DVec3>;

    /// Returns the axis-aligned bounding box.
    ///
    /// Returns `None` if the dataset has no points.
    fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let points = self.points();
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    fn point_data(&self) -> &AttributeArrays;
    fn point_data_mut(&mut self) -> &mut AttributeArrays;
    fn cell_data(&self) -> &AttributeArrays;
    fn cell_data_mut(&mut self) -> &mut AttributeArrays;
    fn field_data(&self) -> &AttributeArrays;
    fn field_data_mut(&mut self) -> &mut AttributeArrays;

    /// Returns the active scalars selection, if any.
    fn active_scalars_info(&self) -> Option<&ActiveScalars>;

    /// Replaces the active scalars selection without validation.
    fn set_active_scalars_info(&mut self, info: Option<ActiveScalars>);

    /// Returns the center of the bounding box.
    fn center(&self) -> DVec3 {
        self.bounds()
            .map_or(DVec3::ZERO, |(min, max)| (min + max) * 0.5)
    }

    /// Returns the length of the bounding box diagonal.
    fn length(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| (max - min).length())
    }

    /// Adds a point array; it must carry one tuple per point.
    fn add_point_array(&mut self, array: DataArray) -> Result<()> {
        let n = self.n_points();
        self.point_data_mut().insert(array, Some(n))
    }

    /// Adds a cell array; it must carry one tuple per cell.
    fn add_cell_array(&mut self, array: DataArray) -> Result<()> {
        let n = self.n_cells();
        self.cell_data_mut().insert(array, Some(n))
    }

    /// Adds a field array of any length.
    fn add_field_array(&mut self, array: DataArray) -> Result<()> {
        self.field_data_mut().insert(array, None)
    }

    /// Selects the active scalars by name, searching point data then cell data.
    fn set_active_scalars(&mut self, name: &str) -> Result<()> {
        let association = if self.point_data().contains(name) {
            Association::Point
        } else if self.cell_data().contains(name) {
            Association::Cell
        } else {
            return Err(GridError::ArrayNotFound(name.to_string()));
        };
        self.set_active_scalars_info(Some(ActiveScalars {
            association,
            name: name.to_string(),
        }));
        Ok(())
    }

    /// Returns the active scalars array, if the selection still resolves.
    fn active_scalars(&self) -> Option<&DataArray> {
        let info = self.active_scalars_info()?;
        match info.association {
            Association::Point => self.point_data().get(&info.name),
            Association::Cell => self.cell_data().get(&info.name),
            Association::Field => self.field_data().get(&info.name),
        }
    }

    /// Copies metadata (not geometry or arrays) from another dataset.
    fn copy_meta_from(&mut self, other: &dyn DataSet) {
        self.set_active_scalars_info(other.active_scalars_info().cloned());
    }

    /// Drops point and cell arrays whose tuple counts no longer match the
    /// geometry, and clears the active scalars if they went with them.
    fn drop_stale_arrays(&mut self) {
        let n_points = self.n_points();
        let n_cells = self.n_cells();
        let mut dropped = self.point_data_mut().retain_tuple_count(n_points);
        dropped.extend(self.cell_data_mut().retain_tuple_count(n_cells));
        if dropped.is_empty() {
            return;
        }
        log::warn!(
            "{}: dropped arrays {:?} after geometry change ({} points, {} cells)",
            self.type_name(),
            dropped,
            n_points,
            n_cells
        );
        if self.active_scalars_info().is_some() && self.active_scalars().is_none() {
            self.set_active_scalars_info(None);
        }
    }

    /// Returns the label/value rows shown in the dataset summary.
    fn attributes(&self) -> Vec<(&'static str, String)> {
        base_attributes(self)
    }
}

/// A dataset whose points lie on a regular `nx * ny * nz` lattice.
pub trait Grid: DataSet {
    /// Returns the number of nodes along each axis.
    fn dimensions(&self) -> UVec3;

    /// Sets the number of nodes along each axis.
    fn set_dimensions(&mut self, dims: UVec3) -> Result<()>;

    /// Returns the number of cells along each axis.
    fn cell_dimensions(&self) -> UVec3 {
        self.dimensions().saturating_sub(UVec3::ONE)
    }

    /// Flattens a 3D node index to a linear index.
    ///
    /// Returns `None` if the index is out of range.
    fn flatten_point_index(&self, i: u32, j: u32, k: u32) -> Option<usize> {
        let dims = self.dimensions();
        if UVec3::new(i, j, k).cmpge(dims).any() {
            return None;
        }
        let (nx, ny) = (dims.x as usize, dims.y as usize);
        (k as usize)
            .checked_mul(ny)?
            .checked_add(j as usize)?
            .checked_mul(nx)?
            .checked_add(i as usize)
    }

    /// Unflattens a linear node index to a 3D index.
    ///
    /// Returns `None` if the index is out of range.
    fn unflatten_point_index(&self, idx: usize) -> Option<UVec3> {
        let dims = self.dimensions();
        if idx >= n_points_for_dimensions(dims) {
            return None;
        }
        let nx = dims.x as usize;
        let ny = dims.y as usize;
        let x = idx % nx;
        let y = (idx / nx) % ny;
        let z = idx / (nx * ny);
        Some(UVec3::new(
            u32::try_from(x).ok()?,
            u32::try_from(y).ok()?,
            u32::try_from(z).ok()?,
        ))
    }
}

/// Summary rows common to every dataset.
pub fn base_attributes<D: DataSet + ?Sized>(ds: &D) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("N Cells", ds.n_cells().to_string()),
        ("N Points", ds.n_points().to_string()),
    ];
    let (min, max) = ds.bounds().unwrap_or((DVec3::ZERO, DVec3::ZERO));
    for (label, axis) in [("X Bounds", 0), ("Y Bounds", 1), ("Z Bounds", 2)] {
        rows.push((
            label,
            format!("{}, {}", format_float(min[axis]), format_float(max[axis])),
        ));
    }
    let n_arrays = ds.point_data().len() + ds.cell_data().len() + ds.field_data().len();
    rows.push(("N Arrays", n_arrays.to_string()));
    rows
}

/// Summary rows for grids: the dataset rows plus the dimensions.
pub fn grid_attributes<G: Grid + ?Sized>(grid: &G) -> Vec<(&'static str, String)> {
    let mut rows = base_attributes(grid);
    let dims = grid.dimensions();
    rows.push(("Dimensions", format!("{}, {}, {}", dims.x, dims.y, dims.z)));
    rows
}

/// Returns the node count of a lattice, or `None` if it overflows `usize`.
#[must_use]
pub fn checked_n_points(dims: UVec3) -> Option<usize> {
    (dims.x as usize)
        .checked_mul(dims.y as usize)?
        .checked_mul(dims.z as usize)
}

/// Checks that a lattice's nodes can be counted and indexed.
///
/// Returns the node count.
pub fn check_dimensions(dims: UVec3) -> Result<usize> {
    checked_n_points(dims).ok_or(GridError::DimensionsTooLarge {
        dims: dims.to_array().map(|d| d as usize),
    })
}

/// Returns the node count of a lattice with the given dimensions.
///
/// Saturates at `usize::MAX`; grids reject such dimensions up front with
/// [`check_dimensions`].
#[must_use]
pub fn n_points_for_dimensions(dims: UVec3) -> usize {
    checked_n_points(dims).unwrap_or(usize::MAX)
}

/// Returns the cell count of a lattice with the given dimensions.
///
/// Axes with a single node do not contribute, so a 1x1x1 lattice is a single
/// vertex cell and an `n x m x 1` lattice is a sheet of quads.
#[must_use]
pub fn n_cells_for_dimensions(dims: UVec3) -> usize {
    if dims.min_element() == 0 {
        return 0;
    }
    dims.to_array()
        .iter()
        .filter(|&&d| d > 1)
        .try_fold(1_usize, |acc, &d| acc.checked_mul((d - 1) as usize))
        .unwrap_or(usize::MAX)
}

/// Renders the summary table printed by the grids' `Display` impls.
pub fn write_summary(type_name: &str, rows: &[(&'static str, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 2;
    let mut out = String::from(type_name);
    for (label, value) in rows {
        let _ = write!(out, "\n  {:<width$}{value}", format!("{label}:"));
    }
    out
}
