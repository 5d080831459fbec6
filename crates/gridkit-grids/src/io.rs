//! Native file persistence.
//!
//! Grids are stored as pretty-printed JSON tagged with the grid kind:
//!
//! ```json
//! { "kind": "UniformGrid", "dimensions": [2, 2, 2], "spacing": [1.0, 1.0, 1.0], ... }
//! ```
//!
//! Legacy `.vtk` and VTK XML (`.vtr`, `.vti`) files are not read or written;
//! their extensions are reported as unsupported.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use gridkit_core::{DataSet, FormatRegistry, Result};
use serde::{Deserialize, Serialize};

use crate::rectilinear::RectilinearGrid;
use crate::structured::StructuredGrid;
use crate::uniform::UniformGrid;

/// The extension of the native format.
pub const NATIVE_EXTENSION: &str = "json";

/// The formats every grid type reads and writes.
pub fn native_formats() -> FormatRegistry {
    FormatRegistry::new().with(NATIVE_EXTENSION, "gridkit JSON grid")
}

/// A grid of any kind as loaded from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GridFile {
    RectilinearGrid(RectilinearGrid),
    UniformGrid(UniformGrid),
    StructuredGrid(StructuredGrid),
}

impl GridFile {
    /// Returns the grid type name stored in the file.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RectilinearGrid(_) => "RectilinearGrid",
            Self::UniformGrid(_) => "UniformGrid",
            Self::StructuredGrid(_) => "StructuredGrid",
        }
    }

    /// Returns the grid as a dataset.
    pub fn as_dataset(&self) -> &dyn DataSet {
        match self {
            Self::RectilinearGrid(g) => g,
            Self::UniformGrid(g) => g,
            Self::StructuredGrid(g) => g,
        }
    }

    fn validated(self) -> Result<Self> {
        Ok(match self {
            Self::RectilinearGrid(g) => Self::RectilinearGrid(g.validated()?),
            Self::UniformGrid(g) => Self::UniformGrid(g.validated()?),
            Self::StructuredGrid(g) => Self::StructuredGrid(g.validated()?),
        })
    }
}

/// Borrowed counterpart of [`GridFile`] used for writing.
#[derive(Serialize)]
#[serde(tag = "kind")]
pub(crate) enum GridRef<'a> {
    RectilinearGrid(&'a RectilinearGrid),
    UniformGrid(&'a UniformGrid),
    StructuredGrid(&'a StructuredGrid),
}

/// Reads a grid file, whatever kind of grid it holds.
pub fn read_grid(path: &Path) -> Result<GridFile> {
    let reader = BufReader::new(File::open(path)?);
    let grid: GridFile = serde_json::from_reader(reader)?;
    log::debug!("read {} from {}", grid.kind(), path.display());
    grid.validated()
}

pub(crate) fn write_grid(path: &Path, grid: &GridRef<'_>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, grid)?;
    writer.flush()?;
    log::debug!("wrote grid to {}", path.display());
    Ok(())
}
