//! File format registry.
//!
//! Each grid type keeps one registry of the formats it can read and one of the
//! formats it can write, keyed by lower-case file extension.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{GridError, Result};

/// A file format a grid type can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFormat {
    /// Extension without the leading dot, lower-case.
    pub extension: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Registry mapping file extensions to formats.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<&'static str, FileFormat>,
}

impl FormatRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a format.
    ///
    /// Returns an error if the extension is already taken.
    pub fn register(&mut self, format: FileFormat) -> Result<()> {
        if self.formats.contains_key(format.extension) {
            return Err(GridError::FormatExists(format.extension.to_string()));
        }
        self.formats.insert(format.extension, format);
        Ok(())
    }

    /// Builder form of [`register`](Self::register) for static tables.
    #[must_use]
    pub fn with(mut self, extension: &'static str, description: &'static str) -> Self {
        self.formats.insert(
            extension,
            FileFormat {
                extension,
                description,
            },
        );
        self
    }

    /// Resolves the format of a path from its extension.
    pub fn lookup(&self, path: &Path) -> Result<FileFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| GridError::MissingExtension(path.to_path_buf()))?
            .to_ascii_lowercase();
        self.formats
            .get(ext.as_str())
            .copied()
            .ok_or(GridError::UnsupportedFormat(ext))
    }

    /// Checks if a format with the given extension exists.
    pub fn contains(&self, extension: &str) -> bool {
        self.formats.contains_key(extension)
    }

    /// Returns the registered extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
