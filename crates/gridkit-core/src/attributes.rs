//! Attribute arrays attached to datasets.
//!
//! A [`DataArray`] holds named per-tuple values. Every dataset owns three
//! [`AttributeArrays`] collections:
//! - point data, one tuple per grid node
//! - cell data, one tuple per cell
//! - field data, free-form arrays not tied to the geometry

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Where an attribute array lives on a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Association {
    /// One tuple per point.
    Point,
    /// One tuple per cell.
    Cell,
    /// Not tied to the geometry.
    Field,
}

impl std::fmt::Display for Association {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Point => "point",
            Self::Cell => "cell",
            Self::Field => "field",
        };
        f.write_str(s)
    }
}

/// The array currently selected as the dataset's scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveScalars {
    pub association: Association,
    pub name: String,
}

/// A named array of tuples stored flat.
///
/// Deserialization goes through [`DataArray::new`], so a loaded array is
/// never ragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataArray")]
pub struct DataArray {
    name: String,
    n_components: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawDataArray {
    name: String,
    n_components: usize,
    values: Vec<f64>,
}

impl TryFrom<RawDataArray> for DataArray {
    type Error = GridError;

    fn try_from(raw: RawDataArray) -> Result<Self> {
        Self::new(raw.name, raw.n_components, raw.values)
    }
}

impl DataArray {
    /// Creates an array from flat values.
    ///
    /// Returns an error if `values.len()` is not a multiple of `n_components`
    /// or `n_components` is zero.
    pub fn new(name: impl Into<String>, n_components: usize, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if n_components == 0 || values.len() % n_components != 0 {
            return Err(GridError::RaggedArray {
                name,
                n_components,
                len: values.len(),
            });
        }
        Ok(Self {
            name,
            n_components,
            values,
        })
    }

    /// Creates a single-component array.
    pub fn scalars(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            n_components: 1,
            values,
        }
    }

    /// Creates a three-component array from vectors.
    pub fn vectors(name: impl Into<String>, values: &[glam::DVec3]) -> Self {
        Self {
            name: name.into(),
            n_components: 3,
            values: values.iter().flat_map(|v| v.to_array()).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Returns the number of tuples.
    #[must_use]
    pub fn n_tuples(&self) -> usize {
        self.values.len() / self.n_components
    }

    /// Returns the flat values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the flat values for in-place edits; the length is fixed.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Returns the tuple at `index`, if in range.
    #[must_use]
    pub fn tuple(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.n_components)?;
        self.values.get(start..start + self.n_components)
    }

    /// Returns the (min, max) over finite values, `None` if there are none.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for &v in &self.values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min <= max).then_some((min, max))
    }
}

/// An insertion-ordered, name-unique collection of [`DataArray`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeArrays {
    arrays: Vec<DataArray>,
}

impl AttributeArrays {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an array, replacing any array with the same name.
    ///
    /// When `expected_tuples` is given, the array must carry exactly that many
    /// tuples.
    pub fn insert(&mut self, array: DataArray, expected_tuples: Option<usize>) -> Result<()> {
        if let Some(expected) = expected_tuples {
            if array.n_tuples() != expected {
                return Err(GridError::SizeMismatch {
                    expected,
                    actual: array.n_tuples(),
                });
            }
        }
        if let Some(existing) = self.arrays.iter_mut().find(|a| a.name == array.name) {
            *existing = array;
        } else {
            self.arrays.push(array);
        }
        Ok(())
    }

    /// Gets an array by name.
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Gets a mutable array by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        self.arrays.iter_mut().find(|a| a.name == name)
    }

    /// Removes an array by name.
    pub fn remove(&mut self, name: &str) -> Option<DataArray> {
        let idx = self.arrays.iter().position(|a| a.name == name)?;
        Some(self.arrays.remove(idx))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the array names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.arrays.iter().map(DataArray::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataArray> {
        self.arrays.iter()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn clear(&mut self) {
        self.arrays.clear();
    }

    /// Copies every array of `other` into this collection, replacing arrays
    /// with the same name.
    pub fn update(&mut self, other: &AttributeArrays) {
        for array in &other.arrays {
            if let Some(existing) = self.arrays.iter_mut().find(|a| a.name == array.name) {
                existing.clone_from(array);
            } else {
                self.arrays.push(array.clone());
            }
        }
    }

    /// Drops every array whose tuple count differs from `n_tuples`.
    ///
    /// Returns the names of the dropped arrays.
    pub fn retain_tuple_count(&mut self, n_tuples: usize) -> Vec<String> {
        let mut dropped = Vec::new();
        self.arrays.retain(|a| {
            let keep = a.n_tuples() == n_tuples;
            if !keep {
                dropped.push(a.name.clone());
            }
            keep
        });
        dropped
    }
}

impl<'a> IntoIterator for &'a AttributeArrays {
    type Item = &'a DataArray;
    type IntoIter = std::slice::Iter<'a, DataArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.iter()
    }
}
