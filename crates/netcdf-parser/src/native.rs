//! Native NetCDF access using the netcdf library.
//!
//! `Dataset` is a thin read-only handle over a NetCDF file that knows its
//! own path (for error messages) and reads variables as `f32` arrays with
//! fill values mapped to NaN.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call multiple times; only the first call has an effect.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// A variable read fully into memory.
#[derive(Debug, Clone)]
pub struct VariableData {
    pub name: String,
    /// Values in row-major order, fill values replaced by NaN
    pub data: Vec<f32>,
    /// Length of each dimension
    pub shape: Vec<usize>,
    /// Dimension names in the same order as `shape`
    pub dimensions: Vec<String>,
    /// `units` attribute, if present
    pub units: Option<String>,
}

impl VariableData {
    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

/// Read-only NetCDF dataset.
pub struct Dataset {
    path: PathBuf,
    file: netcdf::File,
}

impl Dataset {
    /// Open a dataset, failing with `FileNotFound` when the path does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(NetCdfError::FileNotFound(path.to_path_buf()));
        }

        silence_hdf5_errors();

        let file = netcdf::open(path)?;
        debug!(path = %path.display(), "Opened NetCDF dataset");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a variable exists.
    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Names of all variables, in file order.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    /// Length of a named dimension.
    pub fn dimension_len(&self, name: &str) -> NetCdfResult<usize> {
        self.file
            .dimension(name)
            .map(|d| d.len())
            .ok_or_else(|| NetCdfError::MissingDimension(name.to_string()))
    }

    /// Read a whole variable as f32.
    pub fn read_variable(&self, name: &str) -> NetCdfResult<VariableData> {
        let var = self.variable(name)?;

        let dims = var.dimensions();
        let shape: Vec<usize> = dims.iter().map(|d| d.len()).collect();
        let dimensions: Vec<String> = dims.iter().map(|d| d.name()).collect();

        let mut data: Vec<f32> = var.get_values(..)?;

        let fill = get_f64_attr(&var, "_FillValue").or_else(|| get_f64_attr(&var, "missing_value"));
        if let Some(fill) = fill {
            let fill = fill as f32;
            for v in data.iter_mut().filter(|v| **v == fill) {
                *v = f32::NAN;
            }
        }

        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(NetCdfError::ShapeMismatch {
                name: name.to_string(),
                expected: format!("{} values", expected),
                found: vec![data.len()],
            });
        }

        debug!(variable = name, shape = ?shape, "Read variable");

        Ok(VariableData {
            name: name.to_string(),
            data,
            shape,
            dimensions,
            units: get_string_attr(&var, "units"),
        })
    }

    /// Read a 1-D variable as f64 (coordinates).
    pub fn read_coordinate(&self, name: &str) -> NetCdfResult<Vec<f64>> {
        let var = self.variable(name)?;
        if var.dimensions().len() != 1 {
            return Err(NetCdfError::ShapeMismatch {
                name: name.to_string(),
                expected: "1 dimension".to_string(),
                found: var.dimensions().iter().map(|d| d.len()).collect(),
            });
        }
        Ok(var.get_values(..)?)
    }

    /// Read an integer variable (mesh connectivity).
    pub fn read_i32(&self, name: &str) -> NetCdfResult<(Vec<i32>, Vec<usize>)> {
        let var = self.variable(name)?;
        let shape = var.dimensions().iter().map(|d| d.len()).collect();
        Ok((var.get_values(..)?, shape))
    }

    fn variable(&self, name: &str) -> NetCdfResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| NetCdfError::MissingVariable {
                name: name.to_string(),
                file: self.path.clone(),
            })
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get string attribute.
fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let err = Dataset::open("/definitely/not/here.nc").err().unwrap();
        assert!(matches!(err, NetCdfError::FileNotFound(_)));
    }

    #[test]
    fn test_silence_is_idempotent() {
        silence_hdf5_errors();
        silence_hdf5_errors();
    }
}
