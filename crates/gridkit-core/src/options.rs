//! Configuration options for gridkit.

use serde::{Deserialize, Serialize};

/// Global configuration options for gridkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Digits after the decimal point when printing floating values.
    pub float_precision: usize,

    /// Whether floating values are printed in scientific notation.
    pub scientific: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            float_precision: 3,
            scientific: true,
        }
    }
}

impl Options {
    /// Formats a floating value according to these options.
    #[must_use]
    pub fn format_float(&self, value: f64) -> String {
        if self.scientific {
            format!("{value:.prec$e}", prec = self.float_precision)
        } else {
            format!("{value:.prec$}", prec = self.float_precision)
        }
    }
}
