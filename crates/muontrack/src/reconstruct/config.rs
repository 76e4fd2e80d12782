use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::DriftCalibration;
use crate::error::InputError;
use crate::line_fit::LineFitConfig;
use crate::spherical::SphericalConfig;

/// Lowest accepted `min_total_hits`.
pub const MIN_TOTAL_HITS: usize = 4;
/// Lowest accepted `min_chamber_hits`; also keeps every chamber fit
/// above the two-circle underdetermined case.
pub const MIN_CHAMBER_HITS: usize = 3;

/// Top-level reconstruction configuration.
///
/// Read-only during reconstruction; share one instance across workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Drift-radius calibration coefficients.
    pub calibration: DriftCalibration,
    /// Tangent-line fit parameters.
    pub line_fit: LineFitConfig,
    /// Projection-angle combination parameters.
    pub spherical: SphericalConfig,
    /// Minimum hits over both chambers.
    pub min_total_hits: usize,
    /// Minimum hits in each chamber.
    pub min_chamber_hits: usize,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            calibration: DriftCalibration::default(),
            line_fit: LineFitConfig::default(),
            spherical: SphericalConfig::default(),
            min_total_hits: MIN_TOTAL_HITS,
            min_chamber_hits: MIN_CHAMBER_HITS,
        }
    }
}

impl ReconstructConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.calibration.validate()?;
        self.line_fit.validate()?;
        if !(self.spherical.min_abs_angle.is_finite() && self.spherical.min_abs_angle > 0.0) {
            return Err(InputError::InvalidConfig {
                field: "spherical.min_abs_angle",
                reason: format!(
                    "must be finite and positive, got {}",
                    self.spherical.min_abs_angle
                ),
            });
        }
        if self.min_total_hits < MIN_TOTAL_HITS {
            return Err(InputError::InvalidConfig {
                field: "min_total_hits",
                reason: format!(
                    "must be at least {}, got {}",
                    MIN_TOTAL_HITS, self.min_total_hits
                ),
            });
        }
        if self.min_chamber_hits < MIN_CHAMBER_HITS {
            return Err(InputError::InvalidConfig {
                field: "min_chamber_hits",
                reason: format!(
                    "must be at least {}, got {}",
                    MIN_CHAMBER_HITS, self.min_chamber_hits
                ),
            });
        }
        Ok(())
    }
}
