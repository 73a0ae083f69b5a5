use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::{Coordinates, ReferencePoint};
use crate::geodesy::EarthModel;
use crate::pipeline::PipelineError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Latitude of the default reference point (Dublin office).
pub const DEFAULT_REFERENCE_LATITUDE: f64 = 53.339428;

/// Longitude of the default reference point (Dublin office).
pub const DEFAULT_REFERENCE_LONGITUDE: f64 = -6.257664;

/// Default search radius in kilometers.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 100.0;

// ---------------------------------------------------------------------------
// CoordinateRange / CoordinateBounds – per-field validity ranges
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]` a coordinate must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRange {
    pub min: f64,
    pub max: f64,
}

impl CoordinateRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends; NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for CoordinateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Accepted ranges for the two coordinate fields, configured independently.
///
/// The defaults are latitude `[-180, 180]` and longitude `[-90, 90]`, which is
/// the reverse of the geographic convention. Existing customer files were
/// filtered with these ranges, so they are kept as the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateBounds {
    pub latitude: CoordinateRange,
    pub longitude: CoordinateRange,
}

impl Default for CoordinateBounds {
    fn default() -> Self {
        Self {
            latitude: CoordinateRange::new(-180.0, 180.0),
            longitude: CoordinateRange::new(-90.0, 90.0),
        }
    }
}

impl CoordinateBounds {
    /// Latitude `[-90, 90]`, longitude `[-180, 180]`.
    pub fn geographic() -> Self {
        Self {
            latitude: CoordinateRange::new(-90.0, 90.0),
            longitude: CoordinateRange::new(-180.0, 180.0),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Everything a run needs besides its input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Point distances are measured from.
    pub reference: ReferencePoint,
    /// Customers farther than this (km) are dropped. Inclusive.
    pub max_distance_km: f64,
    pub bounds: CoordinateBounds,
    pub earth: EarthModel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference: Coordinates::new(DEFAULT_REFERENCE_LATITUDE, DEFAULT_REFERENCE_LONGITUDE),
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            bounds: CoordinateBounds::default(),
            earth: EarthModel::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Missing keys fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            PipelineError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could make sense of.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.max_distance_km.is_finite() || self.max_distance_km < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "max distance must be a non-negative number of km, got {}",
                self.max_distance_km
            )));
        }
        for (field, value) in [
            ("reference latitude", self.reference.latitude),
            ("reference longitude", self.reference.longitude),
        ] {
            if !value.is_finite() {
                return Err(PipelineError::InvalidConfig(format!("{field} is {value}")));
            }
        }
        for (field, range) in [
            ("latitude", self.bounds.latitude),
            ("longitude", self.bounds.longitude),
        ] {
            if !(range.min <= range.max) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{field} bounds {range} are empty"
                )));
            }
        }
        let earth = &self.earth;
        if !(earth.equatorial_radius_km > 0.0
            && earth.polar_radius_km > 0.0
            && earth.degrees_per_radian > 0.0)
        {
            return Err(PipelineError::InvalidConfig(format!(
                "earth model must be strictly positive, got {earth:?}"
            )));
        }
        Ok(())
    }
}
