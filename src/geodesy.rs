use serde::{Deserialize, Serialize};

use crate::data::model::Coordinates;

// ---------------------------------------------------------------------------
// Earth model constants
// ---------------------------------------------------------------------------

/// Equatorial radius of the reference ellipsoid in kilometers.
pub const EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Polar radius of the reference ellipsoid in kilometers.
pub const POLAR_RADIUS_KM: f64 = 6356.7523;

/// Degrees in one radian, truncated to seven decimals.
///
/// Kept as the published decimal rather than `180 / PI` so distances match
/// previously generated output to the last bit.
pub const DEGREES_PER_RADIAN: f64 = 57.2957795;

// ---------------------------------------------------------------------------
// EarthModel – ellipsoid + angle conversion
// ---------------------------------------------------------------------------

/// Oblate ellipsoid used to turn an angular distance into kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthModel {
    pub equatorial_radius_km: f64,
    pub polar_radius_km: f64,
    pub degrees_per_radian: f64,
}

impl Default for EarthModel {
    fn default() -> Self {
        Self {
            equatorial_radius_km: EQUATORIAL_RADIUS_KM,
            polar_radius_km: POLAR_RADIUS_KM,
            degrees_per_radian: DEGREES_PER_RADIAN,
        }
    }
}

impl EarthModel {
    /// Local radius of the ellipsoid, in kilometers.
    ///
    /// `latitude` goes straight into `cos`/`sin`, so it is read as radians.
    pub fn radius_at_latitude(&self, latitude: f64) -> f64 {
        let req = self.equatorial_radius_km;
        let rpo = self.polar_radius_km;
        let (sin_lat, cos_lat) = latitude.sin_cos();

        let numerator = (req * req * cos_lat).powi(2);
        let denominator = (req * cos_lat).powi(2) + (rpo * sin_lat).powi(2);

        (numerator / denominator).sqrt()
    }

    /// Great-circle distance in kilometers between `point` and `reference`,
    /// both given in degrees.
    ///
    /// Uses the spherical law of cosines with the ellipsoid radius taken at
    /// the reference latitude. The reference latitude is handed to
    /// [`EarthModel::radius_at_latitude`] as-is, without conversion.
    pub fn great_circle_distance(&self, point: Coordinates, reference: Coordinates) -> f64 {
        let lat = point.latitude / self.degrees_per_radian;
        let lon = point.longitude / self.degrees_per_radian;
        let lat_ref = reference.latitude / self.degrees_per_radian;
        let lon_ref = reference.longitude / self.degrees_per_radian;

        let x = lat.sin() * lat_ref.sin();
        let y = lat.cos() * lat_ref.cos() * (lon_ref - lon).cos();

        // x + y can drift just past 1.0 for identical points.
        let central_angle = (x + y).clamp(-1.0, 1.0).acos();

        self.radius_at_latitude(reference.latitude) * central_angle
    }
}

/// [`EarthModel::radius_at_latitude`] on the default ellipsoid.
pub fn radius_at_latitude(latitude: f64) -> f64 {
    EarthModel::default().radius_at_latitude(latitude)
}

/// [`EarthModel::great_circle_distance`] on the default ellipsoid.
pub fn great_circle_distance(point: Coordinates, reference: Coordinates) -> f64 {
    EarthModel::default().great_circle_distance(point, reference)
}
