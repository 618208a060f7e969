use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::transforms::normalize_azimuth;

/// Direction from the observer to the satellite, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookAngle {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl LookAngle {
    pub fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg,
            elevation_deg,
        }
    }

    /// The same direction as a magnetic heading (declination east positive).
    pub fn to_magnetic(self, declination_deg: f64) -> Self {
        Self {
            azimuth_deg: normalize_azimuth(self.azimuth_deg - declination_deg),
            ..self
        }
    }
}

/// Sub-satellite point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub look: LookAngle,
    pub ground: GroundPosition,
    pub range_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnetic_heading_wraps_past_north() {
        let just_east = LookAngle::new(5.0, 12.0).to_magnetic(9.0);
        assert!((just_east.azimuth_deg - 356.0).abs() < 1e-9);
        assert_eq!(just_east.elevation_deg, 12.0);

        let west = LookAngle::new(358.0, 12.0).to_magnetic(-5.0);
        assert!((west.azimuth_deg - 3.0).abs() < 1e-9);
    }
}
