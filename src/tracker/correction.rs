use serde::Serialize;

use crate::antenna::{AntennaOrientation, Direction};
use crate::predict::LookAngle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    BelowHorizon,
    AboveZenith,
    Visible,
}

impl Visibility {
    pub fn classify(elevation_deg: f64) -> Self {
        if elevation_deg < 0.0 {
            Visibility::BelowHorizon
        } else if elevation_deg <= 90.0 {
            Visibility::Visible
        } else {
            // also catches NaN
            Visibility::AboveZenith
        }
    }
}

/// Actual minus target, per axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngularError {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl AngularError {
    pub fn between(actual: AntennaOrientation, target: LookAngle) -> Self {
        Self {
            azimuth_deg: actual.azimuth_deg - target.azimuth_deg,
            elevation_deg: actual.elevation_deg - target.elevation_deg,
        }
    }
}

/// At most one step per axis. A negative error means the rotor is short of the target
/// and has to increase that axis (right, up); a positive one means it overshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Correction {
    pub azimuth: Option<Direction>,
    pub elevation: Option<Direction>,
}

impl Correction {
    pub fn for_error(error: AngularError, precision_deg: f64) -> Self {
        let azimuth = (error.azimuth_deg.abs() > precision_deg).then(|| {
            if error.azimuth_deg < 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        });
        let elevation = (error.elevation_deg.abs() > precision_deg).then(|| {
            if error.elevation_deg < 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }
        });
        Self { azimuth, elevation }
    }

    pub fn is_empty(&self) -> bool {
        self.azimuth.is_none() && self.elevation.is_none()
    }

    /// Azimuth first, then elevation.
    pub fn directions(&self) -> impl Iterator<Item = Direction> {
        self.azimuth.into_iter().chain(self.elevation)
    }
}
