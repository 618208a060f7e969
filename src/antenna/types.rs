use serde::Serialize;
use strum_macros::Display;

/// One discrete rotor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Single-byte command understood by the rotor controller.
    pub fn command_byte(self) -> u8 {
        match self {
            Direction::Up => b'u',
            Direction::Down => b'd',
            Direction::Left => b'l',
            Direction::Right => b'r',
        }
    }
}

/// Orientation as reported by the rotor's own sensors, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AntennaOrientation {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl AntennaOrientation {
    pub fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg,
            elevation_deg,
        }
    }
}
