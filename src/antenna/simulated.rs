use crate::antenna::{Antenna, AntennaOrientation, Direction};

const MAX_AZIMUTH_DEG: f64 = 360.0;
const MAX_ELEVATION_DEG: f64 = 90.0;

/// A rotor that moves a fixed angle per step and stops at its end stops.
#[derive(Debug, Clone)]
pub struct SimulatedAntenna {
    orientation: AntennaOrientation,
    step_deg: f64,
}

impl SimulatedAntenna {
    pub fn new(start: AntennaOrientation, step_deg: f64) -> Self {
        Self {
            orientation: start,
            step_deg,
        }
    }

    #[cfg(test)]
    pub fn orientation(&self) -> AntennaOrientation {
        self.orientation
    }
}

impl Antenna for SimulatedAntenna {
    fn read_orientation(&mut self) -> Option<AntennaOrientation> {
        Some(self.orientation)
    }

    fn nudge(&mut self, direction: Direction) {
        let o = &mut self.orientation;
        match direction {
            Direction::Up => o.elevation_deg += self.step_deg,
            Direction::Down => o.elevation_deg -= self.step_deg,
            Direction::Right => o.azimuth_deg += self.step_deg,
            Direction::Left => o.azimuth_deg -= self.step_deg,
        }
        o.azimuth_deg = o.azimuth_deg.clamp(0.0, MAX_AZIMUTH_DEG);
        o.elevation_deg = o.elevation_deg.clamp(0.0, MAX_ELEVATION_DEG);
        log::debug!(
            "Simulated rotor {} -> az {:.2}, el {:.2}",
            direction,
            o.azimuth_deg,
            o.elevation_deg
        );
    }
}
