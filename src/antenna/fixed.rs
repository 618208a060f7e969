use crate::antenna::{Antenna, AntennaOrientation, Direction};

/// Bench stand-in for a rotor: always reports the same orientation and only logs the
/// steps it is asked to make.
#[derive(Debug, Clone)]
pub struct FixedAntenna {
    orientation: AntennaOrientation,
}

impl FixedAntenna {
    pub fn new(orientation: AntennaOrientation) -> Self {
        Self { orientation }
    }
}

impl Antenna for FixedAntenna {
    fn read_orientation(&mut self) -> Option<AntennaOrientation> {
        Some(self.orientation)
    }

    fn nudge(&mut self, direction: Direction) {
        log::info!("Movement: {}", direction);
    }
}
