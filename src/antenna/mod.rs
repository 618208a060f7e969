mod error;
mod fixed;
mod serial;
mod simulated;
mod types;

pub use error::AntennaError;
pub use fixed::FixedAntenna;
pub use serial::SerialAntenna;
pub use simulated::SimulatedAntenna;
pub use types::{AntennaOrientation, Direction};

/// The rotor as seen by the tracking loop: a position sensor and a stepper.
pub trait Antenna {
    /// Current orientation, or `None` when the sensor could not be read.
    fn read_orientation(&mut self) -> Option<AntennaOrientation>;

    /// Fire-and-forget single step; completion is never acknowledged.
    fn nudge(&mut self, direction: Direction);
}

impl<A: Antenna + ?Sized> Antenna for Box<A> {
    fn read_orientation(&mut self) -> Option<AntennaOrientation> {
        (**self).read_orientation()
    }

    fn nudge(&mut self, direction: Direction) {
        (**self).nudge(direction)
    }
}
