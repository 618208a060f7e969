mod error;
mod ground_station;
mod oracle;
mod tle;
mod transforms;
mod types;

pub use error::{PredictError, TleError};
pub use ground_station::GroundStation;
pub use oracle::{Ephemeris, PositionOracle};
pub use tle::Tle;
pub use types::{GroundPosition, LookAngle, Observation};
