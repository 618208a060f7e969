mod controller;
mod correction;
mod report;
mod types;

pub use controller::TrackingController;
pub use correction::Visibility;
pub use types::{
    TrackerSettings, DEFAULT_CORRECTION_STEPS, DEFAULT_CYCLE_PERIOD, DEFAULT_STEP_INTERVAL,
    PRECISION_DEG,
};
