use std::time::Duration;

/// Largest per-axis pointing error tolerated without a correction, in degrees.
pub const PRECISION_DEG: f64 = 1.0;
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_CORRECTION_STEPS: u32 = 10;
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    /// Wait before the next attempt when the satellite is not trackable.
    pub cycle_period: Duration,
    /// Correction sub-iterations per cycle before the target is recomputed.
    pub correction_steps: u32,
    pub step_interval: Duration,
    pub precision_deg: f64,
    /// Added to the rotor's magnetic azimuth to get true azimuth. East positive.
    pub magnetic_declination_deg: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            cycle_period: DEFAULT_CYCLE_PERIOD,
            correction_steps: DEFAULT_CORRECTION_STEPS,
            step_interval: DEFAULT_STEP_INTERVAL,
            precision_deg: PRECISION_DEG,
            magnetic_declination_deg: 0.0,
        }
    }
}
