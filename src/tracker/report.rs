use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::antenna::{AntennaOrientation, Direction};
use crate::predict::{GroundPosition, LookAngle};
use crate::tracker::correction::AngularError;

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: CycleOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CycleOutcome {
    BelowHorizon {
        target: LookAngle,
    },
    ElevationAnomaly {
        target: LookAngle,
    },
    PropagationFailed {
        message: String,
    },
    Tracking {
        target: LookAngle,
        ground: GroundPosition,
        steps: Vec<CorrectionStep>,
    },
    Stopped,
}

impl CycleOutcome {
    pub fn nudges(&self) -> usize {
        match self {
            CycleOutcome::Tracking { steps, .. } => steps.iter().map(|s| s.issued.len()).sum(),
            _ => 0,
        }
    }
}

/// One correction sub-iteration. `actual` is `None` when the rotor could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionStep {
    pub actual: Option<AntennaOrientation>,
    pub error: Option<AngularError>,
    pub issued: Vec<Direction>,
}

impl CorrectionStep {
    pub fn unavailable() -> Self {
        Self {
            actual: None,
            error: None,
            issued: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_state_tag() {
        let report = CycleReport {
            timestamp: Utc.with_ymd_and_hms(2016, 9, 18, 15, 50, 0).unwrap(),
            outcome: CycleOutcome::BelowHorizon {
                target: LookAngle::new(12.5, -3.0),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"], "below_horizon");
        assert_eq!(json["timestamp"], "2016-09-18T15:50:00Z");
        assert_eq!(json["target"]["elevation_deg"], -3.0);
    }

    #[test]
    fn counts_issued_nudges() {
        let outcome = CycleOutcome::Tracking {
            target: LookAngle::new(160.0, 10.0),
            ground: GroundPosition {
                latitude_deg: 0.0,
                longitude_deg: 0.0,
                altitude_km: 700.0,
            },
            steps: vec![
                CorrectionStep {
                    actual: Some(AntennaOrientation::new(165.0, 5.0)),
                    error: Some(AngularError {
                        azimuth_deg: 5.0,
                        elevation_deg: -5.0,
                    }),
                    issued: vec![Direction::Left, Direction::Up],
                },
                CorrectionStep::unavailable(),
            ],
        };
        assert_eq!(outcome.nudges(), 2);
        assert_eq!(CycleOutcome::Stopped.nudges(), 0);
    }
}
