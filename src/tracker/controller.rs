use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::antenna::{Antenna, Direction};
use crate::clock::Clock;
use crate::predict::{Ephemeris, LookAngle, Observation};
use crate::tracker::correction::{AngularError, Correction, Visibility};
use crate::tracker::report::{CorrectionStep, CycleOutcome, CycleReport};
use crate::tracker::types::TrackerSettings;

/// Keeps one antenna pointed at one satellite.
///
/// Each cycle asks the ephemeris where the satellite is. When it is below the horizon, or
/// the elevation is not physically meaningful, the controller waits one cycle period.
/// Otherwise it runs `correction_steps` sub-iterations, each reading the rotor and sending
/// at most one step per axis, before recomputing the target.
pub struct TrackingController<E, A, C> {
    ephemeris: E,
    antenna: A,
    clock: C,
    settings: TrackerSettings,
    reports: Option<mpsc::UnboundedSender<CycleReport>>,
}

impl<E: Ephemeris, A: Antenna, C: Clock> TrackingController<E, A, C> {
    pub fn new(ephemeris: E, antenna: A, clock: C, settings: TrackerSettings) -> Self {
        Self {
            ephemeris,
            antenna,
            clock,
            settings,
            reports: None,
        }
    }

    /// Publishes every cycle report on `tx`.
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<CycleReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    /// Runs cycles until `stop_rx` fires or its sender is dropped.
    pub async fn run(&mut self, mut stop_rx: oneshot::Receiver<()>) {
        log::info!(
            "Tracking started (cycle {:?}, {} steps every {:?}, precision {}°)",
            self.settings.cycle_period,
            self.settings.correction_steps,
            self.settings.step_interval,
            self.settings.precision_deg
        );

        loop {
            let report = self.cycle(&mut stop_rx).await;
            let stopped = matches!(report.outcome, CycleOutcome::Stopped);
            log::debug!("Cycle done, {} nudges issued", report.outcome.nudges());
            if let Some(tx) = &self.reports {
                let _ = tx.send(report);
            }
            if stopped {
                break;
            }
        }

        log::info!("Tracking stopped");
    }

    pub async fn cycle(&mut self, stop_rx: &mut oneshot::Receiver<()>) -> CycleReport {
        let now = self.clock.now();

        let outcome = match self.ephemeris.observe(now) {
            Err(e) => {
                log::warn!("No position for {}: {}", now, e);
                let outcome = CycleOutcome::PropagationFailed {
                    message: e.to_string(),
                };
                self.idle(stop_rx, outcome).await
            }
            Ok(observation) => {
                log_observation(&observation);
                let target = observation.look;
                match Visibility::classify(target.elevation_deg) {
                    Visibility::BelowHorizon => {
                        log::info!("Satellite is below horizon");
                        self.idle(stop_rx, CycleOutcome::BelowHorizon { target })
                            .await
                    }
                    Visibility::AboveZenith => {
                        log::warn!(
                            "Satellite elevation {:.2}° is over +90°, ignoring",
                            target.elevation_deg
                        );
                        self.idle(stop_rx, CycleOutcome::ElevationAnomaly { target })
                            .await
                    }
                    Visibility::Visible => self.correct(&observation, stop_rx).await,
                }
            }
        };

        CycleReport {
            timestamp: now,
            outcome,
        }
    }

    async fn idle(
        &self,
        stop_rx: &mut oneshot::Receiver<()>,
        outcome: CycleOutcome,
    ) -> CycleOutcome {
        if sleep_or_stop(self.settings.cycle_period, stop_rx).await {
            CycleOutcome::Stopped
        } else {
            outcome
        }
    }

    async fn correct(
        &mut self,
        observation: &Observation,
        stop_rx: &mut oneshot::Receiver<()>,
    ) -> CycleOutcome {
        let target = observation.look;
        let mut steps = Vec::with_capacity(self.settings.correction_steps as usize);

        for _ in 0..self.settings.correction_steps {
            if stop_requested(stop_rx) {
                return CycleOutcome::Stopped;
            }
            steps.push(self.correction_step(target));
            if sleep_or_stop(self.settings.step_interval, stop_rx).await {
                return CycleOutcome::Stopped;
            }
        }

        CycleOutcome::Tracking {
            target,
            ground: observation.ground,
            steps,
        }
    }

    fn correction_step(&mut self, target: LookAngle) -> CorrectionStep {
        let Some(actual) = self.antenna.read_orientation() else {
            log::debug!("Antenna orientation unavailable, skipping correction");
            return CorrectionStep::unavailable();
        };
        log::debug!(
            "Antenna az {:.2}, el {:.2}",
            actual.azimuth_deg,
            actual.elevation_deg
        );

        // The rotor's end stops live in its magnetic frame, so compare there.
        let target = target.to_magnetic(self.settings.magnetic_declination_deg);
        let error = AngularError::between(actual, target);
        let correction = Correction::for_error(error, self.settings.precision_deg);
        let issued: Vec<Direction> = correction.directions().collect();
        for &direction in &issued {
            self.antenna.nudge(direction);
        }

        if !correction.is_empty() {
            log::info!(
                "Correcting {:?} (error az {:+.2}°, el {:+.2}°)",
                issued,
                error.azimuth_deg,
                error.elevation_deg
            );
        }

        CorrectionStep {
            actual: Some(actual),
            error: Some(error),
            issued,
        }
    }
}

fn log_observation(observation: &Observation) {
    log::info!(
        "Satellite az {:.2}°, el {:.2}°, range {:.1} km, sub-point {:.4}°, {:.4}° at {:.1} km",
        observation.look.azimuth_deg,
        observation.look.elevation_deg,
        observation.range_km,
        observation.ground.latitude_deg,
        observation.ground.longitude_deg,
        observation.ground.altitude_km
    );
}

/// Returns true when the stop signal fired before the sleep elapsed.
async fn sleep_or_stop(duration: Duration, stop_rx: &mut oneshot::Receiver<()>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = &mut *stop_rx => true,
    }
}

fn stop_requested(stop_rx: &mut oneshot::Receiver<()>) -> bool {
    !matches!(
        stop_rx.try_recv(),
        Err(oneshot::error::TryRecvError::Empty)
    )
}
