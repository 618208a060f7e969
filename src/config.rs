use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::antenna::{
    Antenna, AntennaError, AntennaOrientation, FixedAntenna, SerialAntenna, SimulatedAntenna,
};
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::predict::{GroundStation, PredictError, Tle, TleError};
use crate::tracker::{
    TrackerSettings, DEFAULT_CORRECTION_STEPS, DEFAULT_CYCLE_PERIOD, DEFAULT_STEP_INTERVAL,
    PRECISION_DEG,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid station coordinates: {0:?}")]
    Coordinates(String),
    #[error("satellite needs exactly one of `tle` or `tle_file`")]
    TleSource,
    #[error("cannot read {}: {source}", .path.display())]
    TleFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid tle: {0}")]
    Tle(#[from] TleError),
    #[error("{0}")]
    Predict(#[from] PredictError),
    #[error("invalid tracker settings: {0}")]
    Tracker(String),
    #[error("{0}")]
    Antenna(#[from] AntennaError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    pub satellite: SatelliteConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    pub antenna: AntennaConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
    /// East positive. Converts the rotor's magnetic heading to true azimuth.
    #[serde(default)]
    pub magnetic_declination_deg: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub tle: Option<String>,
    pub tle_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(
        default = "default_cycle_period",
        deserialize_with = "deserialize_duration"
    )]
    pub cycle_period: Duration,
    #[serde(default = "default_correction_steps")]
    pub correction_steps: u32,
    #[serde(
        default = "default_step_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub step_interval: Duration,
    #[serde(default = "default_precision_deg")]
    pub precision_deg: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            cycle_period: default_cycle_period(),
            correction_steps: default_correction_steps(),
            step_interval: default_step_interval(),
            precision_deg: default_precision_deg(),
        }
    }
}

fn default_cycle_period() -> Duration {
    DEFAULT_CYCLE_PERIOD
}

fn default_correction_steps() -> u32 {
    DEFAULT_CORRECTION_STEPS
}

fn default_step_interval() -> Duration {
    DEFAULT_STEP_INTERVAL
}

fn default_precision_deg() -> f64 {
    PRECISION_DEG
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AntennaConfig {
    /// Always reports the same orientation; nudges are only logged.
    Fixed {
        azimuth_deg: f64,
        elevation_deg: f64,
    },
    Simulated {
        azimuth_deg: f64,
        elevation_deg: f64,
        #[serde(default = "default_step_deg")]
        step_deg: f64,
    },
    Serial {
        port: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: u32,
        #[serde(
            default = "default_serial_timeout",
            deserialize_with = "deserialize_duration"
        )]
        timeout: Duration,
    },
}

fn default_step_deg() -> f64 {
    0.5
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_serial_timeout() -> Duration {
    Duration::from_millis(500)
}

impl AntennaConfig {
    pub fn open(&self) -> Result<Box<dyn Antenna>, AntennaError> {
        let antenna: Box<dyn Antenna> = match self {
            AntennaConfig::Fixed {
                azimuth_deg,
                elevation_deg,
            } => Box::new(FixedAntenna::new(AntennaOrientation::new(
                *azimuth_deg,
                *elevation_deg,
            ))),
            AntennaConfig::Simulated {
                azimuth_deg,
                elevation_deg,
                step_deg,
            } => Box::new(SimulatedAntenna::new(
                AntennaOrientation::new(*azimuth_deg, *elevation_deg),
                *step_deg,
            )),
            AntennaConfig::Serial {
                port,
                baud_rate,
                timeout,
            } => Box::new(SerialAntenna::open(port, *baud_rate, *timeout)?),
        };
        Ok(antenna)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockConfig {
    /// Freezes time, for replaying a known pass.
    pub fixed: Option<DateTime<Utc>>,
}

impl ClockConfig {
    pub fn build(&self) -> Box<dyn Clock> {
        match self.fixed {
            Some(at) => Box::new(FixedClock(at)),
            None => Box::new(SystemClock),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn ground_station(&self) -> Result<GroundStation, ConfigError> {
        GroundStation::from_coordinates(&self.station.coordinates, Some(self.station.altitude_m))
            .ok_or_else(|| ConfigError::Coordinates(self.station.coordinates.clone()))
    }

    pub fn load_tle(&self) -> Result<Tle, ConfigError> {
        let text = match (&self.satellite.tle, &self.satellite.tle_file) {
            (Some(text), None) => text.clone(),
            (None, Some(path)) => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::TleFile {
                    path: path.clone(),
                    source,
                })?
            }
            _ => return Err(ConfigError::TleSource),
        };
        Ok(Tle::parse(&text)?)
    }

    pub fn tracker_settings(&self) -> Result<TrackerSettings, ConfigError> {
        let t = &self.tracker;
        if t.correction_steps == 0 {
            return Err(ConfigError::Tracker(
                "correction_steps must be at least 1".into(),
            ));
        }
        if t.cycle_period.is_zero() || t.step_interval.is_zero() {
            return Err(ConfigError::Tracker(
                "cycle_period and step_interval must be non-zero".into(),
            ));
        }
        if !t.precision_deg.is_finite() || t.precision_deg <= 0.0 {
            return Err(ConfigError::Tracker(format!(
                "precision_deg must be positive, got {}",
                t.precision_deg
            )));
        }
        if !self.station.magnetic_declination_deg.is_finite() {
            return Err(ConfigError::Tracker(
                "magnetic_declination_deg must be finite".into(),
            ));
        }

        Ok(TrackerSettings {
            cycle_period: t.cycle_period,
            correction_steps: t.correction_steps,
            step_interval: t.step_interval,
            precision_deg: t.precision_deg,
            magnetic_declination_deg: self.station.magnetic_declination_deg,
        })
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
