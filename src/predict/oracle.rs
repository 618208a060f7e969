use chrono::{DateTime, Duration, TimeZone, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::tle::Tle;
use crate::predict::transforms::{
    ecef_to_enu, ecef_to_geodetic, enu_to_azimuth_elevation, teme_to_ecef_position,
};
use crate::predict::types::{GroundPosition, LookAngle, Observation};

/// Something that can tell where the tracked satellite is at a given instant.
pub trait Ephemeris {
    fn observe(&self, timestamp: DateTime<Utc>) -> Result<Observation, PredictError>;
}

/// SGP4 propagation of one element set, viewed from one ground station.
pub struct PositionOracle {
    station: GroundStation,
    elements: Elements,
    constants: Constants,
}

impl PositionOracle {
    pub fn new(station: GroundStation, tle: &Tle) -> Result<Self, PredictError> {
        let elements = tle.elements()?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            station,
            elements,
            constants,
        })
    }

    pub fn station(&self) -> &GroundStation {
        &self.station
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.elements.datetime)
    }

    pub fn epoch_age(&self, now: DateTime<Utc>) -> Duration {
        now - self.epoch()
    }

    pub fn compute_look_angle(
        &self,
        timestamp: DateTime<Utc>,
    ) -> Result<Observation, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self.constants.propagate(minutes)?;

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(
            &timestamp.naive_utc(),
        ));
        let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
        let sta_ecef = self.station.position_ecef_km();

        let dr = [
            sat_ecef[0] - sta_ecef[0],
            sat_ecef[1] - sta_ecef[1],
            sat_ecef[2] - sta_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let enu = ecef_to_enu(dr, self.station.lat_rad(), self.station.lon_rad());
        let (azimuth_deg, elevation_deg) = enu_to_azimuth_elevation(enu);
        if !azimuth_deg.is_finite() || !elevation_deg.is_finite() {
            return Err(PredictError::Propagation(format!(
                "non-finite look angle at {timestamp}"
            )));
        }

        let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(sat_ecef);

        Ok(Observation {
            timestamp,
            look: LookAngle::new(azimuth_deg, elevation_deg),
            ground: GroundPosition {
                latitude_deg,
                longitude_deg,
                altitude_km,
            },
            range_km,
        })
    }
}

impl Ephemeris for PositionOracle {
    fn observe(&self, timestamp: DateTime<Utc>) -> Result<Observation, PredictError> {
        self.compute_look_angle(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::tle::tests::so50;

    fn oracle() -> PositionOracle {
        let station = GroundStation::new(61.1029709, 26.1691147, 100.0);
        PositionOracle::new(station, &so50()).unwrap()
    }

    fn bench_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 9, 18, 15, 50, 0).unwrap()
    }

    #[test]
    fn same_timestamp_same_answer() {
        let oracle = oracle();
        let first = oracle.compute_look_angle(bench_time()).unwrap();
        let second = oracle.compute_look_angle(bench_time()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn look_angle_within_documented_range() {
        let oracle = oracle();
        let obs = oracle.compute_look_angle(bench_time()).unwrap();
        assert!((0.0..360.0).contains(&obs.look.azimuth_deg));
        assert!((-90.0..=90.0).contains(&obs.look.elevation_deg));
        assert!(obs.range_km > 0.0);
    }

    #[test]
    fn ground_track_matches_orbit() {
        let oracle = oracle();
        for minutes in (0..120).step_by(5) {
            let obs = oracle
                .compute_look_angle(bench_time() + Duration::minutes(minutes))
                .unwrap();
            assert!(obs.ground.latitude_deg.abs() < 65.5);
            assert!((-180.0..=180.0).contains(&obs.ground.longitude_deg));
            assert!((550.0..900.0).contains(&obs.ground.altitude_km));
        }
    }

    #[test]
    fn satellite_rises_and_sets_within_a_day() {
        let oracle = oracle();
        let elevations: Vec<f64> = (0..24 * 60)
            .map(|m| {
                oracle
                    .compute_look_angle(bench_time() + Duration::minutes(m))
                    .unwrap()
                    .look
                    .elevation_deg
            })
            .collect();
        assert!(elevations.iter().any(|&e| e > 0.0));
        assert!(elevations.iter().any(|&e| e < 0.0));
    }

    #[test]
    fn epoch_from_elements() {
        let oracle = oracle();
        let epoch = oracle.epoch();
        assert_eq!(epoch.date_naive(), bench_time().date_naive());
        let age = oracle.epoch_age(bench_time());
        assert!(age > Duration::hours(6) && age < Duration::hours(7));
    }

    #[test]
    fn ephemeris_delegates_to_oracle() {
        let oracle = oracle();
        let direct = oracle.compute_look_angle(bench_time()).unwrap();
        let via_trait = Ephemeris::observe(&oracle, bench_time()).unwrap();
        assert_eq!(direct, via_trait);
    }

    #[test]
    fn decayed_orbit_is_a_propagation_error() {
        // SO-50 with an absurd drag term: the orbit falls apart within months.
        let tle = Tle::parse(concat!(
            "1 27607U 02058C   16262.37868737  .00000081  00000-0  50000-0 0  9997\n",
            "2 27607  64.5541 236.1075 0057639 195.9937 163.9347 14.75209607739010\n",
        ))
        .unwrap();
        let station = GroundStation::new(61.1029709, 26.1691147, 100.0);
        let oracle = PositionOracle::new(station, &tle).unwrap();

        for days in [365, 3650] {
            let result = oracle.compute_look_angle(bench_time() + Duration::days(days));
            assert!(
                matches!(result, Err(PredictError::Propagation(_))),
                "expected propagation failure after {days} days, got {result:?}"
            );
        }
    }
}
