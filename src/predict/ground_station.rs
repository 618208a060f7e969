// WGS-84 constants
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
pub const EARTH_ECCENTRICITY_SQ: f64 = 0.00669437999014;

/// Fixed observer the antenna is mounted at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for GroundStation {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }
}

impl GroundStation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Parses `"lat, lon"` in decimal degrees.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self::new(lat, lon, altitude_m.unwrap_or(0.0)))
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = EARTH_EQUATORIAL_RADIUS_KM
            / (1.0 - EARTH_ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - EARTH_ECCENTRICITY_SQ) + alt_km) * sin_lat;
        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_pair() {
        let station =
            GroundStation::from_coordinates("61.1029709, 26.1691147", Some(100.0)).unwrap();
        assert_eq!(station.latitude_deg, 61.1029709);
        assert_eq!(station.longitude_deg, 26.1691147);
        assert_eq!(station.altitude_m, 100.0);
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(GroundStation::from_coordinates("61.1", None).is_none());
        assert!(GroundStation::from_coordinates("north, east", None).is_none());
        assert!(GroundStation::from_coordinates("91.0, 10.0", None).is_none());
        assert!(GroundStation::from_coordinates("1.0, 2.0, 3.0", None).is_none());
    }

    #[test]
    fn equator_station_sits_on_x_axis() {
        let ecef = GroundStation::default().position_ecef_km();
        assert!((ecef[0] - EARTH_EQUATORIAL_RADIUS_KM).abs() < 1e-9);
        assert!(ecef[1].abs() < 1e-9);
        assert!(ecef[2].abs() < 1e-9);
    }
}
