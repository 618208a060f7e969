use crate::predict::ground_station::{EARTH_ECCENTRICITY_SQ, EARTH_EQUATORIAL_RADIUS_KM};

/// Rotates a TEME position about the z-axis by the Greenwich sidereal angle.
pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Wraps an angle into [0, 360).
pub fn normalize_azimuth(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Azimuth (clockwise from north, [0, 360)) and elevation in degrees of a local ENU vector.
pub fn enu_to_azimuth_elevation(enu: (f64, f64, f64)) -> (f64, f64) {
    let (east, north, up) = enu;
    let range = (east * east + north * north + up * up).sqrt();
    let azimuth = normalize_azimuth(east.atan2(north).to_degrees());
    let elevation = if range > 0.0 {
        (up / range).asin().to_degrees()
    } else {
        0.0
    };
    (azimuth, elevation)
}

/// Geodetic latitude/longitude in degrees and height in km for an ECEF position (WGS-84).
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();
    let longitude = y.atan2(x);

    let mut latitude = z.atan2(p * (1.0 - EARTH_ECCENTRICITY_SQ));
    let mut height = 0.0;
    for _ in 0..10 {
        let sin_lat = latitude.sin();
        let n = EARTH_EQUATORIAL_RADIUS_KM
            / (1.0 - EARTH_ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        height = if latitude.cos().abs() > 1e-12 {
            p / latitude.cos() - n
        } else {
            z.abs() - n * (1.0 - EARTH_ECCENTRICITY_SQ)
        };
        let next = z.atan2(p * (1.0 - EARTH_ECCENTRICITY_SQ * n / (n + height)));
        if (next - latitude).abs() < 1e-12 {
            latitude = next;
            break;
        }
        latitude = next;
    }

    (latitude.to_degrees(), longitude.to_degrees(), height)
}
