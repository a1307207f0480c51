//! Spherical-earth distance and bearing calculations
//!
//! Pure functions over pairs of [`Fix`] values. Inputs are degrees, outputs are
//! meters and degrees clockwise from true north.

use crate::core::{Cardinal, Fix, EARTH_RADIUS_M};

/// Great-circle distance between two fixes using the Haversine formula
///
/// # Returns
///
/// Distance in meters
pub fn haversine_distance(from: &Fix, to: &Fix) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlon = (delta_lon / 2.0).sin();
    let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial (forward azimuth) bearing when travelling from `from` to `to`
///
/// # Returns
///
/// Bearing in degrees, normalized into [0, 360)
pub fn initial_bearing(from: &Fix, to: &Fix) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_bearing(deg: f64) -> f64 {
    let mut wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    // A tiny negative input lands on exactly 360.0 after the add
    if wrapped >= 360.0 {
        wrapped = 0.0;
    }
    wrapped
}

/// Bearing and label pair for a single leg
pub fn bearing_with_cardinal(from: &Fix, to: &Fix) -> (f64, Cardinal) {
    let bearing = initial_bearing(from, to);
    (bearing, Cardinal::from_bearing(bearing))
}

/// Move `distance_m` along `bearing_deg` from a fix on the sphere.
///
/// Used to synthesize tracks with known geometry; the result keeps the
/// origin's timestamp.
pub fn destination(from: &Fix, bearing_deg: f64, distance_m: f64) -> Fix {
    let angular = distance_m / EARTH_RADIUS_M;
    let bearing = bearing_deg.to_radians();
    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    let mut lon_deg = lon2.to_degrees();
    if lon_deg > 180.0 {
        lon_deg -= 360.0;
    } else if lon_deg < -180.0 {
        lon_deg += 360.0;
    }

    Fix {
        lat: lat2.to_degrees(),
        lon: lon_deg,
        timestamp: from.timestamp,
        altitude: from.altitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Fix::at(35.0, 139.0, 0.0);
        let b = Fix::at(36.0, 139.0, 0.0);
        // ~111.2 km per degree on a 6371 km sphere
        assert_abs_diff_eq!(haversine_distance(&a, &b), 111_195.0, epsilon = 5.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Fix::at(48.8566, 2.3522, 0.0);
        let b = Fix::at(51.5074, -0.1278, 0.0);
        assert_abs_diff_eq!(
            haversine_distance(&a, &b),
            haversine_distance(&b, &a),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(haversine_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_cardinal_bearings() {
        let origin = Fix::at(10.0, 20.0, 0.0);
        let north = Fix::at(11.0, 20.0, 0.0);
        let east = Fix::at(10.0, 21.0, 0.0);
        let south = Fix::at(9.0, 20.0, 0.0);
        let west = Fix::at(10.0, 19.0, 0.0);

        assert_abs_diff_eq!(initial_bearing(&origin, &north), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(initial_bearing(&origin, &east), 90.0, epsilon = 0.1);
        assert_abs_diff_eq!(initial_bearing(&origin, &south), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(initial_bearing(&origin, &west), 270.0, epsilon = 0.1);
    }

    #[test]
    fn test_negative_atan2_is_wrapped() {
        // North-west leg: atan2 is negative before normalization
        let origin = Fix::at(0.0, 0.0, 0.0);
        let nw = Fix::at(0.001, -0.001, 0.0);
        let bearing = initial_bearing(&origin, &nw);
        assert!((0.0..360.0).contains(&bearing));
        assert_abs_diff_eq!(bearing, 315.0, epsilon = 0.01);
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(0.0), 0.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(725.0), 5.0);
        assert_eq!(normalize_bearing(-1e-15), 0.0);
        assert!(normalize_bearing(-1e-15) < 360.0);
    }

    #[test]
    fn test_destination_round_trips_through_distance_and_bearing() {
        let origin = Fix::at(37.7749, -122.4194, 5.0);
        let moved = destination(&origin, 135.0, 250.0);
        assert_abs_diff_eq!(haversine_distance(&origin, &moved), 250.0, epsilon = 1e-6);
        assert_abs_diff_eq!(initial_bearing(&origin, &moved), 135.0, epsilon = 1e-3);
        assert_eq!(moved.timestamp, 5.0);
    }

    #[test]
    fn test_bearing_with_cardinal() {
        let origin = Fix::at(0.0, 0.0, 0.0);
        let (bearing, cardinal) = bearing_with_cardinal(&origin, &destination(&origin, 200.0, 50.0));
        assert_abs_diff_eq!(bearing, 200.0, epsilon = 1e-3);
        assert_eq!(cardinal, Cardinal::S);
    }
}
