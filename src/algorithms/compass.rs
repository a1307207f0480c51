//! Tilt-compensated compass heading
//!
//! Combines an accelerometer (gravity) vector and a magnetometer vector, both
//! expressed in the phone's device frame (x to the right of the screen, y
//! towards the top edge, z out of the screen), into the azimuth of the
//! device's y axis. The east and north directions are rebuilt with cross
//! products so the result holds while the phone is tilted.

use crate::algorithms::geodesy::normalize_bearing;
use nalgebra::Vector3;

/// Gravity readings weaker than this are treated as free fall (m/s²)
const MIN_GRAVITY: f64 = 0.1;

/// Minimum norm of `mag × accel` before the east vector is trusted; smaller
/// values mean the field is nearly parallel to gravity
const MIN_EAST_NORM: f64 = 0.1;

/// Magnetic azimuth of the device's y axis in degrees, [0, 360).
///
/// Returns `None` when either reading is non-finite, the device is in free
/// fall, or the magnetic field is parallel to gravity.
pub fn tilt_compensated_heading(accel: &Vector3<f64>, mag: &Vector3<f64>) -> Option<f64> {
    if !accel.iter().chain(mag.iter()).all(|v| v.is_finite()) {
        return None;
    }

    let gravity_norm = accel.norm();
    if gravity_norm < MIN_GRAVITY {
        return None;
    }

    let east = mag.cross(accel);
    let east_norm = east.norm();
    if east_norm < MIN_EAST_NORM {
        return None;
    }

    let east = east / east_norm;
    let up = accel.normalize();
    let north = up.cross(&east);

    Some(normalize_bearing(east.y.atan2(north.y).to_degrees()))
}

/// Compass with a fixed magnetic declination
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Compass {
    /// Degrees east of true north that magnetic north lies
    declination_deg: f64,
}

impl Compass {
    pub fn new(declination_deg: f64) -> Self {
        Self { declination_deg }
    }

    pub fn declination(&self) -> f64 {
        self.declination_deg
    }

    /// True heading in degrees, [0, 360)
    pub fn heading(&self, accel: &Vector3<f64>, mag: &Vector3<f64>) -> Option<f64> {
        tilt_compensated_heading(accel, mag)
            .map(|magnetic| normalize_bearing(magnetic + self.declination_deg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Rotation3;

    const G: f64 = 9.81;

    // Flat, face up, top edge towards magnetic north. Field dips downwards.
    fn flat_north() -> (Vector3<f64>, Vector3<f64>) {
        (Vector3::new(0.0, 0.0, G), Vector3::new(0.0, 20.0, -40.0))
    }

    #[test]
    fn test_flat_pointing_north() {
        let (accel, mag) = flat_north();
        let heading = tilt_compensated_heading(&accel, &mag).unwrap();
        assert_abs_diff_eq!(heading, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_pointing_east() {
        // Top edge east means magnetic north lies along -x
        let accel = Vector3::new(0.0, 0.0, G);
        let mag = Vector3::new(-20.0, 0.0, -40.0);
        let heading = tilt_compensated_heading(&accel, &mag).unwrap();
        assert_abs_diff_eq!(heading, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_pointing_south_west() {
        let accel = Vector3::new(0.0, 0.0, G);
        // North is 225° clockwise from the top edge
        let angle = 225f64.to_radians();
        let mag = Vector3::new(20.0 * angle.sin(), 20.0 * angle.cos(), -40.0);
        let heading = tilt_compensated_heading(&accel, &mag).unwrap();
        assert_abs_diff_eq!(heading, 135.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pitched_device_still_reads_north() {
        let (accel, mag) = flat_north();
        // Tilt the top edge up by ~30° around the device x axis
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), 0.5);
        let body = tilt.inverse();
        let heading = tilt_compensated_heading(&(body * accel), &(body * mag)).unwrap();
        // Rounding may land just either side of north
        let off_north = heading.min(360.0 - heading);
        assert_abs_diff_eq!(off_north, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_readings() {
        let mag = Vector3::new(0.0, 20.0, -40.0);
        assert!(tilt_compensated_heading(&Vector3::zeros(), &mag).is_none());

        // Field straight along gravity
        let accel = Vector3::new(0.0, 0.0, G);
        assert!(tilt_compensated_heading(&accel, &Vector3::new(0.0, 0.0, -40.0)).is_none());

        let nan = Vector3::new(f64::NAN, 0.0, G);
        assert!(tilt_compensated_heading(&nan, &mag).is_none());
    }

    #[test]
    fn test_declination_is_applied_and_wrapped() {
        let (accel, mag) = flat_north();
        let compass = Compass::new(-12.0);
        assert_abs_diff_eq!(compass.heading(&accel, &mag).unwrap(), 348.0, epsilon = 1e-9);
        assert_eq!(compass.declination(), -12.0);

        let compass = Compass::default();
        assert_abs_diff_eq!(compass.heading(&accel, &mag).unwrap(), 0.0, epsilon = 1e-9);
    }
}
