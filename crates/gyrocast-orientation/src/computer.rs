use crate::calibration::Calibration;
use crate::rotation::rotation_matrix;
use crate::types::{Entry, RawSample};
use glam::{DMat3, DVec3};

/// Fixed reference vector rotated through the composed matrix.
const REFERENCE_POINT: DVec3 = DVec3::new(0.0, 0.0, 1.0);

/// Turns raw samples into heading/pitch entries, consulting the
/// calibration frames when present.
#[derive(Debug, Default)]
pub struct OrientationComputer {
    calibration: Calibration,
    latest: Option<DMat3>,
}

impl OrientationComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the entry for one raw sample.
    pub fn process(&mut self, sample: &RawSample) -> Entry {
        let rot = rotation_matrix(sample.beta, sample.gamma, sample.alpha);
        self.latest = Some(rot);
        self.calibration.observe_sample(sample);

        let point = match self.calibration.frames() {
            Some((reference, secondary)) => {
                let composite = reference.transpose() * rot * *secondary;
                composite * REFERENCE_POINT
            }
            None => rot * REFERENCE_POINT,
        };

        heading_pitch(point)
    }

    /// Apply a calibration toggle. Sync freezes the reference frame
    /// from the most recently processed sample.
    pub fn set_sync(&mut self, sync: bool) {
        self.calibration.set_sync(sync, self.latest);
    }
}

/// Project the rotated point onto heading and pitch angles in degrees.
///
/// The asin arguments are clamped to [-1, 1] since floating-point
/// rounding can push the ratio a ULP outside the domain. A point with
/// no horizontal component (`c == 0`) leaves both angles undefined and
/// yields a neutral entry.
fn heading_pitch(point: DVec3) -> Entry {
    let c = (point.x * point.x + point.y * point.y).sqrt();
    if c == 0.0 {
        return Entry::new(0.0, 0.0);
    }
    let heading = (point.y / c).clamp(-1.0, 1.0).asin().to_degrees();

    let c2 = (point.x * point.x + point.z * point.z).sqrt();
    let pitch = if c2 == 0.0 {
        0.0
    } else {
        (point.z / c2).clamp(-1.0, 1.0).asin().to_degrees()
    };

    Entry::new(heading, pitch)
}
