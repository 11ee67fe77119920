use crate::rotation::rotation_matrix;
use crate::types::RawSample;
use glam::DMat3;
use std::f64::consts::FRAC_PI_2;

/// Calibration reference frames and the sync state machine.
///
/// Two matrices with very different lifetimes:
/// - `secondary` is computed from the first sample ever seen, with the
///   middle angle pinned to 90°, and is then frozen for the lifetime
///   of the process. Sync toggles never touch it.
/// - `reference` is overwritten on every sync with whatever rotation
///   matrix the pipeline computed last.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    reference: Option<DMat3>,
    secondary: Option<DMat3>,
    calibrated: bool,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the one-time secondary frame. No-op after the first call.
    pub fn observe_sample(&mut self, sample: &RawSample) {
        if self.secondary.is_none() {
            self.secondary = Some(rotation_matrix(sample.beta, FRAC_PI_2, sample.alpha));
        }
    }

    /// Apply a sync toggle. `latest` is the rotation matrix most
    /// recently computed by the pipeline, if any sample has been seen.
    pub fn set_sync(&mut self, sync: bool, latest: Option<DMat3>) {
        if sync {
            match latest {
                Some(rot) => {
                    self.reference = Some(rot);
                    self.calibrated = true;
                    tracing::info!("Synced");
                }
                None => {
                    // No sample processed yet, nothing to freeze.
                    tracing::warn!("Ignoring sync before first sample");
                }
            }
        } else {
            self.calibrated = false;
            tracing::info!("Unsynced");
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Reference and secondary frames, present only while calibrated.
    pub fn frames(&self) -> Option<(&DMat3, &DMat3)> {
        if self.calibrated {
            Some((self.reference.as_ref()?, self.secondary.as_ref()?))
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn secondary(&self) -> Option<&DMat3> {
        self.secondary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(alpha: f64, beta: f64, gamma: f64) -> RawSample {
        RawSample {
            alpha,
            beta,
            gamma,
            ts_delta: 0,
        }
    }

    #[test]
    fn secondary_is_frozen_after_first_sample() {
        let mut cal = Calibration::new();
        cal.observe_sample(&sample(0.2, 0.4, -0.1));
        let first = cal.secondary().copied().unwrap();

        // Later samples and sync toggles must not recompute it.
        cal.observe_sample(&sample(1.0, -1.0, 0.5));
        cal.set_sync(true, Some(rotation_matrix(1.0, -1.0, 0.5)));
        cal.set_sync(false, None);
        cal.set_sync(true, Some(rotation_matrix(0.3, 0.3, 0.3)));

        assert_eq!(
            cal.secondary().copied().unwrap().to_cols_array(),
            first.to_cols_array()
        );
    }

    #[test]
    fn sync_before_any_sample_is_ignored() {
        let mut cal = Calibration::new();
        cal.set_sync(true, None);
        assert!(!cal.is_calibrated());
        assert!(cal.frames().is_none());
    }

    #[test]
    fn unsync_keeps_reference_but_leaves_calibrated_state() {
        let mut cal = Calibration::new();
        let s = sample(0.1, 0.2, 0.3);
        cal.observe_sample(&s);
        let rot = rotation_matrix(s.beta, s.gamma, s.alpha);

        cal.set_sync(true, Some(rot));
        assert!(cal.is_calibrated());
        assert!(cal.frames().is_some());

        cal.set_sync(false, None);
        assert!(!cal.is_calibrated());
        assert!(cal.frames().is_none());

        // Re-sync with a new latest matrix re-enters Calibrated.
        cal.set_sync(true, Some(rot));
        assert!(cal.is_calibrated());
    }
}
