// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release velocity estimation from recent pointer samples.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use smallvec::SmallVec;

/// Most samples kept for one gesture; older ones are dropped first.
pub const MAX_SAMPLES: usize = 20;

/// One pointer position along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Pointer y in view coordinates.
    pub y: f64,
    /// Event timestamp in milliseconds.
    pub time_ms: u64,
}

impl MotionSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(y: f64, time_ms: u64) -> Self {
        Self { y, time_ms }
    }
}

/// Bounded sample history with a least-squares velocity estimate.
///
/// The velocity is the slope of the line fitted through every sample no
/// older than the horizon, measured back from the newest sample.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: SmallVec<[MotionSample; MAX_SAMPLES]>,
    horizon_ms: u64,
}

impl VelocityTracker {
    /// Creates an empty tracker considering samples up to `horizon_ms` old.
    #[must_use]
    pub fn new(horizon_ms: u64) -> Self {
        Self {
            samples: SmallVec::new(),
            horizon_ms,
        }
    }

    /// Records a sample. A timestamp earlier than the newest sample starts a
    /// fresh history.
    pub fn add(&mut self, sample: MotionSample) {
        if self
            .samples
            .last()
            .is_some_and(|last| sample.time_ms < last.time_ms)
        {
            self.samples.clear();
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push(sample);
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of samples currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Velocity in pixels per second, clamped to `±max_velocity`.
    ///
    /// Returns `0.0` when fewer than two samples fall inside the horizon or
    /// they all share one timestamp.
    #[must_use]
    pub fn velocity(&self, max_velocity: f64) -> f64 {
        let Some(newest) = self.samples.last() else {
            return 0.0;
        };
        let cutoff = newest.time_ms.saturating_sub(self.horizon_ms);
        let recent = || self.samples.iter().filter(move |s| s.time_ms >= cutoff);

        let mut count = 0.0;
        let mut sum_t = 0.0;
        let mut sum_y = 0.0;
        for s in recent() {
            count += 1.0;
            sum_t += seconds_before(newest, s);
            sum_y += s.y;
        }
        if count < 2.0 {
            return 0.0;
        }
        let mean_t = sum_t / count;
        let mean_y = sum_y / count;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for s in recent() {
            let dt = seconds_before(newest, s) - mean_t;
            covariance += dt * (s.y - mean_y);
            variance += dt * dt;
        }
        if variance <= f64::EPSILON {
            return 0.0;
        }
        let max_velocity = max_velocity.abs();
        (covariance / variance).clamp(-max_velocity, max_velocity)
    }
}

/// Signed time of `sample` relative to `newest`, in seconds (non-positive).
fn seconds_before(newest: &MotionSample, sample: &MotionSample) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "gesture-local millisecond spans are far below 2^52"
    )]
    let ms = (newest.time_ms - sample.time_ms) as f64;
    -ms / 1000.0
}
