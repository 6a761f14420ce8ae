// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling seam between a picker and its host.
//!
//! The picker never sleeps or spawns. When it needs another animation step
//! it asks its [`AnimationDriver`] to call
//! [`WheelPicker::on_frame`](crate::WheelPicker::on_frame) after a delay;
//! the host decides what "after a delay" means (a vsync callback, a timer,
//! a test loop).

/// Arms and disarms the single pending frame callback of a picker.
pub trait AnimationDriver {
    /// Requests a frame callback `delay_ms` from now, replacing any pending one.
    fn schedule(&mut self, delay_ms: u64);

    /// Drops the pending frame callback, if any.
    fn cancel(&mut self);
}

/// Driver that only records the request; the host polls it.
///
/// Useful for hosts with their own frame loop and for tests:
///
/// ```
/// use understory_wheel::{AnimationDriver, ManualDriver};
///
/// let mut driver = ManualDriver::default();
/// driver.schedule(16);
/// assert_eq!(driver.take(), Some(16));
/// assert_eq!(driver.pending(), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualDriver {
    pending: Option<u64>,
}

impl ManualDriver {
    /// Delay of the pending callback.
    #[must_use]
    pub const fn pending(&self) -> Option<u64> {
        self.pending
    }

    /// Returns and clears the pending callback.
    pub fn take(&mut self) -> Option<u64> {
        self.pending.take()
    }
}

impl AnimationDriver for ManualDriver {
    fn schedule(&mut self, delay_ms: u64) {
        self.pending = Some(delay_ms);
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<D: AnimationDriver + ?Sized> AnimationDriver for &mut D {
    fn schedule(&mut self, delay_ms: u64) {
        (**self).schedule(delay_ms);
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }
}
