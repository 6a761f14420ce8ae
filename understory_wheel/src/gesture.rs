// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press, drag, and tap recognition along the scroll axis.
//!
//! A press starts as a tap candidate. Once the pointer travels further than
//! the touch slop from the down position it becomes a drag and stays one
//! until release, even if the pointer comes back. Drag deltas are whole
//! pixels; the fractional remainder is carried to the next move so that
//! slow drags do not drift.
//!
//! ```
//! use understory_wheel::gesture::{GestureMove, GestureTracker};
//!
//! let mut gesture = GestureTracker::new(8.0);
//! gesture.on_down(100.0, false);
//! assert_eq!(gesture.on_move(104.0), GestureMove::Pending);
//! assert_eq!(gesture.on_move(130.0), GestureMove::Drag { delta: 30, started: true });
//! assert_eq!(gesture.on_move(120.0), GestureMove::Drag { delta: -10, started: false });
//!
//! let release = gesture.on_up().unwrap();
//! assert!(!release.is_tap());
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// State of an active press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Press {
    /// Pointer y at press time.
    pub down_y: f64,
    /// Pointer y the offset has been moved to.
    pub last_y: f64,
    /// True once the slop was exceeded.
    pub dragging: bool,
    /// True if the press stopped a running animation.
    pub interrupted: bool,
}

/// Outcome of a pointer move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMove {
    /// No active press.
    Ignored,
    /// Still within the slop; the offset must not change.
    Pending,
    /// The offset follows the pointer by `delta` pixels.
    Drag {
        /// Whole pixels moved since the previous drag step.
        delta: i32,
        /// True on the move that exceeded the slop.
        started: bool,
    },
}

/// Outcome of a pointer release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Release {
    /// The press became a drag.
    pub dragged: bool,
    /// The press stopped a running animation.
    pub interrupted: bool,
}

impl Release {
    /// A press that neither dragged nor stopped an animation.
    #[must_use]
    pub const fn is_tap(&self) -> bool {
        !self.dragged && !self.interrupted
    }
}

/// Single-pointer gesture state machine.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    press: Option<Press>,
    /// Travel from the down position, in pixels, that turns a press into a drag.
    pub touch_slop: f64,
}

impl GestureTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub const fn new(touch_slop: f64) -> Self {
        Self {
            press: None,
            touch_slop,
        }
    }

    /// Records a press at `y`. A press already in progress is replaced.
    pub fn on_down(&mut self, y: f64, interrupted: bool) {
        self.press = Some(Press {
            down_y: y,
            last_y: y,
            dragging: false,
            interrupted,
        });
    }

    /// Processes a move to `y`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "pointer deltas are screen sized"
    )]
    pub fn on_move(&mut self, y: f64) -> GestureMove {
        let Some(press) = self.press.as_mut() else {
            return GestureMove::Ignored;
        };
        let started = if press.dragging {
            false
        } else if (y - press.down_y).abs() > self.touch_slop {
            press.dragging = true;
            true
        } else {
            return GestureMove::Pending;
        };
        let delta = (y - press.last_y).trunc();
        press.last_y += delta;
        GestureMove::Drag {
            delta: delta as i32,
            started,
        }
    }

    /// Ends the press, if any.
    pub fn on_up(&mut self) -> Option<Release> {
        self.press.take().map(|press| Release {
            dragged: press.dragging,
            interrupted: press.interrupted,
        })
    }

    /// Abandons the press. Returns the press that was dropped.
    pub fn cancel(&mut self) -> Option<Press> {
        self.press.take()
    }

    /// The active press.
    #[must_use]
    pub const fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }

    /// Returns `true` while a press is active.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.press.is_some()
    }
}
