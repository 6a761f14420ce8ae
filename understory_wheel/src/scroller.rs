// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic one-axis scroll simulation.
//!
//! A [`Scroller`] animates an integer offset either along a fixed-duration
//! viscous-fluid curve ([`Scroller::start_scroll`]) or along a decelerating
//! spline derived from a release velocity ([`Scroller::fling`]). Time is
//! supplied by the caller in milliseconds, so the simulation is fully
//! reproducible. An animation's clock starts at the first
//! [`Scroller::compute_offset`] call after it was started.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::MotionConfig;

/// `ln(0.78) / ln(0.9)`: shape of the fling deceleration curve.
const DECELERATION_RATE: f64 = 2.358_201_815_425_944_8;
/// Fraction of the curve spent before the velocity inflexion point.
const INFLEXION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLEXION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLEXION);
const SPLINE_SAMPLES: usize = 100;

const GRAVITY_EARTH: f64 = 9.806_65;
const INCHES_PER_METER: f64 = 39.37;
/// Empirical tuning factor of the physical fling model.
const PHYSICAL_TUNING: f64 = 0.84;

const VISCOUS_FLUID_SCALE: f64 = 8.0;

/// Normalized fling position at `i / SPLINE_SAMPLES` of the fling duration.
static SPLINE_POSITIONS: [f64; SPLINE_SAMPLES + 1] = spline_positions();

const fn spline_positions() -> [f64; SPLINE_SAMPLES + 1] {
    let mut table = [0.0; SPLINE_SAMPLES + 1];
    let mut x_min = 0.0_f64;
    let mut i = 0;
    while i < SPLINE_SAMPLES {
        #[allow(
            clippy::cast_precision_loss,
            reason = "sample indices are tiny"
        )]
        let alpha = i as f64 / SPLINE_SAMPLES as f64;
        let mut x_max = 1.0_f64;
        // Bisect the Bézier parameter whose time coordinate is `alpha`.
        let (x, coef) = loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            let error = tx - alpha;
            if (error < 1e-5 && error > -1e-5) || x_max - x_min < 1e-12 {
                break (x, coef);
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        };
        table[i] = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
        i += 1;
    }
    table[SPLINE_SAMPLES] = 1.0;
    table
}

/// Interpolated fling progress in `[0, 1]` at normalized time `t`.
fn spline_progress(t: f64) -> f64 {
    let table = &SPLINE_POSITIONS;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "t is clamped to [0, 1] so the index is in 0..=SPLINE_SAMPLES"
    )]
    let (index, t_inf, t_sup) = {
        let samples = SPLINE_SAMPLES as f64;
        let index = (samples * t.clamp(0.0, 1.0)) as usize;
        (index, index as f64 / samples, (index + 1) as f64 / samples)
    };
    if index >= SPLINE_SAMPLES {
        return 1.0;
    }
    let d_inf = table[index];
    let d_sup = table[index + 1];
    let velocity = (d_sup - d_inf) / (t_sup - t_inf);
    d_inf + (t - t_inf) * velocity
}

fn viscous_fluid(x: f64) -> f64 {
    let x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        // 1/e: value of the first segment at x = 1.
        let start = 0.367_879_441_17;
        let x = 1.0 - (1.0 - x).exp();
        start + x * (1.0 - start)
    }
}

/// Viscous-fluid ease used for fixed-duration scrolls; maps `[0, 1]` onto `[0, 1]`.
fn viscous_fluid_progress(t: f64) -> f64 {
    let normalize = 1.0 / viscous_fluid(1.0);
    let offset = 1.0 - normalize * viscous_fluid(1.0);
    let value = normalize * viscous_fluid(t.clamp(0.0, 1.0));
    if value > 0.0 { value + offset } else { value }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "callers clamp the value into the i32 range first"
)]
fn round_to_i32(value: f64) -> i32 {
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Scroll,
    Fling,
}

/// Time-stepped offset animation along one axis.
#[derive(Clone, Debug)]
pub struct Scroller {
    mode: Mode,
    start_y: i32,
    final_y: i32,
    curr_y: i32,
    min_y: i32,
    max_y: i32,
    start_time_ms: Option<u64>,
    duration_ms: u64,
    finished: bool,
    friction: f64,
    physical_coeff: f64,
}

impl Scroller {
    /// Creates an idle scroller using the friction and density of `config`.
    #[must_use]
    pub fn new(config: &MotionConfig) -> Self {
        let pixels_per_inch = 160.0 * config.density;
        Self {
            mode: Mode::Scroll,
            start_y: 0,
            final_y: 0,
            curr_y: 0,
            min_y: i32::MIN,
            max_y: i32::MAX,
            start_time_ms: None,
            duration_ms: 0,
            finished: true,
            friction: config.scroll_friction,
            physical_coeff: GRAVITY_EARTH * INCHES_PER_METER * pixels_per_inch * PHYSICAL_TUNING,
        }
    }

    /// Returns `true` when no animation is in progress.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Offset produced by the latest [`Scroller::compute_offset`].
    #[must_use]
    pub const fn curr_y(&self) -> i32 {
        self.curr_y
    }

    /// Offset the current animation ends at.
    #[must_use]
    pub const fn final_y(&self) -> i32 {
        self.final_y
    }

    /// Length of the current animation.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Moves the end point of the running animation, keeping its duration.
    pub fn set_final_y(&mut self, final_y: i32) {
        self.final_y = final_y;
        self.finished = false;
    }

    /// Scrolls from `start_y` by `dy` over `duration_ms`.
    pub fn start_scroll(&mut self, start_y: i32, dy: i32, duration_ms: u64) {
        self.mode = Mode::Scroll;
        self.finished = false;
        self.start_y = start_y;
        self.curr_y = start_y;
        self.final_y = start_y.saturating_add(dy);
        self.min_y = i32::MIN;
        self.max_y = i32::MAX;
        self.start_time_ms = None;
        self.duration_ms = duration_ms;
    }

    /// Starts a fling from `start_y` with `velocity` px/s, confined to `[min_y, max_y]`.
    pub fn fling(&mut self, start_y: i32, velocity: f64, min_y: i32, max_y: i32) {
        self.mode = Mode::Fling;
        self.finished = false;
        self.start_y = start_y;
        self.curr_y = start_y;
        self.min_y = min_y;
        self.max_y = max_y;
        self.start_time_ms = None;

        let (duration_ms, distance) = if velocity == 0.0 {
            (0, 0.0)
        } else {
            (
                self.fling_duration_ms(velocity),
                self.fling_distance(velocity) * velocity.signum(),
            )
        };
        self.duration_ms = duration_ms;
        let final_y = (f64::from(start_y) + distance.round())
            .clamp(f64::from(min_y), f64::from(max_y));
        self.final_y = round_to_i32(final_y);
    }

    /// Advances the animation to `now_ms`.
    ///
    /// Returns `false` once the animation had already finished; the final
    /// frame (which lands exactly on [`Scroller::final_y`]) still returns `true`.
    pub fn compute_offset(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }
        let start = *self.start_time_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start);
        if elapsed >= self.duration_ms {
            self.curr_y = self.final_y;
            self.finished = true;
            return true;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "animation durations are a few seconds at most"
        )]
        let t = elapsed as f64 / self.duration_ms as f64;
        let progress = match self.mode {
            Mode::Scroll => viscous_fluid_progress(t),
            Mode::Fling => spline_progress(t),
        };
        let delta = f64::from(self.final_y) - f64::from(self.start_y);
        let y = f64::from(self.start_y) + (progress * delta).round();
        self.curr_y = round_to_i32(y.clamp(f64::from(self.min_y), f64::from(self.max_y)));
        if self.mode == Mode::Fling && self.curr_y == self.final_y {
            self.finished = true;
        }
        true
    }

    /// Stops the animation, jumping to its end point.
    pub fn abort(&mut self) {
        self.curr_y = self.final_y;
        self.finished = true;
    }

    fn spline_deceleration(&self, velocity: f64) -> f64 {
        (INFLEXION * velocity.abs() / (self.friction * self.physical_coeff)).ln()
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "exp() is positive and fling durations are seconds long"
    )]
    fn fling_duration_ms(&self, velocity: f64) -> u64 {
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()) as u64
    }

    fn fling_distance(&self, velocity: f64) -> f64 {
        let l = self.spline_deceleration(velocity);
        let exponent = DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l;
        self.friction * self.physical_coeff * exponent.exp()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn scroller() -> Scroller {
        Scroller::new(&MotionConfig::default())
    }

    fn run_to_end(s: &mut Scroller, start_ms: u64, step_ms: u64) -> Vec<i32> {
        let mut ys = Vec::new();
        let mut now = start_ms;
        while s.compute_offset(now) {
            ys.push(s.curr_y());
            now += step_ms;
            assert!(ys.len() < 10_000, "animation never finished");
        }
        ys
    }

    #[test]
    fn curves_start_at_zero_and_end_at_one() {
        assert!(spline_progress(0.0) < 1e-4);
        assert_eq!(spline_progress(1.0), 1.0);
        assert!(viscous_fluid_progress(0.0).abs() < 1e-12);
        assert!((viscous_fluid_progress(1.0) - 1.0).abs() < 1e-12);
        let mut last = 0.0;
        for i in 0..=20 {
            let p = spline_progress(f64::from(i) / 20.0);
            assert!(p >= last, "spline must be monotonic");
            last = p;
        }
    }

    #[test]
    fn scroll_lands_exactly_on_target() {
        let mut s = scroller();
        s.start_scroll(-75, -25, 250);
        assert!(!s.is_finished());
        let ys = run_to_end(&mut s, 1000, 16);
        assert_eq!(*ys.last().unwrap(), -100);
        assert!(s.is_finished());
        assert!(ys.windows(2).all(|w| w[1] <= w[0]), "monotonic: {ys:?}");
        assert!(!s.compute_offset(2000), "finished scroller reports no work");
    }

    #[test]
    fn zero_duration_scroll_jumps() {
        let mut s = scroller();
        s.start_scroll(10, 40, 0);
        assert!(s.compute_offset(0));
        assert_eq!(s.curr_y(), 50);
        assert!(s.is_finished());
    }

    #[test]
    fn fling_travels_in_velocity_direction() {
        let mut s = scroller();
        s.fling(0, 1000.0, i32::MIN, i32::MAX);
        let slow = s.final_y();
        assert!(slow > 0);
        assert!(s.duration_ms() > 0);

        s.fling(0, 4000.0, i32::MIN, i32::MAX);
        assert!(s.final_y() > slow, "faster flings travel further");

        s.fling(0, -1000.0, i32::MIN, i32::MAX);
        assert_eq!(s.final_y(), -slow);
    }

    #[test]
    fn fling_respects_bounds() {
        let mut s = scroller();
        s.fling(0, 8000.0, -300, 120);
        assert_eq!(s.final_y(), 120);
        let ys = run_to_end(&mut s, 0, 16);
        assert!(ys.iter().all(|y| (-300..=120).contains(y)));
        assert_eq!(s.curr_y(), 120);
    }

    #[test]
    fn adjusted_final_is_reached() {
        let mut s = scroller();
        s.fling(0, -2000.0, i32::MIN, i32::MAX);
        let target = s.final_y() - 17;
        s.set_final_y(target);
        run_to_end(&mut s, 0, 16);
        assert_eq!(s.curr_y(), target);
    }

    #[test]
    fn clock_starts_on_first_frame() {
        let mut s = scroller();
        s.start_scroll(0, 100, 250);
        assert!(s.compute_offset(5_000));
        assert_eq!(s.curr_y(), 0, "first frame is the start of the curve");
        assert!(s.compute_offset(5_125));
        assert!(s.curr_y() > 0 && s.curr_y() < 100);
        assert!(s.compute_offset(5_250));
        assert_eq!(s.curr_y(), 100);
    }

    #[test]
    fn abort_jumps_to_end() {
        let mut s = scroller();
        s.start_scroll(0, 300, 250);
        s.compute_offset(16);
        s.abort();
        assert!(s.is_finished());
        assert_eq!(s.curr_y(), 300);
    }
}
