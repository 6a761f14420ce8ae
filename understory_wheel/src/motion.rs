// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release, snap, and scroll-to policies on top of the [`Scroller`].
//!
//! Every animation started here ends on an integer multiple of the item
//! height (relative to the selection anchor), and inside the fling bounds
//! unless the picker is cyclic.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use tracing::trace;

use crate::config::MotionConfig;
use crate::layout::LayoutMetrics;
use crate::scroller::Scroller;

/// How a motion was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionKind {
    /// Momentum from a fast release, adjusted to land on a row.
    Fling,
    /// Short scroll back onto the nearest row after a slow release.
    SnapBack,
    /// Programmatic scroll to a given offset.
    ScrollTo,
}

/// Distance to add to an offset whose in-row remainder is `remainder` so
/// it lands on a row boundary.
///
/// Remainders of more than half a row complete the row in the direction
/// given by the sign of `offset`; smaller ones fall back.
#[must_use]
pub fn distance_to_snap(remainder: i32, offset: i32, metrics: &LayoutMetrics) -> i32 {
    let item_height = metrics.item_height();
    if remainder.abs() > metrics.half_item_height() {
        if offset < 0 {
            -item_height - remainder
        } else {
            item_height - remainder
        }
    } else {
        -remainder
    }
}

/// Wraps a possibly negative data position into `0..len`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rem_euclid result is in 0..len"
)]
pub fn wrap_index(position: i64, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX).max(1);
    position.rem_euclid(len) as usize
}

/// Data position shown at the centre row: `selected - round(offset / item_height)`.
///
/// Not wrapped and not range checked; see [`resolve_index`].
#[must_use]
pub fn centre_position(selected_index: usize, offset: i32, item_height: i32) -> i64 {
    let selected = i64::try_from(selected_index).unwrap_or(i64::MAX);
    if item_height <= 0 {
        return selected;
    }
    let offset = i64::from(offset);
    let height = i64::from(item_height);
    // Round half away from zero.
    let rows = (offset.abs() * 2 + height) / (height * 2) * offset.signum();
    selected - rows
}

/// Index of the item at the centre row.
///
/// Cyclic pickers always resolve; others return `None` while the offset is
/// past either end.
#[must_use]
pub fn resolve_index(
    selected_index: usize,
    offset: i32,
    item_height: i32,
    len: usize,
    cyclic: bool,
) -> Option<usize> {
    let position = centre_position(selected_index, offset, item_height);
    if cyclic {
        return Some(wrap_index(position, len));
    }
    usize::try_from(position).ok().filter(|index| *index < len)
}

/// Signed number of rows from `from` to `to`.
///
/// On a cyclic picker the shorter way round is taken.
#[must_use]
pub fn shortest_delta(from: usize, to: usize, len: usize, cyclic: bool) -> i64 {
    let from = i64::try_from(from).unwrap_or(i64::MAX);
    let to = i64::try_from(to).unwrap_or(i64::MAX);
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let mut delta = to - from;
    if cyclic && delta.abs() > len / 2 {
        delta += if delta > 0 { -len } else { len };
    }
    delta
}

/// Offset at which `index` sits on the centre row.
///
/// Non-cyclic pickers have one such offset. Cyclic ones take the copy of
/// `index` nearest to the row currently at the centre.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "clamped into the i32 range first"
)]
pub fn offset_for_index(
    selected_index: usize,
    offset: i32,
    index: usize,
    item_height: i32,
    len: usize,
    cyclic: bool,
) -> i32 {
    let selected = i64::try_from(selected_index).unwrap_or(i64::MAX);
    let target = if cyclic {
        let position = centre_position(selected_index, offset, item_height);
        position + shortest_delta(wrap_index(position, len), index, len, true)
    } else {
        i64::try_from(index).unwrap_or(i64::MAX)
    };
    (selected - target)
        .saturating_mul(i64::from(item_height))
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Owns the [`Scroller`] and decides where its animations end.
#[derive(Clone, Debug)]
pub struct MotionEngine {
    scroller: Scroller,
    config: MotionConfig,
}

impl MotionEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(config: MotionConfig) -> Self {
        Self {
            scroller: Scroller::new(&config),
            config,
        }
    }

    /// Physics in use.
    #[must_use]
    pub const fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Replaces the physics. A running animation is dropped; see
    /// [`MotionEngine::scroll_to`] to continue it.
    pub fn set_config(&mut self, config: MotionConfig) {
        self.scroller = Scroller::new(&config);
        self.config = config;
    }

    /// Returns `true` while an animation is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !self.scroller.is_finished()
    }

    /// Offset the running (or last) animation ends at.
    #[must_use]
    pub const fn final_offset(&self) -> i32 {
        self.scroller.final_y()
    }

    /// Starts the motion following a pointer release at `offset`.
    ///
    /// A release faster than the minimum fling velocity flings and then
    /// moves the landing point onto a row; slower ones snap back onto the
    /// nearest row. Non-cyclic landing points are clamped to the fling
    /// bounds.
    pub fn release(&mut self, offset: i32, velocity: f64, metrics: &LayoutMetrics, cyclic: bool) -> MotionKind {
        let item_height = metrics.item_height();
        let kind = if velocity.abs() > self.config.min_fling_velocity {
            self.scroller.fling(
                offset,
                velocity,
                metrics.fling_min_y(),
                metrics.fling_max_y(),
            );
            let landing = self.scroller.final_y();
            let snap = distance_to_snap(landing.checked_rem(item_height).unwrap_or(0), offset, metrics);
            self.scroller.set_final_y(landing.saturating_add(snap));
            MotionKind::Fling
        } else {
            let snap = distance_to_snap(offset.checked_rem(item_height).unwrap_or(0), offset, metrics);
            self.scroller
                .start_scroll(offset, snap, self.config.scroll_duration_ms);
            MotionKind::SnapBack
        };
        if !cyclic {
            let landing = self
                .scroller
                .final_y()
                .clamp(metrics.fling_min_y(), metrics.fling_max_y());
            self.scroller.set_final_y(landing);
        }
        trace!(
            ?kind,
            offset,
            velocity,
            landing = self.scroller.final_y(),
            "motion: release"
        );
        kind
    }

    /// Scrolls from `offset` to `target` over the configured duration.
    pub fn scroll_to(&mut self, offset: i32, target: i32) -> MotionKind {
        let distance = target.saturating_sub(offset);
        self.scroller
            .start_scroll(offset, distance, self.config.scroll_duration_ms);
        trace!(offset, target, "motion: scroll to");
        MotionKind::ScrollTo
    }

    /// Advances to `now_ms`, returning the new offset if the animation moved.
    pub fn tick(&mut self, now_ms: u64) -> Option<i32> {
        self.scroller
            .compute_offset(now_ms)
            .then(|| self.scroller.curr_y())
    }

    /// Stops the running animation. The offset last returned by
    /// [`MotionEngine::tick`] stays the caller's current offset.
    pub fn abort(&mut self) {
        if self.is_running() {
            trace!("motion: abort");
        }
        self.scroller.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WheelConfig;
    use crate::layout::{Padding, TextMetrics};

    /// 3 visible rows of 100px, 10 items, anchor at 0.
    fn metrics(cyclic: bool) -> LayoutMetrics {
        let config = WheelConfig {
            visible_item_count: 3,
            cyclic,
            ..WheelConfig::default()
        };
        LayoutMetrics::compute(
            &config,
            &TextMetrics::default(),
            10,
            0,
            200,
            300,
            Padding::default(),
        )
    }

    fn settle(engine: &mut MotionEngine) -> i32 {
        let mut last = None;
        let mut now = 0;
        while let Some(offset) = engine.tick(now) {
            last = Some(offset);
            now += 16;
        }
        last.unwrap()
    }

    #[test]
    fn snap_distance_follows_remainder() {
        let m = metrics(false);
        assert_eq!(distance_to_snap(-30, -130, &m), 30);
        assert_eq!(distance_to_snap(-50, -150, &m), 50, "exactly half falls back");
        assert_eq!(distance_to_snap(-70, -170, &m), -30);
        assert_eq!(distance_to_snap(70, 170, &m), 30);
        assert_eq!(distance_to_snap(0, -200, &m), 0);
    }

    #[test]
    fn centre_position_rounds_half_away_from_zero() {
        assert_eq!(centre_position(5, 0, 100), 5);
        assert_eq!(centre_position(5, -149, 100), 6);
        assert_eq!(centre_position(5, -150, 100), 7);
        assert_eq!(centre_position(5, 150, 100), 3);
        assert_eq!(centre_position(5, 49, 100), 5);
        assert_eq!(centre_position(5, 1234, 0), 5, "unmeasured");
    }

    #[test]
    fn indices_wrap_only_when_cyclic() {
        assert_eq!(resolve_index(0, 300, 100, 10, true), Some(7));
        assert_eq!(resolve_index(0, 300, 100, 10, false), None);
        assert_eq!(resolve_index(9, -100, 100, 10, false), None);
        assert_eq!(resolve_index(9, -100, 100, 10, true), Some(0));
        assert_eq!(wrap_index(-1, 10), 9);
        assert_eq!(wrap_index(-21, 10), 9);
        assert_eq!(wrap_index(25, 10), 5);
    }

    #[test]
    fn shortest_delta_goes_the_short_way_round() {
        assert_eq!(shortest_delta(2, 9, 10, true), -3);
        assert_eq!(shortest_delta(9, 2, 10, true), 3);
        assert_eq!(shortest_delta(2, 9, 10, false), 7);
        assert_eq!(shortest_delta(0, 5, 10, true), 5, "half way keeps direction");
        assert_eq!(shortest_delta(4, 4, 10, true), 0);
    }

    #[test]
    fn slow_release_snaps_to_nearest_row() {
        let m = metrics(false);
        let mut engine = MotionEngine::new(MotionConfig::default());
        assert_eq!(engine.release(-150, 0.0, &m, false), MotionKind::SnapBack);
        assert_eq!(engine.final_offset(), -100);
        assert_eq!(settle(&mut engine), -100);
        assert!(!engine.is_running());

        assert_eq!(engine.release(-170, 10.0, &m, false), MotionKind::SnapBack);
        assert_eq!(engine.final_offset(), -200);
    }

    #[test]
    fn release_past_the_ends_returns_inside() {
        let m = metrics(false);
        let mut engine = MotionEngine::new(MotionConfig::default());
        engine.release(80, 0.0, &m, false);
        assert_eq!(engine.final_offset(), 0);
        engine.release(-1040, 0.0, &m, false);
        assert_eq!(engine.final_offset(), -900);
    }

    #[test]
    fn fling_lands_on_a_row_within_bounds() {
        let m = metrics(false);
        let mut engine = MotionEngine::new(MotionConfig::default());
        for velocity in [-8000.0, -3000.0, -600.0, 600.0, 3000.0] {
            assert_eq!(engine.release(-420, velocity, &m, false), MotionKind::Fling);
            let landing = settle(&mut engine);
            assert_eq!(landing % 100, 0, "v={velocity}: {landing}");
            assert!((-900..=0).contains(&landing), "v={velocity}: {landing}");
        }
    }

    #[test]
    fn cyclic_fling_is_unbounded() {
        let m = metrics(true);
        let mut engine = MotionEngine::new(MotionConfig::default());
        engine.release(0, 8000.0, &m, true);
        let landing = settle(&mut engine);
        assert!(landing > 0);
        assert_eq!(landing % 100, 0);
    }

    #[test]
    fn scroll_to_lands_on_target() {
        let mut engine = MotionEngine::new(MotionConfig::default());
        assert_eq!(engine.scroll_to(-37, 300), MotionKind::ScrollTo);
        assert_eq!(engine.final_offset(), 300);
        assert_eq!(settle(&mut engine), 300);
    }

    #[test]
    fn index_offsets_are_whole_rows_from_the_anchor() {
        // Off-row and past the first item: only the anchor matters.
        assert_eq!(offset_for_index(0, 250, 2, 100, 3, false), -200);
        assert_eq!(offset_for_index(4, -37, 4, 100, 10, false), 0);
        // Cyclic: row -3 shows item 7, so item 8 is one row further down.
        assert_eq!(offset_for_index(0, 250, 8, 100, 10, true), 200);
        // And item 5 is reached going back up through 6.
        assert_eq!(offset_for_index(0, 250, 5, 100, 10, true), 500);
        assert_eq!(offset_for_index(1, 0, 8, 100, 10, true), 300);
    }
}
