// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived layout geometry.
//!
//! All values live on the integer pixel grid: snapping is exact only when
//! offsets and item heights are integers.

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

use crate::config::{ItemAlign, WheelConfig};
use crate::items::FontMetrics;

/// Inner spacing between the viewport edge and the content rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    /// Left inset.
    pub left: i32,
    /// Top inset.
    pub top: i32,
    /// Right inset.
    pub right: i32,
    /// Bottom inset.
    pub bottom: i32,
}

impl Padding {
    /// The same inset on every side.
    #[must_use]
    pub const fn uniform(inset: i32) -> Self {
        Self {
            left: inset,
            top: inset,
            right: inset,
            bottom: inset,
        }
    }
}

/// Constraint handed down by the host layout for one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureSpec {
    /// The size is imposed.
    Exactly(i32),
    /// The size may not exceed this bound.
    AtMost(i32),
    /// No constraint.
    Unspecified,
}

impl MeasureSpec {
    /// Resolves the final size for a `preferred` size.
    #[must_use]
    pub fn resolve(self, preferred: i32) -> i32 {
        match self {
            Self::Exactly(size) => size,
            Self::AtMost(bound) => preferred.min(bound),
            Self::Unspecified => preferred,
        }
    }
}

/// Label dimensions the layout is sized around.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Width of the widest label (or its stand-in).
    pub max_width: i32,
    /// Line height of the label font.
    pub max_height: i32,
    /// Offset from a row centre to the baseline that centres the text.
    pub baseline_shift: f64,
}

impl TextMetrics {
    /// Builds text metrics from a measured label width and the font.
    #[must_use]
    pub fn new(max_label_width: f64, font: FontMetrics) -> Self {
        Self {
            max_width: ceil_px(max_label_width),
            max_height: ceil_px(font.line_height()),
            baseline_shift: font.baseline_shift(),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel sizes are small and clamped to be non-negative"
)]
fn ceil_px(value: f64) -> i32 {
    value.max(0.0).ceil() as i32
}

pub(crate) fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Preferred viewport size for the given labels and options, padding included.
///
/// Curved pickers lay rows on a half cylinder whose projected height is
/// `2/π` of the unrolled height.
#[must_use]
pub fn preferred_size(text: &TextMetrics, config: &WheelConfig, padding: Padding) -> (i32, i32) {
    let visible = to_i32(config.visible_item_count);
    let stacked = text.max_height * visible + config.item_space * (visible - 1);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the curved height is smaller than the stacked one"
    )]
    let height = if config.curved {
        (2.0 * f64::from(stacked) / PI) as i32
    } else {
        stacked
    };
    (
        text.max_width + padding.left + padding.right,
        height + padding.top + padding.bottom,
    )
}

/// Resolves the measured size of a picker against host constraints.
#[must_use]
pub fn measure(
    width_spec: MeasureSpec,
    height_spec: MeasureSpec,
    text: &TextMetrics,
    config: &WheelConfig,
    padding: Padding,
) -> (i32, i32) {
    let (width, height) = preferred_size(text, config, padding);
    (width_spec.resolve(width), height_spec.resolve(height))
}

/// Geometry derived from the viewport, options, and selection anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    pub(crate) left: i32,
    pub(crate) top: i32,
    pub(crate) right: i32,
    pub(crate) bottom: i32,
    pub(crate) item_height: i32,
    pub(crate) half_item_height: i32,
    pub(crate) half_height: i32,
    pub(crate) drawn_item_count: usize,
    pub(crate) half_drawn_item_count: usize,
    pub(crate) fling_min_y: i32,
    pub(crate) fling_max_y: i32,
    pub(crate) center_x: i32,
    pub(crate) center_y: i32,
    pub(crate) drawn_center_x: i32,
    pub(crate) drawn_center_y: i32,
}

impl LayoutMetrics {
    /// Computes metrics for a `width` × `height` viewport.
    #[must_use]
    pub fn compute(
        config: &WheelConfig,
        text: &TextMetrics,
        item_count: usize,
        selected_index: usize,
        width: i32,
        height: i32,
        padding: Padding,
    ) -> Self {
        let left = padding.left;
        let top = padding.top;
        let right = width - padding.right;
        let bottom = height - padding.bottom;
        let content_height = (bottom - top).max(0);
        let item_height = content_height / to_i32(config.visible_item_count.max(1));
        let drawn_item_count = config.visible_item_count + 2;
        let center_x = (left + right) / 2;
        let center_y = (top + bottom) / 2;
        let drawn_center_x = match config.item_align {
            ItemAlign::Center => center_x,
            ItemAlign::Start => left,
            ItemAlign::End => right,
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "baseline shift is a fraction of the font size"
        )]
        let drawn_center_y = center_y + text.baseline_shift.round() as i32;

        let mut metrics = Self {
            left,
            top,
            right,
            bottom,
            item_height,
            half_item_height: item_height / 2,
            half_height: content_height / 2,
            drawn_item_count,
            half_drawn_item_count: drawn_item_count / 2,
            fling_min_y: 0,
            fling_max_y: 0,
            center_x,
            center_y,
            drawn_center_x,
            drawn_center_y,
        };
        metrics.update_fling_bounds(config.cyclic, item_count, selected_index);
        metrics
    }

    /// Recomputes the fling bounds after the anchor, item count, or cyclic flag changed.
    ///
    /// Offsets are measured from the selected item's rest position, so the
    /// last item sits `item_height * (len - 1 - selected)` above it and the
    /// first `item_height * selected` below it. Cyclic pickers are unbounded.
    pub(crate) fn update_fling_bounds(&mut self, cyclic: bool, item_count: usize, selected_index: usize) {
        if cyclic {
            self.fling_min_y = i32::MIN;
            self.fling_max_y = i32::MAX;
            return;
        }
        let selected_offset = to_i32(selected_index).saturating_mul(self.item_height);
        let last = to_i32(item_count.saturating_sub(1));
        self.fling_min_y = selected_offset - last.saturating_mul(self.item_height);
        self.fling_max_y = selected_offset;
    }

    /// Returns `true` once a non-degenerate viewport has been laid out.
    #[must_use]
    pub const fn is_measured(&self) -> bool {
        self.item_height > 0
    }

    /// Height of one row.
    #[must_use]
    pub const fn item_height(&self) -> i32 {
        self.item_height
    }

    /// Half of [`Self::item_height`], rounded down.
    #[must_use]
    pub const fn half_item_height(&self) -> i32 {
        self.half_item_height
    }

    /// Half of the content height, the radius of the curved layout.
    #[must_use]
    pub const fn half_height(&self) -> i32 {
        self.half_height
    }

    /// Rows produced per frame: the visible ones plus one partial row at each edge.
    #[must_use]
    pub const fn drawn_item_count(&self) -> usize {
        self.drawn_item_count
    }

    /// Rows drawn on each side of the centre row.
    #[must_use]
    pub const fn half_drawn_item_count(&self) -> usize {
        self.half_drawn_item_count
    }

    /// Smallest reachable scroll offset; `i32::MIN` when cyclic.
    #[must_use]
    pub const fn fling_min_y(&self) -> i32 {
        self.fling_min_y
    }

    /// Largest reachable scroll offset; `i32::MAX` when cyclic.
    #[must_use]
    pub const fn fling_max_y(&self) -> i32 {
        self.fling_max_y
    }

    /// Horizontal centre of the content rectangle.
    #[must_use]
    pub const fn center_x(&self) -> i32 {
        self.center_x
    }

    /// Vertical centre of the content rectangle.
    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.center_y
    }

    /// Label anchor x, following the item alignment.
    #[must_use]
    pub const fn drawn_center_x(&self) -> i32 {
        self.drawn_center_x
    }

    /// Baseline of the centre row.
    #[must_use]
    pub const fn drawn_center_y(&self) -> i32 {
        self.drawn_center_y
    }

    /// Viewport minus padding.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }

    /// Band occupied by the centre row.
    #[must_use]
    pub fn current_item_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.center_y - self.half_item_height),
            f64::from(self.right),
            f64::from(self.center_y + self.half_item_height),
        )
    }

    /// The two indicator bars around the centre row, bottom bar first.
    #[must_use]
    pub fn indicator_rects(&self, indicator_size: i32) -> [Rect; 2] {
        let half = f64::from(indicator_size / 2);
        let bar = |center: i32| {
            let center = f64::from(center);
            Rect::new(
                f64::from(self.left),
                center - half,
                f64::from(self.right),
                center + half,
            )
        };
        [
            bar(self.center_y + self.half_item_height),
            bar(self.center_y - self.half_item_height),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> TextMetrics {
        TextMetrics {
            max_width: 50,
            max_height: 22,
            baseline_shift: 5.0,
        }
    }

    #[test]
    fn measure_spec_modes() {
        assert_eq!(MeasureSpec::Exactly(300).resolve(120), 300);
        assert_eq!(MeasureSpec::AtMost(100).resolve(120), 100);
        assert_eq!(MeasureSpec::AtMost(200).resolve(120), 120);
        assert_eq!(MeasureSpec::Unspecified.resolve(120), 120);
    }

    #[test]
    fn preferred_height_stacks_rows_and_gaps() {
        let config = WheelConfig {
            visible_item_count: 3,
            item_space: 10,
            ..WheelConfig::default()
        };
        let padding = Padding::uniform(4);
        assert_eq!(preferred_size(&text(), &config, padding), (58, 22 * 3 + 20 + 8));

        let curved = WheelConfig {
            curved: true,
            ..config.clone()
        };
        // 86 * 2 / π = 54.75...
        assert_eq!(preferred_size(&text(), &curved, padding).1, 54 + 8);

        assert_eq!(
            measure(
                MeasureSpec::AtMost(40),
                MeasureSpec::Exactly(200),
                &text(),
                &config,
                padding
            ),
            (40, 200)
        );
    }

    #[test]
    fn metrics_split_content_into_rows() {
        let config = WheelConfig {
            visible_item_count: 5,
            ..WheelConfig::default()
        };
        let m = LayoutMetrics::compute(&config, &text(), 10, 0, 120, 260, Padding::uniform(5));
        assert_eq!(m.item_height(), 50);
        assert_eq!(m.half_item_height(), 25);
        assert_eq!(m.half_height(), 125);
        assert_eq!(m.drawn_item_count(), 7);
        assert_eq!(m.half_drawn_item_count(), 3);
        assert_eq!((m.center_x(), m.center_y()), (60, 130));
        assert_eq!(m.drawn_center_y(), 135);
        assert_eq!(m.current_item_rect(), Rect::new(5.0, 105.0, 115.0, 155.0));
    }

    #[test]
    fn alignment_moves_label_anchor() {
        let mut config = WheelConfig {
            item_align: ItemAlign::Start,
            ..WheelConfig::default()
        };
        let m = LayoutMetrics::compute(&config, &text(), 3, 0, 100, 70, Padding::uniform(5));
        assert_eq!(m.drawn_center_x(), 5);
        config.item_align = ItemAlign::End;
        let m = LayoutMetrics::compute(&config, &text(), 3, 0, 100, 70, Padding::uniform(5));
        assert_eq!(m.drawn_center_x(), 95);
    }

    #[test]
    fn fling_bounds_follow_anchor() {
        let config = WheelConfig {
            visible_item_count: 3,
            ..WheelConfig::default()
        };
        let mut m = LayoutMetrics::compute(&config, &text(), 10, 0, 100, 150, Padding::default());
        assert_eq!(m.item_height(), 50);
        assert_eq!((m.fling_min_y(), m.fling_max_y()), (-450, 0));

        m.update_fling_bounds(false, 10, 4);
        assert_eq!((m.fling_min_y(), m.fling_max_y()), (-250, 200));

        m.update_fling_bounds(true, 10, 4);
        assert_eq!((m.fling_min_y(), m.fling_max_y()), (i32::MIN, i32::MAX));
    }

    #[test]
    fn indicator_bars_straddle_row_edges() {
        let config = WheelConfig {
            visible_item_count: 3,
            ..WheelConfig::default()
        };
        let m = LayoutMetrics::compute(&config, &text(), 3, 0, 100, 150, Padding::default());
        let [head, foot] = m.indicator_rects(4);
        assert_eq!(head, Rect::new(0.0, 98.0, 100.0, 102.0));
        assert_eq!(foot, Rect::new(0.0, 48.0, 100.0, 52.0));
    }

    #[test]
    fn unmeasured_viewport_is_degenerate() {
        let m = LayoutMetrics::compute(
            &WheelConfig::default(),
            &text(),
            3,
            0,
            0,
            0,
            Padding::default(),
        );
        assert!(!m.is_measured());
    }
}
