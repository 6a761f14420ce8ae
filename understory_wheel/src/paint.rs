// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-surface seam and the paint pass that drives it.
//!
//! The picker draws nothing itself. [`paint`] walks
//! [`WheelPicker::drawn_items`] and issues canvas commands; any 2D backend
//! with a transform stack and rectangular clips can implement
//! [`WheelCanvas`].

use kurbo::{Affine, Point, Rect};

use crate::config::ItemAlign;
use crate::picker::WheelPicker;

/// A 32-bit ARGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Argb(pub u32);

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    reason = "channel packing in const context"
)]
impl Argb {
    /// Replaces the alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    /// The alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// How a clip rectangle combines with the current clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipOp {
    /// Keep only what is inside the rectangle.
    Intersect,
    /// Keep only what is outside the rectangle.
    Difference,
}

/// Drawing operations the paint pass needs.
pub trait WheelCanvas {
    /// Pushes the transform and clip state.
    fn save(&mut self);
    /// Pops the state pushed by the matching [`WheelCanvas::save`].
    fn restore(&mut self);
    /// Pre-multiplies the current transform.
    fn concat(&mut self, transform: Affine);
    /// Combines `rect` with the current clip.
    fn clip_rect(&mut self, rect: Rect, op: ClipOp);
    /// Draws `text` with its baseline at `origin.y`, aligned on `origin.x`.
    fn draw_text(&mut self, text: &str, origin: Point, align: ItemAlign, color: Argb);
    /// Fills `rect`.
    fn fill_rect(&mut self, rect: Rect, color: Argb);
}

/// Colours of a painted picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WheelStyle {
    /// Label colour.
    pub item_text_color: Argb,
    /// Colour of the label part inside the centre band; `None` uses
    /// `item_text_color` everywhere.
    pub selected_item_text_color: Option<Argb>,
    /// Indicator bar colour.
    pub indicator_color: Argb,
    /// Centre band fill.
    pub curtain_color: Argb,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            item_text_color: Argb(0xFF88_8888),
            selected_item_text_color: None,
            indicator_color: Argb(0xFFEE_3333),
            curtain_color: Argb(0x88FF_FFFF),
        }
    }
}

/// Paints `picker` onto `canvas`.
///
/// Rows are drawn top to bottom, clipped to the content rectangle. With a
/// selected-item colour each label is drawn twice, once outside and once
/// inside the centre band. Curtain and indicator go on top.
pub fn paint<V, D, L>(picker: &WheelPicker<V, D, L>, canvas: &mut impl WheelCanvas, style: &WheelStyle) {
    let config = picker.config();
    let align = config.item_align;
    let content = picker.metrics().content_rect();
    let current = picker.current_item_rect();

    for item in picker.drawn_items() {
        let transform = item.transform();
        let color = style.item_text_color.with_alpha(scale_alpha(style.item_text_color.alpha(), item.alpha));
        match style.selected_item_text_color {
            Some(selected) => {
                let selected = selected.with_alpha(scale_alpha(selected.alpha(), item.alpha));
                for (op, color) in [(ClipOp::Difference, color), (ClipOp::Intersect, selected)] {
                    canvas.save();
                    canvas.concat(transform);
                    canvas.clip_rect(current, op);
                    canvas.draw_text(item.label, item.origin, align, color);
                    canvas.restore();
                }
            }
            None => {
                canvas.save();
                canvas.clip_rect(content, ClipOp::Intersect);
                canvas.concat(transform);
                canvas.draw_text(item.label, item.origin, align, color);
                canvas.restore();
            }
        }
    }

    if config.indicator.curtain {
        canvas.fill_rect(current, style.curtain_color);
    }
    if config.indicator.indicator {
        for bar in picker.indicator_rects() {
            canvas.fill_rect(bar, style.indicator_color);
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the product of two bytes divided by 255 fits a byte"
)]
fn scale_alpha(base: u8, alpha: u8) -> u8 {
    (u16::from(base) * u16::from(alpha) / 255) as u8
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::config::{IndicatorConfig, WheelConfig};

    #[derive(Debug, PartialEq)]
    enum Op {
        Save,
        Restore,
        Concat,
        Clip(ClipOp),
        Text(String, Argb),
        Fill(Rect, Argb),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl WheelCanvas for Recorder {
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn concat(&mut self, _transform: Affine) {
            self.ops.push(Op::Concat);
        }
        fn clip_rect(&mut self, _rect: Rect, op: ClipOp) {
            self.ops.push(Op::Clip(op));
        }
        fn draw_text(&mut self, text: &str, _origin: Point, _align: ItemAlign, color: Argb) {
            self.ops.push(Op::Text(text.into(), color));
        }
        fn fill_rect(&mut self, rect: Rect, color: Argb) {
            self.ops.push(Op::Fill(rect, color));
        }
    }

    fn picker(config: WheelConfig) -> WheelPicker<&'static str> {
        let mut picker = WheelPicker::new(vec!["a", "b", "c"], |s: &&str| (*s).to_string())
            .unwrap()
            .with_config(config)
            .unwrap();
        picker.on_size_changed(100, 150);
        picker
    }

    fn texts(ops: &[Op]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                Op::Text(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn plain_rows_are_clipped_to_content() {
        let picker = picker(WheelConfig {
            visible_item_count: 3,
            ..WheelConfig::default()
        });
        let mut canvas = Recorder::default();
        paint(&picker, &mut canvas, &WheelStyle::default());
        assert_eq!(texts(&canvas.ops), ["", "", "a", "b", "c"]);
        assert_eq!(
            canvas.ops[..5],
            [
                Op::Save,
                Op::Clip(ClipOp::Intersect),
                Op::Concat,
                Op::Text(String::new(), Argb(0xFF88_8888)),
                Op::Restore
            ]
        );
    }

    #[test]
    fn selected_colour_splits_each_row() {
        let picker = picker(WheelConfig {
            visible_item_count: 3,
            ..WheelConfig::default()
        });
        let style = WheelStyle {
            selected_item_text_color: Some(Argb(0xFF00_0000)),
            ..WheelStyle::default()
        };
        let mut canvas = Recorder::default();
        paint(&picker, &mut canvas, &style);
        assert_eq!(texts(&canvas.ops).len(), 10);
        let clips: Vec<_> = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Clip(_)))
            .take(2)
            .collect();
        assert_eq!(
            clips,
            [&Op::Clip(ClipOp::Difference), &Op::Clip(ClipOp::Intersect)]
        );
    }

    #[test]
    fn curtain_and_indicator_are_drawn_last() {
        let picker = picker(WheelConfig {
            visible_item_count: 3,
            indicator: IndicatorConfig {
                indicator: true,
                indicator_size: 4,
                curtain: true,
            },
            ..WheelConfig::default()
        });
        let style = WheelStyle::default();
        let mut canvas = Recorder::default();
        paint(&picker, &mut canvas, &style);
        let tail = &canvas.ops[canvas.ops.len() - 3..];
        assert_eq!(
            tail,
            [
                Op::Fill(Rect::new(0.0, 50.0, 100.0, 100.0), style.curtain_color),
                Op::Fill(Rect::new(0.0, 98.0, 100.0, 102.0), style.indicator_color),
                Op::Fill(Rect::new(0.0, 48.0, 100.0, 52.0), style.indicator_color),
            ]
        );
    }

    #[test]
    fn atmospheric_rows_fade() {
        let picker = picker(WheelConfig {
            visible_item_count: 3,
            atmospheric: true,
            ..WheelConfig::default()
        });
        let mut canvas = Recorder::default();
        paint(&picker, &mut canvas, &WheelStyle::default());
        let alphas: Vec<u8> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, color) => Some(color.alpha()),
                _ => None,
            })
            .collect();
        assert_eq!(alphas[2], 255, "centre row is opaque");
        assert!(alphas[1] < 255 && alphas[3] < 255);
        assert_eq!(alphas[0], 0);
    }

    #[test]
    fn alpha_helpers() {
        assert_eq!(Argb(0x1234_5678).with_alpha(0xAB), Argb(0xAB34_5678));
        assert_eq!(scale_alpha(255, 128), 128);
        assert_eq!(scale_alpha(128, 255), 128);
        assert_eq!(scale_alpha(0, 255), 0);
    }
}
