// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Terminal stand-ins for a real rendering surface, shared by the demos.
//!
//! [`FixedAdvance`] measures text as if every character had the same
//! advance, and [`TextCanvas`] records what a picker paints so it can be
//! printed as plain text.

use kurbo::{Affine, Point, Rect};
use understory_wheel::paint::{Argb, ClipOp, WheelCanvas};
use understory_wheel::{FontMetrics, ItemAlign, TextMeasure};

/// Monospace text measurement.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvance {
    /// Advance of one character.
    pub advance: f64,
    /// Font size; metrics are derived from it.
    pub size: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            advance: 9.0,
            size: 16.0,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "demo labels are short"
        )]
        let chars = text.chars().count() as f64;
        self.advance * chars
    }

    fn font_metrics(&self) -> FontMetrics {
        FontMetrics {
            top: -1.05 * self.size,
            ascent: -0.93 * self.size,
            descent: 0.24 * self.size,
            bottom: 0.27 * self.size,
        }
    }
}

/// A label as it landed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// The label.
    pub text: String,
    /// Baseline origin after the canvas transform.
    pub position: Point,
    /// Vertical scale of the transform; below 1 for tilted rows.
    pub squash: f64,
    /// Paint colour.
    pub color: Argb,
}

/// Records paint commands into text runs and filled rectangles.
///
/// Clips are not applied. Rows split by a selected-item colour are painted
/// twice; the second pass is dropped so each row is recorded once.
#[derive(Debug, Default)]
pub struct TextCanvas {
    stack: Vec<(Affine, Option<ClipOp>)>,
    transform: Affine,
    clip: Option<ClipOp>,
    /// Labels in paint order.
    pub runs: Vec<TextRun>,
    /// Filled rectangles in paint order.
    pub fills: Vec<(Rect, Argb)>,
}

impl TextCanvas {
    /// Clears everything recorded so far.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// One line per visible label, top to bottom. Labels inside `band`
    /// are marked.
    pub fn render(&self, band: Rect) -> String {
        let mut runs: Vec<&TextRun> = self
            .runs
            .iter()
            .filter(|run| !run.text.is_empty() && run.color.alpha() > 0)
            .collect();
        runs.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        let mut out = String::new();
        for run in runs {
            let marker = if band.y0 <= run.position.y && run.position.y < band.y1 {
                '>'
            } else {
                ' '
            };
            out.push_str(&format!(
                "{marker} {y:7.1}  {text:<12} alpha {alpha:3}  squash {squash:.2}\n",
                y = run.position.y,
                text = run.text,
                alpha = run.color.alpha(),
                squash = run.squash,
            ));
        }
        out
    }
}

impl WheelCanvas for TextCanvas {
    fn save(&mut self) {
        self.stack.push((self.transform, self.clip));
    }

    fn restore(&mut self) {
        if let Some((transform, clip)) = self.stack.pop() {
            self.transform = transform;
            self.clip = clip;
        }
    }

    fn concat(&mut self, transform: Affine) {
        self.transform *= transform;
    }

    fn clip_rect(&mut self, _rect: Rect, op: ClipOp) {
        self.clip = Some(op);
    }

    fn draw_text(&mut self, text: &str, origin: Point, _align: ItemAlign, color: Argb) {
        let position = self.transform * origin;
        if self
            .runs
            .last()
            .is_some_and(|last| last.text == text && last.position == position)
        {
            return;
        }
        let [_, _, _, squash, _, _] = self.transform.as_coeffs();
        self.runs.push(TextRun {
            text: text.to_owned(),
            position,
            squash,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Argb) {
        self.fills.push((rect, color));
    }
}
