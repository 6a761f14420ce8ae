// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picker and physics configuration.
//!
//! Configuration values are plain data with public fields. They are
//! validated when handed to a [`WheelPicker`](crate::WheelPicker), which is
//! where cross-field rules (odd visible count, max-width position inside the
//! item store) can be checked.

use alloc::string::String;

use crate::error::{Result, WheelError};

/// Horizontal placement of item labels inside the content rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemAlign {
    /// Labels are centred on the content rectangle.
    #[default]
    Center,
    /// Labels start at the left content edge.
    Start,
    /// Labels end at the right content edge.
    End,
}

/// Selection indicator and curtain options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorConfig {
    /// Draw two bars around the centre item.
    pub indicator: bool,
    /// Thickness of each indicator bar in pixels.
    pub indicator_size: i32,
    /// Fill the centre item band.
    pub curtain: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            indicator: false,
            indicator_size: 2,
            curtain: false,
        }
    }
}

/// Layout and behaviour options of a picker.
///
/// At most one of `same_width`, `max_width_position` and `max_width_text`
/// decides the measured label width; they are consulted in that order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WheelConfig {
    /// Number of fully visible rows. Must be at least 2; even values are
    /// bumped to the next odd value by [`WheelConfig::normalized`].
    pub visible_item_count: usize,
    /// Vertical gap between two rows, in pixels.
    pub item_space: i32,
    /// Label alignment.
    pub item_align: ItemAlign,
    /// Wrap indices instead of stopping at the first and last item.
    pub cyclic: bool,
    /// Lay rows out on a cylinder.
    pub curved: bool,
    /// Fade rows towards the edges.
    pub atmospheric: bool,
    /// All labels share the width of the first one.
    pub same_width: bool,
    /// Text whose width stands in for the widest label.
    pub max_width_text: Option<String>,
    /// Item whose label width stands in for the widest label.
    pub max_width_position: Option<usize>,
    /// Indicator and curtain.
    pub indicator: IndicatorConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            visible_item_count: 7,
            item_space: 12,
            item_align: ItemAlign::Center,
            cyclic: false,
            curved: false,
            atmospheric: false,
            same_width: false,
            max_width_text: None,
            max_width_position: None,
            indicator: IndicatorConfig::default(),
        }
    }
}

impl WheelConfig {
    /// Returns a copy with a validated, odd visible item count.
    ///
    /// # Errors
    ///
    /// [`WheelError::VisibleItemCountTooSmall`] if the count is below 2.
    pub fn normalized(mut self) -> Result<Self> {
        self.visible_item_count = odd_visible_count(self.visible_item_count)?;
        Ok(self)
    }

    /// Sets the visible item count, bumping even values to the next odd one.
    ///
    /// # Errors
    ///
    /// [`WheelError::VisibleItemCountTooSmall`] if `count < 2`; the current
    /// value is kept.
    pub fn set_visible_item_count(&mut self, count: usize) -> Result<()> {
        self.visible_item_count = odd_visible_count(count)?;
        Ok(())
    }
}

fn odd_visible_count(count: usize) -> Result<usize> {
    if count < 2 {
        return Err(WheelError::VisibleItemCountTooSmall { count });
    }
    Ok(if count % 2 == 0 { count + 1 } else { count })
}

/// Tunable physics of the motion engine.
///
/// Defaults follow common touch platform conventions. Only the shape of the
/// algorithm depends on them; any positive values produce boundary-exact
/// settles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Release velocities at or below this (px/s) snap back instead of flinging.
    pub min_fling_velocity: f64,
    /// Release velocities are clamped to this magnitude (px/s).
    pub max_fling_velocity: f64,
    /// Pointer travel (px) below which a gesture is still a tap.
    pub touch_slop: f64,
    /// Delay between two animation ticks.
    pub frame_interval_ms: u64,
    /// Friction coefficient of the fling curve.
    pub scroll_friction: f64,
    /// Display density; the fling curve assumes `160 * density` pixels per inch.
    pub density: f64,
    /// Duration of snap-back and programmatic scroll-to animations.
    pub scroll_duration_ms: u64,
    /// Only samples this recent contribute to the release velocity.
    pub velocity_horizon_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            min_fling_velocity: 50.0,
            max_fling_velocity: 8000.0,
            touch_slop: 8.0,
            frame_interval_ms: 16,
            scroll_friction: 0.015,
            density: 1.0,
            scroll_duration_ms: 250,
            velocity_horizon_ms: 100,
        }
    }
}
