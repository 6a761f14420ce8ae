// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The wheel picker: selection state machine and public API.
//!
//! A [`WheelPicker`] owns its items, configuration, derived layout, and the
//! motion engine. The host feeds it pointer samples, frame callbacks, and
//! viewport sizes; it answers with listener notifications, frame requests
//! to its [`AnimationDriver`], and an [`Invalidation`] summary of what has
//! to be measured or repainted.
//!
//! ## Scroll offset
//!
//! `scroll_offset_y` is measured in pixels from the rest position of the
//! selected item. Dragging the content towards larger y increases it and
//! brings earlier items to the centre row:
//!
//! `current_index = selected_index - round(scroll_offset_y / item_height)`,
//! wrapped into `0..len` when cyclic.
//!
//! ## Notifications
//!
//! Every change of the offset is reported through
//! [`WheelListener::on_scrolled`]. State changes, settles, and taps are only
//! reported for motion the user caused; [`WheelPicker::select_item`] and
//! [`WheelPicker::set_data`] move the wheel silently.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect};
use tracing::{debug, trace};

use crate::config::{IndicatorConfig, ItemAlign, MotionConfig, WheelConfig};
use crate::driver::{AnimationDriver, ManualDriver};
use crate::error::{Result, WheelError};
use crate::gesture::{GestureMove, GestureTracker};
use crate::items::{ItemStore, TextMeasure};
use crate::layout::{self, LayoutMetrics, MeasureSpec, Padding, TextMetrics, to_i32};
use crate::listener::{ScrollState, WheelListener};
use crate::motion::{MotionEngine, centre_position, offset_for_index, resolve_index, wrap_index};
use crate::projection::{CurvedTransform, DEFAULT_CAMERA_DISTANCE, atmospheric_alpha};
use crate::velocity::{MotionSample, VelocityTracker};

bitflags::bitflags! {
    /// Host work requested by picker changes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// The preferred size may have changed; measure again.
        const LAYOUT = 0b0000_0001;
        /// The drawn content changed; repaint.
        const PAINT  = 0b0000_0010;
    }
}

/// Offset, anchor, and mode of a picker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    scroll_offset_y: i32,
    selected_index: usize,
    current_index: usize,
    mode: ScrollState,
}

impl SelectionState {
    /// Pixel offset from the selected item's rest position.
    #[must_use]
    pub const fn scroll_offset_y(&self) -> i32 {
        self.scroll_offset_y
    }

    /// Anchor item; only changed by [`WheelPicker::select_item`] and
    /// [`WheelPicker::set_data`].
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Item at the centre row, following the offset.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// What the wheel is doing.
    #[must_use]
    pub const fn mode(&self) -> ScrollState {
        self.mode
    }
}

/// One row of the drawn window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnItem<'a> {
    /// Row relative to the centre row (negative above).
    pub row: i32,
    /// Item shown in the row; `None` past either end of a non-cyclic picker.
    pub index: Option<usize>,
    /// Label of the item, empty when `index` is `None`.
    pub label: &'a str,
    /// Baseline of the row before projection.
    pub center_y: f64,
    /// Where the label is drawn: anchor x and (projected) baseline y.
    pub origin: Point,
    /// Fixed point of the curved transform.
    pub pivot: Point,
    /// Placement on the cylinder, when curved.
    pub curve: Option<CurvedTransform>,
    /// Label opacity.
    pub alpha: u8,
}

impl DrawnItem<'_> {
    /// Transform to concatenate before drawing the label at [`DrawnItem::origin`].
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.curve.map_or(Affine::IDENTITY, |curve| {
            curve.to_affine(self.pivot, DEFAULT_CAMERA_DISTANCE)
        })
    }
}

/// A vertically scrolling, snapping, optionally cyclic item picker.
///
/// `D` schedules frame callbacks and `L` receives notifications; both
/// default to no-op implementations and are swapped in with
/// [`WheelPicker::with_driver`] and [`WheelPicker::with_listener`].
pub struct WheelPicker<V, D = ManualDriver, L = ()> {
    items: ItemStore<V>,
    to_label: Box<dyn Fn(&V) -> String>,
    config: WheelConfig,
    padding: Padding,
    text: TextMetrics,
    size: (i32, i32),
    metrics: LayoutMetrics,
    selection: SelectionState,
    motion: MotionEngine,
    gesture: GestureTracker,
    velocity: VelocityTracker,
    user_triggered: bool,
    frame_armed: bool,
    invalidation: Invalidation,
    driver: D,
    listener: L,
}

impl<V, D, L> fmt::Debug for WheelPicker<V, D, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WheelPicker")
            .field("items", &self.items)
            .field("config", &self.config)
            .field("size", &self.size)
            .field("metrics", &self.metrics)
            .field("selection", &self.selection)
            .field("user_triggered", &self.user_triggered)
            .field("frame_armed", &self.frame_armed)
            .field("invalidation", &self.invalidation)
            .finish_non_exhaustive()
    }
}

impl<V> WheelPicker<V> {
    /// Creates a picker over `items`, labelled by `to_label`, with default
    /// configuration and physics. The first item is selected.
    ///
    /// The picker is inert until it has been given a size with
    /// [`WheelPicker::on_size_changed`].
    ///
    /// # Errors
    ///
    /// [`WheelError::EmptyItems`] if `items` is empty.
    pub fn new(items: Vec<V>, to_label: impl Fn(&V) -> String + 'static) -> Result<Self> {
        let items = ItemStore::new(items, &to_label)?;
        let config = WheelConfig::default();
        let motion_config = MotionConfig::default();
        let text = TextMetrics::default();
        let padding = Padding::default();
        let metrics =
            LayoutMetrics::compute(&config, &text, items.len(), 0, 0, 0, padding);
        Ok(Self {
            items,
            to_label: Box::new(to_label),
            config,
            padding,
            text,
            size: (0, 0),
            metrics,
            selection: SelectionState::default(),
            motion: MotionEngine::new(motion_config),
            gesture: GestureTracker::new(motion_config.touch_slop),
            velocity: VelocityTracker::new(motion_config.velocity_horizon_ms),
            user_triggered: false,
            frame_armed: false,
            invalidation: Invalidation::LAYOUT | Invalidation::PAINT,
            driver: ManualDriver::default(),
            listener: (),
        })
    }
}

impl<V, D, L> WheelPicker<V, D, L> {
    /// Replaces the frame driver.
    ///
    /// A frame requested from the old driver is cancelled there and
    /// requested again from `driver`.
    pub fn with_driver<D2: AnimationDriver>(mut self, mut driver: D2) -> WheelPicker<V, D2, L>
    where
        D: AnimationDriver,
    {
        if self.frame_armed {
            self.driver.cancel();
            driver.schedule(0);
        }
        WheelPicker {
            items: self.items,
            to_label: self.to_label,
            config: self.config,
            padding: self.padding,
            text: self.text,
            size: self.size,
            metrics: self.metrics,
            selection: self.selection,
            motion: self.motion,
            gesture: self.gesture,
            velocity: self.velocity,
            user_triggered: self.user_triggered,
            frame_armed: self.frame_armed,
            invalidation: self.invalidation,
            driver,
            listener: self.listener,
        }
    }

    /// Replaces the listener.
    pub fn with_listener<L2: WheelListener<V>>(self, listener: L2) -> WheelPicker<V, D, L2> {
        WheelPicker {
            items: self.items,
            to_label: self.to_label,
            config: self.config,
            padding: self.padding,
            text: self.text,
            size: self.size,
            metrics: self.metrics,
            selection: self.selection,
            motion: self.motion,
            gesture: self.gesture,
            velocity: self.velocity,
            user_triggered: self.user_triggered,
            frame_armed: self.frame_armed,
            invalidation: self.invalidation,
            driver: self.driver,
            listener,
        }
    }

    /// All items in order.
    #[must_use]
    pub fn items(&self) -> &[V] {
        self.items.items()
    }

    /// The item store with its cached labels.
    #[must_use]
    pub const fn item_store(&self) -> &ItemStore<V> {
        &self.items
    }

    /// Current options.
    #[must_use]
    pub const fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// Current physics.
    #[must_use]
    pub const fn motion_config(&self) -> &MotionConfig {
        self.motion.config()
    }

    /// Content padding.
    #[must_use]
    pub const fn padding(&self) -> Padding {
        self.padding
    }

    /// Label dimensions from the last [`WheelPicker::measure_text`].
    #[must_use]
    pub const fn text_metrics(&self) -> &TextMetrics {
        &self.text
    }

    /// Derived geometry.
    #[must_use]
    pub const fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Offset, indices, and mode.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// See [`SelectionState::selected_index`].
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selection.selected_index
    }

    /// See [`SelectionState::current_index`].
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.selection.current_index
    }

    /// See [`SelectionState::scroll_offset_y`].
    #[must_use]
    pub const fn scroll_offset_y(&self) -> i32 {
        self.selection.scroll_offset_y
    }

    /// See [`SelectionState::mode`].
    #[must_use]
    pub const fn scroll_state(&self) -> ScrollState {
        self.selection.mode
    }

    /// The item at the centre row.
    #[must_use]
    pub fn current_item(&self) -> Option<&V> {
        self.items.get(self.selection.current_index)
    }

    /// Returns `true` while a fling, snap, or scroll-to animation runs.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.motion.is_running()
    }

    /// The frame driver.
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the frame driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The listener.
    #[must_use]
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Returns and clears the accumulated invalidation.
    pub fn take_invalidation(&mut self) -> Invalidation {
        core::mem::take(&mut self.invalidation)
    }

    /// Band of the centre row.
    #[must_use]
    pub fn current_item_rect(&self) -> Rect {
        self.metrics.current_item_rect()
    }

    /// The two indicator bars, bottom bar first.
    #[must_use]
    pub fn indicator_rects(&self) -> [Rect; 2] {
        self.metrics
            .indicator_rects(self.config.indicator.indicator_size)
    }

    /// The rows to draw this frame, top to bottom.
    ///
    /// Yields [`LayoutMetrics::drawn_item_count`] rows centred on the
    /// current offset, or nothing before the first layout.
    pub fn drawn_items(&self) -> impl Iterator<Item = DrawnItem<'_>> + '_ {
        let m = &self.metrics;
        let count = if m.is_measured() {
            m.drawn_item_count()
        } else {
            0
        };
        let height = i64::from(m.item_height().max(1));
        let offset = i64::from(self.selection.scroll_offset_y);
        let half_drawn = i64::from(to_i32(m.half_drawn_item_count()));
        let selected = i64::from(to_i32(self.selection.selected_index));
        let first = -offset / height - half_drawn + selected;
        let remainder = offset % height;
        let len = self.items.len();
        let cyclic = self.config.cyclic;
        let curved = self.config.curved;
        let atmospheric = self.config.atmospheric;
        let anchor_x = f64::from(m.drawn_center_x());
        let drawn_center_y = f64::from(m.drawn_center_y());
        let center_y = f64::from(m.center_y());
        let reach = f64::from(m.drawn_center_y() - m.top);
        let half_height = f64::from(m.half_height());

        (0..count).map(move |k| {
            let k = i64::from(to_i32(k));
            let position = first + k;
            let row = k - half_drawn;
            let index = if cyclic {
                Some(wrap_index(position, len))
            } else {
                usize::try_from(position).ok().filter(|i| *i < len)
            };
            let label = index.and_then(|i| self.items.label(i)).unwrap_or("");
            #[allow(
                clippy::cast_precision_loss,
                reason = "row positions are viewport sized"
            )]
            let row_center = drawn_center_y + (row * height + remainder) as f64;
            let distance = row_center - drawn_center_y;
            let curve = curved.then(|| CurvedTransform::project(distance, reach, half_height));
            let space = curve.map_or(0.0, |c| c.space_offset);
            let baseline = if curved {
                drawn_center_y - space
            } else {
                row_center
            };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "rows are counted in single digits"
            )]
            let row = row as i32;
            DrawnItem {
                row,
                index,
                label,
                center_y: row_center,
                origin: Point::new(anchor_x, baseline),
                pivot: Point::new(anchor_x, center_y - space),
                curve,
                alpha: if atmospheric {
                    atmospheric_alpha(distance, reach)
                } else {
                    u8::MAX
                },
            }
        })
    }
}

impl<V, D: AnimationDriver, L: WheelListener<V>> WheelPicker<V, D, L> {
    /// Applies `config` (validated) and returns the picker.
    ///
    /// # Errors
    ///
    /// As [`WheelPicker::set_config`].
    pub fn with_config(mut self, config: WheelConfig) -> Result<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    /// Applies `config` and returns the picker.
    #[must_use]
    pub fn with_motion_config(mut self, config: MotionConfig) -> Self {
        self.set_motion_config(config);
        self
    }

    /// Replaces every option at once.
    ///
    /// # Errors
    ///
    /// - [`WheelError::VisibleItemCountTooSmall`] if the visible count is below 2.
    /// - [`WheelError::MaxWidthPositionOutOfRange`] if the max-width position
    ///   does not address an item.
    ///
    /// The current options are kept on error.
    pub fn set_config(&mut self, config: WheelConfig) -> Result<()> {
        let config = config.normalized()?;
        if let Some(position) = config.max_width_position {
            self.check_position(position)?;
        }
        self.config = config;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
        Ok(())
    }

    /// Replaces the physics.
    ///
    /// A running animation continues towards the same row under the new
    /// physics.
    pub fn set_motion_config(&mut self, config: MotionConfig) {
        let target = self.motion.is_running().then(|| self.motion.final_offset());
        self.motion.set_config(config);
        if let Some(target) = target {
            self.motion.scroll_to(self.selection.scroll_offset_y, target);
        }
        self.gesture.touch_slop = config.touch_slop;
        self.velocity = VelocityTracker::new(config.velocity_horizon_ms);
    }

    /// Sets the number of fully visible rows; even values become the next odd one.
    ///
    /// # Errors
    ///
    /// [`WheelError::VisibleItemCountTooSmall`] if `count < 2`.
    pub fn set_visible_item_count(&mut self, count: usize) -> Result<()> {
        self.config.set_visible_item_count(count)?;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
        Ok(())
    }

    /// Sets the gap between rows.
    pub fn set_item_space(&mut self, space: i32) {
        self.config.item_space = space;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
    }

    /// Sets the label alignment.
    pub fn set_item_align(&mut self, align: ItemAlign) {
        self.config.item_align = align;
        self.config_changed(Invalidation::PAINT);
    }

    /// Turns index wrapping on or off.
    pub fn set_cyclic(&mut self, cyclic: bool) {
        self.config.cyclic = cyclic;
        self.config_changed(Invalidation::PAINT);
    }

    /// Turns the cylinder projection on or off.
    pub fn set_curved(&mut self, curved: bool) {
        self.config.curved = curved;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
    }

    /// Turns the edge fade on or off.
    pub fn set_atmospheric(&mut self, atmospheric: bool) {
        self.config.atmospheric = atmospheric;
        self.config_changed(Invalidation::PAINT);
    }

    /// Makes every label as wide as the first one.
    pub fn set_same_width(&mut self, same_width: bool) {
        self.config.same_width = same_width;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
    }

    /// Sets the text measured in place of the widest label.
    pub fn set_max_width_text(&mut self, text: Option<String>) {
        self.config.max_width_text = text;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
    }

    /// Sets the item measured in place of the widest label.
    ///
    /// # Errors
    ///
    /// [`WheelError::MaxWidthPositionOutOfRange`] if `position` does not
    /// address an item.
    pub fn set_max_width_position(&mut self, position: Option<usize>) -> Result<()> {
        if let Some(position) = position {
            self.check_position(position)?;
        }
        self.config.max_width_position = position;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
        Ok(())
    }

    /// Sets the indicator and curtain options.
    pub fn set_indicator(&mut self, indicator: IndicatorConfig) {
        self.config.indicator = indicator;
        self.invalidation |= Invalidation::PAINT;
    }

    /// Sets the content padding.
    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
    }

    /// Replaces the items.
    ///
    /// The item at the centre row becomes the anchor; if the old anchor or
    /// centre item is past the new end, the last item does. The offset is
    /// reset and running motion is stopped. No selection is reported.
    ///
    /// # Errors
    ///
    /// [`WheelError::EmptyItems`] if `items` is empty; the old items are kept.
    pub fn set_data(&mut self, items: Vec<V>) -> Result<()> {
        let store = ItemStore::new(items, &*self.to_label)?;
        self.user_triggered = false;
        self.stop_motion();

        let last = store.len() - 1;
        let index = if self.selection.selected_index > last || self.selection.current_index > last {
            last
        } else {
            self.selection.current_index
        };
        self.items = store;
        self.selection.selected_index = index;
        self.selection.current_index = index;
        self.set_mode(ScrollState::Idle);
        self.apply_offset(0);
        self.config_changed(Invalidation::LAYOUT | Invalidation::PAINT);
        debug!(len = self.items.len(), index, "picker: data replaced");
        Ok(())
    }

    /// Measures the labels with `measurer`, updating the text metrics.
    pub fn measure_text(&mut self, measurer: &impl TextMeasure) {
        let width = self.items.measure_max_label_width(measurer, &self.config);
        self.text = TextMetrics::new(width, measurer.font_metrics());
        self.relayout();
    }

    /// Measures the labels and resolves the picker size against the host
    /// constraints.
    pub fn measure(
        &mut self,
        measurer: &impl TextMeasure,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> (i32, i32) {
        self.measure_text(measurer);
        let size = layout::measure(width_spec, height_spec, &self.text, &self.config, self.padding);
        trace!(?size, "picker: measured");
        size
    }

    /// Lays the picker out in a `width` × `height` viewport.
    pub fn on_size_changed(&mut self, width: i32, height: i32) {
        self.size = (width, height);
        self.relayout();
        self.invalidation |= Invalidation::PAINT;
        debug!(
            width,
            height,
            item_height = self.metrics.item_height(),
            "picker: resized"
        );
    }

    /// Pointer pressed. Stops running motion; the release then re-snaps
    /// even without movement.
    pub fn on_pointer_down(&mut self, sample: MotionSample) {
        self.user_triggered = true;
        self.velocity.clear();
        self.velocity.add(sample);
        let interrupted = self.motion.is_running();
        if interrupted {
            debug!(offset = self.selection.scroll_offset_y, "picker: motion interrupted");
            self.stop_motion();
        }
        self.gesture.on_down(sample.y, interrupted);
    }

    /// Pointer moved while pressed.
    pub fn on_pointer_move(&mut self, sample: MotionSample) {
        if !self.gesture.is_pressed() {
            return;
        }
        self.velocity.add(sample);
        if let GestureMove::Drag { delta, started } = self.gesture.on_move(sample.y) {
            if started {
                self.set_mode(ScrollState::Dragging);
            }
            trace!(delta, "picker: drag");
            let offset = self.selection.scroll_offset_y.saturating_add(delta);
            self.apply_offset(offset);
        }
    }

    /// Pointer released.
    ///
    /// A press that neither dragged nor interrupted motion is a tap.
    /// Otherwise the release velocity decides between a fling and a
    /// snap-back, and the picker starts scrolling.
    pub fn on_pointer_up(&mut self, sample: MotionSample) {
        let Some(release) = self.gesture.on_up() else {
            return;
        };
        self.velocity.add(sample);
        let velocity = self
            .velocity
            .velocity(self.motion.config().max_fling_velocity);
        self.velocity.clear();

        if release.is_tap() {
            let index = self.selection.current_index;
            debug!(index, "picker: tap");
            self.listener.on_tap(index);
            return;
        }
        if !self.metrics.is_measured() {
            self.set_mode(ScrollState::Idle);
            return;
        }
        let offset = self.selection.scroll_offset_y;
        let kind = self
            .motion
            .release(offset, velocity, &self.metrics, self.config.cyclic);
        debug!(
            ?kind,
            offset,
            velocity,
            target = self.motion.final_offset(),
            "picker: released"
        );
        self.set_mode(ScrollState::Scrolling);
        self.arm(0);
    }

    /// Pointer gesture abandoned by the host. No snap is started.
    pub fn on_pointer_cancel(&mut self) {
        self.velocity.clear();
        if self.gesture.cancel().is_some() {
            trace!("picker: gesture cancelled");
            self.set_mode(ScrollState::Idle);
        }
    }

    /// Frame callback requested through the [`AnimationDriver`].
    ///
    /// Advances the running animation to `now_ms` and either requests the
    /// next frame or settles. Callbacks that were not requested, or were
    /// cancelled since, are ignored.
    pub fn on_frame(&mut self, now_ms: u64) {
        if !self.frame_armed {
            trace!(now_ms, "picker: stale frame ignored");
            return;
        }
        self.frame_armed = false;
        if let Some(offset) = self.motion.tick(now_ms) {
            trace!(now_ms, offset, "picker: frame");
            self.apply_offset(offset);
        }
        if self.motion.is_running() {
            self.arm(self.motion.config().frame_interval_ms);
        } else {
            self.settle();
        }
    }

    /// Moves `index` (clamped to the items) to the centre row.
    ///
    /// Animated selection scrolls from the current offset onto the row of
    /// `index`, the shortest way round when cyclic; it falls back to an
    /// immediate jump while other motion runs or before the first layout. An immediate jump makes `index` the new
    /// anchor and resets the offset. Neither reports a selection.
    pub fn select_item(&mut self, index: usize, animated: bool) {
        self.user_triggered = false;
        let len = self.items.len();
        let index = index.min(len - 1);

        if animated && !self.motion.is_running() && self.metrics.is_measured() {
            let offset = self.selection.scroll_offset_y;
            let target = offset_for_index(
                self.selection.selected_index,
                offset,
                index,
                self.metrics.item_height(),
                len,
                self.config.cyclic,
            );
            if target == offset {
                return;
            }
            self.motion.scroll_to(offset, target);
            debug!(index, offset, target, "picker: animated selection");
            self.set_mode(ScrollState::Scrolling);
            self.arm(0);
            return;
        }

        self.stop_motion();
        let unchanged = self.selection.selected_index == index
            && self.selection.current_index == index
            && self.selection.scroll_offset_y == 0;
        self.selection.selected_index = index;
        self.selection.current_index = index;
        self.set_mode(ScrollState::Idle);
        self.apply_offset(0);
        if !unchanged {
            self.metrics
                .update_fling_bounds(self.config.cyclic, len, index);
            self.invalidation |= Invalidation::PAINT;
            debug!(index, "picker: selected");
        }
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if self.items.contains_index(position) {
            Ok(())
        } else {
            Err(WheelError::MaxWidthPositionOutOfRange {
                position,
                len: self.items.len(),
            })
        }
    }

    fn config_changed(&mut self, invalidation: Invalidation) {
        self.relayout();
        self.invalidation |= invalidation;
    }

    fn relayout(&mut self) {
        let old_height = self.metrics.item_height();
        self.metrics = LayoutMetrics::compute(
            &self.config,
            &self.text,
            self.items.len(),
            self.selection.selected_index,
            self.size.0,
            self.size.1,
            self.padding,
        );
        let new_height = self.metrics.item_height();
        if old_height > 0 && new_height > 0 && old_height != new_height {
            self.rescale(old_height, new_height);
        } else if self.motion.is_running() {
            let target = self.motion.final_offset();
            if self.bounded(target) != target {
                self.retarget(target);
            }
        }
    }

    /// Keeps the wheel on the same rows after the item height changed.
    fn rescale(&mut self, old_height: i32, new_height: i32) {
        let scale = |offset: i32| {
            let scaled = i64::from(offset) * i64::from(new_height) / i64::from(old_height);
            i32::try_from(scaled).unwrap_or(if scaled < 0 { i32::MIN } else { i32::MAX })
        };
        let target = self.motion.is_running().then(|| scale(self.motion.final_offset()));
        self.apply_offset(scale(self.selection.scroll_offset_y));
        if let Some(target) = target {
            self.retarget(target);
        }
        debug!(old_height, new_height, offset = self.selection.scroll_offset_y, "picker: rescaled");
    }

    /// Restarts the running animation from the current offset towards
    /// `target`, kept inside the fling bounds.
    fn retarget(&mut self, target: i32) {
        let target = self.bounded(target);
        self.motion.scroll_to(self.selection.scroll_offset_y, target);
    }

    fn bounded(&self, offset: i32) -> i32 {
        if self.config.cyclic {
            offset
        } else {
            offset.clamp(self.metrics.fling_min_y(), self.metrics.fling_max_y())
        }
    }

    fn arm(&mut self, delay_ms: u64) {
        self.frame_armed = true;
        self.driver.schedule(delay_ms);
    }

    fn stop_motion(&mut self) {
        self.motion.abort();
        if self.frame_armed {
            self.frame_armed = false;
            self.driver.cancel();
        }
    }

    fn set_mode(&mut self, mode: ScrollState) {
        if self.selection.mode == mode {
            return;
        }
        self.selection.mode = mode;
        if self.user_triggered {
            self.listener.on_scroll_state_changed(mode);
        }
    }

    fn apply_offset(&mut self, offset: i32) {
        if self.selection.scroll_offset_y == offset {
            return;
        }
        self.selection.scroll_offset_y = offset;
        if let Some(index) = resolve_index(
            self.selection.selected_index,
            offset,
            self.metrics.item_height(),
            self.items.len(),
            self.config.cyclic,
        ) {
            self.selection.current_index = index;
        }
        self.invalidation |= Invalidation::PAINT;
        self.listener.on_scrolled(offset);
    }

    fn settle(&mut self) {
        let len = self.items.len();
        let position = centre_position(
            self.selection.selected_index,
            self.selection.scroll_offset_y,
            self.metrics.item_height(),
        );
        let index = if self.config.cyclic {
            wrap_index(position, len)
        } else {
            usize::try_from(position.max(0)).map_or(len - 1, |i| i.min(len - 1))
        };
        self.selection.current_index = index;
        debug!(
            index,
            offset = self.selection.scroll_offset_y,
            user_triggered = self.user_triggered,
            "picker: settled"
        );
        if self.user_triggered {
            if let Some(item) = self.items.get(index) {
                self.listener.on_item_selected(index, item);
            }
            self.listener.on_selected(index);
        }
        self.set_mode(ScrollState::Idle);
    }
}
