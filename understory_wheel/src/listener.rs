// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications emitted by a picker.
//!
//! Hosts either implement [`WheelListener`] directly, or use a
//! `Vec<WheelEvent>` as the listener and drain it after each input.

use alloc::vec::Vec;

/// What the wheel is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollState {
    /// At rest on a row.
    #[default]
    Idle,
    /// Following the pointer.
    Dragging,
    /// Animating after a release or a programmatic selection.
    Scrolling,
}

/// Receiver of picker notifications. Every method defaults to doing nothing.
///
/// Selection and state notifications are only sent for motion the user
/// caused; programmatic moves report offsets through
/// [`WheelListener::on_scrolled`] alone.
pub trait WheelListener<V> {
    /// The scroll offset changed to `offset`.
    fn on_scrolled(&mut self, offset: i32) {
        let _ = offset;
    }

    /// The wheel settled on `index`.
    fn on_selected(&mut self, index: usize) {
        let _ = index;
    }

    /// The scroll state changed.
    fn on_scroll_state_changed(&mut self, state: ScrollState) {
        let _ = state;
    }

    /// The wheel settled on `item`, found at `index`.
    fn on_item_selected(&mut self, index: usize, item: &V) {
        let _ = (index, item);
    }

    /// A press was released without dragging or interrupting an animation.
    fn on_tap(&mut self, index: usize) {
        let _ = index;
    }
}

impl<V> WheelListener<V> for () {}

/// A recorded notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WheelEvent {
    /// See [`WheelListener::on_scrolled`].
    Scrolled(i32),
    /// See [`WheelListener::on_selected`].
    Selected(usize),
    /// See [`WheelListener::on_scroll_state_changed`].
    StateChanged(ScrollState),
    /// See [`WheelListener::on_item_selected`].
    ItemSelected(usize),
    /// See [`WheelListener::on_tap`].
    Tap(usize),
}

impl<V> WheelListener<V> for Vec<WheelEvent> {
    fn on_scrolled(&mut self, offset: i32) {
        self.push(WheelEvent::Scrolled(offset));
    }

    fn on_selected(&mut self, index: usize) {
        self.push(WheelEvent::Selected(index));
    }

    fn on_scroll_state_changed(&mut self, state: ScrollState) {
        self.push(WheelEvent::StateChanged(state));
    }

    fn on_item_selected(&mut self, index: usize, _item: &V) {
        self.push(WheelEvent::ItemSelected(index));
    }

    fn on_tap(&mut self, index: usize) {
        self.push(WheelEvent::Tap(index));
    }
}
