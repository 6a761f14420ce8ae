// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_wheel --heading-base-level=0

//! Understory Wheel: a renderer-agnostic wheel picker engine.
//!
//! A wheel picker is a vertical list of items that snaps to whole rows,
//! optionally wraps around (cyclic), keeps moving after a fast release
//! (fling), and can be drawn on a cylinder (curved). This crate holds the
//! engine: gesture handling, fling and snap physics, index resolution, and
//! the per-row geometry a renderer needs. It draws nothing and owns no
//! event loop.
//!
//! The core pieces are:
//!
//! - [`WheelPicker`]: the selection state machine. Feed it pointer samples,
//!   frame callbacks, and the viewport size.
//! - [`AnimationDriver`]: how the picker asks the host for the next frame.
//!   [`ManualDriver`] records the request for hosts that poll.
//! - [`WheelListener`]: scroll, selection, state, and tap notifications.
//!   A `Vec<WheelEvent>` records them.
//! - [`TextMeasure`]: label and font measurement supplied by the host.
//! - [`paint::paint`]: walks the drawn rows and issues commands to a
//!   [`paint::WheelCanvas`].
//!
//! Lower-level building blocks are public too: the deterministic
//! [`scroller::Scroller`], the fling/snap policy in [`motion`], the pure
//! cylinder math in [`projection`], and the tap/drag recognizer in
//! [`gesture`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_wheel::{
//!     FontMetrics, MotionSample, ScrollState, TextMeasure, WheelConfig, WheelEvent, WheelPicker,
//! };
//!
//! struct Monospace;
//!
//! impl TextMeasure for Monospace {
//!     fn text_width(&self, text: &str) -> f64 {
//!         8.0 * text.chars().count() as f64
//!     }
//!     fn font_metrics(&self) -> FontMetrics {
//!         FontMetrics { top: -12.0, ascent: -10.0, descent: 3.0, bottom: 4.0 }
//!     }
//! }
//!
//! let config = WheelConfig { visible_item_count: 5, ..WheelConfig::default() };
//! let mut picker = WheelPicker::new(vec!["mon", "tue", "wed", "thu", "fri"], |d| d.to_string())
//!     .unwrap()
//!     .with_listener(Vec::<WheelEvent>::new())
//!     .with_config(config)
//!     .unwrap();
//! picker.measure_text(&Monospace);
//! picker.on_size_changed(120, 200);
//! assert_eq!(picker.metrics().item_height(), 40);
//!
//! // Drag up by one and a bit rows, pause, then let go.
//! picker.on_pointer_down(MotionSample::new(150.0, 0));
//! picker.on_pointer_move(MotionSample::new(100.0, 500));
//! picker.on_pointer_up(MotionSample::new(100.0, 1000));
//! assert_eq!(picker.scroll_state(), ScrollState::Scrolling);
//!
//! // Run the requested frames until the wheel settles.
//! let mut now = 1000;
//! while let Some(delay) = picker.driver_mut().take() {
//!     now += delay;
//!     picker.on_frame(now);
//! }
//! assert_eq!(picker.scroll_offset_y(), -40);
//! assert_eq!(picker.current_item(), Some(&"tue"));
//! assert!(picker.listener().contains(&WheelEvent::Selected(1)));
//! ```
//!
//! ## Threading
//!
//! Everything happens on the caller's thread. At most one animation drives
//! the offset; starting another, pressing the wheel, or selecting without
//! animation cancels the pending frame request first.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` on the configuration and style types.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod driver;
mod error;
mod items;
mod layout;
mod listener;
mod picker;
mod velocity;

pub mod gesture;
pub mod motion;
pub mod paint;
pub mod projection;
pub mod scroller;

pub use config::{IndicatorConfig, ItemAlign, MotionConfig, WheelConfig};
pub use driver::{AnimationDriver, ManualDriver};
pub use error::{Result, WheelError};
pub use items::{FontMetrics, ItemStore, TextMeasure};
pub use layout::{LayoutMetrics, MeasureSpec, Padding, TextMetrics, measure, preferred_size};
pub use listener::{ScrollState, WheelEvent, WheelListener};
pub use picker::{DrawnItem, Invalidation, SelectionState, WheelPicker};
pub use velocity::{MAX_SAMPLES, MotionSample, VelocityTracker};
