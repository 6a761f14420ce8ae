// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A cyclic month wheel: drag, fling, settle, then a programmatic selection.
//!
//! The picker is driven by a fake clock and painted onto a text canvas,
//! printing a few frames of the fling.
//!
//! Run:
//! - `cargo run -p understory_wheel_demos --example wheel_fling`
//! - `RUST_LOG=understory_wheel=trace cargo run -p understory_wheel_demos --example wheel_fling`

use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_wheel::paint::{Argb, WheelStyle, paint};
use understory_wheel::{
    IndicatorConfig, ManualDriver, MeasureSpec, MotionSample, ScrollState, WheelConfig,
    WheelListener, WheelPicker,
};
use understory_wheel_demos::{FixedAdvance, TextCanvas};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Logs what the wheel reports.
#[derive(Debug, Default)]
struct Log {
    settled: Vec<&'static str>,
}

impl WheelListener<&'static str> for Log {
    fn on_scroll_state_changed(&mut self, state: ScrollState) {
        info!(?state, "scroll state");
    }

    fn on_item_selected(&mut self, index: usize, item: &&'static str) {
        info!(index, item, "selected");
        self.settled.push(item);
    }

    fn on_tap(&mut self, index: usize) {
        info!(index, "tap");
    }
}

fn print_frame(picker: &WheelPicker<&'static str, ManualDriver, Log>, style: &WheelStyle, label: &str) {
    let mut canvas = TextCanvas::default();
    paint(picker, &mut canvas, style);
    println!(
        "-- {label}: offset {}, current {:?}",
        picker.scroll_offset_y(),
        picker.current_item()
    );
    print!("{}", canvas.render(picker.current_item_rect()));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WheelConfig {
        visible_item_count: 5,
        cyclic: true,
        curved: true,
        atmospheric: true,
        indicator: IndicatorConfig {
            indicator: true,
            curtain: true,
            ..IndicatorConfig::default()
        },
        ..WheelConfig::default()
    };
    let mut picker = WheelPicker::new(MONTHS.to_vec(), |m: &&str| (*m).to_string())
        .expect("months are not empty")
        .with_listener(Log::default())
        .with_config(config)
        .expect("valid config");

    let measurer = FixedAdvance::default();
    let (width, height) = picker.measure(&measurer, MeasureSpec::Unspecified, MeasureSpec::AtMost(400));
    picker.on_size_changed(width, height);
    info!(width, height, item_height = picker.metrics().item_height(), "laid out");

    let style = WheelStyle {
        selected_item_text_color: Some(Argb(0xFF11_1111)),
        ..WheelStyle::default()
    };
    print_frame(&picker, &style, "initial");

    // A quick upward swipe: 160px in 40ms.
    let mut now = 1_000;
    picker.on_pointer_down(MotionSample::new(300.0, now));
    for step in 1..=4 {
        now += 10;
        picker.on_pointer_move(MotionSample::new(300.0 - 40.0 * f64::from(step), now));
    }
    picker.on_pointer_up(MotionSample::new(140.0, now));

    let mut frames = 0;
    while let Some(delay) = picker.driver_mut().take() {
        now += delay;
        picker.on_frame(now);
        frames += 1;
        if frames % 20 == 0 {
            print_frame(&picker, &style, &format!("frame {frames}"));
        }
    }
    print_frame(&picker, &style, "settled");

    // Programmatic selections do not report a selection.
    picker.select_item(0, true);
    while let Some(delay) = picker.driver_mut().take() {
        now += delay;
        picker.on_frame(now);
    }
    print_frame(&picker, &style, "back to January");

    info!(settled = ?picker.listener().settled, frames, "done");
}
