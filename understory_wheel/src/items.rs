// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item storage and label measurement.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::WheelConfig;
use crate::error::{Result, WheelError};

/// Vertical font metrics in baseline-relative pixels (y grows downwards).
///
/// `top` and `ascent` are usually negative, `descent` and `bottom` positive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Highest extent of any glyph above the baseline.
    pub top: f64,
    /// Recommended distance above the baseline.
    pub ascent: f64,
    /// Recommended distance below the baseline.
    pub descent: f64,
    /// Lowest extent of any glyph below the baseline.
    pub bottom: f64,
}

impl FontMetrics {
    /// Height reserved for one line of text.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Offset from a row's vertical centre to the baseline that centres the text.
    #[must_use]
    pub fn baseline_shift(&self) -> f64 {
        -(self.ascent + self.descent) / 2.0
    }
}

/// Text measurement supplied by the rendering surface.
pub trait TextMeasure {
    /// Advance width of `text` in pixels.
    fn text_width(&self, text: &str) -> f64;

    /// Metrics of the font labels are drawn with.
    fn font_metrics(&self) -> FontMetrics;
}

/// Ordered, non-empty picker items with their cached labels.
pub struct ItemStore<V> {
    items: Vec<V>,
    labels: Vec<String>,
}

impl<V> core::fmt::Debug for ItemStore<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemStore")
            .field("len", &self.items.len())
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl<V> ItemStore<V> {
    /// Creates a store, rendering every item once with `to_label`.
    ///
    /// # Errors
    ///
    /// [`WheelError::EmptyItems`] if `items` is empty.
    pub fn new(items: Vec<V>, to_label: &dyn Fn(&V) -> String) -> Result<Self> {
        if items.is_empty() {
            return Err(WheelError::EmptyItems);
        }
        let labels = items.iter().map(to_label).collect();
        Ok(Self { items, labels })
    }

    /// Number of items; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: a store can not be built empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if `index` addresses an item.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.items.len()
    }

    /// The item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&V> {
        self.items.get(index)
    }

    /// The cached label of the item at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// All items in order.
    #[must_use]
    pub fn items(&self) -> &[V] {
        &self.items
    }

    /// All labels in item order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Width of the widest label, or of its configured stand-in.
    ///
    /// Shortcuts are consulted in order: `same_width` measures the first
    /// label, an in-range `max_width_position` measures that label, a
    /// non-empty `max_width_text` measures that text. Only when none applies
    /// is every label measured.
    pub fn measure_max_label_width(&self, measurer: &impl TextMeasure, config: &WheelConfig) -> f64 {
        if config.same_width {
            return measurer.text_width(&self.labels[0]);
        }
        if let Some(label) = config.max_width_position.and_then(|i| self.label(i)) {
            return measurer.text_width(label);
        }
        if let Some(text) = config.max_width_text.as_deref().filter(|t| !t.is_empty()) {
            return measurer.text_width(text);
        }
        self.labels
            .iter()
            .map(|label| measurer.text_width(label))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::string::ToString;
    use alloc::{format, vec};
    use core::cell::Cell;

    use super::*;

    /// Fixed advance per character; counts calls so shortcuts are observable.
    #[derive(Debug, Default)]
    pub(crate) struct CountingMeasure {
        pub(crate) calls: Cell<usize>,
    }

    impl TextMeasure for CountingMeasure {
        fn text_width(&self, text: &str) -> f64 {
            self.calls.set(self.calls.get() + 1);
            10.0 * text.chars().count() as f64
        }

        fn font_metrics(&self) -> FontMetrics {
            FontMetrics {
                top: -16.0,
                ascent: -14.0,
                descent: 4.0,
                bottom: 6.0,
            }
        }
    }

    fn store() -> ItemStore<&'static str> {
        ItemStore::new(vec!["ciao", "pippo", "luca"], &|s: &&str| (*s).to_string()).unwrap()
    }

    #[test]
    fn empty_items_are_rejected() {
        let err = ItemStore::<u8>::new(Vec::new(), &|v: &u8| v.to_string()).unwrap_err();
        assert_eq!(err, WheelError::EmptyItems);
    }

    #[test]
    fn labels_are_cached_in_order() {
        let store = ItemStore::new(vec![3_u32, 10, 200], &|v: &u32| format!("#{v}")).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.label(1), Some("#10"));
        assert_eq!(store.get(2), Some(&200));
        assert_eq!(store.label(3), None);
    }

    #[test]
    fn full_scan_finds_widest_label() {
        let measure = CountingMeasure::default();
        let width = store().measure_max_label_width(&measure, &WheelConfig::default());
        assert_eq!(width, 50.0);
        assert_eq!(measure.calls.get(), 3, "every label measured");
    }

    #[test]
    fn shortcuts_follow_priority_order() {
        let store = store();
        let measure = CountingMeasure::default();

        let config = WheelConfig {
            same_width: true,
            max_width_position: Some(1),
            max_width_text: Some("wide wide".into()),
            ..WheelConfig::default()
        };
        assert_eq!(store.measure_max_label_width(&measure, &config), 40.0);
        assert_eq!(measure.calls.get(), 1);

        let config = WheelConfig {
            max_width_position: Some(1),
            max_width_text: Some("wide wide".into()),
            ..WheelConfig::default()
        };
        assert_eq!(store.measure_max_label_width(&measure, &config), 50.0);

        let config = WheelConfig {
            max_width_position: Some(9),
            max_width_text: Some("wide wide".into()),
            ..WheelConfig::default()
        };
        assert_eq!(
            store.measure_max_label_width(&measure, &config),
            90.0,
            "out-of-range position falls through to the text"
        );

        let config = WheelConfig {
            max_width_text: Some(String::new()),
            ..WheelConfig::default()
        };
        assert_eq!(store.measure_max_label_width(&measure, &config), 50.0);
    }
}
