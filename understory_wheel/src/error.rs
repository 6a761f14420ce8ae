// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by the mutating picker APIs.

use thiserror::Error;

/// Rejected argument passed to a picker setter.
///
/// All variants are raised synchronously by the call that received the bad
/// value; the picker state is left untouched when an error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WheelError {
    /// The item list was empty.
    #[error("wheel picker items can not be empty")]
    EmptyItems,

    /// A maximum-width item position outside `0..len`.
    #[error("maximum width position must be in [0, {len}), but is {position}")]
    MaxWidthPositionOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of items in the store.
        len: usize,
    },

    /// A visible item count smaller than two.
    #[error("visible item count can not be less than 2, got {count}")]
    VisibleItemCountTooSmall {
        /// Requested count.
        count: usize,
    },
}

impl WheelError {
    /// Returns `true` for errors caused by an invalid caller-supplied argument.
    ///
    /// Every current variant is an argument error; the method exists so that
    /// callers can match on the category without listing variants.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::EmptyItems
                | Self::MaxWidthPositionOutOfRange { .. }
                | Self::VisibleItemCountTooSmall { .. }
        )
    }
}

/// Result type for picker operations.
pub type Result<T, E = WheelError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::WheelError;

    #[test]
    fn messages_name_the_offending_value() {
        let err = WheelError::MaxWidthPositionOutOfRange {
            position: 7,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "maximum width position must be in [0, 3), but is 7"
        );
        assert!(err.is_invalid_argument());

        let err = WheelError::VisibleItemCountTooSmall { count: 1 };
        assert!(err.to_string().contains("got 1"));
    }
}
