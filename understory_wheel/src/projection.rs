// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curved (cylinder) projection and atmospheric fade.
//!
//! Rows are placed on a cylinder whose radius is half the content height.
//! A row `distance` pixels from the centre row is rotated by up to ±90°
//! around the horizontal axis, pushed back by the depth the rotation adds,
//! and moved vertically to where the rotated row is seen.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// Distance from the eye to the projection plane, in pixels.
pub const DEFAULT_CAMERA_DISTANCE: f64 = 576.0;

/// Rotation in degrees of a row `distance` pixels below (positive) or
/// above (negative) the centre, for a fade-out `reach`.
///
/// Rows further than `reach` are clamped to ±90°. Rows below the centre
/// rotate by negative angles.
#[must_use]
pub fn rotation_degrees(distance: f64, reach: f64) -> f64 {
    if reach <= 0.0 || distance == 0.0 {
        return 0.0;
    }
    let ratio = (reach - distance.abs()) / reach;
    (-(1.0 - ratio) * 90.0 * distance.signum()).clamp(-90.0, 90.0)
}

/// Vertical displacement of a row rotated by `degrees`, towards smaller y
/// for positive angles.
#[must_use]
pub fn space_offset(degrees: f64, half_height: f64) -> f64 {
    degrees.to_radians().sin() * half_height
}

/// How far a row rotated by `degrees` recedes from the viewer.
#[must_use]
pub fn depth_offset(degrees: f64, half_height: f64) -> f64 {
    half_height - degrees.to_radians().cos() * half_height
}

/// Opacity of a row `distance` pixels from the centre: opaque at the
/// centre, transparent at `reach` and beyond.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to the u8 range"
)]
pub fn atmospheric_alpha(distance: f64, reach: f64) -> u8 {
    if reach <= 0.0 {
        return u8::MAX;
    }
    ((reach - distance.abs()) / reach * 255.0).clamp(0.0, 255.0) as u8
}

/// Placement of one row on the cylinder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvedTransform {
    /// Rotation around the horizontal axis, in degrees.
    pub degrees: f64,
    /// Vertical displacement of the row; subtract from the centre baseline.
    pub space_offset: f64,
    /// Depth the row is pushed back by.
    pub depth_offset: f64,
}

impl CurvedTransform {
    /// Projects a row `distance` pixels from the centre.
    #[must_use]
    pub fn project(distance: f64, reach: f64, half_height: f64) -> Self {
        let degrees = rotation_degrees(distance, reach);
        Self {
            degrees,
            space_offset: space_offset(degrees, half_height),
            depth_offset: depth_offset(degrees, half_height),
        }
    }

    /// 2D approximation of the perspective rotation around `pivot`.
    ///
    /// The row is foreshortened vertically by the cosine of its angle and
    /// shrunk by the perspective ratio of its depth.
    #[must_use]
    pub fn to_affine(&self, pivot: Point, camera_distance: f64) -> Affine {
        let perspective = if camera_distance > 0.0 {
            camera_distance / (camera_distance + self.depth_offset.max(0.0))
        } else {
            1.0
        };
        let foreshorten = self.degrees.to_radians().cos().max(0.0);
        let to_origin = Vec2::new(-pivot.x, -pivot.y);
        Affine::translate(pivot.to_vec2())
            * Affine::scale_non_uniform(perspective, perspective * foreshorten)
            * Affine::translate(to_origin)
    }
}
