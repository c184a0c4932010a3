//! Affine transforms in the shear-free `{translate, scale, rotate}` model.
//!
//! The format stores every placement as a 2×3 matrix `a b c d e f`. The
//! semantic model assumes no shear: decomposing an arbitrary matrix recovers
//! scale and rotation from the columns and silently drops any skew a foreign
//! producer may have baked in (a documented limitation of the source format,
//! not corrected here).

use crate::error::{Error, Result};
use crate::util::{fmt_number_list, parse_number_list};

/// A 2×3 affine matrix `[a, b, c, d, e, f]`.
pub type Matrix = [f64; 6];

/// Semantic transform: translation, per-axis scale, rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotate: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotate: 0.0,
    };

    /// A pure translation.
    pub fn translation(x: f64, y: f64) -> Self {
        Transform {
            translate_x: x,
            translate_y: y,
            ..Transform::IDENTITY
        }
    }

    /// Compose into matrix form:
    /// `a = sx·cos θ, b = sx·sin θ, c = -sy·sin θ, d = sy·cos θ, e = tx, f = ty`.
    pub fn to_matrix(&self) -> Matrix {
        let cos = self.rotate.cos();
        let sin = self.rotate.sin();
        [
            self.scale_x * cos,
            self.scale_x * sin,
            -self.scale_y * sin,
            self.scale_y * cos,
            self.translate_x,
            self.translate_y,
        ]
    }

    /// Decompose a matrix: `sx = √(a²+b²)`, `sy = √(c²+d²)`, `θ = atan2(b, a)`.
    pub fn from_matrix(matrix: Matrix) -> Self {
        let [a, b, c, d, e, f] = matrix;
        Transform {
            translate_x: e,
            translate_y: f,
            scale_x: (a * a + b * b).sqrt(),
            scale_y: (c * c + d * d).sqrt(),
            rotate: b.atan2(a),
        }
    }

    /// Parse an `ItemTransform` attribute value. A missing attribute is the
    /// identity; a present one must be a 6-number tuple.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Transform::IDENTITY),
            Some(text) => Ok(Transform::from_matrix(parse_matrix(text)?)),
        }
    }

    /// Serialize as the matrix attribute encoding.
    pub fn to_attribute(&self) -> String {
        fmt_number_list(&self.to_matrix())
    }
}

/// Parse a 6-number matrix attribute value.
pub fn parse_matrix(value: &str) -> Result<Matrix> {
    let numbers = parse_number_list(value);
    if numbers.len() != 6 {
        return Err(Error::Geometry(format!(
            "expected 6 matrix components, got {:?}",
            value
        )));
    }
    Ok([
        numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5],
    ])
}

/// Re-express `transform` so that rotation and scale appear to pivot around
/// `pivot` instead of `origin`.
///
/// The offset between pivot and origin is rotated through the transform's
/// angle and folded back into the translation. Swapping `origin` and `pivot`
/// gives the exact inverse, which is what makes get/set-transform-at-a-pivot
/// round-trip.
pub fn transform_for_origin(transform: &Transform, origin: [f64; 2], pivot: [f64; 2]) -> Transform {
    let offset_x = pivot[0] - origin[0];
    let offset_y = pivot[1] - origin[1];

    let cos = transform.rotate.cos();
    let sin = transform.rotate.sin();
    let rotated_x = offset_x * cos - offset_y * sin;
    let rotated_y = offset_x * sin + offset_y * cos;

    Transform {
        translate_x: transform.translate_x - offset_x + rotated_x * transform.scale_x,
        translate_y: transform.translate_y - offset_y + rotated_y * transform.scale_y,
        scale_x: transform.scale_x,
        scale_y: transform.scale_y,
        rotate: transform.rotate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform::IDENTITY.to_matrix(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let t = Transform {
            translate_x: 10.0,
            translate_y: -20.0,
            scale_x: 2.0,
            scale_y: 0.5,
            rotate: 0.7,
        };
        let back = Transform::from_matrix(t.to_matrix());
        assert_close(back.translate_x, t.translate_x);
        assert_close(back.translate_y, t.translate_y);
        assert_close(back.scale_x, t.scale_x);
        assert_close(back.scale_y, t.scale_y);
        assert_close(back.rotate, t.rotate);
    }

    #[test]
    fn test_parse_missing_is_identity() {
        assert_eq!(Transform::parse(None).unwrap(), Transform::IDENTITY);
    }

    #[test]
    fn test_parse_attribute() {
        let t = Transform::parse(Some("1 0 0 1 -250 -250")).unwrap();
        assert_eq!(t.translate_x, -250.0);
        assert_eq!(t.translate_y, -250.0);
        assert_eq!(t.scale_x, 1.0);
        assert_eq!(t.rotate, 0.0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Transform::parse(Some("1 0 0 1")).is_err());
        assert!(Transform::parse(Some("a b c d e f")).is_err());
    }

    #[test]
    fn test_transform_for_origin_swap_is_inverse() {
        let t = Transform {
            translate_x: 5.0,
            translate_y: 7.0,
            scale_x: 1.5,
            scale_y: 2.0,
            rotate: 0.3,
        };
        let pivot = [60.0, -40.0];
        let there = transform_for_origin(&t, [0.0, 0.0], pivot);
        let back = transform_for_origin(&there, pivot, [0.0, 0.0]);
        assert_close(back.translate_x, t.translate_x);
        assert_close(back.translate_y, t.translate_y);
    }

    #[test]
    fn test_transform_for_origin_same_point_is_noop() {
        let t = Transform {
            translate_x: 1.0,
            translate_y: 2.0,
            scale_x: 3.0,
            scale_y: 4.0,
            rotate: 1.0,
        };
        let moved = transform_for_origin(&t, [9.0, 9.0], [9.0, 9.0]);
        assert_eq!(moved, t);
    }

    proptest! {
        #[test]
        fn prop_matrix_roundtrip(
            tx in -1000.0..1000.0f64,
            ty in -1000.0..1000.0f64,
            sx in 0.01..100.0f64,
            sy in 0.01..100.0f64,
            rot in -3.1..3.1f64,
        ) {
            let t = Transform { translate_x: tx, translate_y: ty, scale_x: sx, scale_y: sy, rotate: rot };
            let back = Transform::from_matrix(t.to_matrix());
            prop_assert!((back.scale_x - sx).abs() < 1e-6);
            prop_assert!((back.scale_y - sy).abs() < 1e-6);
            prop_assert!((back.rotate - rot).abs() < 1e-6);
        }

        #[test]
        fn prop_origin_swap_roundtrip(
            tx in -1000.0..1000.0f64,
            ty in -1000.0..1000.0f64,
            sx in 0.1..10.0f64,
            rot in -3.1..3.1f64,
            px in -500.0..500.0f64,
            py in -500.0..500.0f64,
        ) {
            let t = Transform { translate_x: tx, translate_y: ty, scale_x: sx, scale_y: sx, rotate: rot };
            let origin = [0.0, 0.0];
            let pivot = [px, py];
            let back = transform_for_origin(&transform_for_origin(&t, origin, pivot), pivot, origin);
            prop_assert!((back.translate_x - tx).abs() < 1e-6);
            prop_assert!((back.translate_y - ty).abs() < 1e-6);
        }
    }
}
