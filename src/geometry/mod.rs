//! Geometric primitives: transforms, bounds, and path geometry.

mod path;
mod transform;

pub use path::{
    Geometry, PathCommand, PathPoint, PathType, Subpath, commands_to_subpaths,
    ellipse_path_points, rectangle_path_points, subpath_to_commands,
};
pub(crate) use path::inject_into_properties;
pub use transform::{Matrix, Transform, transform_for_origin};

use crate::error::{Error, Result};
use crate::util::{fmt_number_list, parse_number_list};

/// An axis-aligned bounding box in the format's `x y height width` attribute
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometricBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GeometricBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        GeometricBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse a `GeometricBounds` attribute value.
    pub fn parse(value: &str) -> Result<Self> {
        let numbers = parse_number_list(value);
        if numbers.len() != 4 {
            return Err(Error::Geometry(format!(
                "expected 4 bounds components, got {:?}",
                value
            )));
        }
        Ok(GeometricBounds {
            x: numbers[0],
            y: numbers[1],
            height: numbers[2],
            width: numbers[3],
        })
    }

    /// Serialize back into the attribute encoding.
    pub fn to_attribute(&self) -> String {
        fmt_number_list(&[self.x, self.y, self.height, self.width])
    }
}
