//! Path geometry: conversion between flat drawing commands and the format's
//! anchor-plus-two-handle point model, plus ellipse/rectangle synthesis.

use std::f64::consts::PI;

use super::GeometricBounds;
use crate::error::{Error, Result};
use crate::util::{fmt_number_list, parse_bool, parse_number_list};
use crate::xml::{Element, Node};

/// Handle offset factor for the 4-Bézier circle approximation.
const ELLIPSE_CONTROL_OFFSET: f64 = 0.5523;

/// One vertex of a path. The curve passes through `anchor`;
/// `left_direction`/`right_direction` are Bézier handle *positions* (not
/// deltas) for the incoming and outgoing segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub anchor: [f64; 2],
    pub left_direction: [f64; 2],
    pub right_direction: [f64; 2],
}

impl PathPoint {
    /// A corner point: both handles collapsed onto the anchor.
    pub fn corner(point: [f64; 2]) -> Self {
        PathPoint {
            anchor: point,
            left_direction: point,
            right_direction: point,
        }
    }
}

/// An ordered run of path points plus an open/closed flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub points: Vec<PathPoint>,
    pub open: bool,
}

/// The role a geometry plays on its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathType {
    #[default]
    Normal,
    Clipping,
    Text,
    Motion,
    Guide,
}

impl PathType {
    pub fn name(self) -> &'static str {
        match self {
            PathType::Normal => "NormalPath",
            PathType::Clipping => "ClippingPath",
            PathType::Text => "TextPath",
            PathType::Motion => "MotionPath",
            PathType::Guide => "GuidePath",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NormalPath" => Some(PathType::Normal),
            "ClippingPath" => Some(PathType::Clipping),
            "TextPath" => Some(PathType::Text),
            "MotionPath" => Some(PathType::Motion),
            "GuidePath" => Some(PathType::Guide),
            _ => None,
        }
    }
}

/// A full path geometry: ordered subpaths plus a path role.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub path_type: PathType,
    pub subpaths: Vec<Subpath>,
}

/// A flat drawing command.
///
/// `QuadTo` and `ArcTo` exist for external producers; both are degree-elevated
/// to cubic form on entry into the point model (one-directional: the point
/// model only ever emits lines and cubics back out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    QuadTo {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

/// Convert a flat command list into subpaths. A `MoveTo` starts a new
/// subpath; a `Close` terminates the current one and clears its `open` flag.
pub fn commands_to_subpaths(commands: &[PathCommand]) -> Vec<Subpath> {
    let commands = normalize_commands(commands);

    let mut chunks: Vec<Vec<PathCommand>> = Vec::new();
    for command in commands {
        let start_new = matches!(command, PathCommand::MoveTo { .. }) || chunks.is_empty();
        if start_new {
            chunks.push(Vec::new());
        }
        chunks.last_mut().unwrap().push(command);
    }

    chunks
        .iter()
        .map(|chunk| chunk_to_subpath(chunk))
        .filter(|subpath| !subpath.points.is_empty())
        .collect()
}

fn chunk_to_subpath(commands: &[PathCommand]) -> Subpath {
    let mut open = true;
    let mut points = Vec::new();

    for (i, command) in commands.iter().enumerate() {
        // The outgoing handle belongs to the *next* segment: it coincides
        // with the anchor unless the following command is a curve.
        let right = |x: f64, y: f64| match commands.get(i + 1) {
            Some(PathCommand::CurveTo { x1, y1, .. }) => [*x1, *y1],
            _ => [x, y],
        };

        match *command {
            PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                points.push(PathPoint {
                    anchor: [x, y],
                    left_direction: [x, y],
                    right_direction: right(x, y),
                });
            }
            PathCommand::CurveTo { x2, y2, x, y, .. } => {
                points.push(PathPoint {
                    anchor: [x, y],
                    left_direction: [x2, y2],
                    right_direction: right(x, y),
                });
            }
            PathCommand::Close => open = false,
            // Removed by normalize_commands
            PathCommand::QuadTo { .. } | PathCommand::ArcTo { .. } => unreachable!(),
        }
    }

    Subpath { points, open }
}

/// Convert a subpath back into flat commands: a straight segment where both
/// relevant handles coincide with their anchors, a cubic curve otherwise.
pub fn subpath_to_commands(subpath: &Subpath) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let Some(first) = subpath.points.first() else {
        return commands;
    };

    commands.push(PathCommand::MoveTo {
        x: first.anchor[0],
        y: first.anchor[1],
    });

    for pair in subpath.points.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        if is_line_segment(prev, current) {
            commands.push(PathCommand::LineTo {
                x: current.anchor[0],
                y: current.anchor[1],
            });
        } else {
            commands.push(PathCommand::CurveTo {
                x1: prev.right_direction[0],
                y1: prev.right_direction[1],
                x2: current.left_direction[0],
                y2: current.left_direction[1],
                x: current.anchor[0],
                y: current.anchor[1],
            });
        }
    }

    if !subpath.open {
        commands.push(PathCommand::Close);
    }

    commands
}

fn is_line_segment(start: &PathPoint, end: &PathPoint) -> bool {
    start.right_direction == start.anchor && end.left_direction == end.anchor
}

/// Path points for an ellipse inscribed in the box at `(x, y)` with the
/// given radii: 4 anchors at the cardinal positions, handles offset
/// `0.5523 × radius` along the tangent.
pub fn ellipse_path_points(x: f64, y: f64, radius_x: f64, radius_y: f64) -> Vec<PathPoint> {
    let center_x = x + radius_x;
    let center_y = y + radius_y;
    let offset_x = ELLIPSE_CONTROL_OFFSET * radius_x;
    let offset_y = ELLIPSE_CONTROL_OFFSET * radius_y;

    vec![
        // Top
        PathPoint {
            anchor: [center_x, center_y - radius_y],
            left_direction: [center_x - offset_x, center_y - radius_y],
            right_direction: [center_x + offset_x, center_y - radius_y],
        },
        // Right
        PathPoint {
            anchor: [center_x + radius_x, center_y],
            left_direction: [center_x + radius_x, center_y - offset_y],
            right_direction: [center_x + radius_x, center_y + offset_y],
        },
        // Bottom
        PathPoint {
            anchor: [center_x, center_y + radius_y],
            left_direction: [center_x + offset_x, center_y + radius_y],
            right_direction: [center_x - offset_x, center_y + radius_y],
        },
        // Left
        PathPoint {
            anchor: [center_x - radius_x, center_y],
            left_direction: [center_x - radius_x, center_y + offset_y],
            right_direction: [center_x - radius_x, center_y - offset_y],
        },
    ]
}

/// Path points for an axis-aligned rectangle: 4 corner points with all
/// handles collapsed (pure straight edges).
pub fn rectangle_path_points(x: f64, y: f64, width: f64, height: f64) -> Vec<PathPoint> {
    [
        [x, y],
        [x + width, y],
        [x + width, y + height],
        [x, y + height],
    ]
    .into_iter()
    .map(PathPoint::corner)
    .collect()
}

impl Geometry {
    /// A closed normal-path geometry from a single point run.
    pub fn closed(points: Vec<PathPoint>) -> Self {
        Geometry {
            path_type: PathType::Normal,
            subpaths: vec![Subpath {
                points,
                open: false,
            }],
        }
    }

    /// Bounding box over all anchor coordinates (handles are ignored,
    /// matching the format's own definition).
    pub fn bounds(&self) -> Option<GeometricBounds> {
        let anchors = self
            .subpaths
            .iter()
            .flat_map(|subpath| subpath.points.iter().map(|p| p.anchor));

        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        let mut any = false;
        for [x, y] in anchors {
            any = true;
            min[0] = min[0].min(x);
            min[1] = min[1].min(y);
            max[0] = max[0].max(x);
            max[1] = max[1].max(y);
        }
        if !any {
            return None;
        }
        Some(GeometricBounds::new(
            min[0],
            min[1],
            max[0] - min[0],
            max[1] - min[1],
        ))
    }

    /// Parse the `Properties > PathGeometry` block of a shape element.
    pub fn parse_from_shape(element: &Element) -> Result<Self> {
        let path_geometry = element
            .first_child("Properties")
            .and_then(|props| props.first_child("PathGeometry"))
            .ok_or_else(|| Error::MissingElement(format!("{}/PathGeometry", element.tag)))?;

        let mut path_type = PathType::Normal;
        let mut subpaths = Vec::new();

        for (i, geometry_type) in path_geometry
            .children_named("GeometryPathType")
            .enumerate()
        {
            if i == 0
                && let Some(name) = geometry_type.attr("GeometryPathType")
            {
                path_type = PathType::from_name(name).unwrap_or_default();
            }
            let open = parse_bool(geometry_type.attr("PathOpen"), false);

            let point_array = geometry_type
                .first_child("PathPointArray")
                .ok_or_else(|| Error::MissingElement("PathPointArray".into()))?;

            let points = point_array
                .children_named("PathPointType")
                .map(parse_path_point)
                .collect::<Result<Vec<_>>>()?;

            subpaths.push(Subpath { points, open });
        }

        if subpaths.is_empty() {
            return Err(Error::MissingElement("GeometryPathType".into()));
        }

        Ok(Geometry {
            path_type,
            subpaths,
        })
    }

    /// Serialize back into a `PathGeometry` element.
    pub fn to_element(&self) -> Element {
        let mut path_geometry = Element::new("PathGeometry");
        for subpath in &self.subpaths {
            let mut geometry_type = Element::new("GeometryPathType");
            geometry_type.set_attr("GeometryPathType", self.path_type.name());
            geometry_type.set_attr("PathOpen", subpath.open.to_string());

            let mut point_array = Element::new("PathPointArray");
            for point in &subpath.points {
                let mut point_element = Element::new("PathPointType");
                point_element.set_attr("Anchor", fmt_number_list(&point.anchor));
                point_element.set_attr("LeftDirection", fmt_number_list(&point.left_direction));
                point_element.set_attr("RightDirection", fmt_number_list(&point.right_direction));
                point_array.push_element(point_element);
            }
            geometry_type.push_element(point_array);
            path_geometry.push_element(geometry_type);
        }
        path_geometry
    }
}

/// Insert `child` into the shape element's `Properties` group, creating the
/// group at the front if the patcher did not emit one.
pub(crate) fn inject_into_properties(shape: &mut Element, child: Element) {
    match shape.first_child_mut("Properties") {
        Some(properties) => properties.push_element(child),
        None => {
            let mut properties = Element::new("Properties");
            properties.push_element(child);
            shape.children.insert(0, Node::Element(properties));
        }
    }
}

fn parse_path_point(element: &Element) -> Result<PathPoint> {
    let coords = |name: &str| -> Result<[f64; 2]> {
        let raw = element.attr(name).unwrap_or("0 0");
        let numbers = parse_number_list(raw);
        if numbers.len() != 2 {
            return Err(Error::Geometry(format!("bad {} coordinate: {:?}", name, raw)));
        }
        Ok([numbers[0], numbers[1]])
    };
    let anchor = coords("Anchor")?;
    Ok(PathPoint {
        anchor,
        left_direction: element.attr("LeftDirection").map_or(Ok(anchor), |_| coords("LeftDirection"))?,
        right_direction: element.attr("RightDirection").map_or(Ok(anchor), |_| coords("RightDirection"))?,
    })
}

/// Replace quadratic and arc commands with their cubic equivalents.
fn normalize_commands(commands: &[PathCommand]) -> Vec<PathCommand> {
    let mut out = Vec::with_capacity(commands.len());
    let mut cursor = [0.0f64; 2];
    let mut start = [0.0f64; 2];

    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } => {
                cursor = [x, y];
                start = [x, y];
                out.push(*command);
            }
            PathCommand::LineTo { x, y } | PathCommand::CurveTo { x, y, .. } => {
                cursor = [x, y];
                out.push(*command);
            }
            PathCommand::QuadTo { x1, y1, x, y } => {
                out.push(quad_to_cubic(cursor[0], cursor[1], x1, y1, x, y));
                cursor = [x, y];
            }
            PathCommand::ArcTo {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                out.extend(arc_to_cubics(
                    cursor[0],
                    cursor[1],
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                ));
                cursor = [x, y];
            }
            PathCommand::Close => {
                cursor = start;
                out.push(*command);
            }
        }
    }
    out
}

/// Degree-elevate a quadratic Bézier: `c1 = p0 + 2/3(q - p0)`,
/// `c2 = p1 + 2/3(q - p1)`.
fn quad_to_cubic(x0: f64, y0: f64, qx: f64, qy: f64, x: f64, y: f64) -> PathCommand {
    PathCommand::CurveTo {
        x1: x0 + (2.0 / 3.0) * (qx - x0),
        y1: y0 + (2.0 / 3.0) * (qy - y0),
        x2: x + (2.0 / 3.0) * (qx - x),
        y2: y + (2.0 / 3.0) * (qy - y),
        x,
        y,
    }
}

/// Elliptical arc -> sequence of cubic Béziers, via the SVG implementation
/// notes' center parameterization, split into segments of at most 90°.
#[allow(clippy::too_many_arguments)]
fn arc_to_cubics(
    x0: f64,
    y0: f64,
    rx_in: f64,
    ry_in: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    x1: f64,
    y1: f64,
) -> Vec<PathCommand> {
    let mut rx = rx_in.abs();
    let mut ry = ry_in.abs();
    if rx == 0.0 || ry == 0.0 || (x0 == x1 && y0 == y1) {
        return vec![PathCommand::LineTo { x: x1, y: y1 }];
    }

    let phi = x_axis_rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Step 1: compute (x1', y1')
    let dx2 = (x0 - x1) / 2.0;
    let dy2 = (y0 - y1) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Step 2: ensure radii are large enough
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    // Step 3: compute center (cx', cy')
    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let num = rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2;
    let den = rx2 * y1p2 + ry2 * x1p2;
    let mut coef = 0.0;
    if den != 0.0 {
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        coef = sign * (num / den).max(0.0).sqrt();
    }
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    // Step 4: compute center (cx, cy)
    let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x1) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y1) / 2.0;

    // Step 5: compute angles
    fn angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
        let dot = ux * vx + uy * vy;
        let det = ux * vy - uy * vx;
        det.atan2(dot)
    }

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let mut theta1 = angle(1.0, 0.0, ux, uy);
    let mut dtheta = angle(ux, uy, vx, vy);

    if !sweep && dtheta > 0.0 {
        dtheta -= 2.0 * PI;
    } else if sweep && dtheta < 0.0 {
        dtheta += 2.0 * PI;
    }

    // Split into <= 90 degree segments.
    let segment_count = ((dtheta.abs() / (PI / 2.0)).ceil()).max(1.0) as i32;
    let delta = dtheta / segment_count as f64;

    let mut out = Vec::with_capacity(segment_count as usize);
    for _ in 0..segment_count {
        out.push(arc_segment_to_cubic(
            cx,
            cy,
            rx,
            ry,
            sin_phi,
            cos_phi,
            theta1,
            theta1 + delta,
        ));
        theta1 += delta;
    }
    out
}

/// Convert an ellipse arc segment t1..t2 into a cubic Bézier.
#[allow(clippy::too_many_arguments)]
fn arc_segment_to_cubic(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    sin_phi: f64,
    cos_phi: f64,
    t1: f64,
    t2: f64,
) -> PathCommand {
    let dt = t2 - t1;
    let k = (4.0 / 3.0) * (dt / 4.0).tan();

    let (s1, c1) = t1.sin_cos();
    let (s2, c2) = t2.sin_cos();

    // Unit circle control points
    let p1 = (c1 - k * s1, s1 + k * c1);
    let p2 = (c2 + k * s2, s2 - k * c2);
    let p3 = (c2, s2);

    // Map unit circle -> ellipse -> rotate -> translate.
    let map = |x: f64, y: f64| -> (f64, f64) {
        let x = rx * x;
        let y = ry * y;
        (
            cx + cos_phi * x - sin_phi * y,
            cy + sin_phi * x + cos_phi * y,
        )
    };

    let (x1, y1) = map(p1.0, p1.1);
    let (x2, y2) = map(p2.0, p2.1);
    let (x, y) = map(p3.0, p3.1);
    PathCommand::CurveTo {
        x1,
        y1,
        x2,
        y2,
        x,
        y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_commands_roundtrip_without_curves() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 100.0, y: 0.0 },
            PathCommand::LineTo { x: 100.0, y: 50.0 },
            PathCommand::Close,
        ];
        let subpaths = commands_to_subpaths(&commands);
        assert_eq!(subpaths.len(), 1);
        assert!(!subpaths[0].open);

        let back = subpath_to_commands(&subpaths[0]);
        assert_eq!(back, commands);
        assert!(!back.iter().any(|c| matches!(c, PathCommand::CurveTo { .. })));
    }

    #[test]
    fn test_curve_control_points_roundtrip_exactly() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::CurveTo {
                x1: 10.0,
                y1: 20.0,
                x2: 30.0,
                y2: 40.0,
                x: 50.0,
                y: 0.0,
            },
            PathCommand::LineTo { x: 60.0, y: 10.0 },
        ];
        let subpaths = commands_to_subpaths(&commands);
        assert!(subpaths[0].open);
        // The move point's outgoing handle took the first control point
        assert_eq!(subpaths[0].points[0].right_direction, [10.0, 20.0]);
        assert_eq!(subpaths[0].points[1].left_direction, [30.0, 40.0]);

        let back = subpath_to_commands(&subpaths[0]);
        assert_eq!(back, commands);
    }

    #[test]
    fn test_multiple_subpaths_split_on_move() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
            PathCommand::Close,
            PathCommand::MoveTo { x: 50.0, y: 50.0 },
            PathCommand::LineTo { x: 60.0, y: 50.0 },
        ];
        let subpaths = commands_to_subpaths(&commands);
        assert_eq!(subpaths.len(), 2);
        assert!(!subpaths[0].open);
        assert!(subpaths[1].open);
    }

    #[test]
    fn test_ellipse_synthesis_accuracy() {
        let r = 100.0;
        let points = ellipse_path_points(0.0, 0.0, r, r);
        assert_eq!(points.len(), 4);

        // Anchors sit exactly on the circle
        for point in &points {
            let dx = point.anchor[0] - r;
            let dy = point.anchor[1] - r;
            assert!((dx.hypot(dy) - r).abs() < 1e-9);
        }

        // Quadrant midpoint of the top->right Bézier deviates < 0.03% of r
        let p0 = points[0].anchor;
        let p1 = points[0].right_direction;
        let p2 = points[1].left_direction;
        let p3 = points[1].anchor;
        let mid = [
            (p0[0] + 3.0 * p1[0] + 3.0 * p2[0] + p3[0]) / 8.0,
            (p0[1] + 3.0 * p1[1] + 3.0 * p2[1] + p3[1]) / 8.0,
        ];
        let dist = (mid[0] - r).hypot(mid[1] - r);
        assert!((dist - r).abs() / r < 0.0003, "deviation {}", (dist - r).abs() / r);
    }

    #[test]
    fn test_rectangle_synthesis_is_all_corners() {
        let points = rectangle_path_points(20.0, 20.0, 120.0, 80.0);
        assert_eq!(points.len(), 4);
        for point in &points {
            assert_eq!(point.left_direction, point.anchor);
            assert_eq!(point.right_direction, point.anchor);
        }
        let geometry = Geometry::closed(points);
        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds, GeometricBounds::new(20.0, 20.0, 120.0, 80.0));
    }

    #[test]
    fn test_quad_degree_elevation() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::QuadTo {
                x1: 30.0,
                y1: 60.0,
                x: 60.0,
                y: 0.0,
            },
        ];
        let subpaths = commands_to_subpaths(&commands);
        let back = subpath_to_commands(&subpaths[0]);
        match back[1] {
            PathCommand::CurveTo { x1, y1, x2, y2, x, y } => {
                assert!((x1 - 20.0).abs() < 1e-9);
                assert!((y1 - 40.0).abs() < 1e-9);
                assert!((x2 - 40.0).abs() < 1e-9);
                assert!((y2 - 40.0).abs() < 1e-9);
                assert_eq!((x, y), (60.0, 0.0));
            }
            ref other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_conversion_endpoints_and_radius() {
        // Quarter circle of radius 10 from (10, 0) to (0, 10)
        let commands = vec![
            PathCommand::MoveTo { x: 10.0, y: 0.0 },
            PathCommand::ArcTo {
                rx: 10.0,
                ry: 10.0,
                x_axis_rotation: 0.0,
                large_arc: false,
                sweep: true,
                x: 0.0,
                y: 10.0,
            },
        ];
        let subpaths = commands_to_subpaths(&commands);
        let points = &subpaths[0].points;
        assert_eq!(points.first().unwrap().anchor, [10.0, 0.0]);
        let last = points.last().unwrap().anchor;
        assert!((last[0]).abs() < 1e-9 && (last[1] - 10.0).abs() < 1e-9);

        // Every anchor stays on the circle centered at the origin
        for point in points {
            let r = point.anchor[0].hypot(point.anchor[1]);
            assert!((r - 10.0).abs() < 1e-6, "radius {}", r);
        }
    }

    #[test]
    fn test_degenerate_arc_becomes_line() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::ArcTo {
                rx: 0.0,
                ry: 5.0,
                x_axis_rotation: 0.0,
                large_arc: false,
                sweep: false,
                x: 10.0,
                y: 10.0,
            },
        ];
        let subpaths = commands_to_subpaths(&commands);
        let back = subpath_to_commands(&subpaths[0]);
        assert_eq!(back[1], PathCommand::LineTo { x: 10.0, y: 10.0 });
    }

    #[test]
    fn test_geometry_element_roundtrip() {
        let geometry = Geometry::closed(rectangle_path_points(0.0, 0.0, 10.0, 10.0));
        let element = geometry.to_element();

        let mut shape = Element::new("Rectangle");
        inject_into_properties(&mut shape, element);
        let parsed = Geometry::parse_from_shape(&shape).unwrap();
        assert_eq!(parsed, geometry);
    }

    #[test]
    fn test_geometry_missing_is_error() {
        let shape = Element::new("Rectangle");
        assert!(Geometry::parse_from_shape(&shape).is_err());
    }
}
