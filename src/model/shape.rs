//! Shape data model: one annotated region on one frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

/// Track id carried by shapes that are not part of any track.
pub const STANDALONE_TRACK_ID: i64 = -1;

/// Geometry type of a shape.
///
/// Deserializes from its textual name so that an unknown type coming from the
/// producer surfaces as [`DumpError::UnsupportedShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ShapeKind {
    /// Axis-aligned box, coordinates `xtl, ytl, xbr, ybr`.
    Rectangle,
    /// Closed polygon.
    Polygon,
    /// Open polyline.
    Polyline,
    /// Set of loose points.
    Points,
}

impl ShapeKind {
    /// Name used by annotation producers (e.g. "rectangle").
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Points => "points",
        }
    }

    /// XML element name this shape is written as.
    pub fn element_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "box",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Points => "points",
        }
    }

    /// Get all shape kinds.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Polygon,
            ShapeKind::Polyline,
            ShapeKind::Points,
        ]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DumpError::unsupported_shape(s))
    }
}

impl TryFrom<String> for ShapeKind {
    type Error = DumpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeKind> for &'static str {
    fn from(kind: ShapeKind) -> Self {
        kind.name()
    }
}

/// A named attribute value attached to a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (e.g. "color")
    pub name: String,
    /// Attribute value as text
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One annotated region on a frame.
///
/// `outside` and `keyframe` only matter when dumping tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Geometry type.
    #[serde(rename = "type")]
    pub kind: ShapeKind,

    /// Label name.
    pub label: String,

    /// Whether the object is occluded.
    #[serde(default)]
    pub occluded: bool,

    /// Flat coordinate list. Rectangles hold exactly `xtl, ytl, xbr, ybr`;
    /// every other kind holds `x, y` pairs.
    pub points: Vec<f64>,

    /// Track identity, [`STANDALONE_TRACK_ID`] for standalone shapes.
    #[serde(default = "standalone_track_id")]
    pub track_id: i64,

    /// Group number, `None` or `0` when ungrouped.
    #[serde(default)]
    pub group: Option<u32>,

    /// Draw order, written only when the task enables z-ordering.
    #[serde(default)]
    pub z_order: i32,

    /// Whether the tracked object has left the scene.
    #[serde(default)]
    pub outside: bool,

    /// Whether this observation was authored rather than interpolated.
    #[serde(default)]
    pub keyframe: bool,

    /// Attribute values in producer order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

fn standalone_track_id() -> i64 {
    STANDALONE_TRACK_ID
}

impl Shape {
    /// Create a standalone shape with the given geometry.
    pub fn new(kind: ShapeKind, label: impl Into<String>, points: Vec<f64>) -> Self {
        Self {
            kind,
            label: label.into(),
            occluded: false,
            points,
            track_id: STANDALONE_TRACK_ID,
            group: None,
            z_order: 0,
            outside: false,
            keyframe: false,
            attributes: Vec::new(),
        }
    }

    /// Create a rectangle from its top-left and bottom-right corners.
    pub fn rectangle(label: impl Into<String>, xtl: f64, ytl: f64, xbr: f64, ybr: f64) -> Self {
        Self::new(ShapeKind::Rectangle, label, vec![xtl, ytl, xbr, ybr])
    }

    /// Create a polygon from `(x, y)` vertices.
    pub fn polygon(label: impl Into<String>, vertices: &[(f64, f64)]) -> Self {
        Self::new(ShapeKind::Polygon, label, flatten(vertices))
    }

    /// Create a polyline from `(x, y)` vertices.
    pub fn polyline(label: impl Into<String>, vertices: &[(f64, f64)]) -> Self {
        Self::new(ShapeKind::Polyline, label, flatten(vertices))
    }

    /// Create a points shape from `(x, y)` pairs.
    pub fn points(label: impl Into<String>, points: &[(f64, f64)]) -> Self {
        Self::new(ShapeKind::Points, label, flatten(points))
    }

    /// Assign the shape to a track.
    pub fn with_track(mut self, track_id: i64) -> Self {
        self.track_id = track_id;
        self
    }

    /// Set the group number.
    pub fn with_group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }

    /// Set the draw order.
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Mark the shape as occluded.
    pub fn with_occluded(mut self, occluded: bool) -> Self {
        self.occluded = occluded;
        self
    }

    /// Mark the observation as outside the scene.
    pub fn with_outside(mut self, outside: bool) -> Self {
        self.outside = outside;
        self
    }

    /// Mark the observation as a keyframe.
    pub fn with_keyframe(mut self, keyframe: bool) -> Self {
        self.keyframe = keyframe;
        self
    }

    /// Append an attribute value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Check if the shape belongs to no track.
    pub fn is_standalone(&self) -> bool {
        self.track_id == STANDALONE_TRACK_ID
    }

    /// Group number if the shape is grouped (zero counts as ungrouped).
    pub fn group_id(&self) -> Option<u32> {
        self.group.filter(|group| *group != 0)
    }

    /// Iterate coordinates as `(x, y)` pairs.
    pub fn point_pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

fn flatten(pairs: &[(f64, f64)]) -> Vec<f64> {
    pairs.iter().flat_map(|&(x, y)| [x, y]).collect()
}
