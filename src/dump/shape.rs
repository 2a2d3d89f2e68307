//! Geometry and attribute encoding shared by both dump modes.

use std::io::Write;

use crate::error::DumpError;
use crate::model::{Shape, ShapeKind};
use crate::writer::{ElementAttrs, XmlAnnotationWriter};

/// Format a boolean flag as `0`/`1`.
pub(crate) fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Format a coordinate with exactly two fractional digits.
pub(crate) fn coord(value: f64) -> String {
    format!("{value:.2}")
}

/// Append the geometry attributes of a shape.
///
/// Rectangles produce `xtl`, `ytl`, `xbr`, `ybr`; all other kinds produce a
/// single `points` attribute of `x,y` pairs joined by `;`.
pub(crate) fn push_geometry(attrs: &mut ElementAttrs, shape: &Shape) -> Result<(), DumpError> {
    match shape.kind {
        ShapeKind::Rectangle => {
            let &[xtl, ytl, xbr, ybr] = shape.points.as_slice() else {
                return Err(DumpError::invalid_coordinates(format!(
                    "rectangle '{}' needs 4 coordinates, got {}",
                    shape.label,
                    shape.points.len()
                )));
            };
            attrs.push(("xtl", coord(xtl)));
            attrs.push(("ytl", coord(ytl)));
            attrs.push(("xbr", coord(xbr)));
            attrs.push(("ybr", coord(ybr)));
        }
        ShapeKind::Polygon | ShapeKind::Polyline | ShapeKind::Points => {
            if shape.points.len() % 2 != 0 {
                return Err(DumpError::invalid_coordinates(format!(
                    "{} '{}' has an odd number of coordinates ({})",
                    shape.kind,
                    shape.label,
                    shape.points.len()
                )));
            }
            if shape.points.is_empty() {
                log::warn!("{} '{}' has no points", shape.kind, shape.label);
            }
            attrs.push(("points", format_points(shape)));
        }
    }
    Ok(())
}

fn format_points(shape: &Shape) -> String {
    shape
        .point_pairs()
        .map(|(x, y)| format!("{},{}", coord(x), coord(y)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Write a shape element with its `<attribute>` children.
pub(crate) fn write_shape<W: Write>(
    writer: &mut XmlAnnotationWriter<W>,
    shape: &Shape,
    attrs: &ElementAttrs,
) -> Result<(), DumpError> {
    writer.open_shape(shape.kind, attrs)?;
    for attribute in &shape.attributes {
        writer.add_attribute(&attribute.name, &attribute.value)?;
    }
    writer.close_shape(shape.kind)
}
