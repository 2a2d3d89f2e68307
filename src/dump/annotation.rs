//! Per-frame ("for images") dump mode.
//!
//! Every frame becomes one `<image>` element holding its shapes in input
//! order:
//!
//! ```xml
//! <image id="0" name="frame_000000.png" width="1920" height="1080">
//!   <box label="car" occluded="0" xtl="10.00" ytl="20.00" xbr="110.00" ybr="220.00" group_id="1">
//!     <attribute name="color">red</attribute>
//!   </box>
//! </image>
//! ```

use std::io::Write;

use super::DumpSummary;
use super::shape::{flag, push_geometry, write_shape};
use crate::error::DumpError;
use crate::meta::TaskSettings;
use crate::model::{FrameAnnotation, Shape};
use crate::writer::{ElementAttrs, XmlAnnotationWriter};

pub(crate) fn dump_frames<W: Write>(
    writer: &mut XmlAnnotationWriter<W>,
    frames: &[FrameAnnotation],
    settings: &TaskSettings,
    summary: &mut DumpSummary,
) -> Result<(), DumpError> {
    for frame in frames {
        log::debug!(
            "Writing image {} ('{}') with {} shapes",
            frame.frame,
            frame.name,
            frame.shapes.len()
        );

        writer.open_image(&vec![
            ("id", frame.frame.to_string()),
            ("name", frame.name.clone()),
            ("width", frame.width.to_string()),
            ("height", frame.height.to_string()),
        ])?;

        for shape in &frame.shapes {
            let attrs = shape_attrs(shape, settings)?;
            write_shape(writer, shape, &attrs)?;
            summary.shapes += 1;
        }

        writer.close_image()?;
        summary.images += 1;
    }
    Ok(())
}

fn shape_attrs(shape: &Shape, settings: &TaskSettings) -> Result<ElementAttrs, DumpError> {
    let mut attrs = vec![
        ("label", shape.label.clone()),
        ("occluded", flag(shape.occluded)),
    ];
    push_geometry(&mut attrs, shape)?;
    if settings.z_order {
        attrs.push(("z_order", shape.z_order.to_string()));
    }
    if let Some(group) = shape.group_id() {
        attrs.push(("group_id", group.to_string()));
    }
    Ok(attrs)
}
