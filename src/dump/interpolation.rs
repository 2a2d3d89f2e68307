//! Track ("for videos") dump mode.
//!
//! Every assembled track becomes one `<track>` element with dense ids in
//! assembly order:
//!
//! ```xml
//! <track id="0" label="car">
//!   <box frame="4" outside="0" occluded="0" keyframe="1" xtl="1.00" ytl="2.00" xbr="3.00" ybr="4.00">
//!   </box>
//!   <box frame="5" outside="1" occluded="0" keyframe="1" xtl="1.00" ytl="2.00" xbr="3.00" ybr="4.00">
//!   </box>
//! </track>
//! ```

use std::io::Write;

use super::DumpSummary;
use super::shape::{flag, push_geometry, write_shape};
use super::tracks::{Track, TrackedShape, assemble_tracks};
use crate::error::DumpError;
use crate::meta::TaskSettings;
use crate::model::FrameAnnotation;
use crate::writer::{ElementAttrs, XmlAnnotationWriter};

pub(crate) fn dump_tracks<W: Write>(
    writer: &mut XmlAnnotationWriter<W>,
    frames: &[FrameAnnotation],
    settings: &TaskSettings,
    summary: &mut DumpSummary,
) -> Result<(), DumpError> {
    let tracks = assemble_tracks(frames, settings.stop_frame);

    for (id, track) in tracks.iter().enumerate() {
        writer.open_track(&track_attrs(id, track))?;
        for observation in &track.shapes {
            let attrs = observation_attrs(observation, settings)?;
            write_shape(writer, &observation.shape, &attrs)?;
            summary.shapes += 1;
        }
        writer.close_track()?;
        summary.tracks += 1;
    }
    Ok(())
}

fn track_attrs(id: usize, track: &Track) -> ElementAttrs {
    let first = &track.first().shape;
    let mut attrs = vec![("id", id.to_string()), ("label", first.label.clone())];
    if let Some(group) = first.group_id() {
        attrs.push(("group_id", group.to_string()));
    }
    attrs
}

fn observation_attrs(
    observation: &TrackedShape,
    settings: &TaskSettings,
) -> Result<ElementAttrs, DumpError> {
    let shape = &observation.shape;
    let mut attrs = vec![
        ("frame", observation.frame.to_string()),
        ("outside", flag(shape.outside)),
        ("occluded", flag(shape.occluded)),
        ("keyframe", flag(shape.keyframe)),
    ];
    push_geometry(&mut attrs, shape)?;
    if settings.z_order {
        attrs.push(("z_order", shape.z_order.to_string()));
    }
    Ok(attrs)
}
