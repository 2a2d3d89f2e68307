//! CVAT XML 1.1 dumping.
//!
//! A dump always has the same frame: declaration, `<annotations>`,
//! `<version>` and `<meta>`. The body depends on the [`DumpMode`]:
//!
//! - **Annotation** (`cvat_annotation`): one `<image>` per frame.
//! - **Interpolation** (`cvat_interpolation`): one `<track>` per object.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cvat_dump::{DumpMode, dump};
//!
//! let mut out = Vec::new();
//! let summary = dump(&mut out, &frames, &meta, DumpMode::Interpolation)?;
//! ```

mod annotation;
mod interpolation;
mod shape;
pub mod tracks;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DumpConfig;
use crate::error::DumpError;
use crate::meta::{Meta, TaskSettings};
use crate::model::FrameAnnotation;
use crate::writer::XmlAnnotationWriter;

/// Which body a dump has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DumpMode {
    /// Per-frame `<image>` elements.
    #[default]
    #[serde(rename = "cvat_annotation", alias = "annotation")]
    Annotation,
    /// Per-object `<track>` elements.
    #[serde(rename = "cvat_interpolation", alias = "interpolation")]
    Interpolation,
}

impl DumpMode {
    /// Dumper name (e.g. "cvat_annotation").
    pub fn dumper_name(&self) -> &'static str {
        match self {
            DumpMode::Annotation => "cvat_annotation",
            DumpMode::Interpolation => "cvat_interpolation",
        }
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            DumpMode::Annotation => "CVAT XML 1.1 for images",
            DumpMode::Interpolation => "CVAT XML 1.1 for videos",
        }
    }

    /// Get all dump modes.
    pub fn all() -> &'static [DumpMode] {
        &[DumpMode::Annotation, DumpMode::Interpolation]
    }
}

impl fmt::Display for DumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dumper_name())
    }
}

impl FromStr for DumpMode {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cvat_annotation" | "annotation" | "images" => Ok(DumpMode::Annotation),
            "cvat_interpolation" | "interpolation" | "tracks" | "videos" => {
                Ok(DumpMode::Interpolation)
            }
            _ => Err(DumpError::UnknownMode(s.to_string())),
        }
    }
}

/// What a dump wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpSummary {
    /// Mode the dump ran in.
    pub mode: DumpMode,
    /// Number of `<image>` elements written.
    pub images: usize,
    /// Number of `<track>` elements written.
    pub tracks: usize,
    /// Number of shape elements written (including closing outside frames).
    pub shapes: usize,
}

impl DumpSummary {
    fn new(mode: DumpMode) -> Self {
        Self {
            mode,
            images: 0,
            tracks: 0,
            shapes: 0,
        }
    }
}

/// Dump annotations to `sink` with default formatting.
pub fn dump<W: Write>(
    sink: W,
    frames: &[FrameAnnotation],
    meta: &Meta,
    mode: DumpMode,
) -> Result<DumpSummary, DumpError> {
    dump_with(&mut XmlAnnotationWriter::new(sink), frames, meta, mode)
}

/// Dump annotations to `sink` using the mode and indentation from `config`.
pub fn dump_with_config<W: Write>(
    sink: W,
    frames: &[FrameAnnotation],
    meta: &Meta,
    config: &DumpConfig,
) -> Result<DumpSummary, DumpError> {
    let mut writer = XmlAnnotationWriter::with_indent(sink, config.indent);
    dump_with(&mut writer, frames, meta, config.mode)
}

/// Dump a complete document through an existing writer.
///
/// Task settings are validated before anything is written, so a
/// [`DumpError::MalformedMeta`] leaves the sink empty. Other errors may leave
/// a partial document behind.
pub fn dump_with<W: Write>(
    writer: &mut XmlAnnotationWriter<W>,
    frames: &[FrameAnnotation],
    meta: &Meta,
    mode: DumpMode,
) -> Result<DumpSummary, DumpError> {
    let settings = TaskSettings::from_meta(meta)?;
    log::info!(
        "Dumping {} frames as {} (stop_frame={}, z_order={})",
        frames.len(),
        mode,
        settings.stop_frame,
        settings.z_order
    );

    let mut summary = DumpSummary::new(mode);
    writer.open_root()?;
    writer.add_meta(meta)?;

    match mode {
        DumpMode::Annotation => {
            annotation::dump_frames(writer, frames, &settings, &mut summary)?;
        }
        DumpMode::Interpolation => {
            interpolation::dump_tracks(writer, frames, &settings, &mut summary)?;
        }
    }

    writer.close_root()?;

    log::info!(
        "Dumped {} images, {} tracks, {} shapes",
        summary.images,
        summary.tracks,
        summary.shapes
    );
    Ok(summary)
}
