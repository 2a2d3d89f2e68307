//! cvat-dump - streaming CVAT XML 1.1 annotation dumper
//!
//! Turns per-frame shape annotations into a CVAT XML document, either as
//! per-frame `<image>` elements or as `<track>` elements that group shapes
//! sharing an identity across frames.

pub mod config;
pub mod dump;
mod error;
pub mod meta;
pub mod model;
pub mod registry;
pub mod writer;

pub use config::{ConfigError, DumpConfig, LogLevel};
pub use dump::tracks::{Track, TrackedShape, assemble_tracks};
pub use dump::{DumpMode, DumpSummary, dump, dump_with, dump_with_config};
pub use error::DumpError;
pub use meta::{Meta, MetaValue, TaskSettings};
pub use model::{Attribute, FrameAnnotation, STANDALONE_TRACK_ID, Shape, ShapeKind};
pub use registry::{CVAT_XML, CvatDumper, DumpFormat, Dumper, DumperRegistry};
pub use writer::{ElementAttrs, FORMAT_VERSION, XmlAnnotationWriter};
