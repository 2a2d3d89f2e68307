//! Dumper registry for discovering the available CVAT XML dumpers.
//!
//! The CVAT XML 1.1 format ships two dumpers sharing one file extension:
//! one writing per-frame `<image>` elements and one writing `<track>`
//! elements. Each is addressed by its dumper name.

use std::collections::HashMap;
use std::io::Write;

use crate::dump::{DumpMode, DumpSummary, dump};
use crate::error::DumpError;
use crate::meta::Meta;
use crate::model::FrameAnnotation;
use crate::writer::FORMAT_VERSION;

/// Descriptor of an annotation format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpFormat {
    /// Human-readable name (e.g. "CVAT XML 1.1")
    pub name: &'static str,
    /// Serialization family (e.g. "XML")
    pub format: &'static str,
    /// Format version
    pub version: &'static str,
    /// Output file extension
    pub extension: &'static str,
}

/// The CVAT XML 1.1 format.
pub const CVAT_XML: DumpFormat = DumpFormat {
    name: "CVAT XML 1.1",
    format: "XML",
    version: FORMAT_VERSION,
    extension: "xml",
};

/// A dumper producing one document body shape.
pub trait Dumper: Send + Sync {
    /// Dumper name (e.g. "cvat_annotation").
    fn id(&self) -> &'static str;

    /// Human-readable name for display.
    fn display_name(&self) -> &'static str;

    /// Format this dumper belongs to.
    fn format(&self) -> &DumpFormat;

    /// Mode the dumper writes in.
    fn mode(&self) -> DumpMode;

    /// Write a complete document to `sink`.
    fn dump(
        &self,
        sink: &mut dyn Write,
        frames: &[FrameAnnotation],
        meta: &Meta,
    ) -> Result<DumpSummary, DumpError> {
        dump(sink, frames, meta, self.mode())
    }
}

/// CVAT XML dumper bound to one [`DumpMode`].
#[derive(Debug, Clone, Copy)]
pub struct CvatDumper {
    mode: DumpMode,
}

impl CvatDumper {
    /// Dumper writing per-frame `<image>` elements.
    pub fn images() -> Self {
        Self {
            mode: DumpMode::Annotation,
        }
    }

    /// Dumper writing `<track>` elements.
    pub fn videos() -> Self {
        Self {
            mode: DumpMode::Interpolation,
        }
    }
}

impl Dumper for CvatDumper {
    fn id(&self) -> &'static str {
        self.mode.dumper_name()
    }

    fn display_name(&self) -> &'static str {
        self.mode.display_name()
    }

    fn format(&self) -> &DumpFormat {
        &CVAT_XML
    }

    fn mode(&self) -> DumpMode {
        self.mode
    }
}

/// Registry of available dumpers.
///
/// All built-in dumpers are registered automatically on creation.
pub struct DumperRegistry {
    dumpers: HashMap<&'static str, Box<dyn Dumper>>,
}

impl DumperRegistry {
    /// Create a new registry with the built-in dumpers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            dumpers: HashMap::new(),
        };

        registry.register(Box::new(CvatDumper::images()));
        registry.register(Box::new(CvatDumper::videos()));

        registry
    }

    /// Register a dumper, replacing any dumper with the same id.
    pub fn register(&mut self, dumper: Box<dyn Dumper>) {
        self.dumpers.insert(dumper.id(), dumper);
    }

    /// Get a dumper by name.
    pub fn get(&self, id: &str) -> Option<&dyn Dumper> {
        self.dumpers.get(id).map(|d| d.as_ref())
    }

    /// Get the dumper for a mode.
    pub fn for_mode(&self, mode: DumpMode) -> Option<&dyn Dumper> {
        self.dumpers
            .values()
            .find(|d| d.mode() == mode)
            .map(|d| d.as_ref())
    }

    /// Find dumpers by output file extension.
    pub fn by_extension(&self, ext: &str) -> Vec<&dyn Dumper> {
        let mut found: Vec<_> = self
            .dumpers
            .values()
            .filter(|d| d.format().extension.eq_ignore_ascii_case(ext))
            .map(|d| d.as_ref())
            .collect();
        found.sort_by_key(|d| d.id());
        found
    }

    /// Get all dumper ids, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.dumpers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for DumperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dumpers() {
        let registry = DumperRegistry::new();

        assert_eq!(registry.ids(), vec!["cvat_annotation", "cvat_interpolation"]);

        let images = registry.get("cvat_annotation").unwrap();
        assert_eq!(images.mode(), DumpMode::Annotation);
        assert_eq!(images.display_name(), "CVAT XML 1.1 for images");

        let videos = registry.get("cvat_interpolation").unwrap();
        assert_eq!(videos.mode(), DumpMode::Interpolation);
        assert_eq!(videos.display_name(), "CVAT XML 1.1 for videos");

        assert!(registry.get("coco").is_none());
    }

    #[test]
    fn test_format_descriptor() {
        let registry = DumperRegistry::new();
        let dumper = registry.for_mode(DumpMode::Interpolation).unwrap();

        assert_eq!(dumper.format().name, "CVAT XML 1.1");
        assert_eq!(dumper.format().version, "1.1");
        assert_eq!(dumper.format().extension, "xml");
        assert_eq!(registry.by_extension("XML").len(), 2);
        assert!(registry.by_extension("json").is_empty());
    }

    #[test]
    fn test_dump_through_registry() {
        let registry = DumperRegistry::new();
        let meta = Meta::new().nested(
            "task",
            Meta::new().text("z_order", "False").text("stop_frame", "0"),
        );
        let mut out = Vec::new();

        let summary = registry
            .get("cvat_interpolation")
            .unwrap()
            .dump(&mut out, &[], &meta)
            .unwrap();

        assert_eq!(summary.mode, DumpMode::Interpolation);
        assert_eq!(summary.tracks, 0);
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.ends_with("</meta>\n</annotations>"));
    }
}
