//! Frame data model.

use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Annotations of a single frame (an image, or one frame of a video).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotation {
    /// Frame index, unique within a task
    pub frame: u64,
    /// Display name (usually the image filename)
    pub name: String,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Shapes on this frame, in producer order
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl FrameAnnotation {
    /// Create a frame without shapes.
    pub fn new(frame: u64, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            frame,
            name: name.into(),
            width,
            height,
            shapes: Vec::new(),
        }
    }

    /// Add a shape to this frame.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Add a shape to this frame.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }
}
