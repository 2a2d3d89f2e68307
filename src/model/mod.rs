//! Input data model: frames and the shapes annotated on them.

mod frame;
mod shape;

pub use frame::FrameAnnotation;
pub use shape::{Attribute, STANDALONE_TRACK_ID, Shape, ShapeKind};
