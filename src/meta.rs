//! Task metadata written into the `<meta>` section of a dump.
//!
//! Metadata is an ordered tree: keys keep the order the producer inserted
//! them in, which is also the order the elements are written in.
//!
//! ```rust,ignore
//! use cvat_dump::{Meta, MetaValue};
//!
//! let meta = Meta::new().nested(
//!     "task",
//!     Meta::new()
//!         .text("name", "street")
//!         .text("z_order", "False")
//!         .text("stop_frame", "99")
//!         .repeated("labels", vec![
//!             ("label".into(), MetaValue::Nested(Meta::new().text("name", "car"))),
//!             ("label".into(), MetaValue::Nested(Meta::new().text("name", "person"))),
//!         ]),
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

/// A value in the metadata tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaValue {
    /// Leaf text, written as `<key>text</key>`.
    Text(String),
    /// Nested mapping, written as a wrapper element.
    Nested(Meta),
    /// Wrapper element holding one child per item, so several children may
    /// share a tag (e.g. repeated `<label>` entries).
    Repeated(Vec<(String, MetaValue)>),
}

impl MetaValue {
    /// Get the leaf text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the nested mapping, if this is one.
    pub fn as_nested(&self) -> Option<&Meta> {
        match self {
            MetaValue::Nested(meta) => Some(meta),
            _ => None,
        }
    }
}

/// Ordered metadata mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta {
    entries: Vec<(String, MetaValue)>,
}

impl Meta {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text value.
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, MetaValue::Text(value.into()));
        self
    }

    /// Append a nested mapping.
    pub fn nested(mut self, key: impl Into<String>, meta: Meta) -> Self {
        self.push(key, MetaValue::Nested(meta));
        self
    }

    /// Append a list of single-entry items.
    pub fn repeated(mut self, key: impl Into<String>, items: Vec<(String, MetaValue)>) -> Self {
        self.push(key, MetaValue::Repeated(items));
        self
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<String>, value: MetaValue) {
        self.entries.push((key.into(), value));
    }

    /// Look up the first entry with the given key.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Follow a path of keys through nested mappings to a text leaf.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for key in parents {
            current = current.get(key)?.as_nested()?;
        }
        current.get(last)?.as_text()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Task-level settings the encoders depend on, read once from [`Meta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSettings {
    /// Whether `z_order` attributes are written.
    pub z_order: bool,
    /// Last frame index of the task (inclusive).
    pub stop_frame: u64,
}

impl TaskSettings {
    /// Read `task.z_order` and `task.stop_frame`.
    ///
    /// Both are required. `z_order` accepts `True`/`true`/`1` and
    /// `False`/`false`/`0`; `stop_frame` must be a non-negative integer.
    pub fn from_meta(meta: &Meta) -> Result<Self, DumpError> {
        let z_order = meta
            .text_at(&["task", "z_order"])
            .ok_or_else(|| DumpError::malformed_meta("task.z_order is missing"))?;
        let z_order = match z_order.trim() {
            "True" | "true" | "1" => true,
            "False" | "false" | "0" => false,
            other => {
                return Err(DumpError::malformed_meta(format!(
                    "task.z_order must be a boolean, found '{other}'"
                )));
            }
        };

        let stop_frame = meta
            .text_at(&["task", "stop_frame"])
            .ok_or_else(|| DumpError::malformed_meta("task.stop_frame is missing"))?;
        let stop_frame = stop_frame.trim().parse::<u64>().map_err(|_| {
            DumpError::malformed_meta(format!(
                "task.stop_frame must be a frame index, found '{stop_frame}'"
            ))
        })?;

        Ok(Self {
            z_order,
            stop_frame,
        })
    }
}
