//! End-to-end tests for complete CVAT XML documents.
//!
//! Documents are checked by exact comparison for small inputs and by walking
//! the output with a `quick_xml::Reader` for structural properties.


use quick_xml::Reader;
use quick_xml::events::Event;

use crate::dump::{DumpMode, DumpSummary, dump};
use crate::meta::{Meta, MetaValue};
use crate::model::FrameAnnotation;

/// A start tag seen in a document, with its attributes in order.
#[derive(Debug, Clone)]
pub(super) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attr_keys(&self) -> Vec<&str> {
        self.attrs.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Task meta with the two required fields plus a label list.
pub(super) fn task_meta(z_order: &str, stop_frame: u64) -> Meta {
    Meta::new().nested(
        "task",
        Meta::new()
            .text("name", "street")
            .text("z_order", z_order)
            .text("stop_frame", stop_frame.to_string())
            .repeated(
                "labels",
                vec![(
                    "label".to_string(),
                    MetaValue::Nested(Meta::new().text("name", "car")),
                )],
            ),
    )
}

pub(super) fn render(
    frames: &[FrameAnnotation],
    meta: &Meta,
    mode: DumpMode,
) -> (String, DumpSummary) {
    let mut out = Vec::new();
    let summary = dump(&mut out, frames, meta, mode).expect("dump should succeed");
    (String::from_utf8(out).expect("output is UTF-8"), summary)
}

/// Parse a document, returning its start tags in document order.
///
/// Panics if the document is not well-formed or the tags are unbalanced.
pub(super) fn elements(xml: &str) -> Vec<Element> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut elements = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = e
                    .attributes()
                    .map(|a| {
                        let a = a.expect("valid attribute");
                        (
                            String::from_utf8_lossy(a.key.as_ref()).to_string(),
                            a.unescape_value().expect("valid escape").to_string(),
                        )
                    })
                    .collect();
                stack.push(name.clone());
                elements.push(Element { name, attrs });
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                assert_eq!(stack.pop().as_deref(), Some(name.as_str()), "unbalanced </{name}>");
            }
            Event::Empty(_) => panic!("no self-closing elements expected"),
            Event::Eof => break,
            _ => {}
        }
    }

    assert!(stack.is_empty(), "unclosed elements: {stack:?}");
    elements
}

/// Elements with the given name, in document order.
pub(super) fn named<'a>(elements: &'a [Element], name: &str) -> Vec<&'a Element> {
    elements.iter().filter(|e| e.name == name).collect()
}
