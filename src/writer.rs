//! Streaming CVAT XML writer.
//!
//! [`XmlAnnotationWriter`] knows the document skeleton (declaration,
//! `<annotations>` root, `<version>`, `<meta>`) and the container elements
//! (`<image>`, `<track>`, shape elements, `<attribute>` leaves), but nothing
//! about annotation semantics. Elements are written to the sink as soon as
//! they are opened.
//!
//! Opening and closing follow a strict stack discipline. Closing an element
//! that is not the innermost open one is reported as
//! [`DumpError::Structural`].

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::DumpError;
use crate::meta::{Meta, MetaValue};
use crate::model::ShapeKind;

/// CVAT XML format version written into `<version>`.
pub const FORMAT_VERSION: &str = "1.1";

/// Default number of spaces per nesting level.
pub const DEFAULT_INDENT: usize = 2;

const ROOT: &str = "annotations";

/// Ordered element attributes, written in insertion order.
pub type ElementAttrs = Vec<(&'static str, String)>;

/// Streaming writer for CVAT XML documents.
pub struct XmlAnnotationWriter<W: Write> {
    writer: Writer<W>,
    /// Names of currently open elements, root first.
    open: Vec<&'static str>,
    finished: bool,
}

impl<W: Write> XmlAnnotationWriter<W> {
    /// Create a writer with the default two-space indentation.
    pub fn new(sink: W) -> Self {
        Self::with_indent(sink, DEFAULT_INDENT)
    }

    /// Create a writer indenting each level by `indent` spaces.
    pub fn with_indent(sink: W, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(sink, b' ', indent),
            open: Vec::new(),
            finished: false,
        }
    }

    /// Current nesting depth (0 before `open_root` and after `close_root`).
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Whether the root element has been closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Write the XML declaration, the `<annotations>` root and `<version>`.
    pub fn open_root(&mut self) -> Result<(), DumpError> {
        if self.finished || !self.open.is_empty() {
            return Err(DumpError::structural("document root is already open"));
        }

        self.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write(Event::Start(BytesStart::new(ROOT)))?;
        self.open.push(ROOT);
        self.write_text_element("version", FORMAT_VERSION)
    }

    /// Write the `<meta>` section.
    pub fn add_meta(&mut self, meta: &Meta) -> Result<(), DumpError> {
        self.ensure_in_root("meta")?;
        self.write(Event::Start(BytesStart::new("meta")))?;
        for (key, value) in meta.iter() {
            self.write_meta_entry(key, value)?;
        }
        self.write(Event::End(BytesEnd::new("meta")))
    }

    /// Open a `<track>` element.
    pub fn open_track(&mut self, attrs: &ElementAttrs) -> Result<(), DumpError> {
        self.open_element("track", attrs)
    }

    /// Close the innermost `<track>` element.
    pub fn close_track(&mut self) -> Result<(), DumpError> {
        self.close_element("track")
    }

    /// Open an `<image>` element.
    pub fn open_image(&mut self, attrs: &ElementAttrs) -> Result<(), DumpError> {
        self.open_element("image", attrs)
    }

    /// Close the innermost `<image>` element.
    pub fn close_image(&mut self) -> Result<(), DumpError> {
        self.close_element("image")
    }

    /// Open the element for a shape kind (`<box>`, `<polygon>`, `<polyline>`
    /// or `<points>`).
    pub fn open_shape(&mut self, kind: ShapeKind, attrs: &ElementAttrs) -> Result<(), DumpError> {
        self.open_element(kind.element_name(), attrs)
    }

    /// Close the innermost shape element of the given kind.
    pub fn close_shape(&mut self, kind: ShapeKind) -> Result<(), DumpError> {
        self.close_element(kind.element_name())
    }

    /// Write an `<attribute name="...">value</attribute>` leaf.
    pub fn add_attribute(&mut self, name: &str, value: &str) -> Result<(), DumpError> {
        self.ensure_in_root("attribute")?;
        let start = BytesStart::new("attribute").with_attributes([("name", name)]);
        self.write(Event::Start(start))?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.write(Event::End(BytesEnd::new("attribute")))
    }

    /// Close `<annotations>` and flush the sink.
    pub fn close_root(&mut self) -> Result<(), DumpError> {
        match self.open.as_slice() {
            [ROOT] => {}
            [] => return Err(DumpError::structural("document root is not open")),
            [.., inner] => {
                return Err(DumpError::structural(format!(
                    "cannot close <{ROOT}> while <{inner}> is still open"
                )));
            }
        }

        self.open.pop();
        self.write(Event::End(BytesEnd::new(ROOT)))?;
        self.finished = true;
        self.writer.get_mut().flush()?;
        Ok(())
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn open_element(&mut self, name: &'static str, attrs: &ElementAttrs) -> Result<(), DumpError> {
        self.ensure_in_root(name)?;
        let start = BytesStart::new(name)
            .with_attributes(attrs.iter().map(|(key, value)| (*key, value.as_str())));
        self.write(Event::Start(start))?;
        self.open.push(name);
        Ok(())
    }

    fn close_element(&mut self, name: &'static str) -> Result<(), DumpError> {
        match self.open.last() {
            Some(&top) if top == name && self.open.len() > 1 => {}
            Some(&top) => {
                return Err(DumpError::structural(format!(
                    "cannot close <{name}>: innermost open element is <{top}>"
                )));
            }
            None => {
                return Err(DumpError::structural(format!(
                    "cannot close <{name}>: document root is not open"
                )));
            }
        }

        self.open.pop();
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn ensure_in_root(&self, name: &str) -> Result<(), DumpError> {
        if self.open.is_empty() {
            return Err(DumpError::structural(format!(
                "cannot write <{name}> outside the document root"
            )));
        }
        Ok(())
    }

    fn write_meta_entry(&mut self, key: &str, value: &MetaValue) -> Result<(), DumpError> {
        if key.is_empty() || key.contains(|c: char| c.is_whitespace() || "<>&\"'/=".contains(c)) {
            return Err(DumpError::malformed_meta(format!(
                "'{key}' is not usable as an element name"
            )));
        }

        match value {
            MetaValue::Text(text) => self.write_text_element(key, text),
            MetaValue::Nested(nested) => {
                self.write(Event::Start(BytesStart::new(key)))?;
                for (child_key, child) in nested.iter() {
                    self.write_meta_entry(child_key, child)?;
                }
                self.write(Event::End(BytesEnd::new(key)))
            }
            MetaValue::Repeated(items) => {
                self.write(Event::Start(BytesStart::new(key)))?;
                for (item_key, item) in items {
                    self.write_meta_entry(item_key, item)?;
                }
                self.write(Event::End(BytesEnd::new(key)))
            }
        }
    }

    /// Write a simple text element.
    fn write_text_element(&mut self, name: &str, value: &str) -> Result<(), DumpError> {
        self.write(Event::Start(BytesStart::new(name)))?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), DumpError> {
        self.writer
            .write_event(event)
            .map_err(|e| DumpError::Xml(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut XmlAnnotationWriter<Vec<u8>>)) -> String {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        f(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_root_and_meta_layout() {
        let meta = Meta::new().nested(
            "task",
            Meta::new()
                .text("z_order", "False")
                .text("stop_frame", "10")
                .repeated(
                    "labels",
                    vec![
                        (
                            "label".to_string(),
                            MetaValue::Nested(Meta::new().text("name", "car")),
                        ),
                        (
                            "label".to_string(),
                            MetaValue::Nested(Meta::new().text("name", "person")),
                        ),
                    ],
                ),
        );

        let xml = render(|w| {
            w.open_root().unwrap();
            w.add_meta(&meta).unwrap();
            w.close_root().unwrap();
            assert_eq!(w.depth(), 0);
        });

        let expected = "\
<?xml version=\"1.0\" encoding=\"utf-8\"?>
<annotations>
  <version>1.1</version>
  <meta>
    <task>
      <z_order>False</z_order>
      <stop_frame>10</stop_frame>
      <labels>
        <label>
          <name>car</name>
        </label>
        <label>
          <name>person</name>
        </label>
      </labels>
    </task>
  </meta>
</annotations>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_nested_elements_and_attributes() {
        let xml = render(|w| {
            w.open_root().unwrap();
            w.open_image(&vec![("id", "0".into()), ("name", "a.png".into())])
                .unwrap();
            assert_eq!(w.depth(), 2);
            w.open_shape(ShapeKind::Rectangle, &vec![("label", "car".into())])
                .unwrap();
            assert_eq!(w.depth(), 3);
            w.add_attribute("color", "red").unwrap();
            w.close_shape(ShapeKind::Rectangle).unwrap();
            w.close_image().unwrap();
            w.close_root().unwrap();
        });

        let expected = "\
<?xml version=\"1.0\" encoding=\"utf-8\"?>
<annotations>
  <version>1.1</version>
  <image id=\"0\" name=\"a.png\">
    <box label=\"car\">
      <attribute name=\"color\">red</attribute>
    </box>
  </image>
</annotations>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_custom_indent() {
        let mut writer = XmlAnnotationWriter::with_indent(Vec::new(), 4);
        writer.open_root().unwrap();
        writer.close_root().unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert!(xml.contains("\n    <version>1.1</version>\n</annotations>"));
    }

    #[test]
    fn test_escaping() {
        let xml = render(|w| {
            w.open_root().unwrap();
            w.open_image(&vec![("name", "a<b&c.png".into())]).unwrap();
            w.add_attribute("note", "x < y & z").unwrap();
            w.close_image().unwrap();
            w.close_root().unwrap();
        });

        assert!(xml.contains(r#"name="a&lt;b&amp;c.png""#));
        assert!(xml.contains(">x &lt; y &amp; z</attribute>"));
    }

    #[test]
    fn test_close_mismatch_is_structural() {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        writer.open_root().unwrap();
        writer.open_track(&vec![]).unwrap();

        let err = writer.close_image().unwrap_err();
        assert!(matches!(err, DumpError::Structural { .. }));

        let err = writer.close_shape(ShapeKind::Polygon).unwrap_err();
        assert!(matches!(err, DumpError::Structural { .. }));

        // Root cannot close while the track is open.
        assert!(writer.close_root().is_err());
        writer.close_track().unwrap();
        writer.close_root().unwrap();
    }

    #[test]
    fn test_close_without_root() {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        assert!(matches!(
            writer.close_track(),
            Err(DumpError::Structural { .. })
        ));
        assert!(writer.close_root().is_err());
    }

    #[test]
    fn test_open_without_root() {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        assert!(writer.open_image(&vec![]).is_err());
        assert!(writer.add_attribute("a", "b").is_err());
        assert!(writer.add_meta(&Meta::new()).is_err());
    }

    #[test]
    fn test_root_cannot_be_reopened() {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        writer.open_root().unwrap();
        assert!(writer.open_root().is_err());
        writer.close_root().unwrap();
        assert!(writer.is_finished());
        assert!(writer.open_root().is_err());
        assert!(writer.open_track(&vec![]).is_err());
    }

    #[test]
    fn test_root_element_cannot_be_closed_as_child() {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        writer.open_root().unwrap();
        // Only close_root may pop the root element.
        assert!(writer.close_element(ROOT).is_err());
        assert_eq!(writer.depth(), 1);
    }

    #[test]
    fn test_bad_meta_key() {
        let mut writer = XmlAnnotationWriter::new(Vec::new());
        writer.open_root().unwrap();
        let meta = Meta::new().text("two words", "x");
        assert!(matches!(
            writer.add_meta(&meta),
            Err(DumpError::MalformedMeta { .. })
        ));
    }
}
