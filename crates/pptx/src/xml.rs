//! Parsing package parts into the core element tree and writing them back.

use fontnorm_core::{Error, Result, XmlElement, XmlNode, XmlPart};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn xml_error(part: &str, err: impl Display) -> Error {
    Error::XmlError(format!("{}: {}", part, err))
}

/// Parse the bytes of a package part into an element tree.
pub fn parse_part(name: &str, bytes: &[u8]) -> Result<XmlPart> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let content = std::str::from_utf8(bytes).map_err(|e| xml_error(name, e))?;

    let mut reader = Reader::from_str(content);
    let mut tree = TreeBuilder::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            xml_error(name, format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(ref e) => tree.open(element_from_start(name, e)?),
            Event::Empty(ref e) => tree.push(name, XmlNode::Element(element_from_start(name, e)?))?,
            Event::End(_) => tree.close(name)?,
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|err| xml_error(name, err))?;
                tree.push(name, XmlNode::Text(text.into_owned()))?;
            }
            Event::CData(ref e) => {
                let raw = format!("<![CDATA[{}]]>", String::from_utf8_lossy(e));
                tree.push(name, XmlNode::Raw(raw))?;
            }
            Event::Comment(ref e) => {
                let raw = format!("<!--{}-->", String::from_utf8_lossy(e));
                tree.push(name, XmlNode::Raw(raw))?;
            }
            Event::PI(ref e) => {
                let raw = format!("<?{}?>", String::from_utf8_lossy(e));
                tree.push(name, XmlNode::Raw(raw))?;
            }
            Event::DocType(ref e) => {
                let raw = format!("<!DOCTYPE {}>", String::from_utf8_lossy(e));
                tree.push(name, XmlNode::Raw(raw))?;
            }
            Event::Decl(ref e) => tree.push(name, XmlNode::Raw(declaration(name, e)?))?,
            Event::Eof => break,
        }
    }

    tree.finish(name)
}

/// Serialize a part back to bytes.
///
/// Childless elements are written self-closed; text is escaped minimally and
/// attribute values fully.
pub fn write_part(part: &XmlPart) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    for node in &part.prolog {
        write_node(&mut writer, &part.name, node)?;
    }
    write_element(&mut writer, &part.name, &part.root)?;
    for node in &part.epilog {
        write_node(&mut writer, &part.name, node)?;
    }
    Ok(writer.into_inner())
}

fn element_from_start(part: &str, start: &BytesStart) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(part, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| xml_error(part, e))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn declaration(part: &str, decl: &BytesDecl) -> Result<String> {
    let version = decl.version().map_err(|e| xml_error(part, e))?;
    let mut raw = format!("<?xml version=\"{}\"", String::from_utf8_lossy(&version));
    if let Some(encoding) = decl.encoding() {
        let encoding = encoding.map_err(|e| xml_error(part, e))?;
        raw.push_str(&format!(" encoding=\"{}\"", String::from_utf8_lossy(&encoding)));
    }
    if let Some(standalone) = decl.standalone() {
        let standalone = standalone.map_err(|e| xml_error(part, e))?;
        raw.push_str(&format!(" standalone=\"{}\"", String::from_utf8_lossy(&standalone)));
    }
    raw.push_str("?>");
    Ok(raw)
}

fn write_node(writer: &mut Writer<Vec<u8>>, part: &str, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(element) => write_element(writer, part, element),
        XmlNode::Text(text) => writer
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
            .map_err(|e| xml_error(part, e)),
        XmlNode::Raw(raw) => {
            writer.get_mut().extend_from_slice(raw.as_bytes());
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, part: &str, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| xml_error(part, e));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| xml_error(part, e))?;
    for child in &element.children {
        write_node(writer, part, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| xml_error(part, e))
}

/// Assembles the element tree from a flat event stream.
#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<XmlNode>,
    epilog: Vec<XmlNode>,
    stack: Vec<XmlElement>,
    root: Option<XmlElement>,
}

impl TreeBuilder {
    fn open(&mut self, element: XmlElement) {
        self.stack.push(element);
    }

    fn close(&mut self, part: &str) -> Result<()> {
        let element = self
            .stack
            .pop()
            .ok_or_else(|| xml_error(part, "closing tag without an open element"))?;
        self.push(part, XmlNode::Element(element))
    }

    fn push(&mut self, part: &str, node: XmlNode) -> Result<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            XmlNode::Element(_) if self.root.is_some() => {
                Err(xml_error(part, "more than one root element"))
            }
            XmlNode::Element(element) => {
                self.root = Some(element);
                Ok(())
            }
            other if self.root.is_none() => {
                self.prolog.push(other);
                Ok(())
            }
            other => {
                self.epilog.push(other);
                Ok(())
            }
        }
    }

    fn finish(self, part: &str) -> Result<XmlPart> {
        if let Some(open) = self.stack.last() {
            return Err(xml_error(part, format!("unclosed element <{}>", open.name)));
        }
        let root = self
            .root
            .ok_or_else(|| xml_error(part, "no root element"))?;
        Ok(XmlPart {
            name: part.to_string(),
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\r\n",
        r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
        r#"<p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/><a:p><a:r>"#,
        r#"<a:rPr lang="en-US" dirty="0"><a:latin typeface="Courier New"/><a:ea typeface="MS Gothic"/></a:rPr>"#,
        r#"<a:t>if (a &lt; b &amp;&amp; c) { return "it's"; }</a:t></a:r>"#,
        r#"<!-- keep me --><a:endParaRPr lang="ja-JP" altLang="en-US"/></a:p></p:txBody></p:sp>"#,
        r#"</p:spTree></p:cSld></p:sld>"#
    );

    #[test]
    fn test_parse_builds_tree() {
        let part = parse_part("ppt/slides/slide1.xml", SLIDE.as_bytes()).unwrap();

        assert_eq!(part.name, "ppt/slides/slide1.xml");
        assert_eq!(part.root.name, "p:sld");
        assert_eq!(part.prolog.len(), 2);
        assert!(matches!(&part.prolog[0], XmlNode::Raw(decl) if decl.starts_with("<?xml version=\"1.0\"")));

        let run = part.root.find("r").unwrap();
        assert_eq!(
            run.child("t").unwrap().text(),
            r#"if (a < b && c) { return "it's"; }"#
        );
        assert_eq!(
            run.find("latin").unwrap().attribute("typeface"),
            Some("Courier New")
        );
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let part = parse_part("ppt/slides/slide1.xml", SLIDE.as_bytes()).unwrap();
        let written = write_part(&part).unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), SLIDE);
    }

    #[test]
    fn test_modified_attribute_is_escaped() {
        let mut part = parse_part("ppt/slides/slide1.xml", SLIDE.as_bytes()).unwrap();
        part.root
            .find_mut("latin")
            .unwrap()
            .set_attribute("typeface", "A & \"B\"");

        let written = String::from_utf8(write_part(&part).unwrap()).unwrap();
        assert!(written.contains(r#"<a:latin typeface="A &amp; &quot;B&quot;"/>"#));

        let reparsed = parse_part("ppt/slides/slide1.xml", written.as_bytes()).unwrap();
        assert_eq!(
            reparsed.root.find("latin").unwrap().attribute("typeface"),
            Some("A & \"B\"")
        );
    }

    #[test]
    fn test_bom_is_accepted() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"<c:chartSpace xmlns:c=\"urn:c\"/>");
        let part = parse_part("ppt/charts/chart1.xml", &bytes).unwrap();
        assert_eq!(part.root.local_name(), "chartSpace");
    }

    #[test]
    fn test_malformed_parts_are_rejected() {
        assert!(matches!(
            parse_part("x.xml", b"<a><b></a>"),
            Err(Error::XmlError(_))
        ));
        assert!(matches!(parse_part("x.xml", b"<a>"), Err(Error::XmlError(_))));
        assert!(matches!(parse_part("x.xml", b"<a/><b/>"), Err(Error::XmlError(_))));
        assert!(matches!(parse_part("x.xml", b"   "), Err(Error::XmlError(_))));
    }
}
