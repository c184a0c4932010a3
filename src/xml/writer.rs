//! Serialize the owned tree back to XML text.

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use super::{Element, Node, XmlDocument};
use crate::error::Result;

/// Write a sub-package file: standard XML declaration, prolog nodes, root.
pub fn write_document(doc: &XmlDocument) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    for node in &doc.prolog {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, &doc.root)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(el) => write_element(writer, el)?,
        Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text.as_str())))?,
        Node::Cdata(data) => {
            writer.write_event(Event::CData(BytesCData::new(data.as_str())))?
        }
        Node::Comment(data) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(data.as_str())))?
        }
        Node::Pi(data) => writer.write_event(Event::PI(BytesPI::new(data.as_str())))?,
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        for child in &element.children {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;
    }
    Ok(())
}
