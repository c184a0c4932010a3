//! Event-driven XML parsing into the owned tree.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Element, Node, XmlDocument};
use crate::error::{Error, Result};

/// Parse a complete sub-package file.
///
/// Comments and processing instructions before the root element are kept in
/// the document prolog; the XML declaration is not kept (a standard one is
/// re-emitted on write). Indentation-only text between elements is dropped,
/// all other text is preserved exactly.
pub fn parse_document(text: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut prolog: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(element_from_start(&e));
            }
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&e);
                attach(&mut stack, &mut prolog, &mut root, Node::Element(element));
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::InvalidPackage("unbalanced end tag".into()))?;
                attach(&mut stack, &mut prolog, &mut root, Node::Element(element));
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                // Indentation between elements: whitespace-only with a newline
                if raw.trim().is_empty() && raw.contains('\n') {
                    continue;
                }
                append_text(&mut stack, &unescape(&raw));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => append_text(&mut stack, &resolved),
                    // Unknown entity: keep it literally so it survives round-trips
                    None => append_text(&mut stack, &format!("&{};", entity)),
                }
            }
            Ok(Event::CData(e)) => {
                let data = String::from_utf8_lossy(e.as_ref()).into_owned();
                attach(&mut stack, &mut prolog, &mut root, Node::Cdata(data));
            }
            Ok(Event::Comment(e)) => {
                let data = String::from_utf8_lossy(e.as_ref()).into_owned();
                attach(&mut stack, &mut prolog, &mut root, Node::Comment(data));
            }
            Ok(Event::PI(e)) => {
                let data = String::from_utf8_lossy(e.as_ref()).into_owned();
                attach(&mut stack, &mut prolog, &mut root, Node::Pi(data));
            }
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
        }
    }

    if !stack.is_empty() {
        return Err(Error::InvalidPackage("unclosed element".into()));
    }

    let root = root.ok_or_else(|| Error::InvalidPackage("no root element".into()))?;
    Ok(XmlDocument { prolog, root })
}

fn element_from_start(e: &BytesStart<'_>) -> Element {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(tag);
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = unescape(&String::from_utf8_lossy(&attr.value));
        element.attrs.push((key, value));
    }
    element
}

fn attach(stack: &mut [Element], prolog: &mut Vec<Node>, root: &mut Option<Element>, node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        match node {
            Node::Element(el) => *root = Some(el),
            other => prolog.push(other),
        }
    }
    // Nodes after the root element are not part of any package we read; drop.
}

fn append_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    let Some(parent) = stack.last_mut() else {
        return;
    };
    // Merge with a preceding text node so entity references do not fragment
    // the content.
    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

/// Resolve an XML entity reference (named or numeric).
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

/// Resolve entity references in an attribute value. Unknown references are
/// left intact.
fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if let Some(end) = rest.find(';')
            && let Some(resolved) = resolve_entity(&rest[1..end])
        {
            out.push_str(&resolved);
            rest = &rest[end + 1..];
            continue;
        }
        out.push('&');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let doc = parse_document(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Spread Self="u1" Hidden="false">
  <Page Self="u2" GeometricBounds="0 0 500 500"/>
</Spread>"#,
        )
        .unwrap();

        assert_eq!(doc.root.tag, "Spread");
        assert_eq!(doc.root.attr("Self"), Some("u1"));
        let page = doc.root.first_child("Page").unwrap();
        assert_eq!(page.attr("GeometricBounds"), Some("0 0 500 500"));
    }

    #[test]
    fn test_parse_keeps_prolog_pi() {
        let doc = parse_document(
            r#"<?xml version="1.0"?>
<?aid style="50" type="document"?>
<Document Self="d"/>"#,
        )
        .unwrap();

        assert_eq!(doc.prolog.len(), 1);
        match &doc.prolog[0] {
            Node::Pi(content) => assert!(content.starts_with("aid ")),
            other => panic!("expected PI, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_text_and_entities() {
        let doc = parse_document(r#"<Content>Don&apos;t &amp; do</Content>"#).unwrap();
        assert_eq!(doc.root.text(), "Don't & do");
        // Entity merged into a single text node
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn test_parse_numeric_entities() {
        let doc = parse_document(r#"<Content>a&#65;&#x42;</Content>"#).unwrap();
        assert_eq!(doc.root.text(), "aAB");
    }

    #[test]
    fn test_parse_attribute_entities() {
        let doc = parse_document(r#"<Color Name="A &amp; B"/>"#).unwrap();
        assert_eq!(doc.root.attr("Name"), Some("A & B"));
    }

    #[test]
    fn test_parse_cdata() {
        let doc = parse_document(r#"<Contents><![CDATA[aGVsbG8=]]></Contents>"#).unwrap();
        assert_eq!(doc.root.children, vec![Node::Cdata("aGVsbG8=".into())]);
    }

    #[test]
    fn test_parse_drops_indentation_keeps_spaces() {
        let doc =
            parse_document("<Story>\n  <Content> padded </Content>\n</Story>").unwrap();
        // Indentation between elements gone, inner padding kept
        assert_eq!(doc.root.children.len(), 1);
        let content = doc.root.first_child("Content").unwrap();
        assert_eq!(content.text(), " padded ");
    }

    #[test]
    fn test_parse_no_root_is_error() {
        assert!(parse_document("<?xml version=\"1.0\"?>").is_err());
    }
}
