//! Owned XML tree used as the on-disk representation of every sub-package
//! and as the opaque carrier for structure the entity layer does not model.
//!
//! Attribute order and child order are preserved exactly as parsed, which is
//! what lets the element patcher reproduce untouched structure byte-for-byte
//! equivalent on re-serialization.

mod parser;
mod writer;

pub use parser::parse_document;
pub use writer::write_document;

/// One node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Cdata(String),
    Comment(String),
    /// Processing instruction content without the `<?` / `?>` delimiters.
    Pi(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element: tag name, ordered attributes, ordered children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A parsed sub-package file: prolog nodes (processing instructions and
/// comments that precede the root) plus the root element.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    pub prolog: Vec<Node>,
    pub root: Element,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one of the same name or
    /// appending otherwise.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Direct element children.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Direct element children with the given tag.
    pub fn children_named<'e>(&'e self, tag: &str) -> impl Iterator<Item = &'e Element> {
        let tag = tag.to_string();
        self.elements().filter(move |el| el.tag == tag)
    }

    /// First direct element child with the given tag.
    pub fn first_child(&self, tag: &str) -> Option<&Element> {
        self.children_named(tag).next()
    }

    pub fn first_child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.tag == tag => Some(el),
            _ => None,
        })
    }

    /// All descendant elements with the given tag, in document order.
    pub fn descendants_named<'e>(&'e self, tag: &str) -> Vec<&'e Element> {
        let mut found = Vec::new();
        for child in self.elements() {
            if child.tag == tag {
                found.push(child);
            }
            found.extend(child.descendants_named(tag));
        }
        found
    }

    /// Find a descendant with the given tag whose `Self` attribute equals `id`.
    pub fn find_by_id(&self, tag: &str, id: &str) -> Option<&Element> {
        self.descendants_named(tag)
            .into_iter()
            .find(|el| el.attr("Self") == Some(id))
    }

    /// Concatenated text content of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(t) | Node::Cdata(t) => out.push_str(t),
            Node::Element(el) => collect_text(el, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        let mut root = Element::new("Spread");
        root.set_attr("Self", "u1");
        let mut props = Element::new("Properties");
        let mut label = Element::new("Label");
        label.push(Node::Text("hello".into()));
        props.push_element(label);
        root.push_element(props);
        let mut page = Element::new("Page");
        page.set_attr("Self", "u2");
        root.push_element(page);
        root
    }

    #[test]
    fn test_attr_lookup_and_set() {
        let mut el = sample();
        assert_eq!(el.attr("Self"), Some("u1"));
        assert_eq!(el.attr("Missing"), None);
        el.set_attr("Self", "u9");
        assert_eq!(el.attr("Self"), Some("u9"));
        assert_eq!(el.attrs.len(), 1);
    }

    #[test]
    fn test_child_navigation() {
        let el = sample();
        assert!(el.first_child("Properties").is_some());
        assert!(el.first_child("Page").is_some());
        assert!(el.first_child("Label").is_none());
        assert_eq!(el.descendants_named("Label").len(), 1);
    }

    #[test]
    fn test_find_by_id() {
        let el = sample();
        assert!(el.find_by_id("Page", "u2").is_some());
        assert!(el.find_by_id("Page", "u3").is_none());
    }

    #[test]
    fn test_text_content() {
        let el = sample();
        assert_eq!(el.text(), "hello");
    }
}
