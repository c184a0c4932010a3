//! Shared sub-package plumbing: every category file is a namespaced wrapper
//! element whose implemented children are re-serialized from entities while
//! everything else passes through untouched.

use crate::error::Result;
use crate::util::decode_text;
use crate::xml::{Element, Node, XmlDocument, parse_document, write_document};

/// A parsed sub-package file: archive path plus the wrapper document.
#[derive(Debug, Clone)]
pub struct PackageFile {
    pub path: String,
    pub prolog: Vec<Node>,
    pub root: Element,
}

impl PackageFile {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let text = decode_text(bytes);
        let doc = parse_document(&text)?;
        Ok(PackageFile {
            path: path.into(),
            prolog: doc.prolog,
            root: doc.root,
        })
    }

    /// Serialize the wrapper: original children minus the implemented tags,
    /// with the re-serialized entity elements appended.
    pub fn serialize_with(&self, implemented: &[&str], replacements: Vec<Node>) -> Result<String> {
        let mut root = Element::new(self.root.tag.clone());
        root.attrs = self.root.attrs.clone();
        for child in &self.root.children {
            let keep = match child {
                Node::Element(el) => !implemented.contains(&el.tag.as_str()),
                _ => true,
            };
            if keep {
                root.children.push(child.clone());
            }
        }
        root.children.extend(replacements);

        write_document(&XmlDocument {
            prolog: self.prolog.clone(),
            root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_keeps_unimplemented_children() {
        let file = PackageFile::parse(
            "Resources/Graphic.xml",
            br#"<idPkg:Graphic xmlns:idPkg="ns"><Color Self="c1"/><Ink Self="i1" InkType="Normal"/></idPkg:Graphic>"#,
        )
        .unwrap();

        let mut replacement = Element::new("Color");
        replacement.set_attr("Self", "c2");
        let out = file
            .serialize_with(&["Color"], vec![Node::Element(replacement)])
            .unwrap();

        assert!(out.contains(r#"<Ink Self="i1" InkType="Normal"/>"#));
        assert!(!out.contains(r#"Self="c1""#));
        assert!(out.contains(r#"Self="c2""#));
    }
}
