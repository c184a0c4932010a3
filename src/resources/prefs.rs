//! The preferences sub-package. Almost everything here is passthrough; the
//! document preference block is patched in place when the page size changes.

use crate::error::Result;
use crate::package::PackageFile;
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::xml::Node;

#[derive(Debug, Clone)]
pub struct PreferencesPackage {
    pub(crate) file: PackageFile,
}

impl PreferencesPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        Ok(PreferencesPackage { file })
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// The declared document page size, when present.
    pub fn page_size(&self) -> Option<(f64, f64)> {
        let preference = self.file.root.first_child("DocumentPreference")?;
        let fields = element_fields(preference, &["Properties"]);
        Some((fields.number("PageWidth")?, fields.number("PageHeight")?))
    }

    /// Rewrite the page size on the document preference block, preserving
    /// every other field it carries.
    pub(crate) fn set_page_size(&mut self, width: f64, height: f64) {
        let position = self.file.root.children.iter().position(|node| {
            node.as_element()
                .is_some_and(|el| el.tag == "DocumentPreference")
        });
        let Some(position) = position else {
            return;
        };
        let Some(original) = self.file.root.children[position].as_element().cloned() else {
            return;
        };
        let patched = patch(
            "DocumentPreference",
            &Edits::new()
                .set("PageWidth", width)
                .set("PageHeight", height),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );
        self.file.root.children[position] = Node::Element(patched);
    }

    pub fn serialize(&self) -> Result<String> {
        self.file.serialize_with(&[], Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFERENCES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Preferences xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <DocumentPreference PageHeight="792" PageWidth="612" PagesPerDocument="1" FacingPages="false"/>
  <ViewPreference HorizontalMeasurementUnits="Points" VerticalMeasurementUnits="Points"/>
</idPkg:Preferences>"#;

    #[test]
    fn test_page_size_roundtrip() {
        let mut package = PreferencesPackage::parse("Resources/Preferences.xml", PREFERENCES).unwrap();
        assert_eq!(package.page_size(), Some((612.0, 792.0)));

        package.set_page_size(500.0, 500.0);
        assert_eq!(package.page_size(), Some((500.0, 500.0)));

        let out = package.serialize().unwrap();
        assert!(out.contains(r#"PageWidth="500""#));
        // Untouched preference fields and siblings survive
        assert!(out.contains(r#"FacingPages="false""#));
        assert!(out.contains("ViewPreference"));
    }
}
