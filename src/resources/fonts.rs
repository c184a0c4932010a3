//! Font families and the fonts sub-package.
//!
//! A `FontFamily` aggregates the sibling font-style records the document
//! knows about. Inspecting a raw font binary is an external concern: callers
//! hand the already-extracted [`FontInfo`] to `Document::add_font`.

use crate::error::{Error, Result};
use crate::package::PackageFile;
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::xml::{Element, Node};

const IMPLEMENTED: &[&str] = &["FontFamily"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    Installed,
    NotInstalled,
    PartiallyInstalled,
}

impl FontStatus {
    pub fn name(self) -> &'static str {
        match self {
            FontStatus::Installed => "Installed",
            FontStatus::NotInstalled => "NotInstalled",
            FontStatus::PartiallyInstalled => "PartiallyInstalled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Installed" => Some(FontStatus::Installed),
            "NotInstalled" => Some(FontStatus::NotInstalled),
            "PartiallyInstalled" => Some(FontStatus::PartiallyInstalled),
            _ => None,
        }
    }
}

/// Naming data extracted from a font binary by an external inspection
/// service.
#[derive(Debug, Clone)]
pub struct FontInfo {
    pub family_name: String,
    pub full_name: String,
    pub style_name: String,
    pub post_script_name: String,
    pub weight_class: Option<u16>,
    pub is_italic: bool,
}

/// One font-style record inside a family.
#[derive(Debug, Clone)]
pub struct Font {
    pub id: String,
    pub font_family: String,
    pub name: String,
    pub post_script_name: Option<String>,
    pub font_style_name: String,
    pub status: Option<FontStatus>,
    pub font_type: Option<String>,
    source: Option<Element>,
}

impl Font {
    fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("Font/Self".into()))?;
        let font_family = fields
            .string("FontFamily")
            .ok_or_else(|| Error::MissingAttribute("Font/FontFamily".into()))?;
        let name = fields
            .string("Name")
            .ok_or_else(|| Error::MissingAttribute("Font/Name".into()))?;
        let font_style_name = fields
            .string("FontStyleName")
            .ok_or_else(|| Error::MissingAttribute("Font/FontStyleName".into()))?;

        Ok(Font {
            id,
            font_family,
            name,
            post_script_name: fields.string("PostScriptName"),
            font_style_name,
            status: fields.get("Status").and_then(FontStatus::from_name),
            font_type: fields.string("FontType"),
            source: Some(element.clone()),
        })
    }

    fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("FontFamily", self.font_family.clone())
            .set("Name", self.name.clone())
            .set("PostScriptName", self.post_script_name.clone())
            .set("FontStyleName", self.font_style_name.clone())
            .set("Status", self.status.map(|s| s.name().to_string()))
            .set("FontType", self.font_type.clone());
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };
        patch("Font", &edits, identity, &["Properties"], Vec::new())
    }
}

/// A font family and its style records.
#[derive(Debug, Clone)]
pub struct FontFamily {
    pub id: String,
    pub name: String,
    pub fonts: Vec<Font>,
    source: Option<Element>,
}

impl FontFamily {
    pub fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("FontFamily/Self".into()))?;
        let name = fields
            .string("Name")
            .ok_or_else(|| Error::MissingAttribute("FontFamily/Name".into()))?;

        let fonts = element
            .children_named("Font")
            .map(Font::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(FontFamily {
            id,
            name,
            fonts,
            source: Some(element.clone()),
        })
    }

    /// The style names available in this family, in record order.
    pub fn available_styles(&self) -> Vec<&str> {
        self.fonts
            .iter()
            .map(|font| font.font_style_name.as_str())
            .collect()
    }

    /// Append a new style record to the family.
    pub fn add_style(
        &mut self,
        style_name: &str,
        post_script_name: &str,
        status: FontStatus,
        font_type: &str,
    ) -> &Font {
        let name = format!("{} {}", self.name, style_name);
        let id = format!("{}Fontn{}", self.id, name);
        self.fonts.push(Font {
            id,
            font_family: self.name.clone(),
            name,
            post_script_name: Some(post_script_name.to_string()),
            font_style_name: style_name.to_string(),
            status: Some(status),
            font_type: Some(font_type.to_string()),
            source: None,
        });
        self.fonts.last().unwrap()
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Name", self.name.clone());
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };
        let children = self
            .fonts
            .iter()
            .map(|font| Node::Element(font.serialize()))
            .collect();
        patch("FontFamily", &edits, identity, &["Properties"], children)
    }
}

/// The fonts sub-package.
#[derive(Debug, Clone)]
pub struct FontsPackage {
    pub(crate) file: PackageFile,
    pub families: Vec<FontFamily>,
}

impl FontsPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        let families = file
            .root
            .children_named("FontFamily")
            .map(FontFamily::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(FontsPackage { file, families })
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// Register a font in its family, creating the family if needed.
    /// Returns the id of the new style record.
    pub(crate) fn add_font(&mut self, info: &FontInfo, font_type: &str, family_id: String) -> String {
        let family = match self
            .families
            .iter_mut()
            .position(|family| family.name == info.family_name)
        {
            Some(index) => &mut self.families[index],
            None => {
                self.families.push(FontFamily {
                    id: family_id,
                    name: info.family_name.clone(),
                    fonts: Vec::new(),
                    source: None,
                });
                self.families.last_mut().unwrap()
            }
        };
        family
            .add_style(
                &info.style_name,
                &info.post_script_name,
                FontStatus::Installed,
                font_type,
            )
            .id
            .clone()
    }

    pub fn serialize(&self) -> Result<String> {
        let replacements = self
            .families
            .iter()
            .map(|family| Node::Element(family.serialize()))
            .collect();
        self.file.serialize_with(IMPLEMENTED, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONTS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Fonts xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <FontFamily Self="di75" Name="Minion Pro">
    <Font Self="di75FontnMinion Pro Regular" FontFamily="Minion Pro" Name="Minion Pro Regular" PostScriptName="$ID/MinionPro-Regular" Status="Installed" FontStyleName="Regular" FontType="OpenTypeCFF"/>
  </FontFamily>
  <CompositeFont Self="CompositeFont/$ID/[No composite font]" Name="$ID/[No composite font]"/>
</idPkg:Fonts>"#;

    #[test]
    fn test_parse_families() {
        let package = FontsPackage::parse("Resources/Fonts.xml", FONTS).unwrap();
        assert_eq!(package.families.len(), 1);
        let family = &package.families[0];
        assert_eq!(family.name, "Minion Pro");
        assert_eq!(family.available_styles(), vec!["Regular"]);
    }

    #[test]
    fn test_add_font_creates_family_and_style() {
        let mut package = FontsPackage::parse("Resources/Fonts.xml", FONTS).unwrap();
        let info = FontInfo {
            family_name: "Montserrat".into(),
            full_name: "Montserrat Bold".into(),
            style_name: "Bold".into(),
            post_script_name: "Montserrat-Bold".into(),
            weight_class: Some(700),
            is_italic: false,
        };
        package.add_font(&info, "OpenTypeTT", "u200".into());
        assert_eq!(package.families.len(), 2);
        let family = package.families.last().unwrap();
        assert_eq!(family.available_styles(), vec!["Bold"]);
        assert_eq!(family.fonts[0].name, "Montserrat Bold");
    }

    #[test]
    fn test_add_font_appends_to_existing_family() {
        let mut package = FontsPackage::parse("Resources/Fonts.xml", FONTS).unwrap();
        let info = FontInfo {
            family_name: "Minion Pro".into(),
            full_name: "Minion Pro Bold".into(),
            style_name: "Bold".into(),
            post_script_name: "MinionPro-Bold".into(),
            weight_class: Some(700),
            is_italic: false,
        };
        package.add_font(&info, "OpenTypeCFF", "unused".into());
        assert_eq!(package.families.len(), 1);
        assert_eq!(
            package.families[0].available_styles(),
            vec!["Regular", "Bold"]
        );
    }

    #[test]
    fn test_serialize_keeps_composite_font() {
        let package = FontsPackage::parse("Resources/Fonts.xml", FONTS).unwrap();
        let out = package.serialize().unwrap();
        assert!(out.contains("CompositeFont"));
        assert!(out.contains(r#"PostScriptName="$ID/MinionPro-Regular""#));
    }
}
