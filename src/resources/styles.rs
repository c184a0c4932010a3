//! Named paragraph and character styles and the styles sub-package.
//!
//! Styles are id-keyed resources with many optional visual fields. The
//! entity layer models the fields the mutation surface can set; everything
//! else a producing application wrote survives through the patcher.

use crate::error::{Error, Result};
use crate::package::PackageFile;
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::resources::color::{Color, ColorInput};
use crate::util::fmt_number_list;
use crate::xml::{Element, Node};

const IMPLEMENTED: &[&str] = &["RootParagraphStyleGroup", "RootCharacterStyleGroup"];

/// Identity of the baseline style newly created paragraph styles are seeded
/// from.
pub(crate) const NO_PARAGRAPH_STYLE: &str = "ParagraphStyle/$ID/[No paragraph style]";
pub(crate) const NO_CHARACTER_STYLE: &str = "CharacterStyle/$ID/[No character style]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Right,
    Center,
    Justify,
    JustifyLeft,
    JustifyRight,
    JustifyCenter,
    JustifyAll,
}

impl Justification {
    pub fn name(self) -> &'static str {
        match self {
            Justification::Left => "LeftAlign",
            Justification::Right => "RightAlign",
            Justification::Center => "CenterAlign",
            Justification::Justify => "Justify",
            Justification::JustifyLeft => "LeftJustified",
            Justification::JustifyRight => "RightJustified",
            Justification::JustifyCenter => "CenterJustified",
            Justification::JustifyAll => "FullyJustified",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LeftAlign" => Some(Justification::Left),
            "RightAlign" => Some(Justification::Right),
            "CenterAlign" => Some(Justification::Center),
            "Justify" => Some(Justification::Justify),
            "LeftJustified" => Some(Justification::JustifyLeft),
            "RightJustified" => Some(Justification::JustifyRight),
            "CenterJustified" => Some(Justification::JustifyCenter),
            "FullyJustified" => Some(Justification::JustifyAll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capitalization {
    Normal,
    SmallCaps,
    AllCaps,
}

impl Capitalization {
    pub fn name(self) -> &'static str {
        match self {
            Capitalization::Normal => "Normal",
            Capitalization::SmallCaps => "SmallCaps",
            Capitalization::AllCaps => "AllCaps",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" => Some(Capitalization::Normal),
            "SmallCaps" => Some(Capitalization::SmallCaps),
            "AllCaps" => Some(Capitalization::AllCaps),
            _ => None,
        }
    }
}

/// Structural description of a character style for find-or-create
/// resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterStyleInput {
    pub applied_font: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<f64>,
    pub fill_color: Option<ColorInput>,
    pub stroke_color: Option<ColorInput>,
    pub stroke_weight: Option<f64>,
    pub underline: Option<bool>,
    pub strike_through: Option<bool>,
    pub tracking: Option<f64>,
    pub leading: Option<f64>,
}

/// Structural description of a paragraph style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyleInput {
    pub applied_font: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<f64>,
    pub leading: Option<f64>,
    pub align: Option<Justification>,
    pub fill_color: Option<ColorInput>,
    pub stroke_color: Option<ColorInput>,
    pub stroke_weight: Option<f64>,
    pub skew: Option<f64>,
    pub capitalization: Option<Capitalization>,
    pub underline: Option<bool>,
    pub strike_through: Option<bool>,
}

/// Either an existing style id or a structural description to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterStyleSpec {
    Id(String),
    Def(CharacterStyleInput),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphStyleSpec {
    Id(String),
    Def(ParagraphStyleInput),
}

/// A named character style.
#[derive(Debug, Clone)]
pub struct CharacterStyle {
    pub id: String,
    pub name: Option<String>,
    style_uid: Option<String>,
    imported: Option<bool>,
    split_document: Option<bool>,
    emit_css: Option<bool>,
    include_class: Option<bool>,
    extended_keyboard_shortcut: Option<Vec<f64>>,
    pub applied_font: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<f64>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_weight: Option<f64>,
    pub underline: Option<bool>,
    pub strike_through: Option<bool>,
    pub tracking: Option<f64>,
    pub leading: Option<f64>,
    pub(crate) root_group_id: Option<String>,
    source: Option<Element>,
}

/// A named paragraph style. Carries the character-level fields plus the
/// paragraph layout fields.
#[derive(Debug, Clone)]
pub struct ParagraphStyle {
    pub id: String,
    pub name: Option<String>,
    style_uid: Option<String>,
    imported: Option<bool>,
    split_document: Option<bool>,
    emit_css: Option<bool>,
    include_class: Option<bool>,
    extended_keyboard_shortcut: Option<Vec<f64>>,
    pub applied_font: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<f64>,
    pub leading: Option<f64>,
    pub align: Option<Justification>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_weight: Option<f64>,
    tint: Option<f64>,
    stroke_tint: Option<f64>,
    pub skew: Option<f64>,
    pub capitalization: Option<Capitalization>,
    pub tracking: Option<f64>,
    baseline_shift: Option<f64>,
    pub underline: Option<bool>,
    pub strike_through: Option<bool>,
    space_before: Option<f64>,
    space_after: Option<f64>,
    left_indent: Option<f64>,
    right_indent: Option<f64>,
    first_line_indent: Option<f64>,
    hyphenation: Option<bool>,
    align_to_baseline: Option<bool>,
    pub(crate) root_group_id: Option<String>,
    source: Option<Element>,
}

/// Two color references are equal when they are the same swatch or when both
/// resolve to structurally identical swatches.
fn color_refs_equal(a: Option<&str>, b: Option<&str>, colors: &[&Color]) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a == b || {
                let left = colors.iter().find(|color| color.id == a);
                let right = colors.iter().find(|color| color.id == b);
                matches!(
                    (left, right),
                    (Some(left), Some(right))
                        if left.model == right.model
                            && left.space == right.space
                            && left.values == right.values
                )
            }
        }
        _ => false,
    }
}

impl CharacterStyle {
    pub fn parse(element: &Element, root_group_id: Option<String>) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("CharacterStyle/Self".into()))?;

        Ok(CharacterStyle {
            id,
            name: fields.string("Name"),
            style_uid: fields.string("StyleUniqueId"),
            imported: fields.get("Imported").map(|v| v == "true"),
            split_document: fields.get("SplitDocument").map(|v| v == "true"),
            emit_css: fields.get("EmitCss").map(|v| v == "true"),
            include_class: fields.get("IncludeClass").map(|v| v == "true"),
            extended_keyboard_shortcut: fields.number_list("ExtendedKeyboardShortcut"),
            applied_font: fields.string("AppliedFont"),
            font_style: fields.string("FontStyle"),
            font_size: fields.number("PointSize"),
            fill_color: fields.string("FillColor"),
            stroke_color: fields.string("StrokeColor"),
            stroke_weight: fields.number("StrokeWeight"),
            underline: fields.get("Underline").map(|v| v == "true"),
            strike_through: fields.get("StrikeThru").map(|v| v == "true"),
            tracking: fields.number("Tracking"),
            leading: fields.number("Leading"),
            root_group_id,
            source: Some(element.clone()),
        })
    }

    /// Structural equality on the comparable fields, ignoring cosmetic ones
    /// (name, UID, bookkeeping). Color references compare through the pool.
    pub(crate) fn comparable_eq(&self, other: &CharacterStyle, colors: &[&Color]) -> bool {
        self.applied_font == other.applied_font
            && self.font_style == other.font_style
            && self.font_size == other.font_size
            && color_refs_equal(
                self.fill_color.as_deref(),
                other.fill_color.as_deref(),
                colors,
            )
            && color_refs_equal(
                self.stroke_color.as_deref(),
                other.stroke_color.as_deref(),
                colors,
            )
            && self.stroke_weight == other.stroke_weight
            && self.underline.unwrap_or(false) == other.underline.unwrap_or(false)
            && self.strike_through.unwrap_or(false) == other.strike_through.unwrap_or(false)
            && self.tracking == other.tracking
            && self.leading == other.leading
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Name", self.name.clone())
            .set("Imported", self.imported)
            .set("SplitDocument", self.split_document)
            .set("EmitCss", self.emit_css)
            .set("StyleUniqueId", self.style_uid.clone())
            .set("IncludeClass", self.include_class)
            .set(
                "ExtendedKeyboardShortcut",
                self.extended_keyboard_shortcut
                    .as_deref()
                    .map(fmt_number_list),
            )
            .set("AppliedFont", self.applied_font.clone())
            .set("FontStyle", self.font_style.clone())
            .set("PointSize", self.font_size)
            .set("FillColor", self.fill_color.clone())
            .set("StrokeColor", self.stroke_color.clone())
            .set("StrokeWeight", self.stroke_weight)
            .set("Underline", self.underline)
            .set("StrikeThru", self.strike_through)
            .set("Tracking", self.tracking)
            .set("Leading", self.leading);
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };
        patch("CharacterStyle", &edits, identity, &["Properties"], Vec::new())
    }
}

impl ParagraphStyle {
    pub fn parse(element: &Element, root_group_id: Option<String>) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("ParagraphStyle/Self".into()))?;

        Ok(ParagraphStyle {
            id,
            name: fields.string("Name"),
            style_uid: fields.string("StyleUniqueId"),
            imported: fields.get("Imported").map(|v| v == "true"),
            split_document: fields.get("SplitDocument").map(|v| v == "true"),
            emit_css: fields.get("EmitCss").map(|v| v == "true"),
            include_class: fields.get("IncludeClass").map(|v| v == "true"),
            extended_keyboard_shortcut: fields.number_list("ExtendedKeyboardShortcut"),
            applied_font: fields.string("AppliedFont"),
            font_style: fields.string("FontStyle"),
            font_size: fields.number("PointSize"),
            leading: fields.number("Leading"),
            align: fields.get("Justification").and_then(Justification::from_name),
            fill_color: fields.string("FillColor"),
            stroke_color: fields.string("StrokeColor"),
            stroke_weight: fields.number("StrokeWeight"),
            tint: fields.number("Tint"),
            stroke_tint: fields.number("StrokeTint"),
            skew: fields.number("Skew"),
            capitalization: fields
                .get("Capitalization")
                .and_then(Capitalization::from_name),
            tracking: fields.number("Tracking"),
            baseline_shift: fields.number("BaselineShift"),
            underline: fields.get("Underline").map(|v| v == "true"),
            strike_through: fields.get("StrikeThru").map(|v| v == "true"),
            space_before: fields.number("SpaceBefore"),
            space_after: fields.number("SpaceAfter"),
            left_indent: fields.number("LeftIndent"),
            right_indent: fields.number("RightIndent"),
            first_line_indent: fields.number("FirstLineIndent"),
            hyphenation: fields.get("Hyphenation").map(|v| v == "true"),
            align_to_baseline: fields.get("AlignToBaselineGrid").map(|v| v == "true"),
            root_group_id,
            source: Some(element.clone()),
        })
    }

    /// Structural equality on the comparable fields, ignoring cosmetic ones.
    pub(crate) fn comparable_eq(&self, other: &ParagraphStyle, colors: &[&Color]) -> bool {
        self.applied_font == other.applied_font
            && self.font_style == other.font_style
            && self.font_size == other.font_size
            && self.leading == other.leading
            && self.align == other.align
            && color_refs_equal(
                self.fill_color.as_deref(),
                other.fill_color.as_deref(),
                colors,
            )
            && color_refs_equal(
                self.stroke_color.as_deref(),
                other.stroke_color.as_deref(),
                colors,
            )
            && self.stroke_weight == other.stroke_weight
            && self.skew == other.skew
            && self.capitalization == other.capitalization
            && self.tracking == other.tracking
            && self.underline.unwrap_or(false) == other.underline.unwrap_or(false)
            && self.strike_through.unwrap_or(false) == other.strike_through.unwrap_or(false)
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Name", self.name.clone())
            .set("Imported", self.imported)
            .set("SplitDocument", self.split_document)
            .set("EmitCss", self.emit_css)
            .set("StyleUniqueId", self.style_uid.clone())
            .set("IncludeClass", self.include_class)
            .set(
                "ExtendedKeyboardShortcut",
                self.extended_keyboard_shortcut
                    .as_deref()
                    .map(fmt_number_list),
            )
            .set("AppliedFont", self.applied_font.clone())
            .set("PointSize", self.font_size)
            .set("Leading", self.leading)
            .set("Justification", self.align.map(|j| j.name().to_string()))
            .set("FillColor", self.fill_color.clone())
            .set("Tint", self.tint)
            .set("StrokeColor", self.stroke_color.clone())
            .set("StrokeWeight", self.stroke_weight)
            .set("StrokeTint", self.stroke_tint)
            .set("Skew", self.skew)
            .set(
                "Capitalization",
                self.capitalization.map(|c| c.name().to_string()),
            )
            .set("FontStyle", self.font_style.clone())
            .set("Tracking", self.tracking)
            .set("BaselineShift", self.baseline_shift)
            .set("Underline", self.underline)
            .set("StrikeThru", self.strike_through)
            .set("SpaceBefore", self.space_before)
            .set("SpaceAfter", self.space_after)
            .set("LeftIndent", self.left_indent)
            .set("RightIndent", self.right_indent)
            .set("FirstLineIndent", self.first_line_indent)
            .set("Hyphenation", self.hyphenation)
            .set("AlignToBaselineGrid", self.align_to_baseline);
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };
        patch("ParagraphStyle", &edits, identity, &["Properties"], Vec::new())
    }
}

/// The styles sub-package: root style groups plus passthrough content.
#[derive(Debug, Clone)]
pub struct StylesPackage {
    pub(crate) file: PackageFile,
    pub paragraph_styles: Vec<ParagraphStyle>,
    pub character_styles: Vec<CharacterStyle>,
    paragraph_group_sources: Vec<Element>,
    character_group_sources: Vec<Element>,
}

impl StylesPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;

        let mut paragraph_styles = Vec::new();
        let mut paragraph_group_sources = Vec::new();
        for group in file.root.children_named("RootParagraphStyleGroup") {
            let group_id = group.attr("Self").map(str::to_string);
            for element in group.descendants_named("ParagraphStyle") {
                paragraph_styles.push(ParagraphStyle::parse(element, group_id.clone())?);
            }
            paragraph_group_sources.push(group_shell(group));
        }

        let mut character_styles = Vec::new();
        let mut character_group_sources = Vec::new();
        for group in file.root.children_named("RootCharacterStyleGroup") {
            let group_id = group.attr("Self").map(str::to_string);
            for element in group.descendants_named("CharacterStyle") {
                character_styles.push(CharacterStyle::parse(element, group_id.clone())?);
            }
            character_group_sources.push(group_shell(group));
        }

        Ok(StylesPackage {
            file,
            paragraph_styles,
            character_styles,
            paragraph_group_sources,
            character_group_sources,
        })
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    pub fn paragraph_style_by_id(&self, id: &str) -> Option<&ParagraphStyle> {
        self.paragraph_styles.iter().find(|style| style.id == id)
    }

    pub fn character_style_by_id(&self, id: &str) -> Option<&CharacterStyle> {
        self.character_styles.iter().find(|style| style.id == id)
    }

    /// Synthesize a paragraph style from the `[No paragraph style]` baseline
    /// plus the provided overrides, without adding it to the pool yet (the
    /// document first checks the pool for a structural twin).
    pub(crate) fn build_paragraph_style(
        &self,
        id: String,
        name: String,
        style_uid: String,
        input: &ParagraphStyleInput,
        fill_color: Option<String>,
        stroke_color: Option<String>,
    ) -> ParagraphStyle {
        let base = self.paragraph_style_by_id(NO_PARAGRAPH_STYLE).cloned();
        let base = base.unwrap_or_else(|| ParagraphStyle {
            id: String::new(),
            name: None,
            style_uid: None,
            imported: None,
            split_document: None,
            emit_css: None,
            include_class: None,
            extended_keyboard_shortcut: None,
            applied_font: None,
            font_style: None,
            font_size: None,
            leading: None,
            align: None,
            fill_color: None,
            stroke_color: None,
            stroke_weight: None,
            tint: None,
            stroke_tint: None,
            skew: None,
            capitalization: None,
            tracking: None,
            baseline_shift: None,
            underline: None,
            strike_through: None,
            space_before: None,
            space_after: None,
            left_indent: None,
            right_indent: None,
            first_line_indent: None,
            hyphenation: None,
            align_to_baseline: None,
            root_group_id: None,
            source: None,
        });

        let mut style = base;
        style.id = id;
        style.name = Some(name);
        style.style_uid = Some(style_uid);
        style.imported = Some(false);
        style.applied_font = input.applied_font.clone().or(style.applied_font.take());
        style.font_style = input.font_style.clone().or(style.font_style.take());
        style.font_size = input.font_size.or(style.font_size);
        style.leading = input.leading.or(style.leading);
        style.align = input.align.or(style.align);
        style.fill_color = fill_color.or(style.fill_color.take());
        style.stroke_color = stroke_color.or(style.stroke_color.take());
        style.stroke_weight = input.stroke_weight.or(style.stroke_weight);
        style.skew = input.skew.or(style.skew);
        style.capitalization = input.capitalization.or(style.capitalization);
        style.underline = input.underline.or(style.underline);
        style.strike_through = input.strike_through.or(style.strike_through);
        style.source = None;
        style
    }

    pub(crate) fn push_paragraph_style(&mut self, style: ParagraphStyle) -> &ParagraphStyle {
        self.paragraph_styles.push(style);
        self.paragraph_styles.last().unwrap()
    }

    /// Synthesize a character style from the `[No character style]` baseline.
    pub(crate) fn build_character_style(
        &self,
        id: String,
        name: String,
        style_uid: String,
        input: &CharacterStyleInput,
        fill_color: Option<String>,
        stroke_color: Option<String>,
    ) -> CharacterStyle {
        let base = self.character_style_by_id(NO_CHARACTER_STYLE).cloned();
        let base = base.unwrap_or_else(|| CharacterStyle {
            id: String::new(),
            name: None,
            style_uid: None,
            imported: None,
            split_document: None,
            emit_css: None,
            include_class: None,
            extended_keyboard_shortcut: None,
            applied_font: None,
            font_style: None,
            font_size: None,
            fill_color: None,
            stroke_color: None,
            stroke_weight: None,
            underline: None,
            strike_through: None,
            tracking: None,
            leading: None,
            root_group_id: None,
            source: None,
        });

        let mut style = base;
        style.id = id;
        style.name = Some(name);
        style.style_uid = Some(style_uid);
        style.imported = Some(false);
        style.applied_font = input.applied_font.clone().or(style.applied_font.take());
        style.font_style = input.font_style.clone().or(style.font_style.take());
        style.font_size = input.font_size.or(style.font_size);
        style.fill_color = fill_color.or(style.fill_color.take());
        style.stroke_color = stroke_color.or(style.stroke_color.take());
        style.stroke_weight = input.stroke_weight.or(style.stroke_weight);
        style.underline = input.underline.or(style.underline);
        style.strike_through = input.strike_through.or(style.strike_through);
        style.tracking = input.tracking.or(style.tracking);
        style.leading = input.leading.or(style.leading);
        style.source = None;
        style
    }

    pub(crate) fn push_character_style(&mut self, style: CharacterStyle) -> &CharacterStyle {
        self.character_styles.push(style);
        self.character_styles.last().unwrap()
    }

    pub fn serialize(&self) -> Result<String> {
        let mut replacements = Vec::new();

        for group in build_groups(
            &self.character_group_sources,
            "RootCharacterStyleGroup",
            "ucsg",
            &self.character_styles,
            |style| style.root_group_id.as_deref(),
            |style| style.serialize(),
        ) {
            replacements.push(Node::Element(group));
        }

        for group in build_groups(
            &self.paragraph_group_sources,
            "RootParagraphStyleGroup",
            "upsg",
            &self.paragraph_styles,
            |style| style.root_group_id.as_deref(),
            |style| style.serialize(),
        ) {
            replacements.push(Node::Element(group));
        }

        self.file.serialize_with(IMPLEMENTED, replacements)
    }
}

/// Attributes-only clone of a style group wrapper (children are rebuilt from
/// the style pool on serialization).
fn group_shell(group: &Element) -> Element {
    let mut shell = Element::new(group.tag.clone());
    shell.attrs = group.attrs.clone();
    shell
}

/// Rebuild the root style groups: each style lands in its recorded group
/// (styles with no recorded group fall into the first).
fn build_groups<T>(
    sources: &[Element],
    tag: &str,
    fallback_id: &str,
    styles: &[T],
    group_of: impl Fn(&T) -> Option<&str>,
    serialize: impl Fn(&T) -> Element,
) -> Vec<Element> {
    let mut groups: Vec<Element> = if sources.is_empty() {
        let mut group = Element::new(tag);
        group.set_attr("Self", fallback_id);
        vec![group]
    } else {
        sources.to_vec()
    };

    let default_id = groups[0].attr("Self").unwrap_or(fallback_id).to_string();
    for style in styles {
        let target = group_of(style).unwrap_or(&default_id).to_string();
        let group = groups
            .iter_mut()
            .find(|g| g.attr("Self") == Some(target.as_str()));
        match group {
            Some(group) => group.push_element(serialize(style)),
            None => {
                let mut group = Element::new(tag);
                group.set_attr("Self", target);
                group.push_element(serialize(style));
                groups.push(group);
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Styles xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <RootCharacterStyleGroup Self="u7b">
    <CharacterStyle Self="CharacterStyle/$ID/[No character style]" Name="$ID/[No character style]"/>
  </RootCharacterStyleGroup>
  <RootParagraphStyleGroup Self="u7c">
    <ParagraphStyle Self="ParagraphStyle/$ID/[No paragraph style]" Name="$ID/[No paragraph style]" Justification="LeftAlign" PointSize="12">
      <Properties>
        <AppliedFont type="string">Minion Pro</AppliedFont>
      </Properties>
    </ParagraphStyle>
  </RootParagraphStyleGroup>
  <RootCellStyleGroup Self="u7d"/>
</idPkg:Styles>"#;

    #[test]
    fn test_parse_styles_and_groups() {
        let package = StylesPackage::parse("Resources/Styles.xml", STYLES).unwrap();
        assert_eq!(package.character_styles.len(), 1);
        assert_eq!(package.paragraph_styles.len(), 1);

        let base = &package.paragraph_styles[0];
        assert_eq!(base.align, Some(Justification::Left));
        assert_eq!(base.font_size, Some(12.0));
        // Field stored in the Properties group is flattened on parse
        assert_eq!(base.applied_font.as_deref(), Some("Minion Pro"));
        assert_eq!(base.root_group_id.as_deref(), Some("u7c"));
    }

    #[test]
    fn test_serialize_keeps_group_placement_and_passthrough() {
        let package = StylesPackage::parse("Resources/Styles.xml", STYLES).unwrap();
        let out = package.serialize().unwrap();
        // AppliedFont stays inside the Properties group
        assert!(out.contains(r#"<AppliedFont type="string">Minion Pro</AppliedFont>"#));
        // Unimplemented cell style group survives
        assert!(out.contains("RootCellStyleGroup"));
        // Groups keep their ids
        assert!(out.contains(r#"<RootParagraphStyleGroup Self="u7c">"#));
    }

    #[test]
    fn test_build_paragraph_style_seeds_from_baseline() {
        let mut package = StylesPackage::parse("Resources/Styles.xml", STYLES).unwrap();
        let input = ParagraphStyleInput {
            font_size: Some(24.0),
            ..Default::default()
        };
        let style = package.build_paragraph_style(
            "ParagraphStyle/u100".into(),
            "Paragraph Style 2".into(),
            "uid-1".into(),
            &input,
            None,
            None,
        );
        assert_eq!(style.font_size, Some(24.0));
        // Inherited from the baseline
        assert_eq!(style.applied_font.as_deref(), Some("Minion Pro"));
        assert_eq!(style.align, Some(Justification::Left));
        assert_eq!(style.root_group_id.as_deref(), Some("u7c"));
        package.push_paragraph_style(style);
        assert!(package.paragraph_style_by_id("ParagraphStyle/u100").is_some());
    }

    #[test]
    fn test_comparable_eq_ignores_cosmetic_fields() {
        let package = StylesPackage::parse("Resources/Styles.xml", STYLES).unwrap();
        let input = CharacterStyleInput {
            font_size: Some(10.0),
            ..Default::default()
        };
        let first = package.build_character_style(
            "CharacterStyle/u101".into(),
            "Character Style 2".into(),
            "uid-2".into(),
            &input,
            None,
            None,
        );
        // Same comparable fields under different id/name/uid
        let second = package.build_character_style(
            "CharacterStyle/u102".into(),
            "Character Style 3".into(),
            "uid-3".into(),
            &input,
            None,
            None,
        );
        assert!(first.comparable_eq(&second, &[]));

        let different = package.build_character_style(
            "CharacterStyle/u103".into(),
            "Character Style 4".into(),
            "uid-4".into(),
            &CharacterStyleInput {
                font_size: Some(11.0),
                ..Default::default()
            },
            None,
            None,
        );
        assert!(!first.comparable_eq(&different, &[]));
    }
}
