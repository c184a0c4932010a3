//! Text stories: ordered paragraph ranges holding styled character runs.
//!
//! Run content is literal text; embedded newlines become explicit `<Br/>`
//! markers on serialization and are folded back into `\n` on parse.

use crate::error::{Error, Result};
use crate::package::PackageFile;
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::resources::{CharacterStyleSpec, ParagraphStyleSpec};
use crate::xml::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    TextFrame,
    GraphicFrame,
    UnassignedFrame,
}

impl FrameType {
    pub fn name(self) -> &'static str {
        match self {
            FrameType::TextFrame => "TextFrameType",
            FrameType::GraphicFrame => "GraphicFrameType",
            FrameType::UnassignedFrame => "UnassignedFrameType",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TextFrameType" => Some(FrameType::TextFrame),
            "GraphicFrameType" => Some(FrameType::GraphicFrame),
            "UnassignedFrameType" => Some(FrameType::UnassignedFrame),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryOrientation {
    Horizontal,
    Vertical,
}

impl StoryOrientation {
    pub fn name(self) -> &'static str {
        match self {
            StoryOrientation::Horizontal => "Horizontal",
            StoryOrientation::Vertical => "Vertical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Horizontal" => Some(StoryOrientation::Horizontal),
            "Vertical" => Some(StoryOrientation::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryDirection {
    LeftToRight,
    RightToLeft,
}

impl StoryDirection {
    pub fn name(self) -> &'static str {
        match self {
            StoryDirection::LeftToRight => "LeftToRightDirection",
            StoryDirection::RightToLeft => "RightToLeftDirection",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LeftToRightDirection" => Some(StoryDirection::LeftToRight),
            "RightToLeftDirection" => Some(StoryDirection::RightToLeft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryPreference {
    pub optical_margin_alignment: bool,
    pub optical_margin_size: f64,
    pub frame_type: FrameType,
    pub orientation: StoryOrientation,
    pub direction: StoryDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InCopyExportOption {
    pub include_graphic_proxies: bool,
    pub include_all_resources: bool,
}

/// A run of identically styled text.
#[derive(Debug, Clone)]
pub struct CharacterRange {
    pub applied_character_style: String,
    pub content: String,
    source: Option<Element>,
}

impl CharacterRange {
    pub fn new(applied_character_style: impl Into<String>, content: impl Into<String>) -> Self {
        CharacterRange {
            applied_character_style: applied_character_style.into(),
            content: content.into(),
            source: None,
        }
    }
}

/// A paragraph: one paragraph-style reference and its runs.
#[derive(Debug, Clone)]
pub struct ParagraphRange {
    pub applied_paragraph_style: String,
    pub runs: Vec<CharacterRange>,
    source: Option<Element>,
}

impl ParagraphRange {
    pub fn new(applied_paragraph_style: impl Into<String>, runs: Vec<CharacterRange>) -> Self {
        ParagraphRange {
            applied_paragraph_style: applied_paragraph_style.into(),
            runs,
            source: None,
        }
    }
}

/// Caller-facing description of a run when building or rewriting a story.
#[derive(Debug, Clone)]
pub struct RunInput {
    pub character_style: CharacterStyleSpec,
    pub content: String,
}

/// Caller-facing description of a paragraph.
#[derive(Debug, Clone)]
pub struct ParagraphInput {
    pub paragraph_style: ParagraphStyleSpec,
    pub runs: Vec<RunInput>,
}

/// A text story.
#[derive(Debug, Clone)]
pub struct Story {
    pub id: String,
    pub paragraphs: Vec<ParagraphRange>,
    user_text: Option<bool>,
    title: Option<String>,
    pub preference: Option<StoryPreference>,
    pub in_copy_export_option: Option<InCopyExportOption>,
    source: Option<Element>,
}

impl Story {
    pub(crate) fn create(
        id: String,
        paragraphs: Vec<ParagraphRange>,
        preference: StoryPreference,
        in_copy_export_option: InCopyExportOption,
    ) -> Self {
        Story {
            id,
            paragraphs,
            user_text: Some(true),
            title: Some("$ID/".to_string()),
            preference: Some(preference),
            in_copy_export_option: Some(in_copy_export_option),
            source: None,
        }
    }

    pub fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute(format!("{}/Self", element.tag)))?;

        let preference = element
            .first_child("StoryPreference")
            .map(parse_story_preference)
            .transpose()?;
        let in_copy_export_option = element
            .first_child("InCopyExportOption")
            .map(parse_in_copy_export_option);

        let paragraphs = element
            .children_named("ParagraphStyleRange")
            .map(parse_paragraph_range)
            .collect::<Result<Vec<_>>>()?;

        Ok(Story {
            id,
            paragraphs,
            user_text: fields.get("UserText").map(|v| v == "true"),
            title: fields.string("StoryTitle"),
            preference,
            in_copy_export_option,
            source: Some(element.clone()),
        })
    }

    /// Serialize under the given tag (`Story` for story sub-packages,
    /// `XmlStory` for the backing story).
    pub fn serialize(&self, tag: &str) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("UserText", self.user_text)
            .set("StoryTitle", self.title.clone());
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };

        let mut children: Vec<Node> = Vec::new();
        if let Some(preference) = &self.preference {
            children.push(Node::Element(serialize_story_preference(
                preference,
                self.source
                    .as_ref()
                    .and_then(|s| s.first_child("StoryPreference")),
            )));
        }
        if let Some(option) = &self.in_copy_export_option {
            children.push(Node::Element(serialize_in_copy_export_option(
                option,
                self.source
                    .as_ref()
                    .and_then(|s| s.first_child("InCopyExportOption")),
            )));
        }
        for paragraph in &self.paragraphs {
            children.push(Node::Element(serialize_paragraph_range(paragraph)));
        }

        patch(tag, &edits, identity, &["Properties"], children)
    }
}

fn parse_story_preference(element: &Element) -> Result<StoryPreference> {
    let fields = element_fields(element, &["Properties"]);
    Ok(StoryPreference {
        optical_margin_alignment: fields.bool_or("OpticalMarginAlignment", false),
        optical_margin_size: fields
            .number("OpticalMarginSize")
            .ok_or_else(|| Error::MissingAttribute("StoryPreference/OpticalMarginSize".into()))?,
        frame_type: fields
            .get("FrameType")
            .and_then(FrameType::from_name)
            .unwrap_or(FrameType::TextFrame),
        orientation: fields
            .get("StoryOrientation")
            .and_then(StoryOrientation::from_name)
            .unwrap_or(StoryOrientation::Horizontal),
        direction: fields
            .get("StoryDirection")
            .and_then(StoryDirection::from_name)
            .unwrap_or(StoryDirection::LeftToRight),
    })
}

fn serialize_story_preference(
    preference: &StoryPreference,
    source: Option<&Element>,
) -> Element {
    let edits = Edits::new()
        .set("OpticalMarginAlignment", preference.optical_margin_alignment)
        .set("OpticalMarginSize", preference.optical_margin_size)
        .set("FrameType", preference.frame_type.name())
        .set("StoryOrientation", preference.orientation.name())
        .set("StoryDirection", preference.direction.name());
    let identity = match source {
        Some(source) => Identity::Element(source),
        None => Identity::None,
    };
    patch("StoryPreference", &edits, identity, &["Properties"], Vec::new())
}

fn parse_in_copy_export_option(element: &Element) -> InCopyExportOption {
    let fields = element_fields(element, &["Properties"]);
    InCopyExportOption {
        include_graphic_proxies: fields.bool_or("IncludeGraphicProxies", false),
        include_all_resources: fields.bool_or("IncludeAllResources", false),
    }
}

fn serialize_in_copy_export_option(
    option: &InCopyExportOption,
    source: Option<&Element>,
) -> Element {
    let edits = Edits::new()
        .set("IncludeGraphicProxies", option.include_graphic_proxies)
        .set("IncludeAllResources", option.include_all_resources);
    let identity = match source {
        Some(source) => Identity::Element(source),
        None => Identity::None,
    };
    patch(
        "InCopyExportOption",
        &edits,
        identity,
        &["Properties"],
        Vec::new(),
    )
}

fn parse_paragraph_range(element: &Element) -> Result<ParagraphRange> {
    let fields = element_fields(element, &["Properties"]);
    let applied_paragraph_style = fields.string("AppliedParagraphStyle").ok_or_else(|| {
        Error::MissingAttribute("ParagraphStyleRange/AppliedParagraphStyle".into())
    })?;

    let runs = element
        .children_named("CharacterStyleRange")
        .map(parse_character_range)
        .collect::<Result<Vec<_>>>()?;

    Ok(ParagraphRange {
        applied_paragraph_style,
        runs,
        source: Some(element.clone()),
    })
}

fn parse_character_range(element: &Element) -> Result<CharacterRange> {
    let fields = element_fields(element, &["Properties"]);
    let applied_character_style = fields.string("AppliedCharacterStyle").ok_or_else(|| {
        Error::MissingAttribute("CharacterStyleRange/AppliedCharacterStyle".into())
    })?;

    // Fold Content/Br children back into literal text.
    let mut content = String::new();
    for child in element.elements() {
        match child.tag.as_str() {
            "Content" => content.push_str(&child.text()),
            "Br" => content.push('\n'),
            _ => {}
        }
    }

    Ok(CharacterRange {
        applied_character_style,
        content,
        source: Some(element.clone()),
    })
}

fn serialize_paragraph_range(paragraph: &ParagraphRange) -> Element {
    let edits = Edits::new().set(
        "AppliedParagraphStyle",
        paragraph.applied_paragraph_style.as_str(),
    );
    let identity = match &paragraph.source {
        Some(source) => Identity::Element(source),
        None => Identity::None,
    };
    let runs = paragraph
        .runs
        .iter()
        .map(|run| Node::Element(serialize_character_range(run)))
        .collect();
    patch("ParagraphStyleRange", &edits, identity, &["Properties"], runs)
}

fn serialize_character_range(run: &CharacterRange) -> Element {
    let edits = Edits::new().set(
        "AppliedCharacterStyle",
        run.applied_character_style.as_str(),
    );
    let identity = match &run.source {
        Some(source) => Identity::Element(source),
        None => Identity::None,
    };

    // Keep any children the run carried that we do not manage.
    let mut children: Vec<Node> = Vec::new();
    if let Some(source) = &run.source {
        for child in &source.children {
            let keep = match child {
                Node::Element(el) => {
                    el.tag != "Content" && el.tag != "Br" && el.tag != "Properties"
                }
                _ => false,
            };
            if keep {
                children.push(child.clone());
            }
        }
    }
    children.extend(content_nodes(&run.content));

    patch(
        "CharacterStyleRange",
        &edits,
        identity,
        &["Properties"],
        children,
    )
}

/// Split run content on embedded newlines into alternating content/break
/// nodes. Empty segments contribute only their breaks, and a trailing break
/// is never emitted.
fn content_nodes(content: &str) -> Vec<Node> {
    let segments: Vec<&str> = content.split('\n').collect();
    let Some(last_non_empty) = segments.iter().rposition(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    for (i, segment) in segments[..=last_non_empty].iter().enumerate() {
        if i > 0 {
            nodes.push(Node::Element(Element::new("Br")));
        }
        if !segment.is_empty() {
            let mut content_element = Element::new("Content");
            content_element.push(Node::Text(segment.to_string()));
            nodes.push(Node::Element(content_element));
        }
    }
    nodes
}

/// A story sub-package (usually exactly one story per file).
#[derive(Debug, Clone)]
pub struct StoryPackage {
    pub(crate) file: PackageFile,
    pub stories: Vec<Story>,
}

impl StoryPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        let stories = file
            .root
            .children_named("Story")
            .map(Story::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(StoryPackage { file, stories })
    }

    /// A new single-story package around a freshly created story.
    pub(crate) fn create(path: String, story: Story) -> Self {
        StoryPackage {
            file: PackageFile {
                path,
                prolog: Vec::new(),
                root: story_wrapper("idPkg:Story"),
            },
            stories: vec![story],
        }
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    pub fn serialize(&self) -> Result<String> {
        let replacements = self
            .stories
            .iter()
            .map(|story| Node::Element(story.serialize("Story")))
            .collect();
        self.file.serialize_with(&["Story"], replacements)
    }
}

/// The backing (structured-text) story sub-package.
#[derive(Debug, Clone)]
pub struct BackingStoryPackage {
    pub(crate) file: PackageFile,
    pub story: Story,
}

impl BackingStoryPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        let element = file
            .root
            .first_child("XmlStory")
            .ok_or_else(|| Error::MissingElement("XmlStory".into()))?;
        let story = Story::parse(element)?;
        Ok(BackingStoryPackage { file, story })
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    pub fn serialize(&self) -> Result<String> {
        let replacements = vec![Node::Element(self.story.serialize("XmlStory"))];
        self.file.serialize_with(&["XmlStory"], replacements)
    }
}

fn story_wrapper(tag: &str) -> Element {
    let mut root = Element::new(tag);
    root.set_attr(
        "xmlns:idPkg",
        "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging",
    );
    root.set_attr("DOMVersion", "20.0");
    root
}
