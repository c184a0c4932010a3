//! The document package: typed sub-package collections indexed by the
//! manifest, identity generation, find-or-create resource resolution, and
//! the load/export protocols.
//!
//! A `Document` value only exists fully loaded: any structural failure while
//! parsing a declared sub-package aborts the whole load. Export re-serializes
//! every tracked sub-package, rewrites the manifest, and passes through
//! untouched archive entries byte-identical.

mod idgen;
mod templates;

pub use idgen::IdGenerator;

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::geometry::{GeometricBounds, PathCommand, Transform};
use crate::resources::{
    Color, ColorSpec, FontFamily, FontInfo, FontsPackage, GraphicPackage, ParagraphStyle,
    ParagraphStyleSpec, PreferencesPackage, StylesPackage,
};
use crate::resources::{CharacterStyle, CharacterStyleSpec};
use crate::spread::{
    CreateMasterSpreadOptions, GraphicBounds, GroupSprite, ImageSprite, MasterSpread,
    MasterSpreadPackage, OvalSprite, PolygonSprite, RectangleSprite, Spread, SpreadPackage,
    Sprite, SpriteCommon, SpriteId, TextFrameSprite,
};
use crate::story::{
    BackingStoryPackage, CharacterRange, FrameType, InCopyExportOption, ParagraphInput,
    ParagraphRange, Story, StoryDirection, StoryOrientation, StoryPackage, StoryPreference,
};
use crate::util::decode_text;
use crate::xml::{Element, Node, XmlDocument, parse_document, write_document};

/// Manifest tags whose sub-packages load into typed collections. Everything
/// else in the manifest (and the archive) passes through untouched.
const MANAGED_TAGS: &[&str] = &[
    "idPkg:Graphic",
    "idPkg:Styles",
    "idPkg:Fonts",
    "idPkg:Preferences",
    "idPkg:MasterSpread",
    "idPkg:Spread",
    "idPkg:BackingStory",
    "idPkg:Story",
];

const SWATCH_CREATOR_ID: &str = "folio";
const SWATCH_GROUP_REFERENCE: &str = "folio";

const NORMAL_GRAPHICS_FRAME: &str = "ObjectStyle/$ID/[Normal Graphics Frame]";
const NORMAL_TEXT_FRAME: &str = "ObjectStyle/$ID/[Normal Text Frame]";
const NO_OBJECT_STYLE: &str = "ObjectStyle/$ID/[None]";

/// Options for a newly created document.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub page_bounds: GeometricBounds,
}

/// Styling options shared by the shape factories. Bounds are page-relative.
#[derive(Debug, Clone, Default)]
pub struct ShapeOptions {
    pub bounds: GeometricBounds,
    pub fill: Option<ColorSpec>,
    pub stroke: Option<ColorSpec>,
    pub stroke_weight: Option<f64>,
    pub opacity: Option<f64>,
    pub name: Option<String>,
}

/// A loaded document package.
pub struct Document {
    designmap: XmlDocument,
    entries: BTreeMap<String, Vec<u8>>,
    pub graphics: Vec<GraphicPackage>,
    pub styles: Vec<StylesPackage>,
    pub fonts: Vec<FontsPackage>,
    pub preferences: Vec<PreferencesPackage>,
    pub master_spreads: Vec<MasterSpreadPackage>,
    pub spreads: Vec<SpreadPackage>,
    pub backing_stories: Vec<BackingStoryPackage>,
    pub story_packages: Vec<StoryPackage>,
    ids: IdGenerator,
}

impl Document {
    // ------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------

    /// Load a document from whole-package bytes.
    pub fn load(bytes: &[u8]) -> Result<Document> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = BTreeMap::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.insert(file.name().to_string(), data);
        }
        Document::load_from_entries(entries)
    }

    /// Load a document from an already-extracted name -> bytes entry map
    /// (the archive-provider interface).
    pub fn load_from_entries(entries: BTreeMap<String, Vec<u8>>) -> Result<Document> {
        let designmap_bytes = entries
            .get("designmap.xml")
            .ok_or_else(|| Error::InvalidPackage("designmap.xml not found".into()))?;
        let designmap = parse_document(&decode_text(designmap_bytes))?;

        let sources = |tag: &str| -> Vec<String> {
            designmap
                .root
                .children_named(tag)
                .filter_map(|el| el.attr("src"))
                .map(str::to_string)
                .collect()
        };
        let entry = |path: &str| -> Result<&[u8]> {
            entries.get(path).map(Vec::as_slice).ok_or_else(|| {
                Error::InvalidPackage(format!("manifest entry {} missing from archive", path))
            })
        };

        let mut graphics = Vec::new();
        for src in sources("idPkg:Graphic") {
            graphics.push(GraphicPackage::parse(&src, entry(&src)?)?);
        }
        let mut styles = Vec::new();
        for src in sources("idPkg:Styles") {
            styles.push(StylesPackage::parse(&src, entry(&src)?)?);
        }
        let mut fonts = Vec::new();
        for src in sources("idPkg:Fonts") {
            fonts.push(FontsPackage::parse(&src, entry(&src)?)?);
        }
        let mut preferences = Vec::new();
        for src in sources("idPkg:Preferences") {
            preferences.push(PreferencesPackage::parse(&src, entry(&src)?)?);
        }
        let mut master_spreads = Vec::new();
        for src in sources("idPkg:MasterSpread") {
            master_spreads.push(MasterSpreadPackage::parse(&src, entry(&src)?)?);
        }
        let mut spreads = Vec::new();
        for src in sources("idPkg:Spread") {
            spreads.push(SpreadPackage::parse(&src, entry(&src)?)?);
        }
        let mut backing_stories = Vec::new();
        for src in sources("idPkg:BackingStory") {
            backing_stories.push(BackingStoryPackage::parse(&src, entry(&src)?)?);
        }
        let mut story_packages = Vec::new();
        for src in sources("idPkg:Story") {
            story_packages.push(StoryPackage::parse(&src, entry(&src)?)?);
        }

        let mut ids = IdGenerator::new();
        observe_ids(&mut ids, &designmap.root);
        for package in &graphics {
            observe_ids(&mut ids, &package.file.root);
        }
        for package in &styles {
            observe_ids(&mut ids, &package.file.root);
        }
        for package in &fonts {
            observe_ids(&mut ids, &package.file.root);
        }
        for package in &master_spreads {
            observe_ids(&mut ids, &package.file.root);
        }
        for package in &spreads {
            observe_ids(&mut ids, &package.file.root);
        }
        for package in &backing_stories {
            observe_ids(&mut ids, &package.file.root);
        }
        for package in &story_packages {
            observe_ids(&mut ids, &package.file.root);
        }

        Ok(Document {
            designmap,
            entries,
            graphics,
            styles,
            fonts,
            preferences,
            master_spreads,
            spreads,
            backing_stories,
            story_packages,
            ids,
        })
    }

    /// Create a fresh document from the embedded blank template: page
    /// bounds applied to the master page (with the origin-centering
    /// translation) and one working spread stamped from it.
    pub fn create(options: CreateOptions) -> Result<Document> {
        let mut document = Document::load_from_entries(templates::template_entries())?;
        let bounds = options.page_bounds;

        let master = &mut document
            .master_spreads
            .first_mut()
            .ok_or_else(|| Error::MissingElement("idPkg:MasterSpread".into()))?
            .master;
        for page in &mut master.pages {
            page.geometric_bounds = bounds;
            page.item_transform =
                Transform::translation(-bounds.width / 2.0, -bounds.height / 2.0);
        }
        if let Some(preferences) = document.preferences.first_mut() {
            preferences.set_page_size(bounds.width, bounds.height);
        }

        document.create_spread(0)?;
        Ok(document)
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    /// A fresh identifier, unique within this document's lifetime.
    pub fn unique_id(&mut self) -> String {
        self.ids.next_id()
    }

    // ------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------

    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.graphics.iter().flat_map(|package| package.colors.iter())
    }

    pub fn color_by_id(&self, id: &str) -> Option<&Color> {
        self.colors().find(|color| color.id == id)
    }

    /// Find-or-create resolution for colors: an id must exist; a structural
    /// value is matched against existing swatches and only created when no
    /// equivalent exists. Equal inputs always resolve to the same identity.
    pub fn assume_color(&mut self, spec: &ColorSpec) -> Result<String> {
        match spec {
            ColorSpec::Id(id) => self
                .color_by_id(id)
                .map(|color| color.id.clone())
                .ok_or_else(|| Error::UnknownReference(format!("color {}", id))),
            ColorSpec::Value(input) => {
                if let Some(existing) = self.colors().find(|color| color.matches(input)) {
                    return Ok(existing.id.clone());
                }
                let id = self.ids.next_with_prefix("Color");
                let name = format!("Color {}", self.colors().count() + 1);
                let graphic = self
                    .graphics
                    .first_mut()
                    .ok_or_else(|| Error::MissingElement("idPkg:Graphic".into()))?;
                Ok(graphic
                    .create_color(input, id, name, SWATCH_CREATOR_ID, SWATCH_GROUP_REFERENCE)
                    .id
                    .clone())
            }
        }
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    pub fn paragraph_styles(&self) -> impl Iterator<Item = &ParagraphStyle> {
        self.styles
            .iter()
            .flat_map(|package| package.paragraph_styles.iter())
    }

    pub fn character_styles(&self) -> impl Iterator<Item = &CharacterStyle> {
        self.styles
            .iter()
            .flat_map(|package| package.character_styles.iter())
    }

    pub fn paragraph_style_by_id(&self, id: &str) -> Option<&ParagraphStyle> {
        self.paragraph_styles().find(|style| style.id == id)
    }

    pub fn character_style_by_id(&self, id: &str) -> Option<&CharacterStyle> {
        self.character_styles().find(|style| style.id == id)
    }

    /// Find-or-create resolution for paragraph styles (see
    /// [`Document::assume_color`] for the contract). A descriptor that names
    /// a font family without a style gets the family's first available
    /// style.
    pub fn assume_paragraph_style(&mut self, spec: &ParagraphStyleSpec) -> Result<String> {
        match spec {
            ParagraphStyleSpec::Id(id) => self
                .paragraph_style_by_id(id)
                .map(|style| style.id.clone())
                .ok_or_else(|| Error::UnknownReference(format!("paragraph style {}", id))),
            ParagraphStyleSpec::Def(input) => {
                let mut input = input.clone();
                if input.font_style.is_none()
                    && let Some(family_name) = input.applied_font.clone()
                    && let Some(family) = self.font_family(&family_name)
                    && let Some(first) = family.available_styles().first()
                {
                    input.font_style = Some(first.to_string());
                }

                let fill = match &input.fill_color {
                    Some(color) => Some(self.assume_color(&ColorSpec::Value(*color))?),
                    None => None,
                };
                let stroke = match &input.stroke_color {
                    Some(color) => Some(self.assume_color(&ColorSpec::Value(*color))?),
                    None => None,
                };

                // Synthesize the candidate first, then look for a structural
                // twin among the existing styles: equal descriptors always
                // resolve to the same identity.
                let id = self.ids.next_with_prefix("ParagraphStyle");
                let style_uid = self.ids.next_id();
                let name = format!("Paragraph Style {}", self.paragraph_styles().count() + 1);
                let candidate = self
                    .styles
                    .first()
                    .ok_or_else(|| Error::MissingElement("idPkg:Styles".into()))?
                    .build_paragraph_style(id, name, style_uid, &input, fill, stroke);

                let colors: Vec<&Color> = self.colors().collect();
                if let Some(existing) = self
                    .paragraph_styles()
                    .find(|style| style.comparable_eq(&candidate, &colors))
                {
                    return Ok(existing.id.clone());
                }

                let styles = self
                    .styles
                    .first_mut()
                    .ok_or_else(|| Error::MissingElement("idPkg:Styles".into()))?;
                Ok(styles.push_paragraph_style(candidate).id.clone())
            }
        }
    }

    /// Find-or-create resolution for character styles.
    pub fn assume_character_style(&mut self, spec: &CharacterStyleSpec) -> Result<String> {
        match spec {
            CharacterStyleSpec::Id(id) => self
                .character_style_by_id(id)
                .map(|style| style.id.clone())
                .ok_or_else(|| Error::UnknownReference(format!("character style {}", id))),
            CharacterStyleSpec::Def(input) => {
                let mut input = input.clone();
                if input.font_style.is_none()
                    && let Some(family_name) = input.applied_font.clone()
                    && let Some(family) = self.font_family(&family_name)
                    && let Some(first) = family.available_styles().first()
                {
                    input.font_style = Some(first.to_string());
                }

                let fill = match &input.fill_color {
                    Some(color) => Some(self.assume_color(&ColorSpec::Value(*color))?),
                    None => None,
                };
                let stroke = match &input.stroke_color {
                    Some(color) => Some(self.assume_color(&ColorSpec::Value(*color))?),
                    None => None,
                };

                let id = self.ids.next_with_prefix("CharacterStyle");
                let style_uid = self.ids.next_id();
                let name = format!("Character Style {}", self.character_styles().count() + 1);
                let candidate = self
                    .styles
                    .first()
                    .ok_or_else(|| Error::MissingElement("idPkg:Styles".into()))?
                    .build_character_style(id, name, style_uid, &input, fill, stroke);

                let colors: Vec<&Color> = self.colors().collect();
                if let Some(existing) = self
                    .character_styles()
                    .find(|style| style.comparable_eq(&candidate, &colors))
                {
                    return Ok(existing.id.clone());
                }

                let styles = self
                    .styles
                    .first_mut()
                    .ok_or_else(|| Error::MissingElement("idPkg:Styles".into()))?;
                Ok(styles.push_character_style(candidate).id.clone())
            }
        }
    }

    // ------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------

    pub fn font_families(&self) -> impl Iterator<Item = &FontFamily> {
        self.fonts.iter().flat_map(|package| package.families.iter())
    }

    pub fn font_family(&self, name: &str) -> Option<&FontFamily> {
        self.font_families().find(|family| family.name == name)
    }

    /// Register an inspected font, creating its family on first sight.
    /// Returns the id of the new font-style record.
    pub fn add_font(&mut self, info: &FontInfo, font_type: &str) -> Result<String> {
        let family_id = self.ids.next_id();
        let fonts = self
            .fonts
            .first_mut()
            .ok_or_else(|| Error::MissingElement("idPkg:Fonts".into()))?;
        Ok(fonts.add_font(info, font_type, family_id))
    }

    // ------------------------------------------------------------------
    // Stories
    // ------------------------------------------------------------------

    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.story_packages
            .iter()
            .flat_map(|package| package.stories.iter())
    }

    pub fn story_by_id(&self, id: &str) -> Option<&Story> {
        self.stories().find(|story| story.id == id)
    }

    pub fn story_by_id_mut(&mut self, id: &str) -> Option<&mut Story> {
        self.story_packages
            .iter_mut()
            .flat_map(|package| package.stories.iter_mut())
            .find(|story| story.id == id)
    }

    /// Create a story in its own sub-package, resolving every referenced
    /// style through the find-or-create rules. Returns the story id.
    pub fn create_story(&mut self, paragraphs: Vec<ParagraphInput>) -> Result<String> {
        let ranges = self.resolve_paragraphs(paragraphs)?;
        let id = self.ids.next_id();
        let path = format!("Stories/Story_{}.xml", id);
        let story = Story::create(
            id.clone(),
            ranges,
            StoryPreference {
                optical_margin_alignment: false,
                optical_margin_size: 12.0,
                frame_type: FrameType::TextFrame,
                orientation: StoryOrientation::Horizontal,
                direction: StoryDirection::LeftToRight,
            },
            InCopyExportOption {
                include_graphic_proxies: true,
                include_all_resources: false,
            },
        );
        self.story_packages.push(StoryPackage::create(path, story));
        Ok(id)
    }

    /// Replace a story's paragraphs.
    pub fn set_story_paragraphs(
        &mut self,
        story_id: &str,
        paragraphs: Vec<ParagraphInput>,
    ) -> Result<()> {
        let ranges = self.resolve_paragraphs(paragraphs)?;
        let story = self
            .story_by_id_mut(story_id)
            .ok_or_else(|| Error::UnknownReference(format!("story {}", story_id)))?;
        story.paragraphs = ranges;
        Ok(())
    }

    fn resolve_paragraphs(
        &mut self,
        paragraphs: Vec<ParagraphInput>,
    ) -> Result<Vec<ParagraphRange>> {
        let mut ranges = Vec::with_capacity(paragraphs.len());
        for paragraph in paragraphs {
            let style_id = self.assume_paragraph_style(&paragraph.paragraph_style)?;
            let mut runs = Vec::with_capacity(paragraph.runs.len());
            for run in paragraph.runs {
                let character_style_id = self.assume_character_style(&run.character_style)?;
                runs.push(CharacterRange::new(character_style_id, run.content));
            }
            ranges.push(ParagraphRange::new(style_id, runs));
        }
        Ok(ranges)
    }

    // ------------------------------------------------------------------
    // Spreads
    // ------------------------------------------------------------------

    pub fn spread(&self, index: usize) -> &Spread {
        &self.spreads[index].spread
    }

    pub fn spread_mut(&mut self, index: usize) -> &mut Spread {
        &mut self.spreads[index].spread
    }

    /// Stamp a new working spread from a master. Returns the index of the
    /// new spread package.
    pub fn create_spread(&mut self, master_index: usize) -> Result<usize> {
        let page_count = self
            .master_spreads
            .get(master_index)
            .ok_or_else(|| Error::UnknownReference(format!("master spread #{}", master_index)))?
            .master
            .pages
            .len();
        let spread_id = self.ids.next_id();
        let page_ids: Vec<String> = (0..page_count).map(|_| self.ids.next_id()).collect();

        let master = &self.master_spreads[master_index].master;
        let spread = Spread::from_master(spread_id.clone(), master, page_ids);
        let path = format!("Spreads/Spread_{}.xml", spread_id);
        self.spreads.push(SpreadPackage::create(path, spread));
        Ok(self.spreads.len() - 1)
    }

    /// Clone a master spread at the page level under a new name.
    pub fn create_master_spread(
        &mut self,
        options: &CreateMasterSpreadOptions,
        base_index: usize,
    ) -> Result<usize> {
        let page_count = self
            .master_spreads
            .get(base_index)
            .ok_or_else(|| Error::UnknownReference(format!("master spread #{}", base_index)))?
            .master
            .pages
            .len();
        let master_id = self.ids.next_id();
        let page_ids: Vec<String> = (0..page_count).map(|_| self.ids.next_id()).collect();

        let base = &self.master_spreads[base_index].master;
        let master = MasterSpread::from_master(master_id.clone(), base, options, page_ids);
        let path = format!("MasterSpreads/MasterSpread_{}.xml", master_id);
        self.master_spreads
            .push(MasterSpreadPackage::create(path, master));
        Ok(self.master_spreads.len() - 1)
    }

    // ------------------------------------------------------------------
    // Shape factories
    // ------------------------------------------------------------------

    pub fn create_rectangle(
        &mut self,
        spread_index: usize,
        options: &ShapeOptions,
        parent: Option<SpriteId>,
    ) -> Result<SpriteId> {
        let common = self.shape_common(options, NORMAL_GRAPHICS_FRAME)?;
        let spread = self.spread_for_factory(spread_index)?;
        let geometry = spread.absolute_rectangle_geometry(options.bounds);
        spread.add_sprite(
            Sprite::Rectangle(RectangleSprite {
                common,
                geometry,
                children: Vec::new(),
            }),
            parent,
        )
    }

    pub fn create_oval(
        &mut self,
        spread_index: usize,
        options: &ShapeOptions,
        parent: Option<SpriteId>,
    ) -> Result<SpriteId> {
        let common = self.shape_common(options, NORMAL_GRAPHICS_FRAME)?;
        let spread = self.spread_for_factory(spread_index)?;
        let geometry = spread.absolute_ellipse_geometry(options.bounds);
        spread.add_sprite(
            Sprite::Oval(OvalSprite {
                common,
                geometry,
                children: Vec::new(),
            }),
            parent,
        )
    }

    /// Create a polygon from flat drawing commands (page-relative).
    pub fn create_polygon(
        &mut self,
        spread_index: usize,
        commands: &[PathCommand],
        options: &ShapeOptions,
        parent: Option<SpriteId>,
    ) -> Result<SpriteId> {
        let common = self.shape_common(options, NORMAL_GRAPHICS_FRAME)?;
        let spread = self.spread_for_factory(spread_index)?;
        let id = spread.add_sprite(
            Sprite::Polygon(PolygonSprite {
                common,
                geometry: Default::default(),
                children: Vec::new(),
            }),
            parent,
        )?;
        spread.set_path_commands(id, commands)?;
        Ok(id)
    }

    pub fn create_group(
        &mut self,
        spread_index: usize,
        options: &ShapeOptions,
        parent: Option<SpriteId>,
    ) -> Result<SpriteId> {
        let common = self.shape_common(options, NO_OBJECT_STYLE)?;
        let spread = self.spread_for_factory(spread_index)?;
        spread.add_sprite(
            Sprite::Group(GroupSprite {
                common,
                children: Vec::new(),
            }),
            parent,
        )
    }

    /// Create an image with embedded contents. The graphic bounds come from
    /// `options.bounds`.
    pub fn create_image(
        &mut self,
        spread_index: usize,
        options: &ShapeOptions,
        contents: Option<Vec<u8>>,
        parent: Option<SpriteId>,
    ) -> Result<SpriteId> {
        let common = self.shape_common(options, NORMAL_GRAPHICS_FRAME)?;
        let spread = self.spread_for_factory(spread_index)?;
        let geometry = spread.absolute_rectangle_geometry(options.bounds);
        let [left, top] = spread.relative_coords(options.bounds.x, options.bounds.y);
        spread.add_sprite(
            Sprite::Image(ImageSprite {
                common,
                geometry: Some(geometry),
                graphic_bounds: Some(GraphicBounds {
                    left,
                    top,
                    right: left + options.bounds.width,
                    bottom: top + options.bounds.height,
                }),
                contents,
            }),
            parent,
        )
    }

    /// Create a text frame and its backing story in one step. Returns the
    /// sprite handle; the story is reachable through the frame's
    /// `parent_story`.
    pub fn create_text_frame(
        &mut self,
        spread_index: usize,
        options: &ShapeOptions,
        paragraphs: Vec<ParagraphInput>,
        parent: Option<SpriteId>,
    ) -> Result<SpriteId> {
        let story_id = self.create_story(paragraphs)?;
        let common = self.shape_common(options, NORMAL_TEXT_FRAME)?;
        let spread = self.spread_for_factory(spread_index)?;
        let geometry = spread.absolute_rectangle_geometry(options.bounds);
        spread.add_sprite(
            Sprite::TextFrame(TextFrameSprite {
                common,
                geometry,
                parent_story: story_id,
            }),
            parent,
        )
    }

    fn shape_common(&mut self, options: &ShapeOptions, object_style: &str) -> Result<SpriteCommon> {
        let fill = match &options.fill {
            Some(spec) => Some(self.assume_color(spec)?),
            None => None,
        };
        let stroke = match &options.stroke {
            Some(spec) => Some(self.assume_color(spec)?),
            None => None,
        };

        let mut common = SpriteCommon::create(self.ids.next_id(), Some(object_style.to_string()));
        common.name = options.name.clone();
        common.item_transform = Some(Transform::IDENTITY);
        common.fill_color = fill;
        common.stroke_color = stroke;
        common.stroke_weight = options.stroke_weight;
        common.opacity = options.opacity;
        Ok(common)
    }

    fn spread_for_factory(&mut self, index: usize) -> Result<&mut Spread> {
        self.spreads
            .get_mut(index)
            .map(|package| &mut package.spread)
            .ok_or_else(|| Error::UnknownReference(format!("spread #{}", index)))
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Serialize every tracked sub-package and the rewritten manifest, then
    /// append the untouched archive entries byte-identical.
    pub fn pack(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        for package in &self.graphics {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.styles {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.fonts {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.preferences {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.master_spreads {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.spreads {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.backing_stories {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }
        for package in &self.story_packages {
            files.push((package.path().to_string(), package.serialize()?.into_bytes()));
        }

        files.push((
            "designmap.xml".to_string(),
            write_document(&self.rebuild_designmap())?.into_bytes(),
        ));

        for (path, bytes) in &self.entries {
            if path.ends_with('/') {
                continue;
            }
            if files.iter().any(|(existing, _)| existing == path) {
                continue;
            }
            files.push((path.clone(), bytes.clone()));
        }

        Ok(files)
    }

    /// Produce whole-package bytes: the packed file list zipped with the
    /// mimetype entry first and uncompressed.
    pub fn export(&self) -> Result<Vec<u8>> {
        let files = self.pack()?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        if let Some((path, bytes)) = files.iter().find(|(path, _)| path == "mimetype") {
            zip.start_file(path.as_str(), stored)?;
            zip.write_all(bytes)?;
        }
        for (path, bytes) in &files {
            if path == "mimetype" {
                continue;
            }
            zip.start_file(path.as_str(), deflated)?;
            zip.write_all(bytes)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Rewrite the manifest: every non-managed child passes through, then
    /// one entry per tracked sub-package in category order.
    fn rebuild_designmap(&self) -> XmlDocument {
        let mut root = Element::new(self.designmap.root.tag.clone());
        root.attrs = self.designmap.root.attrs.clone();
        for child in &self.designmap.root.children {
            let keep = match child {
                Node::Element(el) => !MANAGED_TAGS.contains(&el.tag.as_str()),
                _ => true,
            };
            if keep {
                root.children.push(child.clone());
            }
        }

        let mut link = |tag: &str, src: &str| {
            let mut element = Element::new(tag);
            element.set_attr("src", src);
            root.push_element(element);
        };
        for package in &self.graphics {
            link("idPkg:Graphic", package.path());
        }
        for package in &self.styles {
            link("idPkg:Styles", package.path());
        }
        for package in &self.fonts {
            link("idPkg:Fonts", package.path());
        }
        for package in &self.preferences {
            link("idPkg:Preferences", package.path());
        }
        for package in &self.master_spreads {
            link("idPkg:MasterSpread", package.path());
        }
        for package in &self.spreads {
            link("idPkg:Spread", package.path());
        }
        for package in &self.backing_stories {
            link("idPkg:BackingStory", package.path());
        }
        for package in &self.story_packages {
            link("idPkg:Story", package.path());
        }

        XmlDocument {
            prolog: self.designmap.prolog.clone(),
            root,
        }
    }
}

fn observe_ids(ids: &mut IdGenerator, element: &Element) {
    if let Some(id) = element.attr("Self") {
        ids.observe(id);
    }
    for child in element.elements() {
        observe_ids(ids, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document_is_ready() {
        let document = Document::create(CreateOptions {
            page_bounds: GeometricBounds::new(0.0, 0.0, 500.0, 500.0),
        })
        .unwrap();

        assert_eq!(document.spreads.len(), 1);
        assert_eq!(document.master_spreads.len(), 1);
        assert_eq!(document.spread(0).page_origin(), [-250.0, -250.0]);
        assert_eq!(
            document.preferences[0].page_size(),
            Some((500.0, 500.0))
        );
        // Template resources parsed into the pools
        assert!(document.color_by_id("Color/Black").is_some());
        assert!(
            document
                .paragraph_style_by_id("ParagraphStyle/$ID/[No paragraph style]")
                .is_some()
        );
        assert!(document.font_family("Minion Pro").is_some());
    }

    #[test]
    fn test_assume_color_dedup() {
        let mut document = Document::create(CreateOptions {
            page_bounds: GeometricBounds::new(0.0, 0.0, 500.0, 500.0),
        })
        .unwrap();

        let blue = ColorSpec::Value(crate::resources::ColorInput::Rgb {
            red: 0.0,
            green: 0.0,
            blue: 255.0,
        });
        let first = document.assume_color(&blue).unwrap();
        let second = document.assume_color(&blue).unwrap();
        assert_eq!(first, second);

        let other = ColorSpec::Value(crate::resources::ColorInput::Rgb {
            red: 10.0,
            green: 10.0,
            blue: 10.0,
        });
        let third = document.assume_color(&other).unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn test_assume_color_unknown_id_is_error() {
        let mut document = Document::create(CreateOptions {
            page_bounds: GeometricBounds::new(0.0, 0.0, 100.0, 100.0),
        })
        .unwrap();
        let missing = document.assume_color(&ColorSpec::Id("Color/nope".into()));
        assert!(matches!(missing, Err(Error::UnknownReference(_))));
    }

    #[test]
    fn test_export_lists_exactly_tracked_files() {
        let document = Document::create(CreateOptions {
            page_bounds: GeometricBounds::new(0.0, 0.0, 500.0, 500.0),
        })
        .unwrap();
        let files = document.pack().unwrap();

        let designmap = files
            .iter()
            .find(|(path, _)| path == "designmap.xml")
            .unwrap();
        let text = String::from_utf8(designmap.1.clone()).unwrap();
        // One manifest entry per tracked sub-package
        assert_eq!(text.matches("idPkg:Spread src=").count(), 1);
        assert_eq!(text.matches("idPkg:MasterSpread src=").count(), 1);
        // Non-managed manifest children pass through
        assert!(text.contains("<Layer "));
        assert!(text.contains("<?aid "));
        // Mimetype passes through from the template entries
        assert!(files.iter().any(|(path, _)| path == "mimetype"));
    }
}
