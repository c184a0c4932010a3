//! The drawable hierarchy: a closed variant set over a shared common core.
//!
//! Sprites are arena-allocated inside their owning spread and addressed by
//! handle; container variants (Group, Polygon, Rectangle, Oval) hold child
//! handles. Serialization is an explicit match over the variant set because
//! containers must recursively serialize children of any variant.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Error, Result};
use crate::geometry::{
    Geometry, Transform, inject_into_properties, transform_for_origin,
};
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::util::{fmt_number, parse_number};
use crate::xml::{Element, Node};

/// Handle into a spread's sprite arena.
pub type SpriteId = usize;

/// Element tags that parse into sprite variants.
pub(crate) const SPRITE_TAGS: &[&str] =
    &["Rectangle", "Oval", "Polygon", "Group", "Image", "TextFrame"];

/// Children the sprite layer manages itself; everything else on a sprite
/// element passes through opaque.
const MANAGED_CHILDREN: &[&str] = &["Properties", "TransparencySetting"];

/// Drop-shadow settings, serialized through the transparency block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub x_offset: f64,
    pub y_offset: f64,
    pub size: f64,
    pub opacity: f64,
}

/// Fields shared by every sprite variant.
#[derive(Debug, Clone, Default)]
pub struct SpriteCommon {
    pub id: String,
    pub name: Option<String>,
    pub applied_object_style: Option<String>,
    pub content_type: Option<String>,
    pub story_title: Option<String>,
    pub(crate) item_transform: Option<Transform>,
    pub(crate) visible: Option<bool>,
    pub(crate) fill_color: Option<String>,
    pub(crate) stroke_color: Option<String>,
    pub(crate) stroke_weight: Option<f64>,
    pub(crate) opacity: Option<f64>,
    pub(crate) drop_shadow: Option<DropShadow>,
    transparency_source: Option<Element>,
    opaque_children: Vec<Node>,
    source: Option<Element>,
}

#[derive(Debug, Clone)]
pub struct RectangleSprite {
    pub common: SpriteCommon,
    pub geometry: Geometry,
    pub children: Vec<SpriteId>,
}

#[derive(Debug, Clone)]
pub struct OvalSprite {
    pub common: SpriteCommon,
    pub geometry: Geometry,
    pub children: Vec<SpriteId>,
}

#[derive(Debug, Clone)]
pub struct PolygonSprite {
    pub common: SpriteCommon,
    pub geometry: Geometry,
    pub children: Vec<SpriteId>,
}

#[derive(Debug, Clone)]
pub struct GroupSprite {
    pub common: SpriteCommon,
    pub children: Vec<SpriteId>,
}

#[derive(Debug, Clone)]
pub struct TextFrameSprite {
    pub common: SpriteCommon,
    pub geometry: Geometry,
    /// Story reference; text is reached through the document.
    pub parent_story: String,
}

/// Graphic bounds of an image, in spread-absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphicBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Collaborator that decodes embedded image bytes to pixel dimensions.
pub trait PixelDecoder {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)>;
}

/// Pixel decoder that sniffs PNG/JPEG/GIF headers without a full decode.
pub struct HeaderPixelDecoder;

impl PixelDecoder for HeaderPixelDecoder {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        crate::util::extract_image_dimensions(bytes)
            .ok_or_else(|| Error::InvalidPackage("unrecognized image format".into()))
    }
}

#[derive(Debug, Clone)]
pub struct ImageSprite {
    pub common: SpriteCommon,
    pub geometry: Option<Geometry>,
    pub graphic_bounds: Option<GraphicBounds>,
    /// Raw embedded bytes; serialized base64 inside a CDATA section.
    pub contents: Option<Vec<u8>>,
}

impl ImageSprite {
    /// Natural pixel size of the embedded image, via the decoding
    /// collaborator.
    pub fn natural_size(&self, decoder: &dyn PixelDecoder) -> Result<(u32, u32)> {
        let contents = self
            .contents
            .as_ref()
            .ok_or_else(|| Error::MissingElement("Image/Contents".into()))?;
        decoder.dimensions(contents)
    }
}

/// A drawable placed on a spread.
#[derive(Debug, Clone)]
pub enum Sprite {
    Rectangle(RectangleSprite),
    Oval(OvalSprite),
    Polygon(PolygonSprite),
    Group(GroupSprite),
    Image(ImageSprite),
    TextFrame(TextFrameSprite),
}

impl Sprite {
    pub fn common(&self) -> &SpriteCommon {
        match self {
            Sprite::Rectangle(s) => &s.common,
            Sprite::Oval(s) => &s.common,
            Sprite::Polygon(s) => &s.common,
            Sprite::Group(s) => &s.common,
            Sprite::Image(s) => &s.common,
            Sprite::TextFrame(s) => &s.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut SpriteCommon {
        match self {
            Sprite::Rectangle(s) => &mut s.common,
            Sprite::Oval(s) => &mut s.common,
            Sprite::Polygon(s) => &mut s.common,
            Sprite::Group(s) => &mut s.common,
            Sprite::Image(s) => &mut s.common,
            Sprite::TextFrame(s) => &mut s.common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Sprite::Rectangle(_) => "Rectangle",
            Sprite::Oval(_) => "Oval",
            Sprite::Polygon(_) => "Polygon",
            Sprite::Group(_) => "Group",
            Sprite::Image(_) => "Image",
            Sprite::TextFrame(_) => "TextFrame",
        }
    }

    /// Child handles, empty for the leaf variants.
    pub fn children(&self) -> &[SpriteId] {
        match self {
            Sprite::Rectangle(s) => &s.children,
            Sprite::Oval(s) => &s.children,
            Sprite::Polygon(s) => &s.children,
            Sprite::Group(s) => &s.children,
            Sprite::Image(_) | Sprite::TextFrame(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<SpriteId>> {
        match self {
            Sprite::Rectangle(s) => Some(&mut s.children),
            Sprite::Oval(s) => Some(&mut s.children),
            Sprite::Polygon(s) => Some(&mut s.children),
            Sprite::Group(s) => Some(&mut s.children),
            Sprite::Image(_) | Sprite::TextFrame(_) => None,
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            Sprite::Rectangle(s) => Some(&s.geometry),
            Sprite::Oval(s) => Some(&s.geometry),
            Sprite::Polygon(s) => Some(&s.geometry),
            Sprite::TextFrame(s) => Some(&s.geometry),
            Sprite::Image(s) => s.geometry.as_ref(),
            Sprite::Group(_) => None,
        }
    }

    pub(crate) fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match self {
            Sprite::Rectangle(s) => Some(&mut s.geometry),
            Sprite::Oval(s) => Some(&mut s.geometry),
            Sprite::Polygon(s) => Some(&mut s.geometry),
            Sprite::TextFrame(s) => Some(&mut s.geometry),
            Sprite::Image(s) => s.geometry.as_mut(),
            Sprite::Group(_) => None,
        }
    }

    /// The transform expressed so rotation and scale pivot around `pivot`
    /// (spread coordinates).
    pub fn transform(&self, pivot: [f64; 2]) -> Transform {
        let stored = self.common().item_transform.unwrap_or_default();
        transform_for_origin(&stored, [0.0, 0.0], pivot)
    }

    /// Store a transform expressed around `pivot`.
    pub fn set_transform(&mut self, transform: Transform, pivot: [f64; 2]) {
        self.common_mut().item_transform =
            Some(transform_for_origin(&transform, pivot, [0.0, 0.0]));
    }

    pub fn fill_color(&self) -> Option<&str> {
        self.common().fill_color.as_deref()
    }

    pub fn set_fill_color(&mut self, color_id: Option<String>) {
        self.common_mut().fill_color = color_id;
    }

    pub fn stroke_color(&self) -> Option<&str> {
        self.common().stroke_color.as_deref()
    }

    pub fn set_stroke_color(&mut self, color_id: Option<String>) {
        self.common_mut().stroke_color = color_id;
    }

    pub fn stroke_weight(&self) -> Option<f64> {
        self.common().stroke_weight
    }

    pub fn set_stroke_weight(&mut self, weight: f64) {
        self.common_mut().stroke_weight = Some(weight);
    }

    /// Opacity in percent; absent means the default (100).
    pub fn opacity(&self) -> Option<f64> {
        self.common().opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.common_mut().opacity = Some(opacity);
    }

    pub fn drop_shadow(&self) -> Option<&DropShadow> {
        self.common().drop_shadow.as_ref()
    }

    pub fn set_drop_shadow(&mut self, shadow: Option<DropShadow>) {
        self.common_mut().drop_shadow = shadow;
    }

    pub fn visible(&self) -> bool {
        self.common().visible.unwrap_or(true)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.common_mut().visible = Some(visible);
    }
}

impl SpriteCommon {
    pub(crate) fn create(id: String, applied_object_style: Option<String>) -> Self {
        SpriteCommon {
            id,
            applied_object_style,
            ..SpriteCommon::default()
        }
    }
}

/// Parse one sprite element (and its nested sprites) into the arena,
/// returning the handle of the parsed sprite.
pub(crate) fn parse_sprite(element: &Element, arena: &mut Vec<Sprite>) -> Result<SpriteId> {
    let common = parse_common(element)?;

    let sprite = match element.tag.as_str() {
        "Rectangle" => Sprite::Rectangle(RectangleSprite {
            common,
            geometry: Geometry::parse_from_shape(element)?,
            children: parse_child_sprites(element, arena)?,
        }),
        "Oval" => Sprite::Oval(OvalSprite {
            common,
            geometry: Geometry::parse_from_shape(element)?,
            children: parse_child_sprites(element, arena)?,
        }),
        "Polygon" => Sprite::Polygon(PolygonSprite {
            common,
            geometry: Geometry::parse_from_shape(element)?,
            children: parse_child_sprites(element, arena)?,
        }),
        "Group" => Sprite::Group(GroupSprite {
            common,
            children: parse_child_sprites(element, arena)?,
        }),
        "TextFrame" => {
            let fields = element_fields(element, &["Properties"]);
            let parent_story = fields
                .string("ParentStory")
                .ok_or_else(|| Error::MissingAttribute("TextFrame/ParentStory".into()))?;
            Sprite::TextFrame(TextFrameSprite {
                common,
                geometry: Geometry::parse_from_shape(element)?,
                parent_story,
            })
        }
        "Image" => Sprite::Image(parse_image(element, common)?),
        other => {
            return Err(Error::InvalidPackage(format!(
                "element {} is not a drawable",
                other
            )));
        }
    };

    arena.push(sprite);
    Ok(arena.len() - 1)
}

/// Parse every direct child that is a sprite variant.
pub(crate) fn parse_child_sprites(
    element: &Element,
    arena: &mut Vec<Sprite>,
) -> Result<Vec<SpriteId>> {
    let mut children = Vec::new();
    for child in element.elements() {
        if SPRITE_TAGS.contains(&child.tag.as_str()) {
            children.push(parse_sprite(child, arena)?);
        }
    }
    Ok(children)
}

fn parse_common(element: &Element) -> Result<SpriteCommon> {
    let fields = element_fields(element, &["Properties"]);
    let id = fields
        .string("Self")
        .ok_or_else(|| Error::MissingAttribute(format!("{}/Self", element.tag)))?;

    let item_transform = match fields.get("ItemTransform") {
        Some(value) => Some(Transform::parse(Some(value))?),
        None => None,
    };

    let transparency_source = element.first_child("TransparencySetting").cloned();
    let (opacity, drop_shadow) = parse_transparency(transparency_source.as_ref());

    // Anything we do not manage rides along untouched.
    let opaque_children = element
        .children
        .iter()
        .filter(|node| match node {
            Node::Element(el) => {
                !MANAGED_CHILDREN.contains(&el.tag.as_str())
                    && !SPRITE_TAGS.contains(&el.tag.as_str())
            }
            _ => false,
        })
        .cloned()
        .collect();

    Ok(SpriteCommon {
        id,
        name: fields.string("Name"),
        applied_object_style: fields.string("AppliedObjectStyle"),
        content_type: fields.string("ContentType"),
        story_title: fields.string("StoryTitle"),
        item_transform,
        visible: fields.get("Visible").map(|v| v == "true"),
        fill_color: fields.string("FillColor"),
        stroke_color: fields.string("StrokeColor"),
        stroke_weight: fields.number("StrokeWeight"),
        opacity,
        drop_shadow,
        transparency_source,
        opaque_children,
        source: Some(element.clone()),
    })
}

fn parse_image(element: &Element, common: SpriteCommon) -> Result<ImageSprite> {
    // Images may carry no path of their own (the wrapping frame clips them);
    // a malformed path is still an error.
    let geometry = match Geometry::parse_from_shape(element) {
        Ok(geometry) => Some(geometry),
        Err(Error::MissingElement(_)) => None,
        Err(e) => return Err(e),
    };

    let properties = element.first_child("Properties");
    let contents = properties
        .and_then(|props| props.first_child("Contents"))
        .map(|el| {
            let mut encoded = el.text();
            encoded.retain(|c| !c.is_ascii_whitespace());
            BASE64
                .decode(encoded.as_bytes())
                .map_err(|e| Error::InvalidPackage(format!("bad image contents: {}", e)))
        })
        .transpose()?;

    let graphic_bounds = properties
        .and_then(|props| props.first_child("GraphicBounds"))
        .map(parse_graphic_bounds);

    Ok(ImageSprite {
        common,
        geometry,
        graphic_bounds,
        contents,
    })
}

fn parse_graphic_bounds(element: &Element) -> GraphicBounds {
    let number = |name: &str| {
        element
            .attr(name)
            .and_then(parse_number)
            .unwrap_or_default()
    };
    GraphicBounds {
        left: number("Left"),
        top: number("Top"),
        right: number("Right"),
        bottom: number("Bottom"),
    }
}

fn parse_transparency(element: Option<&Element>) -> (Option<f64>, Option<DropShadow>) {
    let Some(element) = element else {
        return (None, None);
    };
    let opacity = element
        .first_child("BlendingSetting")
        .and_then(|el| el.attr("Opacity"))
        .and_then(parse_number);

    let drop_shadow = element.first_child("DropShadowSetting").and_then(|el| {
        if el.attr("Mode") != Some("Drop") {
            return None;
        }
        let number = |name: &str| el.attr(name).and_then(parse_number).unwrap_or_default();
        Some(DropShadow {
            x_offset: number("XOffset"),
            y_offset: number("YOffset"),
            size: number("Size"),
            opacity: el
                .attr("Opacity")
                .and_then(parse_number)
                .unwrap_or(75.0),
        })
    });

    (opacity, drop_shadow)
}

/// Serialize one sprite, recursing into its children through the arena.
/// The explicit dispatch over the closed variant set lives here.
pub(crate) fn serialize_sprite(id: SpriteId, arena: &[Sprite]) -> Element {
    let sprite = &arena[id];
    let mut element = match sprite {
        Sprite::Rectangle(s) => serialize_shape("Rectangle", &s.common, Some(&s.geometry)),
        Sprite::Oval(s) => serialize_shape("Oval", &s.common, Some(&s.geometry)),
        Sprite::Polygon(s) => serialize_shape("Polygon", &s.common, Some(&s.geometry)),
        Sprite::Group(s) => serialize_shape("Group", &s.common, None),
        Sprite::TextFrame(s) => {
            let mut element = serialize_shape("TextFrame", &s.common, Some(&s.geometry));
            element.set_attr("ParentStory", s.parent_story.clone());
            element
        }
        Sprite::Image(s) => serialize_image(s),
    };

    for &child in sprite.children() {
        element.push_element(serialize_sprite(child, arena));
    }
    element
}

fn serialize_shape(tag: &str, common: &SpriteCommon, geometry: Option<&Geometry>) -> Element {
    let edits = Edits::new()
        .set("Self", common.id.as_str())
        .set("Name", common.name.clone())
        .set("AppliedObjectStyle", common.applied_object_style.clone())
        .set(
            "ItemTransform",
            common.item_transform.map(|t| t.to_attribute()),
        )
        .set("StoryTitle", common.story_title.clone())
        .set("ContentType", common.content_type.clone())
        .set("Visible", common.visible)
        .set("FillColor", common.fill_color.clone())
        .set("StrokeColor", common.stroke_color.clone())
        .set("StrokeWeight", common.stroke_weight);
    let identity = match &common.source {
        Some(source) => Identity::Element(source),
        None => Identity::None,
    };

    let mut element = patch(tag, &edits, identity, &["Properties"], Vec::new());

    if let Some(geometry) = geometry {
        inject_into_properties(&mut element, geometry.to_element());
    }
    if let Some(transparency) = serialize_transparency(common) {
        element.push_element(transparency);
    }
    for child in &common.opaque_children {
        element.push(child.clone());
    }
    element
}

fn serialize_image(image: &ImageSprite) -> Element {
    let mut element = serialize_shape("Image", &image.common, image.geometry.as_ref());

    if let Some(contents) = &image.contents {
        let mut contents_element = Element::new("Contents");
        contents_element.push(Node::Cdata(BASE64.encode(contents)));
        inject_into_properties(&mut element, contents_element);
    }
    if let Some(bounds) = &image.graphic_bounds {
        let mut bounds_element = Element::new("GraphicBounds");
        bounds_element.set_attr("Left", fmt_number(bounds.left));
        bounds_element.set_attr("Top", fmt_number(bounds.top));
        bounds_element.set_attr("Right", fmt_number(bounds.right));
        bounds_element.set_attr("Bottom", fmt_number(bounds.bottom));
        inject_into_properties(&mut element, bounds_element);
    }
    element
}

fn serialize_transparency(common: &SpriteCommon) -> Option<Element> {
    if common.opacity.is_none()
        && common.drop_shadow.is_none()
        && common.transparency_source.is_none()
    {
        return None;
    }

    let mut element = match &common.transparency_source {
        Some(source) => source.clone(),
        None => Element::new("TransparencySetting"),
    };

    if let Some(opacity) = common.opacity {
        upsert_child(&mut element, "BlendingSetting", |source| {
            let edits = Edits::new().set("Opacity", opacity);
            let identity = match source {
                Some(source) => Identity::Element(source),
                None => Identity::None,
            };
            patch("BlendingSetting", &edits, identity, &["Properties"], Vec::new())
        });
    }

    match &common.drop_shadow {
        Some(shadow) => {
            upsert_child(&mut element, "DropShadowSetting", |source| {
                let edits = Edits::new()
                    .set("Mode", "Drop")
                    .set("Opacity", shadow.opacity)
                    .set("XOffset", shadow.x_offset)
                    .set("YOffset", shadow.y_offset)
                    .set("Size", shadow.size);
                let identity = match source {
                    Some(source) => Identity::Element(source),
                    None => Identity::None,
                };
                patch("DropShadowSetting", &edits, identity, &["Properties"], Vec::new())
            });
        }
        None => {
            // A shadow the caller cleared (or that never was): force the
            // mode off while keeping whatever other settings were there.
            if element
                .first_child("DropShadowSetting")
                .is_some_and(|el| el.attr("Mode") == Some("Drop"))
            {
                upsert_child(&mut element, "DropShadowSetting", |source| {
                    let edits = Edits::new().set("Mode", "None");
                    let identity = match source {
                        Some(source) => Identity::Element(source),
                        None => Identity::None,
                    };
                    patch("DropShadowSetting", &edits, identity, &["Properties"], Vec::new())
                });
            }
        }
    }

    Some(element)
}

fn upsert_child(
    parent: &mut Element,
    tag: &str,
    build: impl FnOnce(Option<&Element>) -> Element,
) {
    let position = parent
        .children
        .iter()
        .position(|node| node.as_element().is_some_and(|el| el.tag == tag));
    match position {
        Some(position) => {
            let original = parent.children[position].as_element().cloned();
            parent.children[position] = Node::Element(build(original.as_ref()));
        }
        None => {
            let built = build(None);
            parent.push_element(built);
        }
    }
}
