//! Page spreads, master spreads, and their sub-packages.
//!
//! A spread owns its pages and a sprite arena. Shape coordinates are stored
//! in spread-absolute space; the first page's translation-only transform is
//! the page-relative origin, and the coordinate conversions on [`Spread`]
//! are exact inverses of each other.

mod page;
mod sprite;

pub use page::{ColumnDirection, MarginPreference, Page};
pub use sprite::{
    DropShadow, GraphicBounds, GroupSprite, HeaderPixelDecoder, ImageSprite, OvalSprite,
    PixelDecoder, PolygonSprite, RectangleSprite, Sprite, SpriteCommon, SpriteId,
    TextFrameSprite,
};
pub(crate) use sprite::{parse_child_sprites, serialize_sprite};

use crate::error::{Error, Result};
use crate::geometry::{
    GeometricBounds, Geometry, PathCommand, PathPoint, Subpath, Transform, commands_to_subpaths,
    ellipse_path_points, rectangle_path_points, subpath_to_commands,
};
use crate::package::PackageFile;
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::xml::{Element, Node};

/// An ellipse described by its center and radii, in page-relative
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub x: f64,
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

/// Children of a spread element the entity layer manages itself.
const MANAGED_SPREAD_CHILDREN: &[&str] = &["Properties", "Page", "FlattenerPreference"];

/// A page spread: pages plus the drawables placed on them.
#[derive(Debug, Clone)]
pub struct Spread {
    pub id: String,
    pub pages: Vec<Page>,
    hidden: Option<bool>,
    item_transform: Option<Transform>,
    flattener_preference: Option<Element>,
    arena: Vec<Sprite>,
    roots: Vec<SpriteId>,
    opaque_children: Vec<Node>,
    source: Option<Element>,
}

impl Spread {
    pub fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("Spread/Self".into()))?;

        let pages = element
            .children_named("Page")
            .map(Page::parse)
            .collect::<Result<Vec<_>>>()?;

        let mut arena = Vec::new();
        let roots = parse_child_sprites(element, &mut arena)?;

        let opaque_children = element
            .children
            .iter()
            .filter(|node| match node {
                Node::Element(el) => {
                    !MANAGED_SPREAD_CHILDREN.contains(&el.tag.as_str())
                        && !sprite::SPRITE_TAGS.contains(&el.tag.as_str())
                }
                _ => false,
            })
            .cloned()
            .collect();

        Ok(Spread {
            id,
            pages,
            hidden: fields.get("Hidden").map(|v| v == "true"),
            item_transform: match fields.get("ItemTransform") {
                Some(value) => Some(Transform::parse(Some(value))?),
                None => None,
            },
            flattener_preference: element.first_child("FlattenerPreference").cloned(),
            arena,
            roots,
            opaque_children,
            source: Some(element.clone()),
        })
    }

    /// Instantiate a working spread from a master: pages deep-copied with
    /// fresh ids and a recomputed origin-centering translation.
    pub(crate) fn from_master(id: String, master: &MasterSpread, page_ids: Vec<String>) -> Spread {
        let pages = master
            .pages
            .iter()
            .zip(page_ids)
            .map(|(page, page_id)| {
                let mut copy = page.duplicate(page_id);
                let bounds = copy.geometric_bounds;
                copy.item_transform =
                    Transform::translation(-bounds.width / 2.0, -bounds.height / 2.0);
                copy
            })
            .collect();

        Spread {
            id,
            pages,
            hidden: None,
            item_transform: Some(Transform::IDENTITY),
            flattener_preference: None,
            arena: Vec::new(),
            roots: Vec::new(),
            opaque_children: Vec::new(),
            source: None,
        }
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Hidden", self.hidden)
            .set(
                "PageCount",
                (!self.pages.is_empty()).then_some(self.pages.len()),
            )
            .set(
                "ItemTransform",
                self.item_transform.map(|t| t.to_attribute()),
            );
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };

        let mut children: Vec<Node> = Vec::new();
        if let Some(preference) = &self.flattener_preference {
            children.push(Node::Element(patch(
                "FlattenerPreference",
                &Edits::new(),
                Identity::Element(preference),
                &["Properties"],
                Vec::new(),
            )));
        }
        for page in &self.pages {
            children.push(Node::Element(page.serialize()));
        }
        for &root in &self.roots {
            children.push(Node::Element(serialize_sprite(root, &self.arena)));
        }
        children.extend(self.opaque_children.iter().cloned());

        patch("Spread", &edits, identity, &["Properties"], children)
    }

    // ------------------------------------------------------------------
    // Page-relative coordinate system
    // ------------------------------------------------------------------

    /// The page-relative origin: the translation of the first page's own
    /// placement transform.
    pub fn page_origin(&self) -> [f64; 2] {
        self.pages
            .first()
            .map(|page| {
                [
                    page.item_transform.translate_x,
                    page.item_transform.translate_y,
                ]
            })
            .unwrap_or([0.0, 0.0])
    }

    /// Page-relative -> spread-absolute.
    pub fn relative_coords(&self, x: f64, y: f64) -> [f64; 2] {
        let origin = self.page_origin();
        [x + origin[0], y + origin[1]]
    }

    /// Spread-absolute -> page-relative. Exact inverse of
    /// [`Spread::relative_coords`].
    pub fn normalize_coords(&self, x: f64, y: f64) -> [f64; 2] {
        let origin = self.page_origin();
        [x - origin[0], y - origin[1]]
    }

    // ------------------------------------------------------------------
    // Sprite access
    // ------------------------------------------------------------------

    pub fn sprite(&self, id: SpriteId) -> &Sprite {
        &self.arena[id]
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> &mut Sprite {
        &mut self.arena[id]
    }

    /// Top-level sprite handles, in document order.
    pub fn root_sprites(&self) -> &[SpriteId] {
        &self.roots
    }

    /// Every sprite handle in the arena, containers included.
    pub fn all_sprites(&self) -> impl Iterator<Item = SpriteId> {
        0..self.arena.len()
    }

    /// Place a sprite on the spread (or inside `parent`), returning its
    /// handle.
    pub fn add_sprite(&mut self, sprite: Sprite, parent: Option<SpriteId>) -> Result<SpriteId> {
        let id = self.arena.len();
        self.arena.push(sprite);
        match parent {
            None => self.roots.push(id),
            Some(parent_id) => {
                let parent = self
                    .arena
                    .get_mut(parent_id)
                    .ok_or_else(|| Error::UnknownReference(format!("sprite #{}", parent_id)))?;
                let parent_tag = parent.tag();
                parent
                    .children_mut()
                    .ok_or_else(|| {
                        Error::InvalidPackage(format!(
                            "{} cannot contain nested sprites",
                            parent_tag
                        ))
                    })?
                    .push(id);
            }
        }
        Ok(id)
    }

    /// Remove a sprite from the spread's draw lists. The arena slot stays
    /// allocated (handles are stable); the sprite simply no longer
    /// serializes.
    pub fn remove_sprite(&mut self, id: SpriteId) {
        self.roots.retain(|&root| root != id);
        for sprite in &mut self.arena {
            if let Some(children) = sprite.children_mut() {
                children.retain(|&child| child != id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Origin-dependent geometry accessors
    // ------------------------------------------------------------------

    /// Bounding box in page-relative coordinates. For groups this is the
    /// union of the children's boxes.
    pub fn geometric_bounds(&self, id: SpriteId) -> Option<GeometricBounds> {
        match self.sprite(id) {
            Sprite::Image(image) => {
                let bounds = image.graphic_bounds?;
                let [x, y] = self.normalize_coords(bounds.left, bounds.top);
                let [right, bottom] = self.normalize_coords(bounds.right, bounds.bottom);
                Some(GeometricBounds::new(x, y, right - x, bottom - y))
            }
            Sprite::Group(group) => {
                let mut union: Option<GeometricBounds> = None;
                for &child in &group.children {
                    let Some(bounds) = self.geometric_bounds(child) else {
                        continue;
                    };
                    union = Some(match union {
                        None => bounds,
                        Some(current) => {
                            let x = current.x.min(bounds.x);
                            let y = current.y.min(bounds.y);
                            let right = (current.x + current.width).max(bounds.x + bounds.width);
                            let bottom =
                                (current.y + current.height).max(bounds.y + bounds.height);
                            GeometricBounds::new(x, y, right - x, bottom - y)
                        }
                    });
                }
                union
            }
            sprite => {
                let bounds = sprite.geometry()?.bounds()?;
                let [x, y] = self.normalize_coords(bounds.x, bounds.y);
                Some(GeometricBounds::new(x, y, bounds.width, bounds.height))
            }
        }
    }

    /// Rewrite a sprite's box. Rectangles and text frames get a fresh
    /// 4-corner path; images move their graphic bounds.
    pub fn set_bbox(&mut self, id: SpriteId, bounds: GeometricBounds) -> Result<()> {
        let [x, y] = self.relative_coords(bounds.x, bounds.y);
        let points = rectangle_path_points(x, y, bounds.width, bounds.height);

        match self.sprite_mut(id) {
            Sprite::Rectangle(rectangle) => {
                rectangle.geometry.subpaths = vec![Subpath {
                    points,
                    open: false,
                }];
                Ok(())
            }
            Sprite::TextFrame(frame) => {
                frame.geometry.subpaths = vec![Subpath {
                    points,
                    open: false,
                }];
                Ok(())
            }
            Sprite::Image(image) => {
                image.graphic_bounds = Some(GraphicBounds {
                    left: x,
                    top: y,
                    right: x + bounds.width,
                    bottom: y + bounds.height,
                });
                Ok(())
            }
            sprite => Err(Error::Geometry(format!(
                "set_bbox is not defined for {}",
                sprite.tag()
            ))),
        }
    }

    /// Center and radii of an oval, derived from its bounds.
    pub fn ellipse(&self, id: SpriteId) -> Option<Ellipse> {
        let bounds = self.geometric_bounds(id)?;
        let radius_x = bounds.width / 2.0;
        let radius_y = bounds.height / 2.0;
        Some(Ellipse {
            x: bounds.x + radius_x,
            y: bounds.y + radius_y,
            radius_x,
            radius_y,
        })
    }

    /// Re-synthesize an oval's path from center and radii.
    pub fn set_ellipse(&mut self, id: SpriteId, ellipse: Ellipse) -> Result<()> {
        let points = self.to_absolute(ellipse_path_points(
            ellipse.x - ellipse.radius_x,
            ellipse.y - ellipse.radius_y,
            ellipse.radius_x,
            ellipse.radius_y,
        ));
        match self.sprite_mut(id) {
            Sprite::Oval(oval) => {
                oval.geometry.subpaths = vec![Subpath {
                    points,
                    open: false,
                }];
                Ok(())
            }
            sprite => Err(Error::Geometry(format!(
                "set_ellipse is not defined for {}",
                sprite.tag()
            ))),
        }
    }

    /// The sprite's path as flat drawing commands, page-relative.
    pub fn path_commands(&self, id: SpriteId) -> Vec<Vec<PathCommand>> {
        let Some(geometry) = self.sprite(id).geometry() else {
            return Vec::new();
        };
        geometry
            .subpaths
            .iter()
            .map(|subpath| {
                let normalized = Subpath {
                    points: subpath
                        .points
                        .iter()
                        .map(|point| self.map_point(point, Spread::normalize_coords))
                        .collect(),
                    open: subpath.open,
                };
                subpath_to_commands(&normalized)
            })
            .collect()
    }

    /// Replace the sprite's path from flat drawing commands
    /// (page-relative). Quadratics and arcs are converted to cubics on the
    /// way in.
    pub fn set_path_commands(&mut self, id: SpriteId, commands: &[PathCommand]) -> Result<()> {
        let subpaths: Vec<Subpath> = commands_to_subpaths(commands)
            .into_iter()
            .map(|subpath| Subpath {
                points: self.to_absolute(subpath.points),
                open: subpath.open,
            })
            .collect();

        let tag = self.sprite(id).tag();
        match self.sprite_mut(id).geometry_mut() {
            Some(geometry) => {
                geometry.subpaths = subpaths;
                Ok(())
            }
            None => Err(Error::Geometry(format!("{} has no path geometry", tag))),
        }
    }

    fn to_absolute(&self, points: Vec<PathPoint>) -> Vec<PathPoint> {
        points
            .iter()
            .map(|point| self.map_point(point, Spread::relative_coords))
            .collect()
    }

    fn map_point(&self, point: &PathPoint, f: fn(&Spread, f64, f64) -> [f64; 2]) -> PathPoint {
        PathPoint {
            anchor: f(self, point.anchor[0], point.anchor[1]),
            left_direction: f(self, point.left_direction[0], point.left_direction[1]),
            right_direction: f(self, point.right_direction[0], point.right_direction[1]),
        }
    }

    /// Author a new sprite's geometry in spread-absolute space from
    /// page-relative bounds.
    pub(crate) fn absolute_rectangle_geometry(&self, bounds: GeometricBounds) -> Geometry {
        let [x, y] = self.relative_coords(bounds.x, bounds.y);
        Geometry::closed(rectangle_path_points(x, y, bounds.width, bounds.height))
    }

    pub(crate) fn absolute_ellipse_geometry(&self, bounds: GeometricBounds) -> Geometry {
        let [x, y] = self.relative_coords(bounds.x, bounds.y);
        Geometry::closed(ellipse_path_points(
            x,
            y,
            bounds.width / 2.0,
            bounds.height / 2.0,
        ))
    }
}

/// A spread sub-package (one spread per file).
#[derive(Debug, Clone)]
pub struct SpreadPackage {
    pub(crate) file: PackageFile,
    pub spread: Spread,
}

impl SpreadPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        let element = file
            .root
            .first_child("Spread")
            .ok_or_else(|| Error::MissingElement("Spread".into()))?;
        let spread = Spread::parse(element)?;
        Ok(SpreadPackage { file, spread })
    }

    pub(crate) fn create(path: String, spread: Spread) -> Self {
        SpreadPackage {
            file: PackageFile {
                path,
                prolog: Vec::new(),
                root: package_wrapper("idPkg:Spread"),
            },
            spread,
        }
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    pub fn serialize(&self) -> Result<String> {
        let replacements = vec![Node::Element(self.spread.serialize())];
        self.file.serialize_with(&["Spread"], replacements)
    }
}

/// A master spread: the template pages working spreads are stamped from.
#[derive(Debug, Clone)]
pub struct MasterSpread {
    pub id: String,
    pub name: String,
    pub name_prefix: Option<String>,
    pub base_name: Option<String>,
    pub pages: Vec<Page>,
    show_master_items: Option<bool>,
    primary_text_frame: Option<String>,
    item_transform: Option<Transform>,
    page_color: Option<String>,
    source: Option<Element>,
}

/// Naming for a newly created master spread.
#[derive(Debug, Clone)]
pub struct CreateMasterSpreadOptions {
    pub name: String,
    pub name_prefix: String,
    pub base_name: String,
}

impl MasterSpread {
    pub fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("MasterSpread/Self".into()))?;
        let name = fields
            .string("Name")
            .ok_or_else(|| Error::MissingAttribute("MasterSpread/Name".into()))?;

        let pages = element
            .children_named("Page")
            .map(Page::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(MasterSpread {
            id,
            name,
            name_prefix: fields.string("NamePrefix"),
            base_name: fields.string("BaseName"),
            pages,
            show_master_items: fields.get("ShowMasterItems").map(|v| v == "true"),
            primary_text_frame: fields.string("PrimaryTextFrame"),
            item_transform: match fields.get("ItemTransform") {
                Some(value) => Some(Transform::parse(Some(value))?),
                None => None,
            },
            page_color: fields.string("PageColor"),
            source: Some(element.clone()),
        })
    }

    /// Clone a master at the page level under a new identity.
    pub(crate) fn from_master(
        id: String,
        base: &MasterSpread,
        options: &CreateMasterSpreadOptions,
        page_ids: Vec<String>,
    ) -> MasterSpread {
        let pages = base
            .pages
            .iter()
            .zip(page_ids)
            .map(|(page, page_id)| page.duplicate(page_id))
            .collect();
        MasterSpread {
            id,
            name: options.name.clone(),
            name_prefix: Some(options.name_prefix.clone()),
            base_name: Some(options.base_name.clone()),
            pages,
            show_master_items: base.show_master_items,
            primary_text_frame: base.primary_text_frame.clone(),
            item_transform: base.item_transform,
            page_color: base.page_color.clone(),
            source: None,
        }
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Name", self.name.as_str())
            .set("NamePrefix", self.name_prefix.clone())
            .set("BaseName", self.base_name.clone())
            .set("ShowMasterItems", self.show_master_items)
            .set("PageCount", self.pages.len())
            .set("PrimaryTextFrame", self.primary_text_frame.clone())
            .set(
                "ItemTransform",
                self.item_transform.map(|t| t.to_attribute()),
            )
            .set("PageColor", self.page_color.clone());
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };

        let children = self
            .pages
            .iter()
            .map(|page| Node::Element(page.serialize()))
            .collect();
        patch("MasterSpread", &edits, identity, &["Properties"], children)
    }
}

/// A master-spread sub-package.
#[derive(Debug, Clone)]
pub struct MasterSpreadPackage {
    pub(crate) file: PackageFile,
    pub master: MasterSpread,
}

impl MasterSpreadPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        let element = file
            .root
            .first_child("MasterSpread")
            .ok_or_else(|| Error::MissingElement("MasterSpread".into()))?;
        let master = MasterSpread::parse(element)?;
        Ok(MasterSpreadPackage { file, master })
    }

    pub(crate) fn create(path: String, master: MasterSpread) -> Self {
        MasterSpreadPackage {
            file: PackageFile {
                path,
                prolog: Vec::new(),
                root: package_wrapper("idPkg:MasterSpread"),
            },
            master,
        }
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    pub fn serialize(&self) -> Result<String> {
        let replacements = vec![Node::Element(self.master.serialize())];
        self.file.serialize_with(&["MasterSpread"], replacements)
    }
}

fn package_wrapper(tag: &str) -> Element {
    let mut root = Element::new(tag);
    root.set_attr(
        "xmlns:idPkg",
        "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging",
    );
    root.set_attr("DOMVersion", "20.0");
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPREAD: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Spread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <Spread Self="uc8" PageCount="1" ItemTransform="1 0 0 1 0 0" ShowMasterItems="true">
    <FlattenerPreference LineArtAndTextResolution="300" GradientAndMeshResolution="150"/>
    <Page Self="ucb" Name="1" GeometricBounds="0 0 500 500" ItemTransform="1 0 0 1 -250 -250">
      <MarginPreference ColumnCount="1" Top="36" Bottom="36" Left="36" Right="36"/>
    </Page>
    <Rectangle Self="u100" ItemTransform="1 0 0 1 0 0" FillColor="Color/Black">
      <Properties>
        <PathGeometry>
          <GeometryPathType PathOpen="false">
            <PathPointArray>
              <PathPointType Anchor="-230 -230" LeftDirection="-230 -230" RightDirection="-230 -230"/>
              <PathPointType Anchor="-110 -230" LeftDirection="-110 -230" RightDirection="-110 -230"/>
              <PathPointType Anchor="-110 -150" LeftDirection="-110 -150" RightDirection="-110 -150"/>
              <PathPointType Anchor="-230 -150" LeftDirection="-230 -150" RightDirection="-230 -150"/>
            </PathPointArray>
          </GeometryPathType>
        </PathGeometry>
      </Properties>
    </Rectangle>
  </Spread>
</idPkg:Spread>"#;

    fn spread_package() -> SpreadPackage {
        SpreadPackage::parse("Spreads/Spread_uc8.xml", SPREAD).unwrap()
    }

    #[test]
    fn test_parse_spread() {
        let package = spread_package();
        let spread = &package.spread;
        assert_eq!(spread.id, "uc8");
        assert_eq!(spread.pages.len(), 1);
        assert_eq!(spread.root_sprites().len(), 1);
        assert_eq!(spread.page_origin(), [-250.0, -250.0]);
    }

    #[test]
    fn test_coordinate_conversions_are_inverse() {
        let package = spread_package();
        let spread = &package.spread;
        let [ax, ay] = spread.relative_coords(20.0, 30.0);
        assert_eq!([ax, ay], [-230.0, -220.0]);
        assert_eq!(spread.normalize_coords(ax, ay), [20.0, 30.0]);
    }

    #[test]
    fn test_geometric_bounds_page_relative() {
        let package = spread_package();
        let spread = &package.spread;
        let id = spread.root_sprites()[0];
        let bounds = spread.geometric_bounds(id).unwrap();
        assert_eq!(bounds, GeometricBounds::new(20.0, 20.0, 120.0, 80.0));
    }

    #[test]
    fn test_set_bbox_rewrites_corners() {
        let mut package = spread_package();
        let id = package.spread.root_sprites()[0];
        package
            .spread
            .set_bbox(id, GeometricBounds::new(0.0, 0.0, 50.0, 40.0))
            .unwrap();
        let bounds = package.spread.geometric_bounds(id).unwrap();
        assert_eq!(bounds, GeometricBounds::new(0.0, 0.0, 50.0, 40.0));

        // Stored coordinates are spread-absolute
        let geometry = package.spread.sprite(id).geometry().unwrap();
        assert_eq!(geometry.subpaths[0].points[0].anchor, [-250.0, -250.0]);
    }

    #[test]
    fn test_path_commands_roundtrip_page_relative() {
        let mut package = spread_package();
        let id = package.spread.root_sprites()[0];
        let commands = package.spread.path_commands(id);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0][0], PathCommand::MoveTo { x: 20.0, y: 20.0 });

        package.spread.set_path_commands(id, &commands[0]).unwrap();
        let bounds = package.spread.geometric_bounds(id).unwrap();
        assert_eq!(bounds, GeometricBounds::new(20.0, 20.0, 120.0, 80.0));
    }

    #[test]
    fn test_serialize_preserves_flattener_and_attrs() {
        let package = spread_package();
        let element = package.spread.serialize();
        assert_eq!(element.attr("ShowMasterItems"), Some("true"));
        let flattener = element.first_child("FlattenerPreference").unwrap();
        assert_eq!(flattener.attr("LineArtAndTextResolution"), Some("300"));
        assert!(element.first_child("Page").is_some());
        assert!(element.first_child("Rectangle").is_some());
    }

    #[test]
    fn test_remove_sprite_stops_serialization() {
        let mut package = spread_package();
        let id = package.spread.root_sprites()[0];
        package.spread.remove_sprite(id);
        let element = package.spread.serialize();
        assert!(element.first_child("Rectangle").is_none());
    }

    const MASTER: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:MasterSpread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <MasterSpread Self="uma" Name="A-Master" NamePrefix="A" BaseName="Master" PageCount="1" ItemTransform="1 0 0 1 0 0" ShowMasterItems="true">
    <Page Self="umb" Name="A" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 -306 -396">
      <MarginPreference ColumnCount="1" Top="36" Bottom="36" Left="36" Right="36"/>
    </Page>
  </MasterSpread>
</idPkg:MasterSpread>"#;

    #[test]
    fn test_spread_from_master_recenters_origin() {
        let master_package = MasterSpreadPackage::parse("MasterSpreads/MasterSpread_uma.xml", MASTER).unwrap();
        let mut master = master_package.master.clone();
        master.pages[0].geometric_bounds = GeometricBounds::new(0.0, 0.0, 500.0, 500.0);

        let spread = Spread::from_master("us1".into(), &master, vec!["up1".into()]);
        assert_eq!(spread.pages.len(), 1);
        assert_eq!(spread.pages[0].id, "up1");
        assert_eq!(spread.page_origin(), [-250.0, -250.0]);
        // Margin data deep-copied from the master page
        assert_eq!(spread.pages[0].margin_preference.top, Some(36.0));
    }

    #[test]
    fn test_master_from_master_clones_pages() {
        let master_package = MasterSpreadPackage::parse("MasterSpreads/MasterSpread_uma.xml", MASTER).unwrap();
        let options = CreateMasterSpreadOptions {
            name: "B-Master".into(),
            name_prefix: "B".into(),
            base_name: "Master".into(),
        };
        let copy = MasterSpread::from_master(
            "umc".into(),
            &master_package.master,
            &options,
            vec!["umd".into()],
        );
        assert_eq!(copy.name, "B-Master");
        assert_eq!(copy.pages[0].id, "umd");
        assert_eq!(
            copy.pages[0].geometric_bounds,
            master_package.master.pages[0].geometric_bounds
        );
    }
}
