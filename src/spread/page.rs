//! Pages and their margin/grid blocks.

use crate::error::{Error, Result};
use crate::geometry::{GeometricBounds, Transform};
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::util::fmt_number_list;
use crate::xml::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDirection {
    Horizontal,
    Vertical,
}

impl ColumnDirection {
    pub fn name(self) -> &'static str {
        match self {
            ColumnDirection::Horizontal => "Horizontal",
            ColumnDirection::Vertical => "Vertical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Horizontal" => Some(ColumnDirection::Horizontal),
            "Vertical" => Some(ColumnDirection::Vertical),
            _ => None,
        }
    }
}

/// Column and inset settings for a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginPreference {
    pub column_count: Option<f64>,
    pub column_gutter: Option<f64>,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub column_direction: Option<ColumnDirection>,
    pub columns_positions: Option<Vec<f64>>,
}

/// A page inside a spread or master spread.
///
/// The page's own item transform is the translation that defines the
/// page-relative coordinate origin for every shape on the spread.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: String,
    pub name: Option<String>,
    pub page_color: Option<String>,
    pub geometric_bounds: GeometricBounds,
    pub item_transform: Transform,
    pub master_page_transform: Option<Transform>,
    pub grid_starting_point: Option<String>,
    pub margin_preference: MarginPreference,
    /// The grid data block is carried opaque and deep-copied on template
    /// instantiation.
    pub grid_data: Option<Element>,
    source: Option<Element>,
}

impl Page {
    pub fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);
        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("Page/Self".into()))?;
        let geometric_bounds = GeometricBounds::parse(
            fields
                .get("GeometricBounds")
                .ok_or_else(|| Error::MissingAttribute("Page/GeometricBounds".into()))?,
        )?;
        let item_transform = Transform::parse(fields.get("ItemTransform"))?;
        let master_page_transform = fields
            .get("MasterPageTransform")
            .map(|value| Transform::parse(Some(value)))
            .transpose()?;

        let margin_preference = element
            .first_child("MarginPreference")
            .map(parse_margin_preference)
            .unwrap_or_default();

        Ok(Page {
            id,
            name: fields.string("Name"),
            page_color: fields.string("PageColor"),
            geometric_bounds,
            item_transform,
            master_page_transform,
            grid_starting_point: fields.string("GridStartingPoint"),
            margin_preference,
            grid_data: element.first_child("GridDataInformation").cloned(),
            source: Some(element.clone()),
        })
    }

    /// Deep copy for template instantiation: same geometry, margins, and
    /// grid block under a fresh id. The copy keeps the original element
    /// snapshot so unknown page fields carry over too.
    pub(crate) fn duplicate(&self, new_id: String) -> Page {
        let mut copy = self.clone();
        copy.id = new_id;
        copy
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Name", self.name.clone())
            .set("PageColor", self.page_color.clone())
            .set(
                "MasterPageTransform",
                self.master_page_transform.map(|t| t.to_attribute()),
            )
            .set("GeometricBounds", self.geometric_bounds.to_attribute())
            .set("ItemTransform", self.item_transform.to_attribute())
            .set("GridStartingPoint", self.grid_starting_point.clone());
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };

        let mut children = vec![Node::Element(serialize_margin_preference(
            &self.margin_preference,
            self.source
                .as_ref()
                .and_then(|s| s.first_child("MarginPreference")),
        ))];
        if let Some(grid_data) = &self.grid_data {
            children.push(Node::Element(grid_data.clone()));
        }

        patch("Page", &edits, identity, &["Properties"], children)
    }
}

fn parse_margin_preference(element: &Element) -> MarginPreference {
    let fields = element_fields(element, &["Properties"]);
    MarginPreference {
        column_count: fields.number("ColumnCount"),
        column_gutter: fields.number("ColumnGutter"),
        top: fields.number("Top"),
        bottom: fields.number("Bottom"),
        left: fields.number("Left"),
        right: fields.number("Right"),
        column_direction: fields
            .get("ColumnDirection")
            .and_then(ColumnDirection::from_name),
        columns_positions: fields.number_list("ColumnsPositions"),
    }
}

fn serialize_margin_preference(
    preference: &MarginPreference,
    source: Option<&Element>,
) -> Element {
    let edits = Edits::new()
        .set("ColumnCount", preference.column_count)
        .set("ColumnGutter", preference.column_gutter)
        .set("Top", preference.top)
        .set("Bottom", preference.bottom)
        .set("Left", preference.left)
        .set("Right", preference.right)
        .set(
            "ColumnDirection",
            preference.column_direction.map(|d| d.name().to_string()),
        )
        .set(
            "ColumnsPositions",
            preference.columns_positions.as_deref().map(fmt_number_list),
        );
    let identity = match source {
        Some(source) => Identity::Element(source),
        None => Identity::None,
    };
    patch("MarginPreference", &edits, identity, &["Properties"], Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const PAGE: &str = r#"<Page Self="ub2" Name="1" AppliedMaster="uma" GeometricBounds="0 0 500 500" ItemTransform="1 0 0 1 -250 -250" GridStartingPoint="TopOutside">
  <MarginPreference ColumnCount="1" ColumnGutter="12" Top="36" Bottom="36" Left="36" Right="36" ColumnDirection="Horizontal" ColumnsPositions="0 428"/>
  <GridDataInformation Self="ub3" FontStyle="Regular" PointSize="12"/>
</Page>"#;

    fn page() -> Page {
        Page::parse(&parse_document(PAGE).unwrap().root).unwrap()
    }

    #[test]
    fn test_parse_page() {
        let page = page();
        assert_eq!(page.id, "ub2");
        assert_eq!(page.geometric_bounds, GeometricBounds::new(0.0, 0.0, 500.0, 500.0));
        assert_eq!(page.item_transform.translate_x, -250.0);
        assert_eq!(page.margin_preference.column_count, Some(1.0));
        assert_eq!(
            page.margin_preference.columns_positions,
            Some(vec![0.0, 428.0])
        );
        assert!(page.grid_data.is_some());
    }

    #[test]
    fn test_serialize_keeps_unmanaged_attribute() {
        let page = page();
        let element = page.serialize();
        // AppliedMaster is not modeled but must survive
        assert_eq!(element.attr("AppliedMaster"), Some("uma"));
        assert!(element.first_child("GridDataInformation").is_some());
        assert!(element.first_child("MarginPreference").is_some());
    }

    #[test]
    fn test_duplicate_deep_copies() {
        let page = page();
        let copy = page.duplicate("u99".into());
        assert_eq!(copy.id, "u99");
        assert_eq!(copy.geometric_bounds, page.geometric_bounds);
        assert_eq!(copy.margin_preference, page.margin_preference);
        assert_eq!(copy.grid_data, page.grid_data);
    }

    #[test]
    fn test_parse_requires_bounds() {
        let bad = r#"<Page Self="u1" ItemTransform="1 0 0 1 0 0"/>"#;
        assert!(Page::parse(&parse_document(bad).unwrap().root).is_err());
    }
}
