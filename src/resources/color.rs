//! Color swatches and the graphics resource sub-package that owns them.

use crate::error::{Error, Result};
use crate::package::PackageFile;
use crate::patch::{Edits, Identity, element_fields, patch};
use crate::util::{fmt_number_list, parse_number_list};
use crate::xml::{Element, Node};

/// Tags in the graphics sub-package that are re-serialized from entities;
/// everything else (inks, gradients, stroke styles, ...) passes through.
const IMPLEMENTED: &[&str] = &["Color"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Process,
    Spot,
    Registration,
    MixedInk,
}

impl ColorModel {
    pub fn name(self) -> &'static str {
        match self {
            ColorModel::Process => "Process",
            ColorModel::Spot => "Spot",
            ColorModel::Registration => "Registration",
            ColorModel::MixedInk => "MixedInk",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Process" => Some(ColorModel::Process),
            "Spot" => Some(ColorModel::Spot),
            "Registration" => Some(ColorModel::Registration),
            "MixedInk" => Some(ColorModel::MixedInk),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Cmyk,
    Lab,
    Gray,
}

impl ColorSpace {
    pub fn name(self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Cmyk => "CMYK",
            ColorSpace::Lab => "Lab",
            ColorSpace::Gray => "Gray",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RGB" => Some(ColorSpace::Rgb),
            "CMYK" => Some(ColorSpace::Cmyk),
            "Lab" => Some(ColorSpace::Lab),
            "Gray" => Some(ColorSpace::Gray),
            _ => None,
        }
    }
}

/// Structural description of a color, used for find-or-create resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorInput {
    Rgb { red: f64, green: f64, blue: f64 },
    Cmyk {
        cyan: f64,
        magenta: f64,
        yellow: f64,
        black: f64,
    },
}

/// Either an existing swatch id or a structural description to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    Id(String),
    Value(ColorInput),
}

/// A color swatch.
#[derive(Debug, Clone)]
pub struct Color {
    pub id: String,
    pub model: ColorModel,
    pub space: ColorSpace,
    pub values: Vec<f64>,
    pub name: Option<String>,
    editable: Option<bool>,
    removable: Option<bool>,
    visible: Option<bool>,
    swatch_creator_id: Option<String>,
    swatch_group_reference: Option<String>,
    source: Option<Element>,
}

impl Color {
    pub fn parse(element: &Element) -> Result<Self> {
        let fields = element_fields(element, &["Properties"]);

        let id = fields
            .string("Self")
            .ok_or_else(|| Error::MissingAttribute("Color/Self".into()))?;
        let model = fields
            .get("Model")
            .and_then(ColorModel::from_name)
            .ok_or_else(|| Error::MissingAttribute("Color/Model".into()))?;
        let space = fields
            .get("Space")
            .and_then(ColorSpace::from_name)
            .ok_or_else(|| Error::MissingAttribute("Color/Space".into()))?;
        let values = fields
            .get("ColorValue")
            .map(parse_number_list)
            .ok_or_else(|| Error::MissingAttribute("Color/ColorValue".into()))?;

        Ok(Color {
            id,
            model,
            space,
            values,
            name: fields.string("Name"),
            editable: fields.get("ColorEditable").map(|v| v == "true"),
            removable: fields.get("ColorRemovable").map(|v| v == "true"),
            visible: fields.get("Visible").map(|v| v == "true"),
            swatch_creator_id: fields.string("SwatchCreatorID"),
            swatch_group_reference: fields.string("SwatchColorGroupReference"),
            source: Some(element.clone()),
        })
    }

    /// Structural equality against an input descriptor. Cosmetic fields
    /// (name, swatch bookkeeping) are ignored.
    pub fn matches(&self, input: &ColorInput) -> bool {
        match *input {
            ColorInput::Rgb { red, green, blue } => {
                self.model == ColorModel::Process
                    && self.space == ColorSpace::Rgb
                    && self.values == [red, green, blue]
            }
            ColorInput::Cmyk {
                cyan,
                magenta,
                yellow,
                black,
            } => {
                self.model == ColorModel::Process
                    && self.space == ColorSpace::Cmyk
                    && self.values == [cyan, magenta, yellow, black]
            }
        }
    }

    pub fn serialize(&self) -> Element {
        let edits = Edits::new()
            .set("Self", self.id.as_str())
            .set("Name", self.name.clone())
            .set("Model", self.model.name())
            .set("Space", self.space.name())
            .set("ColorValue", fmt_number_list(&self.values))
            .set("ColorEditable", self.editable)
            .set("ColorRemovable", self.removable)
            .set("Visible", self.visible)
            .set("SwatchCreatorID", self.swatch_creator_id.clone())
            .set(
                "SwatchColorGroupReference",
                self.swatch_group_reference.clone(),
            );
        let identity = match &self.source {
            Some(source) => Identity::Element(source),
            None => Identity::None,
        };
        patch("Color", &edits, identity, &["Properties"], Vec::new())
    }
}

/// The graphics resource sub-package (colors plus passthrough content).
#[derive(Debug, Clone)]
pub struct GraphicPackage {
    pub(crate) file: PackageFile,
    pub colors: Vec<Color>,
}

impl GraphicPackage {
    pub fn parse(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let file = PackageFile::parse(path, bytes)?;
        let colors = file
            .root
            .children_named("Color")
            .map(Color::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(GraphicPackage { file, colors })
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// Append a newly authored swatch.
    pub(crate) fn create_color(
        &mut self,
        input: &ColorInput,
        id: String,
        name: String,
        swatch_creator_id: &str,
        swatch_group_reference: &str,
    ) -> &Color {
        let (space, values) = match *input {
            ColorInput::Rgb { red, green, blue } => (ColorSpace::Rgb, vec![red, green, blue]),
            ColorInput::Cmyk {
                cyan,
                magenta,
                yellow,
                black,
            } => (ColorSpace::Cmyk, vec![cyan, magenta, yellow, black]),
        };
        self.colors.push(Color {
            id,
            model: ColorModel::Process,
            space,
            values,
            name: Some(name),
            editable: Some(true),
            removable: Some(true),
            visible: Some(true),
            swatch_creator_id: Some(swatch_creator_id.to_string()),
            swatch_group_reference: Some(swatch_group_reference.to_string()),
            source: None,
        });
        self.colors.last().unwrap()
    }

    pub fn serialize(&self) -> Result<String> {
        let replacements = self
            .colors
            .iter()
            .map(|color| Node::Element(color.serialize()))
            .collect();
        self.file.serialize_with(IMPLEMENTED, replacements)
    }
}
