//! Shared document resources: colors, named text styles, fonts, and the
//! preferences sub-package.

mod color;
mod fonts;
mod prefs;
mod styles;

pub use color::{Color, ColorInput, ColorModel, ColorSpace, ColorSpec, GraphicPackage};
pub use fonts::{Font, FontFamily, FontInfo, FontStatus, FontsPackage};
pub use prefs::PreferencesPackage;
pub use styles::{
    Capitalization, CharacterStyle, CharacterStyleInput, CharacterStyleSpec, Justification,
    ParagraphStyle, ParagraphStyleInput, ParagraphStyleSpec, StylesPackage,
};
