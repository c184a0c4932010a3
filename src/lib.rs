//! # folio
//!
//! A fast, lightweight library for reading, mutating, and writing InDesign
//! IDML document packages.
//!
//! ## Features
//!
//! - Parse an IDML package into typed entities: spreads, pages, shapes,
//!   stories, colors, styles, fonts
//! - Mutate geometry, transforms, fills, text, and styling through a small
//!   imperative API
//! - Round-trip losslessly: structure the library does not model passes
//!   through byte-identical, and modeled elements keep every field they
//!   carried
//! - Create documents from scratch from an embedded blank template
//!
//! ## Quick Start
//!
//! ```
//! use folio::{ColorInput, ColorSpec, CreateOptions, Document, GeometricBounds, ShapeOptions};
//!
//! // A 500x500pt document with a red rectangle
//! let mut doc = Document::create(CreateOptions {
//!     page_bounds: GeometricBounds::new(0.0, 0.0, 500.0, 500.0),
//! })?;
//!
//! doc.create_rectangle(
//!     0,
//!     &ShapeOptions {
//!         bounds: GeometricBounds::new(20.0, 20.0, 120.0, 80.0),
//!         fill: Some(ColorSpec::Value(ColorInput::Rgb {
//!             red: 255.0,
//!             green: 0.0,
//!             blue: 0.0,
//!         })),
//!         ..Default::default()
//!     },
//!     None,
//! )?;
//!
//! let bytes = doc.export()?;
//! let reloaded = folio::Document::load(&bytes)?;
//! assert_eq!(reloaded.spread(0).root_sprites().len(), 1);
//! # Ok::<(), folio::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod geometry;
pub mod package;
pub mod patch;
pub mod resources;
pub mod spread;
pub mod story;
pub mod xml;

pub(crate) mod util;

pub use document::{CreateOptions, Document, ShapeOptions};
pub use error::{Error, Result};
pub use geometry::{
    GeometricBounds, Geometry, Matrix, PathCommand, PathPoint, PathType, Subpath, Transform,
};
pub use resources::{
    CharacterStyleInput, CharacterStyleSpec, Color, ColorInput, ColorSpec, FontFamily, FontInfo,
    ParagraphStyleInput, ParagraphStyleSpec,
};
pub use spread::{
    CreateMasterSpreadOptions, DropShadow, Ellipse, HeaderPixelDecoder, PixelDecoder, Spread,
    Sprite, SpriteId,
};
pub use story::{ParagraphInput, RunInput, Story};
