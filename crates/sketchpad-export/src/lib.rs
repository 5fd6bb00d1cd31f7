//! Import/export boundary for sketchpad documents.
//!
//! - [`json`]: the versioned persistence format (round-trips)
//! - [`svg`]: vector export (one-way)
//! - [`raster`]: PNG export at 2x the document size (one-way)

pub mod json;
pub mod raster;
pub mod svg;

pub use json::{from_json, load_document, save_document, to_json};
pub use raster::{EXPORT_SCALE, RasterOptions, export_png, rasterize, save_png};
pub use svg::{export_svg, save_svg};
