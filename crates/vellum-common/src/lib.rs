//! Common primitives for the Vellum page viewer.
//!
//! This crate provides shared infrastructure used by the page and
//! compositing layers:
//! - **Geometry** - integer points, sizes, rectangles, and rectangle regions
//! - **Color** - plain RGBA color values
//! - **Raster** - software surfaces and an alpha-blending painter
//! - **Warning System** - deduplicated terminal diagnostics

pub mod color;
pub mod geometry;
pub mod raster;
pub mod warning;

pub use color::Color;
pub use geometry::{Point, Rect, Region, Size};
pub use raster::{Painter, RasterError, Surface};
