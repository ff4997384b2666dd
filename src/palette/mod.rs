//! Palette-constrained recoloring.
//!
//! Reduces an arbitrary RGBA image onto a fixed color scheme:
//!
//! - **Direct** mapping sends each pixel to its nearest palette color, which
//!   dithers visibly where a region sits between two palette entries.
//! - **Clustered** mapping (default) first reduces the image to a handful of
//!   representative colors with seeded k-means, then maps those.
//!
//! Nearest-color lookups go through a k-d tree and are exact; equidistant
//! candidates resolve to the lowest palette index. The alpha channel is never
//! touched by the mapping.

mod color;
mod kdtree;
mod kmeans;
mod recolor;


pub use color::{ColorScheme, Rgb};
pub use recolor::{PaletteRecolorer, RecolorMode, recolor, smooth};
