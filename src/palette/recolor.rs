//! Palette-constrained recoloring of RGBA images.

use super::color::{ColorScheme, Rgb};
use super::kdtree::KdTree;
use super::kmeans::{KMeans, WeightedColor};
use crate::error::{ForgeError, Result};
use image::RgbaImage;
use std::collections::HashMap;

/// How pixel colors are brought onto the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecolorMode {
    /// Map every pixel straight to its nearest palette color.
    Direct,
    /// Reduce to `clusters` representative colors first, then map those.
    Clustered {
        clusters: usize,
        seed: u64,
        max_iterations: u32,
    },
}

impl Default for RecolorMode {
    fn default() -> Self {
        RecolorMode::Clustered {
            clusters: 10,
            seed: 42,
            max_iterations: 50,
        }
    }
}

/// Maps images onto one color scheme.
///
/// The scheme's colors are indexed once in a k-d tree and reused for every
/// image recolored with this instance.
#[derive(Debug, Clone)]
pub struct PaletteRecolorer {
    scheme: ColorScheme,
    index: KdTree,
}

impl PaletteRecolorer {
    /// Index `scheme` for nearest-color lookups.
    pub fn new(scheme: &ColorScheme) -> Result<Self> {
        if scheme.colors.is_empty() {
            return Err(ForgeError::PaletteEmpty(scheme.name.clone()));
        }

        let points: Vec<[f64; 3]> = scheme.colors.iter().map(|c| c.to_point()).collect();
        Ok(Self {
            scheme: scheme.clone(),
            index: KdTree::build(&points),
        })
    }

    /// The scheme this recolorer maps onto.
    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    /// Nearest palette color, lowest palette index on ties.
    pub fn nearest(&self, color: Rgb) -> Rgb {
        let index = self.index.nearest(color.to_point()).unwrap_or(0);
        self.scheme.colors[index]
    }

    /// Recolor `image`, copying its alpha channel verbatim.
    ///
    /// Alpha never short-circuits the mapping: fully transparent pixels are
    /// remapped like any other.
    pub fn recolor(&self, image: &RgbaImage, mode: RecolorMode) -> RgbaImage {
        let samples = distinct_colors(image);

        let mapping: HashMap<Rgb, Rgb> = match mode {
            RecolorMode::Direct => samples
                .iter()
                .map(|s| (s.color, self.nearest(s.color)))
                .collect(),
            RecolorMode::Clustered {
                clusters,
                seed,
                max_iterations,
            } => {
                let reduced = KMeans {
                    clusters,
                    seed,
                    max_iterations,
                }
                .fit(&samples);
                let centroid_targets: Vec<Rgb> = reduced
                    .centroids
                    .iter()
                    .map(|c| self.nearest(*c))
                    .collect();
                samples
                    .iter()
                    .zip(&reduced.labels)
                    .map(|(s, &label)| (s.color, centroid_targets[label]))
                    .collect()
            }
        };

        let mut output = image.clone();
        for pixel in output.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let Rgb([mr, mg, mb]) = mapping
                .get(&Rgb([r, g, b]))
                .copied()
                .unwrap_or_else(|| self.nearest(Rgb([r, g, b])));
            pixel.0 = [mr, mg, mb, a];
        }
        output
    }
}

/// Recolor `image` onto `scheme` in one call.
pub fn recolor(image: &RgbaImage, scheme: &ColorScheme, mode: RecolorMode) -> Result<RgbaImage> {
    Ok(PaletteRecolorer::new(scheme)?.recolor(image, mode))
}

/// Gaussian smoothing used to soften hard cluster edges before generation.
///
/// A non-positive radius returns the image unchanged.
pub fn smooth(image: &RgbaImage, radius: f32) -> RgbaImage {
    if radius <= 0.0 {
        return image.clone();
    }
    image::imageops::blur(image, radius)
}

/// Distinct RGB values with pixel counts, sorted by color so that seeded
/// clustering sees the same sample order on every run.
fn distinct_colors(image: &RgbaImage) -> Vec<WeightedColor> {
    let mut counts: HashMap<Rgb, u64> = HashMap::new();
    for pixel in image.pixels() {
        let [r, g, b, _] = pixel.0;
        *counts.entry(Rgb([r, g, b])).or_insert(0) += 1;
    }

    let mut samples: Vec<WeightedColor> = counts
        .into_iter()
        .map(|(color, count)| WeightedColor { color, count })
        .collect();
    samples.sort_by_key(|s| s.color);
    samples
}
