//! Generation backend contract.
//!
//! The pipeline talks to the image generator through [`GenerationBackend`].
//! Requests carry the text-conditioned parameters and, for image-conditioned
//! stages, the encoded source image. Responses are the raw encoded images in
//! the order the backend produced them; the pipeline keeps the first.

use crate::error::{ForgeError, Result};
use crate::task::TaskDescriptor;
use serde::Serialize;

mod http;

pub use http::HttpBackend;

/// Text-conditioned generation request.
///
/// Field names follow the backend's wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Txt2ImgRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    /// `-1` lets the backend choose.
    pub seed: i64,
    pub sampler_name: String,
    pub scheduler: String,
    pub cfg_scale: f64,
}

impl Txt2ImgRequest {
    /// Request built from a descriptor's parameters and a composed prompt.
    pub fn from_descriptor(descriptor: &TaskDescriptor, prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            negative_prompt: descriptor.negative_prompt.clone(),
            width: descriptor.width,
            height: descriptor.height,
            steps: descriptor.steps,
            seed: descriptor.wire_seed(),
            sampler_name: descriptor.sampler_name.clone(),
            scheduler: descriptor.scheduler.clone(),
            cfg_scale: descriptor.cfg_scale,
        }
    }
}

/// Image-conditioned generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Img2ImgRequest {
    #[serde(flatten)]
    pub params: Txt2ImgRequest,

    /// Encoded source image; sent base64 encoded as `init_images`.
    #[serde(skip)]
    pub init_image: Vec<u8>,

    pub denoising_strength: f64,

    /// Backend resize policy for the source image.
    pub resize_mode: u8,

    /// Model checkpoint to switch to for this request only.
    #[serde(skip)]
    pub checkpoint: Option<String>,
}

/// The image generator.
pub trait GenerationBackend {
    /// Generate images from text alone.
    fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Vec<Vec<u8>>>;

    /// Generate images conditioned on a source image.
    fn img2img(&self, request: &Img2ImgRequest) -> Result<Vec<Vec<u8>>>;
}

/// Take the first image of a response, checking that it decodes.
///
/// An empty response or undecodable bytes count as a failed generation, so
/// nothing unusable is ever persisted as an artifact.
pub fn first_image(images: Vec<Vec<u8>>) -> Result<Vec<u8>> {
    let image = images
        .into_iter()
        .next()
        .ok_or_else(|| ForgeError::generation("backend returned no images"))?;

    image::load_from_memory(&image).map_err(|e| {
        ForgeError::generation(format!("backend returned an undecodable image: {}", e))
    })?;

    Ok(image)
}
