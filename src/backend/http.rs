//! HTTP adapter for an Automatic1111-compatible generation API.

use super::{GenerationBackend, Img2ImgRequest, Txt2ImgRequest};
use crate::error::{ForgeError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

const TXT2IMG_ENDPOINT: &str = "/sdapi/v1/txt2img";
const IMG2IMG_ENDPOINT: &str = "/sdapi/v1/img2img";

/// Error bodies are truncated to this many characters in messages.
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    images: Vec<String>,
}

/// Blocking HTTP client for the generation API.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a client for `api_url` with a per-request timeout.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn post(&self, endpoint: &str, body: &Value) -> Result<Vec<Vec<u8>>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.client.post(&url).json(body).send().map_err(|e| {
            if e.is_timeout() {
                ForgeError::generation(format!(
                    "request to {} timed out after {}s",
                    url,
                    self.timeout.as_secs()
                ))
            } else {
                ForgeError::generation(format!("request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ForgeError::GenerationFailed {
                status: Some(status.as_u16()),
                message: truncate(text.trim(), MAX_ERROR_BODY),
            });
        }

        let parsed: GenerationResponse = response.json().map_err(|e| {
            ForgeError::generation(format!("invalid response from {}: {}", url, e))
        })?;

        decode_images(&parsed.images)
    }
}

impl GenerationBackend for HttpBackend {
    fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Vec<Vec<u8>>> {
        self.post(TXT2IMG_ENDPOINT, &txt2img_payload(request)?)
    }

    fn img2img(&self, request: &Img2ImgRequest) -> Result<Vec<Vec<u8>>> {
        self.post(IMG2IMG_ENDPOINT, &img2img_payload(request)?)
    }
}

fn txt2img_payload(request: &Txt2ImgRequest) -> Result<Value> {
    serde_json::to_value(request)
        .map_err(|e| ForgeError::generation(format!("failed to encode request: {}", e)))
}

fn img2img_payload(request: &Img2ImgRequest) -> Result<Value> {
    let mut payload = serde_json::to_value(request)
        .map_err(|e| ForgeError::generation(format!("failed to encode request: {}", e)))?;

    if let Value::Object(map) = &mut payload {
        map.insert(
            "init_images".to_string(),
            json!([STANDARD.encode(&request.init_image)]),
        );
        if let Some(checkpoint) = &request.checkpoint {
            map.insert(
                "override_settings".to_string(),
                json!({ "sd_model_checkpoint": checkpoint }),
            );
        }
    }

    Ok(payload)
}

/// Decode base64 images, accepting an optional `data:` URL prefix.
fn decode_images(images: &[String]) -> Result<Vec<Vec<u8>>> {
    images
        .iter()
        .map(|encoded| {
            let data = match encoded.strip_prefix("data:") {
                Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
                None => encoded.as_str(),
            };
            STANDARD.decode(data.trim()).map_err(|e| {
                ForgeError::generation(format!("backend returned invalid base64 image: {}", e))
            })
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
