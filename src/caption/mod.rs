//! Image captioning through an external pretrained model.
//!
//! The model is opaque: a [`Captioner`] takes a decoded image and returns
//! whatever text the service produced. There is no retry, batching or
//! caching; identical images may well get different captions.

pub mod gemini;
pub mod huggingface;

use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, Provider};
use crate::error::CaptionError;

pub use gemini::GeminiCaptioner;
pub use huggingface::HuggingFaceCaptioner;

/// JPEG quality used when forwarding uploads to a model.
pub const JPEG_QUALITY: u8 = 85;

/// Longest slice of an error body kept for logs and error messages.
const BODY_EXCERPT_CHARS: usize = 500;

#[async_trait]
pub trait Captioner: Send + Sync {
    /// Human-readable model label, shown next to the caption.
    fn model_name(&self) -> &str;

    async fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptionResponse {
    pub caption: String,
    pub model: String,
    pub processing_time_ms: u128,
}

/// Captions one image, bounded by `timeout`.
pub async fn generate_caption(
    captioner: &dyn Captioner,
    image: &DynamicImage,
    timeout: Duration,
) -> Result<CaptionResponse, CaptionError> {
    let start = Instant::now();

    let caption = tokio::time::timeout(timeout, captioner.caption(image))
        .await
        .map_err(|_| CaptionError::Timeout {
            secs: timeout.as_secs(),
        })??;
    let caption = non_empty(caption)?;

    let elapsed = start.elapsed().as_millis();
    tracing::info!(model = captioner.model_name(), elapsed_ms = elapsed as u64, "✅ caption generated");

    Ok(CaptionResponse {
        caption,
        model: captioner.model_name().to_string(),
        processing_time_ms: elapsed,
    })
}

/// Builds the backend selected in `config`.
pub fn from_config(config: &Config) -> Result<Arc<dyn Captioner>, CaptionError> {
    let client = reqwest::Client::builder()
        .timeout(config.model_timeout())
        .build()?;

    match config.provider {
        Provider::Huggingface => Ok(Arc::new(HuggingFaceCaptioner::new(
            client,
            &config.hf_endpoint,
            config.model_id(),
            config.hf_token.clone(),
        ))),
        Provider::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| CaptionError::NotConfigured {
                    provider: "gemini".to_string(),
                    hint: "set GEMINI_API_KEY or pass --gemini-api-key".to_string(),
                })?;
            Ok(Arc::new(GeminiCaptioner::new(client, api_key, config.model_id())))
        }
    }
}

/// Re-encodes an image as JPEG for upload to a model.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, CaptionError> {
    let mut jpeg_bytes = Vec::new();
    image.write_to(
        &mut Cursor::new(&mut jpeg_bytes),
        ImageOutputFormat::Jpeg(JPEG_QUALITY),
    )?;
    Ok(jpeg_bytes)
}

/// Trims a model answer and rejects blank ones.
pub fn non_empty(caption: String) -> Result<String, CaptionError> {
    let trimmed = caption.trim();
    if trimmed.is_empty() {
        return Err(CaptionError::EmptyCaption);
    }
    Ok(trimmed.to_string())
}

/// Reads a response, turning non-success statuses into errors.
pub(crate) async fn success_body(response: reqwest::Response) -> Result<String, CaptionError> {
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(status = %status, body = %excerpt(&body), "model response");

    if !status.is_success() {
        return Err(CaptionError::Status {
            status: status.as_u16(),
            body: excerpt(&body),
        });
    }
    Ok(body)
}

pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    struct Scripted(&'static str);

    #[async_trait]
    impl Captioner for Scripted {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn caption(&self, _image: &DynamicImage) -> Result<String, CaptionError> {
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl Captioner for Stalled {
        fn model_name(&self) -> &str {
            "stalled"
        }

        async fn caption(&self, _image: &DynamicImage) -> Result<String, CaptionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    fn tiny_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
    }

    #[tokio::test]
    async fn test_generate_caption_returns_trimmed_text() {
        let response = generate_caption(
            &Scripted("  no acute cardiopulmonary process \n"),
            &tiny_image(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(response.caption, "no acute cardiopulmonary process");
        assert_eq!(response.model, "scripted");
    }

    #[tokio::test]
    async fn test_generate_caption_rejects_blank_caption() {
        let err = generate_caption(&Scripted("   "), &tiny_image(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::EmptyCaption));
    }

    #[tokio::test]
    async fn test_generate_caption_times_out() {
        let err = generate_caption(&Stalled, &tiny_image(), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Timeout { .. }));
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg() {
        let bytes = encode_jpeg(&tiny_image()).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let body = "é".repeat(600);
        assert_eq!(excerpt(&body).chars().count(), 500);
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let mut config = Config::for_static_dir("static");
        config.provider = Provider::Gemini;
        config.model = None;
        config.gemini_api_key = None;
        assert!(matches!(
            from_config(&config),
            Err(CaptionError::NotConfigured { .. })
        ));

        config.gemini_api_key = Some("key".to_string());
        let captioner = from_config(&config).unwrap();
        assert_eq!(captioner.model_name(), "gemini-2.5-flash");
    }
}
