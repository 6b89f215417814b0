//! Hugging Face inference API backend for the image-to-text task.

use async_trait::async_trait;
use image::DynamicImage;
use serde::Deserialize;

use super::{encode_jpeg, success_body, Captioner};
use crate::error::CaptionError;

pub struct HuggingFaceCaptioner {
    client: reqwest::Client,
    url: String,
    model: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

impl HuggingFaceCaptioner {
    pub fn new(client: reqwest::Client, endpoint: &str, model: &str, token: Option<String>) -> Self {
        Self {
            client,
            url: format!("{}/models/{}", endpoint.trim_end_matches('/'), model),
            model: model.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The pipeline answers with a list of generations; the first one is the
/// caption.
pub fn extract_caption(body: &str) -> Result<String, CaptionError> {
    let generations: Vec<Generation> =
        serde_json::from_str(body).map_err(|e| CaptionError::MalformedResponse(e.to_string()))?;
    generations
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .ok_or_else(|| CaptionError::MalformedResponse("empty generation list".to_string()))
}

#[async_trait]
impl Captioner for HuggingFaceCaptioner {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError> {
        let jpeg = encode_jpeg(image)?;

        tracing::info!(model = %self.model, bytes = jpeg.len(), "📤 sending image to Hugging Face");

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(jpeg);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = success_body(request.send().await?).await?;
        extract_caption(&body)
    }
}
