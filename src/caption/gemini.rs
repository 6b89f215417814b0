//! Google Gemini backend.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use serde_json::Value;

use super::{encode_jpeg, success_body, Captioner};
use crate::error::CaptionError;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const CAPTION_PROMPT: &str =
    "Describe this image in detail. Provide a clear, descriptive caption.";

pub struct GeminiCaptioner {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiCaptioner {
    pub fn new(client: reqwest::Client, api_key: String, model: &str) -> Self {
        Self {
            client,
            api_key,
            model: model.to_string(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

/// Request body carrying the prompt and the inline JPEG.
pub fn request_payload(image_base64: &str) -> Value {
    serde_json::json!({
        "contents": [{
            "parts": [
                { "text": CAPTION_PROMPT },
                {
                    "inline_data": {
                        "mime_type": "image/jpeg",
                        "data": image_base64
                    }
                }
            ]
        }]
    })
}

/// Pulls `candidates[0].content.parts[0].text` out of a response.
pub fn extract_caption(result: &Value) -> Result<String, CaptionError> {
    result["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CaptionError::MalformedResponse("no caption in Gemini response".to_string()))
}

#[async_trait]
impl Captioner for GeminiCaptioner {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError> {
        let base64_img = general_purpose::STANDARD.encode(encode_jpeg(image)?);

        tracing::info!(model = %self.model, "📤 sending image to Gemini");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_payload(&base64_img))
            .send()
            .await?;

        let body = success_body(response).await?;
        let result: Value = serde_json::from_str(&body)
            .map_err(|e| CaptionError::MalformedResponse(e.to_string()))?;
        extract_caption(&result)
    }
}
