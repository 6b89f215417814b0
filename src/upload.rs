//! Uploaded image validation.
//!
//! Checks run cheapest first: file extension, then size while streaming,
//! then decoding. A rejected file never reaches the captioning model.

use axum::extract::multipart::{Field, Multipart};
use axum::http::StatusCode;
use image::{DynamicImage, ImageFormat};

use crate::error::UploadError;

/// Extensions accepted by the upload form.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Multipart field the upload form posts.
pub const IMAGE_FIELD: &str = "image";

/// A validated upload, decoded to RGB.
#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub image: DynamicImage,
}

/// Accepts `photo.PNG` style names, rejects anything without a supported
/// extension.
pub fn check_extension(file_name: &str) -> Result<(), UploadError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType { extension })
    }
}

/// Decodes PNG or JPEG bytes into an RGB image. Other formats are rejected
/// even if the file name claimed otherwise.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, UploadError> {
    let format = image::guess_format(bytes).map_err(UploadError::Decode)?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg => {}
        other => {
            return Err(UploadError::UnsupportedType {
                extension: format!("{:?}", other).to_ascii_lowercase(),
            })
        }
    }
    let image = image::load_from_memory_with_format(bytes, format).map_err(UploadError::Decode)?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Pulls the image field out of a multipart body and validates it.
///
/// The field named `image` is used wherever it appears in the form. Only
/// when there is none does the first other field carrying a file name
/// stand in for it.
pub async fn read_upload(
    multipart: &mut Multipart,
    limit: usize,
) -> Result<UploadedImage, UploadError> {
    let mut fallback: Option<Result<(String, Vec<u8>), UploadError>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        let is_image_field = field.name() == Some(IMAGE_FIELD);
        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            None if is_image_field => String::new(),
            None => continue,
        };

        if is_image_field {
            let bytes = read_field(field, &file_name, limit).await?;
            return finish(file_name, &bytes);
        }
        if fallback.is_none() {
            fallback = Some(
                read_field(field, &file_name, limit)
                    .await
                    .map(|bytes| (file_name, bytes)),
            );
        }
    }

    match fallback {
        Some(read) => {
            let (file_name, bytes) = read?;
            finish(file_name, &bytes)
        }
        None => Err(UploadError::MissingFile),
    }
}

/// Checks the extension, then buffers the field up to `limit` bytes.
async fn read_field(
    mut field: Field<'_>,
    file_name: &str,
    limit: usize,
) -> Result<Vec<u8>, UploadError> {
    check_extension(file_name)?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        if bytes.len() + chunk.len() > limit {
            return Err(UploadError::TooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn finish(file_name: String, bytes: &[u8]) -> Result<UploadedImage, UploadError> {
    tracing::debug!(file_name = %file_name, size = bytes.len(), "received upload");
    let image = decode(bytes)?;
    Ok(UploadedImage { file_name, image })
}

fn multipart_error(e: axum::extract::multipart::MultipartError, limit: usize) -> UploadError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { limit }
    } else {
        UploadError::Multipart(e.body_text())
    }
}
