//! Image captioning showcase site.
//!
//! Serves a home page and three use-case pages (X-ray, travel guide, CCTV).
//! The X-ray page accepts an image upload and forwards it to an external
//! pretrained captioning model.

pub mod assets;
pub mod caption;
pub mod config;
pub mod error;
pub mod pages;
pub mod server;
pub mod upload;

pub use caption::{generate_caption, CaptionResponse, Captioner};
pub use config::{Config, Provider};
pub use error::{AppError, AssetError, CaptionError, UploadError};
pub use server::{create_app, serve, AppState};
