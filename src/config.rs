//! Server configuration.
//!
//! Every setting is a CLI flag with an environment fallback; `main` loads
//! `.env` through dotenvy before parsing so the same keys work from a file.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_HF_ENDPOINT: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HF_MODEL: &str = "nathansutton/generate-cxr";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Which external service produces captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Hugging Face inference API, image-to-text task.
    Huggingface,
    /// Google Gemini generateContent.
    Gemini,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "image-captioning-showcase", version, about = "Image captioning demo site")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "CAPTION_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Captioning backend.
    #[arg(long, env = "CAPTION_PROVIDER", value_enum, default_value = "huggingface")]
    pub provider: Provider,

    /// Model id; defaults depend on the provider.
    #[arg(long, env = "CAPTION_MODEL")]
    pub model: Option<String>,

    /// Hugging Face access token. Public models work without one.
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    #[arg(long, env = "HF_INFERENCE_ENDPOINT", default_value = DEFAULT_HF_ENDPOINT)]
    pub hf_endpoint: String,

    /// Required when the provider is gemini.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Directory holding page images and CSV files.
    #[arg(long, env = "CAPTION_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Stylesheet inlined into every page.
    #[arg(long, env = "CAPTION_STYLESHEET", default_value = "static/styles.css")]
    pub stylesheet: PathBuf,

    #[arg(long, env = "CAPTION_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Upper bound on a single model call.
    #[arg(long, env = "CAPTION_MODEL_TIMEOUT_SECS", default_value_t = 60)]
    pub model_timeout_secs: u64,

    /// Rows shown per dataframe on the X-ray page.
    #[arg(long, env = "CAPTION_MAX_TABLE_ROWS", default_value_t = 200)]
    pub max_table_rows: usize,
}

impl Config {
    /// Model id with the provider default applied.
    pub fn model_id(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model.as_str(),
            (None, Provider::Huggingface) => DEFAULT_HF_MODEL,
            (None, Provider::Gemini) => DEFAULT_GEMINI_MODEL,
        }
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Defaults with local paths rooted at `dir`. Ignores the environment.
    pub fn for_static_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            stylesheet: dir.join("styles.css"),
            static_dir: dir,
            ..Self::default()
        }
    }
}

/// Same values as the flag defaults, without reading the environment.
impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            provider: Provider::Huggingface,
            model: None,
            hf_token: None,
            hf_endpoint: DEFAULT_HF_ENDPOINT.to_string(),
            gemini_api_key: None,
            static_dir: PathBuf::from("static"),
            stylesheet: PathBuf::from("static/styles.css"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            model_timeout_secs: 60,
            max_table_rows: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::parse_from([
            "image-captioning-showcase",
            "--provider",
            "gemini",
            "--bind",
            "127.0.0.1:8080",
            "--max-upload-bytes",
            "1024",
        ]);
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.model_id(), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_explicit_model_wins() {
        let config = Config::parse_from([
            "image-captioning-showcase",
            "--provider",
            "huggingface",
            "--model",
            "Salesforce/blip-image-captioning-base",
        ]);
        assert_eq!(config.model_id(), "Salesforce/blip-image-captioning-base");
    }

    #[test]
    fn test_for_static_dir_roots_paths() {
        let config = Config::for_static_dir("/srv/site");
        assert_eq!(config.static_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.stylesheet, PathBuf::from("/srv/site/styles.css"));
        assert_eq!(config.model_timeout(), Duration::from_secs(60));
        assert_eq!(config.provider, Provider::Huggingface);
        assert_eq!(config.model_id(), DEFAULT_HF_MODEL);
    }

    #[test]
    fn test_default_matches_flag_defaults() {
        let parsed = Config::try_parse_from([
            "image-captioning-showcase",
            "--bind",
            "0.0.0.0:3000",
            "--provider",
            "huggingface",
            "--hf-endpoint",
            DEFAULT_HF_ENDPOINT,
            "--static-dir",
            "static",
            "--stylesheet",
            "static/styles.css",
            "--max-upload-bytes",
            "10485760",
            "--model-timeout-secs",
            "60",
            "--max-table-rows",
            "200",
        ])
        .unwrap();
        let default = Config::default();

        assert_eq!(parsed.bind, default.bind);
        assert_eq!(parsed.provider, default.provider);
        assert_eq!(parsed.hf_endpoint, default.hf_endpoint);
        assert_eq!(parsed.static_dir, default.static_dir);
        assert_eq!(parsed.stylesheet, default.stylesheet);
        assert_eq!(parsed.max_upload_bytes, default.max_upload_bytes);
        assert_eq!(parsed.model_timeout_secs, default.model_timeout_secs);
        assert_eq!(parsed.max_table_rows, default.max_table_rows);
    }
}
