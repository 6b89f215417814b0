//! On-demand loading of the site's local files.
//!
//! Nothing here is cached: each page render reads exactly the files it
//! shows, so a page that is never visited never touches the disk.

use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// Reads local assets relative to the configured static directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    static_dir: PathBuf,
    stylesheet: PathBuf,
}

impl AssetStore {
    pub fn new(static_dir: impl Into<PathBuf>, stylesheet: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            stylesheet: stylesheet.into(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Reads a static image and returns it as a `data:` URI.
    pub async fn image_data_uri(&self, name: &str) -> Result<String, AssetError> {
        let path = self.static_dir.join(name);
        let bytes = read(&path).await?;
        Ok(data_uri(mime_for(&path), &bytes))
    }

    /// Like [`image_data_uri`](Self::image_data_uri) but logs and yields
    /// `None` when the file is missing, so a page still renders.
    pub async fn image_or_placeholder(&self, name: &str) -> Option<String> {
        match self.image_data_uri(name).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                tracing::warn!(asset = name, error = %e, "image unavailable");
                None
            }
        }
    }

    /// Stylesheet contents, or an empty string if it cannot be read.
    pub async fn stylesheet(&self) -> String {
        match tokio::fs::read_to_string(&self.stylesheet).await {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!(path = %self.stylesheet.display(), error = %e, "stylesheet unavailable");
                String::new()
            }
        }
    }

    /// Loads a CSV file from the static directory.
    pub async fn table(&self, name: &str) -> Result<DataTable, AssetError> {
        let path = self.static_dir.join(name);
        let bytes = read(&path).await?;
        DataTable::from_csv(&bytes).map_err(|source| AssetError::Csv { path, source })
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    tokio::fs::read(path).await.map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// MIME type from the file extension; JPEG when unknown.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

/// A header row plus string records, as read from a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn from_csv(bytes: &[u8]) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Projects the table onto the given column indices, in order.
    /// Short rows are padded with empty cells.
    pub fn select(&self, columns: &[usize]) -> Option<DataTable> {
        if columns.iter().any(|&c| c >= self.width()) {
            return None;
        }
        let pick = |row: &Vec<String>| {
            columns
                .iter()
                .map(|&c| row.get(c).cloned().unwrap_or_default())
                .collect::<Vec<_>>()
        };
        Some(DataTable {
            headers: pick(&self.headers),
            rows: self.rows.iter().map(pick).collect(),
        })
    }
}

/// Loads `name` and projects it, reporting a missing column as an error.
pub async fn load_columns(
    store: &AssetStore,
    name: &str,
    columns: &[usize],
) -> Result<DataTable, AssetError> {
    let table = store.table(name).await?;
    let width = table.width();
    table.select(columns).ok_or_else(|| AssetError::ColumnOutOfRange {
        path: store.static_dir().join(name),
        index: columns.iter().copied().max().unwrap_or_default(),
        width,
    })
}
