use std::path::PathBuf;

/// Errors raised while loading assets, persisting options or bringing up the GPU.
///
/// The simulation core itself never fails: rejected moves and out-of-bounds
/// mask lookups are ordinary outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid asset '{path}': {reason}")]
    InvalidAsset { path: PathBuf, reason: String },

    #[error("graphics initialisation failed: {0}")]
    Gpu(String),

    #[error("window system error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

/// Read and deserialize a JSON file, attaching the path to any failure.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

/// Decode an image file into RGBA8.
pub fn read_rgba(path: &std::path::Path) -> Result<image::RgbaImage> {
    Ok(image::open(path).map_err(|e| Error::image(path, e))?.to_rgba8())
}
