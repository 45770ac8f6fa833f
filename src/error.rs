use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failure from a [`crate::http::Fetcher`].
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),
}

/// Why the feed could not be turned into a document.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("malformed feed: {0}")]
    Parse(String),
}

/// One variant per pipeline stage failure.
#[derive(Debug, Error)]
pub enum WallpaperError {
    #[error("failed to fetch feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchFailure,
    },

    #[error("feed contains no entries")]
    EmptyFeed,

    #[error("latest feed entry has no image reference")]
    MissingImage,

    #[error("failed to download image {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: HttpError,
    },

    #[error("failed to read input image {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("failed to set desktop background: {0}")]
    DesktopIntegration(String),
}

impl WallpaperError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, WallpaperError>;
