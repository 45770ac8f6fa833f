use crate::error::{Result, WallpaperError};
use crate::http::Fetcher;
use std::path::{Path, PathBuf};

const FALLBACK_FILE_NAME: &str = "image.jpg";

/// Undecoded image bytes as served.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub bytes: Vec<u8>,
}

pub async fn download(fetcher: &dyn Fetcher, image_url: &str) -> Result<RawImage> {
    tracing::info!(url = image_url, "downloading image");
    let bytes = fetcher
        .get(image_url)
        .await
        .map_err(|source| WallpaperError::Download {
            url: image_url.to_string(),
            source,
        })?;
    tracing::debug!(bytes = bytes.len(), "image downloaded");
    Ok(RawImage { bytes })
}

/// Use an image already on disk instead of downloading one.
pub async fn read_local(path: &Path) -> Result<RawImage> {
    tracing::info!(path = %path.display(), "reading local image");
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| WallpaperError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(RawImage { bytes })
}

/// Save the unmodified bytes to `dir/<file name from url>`.
pub async fn cache_original(raw: &RawImage, image_url: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(file_name_from_url(image_url));
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| WallpaperError::write(dir, e))?;
    tokio::fs::write(&path, &raw.bytes)
        .await
        .map_err(|e| WallpaperError::write(&path, e))?;
    tracing::info!(path = %path.display(), "cached original image");
    Ok(path)
}

/// Last path segment of a URL with any query or fragment removed.
pub fn file_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let name = without_query.rsplit('/').next().unwrap_or("");

    // Reject anything that could escape the cache directory.
    if name.is_empty() || name == ".." || name == "." || name.contains(':') || name.contains('\\') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}
