use crate::error::{Result, WallpaperError};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Hands a written image file to the desktop environment.
pub trait DesktopBackground {
    fn set_background(&self, path: &Path) -> Result<()>;
}

/// Uses the platform mechanism picked by the `wallpaper` crate
/// (gsettings, KDE, XFCE, macOS, Windows, ...).
pub struct SystemDesktop;

impl DesktopBackground for SystemDesktop {
    fn set_background(&self, path: &Path) -> Result<()> {
        let path_str = path.to_str().ok_or_else(|| {
            WallpaperError::DesktopIntegration(format!(
                "path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        tracing::info!(path = path_str, "setting desktop background");
        wallpaper::set_from_path(path_str)
            .map_err(|e| WallpaperError::DesktopIntegration(e.to_string()))
    }
}

/// Encode as PNG and write atomically, creating parent directories.
pub async fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let mut encoded = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(|e| WallpaperError::Encode(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| WallpaperError::write(parent, e))?;
    }

    // Unique temp name next to the target so the rename stays on one filesystem.
    let temp_suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let tmp_path = path.with_extension(format!("tmp.{}", temp_suffix));

    tokio::fs::write(&tmp_path, &encoded)
        .await
        .map_err(|e| WallpaperError::write(&tmp_path, e))?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(WallpaperError::write(path, e));
    }

    tracing::info!(path = %path.display(), bytes = encoded.len(), "wrote image");
    Ok(())
}
