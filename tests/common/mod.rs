// Shared test doubles for the HTTP and desktop seams.
#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use iotd_wallpaper::config::Config;
use iotd_wallpaper::desktop::DesktopBackground;
use iotd_wallpaper::error::HttpError;
use iotd_wallpaper::http::Fetcher;
use iotd_wallpaper::WallpaperError;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const FEED_URL: &str = "https://feeds.test/iotd.rss";
pub const IMAGE_URL: &str = "https://images.test/2025/10/nebula.jpg";

/// Serves canned bodies by URL and records every request.
#[derive(Default)]
pub struct StubFetcher {
    bodies: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or(HttpError::Status(404))
    }
}

#[derive(Default)]
pub struct RecordingDesktop {
    pub calls: Mutex<Vec<PathBuf>>,
}

impl DesktopBackground for RecordingDesktop {
    fn set_background(&self, path: &Path) -> iotd_wallpaper::Result<()> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub struct FailingDesktop;

impl DesktopBackground for FailingDesktop {
    fn set_background(&self, _path: &Path) -> iotd_wallpaper::Result<()> {
        Err(WallpaperError::DesktopIntegration("no desktop session".to_string()))
    }
}

pub fn feed_xml(description: &str, image_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>Image of the Day</title>
    <item>
      <title>Nebula</title>
      <description>{}</description>
      <enclosure url="{}" length="1" type="image/jpeg" />
      <pubDate>Wed, 15 Oct 2025 10:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#,
        description, image_url
    )
}

pub fn empty_feed_xml() -> String {
    r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Nothing</title></channel></rss>"#
        .to_string()
}

/// A vertical gradient so resizing and overlays produce distinct pixels.
pub fn test_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let v = (y * 200 / height.max(1)) as u8;
        Rgba([40, v, 255 - v, 255])
    })
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Config pointing at the stub URLs and a temp output path, with a font path
/// that does not exist so the bitmap glyphs are used.
pub fn test_config(output: &Path, width: u32, height: u32) -> Config {
    let mut config = Config::default();
    config.feed.url = FEED_URL.to_string();
    config.display.width = width;
    config.display.height = height;
    config.overlay.font_path = PathBuf::from("/nonexistent/font.ttf");
    config.overlay.font_size = 8.0;
    config.overlay.matte = false;
    config.output.path = output.to_string_lossy().to_string();
    config.output.cache_dir = output
        .parent()
        .map(|p| p.join("cache"))
        .unwrap_or_else(|| PathBuf::from("cache"));
    config
}
