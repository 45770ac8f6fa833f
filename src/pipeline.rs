use crate::compose::{self, OverlayStyle, Resolution, TextRenderer};
use crate::config::Config;
use crate::desktop::{self, DesktopBackground};
use crate::error::Result;
use crate::feed::{self, types::FeedItem};
use crate::http::Fetcher;
use crate::retrieve;
use std::path::PathBuf;

/// Per-run switches, usually from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Read the image from this file instead of downloading it.
    pub input: Option<PathBuf>,
    /// Overrides `output.path`.
    pub output: Option<PathBuf>,
    /// Keep a copy of the unmodified image in `output.cache_dir`.
    pub cache_original: bool,
    /// Write the file but leave the desktop alone.
    pub skip_background: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub item: FeedItem,
    pub original: (u32, u32),
    pub written: (u32, u32),
    pub output_path: PathBuf,
    pub cached_path: Option<PathBuf>,
    pub background_set: bool,
}

/// Run every stage once, in order. The first failure ends the run.
pub async fn run(
    config: &Config,
    options: &RunOptions,
    fetcher: &dyn Fetcher,
    background: &dyn DesktopBackground,
) -> Result<RunReport> {
    // 1. Feed
    let item = feed::fetch_latest(fetcher, &config.feed.url, &config.feed.image_mime).await?;

    // 2. Image bytes
    let raw = match &options.input {
        Some(path) => retrieve::read_local(path).await?,
        None => retrieve::download(fetcher, &item.image_url).await?,
    };

    let cached_path = if options.cache_original {
        Some(retrieve::cache_original(&raw, &item.image_url, &config.output.cache_dir).await?)
    } else {
        None
    };

    // 3. Compose
    let target = Resolution::from(config.display);
    let renderer = TextRenderer::load(&config.overlay.font_path, config.overlay.font_size);
    let style = OverlayStyle::from(&config.overlay);
    let composed = compose::compose(&raw.bytes, target, &item.description, &renderer, &style)?;
    drop(raw);

    let original = composed.original;
    let bitmap = if config.overlay.matte {
        compose::add_matte(&composed.bitmap, target)
    } else {
        composed.bitmap
    };

    // 4. Write and hand to the desktop
    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| config.output.resolved_path());
    desktop::write_png(&bitmap, &output_path).await?;

    let background_set = config.output.set_background && !options.skip_background;
    if background_set {
        background.set_background(&output_path)?;
    } else {
        tracing::info!("desktop background left unchanged");
    }

    Ok(RunReport {
        item,
        original,
        written: bitmap.dimensions(),
        output_path,
        cached_path,
        background_set,
    })
}
