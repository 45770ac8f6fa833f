use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_FEED_URL: &str = "https://www.nasa.gov/rss/dyn/lg_image_of_the_day.rss";
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub display: DisplayConfig,
    pub overlay: OverlayConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    /// Enclosure MIME type preferred when an item lists several.
    pub image_mime: String,
    pub user_agent: String,
    /// Unset means the HTTP client's own default.
    pub request_timeout_ms: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            image_mime: "image/jpeg".to_string(),
            user_agent: concat!("iotd-wallpaper/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 2560,
            height: 1600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverlayConfig {
    pub font_path: PathBuf,
    pub font_size: f32,
    /// Gap in pixels between the text block and the left edge.
    pub margin: u32,
    pub text_color: [u8; 3],
    pub background: [u8; 3],
    /// Centre the composed image on a black canvas of the full display size.
    pub matte: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from("/usr/share/fonts/TTF/LiberationSerif-Regular.ttf"),
            font_size: 18.0,
            margin: 5,
            text_color: [0, 255, 0],
            background: [0, 0, 0],
            matte: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub cache_dir: PathBuf,
    pub set_background: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "~/nasa_iotd.png".to_string(),
            cache_dir: PathBuf::from("/tmp"),
            set_background: true,
        }
    }
}

impl OutputConfig {
    /// Output path with a leading `~` replaced by `$HOME` and `{date}`
    /// replaced by today's local date.
    pub fn resolved_path(&self) -> PathBuf {
        self.resolved_path_on(Local::now().date_naive())
    }

    /// GNOME keeps showing the old picture when the background URI does not
    /// change, so a `{date}` in the path gives each day's image its own file.
    pub fn resolved_path_on(&self, date: NaiveDate) -> PathBuf {
        let dated = self
            .path
            .replace("{date}", &date.format("%Y-%m-%d").to_string());
        expand_home(&dated)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or `config.toml` in the working directory
    /// if present, or fall back to built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    tracing::debug!("no config.toml found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.display.width == 0 || self.display.height == 0 {
            anyhow::bail!(
                "display resolution must be non-zero (got {}x{})",
                self.display.width,
                self.display.height
            );
        }
        if self.overlay.font_size.is_nan() || self.overlay.font_size <= 0.0 {
            anyhow::bail!("overlay.font_size must be positive");
        }
        if self.feed.url.trim().is_empty() {
            anyhow::bail!("feed.url cannot be empty");
        }
        Ok(())
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(format!("{}{}", home, rest))
        }
        None => PathBuf::from(path),
    }
}
