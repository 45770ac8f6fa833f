pub mod rss;
pub mod types;

use crate::error::{FetchFailure, Result, WallpaperError};
use crate::http::Fetcher;
use rss::ParseError;
use types::FeedItem;

/// Fetch the feed and return its most recent item. Exactly one GET.
pub async fn fetch_latest(fetcher: &dyn Fetcher, url: &str, image_mime: &str) -> Result<FeedItem> {
    tracing::info!(url, "fetching feed");

    let body = fetcher.get(url).await.map_err(|e| WallpaperError::Fetch {
        url: url.to_string(),
        source: FetchFailure::Http(e),
    })?;

    let item = rss::parse_latest(&body, image_mime).map_err(|e| match e {
        ParseError::Empty => WallpaperError::EmptyFeed,
        ParseError::MissingImage => WallpaperError::MissingImage,
        ParseError::Malformed(msg) => WallpaperError::Fetch {
            url: url.to_string(),
            source: FetchFailure::Parse(msg),
        },
    })?;

    match item.published {
        Some(published) => tracing::info!(%published, image = %item.image_url, "latest entry"),
        None => tracing::info!(image = %item.image_url, "latest entry (publish date unknown)"),
    }

    Ok(item)
}
