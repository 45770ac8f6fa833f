mod common;

use common::{empty_feed_xml, feed_xml, StubFetcher, FEED_URL, IMAGE_URL};
use iotd_wallpaper::error::FetchFailure;
use iotd_wallpaper::feed::fetch_latest;
use iotd_wallpaper::retrieve;
use iotd_wallpaper::WallpaperError;

#[tokio::test]
async fn test_single_entry_feed_returns_item() {
    let fetcher = StubFetcher::new().with(FEED_URL, feed_xml("D", IMAGE_URL));

    let item = fetch_latest(&fetcher, FEED_URL, "image/jpeg").await.unwrap();

    assert_eq!(item.image_url, IMAGE_URL);
    assert_eq!(item.description, "D");
    assert_eq!(item.title.as_deref(), Some("Nebula"));
    assert_eq!(fetcher.requested(), vec![FEED_URL.to_string()]);
}

#[tokio::test]
async fn test_empty_feed_is_empty_feed_error() {
    let fetcher = StubFetcher::new().with(FEED_URL, empty_feed_xml());

    let err = fetch_latest(&fetcher, FEED_URL, "image/jpeg").await.unwrap_err();

    assert!(matches!(err, WallpaperError::EmptyFeed), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_feed_is_fetch_error() {
    let fetcher = StubFetcher::new();

    let err = fetch_latest(&fetcher, FEED_URL, "image/jpeg").await.unwrap_err();

    assert!(matches!(
        err,
        WallpaperError::Fetch { source: FetchFailure::Http(_), .. }
    ));
}

#[tokio::test]
async fn test_unparseable_feed_is_fetch_error() {
    let fetcher = StubFetcher::new().with(FEED_URL, "<html><body>maintenance</body></html>");

    let err = fetch_latest(&fetcher, FEED_URL, "image/jpeg").await.unwrap_err();

    assert!(matches!(
        err,
        WallpaperError::Fetch { source: FetchFailure::Parse(_), .. }
    ));
}

#[tokio::test]
async fn test_missing_image_download_is_download_error() {
    let fetcher = StubFetcher::new();

    let err = retrieve::download(&fetcher, IMAGE_URL).await.unwrap_err();

    match err {
        WallpaperError::Download { url, .. } => assert_eq!(url, IMAGE_URL),
        other => panic!("expected download error, got {:?}", other),
    }
}
