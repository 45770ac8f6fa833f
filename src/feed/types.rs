use chrono::{DateTime, FixedOffset};

/// The most recent entry of the feed, reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub image_url: String,
    /// Plain text with markup removed. May be empty.
    pub description: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
}

