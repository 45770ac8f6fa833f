pub mod compose;
pub mod config;
pub mod desktop;
pub mod error;
pub mod feed;
pub mod http;
pub mod pipeline;
pub mod retrieve;

pub use error::{Result, WallpaperError};
