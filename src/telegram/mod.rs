mod client;
pub mod model;

pub use client::{BotApi, DEFAULT_API_URL};

use crate::error::ApiError;
use model::StickerSet;

/// The three remote calls the pipeline needs. Failures are reported once
/// and never retried here.
pub trait StickerSource {
    fn sticker_set(&self, name: &str) -> Result<StickerSet, ApiError>;
    fn file_path(&self, file_id: &str) -> Result<String, ApiError>;
    fn fetch_file(&self, file_path: &str) -> Result<Vec<u8>, ApiError>;
}
