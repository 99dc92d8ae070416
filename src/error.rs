use std::path::PathBuf;

/// Failures that stop the run before any sticker is written.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(
        "no bot token found; pass --token, set TELEGRAM_BOT_TOKEN \
         or add `bot_token` to the config file"
    )]
    MissingToken,
    #[error("could not read config file '{}': {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
    #[error("invalid sticker pack URL '{0}', expected https://t.me/addstickers/<PackName>")]
    InvalidUrl(String),
    #[error("sticker pack '{name}' not found: {reason}")]
    PackNotFound { name: String, reason: String },
    #[error("the Bot API rejected the token: {0}")]
    Unauthorized(String),
    #[error("could not reach the Bot API")]
    NetworkError(#[source] ApiError),
}

/// What the Bot API client reports when a call does not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error(
        "Bot API error {}: {description}",
        .code.map_or_else(|| "?".to_string(), |c| c.to_string())
    )]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("Bot API reported success without a result")]
    MissingResult,
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("could not decompress animation: {0}")]
    Decompress(#[from] std::io::Error),
    #[error("animation is not valid JSON: {0}")]
    InvalidAnimation(#[from] serde_json::Error),
    #[error("decompressed animation exceeds {0} bytes")]
    TooLarge(u64),
}
