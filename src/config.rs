use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::SetupError;

pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

// No Debug: the token must not end up in logs.
#[derive(Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Read `path` if it exists. A missing file is an empty config.
pub fn read_config(path: &Path) -> Result<Config, SetupError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(SetupError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };
    toml::from_str(&contents).map_err(|e| SetupError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// The flag (or environment variable, via clap) wins over the config file.
pub fn load_token(
    cli_token: Option<String>,
    config_path: &Path,
) -> Result<SecretString, SetupError> {
    let token = match cli_token.filter(|t| !t.trim().is_empty()) {
        Some(token) => token,
        None => read_config(config_path)?
            .bot_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(SetupError::MissingToken)?,
    };
    Ok(SecretString::new(token.trim().to_string()))
}
