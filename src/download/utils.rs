use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::convert::StickerFormat;
use crate::error::SetupError;

/// Used in filenames when a sticker has no usable emoji.
pub const EMOJI_PLACEHOLDER: &str = "sticker";

const MAX_NAME_GRAPHEMES: usize = 50;
// Leaves room for the index prefix and extension under the usual 255 byte limit.
const MAX_NAME_BYTES: usize = 200;

/// Pull the pack short name out of a share link.
///
/// Accepts `https://t.me/addstickers/<name>` and `tg://addstickers?set=<name>`.
pub fn extract_short_name(raw: &str) -> Result<String, SetupError> {
    let invalid = || SetupError::InvalidUrl(raw.to_string());
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;

    if url.scheme() == "tg" {
        if url.host_str() != Some("addstickers") {
            return Err(invalid());
        }
        return url
            .query_pairs()
            .find(|(key, _)| key == "set")
            .map(|(_, value)| value.into_owned())
            .filter(|name| !name.is_empty())
            .ok_or_else(invalid);
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    match segments.iter().position(|s| *s == "addstickers") {
        Some(pos) if pos + 1 < segments.len() => Ok(segments[segments.len() - 1].to_string()),
        _ => Err(invalid()),
    }
}

/// Make `name` safe to use as a single path component on any platform.
///
/// Line breaks turn into spaces, reserved and control characters are
/// dropped, and the result is cut to 50 grapheme clusters without ever
/// splitting one.
pub fn sanitize_name(name: &str) -> String {
    let name = name.replace(['\r', '\n'], " ");
    let name = sanitize_filename::sanitize_with_options(
        name,
        sanitize_filename::Options {
            windows: true,
            truncate: false,
            replacement: "",
        },
    );

    let mut output = String::new();
    for g in name.trim().graphemes(true).take(MAX_NAME_GRAPHEMES) {
        if output.len() + g.len() > MAX_NAME_BYTES {
            break;
        }
        output.push_str(g);
    }
    output.trim().to_string()
}

pub fn emoji_label(emoji: Option<&str>) -> String {
    let label = emoji.map(sanitize_name).unwrap_or_default();
    if label.is_empty() {
        EMOJI_PLACEHOLDER.to_string()
    } else {
        label
    }
}

/// `001_👋.webp` style name; the index keeps files sorted in pack order.
pub fn sticker_filename(sequence_index: usize, emoji: &str, format: StickerFormat) -> String {
    format!("{:03}_{}.{}", sequence_index, emoji, format.extension())
}

/// Decide what a downloaded file is. The extension of the path the API
/// handed out wins; the sticker flags cover paths without a known one.
pub fn source_format(file_path: &str, is_animated: bool, is_video: bool) -> StickerFormat {
    let from_path = file_path
        .rsplit_once('/')
        .map_or(file_path, |(_, name)| name)
        .rsplit_once('.')
        .and_then(|(_, ext)| StickerFormat::from_extension(ext));
    match from_path {
        Some(format) => format,
        None if is_animated => StickerFormat::Tgs,
        None if is_video => StickerFormat::Webm,
        None => StickerFormat::Webp,
    }
}
