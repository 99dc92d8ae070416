use std::fmt;
use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use image::{DynamicImage, ImageFormat};

use crate::error::ConversionError;

/// Cap on the inflated size of a TGS file. Real stickers are a few hundred KiB.
const MAX_ANIMATION_BYTES: u64 = 32 * 1024 * 1024;

/// Raster formats static stickers can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StaticFormat {
    Webp,
    Png,
    Jpeg,
}

impl StaticFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            StaticFormat::Webp => ImageFormat::WebP,
            StaticFormat::Png => ImageFormat::Png,
            StaticFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl From<StaticFormat> for StickerFormat {
    fn from(format: StaticFormat) -> Self {
        match format {
            StaticFormat::Webp => StickerFormat::Webp,
            StaticFormat::Png => StickerFormat::Png,
            StaticFormat::Jpeg => StickerFormat::Jpeg,
        }
    }
}

/// Every format a sticker can end up as on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickerFormat {
    Webp,
    Png,
    Jpeg,
    Tgs,
    LottieJson,
    Webm,
}

impl StickerFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StickerFormat::Webp => "webp",
            StickerFormat::Png => "png",
            StickerFormat::Jpeg => "jpeg",
            StickerFormat::Tgs => "tgs",
            StickerFormat::LottieJson => "json",
            StickerFormat::Webm => "webm",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "webp" => Some(StickerFormat::Webp),
            "png" => Some(StickerFormat::Png),
            "jpg" | "jpeg" => Some(StickerFormat::Jpeg),
            "tgs" => Some(StickerFormat::Tgs),
            "json" => Some(StickerFormat::LottieJson),
            "webm" => Some(StickerFormat::Webm),
            _ => None,
        }
    }

    pub fn as_static(self) -> Option<StaticFormat> {
        match self {
            StickerFormat::Webp => Some(StaticFormat::Webp),
            StickerFormat::Png => Some(StaticFormat::Png),
            StickerFormat::Jpeg => Some(StaticFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for StickerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StickerFormat::Webp => "WEBP",
            StickerFormat::Png => "PNG",
            StickerFormat::Jpeg => "JPEG",
            StickerFormat::Tgs => "TGS",
            StickerFormat::LottieJson => "JSON",
            StickerFormat::Webm => "WEBM",
        };
        f.write_str(label)
    }
}

/// Transcodes sticker payloads. Malformed input is reported as a
/// [`ConversionError`], never a panic.
pub trait FormatConverter {
    fn convert_raster(&self, bytes: &[u8], target: StaticFormat)
    -> Result<Vec<u8>, ConversionError>;

    /// TGS (gzipped Lottie) to plain Lottie JSON.
    fn convert_animation(&self, bytes: &[u8]) -> Result<Vec<u8>, ConversionError>;
}

/// Converter backed by the `image` crate and `flate2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Transcoder;

impl FormatConverter for Transcoder {
    fn convert_raster(
        &self,
        bytes: &[u8],
        target: StaticFormat,
    ) -> Result<Vec<u8>, ConversionError> {
        let decoded = image::load_from_memory(bytes).map_err(ConversionError::Decode)?;
        // JPEG has no alpha channel.
        let decoded = match target {
            StaticFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
            _ => decoded,
        };
        let mut out = Cursor::new(Vec::new());
        decoded
            .write_to(&mut out, target.image_format())
            .map_err(ConversionError::Encode)?;
        Ok(out.into_inner())
    }

    fn convert_animation(&self, bytes: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let mut json = Vec::new();
        GzDecoder::new(bytes)
            .take(MAX_ANIMATION_BYTES + 1)
            .read_to_end(&mut json)?;
        if json.len() as u64 > MAX_ANIMATION_BYTES {
            return Err(ConversionError::TooLarge(MAX_ANIMATION_BYTES));
        }
        let lottie: serde_json::Value = serde_json::from_slice(&json)?;
        Ok(serde_json::to_vec_pretty(&lottie)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use image::{Rgba, RgbaImage};
    use std::io::Write;

    fn sample_webp() -> Vec<u8> {
        let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8 * 60, y as u8 * 60, 128, 200]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::WebP)
            .unwrap();
        out.into_inner()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn webp_to_png() {
        let png = Transcoder
            .convert_raster(&sample_webp(), StaticFormat::Png)
            .unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[test]
    fn webp_to_jpeg_drops_alpha() {
        let jpeg = Transcoder
            .convert_raster(&sample_webp(), StaticFormat::Jpeg)
            .unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Transcoder
            .convert_raster(b"definitely not an image", StaticFormat::Png)
            .unwrap_err();
        assert!(matches!(err, ConversionError::Decode(_)));
    }

    #[test]
    fn tgs_to_pretty_lottie_json() {
        let lottie = br#"{"v":"5.5.2","fr":60,"ip":0,"op":180,"w":512,"h":512,"layers":[]}"#;
        let json = Transcoder.convert_animation(&gzip(lottie)).unwrap();
        let text = String::from_utf8(json).unwrap();
        assert!(text.contains("\n  \"fr\": 60"), "{text}");
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let original: serde_json::Value = serde_json::from_slice(lottie).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn uncompressed_animation_is_rejected() {
        let err = Transcoder.convert_animation(b"{\"v\":1}").unwrap_err();
        assert!(matches!(err, ConversionError::Decompress(_)));
    }

    #[test]
    fn compressed_non_json_is_rejected() {
        let err = Transcoder
            .convert_animation(&gzip(b"not json at all"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidAnimation(_)));
    }

    #[test]
    fn extensions_map_back_to_formats() {
        assert_eq!(StickerFormat::from_extension("TGS"), Some(StickerFormat::Tgs));
        assert_eq!(StickerFormat::from_extension("jpg"), Some(StickerFormat::Jpeg));
        assert_eq!(StickerFormat::from_extension("gif"), None);
        assert_eq!(StickerFormat::LottieJson.extension(), "json");
        assert_eq!(StickerFormat::from(StaticFormat::Png).to_string(), "PNG");
    }
}
