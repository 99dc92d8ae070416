use serde::Deserialize;

use crate::error::ApiError;

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<i64>,
    pub description: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.ok {
            return Err(ApiError::Api {
                code: self.error_code,
                description: self
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        self.result.ok_or(ApiError::MissingResult)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StickerSet {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stickers: Vec<ApiSticker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSticker {
    pub file_id: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub is_animated: bool,
    #[serde(default)]
    pub is_video: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFile {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sticker_set_response() {
        let body = r#"{
            "ok": true,
            "result": {
                "name": "examplepack",
                "title": "Example Pack",
                "sticker_type": "regular",
                "stickers": [
                    {"file_id": "AAA", "file_unique_id": "a", "emoji": "👋",
                     "is_animated": false, "is_video": false, "width": 512, "height": 512},
                    {"file_id": "BBB", "file_unique_id": "b",
                     "is_animated": true, "is_video": false, "width": 512, "height": 512}
                ]
            }
        }"#;
        let set = serde_json::from_str::<ApiResponse<StickerSet>>(body)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(set.name, "examplepack");
        assert_eq!(set.title.as_deref(), Some("Example Pack"));
        assert_eq!(set.stickers.len(), 2);
        assert_eq!(set.stickers[0].emoji.as_deref(), Some("👋"));
        assert!(set.stickers[1].is_animated);
        assert_eq!(set.stickers[1].emoji, None);
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let body =
            r#"{"ok":false,"error_code":400,"description":"Bad Request: STICKERSET_INVALID"}"#;
        let err = serde_json::from_str::<ApiResponse<StickerSet>>(body)
            .unwrap()
            .into_result()
            .unwrap_err();
        match err {
            ApiError::Api { code, description } => {
                assert_eq!(code, Some(400));
                assert_eq!(description, "Bad Request: STICKERSET_INVALID");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ok_without_result_is_reported() {
        let body = r#"{"ok":true}"#;
        let err = serde_json::from_str::<ApiResponse<ApiFile>>(body)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingResult));
    }
}
