use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::convert::{FormatConverter, StaticFormat, StickerFormat};
use crate::download::progress::ProgressTracker;
use crate::download::{manifest, utils};
use crate::error::{ApiError, SetupError};
use crate::telegram::StickerSource;

#[derive(Debug, Clone)]
pub struct Pack {
    pub name: String,
    pub title: String,
    pub source_url: String,
    pub stickers: Vec<Sticker>,
}

#[derive(Debug, Clone)]
pub struct Sticker {
    pub file_id: String,
    pub emoji: Option<String>,
    pub is_animated: bool,
    pub is_video: bool,
    /// 1-based position in the pack.
    pub sequence_index: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    /// Re-encode static stickers into this format when it differs from the source.
    pub static_format: Option<StaticFormat>,
    /// Save animated stickers as Lottie JSON instead of TGS.
    pub convert_animated: bool,
}

#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub file_path: PathBuf,
    pub format: StickerFormat,
    pub emoji: String,
    pub sequence_index: usize,
}

/// What happened to one sticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StickerOutcome {
    Written { converted: bool },
    /// Conversion failed and the original bytes were written instead.
    Fallback {
        format: StickerFormat,
        reason: String,
    },
    /// Nothing was written.
    Skipped { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub pack_dir: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub converted: usize,
    pub fallback: usize,
}

enum Conversion {
    Keep,
    Raster(StaticFormat),
    Animation,
}

impl Conversion {
    fn plan(source: StickerFormat, options: &EmitOptions) -> Self {
        if source == StickerFormat::Tgs {
            return if options.convert_animated {
                Conversion::Animation
            } else {
                Conversion::Keep
            };
        }
        match (source.as_static(), options.static_format) {
            (Some(from), Some(to)) if from != to => Conversion::Raster(to),
            _ => Conversion::Keep,
        }
    }
}

/// Single linear pass over a pack: resolve, download, convert, write.
pub struct Pipeline<S, C> {
    source: S,
    converter: C,
}

impl<S: StickerSource, C: FormatConverter> Pipeline<S, C> {
    pub fn new(source: S, converter: C) -> Self {
        Self { source, converter }
    }

    pub fn fetch_pack(&self, url: &str) -> Result<Pack, SetupError> {
        let name = utils::extract_short_name(url)?;
        debug!(%name, "fetching sticker set");
        let set = self
            .source
            .sticker_set(&name)
            .map_err(|e| pack_error(&name, e))?;

        let stickers = set
            .stickers
            .into_iter()
            .enumerate()
            .map(|(i, s)| Sticker {
                file_id: s.file_id,
                emoji: s.emoji,
                is_animated: s.is_animated,
                is_video: s.is_video,
                sequence_index: i + 1,
            })
            .collect::<Vec<_>>();
        let title = set
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| set.name.clone());
        info!(%title, count = stickers.len(), "found sticker pack");

        Ok(Pack {
            name: set.name,
            title,
            source_url: url.trim().to_string(),
            stickers,
        })
    }

    /// Download every sticker of `pack` into `<base_dir>/<sanitized title>`.
    ///
    /// A sticker that cannot be resolved or downloaded is skipped; a failed
    /// conversion falls back to the original bytes. Only filesystem errors
    /// abort the run.
    pub fn download_and_emit(
        &self,
        pack: &Pack,
        base_dir: &Path,
        options: &EmitOptions,
        progress: &dyn ProgressTracker,
    ) -> Result<Summary> {
        let pack_dir = base_dir.join(pack_dir_name(pack));
        fs::create_dir_all(&pack_dir)
            .with_context(|| format!("Could not create '{}'", pack_dir.display()))?;
        info!(dir = %pack_dir.display(), "saving stickers");

        let mut summary = Summary {
            pack_dir: pack_dir.clone(),
            ..Summary::default()
        };
        let mut records = Vec::with_capacity(pack.stickers.len());
        progress.start(pack.stickers.len() as u64, &pack.title);

        for sticker in &pack.stickers {
            let outcome = match self.fetch_sticker(sticker) {
                Ok((file_path, bytes)) => {
                    let (record, outcome) =
                        self.emit_sticker(sticker, &file_path, bytes, &pack_dir, options)?;
                    summary.written += 1;
                    match &outcome {
                        StickerOutcome::Written { converted: true } => summary.converted += 1,
                        StickerOutcome::Fallback { .. } => summary.fallback += 1,
                        _ => {}
                    }
                    records.push(record);
                    outcome
                }
                Err(e) => {
                    warn!(index = sticker.sequence_index, error = %e, "skipping sticker");
                    summary.skipped += 1;
                    StickerOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };
            progress.advance(sticker.sequence_index, &outcome);
        }

        manifest::write(&pack_dir, pack, options, &records)?;
        progress.finish(&summary);
        Ok(summary)
    }

    fn fetch_sticker(&self, sticker: &Sticker) -> Result<(String, Vec<u8>), ApiError> {
        let file_path = self.source.file_path(&sticker.file_id)?;
        let bytes = self.source.fetch_file(&file_path)?;
        Ok((file_path, bytes))
    }

    fn emit_sticker(
        &self,
        sticker: &Sticker,
        file_path: &str,
        bytes: Vec<u8>,
        pack_dir: &Path,
        options: &EmitOptions,
    ) -> Result<(OutputRecord, StickerOutcome)> {
        let source = utils::source_format(file_path, sticker.is_animated, sticker.is_video);
        let converted = match Conversion::plan(source, options) {
            Conversion::Keep => None,
            Conversion::Raster(target) => Some((
                self.converter.convert_raster(&bytes, target),
                StickerFormat::from(target),
            )),
            Conversion::Animation => Some((
                self.converter.convert_animation(&bytes),
                StickerFormat::LottieJson,
            )),
        };

        let (data, format, outcome) = match converted {
            None => (bytes, source, StickerOutcome::Written { converted: false }),
            Some((Ok(data), target)) => (data, target, StickerOutcome::Written { converted: true }),
            Some((Err(e), target)) => {
                warn!(
                    index = sticker.sequence_index,
                    %target,
                    error = %e,
                    "conversion failed, keeping original"
                );
                (
                    bytes,
                    source,
                    StickerOutcome::Fallback {
                        format: source,
                        reason: e.to_string(),
                    },
                )
            }
        };

        let emoji = utils::emoji_label(sticker.emoji.as_deref());
        let path = pack_dir.join(utils::sticker_filename(
            sticker.sequence_index,
            &emoji,
            format,
        ));
        fs::write(&path, &data)
            .with_context(|| format!("Could not write '{}'", path.display()))?;

        let record = OutputRecord {
            file_path: path,
            format,
            emoji,
            sequence_index: sticker.sequence_index,
        };
        debug!(path = %record.file_path.display(), %format, "wrote sticker");
        Ok((record, outcome))
    }
}

fn pack_dir_name(pack: &Pack) -> String {
    let title = utils::sanitize_name(&pack.title);
    if title.is_empty() {
        utils::sanitize_name(&pack.name)
    } else {
        title
    }
}

fn pack_error(name: &str, err: ApiError) -> SetupError {
    match err {
        ApiError::Api {
            code: Some(401 | 404),
            description,
        } => SetupError::Unauthorized(description),
        ApiError::Api { description, .. } => SetupError::PackNotFound {
            name: name.to_string(),
            reason: description,
        },
        e @ (ApiError::Network(_) | ApiError::Status(_) | ApiError::MissingResult) => {
            SetupError::NetworkError(e)
        }
    }
}
