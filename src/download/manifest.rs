use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::download::pipeline::{EmitOptions, OutputRecord, Pack};

pub const MANIFEST_NAME: &str = "pack_info.txt";

pub fn render(pack: &Pack, options: &EmitOptions, records: &[OutputRecord]) -> String {
    let static_format = options
        .static_format
        .map(|f| crate::convert::StickerFormat::from(f).to_string())
        .unwrap_or_else(|| "original".to_string());
    let animated = if options.convert_animated {
        "Lottie JSON"
    } else {
        "TGS"
    };

    let mut out = format!(
        "Pack Name: {}\n\
         Short Name: {}\n\
         Sticker Count: {}\n\
         Original URL: {}\n\
         Static stickers format: {}\n\
         Animated stickers saved as: {}\n\n",
        pack.title,
        pack.name,
        pack.stickers.len(),
        pack.source_url,
        static_format,
        animated
    );
    for record in records {
        out.push_str(&format!(
            "{:03}\t{}\t{}\n",
            record.sequence_index, record.emoji, record.format
        ));
    }
    out
}

pub fn write(
    pack_dir: &Path,
    pack: &Pack,
    options: &EmitOptions,
    records: &[OutputRecord],
) -> Result<()> {
    let path = pack_dir.join(MANIFEST_NAME);
    fs::write(&path, render(pack, options, records))
        .with_context(|| format!("Could not write manifest '{}'", path.display()))
}
