use crate::config;
use crate::convert::{StaticFormat, Transcoder};
use crate::download::progress::{NoProgress, ProgressTracker, StickerProgressBar};
use crate::download::{EmitOptions, Pipeline, Summary, utils};
use crate::telegram::{self, BotApi};
use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Exit status after Ctrl-C, as a shell would report it.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Download every sticker of a Telegram sticker pack into a folder.
#[derive(Parser)]
#[command(version, about, long_about=None)]
pub struct Cli {
    /// Sticker pack link, e.g. https://t.me/addstickers/PackName
    url: String,

    /// Save static stickers in this format (WEBP, PNG or JPEG). Keeps the original by default
    #[arg(long, value_enum, ignore_case = true)]
    static_format: Option<StaticFormat>,

    /// Convert animated TGS stickers to Lottie JSON
    #[arg(long)]
    convert_tgs: bool,

    /// Base directory; the pack gets its own folder inside it
    #[arg(short, long, default_value = "downloads")]
    output_dir: PathBuf,

    /// Bot API token
    #[arg(long, env = config::TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// TOML file holding `bot_token`, used when no token is given otherwise
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Bot API server
    #[arg(long, default_value = telegram::DEFAULT_API_URL)]
    api_url: Url,

    /// Timeout in seconds for each HTTP request
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug). RUST_LOG overrides this
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        // Reject a bad link before looking for a token or touching the disk.
        utils::extract_short_name(&self.url)?;
        let token = config::load_token(self.token, &self.config)?;
        let api = BotApi::new(self.api_url, token, Duration::from_secs(self.timeout))
            .context("Could not set up the HTTP client")?;
        let pipeline = Pipeline::new(api, Transcoder);

        let pack = pipeline.fetch_pack(&self.url)?;
        println!(
            "Found {} stickers in pack: {}",
            pack.stickers.len(),
            pack.title.bold()
        );

        let progress: Arc<dyn ProgressTracker> = if self.quiet {
            Arc::new(NoProgress)
        } else {
            Arc::new(StickerProgressBar::new())
        };
        let on_interrupt = progress.clone();
        ctrlc::set_handler(move || {
            on_interrupt.abandon("Interrupted");
            eprintln!(
                "{}",
                "Download cancelled, the pack folder may be incomplete.".yellow()
            );
            std::process::exit(INTERRUPTED_EXIT_CODE);
        })
        .context("Could not set keyboard interrupt handler.")?;

        let options = EmitOptions {
            static_format: self.static_format,
            convert_animated: self.convert_tgs,
        };
        let summary =
            pipeline.download_and_emit(&pack, &self.output_dir, &options, progress.as_ref())?;
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "{} Stickers saved in: {}",
        "Download complete!".green(),
        summary.pack_dir.display()
    );
    println!(
        "Written: {}, converted: {}, kept original after failed conversion: {}, skipped: {}",
        summary.written, summary.converted, summary.fallback, summary.skipped
    );
    if summary.skipped > 0 {
        eprintln!(
            "{}",
            format!("{} sticker(s) could not be downloaded.", summary.skipped).red()
        );
    }
}
