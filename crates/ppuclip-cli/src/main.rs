//! Command line Chzzk VOD clip downloader.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use ppuclip_core::{ClipDownloader, DownloadOutcome, DownloadRequest, LogConfig};
use ppuclip_models::{format_hms, parse_hms};

/// Download a section of a Chzzk VOD as an mp4 clip.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Chzzk VOD URL, e.g. https://chzzk.naver.com/video/10646413?currentTime=2293
    url: String,

    #[clap(short, long, value_parser = start_parser)]
    /// start time as HH:MM:SS, MM:SS or plain seconds; cannot be combined
    /// with a URL that carries currentTime
    start: Option<u64>,

    #[clap(short, long, default_value = "60")]
    /// clip length in seconds
    duration: u64,

    #[clap(short, long)]
    /// output .mp4 file, or a directory to hold the default naming scheme
    output: Option<PathBuf>,

    #[clap(long, default_value = "logs")]
    /// directory for rolled debug log files
    log_dir: PathBuf,
}

fn start_parser(value: &str) -> Result<u64, String> {
    parse_hms(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_config = LogConfig {
        dir: args.log_dir.clone(),
        ..LogConfig::default()
    };
    let _log_guard = log_config.init().context("log setup failed")?;

    info!(
        url = %args.url,
        start = ?args.start,
        duration = args.duration,
        output = ?args.output,
        "cli invoked"
    );

    println!("ppuclip");
    println!("  url:      {}", args.url);
    if let Some(start) = args.start {
        println!("  start:    {}", format_hms(start));
    }
    println!("  duration: {}s", args.duration);
    println!();

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let downloader = ClipDownloader::from_env()?.with_cancel(cancel_rx);
    let request = DownloadRequest {
        url: args.url,
        start_override: args.start,
        duration_secs: args.duration,
        output_override: args.output,
    };

    match downloader.run(&request, render_percent).await {
        Ok(outcome) => {
            eprintln!();
            report(&outcome);
            Ok(())
        }
        Err(e) => {
            eprintln!();
            error!("download failed: {e}");
            Err(e.into())
        }
    }
}

/// Carriage-return progress line on stderr, away from the result output.
fn render_percent(percent: u8) {
    eprint!("\rdownloading... {percent:3}%");
    let _ = std::io::stderr().flush();
}

fn report(outcome: &DownloadOutcome) {
    match outcome {
        DownloadOutcome::Completed(artifact) => {
            println!("saved: {}", artifact.path.display());
        }
        DownloadOutcome::SkippedDuplicate(artifact) => {
            println!("already downloaded: {}", artifact.path.display());
            println!("delete the file to fetch this section again");
        }
    }
}
