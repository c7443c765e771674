use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;

use packshot::{BannerOpts, Config, HttpFetcher, Level, PackTier};

#[derive(Parser, Debug)]
#[command(
    name = "packshot",
    version,
    about = "Regenerate level thumbnails and pack banners"
)]
struct Cli {
    /// Output root directory (levels/, og/ and packs/ are created beneath it).
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Override the level metadata endpoints (repeatable).
    #[arg(long = "levels-api")]
    levels_api: Vec<String>,

    /// Override the pack-tier metadata endpoints (repeatable).
    #[arg(long = "packs-api")]
    packs_api: Vec<String>,

    /// Override the remote thumbnail base URL.
    #[arg(long)]
    thumbnail_base: Option<String>,

    /// Maximum number of in-flight tasks per phase.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Skip the level phase (reuse the existing cache as-is).
    #[arg(long, default_value_t = false)]
    skip_levels: bool,

    /// Skip the pack phase.
    #[arg(long, default_value_t = false)]
    skip_packs: bool,

    /// Log per-item detail instead of just progress.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let max_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    let mut cfg = Config::new(&cli.out);
    if !cli.levels_api.is_empty() {
        cfg.level_endpoints = cli.levels_api.clone();
    }
    if !cli.packs_api.is_empty() {
        cfg.pack_endpoints = cli.packs_api.clone();
    }
    if let Some(base) = cli.thumbnail_base {
        cfg.thumbnail_base_url = base;
    }
    cfg.concurrency = cli.concurrency;

    let fetcher = HttpFetcher::new();

    // The pack phase reads the cache the level phase populates, so the
    // ordering here is load-bearing.
    if !cli.skip_levels {
        info!("fetching levels...");
        let levels: Vec<Level> =
            packshot::fetch_merged(&fetcher, &cfg.level_endpoints).context("fetch level metadata")?;
        let stats = packshot::process_levels(&cfg, &fetcher, &levels)?;
        info!(
            total = stats.total,
            derived = stats.derived,
            skipped = stats.skipped,
            missing = stats.missing,
            failed = stats.failed,
            "level phase complete"
        );
    }

    if !cli.skip_packs {
        info!("fetching packs...");
        let tiers: Vec<PackTier> =
            packshot::fetch_merged(&fetcher, &cfg.pack_endpoints).context("fetch pack metadata")?;
        let stats = packshot::process_packs(&cfg, &fetcher, tiers, &BannerOpts::default())?;
        info!(
            total = stats.total,
            derived = stats.derived,
            failed = stats.failed,
            "pack phase complete"
        );
    }

    info!("all thumbnails updated");
    Ok(())
}
