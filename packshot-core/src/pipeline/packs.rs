//! Pack phase: render every pack's levels into a composite banner.
//!
//! Banners are always fully regenerated: the output directory is cleared of
//! files up front and every pack writes unconditionally. Slice sources come
//! from the level phase's full-image cache, with a remote fallback per
//! level; a level with no obtainable image leaves its slice as background.

use std::fs;
use std::io;

use anyhow::Context as _;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::catalog::model::{PackJob, PackTier, pack_jobs, sort_levels_by_position};
use crate::foundation::config::Config;
use crate::foundation::error::{PackshotError, PackshotResult};
use crate::pipeline::scheduler::{BatchStats, TaskOutcome, run_bounded};
use crate::pipeline::variants::encode_webp;
use crate::remote::fetch::ResourceFetcher;
use crate::render::banner::{BannerOpts, compose_banner};

/// Run the pack phase over the merged tier list. Must run after the level
/// phase: it reads the full-image cache that phase populates.
pub fn process_packs(
    cfg: &Config,
    fetcher: &dyn ResourceFetcher,
    tiers: Vec<PackTier>,
    opts: &BannerOpts,
) -> PackshotResult<BatchStats> {
    clear_packs_dir(cfg)?;

    let jobs: Vec<_> = pack_jobs(tiers)
        .into_iter()
        .map(|job| move || process_pack(cfg, fetcher, job, opts))
        .collect();
    run_bounded(jobs, cfg.concurrency)
}

/// Delete existing banner files (not subdirectories), creating the
/// directory if it does not exist yet.
fn clear_packs_dir(cfg: &Config) -> PackshotResult<()> {
    let dir = cfg.packs_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("create directory '{}'", dir.display()))?;
        return Ok(());
    }
    for entry in
        fs::read_dir(&dir).with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("read directory '{}'", dir.display()))?
            .path();
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("remove stale banner '{}'", path.display()))?;
        }
    }
    Ok(())
}

fn process_pack(
    cfg: &Config,
    fetcher: &dyn ResourceFetcher,
    job: PackJob,
    opts: &BannerOpts,
) -> TaskOutcome {
    let PackJob { color, pack } = job;
    let mut levels = pack.levels;
    sort_levels_by_position(&mut levels);

    let sources: Vec<Option<RgbaImage>> = levels
        .iter()
        .map(|level| resolve_slice_source(cfg, fetcher, level.level_id, &pack.id))
        .collect();

    let banner = match compose_banner(&sources, color.as_deref(), opts) {
        Ok(banner) => banner,
        Err(err) => {
            warn!(pack = %pack.id, error = %err, "failed to compose banner");
            return TaskOutcome::Failed;
        }
    };

    match encode_webp(&banner, &cfg.pack_path(&pack.id)) {
        Ok(()) => {
            debug!(pack = %pack.id, slices = levels.len(), "wrote banner");
            TaskOutcome::Derived
        }
        Err(err) => {
            warn!(pack = %pack.id, error = %err, "failed to write banner");
            TaskOutcome::Failed
        }
    }
}

/// Resolve one slice's raster: cached full image first, remote source
/// second, `None` (background shows through) when both fail. Both paths
/// decode to the same RGBA8 form.
fn resolve_slice_source(
    cfg: &Config,
    fetcher: &dyn ResourceFetcher,
    level_id: u64,
    pack_id: &str,
) -> Option<RgbaImage> {
    let local = cfg.level_full_path(level_id);
    match fs::read(&local) {
        Ok(bytes) => match image::load_from_memory(&bytes) {
            Ok(image) => return Some(image.to_rgba8()),
            Err(err) => {
                warn!(level_id, pack = pack_id, error = %err, "cached full image failed to decode");
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            warn!(level_id, pack = pack_id, error = %err, "cached full image unreadable");
        }
    }

    let url = cfg.remote_thumbnail_url(level_id);
    let fetched = fetcher.fetch_bytes(&url).and_then(|bytes| {
        image::load_from_memory(&bytes)
            .map(|image| image.to_rgba8())
            .map_err(|e| PackshotError::decode(format!("remote slice for level {level_id}: {e}")))
    });
    match fetched {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(
                level_id,
                pack = pack_id,
                error = %err,
                "no slice source available, leaving background"
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/packs.rs"]
mod tests;
