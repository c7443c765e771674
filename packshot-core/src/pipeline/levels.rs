//! Level phase: resolve each level's source image and derive its missing
//! output variants.
//!
//! Per-level fallback chain: if all four outputs exist the level is skipped
//! outright; otherwise the canonical full-size cache file is tried, and
//! only then the remote thumbnail source. A remote 404 is the expected
//! "no thumbnail exists" case and quietly skips the level; every other
//! per-item failure is a warning, never fatal to the batch.

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::catalog::model::Level;
use crate::foundation::config::Config;
use crate::foundation::error::{PackshotError, PackshotResult};
use crate::pipeline::scheduler::{BatchStats, TaskOutcome, run_bounded};
use crate::pipeline::variants::{self, VariantPaths, encode_webp};
use crate::remote::fetch::ResourceFetcher;

/// Run the level phase over the merged level list. Returns once every level
/// has settled.
pub fn process_levels(
    cfg: &Config,
    fetcher: &dyn ResourceFetcher,
    levels: &[Level],
) -> PackshotResult<BatchStats> {
    cfg.ensure_level_dirs()?;

    let jobs: Vec<_> = levels
        .iter()
        .map(|level| {
            let level_id = level.level_id;
            move || process_level(cfg, fetcher, level_id)
        })
        .collect();
    run_bounded(jobs, cfg.concurrency)
}

fn process_level(cfg: &Config, fetcher: &dyn ResourceFetcher, level_id: u64) -> TaskOutcome {
    let paths = VariantPaths::for_level(cfg, level_id);
    if paths.all_exist() {
        debug!(level_id, "all variants present, skipping");
        return TaskOutcome::Skipped;
    }

    let source = match resolve_source(cfg, fetcher, level_id, &paths) {
        Ok(Some(image)) => image,
        Ok(None) => return TaskOutcome::Missing,
        Err(err) => {
            warn!(level_id, error = %err, "failed to resolve source image");
            return TaskOutcome::Failed;
        }
    };

    match variants::derive_missing(&source, &paths) {
        Ok(_) => TaskOutcome::Derived,
        Err(err) => {
            warn!(level_id, error = %err, "failed to derive variants");
            TaskOutcome::Failed
        }
    }
}

/// Resolve the source raster for one level.
///
/// `Ok(None)` means the level has no obtainable source this run (remote 404
/// or other fetch failure) and is excluded from further output. On a remote
/// hit the bytes are re-encoded to the canonical full-size WebP, persisted,
/// and re-read from disk so the in-memory source always matches the on-disk
/// artifact.
fn resolve_source(
    cfg: &Config,
    fetcher: &dyn ResourceFetcher,
    level_id: u64,
    paths: &VariantPaths,
) -> PackshotResult<Option<RgbaImage>> {
    if paths.full.exists() {
        match read_full(&paths.full) {
            Ok(image) => return Ok(Some(image)),
            Err(err) => {
                warn!(
                    level_id,
                    error = %err,
                    "cached full image unreadable, falling back to remote fetch"
                );
            }
        }
    }

    let url = cfg.remote_thumbnail_url(level_id);
    let bytes = match fetcher.fetch_bytes(&url) {
        Ok(bytes) => bytes,
        Err(err) if err.is_not_found() => {
            warn!(level_id, "remote thumbnail not found, skipping");
            return Ok(None);
        }
        Err(err) => {
            warn!(level_id, error = %err, "remote thumbnail fetch failed, skipping");
            return Ok(None);
        }
    };

    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| PackshotError::decode(format!("level {level_id} source image: {e}")))?
        .to_rgba8();
    encode_webp(&decoded, &paths.full)?;
    read_full(&paths.full).map(Some)
}

fn read_full(path: &Path) -> PackshotResult<RgbaImage> {
    let bytes = fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    Ok(image::load_from_memory(&bytes)
        .map_err(|e| PackshotError::decode(format!("cached image '{}': {e}", path.display())))?
        .to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/levels.rs"]
mod tests;
