//! Per-level output variants: card (vertical center crop) and the two
//! open-graph sizes (aspect-filling cover resize). Each variant is derived
//! independently and only when its file is missing, so re-running the
//! pipeline is idempotent and an interrupted run resumes cleanly.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::{DynamicImage, RgbaImage, imageops};
use tracing::debug;

use crate::foundation::config::{self, Config};
use crate::foundation::error::PackshotResult;

/// The four on-disk targets derived from one level's source image.
#[derive(Clone, Debug)]
pub struct VariantPaths {
    pub full: PathBuf,
    pub card: PathBuf,
    pub og_full: PathBuf,
    pub og_card: PathBuf,
}

impl VariantPaths {
    pub fn for_level(cfg: &Config, level_id: u64) -> Self {
        Self {
            full: cfg.level_full_path(level_id),
            card: cfg.level_card_path(level_id),
            og_full: cfg.og_full_path(level_id),
            og_card: cfg.og_card_path(level_id),
        }
    }

    /// File existence is the sole durability signal; writes go through a
    /// temp-then-rename so a file under its final name is always complete.
    pub fn all_exist(&self) -> bool {
        self.full.exists() && self.card.exists() && self.og_full.exists() && self.og_card.exists()
    }
}

/// Derive every missing variant (card, og-full, og-card) from the decoded
/// source. The full image itself is the resolver's concern. Returns how many
/// files were written.
pub fn derive_missing(source: &RgbaImage, paths: &VariantPaths) -> PackshotResult<usize> {
    let mut written = 0;

    if !paths.card.exists() {
        let (w, h) = source.dimensions();
        let crop_h = config::CARD_HEIGHT.min(h);
        let top = (h - crop_h) / 2;
        let card = imageops::crop_imm(source, 0, top, w, crop_h).to_image();
        encode_webp(&card, &paths.card)?;
        debug!(path = %paths.card.display(), "wrote card variant");
        written += 1;
    }

    if !paths.og_full.exists() {
        let (w, h) = config::OG_FULL_SIZE;
        encode_webp(&cover_resize(source, w, h), &paths.og_full)?;
        debug!(path = %paths.og_full.display(), "wrote og-full variant");
        written += 1;
    }

    if !paths.og_card.exists() {
        let (w, h) = config::OG_CARD_SIZE;
        encode_webp(&cover_resize(source, w, h), &paths.og_card)?;
        debug!(path = %paths.og_card.display(), "wrote og-card variant");
        written += 1;
    }

    Ok(written)
}

/// Aspect-filling resize to exact dimensions: scale to cover, center crop.
fn cover_resize(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    DynamicImage::ImageRgba8(source.clone())
        .resize_to_fill(width, height, imageops::FilterType::Lanczos3)
        .to_rgba8()
}

/// Encode as lossless WebP through a sibling temp file and rename into
/// place, so partial writes are never visible under the final name.
pub fn encode_webp(image: &RgbaImage, path: &Path) -> PackshotResult<()> {
    let tmp = temp_sibling(path);
    {
        let file =
            fs::File::create(&tmp).with_context(|| format!("create '{}'", tmp.display()))?;
        let writer = BufWriter::new(file);
        let encoder = image::codecs::webp::WebPEncoder::new_lossless(writer);
        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .with_context(|| format!("encode webp '{}'", path.display()))?;
    }
    fs::rename(&tmp, path).with_context(|| format!("rename into '{}'", path.display()))?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/variants.rs"]
mod tests;
