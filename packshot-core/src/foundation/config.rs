use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::PackshotResult;

/// Vertical size of the "card" list-view variant, in pixels. Sources shorter
/// than this are kept at their own height.
pub const CARD_HEIGHT: u32 = 200;

/// Open-graph link-preview size for the detail view.
pub const OG_FULL_SIZE: (u32, u32) = (1200, 630);

/// Open-graph link-preview size for the list view.
pub const OG_CARD_SIZE: (u32, u32) = (400, 48);

/// Default ceiling on in-flight tasks per phase.
pub const DEFAULT_CONCURRENCY: usize = 5;

const LEVELS_API_URL: &str = "https://api.aredl.net/v2/api/aredl/levels";
const PLAT_LEVELS_API_URL: &str = "https://api.aredl.net/v2/api/arepl/levels";
const PACKS_API_URL: &str = "https://api.aredl.net/v2/api/aredl/pack-tiers?v=thumbnails";
const PLAT_PACKS_API_URL: &str = "https://api.aredl.net/v2/api/arepl/pack-tiers?v=thumbnails";
const THUMBNAIL_BASE_URL: &str = "https://levelthumbs.prevter.me/thumbnail";

/// Endpoints, output layout and tuning for one pipeline run.
///
/// The classic and platformer lists live behind separate endpoints; each
/// endpoint group is fetched and concatenated before processing.
#[derive(Clone, Debug)]
pub struct Config {
    /// Level metadata endpoints, merged in order.
    pub level_endpoints: Vec<String>,
    /// Pack-tier metadata endpoints, merged in order.
    pub pack_endpoints: Vec<String>,
    /// Base URL of the remote thumbnail source, addressable by level id.
    pub thumbnail_base_url: String,
    /// Root directory the output tree is created under.
    pub output_root: PathBuf,
    /// Maximum number of in-flight tasks per phase.
    pub concurrency: usize,
}

impl Config {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            level_endpoints: vec![LEVELS_API_URL.to_string(), PLAT_LEVELS_API_URL.to_string()],
            pack_endpoints: vec![PACKS_API_URL.to_string(), PLAT_PACKS_API_URL.to_string()],
            thumbnail_base_url: THUMBNAIL_BASE_URL.to_string(),
            output_root: output_root.into(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn levels_full_dir(&self) -> PathBuf {
        self.output_root.join("levels").join("full")
    }

    pub fn levels_cards_dir(&self) -> PathBuf {
        self.output_root.join("levels").join("cards")
    }

    pub fn og_levels_full_dir(&self) -> PathBuf {
        self.output_root.join("og").join("levels").join("full")
    }

    pub fn og_levels_cards_dir(&self) -> PathBuf {
        self.output_root.join("og").join("levels").join("cards")
    }

    pub fn packs_dir(&self) -> PathBuf {
        self.output_root.join("packs")
    }

    /// Canonical on-disk path of a level's full-size cache artifact. Its
    /// existence is the durability signal for the whole fallback chain.
    pub fn level_full_path(&self, level_id: u64) -> PathBuf {
        self.levels_full_dir().join(format!("{level_id}.webp"))
    }

    pub fn level_card_path(&self, level_id: u64) -> PathBuf {
        self.levels_cards_dir().join(format!("{level_id}.webp"))
    }

    pub fn og_full_path(&self, level_id: u64) -> PathBuf {
        self.og_levels_full_dir().join(format!("{level_id}.webp"))
    }

    pub fn og_card_path(&self, level_id: u64) -> PathBuf {
        self.og_levels_cards_dir().join(format!("{level_id}.webp"))
    }

    pub fn pack_path(&self, pack_id: &str) -> PathBuf {
        self.packs_dir().join(format!("{pack_id}.webp"))
    }

    /// High-resolution source image URL for one level.
    pub fn remote_thumbnail_url(&self, level_id: u64) -> String {
        format!("{}/{level_id}/high", self.thumbnail_base_url)
    }

    /// Create the four level output directories if absent.
    pub fn ensure_level_dirs(&self) -> PackshotResult<()> {
        for dir in [
            self.levels_full_dir(),
            self.levels_cards_dir(),
            self.og_levels_full_dir(),
            self.og_levels_cards_dir(),
        ] {
            ensure_dir(&dir)?;
        }
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> PackshotResult<()> {
    fs::create_dir_all(dir).with_context(|| format!("create directory '{}'", dir.display()))?;
    Ok(())
}
