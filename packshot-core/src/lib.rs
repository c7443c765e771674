//! Packshot regenerates the derived image assets of a ranked-level
//! leaderboard site: per-level thumbnail variants (full, card, and the two
//! open-graph sizes) and composite pack banners.
//!
//! The pipeline runs in two phases:
//!
//! - The level phase resolves each level's source image (local cache first,
//!   remote fetch second) and derives whichever output variants are missing.
//! - The pack phase reads the level cache and renders each pack's levels
//!   into a single banner with angled slices over a solid or gradient
//!   background.
//!
//! Both phases run their per-item tasks on a bounded scheduler; one item's
//! failure never affects its siblings.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod foundation;
pub mod pipeline;
pub mod remote;
pub mod render;

pub use crate::catalog::model::{Level, Pack, PackJob, PackTier};
pub use crate::foundation::config::Config;
pub use crate::foundation::error::{PackshotError, PackshotResult};
pub use crate::pipeline::levels::process_levels;
pub use crate::pipeline::packs::process_packs;
pub use crate::pipeline::scheduler::{BatchStats, TaskOutcome, run_bounded};
pub use crate::remote::fetch::{HttpFetcher, ResourceFetcher, fetch_json, fetch_merged};
pub use crate::render::banner::BannerOpts;
