use serde::Deserialize;

/// One ranked level, as served by the metadata endpoints. Unknown fields are
/// ignored; the pipeline only needs the on-disk key and the pack ordering.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Level {
    /// Stable numeric id, used as the on-disk cache key.
    pub level_id: u64,
    /// Ordering within a pack; ascending left-to-right in the banner.
    #[serde(default)]
    pub position: i64,
}

/// A pack of levels sharing one banner.
#[derive(Clone, Debug, Deserialize)]
pub struct Pack {
    pub id: String,
    #[serde(default)]
    pub levels: Vec<Level>,
}

/// A tier groups packs under a shared background color or gradient string.
#[derive(Clone, Debug, Deserialize)]
pub struct PackTier {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub packs: Vec<Pack>,
}

/// One unit of pack-phase work: a pack plus its tier's background.
#[derive(Clone, Debug)]
pub struct PackJob {
    pub color: Option<String>,
    pub pack: Pack,
}

/// Ascending position order. The sort is stable, so levels with equal
/// positions keep their original relative order, which is the left-to-right
/// slice order of the banner.
pub fn sort_levels_by_position(levels: &mut [Level]) {
    levels.sort_by_key(|level| level.position);
}

/// Flatten tiers into per-pack jobs, dropping packs with no levels.
pub fn pack_jobs(tiers: Vec<PackTier>) -> Vec<PackJob> {
    tiers
        .into_iter()
        .flat_map(|tier| {
            let color = tier.color;
            tier.packs
                .into_iter()
                .filter(|pack| !pack.levels.is_empty())
                .map(move |pack| PackJob {
                    color: color.clone(),
                    pack,
                })
        })
        .collect()
}
