use super::*;
use image::{Rgba, RgbaImage};

struct TempDirGuard(PathBuf);

impl TempDirGuard {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("packshot_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn paths_in(root: &Path) -> VariantPaths {
    VariantPaths {
        full: root.join("full.webp"),
        card: root.join("card.webp"),
        og_full: root.join("og_full.webp"),
        og_card: root.join("og_card.webp"),
    }
}

fn source(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([40, 80, 120, 255]))
}

#[test]
fn derives_all_missing_variants_with_expected_sizes() {
    let tmp = TempDirGuard::new("variants_sizes");
    let paths = paths_in(&tmp.0);

    let written = derive_missing(&source(640, 360), &paths).unwrap();
    assert_eq!(written, 3);

    let card = image::open(&paths.card).unwrap().to_rgba8();
    assert_eq!(card.dimensions(), (640, config::CARD_HEIGHT));
    let og_full = image::open(&paths.og_full).unwrap().to_rgba8();
    assert_eq!(og_full.dimensions(), config::OG_FULL_SIZE);
    let og_card = image::open(&paths.og_card).unwrap().to_rgba8();
    assert_eq!(og_card.dimensions(), config::OG_CARD_SIZE);
}

#[test]
fn short_sources_keep_their_own_card_height() {
    let tmp = TempDirGuard::new("variants_short");
    let paths = paths_in(&tmp.0);

    derive_missing(&source(320, 120), &paths).unwrap();
    let card = image::open(&paths.card).unwrap().to_rgba8();
    assert_eq!(card.dimensions(), (320, 120));
}

#[test]
fn rerun_writes_nothing() {
    let tmp = TempDirGuard::new("variants_rerun");
    let paths = paths_in(&tmp.0);

    assert_eq!(derive_missing(&source(640, 360), &paths).unwrap(), 3);
    assert_eq!(derive_missing(&source(640, 360), &paths).unwrap(), 0);
}

#[test]
fn each_variant_is_derived_independently() {
    let tmp = TempDirGuard::new("variants_partial");
    let paths = paths_in(&tmp.0);

    derive_missing(&source(640, 360), &paths).unwrap();
    fs::remove_file(&paths.og_card).unwrap();

    assert_eq!(derive_missing(&source(640, 360), &paths).unwrap(), 1);
    assert!(paths.og_card.exists());
}

#[test]
fn encode_leaves_no_temp_file_behind() {
    let tmp = TempDirGuard::new("variants_tmpfile");
    let out = tmp.0.join("banner.webp");

    encode_webp(&source(32, 32), &out).unwrap();
    assert!(out.exists());

    let leftovers: Vec<_> = fs::read_dir(&tmp.0)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path() != out)
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}
