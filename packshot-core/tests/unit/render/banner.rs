use super::*;
use image::{Rgba, RgbaImage};

fn test_opts() -> BannerOpts {
    BannerOpts {
        canvas_width: 100,
        canvas_height: 40,
        output_height: 20,
        dezoom: 0.45,
        divider_width: 4.0,
    }
}

fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(color))
}

#[test]
fn slice_edges_are_skewed_by_the_canvas_height() {
    let opts = BannerOpts::default();
    for count in [1usize, 2, 4, 6] {
        let w = 1920.0 / count as f64;
        for i in 0..count {
            let geo = slice_geometry(i, count, &opts);
            assert_eq!(geo.bottom_x, (i as f64 * w, (i + 1) as f64 * w));
            assert_eq!(geo.top_x, (i as f64 * w + 300.0, (i + 1) as f64 * w + 300.0));
        }
    }
}

#[test]
fn empty_slice_list_is_an_error() {
    assert!(compose_banner(&[], None, &BannerOpts::default()).is_err());
}

#[test]
fn output_taller_than_canvas_is_an_error() {
    let opts = BannerOpts {
        output_height: 500,
        ..BannerOpts::default()
    };
    assert!(compose_banner(&[None], None, &opts).is_err());
}

#[test]
fn absent_background_fills_transparent() {
    let out = compose_banner(&[None], None, &test_opts()).unwrap();
    assert!(out.pixels().all(|p| p[3] == 0));
}

#[test]
fn unparseable_background_degrades_to_transparent() {
    let out = compose_banner(&[None], Some("speckled"), &test_opts()).unwrap();
    assert!(out.pixels().all(|p| p[3] == 0));
}

#[test]
fn solid_background_fills_every_pixel() {
    let out = compose_banner(&[None], Some("#102030"), &test_opts()).unwrap();
    assert!(out.pixels().all(|p| *p == Rgba([16, 32, 48, 255])));
}

#[test]
fn gradient_background_runs_along_the_axis() {
    let out = compose_banner(
        &[None],
        Some("linear-gradient(0deg, #ff0000 0%, #0000ff 100%)"),
        &test_opts(),
    )
    .unwrap();
    let left = out.get_pixel(0, 10);
    let right = out.get_pixel(99, 10);
    assert!(left[0] > 200 && left[2] < 50, "left should be red: {left:?}");
    assert!(right[2] > 200 && right[0] < 50, "right should be blue: {right:?}");
}

#[test]
fn gradient_with_only_bad_stops_fills_transparent() {
    let out = compose_banner(
        &[None],
        Some("linear-gradient(0deg, blurple 0%, chartreuseish 100%)"),
        &test_opts(),
    )
    .unwrap();
    assert!(out.pixels().all(|p| p[3] == 0));
}

#[test]
fn slices_appear_left_to_right_in_source_order() {
    let opts = test_opts();
    let sources = vec![
        Some(solid(90, 90, [255, 0, 0, 255])),
        Some(solid(90, 90, [0, 0, 255, 255])),
    ];
    let out = compose_banner(&sources, None, &opts).unwrap();

    // Final rows are the canvas center band (crop top = 10).
    let in_left_slice = out.get_pixel(40, 17);
    let in_right_slice = out.get_pixel(80, 17);
    assert_eq!(*in_left_slice, Rgba([255, 0, 0, 255]));
    assert_eq!(*in_right_slice, Rgba([0, 0, 255, 255]));
}

#[test]
fn divider_is_stroked_on_the_shared_skewed_edge() {
    let opts = test_opts();
    let sources = vec![Some(solid(90, 90, [255, 0, 0, 255])), None];
    let out = compose_banner(&sources, None, &opts).unwrap();

    // Canvas pixel (62, 27) sits on x + y = boundary + height exactly; the
    // crop shifts it to row 17.
    assert_eq!(*out.get_pixel(62, 17), Rgba([255, 255, 255, 255]));
}

#[test]
fn missing_slice_leaves_the_background_visible() {
    let opts = test_opts();
    let sources = vec![Some(solid(90, 90, [255, 0, 0, 255])), None];
    let out = compose_banner(&sources, Some("#004400"), &opts).unwrap();

    assert_eq!(*out.get_pixel(40, 17), Rgba([255, 0, 0, 255]));
    assert_eq!(*out.get_pixel(80, 17), Rgba([0, 68, 0, 255]));
}

#[test]
fn tiny_source_never_panics_even_when_the_window_overshoots() {
    let opts = test_opts();
    let sources = vec![Some(solid(3, 2, [9, 9, 9, 255]))];
    // The sampling window is far larger than the source; everything that
    // maps outside it is skipped.
    let out = compose_banner(&sources, None, &opts).unwrap();
    assert_eq!(out.dimensions(), (100, 20));
}
