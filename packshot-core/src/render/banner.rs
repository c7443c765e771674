//! Pack banner compositor.
//!
//! Lays out one raster per level as an angled parallelogram slice over a
//! solid or gradient background, separated by divider strokes, then crops
//! the canvas to the final output height. The canvas-2D clip/drawImage pair
//! the site used is expressed here as a closed-form membership test plus an
//! inverse source mapping over a flat RGBA8 buffer.

use image::{Rgba, RgbaImage, imageops};

use crate::foundation::error::{PackshotError, PackshotResult};
use crate::render::color::parse_css_color;
use crate::render::gradient::parse_linear_gradient;

/// Banner canvas geometry and sampling tuning.
#[derive(Clone, Debug)]
pub struct BannerOpts {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Height of the final, vertically center-cropped output.
    pub output_height: u32,
    /// Fraction of the sampled source window covered by the destination box;
    /// `0.45` samples a window ~2.22x larger than the box, pulling the crop
    /// back from the source image.
    pub dezoom: f64,
    /// Stroke width of the divider drawn on shared slice edges.
    pub divider_width: f64,
}

impl Default for BannerOpts {
    fn default() -> Self {
        Self {
            canvas_width: 1920,
            canvas_height: 300,
            output_height: 200,
            dezoom: 0.45,
            divider_width: 10.0,
        }
    }
}

/// Horizontal extents of one slice's destination parallelogram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceGeometry {
    /// Top-edge x range, skewed right by the canvas height.
    pub top_x: (f64, f64),
    /// Bottom-edge x range.
    pub bottom_x: (f64, f64),
}

/// Destination geometry of slice `index` out of `count`. Each slice is a
/// parallelogram whose top edge leads its bottom edge by exactly the canvas
/// height, which produces the angled chevron look.
pub fn slice_geometry(index: usize, count: usize, opts: &BannerOpts) -> SliceGeometry {
    let slice_w = opts.canvas_width as f64 / count as f64;
    let h = opts.canvas_height as f64;
    let x0 = index as f64 * slice_w;
    let x1 = x0 + slice_w;
    SliceGeometry {
        top_x: (x0 + h, x1 + h),
        bottom_x: (x0, x1),
    }
}

/// Compose a banner from ordered slice sources (already sorted by pack
/// position). A `None` source leaves the background visible through that
/// slice. Returns the final, vertically cropped image.
pub fn compose_banner(
    sources: &[Option<RgbaImage>],
    background: Option<&str>,
    opts: &BannerOpts,
) -> PackshotResult<RgbaImage> {
    if sources.is_empty() {
        return Err(PackshotError::config("banner needs at least one slice"));
    }
    if opts.output_height > opts.canvas_height {
        return Err(PackshotError::config(
            "banner output height must not exceed the canvas height",
        ));
    }

    let mut canvas = RgbaImage::new(opts.canvas_width, opts.canvas_height);
    fill_background(&mut canvas, background, opts);

    let slice_w = opts.canvas_width as f64 / sources.len() as f64;
    for (i, source) in sources.iter().enumerate() {
        let Some(image) = source else {
            continue;
        };
        draw_slice(&mut canvas, image, i, slice_w, opts);
        // Interleaved with the draws: the next slice legitimately covers the
        // inner half of this stroke.
        if i + 1 < sources.len() {
            stroke_divider(&mut canvas, (i + 1) as f64 * slice_w, opts);
        }
    }

    let top = (opts.canvas_height - opts.output_height) / 2;
    Ok(imageops::crop_imm(&canvas, 0, top, opts.canvas_width, opts.output_height).to_image())
}

/// Whole-canvas fill. A `linear-gradient(...)` descriptor is rendered as a
/// gradient; any other string is a plain color; absent or unparseable input
/// degrades to transparent rather than failing the banner.
fn fill_background(canvas: &mut RgbaImage, descriptor: Option<&str>, opts: &BannerOpts) {
    let Some(text) = descriptor else {
        return;
    };

    if let Some(spec) = parse_linear_gradient(text) {
        // Resolve stops up front: out-of-range offsets and unparseable
        // colors are silently dropped, never an error.
        let stops: Vec<(f64, Rgba<u8>)> = spec
            .stops
            .iter()
            .filter(|stop| (0.0..=1.0).contains(&stop.offset))
            .filter_map(|stop| parse_css_color(&stop.color).map(|c| (stop.offset, c)))
            .collect();
        if stops.is_empty() {
            return;
        }

        let (w, h) = canvas.dimensions();
        let axis_x = spec.angle_radians.cos() * w as f64;
        let axis_y = spec.angle_radians.sin() * h as f64;
        let len2 = axis_x * axis_x + axis_y * axis_y;
        if len2 <= f64::EPSILON {
            fill_solid(canvas, stops[0].1);
            return;
        }

        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let t = ((x as f64 + 0.5) * axis_x + (y as f64 + 0.5) * axis_y) / len2;
            *pixel = sample_stops(&stops, t.clamp(0.0, 1.0));
        }
        return;
    }

    if let Some(color) = parse_css_color(text) {
        fill_solid(canvas, color);
    }
}

fn fill_solid(canvas: &mut RgbaImage, color: Rgba<u8>) {
    if color[3] == 0 {
        return;
    }
    for pixel in canvas.pixels_mut() {
        *pixel = color;
    }
}

/// Sample the stop list at `t`, scanning pairs in author order. Outside the
/// covered range the nearest end color is held.
fn sample_stops(stops: &[(f64, Rgba<u8>)], t: f64) -> Rgba<u8> {
    if t <= stops[0].0 {
        return stops[0].1;
    }
    for pair in stops.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if t <= o1 {
            if o1 <= o0 {
                // Duplicate or reversed offsets become a hard step.
                return c1;
            }
            let f = (t - o0) / (o1 - o0);
            return lerp_rgba(c0, c1, f);
        }
    }
    stops[stops.len() - 1].1
}

fn lerp_rgba(a: Rgba<u8>, b: Rgba<u8>, f: f64) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let v = a[i] as f64 + (b[i] as f64 - a[i] as f64) * f;
        *slot = v.clamp(0.0, 255.0).round() as u8;
    }
    Rgba(out)
}

/// Draw one source raster into its parallelogram slice.
///
/// The destination box is `slice_w + canvas_height` wide (wide enough to
/// cover the skew) with aspect-preserving height; the sampled source window
/// is that box enlarged by `1/dezoom` per axis and centered on the source.
/// The window may extend past the source; pixels that map outside it are
/// simply not drawn.
fn draw_slice(canvas: &mut RgbaImage, source: &RgbaImage, index: usize, slice_w: f64, opts: &BannerOpts) {
    let (src_w_px, src_h_px) = source.dimensions();
    if src_w_px == 0 || src_h_px == 0 {
        return;
    }

    let h = opts.canvas_height as f64;
    let dest_x0 = index as f64 * slice_w;
    let dest_w = slice_w + h;
    let dest_h = dest_w * src_h_px as f64 / src_w_px as f64;

    let window_w = dest_w / opts.dezoom;
    let window_h = dest_h / opts.dezoom;
    let window_x0 = (src_w_px as f64 - window_w) / 2.0;
    let window_y0 = (src_h_px as f64 - window_h) / 2.0;

    for y in 0..opts.canvas_height {
        let fy = y as f64 + 0.5;
        // Rows shear linearly: the top edge leads the bottom edge by the
        // canvas height.
        let shear = h - fy;
        let row_x0 = dest_x0 + shear;
        let row_x1 = row_x0 + slice_w;

        let x_start = row_x0.floor().max(0.0) as u32;
        let x_end = (row_x1.ceil().min(opts.canvas_width as f64)).max(0.0) as u32;
        for x in x_start..x_end {
            let fx = x as f64 + 0.5;
            if fx < row_x0 || fx >= row_x1 {
                continue;
            }

            let u = (fx - dest_x0) / dest_w;
            let v = fy / dest_h;
            if v >= 1.0 {
                continue;
            }
            let sx = window_x0 + u * window_w;
            let sy = window_y0 + v * window_h;
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            let (sxi, syi) = (sx as u32, sy as u32);
            if sxi >= src_w_px || syi >= src_h_px {
                continue;
            }
            canvas.put_pixel(x, y, *source.get_pixel(sxi, syi));
        }
    }
}

/// Stroke a white divider along the skewed edge at `boundary_x` (the bottom
/// x of the shared edge). The edge satisfies `x + y = boundary_x + h`, so
/// the stroke is the band within half a width of that line.
fn stroke_divider(canvas: &mut RgbaImage, boundary_x: f64, opts: &BannerOpts) {
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    let c = boundary_x + opts.canvas_height as f64;
    let half = opts.divider_width / 2.0;
    let reach = half * std::f64::consts::SQRT_2;

    for y in 0..opts.canvas_height {
        let fy = y as f64 + 0.5;
        let center = c - fy;
        let x_start = (center - reach).floor().max(0.0) as u32;
        let x_end = ((center + reach).ceil().min(canvas.width() as f64)).max(0.0) as u32;
        for x in x_start..x_end {
            let fx = x as f64 + 0.5;
            if (fx + fy - c).abs() / std::f64::consts::SQRT_2 <= half {
                canvas.put_pixel(x, y, WHITE);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/banner.rs"]
mod tests;
