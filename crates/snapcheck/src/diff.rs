//! Per-pixel perceptual comparison of two RGBA rasters.
//!
//! The default [`ColorDistance::Yiq`] metric measures colour distance in YIQ
//! space after blending every pixel onto white, so that a single normalized
//! threshold covers both luminance and chroma changes. Pixels above the
//! threshold that look like anti-aliasing (an edge pixel sitting between a
//! darker and a brighter region) are reported separately and not counted as
//! differences unless [`DiffOptions::include_anti_aliasing`] is set.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotError};

// maximum possible value of the YIQ distance between two colours
const MAX_YIQ_DELTA: f64 = 35215.0;

/// The distance function used to decide whether two pixels differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorDistance {
    /// Weighted YIQ distance, thresholded by [`DiffOptions::threshold`].
    #[default]
    Yiq,
    /// A pixel differs when any RGBA channel differs by more than `tolerance`.
    PerChannel { tolerance: u8 },
}

/// Options controlling how pixels are classified and how the diff image is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Distance function applied to every pixel pair.
    pub distance: ColorDistance,
    /// Normalized sensitivity in `0.0..=1.0`. Smaller values are stricter.
    pub threshold: f64,
    /// Count anti-aliased pixels as differences instead of ignoring them.
    pub include_anti_aliasing: bool,
    /// Opacity of the faded baseline drawn behind the differences.
    pub alpha: f64,
    /// Colour of differing pixels in the diff image.
    pub diff_color: [u8; 3],
    /// Colour of pixels that got darker, when set. Otherwise `diff_color` is used.
    pub diff_color_alt: Option<[u8; 3]>,
    /// Colour of detected anti-aliased pixels in the diff image.
    pub aa_color: [u8; 3],
    /// Draw differences over a transparent background instead of the faded baseline.
    pub diff_mask: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            distance: ColorDistance::Yiq,
            threshold: 0.1,
            include_anti_aliasing: false,
            alpha: 0.1,
            diff_color: [255, 0, 0],
            diff_color_alt: None,
            aa_color: [255, 255, 0],
            diff_mask: false,
        }
    }
}

impl DiffOptions {
    /// Exact comparison: any channel change counts, anti-aliasing included.
    pub fn strict() -> Self {
        Self {
            distance: ColorDistance::PerChannel { tolerance: 0 },
            include_anti_aliasing: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SnapshotError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Pixel counts produced by a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelDiff {
    pub total_pixels: usize,
    pub different_pixels: usize,
    /// Pixels above the threshold that were classified as anti-aliasing.
    pub anti_aliased_pixels: usize,
}

impl PixelDiff {
    pub fn is_match(&self) -> bool {
        self.different_pixels == 0
    }

    /// Fraction of pixels that differ, `0.0` for empty images.
    pub fn ratio(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.different_pixels as f64 / self.total_pixels as f64
        }
    }
}

/// Counts differing pixels between `baseline` and `candidate`.
pub fn diff_images(
    baseline: &RgbaImage,
    candidate: &RgbaImage,
    options: &DiffOptions,
) -> Result<PixelDiff> {
    check_comparable(baseline, candidate, options)?;
    Ok(run(baseline, candidate, options, None))
}

/// Counts differing pixels and renders a diff image of the same dimensions.
pub fn render_diff(
    baseline: &RgbaImage,
    candidate: &RgbaImage,
    options: &DiffOptions,
) -> Result<(PixelDiff, RgbaImage)> {
    check_comparable(baseline, candidate, options)?;
    let mut output = RgbaImage::new(baseline.width(), baseline.height());
    let diff = run(baseline, candidate, options, Some(&mut output));
    Ok((diff, output))
}

fn check_comparable(a: &RgbaImage, b: &RgbaImage, options: &DiffOptions) -> Result<()> {
    options.validate()?;
    if a.dimensions() != b.dimensions() {
        return Err(SnapshotError::DimensionMismatch {
            baseline: a.dimensions(),
            candidate: b.dimensions(),
        });
    }
    Ok(())
}

enum PixelClass {
    Same,
    AntiAliased,
    Different { darker: bool },
}

struct Raster<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

fn run(
    baseline: &RgbaImage,
    candidate: &RgbaImage,
    options: &DiffOptions,
    mut output: Option<&mut RgbaImage>,
) -> PixelDiff {
    let width = baseline.width() as usize;
    let height = baseline.height() as usize;
    let img1 = Raster {
        data: baseline.as_raw(),
        width,
        height,
    };
    let img2 = Raster {
        data: candidate.as_raw(),
        width,
        height,
    };

    let mut diff = PixelDiff {
        total_pixels: width * height,
        ..Default::default()
    };

    if img1.data == img2.data {
        if let Some(out) = output.as_deref_mut().filter(|_| !options.diff_mask) {
            for pos in (0..img1.data.len()).step_by(4) {
                draw_gray_pixel(img1.data, pos, options.alpha, out);
            }
        }
        return diff;
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;

    for y in 0..height {
        for x in 0..width {
            let pos = (y * width + x) * 4;
            let class = classify(&img1, &img2, x, y, pos, max_delta, options);
            match class {
                PixelClass::Same => {
                    if let Some(out) = output.as_deref_mut().filter(|_| !options.diff_mask) {
                        draw_gray_pixel(img1.data, pos, options.alpha, out);
                    }
                }
                PixelClass::AntiAliased => {
                    diff.anti_aliased_pixels += 1;
                    if let Some(out) = output.as_deref_mut().filter(|_| !options.diff_mask) {
                        draw_pixel(out, pos, options.aa_color);
                    }
                }
                PixelClass::Different { darker } => {
                    diff.different_pixels += 1;
                    if let Some(out) = output.as_deref_mut() {
                        let color = match options.diff_color_alt {
                            Some(alt) if darker => alt,
                            _ => options.diff_color,
                        };
                        draw_pixel(out, pos, color);
                    }
                }
            }
        }
    }

    diff
}

fn classify(
    img1: &Raster,
    img2: &Raster,
    x: usize,
    y: usize,
    pos: usize,
    max_delta: f64,
    options: &DiffOptions,
) -> PixelClass {
    match options.distance {
        ColorDistance::Yiq => {
            let delta = color_delta(img1.data, img2.data, pos, pos, false);
            if delta.abs() <= max_delta {
                return PixelClass::Same;
            }
            if !options.include_anti_aliasing
                && (antialiased(img1, x, y, img2) || antialiased(img2, x, y, img1))
            {
                return PixelClass::AntiAliased;
            }
            // a negative delta means the baseline pixel was brighter
            PixelClass::Different { darker: delta < 0.0 }
        }
        ColorDistance::PerChannel { tolerance } => {
            let a = &img1.data[pos..pos + 4];
            let b = &img2.data[pos..pos + 4];
            let exceeds = a.iter().zip(b).any(|(a, b)| a.abs_diff(*b) > tolerance);
            if !exceeds {
                return PixelClass::Same;
            }
            let darker = color_delta(img1.data, img2.data, pos, pos, true) > 0.0;
            PixelClass::Different { darker }
        }
    }
}

/// Signed YIQ distance between pixel `k` of `img1` and pixel `m` of `img2`.
///
/// The sign is negative when the first pixel is brighter. With `y_only` the
/// plain luminance difference is returned.
fn color_delta(img1: &[u8], img2: &[u8], k: usize, m: usize, y_only: bool) -> f64 {
    let p1 = &img1[k..k + 4];
    let p2 = &img2[m..m + 4];
    if p1 == p2 {
        return 0.0;
    }

    let (r1, g1, b1) = blend_onto_white(p1);
    let (r2, g2, b2) = blend_onto_white(p2);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;

    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);
    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;

    if y1 > y2 { -delta } else { delta }
}

fn blend_onto_white(p: &[u8]) -> (f64, f64, f64) {
    let (r, g, b, a) = (p[0] as f64, p[1] as f64, p[2] as f64, p[3]);
    if a < 255 {
        let a = a as f64 / 255.0;
        (blend(r, a), blend(g, a), blend(b, a))
    } else {
        (r, g, b)
    }
}

fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

fn neighbourhood(raster: &Raster, x: usize, y: usize) -> (usize, usize, usize, usize) {
    (
        x.saturating_sub(1),
        y.saturating_sub(1),
        (x + 1).min(raster.width - 1),
        (y + 1).min(raster.height - 1),
    )
}

/// Whether the pixel at (`x1`, `y1`) of `img` looks like an anti-aliased edge.
///
/// The pixel qualifies when it has at most two equal-brightness neighbours,
/// has both darker and brighter neighbours, and the darkest or brightest of
/// those sits inside a flat region in both images.
fn antialiased(img: &Raster, x1: usize, y1: usize, other: &Raster) -> bool {
    let (x0, y0, x2, y2) = neighbourhood(img, x1, y1);
    let pos = (y1 * img.width + x1) * 4;
    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);

    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_at = None;
    let mut max_at = None;

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let delta = color_delta(img.data, img.data, pos, (y * img.width + x) * 4, true);
            if delta == 0.0 {
                zeroes += 1;
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = Some((x, y));
            } else if delta > max {
                max = delta;
                max_at = Some((x, y));
            }
        }
    }

    let (Some(min_at), Some(max_at)) = (min_at, max_at) else {
        return false;
    };

    (has_many_siblings(img, min_at) && has_many_siblings(other, min_at))
        || (has_many_siblings(img, max_at) && has_many_siblings(other, max_at))
}

/// Whether the pixel has more than two identical neighbours.
fn has_many_siblings(img: &Raster, (x1, y1): (usize, usize)) -> bool {
    let (x0, y0, x2, y2) = neighbourhood(img, x1, y1);
    let pos = (y1 * img.width + x1) * 4;
    let pixel = &img.data[pos..pos + 4];
    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let pos2 = (y * img.width + x) * 4;
            if pixel == &img.data[pos2..pos2 + 4] {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }
    false
}

fn draw_pixel(out: &mut RgbaImage, pos: usize, [r, g, b]: [u8; 3]) {
    let buf: &mut [u8] = out;
    buf[pos..pos + 4].copy_from_slice(&[r, g, b, 255]);
}

fn draw_gray_pixel(img: &[u8], pos: usize, alpha: f64, out: &mut RgbaImage) {
    let p = &img[pos..pos + 4];
    let luma = rgb2y(p[0] as f64, p[1] as f64, p[2] as f64);
    let value = blend(luma, alpha * p[3] as f64 / 255.0) as u8;
    draw_pixel(out, pos, [value, value, value]);
}
