use image::{Rgb, RgbImage};
use imageproc::map::{map_pixels as map_colors, map_pixels2 as map_colors2};

use crate::{colors::hsv_to_display_color, detection::DetectionSet, error::Result};

/// Weight of the grayscale background in [`plot_color_maps`].
pub const MAP_BASE_WEIGHT: f32 = 0.3;
/// Weight of the color-coded masks in [`plot_color_maps`].
pub const MAP_OVERLAY_WEIGHT: f32 = 1.0 - MAP_BASE_WEIGHT;

/// Rec. 601 luma weights in 14-bit fixed point (red, green, blue).
const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];
const LUMA_SHIFT: u32 = 14;

/// Rec. 601 luma of a pixel, rounded to the nearest level.
fn luma(p: Rgb<u8>) -> u8 {
    let weighted: u32 = p.0.iter().zip(LUMA_WEIGHTS).map(|(&c, w)| u32::from(c) * w).sum();
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Shows which pixels matched which color range.
///
/// The image is reduced to Rec. 601 grayscale, every mask pixel is painted in its
/// range's display color, and the two layers are blended per channel as
/// `0.3 * gray + 0.7 * color`. Pixels outside every mask keep only the dimmed
/// background. Where masks overlap, the range that comes later in the set wins.
///
/// # Errors
///
/// Fails with [`DimensionMismatch`](crate::AnnotateError::DimensionMismatch) if
/// a mask is not the size of `image`, and with
/// [`InvalidColorRange`](crate::AnnotateError::InvalidColorRange) if a
/// representative color is not valid 8-bit HSV.
pub fn plot_color_maps(image: &RgbImage, detections: &DetectionSet) -> Result<RgbImage> {
    let colors = detections
        .iter()
        .map(|(range, detection)| {
            detection.check_map(range, image.dimensions())?;
            hsv_to_display_color(range)
        })
        .collect::<Result<Vec<Rgb<u8>>>>()?;

    log::debug!(
        "blending masks of {} color ranges over a {}x{} image",
        detections.len(),
        image.width(),
        image.height()
    );

    let base = map_colors(image, |p: Rgb<u8>| {
        let l = luma(p);
        Rgb([l, l, l])
    });

    let mut color_map = RgbImage::new(image.width(), image.height());
    for ((_, detection), color) in detections.iter().zip(colors) {
        for (x, y, inside) in detection.map.enumerate_pixels() {
            if inside.0[0] != 0 {
                color_map.put_pixel(x, y, color);
            }
        }
    }

    Ok(map_colors2(&base, &color_map, |b: Rgb<u8>, c: Rgb<u8>| {
        Rgb(std::array::from_fn(|i| blend(b.0[i], c.0[i])))
    }))
}

fn blend(base: u8, overlay: u8) -> u8 {
    (MAP_BASE_WEIGHT * f32::from(base) + MAP_OVERLAY_WEIGHT * f32::from(overlay))
        .round()
        .clamp(0.0, 255.0) as u8
}
