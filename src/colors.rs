use image::Rgb;
use palette::{FromColor, Hsv, Srgb};

use crate::detection::ColorRange;
use crate::error::{AnnotateError, Result};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Upper bound (exclusive) of the 8-bit hue channel, which stores degrees / 2.
pub const HUE_LIMIT: f32 = 180.0;

/// Converts an 8-bit HSV triple into the color used to draw a color range.
///
/// Hue is expected in `[0, 180)` (half degrees), saturation and value in
/// `[0, 255]`. Each channel is truncated to a byte before conversion, the same
/// way a cast to `u8` would.
///
/// # Errors
///
/// Returns [`AnnotateError::InvalidColorRange`] if any channel is not finite or
/// lies outside its domain.
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use line_debug_overlay::{ColorRange, colors::hsv_to_display_color};
///
/// let green = ColorRange::new("green", [55.0, 200.0, 200.0], [65.0, 255.0, 255.0])
///     .with_representative([60.0, 255.0, 255.0]);
/// assert_eq!(hsv_to_display_color(&green).unwrap(), Rgb([0, 255, 0]));
/// ```
pub fn hsv_to_display_color(range: &ColorRange) -> Result<Rgb<u8>> {
    let [h, s, v] = range.representative;

    let in_domain = [h, s, v].iter().all(|c| c.is_finite())
        && (0.0..HUE_LIMIT).contains(&h)
        && (0.0..=255.0).contains(&s)
        && (0.0..=255.0).contains(&v);
    if !in_domain {
        return Err(AnnotateError::InvalidColorRange {
            range: range.name.clone(),
            representative: range.representative,
        });
    }

    let (h, s, v) = (h as u8, s as u8, v as u8);
    let hsv = Hsv::new(
        f32::from(h) * 2.0,
        f32::from(s) / 255.0,
        f32::from(v) / 255.0,
    );
    let srgb: Srgb<u8> = Srgb::from_color(hsv).into_format();

    log::trace!(
        "color range `{}` representative {:?} displays as {:?}",
        range.name,
        range.representative,
        srgb
    );

    Ok(Rgb([srgb.red, srgb.green, srgb.blue]))
}
