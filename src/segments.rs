use std::fmt;

use ab_glyph::FontArc;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_text_mut};

use crate::{
    colors::{BLACK, BLUE, GREEN, WHITE, hsv_to_display_color},
    detection::DetectionSet,
    drawing::draw_thick_line_segment_mut,
    error::{AnnotateError, Result},
    rect::{NormalizedExtent, StatBox},
};

/// DejaVu Sans Mono, used for the statistics labels unless another font is configured.
static LABEL_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");

/// Loads the bundled label font.
pub fn label_font() -> Result<FontArc> {
    FontArc::try_from_slice(LABEL_FONT).map_err(|_| AnnotateError::InvalidFont)
}

/// Stroke lengths and widths used to draw segments and their normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStyle {
    /// Scale applied to each normal; a unit normal yields a stroke this many pixels long.
    pub normal_length: f32,
    pub normal_thickness: u32,
    /// Width of the black halo drawn under every segment.
    pub outline_thickness: u32,
    pub line_thickness: u32,
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self {
            normal_length: 10.0,
            normal_thickness: 2,
            outline_thickness: 5,
            line_thickness: 2,
        }
    }
}

/// Toggles for two long-standing oddities of the statistics overlay.
///
/// Both are on by default so that the overlay matches what existing
/// tooling has always produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsQuirks {
    /// Draw the fourth box edge from the min corner to itself instead of closing the box.
    pub degenerate_edge: bool,
    /// Also mark both corners with their x and y exchanged.
    pub swapped_markers: bool,
}

impl Default for StatsQuirks {
    fn default() -> Self {
        Self {
            degenerate_edge: true,
            swapped_markers: true,
        }
    }
}

/// Options for [`plot_segments_with_stats`].
#[derive(Clone)]
pub struct StatsOptions {
    /// Font for the text labels; the bundled [`label_font`] when unset.
    pub font: Option<FontArc>,
    /// Glyph height of the labels in pixels.
    pub label_scale: f32,
    pub style: SegmentStyle,
    pub quirks: StatsQuirks,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            font: None,
            label_scale: 9.0,
            style: SegmentStyle::default(),
            quirks: StatsQuirks::default(),
        }
    }
}

impl fmt::Debug for StatsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsOptions")
            .field("font", &self.font.as_ref().map(|_| "FontArc"))
            .field("label_scale", &self.label_scale)
            .field("style", &self.style)
            .field("quirks", &self.quirks)
            .finish()
    }
}

/// Draws every detected segment and its normals on a copy of `image`.
///
/// Each normal becomes a short black stroke starting at its segment center.
/// Each segment is drawn in its color range's display color over a wider black
/// halo so it stands out against busy backgrounds. Detections are drawn in
/// set order, so later ranges end up on top.
///
/// # Errors
///
/// Fails with [`InvalidDetection`](crate::AnnotateError::InvalidDetection) if a
/// detection has mismatched centers and normals, and with
/// [`InvalidColorRange`](crate::AnnotateError::InvalidColorRange) if a
/// representative color is not valid 8-bit HSV.
///
/// # Examples
///
/// ```
/// use image::{Rgb, RgbImage};
/// use imageproc::point::Point;
/// use line_debug_overlay::{ColorRange, Detection, DetectionSet, segments::plot_segments};
///
/// let image = RgbImage::from_pixel(40, 30, Rgb([128, 128, 128]));
/// let mut detection = Detection::empty(40, 30);
/// detection.centers.push(Point::new(10.0, 10.0));
/// detection.normals.push(Point::new(1.0, 0.0));
///
/// let mut set = DetectionSet::new();
/// set.push(ColorRange::new("white", [0.0, 0.0, 200.0], [179.0, 40.0, 255.0]), detection);
///
/// let annotated = plot_segments(&image, &set).unwrap();
/// assert_eq!(*annotated.get_pixel(15, 10), Rgb([0, 0, 0]));
/// assert_eq!(*image.get_pixel(15, 10), Rgb([128, 128, 128]));
/// ```
pub fn plot_segments(image: &RgbImage, detections: &DetectionSet) -> Result<RgbImage> {
    plot_segments_styled(image, detections, &SegmentStyle::default())
}

/// Same as [`plot_segments`] with custom stroke lengths and widths.
pub fn plot_segments_styled(
    image: &RgbImage,
    detections: &DetectionSet,
    style: &SegmentStyle,
) -> Result<RgbImage> {
    let colors = detections
        .iter()
        .map(|(range, detection)| {
            detection.check_normals(range)?;
            hsv_to_display_color(range)
        })
        .collect::<Result<Vec<Rgb<u8>>>>()?;

    log::debug!(
        "plotting segments of {} color ranges on a {}x{} image",
        detections.len(),
        image.width(),
        image.height()
    );

    let mut canvas = image.clone();
    for ((_, detection), color) in detections.iter().zip(colors) {
        for (center, normal) in detection.centers.iter().zip(&detection.normals) {
            let tip = (
                center.x + style.normal_length * normal.x,
                center.y + style.normal_length * normal.y,
            );
            draw_thick_line_segment_mut(
                &mut canvas,
                (center.x as i32, center.y as i32),
                (tip.0 as i32, tip.1 as i32),
                style.normal_thickness,
                BLACK,
            );
        }

        for &[x1, y1, x2, y2] in &detection.lines {
            draw_thick_line_segment_mut(
                &mut canvas,
                (x1, y1),
                (x2, y2),
                style.outline_thickness,
                BLACK,
            );
            draw_thick_line_segment_mut(
                &mut canvas,
                (x1, y1),
                (x2, y2),
                style.line_thickness,
                color,
            );
        }
    }

    Ok(canvas)
}

/// Draws the segments like [`plot_segments`], then overlays a statistics box.
///
/// The overlay consists of the white outline of the box spanned by
/// `stat_box_max` and `stat_box_min`, six green labels with the box corners
/// and areas (raw and normalized), and small marker circles on the corners:
/// blue for the max corner, green for the min corner. Label positions are
/// fixed and may overlap.
///
/// `normalized_extent` holds `[x_max, y_max, x_min, y_min]` in normalized
/// coordinates. See [`StatsQuirks`] for the parts of the overlay that can be
/// switched off.
///
/// # Errors
///
/// Fails under the same conditions as [`plot_segments`], and with
/// [`InvalidFont`](crate::AnnotateError::InvalidFont) if the bundled label
/// font cannot be parsed.
pub fn plot_segments_with_stats(
    image: &RgbImage,
    detections: &DetectionSet,
    stat_box_max: (f32, f32),
    stat_box_min: (f32, f32),
    normalized_extent: [f32; 4],
    options: &StatsOptions,
) -> Result<RgbImage> {
    let font = match &options.font {
        Some(font) => font.clone(),
        None => label_font()?,
    };
    let mut canvas = plot_segments_styled(image, detections, &options.style)?;

    let stat_box = StatBox::from_corners(stat_box_max, stat_box_min);
    let normalized = NormalizedExtent::from(normalized_extent);

    for (start, end) in stat_box.edges(options.quirks.degenerate_edge) {
        draw_thick_line_segment_mut(&mut canvas, start, end, 1, WHITE);
    }

    for label in stat_box.labels(&normalized) {
        // Label origins sit on the text baseline; draw_text_mut wants the top.
        let top = label.origin.1 - options.label_scale.round() as i32;
        draw_text_mut(
            &mut canvas,
            GREEN,
            label.origin.0,
            top,
            options.label_scale,
            &font,
            &label.text,
        );
    }
    log::debug!(
        "stats box {:?} drawn with area {}",
        stat_box,
        stat_box.area()
    );

    let (max_markers, min_markers) = stat_box.markers(options.quirks.swapped_markers);
    for center in max_markers {
        draw_hollow_circle_mut(&mut canvas, center, 1, BLUE);
    }
    for center in min_markers {
        draw_hollow_circle_mut(&mut canvas, center, 1, GREEN);
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        detection::{ColorRange, Detection},
        error::AnnotateError,
    };
    use imageproc::point::Point;

    const BACKGROUND: Rgb<u8> = Rgb([200, 200, 200]);

    fn green_range() -> ColorRange {
        ColorRange::new("green", [50.0, 100.0, 100.0], [70.0, 255.0, 255.0])
            .with_representative([60.0, 255.0, 255.0])
    }

    fn canvas(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, BACKGROUND)
    }

    fn single(range: ColorRange, detection: Detection) -> DetectionSet {
        [(range, detection)].into_iter().collect()
    }

    fn has_color_near(image: &RgbImage, center: (u32, u32), color: Rgb<u8>) -> bool {
        (center.0 - 1..=center.0 + 1)
            .flat_map(|x| (center.1 - 1..=center.1 + 1).map(move |y| (x, y)))
            .any(|(x, y)| *image.get_pixel(x, y) == color)
    }

    #[test]
    fn empty_set_leaves_image_untouched() {
        let image = RgbImage::from_fn(32, 24, |x, y| Rgb([x as u8 * 7, y as u8 * 9, 42]));
        let annotated = plot_segments(&image, &DetectionSet::new()).unwrap();
        assert_eq!(annotated, image);

        let mut set = DetectionSet::new();
        set.push(green_range(), Detection::empty(32, 24));
        assert_eq!(plot_segments(&image, &set).unwrap(), image);
    }

    #[test]
    fn normal_is_drawn_as_black_stroke() {
        let image = canvas(40, 30);
        let mut detection = Detection::empty(40, 30);
        detection.centers.push(Point::new(10.0, 10.0));
        detection.normals.push(Point::new(1.0, 0.0));

        let annotated = plot_segments(&image, &single(green_range(), detection)).unwrap();

        for x in 10..=20 {
            assert_eq!(*annotated.get_pixel(x, 10), BLACK, "({x}, 10) should be black");
        }
        assert_eq!(*annotated.get_pixel(25, 10), BACKGROUND);
        assert_eq!(*annotated.get_pixel(15, 14), BACKGROUND);
    }

    #[test]
    fn non_unit_normal_changes_stroke_length() {
        let image = canvas(40, 30);
        let mut detection = Detection::empty(40, 30);
        detection.centers.push(Point::new(5.0, 10.0));
        detection.normals.push(Point::new(2.0, 0.0));

        let annotated = plot_segments(&image, &single(green_range(), detection)).unwrap();
        assert_eq!(*annotated.get_pixel(25, 10), BLACK);
    }

    #[test]
    fn line_is_colored_with_black_halo() {
        let image = canvas(60, 60);
        let mut detection = Detection::empty(60, 60);
        detection.lines.push([0, 0, 50, 50]);

        let annotated = plot_segments(&image, &single(green_range(), detection)).unwrap();

        assert_eq!(*annotated.get_pixel(25, 25), GREEN);
        assert_eq!(*annotated.get_pixel(28, 25), BLACK);
        assert_eq!(*annotated.get_pixel(25, 28), BLACK);
        assert_eq!(*annotated.get_pixel(40, 10), BACKGROUND);
    }

    #[test]
    fn later_ranges_are_drawn_on_top() {
        let image = canvas(60, 20);
        let red = ColorRange::new("red", [0.0; 3], [0.0; 3]).with_representative([0.0, 255.0, 255.0]);

        let mut first = Detection::empty(60, 20);
        first.lines.push([5, 10, 55, 10]);
        let second = first.clone();

        let set: DetectionSet = [(green_range(), first.clone()), (red.clone(), second.clone())]
            .into_iter()
            .collect();
        assert_eq!(*plot_segments(&image, &set).unwrap().get_pixel(30, 10), Rgb([255, 0, 0]));

        let set: DetectionSet = [(red, second), (green_range(), first)].into_iter().collect();
        assert_eq!(*plot_segments(&image, &set).unwrap().get_pixel(30, 10), GREEN);
    }

    #[test]
    fn mismatched_normals_are_rejected() {
        let image = canvas(20, 20);
        let mut detection = Detection::empty(20, 20);
        detection.normals.push(Point::new(0.0, 1.0));

        assert_eq!(
            plot_segments(&image, &single(green_range(), detection)),
            Err(AnnotateError::InvalidDetection {
                range: "green".to_string(),
                centers: 0,
                normals: 1,
            })
        );
    }

    #[test]
    fn invalid_representative_is_rejected_even_without_strokes() {
        let image = canvas(20, 20);
        let bad = ColorRange::new("bad", [0.0; 3], [0.0; 3]).with_representative([200.0, 0.0, 0.0]);
        let result = plot_segments(&image, &single(bad, Detection::empty(20, 20)));
        assert!(matches!(result, Err(AnnotateError::InvalidColorRange { .. })));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let image = canvas(60, 60);
        let mut detection = Detection::empty(60, 60);
        detection.lines.push([3, 40, 57, 12]);
        detection.centers.push(Point::new(30.0, 26.0));
        detection.normals.push(Point::new(0.6, 0.8));
        let set = single(green_range(), detection);

        let first = plot_segments(&image, &set).unwrap();
        let second = plot_segments(&image, &set).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, image);
    }

    #[test]
    fn stats_box_outline_and_markers() {
        let image = canvas(160, 120);
        let annotated = plot_segments_with_stats(
            &image,
            &DetectionSet::new(),
            (100.0, 80.0),
            (20.0, 10.0),
            [0.6, 0.7, 0.1, 0.1],
            &StatsOptions::default(),
        )
        .unwrap();

        // sampled away from the label rows, which overlap parts of the outline
        assert_eq!(*annotated.get_pixel(30, 80), WHITE);
        assert_eq!(*annotated.get_pixel(100, 40), WHITE);
        assert_eq!(*annotated.get_pixel(20, 70), WHITE);
        // the bottom edge is never closed
        assert_eq!(*annotated.get_pixel(60, 10), BACKGROUND);

        assert!(has_color_near(&annotated, (100, 80), BLUE));
        assert!(has_color_near(&annotated, (20, 10), GREEN));
        assert!(has_color_near(&annotated, (80, 100), BLUE));
        assert!(has_color_near(&annotated, (10, 20), GREEN));
    }

    fn greenish_pixels(image: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
        xs.flat_map(|x| ys.clone().map(move |y| (x, y)))
            .filter(|&(x, y)| {
                let p = image.get_pixel(x, y);
                i32::from(p[1]) > i32::from(p[0]) + 20 && i32::from(p[1]) > i32::from(p[2]) + 20
            })
            .count()
    }

    #[test]
    fn stats_labels_are_rendered_with_the_bundled_font() {
        let image = canvas(160, 120);
        let annotated = plot_segments_with_stats(
            &image,
            &DetectionSet::new(),
            (100.0, 80.0),
            (20.0, 10.0),
            [0.6, 0.7, 0.1, 0.1],
            &StatsOptions::default(),
        )
        .unwrap();

        // "area: 5600" hangs above its baseline at (40, 60)
        assert!(greenish_pixels(&annotated, 40..100, 48..56) > 0);
        // "[100,80], " hangs above its baseline at (60, 80)
        assert!(greenish_pixels(&annotated, 60..100, 68..76) > 0);
        // nothing is written above the topmost label
        assert_eq!(greenish_pixels(&annotated, 40..100, 0..28), 0);

        let explicit = StatsOptions {
            font: Some(label_font().unwrap()),
            ..StatsOptions::default()
        };
        let with_explicit_font = plot_segments_with_stats(
            &image,
            &DetectionSet::new(),
            (100.0, 80.0),
            (20.0, 10.0),
            [0.6, 0.7, 0.1, 0.1],
            &explicit,
        )
        .unwrap();
        assert_eq!(with_explicit_font, annotated);
    }

    #[test]
    fn repeated_stats_calls_are_identical() {
        let image = canvas(160, 120);
        let mut detection = Detection::empty(160, 120);
        detection.lines.push([110, 30, 150, 90]);
        detection.centers.push(Point::new(130.0, 60.0));
        detection.normals.push(Point::new(0.8, -0.6));
        let set = single(green_range(), detection);

        let render = || {
            plot_segments_with_stats(
                &image,
                &set,
                (100.0, 80.0),
                (20.0, 10.0),
                [0.6, 0.7, 0.1, 0.1],
                &StatsOptions::default(),
            )
            .unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn extreme_coordinates_do_not_panic() {
        let image = canvas(40, 30);
        let mut detection = Detection::empty(40, 30);
        detection.lines.push([i32::MIN, 5, i32::MAX, 5]);
        detection.centers.push(Point::new(10.0, 20.0));
        detection.normals.push(Point::new(1e30, 0.0));

        let annotated = plot_segments(&image, &single(green_range(), detection)).unwrap();
        assert_eq!(*annotated.get_pixel(0, 5), GREEN);
        assert_eq!(*annotated.get_pixel(39, 5), GREEN);
        assert_eq!(*annotated.get_pixel(30, 20), BLACK);
    }

    #[test]
    fn stats_quirks_can_be_switched_off() {
        let image = canvas(160, 120);
        let options = StatsOptions {
            quirks: StatsQuirks {
                degenerate_edge: false,
                swapped_markers: false,
            },
            ..StatsOptions::default()
        };
        let annotated = plot_segments_with_stats(
            &image,
            &DetectionSet::new(),
            (100.0, 80.0),
            (20.0, 10.0),
            [0.6, 0.7, 0.1, 0.1],
            &options,
        )
        .unwrap();

        assert_eq!(*annotated.get_pixel(60, 10), WHITE);
        assert!(has_color_near(&annotated, (100, 80), BLUE));
        assert!(!has_color_near(&annotated, (80, 100), BLUE));
        assert!(!has_color_near(&annotated, (10, 20), GREEN));
    }

    #[test]
    fn stats_overlay_keeps_segments() {
        let image = canvas(160, 120);
        let mut detection = Detection::empty(160, 120);
        detection.lines.push([120, 20, 150, 20]);
        let set = single(green_range(), detection);

        let plain = plot_segments(&image, &set).unwrap();
        let with_stats = plot_segments_with_stats(
            &image,
            &set,
            (100.0, 80.0),
            (20.0, 10.0),
            [0.6, 0.7, 0.1, 0.1],
            &StatsOptions::default(),
        )
        .unwrap();

        assert_eq!(*with_stats.get_pixel(135, 20), GREEN);
        assert_eq!(plain.get_pixel(135, 20), with_stats.get_pixel(135, 20));
    }

    #[test]
    fn stats_fail_like_plot_segments() {
        let image = canvas(20, 20);
        let mut detection = Detection::empty(20, 20);
        detection.centers.push(Point::new(1.0, 1.0));

        let result = plot_segments_with_stats(
            &image,
            &single(green_range(), detection),
            (10.0, 10.0),
            (2.0, 2.0),
            [0.5, 0.5, 0.1, 0.1],
            &StatsOptions::default(),
        );
        assert!(matches!(result, Err(AnnotateError::InvalidDetection { .. })));
    }
}
