use imageproc::{
    drawing::{Canvas, draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut},
    point::Point,
};

/// Draws a line segment `thickness` pixels wide with round caps.
///
/// The body is a filled quadrilateral offset by half the thickness on each side
/// of the segment; the caps are filled circles of radius `thickness / 2`. A
/// thickness of one or less falls back to a plain Bresenham line. Segments are
/// clipped to the canvas (plus a margin wider than the stroke) first, so any
/// `i32` endpoints are accepted.
pub(crate) fn draw_thick_line_segment_mut<C>(
    canvas: &mut C,
    start: (i32, i32),
    end: (i32, i32),
    thickness: u32,
    color: C::Pixel,
) where
    C: Canvas,
{
    let (width, height) = canvas.dimensions();
    let margin = f64::from(thickness) + 1.0;
    let Some((start, end)) = clip_segment(
        (f64::from(start.0), f64::from(start.1)),
        (f64::from(end.0), f64::from(end.1)),
        (-margin, -margin),
        (f64::from(width) - 1.0 + margin, f64::from(height) - 1.0 + margin),
    ) else {
        return;
    };
    let start = (start.0.round() as i32, start.1.round() as i32);
    let end = (end.0.round() as i32, end.1.round() as i32);

    if thickness <= 1 {
        draw_line_segment_mut(
            canvas,
            (start.0 as f32, start.1 as f32),
            (end.0 as f32, end.1 as f32),
            color,
        );
        return;
    }

    let cap_radius = (thickness / 2) as i32;
    let dx = end.0 as f32 - start.0 as f32;
    let dy = end.1 as f32 - start.1 as f32;
    let length = dx.hypot(dy);

    if length < f32::EPSILON {
        draw_filled_circle_mut(canvas, start, cap_radius, color);
        return;
    }

    let half = thickness as f32 / 2.0;
    let nx = -dy / length * half;
    let ny = dx / length * half;
    let corner = |p: (i32, i32), sign: f32| {
        Point::new(
            (p.0 as f32 + sign * nx).round() as i32,
            (p.1 as f32 + sign * ny).round() as i32,
        )
    };
    let body = [
        corner(start, 1.0),
        corner(end, 1.0),
        corner(end, -1.0),
        corner(start, -1.0),
    ];

    // draw_polygon_mut rejects closed paths.
    if body[0] != body[3] {
        draw_polygon_mut(canvas, &body, color);
    } else {
        draw_line_segment_mut(
            canvas,
            (start.0 as f32, start.1 as f32),
            (end.0 as f32, end.1 as f32),
            color,
        );
    }

    draw_filled_circle_mut(canvas, start, cap_radius, color);
    draw_filled_circle_mut(canvas, end, cap_radius, color);
}

/// Liang-Barsky clipping of a segment against an axis-aligned box.
///
/// Returns `None` when no part of the segment lies inside the box.
fn clip_segment(
    start: (f64, f64),
    end: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, start.0 - min.0),
        (dx, max.0 - start.0),
        (-dy, start.1 - min.1),
        (dy, max.1 - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some((
        (start.0 + t0 * dx, start.1 + t0 * dy),
        (start.0 + t1 * dx, start.1 + t1 * dy),
    ))
}
