use num_traits::ToPrimitive;

/// The axis-aligned statistics box drawn by
/// [`plot_segments_with_stats`](crate::segments::plot_segments_with_stats),
/// with its corners truncated to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBox {
    pub x_max: i32,
    pub y_max: i32,
    pub x_min: i32,
    pub y_min: i32,
}

/// The statistics box expressed in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedExtent {
    pub x_max: f32,
    pub y_max: f32,
    pub x_min: f32,
    pub y_min: f32,
}

/// A line of text drawn with its baseline starting at `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLabel {
    pub text: String,
    pub origin: (i32, i32),
}

impl StatBox {
    /// Builds a box from its max and min corners.
    ///
    /// Coordinates are truncated toward zero. Values that do not fit in an `i32`
    /// (including NaN) become `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use line_debug_overlay::rect::StatBox;
    ///
    /// let stat_box = StatBox::from_corners((100.7, 80.2), (20.0, 10.9));
    /// assert_eq!((stat_box.x_max, stat_box.y_max), (100, 80));
    /// assert_eq!((stat_box.x_min, stat_box.y_min), (20, 10));
    /// assert_eq!(stat_box.area(), 5600);
    /// ```
    pub fn from_corners<T>(max: (T, T), min: (T, T)) -> Self
    where
        T: Copy + ToPrimitive,
    {
        let truncate = |v: T| v.to_i32().unwrap_or(0);
        Self {
            x_max: truncate(max.0),
            y_max: truncate(max.1),
            x_min: truncate(min.0),
            y_min: truncate(min.1),
        }
    }

    /// Signed area in square pixels; negative if the corners are swapped on one axis.
    pub fn area(&self) -> i64 {
        (i64::from(self.x_max) - i64::from(self.x_min))
            * (i64::from(self.y_max) - i64::from(self.y_min))
    }

    /// The four strokes outlining the box.
    ///
    /// With `degenerate_edge` set, the last stroke runs from the min corner to
    /// itself and the bottom edge of the box stays open. Otherwise the last
    /// stroke closes the box.
    pub fn edges(&self, degenerate_edge: bool) -> [((i32, i32), (i32, i32)); 4] {
        let max = (self.x_max, self.y_max);
        let min = (self.x_min, self.y_min);
        let last = if degenerate_edge {
            (min, min)
        } else {
            (min, (self.x_max, self.y_min))
        };
        [
            (max, (self.x_min, self.y_max)),
            (max, (self.x_max, self.y_min)),
            (min, (self.x_min, self.y_max)),
            last,
        ]
    }

    /// Marker positions as `(max_markers, min_markers)`.
    ///
    /// With `swapped` set, each list also carries the corner with its x and y
    /// exchanged.
    pub fn markers(&self, swapped: bool) -> (Vec<(i32, i32)>, Vec<(i32, i32)>) {
        let mut max = vec![(self.x_max, self.y_max)];
        let mut min = vec![(self.x_min, self.y_min)];
        if swapped {
            max.push((self.y_max, self.x_max));
            min.push((self.y_min, self.x_min));
        }
        (max, min)
    }

    /// The six text labels describing this box and its normalized counterpart.
    pub fn labels(&self, normalized: &NormalizedExtent) -> [StatLabel; 6] {
        let label = |text: String, origin: (i32, i32)| StatLabel { text, origin };
        [
            label(format!("[{},{}], ", self.x_max, self.y_max), (60, 80)),
            label(format!("[{},{}]", self.x_min, self.y_min), (20, 40)),
            label(
                format!("normalized: [{:?},{:?}], ", normalized.x_max, normalized.y_max),
                (60, 85),
            ),
            label(
                format!("[{:?},{:?}]", normalized.x_min, normalized.y_min),
                (20, 45),
            ),
            label(format!("area: {}", self.area()), (40, 60)),
            label(format!("normalized area: {:?}", normalized.area()), (40, 65)),
        ]
    }
}

impl NormalizedExtent {
    pub fn area(&self) -> f32 {
        (self.x_max - self.x_min) * (self.y_max - self.y_min)
    }
}

impl From<[f32; 4]> for NormalizedExtent {
    /// Reads the values in `[x_max, y_max, x_min, y_min]` order.
    fn from([x_max, y_max, x_min, y_min]: [f32; 4]) -> Self {
        Self {
            x_max,
            y_max,
            x_min,
            y_min,
        }
    }
}
