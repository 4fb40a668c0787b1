use image::GrayImage;
use imageproc::point::Point;

use crate::error::{AnnotateError, Result};

/// A named interval in 8-bit HSV space used by the line detector to filter pixels.
///
/// Only `representative` matters for drawing; `low` and `high` are carried so a
/// range can be reported the way the detector configured it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRange {
    pub name: String,
    pub low: [f32; 3],
    pub high: [f32; 3],
    pub representative: [f32; 3],
}

impl ColorRange {
    /// Creates a range whose representative is the midpoint of `low` and `high`.
    pub fn new(name: impl Into<String>, low: [f32; 3], high: [f32; 3]) -> Self {
        let representative = [
            (low[0] + high[0]) / 2.0,
            (low[1] + high[1]) / 2.0,
            (low[2] + high[2]) / 2.0,
        ];
        Self {
            name: name.into(),
            low,
            high,
            representative,
        }
    }

    pub fn with_representative(mut self, representative: [f32; 3]) -> Self {
        self.representative = representative;
        self
    }
}

/// Line segments found in an image by filtering it against one [`ColorRange`].
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Segment centers in pixel coordinates, index-aligned with `normals`.
    pub centers: Vec<Point<f32>>,
    /// Unit normals of the segments.
    pub normals: Vec<Point<f32>>,
    /// Segment endpoints as `[x1, y1, x2, y2]`.
    pub lines: Vec<[i32; 4]>,
    /// Pixels that fell inside the color range (nonzero means inside).
    pub map: GrayImage,
}

impl Detection {
    /// A detection with no segments and an all-zero mask of the given size.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            centers: Vec::new(),
            normals: Vec::new(),
            lines: Vec::new(),
            map: GrayImage::new(width, height),
        }
    }

    pub(crate) fn check_normals(&self, range: &ColorRange) -> Result<()> {
        if self.centers.len() != self.normals.len() {
            return Err(AnnotateError::InvalidDetection {
                range: range.name.clone(),
                centers: self.centers.len(),
                normals: self.normals.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_map(&self, range: &ColorRange, expected: (u32, u32)) -> Result<()> {
        let actual = self.map.dimensions();
        if actual != expected {
            return Err(AnnotateError::DimensionMismatch {
                range: range.name.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Detections keyed by color range, drawn in insertion order.
///
/// Where strokes or masks of different ranges overlap, the range pushed last
/// ends up on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionSet {
    entries: Vec<(ColorRange, Detection)>,
}

impl DetectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, range: ColorRange, detection: Detection) {
        self.entries.push((range, detection));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (ColorRange, Detection)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ColorRange, Detection)> for DetectionSet {
    fn from_iter<I: IntoIterator<Item = (ColorRange, Detection)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a (ColorRange, Detection);
    type IntoIter = std::slice::Iter<'a, (ColorRange, Detection)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
