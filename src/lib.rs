//! Debug overlays for the results of a color-filtering line detector, built on [imageproc].
//!
//! Given an image and the detections found for each color range, the functions here
//! draw segments, normals, a statistics box and color-coded masks onto a copy of the
//! image. Nothing is detected or estimated; every input is an already computed result.
//!
//! - [`segments::plot_segments`] draws segments and their normals.
//! - [`segments::plot_segments_with_stats`] adds a labelled statistics box.
//! - [`maps::plot_color_maps`] blends the per-range masks over a grayscale copy.

pub mod colors;
mod detection;
mod drawing;
mod error;
pub mod maps;
pub mod rect;
pub mod segments;

pub use detection::{ColorRange, Detection, DetectionSet};
pub use error::{AnnotateError, Result};
