use thiserror::Error;

/// Errors raised while annotating an image with detection results.
///
/// Every operation validates its inputs before drawing anything, so an error
/// never comes with a partially annotated image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnotateError {
    /// A detection has a different number of centers and normals.
    #[error("detection for color range `{range}` has {centers} centers but {normals} normals")]
    InvalidDetection {
        range: String,
        centers: usize,
        normals: usize,
    },

    /// A detection mask does not cover the source image exactly.
    #[error(
        "mask for color range `{range}` is {}x{}, expected {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        range: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A representative color lies outside the 8-bit HSV domain.
    #[error("representative {representative:?} of color range `{range}` is not a valid 8-bit HSV color")]
    InvalidColorRange {
        range: String,
        representative: [f32; 3],
    },

    /// The font used for text labels could not be parsed.
    #[error("label font is not a valid TrueType or OpenType font")]
    InvalidFont,
}

pub type Result<T> = std::result::Result<T, AnnotateError>;
