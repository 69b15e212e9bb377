use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller misuse of one of the core operations. These are never produced for empty states such
/// as "no path selected", only for arguments that cannot be processed at all.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// A resampling request asked for fewer than two samples.
    TooFewSamples(usize),

    /// A path was given with fewer than two vertices.
    NotEnoughPoints(usize),

    /// The path vertices do not all have the same number of coordinates.
    RaggedPath,

    /// The path and the image layer disagree on the number of spatial axes.
    DimensionMismatch { path: usize, layer: usize },

    /// A per-axis scale was zero or not finite.
    InvalidScale(Vec<f64>),

    /// A sampling or triangulation step of zero was requested.
    ZeroStep,

    /// A refresh interval of zero was requested.
    ZeroInterval,

    /// An array had a shape the operation cannot work with.
    BadShape(Vec<usize>),
}

impl Display for InvalidInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::TooFewSamples(n) => {
                write!(f, "at least 2 samples are required, got {}", n)
            }
            InvalidInput::NotEnoughPoints(n) => {
                write!(f, "a path needs at least 2 points, got {}", n)
            }
            InvalidInput::RaggedPath => write!(f, "path points have differing dimensions"),
            InvalidInput::DimensionMismatch { path, layer } => write!(
                f,
                "path has {} dimensions but the layer has {} spatial axes",
                path, layer
            ),
            InvalidInput::InvalidScale(s) => write!(f, "invalid layer scale {:?}", s),
            InvalidInput::ZeroStep => write!(f, "step size must be at least 1"),
            InvalidInput::ZeroInterval => write!(f, "refresh interval must be greater than zero"),
            InvalidInput::BadShape(s) => write!(f, "unsupported array shape {:?}", s),
        }
    }
}

impl Error for InvalidInput {}
