use std::fmt;

use thiserror::Error;

/// Errors originating from the viewport and request layer.
///
/// Every variant is scoped to a single recompute attempt; none of them
/// invalidates the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("degenerate selection: {width}×{height} pixels")]
    DegenerateSelection { width: f64, height: f64 },

    #[error("viewport too small: {width}×{height} (must be finite and >= 1 pixel)")]
    ViewportTooSmall { width: f64, height: f64 },

    #[error("invalid bounds: {reason}")]
    InvalidBounds { reason: String },

    #[error(transparent)]
    Param(#[from] ParamError),
}

/// A user-supplied rendering parameter that failed to parse or validate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{field}: cannot parse {input:?} ({reason})")]
    Format {
        field: ParamField,
        input: String,
        reason: String,
    },

    #[error("{field}: {value} is out of range (expected {expected})")]
    Range {
        field: ParamField,
        value: String,
        expected: &'static str,
    },
}

impl ParamError {
    /// The field that failed.
    pub fn field(&self) -> ParamField {
        match self {
            Self::Format { field, .. } | Self::Range { field, .. } => *field,
        }
    }
}

/// Names of the numeric inputs accepted by the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    MaxIterations,
    Horizon,
    ShadesMax,
    RootCount,
    HueFromAngle,
    HueToAngle,
    Saturation,
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaxIterations => "max iterations",
            Self::Horizon => "horizon",
            Self::ShadesMax => "shades",
            Self::RootCount => "root count",
            Self::HueFromAngle => "hue from",
            Self::HueToAngle => "hue to",
            Self::Saturation => "saturation",
        };
        f.write_str(name)
    }
}
