use fractalvis_core::{FractalKind, PixelFormat};
use thiserror::Error;

/// Errors originating from the engine call, buffer assembly, or export.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("engine call failed for {kind}: {source}")]
    Engine {
        kind: FractalKind,
        #[source]
        source: EngineFailure,
    },

    #[error(
        "buffer length mismatch: {width}×{height} {format} needs {expected} bytes, got {actual}"
    )]
    LengthMismatch {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] fractalvis_core::CoreError),
}

/// Failure reported by the computation engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EngineFailure(pub String);

impl EngineFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
