pub mod buffer;
pub mod engine;
pub mod error;
pub mod export;
pub mod renderer;

pub use buffer::{assemble, Image};
pub use engine::{Engine, EngineBuffer, RawEngineBuffer, Region};
pub use error::{EngineFailure, RenderError};
pub use export::{export_png, ExportMetadata};
pub use renderer::{render, RenderResult};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
