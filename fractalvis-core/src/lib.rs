pub mod bounds;
pub mod error;
pub mod params;
pub mod pixel;
pub mod request;
pub mod zoom;

// Re-export primary types for convenience.
pub use bounds::Bounds;
pub use error::{CoreError, ParamError, ParamField};
pub use params::{FractalKind, HueRange, KindParams, RawParams, RenderParameters};
pub use pixel::{PixelFormat, PixelPoint, PixelRect, ViewportSize};
pub use request::RenderRequest;
pub use zoom::{forward_zoom, inverse_zoom, zoom, ZoomDirection};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
