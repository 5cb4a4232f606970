use tracing::debug;

use crate::bounds::Bounds;
use crate::params::{RawParams, RenderParameters};
use crate::pixel::{PixelFormat, ViewportSize};

/// Everything the engine needs for one render, already validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub bounds: Bounds,
    pub width: u32,
    pub height: u32,
    pub params: RenderParameters,
}

impl RenderRequest {
    pub fn pixel_format(&self) -> PixelFormat {
        self.params.pixel_format()
    }

    /// Length in bytes the engine must return for this request, `None` if
    /// it does not fit in `usize`.
    pub fn expected_len(&self) -> Option<usize> {
        self.pixel_format().buffer_len(self.width, self.height)
    }
}

/// Combine the current bounds, the on-screen size and the user's inputs.
///
/// A viewport smaller than one pixel is checked first and reported as
/// [`CoreError::ViewportTooSmall`](crate::CoreError::ViewportTooSmall);
/// parameter failures come back as [`CoreError::Param`](crate::CoreError::Param).
pub fn build(
    bounds: Bounds,
    viewport: ViewportSize,
    raw: &RawParams,
) -> crate::Result<RenderRequest> {
    let (width, height) = viewport.to_pixels()?;
    let params = raw.parse()?;
    debug!(
        kind = %params.fractal_kind(),
        width,
        height,
        max_iter = params.max_iterations(),
        "Built render request"
    );
    Ok(RenderRequest {
        bounds,
        width,
        height,
        params,
    })
}
