use std::time::{Duration, Instant};

use tracing::{debug, info};

use fractalvis_core::RenderRequest;

use crate::buffer::{assemble, Image};
use crate::engine::{self, Engine};

/// The result of one engine round trip.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub image: Image,
    pub elapsed: Duration,
}

/// Run `request` through `engine` and assemble the returned buffer.
///
/// The engine buffer never outlives this call: it is copied into the
/// [`Image`] and released inside [`assemble`]. Any engine failure or a
/// buffer of the wrong length is returned as an error.
pub fn render<E: Engine + ?Sized>(
    engine: &E,
    request: &RenderRequest,
) -> crate::Result<RenderResult> {
    let start = Instant::now();
    info!(
        kind = %request.params.fractal_kind(),
        "Recalculating to viewport of x: {:.6} to {:.6}, y: {:.6} to {:.6}",
        request.bounds.x_min(),
        request.bounds.x_max(),
        request.bounds.y_min(),
        request.bounds.y_max(),
    );

    let buffer = engine::call(engine, request)?;
    let image = assemble(buffer, request.width, request.height, request.pixel_format())?;

    let elapsed = start.elapsed();
    debug!(
        width = image.width(),
        height = image.height(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Render complete"
    );
    Ok(RenderResult { image, elapsed })
}
