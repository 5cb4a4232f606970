//! Mapping between pixel-space selections and complex-plane bounds.
//!
//! Pixel `(0, 0)` corresponds to `(x_min, y_min)` and pixel
//! `(width, height)` to `(x_max, y_max)`; the engine samples rows in the
//! same orientation, so no axis flip happens here.

use tracing::debug;

use crate::bounds::Bounds;
use crate::error::CoreError;
use crate::pixel::{PixelRect, ViewportSize};

/// Which way a selection drag zooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// The selection becomes the whole view.
    In,
    /// The whole view shrinks into the selection.
    Out,
}

/// Zoom in `direction`, see [`forward_zoom`] and [`inverse_zoom`].
pub fn zoom(
    direction: ZoomDirection,
    bounds: &Bounds,
    selection: &PixelRect,
    viewport: ViewportSize,
) -> crate::Result<Bounds> {
    match direction {
        ZoomDirection::In => forward_zoom(bounds, selection, viewport),
        ZoomDirection::Out => inverse_zoom(bounds, selection, viewport),
    }
}

/// Map each edge of `selection` from pixel space into `bounds`.
///
/// A selection smaller than the viewport yields a tighter rectangle.
pub fn forward_zoom(
    bounds: &Bounds,
    selection: &PixelRect,
    viewport: ViewportSize,
) -> crate::Result<Bounds> {
    check_inputs(selection, viewport)?;

    let (dx, dy) = (bounds.width(), bounds.height());
    let new = Bounds::new(
        selection.x0 / viewport.width * dx + bounds.x_min(),
        selection.x1 / viewport.width * dx + bounds.x_min(),
        selection.y0 / viewport.height * dy + bounds.y_min(),
        selection.y1 / viewport.height * dy + bounds.y_min(),
    )?;
    debug!(?new, "Zoomed in");
    Ok(new)
}

/// Extrapolate `bounds` outward so that the current view fits into `selection`.
///
/// Exact algebraic inverse of [`forward_zoom`]: zooming back in with the same
/// selection restores the original bounds up to rounding.
pub fn inverse_zoom(
    bounds: &Bounds,
    selection: &PixelRect,
    viewport: ViewportSize,
) -> crate::Result<Bounds> {
    check_inputs(selection, viewport)?;

    let (x0, x1, y0, y1) = (selection.x0, selection.x1, selection.y0, selection.y1);
    let x_min = (x1 * bounds.x_min() - x0 * bounds.x_max()) / (x1 - x0);
    let x_max = x_min + viewport.width * bounds.width() / (x1 - x0);
    let y_min = (y1 * bounds.y_min() - y0 * bounds.y_max()) / (y1 - y0);
    let y_max = y_min + viewport.height * bounds.height() / (y1 - y0);

    let new = Bounds::new(x_min, x_max, y_min, y_max)?;
    debug!(?new, "Zoomed out");
    Ok(new)
}

fn check_inputs(selection: &PixelRect, viewport: ViewportSize) -> crate::Result<()> {
    viewport.validate()?;
    if selection.is_degenerate() {
        return Err(CoreError::DegenerateSelection {
            width: selection.width(),
            height: selection.height(),
        });
    }
    Ok(())
}
