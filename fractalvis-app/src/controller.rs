//! The viewport controller: turns pointer gestures into bounds changes and
//! re-renders.
//!
//! ```text
//!   Idle --button down--> Selecting --move--> Selecting
//!   Selecting --left up--> Idle (zoom in, recompute)
//!   Selecting --right up--> Idle (zoom out, recompute)
//!   any --reset--> same state (bounds := default, recompute)
//! ```

use std::path::Path;

use tracing::{debug, error, info, warn};

use fractalvis_core::{
    request, zoom, Bounds, CoreError, PixelPoint, PixelRect, RawParams, RenderRequest,
    ViewportSize, ZoomDirection,
};
use fractalvis_render::{export_png, render, Engine, ExportMetadata, Image, RenderError};

use crate::preferences::AppPreferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SelectionState {
    Idle,
    /// A drag is in progress; pointer input is captured until release.
    Selecting { anchor: PixelPoint, selection: PixelRect },
}

/// What a gesture did to the displayed image.
#[derive(Debug, PartialEq)]
pub enum Outcome<'a> {
    /// A fresh image replaced the displayed one.
    Rendered(&'a Image),
    /// The recompute was abandoned; the displayed image is unchanged.
    Skipped(CoreError),
    /// The event had nothing to act on.
    Ignored,
}

impl Outcome<'_> {
    pub fn image(&self) -> Option<&Image> {
        match self {
            Self::Rendered(image) => Some(image),
            _ => None,
        }
    }
}

/// Owns the session's bounds and drives the render pipeline.
pub struct ViewportController<E> {
    engine: E,
    bounds: Bounds,
    viewport: ViewportSize,
    params: RawParams,
    state: SelectionState,
    image: Option<Image>,
    last_request: Option<RenderRequest>,
}

impl<E: Engine> ViewportController<E> {
    /// Start a session on the default bounds with default parameters.
    pub fn new(engine: E, viewport: ViewportSize) -> Self {
        Self {
            engine,
            bounds: Bounds::DEFAULT,
            viewport,
            params: RawParams::default(),
            state: SelectionState::Idle,
            image: None,
            last_request: None,
        }
    }

    /// Start a session from saved preferences.
    pub fn from_preferences(engine: E, viewport: ViewportSize, prefs: &AppPreferences) -> Self {
        Self {
            bounds: prefs.starting_bounds(),
            params: prefs.default_params.clone(),
            ..Self::new(engine, viewport)
        }
    }

    /// Record the current view so the next session can restore it.
    pub fn snapshot_into(&self, prefs: &mut AppPreferences) {
        prefs.last_bounds = Some(self.bounds);
        prefs.default_params = self.params.clone();
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The image currently on display, if any render has succeeded.
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn params(&self) -> &RawParams {
        &self.params
    }

    /// Replace the parameter text. Takes effect on the next recompute.
    pub fn set_params(&mut self, params: RawParams) {
        self.params = params;
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Record a new on-screen size. Takes effect on the next recompute.
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// Whether a drag has captured pointer input.
    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. })
    }

    /// The selection box to draw, while a drag is in progress.
    pub fn selection(&self) -> Option<PixelRect> {
        match self.state {
            SelectionState::Selecting { selection, .. } => Some(selection),
            SelectionState::Idle => None,
        }
    }

    /// Render the current bounds with the current parameters.
    ///
    /// Invalid parameters or a too-small viewport leave the displayed image
    /// alone and come back as [`Outcome::Skipped`]. Engine failures are errors.
    pub fn on_recompute(&mut self) -> Result<Outcome<'_>, RenderError> {
        let request = match request::build(self.bounds, self.viewport, &self.params) {
            Ok(request) => request,
            Err(e @ CoreError::Param(_)) => {
                warn!("Failed to parse values: {e}");
                return Ok(Outcome::Skipped(e));
            }
            Err(e) => {
                debug!("Skipping recompute: {e}");
                return Ok(Outcome::Skipped(e));
            }
        };

        let result = render(&self.engine, &request).map_err(|e| {
            error!("Render failed: {e}");
            e
        })?;
        self.last_request = Some(request);
        Ok(Outcome::Rendered(self.image.insert(result.image)))
    }

    /// Begin a selection drag at `point`, capturing pointer input.
    pub fn on_drag_start(&mut self, point: PixelPoint) {
        self.state = SelectionState::Selecting {
            anchor: point,
            selection: PixelRect::from_corners(point, point),
        };
    }

    /// Track the pointer during a drag and return the box to draw.
    pub fn on_drag_move(&mut self, point: PixelPoint) -> Option<PixelRect> {
        match &mut self.state {
            SelectionState::Selecting { anchor, selection } => {
                *selection = PixelRect::from_corners(*anchor, point);
                Some(*selection)
            }
            SelectionState::Idle => None,
        }
    }

    /// Finish a drag: left zooms in to the selection, right zooms out of it.
    pub fn on_drag_end(
        &mut self,
        button: MouseButton,
        point: PixelPoint,
    ) -> Result<Outcome<'_>, RenderError> {
        let direction = match button {
            MouseButton::Left => ZoomDirection::In,
            MouseButton::Right => ZoomDirection::Out,
            MouseButton::Middle => return Ok(Outcome::Ignored),
        };
        let SelectionState::Selecting { anchor, .. } =
            std::mem::replace(&mut self.state, SelectionState::Idle)
        else {
            return Ok(Outcome::Ignored);
        };

        let selection = PixelRect::from_corners(anchor, point);
        match zoom(direction, &self.bounds, &selection, self.viewport) {
            Ok(bounds) => {
                self.bounds = bounds;
                self.on_recompute()
            }
            Err(e) => {
                debug!(?selection, "Selection not applied: {e}");
                Ok(Outcome::Skipped(e))
            }
        }
    }

    /// Return to `[-2, 2] × [-2, 2]` and recompute.
    pub fn on_reset_requested(&mut self) -> Result<Outcome<'_>, RenderError> {
        info!("Resetting view");
        self.bounds = Bounds::DEFAULT;
        self.on_recompute()
    }

    /// Route a button press: middle resets, anything else starts a drag.
    pub fn on_button_down(
        &mut self,
        button: MouseButton,
        point: PixelPoint,
    ) -> Result<Outcome<'_>, RenderError> {
        match button {
            MouseButton::Middle => self.on_reset_requested(),
            MouseButton::Left | MouseButton::Right => {
                self.on_drag_start(point);
                Ok(Outcome::Ignored)
            }
        }
    }

    /// Write the displayed image to `path` as a PNG with render metadata.
    ///
    /// Returns `Ok(false)` when nothing has been rendered yet.
    pub fn export_png(&self, path: &Path) -> Result<bool, RenderError> {
        let (Some(image), Some(request)) = (&self.image, &self.last_request) else {
            return Ok(false);
        };
        export_png(image, path, &ExportMetadata::from_request(request))?;
        info!("Exported image to {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use fractalvis_core::{FractalKind, HueRange, ParamError, ParamField};
    use fractalvis_render::{EngineBuffer, EngineFailure, Region};

    use super::*;

    /// Returns a constant buffer of the right size and counts calls.
    #[derive(Default)]
    struct CountingEngine {
        calls: Cell<u32>,
        last_region: Cell<Option<Region>>,
    }

    impl CountingEngine {
        fn fill(&self, region: &Region, bpp: u32) -> Result<EngineBuffer, EngineFailure> {
            self.calls.set(self.calls.get() + 1);
            self.last_region.set(Some(*region));
            let len = (region.width * region.height * bpp) as usize;
            Ok(EngineBuffer::from_vec(vec![self.calls.get() as u8; len]))
        }
    }

    impl Engine for CountingEngine {
        fn mandelbrot_grayscale(
            &self,
            region: &Region,
            _: u32,
            _: f64,
            _: u8,
        ) -> Result<EngineBuffer, EngineFailure> {
            self.fill(region, 1)
        }

        fn mandelbrot_colored(
            &self,
            region: &Region,
            _: u32,
            _: f64,
            _: HueRange,
        ) -> Result<EngineBuffer, EngineFailure> {
            self.fill(region, 3)
        }

        fn newton_basins(
            &self,
            region: &Region,
            _: u32,
            _: f64,
            _: u32,
            _: HueRange,
        ) -> Result<EngineBuffer, EngineFailure> {
            self.fill(region, 3)
        }
    }

    fn pt(x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(x, y)
    }

    fn controller(engine: &CountingEngine) -> ViewportController<&CountingEngine> {
        ViewportController::new(engine, ViewportSize::new(800.0, 800.0))
    }

    #[test]
    fn left_drag_zooms_in() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        c.on_drag_start(pt(100.0, 100.0));
        assert!(c.is_selecting());
        let outcome = c.on_drag_end(MouseButton::Left, pt(300.0, 300.0)).unwrap();
        assert!(outcome.image().is_some());

        let expected = Bounds::new(-1.5, -0.5, -1.5, -0.5).unwrap();
        assert!(c.bounds().approx_eq(&expected, 1e-12));
        assert!(!c.is_selecting());
        assert_eq!(engine.calls.get(), 1);
        assert_eq!(engine.last_region.get().unwrap().bounds, c.bounds());
    }

    #[test]
    fn right_drag_zooms_out() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        c.on_drag_start(pt(600.0, 600.0));
        c.on_drag_end(MouseButton::Right, pt(200.0, 200.0)).unwrap();

        let expected = Bounds::new(-4.0, 4.0, -4.0, 4.0).unwrap();
        assert!(c.bounds().approx_eq(&expected, 1e-12));
    }

    #[test]
    fn drag_move_tracks_normalized_box() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        assert_eq!(c.on_drag_move(pt(5.0, 5.0)), None);
        c.on_drag_start(pt(300.0, 200.0));
        let rect = c.on_drag_move(pt(100.0, 250.0)).unwrap();
        assert_eq!((rect.x0, rect.y0, rect.x1, rect.y1), (100.0, 200.0, 300.0, 250.0));
        assert_eq!(c.selection(), Some(rect));
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn click_without_drag_changes_nothing() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        c.on_drag_start(pt(250.0, 250.0));
        let outcome = c.on_drag_end(MouseButton::Left, pt(250.0, 250.0)).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Skipped(CoreError::DegenerateSelection { .. })
        ));
        assert_eq!(c.bounds(), Bounds::DEFAULT);
        assert!(!c.is_selecting());
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn flat_drag_changes_nothing() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        c.on_drag_start(pt(10.0, 40.0));
        c.on_drag_end(MouseButton::Right, pt(500.0, 40.0)).unwrap();
        assert_eq!(c.bounds(), Bounds::DEFAULT);
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn release_without_drag_is_ignored() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);
        let outcome = c.on_drag_end(MouseButton::Left, pt(1.0, 1.0)).unwrap();
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[test]
    fn middle_button_resets_from_anywhere() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        c.on_drag_start(pt(100.0, 100.0));
        c.on_drag_end(MouseButton::Left, pt(200.0, 300.0)).unwrap();
        assert_ne!(c.bounds(), Bounds::DEFAULT);

        let outcome = c.on_button_down(MouseButton::Middle, pt(0.0, 0.0)).unwrap();
        assert!(outcome.image().is_some());
        assert_eq!(c.bounds(), Bounds::new(-2.0, 2.0, -2.0, 2.0).unwrap());
        assert_eq!(engine.calls.get(), 2);
    }

    #[test]
    fn middle_release_keeps_selection() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);

        c.on_button_down(MouseButton::Left, pt(10.0, 10.0)).unwrap();
        let outcome = c.on_drag_end(MouseButton::Middle, pt(50.0, 50.0)).unwrap();
        assert_eq!(outcome, Outcome::Ignored);
        assert!(c.is_selecting());
    }

    #[test]
    fn bad_params_keep_previous_image() {
        let engine = CountingEngine::default();
        let mut c = controller(&engine);
        c.on_recompute().unwrap();
        let before = c.image().cloned();
        assert!(before.is_some());

        c.set_params(RawParams {
            max_iterations: "abc".into(),
            ..RawParams::default()
        });
        let outcome = c.on_recompute().unwrap();
        match outcome {
            Outcome::Skipped(CoreError::Param(err)) => {
                assert!(matches!(err, ParamError::Format { .. }));
                assert_eq!(err.field(), ParamField::MaxIterations);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(c.image().cloned(), before);
        assert_eq!(engine.calls.get(), 1);
    }

    #[test]
    fn tiny_viewport_is_a_no_op() {
        let engine = CountingEngine::default();
        let mut c = ViewportController::new(&engine, ViewportSize::new(f64::NAN, 600.0));
        let outcome = c.on_recompute().unwrap();
        assert!(matches!(outcome, Outcome::Skipped(CoreError::ViewportTooSmall { .. })));
        assert_eq!(engine.calls.get(), 0);
        assert!(c.image().is_none());
    }

    #[test]
    fn kind_selects_image_format() {
        let engine = CountingEngine::default();
        let mut c = ViewportController::new(&engine, ViewportSize::new(20.0, 10.0));
        c.set_params(RawParams {
            kind: FractalKind::Newton,
            ..RawParams::default()
        });
        let outcome = c.on_recompute().unwrap();
        let image = outcome.image().unwrap();
        assert_eq!(image.data().len(), 20 * 10 * 3);
    }

    #[test]
    fn preferences_round_trip_through_controller() {
        let engine = CountingEngine::default();
        let saved = Bounds::new(-0.2, 0.1, 0.6, 0.9).unwrap();
        let mut prefs = AppPreferences {
            last_bounds: Some(saved),
            ..AppPreferences::default()
        };
        prefs.default_params.max_iterations = "500".into();

        let mut c =
            ViewportController::from_preferences(&engine, ViewportSize::new(8.0, 8.0), &prefs);
        assert_eq!(c.bounds(), saved);
        assert_eq!(c.params().max_iterations, "500");

        c.on_reset_requested().unwrap();
        let mut out = AppPreferences::default();
        c.snapshot_into(&mut out);
        assert_eq!(out.last_bounds, Some(Bounds::DEFAULT));
        assert_eq!(out.default_params.max_iterations, "500");
    }
}
