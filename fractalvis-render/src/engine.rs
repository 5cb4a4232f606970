//! Boundary to the external fractal computation engine.
//!
//! The engine is a set of stateless functions: region and parameters in,
//! an owned byte buffer out. Buffers cross the boundary as a
//! [`RawEngineBuffer`] (pointer, length, capacity) and are adopted into an
//! [`EngineBuffer`], which releases the allocation exactly once on drop.

use std::fmt;
use std::time::Instant;

use tracing::debug;

use fractalvis_core::{Bounds, HueRange, KindParams, RenderRequest};

use crate::error::{EngineFailure, RenderError};

/// The rectangle and resolution an engine call samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub bounds: Bounds,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn of(request: &RenderRequest) -> Self {
        Self {
            bounds: request.bounds,
            width: request.width,
            height: request.height,
        }
    }
}

/// The three entry points of the computation engine.
///
/// Implementations must be free of side effects and keep no state between
/// calls. Grayscale returns `width * height` bytes; the colour variants
/// return `width * height * 3` bytes in R, G, B order, row-major.
pub trait Engine {
    fn mandelbrot_grayscale(
        &self,
        region: &Region,
        max_iterations: u32,
        horizon: f64,
        shades_max: u8,
    ) -> Result<EngineBuffer, EngineFailure>;

    fn mandelbrot_colored(
        &self,
        region: &Region,
        max_iterations: u32,
        horizon: f64,
        hue: HueRange,
    ) -> Result<EngineBuffer, EngineFailure>;

    fn newton_basins(
        &self,
        region: &Region,
        max_iterations: u32,
        horizon: f64,
        root_count: u32,
        hue: HueRange,
    ) -> Result<EngineBuffer, EngineFailure>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn mandelbrot_grayscale(
        &self,
        region: &Region,
        max_iterations: u32,
        horizon: f64,
        shades_max: u8,
    ) -> Result<EngineBuffer, EngineFailure> {
        (**self).mandelbrot_grayscale(region, max_iterations, horizon, shades_max)
    }

    fn mandelbrot_colored(
        &self,
        region: &Region,
        max_iterations: u32,
        horizon: f64,
        hue: HueRange,
    ) -> Result<EngineBuffer, EngineFailure> {
        (**self).mandelbrot_colored(region, max_iterations, horizon, hue)
    }

    fn newton_basins(
        &self,
        region: &Region,
        max_iterations: u32,
        horizon: f64,
        root_count: u32,
        hue: HueRange,
    ) -> Result<EngineBuffer, EngineFailure> {
        (**self).newton_basins(region, max_iterations, horizon, root_count, hue)
    }
}

/// Dispatch `request` to the matching engine entry point.
pub fn call<E: Engine + ?Sized>(
    engine: &E,
    request: &RenderRequest,
) -> crate::Result<EngineBuffer> {
    let region = Region::of(request);
    let p = &request.params;
    let start = Instant::now();

    let (max_iterations, horizon) = (p.max_iterations(), p.horizon());

    let result = match p.kind_params() {
        KindParams::MandelbrotGrayscale { shades_max } => {
            engine.mandelbrot_grayscale(&region, max_iterations, horizon, shades_max)
        }
        KindParams::MandelbrotColored { hue } => {
            engine.mandelbrot_colored(&region, max_iterations, horizon, hue)
        }
        KindParams::Newton { root_count, hue } => {
            engine.newton_basins(&region, max_iterations, horizon, root_count, hue)
        }
    };

    match result {
        Ok(buffer) => {
            debug!(
                kind = %p.fractal_kind(),
                bytes = buffer.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Engine call finished"
            );
            Ok(buffer)
        }
        Err(source) => {
            debug!(kind = %p.fractal_kind(), "Engine call failed: {source}");
            Err(RenderError::Engine {
                kind: p.fractal_kind(),
                source,
            })
        }
    }
}

/// C layout of a byte buffer handed across the engine boundary.
///
/// The producer gives up ownership of the allocation; whoever receives it
/// must adopt it with [`EngineBuffer::from_raw`] exactly once.
#[repr(C)]
#[derive(Debug)]
pub struct RawEngineBuffer {
    pub ptr: *mut u8,
    pub len: u64,
    pub cap: u64,
}

/// An engine-owned byte buffer, released when dropped.
pub struct EngineBuffer {
    bytes: Vec<u8>,
}

impl EngineBuffer {
    /// Wrap a buffer produced in-process.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Adopt a buffer handed over by the engine.
    ///
    /// # Safety
    ///
    /// `raw` must describe a live allocation made by this process's global
    /// allocator as a `Vec<u8>` (as produced by [`EngineBuffer::into_raw`]),
    /// with `len` initialized bytes and capacity `cap`, and it must not be
    /// adopted or freed anywhere else.
    pub unsafe fn from_raw(raw: RawEngineBuffer) -> Result<Self, EngineFailure> {
        if raw.ptr.is_null() {
            return Err(EngineFailure::new("engine returned a null buffer"));
        }
        if raw.len > raw.cap {
            return Err(EngineFailure::new(format!(
                "engine returned length {} larger than capacity {}",
                raw.len, raw.cap
            )));
        }
        let (len, cap) = match (usize::try_from(raw.len), usize::try_from(raw.cap)) {
            (Ok(len), Ok(cap)) => (len, cap),
            _ => return Err(EngineFailure::new("engine buffer does not fit in memory")),
        };
        // SAFETY: upheld by the caller, see above.
        let bytes = unsafe { Vec::from_raw_parts(raw.ptr, len, cap) };
        Ok(Self { bytes })
    }

    /// Give up ownership for the trip across the boundary.
    pub fn into_raw(self) -> RawEngineBuffer {
        let mut bytes = std::mem::ManuallyDrop::new(self.bytes);
        RawEngineBuffer {
            ptr: bytes.as_mut_ptr(),
            len: bytes.len() as u64,
            cap: bytes.capacity() as u64,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for EngineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuffer")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
