use crate::error::CoreError;

/// The region of the complex plane currently on screen.
///
/// Always non-degenerate: `x_max > x_min` and `y_max > y_min`, all finite.
/// Bounds are replaced, never edited, so the fields are read-only outside
/// this module.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

/// Deserialization re-runs validation so a hand-edited preferences file
/// cannot smuggle in a degenerate rectangle.
impl<'de> serde::Deserialize<'de> for Bounds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            x_min: f64,
            x_max: f64,
            y_min: f64,
            y_max: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.x_min, raw.x_max, raw.y_min, raw.y_max).map_err(serde::de::Error::custom)
    }
}

impl Bounds {
    /// The session default, `[-2, 2] × [-2, 2]`. Also the reset target.
    pub const DEFAULT: Self = Self {
        x_min: -2.0,
        x_max: 2.0,
        y_min: -2.0,
        y_max: 2.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidBounds {
                reason: format!(
                    "edges must be finite, got x: {x_min}..{x_max}, y: {y_min}..{y_max}"
                ),
            });
        }
        if x_max <= x_min || y_max <= y_min {
            return Err(CoreError::InvalidBounds {
                reason: format!(
                    "rectangle is empty, got x: {x_min}..{x_max}, y: {y_min}..{y_max}"
                ),
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether every edge matches `other` within relative tolerance `tol`.
    ///
    /// Each edge is compared against the larger magnitude of the pair, so
    /// deep-zoom views far from the origin are held to the same relative
    /// precision as the default view. Edges at exactly zero must match exactly.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        let close = |a: f64, b: f64| {
            (a - b).abs() <= tol * a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
        };
        close(self.x_min, other.x_min)
            && close(self.x_max, other.x_max)
            && close(self.y_min, other.y_min)
            && close(self.y_max, other.y_max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
