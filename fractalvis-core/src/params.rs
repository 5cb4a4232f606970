use std::fmt;
use std::str::FromStr;

use crate::error::{ParamError, ParamField};
use crate::pixel::PixelFormat;

/// Upper limit accepted for the iteration count.
pub const MAX_ITERATIONS_LIMIT: u32 = 1000;

/// Which fractal the engine should compute.
///
/// A closed set: every `match` over it is exhaustive, and the selector
/// widget can only ever offer [`FractalKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    #[default]
    MandelbrotGrayscale,
    MandelbrotColored,
    Newton,
}

impl FractalKind {
    pub const ALL: [FractalKind; 3] = [
        Self::MandelbrotGrayscale,
        Self::MandelbrotColored,
        Self::Newton,
    ];

    /// Label shown in the kind selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::MandelbrotGrayscale => "Mandelbrot (grayscale)",
            Self::MandelbrotColored => "Mandelbrot (colored)",
            Self::Newton => "Newton",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Packing of the buffer the engine returns for this kind.
    pub fn pixel_format(self) -> PixelFormat {
        match self {
            Self::MandelbrotGrayscale => PixelFormat::Gray8,
            Self::MandelbrotColored | Self::Newton => PixelFormat::Rgb24,
        }
    }
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hue sweep for the coloured variants.
///
/// The engine interpolates hue from `from_angle` to `to_angle` (degrees) as
/// the escape count (or root index) goes from zero to its maximum.
/// Only built through [`HueRange::new`], so the angles are always finite and
/// the saturation always within `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueRange {
    from_angle: f32,
    to_angle: f32,
    saturation: f32,
}

impl HueRange {
    pub fn new(from_angle: f32, to_angle: f32, saturation: f32) -> Result<Self, ParamError> {
        if !from_angle.is_finite() {
            return Err(range(ParamField::HueFromAngle, from_angle, "a finite angle"));
        }
        if !to_angle.is_finite() {
            return Err(range(ParamField::HueToAngle, to_angle, "a finite angle"));
        }
        if !(0.0..=1.0).contains(&saturation) {
            return Err(range(ParamField::Saturation, saturation, "0 to 1"));
        }
        Ok(Self {
            from_angle,
            to_angle,
            saturation,
        })
    }

    pub fn from_angle(&self) -> f32 {
        self.from_angle
    }

    pub fn to_angle(&self) -> f32 {
        self.to_angle
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }
}

impl Default for HueRange {
    /// Red through magenta at full saturation.
    fn default() -> Self {
        Self {
            from_angle: 0.0,
            to_angle: 300.0,
            saturation: 1.0,
        }
    }
}

/// Kind-specific part of [`RenderParameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KindParams {
    MandelbrotGrayscale { shades_max: u8 },
    MandelbrotColored { hue: HueRange },
    Newton { root_count: u32, hue: HueRange },
}

impl KindParams {
    pub fn kind(&self) -> FractalKind {
        match self {
            Self::MandelbrotGrayscale { .. } => FractalKind::MandelbrotGrayscale,
            Self::MandelbrotColored { .. } => FractalKind::MandelbrotColored,
            Self::Newton { .. } => FractalKind::Newton,
        }
    }
}

/// Validated numeric parameters for one engine call.
///
/// Only [`RawParams::parse`] produces these, so every value handed to the
/// engine has passed the range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    max_iterations: u32,
    horizon: f64,
    kind: KindParams,
}

impl RenderParameters {
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Escape radius for Mandelbrot, convergence radius for Newton.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn kind_params(&self) -> KindParams {
        self.kind
    }

    pub fn fractal_kind(&self) -> FractalKind {
        self.kind.kind()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.fractal_kind().pixel_format()
    }
}

/// Parameter text exactly as typed by the user, plus the selected kind.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawParams {
    pub kind: FractalKind,
    pub max_iterations: String,
    pub horizon: String,
    pub shades_max: String,
    pub root_count: String,
    pub hue_from_angle: String,
    pub hue_to_angle: String,
    pub saturation: String,
}

impl Default for RawParams {
    fn default() -> Self {
        let hue = HueRange::default();
        Self {
            kind: FractalKind::default(),
            max_iterations: "100".into(),
            horizon: "2".into(),
            shades_max: "16".into(),
            root_count: "3".into(),
            hue_from_angle: hue.from_angle.to_string(),
            hue_to_angle: hue.to_angle.to_string(),
            saturation: hue.saturation.to_string(),
        }
    }
}

impl RawParams {
    /// Parse and validate the fields `self.kind` needs, stopping at the first error.
    pub fn parse(&self) -> Result<RenderParameters, ParamError> {
        let max_iterations: u32 = parse_field(ParamField::MaxIterations, &self.max_iterations)?;
        if !(1..=MAX_ITERATIONS_LIMIT).contains(&max_iterations) {
            return Err(range(
                ParamField::MaxIterations,
                max_iterations,
                "1 to 1000",
            ));
        }

        let horizon: f64 = parse_field(ParamField::Horizon, &self.horizon)?;
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(range(ParamField::Horizon, horizon, "a finite value > 0"));
        }

        let kind = match self.kind {
            FractalKind::MandelbrotGrayscale => {
                let shades_max: u8 = parse_field(ParamField::ShadesMax, &self.shades_max)?;
                if shades_max == 0 {
                    return Err(range(ParamField::ShadesMax, shades_max, "1 to 255"));
                }
                KindParams::MandelbrotGrayscale { shades_max }
            }
            FractalKind::MandelbrotColored => KindParams::MandelbrotColored {
                hue: self.parse_hue()?,
            },
            FractalKind::Newton => {
                let root_count: u32 = parse_field(ParamField::RootCount, &self.root_count)?;
                if root_count == 0 {
                    return Err(range(ParamField::RootCount, root_count, "at least 1"));
                }
                KindParams::Newton {
                    root_count,
                    hue: self.parse_hue()?,
                }
            }
        };

        Ok(RenderParameters {
            max_iterations,
            horizon,
            kind,
        })
    }

    fn parse_hue(&self) -> Result<HueRange, ParamError> {
        HueRange::new(
            parse_field(ParamField::HueFromAngle, &self.hue_from_angle)?,
            parse_field(ParamField::HueToAngle, &self.hue_to_angle)?,
            parse_field(ParamField::Saturation, &self.saturation)?,
        )
    }
}

fn parse_field<T>(field: ParamField, input: &str) -> Result<T, ParamError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    input.trim().parse().map_err(|e: T::Err| ParamError::Format {
        field,
        input: input.to_string(),
        reason: e.to_string(),
    })
}

fn range(field: ParamField, value: impl fmt::Display, expected: &'static str) -> ParamError {
    ParamError::Range {
        field,
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: FractalKind) -> RawParams {
        RawParams {
            kind,
            ..RawParams::default()
        }
    }

    #[test]
    fn defaults_parse_for_every_kind() {
        for kind in FractalKind::ALL {
            let p = raw(kind).parse().unwrap();
            assert_eq!(p.fractal_kind(), kind);
            assert_eq!(p.max_iterations(), 100);
            assert!((p.horizon() - 2.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn colour_defaults_are_red_to_magenta() {
        let p = raw(FractalKind::Newton).parse().unwrap();
        assert_eq!(
            p.kind_params(),
            KindParams::Newton {
                root_count: 3,
                hue: HueRange::new(0.0, 300.0, 1.0).unwrap(),
            }
        );
    }

    #[test]
    fn unparsable_iterations_is_a_format_error() {
        let mut r = raw(FractalKind::MandelbrotGrayscale);
        r.max_iterations = "abc".into();
        let err = r.parse().unwrap_err();
        assert!(matches!(
            err,
            ParamError::Format {
                field: ParamField::MaxIterations,
                ..
            }
        ));
    }

    #[test]
    fn iterations_out_of_range() {
        let mut r = raw(FractalKind::MandelbrotColored);
        for bad in ["0", "1001"] {
            r.max_iterations = bad.into();
            let err = r.parse().unwrap_err();
            assert!(matches!(err, ParamError::Range { .. }), "{bad}: {err}");
            assert_eq!(err.field(), ParamField::MaxIterations);
        }
        r.max_iterations = " 1000 ".into();
        assert_eq!(r.parse().unwrap().max_iterations(), 1000);
    }

    #[test]
    fn negative_and_overflowing_integers_fail_to_parse() {
        let mut r = raw(FractalKind::MandelbrotGrayscale);
        r.shades_max = "256".into();
        assert_eq!(r.parse().unwrap_err().field(), ParamField::ShadesMax);
        r.shades_max = "-1".into();
        assert_eq!(r.parse().unwrap_err().field(), ParamField::ShadesMax);
    }

    #[test]
    fn horizon_must_be_positive_and_finite() {
        let mut r = raw(FractalKind::MandelbrotGrayscale);
        for bad in ["0", "-2", "inf", "NaN"] {
            r.horizon = bad.into();
            assert_eq!(r.parse().unwrap_err().field(), ParamField::Horizon, "{bad}");
        }
    }

    #[test]
    fn only_fields_for_the_selected_kind_are_checked() {
        let mut r = raw(FractalKind::MandelbrotGrayscale);
        r.root_count = "zero".into();
        r.saturation = "lots".into();
        assert!(r.parse().is_ok());

        r.kind = FractalKind::Newton;
        assert_eq!(r.parse().unwrap_err().field(), ParamField::RootCount);
    }

    #[test]
    fn first_failure_wins() {
        let mut r = raw(FractalKind::MandelbrotColored);
        r.horizon = "x".into();
        r.hue_to_angle = "y".into();
        assert_eq!(r.parse().unwrap_err().field(), ParamField::Horizon);
    }

    #[test]
    fn zero_shades_and_roots_are_rejected() {
        let mut r = raw(FractalKind::MandelbrotGrayscale);
        r.shades_max = "0".into();
        let err = r.parse().unwrap_err();
        assert!(matches!(err, ParamError::Range { field: ParamField::ShadesMax, .. }));

        let mut r = raw(FractalKind::Newton);
        r.root_count = "0".into();
        let err = r.parse().unwrap_err();
        assert!(matches!(err, ParamError::Range { field: ParamField::RootCount, .. }));
    }

    #[test]
    fn parsed_hue_exposes_validated_values() {
        let mut r = raw(FractalKind::MandelbrotColored);
        r.hue_from_angle = "30".into();
        r.hue_to_angle = "90".into();
        r.saturation = "0.25".into();
        let KindParams::MandelbrotColored { hue } = r.parse().unwrap().kind_params() else {
            panic!("expected coloured parameters");
        };
        assert_eq!((hue.from_angle(), hue.to_angle(), hue.saturation()), (30.0, 90.0, 0.25));

        r.saturation = "5".into();
        assert_eq!(r.parse().unwrap_err().field(), ParamField::Saturation);
    }

    #[test]
    fn saturation_range() {
        assert!(HueRange::new(0.0, 300.0, 1.5).is_err());
        assert!(HueRange::new(0.0, 300.0, -0.1).is_err());
        assert!(HueRange::new(f32::NAN, 300.0, 0.5).is_err());
        assert!(HueRange::new(10.0, 20.0, 0.0).is_ok());
    }

    #[test]
    fn labels_round_trip() {
        for kind in FractalKind::ALL {
            assert_eq!(FractalKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(FractalKind::from_label("Julia"), None);
    }

    #[test]
    fn pixel_format_per_kind() {
        assert_eq!(FractalKind::MandelbrotGrayscale.pixel_format(), PixelFormat::Gray8);
        assert_eq!(FractalKind::MandelbrotColored.pixel_format(), PixelFormat::Rgb24);
        assert_eq!(FractalKind::Newton.pixel_format(), PixelFormat::Rgb24);
    }
}
