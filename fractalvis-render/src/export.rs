//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use fractalvis_core::{HueRange, KindParams, PixelFormat, RenderRequest};

use crate::buffer::Image;

/// Metadata to embed in an exported PNG as tEXt chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub fractal_type: String,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub max_iterations: u32,
    pub horizon: f64,
    /// Kind-specific settings, already formatted (`"shades=16"`, `"roots=3"` …).
    pub extra: Vec<(String, String)>,
}

impl ExportMetadata {
    /// Describe the render that produced an image.
    pub fn from_request(request: &RenderRequest) -> Self {
        let p = &request.params;
        let extra = match p.kind_params() {
            KindParams::MandelbrotGrayscale { shades_max } => {
                vec![("Shades".to_string(), shades_max.to_string())]
            }
            KindParams::MandelbrotColored { hue } => hue_pairs(hue),
            KindParams::Newton { root_count, hue } => {
                let mut pairs = vec![("RootCount".to_string(), root_count.to_string())];
                pairs.extend(hue_pairs(hue));
                pairs
            }
        };
        Self {
            fractal_type: p.fractal_kind().label().to_string(),
            x_min: request.bounds.x_min(),
            x_max: request.bounds.x_max(),
            y_min: request.bounds.y_min(),
            y_max: request.bounds.y_max(),
            max_iterations: p.max_iterations(),
            horizon: p.horizon(),
            extra,
        }
    }
}

fn hue_pairs(hue: HueRange) -> Vec<(String, String)> {
    vec![
        ("HueFrom".to_string(), hue.from_angle().to_string()),
        ("HueTo".to_string(), hue.to_angle().to_string()),
        ("Saturation".to_string(), hue.saturation().to_string()),
    ]
}

/// Write an image as a grayscale or RGB PNG with embedded render metadata.
///
/// Uses the `png` crate directly (rather than `image`) to inject custom tEXt
/// chunks readable by exiftool, IrfanView, XnView, etc.
pub fn export_png(image: &Image, path: &Path, metadata: &ExportMetadata) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(match image.format() {
        PixelFormat::Gray8 => png::ColorType::Grayscale,
        PixelFormat::Rgb24 => png::ColorType::Rgb,
    });
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "FractalVis".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(metadata, image) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.data())?;
    png_writer.finish()?;

    debug!(
        "Exported PNG {}x{} to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    format!(
        "{} - x: {} to {}, y: {} to {}, Iterations: {}",
        meta.fractal_type, meta.x_min, meta.x_max, meta.y_min, meta.y_max, meta.max_iterations,
    )
}

fn build_metadata_pairs(meta: &ExportMetadata, image: &Image) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("FractalVis.FractalType".into(), meta.fractal_type.clone()),
        ("FractalVis.XMin".into(), meta.x_min.to_string()),
        ("FractalVis.XMax".into(), meta.x_max.to_string()),
        ("FractalVis.YMin".into(), meta.y_min.to_string()),
        ("FractalVis.YMax".into(), meta.y_max.to_string()),
        ("FractalVis.MaxIterations".into(), meta.max_iterations.to_string()),
        ("FractalVis.Horizon".into(), meta.horizon.to_string()),
        (
            "FractalVis.Resolution".into(),
            format!("{}x{}", image.width(), image.height()),
        ),
    ];
    pairs.extend(
        meta.extra
            .iter()
            .map(|(k, v)| (format!("FractalVis.{k}"), v.clone())),
    );
    pairs
}
