//! Figure loading and physical sizing.
//!
//! Pixel dimensions come from the image decoder; resolution is read from the
//! PNG `pHYs` chunk or the JPEG JFIF header and falls back to a configured
//! DPI. Sizes are clamped to the width limit first and the height limit
//! second, each scaling both dimensions.

use crate::error::{Error, Result};
use crate::model::Resource;
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Centimetres per inch.
const CM_PER_INCH: f64 = 2.54;

/// Metres per inch, for PNG pixels-per-metre.
const METRES_PER_INCH: f64 = 0.0254;

/// Maximum display size of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureLimits {
    /// Maximum width in centimetres
    pub max_width_cm: f64,
    /// Maximum height in centimetres
    pub max_height_cm: f64,
}

impl Default for FigureLimits {
    fn default() -> Self {
        Self {
            max_width_cm: 14.0,
            max_height_cm: 8.5,
        }
    }
}

/// Display size of a figure in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    /// Width in centimetres
    pub width_cm: f64,
    /// Height in centimetres
    pub height_cm: f64,
}

impl FigureSize {
    /// Clamp to the limits: width first, then height, preserving aspect ratio.
    ///
    /// The two steps are independent, so a width clamp may leave the height
    /// well under its limit.
    pub fn fit_within(self, limits: &FigureLimits) -> Self {
        let FigureSize {
            mut width_cm,
            mut height_cm,
        } = self;
        if width_cm > limits.max_width_cm {
            height_cm = height_cm * limits.max_width_cm / width_cm;
            width_cm = limits.max_width_cm;
        }
        if height_cm > limits.max_height_cm {
            width_cm = width_cm * limits.max_height_cm / height_cm;
            height_cm = limits.max_height_cm;
        }
        FigureSize {
            width_cm,
            height_cm,
        }
    }

    /// Width in EMU (English Metric Units, 360000 per cm).
    pub fn width_emu(&self) -> i64 {
        cm_to_emu(self.width_cm)
    }

    /// Height in EMU.
    pub fn height_emu(&self) -> i64 {
        cm_to_emu(self.height_cm)
    }
}

/// Convert centimetres to EMU.
pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * 360_000.0).round() as i64
}

/// Physical length of a pixel count at a resolution.
pub fn pixels_to_cm(pixels: u32, dpi: f64) -> f64 {
    pixels as f64 / dpi * CM_PER_INCH
}

/// Where an image's resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// PNG `pHYs` chunk
    PngPhys,
    /// JPEG JFIF density
    JfifDensity,
    /// Configured fallback
    Default,
}

/// Pixel dimensions and resolution of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMetrics {
    /// Width in pixels
    pub width_px: u32,
    /// Height in pixels
    pub height_px: u32,
    /// Horizontal resolution
    pub dpi_x: f64,
    /// Vertical resolution
    pub dpi_y: f64,
    /// Origin of the resolution values
    pub source: ResolutionSource,
}

impl ImageMetrics {
    /// Unclamped physical size.
    pub fn natural_size(&self) -> FigureSize {
        FigureSize {
            width_cm: pixels_to_cm(self.width_px, self.dpi_x),
            height_cm: pixels_to_cm(self.height_px, self.dpi_y),
        }
    }
}

/// Read the resolution stored in PNG or JPEG metadata.
///
/// Returns `(dpi_x, dpi_y, source)`, or `None` when the image carries no
/// usable physical resolution.
pub fn probe_resolution(data: &[u8]) -> Option<(f64, f64, ResolutionSource)> {
    png_phys(data)
        .map(|(x, y)| (x, y, ResolutionSource::PngPhys))
        .or_else(|| jfif_density(data).map(|(x, y)| (x, y, ResolutionSource::JfifDensity)))
}

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

fn be_u16(b: &[u8]) -> u16 {
    u16::from_be_bytes([b[0], b[1]])
}

fn png_phys(data: &[u8]) -> Option<(f64, f64)> {
    if !data.starts_with(PNG_SIGNATURE) {
        return None;
    }
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let length = be_u32(&data[pos..]) as usize;
        let kind = &data[pos + 4..pos + 8];
        let start = pos + 8;
        let end = start.checked_add(length)?;
        if end > data.len() {
            return None;
        }
        match kind {
            b"pHYs" if length >= 9 => {
                let chunk = &data[start..end];
                let (x, y, unit) = (be_u32(chunk), be_u32(&chunk[4..]), chunk[8]);
                // Unit 0 only states the aspect ratio.
                if unit == 1 && x > 0 && y > 0 {
                    return Some((x as f64 * METRES_PER_INCH, y as f64 * METRES_PER_INCH));
                }
                return None;
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }
        pos = end + 4;
    }
    None
}

fn jfif_density(data: &[u8]) -> Option<(f64, f64)> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            // Start of scan or end of image: no more headers.
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = be_u16(&data[pos + 2..]) as usize;
        let end = pos + 2 + length;
        if length < 2 || end > data.len() {
            return None;
        }
        let segment = &data[pos + 4..end];
        if marker == 0xE0 && segment.len() >= 12 && segment.starts_with(b"JFIF\0") {
            let units = segment[7];
            let x = be_u16(&segment[8..]) as f64;
            let y = be_u16(&segment[10..]) as f64;
            if x <= 0.0 || y <= 0.0 {
                return None;
            }
            return match units {
                1 => Some((x, y)),
                2 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
                _ => None,
            };
        }
        pos = end;
    }
    None
}

/// Measure an in-memory image.
pub fn measure(data: &[u8], default_dpi: f64) -> Result<(ImageMetrics, &'static str)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let mime = Resource::detect_mime_type(data)
        .or_else(|| reader.format().map(|f| f.to_mime_type()))
        .unwrap_or("application/octet-stream");
    let (width_px, height_px) = reader.into_dimensions()?;

    let (dpi_x, dpi_y, source) =
        probe_resolution(data).unwrap_or((default_dpi, default_dpi, ResolutionSource::Default));

    Ok((
        ImageMetrics {
            width_px,
            height_px,
            dpi_x,
            dpi_y,
            source,
        },
        mime,
    ))
}

/// A figure ready to embed: image data plus display size.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Embedded image resource
    pub resource: Resource,
    /// Measured pixel size and resolution
    pub metrics: ImageMetrics,
    /// Clamped display size
    pub size: FigureSize,
}

/// Read and size a figure file.
///
/// The file is read once into memory and closed before decoding.
pub fn load_figure(path: &Path, limits: &FigureLimits, default_dpi: f64) -> Result<Figure> {
    let data = std::fs::read(path).map_err(|e| Error::Figure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let (metrics, mime) = measure(&data, default_dpi).map_err(|e| Error::Figure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let size = metrics.natural_size().fit_within(limits);

    log::debug!(
        "image: {} (w:{}px, h:{}px, dpi:{:.1}x{:.1} {:?}) -> (w:{:.3}cm, h:{:.3}cm)",
        path.display(),
        metrics.width_px,
        metrics.height_px,
        metrics.dpi_x,
        metrics.dpi_y,
        metrics.source,
        size.width_cm,
        size.height_cm
    );

    let mut resource = Resource::image(data, mime).with_dimensions(metrics.width_px, metrics.height_px);
    if let Some(name) = path.file_name() {
        resource = resource.with_filename(name.to_string_lossy());
    }

    Ok(Figure {
        resource,
        metrics,
        size,
    })
}
