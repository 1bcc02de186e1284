use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{PerceptronError, Result};
use crate::layer::grid::Layer;
use crate::rng::source::RandomSource;

/// Seed of the red-channel jitter stream. The jitter has its own source so
/// that writing pictures never shifts the training draws.
pub const JITTER_SEED: u64 = 0x5eed;

/// How a cell value becomes a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMap {
    /// Weight view: green for negative, blue for positive, centred on zero
    /// with a jittered red channel.
    Diverging,
    /// Sample view: blue proportional to the value, which is assumed to be
    /// in `[0, 1]`.
    Intensity,
}

impl FromStr for ColorMap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "diverging" => Ok(ColorMap::Diverging),
            "intensity" => Ok(ColorMap::Intensity),
            other => Err(format!(
                "unknown color map '{other}' (expected 'diverging' or 'intensity')"
            )),
        }
    }
}

/// Renders layers as magnified RGB rasters.
///
/// Each cell becomes a `scale × scale` block. Under [`ColorMap::Diverging`]
/// every pixel of the block gets its own red jitter; the other channels are
/// the same across the block.
#[derive(Debug, Clone)]
pub struct PpmEncoder {
    pub color_map: ColorMap,
    pub scale: u32,
    /// Normalisation range `R` of the diverging map.
    pub range: f32,
    jitter: RandomSource,
}

impl PpmEncoder {
    pub fn new(color_map: ColorMap, scale: u32, range: f32) -> PpmEncoder {
        assert!(scale > 0, "scale factor must be positive");
        PpmEncoder {
            color_map,
            scale,
            range,
            jitter: RandomSource::new(JITTER_SEED),
        }
    }

    pub fn render(&mut self, layer: &Layer) -> RgbImage {
        let scale = self.scale;
        let (cols, rows) = layer.dimensions();
        let (width, height) = match (scaled_size(cols, scale), scaled_size(rows, scale)) {
            (Some(w), Some(h)) => (w, h),
            _ => panic!("{cols}x{rows} layer at scale {scale} does not fit an image"),
        };
        RgbImage::from_fn(width, height, |x, y| {
            let value = layer[((x / scale) as usize, (y / scale) as usize)];
            self.pixel(value)
        })
    }

    fn pixel(&mut self, value: f32) -> Rgb<u8> {
        match self.color_map {
            ColorMap::Diverging => {
                let scaler = (value - self.range) / (2.0 * self.range);
                let red = self.jitter.range(0, 80) as u8;
                let green = to_channel((255.0 * (1.0 - scaler)).floor());
                let blue = to_channel((scaler * 255.0).floor());
                Rgb([red, green, blue])
            }
            ColorMap::Intensity => Rgb([0, 0, to_channel((value * 255.0).round())]),
        }
    }

    /// Writes `layer` as a binary `P6` PPM.
    pub fn save_ppm(&mut self, layer: &Layer, path: &Path) -> Result<()> {
        let image = self.render(layer);
        let file = File::create(path).map_err(|e| PerceptronError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        write_ppm(&image, &mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| PerceptronError::io(path, e))
    }

    /// Writes `layer` as a PNG, for viewers without PPM support.
    pub fn save_png(&mut self, layer: &Layer, path: &Path) -> Result<()> {
        let image = self.render(layer);
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Header `P6\n<w> <h>\n255\n` followed by the raw RGB bytes.
pub fn write_ppm<W: Write>(image: &RgbImage, writer: &mut W) -> std::io::Result<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.as_raw())
}

/// Pixel count along one side of a magnified layer, if it fits in a `u32`.
pub fn scaled_size(cells: usize, scale: u32) -> Option<u32> {
    u32::try_from(cells).ok()?.checked_mul(scale)
}

fn to_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
