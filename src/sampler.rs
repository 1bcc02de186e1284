//! Writes a reproducible batch of rectangle and circle samples to disk,
//! each as a binary dump and an intensity PPM.

use tracing::{debug, info};

use crate::codec::binary::save_layer_bin;
use crate::codec::ppm::{ColorMap, PpmEncoder};
use crate::error::Result;
use crate::layer::grid::Layer;
use crate::layer::shapes::{ShapeGenerator, ShapeKind};
use crate::output::layout::OutputLayout;
use crate::rng::source::RandomSource;
use crate::train::train_config::PerceptronConfig;

/// Generates `count` samples of each shape from `seed`, alternating
/// rectangle and circle draws. The directory tree must already exist.
/// Returns the number of files written.
pub fn generate_samples(
    config: &PerceptronConfig,
    layout: &OutputLayout,
    count: usize,
    seed: u64,
) -> Result<usize> {
    config.validate()?;
    let mut rng = RandomSource::new(seed);
    let generator = ShapeGenerator::new(config.border_offset);
    let mut encoder = PpmEncoder::new(ColorMap::Intensity, config.ppm_scale, config.ppm_range);
    let mut layer = Layer::zeros(config.width, config.height);
    let mut written = 0;

    for i in 0..count {
        for kind in ShapeKind::ALL {
            let shape = generator.generate(kind, &mut rng, &mut layer);
            debug!(index = i, ?shape, "generated sample");

            save_layer_bin(&layer, &layout.sample_bin_path(kind, i))?;
            encoder.save_ppm(&layer, &layout.sample_ppm_path(kind, i))?;
            written += 2;
        }
    }

    info!(count, seed, root = %layout.root().display(), "samples written");
    Ok(written)
}
