use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::ppm::scaled_size;
use crate::error::{PerceptronError, Result};

/// Every tunable of a run, built once at startup and passed by reference to
/// whatever needs a dimension, seed or threshold.
///
/// `Default` is the reference setup: a 50×50 grid, bias 10, 100 samples per
/// class per pass, up to 100 training passes, check seed 666, train seed 69.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptronConfig {
    pub width: usize,
    pub height: usize,
    /// Threshold `B` a score is compared against.
    pub bias: f32,
    /// Samples of each class drawn per pass (`N`).
    pub samples_per_pass: usize,
    pub max_train_passes: usize,
    pub check_seed: u64,
    pub train_seed: u64,
    /// Minimum distance of a circle center from the grid edge.
    pub border_offset: usize,
    /// Side of the pixel block each cell becomes in a PPM.
    pub ppm_scale: u32,
    /// Normalisation range `R` of the diverging color map.
    pub ppm_range: f32,
    /// Write a weight PPM after every adjustment.
    pub save_weight_snapshots: bool,
}

impl Default for PerceptronConfig {
    fn default() -> Self {
        PerceptronConfig {
            width: 50,
            height: 50,
            bias: 10.0,
            samples_per_pass: 100,
            max_train_passes: 100,
            check_seed: 666,
            train_seed: 69,
            border_offset: 0,
            ppm_scale: 25,
            ppm_range: 10.0,
            save_weight_snapshots: true,
        }
    }
}

impl PerceptronConfig {
    /// Rejects settings no run can work with.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PerceptronError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.border_offset >= self.width.min(self.height).div_ceil(2) {
            return Err(PerceptronError::Config(format!(
                "border offset {} leaves no room for a circle center on a {}x{} grid",
                self.border_offset, self.width, self.height
            )));
        }
        if self.ppm_scale == 0 {
            return Err(PerceptronError::Config("ppm scale must be positive".into()));
        }
        if scaled_size(self.width, self.ppm_scale).is_none()
            || scaled_size(self.height, self.ppm_scale).is_none()
        {
            return Err(PerceptronError::Config(format!(
                "a {}x{} grid at scale {} is too large for an image",
                self.width, self.height, self.ppm_scale
            )));
        }
        if self.samples_per_pass.checked_mul(2).is_none() {
            return Err(PerceptronError::Config(format!(
                "{} samples per pass is too many",
                self.samples_per_pass
            )));
        }
        if !(self.ppm_range > 0.0) {
            return Err(PerceptronError::Config(format!(
                "ppm range must be positive, got {}",
                self.ppm_range
            )));
        }
        if !self.bias.is_finite() {
            return Err(PerceptronError::Config("bias must be finite".into()));
        }
        Ok(())
    }

    /// Number of classifications in one pass (`2N`).
    pub fn attempts_per_pass(&self) -> usize {
        2 * self.samples_per_pass
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| PerceptronError::io(path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config written by `save_json`. Missing fields keep their defaults.
    pub fn load_json(path: &Path) -> Result<PerceptronConfig> {
        let file = File::open(path).map_err(|e| PerceptronError::io(path, e))?;
        let reader = BufReader::new(file);
        let config: PerceptronConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_reference_setup() {
        let config = PerceptronConfig::default();
        assert_eq!((config.width, config.height), (50, 50));
        assert_eq!(config.bias, 10.0);
        assert_eq!(config.samples_per_pass, 100);
        assert_eq!(config.attempts_per_pass(), 200);
        assert_eq!((config.check_seed, config.train_seed), (666, 69));
        assert_eq!(config.ppm_scale, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PerceptronConfig =
            serde_json::from_str(r#"{ "width": 20, "train_seed": 7 }"#).unwrap();
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 50);
        assert_eq!(config.train_seed, 7);
        assert_eq!(config.check_seed, 666);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad = [
            PerceptronConfig { width: 0, ..PerceptronConfig::default() },
            PerceptronConfig { border_offset: 25, ..PerceptronConfig::default() },
            PerceptronConfig { border_offset: usize::MAX, ..PerceptronConfig::default() },
            PerceptronConfig { ppm_scale: u32::MAX, ..PerceptronConfig::default() },
            PerceptronConfig { width: usize::MAX, ..PerceptronConfig::default() },
            PerceptronConfig { samples_per_pass: usize::MAX, ..PerceptronConfig::default() },
            PerceptronConfig { ppm_scale: 0, ..PerceptronConfig::default() },
            PerceptronConfig { ppm_range: 0.0, ..PerceptronConfig::default() },
            PerceptronConfig { bias: f32::NAN, ..PerceptronConfig::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(PerceptronError::Config(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn largest_border_that_leaves_a_center() {
        let odd = PerceptronConfig { width: 51, height: 51, border_offset: 25, ..PerceptronConfig::default() };
        assert!(odd.validate().is_ok());
        let even = PerceptronConfig { width: 50, height: 50, border_offset: 24, ..PerceptronConfig::default() };
        assert!(even.validate().is_ok());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = PerceptronConfig {
            bias: 4.5,
            max_train_passes: 3,
            save_weight_snapshots: false,
            ..PerceptronConfig::default()
        };
        config.save_json(&path).unwrap();
        assert_eq!(PerceptronConfig::load_json(&path).unwrap(), config);
    }
}
