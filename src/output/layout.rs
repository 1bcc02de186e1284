use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PerceptronError, Result};
use crate::layer::shapes::ShapeKind;

/// Directory tree every run writes into:
///
/// ```text
/// <root>/bin/{rectangles,circles}/
/// <root>/ppm/{rectangles,circles,weights}/
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> OutputLayout {
        OutputLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates every directory of the tree. Existing directories are fine;
    /// any other failure is returned.
    pub fn create_dirs(&self) -> Result<()> {
        let mut dirs = Vec::new();
        for kind in ShapeKind::ALL {
            dirs.push(self.bin_dir(kind));
            dirs.push(self.ppm_dir(kind));
        }
        dirs.push(self.root.join("ppm").join("weights"));

        for dir in dirs {
            debug!("creating {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| PerceptronError::io(&dir, e))?;
        }
        Ok(())
    }

    /// `<root>/bin/<shape>s/<shape>-sample_<NNN>.bin`
    pub fn sample_bin_path(&self, kind: ShapeKind, index: usize) -> PathBuf {
        self.bin_dir(kind)
            .join(format!("{}-sample_{:03}.bin", kind.name(), index))
    }

    /// `<root>/ppm/<shape>s/<shape>-sample_<NNN>.ppm`
    pub fn sample_ppm_path(&self, kind: ShapeKind, index: usize) -> PathBuf {
        self.ppm_dir(kind)
            .join(format!("{}-sample_{:03}.ppm", kind.name(), index))
    }

    /// `<root>/ppm/weights/weight-<NNN>.ppm`
    pub fn weight_snapshot_path(&self, index: usize) -> PathBuf {
        self.root
            .join("ppm")
            .join("weights")
            .join(format!("weight-{:03}.ppm", index))
    }

    /// `<root>/bin/weights.bin`, the checkpoint of the trained weights.
    pub fn weights_checkpoint_path(&self) -> PathBuf {
        self.root.join("bin").join("weights.bin")
    }

    fn bin_dir(&self, kind: ShapeKind) -> PathBuf {
        self.root.join("bin").join(format!("{}s", kind.name()))
    }

    fn ppm_dir(&self, kind: ShapeKind) -> PathBuf {
        self.root.join("ppm").join(format!("{}s", kind.name()))
    }
}
