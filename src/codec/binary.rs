//! Raw checkpoint format: `width * height` native-endian `f32`s, row-major,
//! no header. Files are only meant to be read back on the host that wrote them.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{PerceptronError, Result};
use crate::layer::grid::Layer;

const CELL_BYTES: usize = std::mem::size_of::<f32>();

pub fn encode_layer(layer: &Layer) -> Vec<u8> {
    layer.cells().iter().flat_map(|c| c.to_ne_bytes()).collect()
}

/// Rebuilds a `width × height` layer from bytes produced by [`encode_layer`].
pub fn decode_layer(bytes: &[u8], width: usize, height: usize) -> Result<Layer> {
    let expected = width * height * CELL_BYTES;
    if bytes.len() != expected {
        return Err(PerceptronError::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    let cells = bytes
        .chunks_exact(CELL_BYTES)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Ok(Layer::from_cells(width, height, cells))
}

pub fn save_layer_bin(layer: &Layer, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| PerceptronError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&encode_layer(layer))
        .and_then(|_| writer.flush())
        .map_err(|e| PerceptronError::io(path, e))
}

pub fn load_layer_bin(path: &Path, width: usize, height: usize) -> Result<Layer> {
    let file = File::open(path).map_err(|e| PerceptronError::io(path, e))?;
    let mut bytes = Vec::with_capacity(width * height * CELL_BYTES);
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| PerceptronError::io(path, e))?;
    decode_layer(&bytes, width, height)
}
