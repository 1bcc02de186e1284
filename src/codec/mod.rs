pub mod binary;
pub mod ppm;

pub use binary::{decode_layer, encode_layer, load_layer_bin, save_layer_bin};
pub use ppm::{ColorMap, PpmEncoder};
