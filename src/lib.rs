pub mod codec;
pub mod error;
pub mod layer;
pub mod output;
pub mod perceptron;
pub mod rng;
pub mod sampler;
pub mod train;

// Convenience re-exports
pub use codec::{load_layer_bin, save_layer_bin, ColorMap, PpmEncoder};
pub use error::{PerceptronError, Result};
pub use layer::{Layer, Shape, ShapeGenerator, ShapeKind};
pub use output::OutputLayout;
pub use perceptron::{forward, inhibit, reinforce, Perceptron};
pub use rng::RandomSource;
pub use sampler::generate_samples;
pub use train::{ConsoleObserver, PerceptronConfig, TrainingDriver, TrainingObserver, TrainingReport};
