use crate::layer::grid::Layer;

/// Inner product of two layers treated as flat vectors.
///
/// # Panics
/// Panics if the layers have different dimensions.
pub fn forward(inputs: &Layer, weights: &Layer) -> f32 {
    check_dimensions(inputs, weights);
    inputs
        .cells()
        .iter()
        .zip(weights.cells())
        .map(|(x, w)| x * w)
        .sum()
}

/// `weights += inputs`, cell by cell.
pub fn reinforce(inputs: &Layer, weights: &mut Layer) {
    check_dimensions(inputs, weights);
    for (w, x) in weights.cells_mut().iter_mut().zip(inputs.cells()) {
        *w += x;
    }
}

/// `weights -= inputs`, cell by cell.
pub fn inhibit(inputs: &Layer, weights: &mut Layer) {
    check_dimensions(inputs, weights);
    for (w, x) in weights.cells_mut().iter_mut().zip(inputs.cells()) {
        *w -= x;
    }
}

fn check_dimensions(a: &Layer, b: &Layer) {
    if a.dimensions() != b.dimensions() {
        panic!(
            "Layers are of incorrect sizes: {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        )
    }
}

/// Single-layer perceptron: one weight per input cell and no learning rate.
/// Every mistake adds or removes the whole input mask.
#[derive(Debug, Clone)]
pub struct Perceptron {
    weights: Layer,
}

impl Perceptron {
    /// All weights start at zero.
    pub fn new(width: usize, height: usize) -> Perceptron {
        Perceptron {
            weights: Layer::zeros(width, height),
        }
    }

    pub fn from_weights(weights: Layer) -> Perceptron {
        Perceptron { weights }
    }

    pub fn score(&self, inputs: &Layer) -> f32 {
        forward(inputs, &self.weights)
    }

    pub fn reinforce(&mut self, inputs: &Layer) {
        reinforce(inputs, &mut self.weights);
    }

    pub fn inhibit(&mut self, inputs: &Layer) {
        inhibit(inputs, &mut self.weights);
    }

    pub fn weights(&self) -> &Layer {
        &self.weights
    }

    pub fn into_weights(self) -> Layer {
        self.weights
    }
}
