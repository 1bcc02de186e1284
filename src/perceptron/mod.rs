pub mod perceptron;

pub use perceptron::{forward, inhibit, reinforce, Perceptron};
