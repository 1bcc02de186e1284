pub mod grid;
pub mod shapes;

pub use grid::Layer;
pub use shapes::{Shape, ShapeGenerator, ShapeKind};
