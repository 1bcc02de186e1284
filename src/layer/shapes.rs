use crate::layer::grid::Layer;
use crate::rng::source::RandomSource;

/// The two classes the perceptron learns to separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 2] = [ShapeKind::Rectangle, ShapeKind::Circle];

    /// Lower-case name used in file and directory names.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
        }
    }
}

/// Geometry of one generated shape. Only lives long enough to be stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Top-left corner plus size; corners are inclusive.
    Rectangle {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    Circle { cx: usize, cy: usize, radius: usize },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Writes `value` into every covered cell of `layer`, clipped to its bounds.
    ///
    /// # Panics
    /// Panics on a zero width, height or radius, or an anchor outside the grid.
    pub fn stamp(&self, layer: &mut Layer, value: f32) {
        let (w, h) = layer.dimensions();
        match *self {
            Shape::Rectangle { x, y, width, height } => {
                assert!(width > 0, "rectangle width must be positive");
                assert!(height > 0, "rectangle height must be positive");
                assert!(x < w && y < h, "rectangle corner ({x}, {y}) outside {w}x{h} grid");

                let x1 = (x + width - 1).min(w - 1);
                let y1 = (y + height - 1).min(h - 1);
                for i in y..=y1 {
                    for j in x..=x1 {
                        layer[(j, i)] = value;
                    }
                }
            }
            Shape::Circle { cx, cy, radius } => {
                assert!(radius > 0, "circle radius must be positive");
                assert!(cx < w && cy < h, "circle center ({cx}, {cy}) outside {w}x{h} grid");

                let x0 = cx.saturating_sub(radius);
                let y0 = cy.saturating_sub(radius);
                let x1 = (cx + radius).min(w - 1);
                let y1 = (cy + radius).min(h - 1);
                let r2 = radius * radius;
                for i in y0..=y1 {
                    for j in x0..=x1 {
                        let dx = j.abs_diff(cx);
                        let dy = i.abs_diff(cy);
                        if dx * dx + dy * dy <= r2 {
                            layer[(j, i)] = value;
                        }
                    }
                }
            }
        }
    }
}

/// Draws random rectangles and circles onto a layer.
///
/// All ranges are inclusive on both ends:
/// - rectangle corner `x ∈ [0, W-1]`, `y ∈ [0, H-1]`, then
///   `width ∈ [1, W-x]`, `height ∈ [1, H-y]`;
/// - circle center in `[border, dim-1-border]` and radius in `[1, max]`,
///   where `max` is the smallest of `min(W, H) / 2` and the center's
///   distance to each edge. When `max <= 1` the radius is `1` and no
///   draw is consumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeGenerator {
    pub border_offset: usize,
}

impl ShapeGenerator {
    pub fn new(border_offset: usize) -> ShapeGenerator {
        ShapeGenerator { border_offset }
    }

    /// Clears `layer` and stamps a shape of the given kind.
    pub fn generate(&self, kind: ShapeKind, rng: &mut RandomSource, layer: &mut Layer) -> Shape {
        match kind {
            ShapeKind::Rectangle => self.random_rectangle(rng, layer),
            ShapeKind::Circle => self.random_circle(rng, layer),
        }
    }

    pub fn random_rectangle(&self, rng: &mut RandomSource, layer: &mut Layer) -> Shape {
        let (w, h) = layer.dimensions();
        layer.clear();

        let x = rng.range_inclusive(0, w - 1);
        let y = rng.range_inclusive(0, h - 1);
        let width = rng.range_inclusive(1, w - x);
        let height = rng.range_inclusive(1, h - y);

        let shape = Shape::Rectangle { x, y, width, height };
        shape.stamp(layer, 1.0);
        shape
    }

    pub fn random_circle(&self, rng: &mut RandomSource, layer: &mut Layer) -> Shape {
        let (w, h) = layer.dimensions();
        layer.clear();

        let border = self.border_offset;
        assert!(
            2 * border < w && 2 * border < h,
            "border offset {border} leaves no room for a center on a {w}x{h} grid"
        );
        let cx = rng.range_inclusive(border, w - 1 - border);
        let cy = rng.range_inclusive(border, h - 1 - border);

        let max_radius = (w.min(h) / 2)
            .min(cx)
            .min(cy)
            .min(w - 1 - cx)
            .min(h - 1 - cy);
        let radius = if max_radius > 1 {
            rng.range_inclusive(1, max_radius)
        } else {
            1
        };

        let shape = Shape::Circle { cx, cy, radius };
        shape.stamp(layer, 1.0);
        shape
    }
}
