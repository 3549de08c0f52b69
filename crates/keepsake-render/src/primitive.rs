use crate::font::FontRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which side of the text the anchor `x` marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// One declarative drawing instruction. Coordinates are canvas pixels with
/// the origin at the top-left corner; boxes are inclusive `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Fill the whole canvas, interpolating per scanline from `top` to `bottom`.
    VerticalGradient { top: Rgba, bottom: Rgba },
    /// Rectangle outline whose stroke grows inward from the box edge.
    RectOutline { x0: f32, y0: f32, x1: f32, y1: f32, width: u32, color: Rgba },
    /// Filled ellipse inscribed in the box.
    Ellipse { x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba },
    /// Filled polygon, even-odd rule.
    Polygon { points: Vec<Point>, color: Rgba },
    /// Single line of text whose top edge sits at `y`.
    Text {
        text: String,
        x: f32,
        y: f32,
        align: HAlign,
        role: FontRole,
        size: f32,
        color: Rgba,
    },
}

/// A composed keepsake, ready to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(primitives);
    }

    /// Text lines drawn in the given role, in drawing order.
    pub fn texts(&self, role: FontRole) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, role: r, .. } if *r == role => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
