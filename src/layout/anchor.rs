use crate::units::Px;

/// Body lines are spaced this many font sizes apart
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Smallest font size text is ever drawn at
pub const MIN_FONT_SIZE: Px = Px(10.0);

/// The separator is always drawn at this size, whatever the surface resolution
pub const SEPARATOR_SIZE: (u32, u32) = (552, 8);

/// Offset from the name anchor to the separator anchor, in normalised units
pub const SEPARATOR_OFFSET: (f32, f32) = (-0.25, 0.025);

/// Clamp a normalised coordinate into [0, 1]; non-finite input is treated as 0
pub fn resolve01(c: f32) -> f32 {
    if c.is_finite() {
        c.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Convert a normalised coordinate into a whole-pixel position along `extent`
pub fn to_px(c: f32, extent: u32) -> Px {
    Px((resolve01(c) as f64 * extent as f64).round() as f32)
}

/// Apply the minimum font size; anything non-finite is treated as the minimum
pub fn font_size(requested: f32) -> Px {
    if requested.is_finite() {
        Px(requested).max(MIN_FONT_SIZE)
    } else {
        MIN_FONT_SIZE
    }
}

/// Distance between consecutive body baselines
pub fn line_height(font_size: Px) -> Px {
    // in f64 so sizes like 50px land on the same side of .5 as the host's maths
    Px((font_size.0 as f64 * LINE_HEIGHT_FACTOR).round() as f32)
}

/// A position on a surface in normalised coordinates, where (0, 0) is the top left
/// corner and (1, 1) the bottom right. Values are kept as given and clamped only
/// when resolved to pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Anchor {
    pub x01: f32,
    pub y01: f32,
}

impl Anchor {
    pub const DEFAULT: Anchor = Anchor {
        x01: 0.20,
        y01: 0.80,
    };

    pub fn new(x01: f32, y01: f32) -> Anchor {
        Anchor { x01, y01 }
    }

    /// Move the anchor by normalised amounts
    pub fn offset(&self, dx: f32, dy: f32) -> Anchor {
        Anchor {
            x01: self.x01 + dx,
            y01: self.y01 + dy,
        }
    }

    /// Pixel position of the anchor on a surface of the given size
    pub fn resolve(&self, width: u32, height: u32) -> (Px, Px) {
        (to_px(self.x01, width), to_px(self.y01, height))
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::DEFAULT
    }
}

/// Where each element of a card lands on a surface
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CardLayout {
    /// Centre of the name's baseline
    pub name: (Px, Px),
    /// Top left corner of the separator image
    pub separator: (Px, Px),
    /// Centre of the first body line's baseline
    pub body: (Px, Px),
    pub body_line_height: Px,
}

impl CardLayout {
    pub fn compute(name: Anchor, body: Anchor, body_font_size: Px, width: u32, height: u32) -> CardLayout {
        let (dx, dy) = SEPARATOR_OFFSET;
        CardLayout {
            name: name.resolve(width, height),
            separator: name.offset(dx, dy).resolve(width, height),
            body: body.resolve(width, height),
            body_line_height: line_height(body_font_size),
        }
    }

    /// Baseline position of the `index`th body line
    pub fn body_line(&self, index: usize) -> (Px, Px) {
        let (x, y) = self.body;
        (x, y + self.body_line_height * index as f32)
    }
}
