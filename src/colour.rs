/// A straight (non-premultiplied) RGBA colour; all components range from 0.0 to 1.0
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    /// Create a new colour with an alpha channel. r, g, b, and a range from 0.0 to 1.0
    pub fn new_rgba(r: f32, g: f32, b: f32, a: f32) -> Colour {
        Colour { r, g, b, a }
    }

    /// A colour that draws nothing at all
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl From<Colour> for tiny_skia::Color {
    fn from(c: Colour) -> Self {
        tiny_skia::Color::from_rgba(
            c.r.clamp(0.0, 1.0),
            c.g.clamp(0.0, 1.0),
            c.b.clamp(0.0, 1.0),
            c.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const WHITE: Colour = Colour {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    /// Drop shadow behind card text, `rgba(0, 0, 0, 0.6)`
    pub const SHADOW: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.6,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_components_are_clamped() {
        let c: tiny_skia::Color = Colour::new_rgba(2.0, -1.0, 0.5, 1.5).into();
        assert_eq!(c.red(), 1.0);
        assert_eq!(c.green(), 0.0);
        assert_eq!(c.blue(), 0.5);
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn shadow_is_translucent_black() {
        assert!(!colours::SHADOW.is_transparent());
        assert!(colours::TRANSPARENT.is_transparent());
        let c: tiny_skia::Color = colours::SHADOW.into();
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0.0, 0.0, 0.0, 0.6));
    }
}
