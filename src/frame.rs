use crate::colour::{colours, Colour};
use crate::font::FontBook;
use crate::{Image, Px, RenderState};
use log::debug;
use tiny_skia::{
    FillRule, FilterQuality, LineJoin, Paint, Path, Pixmap, PixmapPaint, Stroke, Transform,
};

/// How text casts its shadow
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Shadow {
    pub colour: Colour,
    pub offset: (Px, Px),
    pub blur: Px,
}

impl Shadow {
    /// A shadow that draws nothing
    pub const NONE: Shadow = Shadow {
        colour: colours::TRANSPARENT,
        offset: (Px(0.0), Px(0.0)),
        blur: Px(0.0),
    };

    /// The card shadow: translucent black, unblurred, offset equally down and right.
    /// Disabled shadows (and non-finite offsets) collapse to [Shadow::NONE].
    pub fn new(enabled: bool, offset: f32) -> Shadow {
        if !enabled {
            return Shadow::NONE;
        }
        let offset = if offset.is_finite() { Px(offset) } else { Px(0.0) };
        Shadow {
            colour: colours::SHADOW,
            offset: (offset, offset),
            blur: Px(0.0),
        }
    }

    /// A shadow directly under its text with no blur is hidden by the text itself,
    /// so it is only visible once it is offset or blurred
    pub fn is_visible(&self) -> bool {
        let (dx, dy) = self.offset;
        let displaced = dx != Px(0.0) || dy != Px(0.0) || self.blur > Px(0.0);
        !self.colour.is_transparent() && displaced
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub family: String,
    pub size: Px,
    pub weight: u16,
}

/// A single line of text, horizontally centred on `coords.0` with its baseline at
/// `coords.1`
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub shadow: Shadow,
    pub coords: (Px, Px),
}

/// The images a frame can draw, all owned by the [RenderState]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ImageSlot {
    Background,
    Separator,
}

/// An image stretched into the box at `position` (top left) of `size`
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub slot: ImageSlot,
    pub position: (Px, Px),
    pub size: (Px, Px),
}

#[derive(Clone, PartialEq, Debug)]
pub enum FrameContents {
    /// Reset every pixel to transparent
    Clear,
    Text(SpanLayout),
    Image(ImageLayout),
}

/// Everything drawn onto a surface by one render, in drawing order
#[derive(Clone, PartialEq, Debug)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub contents: Vec<FrameContents>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Frame {
        Frame {
            width,
            height,
            contents: Vec::default(),
        }
    }

    pub fn clear(&mut self) {
        self.contents.push(FrameContents::Clear);
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(FrameContents::Text(span));
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(FrameContents::Image(image));
    }

    /// Every text draw, in order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents.iter().filter_map(|c| match c {
            FrameContents::Text(span) => Some(span),
            _ => None,
        })
    }

    /// Every image draw, in order
    pub fn images(&self) -> impl Iterator<Item = &ImageLayout> {
        self.contents.iter().filter_map(|c| match c {
            FrameContents::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Whether the frame does nothing beyond clearing the surface
    pub fn is_blank(&self) -> bool {
        self.contents
            .iter()
            .all(|c| matches!(c, FrameContents::Clear))
    }

    /// Rasterise the frame onto `pixmap`
    pub fn paint(&self, state: &RenderState, pixmap: &mut Pixmap) {
        for content in self.contents.iter() {
            match content {
                FrameContents::Clear => pixmap.fill(tiny_skia::Color::TRANSPARENT),
                FrameContents::Image(layout) => {
                    let image = match layout.slot {
                        ImageSlot::Background => state.background(),
                        ImageSlot::Separator => state.separator(),
                    };
                    if let Some(image) = image {
                        paint_image(pixmap, image, layout);
                    }
                }
                FrameContents::Text(span) => paint_span(pixmap, state.fonts(), span),
            }
        }
    }
}

fn paint_image(pixmap: &mut Pixmap, image: &Image, layout: &ImageLayout) {
    let sx = layout.size.0 / Px::from(image.width());
    let sy = layout.size.1 / Px::from(image.height());
    let quality = if sx == 1.0 && sy == 1.0 {
        FilterQuality::Nearest
    } else {
        FilterQuality::Bilinear
    };
    let paint = PixmapPaint {
        quality,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_row(sx, 0.0, 0.0, sy, layout.position.0 .0, layout.position.1 .0);
    pixmap.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
}

fn paint_span(pixmap: &mut Pixmap, fonts: &FontBook, span: &SpanLayout) {
    let SpanFont {
        family,
        size,
        weight,
    } = &span.font;
    let Some(face) = fonts.select(family, *weight) else {
        debug!("no face for `{family}`; skipping {:?}", span.text);
        return;
    };

    let width = face.font.measure(&span.text, *size);
    let (centre, baseline) = span.coords;
    let Some(path) = face.font.text_path(&span.text, *size, centre - width / 2.0, baseline) else {
        // nothing visible, e.g. a blank line
        return;
    };

    let embolden = face.synthetic_bold.then(|| Stroke {
        width: (size.0 / 24.0).max(0.5),
        line_join: LineJoin::Round,
        ..Stroke::default()
    });

    if span.shadow.is_visible() {
        let (dx, dy) = span.shadow.offset;
        let transform = Transform::from_translate(dx.0, dy.0);
        fill_text(pixmap, &path, span.shadow.colour, embolden.as_ref(), transform);
    }
    fill_text(pixmap, &path, span.colour, embolden.as_ref(), Transform::identity());
}

fn fill_text(
    pixmap: &mut Pixmap,
    path: &Path,
    colour: Colour,
    embolden: Option<&Stroke>,
    transform: Transform,
) {
    let mut paint = Paint::default();
    paint.set_color(colour.into());
    paint.anti_alias = true;

    pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
    if let Some(stroke) = embolden {
        pixmap.stroke_path(path, &paint, stroke, transform, None);
    }
}
