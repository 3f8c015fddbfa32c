use crate::colour::colours;
use crate::font::BOLD_WEIGHT;
use crate::frame::{Frame, ImageLayout, ImageSlot, Shadow, SpanFont, SpanLayout};
use crate::layout::{font_size, wrap_lines, CardLayout, SEPARATOR_SIZE};
use crate::surface::Surfaces;
use crate::{CardError, Px, RenderOptions, RenderState};
use log::debug;

/// Draw a quote card onto the surface `surface_id`.
///
/// Without a background the surface is just cleared. Otherwise the background is
/// drawn at full surface size, then (optionally) the character name and the
/// separator, then the body text wrapped to the surface width. All text is white,
/// bold, and horizontally centred on its anchor.
///
/// Returns the frame that was painted.
pub fn render(
    state: &RenderState,
    surfaces: &mut Surfaces,
    surface_id: &str,
    options: &RenderOptions,
) -> Result<Frame, CardError> {
    let surface = surfaces.get_mut(surface_id)?;
    let (width, height) = (surface.width(), surface.height());
    let pixmap = surface.context()?;

    let frame = compose(state, options, width, height);
    frame.paint(state, pixmap);

    debug!(
        "rendered surface `{surface_id}` ({width}x{height}): {} text draws, {} image draws",
        frame.spans().count(),
        frame.images().count()
    );
    Ok(frame)
}

/// Lay out a card for a `width` x `height` surface without drawing anything
pub fn compose(state: &RenderState, options: &RenderOptions, width: u32, height: u32) -> Frame {
    let mut frame = Frame::new(width, height);
    frame.clear();

    if state.background().is_none() {
        return frame;
    }

    frame.add_image(ImageLayout {
        slot: ImageSlot::Background,
        position: (Px(0.0), Px(0.0)),
        size: (Px::from(width), Px::from(height)),
    });

    let family = state.active_font_family(options.use_custom_font).to_string();
    let shadow = Shadow::new(options.with_shadow, options.shadow_offset_px);
    let body_font = SpanFont {
        family: family.clone(),
        size: font_size(options.body_font_size),
        weight: BOLD_WEIGHT,
    };
    let layout = CardLayout::compute(
        options.name_anchor(),
        options.body_anchor(),
        body_font.size,
        width,
        height,
    );

    if options.show_name {
        frame.add_span(SpanLayout {
            text: options.character_name.clone(),
            font: SpanFont {
                family,
                size: font_size(options.name_font_size),
                weight: BOLD_WEIGHT,
            },
            colour: colours::WHITE,
            shadow,
            coords: layout.name,
        });
    }

    if options.show_line && state.separator().is_some() {
        let (w, h) = SEPARATOR_SIZE;
        frame.add_image(ImageLayout {
            slot: ImageSlot::Separator,
            position: layout.separator,
            size: (Px::from(w), Px::from(h)),
        });
    }

    let measurer = state
        .fonts()
        .measurer(&body_font.family, body_font.weight, body_font.size);
    let lines = wrap_lines(&measurer, &options.body_text, Px::from(width));
    for (i, line) in lines.into_iter().enumerate() {
        frame.add_span(SpanLayout {
            text: line,
            font: body_font.clone(),
            colour: colours::WHITE,
            shadow,
            coords: layout.body_line(i),
        });
    }

    frame
}
