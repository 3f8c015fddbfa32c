use crate::layout::TextMeasure;
use crate::{CardError, Px};
use id_arena::{Arena, Id};
use log::{debug, warn};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OutlineBuilder, OwnedFace};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::PathBuf;
use tiny_skia::{Path, PathBuilder};

/// Family name of the generic system font used when nothing else is registered
pub const GENERIC_SANS_SERIF: &str = "sans-serif";

/// Weight requested for every piece of card text
pub const BOLD_WEIGHT: u16 = 700;

/// Weight assumed for fonts loaded without an explicit one
pub const NORMAL_WEIGHT: u16 = 400;

/// Faces lighter than this are emboldened synthetically when bold is requested
const SYNTHETIC_BOLD_THRESHOLD: u16 = 600;

/// A parsed font object. Fonts can be TTF or OTF fonts and own a copy of their
/// data, so whatever the bytes were loaded from can be released once the font
/// has been created.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, CardError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    fn face_ref(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    /// Obtain the family name stored in the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the weight of the font, 400 being normal and 700 bold
    pub fn weight(&self) -> u16 {
        self.face_ref().weight().to_number()
    }

    /// Look up the glyph for a character, falling back to the replacement character,
    /// then `?`, then the font's `.notdef` glyph
    pub fn glyph(&self, ch: char) -> GlyphId {
        let face = self.face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    fn advance(&self, gid: GlyphId, scaling: Px) -> Px {
        scaling * self.face_ref().glyph_hor_advance(gid).unwrap_or_default() as f32
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn measure(&self, text: &str, size: Px) -> Px {
        let scaling = size / self.face_ref().units_per_em() as f32;
        text.chars()
            .filter(|&ch| ch != '\n')
            .map(|ch| self.advance(self.glyph(ch), scaling))
            .sum()
    }

    /// Build the filled outline of `text` with its left edge at `x` and its baseline at
    /// `baseline`. Returns [None] when nothing in the text has an outline, e.g. a
    /// string of spaces.
    pub fn text_path(&self, text: &str, size: Px, x: Px, baseline: Px) -> Option<Path> {
        let scaling = size / self.face_ref().units_per_em() as f32;
        let mut builder = PathBuilder::new();
        let mut pen = x;
        for ch in text.chars().filter(|&ch| ch != '\n') {
            let gid = self.glyph(ch);
            let mut outline = GlyphOutline {
                builder: &mut builder,
                x: pen.0,
                y: baseline.0,
                scale: scaling.0,
            };
            self.face_ref().outline_glyph(gid, &mut outline);
            pen += self.advance(gid, scaling);
        }
        builder.finish()
    }
}

/// Maps font units onto surface pixels, flipping the y axis
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    x: f32,
    y: f32,
    scale: f32,
}

impl GlyphOutline<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Where the bytes of a font come from
#[derive(Debug, Clone)]
pub enum FontSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl FontSource {
    pub fn read(self) -> Result<Vec<u8>, CardError> {
        match self {
            FontSource::Bytes(bytes) => Ok(bytes),
            FontSource::Path(path) => {
                std::fs::read(&path).map_err(|source| CardError::FontUnreadable { path, source })
            }
        }
    }
}

impl From<Vec<u8>> for FontSource {
    fn from(bytes: Vec<u8>) -> Self {
        FontSource::Bytes(bytes)
    }
}

impl From<PathBuf> for FontSource {
    fn from(path: PathBuf) -> Self {
        FontSource::Path(path)
    }
}

/// Rough per-character advance, in ems, used when no font face can be resolved at all
fn estimate_char_width(ch: char) -> f32 {
    if ch.is_whitespace() {
        0.25
    } else if ch.is_ascii_alphanumeric() {
        0.55
    } else if ch.is_ascii() {
        0.35
    } else if matches!(
        ch as u32,
        0x3040..=0x30FF | 0x31F0..=0x31FF | 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xAC00..=0xD7AF | 0xFF00..=0xFFEF
    ) {
        1.0
    } else {
        0.9
    }
}

/// Estimate the width of `text` at `size` without any font data
pub fn estimate_text_width(text: &str, size: Px) -> Px {
    size * text
        .chars()
        .filter(|&ch| ch != '\n')
        .map(estimate_char_width)
        .sum::<f32>()
}

/// The face chosen for a family and weight
#[derive(Clone, Copy)]
pub struct FaceMatch<'a> {
    pub font: &'a Font,
    /// The face is lighter than the requested weight and must be emboldened when drawn
    pub synthetic_bold: bool,
}

/// Measures text with one resolved face at one size, falling back to an estimate
/// when no face could be resolved
#[derive(Clone, Copy)]
pub struct FontMeasure<'a> {
    face: Option<FaceMatch<'a>>,
    size: Px,
}

impl FontMeasure<'_> {
    /// Whether measurements come from real font metrics
    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn measure(&self, text: &str) -> Px {
        match self.face {
            Some(face) => face.font.measure(text, self.size),
            None => estimate_text_width(text, self.size),
        }
    }
}

struct FaceEntry {
    weight: u16,
    id: Id<Font>,
}

/// Every font face registered for rendering, grouped by family name. Each
/// family and weight pair owns one slot in the arena; registering the pair again
/// replaces the face in that slot and drops the old one.
pub struct FontBook {
    fonts: Arena<Font>,
    families: HashMap<String, Vec<FaceEntry>>,
    system_fonts: bool,
    system: OnceCell<Option<Font>>,
}

impl Default for FontBook {
    fn default() -> Self {
        FontBook::new()
    }
}

impl FontBook {
    pub fn new() -> FontBook {
        FontBook {
            fonts: Arena::new(),
            families: HashMap::new(),
            system_fonts: true,
            system: OnceCell::new(),
        }
    }

    /// A book that never consults the fonts installed on the host for
    /// [GENERIC_SANS_SERIF]; text in that family is measured by estimate and
    /// not drawn.
    pub fn without_system_fonts() -> FontBook {
        FontBook {
            system_fonts: false,
            ..FontBook::new()
        }
    }

    /// Register `font` under `family` at `weight`, replacing any face previously
    /// registered for that exact family and weight
    pub fn add(&mut self, family: &str, font: Font, weight: u16) {
        let faces = self.families.entry(family.to_string()).or_default();
        let existing = faces
            .iter()
            .find(|entry| entry.weight == weight)
            .map(|entry| entry.id);
        match existing.and_then(|id| self.fonts.get_mut(id)) {
            Some(slot) => {
                *slot = font;
                debug!("replaced font family `{family}` at weight {weight}");
            }
            None => {
                let id = self.fonts.alloc(font);
                faces.push(FaceEntry { weight, id });
                debug!("registered font family `{family}` at weight {weight}");
            }
        }
    }

    /// Number of faces held, one per registered family and weight
    pub fn face_count(&self) -> usize {
        self.fonts.len()
    }

    /// Pick the face of `family` whose weight is closest to `weight`. The generic
    /// [GENERIC_SANS_SERIF] family resolves to a system font unless a face was
    /// registered under that name explicitly.
    pub fn select(&self, family: &str, weight: u16) -> Option<FaceMatch<'_>> {
        let (font, face_weight) = match self.families.get(family) {
            Some(faces) => {
                let entry = faces
                    .iter()
                    .min_by_key(|entry| (entry.weight as i32 - weight as i32).abs())?;
                (self.fonts.get(entry.id)?, entry.weight)
            }
            None if family == GENERIC_SANS_SERIF => {
                let font = self.system_sans_serif()?;
                (font, font.weight())
            }
            None => return None,
        };

        Some(FaceMatch {
            font,
            synthetic_bold: weight >= SYNTHETIC_BOLD_THRESHOLD
                && face_weight < SYNTHETIC_BOLD_THRESHOLD,
        })
    }

    /// A measurer for text drawn in `family` at `weight` and `size`
    pub fn measurer(&self, family: &str, weight: u16, size: Px) -> FontMeasure<'_> {
        FontMeasure {
            face: self.select(family, weight),
            size,
        }
    }

    fn system_sans_serif(&self) -> Option<&Font> {
        if !self.system_fonts {
            return None;
        }
        self.system.get_or_init(load_system_sans_serif).as_ref()
    }
}

fn load_system_sans_serif() -> Option<Font> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let families = [
        fontdb::Family::SansSerif,
        fontdb::Family::Name("DejaVu Sans"),
        fontdb::Family::Name("Liberation Sans"),
        fontdb::Family::Name("Noto Sans"),
        fontdb::Family::Name("Helvetica"),
    ];
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::BOLD,
        ..fontdb::Query::default()
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|face| face.id));
    let Some(id) = id else {
        warn!("no system fonts found; text will be measured by estimate and not drawn");
        return None;
    };

    let font = db
        .with_face_data(id, |data, index| OwnedFace::from_vec(data.to_vec(), index))?
        .map(|face| Font { face });
    match font {
        Ok(font) => {
            debug!(
                "resolved `{GENERIC_SANS_SERIF}` to system font {:?}",
                font.family()
            );
            Some(font)
        }
        Err(e) => {
            warn!("failed to parse system font for `{GENERIC_SANS_SERIF}`: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUFFY: &[u8] = include_bytes!("../tests/assets/Tuffy.ttf");
    const MONO_BOLD: &[u8] = include_bytes!("../tests/assets/DejaVuSansMono-Bold.ttf");

    fn font(bytes: &[u8]) -> Font {
        Font::load(bytes.to_vec()).expect("valid font")
    }

    #[test]
    fn reads_family_and_weight() {
        let tuffy = font(TUFFY);
        assert_eq!(tuffy.family().as_deref(), Some("Tuffy"));
        assert_eq!(tuffy.weight(), 500);

        let mono = font(MONO_BOLD);
        assert_eq!(mono.family().as_deref(), Some("DejaVu Sans Mono"));
        assert_eq!(mono.weight(), 700);
    }

    #[test]
    fn measures_with_glyph_advances() {
        let mono = font(MONO_BOLD);
        // 2048 units per em, so at 2048px one unit is one pixel
        assert!((mono.measure("a", Px(2048.0)).0 - 1233.0).abs() < 0.01);
        let one = mono.measure("W", Px(40.0));
        assert!((mono.measure("WiW", Px(40.0)).0 - 3.0 * one.0).abs() < 0.01);
        assert_eq!(mono.measure("", Px(40.0)), Px(0.0));
    }

    #[test]
    fn missing_characters_use_a_fallback_glyph() {
        let mono = font(MONO_BOLD);
        let missing = mono.glyph('\u{10FFFD}');
        assert_ne!(missing, GlyphId(0));
        assert_ne!(missing, mono.glyph('A'));
    }

    #[test]
    fn text_path_sits_on_the_baseline() {
        let mono = font(MONO_BOLD);
        let path = mono
            .text_path("HH", Px(40.0), Px(10.0), Px(50.0))
            .expect("has outline");
        let bounds = path.bounds();
        assert!(bounds.left() >= 10.0);
        assert!(bounds.right() <= 10.0 + mono.measure("HH", Px(40.0)).0);
        assert!((bounds.bottom() - 50.0).abs() < 0.5);
        assert!(bounds.top() < 25.0);

        assert!(mono.text_path("   ", Px(40.0), Px(0.0), Px(50.0)).is_none());
    }

    #[test]
    fn select_picks_the_closest_weight() {
        let mut book = FontBook::without_system_fonts();
        book.add("Card", font(TUFFY), 500);
        book.add("Card", font(MONO_BOLD), BOLD_WEIGHT);

        let bold = book.select("Card", BOLD_WEIGHT).expect("has face");
        assert_eq!(bold.font.family().as_deref(), Some("DejaVu Sans Mono"));
        assert!(!bold.synthetic_bold);

        let regular = book.select("Card", NORMAL_WEIGHT).expect("has face");
        assert_eq!(regular.font.family().as_deref(), Some("Tuffy"));
        assert!(!regular.synthetic_bold);
    }

    #[test]
    fn light_face_is_emboldened_when_bold_is_requested() {
        let mut book = FontBook::without_system_fonts();
        book.add("Card", font(TUFFY), 500);

        assert!(book.select("Card", BOLD_WEIGHT).expect("has face").synthetic_bold);
        assert!(!book.select("Card", NORMAL_WEIGHT).expect("has face").synthetic_bold);
    }

    #[test]
    fn registering_again_replaces_the_face() {
        let mut book = FontBook::without_system_fonts();
        for _ in 0..5 {
            book.add("Custom", font(TUFFY), BOLD_WEIGHT);
        }
        book.add("Custom", font(MONO_BOLD), BOLD_WEIGHT);

        assert_eq!(book.face_count(), 1);
        assert_eq!(book.families["Custom"].len(), 1);
        let face = book.select("Custom", BOLD_WEIGHT).expect("has face");
        assert_eq!(face.font.family().as_deref(), Some("DejaVu Sans Mono"));

        book.add("Custom", font(TUFFY), NORMAL_WEIGHT);
        assert_eq!(book.face_count(), 2);
    }

    #[test]
    fn measurer_uses_the_face_when_there_is_one() {
        let mut book = FontBook::without_system_fonts();
        book.add("Card", font(MONO_BOLD), BOLD_WEIGHT);
        let measure = book.measurer("Card", BOLD_WEIGHT, Px(40.0));
        assert!(measure.has_face());
        assert_eq!(measure.measure("quote"), font(MONO_BOLD).measure("quote", Px(40.0)));
    }

    #[test]
    fn invalid_font_data_is_rejected() {
        assert!(matches!(
            Font::load(b"definitely not a font".to_vec()),
            Err(CardError::FontLoad(_))
        ));
    }

    #[test]
    fn missing_font_file_is_a_font_load_error() {
        let source = FontSource::Path(PathBuf::from("/nonexistent/quote-card/font.ttf"));
        let err = source.read().expect_err("fails");
        assert!(matches!(err, CardError::FontUnreadable { .. }));
        assert!(err.is_font_load());
    }

    #[test]
    fn estimate_scales_with_size() {
        assert!((estimate_text_width("ab", Px(10.0)).0 - 11.0).abs() < 1e-4);
        assert_eq!(estimate_text_width("", Px(10.0)), Px(0.0));
        assert!(estimate_text_width("漢", Px(10.0)) > estimate_text_width("a", Px(10.0)));
    }

    #[test]
    fn unknown_family_has_no_face() {
        let book = FontBook::without_system_fonts();
        assert!(book.select("Nope", BOLD_WEIGHT).is_none());
        assert!(book.select(GENERIC_SANS_SERIF, BOLD_WEIGHT).is_none());
    }

    #[test]
    fn measurer_without_a_face_estimates() {
        let book = FontBook::without_system_fonts();
        let measure = book.measurer("Nope", BOLD_WEIGHT, Px(20.0));
        assert!(!measure.has_face());
        assert_eq!(measure.measure("  "), estimate_text_width("  ", Px(20.0)));
    }
}
