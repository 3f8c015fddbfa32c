use crate::font::{Font, FontBook, FontSource, GENERIC_SANS_SERIF};
use crate::resource::{ResourceHandle, ResourceStore};
use crate::surface::Surfaces;
use crate::{CardError, Image};
use log::debug;
use std::path::Path;

/// Everything loaded for rendering cards: the background, fonts, and the
/// separator image. The host creates one, mutates it through the loader methods,
/// and hands it to [render](crate::render).
///
/// Every loader either succeeds completely or leaves the state exactly as it was.
/// Loads take `&mut self`, so they are serialised by construction and a slower
/// load can never overwrite a newer one or strand its resource handle.
pub struct RenderState {
    background: Option<Image>,
    background_handle: Option<ResourceHandle>,
    bundled_font_family: Option<String>,
    custom_font_family: Option<String>,
    separator: Option<Image>,
    fonts: FontBook,
    resources: ResourceStore,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState::new()
    }
}

impl RenderState {
    /// An empty state: no background, no fonts, no separator
    pub fn new() -> RenderState {
        RenderState::with_font_book(FontBook::new())
    }

    /// An empty state whose generic fallback font is never looked up on the host
    pub fn without_system_fonts() -> RenderState {
        RenderState::with_font_book(FontBook::without_system_fonts())
    }

    fn with_font_book(fonts: FontBook) -> RenderState {
        RenderState {
            background: None,
            background_handle: None,
            bundled_font_family: None,
            custom_font_family: None,
            separator: None,
            fonts,
            resources: ResourceStore::new(),
        }
    }

    /// Register the font shipped with the host under `family`, declaring its
    /// `weight` (400 for regular, 700 for bold). Text falls back to this family
    /// whenever no custom font is in use.
    pub fn load_bundled_font<S: Into<FontSource>>(
        &mut self,
        family: &str,
        source: S,
        weight: u16,
    ) -> Result<(), CardError> {
        let font = Font::load(source.into().read()?)?;
        self.fonts.add(family, font, weight);
        self.bundled_font_family = Some(family.to_string());
        debug!("bundled font family is now `{family}`");
        Ok(())
    }

    /// Register a user supplied font under `family` and select it as the custom font.
    /// The bytes are only held for as long as it takes to parse them.
    pub fn load_font_from_bytes(&mut self, bytes: &[u8], family: &str) -> Result<(), CardError> {
        let handle = self.resources.create(bytes);
        let data = self.resources.get(&handle).map(<[u8]>::to_vec).unwrap_or_default();
        let loaded = Font::load(data);
        self.resources.release(&handle);

        let font = loaded?;
        let weight = font.weight();
        self.fonts.add(family, font, weight);
        self.custom_font_family = Some(family.to_string());
        debug!(
            "custom font family is now `{family}` ({} faces registered)",
            self.fonts.face_count()
        );
        Ok(())
    }

    /// Stop using the custom font. The font stays registered.
    pub fn clear_custom_font(&mut self) {
        self.custom_font_family = None;
    }

    /// Decode `bytes` as the new background and resize the surface `surface_id` to
    /// the image's natural size. The previous background's handle is released
    /// before the new one is stored.
    pub fn set_background_image_from_bytes(
        &mut self,
        surfaces: &mut Surfaces,
        surface_id: &str,
        bytes: &[u8],
    ) -> Result<(), CardError> {
        let surface = surfaces.get_mut(surface_id)?;
        let image = Image::new_raster(bytes)?;

        if let Some(old) = self.background_handle.take() {
            self.resources.release(&old);
        }
        let handle = self.resources.create(bytes);
        debug!(
            "background {handle} is {}x{}",
            image.width(),
            image.height()
        );
        surface.resize(image.width(), image.height());
        self.background = Some(image);
        self.background_handle = Some(handle);
        Ok(())
    }

    /// Load the decorative separator from a file; `.svg` files are rendered, anything
    /// else is decoded as a raster image
    pub fn load_separator_image<P: AsRef<Path>>(&mut self, location: P) -> Result<(), CardError> {
        let image = Image::new_from_disk(location)?;
        self.separator = Some(image);
        Ok(())
    }

    /// Release the background and its handle. Safe to call any number of times.
    pub fn dispose_background(&mut self) {
        if let Some(handle) = self.background_handle.take() {
            self.resources.release(&handle);
        }
        self.background = None;
    }

    pub fn background(&self) -> Option<&Image> {
        self.background.as_ref()
    }

    pub fn background_handle(&self) -> Option<&ResourceHandle> {
        self.background_handle.as_ref()
    }

    pub fn separator(&self) -> Option<&Image> {
        self.separator.as_ref()
    }

    pub fn bundled_font_family(&self) -> Option<&str> {
        self.bundled_font_family.as_deref()
    }

    pub fn custom_font_family(&self) -> Option<&str> {
        self.custom_font_family.as_deref()
    }

    /// The family text is drawn in: the custom font when requested and loaded, else the
    /// bundled font, else the generic system sans-serif
    pub fn active_font_family(&self, use_custom_font: bool) -> &str {
        self.custom_font_family
            .as_deref()
            .filter(|_| use_custom_font)
            .or(self.bundled_font_family.as_deref())
            .unwrap_or(GENERIC_SANS_SERIF)
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    pub(crate) fn resources_mut(&mut self) -> &mut ResourceStore {
        &mut self.resources
    }
}
