use crate::CardError;
use log::debug;
use std::collections::HashMap;
use tiny_skia::Pixmap;

/// Width of a freshly created surface, before any background has been loaded
pub const DEFAULT_WIDTH: u32 = 300;
/// Height of a freshly created surface, before any background has been loaded
pub const DEFAULT_HEIGHT: u32 = 150;

/// An addressable 2D drawing target with mutable pixel dimensions. Changing the
/// dimensions discards the current contents, leaving a transparent surface.
pub struct Surface {
    id: String,
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl Surface {
    /// Create a surface with the default dimensions
    pub fn new<S: ToString>(id: S) -> Surface {
        Surface::with_size(id, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn with_size<S: ToString>(id: S, width: u32, height: u32) -> Surface {
        Surface {
            id: id.to_string(),
            width,
            height,
            pixmap: Pixmap::new(width, height),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set new pixel dimensions, clearing the surface
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!(
            "resizing surface `{}` from {}x{} to {width}x{height}",
            self.id, self.width, self.height
        );
        self.width = width;
        self.height = height;
        self.pixmap = Pixmap::new(width, height);
    }

    /// Obtain the pixel buffer to draw into. Fails when no buffer can exist for the
    /// current dimensions (either of them is zero).
    pub fn context(&mut self) -> Result<&mut Pixmap, CardError> {
        let id = &self.id;
        self.pixmap
            .as_mut()
            .ok_or_else(|| CardError::ContextUnavailable(id.clone()))
    }

    /// The current pixels, if the surface has any
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }
}

/// All surfaces known to the host, addressed by id
#[derive(Default)]
pub struct Surfaces {
    surfaces: HashMap<String, Surface>,
}

impl Surfaces {
    pub fn new() -> Surfaces {
        Surfaces::default()
    }

    /// Add a surface, replacing any surface already registered under the same id
    pub fn insert(&mut self, surface: Surface) {
        self.surfaces.insert(surface.id.clone(), surface);
    }

    pub fn get(&self, id: &str) -> Result<&Surface, CardError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| CardError::SurfaceNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Surface, CardError> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| CardError::SurfaceNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_clears_and_changes_dimensions() {
        let mut surface = Surface::new("card");
        assert_eq!((surface.width(), surface.height()), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        surface
            .context()
            .expect("has context")
            .fill(tiny_skia::Color::WHITE);

        surface.resize(800, 600);
        let pixmap = surface.pixmap().expect("has pixels");
        assert_eq!((pixmap.width(), pixmap.height()), (800, 600));
        assert_eq!(pixmap.pixel(0, 0).map(|p| p.alpha()), Some(0));
    }

    #[test]
    fn zero_sized_surface_has_no_context() {
        let mut surface = Surface::with_size("empty", 0, 10);
        assert!(matches!(
            surface.context(),
            Err(CardError::ContextUnavailable(id)) if id == "empty"
        ));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut surfaces = Surfaces::new();
        surfaces.insert(Surface::new("card"));
        assert!(surfaces.get("card").is_ok());
        assert!(matches!(
            surfaces.get_mut("other"),
            Err(CardError::SurfaceNotFound(id)) if id == "other"
        ));
    }
}
