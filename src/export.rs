use crate::surface::{Surface, Surfaces};
use crate::{CardError, RenderState};
use log::{debug, warn};
use std::io::Cursor;
use std::path::PathBuf;

/// File name used when the caller doesn't supply one
pub const DEFAULT_FILENAME: &str = "quote-card.png";

/// Hands exported bytes to the user, e.g. by saving them
pub trait Delivery {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), CardError>;
}

/// Saves exported files into a directory
pub struct FileDelivery {
    pub directory: PathBuf,
}

impl FileDelivery {
    pub fn new<P: Into<PathBuf>>(directory: P) -> FileDelivery {
        FileDelivery {
            directory: directory.into(),
        }
    }
}

impl Delivery for FileDelivery {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), CardError> {
        let path = self.directory.join(filename);
        std::fs::write(&path, bytes)?;
        debug!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Serialise the surface's current pixels as a PNG the same size as the surface
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, CardError> {
    let pixmap = surface
        .pixmap()
        .ok_or_else(|| CardError::ContextUnavailable(surface.id().to_string()))?;

    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let image = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .ok_or_else(|| CardError::Encode("pixel buffer does not match surface size".into()))?;

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| CardError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Export the surface `surface_id` as a PNG and deliver it as `filename` (or
/// [DEFAULT_FILENAME] when empty or absent).
///
/// A missing surface is an error, but a failure to serialise the pixels is only
/// logged: the call then delivers nothing and returns `Ok(None)`. On success the
/// name the file was delivered under is returned.
pub fn download_png<D: Delivery + ?Sized>(
    state: &mut RenderState,
    surfaces: &Surfaces,
    surface_id: &str,
    filename: Option<&str>,
    delivery: &mut D,
) -> Result<Option<String>, CardError> {
    let surface = surfaces.get(surface_id)?;
    let bytes = match encode_png(surface) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("could not export surface `{surface_id}`: {e}");
            return Ok(None);
        }
    };

    let filename = filename
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_FILENAME)
        .to_string();

    let resources = state.resources_mut();
    let handle = resources.create(&bytes);
    let delivered = delivery.deliver(&filename, resources.get(&handle).unwrap_or_default());
    resources.release(&handle);
    delivered?;

    Ok(Some(filename))
}
