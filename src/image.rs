use crate::CardError;
use log::debug;
use std::path::Path;
use tiny_skia::{ColorU8, IntSize, Pixmap, Transform};
use usvg::Tree;

/// A decoded image, kept as a premultiplied RGBA pixmap ready to be blitted onto
/// a surface. Raster formats are decoded by [image]; SVGs are rendered once at
/// their natural size by [resvg].
pub struct Image {
    pixmap: Pixmap,
}

impl Image {
    /// Load an image from a file, treating `.svg` files as vector images and anything
    /// else as a raster image whose format is guessed from its contents
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image, CardError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);

        let data = std::fs::read(path).map_err(|source| CardError::ImageUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let image = if is_svg {
            Self::new_svg(&data)?
        } else {
            Self::new_raster(&data)?
        };
        debug!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    /// Decode a raster image (PNG, JPEG, GIF, BMP, WebP) from raw bytes
    pub fn new_raster(data: &[u8]) -> Result<Image, CardError> {
        let decoded = image::load_from_memory(data)?.to_rgba8();
        let size = IntSize::from_wh(decoded.width(), decoded.height()).ok_or(CardError::EmptyImage)?;

        let pixels: Vec<u8> = decoded
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0;
                let c = ColorU8::from_rgba(r, g, b, a).premultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let pixmap = Pixmap::from_vec(pixels, size).ok_or(CardError::EmptyImage)?;

        Ok(Image { pixmap })
    }

    /// Parse an SVG document and render it at its natural size
    pub fn new_svg(data: &[u8]) -> Result<Image, CardError> {
        let tree = Tree::from_data(data, &usvg::Options::default())?;
        let size = tree.size().to_int_size();
        let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or(CardError::EmptyImage)?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

        Ok(Image { pixmap })
    }

    /// Natural width in pixels
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Natural height in pixels
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 128]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("can encode png");
        bytes
    }

    #[test]
    fn raster_keeps_natural_size_and_premultiplies() {
        let image = Image::new_raster(&png(7, 3)).expect("can decode");
        assert_eq!((image.width(), image.height()), (7, 3));
        let px = image.pixmap().pixel(0, 0).expect("has pixel");
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 128);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Image::new_raster(b"not an image").err().expect("fails");
        assert!(err.is_image_decode());
    }

    #[test]
    fn unreadable_file_is_a_decode_error() {
        let err = Image::new_from_disk("/nonexistent/quote-card/line.png")
            .err()
            .expect("fails");
        assert!(matches!(err, CardError::ImageUnreadable { .. }));
        assert!(err.is_image_decode());
    }

    #[test]
    fn svg_renders_at_natural_size() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="4"><rect width="20" height="4" fill="white"/></svg>"#;
        let image = Image::new_svg(svg).expect("can parse");
        assert_eq!((image.width(), image.height()), (20, 4));
        assert_eq!(image.pixmap().pixel(10, 2).map(|p| p.alpha()), Some(255));
    }
}
