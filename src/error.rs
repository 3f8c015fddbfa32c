use std::path::PathBuf;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum CardError {
    #[error("no drawing surface with id `{0}`")]
    /// No surface is registered under the requested id
    SurfaceNotFound(String),

    #[error("cannot obtain a 2d drawing context for surface `{0}`")]
    /// The surface's pixel buffer could not be allocated (e.g. a zero-sized surface)
    ContextUnavailable(String),

    #[error(transparent)]
    /// [image] failed to decode the image
    ImageDecode(#[from] image::ImageError),

    #[error(transparent)]
    /// [usvg] failed to parse the image
    Svg(#[from] usvg::Error),

    #[error("cannot read image {}", path.display())]
    /// The image file could not be read
    ImageUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("image has zero width or height")]
    /// The image decoded fine but has nothing to draw
    EmptyImage,

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FontLoad(#[from] owned_ttf_parser::FaceParsingError),

    #[error("cannot read font {}", path.display())]
    /// The font file could not be read
    FontUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error("failed to encode surface as PNG: {0}")]
    /// The surface pixels could not be serialised
    Encode(String),
}

impl CardError {
    /// Whether the error came from decoding image data, whatever the format
    pub fn is_image_decode(&self) -> bool {
        matches!(
            self,
            CardError::ImageDecode(_)
                | CardError::Svg(_)
                | CardError::ImageUnreadable { .. }
                | CardError::EmptyImage
        )
    }

    /// Whether the error came from reading or parsing font data
    pub fn is_font_load(&self) -> bool {
        matches!(
            self,
            CardError::FontLoad(_) | CardError::FontUnreadable { .. }
        )
    }
}
