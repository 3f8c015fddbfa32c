//! Renders quote cards: a background image with a character name, an optional
//! separator line, and wrapped body text drawn on top, exported as a PNG the same
//! size as the background.
//!
//! ```no_run
//! use quote_card::{render, download_png, FileDelivery, RenderOptions, RenderState, Surface, Surfaces};
//!
//! let mut surfaces = Surfaces::new();
//! surfaces.insert(Surface::new("card"));
//!
//! let mut state = RenderState::new();
//! let background = std::fs::read("background.png").expect("can read background");
//! state
//!     .set_background_image_from_bytes(&mut surfaces, "card", &background)
//!     .expect("can decode background");
//!
//! let options = RenderOptions {
//!     character_name: "Aoi".into(),
//!     body_text: "It's dangerous to go alone".into(),
//!     ..RenderOptions::default()
//! };
//! render(&state, &mut surfaces, "card", &options).expect("can render");
//!
//! let mut delivery = FileDelivery::new(".");
//! download_png(&mut state, &surfaces, "card", Some("card.png"), &mut delivery).expect("can export");
//! ```

mod colour;
pub use colour::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod font;
pub use font::*;

mod frame;
pub use frame::*;

mod image;
pub use self::image::*;

/// Text wrapping and positioning, independent of any font or surface
pub mod layout;

mod options;
pub use options::*;

mod render;
pub use render::*;

mod resource;
pub use resource::*;

mod state;
pub use state::*;

mod surface;
pub use surface::*;

mod units;
pub use units::*;
