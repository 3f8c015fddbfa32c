//! Text wrapping and positioning for quote cards.
//!
//! Nothing in here draws; it decides what goes where, so it can be driven by any
//! width measurement and checked without a font or surface.
//!
//! - [`wrap_lines`](crate::layout::wrap_lines) - breaks text into lines that fit a pixel width,
//!   first at word boundaries, then character by character for text without spaces
//! - [`CardLayout`](crate::layout::CardLayout) - turns normalised anchors into pixel positions
//!   for the name, separator, and body block
//!
//! # Example
//!
//! ```
//! use quote_card::layout::{wrap_lines, Anchor, CardLayout};
//! use quote_card::Px;
//!
//! let measure = |s: &str| Px(s.chars().count() as f32 * 20.0);
//! let lines = wrap_lines(&measure, "It's dangerous to go alone", Px(200.0));
//! assert_eq!(lines, vec!["It's", "dangerous", "to go", "alone"]);
//!
//! let layout = CardLayout::compute(Anchor::DEFAULT, Anchor::new(0.5, 0.5), Px(40.0), 800, 600);
//! assert_eq!(layout.body_line(1), (Px(400.0), Px(346.0)));
//! ```

mod anchor;
mod text;

pub use anchor::*;
pub use text::*;
