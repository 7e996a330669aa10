//! Page components built on tawy_layout primitives
//!
//! Each component follows the same split:
//! - A pure view function building the markup from configuration
//! - A stateful handle that mounts the markup and wires behaviour onto it

pub mod carousel;
pub mod carousel_view;

pub use carousel::{Carousel, CarouselBuilder, FORCE_HOVER_CLASS, HOVER_CLASS, SWIPE_THRESHOLD};
pub use carousel_view::carousel_view;
