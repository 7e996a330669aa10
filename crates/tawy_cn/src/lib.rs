//! # Tawy Component Library (tawy_cn)
//!
//! Page components for the Tawy blog front end, built on `tawy_layout`
//! primitives and driven by the `tawy_core` timer scheduler.
//!
//! - **Primitives**: `tawy_layout` provides the element builders and the page document
//! - **Runtime**: `tawy_core` provides input events and timers
//! - **Components**: `tawy_cn` provides the hero carousel and its configuration
//!
//! ## Example
//!
//! ```rust
//! use tawy_cn::prelude::*;
//! use tawy_core::TimerScheduler;
//! use tawy_layout::Document;
//! use std::time::Duration;
//!
//! let doc = Document::new();
//! let hero = doc.create_element("div");
//! doc.set_attr(hero, "id", "hero");
//! doc.append_child(doc.body(), hero).unwrap();
//!
//! let scheduler = TimerScheduler::new();
//! let carousel = Carousel::builder(&doc, &scheduler)
//!     .config(CarouselConfig::sample())
//!     .mount("hero");
//!
//! scheduler.advance(Duration::from_millis(5000));
//! assert_eq!(carousel.current_slide(), 1);
//! ```
//!
//! ## Components
//!
//! - **Carousel** - Rotating hero banner with buttons, indicators, keyboard,
//!   swipe and auto-play

pub mod components;
pub mod config;
pub mod error;
pub mod scroll;

pub use components::*;
pub use config::{CarouselConfig, CarouselConfigPatch, CarouselSettings, CtaTarget, Slide};
pub use error::{CarouselError, ConfigError, Result};
pub use scroll::{DocumentScroller, SectionScroller, DEFAULT_HEADER_OFFSET};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::components::carousel::{Carousel, CarouselBuilder};
    pub use crate::config::{CarouselConfig, CarouselConfigPatch, CarouselSettings, Slide};
    pub use crate::scroll::{DocumentScroller, SectionScroller};
}
