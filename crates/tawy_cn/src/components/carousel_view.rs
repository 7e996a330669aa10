//! Carousel markup
//!
//! A pure function from configuration to an [`Element`] tree. The component
//! mounts the result and then wires behaviour onto it by class and id, so the
//! names below are the contract between this module and `carousel`.
//!
//! ```text
//! section#home.carousel-section
//! └── div.carousel-container
//!     ├── div.carousel
//!     │   └── div.slide[.active][data-slide-id][style]   (one per slide)
//!     │       ├── div.slide-content > h1, p, button.cta-button[data-link]
//!     │       └── div.slide-image > (image block | placeholder)
//!     ├── button#prevBtn.carousel-btn.prev-btn            (enableButtons)
//!     ├── button#nextBtn.carousel-btn.next-btn            (enableButtons)
//!     └── div.carousel-indicators > span.indicator[data-slide]   (enableIndicators)
//! ```

use tawy_layout::prelude::*;
use tawy_layout::HIDDEN_CLASS;

use crate::config::{CarouselConfig, Slide};

pub const SECTION_ID: &str = "home";
pub const SECTION_CLASS: &str = "carousel-section";
pub const CONTAINER_CLASS: &str = "carousel-container";
pub const TRACK_CLASS: &str = "carousel";
pub const SLIDE_CLASS: &str = "slide";
pub const ACTIVE_CLASS: &str = "active";
pub const CTA_CLASS: &str = "cta-button";
pub const IMAGE_CONTAINER_CLASS: &str = "slide-image-container";
pub const IMAGE_CLASS: &str = "slide-image-file";
pub const PLACEHOLDER_CLASS: &str = "placeholder-image";
pub const INDICATOR_CLASS: &str = "indicator";
pub const EMPTY_CLASS: &str = "carousel-empty";
pub const PREV_BUTTON_ID: &str = "prevBtn";
pub const NEXT_BUTTON_ID: &str = "nextBtn";

/// Build the full carousel markup for a configuration
pub fn carousel_view(config: &CarouselConfig) -> Element {
    let settings = &config.settings;
    let has_slides = !config.slides.is_empty();

    let track = if has_slides {
        div()
            .class(TRACK_CLASS)
            .children(config.slides.iter().enumerate().map(|(i, s)| slide_view(s, i == 0)))
    } else {
        div().class(TRACK_CLASS).class(EMPTY_CLASS).child(
            div()
                .class("carousel-empty-state")
                .child(i().class("fas fa-images"))
                .child(p().text("Nothing to show yet")),
        )
    };

    let container = div()
        .class(CONTAINER_CLASS)
        .child(track)
        .when(has_slides && settings.enable_buttons, |c| c.children(buttons_view()))
        .when(has_slides && settings.enable_indicators, |c| {
            c.child(indicators_view(config.slides.len()))
        });

    section().id(SECTION_ID).class(SECTION_CLASS).child(container)
}

fn slide_view(slide: &Slide, active: bool) -> Element {
    div()
        .class(SLIDE_CLASS)
        .class_if(active, ACTIVE_CLASS)
        .attr("data-slide-id", slide.id.to_string())
        .style(format!("background: {}", slide.background))
        .child(
            div()
                .class("slide-content")
                .child(h1().text(&slide.title))
                .child(p().text(&slide.description))
                .child(
                    button()
                        .class(CTA_CLASS)
                        .attr("data-link", &slide.button_link)
                        .text(&slide.button_text),
                ),
        )
        .child(div().class("slide-image").child(image_view(slide)))
}

/// Image with a hidden fallback, or the fallback alone when there is no image
fn image_view(slide: &Slide) -> Element {
    match &slide.image {
        Some(src) => div()
            .class(IMAGE_CONTAINER_CLASS)
            .child(
                img()
                    .class(IMAGE_CLASS)
                    .attr("src", src)
                    .attr("alt", &slide.title),
            )
            .child(placeholder_view(&slide.fallback_icon).class(HIDDEN_CLASS)),
        None => placeholder_view(&slide.fallback_icon),
    }
}

fn placeholder_view(icon: &str) -> Element {
    div().class(PLACEHOLDER_CLASS).child(i().class(icon))
}

fn buttons_view() -> [Element; 2] {
    [
        button()
            .id(PREV_BUTTON_ID)
            .class("carousel-btn prev-btn")
            .attr("aria-label", "Previous slide")
            .child(i().class("fas fa-chevron-left")),
        button()
            .id(NEXT_BUTTON_ID)
            .class("carousel-btn next-btn")
            .attr("aria-label", "Next slide")
            .child(i().class("fas fa-chevron-right")),
    ]
}

fn indicators_view(count: usize) -> Element {
    div().class("carousel-indicators").children((0..count).map(|index| {
        span()
            .class(INDICATOR_CLASS)
            .class_if(index == 0, ACTIVE_CLASS)
            .attr("data-slide", index.to_string())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarouselSettings;

    fn find<'a>(root: &'a Element, class: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        root.find_by_class(class, &mut out);
        out
    }

    #[test]
    fn test_sample_structure() {
        let view = carousel_view(&CarouselConfig::sample());
        assert_eq!(view.get_id(), Some(SECTION_ID));

        let slides = find(&view, SLIDE_CLASS);
        assert_eq!(slides.len(), 3);
        assert!(slides[0].has_class(ACTIVE_CLASS));
        assert!(slides[1..].iter().all(|s| !s.has_class(ACTIVE_CLASS)));
        assert_eq!(slides[1].get_attr("data-slide-id"), Some("2"));
        assert_eq!(
            slides[2].get_attr("style"),
            Some("background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)")
        );

        let indicators = find(&view, INDICATOR_CLASS);
        assert_eq!(indicators.len(), 3);
        assert!(indicators[0].has_class(ACTIVE_CLASS));
        assert_eq!(indicators[2].get_attr("data-slide"), Some("2"));

        assert_eq!(find(&view, "prev-btn").len(), 1);
        assert_eq!(find(&view, "next-btn").len(), 1);
    }

    #[test]
    fn test_image_block_has_hidden_fallback() {
        let view = carousel_view(&CarouselConfig::sample());
        let containers = find(&view, IMAGE_CONTAINER_CLASS);
        assert_eq!(containers.len(), 3);

        let children = containers[0].get_children();
        assert_eq!(children[0].tag(), "img");
        assert_eq!(children[0].get_attr("src"), Some("imags/bg01.png"));
        assert!(children[1].has_class(PLACEHOLDER_CLASS));
        assert!(children[1].has_class(HIDDEN_CLASS));
        assert!(children[1].get_children()[0].has_class("fa-code"));
    }

    #[test]
    fn test_slide_without_image_shows_placeholder() {
        let mut config = CarouselConfig::sample();
        config.slides[0].image = None;
        let view = carousel_view(&config);

        assert_eq!(find(&view, IMAGE_CONTAINER_CLASS).len(), 2);
        let placeholders = find(&view, PLACEHOLDER_CLASS);
        assert_eq!(placeholders.len(), 3);
        assert!(!placeholders[0].has_class(HIDDEN_CLASS));
    }

    #[test]
    fn test_optional_controls() {
        let config = CarouselConfig {
            settings: CarouselSettings {
                enable_buttons: false,
                enable_indicators: false,
                ..CarouselSettings::default()
            },
            ..CarouselConfig::sample()
        };
        let view = carousel_view(&config);
        assert!(find(&view, INDICATOR_CLASS).is_empty());
        assert!(find(&view, "carousel-btn").is_empty());
    }

    #[test]
    fn test_empty_state() {
        let config = CarouselConfig::new(Vec::new(), CarouselSettings::default());
        let view = carousel_view(&config);
        assert!(find(&view, SLIDE_CLASS).is_empty());
        assert!(find(&view, INDICATOR_CLASS).is_empty());
        assert!(find(&view, "carousel-btn").is_empty());
        assert_eq!(find(&view, EMPTY_CLASS).len(), 1);
    }

    #[test]
    fn test_slide_text_is_escaped() {
        let mut config = CarouselConfig::sample();
        config.slides[0].title = "<b>bold</b>".into();
        config.slides[0].button_link = "\"><script>".into();
        let html = carousel_view(&config).to_html();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_view_is_pure() {
        let config = CarouselConfig::sample();
        assert_eq!(carousel_view(&config), carousel_view(&config));
    }
}
