//! Carousel component for the hero section
//!
//! Owns the slide configuration, the current slide index and the auto-play
//! timer. Renders its markup into a container element and reacts to buttons,
//! indicators, arrow keys, touch swipes and pointer hover.
//!
//! # Example
//!
//! ```rust
//! use tawy_cn::prelude::*;
//! use tawy_core::TimerScheduler;
//! use tawy_layout::Document;
//!
//! let doc = Document::new();
//! let hero = doc.create_element("div");
//! doc.set_attr(hero, "id", "hero");
//! doc.append_child(doc.body(), hero).unwrap();
//!
//! let scheduler = TimerScheduler::new();
//! let carousel = Carousel::builder(&doc, &scheduler).mount("hero");
//!
//! assert!(carousel.is_initialized());
//! carousel.next_slide();
//! assert_eq!(carousel.current_slide(), 1);
//! ```
//!
//! Every failure is absorbed here: a missing container is logged and leaves an
//! inert instance, out-of-range indices are ignored, and broken images fall
//! back to the slide's icon. Nothing propagates to the page.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tawy_core::{Event, EventType, Key, TimerId, TimerScheduler};
use tawy_layout::{Document, ListenerSet, ListenerTarget, NodeId};
use tracing::{debug, error, info, warn};

use crate::components::carousel_view::*;
use crate::config::{CarouselConfig, CarouselConfigPatch, CtaTarget};
use crate::error::CarouselError;
use crate::scroll::{DocumentScroller, SectionScroller};

/// Minimum horizontal travel, in pixels, for a touch to count as a swipe
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Class toggled on image blocks while the pointer is over them
pub const HOVER_CLASS: &str = "hover-lift";

/// Class pinned on the image blocks of the first two slides
pub const FORCE_HOVER_CLASS: &str = "force-hover-effect";

struct CarouselInner {
    document: Document,
    scheduler: TimerScheduler,
    scroller: Rc<dyn SectionScroller>,
    container: Option<NodeId>,
    config: CarouselConfig,
    current_slide: usize,
    total_slides: usize,
    auto_play_timer: Option<TimerId>,
    initialized: bool,
    touch_start_x: f32,
    /// Listeners installed by `bind_events`
    listeners: ListenerSet,
    /// Listeners installed by `apply_hover_effects`
    hover_listeners: ListenerSet,
}

impl CarouselInner {
    fn listen<F>(&mut self, target: ListenerTarget, kind: EventType, callback: F)
    where
        F: Fn(&Event) + 'static,
    {
        if let Err(err) = self.listeners.on(target, kind, callback) {
            warn!(%err, ?kind, "failed to bind carousel listener");
        }
    }
}

impl Drop for CarouselInner {
    fn drop(&mut self) {
        if let Some(id) = self.auto_play_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

type WeakInner = Weak<RefCell<CarouselInner>>;

/// Wrap a component callback into an event handler holding a weak reference
///
/// The handler does nothing once the component is gone.
fn handler<F>(weak: &WeakInner, f: F) -> impl Fn(&Event) + 'static
where
    F: Fn(&Carousel, &Event) + 'static,
{
    let weak = weak.clone();
    move |event: &Event| {
        if let Some(inner) = weak.upgrade() {
            f(&Carousel { inner }, event);
        }
    }
}

/// Builder for mounting a [`Carousel`]
pub struct CarouselBuilder {
    document: Document,
    scheduler: TimerScheduler,
    config: CarouselConfig,
    scroller: Option<Rc<dyn SectionScroller>>,
}

impl CarouselBuilder {
    /// Use this configuration instead of the sample one
    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    /// Handle in-page call-to-action targets with `scroller`
    ///
    /// Defaults to a [`DocumentScroller`] over the same document.
    pub fn scroller<S>(mut self, scroller: S) -> Self
    where
        S: SectionScroller + 'static,
    {
        self.scroller = Some(Rc::new(scroller));
        self
    }

    fn build(self) -> Carousel {
        if let Err(err) = self.config.validate() {
            warn!(%err, "carousel configuration is inconsistent");
        }
        let scroller: Rc<dyn SectionScroller> = match self.scroller {
            Some(scroller) => scroller,
            None => Rc::new(DocumentScroller::new(self.document.clone())),
        };
        let total_slides = self.config.slides.len();

        Carousel {
            inner: Rc::new(RefCell::new(CarouselInner {
                listeners: ListenerSet::new(self.document.clone()),
                hover_listeners: ListenerSet::new(self.document.clone()),
                document: self.document,
                scheduler: self.scheduler,
                scroller,
                container: None,
                config: self.config,
                current_slide: 0,
                total_slides,
                auto_play_timer: None,
                initialized: false,
                touch_start_x: 0.0,
            })),
        }
    }

    /// Mount into the element with id `container_id`
    ///
    /// A missing container is logged and yields an inert, uninitialized
    /// carousel; the rest of the page keeps working.
    pub fn mount(self, container_id: &str) -> Carousel {
        let carousel = self.build();
        if let Err(err) = carousel.attach(container_id) {
            error!(%err, "carousel not mounted");
        }
        carousel
    }

    /// Like [`CarouselBuilder::mount`], reporting a missing container
    pub fn try_mount(self, container_id: &str) -> Result<Carousel, CarouselError> {
        let carousel = self.build();
        carousel.attach(container_id)?;
        Ok(carousel)
    }
}

/// Hero carousel component
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct Carousel {
    inner: Rc<RefCell<CarouselInner>>,
}

impl Carousel {
    /// Start building a carousel for `document`, timed by `scheduler`
    pub fn builder(document: &Document, scheduler: &TimerScheduler) -> CarouselBuilder {
        CarouselBuilder {
            document: document.clone(),
            scheduler: scheduler.clone(),
            config: CarouselConfig::sample(),
            scroller: None,
        }
    }

    fn weak(&self) -> WeakInner {
        Rc::downgrade(&self.inner)
    }

    fn attach(&self, container_id: &str) -> Result<(), CarouselError> {
        let container = self
            .inner
            .borrow()
            .document
            .get_element_by_id(container_id)
            .ok_or_else(|| CarouselError::ContainerNotFound(container_id.to_string()))?;
        self.inner.borrow_mut().container = Some(container);
        self.init()?;
        info!(
            container = container_id,
            slides = self.total_slides(),
            "carousel initialized"
        );
        Ok(())
    }

    /// Render, bind, show the first slide, then start auto-play
    fn init(&self) -> Result<(), CarouselError> {
        self.render()?;
        self.bind_events();
        self.show_slide(0);
        self.start_auto_play();
        self.inner.borrow_mut().initialized = true;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn current_slide(&self) -> usize {
        self.inner.borrow().current_slide
    }

    pub fn total_slides(&self) -> usize {
        self.inner.borrow().total_slides
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().initialized
    }

    pub fn is_auto_playing(&self) -> bool {
        self.inner.borrow().auto_play_timer.is_some()
    }

    pub fn auto_play_timer(&self) -> Option<TimerId> {
        self.inner.borrow().auto_play_timer
    }

    pub fn config(&self) -> CarouselConfig {
        self.inner.borrow().config.clone()
    }

    /// The element the carousel renders into, while mounted
    pub fn container(&self) -> Option<NodeId> {
        self.inner.borrow().container
    }

    pub fn document(&self) -> Document {
        self.inner.borrow().document.clone()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Replace the container's content with freshly built markup
    fn render(&self) -> Result<(), CarouselError> {
        let inner = self.inner.borrow();
        let Some(container) = inner.container else {
            return Ok(());
        };
        inner.document.mount(container, &carousel_view(&inner.config))?;
        Ok(())
    }

    /// Wire every input onto the rendered markup
    ///
    /// Listeners from a previous binding are removed first, so rebinding never
    /// stacks handlers (the document-wide key handler included).
    fn bind_events(&self) {
        let weak = self.weak();
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.hover_listeners.clear();
        let Some(container) = inner.container else {
            return;
        };
        let doc = inner.document.clone();
        let settings = inner.config.settings.clone();

        if settings.enable_buttons {
            if let Some(prev) = doc.query_id(container, PREV_BUTTON_ID) {
                inner.listen(
                    ListenerTarget::Node(prev),
                    EventType::Click,
                    handler(&weak, |c, _| c.prev_slide()),
                );
            }
            if let Some(next) = doc.query_id(container, NEXT_BUTTON_ID) {
                inner.listen(
                    ListenerTarget::Node(next),
                    EventType::Click,
                    handler(&weak, |c, _| c.next_slide()),
                );
            }
        }

        if settings.enable_indicators {
            let indicators = doc.query_class(container, INDICATOR_CLASS);
            for (index, indicator) in indicators.into_iter().enumerate() {
                inner.listen(
                    ListenerTarget::Node(indicator),
                    EventType::Click,
                    handler(&weak, move |c, _| c.go_to_slide(index)),
                );
            }
        }

        if settings.enable_keyboard {
            inner.listen(
                ListenerTarget::Document,
                EventType::KeyDown,
                handler(&weak, |c, event| match event.key() {
                    Some(Key::ArrowLeft) => c.prev_slide(),
                    Some(Key::ArrowRight) => c.next_slide(),
                    _ => {}
                }),
            );
        }

        if settings.enable_touch {
            if let Some(track) = doc.query_first_class(container, TRACK_CLASS) {
                inner.listen(
                    ListenerTarget::Node(track),
                    EventType::TouchStart,
                    handler(&weak, |c, event| {
                        c.inner.borrow_mut().touch_start_x = event.client_x();
                    }),
                );
                inner.listen(
                    ListenerTarget::Node(track),
                    EventType::TouchEnd,
                    handler(&weak, |c, event| {
                        let start_x = c.inner.borrow().touch_start_x;
                        c.handle_swipe(start_x, event.client_x());
                    }),
                );
            }
        }

        if let Some(area) = doc.query_first_class(container, CONTAINER_CLASS) {
            inner.listen(
                ListenerTarget::Node(area),
                EventType::PointerEnter,
                handler(&weak, |c, _| c.stop_auto_play()),
            );
            inner.listen(
                ListenerTarget::Node(area),
                EventType::PointerLeave,
                handler(&weak, |c, _| c.start_auto_play()),
            );
        }

        for cta in doc.query_class(container, CTA_CLASS) {
            let Some(link) = doc.attr(cta, "data-link") else {
                continue;
            };
            inner.listen(
                ListenerTarget::Node(cta),
                EventType::Click,
                handler(&weak, move |c, event| {
                    if let CtaTarget::Anchor(anchor) = CtaTarget::parse(&link) {
                        event.prevent_default();
                        c.scroll_to_section(anchor);
                    }
                }),
            );
        }

        for image in doc.query_class(container, IMAGE_CLASS) {
            inner.listen(
                ListenerTarget::Node(image),
                EventType::ResourceError,
                handler(&weak, move |c, _| c.handle_image_error(image)),
            );
        }
    }

    /// Install hover feedback on every image block
    ///
    /// Only runs once an image has fallen back to its icon; a healthy carousel
    /// keeps its plain styling. Previous hover listeners are replaced, never
    /// stacked, and a rebind drops them together with the old markup.
    fn apply_hover_effects(&self) {
        let weak = self.weak();
        let mut inner = self.inner.borrow_mut();
        inner.hover_listeners.clear();
        let Some(container) = inner.container else {
            return;
        };
        let doc = inner.document.clone();

        let slides = doc.query_class(container, SLIDE_CLASS);
        for (slide_index, slide) in slides.into_iter().enumerate() {
            let blocks = doc
                .query_class(slide, IMAGE_CONTAINER_CLASS)
                .into_iter()
                .chain(doc.query_class(slide, PLACEHOLDER_CLASS));

            for block in blocks {
                let enter = inner.hover_listeners.on(
                    ListenerTarget::Node(block),
                    EventType::PointerEnter,
                    handler(&weak, move |c, _| {
                        c.document().add_class(block, HOVER_CLASS);
                    }),
                );
                let leave = inner.hover_listeners.on(
                    ListenerTarget::Node(block),
                    EventType::PointerLeave,
                    handler(&weak, move |c, _| {
                        c.document().remove_class(block, HOVER_CLASS);
                    }),
                );
                if let Err(err) = enter.and(leave) {
                    warn!(%err, "failed to bind hover effect");
                }

                if slide_index < 2 {
                    doc.add_class(block, FORCE_HOVER_CLASS);
                    doc.set_attr(block, "data-slide-index", slide_index.to_string());
                }
            }
        }
    }

    /// Swap a broken slide image for its fallback icon
    fn handle_image_error(&self, image: NodeId) {
        let doc = self.document();
        warn!(
            src = doc.attr(image, "src").as_deref().unwrap_or_default(),
            "slide image failed to load, showing fallback icon"
        );
        doc.set_hidden(image, true);
        if let Some(placeholder) = doc.next_sibling(image) {
            doc.set_hidden(placeholder, false);
            doc.add_class(placeholder, PLACEHOLDER_CLASS);
        }
        self.apply_hover_effects();
    }

    fn scroll_to_section(&self, selector: &str) {
        let scroller = Rc::clone(&self.inner.borrow().scroller);
        scroller.scroll_to_section(selector);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Mark slide `index` (and its indicator) active
    ///
    /// Missing slides or indicators at `index` are tolerated. The index is
    /// stored as given; the auto-play timer is left alone.
    pub fn show_slide(&self, index: usize) {
        let mut inner = self.inner.borrow_mut();
        if let Some(container) = inner.container {
            let doc = &inner.document;
            let slides = doc.query_class(container, SLIDE_CLASS);
            let indicators = doc.query_class(container, INDICATOR_CLASS);

            for node in slides.iter().chain(&indicators) {
                doc.remove_class(*node, ACTIVE_CLASS);
            }
            if let Some(slide) = slides.get(index) {
                doc.add_class(*slide, ACTIVE_CLASS);
            }
            if let Some(indicator) = indicators.get(index) {
                doc.add_class(*indicator, ACTIVE_CLASS);
            }
        }
        inner.current_slide = index;
    }

    /// Advance one slide, wrapping from the last to the first
    ///
    /// No-op with fewer than two slides.
    pub fn next_slide(&self) {
        let next = {
            let inner = self.inner.borrow();
            if inner.total_slides < 2 {
                return;
            }
            (inner.current_slide + 1) % inner.total_slides
        };
        self.show_slide(next);
        self.reset_auto_play();
    }

    /// Go back one slide, wrapping from the first to the last
    ///
    /// No-op with fewer than two slides.
    pub fn prev_slide(&self) {
        let prev = {
            let inner = self.inner.borrow();
            if inner.total_slides < 2 {
                return;
            }
            (inner.current_slide + inner.total_slides - 1) % inner.total_slides
        };
        self.show_slide(prev);
        self.reset_auto_play();
    }

    /// Jump to `index`; out-of-range indices are ignored
    pub fn go_to_slide(&self, index: usize) {
        if index >= self.total_slides() {
            debug!(index, "slide index out of range, ignoring");
            return;
        }
        self.show_slide(index);
        self.reset_auto_play();
    }

    /// Interpret a completed touch as a swipe
    ///
    /// A leftward drag longer than [`SWIPE_THRESHOLD`] advances, a rightward
    /// one goes back; shorter movements are ignored.
    pub fn handle_swipe(&self, start_x: f32, end_x: f32) {
        let diff = start_x - end_x;
        if diff.abs() <= SWIPE_THRESHOLD {
            return;
        }
        if diff > 0.0 {
            self.next_slide();
        } else {
            self.prev_slide();
        }
    }

    // =========================================================================
    // Auto-play
    // =========================================================================

    /// Start advancing every `autoPlayInterval` milliseconds
    ///
    /// Any running timer is stopped first, so at most one is ever pending.
    /// Does nothing when auto-play is disabled, the carousel is not mounted,
    /// or there is nothing to rotate.
    pub fn start_auto_play(&self) {
        {
            let inner = self.inner.borrow();
            if !inner.config.settings.auto_play
                || inner.container.is_none()
                || inner.total_slides < 2
            {
                return;
            }
        }
        self.stop_auto_play();

        let weak = self.weak();
        let mut inner = self.inner.borrow_mut();
        let period = inner.config.settings.interval();
        let timer = inner.scheduler.set_interval(period, move || {
            if let Some(inner) = weak.upgrade() {
                Carousel { inner }.next_slide();
            }
        });
        match timer {
            Ok(id) => inner.auto_play_timer = Some(id),
            Err(err) => warn!(%err, "auto-play not started"),
        }
    }

    /// Cancel the auto-play timer, if any
    pub fn stop_auto_play(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(id) = inner.auto_play_timer.take() {
            inner.scheduler.cancel(id);
        }
    }

    /// Restart the auto-play countdown after manual navigation
    pub fn reset_auto_play(&self) {
        if self.inner.borrow().config.settings.auto_play {
            self.stop_auto_play();
            self.start_auto_play();
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Merge `patch` into the configuration and rebuild from scratch
    ///
    /// Re-renders, rebinds every listener, returns to the first slide and
    /// restarts auto-play according to the merged settings.
    pub fn update_config(&self, patch: CarouselConfigPatch) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.config.merge(patch);
            inner.total_slides = inner.config.slides.len();
            if let Err(err) = inner.config.validate() {
                warn!(%err, "carousel configuration is inconsistent");
            }
        }

        if let Err(err) = self.render() {
            warn!(%err, "carousel re-render failed");
        }
        self.bind_events();
        self.show_slide(0);
        self.stop_auto_play();
        self.start_auto_play();
        debug!(slides = self.total_slides(), "carousel reconfigured");
    }

    /// Stop auto-play, remove listeners and clear the container
    ///
    /// The instance stays usable as a value, but navigation no longer has any
    /// visible effect.
    pub fn destroy(&self) {
        self.stop_auto_play();
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.hover_listeners.clear();
        if let Some(container) = inner.container.take() {
            inner.document.clear_children(container);
        }
        inner.initialized = false;
        debug!("carousel destroyed");
    }
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Carousel")
            .field("container", &inner.container)
            .field("current_slide", &inner.current_slide)
            .field("total_slides", &inner.total_slides)
            .field("auto_play_timer", &inner.auto_play_timer)
            .field("initialized", &inner.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_threshold_boundary() {
        let doc = Document::new();
        let scheduler = TimerScheduler::new();
        let root = doc.create_element("div");
        doc.set_attr(root, "id", "hero");
        doc.append_child(doc.body(), root).unwrap();
        let carousel = Carousel::builder(&doc, &scheduler).mount("hero");

        // Exactly the threshold is noise
        carousel.handle_swipe(250.0, 200.0);
        assert_eq!(carousel.current_slide(), 0);

        carousel.handle_swipe(251.0, 200.0);
        assert_eq!(carousel.current_slide(), 1);

        carousel.handle_swipe(200.0, 251.0);
        assert_eq!(carousel.current_slide(), 0);
    }

    #[test]
    fn test_handlers_are_inert_after_drop() {
        let doc = Document::new();
        let scheduler = TimerScheduler::new();
        let root = doc.create_element("div");
        doc.set_attr(root, "id", "hero");
        doc.append_child(doc.body(), root).unwrap();

        let carousel = Carousel::builder(&doc, &scheduler).mount("hero");
        assert_eq!(scheduler.pending_count(), 1);
        drop(carousel);

        // Timer cancelled, document-wide key listener removed
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(doc.document_listener_count(EventType::KeyDown), 0);
        doc.dispatch_document(&Event::key_down(Key::ArrowRight));
    }
}
