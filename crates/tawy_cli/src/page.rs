//! Headless host page for the CLI
//!
//! A minimal document with a `#hero` container, the carousel mounted into
//! it, and the scheduler that drives auto-play.

use anyhow::{Context, Result};
use std::time::Duration;
use tawy_cn::prelude::*;
use tawy_core::TimerScheduler;
use tawy_layout::{Document, NodeId};
use tracing::info;

/// Id of the element the carousel is mounted into
pub const HERO_ID: &str = "hero";

/// Longest simulation accepted, one virtual day
pub const MAX_SIMULATED_SECONDS: u64 = 86_400;

pub struct HostPage {
    pub document: Document,
    pub scheduler: TimerScheduler,
    pub hero: NodeId,
    pub carousel: Carousel,
}

impl HostPage {
    /// Build a page and mount a carousel for `config`
    pub fn mount(config: CarouselConfig) -> Result<Self> {
        let document = Document::new();
        let hero = document.create_element("div");
        document.set_attr(hero, "id", HERO_ID);
        document
            .append_child(document.body(), hero)
            .context("Failed to create host page")?;

        let scheduler = TimerScheduler::new();
        let carousel = Carousel::builder(&document, &scheduler)
            .config(config)
            .try_mount(HERO_ID)
            .context("Failed to mount carousel")?;

        Ok(Self {
            document,
            scheduler,
            hero,
            carousel,
        })
    }

    /// Markup currently inside the hero container
    pub fn html(&self) -> String {
        self.document.inner_html(self.hero)
    }

    /// Advance the clock one second at a time, logging every slide change
    ///
    /// Returns the index shown after each second. Runs at most
    /// [`MAX_SIMULATED_SECONDS`].
    pub fn simulate(&self, seconds: u64) -> Vec<usize> {
        let seconds = seconds.min(MAX_SIMULATED_SECONDS);
        let mut shown = Vec::with_capacity(seconds as usize);
        let mut current = self.carousel.current_slide();

        for second in 1..=seconds {
            self.scheduler.advance(Duration::from_secs(1));
            let next = self.carousel.current_slide();
            if next != current {
                info!("{:>4}s  slide {} -> {}", second, current + 1, next + 1);
                current = next;
            }
            shown.push(current);
        }

        shown
    }
}
