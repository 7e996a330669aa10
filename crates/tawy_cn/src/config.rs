//! Carousel configuration
//!
//! Slides and settings are plain data, deserialized from TOML with the same
//! camelCase keys the site's configuration has always used:
//!
//! ```toml
//! [settings]
//! autoPlay = true
//! autoPlayInterval = 5000
//!
//! [[slides]]
//! id = 1
//! title = "Welcome"
//! description = "Notes on rendering and tools"
//! buttonText = "Learn more"
//! buttonLink = "#about"
//! image = "imags/bg01.png"
//! fallbackIcon = "fas fa-code"
//! background = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One promotional panel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Unique within a configuration; used for DOM attribution only
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub button_text: String,
    /// In-page anchor (`#about`) or external link
    pub button_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Icon classes shown when there is no image or it fails to load
    #[serde(default = "default_fallback_icon")]
    pub fallback_icon: String,
    /// CSS background value, opaque to the component
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_fallback_icon() -> String {
    "fas fa-image".to_string()
}

fn default_background() -> String {
    "linear-gradient(135deg, #667eea 0%, #764ba2 100%)".to_string()
}

/// Where a call-to-action button leads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtaTarget<'a> {
    /// An in-page anchor, scrolled to instead of navigated
    Anchor(&'a str),
    /// Anything else; the host navigates normally
    External(&'a str),
}

impl<'a> CtaTarget<'a> {
    pub fn parse(link: &'a str) -> Self {
        if link.starts_with('#') {
            CtaTarget::Anchor(link)
        } else {
            CtaTarget::External(link)
        }
    }
}

impl Slide {
    pub fn cta_target(&self) -> CtaTarget<'_> {
        CtaTarget::parse(&self.button_link)
    }
}

/// Behaviour switches for a carousel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSettings {
    #[serde(default = "default_true")]
    pub auto_play: bool,
    /// Milliseconds between automatic advances
    #[serde(default = "default_interval")]
    pub auto_play_interval: u64,
    #[serde(default = "default_true")]
    pub enable_touch: bool,
    #[serde(default = "default_true")]
    pub enable_keyboard: bool,
    #[serde(default = "default_true")]
    pub enable_indicators: bool,
    #[serde(default = "default_true")]
    pub enable_buttons: bool,
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    5000
}

impl CarouselSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.auto_play_interval)
    }
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            auto_play: true,
            auto_play_interval: default_interval(),
            enable_touch: true,
            enable_keyboard: true,
            enable_indicators: true,
            enable_buttons: true,
        }
    }
}

/// Slides plus settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub settings: CarouselSettings,
}

/// Partial configuration applied by `Carousel::update_config`
///
/// Present fields replace the current ones wholesale; absent fields are kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<Slide>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CarouselSettings>,
}

impl CarouselConfigPatch {
    pub fn slides(slides: Vec<Slide>) -> Self {
        Self {
            slides: Some(slides),
            settings: None,
        }
    }

    pub fn settings(settings: CarouselSettings) -> Self {
        Self {
            slides: None,
            settings: Some(settings),
        }
    }
}

impl CarouselConfig {
    pub fn new(slides: Vec<Slide>, settings: CarouselSettings) -> Self {
        Self { slides, settings }
    }

    /// The hero slides shipped with the site
    pub fn sample() -> Self {
        Self {
            slides: vec![
                Slide {
                    id: 1,
                    title: "Welcome to Tawy's blog".to_string(),
                    description: "Sharing what I learn, recording how I grow".to_string(),
                    button_text: "Learn more".to_string(),
                    button_link: "#about".to_string(),
                    image: Some("imags/bg01.png".to_string()),
                    fallback_icon: "fas fa-code".to_string(),
                    background: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)".to_string(),
                },
                Slide {
                    id: 2,
                    title: "Tech notes".to_string(),
                    description: "Game art, technical art, game development".to_string(),
                    button_text: "Read articles".to_string(),
                    button_link: "#articles".to_string(),
                    image: Some("imags/bg02.png".to_string()),
                    fallback_icon: "fas fa-laptop-code".to_string(),
                    background: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)".to_string(),
                },
                Slide {
                    id: 3,
                    title: "Projects".to_string(),
                    description: "Open source projects and portfolio pieces".to_string(),
                    button_text: "See projects".to_string(),
                    button_link: "#projects".to_string(),
                    image: Some("imags/bg03.png".to_string()),
                    fallback_icon: "fas fa-rocket".to_string(),
                    background: "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)".to_string(),
                },
            ],
            settings: CarouselSettings::default(),
        }
    }

    /// Shallow merge: fields present in `patch` replace the current ones
    pub fn merge(&mut self, patch: CarouselConfigPatch) {
        if let Some(slides) = patch.slides {
            self.slides = slides;
        }
        if let Some(settings) = patch.settings {
            self.settings = settings;
        }
    }

    /// Check the invariants the component relies on
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for slide in &self.slides {
            if !seen.insert(slide.id) {
                return Err(ConfigError::DuplicateSlideId(slide.id));
            }
        }
        if self.settings.auto_play && self.settings.auto_play_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let config = CarouselConfig::sample();
        assert_eq!(config.slides.len(), 3);
        assert!(config.validate().is_ok());
        assert_eq!(config.settings.interval(), Duration::from_millis(5000));
    }

    #[test]
    fn test_cta_target() {
        assert_eq!(CtaTarget::parse("#about"), CtaTarget::Anchor("#about"));
        assert_eq!(
            CtaTarget::parse("https://github.com"),
            CtaTarget::External("https://github.com")
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut config = CarouselConfig::sample();
        config.slides[2].id = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSlideId(1))
        ));
    }

    #[test]
    fn test_zero_interval_only_matters_with_auto_play() {
        let mut config = CarouselConfig::sample();
        config.settings.auto_play_interval = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));

        config.settings.auto_play = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut config = CarouselConfig::sample();
        let settings = config.settings.clone();

        config.merge(CarouselConfigPatch::slides(vec![config.slides[0].clone()]));
        assert_eq!(config.slides.len(), 1);
        assert_eq!(config.settings, settings);

        let quiet = CarouselSettings {
            auto_play: false,
            ..CarouselSettings::default()
        };
        config.merge(CarouselConfigPatch::settings(quiet.clone()));
        assert_eq!(config.slides.len(), 1);
        assert_eq!(config.settings, quiet);
    }

    #[test]
    fn test_toml_defaults() {
        let config = CarouselConfig::from_toml_str(
            r##"
            [settings]
            autoPlayInterval = 3000
            enableKeyboard = false

            [[slides]]
            id = 7
            title = "Only"
            buttonText = "Go"
            buttonLink = "#top"
            "##,
        )
        .unwrap();

        assert_eq!(config.slides.len(), 1);
        let slide = &config.slides[0];
        assert_eq!(slide.image, None);
        assert_eq!(slide.fallback_icon, "fas fa-image");
        assert!(config.settings.auto_play);
        assert!(!config.settings.enable_keyboard);
        assert_eq!(config.settings.auto_play_interval, 3000);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CarouselConfig::sample();
        let text = config.to_toml().unwrap();
        assert!(text.contains("autoPlayInterval"));
        assert_eq!(CarouselConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_parse_error() {
        let result = CarouselConfig::from_toml_str("slides = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = CarouselConfig::load_from_path(Path::new("/nonexistent/carousel.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
