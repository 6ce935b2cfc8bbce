use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timer::Millis;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} must be within 0..=1, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[error("{name} must be a finite, non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("contact.{0} must not be empty")]
    EmptyContactField(&'static str),
}

/// Tunables for every page behavior. Each default is the value the live
/// site ships with, so `{}` is a complete config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Look-ahead below the top of the viewport, covering the fixed header.
    pub header_offset: f64,
    /// Trailing-edge window for the active-section scroll handler.
    pub scroll_throttle_ms: Millis,
    /// Scroll depth past which the scroll-to-top button appears.
    pub scroll_top_threshold: f64,
    pub fade: FadeConfig,
    pub skill_bar: SkillBarConfig,
    pub typing: TypingConfig,
    /// Mail relay wiring. Without it the contact form rejects submissions.
    pub contact: Option<ContactConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FadeConfig {
    pub threshold: f64,
    /// Pixels trimmed from the bottom of the viewport (`rootMargin` bottom).
    pub bottom_margin: f64,
    /// Initial downward offset of a pending element.
    pub rise: f64,
    pub animation: String,
    /// Class added once the element is revealed.
    pub revealed_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillBarConfig {
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypingConfig {
    pub text: String,
    pub greeting_delay_ms: Millis,
    pub start_delay_ms: Millis,
    pub char_interval_ms: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    pub service: String,
    /// Template delivered to the site owner.
    pub owner_template: String,
    /// Auto-reply template delivered to the sender.
    pub reply_template: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_offset: 100.0,
            scroll_throttle_ms: 100,
            scroll_top_threshold: 300.0,
            fade: FadeConfig::default(),
            skill_bar: SkillBarConfig::default(),
            typing: TypingConfig::default(),
            contact: None,
        }
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
            rise: 30.0,
            animation: "fadeInUp 0.8s ease forwards".to_string(),
            revealed_class: "animate-fadeInUp".to_string(),
        }
    }
}

impl Default for SkillBarConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            text: "Web Developer".to_string(),
            greeting_delay_ms: 200,
            start_delay_ms: 900,
            char_interval_ms: 140,
        }
    }
}

impl PageConfig {
    /// Parse and validate a JSON config. Missing fields take their
    /// defaults; unknown fields are rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("header_offset", self.header_offset)?;
        non_negative("scroll_top_threshold", self.scroll_top_threshold)?;
        non_negative("fade.bottom_margin", self.fade.bottom_margin)?;
        non_negative("fade.rise", self.fade.rise)?;
        fraction("fade.threshold", self.fade.threshold)?;
        fraction("skill_bar.threshold", self.skill_bar.threshold)?;

        if self.scroll_throttle_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "scroll_throttle_ms",
            });
        }
        if self.typing.char_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "typing.char_interval_ms",
            });
        }

        if let Some(contact) = &self.contact {
            for (name, value) in [
                ("service", &contact.service),
                ("owner_template", &contact.owner_template),
                ("reply_template", &contact.reply_template),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::EmptyContactField(name));
                }
            }
        }
        Ok(())
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
