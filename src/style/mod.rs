//! Caption animation strategies.
//!
//! Each style is a pure function of `(group, frame)`: it never looks at other frames and keeps
//! no state, so frames can be evaluated in any order or in parallel.

pub mod background;
pub mod color_track;
pub mod glow;
pub mod typing;
pub mod visual;

use std::str::FromStr;

use crate::{
    foundation::{
        core::FrameIndex,
        error::{CaptionError, CaptionResult},
    },
    timing::{
        grouping::{GroupingMode, GroupingRules},
        model::CaptionGroup,
    },
};

use background::BackgroundTrackingCaption;
use color_track::ColorTrackingCaption;
use glow::GlowCaption;
use typing::TypingRevealCaption;
use visual::{CaptionOverlay, Highlight, Typography, WordVisual};

pub trait CaptionStrategy: Sync {
    fn typography(&self) -> Typography;

    /// Box drawn behind the whole caption line, if the style has one.
    fn panel(&self) -> Option<Highlight> {
        None
    }

    /// Per-word visuals for an active `group` at `frame`, in word order.
    fn render(&self, group: &CaptionGroup, frame: FrameIndex) -> Vec<WordVisual>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    #[serde(alias = "glowing")]
    Glow,
    BackgroundTracking,
    ColorTracking,
    #[serde(alias = "typing_background")]
    TypingReveal,
}

impl CaptionStyle {
    pub const ALL: [Self; 4] = [
        Self::Glow,
        Self::BackgroundTracking,
        Self::ColorTracking,
        Self::TypingReveal,
    ];

    /// Accepts the canonical tags plus the legacy `glowing` / `typing_background` names.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "glow" | "glowing" => Some(Self::Glow),
            "background_tracking" => Some(Self::BackgroundTracking),
            "color_tracking" => Some(Self::ColorTracking),
            "typing_reveal" | "typing_background" => Some(Self::TypingReveal),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Glow => "glow",
            Self::BackgroundTracking => "background_tracking",
            Self::ColorTracking => "color_tracking",
            Self::TypingReveal => "typing_reveal",
        }
    }

    pub fn strategy(self) -> &'static dyn CaptionStrategy {
        match self {
            Self::Glow => &GlowCaption,
            Self::BackgroundTracking => &BackgroundTrackingCaption,
            Self::ColorTracking => &ColorTrackingCaption,
            Self::TypingReveal => &TypingRevealCaption,
        }
    }

    /// Build the overlay for `group` (found at `position` in the group list).
    pub fn render(self, group: &CaptionGroup, position: usize, frame: FrameIndex) -> CaptionOverlay {
        let strategy = self.strategy();
        CaptionOverlay {
            style: self,
            group: position,
            typography: strategy.typography(),
            panel: strategy.panel(),
            words: strategy.render(group, frame),
        }
    }

    /// How a raw transcript should be packed for this style.
    pub fn grouping(self) -> GroupingRules {
        let (mode, max_words, max_start_gap_secs, max_chars) = match self {
            Self::Glow => (GroupingMode::Phrases, 2, 0.6, 12),
            Self::BackgroundTracking => (GroupingMode::Groups, 3, 1.0, 18),
            Self::ColorTracking => (GroupingMode::Groups, 4, 2.0, 20),
            Self::TypingReveal => (GroupingMode::Groups, 6, 2.5, 28),
        };
        GroupingRules {
            mode,
            max_words,
            max_start_gap_secs,
            max_chars,
        }
    }
}

impl std::fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CaptionStyle {
    type Err = CaptionError;

    fn from_str(s: &str) -> CaptionResult<Self> {
        Self::from_tag(s).ok_or_else(|| {
            CaptionError::validation(format!(
                "unknown caption style '{s}' (expected one of: glow, background_tracking, color_tracking, typing_reveal)"
            ))
        })
    }
}

/// The style requested for a render. Unknown tags are kept rather than rejected: they render
/// the base video with no captions.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StyleChoice {
    Style(CaptionStyle),
    Unrecognized(String),
}

impl StyleChoice {
    pub fn from_tag(tag: &str) -> Self {
        match CaptionStyle::from_tag(tag) {
            Some(style) => Self::Style(style),
            None => Self::Unrecognized(tag.to_string()),
        }
    }

    pub fn style(&self) -> Option<CaptionStyle> {
        match self {
            Self::Style(style) => Some(*style),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for StyleChoice {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<StyleChoice> for String {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Style(style) => style.tag().to_string(),
            StyleChoice::Unrecognized(tag) => tag,
        }
    }
}

impl From<CaptionStyle> for StyleChoice {
    fn from(style: CaptionStyle) -> Self {
        Self::Style(style)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/mod.rs"]
mod tests;
