//! Per-engine style objects.
//!
//! The overlay library draws comments one of two ways, and each wants its
//! style in its own vocabulary:
//!
//! - **DOM** — each comment is an element; the style is CSS properties.
//!   The outline is a four-way 1px `text-shadow`.
//! - **Canvas** — comments are painted onto a 2D context; the style is a
//!   set of `CanvasRenderingContext2D` properties. The outline is a
//!   blurred shadow.
//!
//! Both scale the font with the video: `round(video_height / 23)` pixels,
//! which puts roughly 23 comment rows on screen regardless of resolution.
//!
//! Field names serialize in camelCase so the output can be handed to the
//! engine as-is.

use std::fmt;
use std::str::FromStr;

use dm_color::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of comment rows that fit the video height.
pub const ROWS_PER_SCREEN: f64 = 23.0;

/// Font size in pixels for a video `video_height` pixels tall.
///
/// Rounded to the nearest pixel.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn font_size_px(video_height: u32) -> u32 {
    // Safe: the quotient is non-negative and at most u32::MAX / 23.
    (f64::from(video_height) / ROWS_PER_SCREEN).round() as u32
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Which rendering backend the overlay uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Dom,
    #[default]
    Canvas,
}

impl Engine {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dom => "dom",
            Self::Canvas => "canvas",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown engine `{0}` (expected `dom` or `canvas`)")]
pub struct UnknownEngine(pub String);

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dom" => Ok(Self::Dom),
            "canvas" => Ok(Self::Canvas),
            _ => Err(UnknownEngine(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// CSS properties for a DOM-rendered comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomStyle {
    pub font_size: String,
    pub font_weight: String,
    pub color: String,
    pub text_shadow: String,
}

/// 2D-context properties for a canvas-rendered comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasStyle {
    pub font: String,
    pub text_align: String,
    pub text_baseline: String,
    pub direction: String,
    pub fill_style: String,
    pub stroke_style: String,
    pub line_width: f64,
    pub shadow_color: String,
    pub shadow_blur: u32,
}

/// The style for one comment, in the vocabulary of its engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentStyle {
    Dom(DomStyle),
    Canvas(CanvasStyle),
}

impl CommentStyle {
    /// Build the style for `engine`.
    ///
    /// `fill` is the text color as a CSS string; `outline` is the contrast
    /// color drawn around it.
    #[must_use]
    pub fn new(engine: Engine, font_px: u32, fill: &str, outline: Rgb) -> Self {
        match engine {
            Engine::Dom => Self::Dom(DomStyle {
                font_size: format!("{font_px}px"),
                font_weight: "bold".to_owned(),
                color: fill.to_owned(),
                text_shadow: outline_shadow(outline),
            }),
            Engine::Canvas => Self::Canvas(CanvasStyle {
                font: format!("{font_px}px sans-serif"),
                text_align: "start".to_owned(),
                text_baseline: "bottom".to_owned(),
                direction: "inherit".to_owned(),
                fill_style: fill.to_owned(),
                stroke_style: fill.to_owned(),
                line_width: 1.0,
                shadow_color: outline.to_string(),
                shadow_blur: 1,
            }),
        }
    }

    #[must_use]
    pub const fn engine(&self) -> Engine {
        match self {
            Self::Dom(_) => Engine::Dom,
            Self::Canvas(_) => Engine::Canvas,
        }
    }

    /// The text color, whichever engine this is for.
    #[must_use]
    pub fn fill(&self) -> &str {
        match self {
            Self::Dom(s) => &s.color,
            Self::Canvas(s) => &s.fill_style,
        }
    }
}

/// One-pixel outline on all four diagonals.
fn outline_shadow(outline: Rgb) -> String {
    [(-1, -1), (-1, 1), (1, -1), (1, 1)]
        .iter()
        .map(|(x, y)| format!("{x}px {y}px {outline}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
