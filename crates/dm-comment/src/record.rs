//! Comment records as they arrive from a source.
//!
//! Sources disagree on the text field: the remote API sends `msg`, exported
//! files tend to use `text`. Both are kept so a record can be written back
//! out unchanged; [`CommentRecord::body`] picks the one to display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The color a comment gets when its record carries none.
pub const DEFAULT_COLOR: &str = "white";

/// A single danmaku comment, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    /// Seconds from the start of the video.
    pub time: f64,

    /// CSS color string. Absent means [`DEFAULT_COLOR`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Raw mode string; see [`CommentRecord::mode`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl CommentRecord {
    /// A plain scrolling comment with `text` at `time`.
    #[must_use]
    pub fn new(text: impl Into<String>, time: f64) -> Self {
        Self {
            text: Some(text.into()),
            msg: None,
            time,
            color: None,
            mode: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// The text to display: `msg` when it is non-empty, otherwise `text`.
    ///
    /// Returns `None` when neither field yields anything to draw.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.text.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// The color string, defaulting to white.
    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// The parsed mode. Missing or unknown modes scroll right-to-left.
    #[must_use]
    pub fn mode(&self) -> CommentMode {
        match self.mode.as_deref() {
            None => CommentMode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(mode = raw, "unknown comment mode, using rtl");
                CommentMode::default()
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// CommentMode
// ---------------------------------------------------------------------------

/// How a comment moves across the video.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentMode {
    /// Scrolls from right to left. The classic danmaku.
    #[default]
    Rtl,
    /// Scrolls from left to right.
    Ltr,
    /// Pinned to the top of the frame.
    Top,
    /// Pinned to the bottom of the frame.
    Bottom,
}

impl CommentMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rtl => "rtl",
            Self::Ltr => "ltr",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Whether the comment moves horizontally (as opposed to being pinned).
    #[must_use]
    pub const fn is_scrolling(self) -> bool {
        matches!(self, Self::Rtl | Self::Ltr)
    }
}

impl fmt::Display for CommentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a mode string that is not one of `rtl`, `ltr`, `top`, `bottom`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comment mode `{0}`")]
pub struct UnknownMode(pub String);

impl FromStr for CommentMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rtl" => Ok(Self::Rtl),
            "ltr" => Ok(Self::Ltr),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(UnknownMode(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
