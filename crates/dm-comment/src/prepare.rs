//! Records in, render-ready comments out.
//!
//! For each record: pick the display text, shift its time by the user's
//! delay, classify its color, and build the engine-specific style with an
//! outline in the opposite tone. Records with nothing to display are
//! skipped, not errors.

use dm_color::{ColorPolicy, InvalidColorFormat, Rgb, Tone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{CommentMode, CommentRecord};
use crate::style::{CommentStyle, Engine, font_size_px};

/// Knobs for [`prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleOptions {
    pub engine: Engine,
    /// Rendered height of the video, in pixels.
    pub video_height: u32,
    /// Seconds added to every comment's time. May be negative.
    pub delay: f64,
    pub policy: ColorPolicy,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            video_height: 720,
            delay: 0.0,
            policy: ColorPolicy::default(),
        }
    }
}

/// A comment ready for the overlay engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderComment {
    pub text: String,
    pub time: f64,
    pub mode: CommentMode,
    pub style: CommentStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepareError {
    #[error("comment #{index}: {source}")]
    Color {
        index: usize,
        #[source]
        source: InvalidColorFormat,
    },
}

/// Style every displayable record in `records`.
///
/// # Errors
///
/// Under [`ColorPolicy::Strict`], the first record whose color does not
/// parse fails the whole batch with [`PrepareError::Color`].
pub fn prepare(
    records: &[CommentRecord],
    opts: &StyleOptions,
) -> Result<Vec<RenderComment>, PrepareError> {
    let font_px = font_size_px(opts.video_height);
    let mut out = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let Some(text) = record.body() else {
            tracing::warn!(index, "comment has no text, skipping");
            continue;
        };

        let (fill, tone) = resolve_color(record.color(), opts.policy)
            .map_err(|source| PrepareError::Color { index, source })?;

        out.push(RenderComment {
            text: text.to_owned(),
            time: record.time + opts.delay,
            mode: record.mode(),
            style: CommentStyle::new(opts.engine, font_px, &fill, tone.outline()),
        });
    }

    tracing::debug!(
        engine = %opts.engine,
        font_px,
        prepared = out.len(),
        skipped = records.len() - out.len(),
        "prepared comments"
    );
    Ok(out)
}

/// Fill string and tone for `color`.
///
/// Valid colors are normalized to `#rrggbb`. Under the lenient policy a
/// malformed color keeps its raw string as the fill and reads as dark.
fn resolve_color(color: &str, policy: ColorPolicy) -> Result<(String, Tone), InvalidColorFormat> {
    match Rgb::parse(color) {
        Ok(rgb) => Ok((rgb.to_string(), Tone::of(rgb))),
        Err(err) => policy.classify(color).map_or(Err(err), |tone| Ok((color.to_owned(), tone))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dm_color::FormatIssue;
    use pretty_assertions::assert_eq;

    fn opts(engine: Engine) -> StyleOptions {
        StyleOptions {
            engine,
            ..StyleOptions::default()
        }
    }

    #[test]
    fn applies_delay() {
        let records = [CommentRecord::new("a", 1.0), CommentRecord::new("b", 10.0)];
        let out = prepare(
            &records,
            &StyleOptions {
                delay: -0.5,
                ..StyleOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out[0].time, 0.5);
        assert_eq!(out[1].time, 9.5);
    }

    #[test]
    fn default_white_gets_black_outline() {
        let out = prepare(&[CommentRecord::new("hi", 0.0)], &opts(Engine::Canvas)).unwrap();
        let CommentStyle::Canvas(style) = &out[0].style else {
            panic!("expected canvas style");
        };
        assert_eq!(style.fill_style, "#ffffff");
        assert_eq!(style.shadow_color, "#000000");
        assert_eq!(style.font, "31px sans-serif");
    }

    #[test]
    fn dark_color_gets_white_outline() {
        let records = [CommentRecord::new("hi", 0.0).with_color("rgb(0, 0, 128)")];
        let out = prepare(&records, &opts(Engine::Dom)).unwrap();
        let CommentStyle::Dom(style) = &out[0].style else {
            panic!("expected dom style");
        };
        assert_eq!(style.color, "#000080");
        assert!(style.text_shadow.ends_with("1px 1px #ffffff"), "{}", style.text_shadow);
    }

    #[test]
    fn font_follows_video_height() {
        let out = prepare(
            &[CommentRecord::new("x", 0.0)],
            &StyleOptions {
                engine: Engine::Dom,
                video_height: 1080,
                ..StyleOptions::default()
            },
        )
        .unwrap();
        let CommentStyle::Dom(style) = &out[0].style else {
            panic!("expected dom style");
        };
        assert_eq!(style.font_size, "47px");
    }

    #[test]
    fn skips_records_without_text() {
        let mut blank = CommentRecord::new("", 1.0);
        blank.msg = Some(String::new());
        let records = [blank, CommentRecord::new("kept", 2.0)];
        let out = prepare(&records, &StyleOptions::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "kept");
    }

    #[test]
    fn carries_mode() {
        let records = [CommentRecord::new("x", 0.0).with_mode("top")];
        let out = prepare(&records, &StyleOptions::default()).unwrap();
        assert_eq!(out[0].mode, CommentMode::Top);
    }

    #[test]
    fn strict_policy_reports_index() {
        let records = [
            CommentRecord::new("ok", 0.0),
            CommentRecord::new("bad", 1.0).with_color("notacolor"),
        ];
        let err = prepare(&records, &StyleOptions::default()).unwrap_err();
        let PrepareError::Color { index, source } = &err;
        assert_eq!(*index, 1);
        assert_eq!(source.issue, FormatIssue::UnknownForm);
        assert!(err.to_string().starts_with("comment #1:"), "{err}");
    }

    #[test]
    fn lenient_policy_keeps_raw_fill_and_reads_dark() {
        let records = [CommentRecord::new("bad", 1.0).with_color("notacolor")];
        let out = prepare(
            &records,
            &StyleOptions {
                engine: Engine::Canvas,
                policy: ColorPolicy::Lenient,
                ..StyleOptions::default()
            },
        )
        .unwrap();
        let CommentStyle::Canvas(style) = &out[0].style else {
            panic!("expected canvas style");
        };
        assert_eq!(style.fill_style, "notacolor");
        assert_eq!(style.shadow_color, "#ffffff");
    }

    #[test]
    fn output_json_shape() {
        let out = prepare(&[CommentRecord::new("hi", 1.5)], &opts(Engine::Dom)).unwrap();
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["text"], "hi");
        assert_eq!(json["time"], 1.5);
        assert_eq!(json["mode"], "rtl");
        assert_eq!(json["style"]["fontWeight"], "bold");
    }
}
