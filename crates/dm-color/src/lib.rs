// SPDX-License-Identifier: MIT
//
// dm-color — CSS color parsing and perceived-brightness classification.
//
// Danmaku text is drawn in whatever color the comment carries, over
// whatever the video happens to show. To keep it legible, every comment
// gets an outline in the opposite tone: black around light text, white
// around dark text. This crate answers the one question that decision
// needs, "does this color read as light or dark?", using the HSP
// perceived-brightness model.
//
//   "#a1b2c3" / "rgb(…)" / "white"
//       │
//       ▼
//   color.rs:      parse into an 8-bit `Rgb` (strict grammar, typed errors)
//       │
//       ▼
//   luminance.rs:  HSP brightness → `Tone::Light | Tone::Dark` → outline
//
// Everything here is pure. No state, no I/O, safe to call from any thread.

// Single-char channel names (r, g, b) are the color-science convention.
#![allow(clippy::many_single_char_names)]

pub mod color;
pub mod luminance;

pub use color::{FormatIssue, InvalidColorFormat, Rgb};
pub use luminance::{ColorPolicy, LIGHT_THRESHOLD, Tone, classify, perceived_brightness};
