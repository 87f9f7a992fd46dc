// SPDX-License-Identifier: MIT
//
// Perceived brightness (HSP) and the light/dark decision.
//
// HSP weights the squared gamma-encoded channels by how sensitive the eye
// is to each primary, then takes the root:
//
//   P = sqrt(0.299·R² + 0.587·G² + 0.114·B²)        R, G, B in 0–255
//
// P spans 0 (black) to 255 (white). Anything strictly above the midpoint
// 127.5 is "light". Unlike WCAG relative luminance there is no sRGB
// linearization step, which is what makes saturated yellows and greens
// land on the light side where readers expect them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::{InvalidColorFormat, Rgb};

/// Brightness above which a color counts as light. Fixed, not tunable.
pub const LIGHT_THRESHOLD: f64 = 127.5;

const WEIGHT_R: f64 = 0.299;
const WEIGHT_G: f64 = 0.587;
const WEIGHT_B: f64 = 0.114;

/// HSP perceived brightness of `rgb`, in `[0.0, 255.0]`.
#[must_use]
pub fn perceived_brightness(rgb: Rgb) -> f64 {
    let (r, g, b) = rgb.to_f64();
    WEIGHT_R
        .mul_add(r * r, WEIGHT_G.mul_add(g * g, WEIGHT_B * b * b))
        .sqrt()
}

// ─── Tone ────────────────────────────────────────────────────────────────────

/// Whether a color reads as light or dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Light,
    Dark,
}

impl Tone {
    /// Bucket a brightness value. The comparison is strict: exactly
    /// [`LIGHT_THRESHOLD`] is dark.
    #[inline]
    #[must_use]
    pub fn from_brightness(brightness: f64) -> Self {
        if brightness > LIGHT_THRESHOLD {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Tone of an already-parsed color.
    #[must_use]
    pub fn of(rgb: Rgb) -> Self {
        Self::from_brightness(perceived_brightness(rgb))
    }

    /// Outline/shadow color that keeps text of this tone legible:
    /// black around light text, white around dark text.
    #[inline]
    #[must_use]
    pub const fn outline(self) -> Rgb {
        match self {
            Self::Light => Rgb::BLACK,
            Self::Dark => Rgb::WHITE,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a color string as light or dark.
///
/// ```
/// use dm_color::{classify, Tone};
///
/// assert_eq!(classify("#fff").unwrap(), Tone::Light);
/// assert_eq!(classify("rgba(0, 0, 0, 0.5)").unwrap(), Tone::Dark);
/// assert!(classify("notacolor").is_err());
/// ```
///
/// # Errors
///
/// Returns [`InvalidColorFormat`] if `color` cannot be parsed. See
/// [`ColorPolicy::Lenient`] for the fail-to-dark alternative.
pub fn classify(color: &str) -> Result<Tone, InvalidColorFormat> {
    Rgb::parse(color).map(Tone::of)
}

// ─── Policy ──────────────────────────────────────────────────────────────────

/// What to do with a color string that does not parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPolicy {
    /// Reject it with [`InvalidColorFormat`].
    #[default]
    Strict,
    /// Treat it as dark, matching browsers that compare `NaN` brightness
    /// against the threshold and fall through.
    Lenient,
}

impl ColorPolicy {
    #[must_use]
    pub const fn from_lenient(lenient: bool) -> Self {
        if lenient { Self::Lenient } else { Self::Strict }
    }

    /// Classify `color` under this policy.
    ///
    /// # Errors
    ///
    /// Only [`ColorPolicy::Strict`] returns an error; `Lenient` maps every
    /// malformed input to [`Tone::Dark`].
    pub fn classify(self, color: &str) -> Result<Tone, InvalidColorFormat> {
        match (self, classify(color)) {
            (_, Ok(tone)) => Ok(tone),
            (Self::Strict, Err(err)) => Err(err),
            (Self::Lenient, Err(err)) => {
                tracing::debug!(%err, "unparsable color treated as dark");
                Ok(Tone::Dark)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_brightness_in_range(r: u8, g: u8, b: u8) {
            let p = perceived_brightness(Rgb::new(r, g, b));
            prop_assert!((0.0..=255.000_001).contains(&p));
        }

        #[test]
        fn prop_hex_and_rgb_agree(r: u8, g: u8, b: u8) {
            let hex = format!("#{r:02x}{g:02x}{b:02x}");
            let func = format!("rgb({r}, {g}, {b})");
            prop_assert_eq!(classify(&hex), classify(&func));
        }

        #[test]
        fn prop_short_hex_expands(r in 0u8..16, g in 0u8..16, b in 0u8..16) {
            let short = format!("#{r:x}{g:x}{b:x}");
            let long = format!("#{r:x}{r:x}{g:x}{g:x}{b:x}{b:x}");
            prop_assert_eq!(Rgb::parse(&short), Rgb::parse(&long));
        }

        #[test]
        fn prop_brightening_never_darkens(r: u8, g: u8, b: u8) {
            let base = Tone::of(Rgb::new(r, g, b));
            let brighter = Tone::of(Rgb::new(r.saturating_add(1), g.saturating_add(1), b.saturating_add(1)));
            if base == Tone::Light {
                prop_assert_eq!(brighter, Tone::Light);
            }
        }

        #[test]
        fn prop_lenient_never_errors(s in ".*") {
            prop_assert!(ColorPolicy::Lenient.classify(&s).is_ok());
        }
    }
}
