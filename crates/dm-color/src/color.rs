// SPDX-License-Identifier: MIT
//
// Color parsing — the narrow slice of CSS color syntax that comment
// records actually carry.
//
// Accepted forms:
//
//   white | black                     named shortcuts (case-insensitive)
//   #RGB | #RRGGBB                    hex, each short digit duplicated
//   rgb(r, g, b) | rgba(r, g, b, a)   integer channels 0–255, alpha ignored
//
// `rgb` and `rgba` accept either argument count, the way CSS Color 4
// treats them as aliases. Alpha is validated (0–1 or 0%–100%) so a
// malformed string never slips through, but it never reaches the
// brightness math.
//
// Anything else is an `InvalidColorFormat` carrying the original input
// and the specific `FormatIssue`. Nothing is ever coerced to a default.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `rgb(...)` / `rgba(...)` with the argument list captured verbatim.
static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\s*\(([^()]*)\)$").expect("rgb() pattern is a valid regex")
});

// ─── Errors ──────────────────────────────────────────────────────────────────

/// What exactly was wrong with a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatIssue {
    #[error("empty color string")]
    Empty,

    #[error("not a named, hex, rgb() or rgba() color")]
    UnknownForm,

    #[error("hex color needs 3 or 6 digits, found {0}")]
    HexLength(usize),

    #[error("invalid hex digit `{0}`")]
    HexDigit(char),

    #[error("expected 3 or 4 arguments, found {0}")]
    ArgumentCount(usize),

    #[error("channel `{0}` is not an integer")]
    ChannelNotInteger(String),

    #[error("channel {0} is outside 0..=255")]
    ChannelOutOfRange(i64),

    #[error("alpha `{0}` is not a number in 0..=1 or a percentage")]
    InvalidAlpha(String),
}

/// A color string that matches none of the accepted grammars.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color format `{input}`: {issue}")]
pub struct InvalidColorFormat {
    /// The string as it was handed to the parser.
    pub input: String,
    /// The first problem found.
    pub issue: FormatIssue,
}

impl InvalidColorFormat {
    fn new(input: &str, issue: FormatIssue) -> Self {
        Self {
            input: input.to_owned(),
            issue,
        }
    }
}

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An opaque 8-bit sRGB color.
///
/// This is the only representation the classifier needs: the HSP model
/// works directly on gamma-encoded 0–255 channels.
///
/// # Examples
///
/// ```
/// use dm_color::Rgb;
///
/// let teal: Rgb = "#0aa".parse().unwrap();
/// assert_eq!(teal, Rgb::new(0x00, 0xaa, 0xaa));
/// assert_eq!(teal.to_string(), "#00aaaa");
///
/// let red = Rgb::parse("rgba(255, 0, 0, 0.25)").unwrap();
/// assert_eq!(red, Rgb::new(255, 0, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure white, the default comment color.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color string.
    ///
    /// Surrounding whitespace is ignored; keywords and function names are
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidColorFormat`] if `input` is not one of the accepted
    /// forms or any channel is out of range.
    pub fn parse(input: &str) -> Result<Self, InvalidColorFormat> {
        let s = input.trim();
        if s.is_empty() {
            return Err(InvalidColorFormat::new(input, FormatIssue::Empty));
        }

        if s.eq_ignore_ascii_case("white") {
            return Ok(Self::WHITE);
        }
        if s.eq_ignore_ascii_case("black") {
            return Ok(Self::BLACK);
        }

        let parsed = if let Some(digits) = s.strip_prefix('#') {
            parse_hex(digits)
        } else if let Some(caps) = RGB_FUNCTION.captures(s) {
            parse_rgb_args(&caps[1])
        } else {
            Err(FormatIssue::UnknownForm)
        };

        parsed.map_err(|issue| InvalidColorFormat::new(input, issue))
    }

    /// Channels as `f64`, for brightness math.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> (f64, f64, f64) {
        (f64::from(self.r), f64::from(self.g), f64::from(self.b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = InvalidColorFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = InvalidColorFormat;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

// ─── Hex ─────────────────────────────────────────────────────────────────────

/// Parse the digits after `#`. Only `RGB` and `RRGGBB` are accepted.
fn parse_hex(digits: &str) -> Result<Rgb, FormatIssue> {
    let n = digits
        .chars()
        .map(|c| {
            c.to_digit(16)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(FormatIssue::HexDigit(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    match *n.as_slice() {
        // #RGB: each digit doubled, so `a` becomes `aa`.
        [r, g, b] => Ok(Rgb::new(r << 4 | r, g << 4 | g, b << 4 | b)),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgb::new(r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2)),
        _ => Err(FormatIssue::HexLength(n.len())),
    }
}

// ─── rgb() / rgba() ──────────────────────────────────────────────────────────

fn parse_rgb_args(args: &str) -> Result<Rgb, FormatIssue> {
    let fields: Vec<&str> = args.split(',').map(str::trim).collect();
    if fields.len() != 3 && fields.len() != 4 {
        return Err(FormatIssue::ArgumentCount(fields.len()));
    }

    let r = parse_channel(fields[0])?;
    let g = parse_channel(fields[1])?;
    let b = parse_channel(fields[2])?;
    if let Some(alpha) = fields.get(3) {
        validate_alpha(alpha)?;
    }

    Ok(Rgb::new(r, g, b))
}

fn parse_channel(field: &str) -> Result<u8, FormatIssue> {
    let value: i64 = field
        .parse()
        .map_err(|_| FormatIssue::ChannelNotInteger(field.to_owned()))?;
    u8::try_from(value).map_err(|_| FormatIssue::ChannelOutOfRange(value))
}

fn validate_alpha(field: &str) -> Result<(), FormatIssue> {
    let (number, max) = field
        .strip_suffix('%')
        .map_or((field, 1.0), |pct| (pct.trim_end(), 100.0));

    match number.parse::<f64>() {
        Ok(a) if (0.0..=max).contains(&a) => Ok(()),
        _ => Err(FormatIssue::InvalidAlpha(field.to_owned())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn issue(input: &str) -> FormatIssue {
        Rgb::parse(input).unwrap_err().issue
    }

    // ── Named ───────────────────────────────────────────────────────

    #[test]
    fn named_shortcuts() {
        assert_eq!(Rgb::parse("white"), Ok(Rgb::WHITE));
        assert_eq!(Rgb::parse("black"), Ok(Rgb::BLACK));
    }

    #[test]
    fn named_is_case_insensitive() {
        assert_eq!(Rgb::parse("WHITE"), Ok(Rgb::WHITE));
        assert_eq!(Rgb::parse("Black"), Ok(Rgb::BLACK));
    }

    #[test]
    fn other_names_rejected() {
        assert_eq!(issue("red"), FormatIssue::UnknownForm);
        assert_eq!(issue("notacolor"), FormatIssue::UnknownForm);
    }

    // ── Hex ─────────────────────────────────────────────────────────

    #[test]
    fn hex_six_digits() {
        assert_eq!(Rgb::parse("#a1b2c3"), Ok(Rgb::new(0xa1, 0xb2, 0xc3)));
        assert_eq!(Rgb::parse("#A1B2C3"), Ok(Rgb::new(0xa1, 0xb2, 0xc3)));
    }

    #[test]
    fn hex_three_digits_expand() {
        assert_eq!(Rgb::parse("#abc"), Rgb::parse("#aabbcc"));
        assert_eq!(Rgb::parse("#fff"), Ok(Rgb::WHITE));
        assert_eq!(Rgb::parse("#000"), Ok(Rgb::BLACK));
    }

    #[test]
    fn hex_wrong_length() {
        assert_eq!(issue("#"), FormatIssue::HexLength(0));
        assert_eq!(issue("#ffff"), FormatIssue::HexLength(4));
        assert_eq!(issue("#ffffffff"), FormatIssue::HexLength(8));
    }

    #[test]
    fn hex_bad_digit() {
        assert_eq!(issue("#ggg"), FormatIssue::HexDigit('g'));
        assert_eq!(issue("#12345z"), FormatIssue::HexDigit('z'));
    }

    #[test]
    fn hex_non_ascii_digit_does_not_panic() {
        // Three chars, more than three bytes.
        assert_eq!(issue("#ééé"), FormatIssue::HexDigit('é'));
    }

    #[test]
    fn hex_requires_hash() {
        assert_eq!(issue("ffffff"), FormatIssue::UnknownForm);
    }

    // ── rgb() / rgba() ──────────────────────────────────────────────

    #[test]
    fn rgb_function() {
        assert_eq!(Rgb::parse("rgb(255,255,255)"), Ok(Rgb::WHITE));
        assert_eq!(Rgb::parse("rgb( 12 , 34 , 56 )"), Ok(Rgb::new(12, 34, 56)));
        assert_eq!(Rgb::parse("RGB(1,2,3)"), Ok(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn rgba_alpha_is_ignored() {
        assert_eq!(Rgb::parse("rgba(0,0,0,0.5)"), Ok(Rgb::BLACK));
        assert_eq!(Rgb::parse("rgba(10, 20, 30, 50%)"), Ok(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn rgb_and_rgba_are_aliases() {
        assert_eq!(Rgb::parse("rgb(1,2,3,1)"), Ok(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse("rgba(1,2,3)"), Ok(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn rgb_argument_count() {
        assert_eq!(issue("rgb(1,2)"), FormatIssue::ArgumentCount(2));
        assert_eq!(issue("rgba(1,2,3,4,5)"), FormatIssue::ArgumentCount(5));
        assert_eq!(issue("rgb()"), FormatIssue::ArgumentCount(1));
    }

    #[test]
    fn rgb_channel_not_integer() {
        assert_eq!(issue("rgb(1.5,2,3)"), FormatIssue::ChannelNotInteger("1.5".into()));
        assert_eq!(issue("rgb(a,2,3)"), FormatIssue::ChannelNotInteger("a".into()));
        assert_eq!(issue("rgb(,2,3)"), FormatIssue::ChannelNotInteger(String::new()));
    }

    #[test]
    fn rgb_channel_out_of_range() {
        assert_eq!(issue("rgb(256,0,0)"), FormatIssue::ChannelOutOfRange(256));
        assert_eq!(issue("rgb(0,-1,0)"), FormatIssue::ChannelOutOfRange(-1));
    }

    #[test]
    fn rgba_bad_alpha() {
        assert_eq!(issue("rgba(0,0,0,2)"), FormatIssue::InvalidAlpha("2".into()));
        assert_eq!(issue("rgba(0,0,0,x)"), FormatIssue::InvalidAlpha("x".into()));
        assert_eq!(issue("rgba(0,0,0,NaN)"), FormatIssue::InvalidAlpha("NaN".into()));
        assert_eq!(issue("rgba(0,0,0,150%)"), FormatIssue::InvalidAlpha("150%".into()));
    }

    #[test]
    fn unterminated_function_rejected() {
        assert_eq!(issue("rgb(1,2,3"), FormatIssue::UnknownForm);
    }

    // ── Misc ────────────────────────────────────────────────────────

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(issue(""), FormatIssue::Empty);
        assert_eq!(issue("   "), FormatIssue::Empty);
        assert_eq!(Rgb::parse("  #fff \n"), Ok(Rgb::WHITE));
    }

    #[test]
    fn error_keeps_original_input() {
        let err = Rgb::parse(" nope ").unwrap_err();
        assert_eq!(err.input, " nope ");
        assert_eq!(
            err.to_string(),
            "invalid color format ` nope `: not a named, hex, rgb() or rgba() color"
        );
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::new(0xAB, 0x0C, 0xFF).to_string(), "#ab0cff");
    }

    #[test]
    fn string_conversions_round_through_hex() {
        assert_eq!(String::from(Rgb::new(1, 2, 3)), "#010203");
        assert_eq!(Rgb::try_from("rgb(1,2,3)".to_string()), Ok(Rgb::new(1, 2, 3)));
    }
}
