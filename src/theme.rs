//! Terminal colour palette.
//!
//! Every coloured span RustDict prints goes through a [`Theme`], so light and
//! dark terminals both stay readable. Colour can be switched off globally
//! with [`set_color_enabled`].

use yansi::Color;

/// Colours used for lookup output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Provider tag and URL lines.
    pub label: Color,
    /// Headword at the top of a rendered record.
    pub headword: Color,
    /// Part of speech, reading, pronunciation.
    pub category: Color,
    /// Example sentences and quotes.
    pub example: Color,
    /// Secondary details (votes, links, synonyms).
    pub dim: Color,
    /// High-severity errors (no network, timeout).
    pub danger: Color,
    /// Advisory messages (word not found).
    pub warning: Color,
}

impl Theme {
    /// Palette for dark backgrounds (default).
    pub fn dark() -> Self {
        Self {
            label: Color::Blue,
            headword: Color::Yellow,
            category: Color::Green,
            example: Color::Cyan,
            dim: Color::BrightBlack,
            danger: Color::Red,
            warning: Color::Yellow,
        }
    }

    /// Palette for light backgrounds.
    pub fn light() -> Self {
        Self {
            label: Color::Blue,
            headword: Color::Magenta,
            category: Color::Green,
            example: Color::Cyan,
            dim: Color::Black,
            danger: Color::Red,
            warning: Color::Yellow,
        }
    }

    /// Detect terminal theme or return dark theme as default.
    pub fn auto() -> Self {
        if is_light_terminal() {
            Self::light()
        } else {
            Self::dark()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Enable or disable ANSI colour for all subsequent output.
pub fn set_color_enabled(enabled: bool) {
    if enabled {
        yansi::enable();
    } else {
        yansi::disable();
    }
}

/// Heuristic light-background detection via `COLORFGBG` ("fg;bg").
fn is_light_terminal() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| value.rsplit(';').next().map(str::to_string))
        .and_then(|bg| bg.parse::<u32>().ok())
        .is_some_and(|bg| bg >= 7 && bg != 8)
}
