//! Color schemes for the display
//!
//! Three palettes selectable from the command line, plus `auto` which picks one
//! from the terminal's color depth.

use ratatui::style::{Color, Style};
use std::fmt;

use crate::constants::animation::COLOR_COUNT;

const GRAY: Color = Color::Indexed(239);
const ORANGE: Color = Color::Indexed(202);
const WHITE_256: Color = Color::Indexed(231);

/// Available color schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Monero on 256-color terminals, standard otherwise
    #[default]
    Auto,
    /// Gray and orange on black
    Monero,
    /// Gray and orange on white
    MoneroAlt,
    /// Green phosphor, works on 8-color terminals
    Standard,
}

impl std::str::FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorScheme::Auto),
            "monero" => Ok(ColorScheme::Monero),
            "monero_alt" | "monero-alt" => Ok(ColorScheme::MoneroAlt),
            "standard" => Ok(ColorScheme::Standard),
            _ => Err(format!(
                "Unknown color scheme '{s}'. Available: auto, monero, monero_alt, standard"
            )),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScheme::Auto => write!(f, "auto"),
            ColorScheme::Monero => write!(f, "monero"),
            ColorScheme::MoneroAlt => write!(f, "monero_alt"),
            ColorScheme::Standard => write!(f, "standard"),
        }
    }
}

impl ColorScheme {
    /// Replaces `Auto` with a concrete scheme for a terminal with `color_count` colors.
    pub fn resolve(self, color_count: u16) -> Self {
        match self {
            ColorScheme::Auto if color_count >= 256 => ColorScheme::Monero,
            ColorScheme::Auto => ColorScheme::Standard,
            other => other,
        }
    }

    /// Resolves against the attached terminal.
    pub fn detect(self) -> Self {
        self.resolve(crossterm::style::available_color_count())
    }

    /// `Auto` maps to the standard palette here; call [`ColorScheme::detect`] first.
    pub fn palette(self) -> Palette {
        match self.resolve(0) {
            ColorScheme::Monero => Palette::monero(),
            ColorScheme::MoneroAlt => Palette::monero_alt(),
            _ => Palette::standard(),
        }
    }
}

/// The five named color pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Overlay boxes and their text
    pub info_text: Style,
    /// Unfilled part of the progress bar
    pub meter_plain: Style,
    /// Filled part of the progress bar
    pub meter_highlight: Style,
    /// First band of falling text, also the canvas background
    pub falling_primary: Style,
    pub falling_secondary: Style,
}

fn pair(fg: Color, bg: Color) -> Style {
    Style::default().fg(fg).bg(bg)
}

impl Palette {
    pub fn monero() -> Self {
        Self {
            info_text: pair(Color::White, Color::Black),
            meter_plain: pair(Color::White, GRAY),
            meter_highlight: pair(Color::Black, ORANGE),
            falling_primary: pair(GRAY, Color::Black),
            falling_secondary: pair(ORANGE, Color::Black),
        }
    }

    pub fn monero_alt() -> Self {
        Self {
            info_text: pair(Color::Black, WHITE_256),
            meter_plain: pair(WHITE_256, GRAY),
            meter_highlight: pair(WHITE_256, ORANGE),
            falling_primary: pair(GRAY, WHITE_256),
            falling_secondary: pair(ORANGE, WHITE_256),
        }
    }

    pub fn standard() -> Self {
        Self {
            info_text: pair(Color::White, Color::Black),
            meter_plain: pair(Color::White, Color::Black),
            meter_highlight: pair(Color::Black, Color::Green),
            falling_primary: pair(Color::Green, Color::Black),
            falling_secondary: pair(Color::Green, Color::Black),
        }
    }

    /// Styles for the falling-text bands, primary first.
    pub fn falling_styles(&self) -> [Style; COLOR_COUNT] {
        [self.falling_primary, self.falling_secondary]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
