// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the application's color palette and provides utilities
//! for converting colors between Ratatui's internal representation and external
//! formats (such as hexadecimal strings) used for terminal emulator styling.
//!
//! The theme starts from fixed defaults and is then recoloured from the
//! palette sampled from the active track's thumbnail.

use ratatui::style::Color;

use crate::controller::palette::{Palette, Rgb};

/// Accent colours darker than this are lifted so text stays readable.
const MIN_ACCENT_LUMA: f64 = 96.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) gauge_track_colour: Color,
    pub(crate) commander_colour: Color,
    pub(crate) text_colour: Color,
    pub(crate) dim_colour: Color,
    pub(crate) glow_colour: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(40, 20, 50),
            accent_colour: Color::Rgb(250, 189, 47),
            border_colour: Color::Rgb(102, 102, 102),
            gauge_track_colour: Color::Rgb(50, 30, 60),
            commander_colour: Color::Rgb(255, 255, 255),
            text_colour: Color::Rgb(255, 255, 255),
            dim_colour: Color::Rgb(162, 161, 166),
            glow_colour: Color::Rgb(179, 157, 219),
        }
    }

    /// Recolours the theme from a sampled palette.
    ///
    /// The darkened backgrounds fill the screen and the gauge track, the
    /// centre sample becomes the cursor glow and the brightest sample the
    /// accent.
    pub(crate) fn apply_palette(&mut self, palette: &Palette) {
        self.background_colour = rgb(palette.background_1);
        self.gauge_track_colour = rgb(palette.background_2);
        self.glow_colour = rgb(palette.interactive);
        self.accent_colour = rgb(readable(brightest(&palette.colours)));
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string.
    ///
    /// This is primarily used to set the terminal emulator's background color
    /// via escape sequences. Non-RGB colours have no hex form.
    pub(crate) fn to_hex(colour: Color) -> Option<String> {
        match colour {
            Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            _ => None,
        }
    }
}

pub(crate) fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb(r, g, b)
}

fn luma([r, g, b]: Rgb) -> f64 {
    0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)
}

fn brightest(colours: &[Rgb; 5]) -> Rgb {
    colours
        .iter()
        .copied()
        .max_by(|a, b| luma(*a).total_cmp(&luma(*b)))
        .unwrap_or([255, 255, 255])
}

// Mixes towards white until the colour is light enough
fn readable(colour: Rgb) -> Rgb {
    let current = luma(colour);
    if current >= MIN_ACCENT_LUMA {
        return colour;
    }

    let t = (MIN_ACCENT_LUMA - current) / (255.0 - current);
    colour.map(|c| (f64::from(c) + (255.0 - f64::from(c)) * t).round() as u8)
}
