//! Color theme system for polish.
//!
//! Two built-in themes:
//!
//! - `dark` uses ANSI 16 colors and works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB; requires truecolor.

use log::warn;
use ratatui::style::Color;

/// All color values used across the review UI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Word diff runs
    /// Text present only in the revision.
    pub diff_added: Color,
    /// Text present only in the original (rendered struck through).
    pub diff_removed: Color,
    /// Text common to both sides.
    pub diff_same: Color,

    // Review panel
    /// Marker for a segment whose revision is in the live text.
    pub segment_applied: Color,
    /// Marker and text for segments with nothing to change.
    pub segment_unchanged: Color,

    // Field list
    /// Field with a polish request in flight.
    pub field_polishing: Color,
    /// Character counts next to each field.
    pub field_count: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    /// Status message text (last action result or alert).
    pub status_message: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_same: Color::Reset,

            segment_applied: Color::Green,
            segment_unchanged: Color::DarkGray,

            field_polishing: Color::Yellow,
            field_count: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_message: Color::Yellow,
        }
    }

    /// Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            diff_added: green,
            diff_removed: red,
            diff_same: text,

            segment_applied: green,
            segment_unchanged: overlay1,

            field_polishing: peach,
            field_count: overlay1,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_message: yellow,
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark()`
    /// so a typo never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!("unknown theme '{other}', falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
