//! Palette for the command listing, status lines and clap help.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Plugin path found.
pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);

/// Fatal errors and missing plugin paths.
pub(crate) const ERROR: Style = fg(AnsiColor::Red);

/// Skipped commands and empty listings.
pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);

/// Group names in the listing.
pub(crate) const HEADER: Style = Style::new().effects(Effects::BOLD);

/// Command names and config labels.
pub(crate) const LABEL: Style = Style::new().effects(Effects::BOLD);

pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Usage lines under the listing.
pub(crate) const HINT: Style = Style::new().effects(Effects::DIMMED);

/// `(default)` marker next to a group's default command.
pub(crate) const DEFAULT_MARKER: Style = fg(AnsiColor::Cyan);

/// Help styling for the generated command tree, using the listing's colors.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    let heading = fg(AnsiColor::Green).effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(DEFAULT_MARKER)
        .placeholder(DEFAULT_MARKER)
        .error(ERROR.effects(Effects::BOLD))
        .valid(SUCCESS)
        .invalid(WARNING)
}
