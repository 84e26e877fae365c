//! Style constants and clap help styling configuration.

use anstyle::{AnsiColor, Color, Effects, Style};

/// Red: protocol and transport errors.
pub(crate) const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Bold: tool names in listings.
pub(crate) const NAME: Style = Style::new().effects(Effects::BOLD);

/// Dimmed: descriptions and secondary detail.
pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Cyan: argument names in tool listings.
pub(crate) const ARG: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Custom clap styles for help output, matching our CLI palette.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    let green_bold = Style::new()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)))
        .effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(green_bold)
        .usage(green_bold)
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Red)))
                .effects(Effects::BOLD),
        )
        .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
}
