//! Colour and width detection for terminal output

use owo_colors::{OwoColorize, Style, colors::css};

/// Whether stdout accepts ANSI colours
pub fn supports_color() -> bool {
    supports_color::on_cached(supports_color::Stream::Stdout).is_some()
}

/// Width of the attached terminal in columns, if there is one
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(width, _)| width.0)
}

/// The palette used for node status and hints.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Critical,
    Info,
    Dim,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().fg::<css::Green>(),
            Self::Warning => Style::new().fg::<css::Orange>(),
            Self::Critical => Style::new().fg::<css::Red>().bold(),
            Self::Info => Style::new().fg::<css::LightBlue>(),
            Self::Dim => Style::new().dimmed(),
        }
    }

    fn paint(self, text: &str) -> String {
        if supports_color() {
            text.style(self.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Extension trait for colouring text, falling back to plain text when the
/// terminal has no colour support
pub trait Colorize {
    /// Healthy status (green)
    fn success(&self) -> String;
    /// Alerts and skipped records (amber)
    fn warning(&self) -> String;
    /// Critical status and failures (bold red)
    fn critical(&self) -> String;
    /// Locations and headings (blue)
    fn info(&self) -> String;
    /// Secondary detail
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        Tone::Success.paint(self.as_ref())
    }

    fn warning(&self) -> String {
        Tone::Warning.paint(self.as_ref())
    }

    fn critical(&self) -> String {
        Tone::Critical.paint(self.as_ref())
    }

    fn info(&self) -> String {
        Tone::Info.paint(self.as_ref())
    }

    fn dim(&self) -> String {
        Tone::Dim.paint(self.as_ref())
    }
}
