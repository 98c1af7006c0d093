//! Theme definitions for colors, symbols, and badges.

use owo_colors::{OwoColorize, Style};
use pillbox_core::DoseStatus;

/// Symbol pair for ASCII and Unicode variants.
#[derive(Debug, Clone)]
pub struct SymbolPair {
    pub ascii: &'static str,
    pub unicode: &'static str,
}

impl SymbolPair {
    pub const fn new(ascii: &'static str, unicode: &'static str) -> Self {
        Self { ascii, unicode }
    }

    /// Get the appropriate symbol based on unicode flag.
    pub fn get(&self, unicode: bool) -> &'static str {
        if unicode {
            self.unicode
        } else {
            self.ascii
        }
    }
}

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
}

impl Badge {
    /// Get badge text (e.g., "[OK]")
    pub fn text(&self) -> &'static str {
        match self {
            Self::Ok => "[OK]",
            Self::Warn => "[WARN]",
            Self::Err => "[ERR]",
            Self::Info => "[INFO]",
        }
    }

    /// Get badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        if !unicode {
            return self.text();
        }
        match self {
            Self::Ok => "[\u{2713}]",   // [✓]
            Self::Warn => "[\u{26A0}]", // [⚠]
            Self::Err => "[\u{2717}]",  // [✗]
            Self::Info => "[\u{2139}]", // [ℹ]
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Self::Ok => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Err => Style::new().red().bold(),
            Self::Info => Style::new().cyan(),
        }
    }
}

/// Apply `style` to `text` when color is enabled.
pub fn styled(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Shared text styles.
pub mod styles {
    use owo_colors::Style;

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn dim() -> Style {
        Style::new().dimmed()
    }
}

const TAKEN: SymbolPair = SymbolPair::new("[x]", "\u{2713}");
const AVAILABLE: SymbolPair = SymbolPair::new("[>]", "\u{25CF}");
const UPCOMING: SymbolPair = SymbolPair::new("[ ]", "\u{25CB}");
const OVERDUE: SymbolPair = SymbolPair::new("[!]", "\u{2717}");

/// Marker shown next to an occurrence for its dose status.
pub fn status_symbol(status: DoseStatus, unicode: bool) -> &'static str {
    match status {
        DoseStatus::Taken => TAKEN.get(unicode),
        DoseStatus::Available => AVAILABLE.get(unicode),
        DoseStatus::Upcoming => UPCOMING.get(unicode),
        DoseStatus::Overdue => OVERDUE.get(unicode),
    }
}

pub fn status_style(status: DoseStatus) -> Style {
    match status {
        DoseStatus::Taken => Style::new().green(),
        DoseStatus::Available => Style::new().cyan().bold(),
        DoseStatus::Upcoming => Style::new().dimmed(),
        DoseStatus::Overdue => Style::new().red(),
    }
}
