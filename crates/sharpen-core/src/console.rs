//! Terminal color handling for rendered diagnostics

use std::env;
use std::io::{self, IsTerminal};

/// Console output handler with color support
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color_enabled: bool,
}

impl Console {
    /// Colors are enabled when stdout is a terminal and `NO_COLOR` is unset
    pub fn new() -> Self {
        Self {
            color_enabled: io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Create a console with colors disabled
    pub fn no_colors() -> Self {
        Self {
            color_enabled: false,
        }
    }

    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Colorize text with the specified color
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        let code = match color {
            Color::Red => "31",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::Green => "32",
            Color::Cyan => "36",
            Color::Dim => "2",
            Color::Bold => "1",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
    Cyan,
    Dim,
    Bold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_when_disabled() {
        let console = Console::no_colors();
        assert!(!console.is_color_enabled());
        assert_eq!(console.colorize("hello", Color::Red), "hello");
        assert_eq!(console.colorize("hello", Color::Bold), "hello");
    }

    #[test]
    fn test_colorize_when_enabled() {
        let console = Console {
            color_enabled: true,
        };
        assert_eq!(console.colorize("x", Color::Red), "\x1b[31mx\x1b[0m");
    }
}
