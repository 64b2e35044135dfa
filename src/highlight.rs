use std::io::{IsTerminal, Write};

use inksac::prelude::*;

/// Colours diagnostics written to standard error.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
    color_support: ColorSupport,
}

impl Highlighter {
    /// Colour is used only when `enabled`, stderr is a terminal and the
    /// terminal advertises colour support.
    pub fn new(enabled: bool) -> Self {
        let support = if enabled && std::io::stderr().is_terminal() {
            check_color_support().unwrap_or(ColorSupport::NoColor)
        } else {
            ColorSupport::NoColor
        };
        Self {
            color_support: support,
        }
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();

        error.style(error_style).to_string()
    }

    /// Writes `minish: <message>` as one line to `err`.
    pub fn report(&self, err: &mut dyn Write, message: &str) {
        let line = self.highlight_error(&format!("minish: {}", message));
        // Nowhere left to report a failing diagnostic stream.
        let _ = writeln!(err, "{}", line);
        let _ = err.flush();
    }
}
