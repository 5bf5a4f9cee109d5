//! Coloured error reports with source context.

use azalea_lang::error::Location;
use azalea_lang::AzaleaError;
use owo_colors::{OwoColorize, Style};
use std::path::Path;

/// Configuration for diagnostic display.
#[derive(Debug, Clone)]
pub struct DiagnosticConfig {
    /// Whether to use ANSI colors
    pub use_colors: bool,
    /// Whether to show source context
    pub show_context: bool,
    /// Number of lines shown on each side of the error line
    pub context_lines: usize,
}

impl DiagnosticConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        DiagnosticConfig {
            use_colors: true,
            show_context: true,
            context_lines: 2,
        }
    }

    /// Message and location only, without colors.
    pub fn minimal() -> Self {
        DiagnosticConfig {
            use_colors: false,
            show_context: false,
            context_lines: 0,
        }
    }

    /// Wide source context.
    pub fn verbose() -> Self {
        DiagnosticConfig {
            use_colors: true,
            show_context: true,
            context_lines: 5,
        }
    }
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Formatter for pipeline errors.
pub struct DiagnosticFormatter {
    config: DiagnosticConfig,
}

impl DiagnosticFormatter {
    pub fn new(config: DiagnosticConfig) -> Self {
        DiagnosticFormatter { config }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.config.use_colors {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Format an error raised while processing `source`.
    pub fn format(&self, error: &AzaleaError, source: &str, filename: Option<&Path>) -> String {
        let mut output = String::new();
        let bar = self.paint("|", Style::new().blue());

        output.push_str(&format!(
            "{}: {}\n",
            self.paint("Error", Style::new().bold().red()),
            self.paint(error.kind().label(), Style::new().bold())
        ));
        output.push_str(&format!("  {bar}\n"));
        output.push_str(&format!(
            "  {bar} {}: {}\n",
            self.paint("Message", Style::new().white().bold()),
            error
        ));

        let Some(location) = error.location() else {
            return output;
        };

        let location_str = match filename {
            Some(filename) => format!("{}:{}:{}", filename.display(), location.line, location.column),
            None => format!("line {}:{}", location.line, location.column),
        };
        output.push_str(&format!("  {bar}\n"));
        output.push_str(&format!(
            "  +--> {}: {}\n",
            self.paint("Location", Style::new().cyan().bold()),
            location_str
        ));

        if self.config.show_context {
            output.push_str(&format!("  {bar}\n"));
            self.format_context(&mut output, &location, source);
            output.push_str(&format!("  {bar}\n"));
        }

        output
    }

    fn format_context(&self, output: &mut String, location: &Location, source: &str) {
        let lines: Vec<&str> = source.lines().collect();
        let first = location.line.saturating_sub(self.config.context_lines).max(1);
        let last = (location.line + self.config.context_lines).min(lines.len());

        for line_num in first..=last {
            let line_text = lines.get(line_num - 1).copied().unwrap_or("");
            if line_num != location.line {
                output.push_str(&format!(
                    "  |{:5} | {}\n",
                    line_num,
                    self.paint(line_text, Style::new().dimmed())
                ));
                continue;
            }

            output.push_str(&format!("  |{:5} | {}\n", line_num, line_text));

            let start = usize::from(location.span.start());
            let end = usize::from(location.span.end());
            let width = source
                .get(start..end)
                .map(|text| text.chars().count())
                .unwrap_or(0)
                .max(1);
            output.push_str(&format!(
                "  |      | {}{}\n",
                " ".repeat(location.column.saturating_sub(1)),
                self.paint(&"^".repeat(width), Style::new().bright_yellow().bold())
            ));

            let here = match source.get(start..end).map(str::trim) {
                Some(text) if !text.is_empty() => format!("Error at '{text}'"),
                _ => "Error at this location".to_string(),
            };
            output.push_str(&format!(
                "  |      +-- {}: {}\n",
                self.paint("Here", Style::new().bright_yellow().bold()),
                here
            ));
        }

        // Errors at end of input may point past the last line.
        if location.line > lines.len() {
            output.push_str(&format!("  |{:5} | \n", location.line));
        }
    }
}
