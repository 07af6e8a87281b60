//! Color utilities for terminal output
//!
//! This module provides consistent color handling across the application,
//! respecting user preferences and terminal capabilities.

use owo_colors::OwoColorize;

use crate::cli::ColorOption;

/// Color scheme for the application
///
/// Provides semantic color names (success, error) rather than raw colors so
/// the same kind of message always looks the same everywhere.
pub struct ColorScheme {
  enabled: bool,
}

impl ColorScheme {
  /// Create a new color scheme based on user preference and terminal
  /// capabilities
  pub fn new(color_option: ColorOption) -> Self {
    let enabled = match color_option {
      ColorOption::Always => true,
      ColorOption::Never => false,
      ColorOption::Auto => {
        // Check if stdout is a TTY
        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
      }
    };

    Self { enabled }
  }

  /// Style for success messages (green)
  pub fn success<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.green())
    } else {
      text.to_string()
    }
  }

  /// Style for error messages (bright red)
  pub fn error<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_red().bold())
    } else {
      text.to_string()
    }
  }

  /// Style for warning messages (yellow)
  pub fn warning<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.yellow())
    } else {
      text.to_string()
    }
  }

  /// Style for info messages (cyan)
  pub fn info<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.cyan())
    } else {
      text.to_string()
    }
  }

  /// Style for emphasis/important text (bright white, bold)
  pub fn emphasis<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_white().bold())
    } else {
      text.to_string()
    }
  }

  /// Style for URLs and links (blue, underlined)
  pub fn link<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.blue().underline())
    } else {
      text.to_string()
    }
  }

  /// Style for file paths (magenta)
  pub fn path<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.magenta())
    } else {
      text.to_string()
    }
  }

  /// Style for numbers and metrics (bright blue)
  pub fn number<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_blue())
    } else {
      text.to_string()
    }
  }

  /// Style for commands and code (bright green)
  pub fn code<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_green())
    } else {
      text.to_string()
    }
  }

  /// Style for dimmed/secondary text (gray)
  pub fn dimmed<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.dimmed())
    } else {
      text.to_string()
    }
  }
}
