use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiMode {
    Auto,   // Use emoji if terminal supports Unicode
    Always, // Always use emoji
    Never,  // Never use emoji
}

impl EmojiMode {
    pub fn should_use_emoji(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_emoji_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: EmojiMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: EmojiMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode, emoji: EmojiMode) -> Self {
        Self { color, emoji }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// ASCII-only, no colors, no emoji
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: EmojiMode::Never,
        }
    }

    /// Settings for output written to a file: never colored, and emoji no
    /// longer follow whether stdout is a terminal.
    pub fn for_file(self) -> Self {
        Self {
            color: ColorMode::Never,
            emoji: match self.emoji {
                EmojiMode::Never => EmojiMode::Never,
                EmojiMode::Auto | EmojiMode::Always => EmojiMode::Always,
            },
        }
    }
}

/// Cell text for presence and absence in comparison tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub present: String,
    pub absent: String,
}

impl Markers {
    /// Check mark when emoji are available, `x` otherwise. Overrides win.
    pub fn resolve(config: &FormattingConfig, present: Option<&str>, absent: Option<&str>) -> Self {
        let default_present = if config.emoji.should_use_emoji() {
            "✅"
        } else {
            "x"
        };
        Self {
            present: present.unwrap_or(default_present).to_string(),
            absent: absent.unwrap_or("").to_string(),
        }
    }

    pub fn cell(&self, present: bool) -> &str {
        if present {
            &self.present
        } else {
            &self.absent
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            present: "✅".to_string(),
            absent: String::new(),
        }
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn emoji(&self, emoji: &str, fallback: &str) -> String;
    fn dim(&self, text: &str) -> String;
}

pub struct ColoredFormatter {
    config: FormattingConfig,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        colored::control::set_override(config.color.should_use_color());
        Self { config }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.config.color.should_use_color() {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn emoji(&self, emoji: &str, fallback: &str) -> String {
        if self.config.emoji.should_use_emoji() {
            emoji.to_string()
        } else {
            fallback.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

fn detect_emoji_support() -> bool {
    // Same heuristic as color: a real terminal
    detect_color_support()
}
