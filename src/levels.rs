use core::fmt;
use core::str::FromStr;

use colored::Color;

use crate::error::LoggerError;

/// Severity of a log line, ordered from least to most severe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    /// Every level, least severe first.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// The name written into the `LEVEL@prefix` tag.
    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Info => "Info",
            LogLevel::Warn => "Warn",
            LogLevel::Error => "Error",
            LogLevel::Fatal => "Fatal",
        }
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Color used for the bracketed tag of a line at this level.
    #[inline]
    pub fn color(self) -> Color {
        color_for_rank(self.rank())
    }

    /// Error and Fatal lines go to stderr when no sink override is set.
    #[inline]
    pub const fn is_error_stream(self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Fatal)
    }
}

/// Maps a raw rank to its tag color. Ranks outside the known levels are painted white.
pub fn color_for_rank(rank: u8) -> Color {
    match rank {
        0 => Color::Green,
        1 => Color::BrightBlue,
        2 => Color::Yellow,
        3 => Color::Red,
        4 => Color::BrightRed,
        _ => Color::White,
    }
}

/// Whether the `Level@prefix` tag carries ANSI color codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color stdout and stderr lines when that stream is a terminal and `NO_COLOR` is
    /// unset. Sink overrides stay plain.
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.is_empty() || s.eq_ignore_ascii_case("auto") => Ok(ColorMode::Auto),
            s if s.eq_ignore_ascii_case("always") => Ok(ColorMode::Always),
            s if s.eq_ignore_ascii_case("never") => Ok(ColorMode::Never),
            _ => Err(LoggerError::InvalidColorMode(s.to_string())),
        }
    }
}

/// Wraps `text` in the foreground escape for `color`.
pub fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(rank: u8) -> Result<Self, LoggerError> {
        LogLevel::ALL
            .get(rank as usize)
            .copied()
            .ok_or_else(|| LoggerError::InvalidLevel(rank.to_string()))
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoggerError::InvalidLevel(s.to_string()))
    }
}

#[cfg(feature = "DEBUG")]
impl LogLevel {
    pub(crate) fn debug_suppressed(&self, min: LogLevel, prefix: &str) {
        println!(
            "\x1b[90m[suppressed]\x1b[0m {}@{} below minimum {}", self, prefix, min
        );
    }
}
