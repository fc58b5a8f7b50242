// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainError {
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    InvalidSetting {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("failed to apply {name} {value} (must be a finite number)")]
    NonFinite { name: &'static str, value: f64 },

    #[error("unsupported charset: {0} (see --list-charsets)")]
    Charset(String),

    #[error("invalid color: {0} (see --list-colors)")]
    ColorScheme(String),

    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    ColorMode(u16),

    #[error("--chars: {0}")]
    Chars(String),

    #[error("failed to open log file: {0}")]
    LogFile(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_setting_message_names_flag_and_bounds() {
        let e = RainError::InvalidSetting {
            name: "--interval-ms",
            value: "2".into(),
            min: "5".into(),
            max: "1000".into(),
        };
        assert_eq!(
            e.to_string(),
            "failed to apply --interval-ms 2 (min 5 max 1000)"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let e: RainError = io.into();
        assert!(matches!(e, RainError::Io(_)));
    }
}
