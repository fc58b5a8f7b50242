// Copyright (c) 2026 rezky_nightky

//! Tracing setup. The alternate screen owns stdout, so logs only go to a
//! file, and only when one is asked for.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::RainError;

pub const LOG_ENV: &str = "KANARAIN_LOG";

pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(log_file: Option<&Path>) -> Result<(), RainError> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RainError::LogFile(format!("{}: {}", path.display(), e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| RainError::LogFile(e.to_string()))
}
