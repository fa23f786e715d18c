// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NESCKA_LOG";

/// Where log lines go. The TUI owns the terminal, so it logs to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn env_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level.to_ascii_lowercase())
            .with_context(|| format!("invalid log level {level:?}")),
    }
}

pub fn init(level: &str, target: &LogTarget) -> Result<()> {
    let filter = env_filter(level)?;
    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| {
                    format!(
                        "open log file {}; set [log].file to a writable path",
                        path.display()
                    )
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|error| anyhow!("initialize tracing subscriber: {error}"))
}
