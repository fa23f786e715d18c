// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use nescka_app::Tone;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "NESCKA_CONFIG_PATH";

const CONFIG_VERSION: i64 = 1;
const DEFAULT_ASSISTANT_DELAY: &str = "500ms";
const DEFAULT_TOAST_DURATION: &str = "3s";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            report: Report::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub default_tone: Option<String>,
    pub assistant_delay: Option<String>,
    pub toast_duration: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            default_tone: Some(Tone::default().label().to_owned()),
            assistant_delay: Some(DEFAULT_ASSISTANT_DELAY.to_owned()),
            toast_duration: Some(DEFAULT_TOAST_DURATION.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Report {
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(nescka_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [ui], [report], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(tone) = &self.ui.default_tone
            && Tone::parse(tone).is_none()
        {
            let options = Tone::ALL.map(Tone::label).join(", ");
            bail!(
                "ui.default_tone in {} must be one of {options}, got {tone:?}",
                path.display()
            );
        }

        if let Some(delay) = &self.ui.assistant_delay {
            parse_duration(delay)
                .with_context(|| format!("ui.assistant_delay in {}", path.display()))?;
        }

        if let Some(toast) = &self.ui.toast_duration {
            let parsed = parse_duration(toast)
                .with_context(|| format!("ui.toast_duration in {}", path.display()))?;
            if parsed.is_zero() {
                bail!(
                    "ui.toast_duration in {} must be positive, got {}",
                    path.display(),
                    toast
                );
            }
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        for (key, value) in [
            ("report.output_dir", &self.report.output_dir),
            ("log.file", &self.log.file),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                bail!(
                    "{key} in {} must not be empty; remove the key to use the default",
                    path.display()
                );
            }
        }

        Ok(())
    }

    pub fn default_tone(&self) -> Tone {
        self.ui
            .default_tone
            .as_deref()
            .and_then(Tone::parse)
            .unwrap_or_default()
    }

    pub fn assistant_delay(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .assistant_delay
                .as_deref()
                .unwrap_or(DEFAULT_ASSISTANT_DELAY),
        )
    }

    pub fn toast_duration(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .toast_duration
                .as_deref()
                .unwrap_or(DEFAULT_TOAST_DURATION),
        )
    }

    pub fn report_dir(&self) -> Result<PathBuf> {
        match &self.report.output_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(nescka_db::default_data_dir()?.join("reports")),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(file) => Ok(PathBuf::from(file)),
            None => Ok(nescka_db::default_data_dir()?.join("nescka.log")),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# nescka config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# One of: Professional, Friendly, Casual, Concise, Enthusiastic\ndefault_tone = \"{}\"\nassistant_delay = \"{DEFAULT_ASSISTANT_DELAY}\"\ntoast_duration = \"{DEFAULT_TOAST_DURATION}\"\n\n[report]\n# Optional. Default is <data dir>/nescka/reports\n# output_dir = \"/absolute/path/to/reports\"\n\n[log]\n# NESCKA_LOG overrides this level.\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# Optional. Default is <data dir>/nescka/nescka.log\n# file = \"/absolute/path/to/nescka.log\"\n",
            path.display(),
            Tone::default().label(),
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 3s)")
}
