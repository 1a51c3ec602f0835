use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::render::{NameFilter, RenderError, RenderOptions};

// ======================================================
// COLOR MODE
// ======================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl ColorMode {
    /// `Auto` colors only a terminal, and only while `NO_COLOR` is unset.
    pub fn colorize(self, stdout_is_terminal: bool, no_color: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout_is_terminal && !no_color,
        }
    }
}

// ======================================================
// SETTINGS LAYER
// ======================================================

/// One source of settings. The config file deserializes straight into it,
/// the CLI builds one by hand; unset means "defer to the next layer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsLayer {
    pub all: Option<bool>,
    pub no_trunc: Option<bool>,
    pub quiet: Option<bool>,
    pub size: Option<bool>,
    pub color: Option<ColorMode>,
    pub columns: Option<Vec<String>>,
    pub name_like: Option<String>,
    pub name_ilike: Option<String>,
    pub api_version: Option<String>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub render: RenderOptions,
    pub api_version: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dockerate").join("config.json"))
}

/// Loads the settings file. A missing file at the default location is
/// fine; an explicitly requested one must exist.
pub fn load_layer(explicit: Option<&Path>) -> Result<SettingsLayer> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(SettingsLayer::default()),
        },
    };

    debug!(path = %path.display(), "reading settings file");

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

impl Settings {
    /// Layers `cli` over `file`. A name pattern given on the command line
    /// replaces whichever pattern the file set; two patterns from the same
    /// layer are rejected.
    pub fn resolve(
        cli: SettingsLayer,
        file: SettingsLayer,
        stdout_is_terminal: bool,
        no_color: bool,
    ) -> Result<Self, RenderError> {
        let flag = |cli: Option<bool>, file: Option<bool>| cli.or(file).unwrap_or(false);

        let (like, ilike) = if cli.name_like.is_some() || cli.name_ilike.is_some() {
            (cli.name_like, cli.name_ilike)
        } else {
            (file.name_like, file.name_ilike)
        };

        let name_filter = match (like, ilike) {
            (Some(_), Some(_)) => {
                return Err(RenderError::MutuallyExclusiveFilterOptions {
                    first: "name-like",
                    second: "name-ilike",
                })
            }
            (Some(pattern), None) => Some(NameFilter::CaseSensitive(pattern)),
            (None, Some(pattern)) => Some(NameFilter::CaseInsensitive(pattern)),
            (None, None) => None,
        };

        let color = cli.color.or(file.color).unwrap_or_default();

        let render = RenderOptions {
            all: flag(cli.all, file.all),
            show_sizes: flag(cli.size, file.size),
            quiet: flag(cli.quiet, file.quiet),
            no_trunc: flag(cli.no_trunc, file.no_trunc),
            colorize: color.colorize(stdout_is_terminal, no_color),
            name_filter,
            columns: cli.columns.or(file.columns).unwrap_or_default(),
        };

        Ok(Self {
            render,
            api_version: cli.api_version.or(file.api_version),
        })
    }
}
