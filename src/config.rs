use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::Deserialize;

use crate::theme::{DEFAULT_THEMES, is_valid_slug};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "theme-seed.toml";
pub const DEFAULT_THEMES_DIR: &str = "themes";
pub const DEFAULT_OUTPUT: &str = "backend/migrations/078_seed_production_themes.sql";
/// Presets 0..=6 are seeded by earlier migrations.
pub const DEFAULT_SORT_OFFSET: u32 = 7;

// ---------------------------------------------------------------------------
// ConfigFile — deserialized from TOML (all fields optional)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub themes_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub sort_offset: Option<u32>,
    pub themes: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Config — resolved (all fields concrete)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub themes_dir: PathBuf,
    pub output: PathBuf,
    pub sort_offset: u32,
    /// Slugs in seeding order.
    pub themes: Vec<String>,
}

impl ConfigFile {
    /// Merge CLI values (overwrites non-None fields).
    pub fn merge_cli(&mut self, themes_dir: Option<PathBuf>, output: Option<PathBuf>) {
        if let Some(ref v) = themes_dir {
            debug!("config: CLI override themes_dir={}", v.display());
            self.themes_dir = themes_dir;
        }
        if let Some(ref v) = output {
            debug!("config: CLI override output={}", v.display());
            self.output = output;
        }
    }

    /// Resolve to a Config by applying defaults to missing fields.
    ///
    /// Fails if a slug is malformed or listed twice: a repeated slug would
    /// make the upsert touch the same row twice in one statement.
    pub fn resolve(self) -> Result<Config> {
        let themes = self
            .themes
            .unwrap_or_else(|| DEFAULT_THEMES.iter().map(|s| s.to_string()).collect());

        let mut seen = HashSet::new();
        for slug in &themes {
            if !is_valid_slug(slug) {
                bail!("invalid theme slug '{slug}' (expected lowercase words joined by '-')");
            }
            if !seen.insert(slug.as_str()) {
                bail!("theme slug '{slug}' listed more than once");
            }
        }

        let config = Config {
            themes_dir: self
                .themes_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_THEMES_DIR)),
            output: self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            sort_offset: self.sort_offset.unwrap_or(DEFAULT_SORT_OFFSET),
            themes,
        };
        info!(
            "config: resolved themes_dir={}, output={}, sort_offset={}, themes={}",
            config.themes_dir.display(),
            config.output.display(),
            config.sort_offset,
            config.themes.len(),
        );
        Ok(config)
    }
}

/// Load the config file.
///
/// With `path = None`, [`DEFAULT_CONFIG_FILE`] is read if it exists and
/// `ConfigFile::default()` is returned otherwise. An explicit path must
/// exist. A file that exists but cannot be parsed is always an error.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    debug!("config: looking for {}", path.display());
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            info!("config: loaded from {}", path.display());
            let cfg: ConfigFile = toml::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            debug!("config: {} not found, using defaults", path.display());
            Ok(ConfigFile::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}
