//! Runtime settings loaded from `tiny-steps.toml` and overridden by flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tiny_steps_core::GridSize;
use tiny_steps_world::MAX_PATH_COUNT;

/// File consulted in the working directory when no `--config` is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "tiny-steps.toml";

/// Fully resolved settings used to boot a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) grid_size: u32,
    pub(crate) path_count: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) step_interval: Duration,
    pub(crate) frame_interval: Duration,
}

/// Values supplied on the command line; `None` keeps the file value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) grid_size: Option<u32>,
    pub(crate) path_count: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) step_ms: Option<u64>,
    pub(crate) frame_ms: Option<u64>,
}

// TOML schema

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    session: TomlSession,
    #[serde(default)]
    pacing: TomlPacing,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlSession {
    #[serde(default = "default_grid_size")]
    grid_size: u32,
    #[serde(default = "default_path_count")]
    path_count: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlPacing {
    #[serde(default = "default_step_interval")]
    step_interval_ms: u64,
    #[serde(default = "default_frame_interval")]
    frame_interval_ms: u64,
}

fn default_grid_size() -> u32 {
    6
}
fn default_path_count() -> usize {
    5
}
fn default_step_interval() -> u64 {
    1000
}
fn default_frame_interval() -> u64 {
    33
}

impl Default for TomlSession {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            path_count: default_path_count(),
            seed: None,
        }
    }
}

impl Default for TomlPacing {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

impl Settings {
    /// Resolves settings from an optional file and command-line overrides.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read when present and defaults are used otherwise.
    pub(crate) fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = match path {
            Some(path) => Some(read_file(path)?),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Some(read_file(&fallback)?)
                } else {
                    None
                }
            }
        };
        let toml = match file {
            Some(contents) => parse(&contents)?,
            None => TomlConfig::default(),
        };
        let settings = Self::resolve(toml, overrides);
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_size <= GridSize::MAX,
            "grid size must be at most {} (received {})",
            GridSize::MAX,
            self.grid_size
        );
        ensure!(
            self.path_count <= MAX_PATH_COUNT,
            "path count must be at most {MAX_PATH_COUNT} (received {})",
            self.path_count
        );
        ensure!(
            !self.frame_interval.is_zero(),
            "frame interval must be at least 1 ms"
        );
        Ok(())
    }

    fn resolve(toml: TomlConfig, overrides: &Overrides) -> Self {
        Self {
            grid_size: overrides.grid_size.unwrap_or(toml.session.grid_size),
            path_count: overrides.path_count.unwrap_or(toml.session.path_count),
            seed: overrides.seed.or(toml.session.seed),
            step_interval: Duration::from_millis(
                overrides.step_ms.unwrap_or(toml.pacing.step_interval_ms),
            ),
            frame_interval: Duration::from_millis(
                overrides.frame_ms.unwrap_or(toml.pacing.frame_interval_ms),
            ),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))
}

fn parse(contents: &str) -> Result<TomlConfig> {
    toml::from_str(contents).context("invalid config file")
}
