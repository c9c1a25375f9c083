//! Game settings loaded from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use snake_arcade_core::{Cell, TickSchedule};
use snake_arcade_system_bootstrap::Layout;

/// Complete settings for one run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) board: BoardConfig,
    pub(crate) snake: SnakeConfig,
    pub(crate) schedule: ScheduleConfig,
    pub(crate) relaxed: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) sprite_manifest: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            snake: SnakeConfig::default(),
            schedule: ScheduleConfig::default(),
            relaxed: false,
            seed: None,
            sprite_manifest: PathBuf::from("assets/manifest.toml"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 20,
            width: 750.0,
            height: 750.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SnakeConfig {
    pub(crate) head: Option<Cell>,
    pub(crate) tail: Option<Cell>,
}

/// Tick cadence in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ScheduleConfig {
    pub(crate) base_delay_ms: u64,
    pub(crate) min_delay_ms: u64,
    pub(crate) decay_per_point_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 200,
            min_delay_ms: 50,
            decay_per_point_ms: 5,
        }
    }
}

impl GameConfig {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout {
            columns: self.board.columns,
            rows: self.board.rows,
            width: self.board.width,
            height: self.board.height,
            head: self.snake.head,
            tail: self.snake.tail,
            relaxed: self.relaxed,
        }
    }

    pub(crate) fn schedule(&self) -> TickSchedule {
        TickSchedule::new(
            Duration::from_millis(self.schedule.base_delay_ms),
            Duration::from_millis(self.schedule.min_delay_ms),
            Duration::from_millis(self.schedule.decay_per_point_ms),
        )
    }
}
