use std::{path::PathBuf, str::FromStr, time::Duration};

/// Animation speed setting, always within [`Speed::MIN`]..=[`Speed::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(10);

    /// Clamps `value` into the valid range.
    pub fn new(value: u8) -> Self {
        Speed(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn faster(self) -> Self {
        Speed::new(self.0.saturating_add(1))
    }

    pub fn slower(self) -> Self {
        Speed::new(self.0.saturating_sub(1))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(5)
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of maze rows
    pub rows: u16,
    /// Number of maze columns
    pub cols: u16,
    /// Speed used when a solve is started without an explicit one
    pub speed: Speed,
    /// Pause after each exploration step, in time units, before dividing by speed
    pub explore_delay_units: u32,
    /// Pause after each path reconstruction step, in time units, before dividing by speed
    pub reconstruct_delay_units: u32,
    /// Length of one time unit. Zero disables pacing entirely.
    pub time_unit: Duration,
    /// Maximum number of step events buffered between the solver thread and the consumer
    pub event_buffer: usize,
    /// How long the solver thread waits before retrying a send into a full buffer
    pub send_poll: Duration,
    /// Directory the log file is written to
    pub log_dir: PathBuf,
}

impl Config {
    pub const MIN_DIMENSION: u16 = 2;
    pub const MAX_DIMENSION: u16 = 255;

    /// Defaults overridden by `MAZETRACE_ROWS`, `MAZETRACE_COLS`,
    /// `MAZETRACE_SPEED` and `MAZETRACE_LOG_DIR`.
    /// Values that fail to parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Log directory from `MAZETRACE_LOG_DIR`, falling back to the default.
    /// Read on its own so logging can be installed before the rest of the
    /// configuration is parsed and its rejected values reported.
    pub fn log_dir_from_env() -> PathBuf {
        log_dir_from_lookup(&|key| std::env::var(key).ok())
            .unwrap_or_else(|| Config::default().log_dir)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(rows) = parse_var::<u16>(&lookup, "MAZETRACE_ROWS") {
            config.rows = rows;
        }
        if let Some(cols) = parse_var::<u16>(&lookup, "MAZETRACE_COLS") {
            config.cols = cols;
        }
        if let Some(speed) = parse_var::<u8>(&lookup, "MAZETRACE_SPEED") {
            config.speed = Speed::new(speed);
        }
        if let Some(dir) = log_dir_from_lookup(&lookup) {
            config.log_dir = dir;
        }
        config.clamp_dimensions()
    }

    /// Keeps the maze dimensions within the supported range.
    pub fn clamp_dimensions(mut self) -> Self {
        self.rows = self.rows.clamp(Self::MIN_DIMENSION, Self::MAX_DIMENSION);
        self.cols = self.cols.clamp(Self::MIN_DIMENSION, Self::MAX_DIMENSION);
        self
    }

    /// Settings for runs with nothing watching: no pacing between steps.
    pub fn headless() -> Self {
        Config {
            time_unit: Duration::ZERO,
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            speed: Speed::default(),
            explore_delay_units: 20,
            reconstruct_delay_units: 10,
            time_unit: Duration::from_millis(1),
            event_buffer: 1000,
            send_poll: Duration::from_millis(1),
            log_dir: PathBuf::from("."),
        }
    }
}

fn log_dir_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup("MAZETRACE_LOG_DIR")
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
