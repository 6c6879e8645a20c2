use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::position::WatchOptions;

/// 默认地理围栏半径（米）
pub const DEFAULT_RADIUS_METERS: f64 = 100.0;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub default_radius: f64,
    pub position_timeout_secs: u64,
    pub position_max_age_secs: u64,
    pub high_accuracy: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            data_dir: env::var("TASKGEO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            default_radius: env::var("TASKGEO_DEFAULT_RADIUS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RADIUS_METERS),
            position_timeout_secs: env::var("TASKGEO_POSITION_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            position_max_age_secs: env::var("TASKGEO_POSITION_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            high_accuracy: env::var("TASKGEO_HIGH_ACCURACY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    pub fn position_timeout(&self) -> Duration {
        Duration::from_secs(self.position_timeout_secs)
    }

    pub fn position_max_age(&self) -> Duration {
        Duration::from_secs(self.position_max_age_secs)
    }

    /// 采样策略（高精度优先，10秒超时，允许复用60秒内的历史采样）
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            high_accuracy: self.high_accuracy,
            timeout: self.position_timeout(),
            maximum_age: self.position_max_age(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            default_radius: DEFAULT_RADIUS_METERS,
            position_timeout_secs: 10,
            position_max_age_secs: 60,
            high_accuracy: true,
        }
    }
}
