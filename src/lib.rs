use std::sync::Arc;

use config::Config;
use storage::operations::location::LocationStore;
use storage::operations::task::TaskStore;

pub mod config;
pub mod error;
pub mod geo;
pub mod monitor;
pub mod notify;
pub mod position;
pub mod storage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub locations: Arc<LocationStore>,
    pub tasks: Arc<TaskStore>,
}
