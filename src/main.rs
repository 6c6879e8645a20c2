use std::sync::Arc;

use taskgeo::{
    AppState,
    config::Config,
    error::PositionError,
    geo::Coordinate,
    monitor::GeofenceMonitor,
    notify::sinks::TracingSink,
    position::channel::{ChannelPositionSource, SampleFeed},
    storage::operations::{location::LocationStore, task::TaskStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();

    // 打开本地存储
    let locations =
        Arc::new(LocationStore::open(&config.data_dir).expect("Failed to open location store"));
    let tasks = Arc::new(TaskStore::open(&config.data_dir).expect("Failed to open task store"));
    tracing::info!(
        "Loaded {} locations and {} tasks from {:?}",
        locations.all().len(),
        tasks.all().len(),
        config.data_dir
    );

    let state = AppState {
        config,
        locations: locations.clone(),
        tasks: tasks.clone(),
    };

    // 位置来源：标准输入逐行喂入JSON采样
    let source = ChannelPositionSource::new();
    spawn_stdin_feed(source.feed());

    // 启动地理围栏监控
    let mut monitor = GeofenceMonitor::new(source, TracingSink, state.config.watch_options());
    let supplier_locations = locations.clone();
    let supplier_tasks = tasks.clone();
    monitor
        .start(
            Arc::new(move || supplier_locations.all()),
            Arc::new(move || supplier_tasks.all()),
        )
        .await
        .expect("Failed to start geofence monitoring");
    tracing::info!("Feeding position samples from stdin, press ctrl-c to exit");

    // 等待退出信号
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");
    monitor.stop();
}

/// 在阻塞线程里读取标准输入，每行一个JSON采样
/// （形如 {"latitude":31.23,"longitude":121.47,"accuracy":15.0}）
fn spawn_stdin_feed(feed: SampleFeed) {
    tokio::task::spawn_blocking(move || {
        for line in std::io::stdin().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Coordinate>(&line) {
                Ok(position) => feed.push(position),
                Err(e) => {
                    // 无法解析的行按一次采样失败处理
                    tracing::warn!("Invalid position sample {:?}: {}", line, e);
                    feed.push_error(PositionError::Unavailable);
                }
            }
        }
    });
}
