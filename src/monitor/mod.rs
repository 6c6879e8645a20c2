use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::{MonitorError, PositionError};
use crate::notify::NotificationSink;
use crate::position::{PositionSource, WatchOptions};
use crate::storage::models::location::NamedLocation;
use crate::storage::models::task::Task;

mod reminders;
#[cfg(test)]
mod testing;

pub use reminders::ProximityState;

/// 地点供应函数；每次采样时重新读取，增删地点无需重启监控
pub type LocationSupplier = Arc<dyn Fn() -> Vec<NamedLocation> + Send + Sync>;
/// 任务供应函数；每次采样时重新读取，编辑任务立即生效
pub type TaskSupplier = Arc<dyn Fn() -> Vec<Task> + Send + Sync>;
/// 采样失败回调
pub type PositionErrorHandler = Arc<dyn Fn(&PositionError) + Send + Sync>;

/// 地理围栏监控器
///
/// 同一时刻至多持有一个监控会话；会话自己拥有ProximityState和订阅句柄，
/// 多个监控器实例互不干扰。
pub struct GeofenceMonitor<S, N> {
    source: S,
    sink: Arc<N>,
    options: WatchOptions,
    error_handler: Option<PositionErrorHandler>,
    session: Option<MonitorSession>,
}

/// 一次监控会话的订阅句柄；丢弃即让采样循环退出
struct MonitorSession {
    stop_tx: oneshot::Sender<()>,
}

impl<S, N> GeofenceMonitor<S, N>
where
    S: PositionSource,
    N: NotificationSink + 'static,
{
    pub fn new(source: S, sink: N, options: WatchOptions) -> Self {
        GeofenceMonitor {
            source,
            sink: Arc::new(sink),
            options,
            error_handler: None,
            session: None,
        }
    }

    /// 设置采样失败回调（默认只记录日志）
    pub fn set_error_handler(&mut self, handler: PositionErrorHandler) {
        self.error_handler = Some(handler);
    }

    /// 启动监控；已在监控中时先停掉旧会话，不允许重复订阅。
    /// 定位能力缺失时返回错误，调用方据此关闭相关功能。
    pub async fn start(
        &mut self,
        locations: LocationSupplier,
        tasks: TaskSupplier,
    ) -> Result<(), MonitorError> {
        self.stop();

        // 权限检查先于任何派发；被拒绝或不支持时会话照常运行，
        // 通知由出口自行降级为空操作
        let permission = self.sink.request_permission().await;
        if !permission.allows_dispatch() {
            tracing::warn!("Notification permission not granted: {:?}", permission);
        }

        let mut stream = self.source.subscribe(&self.options)?;

        let sink = self.sink.clone();
        let error_handler = self.error_handler.clone();
        let (stop_tx, mut stop_rx) = oneshot::channel();

        tokio::spawn(async move {
            // 会话独占的围栏状态；会话结束即丢弃
            let mut state = ProximityState::new();
            loop {
                tokio::select! {
                    // 停止信号优先，停止后不再处理任何采样
                    biased;
                    _ = &mut stop_rx => break,
                    sample = stream.next_sample() => match sample {
                        None => {
                            tracing::debug!("Position stream closed, monitoring loop exiting");
                            break;
                        }
                        Some(Err(e)) => {
                            // 单次采样失败不致命，等待下一个采样
                            tracing::warn!("Position sample error (code {}): {}", e.code(), e);
                            if let Some(handler) = &error_handler {
                                handler(&e);
                            }
                        }
                        Some(Ok(position)) => {
                            reminders::check_location_reminders(
                                &position,
                                &locations(),
                                &tasks(),
                                &mut state,
                                sink.as_ref(),
                            );
                        }
                    }
                }
            }
        });

        self.session = Some(MonitorSession { stop_tx });
        tracing::info!("Geofence monitoring started");
        Ok(())
    }

    /// 停止监控并清除会话句柄；采样循环协作式退出
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            // 发送失败说明循环已经自行退出
            let _ = session.stop_tx.send(());
            tracing::info!("Geofence monitoring stopped");
        }
    }

    /// 是否持有监控会话
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}
