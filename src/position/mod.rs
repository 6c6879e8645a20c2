use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::PositionError;
use crate::geo::Coordinate;

pub mod channel;

/// 位置采样策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// 高精度优先
    pub high_accuracy: bool,
    /// 单次采样超时
    pub timeout: Duration,
    /// 允许复用的历史采样最大年龄
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        WatchOptions {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// 单次采样结果
pub type PositionUpdate = Result<Coordinate, PositionError>;

/// 位置订阅流（推送式，单消费者）；丢弃即退订
pub struct PositionStream {
    receiver: mpsc::Receiver<PositionUpdate>,
}

impl PositionStream {
    pub(crate) fn new(receiver: mpsc::Receiver<PositionUpdate>) -> Self {
        PositionStream { receiver }
    }

    /// 等待下一个采样；来源关闭后返回None
    pub async fn next_sample(&mut self) -> Option<PositionUpdate> {
        self.receiver.recv().await
    }
}

/// 位置来源契约
pub trait PositionSource: Send + Sync {
    /// 注册持续采样订阅；定位能力缺失时返回错误
    fn subscribe(&self, options: &WatchOptions) -> Result<PositionStream, PositionError>;
}

/// 始终缺失定位能力的来源
pub struct UnsupportedPositionSource;

impl PositionSource for UnsupportedPositionSource {
    fn subscribe(&self, _options: &WatchOptions) -> Result<PositionStream, PositionError> {
        Err(PositionError::Unsupported)
    }
}
