use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::PositionError;
use crate::geo::Coordinate;
use crate::position::{PositionSource, PositionStream, PositionUpdate, WatchOptions};

// 订阅通道容量；消费端逐个处理采样，正常情况下不会积压
const CHANNEL_CAPACITY: usize = 32;

/// 进程内位置来源，采样由SampleFeed推入
pub struct ChannelPositionSource {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<PositionUpdate>>>>,
}

impl ChannelPositionSource {
    pub fn new() -> Self {
        ChannelPositionSource {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 采样推送句柄（可克隆，可跨线程）
    pub fn feed(&self) -> SampleFeed {
        SampleFeed {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl Default for ChannelPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for ChannelPositionSource {
    fn subscribe(&self, _options: &WatchOptions) -> Result<PositionStream, PositionError> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        self.subscribers.lock().unwrap().push(tx);
        Ok(PositionStream::new(rx))
    }
}

/// 位置采样推送句柄
#[derive(Clone)]
pub struct SampleFeed {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<PositionUpdate>>>>,
}

impl SampleFeed {
    /// 推送一个采样
    pub fn push(&self, position: Coordinate) {
        self.send(Ok(position));
    }

    /// 推送一次采样失败
    pub fn push_error(&self, error: PositionError) {
        self.send(Err(error));
    }

    fn send(&self, update: PositionUpdate) {
        let mut subscribers = self.subscribers.lock().unwrap();
        // 退订（接收端已丢弃）的订阅者顺带清理
        subscribers.retain(|tx| match tx.try_send(update.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Position subscriber lagging, dropping sample");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}
