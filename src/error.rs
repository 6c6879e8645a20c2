use thiserror::Error;

/// 定位采样错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("geolocation is not supported in this environment")]
    Unsupported,
    #[error("permission to read device position was denied")]
    PermissionDenied,
    #[error("device position is unavailable")]
    Unavailable,
    #[error("timed out while acquiring device position")]
    Timeout,
}

impl PositionError {
    /// 传感器错误码（1=权限拒绝，2=位置不可用，3=超时）
    pub fn code(&self) -> i32 {
        match self {
            PositionError::PermissionDenied => 1,
            // 能力缺失按位置不可用上报
            PositionError::Unsupported | PositionError::Unavailable => 2,
            PositionError::Timeout => 3,
        }
    }
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 监控会话错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("failed to subscribe to position source: {0}")]
    Subscribe(#[from] PositionError),
}
