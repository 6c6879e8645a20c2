use std::future::Future;

use serde::Serialize;

pub mod sinks;

/// 通知权限状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// 宿主环境没有通知能力
    Unsupported,
}

impl PermissionStatus {
    pub fn allows_dispatch(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// 通知携带的业务标识
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMeta {
    pub task_id: String,
    pub location_id: String,
}

/// 一条待派发的通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// 去重标签，宿主通知系统据此合并重复展示
    pub tag: String,
    pub meta: NotificationMeta,
}

/// 通知出口契约
///
/// notify永不失败：权限不足或派发出错时在内部记录日志并吞掉，
/// 绝不把错误传回监控循环。
pub trait NotificationSink: Send + Sync {
    /// 申请通知权限；能力缺失时返回Unsupported
    fn request_permission(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// 派发一条通知
    fn notify(&self, notification: Notification);
}
