use crate::notify::{Notification, NotificationSink, PermissionStatus};

/// 以日志形式输出通知的出口（守护进程默认）
pub struct TracingSink;

impl NotificationSink for TracingSink {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn notify(&self, notification: Notification) {
        tracing::info!(
            "[{}] {}: {} (task={}, location={})",
            notification.tag,
            notification.title,
            notification.body,
            notification.meta.task_id,
            notification.meta.location_id
        );
    }
}

/// 宿主环境没有通知能力时的空出口
pub struct UnsupportedSink;

impl NotificationSink for UnsupportedSink {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Unsupported
    }

    fn notify(&self, notification: Notification) {
        // 能力缺失，静默丢弃
        tracing::debug!("Notification dropped ({}): unsupported environment", notification.tag);
    }
}
