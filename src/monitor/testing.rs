use tokio::sync::mpsc;

use crate::notify::{Notification, NotificationSink, PermissionStatus};

/// 测试用通知出口：把通知转发到通道供断言
pub(crate) struct RecordingSink {
    permission: PermissionStatus,
    tx: mpsc::UnboundedSender<Notification>,
}

impl RecordingSink {
    pub(crate) fn new(
        permission: PermissionStatus,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RecordingSink { permission, tx }, rx)
    }
}

impl NotificationSink for RecordingSink {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}
