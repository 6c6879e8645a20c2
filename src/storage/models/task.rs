use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 任务优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// 任务分类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskTag {
    Work,
    Personal,
    Studies,
    Hobbies,
    Misc,
}

impl TaskTag {
    pub const ALL: [TaskTag; 5] = [
        TaskTag::Work,
        TaskTag::Personal,
        TaskTag::Studies,
        TaskTag::Hobbies,
        TaskTag::Misc,
    ];
}

/// 任务关联的位置提醒配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReminder {
    /// 关联的命名地点id
    pub location_id: String,
    /// 关闭后该任务不参与任何监控和通知
    pub enabled: bool,
    pub notify_on_arrival: bool,
    pub notify_on_departure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub tag: TaskTag,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_reminder: Option<LocationReminder>,
}

impl Task {
    /// 是否参与位置提醒（未完成且提醒开启）
    pub fn has_active_reminder(&self) -> bool {
        !self.completed && self.location_reminder.as_ref().is_some_and(|r| r.enabled)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }
}

/// 新建任务请求
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub tag: TaskTag,
    pub location_reminder: Option<LocationReminder>,
}

/// 任务总体统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub total: usize,
    /// 完成率（百分比，0-100）
    pub completion_rate: f64,
}

/// 单个标签的本周统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagWeeklyStats {
    pub completed: usize,
    pub created: usize,
}
