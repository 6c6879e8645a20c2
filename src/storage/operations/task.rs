use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::models::task::{NewTask, TagWeeklyStats, Task, TaskStats, TaskTag};
use crate::storage::operations::load_entries;

const TASKS_FILE: &str = "tasks.json";

/// 任务存储（JSON文件持久化）
pub struct TaskStore {
    path: PathBuf,
    tasks: RwLock<Vec<Task>>,
}

impl TaskStore {
    /// 打开存储并载入现有任务
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(TASKS_FILE);
        let tasks = load_entries(&path, "task");

        Ok(TaskStore {
            path,
            tasks: RwLock::new(tasks),
        })
    }

    /// 新建任务
    pub fn add(&self, req: NewTask) -> Result<Task, StorageError> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
            tag: req.tag,
            completed: false,
            created_at: Utc::now(),
            location_reminder: req.location_reminder,
        };

        let mut tasks = self.tasks.write().unwrap();
        tasks.push(task.clone());
        self.persist(&tasks)?;

        tracing::debug!("Added task {} ({})", task.id, task.title);
        Ok(task)
    }

    /// 整体替换同id任务，返回替换后的任务；不存在时返回None
    pub fn update(&self, task: Task) -> Result<Option<Task>, StorageError> {
        let mut tasks = self.tasks.write().unwrap();
        let Some(slot) = tasks.iter_mut().find(|t| t.id == task.id) else {
            return Ok(None);
        };
        *slot = task.clone();
        self.persist(&tasks)?;
        Ok(Some(task))
    }

    /// 删除任务，返回是否确实存在
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut tasks = self.tasks.write().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() != before;
        if removed {
            self.persist(&tasks)?;
            tracing::debug!("Deleted task {}", id);
        }
        Ok(removed)
    }

    /// 切换完成状态
    pub fn toggle_complete(&self, id: &str) -> Result<Option<Task>, StorageError> {
        let mut tasks = self.tasks.write().unwrap();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.completed = !task.completed;
        let updated = task.clone();
        self.persist(&tasks)?;
        Ok(Some(updated))
    }

    /// 当前全部任务
    pub fn all(&self) -> Vec<Task> {
        self.tasks.read().unwrap().clone()
    }

    /// 未完成任务
    pub fn open_tasks(&self) -> Vec<Task> {
        self.tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| !t.completed)
            .cloned()
            .collect()
    }

    /// 指定日期到期的任务
    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<Task> {
        self.tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.due_date.date_naive() == date)
            .cloned()
            .collect()
    }

    /// 按标签过滤；None表示全部
    pub fn tasks_by_tag(&self, tag: Option<TaskTag>) -> Vec<Task> {
        let tasks = self.tasks.read().unwrap();
        match tag {
            None => tasks.clone(),
            Some(tag) => tasks.iter().filter(|t| t.tag == tag).cloned().collect(),
        }
    }

    /// 本周（周日起）内到期且已完成的任务
    pub fn completed_this_week(&self, now: DateTime<Utc>) -> Vec<Task> {
        let (start, end) = week_bounds(now);
        self.tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.completed && t.due_date >= start && t.due_date < end)
            .cloned()
            .collect()
    }

    /// 本周内创建的任务
    pub fn created_this_week(&self, now: DateTime<Utc>) -> Vec<Task> {
        let (start, end) = week_bounds(now);
        self.tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.created_at >= start && t.created_at < end)
            .cloned()
            .collect()
    }

    /// 各标签的本周完成/新建计数
    pub fn stats_by_tag(&self, now: DateTime<Utc>) -> HashMap<TaskTag, TagWeeklyStats> {
        let completed = self.completed_this_week(now);
        let created = self.created_this_week(now);

        let mut stats: HashMap<TaskTag, TagWeeklyStats> = TaskTag::ALL
            .iter()
            .map(|tag| (*tag, TagWeeklyStats::default()))
            .collect();

        for task in &completed {
            stats.entry(task.tag).or_default().completed += 1;
        }
        for task in &created {
            stats.entry(task.tag).or_default().created += 1;
        }
        stats
    }

    /// 总体统计
    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        let tasks = self.tasks.read().unwrap();
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };

        TaskStats {
            completed,
            pending: total - completed,
            overdue,
            total,
            completion_rate,
        }
    }

    fn persist(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(tasks)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// 本周窗口：周日零点起，七天（右开区间）
fn week_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let days_from_sunday = now.date_naive().weekday().num_days_from_sunday() as i64;
    let start = (now.date_naive() - Duration::days(days_from_sunday))
        .and_hms_opt(0, 0, 0)
        .expect("valid timestamp")
        .and_utc();
    (start, start + Duration::days(7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::task::{LocationReminder, TaskPriority};

    fn new_task(title: &str, tag: TaskTag, due: DateTime<Utc>) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            due_date: due,
            priority: TaskPriority::Medium,
            tag,
            location_reminder: None,
        }
    }

    #[test]
    fn add_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path()).unwrap();

        let task = store
            .add(NewTask {
                location_reminder: Some(LocationReminder {
                    location_id: "loc-1".to_string(),
                    enabled: true,
                    notify_on_arrival: true,
                    notify_on_departure: false,
                    message: Some("买牛奶".to_string()),
                }),
                ..new_task("Groceries", TaskTag::Personal, Utc::now())
            })
            .unwrap();
        assert!(!task.completed);

        let reopened = TaskStore::open(dir.path()).unwrap();
        assert_eq!(reopened.all(), vec![task]);
    }

    #[test]
    fn toggle_complete_flips_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path()).unwrap();

        let task = store
            .add(new_task("Call bank", TaskTag::Misc, Utc::now()))
            .unwrap();

        let toggled = store.toggle_complete(&task.id).unwrap().unwrap();
        assert!(toggled.completed);
        let toggled = store.toggle_complete(&task.id).unwrap().unwrap();
        assert!(!toggled.completed);

        assert!(store.toggle_complete("missing").unwrap().is_none());
    }

    #[test]
    fn update_replaces_matching_task() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path()).unwrap();

        let mut task = store
            .add(new_task("Draft report", TaskTag::Work, Utc::now()))
            .unwrap();
        task.title = "Draft quarterly report".to_string();

        let updated = store.update(task.clone()).unwrap().unwrap();
        assert_eq!(updated.title, "Draft quarterly report");
        assert_eq!(store.all(), vec![task]);
    }

    #[test]
    fn delete_removes_task() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path()).unwrap();

        let task = store
            .add(new_task("Practice guitar", TaskTag::Hobbies, Utc::now()))
            .unwrap();
        assert!(store.delete(&task.id).unwrap());
        assert!(!store.delete(&task.id).unwrap());
        assert!(store.all().is_empty());
    }

    #[test]
    fn malformed_entries_are_dropped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        std::fs::write(
            &path,
            r#"[
                {"id":"t1","title":"Valid","description":"","due_date":"2026-08-10T00:00:00Z","priority":"high","tag":"Work","completed":false,"created_at":"2026-08-01T00:00:00Z"},
                {"id":"t2","title":"No due date"}
            ]"#,
        )
        .unwrap();

        let store = TaskStore::open(dir.path()).unwrap();
        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "t1");
    }

    #[test]
    fn stats_counts_overdue_and_completion_rate() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path()).unwrap();
        let now = Utc::now();

        let done = store
            .add(new_task("Done", TaskTag::Work, now - Duration::days(1)))
            .unwrap();
        store.toggle_complete(&done.id).unwrap();
        store
            .add(new_task("Overdue", TaskTag::Work, now - Duration::days(2)))
            .unwrap();
        store
            .add(new_task("Upcoming", TaskTag::Personal, now + Duration::days(2)))
            .unwrap();

        let stats = store.stats(now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.overdue, 1);
        assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_stats_group_by_tag() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path()).unwrap();
        let now = Utc::now();

        let work = store.add(new_task("Work due", TaskTag::Work, now)).unwrap();
        store.toggle_complete(&work.id).unwrap();
        store
            .add(new_task("Next month", TaskTag::Studies, now + Duration::days(40)))
            .unwrap();

        let stats = store.stats_by_tag(now);
        assert_eq!(stats[&TaskTag::Work].completed, 1);
        // 创建时间都在本周
        assert_eq!(stats[&TaskTag::Work].created, 1);
        assert_eq!(stats[&TaskTag::Studies].created, 1);
        assert_eq!(stats[&TaskTag::Studies].completed, 0);
        assert_eq!(stats[&TaskTag::Misc].created, 0);
    }

    #[test]
    fn week_bounds_start_on_sunday() {
        let now = "2026-08-05T15:30:00Z".parse::<DateTime<Utc>>().unwrap(); // 周三
        let (start, end) = week_bounds(now);
        assert_eq!(start, "2026-08-02T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2026-08-09T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }
}
