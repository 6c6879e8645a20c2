use std::collections::HashMap;

use crate::geo::{self, Coordinate};
use crate::notify::{Notification, NotificationMeta, NotificationSink};
use crate::storage::models::location::NamedLocation;
use crate::storage::models::task::Task;

/// 各地点的"当前在围栏内"状态，只存在于一次监控会话内，仅用于边沿检测
pub type ProximityState = HashMap<String, bool>;

/// 处理一次位置采样：逐地点做边沿检测，派发到达/离开通知
pub(crate) fn check_location_reminders<N: NotificationSink>(
    position: &Coordinate,
    locations: &[NamedLocation],
    tasks: &[Task],
    state: &mut ProximityState,
    sink: &N,
) {
    // 参与位置提醒的任务：未完成且提醒开启
    let candidates: Vec<&Task> = tasks.iter().filter(|t| t.has_active_reminder()).collect();

    for location in locations {
        let is_near = geo::is_near_location(position, location);

        // 首次观测取当前状态的反值作为先前状态，
        // 这样启动时已经在围栏内（或外）也能触发一次边沿
        let was_near = state.get(&location.id).copied().unwrap_or(!is_near);
        state.insert(location.id.clone(), is_near);

        let relevant: Vec<&Task> = candidates
            .iter()
            .copied()
            .filter(|t| {
                t.location_reminder
                    .as_ref()
                    .is_some_and(|r| r.location_id == location.id)
            })
            .collect();

        if relevant.is_empty() {
            continue;
        }

        // 到达边沿
        if is_near && !was_near {
            for task in &relevant {
                if task
                    .location_reminder
                    .as_ref()
                    .is_some_and(|r| r.notify_on_arrival)
                {
                    sink.notify(arrival_notification(task, location));
                }
            }
        }

        // 离开边沿
        if !is_near && was_near {
            for task in &relevant {
                if task
                    .location_reminder
                    .as_ref()
                    .is_some_and(|r| r.notify_on_departure)
                {
                    sink.notify(departure_notification(task, location));
                }
            }
        }
    }
}

fn reminder_body(task: &Task) -> String {
    task.location_reminder
        .as_ref()
        .and_then(|r| r.message.clone())
        .unwrap_or_else(|| format!("Reminder: {}", task.title))
}

fn arrival_notification(task: &Task, location: &NamedLocation) -> Notification {
    Notification {
        title: format!("Arrived at {}", location.name),
        body: reminder_body(task),
        tag: format!("location-arrival-{}", task.id),
        meta: NotificationMeta {
            task_id: task.id.clone(),
            location_id: location.id.clone(),
        },
    }
}

fn departure_notification(task: &Task, location: &NamedLocation) -> Notification {
    Notification {
        title: format!("Left {}", location.name),
        body: reminder_body(task),
        tag: format!("location-departure-{}", task.id),
        meta: NotificationMeta {
            task_id: task.id.clone(),
            location_id: location.id.clone(),
        },
    }
}
