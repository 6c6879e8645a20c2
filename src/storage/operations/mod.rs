use std::path::Path;

use serde::de::DeserializeOwned;

pub mod location;
pub mod task;

/// 读取JSON数组文件；损坏的条目丢弃并记录日志，不影响其余数据
pub(crate) fn load_entries<T: DeserializeOwned>(path: &Path, kind: &str) -> Vec<T> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::error!("Failed to read {} store {:?}: {}", kind, path, e);
            return Vec::new();
        }
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::error!("Failed to parse {} store {:?}: {}", kind, path, e);
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<T>(value) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Dropping malformed {} entry: {}", kind, e),
        }
    }
    entries
}
