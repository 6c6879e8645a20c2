use std::path::{Path, PathBuf};
use std::sync::RwLock;

use uuid::Uuid;

use crate::config::DEFAULT_RADIUS_METERS;
use crate::error::StorageError;
use crate::storage::models::location::NamedLocation;
use crate::storage::operations::load_entries;

const LOCATIONS_FILE: &str = "locations.json";

/// 命名地点存储（JSON文件持久化）
pub struct LocationStore {
    path: PathBuf,
    locations: RwLock<Vec<NamedLocation>>,
}

impl LocationStore {
    /// 打开存储并载入现有地点
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(LOCATIONS_FILE);
        let locations = load_entries(&path, "location");

        Ok(LocationStore {
            path,
            locations: RwLock::new(locations),
        })
    }

    /// 保存地点（按id覆盖）；id为空时自动生成，半径非法时回落到默认值
    pub fn save(&self, mut location: NamedLocation) -> Result<NamedLocation, StorageError> {
        if location.id.is_empty() {
            location.id = Uuid::new_v4().to_string();
        }
        if location.radius <= 0.0 {
            location.radius = DEFAULT_RADIUS_METERS;
        }

        let mut locations = self.locations.write().unwrap();
        locations.retain(|loc| loc.id != location.id);
        locations.push(location.clone());
        self.persist(&locations)?;

        tracing::debug!("Saved location {} ({})", location.id, location.name);
        Ok(location)
    }

    /// 当前全部地点
    pub fn all(&self) -> Vec<NamedLocation> {
        self.locations.read().unwrap().clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<NamedLocation> {
        self.locations
            .read()
            .unwrap()
            .iter()
            .find(|loc| loc.id == id)
            .cloned()
    }

    /// 删除地点，返回是否确实存在
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut locations = self.locations.write().unwrap();
        let before = locations.len();
        locations.retain(|loc| loc.id != id);
        let removed = locations.len() != before;
        if removed {
            self.persist(&locations)?;
            tracing::debug!("Deleted location {}", id);
        }
        Ok(removed)
    }

    fn persist(&self, locations: &[NamedLocation]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(locations)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn sample(name: &str) -> NamedLocation {
        NamedLocation {
            id: String::new(),
            name: name.to_string(),
            coordinates: Coordinate::new(31.2304, 121.4737),
            radius: 200.0,
        }
    }

    #[test]
    fn save_mints_id_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        let saved = store.save(sample("Office")).unwrap();
        assert!(!saved.id.is_empty());

        // 重新打开后数据仍在
        let reopened = LocationStore::open(dir.path()).unwrap();
        assert_eq!(reopened.all(), vec![saved]);
    }

    #[test]
    fn save_with_existing_id_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        let saved = store.save(sample("Office")).unwrap();
        let renamed = NamedLocation {
            name: "Home".to_string(),
            ..saved.clone()
        };
        store.save(renamed).unwrap();

        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Home");
    }

    #[test]
    fn invalid_radius_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        let saved = store
            .save(NamedLocation {
                radius: 0.0,
                ..sample("Gym")
            })
            .unwrap();
        assert_eq!(saved.radius, DEFAULT_RADIUS_METERS);
    }

    #[test]
    fn delete_removes_only_matching_location() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        let office = store.save(sample("Office")).unwrap();
        let home = store.save(sample("Home")).unwrap();

        assert!(store.delete(&office.id).unwrap());
        assert!(!store.delete(&office.id).unwrap());
        assert_eq!(store.all(), vec![home]);
    }

    #[test]
    fn malformed_entries_are_dropped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOCATIONS_FILE);
        std::fs::write(
            &path,
            r#"[
                {"id":"a","name":"Office","coordinates":{"latitude":1.0,"longitude":2.0},"radius":100.0},
                {"id":"b","name":"Broken"}
            ]"#,
        )
        .unwrap();

        let store = LocationStore::open(dir.path()).unwrap();
        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "a");
    }
}
