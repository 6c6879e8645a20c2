use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// 用户保存的命名地点，同时是地理围栏的圆心
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinate,
    /// 围栏半径（米）
    pub radius: f64,
}
