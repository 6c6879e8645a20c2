use serde::{Deserialize, Serialize};

use crate::storage::models::location::NamedLocation;

/// 地球半径（米）
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// 传感器产生的设备坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// 精度（米）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
            accuracy: None,
        }
    }
}

// 计算球面距离的函数（基于经纬度）
pub fn calculate_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    // 使用Haversine公式计算距离
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c // 返回距离（米）
}

/// 判断坐标是否落在地点围栏内（边界算在内）
pub fn is_near_location(position: &Coordinate, location: &NamedLocation) -> bool {
    calculate_distance(position, &location.coordinates) <= location.radius
}
