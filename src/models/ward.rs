use std::collections::BTreeSet;
use tracing::debug;

use crate::models::common::Position2D;

/// 視界半径のデフォルト値（不明なワード種別）
pub const DEFAULT_COVERAGE_RADIUS: f64 = 900.0;

/// ワード種別
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WardType {
    StealthWard,
    ControlWard,
    BlueTrinket,
    ZombieWard,
    YellowTrinket,
    /// 認識できない種別名
    Other(String),
}

impl WardType {
    /// カバレッジ解析で設置として扱う種別
    pub const TRACKED: [WardType; 3] = [WardType::StealthWard, WardType::ControlWard, WardType::BlueTrinket];

    pub fn parse(name: &str) -> Self {
        match name {
            "STEALTH_WARD" => WardType::StealthWard,
            "CONTROL_WARD" => WardType::ControlWard,
            "BLUE_TRINKET" => WardType::BlueTrinket,
            "ZOMBIE_WARD" => WardType::ZombieWard,
            "YELLOW_TRINKET" => WardType::YellowTrinket,
            other => WardType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WardType::StealthWard => "STEALTH_WARD",
            WardType::ControlWard => "CONTROL_WARD",
            WardType::BlueTrinket => "BLUE_TRINKET",
            WardType::ZombieWard => "ZOMBIE_WARD",
            WardType::YellowTrinket => "YELLOW_TRINKET",
            WardType::Other(name) => name,
        }
    }

    /// カバレッジ解析の設置対象かどうか
    pub fn is_tracked(&self) -> bool {
        Self::TRACKED.contains(self)
    }

    /// 視界半径
    pub fn coverage_radius(&self) -> f64 {
        match self {
            WardType::StealthWard | WardType::ControlWard | WardType::ZombieWard => 900.0,
            WardType::BlueTrinket => 500.0,
            _ => DEFAULT_COVERAGE_RADIUS,
        }
    }

    /// 持続時間（秒）。`None` は時間経過で消滅しないことを表す
    pub fn duration(&self) -> Option<f64> {
        match self {
            WardType::StealthWard => Some(150.0),
            WardType::ControlWard => None,
            WardType::BlueTrinket => Some(60.0),
            WardType::ZombieWard => Some(120.0),
            _ => Some(0.0),
        }
    }
}

/// 設置済みワード
///
/// 1回の解析呼び出しの中でのみ生存し、`expiry_time` 到達でのみ除去されます。
#[derive(Debug, Clone, PartialEq)]
pub struct Ward {
    pub ward_type: WardType,
    pub position: Position2D,
    /// 所属領域（分類方式により0個以上）
    pub regions: Vec<&'static str>,
    pub coverage_radius: f64,
    pub placement_time: f64,
    /// `None` は無期限
    pub expiry_time: Option<f64>,
}

impl Ward {
    pub fn new(ward_type: WardType, position: Position2D, regions: Vec<&'static str>, placement_time: f64) -> Self {
        let expiry_time = ward_type.duration().map(|d| placement_time + d);
        Self {
            coverage_radius: ward_type.coverage_radius(),
            ward_type,
            position,
            regions,
            placement_time,
            expiry_time,
        }
    }

    /// 指定時刻に期限切れかどうか（期限が有限かつ時刻以下）
    pub fn is_expired_at(&self, timestamp: f64) -> bool {
        matches!(self.expiry_time, Some(expiry) if expiry <= timestamp)
    }

    /// 有限の寿命（秒）
    pub fn lifespan(&self) -> Option<f64> {
        self.expiry_time.map(|expiry| expiry - self.placement_time)
    }
}

/// 現在有効なワードの集合
#[derive(Debug, Default)]
pub struct ActiveWards {
    wards: Vec<Ward>,
}

impl ActiveWards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, ward: Ward) {
        debug!(
            "ワード設置: {} ({:.0}, {:.0}) 半径 {:.0} 領域 {:?} 期限 {:?}",
            ward.ward_type.as_str(),
            ward.position.x,
            ward.position.y,
            ward.coverage_radius,
            ward.regions,
            ward.expiry_time
        );
        self.wards.push(ward);
    }

    /// 指定時刻で期限切れのワードを除去し、除去した数を返す
    pub fn expire(&mut self, timestamp: f64) -> usize {
        let before = self.wards.len();
        self.wards.retain(|w| !w.is_expired_at(timestamp));
        let removed = before - self.wards.len();
        if removed > 0 {
            debug!("ワード期限切れ: {}個 (時刻 {:.1}秒)", removed, timestamp);
        }
        removed
    }

    /// 現在カバーされている領域名の集合
    pub fn covered_regions(&self) -> BTreeSet<&'static str> {
        self.wards.iter().flat_map(|w| w.regions.iter().copied()).collect()
    }

    /// 有限寿命ワードの平均寿命（該当なしは0）
    pub fn mean_finite_lifespan(&self) -> f64 {
        let lifespans: Vec<f64> = self.wards.iter().filter_map(Ward::lifespan).collect();
        if lifespans.is_empty() {
            0.0
        } else {
            lifespans.iter().sum::<f64>() / lifespans.len() as f64
        }
    }

    pub fn len(&self) -> usize {
        self.wards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward(ward_type: WardType, t: f64) -> Ward {
        Ward::new(ward_type, Position2D::new(1000.0, 1000.0), vec!["BLUE_BASE"], t)
    }

    #[test]
    fn test_control_ward_never_expires() {
        let mut active = ActiveWards::new();
        active.place(ward(WardType::ControlWard, 0.0));
        assert_eq!(active.expire(f64::MAX), 0);
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_stealth_ward_expires_at_150s() {
        let mut active = ActiveWards::new();
        active.place(ward(WardType::StealthWard, 10.0));
        assert_eq!(active.expire(159.0), 0);
        assert_eq!(active.expire(160.0), 1);
        assert!(active.is_empty());
    }

    #[test]
    fn test_unknown_type_defaults() {
        let w = ward(WardType::parse("SIGHT_STONE"), 5.0);
        assert_eq!(w.coverage_radius, DEFAULT_COVERAGE_RADIUS);
        assert!(w.is_expired_at(5.0));
        assert!(!w.ward_type.is_tracked());
    }

    #[test]
    fn test_mean_finite_lifespan_skips_control_wards() {
        let mut active = ActiveWards::new();
        active.place(ward(WardType::ControlWard, 0.0));
        active.place(ward(WardType::StealthWard, 0.0));
        active.place(ward(WardType::BlueTrinket, 0.0));
        assert_eq!(active.mean_finite_lifespan(), 105.0);
        assert_eq!(ActiveWards::new().mean_finite_lifespan(), 0.0);
    }

    #[test]
    fn test_covered_regions_deduplicated() {
        let mut active = ActiveWards::new();
        active.place(ward(WardType::ControlWard, 0.0));
        active.place(ward(WardType::StealthWard, 1.0));
        assert_eq!(active.covered_regions().len(), 1);
    }
}
