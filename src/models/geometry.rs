//! # Geometry モジュール
//!
//! マップ領域・最適ワード位置などの静的な幾何テーブルと、
//! 座標を領域へ分類する機能を提供します。
//!
//! テーブルはすべてプロセス全体で不変の `static` データであり、
//! 実行中に変更されることはありません。
//!
//! ## 分類方式
//!
//! - `SingleRegion`: カタログの定義順で最初に一致した領域のみを返す（全体マップ用）
//! - `MultiRegion`: 一致したすべての領域を返す（戦略領域用）
//!
//! 下流の計算式はどちらの方式で分類されたかに依存するため、
//! 2つの方式は統合せずに明示的に区別します。

use crate::models::common::{Position2D, Rect};
use serde::Serialize;

/// 名前付き矩形領域
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub bounds: Rect,
}

const fn region(name: &'static str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Region {
    Region { name, bounds: Rect::new(min_x, min_y, max_x, max_y) }
}

/// 全体マップ領域（定義順が分類結果に影響する）
pub static MAP_REGIONS: [Region; 11] = [
    region("TOP_LANE", 0.0, 7000.0, 7000.0, 14000.0),
    // 境界が反転しているため一致しない
    region("MID_LANE", 3500.0, 10500.0, 10500.0, 3500.0),
    region("BOT_LANE", 7000.0, 0.0, 14000.0, 7000.0),
    region("TOP_JUNGLE_BLUE", 2000.0, 7000.0, 7000.0, 12000.0),
    region("BOT_JUNGLE_BLUE", 2000.0, 2000.0, 7000.0, 7000.0),
    region("TOP_JUNGLE_RED", 7000.0, 7000.0, 12000.0, 12000.0),
    region("BOT_JUNGLE_RED", 7000.0, 2000.0, 12000.0, 7000.0),
    region("BARON_PIT", 5500.0, 10000.0, 7500.0, 12000.0),
    region("DRAGON_PIT", 9000.0, 3000.0, 11000.0, 5000.0),
    region("BLUE_BASE", 0.0, 0.0, 2000.0, 2000.0),
    region("RED_BASE", 12000.0, 12000.0, 14000.0, 14000.0),
];

/// オブジェクト周辺の戦略領域
pub static STRATEGIC_REGIONS: [Region; 8] = [
    region("BARON_AREA", 4500.0, 9000.0, 8500.0, 13000.0),
    region("DRAGON_AREA", 8000.0, 2000.0, 12000.0, 6000.0),
    region("TOP_RIVER", 3000.0, 7000.0, 7000.0, 12000.0),
    region("BOT_RIVER", 7000.0, 2000.0, 12000.0, 7000.0),
    region("BLUE_BUFF_BLUE", 3000.0, 7000.0, 5000.0, 9000.0),
    region("RED_BUFF_BLUE", 5000.0, 3000.0, 7000.0, 5000.0),
    region("BLUE_BUFF_RED", 9000.0, 5000.0, 11000.0, 7000.0),
    region("RED_BUFF_RED", 7000.0, 9000.0, 9000.0, 11000.0),
];

/// 全体マップでの分類結果が無い場合の領域名
pub const UNKNOWN_REGION: &str = "UNKNOWN";

/// 最適ワード位置からの判定距離（この距離未満なら最適配置）
pub const OPTIMAL_SPOT_RADIUS: f64 = 500.0;

const fn spot(x: f64, y: f64) -> Position2D {
    Position2D::new(x, y)
}

/// 領域ごとの既知の最適ワード位置
pub static OPTIMAL_WARD_SPOTS: [(&str, [Position2D; 3]); 8] = [
    ("BARON_AREA", [spot(6500.0, 10500.0), spot(5700.0, 11300.0), spot(7000.0, 11800.0)]),
    ("DRAGON_AREA", [spot(10000.0, 4000.0), spot(9000.0, 4500.0), spot(10500.0, 5000.0)]),
    ("TOP_RIVER", [spot(4200.0, 9500.0), spot(5600.0, 8800.0), spot(3500.0, 10300.0)]),
    ("BOT_RIVER", [spot(9500.0, 4200.0), spot(8800.0, 5600.0), spot(10300.0, 3500.0)]),
    ("TOP_JUNGLE_BLUE", [spot(3500.0, 8000.0), spot(4500.0, 9500.0), spot(2500.0, 10000.0)]),
    ("BOT_JUNGLE_BLUE", [spot(3500.0, 4500.0), spot(5000.0, 3500.0), spot(6000.0, 2500.0)]),
    ("TOP_JUNGLE_RED", [spot(10000.0, 10000.0), spot(9500.0, 9000.0), spot(11000.0, 8500.0)]),
    ("BOT_JUNGLE_RED", [spot(10000.0, 3500.0), spot(9000.0, 4500.0), spot(8500.0, 6000.0)]),
];

/// 領域の最適ワード位置リストを取得
pub fn optimal_spots(region_name: &str) -> Option<&'static [Position2D]> {
    OPTIMAL_WARD_SPOTS
        .iter()
        .find(|(name, _)| *name == region_name)
        .map(|(_, spots)| spots.as_slice())
}

/// 位置がいずれかの最適ワード位置から判定距離未満にあるか
pub fn is_optimal_placement(region_name: &str, position: Position2D) -> bool {
    optimal_spots(region_name)
        .map(|spots| spots.iter().any(|s| s.distance(&position) < OPTIMAL_SPOT_RADIUS))
        .unwrap_or(false)
}

/// 領域分類の方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationStrategy {
    /// 定義順で最初に一致した領域のみ
    SingleRegion,
    /// 一致したすべての領域
    MultiRegion,
}

/// 領域カタログと分類方式の組
#[derive(Debug, Clone, Copy)]
pub struct RegionCatalog {
    regions: &'static [Region],
    strategy: ClassificationStrategy,
}

impl RegionCatalog {
    /// 全体マップ（最初の一致のみ）
    pub const FULL_MAP: RegionCatalog = RegionCatalog {
        regions: &MAP_REGIONS,
        strategy: ClassificationStrategy::SingleRegion,
    };

    /// 戦略領域（複数一致）
    pub const STRATEGIC: RegionCatalog = RegionCatalog {
        regions: &STRATEGIC_REGIONS,
        strategy: ClassificationStrategy::MultiRegion,
    };

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// 定義順の領域名
    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<> {
        let regions: &'static [Region] = self.regions;
        regions.iter().map(|r| r.name)
    }

    /// 位置を分類方式に従って領域名へ分類
    ///
    /// `SingleRegion` の場合、結果は高々1要素です。
    pub fn classify(&self, position: Position2D) -> Vec<&'static str> {
        let mut matches = self.regions.iter().filter(|r| r.bounds.contains(position));
        match self.strategy {
            ClassificationStrategy::SingleRegion => matches.next().map(|r| r.name).into_iter().collect(),
            ClassificationStrategy::MultiRegion => matches.map(|r| r.name).collect(),
        }
    }
}

/// 複合指標ビルダー用の粗い領域区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseRegion {
    Jungle,
    River,
    AllyJungle,
    EnemyJungle,
    DragonArea,
    BaronArea,
    Lane,
}

impl CoarseRegion {
    pub const ALL: [CoarseRegion; 7] = [
        CoarseRegion::Jungle,
        CoarseRegion::River,
        CoarseRegion::AllyJungle,
        CoarseRegion::EnemyJungle,
        CoarseRegion::DragonArea,
        CoarseRegion::BaronArea,
        CoarseRegion::Lane,
    ];

    /// 入れ子の矩形による簡易分類（該当なしはジャングル）
    pub fn classify(position: Position2D) -> Self {
        let Position2D { x, y } = position;
        let within = |lo_x: f64, hi_x: f64, lo_y: f64, hi_y: f64| {
            Rect::new(lo_x, lo_y, hi_x, hi_y).contains(position)
        };

        if within(3000.0, 5500.0, 3000.0, 5500.0) {
            CoarseRegion::AllyJungle
        } else if within(9500.0, 12000.0, 9500.0, 12000.0) {
            CoarseRegion::EnemyJungle
        } else if within(6500.0, 8500.0, 6500.0, 8500.0) {
            CoarseRegion::River
        } else if within(9000.0, 11000.0, 4000.0, 6000.0) {
            CoarseRegion::DragonArea
        } else if within(4000.0, 6000.0, 9000.0, 11000.0) {
            CoarseRegion::BaronArea
        } else if x < 3000.0 || x > 12000.0 || y < 3000.0 || y > 12000.0 {
            CoarseRegion::Lane
        } else {
            CoarseRegion::Jungle
        }
    }
}
