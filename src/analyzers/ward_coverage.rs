//! # Ward Coverage モジュール
//!
//! ログを時系列に再生して有効ワードの集合を管理し、
//! 全体マップ領域ごと・ゲームフェーズごとのカバー時間を集計します。
//!
//! ## 処理順序
//!
//! 各エントリについて以下の順に処理します：
//!
//! 1. **ワード設置**: 設置位置を全体マップ領域へ分類（最初の一致のみ）し、有効集合へ追加
//! 2. **期限切れ除去**: 期限が有限かつ現在時刻以下のワードを除去
//! 3. **フェーズ集計**: カバー領域数 / 全領域数 を現在フェーズの累積値へ加算
//! 4. **領域集計**: カバーされている各領域のカバー秒数を1加算
//!
//! 1エントリを1秒として数えるため、ログが1Hzでサンプリングされていない場合
//! カバー秒数は名目上の単位になります。

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::models::common::{GamePhase, Metric, ratio_utils};
use crate::models::geometry::RegionCatalog;
use crate::models::observation::{Observation, game_duration};
use crate::models::record::MatchContext;
use crate::models::traits::VisionAnalyzer;
use crate::models::ward::{ActiveWards, Ward, WardType};

/// 設置効率のプレースホルダー値（ワード破壊が観測できないため算出不可）
pub const PLACEMENT_EFFICIENCY_PLACEHOLDER: f64 = 0.5;

/// ワード種別ごとの設置数
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WardTypeCounts {
    pub stealth_ward: u32,
    pub control_ward: u32,
    pub blue_trinket: u32,
    pub zombie_ward: u32,
}

impl WardTypeCounts {
    fn record(&mut self, ward_type: &WardType) {
        match ward_type {
            WardType::StealthWard => self.stealth_ward += 1,
            WardType::ControlWard => self.control_ward += 1,
            WardType::BlueTrinket => self.blue_trinket += 1,
            WardType::ZombieWard => self.zombie_ward += 1,
            _ => {}
        }
    }
}

/// ワードカバレッジ解析の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardCoverageReport {
    pub total_wards_placed: u32,
    /// どの全体マップ領域にも属さない設置数
    pub unclassified_wards: u32,
    pub wards_by_type: WardTypeCounts,
    pub wards_by_region: BTreeMap<&'static str, u32>,
    /// フェーズごとのカバー率の累積値（エントリごとの合計）
    pub ward_coverage_by_phase: BTreeMap<GamePhase, f64>,
    /// 最終時点で有効な有限寿命ワードの平均寿命（秒）
    pub ward_lifespan: f64,
    pub region_coverage_percent: BTreeMap<&'static str, f64>,
    pub overall_ward_coverage: f64,
    pub ward_placement_efficiency: Metric,
}

/// 全体マップ領域のワードカバレッジ解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct WardCoverageAnalyzer;

impl VisionAnalyzer for WardCoverageAnalyzer {
    type Report = WardCoverageReport;

    fn name(&self) -> &'static str {
        "ward_coverage"
    }

    fn analyze(&self, log: &[Observation], _context: &MatchContext) -> WardCoverageReport {
        let catalog = RegionCatalog::FULL_MAP;
        let region_count = catalog.len() as f64;
        let total_game_time = game_duration(log);

        let mut total_wards_placed = 0;
        let mut unclassified_wards = 0;
        let mut wards_by_type = WardTypeCounts::default();
        let mut wards_by_region: BTreeMap<&'static str, u32> = catalog.names().map(|n| (n, 0)).collect();
        let mut ward_coverage_by_phase: BTreeMap<GamePhase, f64> =
            GamePhase::ALL.iter().map(|p| (*p, 0.0)).collect();
        let mut region_coverage_time: BTreeMap<&'static str, u32> = catalog.names().map(|n| (n, 0)).collect();

        let mut active_wards = ActiveWards::new();

        for observation in log {
            let timestamp = observation.timestamp();

            if let Some((ward_type, position)) = observation.ward_placement() {
                let regions = catalog.classify(position);

                total_wards_placed += 1;
                wards_by_type.record(&ward_type);
                match regions.first() {
                    Some(region) => *wards_by_region.entry(*region).or_default() += 1,
                    None => unclassified_wards += 1,
                }

                active_wards.place(Ward::new(ward_type, position, regions, timestamp));
            }

            active_wards.expire(timestamp);
            let covered = active_wards.covered_regions();

            if let Some(phase) = observation.phase() {
                let coverage = ratio_utils::safe_div(covered.len() as f64, region_count);
                *ward_coverage_by_phase.entry(phase).or_default() += coverage;
            }

            for region in &covered {
                *region_coverage_time.entry(*region).or_default() += 1;
            }

            trace!("時刻 {:.1}秒: 有効ワード {}個, カバー領域 {}", timestamp, active_wards.len(), covered.len());
        }

        let region_coverage_percent = region_coverage_time
            .iter()
            .map(|(region, time)| (*region, ratio_utils::fraction(*time as f64, total_game_time)))
            .collect();

        let total_coverage_time: u32 = region_coverage_time.values().sum();
        let overall_ward_coverage =
            ratio_utils::fraction(total_coverage_time as f64, total_game_time * region_count);

        debug!(
            "ワードカバレッジ: 設置 {}個, 全体カバー率 {:.3}",
            total_wards_placed, overall_ward_coverage
        );

        WardCoverageReport {
            total_wards_placed,
            unclassified_wards,
            wards_by_type,
            wards_by_region,
            ward_coverage_by_phase,
            ward_lifespan: active_wards.mean_finite_lifespan(),
            region_coverage_percent,
            overall_ward_coverage,
            ward_placement_efficiency: Metric::heuristic(PLACEMENT_EFFICIENCY_PLACEHOLDER),
        }
    }
}

/// ワードカバレッジ指標を計算
pub fn calculate_ward_coverage(log: &[Observation], context: &MatchContext) -> WardCoverageReport {
    WardCoverageAnalyzer.analyze(log, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Provenance;
    use crate::models::observation::parse_log;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn observation(t: f64, phase: &str, action: Value) -> Value {
        json!({
            "state": {"game_time_seconds": t, "game_phase": phase,
                      "agent_state": {"position_x": 500.0, "position_y": 500.0}},
            "action": action
        })
    }

    #[test]
    fn test_empty_log() {
        let report = calculate_ward_coverage(&[], &MatchContext::default());
        assert_eq!(report.total_wards_placed, 0);
        assert_eq!(report.overall_ward_coverage, 0.0);
        assert_eq!(report.ward_lifespan, 0.0);
        assert_eq!(report.wards_by_region.len(), 11);
        assert_eq!(report.region_coverage_percent.len(), 11);
        assert!(report.region_coverage_percent.values().all(|v| *v == 0.0));
        assert_eq!(report.ward_coverage_by_phase.len(), 3);
        assert_eq!(report.ward_placement_efficiency.provenance, Provenance::Heuristic);
    }

    #[test]
    fn test_ward_placed_at_agent_position() {
        let log = parse_log(&json!([
            observation(0.0, "EARLY_GAME", json!({"item_used": "STEALTH_WARD"})),
            observation(10.0, "EARLY_GAME", json!({})),
        ]));
        let report = calculate_ward_coverage(&log, &MatchContext::default());

        assert_eq!(report.total_wards_placed, 1);
        assert_eq!(report.wards_by_type.stealth_ward, 1);
        assert_eq!(report.wards_by_region["BLUE_BASE"], 1);
        // 2エントリ分のカバー / 10秒
        assert!((report.region_coverage_percent["BLUE_BASE"] - 0.2).abs() < 1e-9);
        assert!((report.ward_coverage_by_phase[&GamePhase::EarlyGame] - 2.0 / 11.0).abs() < 1e-9);
        assert_eq!(report.ward_lifespan, 150.0);
    }

    #[test]
    fn test_stealth_ward_expires() {
        let log = parse_log(&json!([
            observation(0.0, "early_game", json!({"item_used": "STEALTH_WARD"})),
            observation(149.0, "early_game", json!({})),
            observation(150.0, "early_game", json!({})),
            observation(200.0, "early_game", json!({})),
        ]));
        let report = calculate_ward_coverage(&log, &MatchContext::default());

        assert!((report.region_coverage_percent["BLUE_BASE"] - 2.0 / 200.0).abs() < 1e-9);
        // 最終時点で有効なワードが無いため寿命は0
        assert_eq!(report.ward_lifespan, 0.0);
    }

    #[test]
    fn test_control_ward_never_expires() {
        let log = parse_log(&json!([
            observation(0.0, "late_game", json!({"item_used": "CONTROL_WARD", "position_x": 13000.0, "position_y": 13000.0})),
            observation(5000.0, "late_game", json!({})),
        ]));
        let report = calculate_ward_coverage(&log, &MatchContext::default());

        assert_eq!(report.wards_by_region["RED_BASE"], 1);
        assert!((report.region_coverage_percent["RED_BASE"] - 2.0 / 5000.0).abs() < 1e-12);
        assert_eq!(report.ward_lifespan, 0.0);
    }

    #[test]
    fn test_unclassified_ward_counted_separately() {
        let log = parse_log(&json!([
            observation(0.0, "mid_game", json!({"item_used": "BLUE_TRINKET", "position_x": -50.0, "position_y": 20000.0})),
            observation(1.0, "mid_game", json!({})),
        ]));
        let report = calculate_ward_coverage(&log, &MatchContext::default());

        assert_eq!(report.total_wards_placed, 1);
        assert_eq!(report.unclassified_wards, 1);
        assert_eq!(report.overall_ward_coverage, 0.0);
        assert_eq!(report.ward_coverage_by_phase[&GamePhase::MidGame], 0.0);
    }

    #[test]
    fn test_untracked_item_ignored() {
        let log = parse_log(&json!([
            observation(0.0, "mid_game", json!({"item_used": "ZOMBIE_WARD"})),
        ]));
        let report = calculate_ward_coverage(&log, &MatchContext::default());
        assert_eq!(report.total_wards_placed, 0);
    }

    proptest! {
        /// カバー率は常に[0, 1]に収まる
        #[test]
        fn prop_coverage_in_unit_interval(
            placements in proptest::collection::vec((0.0f64..15000.0, 0.0f64..15000.0, 0usize..3), 1..20),
            step in 0.1f64..30.0
        ) {
            let kinds = ["STEALTH_WARD", "CONTROL_WARD", "BLUE_TRINKET"];
            let entries: Vec<Value> = placements
                .iter()
                .enumerate()
                .map(|(i, (x, y, k))| observation(
                    i as f64 * step,
                    "mid_game",
                    json!({"item_used": kinds[*k], "position_x": x, "position_y": y}),
                ))
                .collect();
            let log = parse_log(&Value::Array(entries));
            let report = calculate_ward_coverage(&log, &MatchContext::default());

            prop_assert!((0.0..=1.0).contains(&report.overall_ward_coverage));
            for value in report.region_coverage_percent.values() {
                prop_assert!((0.0..=1.0).contains(value));
            }
        }
    }
}
