//! # Strategic Region モジュール
//!
//! バロン・ドラゴン・リバー・バフ周辺の戦略領域に絞ったカバレッジ解析を提供します。
//!
//! 全体マップのカバレッジ解析との違い：
//!
//! - 設置位置は一致するすべての戦略領域に属する（複数一致）
//! - 最適ワード位置から500単位未満の設置を最適配置として領域ごとに数える
//! - カバー時間をフェーズ×領域の表に分割する
//! - バロン・ドラゴン・ヘラルドのオブジェクト視界支配率を算出する
//!
//! ヘラルドはバロンと同じ領域を使い、20分より前の時刻のみを数えます。

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::models::common::{GamePhase, ratio_utils};
use crate::models::geometry::{RegionCatalog, is_optimal_placement};
use crate::models::observation::{Observation, game_duration};
use crate::models::record::MatchContext;
use crate::models::traits::VisionAnalyzer;
use crate::models::ward::{ActiveWards, Ward};

/// ヘラルドとバロンを区切る時刻（秒）
pub const HERALD_CUTOFF_SECONDS: f64 = 20.0 * 60.0;

const BARON_REGION: &str = "BARON_AREA";
const DRAGON_REGION: &str = "DRAGON_AREA";

/// オブジェクトごとの比率
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ObjectiveControl {
    pub baron: f64,
    pub dragon: f64,
    pub herald: f64,
}

/// 戦略領域解析の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategicRegionReport {
    /// 領域ごとのカバーエントリ数
    pub region_coverage_time: BTreeMap<&'static str, u32>,
    pub region_coverage_percentage: BTreeMap<&'static str, f64>,
    pub objective_vision_control: ObjectiveControl,
    /// 領域ごとの 最適配置数 / 設置数
    pub ward_efficiency_by_region: BTreeMap<&'static str, f64>,
    /// フェーズ内エントリ数で正規化したフェーズ×領域のカバー率
    pub vision_control_by_phase: BTreeMap<GamePhase, BTreeMap<&'static str, f64>>,
}

/// 領域ごとの設置集計
#[derive(Debug, Clone, Copy, Default)]
struct PlacementTally {
    optimal: u32,
    total: u32,
}

/// 戦略領域解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategicRegionAnalyzer;

impl StrategicRegionAnalyzer {
    fn region_table<T: Copy>(catalog: &RegionCatalog, value: T) -> BTreeMap<&'static str, T> {
        catalog.names().map(|n| (n, value)).collect()
    }
}

impl VisionAnalyzer for StrategicRegionAnalyzer {
    type Report = StrategicRegionReport;

    fn name(&self) -> &'static str {
        "strategic_regions"
    }

    fn analyze(&self, log: &[Observation], _context: &MatchContext) -> StrategicRegionReport {
        let catalog = RegionCatalog::STRATEGIC;
        let total_game_time = game_duration(log);

        let mut region_covered_time = Self::region_table(&catalog, 0u32);
        let mut covered_by_phase: BTreeMap<GamePhase, BTreeMap<&'static str, u32>> = GamePhase::ALL
            .iter()
            .map(|p| (*p, Self::region_table(&catalog, 0u32)))
            .collect();
        let mut phase_observations: BTreeMap<GamePhase, u32> = BTreeMap::new();
        let mut placements = Self::region_table(&catalog, PlacementTally::default());
        let mut baron_time = 0u32;
        let mut dragon_time = 0u32;
        let mut herald_time = 0u32;

        let mut active_wards = ActiveWards::new();

        for observation in log {
            let timestamp = observation.timestamp();
            let phase = observation.phase();

            if let Some((ward_type, position)) = observation.ward_placement() {
                let regions = catalog.classify(position);

                for region in &regions {
                    let tally = placements.entry(*region).or_default();
                    tally.total += 1;
                    if is_optimal_placement(region, position) {
                        tally.optimal += 1;
                    }
                }

                active_wards.place(Ward::new(ward_type, position, regions, timestamp));
            }

            active_wards.expire(timestamp);
            let covered = active_wards.covered_regions();

            if let Some(phase) = phase {
                *phase_observations.entry(phase).or_default() += 1;
            }

            for region in &covered {
                *region_covered_time.entry(*region).or_default() += 1;
                if let Some(phase_table) = phase.and_then(|p| covered_by_phase.get_mut(&p)) {
                    *phase_table.entry(*region).or_default() += 1;
                }
            }

            if covered.contains(BARON_REGION) {
                baron_time += 1;
                if timestamp < HERALD_CUTOFF_SECONDS {
                    herald_time += 1;
                }
            }
            if covered.contains(DRAGON_REGION) {
                dragon_time += 1;
            }

            trace!("時刻 {:.1}秒: 戦略領域カバー {:?}", timestamp, covered);
        }

        // 試合時間0のログは時間ベースの集計を持たない
        if total_game_time <= 0.0 {
            region_covered_time.values_mut().for_each(|time| *time = 0);
            covered_by_phase
                .values_mut()
                .flat_map(|table| table.values_mut())
                .for_each(|time| *time = 0);
        }

        let region_coverage_percentage = region_covered_time
            .iter()
            .map(|(region, time)| (*region, ratio_utils::fraction(*time as f64, total_game_time)))
            .collect();

        let objective_vision_control = ObjectiveControl {
            baron: ratio_utils::fraction(baron_time as f64, total_game_time),
            dragon: ratio_utils::fraction(dragon_time as f64, total_game_time),
            herald: ratio_utils::fraction(herald_time as f64, total_game_time),
        };

        let vision_control_by_phase = covered_by_phase
            .into_iter()
            .map(|(phase, table)| {
                let observations = phase_observations.get(&phase).copied().unwrap_or(0) as f64;
                let normalized = table
                    .into_iter()
                    .map(|(region, time)| (region, ratio_utils::fraction(time as f64, observations)))
                    .collect();
                (phase, normalized)
            })
            .collect();

        let ward_efficiency_by_region = placements
            .iter()
            .map(|(region, tally)| (*region, ratio_utils::safe_div(tally.optimal as f64, tally.total as f64)))
            .collect();

        debug!(
            "戦略領域: バロン {:.3}, ドラゴン {:.3}, ヘラルド {:.3}",
            objective_vision_control.baron, objective_vision_control.dragon, objective_vision_control.herald
        );

        StrategicRegionReport {
            region_coverage_time: region_covered_time,
            region_coverage_percentage,
            objective_vision_control,
            ward_efficiency_by_region,
            vision_control_by_phase,
        }
    }
}

/// 戦略領域ごとのカバレッジ指標を計算
pub fn calculate_ward_coverage_by_region(log: &[Observation], context: &MatchContext) -> StrategicRegionReport {
    StrategicRegionAnalyzer.analyze(log, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observation::parse_log;
    use serde_json::{Value, json};

    fn observation(t: f64, phase: &str, action: Value) -> Value {
        json!({"state": {"game_time_seconds": t, "game_phase": phase, "agent_state": {}}, "action": action})
    }

    #[test]
    fn test_zero_duration_log_has_no_timed_coverage() {
        let log = parse_log(&json!([
            observation(0.0, "early_game", json!({"item_used": "CONTROL_WARD", "position_x": 6500.0, "position_y": 10500.0}))
        ]));
        let report = calculate_ward_coverage_by_region(&log, &MatchContext::default());

        assert_eq!(report.region_coverage_time["BARON_AREA"], 0);
        assert_eq!(report.region_coverage_percentage["BARON_AREA"], 0.0);
        assert_eq!(report.vision_control_by_phase[&GamePhase::EarlyGame]["BARON_AREA"], 0.0);
        assert_eq!(report.objective_vision_control, ObjectiveControl::default());
        assert_eq!(report.ward_efficiency_by_region["BARON_AREA"], 1.0);
    }

    #[test]
    fn test_empty_log() {
        let report = calculate_ward_coverage_by_region(&[], &MatchContext::default());
        assert_eq!(report.region_coverage_time.len(), 8);
        assert_eq!(report.objective_vision_control, ObjectiveControl::default());
        assert_eq!(report.vision_control_by_phase.len(), 3);
        assert!(report.vision_control_by_phase.values().all(|t| t.len() == 8 && t.values().all(|v| *v == 0.0)));
        assert!(report.ward_efficiency_by_region.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_control_ward_on_baron_spot() {
        let log = parse_log(&json!([
            observation(0.0, "early_game", json!({"item_used": "CONTROL_WARD", "position_x": 6500.0, "position_y": 10500.0})),
            observation(60.0, "early_game", Value::Null),
            observation(120.0, "early_game", Value::Null),
        ]));
        let report = calculate_ward_coverage_by_region(&log, &MatchContext::default());

        assert_eq!(report.ward_efficiency_by_region["BARON_AREA"], 1.0);
        assert_eq!(report.ward_efficiency_by_region["TOP_RIVER"], 0.0);
        assert_eq!(report.region_coverage_time["BARON_AREA"], 3);
        assert_eq!(report.vision_control_by_phase[&GamePhase::EarlyGame]["BARON_AREA"], 1.0);
        assert_eq!(report.vision_control_by_phase[&GamePhase::MidGame]["BARON_AREA"], 0.0);
        assert!((report.objective_vision_control.baron - 3.0 / 120.0).abs() < 1e-9);
        assert_eq!(report.objective_vision_control.herald, report.objective_vision_control.baron);
        assert_eq!(report.objective_vision_control.dragon, 0.0);
    }

    #[test]
    fn test_optimal_distance_is_strict() {
        // (6500, 10500) から丁度500
        let log = parse_log(&json!([
            observation(0.0, "early_game", json!({"item_used": "STEALTH_WARD", "position_x": 6500.0, "position_y": 11000.0})),
            observation(1.0, "early_game", json!({"item_used": "STEALTH_WARD", "position_x": 6500.0, "position_y": 10999.0})),
        ]));
        let report = calculate_ward_coverage_by_region(&log, &MatchContext::default());
        assert_eq!(report.ward_efficiency_by_region["BARON_AREA"], 0.5);
    }

    #[test]
    fn test_herald_only_before_twenty_minutes() {
        let log = parse_log(&json!([
            observation(1140.0, "mid_game", json!({"item_used": "CONTROL_WARD", "position_x": 6000.0, "position_y": 11000.0})),
            observation(1199.0, "mid_game", Value::Null),
            observation(1200.0, "mid_game", Value::Null),
            observation(1260.0, "late_game", Value::Null),
        ]));
        let report = calculate_ward_coverage_by_region(&log, &MatchContext::default());

        assert!((report.objective_vision_control.baron - 4.0 / 1260.0).abs() < 1e-12);
        assert!((report.objective_vision_control.herald - 2.0 / 1260.0).abs() < 1e-12);
        assert_eq!(report.vision_control_by_phase[&GamePhase::MidGame]["BARON_AREA"], 1.0);
        assert_eq!(report.vision_control_by_phase[&GamePhase::LateGame]["BARON_AREA"], 1.0);
    }

    #[test]
    fn test_dragon_area_and_bot_river_overlap() {
        let log = parse_log(&json!([
            observation(0.0, "early_game", json!({"item_used": "BLUE_TRINKET", "position_x": 10000.0, "position_y": 4000.0})),
            observation(30.0, "early_game", Value::Null),
            observation(60.0, "early_game", Value::Null),
        ]));
        let report = calculate_ward_coverage_by_region(&log, &MatchContext::default());

        // 青トリンケットは60秒で消滅するため2エントリのみ
        assert_eq!(report.region_coverage_time["DRAGON_AREA"], 2);
        assert_eq!(report.region_coverage_time["BOT_RIVER"], 2);
        assert_eq!(report.ward_efficiency_by_region["DRAGON_AREA"], 1.0);
        assert!((report.objective_vision_control.dragon - 2.0 / 60.0).abs() < 1e-12);
    }
}
