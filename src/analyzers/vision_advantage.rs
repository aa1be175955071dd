//! # Vision Advantage モジュール
//!
//! 敵側の視界データが存在しないため、入力信号から計算は行いません。
//! 固定の例示比率を試合時間でスケールした模擬値を返し、
//! 将来の実装に向けた出力形式のみを定義します。
//!
//! レポートには常に `provenance: simulated` が付与され、
//! 下流で実測値と取り違えないようにしています。

use serde::Serialize;
use tracing::debug;

use crate::analyzers::strategic::ObjectiveControl;
use crate::models::common::Provenance;
use crate::models::observation::{Observation, game_duration};
use crate::models::record::MatchContext;
use crate::models::traits::VisionAnalyzer;

/// 模擬に使う固定比率
pub mod simulated {
    use super::ObjectiveControl;

    pub const ADVANTAGE_FRACTION: f64 = 0.3;
    pub const OBJECTIVE_CONTROL: ObjectiveControl = ObjectiveControl { baron: 0.4, dragon: 0.5, herald: 0.6 };
    pub const BEFORE_OBJECTIVES: ObjectiveControl = ObjectiveControl { baron: 0.7, dragon: 0.6, herald: 0.5 };
    pub const DENIAL_EFFECTIVENESS: f64 = 0.4;
}

/// 視界優位の区間（秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdvantagePeriod {
    pub start: f64,
    pub end: f64,
}

/// 視界優位推定の結果（模擬値）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisionAdvantageReport {
    pub provenance: Provenance,
    /// 区間データは算出できないため常に空
    pub vision_advantage_periods: Vec<AdvantagePeriod>,
    pub total_vision_advantage_time: f64,
    pub vision_advantage_percentage: f64,
    pub objective_vision_control: ObjectiveControl,
    pub vision_control_before_objectives: ObjectiveControl,
    pub vision_denial_effectiveness: f64,
}

impl VisionAdvantageReport {
    /// 試合時間0の場合のすべて0のレポート
    pub fn zeroed() -> Self {
        Self {
            provenance: Provenance::Simulated,
            vision_advantage_periods: Vec::new(),
            total_vision_advantage_time: 0.0,
            vision_advantage_percentage: 0.0,
            objective_vision_control: ObjectiveControl::default(),
            vision_control_before_objectives: ObjectiveControl::default(),
            vision_denial_effectiveness: 0.0,
        }
    }
}

/// 視界優位の模擬推定器
#[derive(Debug, Clone, Copy, Default)]
pub struct VisionAdvantageEstimator;

impl VisionAnalyzer for VisionAdvantageEstimator {
    type Report = VisionAdvantageReport;

    fn name(&self) -> &'static str {
        "vision_advantage"
    }

    fn analyze(&self, log: &[Observation], _context: &MatchContext) -> VisionAdvantageReport {
        let total_game_time = game_duration(log);
        if total_game_time <= 0.0 {
            return VisionAdvantageReport::zeroed();
        }

        debug!("視界優位は模擬値を使用 (試合時間 {:.1}秒)", total_game_time);

        VisionAdvantageReport {
            provenance: Provenance::Simulated,
            vision_advantage_periods: Vec::new(),
            total_vision_advantage_time: total_game_time * simulated::ADVANTAGE_FRACTION,
            vision_advantage_percentage: simulated::ADVANTAGE_FRACTION,
            objective_vision_control: simulated::OBJECTIVE_CONTROL,
            vision_control_before_objectives: simulated::BEFORE_OBJECTIVES,
            vision_denial_effectiveness: simulated::DENIAL_EFFECTIVENESS,
        }
    }
}

/// 視界優位指標（模擬値）を計算
pub fn calculate_vision_advantage(log: &[Observation], context: &MatchContext) -> VisionAdvantageReport {
    VisionAdvantageEstimator.analyze(log, context)
}
