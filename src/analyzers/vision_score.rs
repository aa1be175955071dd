use serde::Serialize;
use tracing::debug;

use crate::models::common::ratio_utils;
use crate::models::observation::{Observation, game_duration};
use crate::models::record::MatchContext;
use crate::models::traits::VisionAnalyzer;

/// イベントごとの近似ポイント
pub mod points {
    pub const STEALTH_WARD_PURCHASED: f64 = 0.5;
    pub const CONTROL_WARD_PURCHASED: f64 = 0.75;
    pub const STEALTH_WARD_PLACED: f64 = 1.0;
    pub const CONTROL_WARD_PLACED: f64 = 1.5;
    pub const WARD_CLEARED: f64 = 2.0;
}

/// ビジョンスコア推定の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisionScoreReport {
    pub vision_score: f64,
    /// 試合時間が0の場合は0
    pub vision_score_per_minute: f64,
    pub wards_cleared: u32,
    pub vision_wards_purchased: u32,
    pub control_wards_purchased: u32,
}

/// 購入・設置・除去イベントに固定ポイントを割り当てるビジョンスコア推定器
#[derive(Debug, Clone, Copy, Default)]
pub struct VisionScoreEstimator;

impl VisionAnalyzer for VisionScoreEstimator {
    type Report = VisionScoreReport;

    fn name(&self) -> &'static str {
        "vision_score"
    }

    fn analyze(&self, log: &[Observation], _context: &MatchContext) -> VisionScoreReport {
        let mut report = VisionScoreReport::default();

        for observation in log {
            match observation.item_purchased() {
                Some("STEALTH_WARD") => {
                    report.vision_wards_purchased += 1;
                    report.vision_score += points::STEALTH_WARD_PURCHASED;
                }
                Some("CONTROL_WARD") => {
                    report.control_wards_purchased += 1;
                    report.vision_score += points::CONTROL_WARD_PURCHASED;
                }
                _ => {}
            }

            match observation.item_used() {
                Some("STEALTH_WARD") => report.vision_score += points::STEALTH_WARD_PLACED,
                Some("CONTROL_WARD") => report.vision_score += points::CONTROL_WARD_PLACED,
                _ => {}
            }

            if observation.ward_cleared() {
                report.wards_cleared += 1;
                report.vision_score += points::WARD_CLEARED;
            }
        }

        let minutes = game_duration(log) / 60.0;
        report.vision_score_per_minute = ratio_utils::safe_div(report.vision_score, minutes);

        debug!(
            "ビジョンスコア: {:.2} ({:.3}/分)",
            report.vision_score, report.vision_score_per_minute
        );

        report
    }
}

/// ビジョンスコア指標を計算
pub fn calculate_vision_score(log: &[Observation], context: &MatchContext) -> VisionScoreReport {
    VisionScoreEstimator.analyze(log, context)
}
