// 全体マップ領域のワードカバレッジ
pub mod ward_coverage;

// 固定ポイントによるビジョンスコア推定
pub mod vision_score;

// 戦略領域（オブジェクト周辺）の解析
pub mod strategic;

// 敵側データ不在時の模擬的な視界優位
pub mod vision_advantage;

// 入力に寛容な複合指標
pub mod composite;

use serde::Serialize;
use serde_json::Value;

use crate::models::observation::Observation;
use crate::models::record::MatchContext;
use crate::models::traits::VisionAnalyzer;

// 便利な re-export
pub use composite::{CompositeMetricsBuilder, CompositeReport, calculate_vision_metrics};
pub use strategic::{ObjectiveControl, StrategicRegionAnalyzer, StrategicRegionReport, calculate_ward_coverage_by_region};
pub use vision_advantage::{VisionAdvantageEstimator, VisionAdvantageReport, calculate_vision_advantage};
pub use vision_score::{VisionScoreEstimator, VisionScoreReport, calculate_vision_score};
pub use ward_coverage::{WardCoverageAnalyzer, WardCoverageReport, calculate_ward_coverage};

/// すべての解析結果をまとめたレポート
///
/// 無効化された解析は `None` となり、JSON出力では省略されます。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward_coverage: Option<WardCoverageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision_score: Option<VisionScoreReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategic_regions: Option<StrategicRegionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision_advantage: Option<VisionAdvantageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeReport>,
}

/// 5つの解析をすべて実行
///
/// `log` は型付きの解析器に、`raw_log` は複合指標ビルダーに渡されます。
pub fn analyze_all(log: &[Observation], raw_log: &Value, context: &MatchContext) -> VisionReport {
    VisionReport {
        ward_coverage: Some(WardCoverageAnalyzer.analyze(log, context)),
        vision_score: Some(VisionScoreEstimator.analyze(log, context)),
        strategic_regions: Some(StrategicRegionAnalyzer.analyze(log, context)),
        vision_advantage: Some(VisionAdvantageEstimator.analyze(log, context)),
        composite: Some(CompositeMetricsBuilder.build(raw_log, context)),
    }
}
