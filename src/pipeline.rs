//! # Pipeline モジュール
//!
//! 試合記録に対して設定で選択された解析を順に実行し、
//! 1つのレポートにまとめる解析エンジンを提供します。
//!
//! 各解析は互いの出力に依存しない純粋関数であり、
//! エンジンは入力の変換と結果の収集のみを担当します。
//!
//! ## 処理順序
//!
//! 1. **ログ変換**: 生のJSONログを型付きエントリへ変換（不正なエントリはスキップ）
//! 2. **コンテキスト抽出**: 試合データから公式ビジョンスコアを取得
//! 3. **解析実行**: ワードカバレッジ → ビジョンスコア → 戦略領域 → 視界優位 → 複合指標
//!
//! ## 使用例
//!
//! ```rust,no_run
//! use vismetrics::config::AnalysisConfig;
//! use vismetrics::models::MatchRecord;
//! use vismetrics::pipeline::AnalysisEngine;
//!
//! let record = MatchRecord::from_file("data/match.json")?;
//! let engine = AnalysisEngine::new(AnalysisConfig::default());
//! let report = engine.run(&record);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::analyzers::{
    CompositeMetricsBuilder, StrategicRegionAnalyzer, VisionAdvantageEstimator, VisionReport,
    VisionScoreEstimator, WardCoverageAnalyzer,
};
use crate::config::AnalysisConfig;
use crate::models::{GamePhase, MatchContext, MatchRecord, Observation, VisionAnalyzer, game_duration, parse_log};

pub struct AnalysisEngine {
    pub config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 試合記録を解析してレポートを作成
    pub fn run(&self, record: &MatchRecord) -> VisionReport {
        info!("=== 解析開始: {} ===", record.match_id().unwrap_or("(試合ID無し)"));

        let log = parse_log(&record.state_action_pairs);
        let context = record.context();

        info!("エントリ数: {}, 試合時間: {:.1}秒", log.len(), game_duration(&log));
        if context.official_vision_score.is_some() {
            debug!("公式ビジョンスコア: {:?}", context.official_vision_score);
        }

        let report = self.analyze(&log, record, &context);

        info!("=== 解析完了 ===");
        report
    }

    fn analyze(&self, log: &[Observation], record: &MatchRecord, context: &MatchContext) -> VisionReport {
        let selection = &self.config.analyses;

        VisionReport {
            ward_coverage: run_if(selection.ward_coverage, &WardCoverageAnalyzer, log, context),
            vision_score: run_if(selection.vision_score, &VisionScoreEstimator, log, context),
            strategic_regions: run_if(selection.strategic_regions, &StrategicRegionAnalyzer, log, context),
            vision_advantage: run_if(selection.vision_advantage, &VisionAdvantageEstimator, log, context),
            composite: selection.composite.then(|| {
                let builder = CompositeMetricsBuilder;
                debug!("解析実行: {}", builder.name());
                builder.build(&record.state_action_pairs, context)
            }),
        }
    }
}

fn run_if<A: VisionAnalyzer>(
    enabled: bool,
    analyzer: &A,
    log: &[Observation],
    context: &MatchContext,
) -> Option<A::Report> {
    if !enabled {
        debug!("解析スキップ: {}", analyzer.name());
        return None;
    }
    debug!("解析実行: {}", analyzer.name());
    Some(analyzer.analyze(log, context))
}

/// 試合記録の概要（`--info` 表示用）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSummary {
    pub raw_entries: usize,
    pub observations: usize,
    pub duration_seconds: f64,
    pub entries_by_phase: BTreeMap<GamePhase, usize>,
    pub ward_placements: usize,
    pub embedded_events: usize,
    pub official_vision_score: Option<f64>,
}

impl RecordSummary {
    pub fn from_record(record: &MatchRecord) -> Self {
        let log = parse_log(&record.state_action_pairs);

        let mut entries_by_phase = BTreeMap::new();
        for phase in log.iter().filter_map(Observation::phase) {
            *entries_by_phase.entry(phase).or_insert(0) += 1;
        }

        Self {
            raw_entries: record.state_action_pairs.as_array().map_or(0, Vec::len),
            observations: log.len(),
            duration_seconds: game_duration(&log),
            entries_by_phase,
            ward_placements: log.iter().filter(|o| o.ward_placement().is_some()).count(),
            embedded_events: log.iter().map(|o| o.state.event_count()).sum(),
            official_vision_score: record.context().official_vision_score,
        }
    }

    pub fn print(&self) {
        println!("=== 試合記録情報 ===");
        println!("エントリ数: {} (有効: {})", self.raw_entries, self.observations);
        println!("試合時間: {:.1}秒 ({:.1}分)", self.duration_seconds, self.duration_seconds / 60.0);
        for (phase, count) in &self.entries_by_phase {
            println!("  {}: {}エントリ", phase.as_str(), count);
        }
        println!("ワード設置行動: {}件", self.ward_placements);
        println!("埋め込みイベント: {}件", self.embedded_events);
        match self.official_vision_score {
            Some(score) => println!("公式ビジョンスコア: {}", score),
            None => println!("公式ビジョンスコア: なし"),
        }
    }
}
