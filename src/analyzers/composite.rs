//! # Composite モジュール
//!
//! 他の解析器から独立した、入力の欠損・不正に寛容な集計パスを提供します。
//!
//! ログを生のJSONのまま走査し、構造を持たないエントリや `state` の無いエントリは
//! 黙ってスキップします。ワードの設置・除去は次の2つの情報源から数えます：
//!
//! - エントリ最上位の行動（`action`）
//! - `state.events` 内の `WARD_PLACED` / `WARD_KILLED` / `ITEM_PURCHASED`
//!
//! 2つの情報源の間で重複排除は行わないため、同じエントリで両方に設置が
//! 記録されていれば2回数えられます。
//!
//! ## ビジョンスコアの決定順序
//!
//! 1. 試合コンテキストの公式スコア（0以外）
//! 2. 数えた設置・除去からの推定（ステルス 1.0 / コントロール 1.5 / 除去 0.5）
//! 3. 試合時間からの既定値（`1.5 × 分` の偶数丸め、時間0なら10）

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::models::common::{Metric, Position2D, Provenance, ratio_utils};
use crate::models::geometry::CoarseRegion;
use crate::models::record::MatchContext;
use crate::models::ward::WardType;

/// コントロールワードのアイテムID
pub const CONTROL_WARD_ITEM_ID: f64 = 2055.0;

/// 行動の種別タグを持つキー（記録形式により異なる）
const ACTION_TAG_KEYS: [&str; 2] = ["agent_action", "taric_action"];

/// ヒューリスティックの定数
pub mod heuristics {
    pub const STEALTH_WARD_POINTS: f64 = 1.0;
    pub const CONTROL_WARD_POINTS: f64 = 1.5;
    pub const WARD_CLEARED_POINTS: f64 = 0.5;
    /// サポートの平均的な毎分ビジョンスコア
    pub const SCORE_PER_MINUTE: f64 = 1.5;
    /// 試合時間0の場合のスコア
    pub const SHORT_GAME_SCORE: f64 = 10.0;
    pub const STEALTH_ONLY_EFFICIENCY: f64 = 0.7;
    pub const NO_DATA_EFFICIENCY: f64 = 0.5;
    /// 敵の毎分ワード設置数の推定値
    pub const ENEMY_WARDS_PER_MINUTE: f64 = 0.8;
}

/// 複合指標レポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeReport {
    pub vision_score: Metric,
    pub vision_score_per_minute: Metric,
    pub wards_placed: u32,
    pub wards_cleared: u32,
    pub control_wards_placed: u32,
    pub control_wards_purchased: u32,
    pub ward_placement_efficiency: Metric,
    pub ward_denial_rate: Metric,
    /// ワードが1つ以上置かれた粗い領域の割合
    pub vision_uptime: f64,
    pub vision_control_by_position: BTreeMap<CoarseRegion, u32>,
}

/// 2つの情報源からのワード関連カウンタ
#[derive(Debug, Default)]
struct WardTally {
    /// 設置・破壊イベントの件数（行動側の除去は含まない）
    ward_events: usize,
    wards_placed: u32,
    stealth_wards_placed: u32,
    control_wards_placed: u32,
    wards_cleared: u32,
    control_wards_purchased: u32,
    by_position: BTreeMap<CoarseRegion, u32>,
}

impl WardTally {
    fn new() -> Self {
        Self {
            by_position: CoarseRegion::ALL.iter().map(|r| (*r, 0)).collect(),
            ..Self::default()
        }
    }

    fn record_placement(&mut self, ward_type: WardType, position: Position2D, timestamp: f64) {
        self.wards_placed += 1;
        if ward_type == WardType::ControlWard {
            self.control_wards_placed += 1;
        } else {
            self.stealth_wards_placed += 1;
        }
        *self.by_position.entry(CoarseRegion::classify(position)).or_default() += 1;

        self.ward_events += 1;
        trace!("設置イベント: {} ({:.0}, {:.0}) 時刻 {:.1}", ward_type.as_str(), position.x, position.y, timestamp);
    }

    fn record_kill(&mut self, position: Position2D, timestamp: f64) {
        self.wards_cleared += 1;
        self.ward_events += 1;
        trace!("破壊イベント: ({:.0}, {:.0}) 時刻 {:.1}", position.x, position.y, timestamp);
    }

    /// 行動側の除去（位置・時刻を持たないため件数のみ）
    fn record_clear(&mut self) {
        self.wards_cleared += 1;
    }

    fn record_purchase(&mut self, item_id: Option<&Value>) {
        if item_id.and_then(Value::as_f64) == Some(CONTROL_WARD_ITEM_ID) {
            self.control_wards_purchased += 1;
        }
    }

    fn estimated_score(&self) -> f64 {
        self.stealth_wards_placed as f64 * heuristics::STEALTH_WARD_POINTS
            + self.control_wards_placed as f64 * heuristics::CONTROL_WARD_POINTS
            + self.wards_cleared as f64 * heuristics::WARD_CLEARED_POINTS
    }
}

/// 文字列フィールドを取得（欠損・型違いは空文字）
fn str_field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a str {
    object.get(key).and_then(Value::as_str).unwrap_or("")
}

/// `[x, y]` 形式の位置を取得（欠損・不正は原点）
fn position_field(object: &Map<String, Value>, key: &str) -> Position2D {
    let coords = object.get(key).and_then(Value::as_array);
    match coords.map(|c| c.as_slice()) {
        Some([x, y, ..]) => Position2D::new(x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0)),
        _ => Position2D::default(),
    }
}

fn ward_type_field(object: &Map<String, Value>) -> WardType {
    object
        .get("ward_type")
        .and_then(Value::as_str)
        .map(WardType::parse)
        .unwrap_or(WardType::YellowTrinket)
}

fn action_tag(action: &Map<String, Value>) -> &str {
    ACTION_TAG_KEYS
        .iter()
        .map(|key| str_field(action, key))
        .find(|tag| !tag.is_empty())
        .unwrap_or("")
}

/// エントリの `state` を取得（構造を持たない場合はNone）
fn entry_state(entry: &Value) -> Option<&Map<String, Value>> {
    entry.as_object()?.get("state")?.as_object()
}

/// 入力に寛容な複合指標ビルダー
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeMetricsBuilder;

impl CompositeMetricsBuilder {
    pub fn name(&self) -> &'static str {
        "composite"
    }

    /// 生のJSONログから複合指標を作成
    ///
    /// 失敗することはなく、常にすべてのフィールドを持つレポートを返します。
    pub fn build(&self, raw_log: &Value, context: &MatchContext) -> CompositeReport {
        let empty = Vec::new();
        let entries = raw_log.as_array().unwrap_or(&empty);
        let empty_object = Map::new();

        let game_duration_mins = entries
            .last()
            .and_then(entry_state)
            .and_then(|state| state.get("game_time_seconds"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            / 60.0;

        let mut tally = WardTally::new();
        let mut skipped = 0usize;

        for entry in entries {
            let Some(state) = entry_state(entry) else {
                skipped += 1;
                continue;
            };
            let action = entry
                .get("action")
                .and_then(Value::as_object)
                .unwrap_or(&empty_object);
            let state_time = state.get("game_time_seconds").and_then(Value::as_f64).unwrap_or(0.0);

            let action_type = str_field(action, "type");
            let tag = action_tag(action);

            if action_type == "WARD_PLACED" || tag == "WARD" {
                tally.record_placement(ward_type_field(action), position_field(state, "position"), state_time);
            } else if action_type == "WARD_CLEARED" || tag == "CLEAR_WARD" {
                tally.record_clear();
            } else if action_type == "PURCHASE_ITEM" {
                tally.record_purchase(action.get("item_id"));
            }

            let events = state.get("events").and_then(Value::as_array).unwrap_or(&empty);
            for event in events.iter().filter_map(Value::as_object) {
                let timestamp = event.get("timestamp").and_then(Value::as_f64).unwrap_or(state_time);
                match str_field(event, "type") {
                    "WARD_PLACED" => {
                        tally.record_placement(ward_type_field(event), position_field(event, "position"), timestamp);
                    }
                    "WARD_KILLED" => tally.record_kill(position_field(event, "position"), timestamp),
                    "ITEM_PURCHASED" => tally.record_purchase(event.get("item_id")),
                    _ => {}
                }
            }
        }

        if skipped > 0 {
            debug!("不正なエントリを {}件 スキップしました", skipped);
        }

        let vision_score = Self::resolve_vision_score(&tally, context, !entries.is_empty(), game_duration_mins);

        let vision_score_per_minute = if game_duration_mins > 0.0 {
            Metric {
                value: vision_score.value / game_duration_mins,
                provenance: vision_score.provenance,
            }
        } else {
            Metric::heuristic(heuristics::SCORE_PER_MINUTE)
        };

        let ward_placement_efficiency = if tally.control_wards_purchased > 0 {
            Metric::measured(tally.control_wards_placed as f64 / tally.control_wards_purchased as f64)
        } else if tally.stealth_wards_placed > 0 {
            Metric::heuristic(heuristics::STEALTH_ONLY_EFFICIENCY)
        } else {
            Metric::heuristic(heuristics::NO_DATA_EFFICIENCY)
        };

        let estimated_enemy_wards = game_duration_mins * heuristics::ENEMY_WARDS_PER_MINUTE;
        let ward_denial_rate = Metric::heuristic(
            ratio_utils::safe_div(tally.wards_cleared as f64, estimated_enemy_wards).min(1.0),
        );

        let regions_with_wards = tally.by_position.values().filter(|count| **count > 0).count();
        let vision_uptime = ratio_utils::safe_div(regions_with_wards as f64, tally.by_position.len() as f64);

        debug!(
            "複合指標: 設置 {}件, 除去 {}件, スコア {:.2} ({:?})",
            tally.wards_placed, tally.wards_cleared, vision_score.value, vision_score.provenance
        );

        CompositeReport {
            vision_score,
            vision_score_per_minute,
            wards_placed: tally.wards_placed,
            wards_cleared: tally.wards_cleared,
            control_wards_placed: tally.control_wards_placed,
            control_wards_purchased: tally.control_wards_purchased,
            ward_placement_efficiency,
            ward_denial_rate,
            vision_uptime,
            vision_control_by_position: tally.by_position,
        }
    }

    fn resolve_vision_score(
        tally: &WardTally,
        context: &MatchContext,
        has_entries: bool,
        game_duration_mins: f64,
    ) -> Metric {
        if let Some(score) = context.official_vision_score.filter(|s| *s != 0.0) {
            return Metric { value: score, provenance: Provenance::Reported };
        }

        if tally.ward_events > 0 {
            return Metric::measured(tally.estimated_score());
        }

        if !has_entries {
            Metric::measured(0.0)
        } else if game_duration_mins > 0.0 {
            Metric::heuristic((heuristics::SCORE_PER_MINUTE * game_duration_mins).round_ties_even())
        } else {
            Metric::heuristic(heuristics::SHORT_GAME_SCORE)
        }
    }
}

/// 複合ビジョン指標を計算
pub fn calculate_vision_metrics(raw_log: &Value, context: &MatchContext) -> CompositeReport {
    CompositeMetricsBuilder.build(raw_log, context)
}
