//! # Observation モジュール
//!
//! 試合ログの1エントリ（状態と行動の組）を表す型を定義します。
//!
//! ログは `game_time_seconds` の非減少順に並んでいることが前提で、
//! 最終エントリの時刻が試合全体の長さとして扱われます。

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::common::{GamePhase, Position2D};
use crate::models::ward::WardType;

/// ログの1エントリ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Observation {
    pub state: GameState,
    #[serde(default)]
    pub action: Option<Action>,
}

/// ゲーム状態
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub game_time_seconds: f64,
    #[serde(default)]
    pub game_phase: String,
    #[serde(default)]
    pub agent_state: Option<AgentState>,
    /// 記録済みログでの旧キー（`agent_state` があればそちらを優先）
    #[serde(default)]
    pub taric_state: Option<AgentState>,
    /// 埋め込みイベント（型付き解析器は参照しないため形を問わない）
    #[serde(default)]
    pub events: Value,
}

impl GameState {
    pub fn agent(&self) -> Option<&AgentState> {
        self.agent_state.as_ref().or(self.taric_state.as_ref())
    }

    /// 埋め込みイベント数（配列以外は0）
    pub fn event_count(&self) -> usize {
        self.events.as_array().map_or(0, Vec::len)
    }
}

/// 操作エージェントの状態
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentState {
    #[serde(default)]
    pub position_x: f64,
    #[serde(default)]
    pub position_y: f64,
}

/// エージェントの行動
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub item_used: Option<String>,
    #[serde(default)]
    pub item_purchased: Option<String>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
    #[serde(default)]
    pub ward_cleared: bool,
}

impl Observation {
    pub fn timestamp(&self) -> f64 {
        self.state.game_time_seconds
    }

    /// ゲームフェーズ（不明なフェーズ名はNone）
    pub fn phase(&self) -> Option<GamePhase> {
        GamePhase::parse(&self.state.game_phase)
    }

    /// エージェントの現在位置
    pub fn agent_position(&self) -> Position2D {
        self.state
            .agent()
            .map(|agent| Position2D::new(agent.position_x, agent.position_y))
            .unwrap_or_default()
    }

    /// 使用アイテムがカバレッジ対象のワードであれば、その種別と設置位置を返す
    ///
    /// 設置位置は行動の座標を優先し、無い軸はエージェントの現在位置で補います。
    pub fn ward_placement(&self) -> Option<(WardType, Position2D)> {
        let action = self.action.as_ref()?;
        let ward_type = WardType::parse(action.item_used.as_deref()?);
        if !ward_type.is_tracked() {
            return None;
        }

        let agent = self.agent_position();
        let position = Position2D::new(
            action.position_x.unwrap_or(agent.x),
            action.position_y.unwrap_or(agent.y),
        );
        Some((ward_type, position))
    }

    pub fn item_used(&self) -> Option<&str> {
        self.action.as_ref()?.item_used.as_deref()
    }

    pub fn item_purchased(&self) -> Option<&str> {
        self.action.as_ref()?.item_purchased.as_deref()
    }

    pub fn ward_cleared(&self) -> bool {
        self.action.as_ref().is_some_and(|a| a.ward_cleared)
    }
}

/// 試合全体の長さ（最終エントリの時刻、空ログは0）
pub fn game_duration(log: &[Observation]) -> f64 {
    log.last().map(Observation::timestamp).unwrap_or(0.0)
}

/// 生のJSONログを型付きのエントリ列へ変換
///
/// 配列でない入力は空ログとして扱い、変換できないエントリは警告を出してスキップします。
pub fn parse_log(value: &Value) -> Vec<Observation> {
    let Some(entries) = value.as_array() else {
        warn!("ログが配列ではないため空ログとして扱います");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match Observation::deserialize(entry) {
            Ok(observation) => Some(observation),
            Err(e) => {
                warn!("エントリ {} をスキップ: {}", index, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_log_skips_malformed() {
        let log = json!([
            {"state": {"game_time_seconds": 0.0, "game_phase": "EARLY_GAME", "taric_state": {"position_x": 1.0, "position_y": 2.0}}},
            "not an observation",
            {"action": {}},
            {"state": {"game_time_seconds": 5.0, "game_phase": "early_game", "agent_state": {}}, "action": {"item_used": "STEALTH_WARD"}}
        ]);
        let parsed = parse_log(&log);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].agent_position(), Position2D::new(1.0, 2.0));
        assert_eq!(parsed[0].phase(), Some(GamePhase::EarlyGame));
        assert_eq!(game_duration(&parsed), 5.0);
    }

    #[test]
    fn test_non_array_events_keep_entry() {
        let log = json!([
            {"state": {"game_time_seconds": 0.0, "game_phase": "EARLY_GAME", "agent_state": {}},
             "action": {"item_used": "CONTROL_WARD", "position_x": 6500.0, "position_y": 10500.0}},
            {"state": {"game_time_seconds": 120.0, "game_phase": "EARLY_GAME", "agent_state": {}, "events": null}},
            {"state": {"game_time_seconds": 180.0, "game_phase": "EARLY_GAME", "events": {"type": "WARD_PLACED"}}},
            {"state": {"game_time_seconds": 240.0, "game_phase": "EARLY_GAME", "events": [{"type": "WARD_PLACED"}, 3]}}
        ]);
        let parsed = parse_log(&log);
        assert_eq!(parsed.len(), 4);
        assert_eq!(game_duration(&parsed), 240.0);
        assert_eq!(parsed[1].state.event_count(), 0);
        assert_eq!(parsed[2].state.event_count(), 0);
        assert_eq!(parsed[3].state.event_count(), 2);
    }

    #[test]
    fn test_agent_state_preferred_over_legacy_key() {
        let observation: Observation = serde_json::from_value(json!({
            "state": {"game_time_seconds": 1.0, "game_phase": "mid_game",
                      "agent_state": {"position_x": 100.0, "position_y": 200.0},
                      "taric_state": {"position_x": 9.0, "position_y": 9.0}}
        }))
        .unwrap();
        assert_eq!(observation.agent_position(), Position2D::new(100.0, 200.0));

        let legacy: Observation = serde_json::from_value(json!({
            "state": {"game_time_seconds": 1.0, "game_phase": "mid_game", "agent_state": null,
                      "taric_state": {"position_x": 9.0, "position_y": 8.0}}
        }))
        .unwrap();
        assert_eq!(legacy.agent_position(), Position2D::new(9.0, 8.0));
    }

    #[test]
    fn test_parse_log_non_array() {
        assert!(parse_log(&json!({"state": {}})).is_empty());
        assert_eq!(parse_log(&json!([{"state": {}}])).len(), 1);
        assert_eq!(game_duration(&[]), 0.0);
    }

    #[test]
    fn test_ward_placement_position_fallback() {
        let observation: Observation = serde_json::from_value(json!({
            "state": {"game_time_seconds": 1.0, "game_phase": "mid_game",
                      "agent_state": {"position_x": 100.0, "position_y": 200.0}},
            "action": {"item_used": "CONTROL_WARD", "position_x": 5000.0}
        }))
        .unwrap();
        let (ward_type, position) = observation.ward_placement().unwrap();
        assert_eq!(ward_type, WardType::ControlWard);
        assert_eq!(position, Position2D::new(5000.0, 200.0));
    }

    #[test]
    fn test_untracked_item_is_not_placement() {
        let observation: Observation = serde_json::from_value(json!({
            "state": {"game_time_seconds": 1.0, "game_phase": "mid_game"},
            "action": {"item_used": "HEALTH_POTION"}
        }))
        .unwrap();
        assert!(observation.ward_placement().is_none());
        assert_eq!(observation.item_used(), Some("HEALTH_POTION"));
    }
}
