use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 試合記録ファイルの読み込みエラー
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("試合記録ファイルが見つかりません: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("ファイル読み込みエラー {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("JSON解析エラー {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// 試合記録（メタデータ・試合データ・状態行動ログ）
///
/// ログ部分は生のJSONのまま保持し、各解析器が自分の許容度で解釈します。
#[derive(Debug, Clone, Default)]
pub struct MatchRecord {
    pub metadata: Value,
    pub match_data: Value,
    pub state_action_pairs: Value,
}

impl MatchRecord {
    /// JSONファイルから試合記録を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RecordError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| RecordError::Io(path.to_path_buf(), e))?;

        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| RecordError::Parse(path.to_path_buf(), e))?;

        Ok(Self::from_value(value))
    }

    /// JSON値から試合記録を構築（トップレベルが配列ならログそのものとみなす）
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(entries) => Self {
                state_action_pairs: Value::Array(entries),
                ..Self::default()
            },
            Value::Object(mut map) => Self {
                metadata: map.remove("metadata").unwrap_or(Value::Null),
                match_data: map.remove("match_data").unwrap_or(Value::Null),
                state_action_pairs: map.remove("state_action_pairs").unwrap_or(Value::Null),
            },
            _ => Self::default(),
        }
    }

    pub fn context(&self) -> MatchContext {
        MatchContext::from_value(&self.match_data)
    }

    /// メタデータ中の試合ID
    pub fn match_id(&self) -> Option<&str> {
        self.metadata.get("match_id").and_then(Value::as_str)
    }
}

/// 試合コンテキスト
///
/// `player_stats.visionScore` が数値であれば公式のビジョンスコアとして保持します。
/// それ以外の形状は空のコンテキストとして扱います。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchContext {
    pub official_vision_score: Option<f64>,
}

impl MatchContext {
    pub fn from_value(value: &Value) -> Self {
        let official_vision_score = value
            .get("player_stats")
            .and_then(|stats| stats.get("visionScore"))
            .and_then(Value::as_f64);
        Self { official_vision_score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_context_from_value() {
        let ctx = MatchContext::from_value(&json!({"player_stats": {"visionScore": 42}}));
        assert_eq!(ctx.official_vision_score, Some(42.0));
        assert_eq!(MatchContext::from_value(&json!({"player_stats": "broken"})), MatchContext::default());
        assert_eq!(MatchContext::from_value(&json!([1, 2])), MatchContext::default());
    }

    #[test]
    fn test_record_from_bare_array() {
        let record = MatchRecord::from_value(json!([{"state": {}}]));
        assert_eq!(record.state_action_pairs.as_array().map(Vec::len), Some(1));
        assert!(record.match_data.is_null());
    }

    #[test]
    fn test_record_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"metadata": {{"match_id": "OC1_1"}}, "match_data": {{}}, "state_action_pairs": []}}"#
        )
        .unwrap();

        let record = MatchRecord::from_file(file.path()).unwrap();
        assert_eq!(record.match_id(), Some("OC1_1"));
        assert_eq!(record.state_action_pairs, json!([]));
    }

    #[test]
    fn test_record_errors() {
        assert!(matches!(
            MatchRecord::from_file("no/such/record.json"),
            Err(RecordError::FileNotFound(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(MatchRecord::from_file(file.path()), Err(RecordError::Parse(_, _))));
    }
}
