use serde::{Deserialize, Serialize};

/// マップ上の2次元位置を表す構造体
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64, // マップ単位
    pub y: f64, // マップ単位
}

impl Position2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 2点間のユークリッド距離を計算
    pub fn distance(&self, other: &Position2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// 軸平行な矩形領域 `(min_x, min_y)-(max_x, max_y)`
///
/// 境界は4辺とも包含的に扱います。min > max の矩形はどの位置も含みません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// 位置が矩形内（境界を含む）にあるかを判定
    pub fn contains(&self, position: Position2D) -> bool {
        self.min_x <= position.x && position.x <= self.max_x &&
        self.min_y <= position.y && position.y <= self.max_y
    }
}

/// ゲームフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    EarlyGame,
    MidGame,
    LateGame,
}

impl GamePhase {
    pub const ALL: [GamePhase; 3] = [GamePhase::EarlyGame, GamePhase::MidGame, GamePhase::LateGame];

    /// 大文字小文字を区別せずにフェーズ名を解析（不明な名前はNone）
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "early_game" => Some(GamePhase::EarlyGame),
            "mid_game" => Some(GamePhase::MidGame),
            "late_game" => Some(GamePhase::LateGame),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::EarlyGame => "early_game",
            GamePhase::MidGame => "mid_game",
            GamePhase::LateGame => "late_game",
        }
    }
}

/// 指標値の出所
///
/// 実測値とヒューリスティック・シミュレーション値を下流で区別するためのタグです。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// ログから計測された値
    Measured,
    /// 試合コンテキストから提供された公式値
    Reported,
    /// 文書化された推定式または固定のフォールバック値
    Heuristic,
    /// 敵側データ不在のため模擬した値
    Simulated,
}

/// 出所付きのスカラー指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metric {
    pub value: f64,
    pub provenance: Provenance,
}

impl Metric {
    pub fn measured(value: f64) -> Self {
        Self { value, provenance: Provenance::Measured }
    }

    pub fn heuristic(value: f64) -> Self {
        Self { value, provenance: Provenance::Heuristic }
    }
}

/// 比率ユーティリティ
pub mod ratio_utils {
    /// ゼロ除算を0として扱う除算
    pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
        if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        }
    }

    /// ゼロ除算ガード付きで、結果を[0, 1]に収める
    pub fn fraction(numerator: f64, denominator: f64) -> f64 {
        safe_div(numerator, denominator).clamp(0.0, 1.0)
    }
}
