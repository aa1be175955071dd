// 基本的なデータ型と比率ユーティリティ
pub mod common;

// 解析器の基本インターフェース（trait）定義
pub mod traits;

// 静的な幾何テーブルと領域分類
pub mod geometry;

// 入力ログと試合記録
pub mod observation;
pub mod record;

// ワードと有効ワード集合
pub mod ward;

// 便利な re-export
pub use common::*;
pub use traits::*;
pub use geometry::{ClassificationStrategy, CoarseRegion, Region, RegionCatalog};
pub use observation::{Action, AgentState, GameState, Observation, game_duration, parse_log};
pub use record::{MatchContext, MatchRecord, RecordError};
pub use ward::{ActiveWards, Ward, WardType};
