//! # vismetrics
//!
//! 試合の（状態, 行動）ログからエージェントの視界・ワード関連の指標を算出するライブラリ。
//!
//! - [`models`]: 入力ログ、ワード、静的な幾何テーブル
//! - [`analyzers`]: ワードカバレッジ、ビジョンスコア、戦略領域、視界優位、複合指標
//! - [`pipeline`]: 設定に従って解析を実行するエンジン
//! - [`config`] / [`logging`]: YAML設定とログ初期化

pub mod analyzers;
pub mod config;
pub mod logging;
pub mod models;
pub mod pipeline;

pub use analyzers::{VisionReport, analyze_all};
pub use config::{AnalysisConfig, ConfigError};
pub use models::{MatchContext, MatchRecord, Metric, Observation, Provenance, RecordError};
pub use pipeline::{AnalysisEngine, RecordSummary};
