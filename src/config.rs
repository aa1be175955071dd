use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

use crate::logging::{LogConfig, LogOutput};

/// 設定メタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigMeta {
    pub name: String,
    pub description: String,
}

impl Default for ConfigMeta {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            description: "全解析を実行する既定の設定".to_string(),
        }
    }
}

/// ログ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// console / file / both
    pub output: String,
    pub log_dir: String,
    pub file_prefix: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "console".to_string(),
            log_dir: "logs".to_string(),
            file_prefix: "vismetrics".to_string(),
        }
    }
}

impl LoggingSection {
    /// ログシステム用の設定へ変換
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level = Level::from_str(&self.level)
            .map_err(|_| ConfigError::Validation(format!("無効なログレベル: {}", self.level)))?;
        let output = LogOutput::from_str(&self.output).map_err(ConfigError::Validation)?;

        Ok(LogConfig {
            level,
            output,
            log_dir: self.log_dir.clone(),
            file_prefix: self.file_prefix.clone(),
        })
    }
}

/// レポート出力設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 整形済みJSONで出力するか
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// 実行する解析の選択
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSelection {
    pub ward_coverage: bool,
    pub vision_score: bool,
    pub strategic_regions: bool,
    pub vision_advantage: bool,
    pub composite: bool,
}

impl Default for AnalysisSelection {
    fn default() -> Self {
        Self {
            ward_coverage: true,
            vision_score: true,
            strategic_regions: true,
            vision_advantage: true,
            composite: true,
        }
    }
}

impl AnalysisSelection {
    pub fn enabled_count(&self) -> usize {
        [
            self.ward_coverage,
            self.vision_score,
            self.strategic_regions,
            self.vision_advantage,
            self.composite,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }
}

/// 完全な解析設定
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub meta: ConfigMeta,
    pub logging: LoggingSection,
    pub output: OutputConfig,
    pub analyses: AnalysisSelection,
}

impl AnalysisConfig {
    /// YAMLファイルから解析設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config: AnalysisConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

        config.validate()?;

        Ok(config)
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analyses.enabled_count() == 0 {
            return Err(ConfigError::Validation("解析が1つも有効になっていません".to_string()));
        }

        let log_config = self.logging.to_log_config()?;
        if log_config.output != LogOutput::Console && self.logging.log_dir.trim().is_empty() {
            return Err(ConfigError::Validation("ファイル出力には log_dir が必要です".to_string()));
        }

        Ok(())
    }

    /// 設定の概要を表示
    pub fn print_summary(&self) {
        println!("=== 解析設定 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("ログ: {} ({})", self.logging.level, self.logging.output);
        println!("有効な解析: {}/5", self.analyses.enabled_count());
    }
}

/// 設定読み込みエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ファイルが見つかりません: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("ファイル読み込みエラー {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("YAML解析エラー {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_yaml::Error),

    #[error("設定検証エラー: {0}")]
    Validation(String),
}
