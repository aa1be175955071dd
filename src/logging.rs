//! # Logging モジュール
//!
//! 解析実行時のログ管理機能を提供します。
//!
//! tracing-appenderによる非同期ファイル出力と、コンソール出力を切り替えて使用します。
//! `RUST_LOG` 環境変数が設定されている場合は、設定ファイルのレベルより優先されます。
//!
//! ## 設定可能な出力先
//!
//! - `Console`: コンソール（標準エラー）のみ
//! - `File`: ファイルのみ（`<log_dir>/<file_prefix>.<日付>`、JSON形式）
//! - `Both`: コンソールとファイルの両方
//!
//! レポート本体は標準出力に書き出されるため、コンソールログは標準エラーへ出力します。

use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Registry,
};

/// ログ出力先の設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutput {
    /// コンソールのみ
    Console,
    /// ファイルのみ
    File,
    /// コンソールとファイルの両方
    Both,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stderr" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(format!("無効な出力先: {}. 利用可能: console, file, both", s)),
        }
    }
}

/// ログ設定構造体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// ログレベル
    pub level: Level,
    /// 出力先
    pub output: LogOutput,
    /// ログファイルのディレクトリ（FileまたはBothの場合）
    pub log_dir: String,
    /// ログファイル名のプレフィックス
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            output: LogOutput::Console,
            log_dir: "logs".to_string(),
            file_prefix: "vismetrics".to_string(),
        }
    }
}

/// ログシステムを初期化
///
/// ファイル出力を使う場合は非同期書き込みのガードを返します。
/// ガードが破棄されると未書き込みのログがフラッシュされるため、
/// 呼び出し側はプロセス終了まで保持してください。
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.to_string()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = || {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
    };

    match config.output {
        LogOutput::Console => {
            Registry::default()
                .with(env_filter)
                .with(console_layer())
                .try_init()?;
            Ok(None)
        }
        LogOutput::File | LogOutput::Both => {
            ensure_log_directory(&config.log_dir)?;
            let file_appender = rolling::daily(&config.log_dir, &config.file_prefix);
            let (non_blocking_appender, guard) = non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_writer(non_blocking_appender)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json();

            let console = (config.output == LogOutput::Both).then(console_layer);

            Registry::default()
                .with(env_filter)
                .with(console)
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
    }
}

/// `-v` の指定回数から基準レベルを引き上げる
///
/// 0回なら基準レベルのまま、1回でDEBUG、2回以上でTRACE。
pub fn raise_for_verbosity(base: Level, verbose_level: u8) -> Level {
    let requested = match verbose_level {
        0 => return base,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // tracing::Level は詳細なほど大きい
    if requested > base { requested } else { base }
}

/// ログディレクトリを作成
pub fn ensure_log_directory(log_dir: &str) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(log_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_output_from_str() {
        assert_eq!(LogOutput::from_str("console"), Ok(LogOutput::Console));
        assert_eq!(LogOutput::from_str("FILE"), Ok(LogOutput::File));
        assert_eq!(LogOutput::from_str("both"), Ok(LogOutput::Both));
        assert!(LogOutput::from_str("invalid").is_err());
    }

    #[test]
    fn test_raise_for_verbosity() {
        assert_eq!(raise_for_verbosity(Level::WARN, 0), Level::WARN);
        assert_eq!(raise_for_verbosity(Level::INFO, 1), Level::DEBUG);
        assert_eq!(raise_for_verbosity(Level::INFO, 3), Level::TRACE);
        assert_eq!(raise_for_verbosity(Level::TRACE, 1), Level::TRACE);
    }
}
