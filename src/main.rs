use clap::{Arg, Command};
use std::fs;
use tracing::{error, info};

use vismetrics::config::AnalysisConfig;
use vismetrics::logging::{init_logging, raise_for_verbosity};
use vismetrics::models::MatchRecord;
use vismetrics::pipeline::{AnalysisEngine, RecordSummary};

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("vismetrics")
        .version("0.1.0")
        .about("視界・ワード指標解析 (Vision Metrics)")
        .long_about("試合の状態・行動ログからワードカバレッジ、ビジョンスコア、\n\
                     戦略領域の視界制御などの指標を算出します。")
        .arg(
            Arg::new("match")
                .short('m')
                .long("match")
                .value_name("FILE")
                .help("試合記録ファイル(.json)のパスを指定")
                .long_help("解析する試合記録ファイル(.json)のパスを指定します。\n\
                           ファイルは状態・行動ペアの配列、または\n\
                           metadata / match_data / state_action_pairs を持つオブジェクトです。")
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("解析設定ファイル(.yaml)のパスを指定")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("レポートの出力先（省略時は標準出力）")
                .conflicts_with("info")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("試合記録と設定の情報のみ表示して終了")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: デバッグ, -vv: トレース)")
        )
        .get_matches();

    let Some(match_path) = matches.get_one::<String>("match") else {
        show_default_help();
        return;
    };

    let result = run(
        match_path,
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<String>("output").map(String::as_str),
        matches.get_flag("info"),
        matches.get_count("verbose"),
    );

    if let Err(e) = result {
        error!("解析失敗: {}", e);
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

/// 設定と試合記録を読み込んで解析を実行
fn run(
    match_path: &str,
    config_path: Option<&str>,
    output_path: Option<&str>,
    info_only: bool,
    verbose_level: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    let mut log_config = config.logging.to_log_config()?;
    log_config.level = raise_for_verbosity(log_config.level, verbose_level);
    // ガードはプロセス終了まで保持する
    let _guard = init_logging(log_config)?;

    if let Some(path) = config_path {
        info!("設定ファイル読み込み完了: {}", path);
    }

    let record = MatchRecord::from_file(match_path)?;
    info!("試合記録読み込み完了: {}", match_path);

    if info_only {
        config.print_summary();
        println!();
        RecordSummary::from_record(&record).print();
        return Ok(());
    }

    let pretty = config.output.pretty;
    let engine = AnalysisEngine::new(config);
    let report = engine.run(&record);

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match output_path {
        Some(path) => {
            fs::write(path, json)?;
            info!("レポート出力: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// デフォルトヘルプを表示
fn show_default_help() {
    println!("視界・ワード指標解析 (Vision Metrics) - vismetrics v0.1.0");
    println!();
    println!("使用方法:");
    println!("  vismetrics -m <FILE> [オプション]");
    println!();
    println!("オプション:");
    println!("  -m, --match <FILE>     試合記録ファイルを指定して解析");
    println!("  -c, --config <FILE>    解析設定ファイル(.yaml)を指定");
    println!("  -o, --output <FILE>    レポートをファイルへ出力");
    println!("  -i, --info             試合記録と設定の情報のみ表示");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("例:");
    println!("  vismetrics -m data/match.json");
    println!("  vismetrics -m data/match.json -c configs/default.yaml -o report.json");
    println!("  vismetrics -m data/match.json -i");
}
