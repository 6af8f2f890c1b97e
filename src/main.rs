use alarm_tracker::{cli, config, error, extractor, ingest, updater, workbook};
use alarm_tracker_common::{ExtractedBatch, MergePolicy};
use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use ingest::SourceFile;
use std::path::{Path, PathBuf};
use updater::{MergeOutcome, TrackerUpdater};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.layout.as_deref()).context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Latest { input, tracker, output } => {
            println!("📋 alarm-tracker - 当日分の更新\n");

            // 1. 取込
            println!("[1/2] アラームログを読み込み中...");
            let batches = extract_batches(&[input], &config, false)?;
            println!("✔ {}件を抽出\n", batches[0].records.len());

            // 2. トラッカー更新
            println!("[2/2] トラッカーを更新中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let outcome = TrackerUpdater::new(config)
                .run(&tracker, &batches, MergePolicy::Latest, &output_dir)?;
            print_outcome(&outcome);
        }

        Commands::Backlog { mut input, input_dir, tracker, output } => {
            println!("📚 alarm-tracker - 過去分の取込\n");

            if let Some(dir) = input_dir {
                input.extend(ingest::collect_sources(&dir)?);
            }
            if input.is_empty() {
                return Err(error::TrackerError::Config(
                    "アラームログを --input または --input-dir で指定してください".into(),
                )
                .into());
            }

            // 1. 取込
            println!("[1/2] アラームログを読み込み中... ({}ファイル)", input.len());
            let batches = extract_batches(&input, &config, true)?;
            let total: usize = batches.iter().map(|b| b.records.len()).sum();
            println!("✔ {}件を抽出\n", total);

            // 2. トラッカー更新
            println!("[2/2] トラッカーを更新中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let outcome = TrackerUpdater::new(config)
                .run(&tracker, &batches, MergePolicy::Backlog, &output_dir)?;
            print_outcome(&outcome);
        }

        Commands::Extract { input, json } => {
            let source = SourceFile::from_path(&input)?;
            let records = extractor::extract_records(&source.path, &source.sheet_name(), &config.layout)?;

            println!("{} ({}): {}件", source.display_name(), source.sheet_name(), records.len());
            match json {
                Some(path) => {
                    std::fs::write(&path, serde_json::to_string_pretty(&records)?)?;
                    println!("✔ 抽出結果を保存: {}", path.display());
                }
                None => {
                    for record in &records {
                        println!(
                            "  {}\t{}\t{}\t{}",
                            record.tag,
                            record.location.to_display_string(),
                            record.alarm_description,
                            record.status.to_display_string()
                        );
                    }
                }
            }
        }

        Commands::Convert { input, output } => {
            let output_path = workbook::convert_legacy(&input, output.as_deref())?;
            println!("✔ 変換しました: {}", output_path.display());
        }

        Commands::Config { show, init } => {
            if init {
                let path = Config::config_path()?;
                Config::default().save(&path)?;
                println!("✔ 既定の設定を書き出しました: {}", path.display());
            }

            if show || !init {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}

/// ファイルごとに日付を決めて抽出
fn extract_batches(
    inputs: &[PathBuf],
    config: &Config,
    show_progress: bool,
) -> error::Result<Vec<ExtractedBatch>> {
    let progress = if show_progress {
        let pb = ProgressBar::new(inputs.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut batches = Vec::with_capacity(inputs.len());
    for input in inputs {
        progress.set_message(file_label(input));
        let source = SourceFile::from_path(input)?;
        batches.push(extractor::extract_batch(&source, &config.layout)?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(batches)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn print_outcome(outcome: &MergeOutcome) {
    let summary = &outcome.summary;
    println!(
        "✔ 更新 {}行 / 追加 {}行（{}バッチ, {}件）",
        summary.rows_updated, summary.rows_appended, summary.batches, summary.records
    );
    println!("✔ 出力: {}", outcome.output_path.display());
    println!("\n✅ 完了");
}
