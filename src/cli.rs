use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alarm-tracker")]
#[command(about = "アラームログ取込・トラッカー更新ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// レイアウト設定ファイル（JSON）
    #[arg(long, global = true)]
    pub layout: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 当日分のアラームログでトラッカーを更新（ステータス列をYESに設定）
    Latest {
        /// アラームログ（ファイル名に YYYY-MM-DD を含む）
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// トラッカー（.xlsx / .xls）
        #[arg(short, long, required = true)]
        tracker: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 過去分のアラームログをまとめて取込（ステータス列はNOのまま）
    Backlog {
        /// アラームログ（複数指定可）
        #[arg(short, long, num_args = 1..)]
        input: Vec<PathBuf>,

        /// アラームログのフォルダ（直下の .xlsx / .xls を取込）
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// トラッカー（.xlsx / .xls）
        #[arg(short, long, required = true)]
        tracker: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// アラームログの抽出結果を表示（トラッカーは更新しない）
    Extract {
        /// アラームログ
        #[arg(required = true)]
        input: PathBuf,

        /// 抽出結果をJSONで保存
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// 旧形式（.xls）のトラッカーを .xlsx に変換
    Convert {
        /// 変換元（.xls）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は同じ場所に .xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}
