use clap::{Parser, Subcommand};
use crate::backend::BackendKind;
use solar_diag_common::{ImageClass, UrgencyFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solar-diag")]
#[command(about = "ソーラーパネル画像の診断解析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析バックエンド (mock/http)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像1枚を解析して結果を表示
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 画像種別 (rgb/thermal/drone)
        #[arg(short, long)]
        class: Option<ImageClass>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 対話プロンプトを出さない（種別未指定ならエラー）
        #[arg(long)]
        no_prompt: bool,
    },

    /// フォルダ内の画像を順に解析してレポートを出力
    Batch {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 画像種別 (rgb/thermal/drone)
        #[arg(short, long, required = true)]
        class: ImageClass,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// レポート出力先（.xlsx または .json。デフォルト: 入力フォルダ/report.json）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// パネル一覧（ダッシュボード）を表示
    Dashboard {
        /// 故障名で絞り込み（部分一致）
        #[arg(short, long)]
        fault: Option<String>,

        /// 緊急度で絞り込み (all/critical/warning/healthy)
        #[arg(short, long, default_value = "all")]
        urgency: UrgencyFilter,

        /// 表示中のパネルをExcelに出力
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// アラート一覧を表示
    Alerts {
        /// 指定IDのアラートを解決済みにしてから表示
        #[arg(long)]
        resolve: Vec<u32>,

        /// 「本日解決」の集計日 (YYYY-MM-DD、デフォルト: 今日)
        #[arg(long)]
        today: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// HTTPバックエンドのエンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// デフォルトのバックエンドを設定
        #[arg(long)]
        set_backend: Option<BackendKind>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
