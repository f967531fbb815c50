//! ソーラーパネル画像診断ツール
//!
//! 画像1枚と種別タグを解析バックエンドに送り、健全度・故障・推奨対応を受け取る。

pub mod analyzer;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod presenter;
pub mod scanner;
