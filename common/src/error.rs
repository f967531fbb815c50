//! エラー型定義
//!
//! - `Error`: 共通ライブラリ内部のエラー（IO/JSON/パース）
//! - `AnalysisError`: 解析フローでユーザーに見せるエラー分類

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 解析フローのエラー分類
///
/// どれもページ（プロセス）を落とさない。入力系はセッション状態を変えずに返り、
/// バックエンド系は `failed` 状態に入ってリトライを受け付ける。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("No image type selected")]
    NoTagSelected,

    #[error("An analysis is already in progress")]
    AlreadyPending,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Analysis backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Analysis backend rejected the request: {0}")]
    BackendRejected(String),

    #[error("Nothing to retry")]
    NothingToRetry,
}

impl AnalysisError {
    /// 同じリクエストを再送すれば成功しうるか
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalysisError::BackendUnavailable(_))
    }
}
