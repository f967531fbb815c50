use solar_diag_common::AnalysisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("HTTPバックエンドのエンドポイントが設定されていません。`solar-diag config --set-endpoint URL` で設定してください")]
    MissingEndpoint,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像種別が指定されていません。--class rgb|thermal|drone を指定してください")]
    MissingImageClass,

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Common(#[from] solar_diag_common::Error),
}

pub type Result<T> = std::result::Result<T, DiagError>;
