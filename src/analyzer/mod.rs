//! 解析バックエンド
//!
//! 画像とタグを受け取り、AnalysisResultを返す非同期インターフェース。
//! モック（固定待ち時間 + 乱数スコア）とHTTP推論サービスを差し替えられる。

mod controller;
mod http;
mod mock;

pub use controller::AnalysisController;
pub use http::HttpBackend;
pub use mock::MockBackend;

use crate::backend::BackendKind;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use solar_diag_common::{AnalysisError, AnalysisRequest, AnalysisResult};
use std::sync::Arc;

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(&self, request: &AnalysisRequest) -> std::result::Result<AnalysisResult, AnalysisError>;
}

/// 設定に従ってバックエンドを作る
pub fn build_backend(kind: BackendKind, config: &Config) -> Result<Arc<dyn AnalysisBackend>> {
    let backend: Arc<dyn AnalysisBackend> = match kind {
        BackendKind::Mock => Arc::new(MockBackend::new(config.mock_delay())),
        BackendKind::Http => Arc::new(HttpBackend::new(
            config.get_endpoint()?,
            config.get_api_key(),
            config.timeout(),
        )?),
    };
    tracing::debug!(backend = backend.name(), "解析バックエンドを初期化");
    Ok(backend)
}
