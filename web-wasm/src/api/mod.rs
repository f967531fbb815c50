//! 解析バックエンド呼び出し
//!
//! エンドポイントが空ならブラウザ内のモック、入力されていれば推論サービスへPOST。

mod mock;
mod remote;

use futures::future::{select, Either};
use gloo::timers::future::TimeoutFuture;
use solar_diag_common::analyzer::BACKEND_TIMEOUT_SECS;
use solar_diag_common::{AnalysisError, AnalysisRequest, AnalysisResult};
use std::future::Future;
use std::time::Duration;

pub async fn analyze(endpoint: &str, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        mock::analyze(request).await
    } else {
        with_deadline(
            remote::analyze(endpoint, request),
            Duration::from_secs(BACKEND_TIMEOUT_SECS),
        )
        .await
    }
}

/// 期限内に応答が無ければ BackendUnavailable
async fn with_deadline<F>(call: F, timeout: Duration) -> Result<AnalysisResult, AnalysisError>
where
    F: Future<Output = Result<AnalysisResult, AnalysisError>>,
{
    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let call = Box::pin(call);
    let timer = TimeoutFuture::new(millis);

    match select(call, timer).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(AnalysisError::BackendUnavailable(format!(
            "no response within {:?}",
            timeout
        ))),
    }
}
