//! HTTP推論サービス連携
//!
//! 画像をBase64でJSONに載せてPOSTし、応答JSONをAnalysisResultにする。
//! 本文の形は `solar_diag_common::payload` を参照。

use super::AnalysisBackend;
use crate::error::{DiagError, Result};
use async_trait::async_trait;
use solar_diag_common::{parse_analysis_response, AnalysisError, AnalysisRequest, AnalysisResult, AnalyzePayload};
use std::time::Duration;

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiagError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self { client, endpoint, api_key })
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> std::result::Result<AnalysisResult, AnalysisError> {
        let payload = AnalyzePayload::from_request(request);
        tracing::debug!(
            request = %request.id,
            endpoint = %self.endpoint,
            bytes = request.selection.byte_size,
            "解析リクエスト送信"
        );

        let mut builder = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AnalysisError::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::BackendUnavailable(e.to_string()))?;

        if status.is_server_error() {
            tracing::warn!(%status, "推論サービスがエラーを返しました");
            return Err(AnalysisError::BackendUnavailable(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(AnalysisError::BackendRejected(format!("HTTP {}: {}", status, body.trim())));
        }

        parse_analysis_response(&body).map_err(|e| AnalysisError::BackendRejected(e.to_string()))
    }
}
