use super::AnalysisBackend;
use async_trait::async_trait;
use rand::Rng;
use solar_diag_common::analyzer::MOCK_SCORE_RANGE;
use solar_diag_common::{sample_result, AnalysisError, AnalysisRequest, AnalysisResult};
use std::time::Duration;

/// 推論サービスの代わりに固定時間待ってサンプル結果を返す
#[derive(Debug, Clone)]
pub struct MockBackend {
    delay: Duration,
    fixed_score: Option<u8>,
}

impl MockBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fixed_score: None }
    }

    /// 健全度を固定する（テスト・デモ用）
    pub fn with_score(mut self, score: u8) -> Self {
        self.fixed_score = Some(score);
        self
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!(
            request = %request.id,
            file = %request.selection.file_name,
            class = %request.image_class,
            delay_ms = self.delay.as_millis() as u64,
            "モック解析開始"
        );
        tokio::time::sleep(self.delay).await;

        let score = self
            .fixed_score
            .unwrap_or_else(|| rand::rng().random_range(MOCK_SCORE_RANGE));
        Ok(sample_result(score))
    }
}
