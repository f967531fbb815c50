//! ブラウザ内モック解析

use gloo::timers::future::TimeoutFuture;
use solar_diag_common::analyzer::MOCK_DELAY_MS;
use solar_diag_common::{mock_score_from_unit, sample_result, AnalysisError, AnalysisRequest, AnalysisResult};

pub async fn analyze(request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
    web_sys::console::log_1(
        &format!(
            "モック解析開始 {} {} ({})",
            request.id, request.selection.file_name, request.image_class
        )
        .into(),
    );
    TimeoutFuture::new(MOCK_DELAY_MS as u32).await;

    Ok(sample_result(mock_score_from_unit(js_sys::Math::random())))
}
