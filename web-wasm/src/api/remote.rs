//! 推論サービス連携（fetch）
//!
//! CLIのHTTPバックエンドと同じJSON本文を送る。

use solar_diag_common::{parse_analysis_response, AnalysisError, AnalysisRequest, AnalysisResult, AnalyzePayload};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub async fn analyze(endpoint: &str, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
    let body = serde_json::to_string(&AnalyzePayload::from_request(request))
        .map_err(|e| AnalysisError::BackendRejected(e.to_string()))?;

    let (status, text) = post_json(endpoint, &body)
        .await
        .map_err(|e| AnalysisError::BackendUnavailable(js_error(e)))?;

    if status >= 500 {
        return Err(AnalysisError::BackendUnavailable(format!("HTTP {}", status)));
    }
    if !(200..300).contains(&status) {
        return Err(AnalysisError::BackendRejected(format!("HTTP {}: {}", status, text.trim())));
    }

    parse_analysis_response(&text).map_err(|e| AnalysisError::BackendRejected(e.to_string()))
}

/// POSTしてステータスと本文を返す（ネットワークエラーのみErr）
async fn post_json(url: &str, body: &str) -> Result<(u16, String), JsValue> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window が取得できません"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let text = JsFuture::from(resp.text()?).await?;
    Ok((resp.status(), text.as_string().unwrap_or_default()))
}
