//! 推論サービスへのリクエスト本文
//!
//! CLIのHTTPバックエンドとWeb版のfetchで同じ形を使う。
//!
//! リクエスト: `{ requestId, fileName, imageClass, sha256, imageBase64 }`
//! レスポンス: `{ healthScore, faults, confidence, recommendations }`

use crate::types::{AnalysisRequest, ImageClass};
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload<'a> {
    pub request_id: u64,
    pub file_name: &'a str,
    pub image_class: ImageClass,
    pub sha256: String,
    pub image_base64: String,
}

impl<'a> AnalyzePayload<'a> {
    pub fn from_request(request: &'a AnalysisRequest) -> Self {
        let payload = &request.selection.payload;
        Self {
            request_id: request.id.0,
            file_name: &request.selection.file_name,
            image_class: request.image_class,
            sha256: hex::encode(Sha256::digest(payload)),
            image_base64: base64::engine::general_purpose::STANDARD.encode(payload),
        }
    }
}
