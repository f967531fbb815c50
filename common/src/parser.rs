//! 解析バックエンドのレスポンスパーサー
//!
//! レスポンス本文からJSONオブジェクトを抽出し、AnalysisResultにする。
//! 推論サービスによっては説明文やコードブロックで包んで返すので寛容に扱う。

use crate::error::{Error, Result};
use crate::types::AnalysisResult;

/// レスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use solar_diag_common::extract_json;
///
/// let response = "result: {\"healthScore\": 80}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"healthScore\": 80}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 解析レスポンスをパース
///
/// 健全度・信頼度の範囲チェックもここで行われる。
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("解析結果 JSONパースエラー: {}", e)))
}
