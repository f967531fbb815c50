//! 解析結果の生成ヘルパー
//!
//! 推論バックエンドが無い環境で使う固定サンプル結果。
//! CLIのMockBackendとWebのモック解析が同じ値を返すようにここに置く。

use crate::types::AnalysisResult;
use std::ops::RangeInclusive;

/// モック解析の待ち時間（ミリ秒）
pub const MOCK_DELAY_MS: u64 = 3000;

/// バックエンド呼び出しの既定タイムアウト（秒）
pub const BACKEND_TIMEOUT_SECS: u64 = 30;

/// モック健全度の範囲
pub const MOCK_SCORE_RANGE: RangeInclusive<u8> = 60..=99;

pub const MOCK_CONFIDENCE: u8 = 92;

pub const MOCK_FAULTS: &[&str] = &["Dust buildup", "Minor hotspot"];

pub const MOCK_RECOMMENDATIONS: &[&str] = &["Clean panel surface", "Monitor temperature"];

/// 指定した健全度でサンプル結果を作る
///
/// 範囲外のスコアは0-100に丸める。
pub fn sample_result(health_score: u8) -> AnalysisResult {
    let score = health_score.min(crate::types::SCORE_MAX);
    AnalysisResult::new(
        score as i64,
        MOCK_FAULTS.iter().map(|s| s.to_string()).collect(),
        MOCK_CONFIDENCE as i64,
        MOCK_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap_or_else(|_| unreachable!("score clamped to 0..=100"))
}

/// [0, 1) の一様乱数から健全度を作る（`Math.random()` 用）
pub fn mock_score_from_unit(unit: f64) -> u8 {
    let start = *MOCK_SCORE_RANGE.start();
    let span = (*MOCK_SCORE_RANGE.end() - start) as f64 + 1.0;
    let offset = (unit.clamp(0.0, 1.0) * span).floor() as u8;
    (start + offset).min(*MOCK_SCORE_RANGE.end())
}
