//! レポート出力の共通部分
//!
//! 行データの型と、feature `excel` 有効時のExcel生成。

use crate::health::HealthBand;
use crate::types::{AnalysisResult, ImageClass};
use serde::Serialize;

#[cfg(feature = "excel")]
pub mod excel_core;

/// 一括解析レポートの1行
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub file_name: String,
    pub image_class: ImageClass,
    pub health_band: HealthBand,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl ReportEntry {
    pub fn new(file_name: impl Into<String>, image_class: ImageClass, result: AnalysisResult) -> Self {
        Self {
            file_name: file_name.into(),
            image_class,
            health_band: HealthBand::for_score(result.health_score()),
            result,
        }
    }
}
