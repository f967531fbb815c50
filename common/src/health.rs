//! 健全度スコアの色分け

use serde::{Deserialize, Serialize};

/// 健全度の3段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Good,
    Fair,
    Poor,
}

impl HealthBand {
    /// 解析結果の色分け（80以上 / 60以上 / それ未満）
    pub fn for_score(score: u8) -> Self {
        Self::with_thresholds(score, 80, 60)
    }

    /// ダッシュボードの色分け（85以上 / 70以上 / それ未満）
    ///
    /// 平均値カードと各パネルのスコアの両方に使う。
    pub fn for_fleet_average(score: u8) -> Self {
        Self::with_thresholds(score, 85, 70)
    }

    fn with_thresholds(score: u8, good: u8, fair: u8) -> Self {
        if score >= good {
            HealthBand::Good
        } else if score >= fair {
            HealthBand::Fair
        } else {
            HealthBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthBand::Good => "good",
            HealthBand::Fair => "fair",
            HealthBand::Poor => "poor",
        }
    }

    /// Web側のCSSクラス
    pub fn css_class(&self) -> &'static str {
        match self {
            HealthBand::Good => "health-good",
            HealthBand::Fair => "health-fair",
            HealthBand::Poor => "health-poor",
        }
    }

    /// 端末表示用マーカー
    pub fn marker(&self) -> &'static str {
        match self {
            HealthBand::Good => "🟢",
            HealthBand::Fair => "🟡",
            HealthBand::Poor => "🔴",
        }
    }
}
