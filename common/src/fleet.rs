//! ソーラーファームのパネル一覧（ダッシュボード）
//!
//! 点検データはサンプル固定値。集計とフィルタのみ持つ。

use crate::health::HealthBand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    Healthy,
    Good,
    Warning,
    Critical,
}

impl PanelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelStatus::Healthy => "healthy",
            PanelStatus::Good => "good",
            PanelStatus::Warning => "warning",
            PanelStatus::Critical => "critical",
        }
    }

    /// healthy と good はまとめて「正常」扱い
    pub fn is_healthy(&self) -> bool {
        matches!(self, PanelStatus::Healthy | PanelStatus::Good)
    }
}

impl fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRecord {
    pub id: String,
    pub location: String,
    pub health_score: u8,
    pub last_inspection: String,
    pub next_maintenance: String,
    pub faults: Vec<String>,
    pub status: PanelStatus,
}

fn panel(
    id: &str,
    location: &str,
    health_score: u8,
    last_inspection: &str,
    next_maintenance: &str,
    faults: &[&str],
    status: PanelStatus,
) -> PanelRecord {
    PanelRecord {
        id: id.to_string(),
        location: location.to_string(),
        health_score,
        last_inspection: last_inspection.to_string(),
        next_maintenance: next_maintenance.to_string(),
        faults: faults.iter().map(|f| f.to_string()).collect(),
        status,
    }
}

impl PanelRecord {
    pub fn health_band(&self) -> HealthBand {
        HealthBand::for_fleet_average(self.health_score)
    }
}

/// サンプルのパネル一覧
pub fn sample_panels() -> Vec<PanelRecord> {
    vec![
        panel("P001", "Section A-1", 95, "2024-01-08", "2024-02-15", &[], PanelStatus::Healthy),
        panel("P002", "Section A-2", 78, "2024-01-07", "2024-01-20", &["Dust"], PanelStatus::Warning),
        panel("P003", "Section B-1", 45, "2024-01-06", "2024-01-12", &["Crack", "Hotspot"], PanelStatus::Critical),
        panel("P004", "Section B-2", 82, "2024-01-08", "2024-02-10", &["Minor dust"], PanelStatus::Good),
        panel("P005", "Section C-1", 91, "2024-01-08", "2024-02-20", &[], PanelStatus::Healthy),
        panel("P006", "Section C-2", 62, "2024-01-05", "2024-01-18", &["Dust", "Shading"], PanelStatus::Warning),
    ]
}

/// 緊急度フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrgencyFilter {
    #[default]
    All,
    Critical,
    Warning,
    Healthy,
}

impl FromStr for UrgencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(UrgencyFilter::All),
            "critical" => Ok(UrgencyFilter::Critical),
            "warning" => Ok(UrgencyFilter::Warning),
            "healthy" => Ok(UrgencyFilter::Healthy),
            _ => Err(format!("Unknown urgency: {}. Use all, critical, warning, or healthy", s)),
        }
    }
}

impl UrgencyFilter {
    fn matches(&self, status: PanelStatus) -> bool {
        match self {
            UrgencyFilter::All => true,
            UrgencyFilter::Critical => status == PanelStatus::Critical,
            UrgencyFilter::Warning => status == PanelStatus::Warning,
            UrgencyFilter::Healthy => status.is_healthy(),
        }
    }
}

/// パネル一覧のフィルタ条件
#[derive(Debug, Clone, Default)]
pub struct PanelFilter {
    /// 故障名の部分一致（大文字小文字を区別しない）
    pub fault: Option<String>,
    pub urgency: UrgencyFilter,
}

impl PanelFilter {
    pub fn matches(&self, panel: &PanelRecord) -> bool {
        if let Some(fault) = &self.fault {
            let needle = fault.to_lowercase();
            if !panel.faults.iter().any(|f| f.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        self.urgency.matches(panel.status)
    }

    pub fn apply<'a>(&self, panels: &'a [PanelRecord]) -> Vec<&'a PanelRecord> {
        panels.iter().filter(|p| self.matches(p)).collect()
    }
}

/// ダッシュボードの集計値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: usize,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
    /// 要対応（warning + critical）
    pub need_attention: usize,
    pub average_health: u8,
}

impl FleetSummary {
    pub fn from_panels(panels: &[PanelRecord]) -> Self {
        let count = |status: PanelStatus| panels.iter().filter(|p| p.status == status).count();
        let total = panels.len();
        let average_health = if total == 0 {
            0
        } else {
            let sum: u32 = panels.iter().map(|p| p.health_score as u32).sum();
            (sum as f64 / total as f64).round() as u8
        };

        let warning = count(PanelStatus::Warning);
        let critical = count(PanelStatus::Critical);

        Self {
            total,
            healthy: panels.iter().filter(|p| p.status.is_healthy()).count(),
            warning,
            critical,
            need_attention: warning + critical,
            average_health,
        }
    }

    pub fn average_band(&self) -> HealthBand {
        HealthBand::for_fleet_average(self.average_health)
    }
}
