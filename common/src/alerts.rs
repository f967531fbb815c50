//! アラート一覧
//!
//! サンプルのアラートと、件数集計・解決済みマーク。永続化はしない。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Critical,
    Warning,
    Maintenance,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Urgent,
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Scheduled,
    Resolved,
}

/// 表示トーン（解決済みは種別に関係なく控えめに表示）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTone {
    Danger,
    Caution,
    Notice,
    Ok,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u32,
    pub kind: AlertKind,
    pub panel: String,
    pub location: String,
    pub issue: String,
    /// "YYYY-MM-DD HH:MM"
    pub timestamp: String,
    pub priority: AlertPriority,
    pub status: AlertStatus,
}

impl Alert {
    pub fn tone(&self) -> AlertTone {
        if self.status == AlertStatus::Resolved {
            return AlertTone::Muted;
        }
        match self.kind {
            AlertKind::Critical => AlertTone::Danger,
            AlertKind::Warning => AlertTone::Caution,
            AlertKind::Maintenance => AlertTone::Notice,
            AlertKind::Info => AlertTone::Ok,
        }
    }

    /// タイムスタンプの日付部分
    pub fn date(&self) -> &str {
        self.timestamp.split_whitespace().next().unwrap_or("")
    }
}

/// サンプルのアラート一覧
pub fn sample_alerts() -> Vec<Alert> {
    let alert = |id, kind, panel: &str, location: &str, issue: &str, timestamp: &str, priority, status| Alert {
        id,
        kind,
        panel: panel.to_string(),
        location: location.to_string(),
        issue: issue.to_string(),
        timestamp: timestamp.to_string(),
        priority,
        status,
    };

    vec![
        alert(1, AlertKind::Critical, "P003", "Section B-1", "Major crack detected - 60% surface affected",
            "2024-01-09 14:30", AlertPriority::Urgent, AlertStatus::Active),
        alert(2, AlertKind::Warning, "P006", "Section C-2", "Significant dust buildup reducing efficiency by 15%",
            "2024-01-09 10:15", AlertPriority::Medium, AlertStatus::Active),
        alert(3, AlertKind::Maintenance, "P002", "Section A-2", "Scheduled maintenance due in 3 days",
            "2024-01-09 08:00", AlertPriority::Low, AlertStatus::Scheduled),
        alert(4, AlertKind::Critical, "P008", "Section D-1", "Hotspot detected - temperature 15°C above normal",
            "2024-01-08 16:45", AlertPriority::Urgent, AlertStatus::Resolved),
        alert(5, AlertKind::Info, "P001", "Section A-1", "Inspection completed - all systems normal",
            "2024-01-08 12:20", AlertPriority::Info, AlertStatus::Resolved),
    ]
}

/// アラート件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub active: usize,
    pub critical_active: usize,
    pub resolved_on_day: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
}

impl AlertBoard {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn with_samples() -> Self {
        Self::new(sample_alerts())
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// `day` ("YYYY-MM-DD") に解決された件数を含む集計
    pub fn summary(&self, day: &str) -> AlertSummary {
        let active = |a: &&Alert| a.status == AlertStatus::Active;
        AlertSummary {
            active: self.alerts.iter().filter(active).count(),
            critical_active: self
                .alerts
                .iter()
                .filter(active)
                .filter(|a| a.kind == AlertKind::Critical)
                .count(),
            resolved_on_day: self
                .alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Resolved && a.date() == day)
                .count(),
        }
    }

    /// アクティブなアラートを解決済みにする
    ///
    /// 対象が無い、またはアクティブでない場合は `false`。
    pub fn mark_resolved(&mut self, id: u32) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) if alert.status == AlertStatus::Active => {
                alert.status = AlertStatus::Resolved;
                true
            }
            _ => false,
        }
    }
}
