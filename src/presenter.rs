//! 端末向けの結果表示
//!
//! 文字列を組み立てて返すだけで、出力は呼び出し側が行う。

use solar_diag_common::alerts::{AlertPriority, AlertTone};
use solar_diag_common::{
    AlertBoard, AnalysisError, AnalysisResult, FleetSummary, HealthBand, ImageClass, PanelRecord,
    UploadSelection,
};
use std::fmt::Write;

pub const EMPTY_RESULT_MESSAGE: &str = "Upload an image and select type to see analysis results";

pub fn render_selection(selection: &UploadSelection, image_class: Option<ImageClass>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Selected: {}", selection.file_name);
    let _ = writeln!(out, "  Size: {}", selection.size_mb_label());
    if let Some(captured_at) = &selection.captured_at {
        let _ = writeln!(out, "  Captured: {}", captured_at);
    }
    let class_label = image_class.map(|c| c.label()).unwrap_or("-");
    let _ = write!(out, "  Image Type: {}", class_label);
    out
}

/// 解析結果（無ければ空状態メッセージ）
pub fn render_result(result: Option<&AnalysisResult>) -> String {
    let Some(result) = result else {
        return EMPTY_RESULT_MESSAGE.to_string();
    };

    let band = HealthBand::for_score(result.health_score());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Health Score: {}% ({})",
        band.marker(),
        result.health_score(),
        band.label()
    );

    let _ = writeln!(out, "\n⚠ Faults Detected");
    if result.faults().is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for fault in result.faults() {
        let _ = writeln!(out, "  [{}]", fault);
    }

    let _ = writeln!(out, "\n✔ Confidence: {}%", result.confidence());

    let _ = writeln!(out, "\nRecommendations");
    for rec in result.recommendations() {
        let _ = writeln!(out, "  • {}", rec);
    }

    out.trim_end().to_string()
}

pub fn render_failure(error: &AnalysisError) -> String {
    let hint = if error.is_retryable() {
        "再試行できます"
    } else {
        "入力を確認してください"
    };
    format!("✖ 解析失敗: {}（{}）", error, hint)
}

pub fn render_fleet(summary: &FleetSummary, panels: &[&PanelRecord]) -> String {
    let mut out = String::new();
    let band = summary.average_band();
    let _ = writeln!(out, "Total Panels:     {}", summary.total);
    let _ = writeln!(out, "Avg Health Score: {} {}%", band.marker(), summary.average_health);
    let _ = writeln!(out, "Healthy Panels:   {}", summary.healthy);
    let _ = writeln!(out, "Warning:          {}", summary.warning);
    let _ = writeln!(out, "Critical:         {}", summary.critical);
    let _ = writeln!(out, "Need Attention:   {}", summary.need_attention);
    let _ = writeln!(out);

    if panels.is_empty() {
        let _ = writeln!(out, "該当するパネルはありません");
    }
    for panel in panels {
        let faults = if panel.faults.is_empty() {
            "-".to_string()
        } else {
            panel.faults.join(", ")
        };
        let _ = writeln!(
            out,
            "{} {:<5} {:<12} {:>3}% {:<9} next: {}  faults: {}",
            panel.health_band().marker(),
            panel.id,
            panel.location,
            panel.health_score,
            panel.status,
            panel.next_maintenance,
            faults
        );
    }
    out.trim_end().to_string()
}

fn tone_marker(tone: AlertTone) -> &'static str {
    match tone {
        AlertTone::Danger => "🔴",
        AlertTone::Caution => "🟡",
        AlertTone::Notice => "🔵",
        AlertTone::Ok => "🟢",
        AlertTone::Muted => "⚪",
    }
}

fn priority_label(priority: AlertPriority) -> &'static str {
    match priority {
        AlertPriority::Urgent => "urgent",
        AlertPriority::Medium => "medium",
        AlertPriority::Low => "low",
        AlertPriority::Info => "info",
    }
}

pub fn render_alerts(board: &AlertBoard, day: &str) -> String {
    let summary = board.summary(day);
    let mut out = String::new();
    let _ = writeln!(out, "Active Alerts:   {}", summary.active);
    let _ = writeln!(out, "Critical Issues: {}", summary.critical_active);
    let _ = writeln!(out, "Resolved ({}): {}", day, summary.resolved_on_day);
    let _ = writeln!(out);

    for alert in board.alerts() {
        let _ = writeln!(
            out,
            "{} #{} {} {} [{} / {:?}]",
            tone_marker(alert.tone()),
            alert.id,
            alert.panel,
            alert.location,
            priority_label(alert.priority),
            alert.status,
        );
        let _ = writeln!(out, "    {}", alert.issue);
        let _ = writeln!(out, "    {}", alert.timestamp);
    }
    out.trim_end().to_string()
}
