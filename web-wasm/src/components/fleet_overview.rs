//! ダッシュボード（パネル一覧）

use leptos::prelude::*;
use solar_diag_common::fleet::sample_panels;
use solar_diag_common::{FleetSummary, PanelFilter, PanelRecord, UrgencyFilter};

const FAULT_OPTIONS: &[(&str, &str)] = &[
    ("", "All Faults"),
    ("crack", "Cracks"),
    ("dust", "Dust"),
    ("hotspot", "Hotspots"),
    ("shading", "Shading"),
];

const URGENCY_OPTIONS: &[(&str, &str)] = &[
    ("all", "All Urgency"),
    ("critical", "Critical"),
    ("warning", "Warning"),
    ("healthy", "Healthy"),
];

#[component]
pub fn FleetOverview() -> impl IntoView {
    let panels = StoredValue::new(sample_panels());
    let summary = panels.with_value(|p| FleetSummary::from_panels(p));
    let average_band = summary.average_band();

    let (fault, set_fault) = signal(String::new());
    let (urgency, set_urgency) = signal(UrgencyFilter::All);

    let visible = move || {
        let filter = PanelFilter {
            fault: Some(fault.get()).filter(|f| !f.is_empty()),
            urgency: urgency.get(),
        };
        panels.with_value(|p| filter.apply(p).into_iter().cloned().collect::<Vec<PanelRecord>>())
    };

    view! {
        <div class="dashboard">
            <div class="stats-grid">
                <div class="stat-card">
                    <span class="stat-value">{summary.total}</span>
                    <span class="stat-label">"Total Panels"</span>
                </div>
                <div class=format!("stat-card {}", average_band.css_class())>
                    <span class="stat-value">{format!("{}%", summary.average_health)}</span>
                    <span class="stat-label">"Avg Health Score"</span>
                </div>
                <div class="stat-card health-good">
                    <span class="stat-value">{summary.healthy}</span>
                    <span class="stat-label">"Healthy Panels"</span>
                </div>
                <div class="stat-card health-poor">
                    <span class="stat-value">{summary.need_attention}</span>
                    <span class="stat-label">"Need Attention"</span>
                </div>
            </div>

            <div class="filters">
                <select on:change=move |ev| set_fault.set(event_target_value(&ev))>
                    {FAULT_OPTIONS
                        .iter()
                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                        .collect_view()}
                </select>
                <select on:change=move |ev| {
                    if let Ok(value) = event_target_value(&ev).parse::<UrgencyFilter>() {
                        set_urgency.set(value);
                    }
                }>
                    {URGENCY_OPTIONS
                        .iter()
                        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                        .collect_view()}
                </select>
            </div>

            <table class="panel-table">
                <thead>
                    <tr>
                        <th>"Panel"</th>
                        <th>"Location"</th>
                        <th>"Health"</th>
                        <th>"Status"</th>
                        <th>"Last Inspection"</th>
                        <th>"Next Maintenance"</th>
                        <th>"Faults"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        visible()
                            .into_iter()
                            .map(|panel| {
                                let band = panel.health_band();
                                let faults = if panel.faults.is_empty() {
                                    "-".to_string()
                                } else {
                                    panel.faults.join(", ")
                                };
                                view! {
                                    <tr>
                                        <td>{panel.id}</td>
                                        <td>{panel.location}</td>
                                        <td class=band.css_class()>{format!("{}%", panel.health_score)}</td>
                                        <td class=format!("status-{}", panel.status)>{panel.status.to_string()}</td>
                                        <td>{panel.last_inspection}</td>
                                        <td>{panel.next_maintenance}</td>
                                        <td>{faults}</td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </div>
    }
}
