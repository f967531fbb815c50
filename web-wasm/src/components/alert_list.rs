//! アラート一覧

use leptos::prelude::*;
use solar_diag_common::alerts::AlertTone;
use solar_diag_common::{AlertBoard, AlertStatus};

fn tone_class(tone: AlertTone) -> &'static str {
    match tone {
        AlertTone::Danger => "alert alert-danger",
        AlertTone::Caution => "alert alert-caution",
        AlertTone::Notice => "alert alert-notice",
        AlertTone::Ok => "alert alert-ok",
        AlertTone::Muted => "alert alert-muted",
    }
}

/// ブラウザのローカル日付 "YYYY-MM-DD"
fn today() -> String {
    let now = js_sys::Date::new_0();
    format!("{:04}-{:02}-{:02}", now.get_full_year(), now.get_month() + 1, now.get_date())
}

#[component]
pub fn AlertList(board: RwSignal<AlertBoard>) -> impl IntoView {
    let day = StoredValue::new(today());
    let summary = move || day.with_value(|d| board.with(|b| b.summary(d)));

    view! {
        <div class="alerts">
            <div class="stats-grid">
                <div class="stat-card health-poor">
                    <span class="stat-value">{move || summary().active}</span>
                    <span class="stat-label">"Active Alerts"</span>
                </div>
                <div class="stat-card health-poor">
                    <span class="stat-value">{move || summary().critical_active}</span>
                    <span class="stat-label">"Critical Issues"</span>
                </div>
                <div class="stat-card health-good">
                    <span class="stat-value">{move || summary().resolved_on_day}</span>
                    <span class="stat-label">"Resolved Today"</span>
                </div>
            </div>

            <div class="alert-timeline">
                {move || {
                    board
                        .with(|b| b.alerts().to_vec())
                        .into_iter()
                        .map(|alert| {
                            let id = alert.id;
                            let is_active = alert.status == AlertStatus::Active;
                            view! {
                                <div class=tone_class(alert.tone())>
                                    <div class="alert-header">
                                        <strong>{format!("{} - {}", alert.panel, alert.location)}</strong>
                                        <span class="alert-time">{alert.timestamp.clone()}</span>
                                    </div>
                                    <p>{alert.issue.clone()}</p>
                                    <button
                                        class="btn btn-small"
                                        hidden=!is_active
                                        on:click=move |_| {
                                            board.update(|b| {
                                                b.mark_resolved(id);
                                            });
                                        }
                                    >
                                        "Mark Resolved"
                                    </button>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}
