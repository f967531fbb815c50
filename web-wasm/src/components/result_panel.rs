//! 解析結果パネル

use leptos::prelude::*;
use solar_diag_common::{AnalysisPhase, AnalysisResult, HealthBand, UploadSession};

#[component]
pub fn ResultPanel(session: RwSignal<UploadSession>) -> impl IntoView {
    view! {
        <div class="result-panel">
            <h2>"Analysis Results"</h2>
            {move || session.with(|s| match s.phase() {
                AnalysisPhase::Idle => view! {
                    <p class="text-muted empty-state">
                        "Upload an image and select type to see analysis results"
                    </p>
                }
                .into_any(),
                AnalysisPhase::Pending(request) => view! {
                    <div class="analyzing">
                        <div class="spinner"></div>
                        <p>{format!("Analyzing {}...", request.selection.file_name)}</p>
                    </div>
                }
                .into_any(),
                AnalysisPhase::Complete { result, .. } => result_view(result).into_any(),
                AnalysisPhase::Failed { error, .. } => {
                    let hint = if error.is_retryable() {
                        "Retry をクリックすると同じ画像で再解析します"
                    } else {
                        "画像や種別を確認してもう一度解析してください"
                    };
                    view! {
                        <div class="failure">
                            <p class="error">{error.to_string()}</p>
                            <p class="text-muted">{hint}</p>
                        </div>
                    }
                    .into_any()
                }
            })}
        </div>
    }
}

fn result_view(result: &AnalysisResult) -> impl IntoView {
    let band = HealthBand::for_score(result.health_score());
    let score = result.health_score();
    let confidence = result.confidence();
    let faults = result.faults().to_vec();
    let recommendations = result.recommendations().to_vec();

    view! {
        <div class="result">
            <div class=format!("health-score {}", band.css_class())>
                <span class="score">{format!("{}%", score)}</span>
                <span class="label">"Health Score"</span>
            </div>

            <h3>"Faults Detected"</h3>
            <div class="fault-tags">
                {faults
                    .into_iter()
                    .map(|fault| view! { <span class="fault-tag">{fault}</span> })
                    .collect_view()}
            </div>

            <h3>"Confidence"</h3>
            <div class="confidence-bar">
                <div class="confidence-fill" style=format!("width: {}%", confidence)></div>
            </div>
            <p class="confidence-text">{format!("{}%", confidence)}</p>

            <h3>"Recommendations"</h3>
            <ul class="recommendations">
                {recommendations
                    .into_iter()
                    .map(|rec| view! { <li>{rec}</li> })
                    .collect_view()}
            </ul>
        </div>
    }
}
