//! 解析ボタン群（解析・キャンセル・再試行・クリア）

use leptos::prelude::*;
use solar_diag_common::PhaseKind;

#[component]
pub fn AnalyzeControls<FA, FC, FR, FD>(
    can_submit: Signal<bool>,
    phase: Signal<PhaseKind>,
    on_analyze: FA,
    on_cancel: FC,
    on_retry: FR,
    on_dismiss: FD,
) -> impl IntoView
where
    FA: Fn(()) + Send + Sync + 'static,
    FC: Fn(()) + Send + Sync + 'static,
    FR: Fn(()) + Send + Sync + 'static,
    FD: Fn(()) + Send + Sync + 'static,
{
    let is_pending = move || phase.get() == PhaseKind::Pending;

    view! {
        <div class="analyze-controls">
            <button
                class="btn btn-primary"
                disabled=move || !can_submit.get()
                on:click=move |_| on_analyze(())
            >
                {move || if is_pending() { "Analyzing..." } else { "Analyze Panel" }}
            </button>

            <button
                class="btn btn-secondary"
                hidden=move || !is_pending()
                on:click=move |_| on_cancel(())
            >
                "Cancel"
            </button>

            <button
                class="btn btn-secondary"
                hidden=move || phase.get() != PhaseKind::Failed
                on:click=move |_| on_retry(())
            >
                "Retry"
            </button>

            <button
                class="btn btn-tertiary"
                hidden=move || !phase.get().is_settled() || phase.get() == PhaseKind::Idle
                on:click=move |_| on_dismiss(())
            >
                "Clear"
            </button>
        </div>
    }
}
