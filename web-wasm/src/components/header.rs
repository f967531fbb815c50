//! ヘッダーコンポーネント（タブ切り替え）

use leptos::prelude::*;
use crate::app::Tab;

#[component]
pub fn Header(tab: ReadSignal<Tab>, set_tab: WriteSignal<Tab>) -> impl IntoView {
    view! {
        <header class="header">
            <h1>"☀ Solar Panel Diagnostics"</h1>
            <nav class="tabs">
                {Tab::ALL
                    .into_iter()
                    .map(move |t| {
                        view! {
                            <button
                                class=move || if tab.get() == t { "tab active" } else { "tab" }
                                on:click=move |_| set_tab.set(t)
                            >
                                {t.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
        </header>
    }
}
