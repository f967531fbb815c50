//! 設定パネルコンポーネント

use leptos::prelude::*;

#[component]
pub fn SettingsPanel(
    endpoint: ReadSignal<String>,
    set_endpoint: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="settings-panel">
            <div class="form-group">
                <label for="endpoint">"Analysis Endpoint"</label>
                <input
                    type="url"
                    id="endpoint"
                    placeholder="空欄ならモック解析"
                    prop:value=move || endpoint.get()
                    on:input=move |ev| {
                        set_endpoint.set(event_target_value(&ev));
                    }
                />
            </div>
        </div>
    }
}
