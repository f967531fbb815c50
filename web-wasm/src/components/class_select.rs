//! 画像種別セレクト

use leptos::prelude::*;
use solar_diag_common::ImageClass;

#[component]
pub fn ImageClassSelect<F>(selected: Signal<Option<ImageClass>>, on_select: F) -> impl IntoView
where
    F: Fn(ImageClass) + Send + Sync + 'static,
{
    view! {
        <div class="form-group">
            <label for="image-class">"Image Type"</label>
            <select
                id="image-class"
                on:change=move |ev| {
                    if let Ok(class) = event_target_value(&ev).parse::<ImageClass>() {
                        on_select(class);
                    }
                }
            >
                <option value="" disabled=true selected=move || selected.get().is_none()>
                    "Select image type..."
                </option>
                {ImageClass::ALL
                    .into_iter()
                    .map(move |class| {
                        view! {
                            <option
                                value=class.as_str()
                                selected=move || selected.get() == Some(class)
                            >
                                {class.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}
