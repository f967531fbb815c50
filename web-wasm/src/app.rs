//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::api;
use crate::components::{
    alert_list::AlertList,
    analyze_controls::AnalyzeControls,
    class_select::ImageClassSelect,
    fleet_overview::FleetOverview,
    header::Header,
    result_panel::ResultPanel,
    settings_panel::SettingsPanel,
    upload_area::{LoadedImage, UploadArea},
};
use solar_diag_common::{AlertBoard, AnalysisError, AnalysisRequest, ImageClass, UploadSession};

/// 表示中のタブ
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Dashboard,
    Alerts,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Upload, Tab::Dashboard, Tab::Alerts];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Upload => "Upload & Analyze",
            Tab::Dashboard => "Dashboard",
            Tab::Alerts => "Alerts",
        }
    }
}

fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (tab, set_tab) = signal(Tab::Upload);
    let session = RwSignal::new(UploadSession::new());
    let (preview_url, set_preview_url) = signal(Option::<String>::None);
    let (upload_error, set_upload_error) = signal(Option::<String>::None);
    let (endpoint, set_endpoint) = signal(String::new());
    let alerts = RwSignal::new(AlertBoard::with_samples());

    // ドロップ・ファイル選択の共通受け口
    let on_file_loaded = move |loaded: Result<LoadedImage, AnalysisError>| match loaded {
        Ok(LoadedImage { selection, preview_url }) => {
            set_upload_error.set(None);
            set_preview_url.set(Some(preview_url));
            session.update(|s| {
                s.select_file(selection);
            });
        }
        Err(e) => set_upload_error.set(Some(e.to_string())),
    };

    let on_class_selected = move |class: ImageClass| {
        session.update(|s| s.select_image_class(class));
    };

    // 応答はリクエストIDが解析中のものと一致するときだけ反映される
    let dispatch = move |request: AnalysisRequest| {
        let endpoint = endpoint.get_untracked();
        spawn_local(async move {
            let id = request.id;
            let outcome = api::analyze(&endpoint, &request).await;
            if let Err(e) = &outcome {
                log(&format!("解析失敗 {}: {}", id, e));
            }
            let applied = session.try_update(|s| s.resolve(id, outcome)).unwrap_or(false);
            if !applied {
                log(&format!("取り消し済みリクエストの応答を破棄 {}", id));
            }
        });
    };

    let on_analyze = move |_: ()| match session.try_update(|s| s.submit()) {
        Some(Ok(request)) => dispatch(request),
        Some(Err(e)) => log(&e.to_string()),
        None => {}
    };

    let on_retry = move |_: ()| match session.try_update(|s| s.retry()) {
        Some(Ok(request)) => dispatch(request),
        Some(Err(e)) => log(&e.to_string()),
        None => {}
    };

    let on_cancel = move |_: ()| {
        if let Some(id) = session.try_update(|s| s.cancel()).flatten() {
            log(&format!("解析をキャンセルしました {}", id));
        }
    };

    let on_dismiss = move |_: ()| {
        session.update(|s| {
            s.dismiss();
        });
    };

    let can_submit = Signal::derive(move || session.with(|s| s.can_submit()));
    let phase = Signal::derive(move || session.with(|s| s.kind()));
    let selected_class = Signal::derive(move || session.with(|s| s.image_class()));

    view! {
        <div class="container">
            <Header tab=tab set_tab=set_tab />

            {move || match tab.get() {
                Tab::Upload => view! {
                    <div class="upload-page">
                        <section class="upload-section">
                            <SettingsPanel endpoint=endpoint set_endpoint=set_endpoint />

                            <UploadArea on_file_loaded=on_file_loaded />

                            <div class="selection-info">
                                {move || session.with(|s| {
                                    s.selection().map(|sel| {
                                        view! {
                                            <p class="selected-file">
                                                {format!("{} ({})", sel.file_name, sel.size_mb_label())}
                                            </p>
                                        }
                                    })
                                })}
                                {move || preview_url.get().map(|url| view! {
                                    <img class="preview" src=url alt="selected panel" />
                                })}
                                {move || upload_error.get().map(|e| view! {
                                    <p class="error">{e}</p>
                                })}
                            </div>

                            <ImageClassSelect selected=selected_class on_select=on_class_selected />

                            <AnalyzeControls
                                can_submit=can_submit
                                phase=phase
                                on_analyze=on_analyze
                                on_cancel=on_cancel
                                on_retry=on_retry
                                on_dismiss=on_dismiss
                            />
                        </section>

                        <ResultPanel session=session />
                    </div>
                }
                .into_any(),
                Tab::Dashboard => view! { <FleetOverview /> }.into_any(),
                Tab::Alerts => view! { <AlertList board=alerts /> }.into_any(),
            }}
        </div>
    }
}
