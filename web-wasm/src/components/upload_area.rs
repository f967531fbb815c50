//! アップロードエリアコンポーネント
//!
//! ドロップとファイル選択ダイアログは同じ読み込み処理に合流する。
//! 複数ファイルが来た場合は先頭の1枚だけを使う。

use leptos::prelude::*;
use base64::Engine;
use solar_diag_common::types::{has_image_extension, mb_to_bytes, DEFAULT_MAX_FILE_SIZE_MB};
use solar_diag_common::{AnalysisError, UploadSelection};
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileList, FileReader};

/// 読み込んだ画像とプレビュー用のData URL
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub selection: UploadSelection,
    pub preview_url: String,
}

/// Data URLからBase64データ部分を抽出
///
/// `"data:image/jpeg;base64,/9j/4AAQ..."` → `"/9j/4AAQ..."`
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, data)| data)
}

/// Data URLを画像バイト列にして選択を作る
pub fn selection_from_data_url(file_name: &str, data_url: &str) -> Result<UploadSelection, AnalysisError> {
    let unsupported = || AnalysisError::UnsupportedFileType(file_name.to_string());

    let encoded = extract_base64_from_data_url(data_url).ok_or_else(unsupported)?;
    let payload = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| unsupported())?;

    let selection = UploadSelection::new(file_name, payload)?;
    selection.check_size_limit(DEFAULT_MAX_FILE_SIZE_MB)?;
    Ok(selection)
}

/// 読み込む前にファイル名とサイズだけで弾く
pub fn precheck_file(file_name: &str, byte_size: f64) -> Result<(), AnalysisError> {
    if !has_image_extension(file_name) {
        return Err(AnalysisError::UnsupportedFileType(file_name.to_string()));
    }
    let limit = mb_to_bytes(DEFAULT_MAX_FILE_SIZE_MB) as f64;
    if byte_size > limit {
        return Err(AnalysisError::UnsupportedFileType(format!(
            "{} ({:.2} MB > {} MB)",
            file_name,
            byte_size / 1024.0 / 1024.0,
            DEFAULT_MAX_FILE_SIZE_MB
        )));
    }
    Ok(())
}

#[component]
pub fn UploadArea<F>(on_file_loaded: F) -> impl IntoView
where
    F: Fn(Result<LoadedImage, AnalysisError>) + Clone + Send + Sync + 'static,
{
    let (is_dragover, set_is_dragover) = signal(false);

    let handle_files = move |files: FileList| {
        if let Some(file) = files.get(0) {
            read_file(file, on_file_loaded.clone());
        }
    };

    let on_drop = {
        let handle_files = handle_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                handle_files(files);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        input.set_type("file");
        input.set_accept("image/*");

        let handle_files = handle_files.clone();
        let picker = input.clone();
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(files) = picker.files() {
                handle_files(files);
            }
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
        input.click();
    };

    view! {
        <div
            class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <div class="upload-icon">"📷"</div>
            <p>"パネル画像をドラッグ&ドロップ または クリックして選択"</p>
            <p class="text-muted">"対応形式: JPEG, PNG, TIFF, WebP"</p>
        </div>
    }
}

fn read_file<F>(file: File, on_file_loaded: F)
where
    F: Fn(Result<LoadedImage, AnalysisError>) + 'static,
{
    let file_name = file.name();
    if let Err(e) = precheck_file(&file_name, file.size()) {
        on_file_loaded(Err(e));
        return;
    }

    let Ok(reader) = FileReader::new() else {
        web_sys::console::error_1(&"FileReader を作成できません".into());
        return;
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) else {
            on_file_loaded(Err(AnalysisError::UnsupportedFileType(file_name.clone())));
            return;
        };
        let loaded = selection_from_data_url(&file_name, &data_url)
            .map(|selection| LoadedImage { selection, preview_url: data_url });
        on_file_loaded(loaded);
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    let _ = reader.read_as_data_url(&file);
}
