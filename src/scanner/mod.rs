mod exif;

use crate::error::{DiagError, Result};
use solar_diag_common::types::{has_image_extension, mb_to_bytes};
use solar_diag_common::{AnalysisError, UploadSelection};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

/// 画像ファイルを読み込んで選択を作る
///
/// 拡張子・中身（マジックバイト）・サイズ上限を確認する。
pub fn load_selection(path: &Path, max_file_size_mb: u64) -> Result<UploadSelection> {
    if !path.is_file() {
        return Err(DiagError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let metadata = std::fs::metadata(path)?;
    if metadata.len() > mb_to_bytes(max_file_size_mb) {
        return Err(AnalysisError::UnsupportedFileType(format!(
            "{} ({:.2} MB > {} MB)",
            file_name,
            metadata.len() as f64 / 1024.0 / 1024.0,
            max_file_size_mb
        ))
        .into());
    }

    let payload = std::fs::read(path)?;
    if image::guess_format(&payload).is_err() {
        tracing::debug!(file = %file_name, "画像フォーマットを判別できません");
        return Err(AnalysisError::UnsupportedFileType(file_name).into());
    }

    let captured_at = exif::extract_capture_time(path);
    let selection = UploadSelection::new(file_name, payload)?.with_captured_at(captured_at);
    selection.check_size_limit(max_file_size_mb)?;

    Ok(selection)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(DiagError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if has_image_extension(&file_name) {
            images.push(ImageInfo {
                path: path.to_path_buf(),
                file_name,
            });
        }
    }

    // パスでソート
    images.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(images)
}
