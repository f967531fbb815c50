use exif::{In, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 撮影日時を取得（DateTimeOriginal → DateTime の順）
///
/// EXIFが無い画像（PNG、サーマルカメラの書き出し等）では None。
pub fn extract_capture_time(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;

    [Tag::DateTimeOriginal, Tag::DateTime]
        .iter()
        .find_map(|tag| exif.get_field(*tag, In::PRIMARY))
        .map(|field| field.display_value().to_string())
}
