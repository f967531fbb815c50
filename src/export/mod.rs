//! レポート出力（CLI版）
//!
//! Excelの中身は共通ライブラリで生成し、ここではファイルへの書き出しだけを行う。

use crate::error::{DiagError, Result};
use solar_diag_common::export::excel_core;
use solar_diag_common::{PanelRecord, ReportEntry};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Excel,
}

impl ReportFormat {
    /// 拡張子から判定（.xlsx 以外はJSON）
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ReportFormat::Excel,
            _ => ReportFormat::Json,
        }
    }
}

/// 出力先がフォルダ（または拡張子なし）なら既定のファイル名を付ける
pub fn resolve_output_path(output: &Path, default_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_name)
    } else {
        output.to_path_buf()
    }
}

pub fn write_report(entries: &[ReportEntry], output_path: &Path) -> Result<ReportFormat> {
    let format = ReportFormat::from_path(output_path);
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(entries)?;
            std::fs::write(output_path, json)?;
        }
        ReportFormat::Excel => {
            let buffer = excel_core::generate_report_buffer(entries, "Analysis")
                .map_err(DiagError::ExcelGeneration)?;
            std::fs::write(output_path, buffer)?;
        }
    }
    Ok(format)
}

pub fn write_fleet_excel(panels: &[&PanelRecord], output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_fleet_buffer(panels).map_err(DiagError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
