//! Excel生成（共通ライブラリ）
//!
//! 一括解析レポートとパネル一覧を1シートの表として書き出す

use super::ReportEntry;
use crate::fleet::PanelRecord;
use rust_xlsxwriter::*;

/// セル値
enum Cell {
    Text(String),
    Number(f64),
}

/// ヘッダー付きの表をシートに書き込む
fn write_table(
    worksheet: &mut Worksheet,
    headers: &[(&str, f64)],
    rows: &[Vec<Cell>],
) -> Result<(), String> {
    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(11.0)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    for (col, (label, width)) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet.write_string_with_format(0, col, *label, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => worksheet.write_string_with_format(row_num, col, text, &value_format),
                Cell::Number(n) => worksheet.write_number_with_format(row_num, col, *n, &value_format),
            }
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    Ok(())
}

/// 一括解析レポートをバッファに生成
pub fn generate_report_buffer(entries: &[ReportEntry], sheet_name: &str) -> Result<Vec<u8>, String> {
    let headers = [
        ("File", 28.0),
        ("Image Type", 12.0),
        ("Health Score", 12.0),
        ("Band", 8.0),
        ("Confidence", 11.0),
        ("Faults", 32.0),
        ("Recommendations", 40.0),
    ];

    let rows: Vec<Vec<Cell>> = entries
        .iter()
        .map(|entry| {
            vec![
                Cell::Text(entry.file_name.clone()),
                Cell::Text(entry.image_class.to_string()),
                Cell::Number(entry.result.health_score() as f64),
                Cell::Text(entry.health_band.label().to_string()),
                Cell::Number(entry.result.confidence() as f64),
                Cell::Text(entry.result.faults().join(", ")),
                Cell::Text(entry.result.recommendations().join(", ")),
            ]
        })
        .collect();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_table(worksheet, &headers, &rows)?;

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// パネル一覧をバッファに生成
pub fn generate_fleet_buffer(panels: &[&PanelRecord]) -> Result<Vec<u8>, String> {
    let headers = [
        ("Panel", 8.0),
        ("Location", 14.0),
        ("Health Score", 12.0),
        ("Status", 10.0),
        ("Last Inspection", 15.0),
        ("Next Maintenance", 17.0),
        ("Faults", 28.0),
    ];

    let rows: Vec<Vec<Cell>> = panels
        .iter()
        .map(|panel| {
            vec![
                Cell::Text(panel.id.clone()),
                Cell::Text(panel.location.clone()),
                Cell::Number(panel.health_score as f64),
                Cell::Text(panel.status.to_string()),
                Cell::Text(panel.last_inspection.clone()),
                Cell::Text(panel.next_maintenance.clone()),
                Cell::Text(if panel.faults.is_empty() { "-".to_string() } else { panel.faults.join(", ") }),
            ]
        })
        .collect();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Fleet")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_table(worksheet, &headers, &rows)?;

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::sample_result;
    use crate::fleet::sample_panels;
    use crate::types::ImageClass;

    #[test]
    fn test_report_buffer_is_xlsx() {
        let entries = vec![
            ReportEntry::new("a.jpg", ImageClass::Rgb, sample_result(81)),
            ReportEntry::new("b.jpg", ImageClass::Thermal, sample_result(55)),
        ];
        let buffer = generate_report_buffer(&entries, "Analysis").unwrap();
        // xlsx は zip コンテナ
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_fleet_buffer_is_xlsx() {
        let panels = sample_panels();
        let refs: Vec<&PanelRecord> = panels.iter().collect();
        let buffer = generate_fleet_buffer(&refs).unwrap();
        assert_eq!(&buffer[..2], b"PK");
    }
}
