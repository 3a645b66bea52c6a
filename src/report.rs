//! 状态报告：把 `StatusRecord` 序列整理成表格
//!
//! 纯数据转换，不读写文件也不访问网络。

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use serde::Serialize;
use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

use crate::models::{OutcomeKind, StatusRecord};
use crate::utils::truncate_text;

const DETAIL_WIDTH: usize = 80;
const HEADERS: [&str; 4] = ["identifier", "outcome", "detail", "timestamp"];
const SHEET_NAME: &str = "ICRIS";
/// 成功为绿色、其余为红色
const PASSED_FILL: u32 = 0xC6EFCE;
const FAILED_FILL: u32 = 0xFFC7CE;

/// 报告中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub identifier: String,
    pub outcome: OutcomeKind,
    pub detail: String,
    pub timestamp: String,
}

/// 与输入顺序一致的结果表
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn build(records: &[StatusRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| ReportRow {
                identifier: record.identifier.to_string(),
                outcome: record.outcome.kind(),
                detail: record.outcome.detail(),
                timestamp: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.rows.iter().filter(|row| row.outcome == kind).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }

    /// 生成 Excel 工作簿（outcome 列按成功与否着色）
    pub fn to_xlsx(&self) -> Result<Vec<u8>, XlsxError> {
        let header = Format::new().set_bold();
        let passed = Format::new().set_background_color(Color::RGB(PASSED_FILL));
        let failed = Format::new().set_background_color(Color::RGB(FAILED_FILL));

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }
        for (idx, row) in self.rows.iter().enumerate() {
            let line = idx as u32 + 1;
            let fill = if row.outcome == OutcomeKind::Success {
                &passed
            } else {
                &failed
            };
            sheet.write_string(line, 0, &row.identifier)?;
            sheet.write_string_with_format(line, 1, row.outcome.to_string(), fill)?;
            sheet.write_string(line, 2, &row.detail)?;
            sheet.write_string(line, 3, &row.timestamp)?;
        }
        sheet.autofit();

        workbook.save_to_buffer()
    }

    fn cells(row: &ReportRow) -> [String; 4] {
        [
            row.identifier.clone(),
            row.outcome.to_string(),
            truncate_text(&row.detail, DETAIL_WIDTH),
            row.timestamp.clone(),
        ]
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body: Vec<[String; 4]> = self.rows.iter().map(Self::cells).collect();

        // 按终端显示宽度对齐，中文字符占两列
        let mut widths = HEADERS.map(|h| h.width());
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.width());
            }
        }

        let line = |f: &mut std::fmt::Formatter<'_>, cells: &[String]| -> std::fmt::Result {
            let padded: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| {
                    let pad = width - cell.width();
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())
        };

        let header = HEADERS.map(String::from);
        line(f, &header[..])?;
        writeln!(
            f,
            "{}",
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-")
        )?;
        for cells in &body {
            line(f, &cells[..])?;
        }
        Ok(())
    }
}
