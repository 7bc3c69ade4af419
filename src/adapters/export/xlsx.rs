use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use serde_json::Value;

use crate::domain::{Report, Sheet};
use crate::ports::{ExportError, ReportWriter};

/// Sheet written when the report has nothing in it; a workbook needs at least one
const EMPTY_SHEET_NAME: &str = "report";

impl From<XlsxError> for ExportError {
    fn from(err: XlsxError) -> Self {
        ExportError::Render(Box::new(err))
    }
}

/// Renders reports as `.xlsx` workbooks, one worksheet per sheet
#[derive(Debug, Clone, Default)]
pub struct XlsxReportWriter;

impl XlsxReportWriter {
    pub fn new() -> Self {
        Self
    }

    fn position(row: usize, col: usize) -> Result<(RowNum, ColNum), ExportError> {
        let row = RowNum::try_from(row).map_err(|e| ExportError::Render(Box::new(e)))?;
        let col = ColNum::try_from(col).map_err(|e| ExportError::Render(Box::new(e)))?;
        Ok((row, col))
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: RowNum,
        col: ColNum,
        value: &Value,
    ) -> Result<(), ExportError> {
        match value {
            Value::Null => {}
            Value::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            Value::Number(n) => match n.as_f64() {
                Some(f) => {
                    worksheet.write_number(row, col, f)?;
                }
                None => {
                    worksheet.write_string(row, col, n.to_string())?;
                }
            },
            Value::String(s) => {
                worksheet.write_string(row, col, s)?;
            }
            nested => {
                worksheet.write_string(row, col, nested.to_string())?;
            }
        }
        Ok(())
    }

    fn write_sheet(workbook: &mut Workbook, sheet: &Sheet, header: &Format) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (c, column) in sheet.columns.iter().enumerate() {
            let (row, col) = Self::position(0, c)?;
            worksheet.write_string_with_format(row, col, column, header)?;
        }

        for (r, cells) in sheet.rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                let (row, col) = Self::position(r + 1, c)?;
                Self::write_cell(worksheet, row, col, value)?;
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
        Ok(())
    }

    fn build_workbook(report: &Report) -> Result<Workbook, ExportError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        if report.is_empty() {
            workbook.add_worksheet().set_name(EMPTY_SHEET_NAME)?;
        }

        for sheet in &report.sheets {
            Self::write_sheet(&mut workbook, sheet, &header)?;
        }

        Ok(workbook)
    }
}

impl ReportWriter for XlsxReportWriter {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Self::build_workbook(report)?;
        Ok(workbook.save_to_buffer()?)
    }
}
