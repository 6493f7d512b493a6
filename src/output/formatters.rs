//! フォーマッターの実装

use std::io::Write;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use super::{Sheet, SheetKind};
use crate::config::SheetStyle;
use crate::error::CatalogError;
use crate::types::CellValue;

/// Excelで正しく開けるようCSVの先頭に付けるBOM
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// XLSX形式のフォーマッター
///
/// すべてのシートを1つのワークブックに書き出します。シートの順序は引数の順序です。
pub struct XlsxFormatter<'a> {
    style: &'a SheetStyle,
}

impl<'a> XlsxFormatter<'a> {
    pub fn new(style: &'a SheetStyle) -> Self {
        Self { style }
    }

    pub fn render<W: Write>(&self, sheets: &[Sheet], writer: &mut W) -> Result<(), CatalogError> {
        let mut workbook = Workbook::new();
        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            match sheet.kind {
                SheetKind::Table => self.write_table(worksheet, sheet)?,
                SheetKind::Summary => self.write_summary(worksheet, sheet)?,
                SheetKind::Instructions => self.write_instructions(worksheet, sheet)?,
            }
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(())
    }

    fn write_table(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), XlsxError> {
        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::RGB(self.style.header_font_color))
            .set_background_color(Color::RGB(self.style.header_fill))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let hint_format = Format::new()
            .set_italic()
            .set_font_size(self.style.hint_font_size)
            .set_font_color(Color::RGB(self.style.hint_font_color))
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let body_format = Format::new()
            .set_align(FormatAlign::Top)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string_with_format(0, column(col), title, &header_format)?;
        }
        for col in 0..sheet.width() {
            worksheet.set_column_width(column(col), self.style.column_width)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        let mut row = 1u32;
        if let Some(hints) = &sheet.hints {
            for (col, hint) in hints.iter().enumerate() {
                worksheet.write_string_with_format(row, column(col), hint, &hint_format)?;
            }
            row += 1;
        }

        for values in &sheet.rows {
            for (col, value) in values.iter().enumerate() {
                write_cell(worksheet, row, column(col), value, &body_format)?;
            }
            row += 1;
        }
        Ok(())
    }

    fn write_summary(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), XlsxError> {
        let title_format = Format::new()
            .set_bold()
            .set_font_size(self.style.title_font_size);
        let plain = Format::new();

        worksheet.set_column_width(0, self.style.summary_widths.0)?;
        worksheet.set_column_width(1, self.style.summary_widths.1)?;

        for (index, values) in sheet.rows.iter().enumerate() {
            let row = row_number(index);
            let format = if index == 0 { &title_format } else { &plain };
            for (col, value) in values.iter().enumerate() {
                write_cell(worksheet, row, column(col), value, format)?;
            }
        }
        Ok(())
    }

    fn write_instructions(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), XlsxError> {
        let title_format = Format::new()
            .set_bold()
            .set_font_size(self.style.title_font_size);
        let section_format = Format::new().set_bold().set_font_size(11.0).set_text_wrap();
        let item_format = Format::new().set_font_size(10.0).set_text_wrap();

        worksheet.set_column_width(0, self.style.instructions_width)?;

        for (index, values) in sheet.rows.iter().enumerate() {
            let Some(value) = values.first() else {
                continue;
            };
            let text = value.as_text();
            let format = if index == 0 {
                &title_format
            } else if is_list_item(&text) {
                &item_format
            } else {
                &section_format
            };
            write_cell(worksheet, row_number(index), 0, value, format)?;
        }
        Ok(())
    }
}

/// 箇条書きの行（インデントされた行）かどうか
fn is_list_item(line: &str) -> bool {
    line.starts_with(' ')
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        CellValue::String(s) | CellValue::Error(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}

/// 列インデックスを変換（範囲外はExcelの上限を超える値になり、書き込み時にエラーとなる）
fn column(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

fn row_number(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// CSV形式のフォーマッター
///
/// UTF-8 BOMを先頭に書き込みます。記入例の行はCSVには出力しません。
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(&self, sheet: &Sheet, writer: &mut W) -> Result<(), CatalogError> {
        writer.write_all(UTF8_BOM)?;

        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut *writer);

        if !sheet.header.is_empty() {
            csv_writer.write_record(&sheet.header)?;
        }
        for values in &sheet.rows {
            csv_writer.write_record(values.iter().map(CellValue::as_text))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// プレーンテキストのフォーマッター（1行1セル、BOMなし）
pub struct TextFormatter;

impl TextFormatter {
    pub fn render<W: Write>(&self, sheet: &Sheet, writer: &mut W) -> Result<(), CatalogError> {
        for values in &sheet.rows {
            let line = values
                .iter()
                .map(CellValue::as_text)
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Sheet {
        let mut sheet = Sheet::table("Productos", vec!["Nombre".into(), "Precio".into()])
            .with_hints(vec!["Ej: Filtro".into(), "150.00".into()]);
        sheet.push_row(vec![
            CellValue::String("Filtro, de Aire".into()),
            CellValue::Number(150.0),
        ]);
        sheet
    }

    #[test]
    fn test_csv_formatter() {
        let mut output = Vec::new();
        CsvFormatter
            .render(&sample_table(), &mut output)
            .expect("csv render");

        assert!(output.starts_with(UTF8_BOM));
        let text = String::from_utf8(output[UTF8_BOM.len()..].to_vec()).expect("utf8");
        assert_eq!(text, "Nombre,Precio\n\"Filtro, de Aire\",150\n");
    }

    #[test]
    fn test_csv_formatter_summary_rows() {
        let mut sheet = Sheet::summary("Resumen");
        sheet.push_pair("Total:", CellValue::Number(2.0));
        sheet.push_row(vec![CellValue::Empty, CellValue::String("  • fluido: 1 productos".into())]);

        let mut output = Vec::new();
        CsvFormatter.render(&sheet, &mut output).expect("csv render");
        let text = String::from_utf8(output[UTF8_BOM.len()..].to_vec()).expect("utf8");
        assert_eq!(text, "Total:,2\n,  • fluido: 1 productos\n");
    }

    #[test]
    fn test_text_formatter() {
        let sheet = Sheet::instructions("INSTRUCCIONES", vec!["TITULO".to_string(), String::new(), "  • uno".to_string()]);
        let mut output = Vec::new();
        TextFormatter.render(&sheet, &mut output).expect("text render");
        assert_eq!(String::from_utf8(output).expect("utf8"), "TITULO\n\n  • uno\n");
    }

    #[test]
    fn test_xlsx_formatter_produces_zip() {
        let style = SheetStyle::default();
        let mut summary = Sheet::summary("Resumen");
        summary.push_pair("RESUMEN", CellValue::Empty);

        let mut output = Vec::new();
        XlsxFormatter::new(&style)
            .render(&[summary, sample_table()], &mut output)
            .expect("xlsx render");
        // XLSXはZIPコンテナ
        assert!(output.starts_with(b"PK"));
    }

    #[test]
    fn test_xlsx_formatter_rejects_invalid_sheet_name() {
        let style = SheetStyle::default();
        let sheet = Sheet::table("Hoja[1]", vec!["a".into()]);
        let result = XlsxFormatter::new(&style).render(&[sheet], &mut Vec::<u8>::new());
        assert!(matches!(result, Err(CatalogError::Xlsx(_))));
    }

    #[test]
    fn test_is_list_item() {
        assert!(is_list_item("  • name"));
        assert!(!is_list_item("COLUMNAS REQUERIDAS:"));
    }
}
