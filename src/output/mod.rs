//! Output Format Module
//!
//! 出力シートの抽象化と、XLSX/CSV/テキストへの書き出しを提供するモジュール。

mod formatters;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::SheetStyle;
use crate::error::CatalogError;
use crate::types::CellValue;

pub use formatters::*;

/// シートの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// ヘッダー行付きの表
    Table,
    /// ラベルと値の2列からなる要約（先頭行はタイトル）
    Summary,
    /// 1列のテキスト行（先頭行はタイトル）
    Instructions,
}

/// 出力シート
///
/// XLSXでは1つのワークシート、CSVでは1つのファイルに対応します。
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// ワークシート名
    pub name: String,
    pub kind: SheetKind,
    /// 表のヘッダー（`Table`のみ）
    pub header: Vec<String>,
    /// ヘッダー直下に置く記入例（`Table`のみ）
    pub hints: Option<Vec<String>>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// 表シートを作成
    pub fn table(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: SheetKind::Table,
            header,
            hints: None,
            rows: Vec::new(),
        }
    }

    /// 要約シートを作成
    pub fn summary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SheetKind::Summary,
            header: Vec::new(),
            hints: None,
            rows: Vec::new(),
        }
    }

    /// 説明シートを作成
    pub fn instructions(name: impl Into<String>, lines: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            kind: SheetKind::Instructions,
            header: Vec::new(),
            hints: None,
            rows: lines
                .into_iter()
                .map(|line| vec![CellValue::String(line)])
                .collect(),
        }
    }

    /// 記入例の行を設定
    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = Some(hints);
        self
    }

    /// 行を追加
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// 要約の1行（ラベルと値）を追加
    pub fn push_pair(&mut self, label: impl Into<String>, value: CellValue) {
        self.rows.push(vec![CellValue::String(label.into()), value]);
    }

    /// 列数（ヘッダーと全行の最大）
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

/// 単一シートの書き出し方式
///
/// CSVモードでは説明シートのみテキストとして書き出します。
#[derive(Debug, Clone, Copy)]
pub enum SheetFormatter {
    Csv,
    Text,
}

impl SheetFormatter {
    /// シートの種類から書き出し方式を選択
    pub fn for_kind(kind: SheetKind) -> Self {
        match kind {
            SheetKind::Instructions => SheetFormatter::Text,
            SheetKind::Table | SheetKind::Summary => SheetFormatter::Csv,
        }
    }

    /// シートを書き出す
    pub fn render<W: Write>(&self, sheet: &Sheet, writer: &mut W) -> Result<(), CatalogError> {
        match self {
            SheetFormatter::Csv => CsvFormatter.render(sheet, writer),
            SheetFormatter::Text => TextFormatter.render(sheet, writer),
        }
    }
}

/// 複数シートを1つのXLSXファイルに保存する
pub fn save_workbook(path: &Path, sheets: &[Sheet], style: &SheetStyle) -> Result<PathBuf, CatalogError> {
    let mut writer = BufWriter::new(File::create(path)?);
    XlsxFormatter::new(style).render(sheets, &mut writer)?;
    writer.flush()?;
    tracing::info!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

/// 1シートをCSVまたはテキストファイルに保存する
pub fn save_sheet(path: &Path, sheet: &Sheet) -> Result<PathBuf, CatalogError> {
    let mut writer = BufWriter::new(File::create(path)?);
    SheetFormatter::for_kind(sheet.kind).render(sheet, &mut writer)?;
    writer.flush()?;
    tracing::info!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}
