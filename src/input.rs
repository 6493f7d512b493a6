//! Input Module
//!
//! 商品スプレッドシート（XLSX/XLS/ODSの先頭シート、またはCSV）を読み込み、
//! 列名の別名を解決して`InputProduct`のリストに変換します。

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::api::InputFormat;
use crate::config::InputLimits;
use crate::error::CatalogError;
use crate::slug::fold_accents;
use crate::types::{CellValue, InputProduct};

/// 正規列名
pub mod column {
    pub const PART_NUMBER: &str = "part_number";
    pub const NAME: &str = "name";
    pub const STOCK: &str = "stock";
    pub const PRICE: &str = "price";
}

/// 列名の別名表（正規化済みの列名 → 正規列名）
///
/// 照合前に列名は前後の空白除去、アクセント除去、小文字化、空白の`_`置換を受けます。
const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (
        column::PART_NUMBER,
        &["numero_de_parte", "part_number", "partnumber", "sku", "codigo"],
    ),
    (column::NAME, &["nombre", "name", "producto", "descripcion"]),
    (column::STOCK, &["existencia", "stock", "inventario", "cantidad"]),
    (column::PRICE, &["precio", "price", "precio_unitario", "costo"]),
];

/// 必須の正規列名
const REQUIRED_COLUMNS: &[&str] = &[column::NAME, column::PRICE];

/// 列名を照合用に正規化する
///
/// `" Número de Parte "` → `"numero_de_parte"`
pub fn normalize_header(header: &str) -> String {
    fold_accents(header.trim())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// 正規列名から入力列インデックスへの対応
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub price: usize,
    pub part_number: Option<usize>,
    pub stock: Option<usize>,
}

impl ColumnMap {
    /// ヘッダー行から列の対応を解決する
    ///
    /// 同じ正規列名に複数の列が一致した場合は、左側の列を使用します。
    ///
    /// # 戻り値
    ///
    /// * `Err(CatalogError::MissingColumns)` - `name`または`price`が見つからない場合
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, CatalogError> {
        let mut found: Vec<(&str, usize)> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            let normalized = normalize_header(header.as_ref());
            let Some(canonical) = canonical_column(&normalized) else {
                tracing::debug!("Ignoring input column '{}'", header.as_ref());
                continue;
            };
            if found.iter().any(|(c, _)| *c == canonical) {
                tracing::warn!(
                    "Column '{}' also maps to '{}'; keeping the first match",
                    header.as_ref(),
                    canonical
                );
                continue;
            }
            found.push((canonical, index));
        }

        let lookup = |canonical: &str| {
            found
                .iter()
                .find(|(c, _)| *c == canonical)
                .map(|(_, i)| *i)
        };

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| lookup(**c).is_none())
            .map(|c| c.to_string())
            .collect();

        match (lookup(column::NAME), lookup(column::PRICE)) {
            (Some(name), Some(price)) => Ok(Self {
                name,
                price,
                part_number: lookup(column::PART_NUMBER),
                stock: lookup(column::STOCK),
            }),
            _ => Err(CatalogError::MissingColumns { missing }),
        }
    }
}

fn canonical_column(normalized: &str) -> Option<&'static str> {
    COLUMN_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized))
        .map(|(canonical, _)| *canonical)
}

/// 入力ファイルを読み込む
///
/// 形式は拡張子から判定します（`.csv`はCSV、それ以外はcalamineで読み込み）。
pub fn read_products(path: &Path, limits: &InputLimits) -> Result<Vec<InputProduct>, CatalogError> {
    let file = File::open(path)?;
    read_products_from(file, InputFormat::from_path(path), limits)
}

/// 任意のリーダーから商品を読み込む
///
/// 入力全体をメモリに読み込んでから解析します。
///
/// # 戻り値
///
/// * `Err(CatalogError::InputTooLarge)` - 入力がサイズ上限を超えた場合
/// * `Err(CatalogError::MissingColumns)` - 必須列が見つからない場合
/// * `Err(CatalogError::InvalidCell)` - 価格が数値として解釈できない場合
pub fn read_products_from<R: Read>(
    reader: R,
    format: InputFormat,
    limits: &InputLimits,
) -> Result<Vec<InputProduct>, CatalogError> {
    // 上限+1バイトまで読み、超過を検出する
    let mut buffer = Vec::new();
    let bytes_read = reader
        .take(limits.max_input_file_size.saturating_add(1))
        .read_to_end(&mut buffer)? as u64;
    if bytes_read > limits.max_input_file_size {
        return Err(CatalogError::InputTooLarge {
            size: bytes_read,
            max: limits.max_input_file_size,
        });
    }

    let table = match format {
        InputFormat::Spreadsheet => read_spreadsheet_table(buffer)?,
        InputFormat::Csv => read_csv_table(&buffer)?,
    };
    products_from_table(table)
}

/// スプレッドシートの先頭シートを読み込む
fn read_spreadsheet_table(buffer: Vec<u8>) -> Result<Vec<Vec<CellValue>>, CatalogError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Config("Input workbook has no sheets".to_string()))??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        other => CellValue::String(other.to_string()),
    }
}

/// CSVを読み込む（先頭のUTF-8 BOMは除去）
fn read_csv_table(buffer: &[u8]) -> Result<Vec<Vec<CellValue>>, CatalogError> {
    let data = buffer.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(buffer);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record?;
        table.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::String(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(table)
}

/// ヘッダー行付きの表を商品リストに変換する
fn products_from_table(table: Vec<Vec<CellValue>>) -> Result<Vec<InputProduct>, CatalogError> {
    let mut rows = table.into_iter();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(CellValue::as_text).collect())
        .unwrap_or_default();
    let columns = ColumnMap::resolve(&headers)?;

    let mut products = Vec::new();
    for (offset, row) in rows.enumerate() {
        let row_number = offset + 1;
        if row.iter().all(CellValue::is_empty) {
            continue;
        }

        let cell = |index: usize| row.get(index).cloned().unwrap_or(CellValue::Empty);

        let name = cell(columns.name).as_text().trim().to_string();
        if name.is_empty() {
            tracing::warn!("Row {}: empty product name, skipping", row_number);
            continue;
        }

        let price = parse_price(row_number, &cell(columns.price))?;
        let part_number = columns
            .part_number
            .map(|i| cell(i).as_text().trim().to_string())
            .unwrap_or_default();
        let stock = columns.stock.map(cell).unwrap_or(CellValue::Empty);

        products.push(InputProduct {
            row: row_number,
            name,
            part_number,
            stock,
            price,
        });
    }

    tracing::info!("Read {} products from input", products.len());
    Ok(products)
}

/// 価格セルを解釈する
///
/// 空セルは0.0（警告付き）、解釈できない値は`InvalidCell`。
fn parse_price(row: usize, value: &CellValue) -> Result<f64, CatalogError> {
    if value.is_empty() {
        tracing::warn!("Row {}: empty price, using 0.0", row);
        return Ok(0.0);
    }
    value.as_number().ok_or_else(|| CatalogError::InvalidCell {
        row,
        column: column::PRICE.to_string(),
        value: value.as_text().trim().to_string(),
    })
}
