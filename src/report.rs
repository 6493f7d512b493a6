//! Report Module
//!
//! 補完済み商品の出力シートと要約シートを組み立て、XLSXまたはCSVとして保存します。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::api::{OutputFormat, ProductType};
use crate::config::SheetStyle;
use crate::error::CatalogError;
use crate::output::{save_sheet, save_workbook, Sheet};
use crate::types::{CellValue, EnrichedProduct};

/// 商品シート名
pub const PRODUCTS_SHEET: &str = "Productos Enriquecidos";

/// 要約シート名
pub const SUMMARY_SHEET: &str = "Resumen";

/// CSV出力時の要約ファイルの接尾辞
pub const SUMMARY_SUFFIX: &str = "_resumen";

/// 商品シートのヘッダー
pub const PRODUCT_COLUMNS: [&str; 12] = [
    "Nombre del Producto",
    "SKU (Número de Parte)",
    "Descripción",
    "URL de Imagen",
    "Precio Base",
    "Tipo de Producto",
    "Slug de Categoría",
    "Disponible",
    "Destacado",
    "Orden de Visualización",
    "Especificaciones Técnicas",
    "Existencia Original",
];

const SUMMARY_NOTES: [&str; 4] = [
    "• Revisa y completa la columna 'Slug de Categoría' usando catalogo_categorias.csv",
    "• Agrega URLs de imágenes en la columna 'URL de Imagen' si están disponibles",
    "• Verifica que los tipos de producto sean correctos",
    "• Ajusta las descripciones si es necesario",
];

/// 補完処理の結果
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    /// 入力順の補完済み商品
    pub products: Vec<EnrichedProduct>,
    /// 商品タイプごとの件数
    pub type_counts: BTreeMap<ProductType, usize>,
    /// 処理日時
    pub processed_at: DateTime<Local>,
}

impl EnrichmentReport {
    /// 補完済み商品から結果を作成する（処理日時は現在時刻）
    pub fn new(products: Vec<EnrichedProduct>) -> Self {
        Self::with_timestamp(products, Local::now())
    }

    pub fn with_timestamp(products: Vec<EnrichedProduct>, processed_at: DateTime<Local>) -> Self {
        let mut type_counts = BTreeMap::new();
        for product in &products {
            *type_counts.entry(product.product_type).or_insert(0) += 1;
        }
        Self {
            products,
            type_counts,
            processed_at,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// 商品シート
    pub fn products_sheet(&self) -> Sheet {
        let header = PRODUCT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut sheet = Sheet::table(PRODUCTS_SHEET, header);
        for product in &self.products {
            sheet.push_row(product_row(product));
        }
        sheet
    }

    /// 要約シート
    ///
    /// 商品タイプの件数は文字列表現の昇順で並べます。
    pub fn summary_sheet(&self) -> Sheet {
        let mut sheet = Sheet::summary(SUMMARY_SHEET);
        sheet.push_pair("RESUMEN DE ENRIQUECIMIENTO", CellValue::Empty);
        sheet.push_pair("", CellValue::Empty);
        sheet.push_pair(
            "Total de productos procesados:",
            CellValue::Number(self.products.len() as f64),
        );
        sheet.push_pair(
            "Fecha de procesamiento:",
            CellValue::String(self.processed_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        );
        sheet.push_pair("", CellValue::Empty);

        sheet.push_pair("NOTAS:", CellValue::Empty);
        for note in SUMMARY_NOTES {
            sheet.push_pair("", CellValue::String(note.to_string()));
        }
        sheet.push_pair("", CellValue::Empty);

        sheet.push_pair("TIPOS DE PRODUCTO ENCONTRADOS:", CellValue::Empty);
        let mut counts: Vec<(&ProductType, &usize)> = self.type_counts.iter().collect();
        counts.sort_by_key(|(t, _)| t.as_str());
        for (product_type, count) in counts {
            sheet.push_pair(
                "",
                CellValue::String(format!("  • {}: {} productos", product_type, count)),
            );
        }
        sheet
    }

    /// 結果を保存する
    ///
    /// XLSXでは要約と商品の2シートを1ファイルに、CSVでは`path`に商品、
    /// 同じディレクトリの`{stem}_resumen.csv`に要約を書き出します。
    ///
    /// # 戻り値
    ///
    /// 書き出したファイルのパス
    pub fn save(
        &self,
        path: &Path,
        format: OutputFormat,
        style: &SheetStyle,
    ) -> Result<Vec<PathBuf>, CatalogError> {
        match format {
            OutputFormat::Xlsx => {
                let sheets = [self.summary_sheet(), self.products_sheet()];
                Ok(vec![save_workbook(path, &sheets, style)?])
            }
            OutputFormat::Csv => {
                let products = save_sheet(path, &self.products_sheet())?;
                let summary = save_sheet(&summary_path(path), &self.summary_sheet())?;
                Ok(vec![products, summary])
            }
        }
    }
}

/// CSV出力時の要約ファイルのパス
pub fn summary_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        "{}{}.{}",
        stem,
        SUMMARY_SUFFIX,
        OutputFormat::Csv.extension()
    ))
}

fn product_row(product: &EnrichedProduct) -> Vec<CellValue> {
    let text = |s: &str| {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s.to_string())
        }
    };
    vec![
        text(&product.name),
        text(&product.sku),
        text(&product.description),
        product.image_url.as_deref().map_or(CellValue::Empty, text),
        CellValue::Number(product.price),
        CellValue::String(product.product_type.as_str().to_string()),
        CellValue::Empty,
        CellValue::String(product.is_available.to_string()),
        CellValue::String("false".to_string()),
        CellValue::Number(0.0),
        text(&product.technical_specs.to_string()),
        product.stock.clone(),
    ]
}
