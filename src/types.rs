//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use crate::api::ProductType;
use crate::specs::TechnicalSpecs;

/// 入力セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空白のみの文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得
    ///
    /// 整数値の数値は小数点なしで表現します（`1234.0` -> `"1234"`）。
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }

    /// 値を数値として解釈する
    ///
    /// 文字列は`$`と桁区切りの`,`を取り除いてから解釈します。
    /// 空セルと解釈できない値は`None`。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::String(s) => {
                let cleaned: String = s
                    .trim()
                    .chars()
                    .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    None
                } else {
                    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
            _ => None,
        }
    }
}

/// 数値を表示用文字列に変換する
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 入力スプレッドシートの1商品
#[derive(Debug, Clone, PartialEq)]
pub struct InputProduct {
    /// データ行番号（1始まり、ヘッダー行を含まない）
    pub row: usize,
    /// 商品名
    pub name: String,
    /// 品番・SKU（なければ空文字列）
    pub part_number: String,
    /// 在庫数（元のセル値）
    pub stock: CellValue,
    /// 基本価格
    pub price: f64,
}

impl InputProduct {
    /// 在庫数から販売可能かどうかを判定する
    ///
    /// 在庫が数値として解釈できる場合は`stock > 0`、
    /// 空または解釈できない場合は販売可能として扱います。
    pub fn is_available(&self) -> bool {
        self.stock.as_number().map_or(true, |n| n > 0.0)
    }
}

/// エンリッチメント結果
///
/// AIオラクルまたはキーワード表が提案する商品情報です。
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// 商品説明
    pub description: String,
    /// 商品タイプ
    pub product_type: ProductType,
    /// 提案カテゴリ（参考情報、出力には含めない）
    pub suggested_category: String,
    /// 技術仕様
    pub technical_specs: TechnicalSpecs,
    /// 画像検索用キーワード
    pub search_keywords: Vec<String>,
}

/// 出力する1商品
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedProduct {
    pub name: String,
    pub sku: String,
    pub description: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub product_type: ProductType,
    pub is_available: bool,
    pub technical_specs: TechnicalSpecs,
    /// 元の在庫セル値
    pub stock: CellValue,
}

impl EnrichedProduct {
    /// 入力とエンリッチメント結果から出力行を組み立てる
    pub fn new(input: &InputProduct, enrichment: Enrichment, image_url: Option<String>) -> Self {
        Self {
            name: input.name.clone(),
            sku: input.part_number.clone(),
            description: enrichment.description,
            image_url,
            price: input.price,
            product_type: enrichment.product_type,
            is_available: input.is_available(),
            technical_specs: enrichment.technical_specs,
            stock: input.stock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: CellValue) -> InputProduct {
        InputProduct {
            row: 1,
            name: "Filtro".to_string(),
            part_number: String::new(),
            stock,
            price: 1.0,
        }
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Number(3.5).as_number(), Some(3.5));
        assert_eq!(CellValue::String("$1,200.50".into()).as_number(), Some(1200.5));
        assert_eq!(CellValue::String(" 150.00 ".into()).as_number(), Some(150.0));
        assert_eq!(CellValue::String("abc".into()).as_number(), None);
        assert_eq!(CellValue::String("".into()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_as_text_integral_number() {
        assert_eq!(CellValue::Number(12345.0).as_text(), "12345");
        assert_eq!(CellValue::Number(0.5).as_text(), "0.5");
        assert_eq!(CellValue::String("  ABC-1 ".into()).as_text(), "  ABC-1 ");
    }

    #[test]
    fn test_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::String("   ".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_is_available() {
        assert!(!product(CellValue::Number(0.0)).is_available());
        assert!(!product(CellValue::String("-2".into())).is_available());
        assert!(product(CellValue::Number(4.0)).is_available());
        assert!(product(CellValue::Empty).is_available());
        assert!(product(CellValue::String("agotado".into())).is_available());
    }
}
