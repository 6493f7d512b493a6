//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 商品タイプ（category_type）
///
/// インポート先システムが受け付ける5種類の値です。
/// 文字列表現は大文字・小文字を区別し、この5つ以外は受け付けません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ProductType {
    /// 交換部品（`refaccion`）。判定できない場合の既定値
    #[default]
    Refaccion,

    /// アクセサリー・カスタマイズ用品（`accesorio`）
    Accesorio,

    /// 取り付けサービス（`servicio_instalacion`）
    ServicioInstalacion,

    /// メンテナンスサービス（`servicio_mantenimiento`）
    ServicioMantenimiento,

    /// オイル・液体類（`fluido`）
    Fluido,
}

impl ProductType {
    /// すべての商品タイプ（キーワード表の優先順と同じ順序）
    pub const ALL: [ProductType; 5] = [
        ProductType::Refaccion,
        ProductType::Accesorio,
        ProductType::ServicioInstalacion,
        ProductType::ServicioMantenimiento,
        ProductType::Fluido,
    ];

    /// インポート形式での文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Refaccion => "refaccion",
            ProductType::Accesorio => "accesorio",
            ProductType::ServicioInstalacion => "servicio_instalacion",
            ProductType::ServicioMantenimiento => "servicio_mantenimiento",
            ProductType::Fluido => "fluido",
        }
    }

    /// 説明書に載せる表示名
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Refaccion => "Refacción (pieza de repuesto)",
            ProductType::Accesorio => "Accesorio (personalización)",
            ProductType::ServicioInstalacion => "Servicio de Instalación",
            ProductType::ServicioMantenimiento => "Servicio de Mantenimiento",
            ProductType::Fluido => "Fluidos y Lubricantes",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 不正な商品タイプ文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProductType(pub String);

impl fmt::Display for UnknownProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown product type: '{}'", self.0)
    }
}

impl std::error::Error for UnknownProductType {}

impl FromStr for ProductType {
    type Err = UnknownProductType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownProductType(s.to_string()))
    }
}

/// 出力フォーマット
///
/// 生成するファイルの形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// XLSX形式（デフォルト）
    ///
    /// 1つのワークブックに複数のシートを出力します。
    #[default]
    Xlsx,

    /// CSV形式
    ///
    /// シートごとに独立したCSVファイルを出力します。
    /// Excelで正しく開けるよう、UTF-8 BOM付きで書き込みます。
    Csv,
}

impl OutputFormat {
    /// ファイル拡張子から出力フォーマットを推定する
    ///
    /// `.csv`（大文字・小文字を区別しない）はCSV、それ以外はXLSXとして扱います。
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Xlsx,
        }
    }

    /// 拡張子（ドットなし）
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputFormat {
    /// calamineで読み込めるスプレッドシート（xlsx, xlsm, xls, ods）
    Spreadsheet,

    /// CSV（ヘッダー行付き）
    Csv,
}

impl InputFormat {
    /// ファイル拡張子から入力形式を推定する
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Spreadsheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_round_trip_names() {
        for t in ProductType::ALL {
            assert_eq!(t.as_str().parse::<ProductType>(), Ok(t));
        }
    }

    #[test]
    fn test_product_type_is_case_sensitive() {
        assert!("Refaccion".parse::<ProductType>().is_err());
        assert!("FLUIDO".parse::<ProductType>().is_err());
        assert!("servicio".parse::<ProductType>().is_err());
        assert!("".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("OUT.CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out.xlsx")), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Xlsx);
    }

    #[test]
    fn test_input_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("in.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("in.ods")), InputFormat::Spreadsheet);
    }
}
