//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! 外部オラクル（OpenAI、Unsplash）のエラーはこの型には含まれません。
//! それらは`enrich`モジュール内の`OracleError`で扱われ、フォールバックで吸収されます。

use thiserror::Error;

/// catalogkitクレート全体で使用するエラー型
///
/// 入力ファイルの読み込み、列の解決、出力ファイルの書き込み中に発生する
/// 致命的なエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `Spreadsheet`: 入力スプレッドシートの解析エラー（calamine由来）
/// - `Csv`: CSVの読み書きエラー
/// - `Xlsx`: XLSX出力の生成エラー（rust_xlsxwriter由来）
/// - `MissingColumns`: 必須列（name, price）が見つからない
/// - `InvalidCell`: セルの値が解釈できない
/// - `Config`: 設定の検証に失敗したエラー
/// - `InputTooLarge`: 入力ファイルがサイズ上限を超えた
///
/// # 使用例
///
/// ```rust,no_run
/// use catalogkit::CatalogError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<File, CatalogError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 入力スプレッドシートの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが
    /// 原因となります。
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// CSVの読み書き中に発生したエラー
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSXファイルの生成中に発生したエラー
    #[error("Failed to write XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 必須列が入力に存在しないエラー
    ///
    /// 列名の別名解決後も`name`または`price`が見つからない場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use catalogkit::CatalogError;
    ///
    /// let error = CatalogError::MissingColumns {
    ///     missing: vec!["price".to_string()],
    /// };
    /// assert_eq!(error.to_string(), "Missing required columns: price");
    /// ```
    #[error("Missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        /// 見つからなかった正規列名
        missing: Vec<String>,
    },

    /// セルの値が解釈できないエラー
    ///
    /// 例えば、価格列に数値として解釈できない文字列が含まれている場合です。
    #[error("Invalid value at row {row}, column '{column}': '{value}'")]
    InvalidCell {
        /// データ行番号（1始まり、ヘッダー行を含まない）
        row: usize,
        /// 正規列名
        column: String,
        /// 元のセル値
        value: String,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `EnrichmentBuilder::build()`や`TemplateBuilder::build()`で
    /// 無効な設定が検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力ファイルがサイズ上限を超えたエラー
    #[error("Input file is too large: {size} bytes (max: {max} bytes)")]
    InputTooLarge {
        /// 実際のサイズ（バイト）
        size: u64,
        /// 許容される最大サイズ（バイト）
        max: u64,
    },
}
