//! Builder Module
//!
//! Fluent Builder APIを提供し、`ProductEnrichment`と`TemplateGenerator`を段階的に構築する。

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{InputFormat, OutputFormat};
use crate::catalog::{CategoryTree, DEFAULT_CATEGORIES_SQL};
use crate::config::{InputLimits, Settings, SheetStyle};
use crate::enrich::{
    build_image_query, select_enricher, select_image_lookup, Enricher, ImageLookup, KeywordTable,
};
use crate::error::CatalogError;
use crate::input::{read_products, read_products_from};
use crate::output::{save_sheet, save_workbook, Sheet};
use crate::report::EnrichmentReport;
use crate::template::{self, names, SpecsEncoding};
use crate::types::{EnrichedProduct, InputProduct};

/// 補完処理のFluent Builder
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
/// 補完方式と画像検索方式は`build()`時に認証情報の有無から一度だけ選択されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use catalogkit::{EnrichmentBuilder, Settings};
///
/// # fn main() -> Result<(), catalogkit::CatalogError> {
/// let enrichment = EnrichmentBuilder::new()
///     .with_settings(Settings::from_env())
///     .with_image_search(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct EnrichmentBuilder {
    settings: Settings,
    use_ai: bool,
    search_images: bool,
    keyword_table: KeywordTable,
    limits: InputLimits,
    style: SheetStyle,
    output_format: Option<OutputFormat>,
    enricher: Option<Box<dyn Enricher>>,
    image_lookup: Option<Box<dyn ImageLookup>>,
}

impl Default for EnrichmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnrichmentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentBuilder")
            .field("use_ai", &self.use_ai)
            .field("search_images", &self.search_images)
            .field("limits", &self.limits)
            .field("output_format", &self.output_format)
            .field("enricher", &self.enricher.as_ref().map(|e| e.name()))
            .finish_non_exhaustive()
    }
}

impl EnrichmentBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 設定: `Settings::default()`（認証情報なし）
    /// - AI補完: 有効（APIキーがある場合のみ実際に使用）
    /// - 画像検索: 有効（アクセスキーがある場合のみ実際に使用）
    /// - 出力フォーマット: 出力ファイルの拡張子から判定
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            use_ai: true,
            search_images: true,
            keyword_table: KeywordTable::default(),
            limits: InputLimits::default(),
            style: SheetStyle::default(),
            output_format: None,
            enricher: None,
            image_lookup: None,
        }
    }

    /// 認証情報とタイムアウトを指定する
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// AI補完を使用するかを指定する
    ///
    /// # 引数
    ///
    /// * `enabled: bool`:
    ///   * `true`: APIキーがあればOpenAIで補完（デフォルト）
    ///   * `false`: 常にキーワード表で補完
    pub fn with_ai(mut self, enabled: bool) -> Self {
        self.use_ai = enabled;
        self
    }

    /// 画像検索を行うかを指定する
    pub fn with_image_search(mut self, enabled: bool) -> Self {
        self.search_images = enabled;
        self
    }

    /// 商品タイプ判定に使うキーワード表を指定する
    pub fn with_keyword_table(mut self, table: KeywordTable) -> Self {
        self.keyword_table = table;
        self
    }

    /// 入力ファイルの制限を指定する
    pub fn with_input_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }

    /// XLSX出力のスタイルを指定する
    pub fn with_sheet_style(mut self, style: SheetStyle) -> Self {
        self.style = style;
        self
    }

    /// 出力フォーマットを固定する（未指定の場合は拡張子から判定）
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// 補完方式を直接指定する
    ///
    /// 指定した場合、`with_settings`や`with_ai`による選択より優先されます。
    pub fn with_enricher(mut self, enricher: Box<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// 画像検索方式を直接指定する
    pub fn with_image_lookup(mut self, lookup: Box<dyn ImageLookup>) -> Self {
        self.image_lookup = Some(lookup);
        self
    }

    /// 設定を検証し、`ProductEnrichment`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `CatalogError::Config(String)`: 設定の検証に失敗した場合
    ///   * 入力サイズ上限が0
    ///   * タイムアウトが0
    ///   * AI補完が有効でモデル名が空
    pub fn build(self) -> Result<ProductEnrichment, CatalogError> {
        if self.limits.max_input_file_size == 0 {
            return Err(CatalogError::Config(
                "max_input_file_size must be greater than 0".to_string(),
            ));
        }
        if self.settings.ai_timeout == Duration::ZERO || self.settings.image_timeout == Duration::ZERO {
            return Err(CatalogError::Config(
                "HTTP timeouts must be greater than 0".to_string(),
            ));
        }
        if self.use_ai && self.settings.openai_model.trim().is_empty() {
            return Err(CatalogError::Config("OpenAI model name is empty".to_string()));
        }

        let enricher = match self.enricher {
            Some(enricher) => enricher,
            None => select_enricher(&self.settings, self.use_ai, self.keyword_table),
        };
        let image_lookup = match self.image_lookup {
            Some(lookup) => lookup,
            None => select_image_lookup(&self.settings, self.search_images),
        };
        tracing::debug!("Using {} enrichment", enricher.name());

        Ok(ProductEnrichment {
            enricher,
            image_lookup,
            limits: self.limits,
            style: self.style,
            output_format: self.output_format,
        })
    }
}

/// 補完処理のファサード
///
/// 入力ファイルを読み込み、各商品を一度だけ補完し、結果を保存します。
///
/// # 使用例
///
/// ```rust,no_run
/// use catalogkit::EnrichmentBuilder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), catalogkit::CatalogError> {
/// let enrichment = EnrichmentBuilder::new().with_ai(false).build()?;
/// let written = enrichment.run_file(
///     Path::new("productos.xlsx"),
///     Path::new("productos_enriquecidos.xlsx"),
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct ProductEnrichment {
    enricher: Box<dyn Enricher>,
    image_lookup: Box<dyn ImageLookup>,
    limits: InputLimits,
    style: SheetStyle,
    output_format: Option<OutputFormat>,
}

impl fmt::Debug for ProductEnrichment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductEnrichment")
            .field("enricher", &self.enricher.name())
            .field("limits", &self.limits)
            .field("output_format", &self.output_format)
            .finish_non_exhaustive()
    }
}

impl ProductEnrichment {
    /// 使用中の補完方式の名前
    pub fn enricher_name(&self) -> &'static str {
        self.enricher.name()
    }

    /// 1商品を補完する
    pub fn enrich_product(&self, product: &InputProduct) -> EnrichedProduct {
        let enrichment = self.enricher.enrich(product);
        let query = build_image_query(
            &product.name,
            &product.part_number,
            &enrichment.search_keywords,
        );
        let image_url = self.image_lookup.find_image(&query);
        EnrichedProduct::new(product, enrichment, image_url)
    }

    /// 商品を入力順に補完する
    pub fn enrich_products(&self, products: &[InputProduct]) -> EnrichmentReport {
        let total = products.len();
        let enriched = products
            .iter()
            .enumerate()
            .map(|(index, product)| {
                tracing::info!("[{}/{}] Processing: {}", index + 1, total, product.name);
                self.enrich_product(product)
            })
            .collect();
        EnrichmentReport::new(enriched)
    }

    /// 任意のリーダーから読み込んで補完する
    ///
    /// # 戻り値
    ///
    /// * `Ok(EnrichmentReport)` - 補完結果
    /// * `Err(CatalogError)` - 入力の読み込みに失敗した場合
    pub fn run<R: Read>(&self, input: R, format: InputFormat) -> Result<EnrichmentReport, CatalogError> {
        let products = read_products_from(input, format, &self.limits)?;
        tracing::info!("Loaded {} products", products.len());
        Ok(self.enrich_products(&products))
    }

    /// 入力ファイルを補完し、結果を`output`に保存する
    ///
    /// # 戻り値
    ///
    /// 書き出したファイルのパス（CSVの場合は商品ファイルと要約ファイル）
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<Vec<PathBuf>, CatalogError> {
        let products = read_products(input, &self.limits)?;
        tracing::info!("Loaded {} products from {}", products.len(), input.display());

        let report = self.enrich_products(&products);
        let format = self
            .output_format
            .unwrap_or_else(|| OutputFormat::from_path(output));
        report.save(output, format, &self.style)
    }
}

/// テンプレート生成のFluent Builder
///
/// # 使用例
///
/// ```rust,no_run
/// use catalogkit::{OutputFormat, TemplateBuilder};
/// use std::path::Path;
///
/// # fn main() -> Result<(), catalogkit::CatalogError> {
/// let generator = TemplateBuilder::new()
///     .with_output_format(OutputFormat::Csv)
///     .build()?;
/// generator.generate(Path::new("templates"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    format: OutputFormat,
    categories_sql: Option<String>,
    style: SheetStyle,
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateBuilder {
    /// デフォルト設定（XLSX、組み込みのカテゴリ定義）
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Xlsx,
            categories_sql: None,
            style: SheetStyle::default(),
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// カテゴリの`INSERT`文を指定する（未指定の場合は組み込みの定義）
    pub fn with_categories_sql(mut self, sql: impl Into<String>) -> Self {
        self.categories_sql = Some(sql.into());
        self
    }

    pub fn with_sheet_style(mut self, style: SheetStyle) -> Self {
        self.style = style;
        self
    }

    /// カテゴリツリーを構築し、`TemplateGenerator`を生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `CatalogError::Config(String)`: カテゴリが1件も読み取れなかった場合
    pub fn build(self) -> Result<TemplateGenerator, CatalogError> {
        let sql = self.categories_sql.as_deref().unwrap_or(DEFAULT_CATEGORIES_SQL);
        let tree = CategoryTree::from_sql(sql);
        if tree.is_empty() {
            return Err(CatalogError::Config(
                "No categories could be read from the category SQL".to_string(),
            ));
        }
        tracing::debug!("Loaded {} categories", tree.len());

        Ok(TemplateGenerator {
            format: self.format,
            tree,
            style: self.style,
        })
    }
}

/// テンプレート生成のファサード
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    format: OutputFormat,
    tree: CategoryTree,
    style: SheetStyle,
}

impl TemplateGenerator {
    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    /// 出力するシート（書き出し順）
    ///
    /// XLSXは説明、商品、カテゴリの順、CSVは商品、カテゴリ、説明の順です。
    pub fn sheets(&self) -> Vec<Sheet> {
        match self.format {
            OutputFormat::Xlsx => vec![
                Sheet::instructions(names::INSTRUCTIONS_SHEET, template::xlsx_instructions()),
                template::products_sheet(template::XLSX_COLUMNS, SpecsEncoding::Json, true),
                template::categories_sheet(&self.tree),
            ],
            OutputFormat::Csv => vec![
                template::products_sheet(template::CSV_COLUMNS, SpecsEncoding::Pipe, false),
                template::categories_sheet(&self.tree),
                Sheet::instructions(names::INSTRUCTIONS_SHEET, template::csv_instructions()),
            ],
        }
    }

    /// `out_dir`にテンプレートを書き出す
    ///
    /// ディレクトリが存在しない場合は作成します。
    ///
    /// # 戻り値
    ///
    /// 書き出したファイルのパス
    pub fn generate(&self, out_dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
        fs::create_dir_all(out_dir)?;
        let sheets = self.sheets();

        match self.format {
            OutputFormat::Xlsx => {
                let path = out_dir.join(names::XLSX_FILE);
                Ok(vec![save_workbook(&path, &sheets, &self.style)?])
            }
            OutputFormat::Csv => {
                let files = [
                    names::PRODUCTS_CSV_FILE,
                    names::CATEGORIES_CSV_FILE,
                    names::INSTRUCTIONS_FILE,
                ];
                files
                    .iter()
                    .zip(&sheets)
                    .map(|(file, sheet)| save_sheet(&out_dir.join(file), sheet))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProductType;
    use crate::enrich::{KeywordEnricher, NoImages};
    use crate::output::SheetKind;
    use crate::types::{CellValue, Enrichment};

    struct FixedImage;

    impl ImageLookup for FixedImage {
        fn find_image(&self, query: &str) -> Option<String> {
            Some(format!("https://img.example/{}", query.replace(' ', "+")))
        }
    }

    struct ServiceEnricher;

    impl Enricher for ServiceEnricher {
        fn name(&self) -> &'static str {
            "service"
        }

        fn enrich(&self, product: &InputProduct) -> Enrichment {
            Enrichment {
                description: format!("Servicio: {}", product.name),
                product_type: ProductType::ServicioInstalacion,
                suggested_category: "Servicios".to_string(),
                technical_specs: Default::default(),
                search_keywords: vec!["servicio".to_string()],
            }
        }
    }

    fn product(name: &str, stock: CellValue) -> InputProduct {
        InputProduct {
            row: 1,
            name: name.to_string(),
            part_number: String::new(),
            stock,
            price: 150.0,
        }
    }

    #[test]
    fn test_enrichment_builder_defaults() {
        let enrichment = EnrichmentBuilder::new().build().expect("default build");
        assert_eq!(enrichment.enricher_name(), "keyword");
    }

    #[test]
    fn test_build_rejects_zero_input_limit() {
        let result = EnrichmentBuilder::new()
            .with_input_limits(InputLimits {
                max_input_file_size: 0,
            })
            .build();
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_build_rejects_zero_timeout() {
        let settings = Settings {
            image_timeout: Duration::ZERO,
            ..Settings::default()
        };
        let result = EnrichmentBuilder::new().with_settings(settings).build();
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_build_rejects_empty_model_only_with_ai() {
        let settings = Settings {
            openai_model: " ".to_string(),
            ..Settings::default()
        };
        let result = EnrichmentBuilder::new().with_settings(settings.clone()).build();
        assert!(matches!(result, Err(CatalogError::Config(_))));

        assert!(EnrichmentBuilder::new()
            .with_settings(settings)
            .with_ai(false)
            .build()
            .is_ok());
    }

    #[test]
    fn test_enrich_products_with_injected_oracles() {
        let enrichment = EnrichmentBuilder::new()
            .with_enricher(Box::new(ServiceEnricher))
            .with_image_lookup(Box::new(FixedImage))
            .build()
            .expect("build");
        assert_eq!(enrichment.enricher_name(), "service");

        let report = enrichment.enrich_products(&[product("Instalación de Estéreo", CellValue::Empty)]);
        let enriched = &report.products[0];
        assert_eq!(enriched.product_type, ProductType::ServicioInstalacion);
        assert_eq!(enriched.description, "Servicio: Instalación de Estéreo");
        assert_eq!(
            enriched.image_url.as_deref(),
            Some("https://img.example/instalación+estéreo+servicio")
        );
        assert!(enriched.is_available);
    }

    #[test]
    fn test_enrich_products_counts_once_per_product() {
        let enrichment = EnrichmentBuilder::new()
            .with_enricher(Box::new(KeywordEnricher::default()))
            .with_image_lookup(Box::new(NoImages))
            .build()
            .expect("build");
        let report = enrichment.enrich_products(&[
            product("Filtro de Aire", CellValue::Number(0.0)),
            product("Aceite Motor 5W-30", CellValue::Number(4.0)),
        ]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.type_counts.values().sum::<usize>(), 2);
        assert!(!report.products[0].is_available);
        assert!(report.products[1].is_available);
    }

    #[test]
    fn test_run_from_csv_reader() {
        let csv = "Producto,Precio,Existencia\nFiltro de Aire,150.00,0\n";
        let enrichment = EnrichmentBuilder::new().with_ai(false).build().expect("build");
        let report = enrichment
            .run(csv.as_bytes(), InputFormat::Csv)
            .expect("run");
        assert_eq!(report.len(), 1);
        assert_eq!(report.products[0].product_type, ProductType::Refaccion);
        assert!(!report.products[0].is_available);
    }

    #[test]
    fn test_template_builder_rejects_empty_catalog() {
        let result = TemplateBuilder::new()
            .with_categories_sql("SELECT 1;")
            .build();
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_template_sheets_order() {
        let xlsx = TemplateBuilder::new().build().expect("build");
        let sheets = xlsx.sheets();
        let sheet_names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            sheet_names,
            vec![
                names::INSTRUCTIONS_SHEET,
                names::PRODUCTS_SHEET,
                names::CATEGORIES_SHEET
            ]
        );
        assert_eq!(sheets[0].kind, SheetKind::Instructions);

        let csv = TemplateBuilder::new()
            .with_output_format(OutputFormat::Csv)
            .build()
            .expect("build");
        let sheets = csv.sheets();
        assert_eq!(sheets[0].header.len(), template::CSV_COLUMNS.len());
        assert_eq!(sheets[2].kind, SheetKind::Instructions);
    }

    #[test]
    fn test_generate_csv_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let generator = TemplateBuilder::new()
            .with_output_format(OutputFormat::Csv)
            .build()
            .expect("build");
        let written = generator.generate(dir.path()).expect("generate");
        assert_eq!(
            written,
            vec![
                dir.path().join(names::PRODUCTS_CSV_FILE),
                dir.path().join(names::CATEGORIES_CSV_FILE),
                dir.path().join(names::INSTRUCTIONS_FILE),
            ]
        );
        let instructions = fs::read_to_string(&written[2]).expect("read instructions");
        assert!(instructions.starts_with("====="));
    }
}
