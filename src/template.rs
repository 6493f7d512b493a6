//! Template Module
//!
//! 商品一括登録用テンプレートの内容（列定義、記入例、説明文、カテゴリ一覧）を定義します。
//! ファイルへの書き出しは`TemplateGenerator`が行います。

use serde::Serialize;

use crate::api::ProductType;
use crate::catalog::CategoryTree;
use crate::output::Sheet;
use crate::specs::TechnicalSpecs;
use crate::types::CellValue;

/// テンプレートのシート名・ファイル名
pub mod names {
    pub const PRODUCTS_SHEET: &str = "Carga Masiva Productos";
    pub const INSTRUCTIONS_SHEET: &str = "INSTRUCCIONES";
    pub const CATEGORIES_SHEET: &str = "Catálogo de Categorías";

    pub const XLSX_FILE: &str = "template_carga_masiva_productos.xlsx";
    pub const PRODUCTS_CSV_FILE: &str = "template_carga_masiva_productos.csv";
    pub const CATEGORIES_CSV_FILE: &str = "catalogo_categorias.csv";
    pub const INSTRUCTIONS_FILE: &str = "INSTRUCCIONES_CARGA_MASIVA.txt";
}

/// カテゴリ一覧のヘッダー
pub const CATEGORY_COLUMNS: [&str; 7] = [
    "Nivel",
    "Ruta Completa",
    "Nombre",
    "Slug",
    "Descripción",
    "Categoría Padre",
    "Slug Padre",
];

/// テンプレートの列定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateColumn {
    /// 取り込み時のフィールド名
    pub field: &'static str,
    /// ヘッダーに表示する名前
    pub header: &'static str,
    pub required: bool,
    /// 記入例（XLSXの2行目）
    pub hint: &'static str,
}

const fn col(
    field: &'static str,
    header: &'static str,
    required: bool,
    hint: &'static str,
) -> TemplateColumn {
    TemplateColumn {
        field,
        header,
        required,
        hint,
    }
}

const PRODUCT_TYPE_HINT: &str =
    "refaccion|accesorio|servicio_instalacion|servicio_mantenimiento|fluido";

/// XLSXテンプレートの列（画像、配送情報、バリエーション、JSON形式の技術仕様を含む）
pub const XLSX_COLUMNS: &[TemplateColumn] = &[
    col("name", "Nombre del Producto", true, "Ej: Filtro de Aire Original"),
    col("sku", "SKU (Código)", false, "Ej: FIL-AIR-001"),
    col("description", "Descripción", false, "Descripción detallada del producto"),
    col("image_url", "URL de Imagen", false, "https://ejemplo.com/imagen.jpg"),
    col("price", "Precio Base", true, "150.00"),
    col("product_type", "Tipo de Producto", true, PRODUCT_TYPE_HINT),
    col("category_slug", "Slug de Categoría", false, "Ver hoja 'Catálogo de Categorías'"),
    col("is_available", "Disponible", false, "true|false (default: true)"),
    col("is_featured", "Destacado", false, "true|false (default: false)"),
    col("display_order", "Orden de Visualización", false, "0 (default: 0)"),
    col("weight_kg", "Peso (kg)", false, "Ej: 0.5"),
    col("length_cm", "Largo (cm)", false, "Ej: 25"),
    col("width_cm", "Ancho (cm)", false, "Ej: 20"),
    col("height_cm", "Alto (cm)", false, "Ej: 5"),
    col("variant_group_1_name", "Variante Grupo 1 - Nombre", false, "Ej: Tamaño, Capacidad, Color"),
    col("variant_group_1_required", "Variante Grupo 1 - Requerido", false, "true|false"),
    col("variant_group_1_selection", "Variante Grupo 1 - Tipo Selección", false, "single|multiple"),
    col("variant_group_1_variants", "Variante Grupo 1 - Variantes (JSON)", false, "Ver formato en instrucciones"),
    col("variant_group_2_name", "Variante Grupo 2 - Nombre", false, "Ej: Marca, Modelo"),
    col("variant_group_2_required", "Variante Grupo 2 - Requerido", false, "true|false"),
    col("variant_group_2_selection", "Variante Grupo 2 - Tipo Selección", false, "single|multiple"),
    col("variant_group_2_variants", "Variante Grupo 2 - Variantes (JSON)", false, "Ver formato en instrucciones"),
    col(
        "technical_specs",
        "Especificaciones Técnicas (JSON)",
        false,
        r#"{"marca": "Toyota", "modelo": "Corolla", "año": "2020-2023"}"#,
    ),
];

/// CSVテンプレートの列（技術仕様はパイプ区切り）
pub const CSV_COLUMNS: &[TemplateColumn] = &[
    col("name", "Nombre del Producto", true, ""),
    col("sku", "SKU (Código)", false, ""),
    col("description", "Descripción", false, ""),
    col("price", "Precio Base", true, ""),
    col("product_type", "Tipo de Producto", true, ""),
    col("category_slug", "Slug de Categoría", false, ""),
    col("is_available", "Disponible", false, ""),
    col("is_featured", "Destacado", false, ""),
    col("display_order", "Orden de Visualización", false, ""),
    col("weight_kg", "Peso (kg)", false, ""),
    col("length_cm", "Largo (cm)", false, ""),
    col("width_cm", "Ancho (cm)", false, ""),
    col("height_cm", "Alto (cm)", false, ""),
    col("technical_specs", "Especificaciones Técnicas", false, ""),
];

/// 最大バリエーショングループ数
pub const MAX_VARIANT_GROUPS: usize = 2;

/// バリエーションの選択方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single,
    Multiple,
}

impl Selection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selection::Single => "single",
            Selection::Multiple => "multiple",
        }
    }
}

/// バリエーション
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub name: String,
    pub price_adjustment: i64,
    pub is_available: bool,
}

/// バリエーショングループ
#[derive(Debug, Clone, PartialEq)]
pub struct VariantGroup {
    pub name: String,
    pub required: bool,
    pub selection: Selection,
    pub variants: Vec<Variant>,
}

/// 配送料計算用の寸法
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shipping {
    pub weight_kg: f64,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

/// テンプレートの記入例
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleProduct {
    pub name: &'static str,
    pub sku: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    /// 表示用の価格文字列（例: `"150.00"`）
    pub price: &'static str,
    pub product_type: ProductType,
    pub category_slug: &'static str,
    pub is_available: bool,
    pub is_featured: bool,
    pub display_order: i64,
    /// サービス商品は`None`
    pub shipping: Option<Shipping>,
    pub variant_groups: Vec<VariantGroup>,
    pub technical_specs: TechnicalSpecs,
}

fn variants(items: &[(&str, i64)]) -> Vec<Variant> {
    items
        .iter()
        .map(|(name, price_adjustment)| Variant {
            name: name.to_string(),
            price_adjustment: *price_adjustment,
            is_available: true,
        })
        .collect()
}

/// 3件の記入例（部品、油脂類、取り付けサービス）
pub fn example_products() -> Vec<ExampleProduct> {
    vec![
        ExampleProduct {
            name: "Filtro de Aire Original Toyota",
            sku: "FIL-AIR-TOY-001",
            description: "Filtro de aire original Toyota para modelos Corolla 2020-2023. Filtración eficiente de partículas.",
            image_url: "https://ejemplo.com/filtro-aire-toyota.jpg",
            price: "150.00",
            product_type: ProductType::Refaccion,
            category_slug: "filtros",
            is_available: true,
            is_featured: true,
            display_order: 1,
            shipping: Some(Shipping {
                weight_kg: 0.5,
                length_cm: 25.0,
                width_cm: 20.0,
                height_cm: 5.0,
            }),
            variant_groups: vec![VariantGroup {
                name: "Compatibilidad".to_string(),
                required: true,
                selection: Selection::Single,
                variants: variants(&[
                    ("Corolla 2020-2021", 0),
                    ("Corolla 2022-2023", 20),
                    ("Camry 2020-2023", 30),
                ]),
            }],
            technical_specs: TechnicalSpecs::new()
                .with("marca", "Toyota")
                .with("modelo_compatible", "Corolla, Camry")
                .with("años", "2020-2023")
                .with("tipo_filtro", "Aire")
                .with("material", "Papel sintético"),
        },
        ExampleProduct {
            name: "Aceite Motor 5W-30 Sintético",
            sku: "ACE-5W30-SYN-001",
            description: "Aceite de motor sintético 5W-30 de alto rendimiento. Protección superior del motor.",
            image_url: "https://ejemplo.com/aceite-5w30.jpg",
            price: "450.00",
            product_type: ProductType::Fluido,
            category_slug: "aceites-de-motor",
            is_available: true,
            is_featured: false,
            display_order: 2,
            shipping: Some(Shipping {
                weight_kg: 0.9,
                length_cm: 10.0,
                width_cm: 10.0,
                height_cm: 25.0,
            }),
            variant_groups: vec![
                VariantGroup {
                    name: "Capacidad".to_string(),
                    required: true,
                    selection: Selection::Single,
                    variants: variants(&[("1 Litro", 0), ("4 Litros", 1350), ("5 Litros", 1650)]),
                },
                VariantGroup {
                    name: "Tipo".to_string(),
                    required: false,
                    selection: Selection::Single,
                    variants: variants(&[
                        ("Sintético", 0),
                        ("Semi-Sintético", -50),
                        ("Convencional", -100),
                    ]),
                },
            ],
            technical_specs: TechnicalSpecs::new()
                .with("viscosidad", "5W-30")
                .with("tipo", "Sintético")
                .with("capacidad_litros", "1, 4, 5")
                .with("certificaciones", "API SN Plus, ILSAC GF-6")
                .with("temperatura_operacion", "-30°C a 40°C"),
        },
        ExampleProduct {
            name: "Instalación de Sistema de Audio",
            sku: "SERV-AUDIO-INST-001",
            description: "Servicio profesional de instalación de sistema de audio completo. Incluye mano de obra y garantía.",
            image_url: "https://ejemplo.com/instalacion-audio.jpg",
            price: "1200.00",
            product_type: ProductType::ServicioInstalacion,
            category_slug: "instalacion-de-audio",
            is_available: true,
            is_featured: true,
            display_order: 3,
            shipping: None,
            variant_groups: vec![VariantGroup {
                name: "Tiempo Estimado".to_string(),
                required: false,
                selection: Selection::Single,
                variants: variants(&[
                    ("2-3 horas", 0),
                    ("4-6 horas", 300),
                    ("1 día completo", 600),
                ]),
            }],
            technical_specs: TechnicalSpecs::new()
                .with("tiempo_estimado", "2-6 horas")
                .with("dificultad", "Media-Alta")
                .with("herramientas_requeridas", "Destornilladores, alicates, multímetro")
                .with("garantia", "3 meses")
                .with("incluye", "Instalación, cableado, configuración básica"),
        },
    ]
}

/// 技術仕様の表現形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecsEncoding {
    /// JSONオブジェクト
    Json,
    /// `key:value|key:value`
    Pipe,
}

impl ExampleProduct {
    /// フィールド名に対応するセル値
    ///
    /// 未知のフィールドは空セルになります。
    pub fn field_value(&self, field: &str, specs: SpecsEncoding) -> CellValue {
        let text = |s: &str| {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::String(s.to_string())
            }
        };
        let flag = |b: bool| CellValue::String(b.to_string());
        let dimension = |get: fn(&Shipping) -> f64| {
            self.shipping
                .as_ref()
                .map_or(CellValue::Empty, |s| CellValue::Number(get(s)))
        };

        match field {
            "name" => text(self.name),
            "sku" => text(self.sku),
            "description" => text(self.description),
            "image_url" => text(self.image_url),
            "price" => text(self.price),
            "product_type" => text(self.product_type.as_str()),
            "category_slug" => text(self.category_slug),
            "is_available" => flag(self.is_available),
            "is_featured" => flag(self.is_featured),
            "display_order" => CellValue::Number(self.display_order as f64),
            "weight_kg" => dimension(|s| s.weight_kg),
            "length_cm" => dimension(|s| s.length_cm),
            "width_cm" => dimension(|s| s.width_cm),
            "height_cm" => dimension(|s| s.height_cm),
            "technical_specs" => match specs {
                SpecsEncoding::Pipe => text(&self.technical_specs.to_string()),
                SpecsEncoding::Json => serde_json::to_string(&self.technical_specs)
                    .map_or(CellValue::Empty, CellValue::String),
            },
            other => self.variant_field(other).unwrap_or(CellValue::Empty),
        }
    }

    /// `variant_group_{n}_{name|required|selection|variants}`
    fn variant_field(&self, field: &str) -> Option<CellValue> {
        let rest = field.strip_prefix("variant_group_")?;
        let (index, attribute) = rest.split_once('_')?;
        let index: usize = index.parse().ok()?;
        let group = self.variant_groups.get(index.checked_sub(1)?)?;

        let value = match attribute {
            "name" => CellValue::String(group.name.clone()),
            "required" => CellValue::String(group.required.to_string()),
            "selection" => CellValue::String(group.selection.as_str().to_string()),
            "variants" => CellValue::String(serde_json::to_string(&group.variants).ok()?),
            _ => return None,
        };
        Some(value)
    }
}

/// 商品テンプレートのシート
///
/// 記入例の行を付ける場合、必須列のヘッダーに`*`を付けます。
pub fn products_sheet(columns: &[TemplateColumn], specs: SpecsEncoding, with_hints: bool) -> Sheet {
    let header = columns
        .iter()
        .map(|c| {
            if with_hints && c.required {
                format!("{} *", c.header)
            } else {
                c.header.to_string()
            }
        })
        .collect();
    let mut sheet = Sheet::table(names::PRODUCTS_SHEET, header);
    if with_hints {
        sheet = sheet.with_hints(columns.iter().map(|c| c.hint.to_string()).collect());
    }
    for example in example_products() {
        sheet.push_row(
            columns
                .iter()
                .map(|c| example.field_value(c.field, specs))
                .collect(),
        );
    }
    sheet
}

/// カテゴリ一覧のシート
pub fn categories_sheet(tree: &CategoryTree) -> Sheet {
    let header = CATEGORY_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut sheet = Sheet::table(names::CATEGORIES_SHEET, header);
    for entry in tree.entries() {
        sheet.push_row(vec![
            CellValue::Number(entry.level as f64),
            CellValue::String(entry.path_string()),
            CellValue::String(entry.name),
            CellValue::String(entry.slug),
            CellValue::String(entry.description),
            CellValue::String(entry.parent_name),
            CellValue::String(entry.parent_slug),
        ]);
    }
    sheet
}

const SHIPPING_LINES: [&str; 9] = [
    "CAMPOS PARA CÁLCULO DE ENVÍO:",
    "  Estos campos son necesarios para calcular el costo de envío con paqueterías:",
    "  • weight_kg: Peso del producto en kilogramos (ej: 0.5, 1.2, 2.5)",
    "  • length_cm: Largo del producto en centímetros (ej: 25, 30, 50)",
    "  • width_cm: Ancho del producto en centímetros (ej: 20, 15, 30)",
    "  • height_cm: Alto del producto en centímetros (ej: 5, 10, 20)",
    "  • NOTA: Para servicios (instalación, mantenimiento), estos campos pueden dejarse vacíos",
    "  • NOTA: Las paqueterías usan peso y dimensiones para calcular el costo de envío",
    "  • NOTA: El volumen se calcula automáticamente: largo × ancho × alto (cm³)",
];

fn common_header(title_rule: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let rule = "=".repeat(80);
    if title_rule {
        lines.push(rule.clone());
    }
    lines.push("INSTRUCCIONES PARA CARGA MASIVA DE PRODUCTOS".to_string());
    if title_rule {
        lines.push(rule);
    }
    lines.push(String::new());
    lines
}

fn required_columns() -> Vec<String> {
    let mut lines = vec![
        "COLUMNAS REQUERIDAS (marcadas con *):".to_string(),
        "  * name: Nombre del producto (máximo 255 caracteres)".to_string(),
        "  * price: Precio base del producto (formato: 150.00)".to_string(),
        "  * product_type: Tipo de producto (valores válidos):".to_string(),
    ];
    lines.extend(
        ProductType::ALL
            .iter()
            .map(|t| format!("    - {}: {}", t.as_str(), t.label())),
    );
    lines.push(String::new());
    lines
}

fn optional_columns(catalog_reference: &str, with_image: bool) -> Vec<String> {
    let mut lines = vec![
        "COLUMNAS OPCIONALES:".to_string(),
        "  • sku: Código único del producto (máximo 100 caracteres)".to_string(),
        "  • description: Descripción del producto".to_string(),
    ];
    if with_image {
        lines.push("  • image_url: URL de la imagen del producto".to_string());
    }
    lines.extend([
        format!("  • category_slug: Slug de la categoría (ver {})", catalog_reference),
        "    - El slug es el identificador único de la categoría".to_string(),
        "    - Si no se especifica, el producto se puede asignar manualmente después".to_string(),
        "  • is_available: true/false (default: true)".to_string(),
        "  • is_featured: true/false (default: false)".to_string(),
        "  • display_order: Número entero (default: 0)".to_string(),
        String::new(),
    ]);
    lines
}

fn catalog_lines(catalog_reference: &str) -> Vec<String> {
    vec![
        "CATÁLOGO DE CATEGORÍAS:".to_string(),
        format!("  {} contiene todas las categorías disponibles.", catalog_reference),
        "  Columnas del catálogo:".to_string(),
        "    • Nivel: Nivel de jerarquía (0 = categoría principal, 1 = subcategoría, etc.)".to_string(),
        "    • Ruta Completa: Ruta completa de la categoría (ej: Refacciones > Motor > Filtros)".to_string(),
        "    • Nombre: Nombre de la categoría".to_string(),
        "    • Slug: Slug a usar en la columna category_slug del template de productos".to_string(),
        "    • Descripción: Descripción de la categoría".to_string(),
        "    • Categoría Padre: Nombre de la categoría padre (si aplica)".to_string(),
        "    • Slug Padre: Slug de la categoría padre (si aplica)".to_string(),
        String::new(),
    ]
}

fn notes_lines(extra: &[&str]) -> Vec<String> {
    let mut lines = vec![
        "NOTAS IMPORTANTES:".to_string(),
        "  • NO incluir campos de stock ni relaciones con sucursales".to_string(),
        "  • Solo se considera el precio base del producto".to_string(),
        "  • El category_slug es opcional pero recomendado".to_string(),
        "  • El slug de categoría debe coincidir exactamente con el slug del catálogo".to_string(),
        "  • Los campos de envío son opcionales pero recomendados para productos físicos".to_string(),
    ];
    lines.extend(extra.iter().map(|l| l.to_string()));
    lines.push(String::new());
    lines
}

/// XLSXテンプレートの説明文
pub fn xlsx_instructions() -> Vec<String> {
    let catalog = format!("la hoja '{}'", names::CATEGORIES_SHEET);
    let mut lines = common_header(false);
    lines.extend(required_columns());
    lines.extend(optional_columns(&catalog, true));
    lines.extend(SHIPPING_LINES.iter().map(|l| l.to_string()));
    lines.push(String::new());
    lines.extend(
        [
            "VARIANTES:",
            "  Las variantes se definen usando grupos. Cada producto puede tener hasta 2 grupos de variantes.",
            "",
            "  Para cada grupo de variantes:",
            "    • variant_group_X_name: Nombre del grupo (ej: 'Tamaño', 'Color', 'Capacidad')",
            "    • variant_group_X_required: true si es obligatorio seleccionar una variante",
            "    • variant_group_X_selection: 'single' para selección única, 'multiple' para múltiple",
            "    • variant_group_X_variants: JSON con array de variantes",
            "",
            "  Formato JSON para variant_group_X_variants:",
            "    [",
            r#"      {"name": "Variante 1", "price_adjustment": 0, "is_available": true},"#,
            r#"      {"name": "Variante 2", "price_adjustment": 50, "is_available": true},"#,
            r#"      {"name": "Variante 3", "absolute_price": 200, "is_available": true}"#,
            "    ]",
            "",
            "  Campos de cada variante:",
            "    • name: Nombre de la variante (requerido)",
            "    • price_adjustment: Ajuste de precio relativo al precio base (default: 0)",
            "    • absolute_price: Precio absoluto (opcional, si se especifica ignora price_adjustment)",
            "    • is_available: true/false (default: true)",
            "",
            "ESPECIFICACIONES TÉCNICAS:",
            "  • technical_specs: JSON con especificaciones técnicas del producto",
            "  • Formato: Objeto JSON con cualquier estructura",
            "  • Ejemplo:",
            r#"    {"marca": "Toyota", "modelo": "Corolla", "año": "2020-2023"}"#,
            "",
        ]
        .iter()
        .map(|l| l.to_string()),
    );
    lines.extend(catalog_lines(&format!("La hoja '{}'", names::CATEGORIES_SHEET)));
    lines.extend(notes_lines(&[
        "  • Para productos sin variantes, dejar las columnas de variantes vacías",
    ]));
    lines.push("EJEMPLOS:".to_string());
    lines.push(format!(
        "  Ver las filas 3, 4 y 5 de la hoja '{}' para ejemplos completos.",
        names::PRODUCTS_SHEET
    ));
    lines
}

/// CSVテンプレートの説明文
pub fn csv_instructions() -> Vec<String> {
    let mut lines = common_header(true);
    lines.extend([
        "ARCHIVOS INCLUIDOS:".to_string(),
        format!("  • {} - Template para productos", names::PRODUCTS_CSV_FILE),
        format!(
            "  • {} - Catálogo completo de categorías con relación padre-hijo",
            names::CATEGORIES_CSV_FILE
        ),
        String::new(),
    ]);
    lines.extend(required_columns());
    lines.extend(optional_columns(names::CATEGORIES_CSV_FILE, false));
    lines.extend(SHIPPING_LINES.iter().map(|l| l.to_string()));
    lines.push(String::new());
    lines.extend(
        [
            "ESPECIFICACIONES TÉCNICAS:",
            "  • technical_specs: Especificaciones técnicas del producto en formato simple",
            "  • Formato: campo:valor|campo:valor|campo:valor",
            "  • Ejemplos:",
            "    marca:Toyota|modelo:Corolla|año:2020-2023",
            "    viscosidad:5W-30|tipo:Sintético|certificaciones:API SN Plus",
            "    tiempo_estimado:2-6 horas|dificultad:Media-Alta|garantia:3 meses",
            "  • Separa cada especificación con el símbolo | (pipe)",
            "",
        ]
        .iter()
        .map(|l| l.to_string()),
    );
    lines.extend(catalog_lines(&format!("El archivo {}", names::CATEGORIES_CSV_FILE)));
    lines.extend(notes_lines(&[
        "  • El archivo CSV usa codificación UTF-8 con BOM para compatibilidad con Excel",
    ]));
    lines.extend([
        "EJEMPLOS:".to_string(),
        "  El archivo CSV incluye 3 ejemplos completos:".to_string(),
        "  1. Filtro de Aire Original Toyota (refaccion con datos de envío)".to_string(),
        "  2. Aceite Motor 5W-30 Sintético (fluido con datos de envío)".to_string(),
        "  3. Instalación de Sistema de Audio (servicio sin datos de envío)".to_string(),
        String::new(),
        "USO:".to_string(),
        format!("  1. Abre {} en Excel o Google Sheets", names::PRODUCTS_CSV_FILE),
        format!("  2. Consulta {} para obtener los slugs de categorías", names::CATEGORIES_CSV_FILE),
        "  3. Completa las filas con tus productos".to_string(),
        "  4. Guarda el archivo".to_string(),
        "  5. Importa el archivo usando el sistema de carga masiva".to_string(),
    ]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_tree;

    #[test]
    fn test_column_counts() {
        assert_eq!(XLSX_COLUMNS.len(), 23);
        assert_eq!(CSV_COLUMNS.len(), 14);
        assert_eq!(
            XLSX_COLUMNS.iter().filter(|c| c.required).count(),
            3,
            "name, price y product_type son obligatorios"
        );
    }

    #[test]
    fn test_example_product_types_are_valid() {
        let examples = example_products();
        assert_eq!(examples.len(), 3);
        for example in &examples {
            assert_eq!(
                example.product_type.as_str().parse::<ProductType>(),
                Ok(example.product_type)
            );
        }
    }

    #[test]
    fn test_example_category_slugs_exist_in_catalog() {
        let tree = default_tree();
        let slugs: Vec<String> = tree.entries().into_iter().map(|e| e.slug).collect();
        for example in example_products() {
            assert!(
                slugs.iter().any(|s| s == example.category_slug),
                "missing slug {}",
                example.category_slug
            );
        }
    }

    #[test]
    fn test_pipe_specs_round_trip() {
        let example = &example_products()[1];
        let CellValue::String(text) = example.field_value("technical_specs", SpecsEncoding::Pipe) else {
            panic!("expected text");
        };
        assert_eq!(
            text,
            "viscosidad:5W-30|tipo:Sintético|capacidad_litros:1, 4, 5|certificaciones:API SN Plus, ILSAC GF-6|temperatura_operacion:-30°C a 40°C"
        );
        assert_eq!(TechnicalSpecs::parse(&text), example.technical_specs);
    }

    #[test]
    fn test_json_specs() {
        let example = &example_products()[0];
        assert_eq!(
            example.field_value("technical_specs", SpecsEncoding::Json),
            CellValue::String(
                r#"{"marca":"Toyota","modelo_compatible":"Corolla, Camry","años":"2020-2023","tipo_filtro":"Aire","material":"Papel sintético"}"#
                    .to_string()
            )
        );
    }

    #[test]
    fn test_variant_fields() {
        let example = &example_products()[1];
        assert_eq!(
            example.field_value("variant_group_2_name", SpecsEncoding::Json),
            CellValue::String("Tipo".to_string())
        );
        assert_eq!(
            example.field_value("variant_group_1_selection", SpecsEncoding::Json),
            CellValue::String("single".to_string())
        );
        let CellValue::String(json) = example.field_value("variant_group_1_variants", SpecsEncoding::Json) else {
            panic!("expected variants json");
        };
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed[1]["name"], "4 Litros");
        assert_eq!(parsed[1]["price_adjustment"], 1350);
        assert_eq!(parsed[1]["is_available"], true);
    }

    #[test]
    fn test_missing_variant_group_is_empty() {
        let example = &example_products()[0];
        assert_eq!(example.field_value("variant_group_2_name", SpecsEncoding::Json), CellValue::Empty);
        assert_eq!(example.field_value("variant_group_0_name", SpecsEncoding::Json), CellValue::Empty);
        assert_eq!(example.field_value("unknown", SpecsEncoding::Json), CellValue::Empty);
    }

    #[test]
    fn test_service_has_no_shipping() {
        let example = &example_products()[2];
        assert_eq!(example.field_value("weight_kg", SpecsEncoding::Pipe), CellValue::Empty);
        assert_eq!(example_products()[0].field_value("length_cm", SpecsEncoding::Pipe), CellValue::Number(25.0));
    }

    #[test]
    fn test_products_sheet_layout() {
        let sheet = products_sheet(CSV_COLUMNS, SpecsEncoding::Pipe, false);
        assert_eq!(sheet.header.len(), CSV_COLUMNS.len());
        assert_eq!(sheet.header[9], "Peso (kg)");
        assert!(sheet.hints.is_none());
        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows.iter().all(|r| r.len() == CSV_COLUMNS.len()));

        let sheet = products_sheet(XLSX_COLUMNS, SpecsEncoding::Json, true);
        assert_eq!(sheet.hints.as_ref().map(Vec::len), Some(XLSX_COLUMNS.len()));
        assert_eq!(sheet.header[0], "Nombre del Producto *");
        assert_eq!(sheet.header[1], "SKU (Código)");
    }

    #[test]
    fn test_categories_sheet() {
        let sheet = categories_sheet(&default_tree());
        assert_eq!(sheet.header, CATEGORY_COLUMNS.to_vec());
        assert_eq!(sheet.rows.len(), 121);
        assert_eq!(sheet.rows[0][0], CellValue::Number(0.0));
        assert_eq!(sheet.rows[0][2], CellValue::String("Refacciones".to_string()));
    }

    #[test]
    fn test_instructions_mention_files() {
        let csv = csv_instructions().join("\n");
        assert!(csv.contains(names::CATEGORIES_CSV_FILE));
        assert!(csv.contains("campo:valor|campo:valor"));

        let xlsx = xlsx_instructions().join("\n");
        assert!(xlsx.contains(names::CATEGORIES_SHEET));
        assert!(xlsx.contains("variant_group_X_variants"));
    }
}
