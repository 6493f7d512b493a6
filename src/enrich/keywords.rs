//! キーワード表による商品タイプ判定と基本補完

use crate::api::ProductType;
use crate::specs::TechnicalSpecs;
use crate::types::{Enrichment, InputProduct};

use super::Enricher;

/// 基本補完で出力する技術仕様のキー
pub(crate) const BASIC_SPEC_KEYS: [&str; 4] = [
    "marca_compatible",
    "modelos_compatibles",
    "años_compatibles",
    "especificaciones",
];

/// 商品タイプとキーワードの対応表
///
/// 表の順序が同点時の優先順位になります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<(ProductType, Vec<String>)>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let table: [(ProductType, &[&str]); 5] = [
            (
                ProductType::Refaccion,
                &[
                    "filtro", "pastilla", "disco", "bujía", "sensor", "correa", "manguera",
                    "amortiguador", "rotula", "terminal", "alternador", "arrancador", "batería",
                    "radiador", "termostato", "bomba", "embrague", "junta", "componente",
                ],
            ),
            (
                ProductType::Accesorio,
                &[
                    "audio", "bocina", "pantalla", "led", "alarma", "cámara", "spoiler", "alerón",
                    "calcomanía", "vinilo", "tapete", "funda", "organizador", "portaequipaje",
                    "remolque", "portabicicleta",
                ],
            ),
            (
                ProductType::ServicioInstalacion,
                &["instalación", "instalacion", "montaje", "colocación", "colocacion"],
            ),
            (
                ProductType::ServicioMantenimiento,
                &[
                    "mantenimiento", "servicio", "cambio", "revisión", "revision", "alineación",
                    "alineacion", "balanceo", "diagnóstico", "diagnostico",
                ],
            ),
            (
                ProductType::Fluido,
                &["aceite", "líquido", "liquido", "refrigerante", "aditivo", "lubricante", "fluido"],
            ),
        ];

        Self::new(
            table
                .iter()
                .map(|(t, words)| (*t, words.iter().map(|w| w.to_string()).collect())),
        )
    }
}

impl KeywordTable {
    /// 任意の対応表を作成する（キーワードは小文字に変換）
    pub fn new(entries: impl IntoIterator<Item = (ProductType, Vec<String>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(t, words)| (t, words.iter().map(|w| w.to_lowercase()).collect()))
                .collect(),
        }
    }

    /// 商品名と品番から商品タイプを判定する
    ///
    /// スコアは`lowercase(name + " " + part_number)`に部分文字列として含まれるキーワード数。
    /// 最高スコアのタイプを返し、同点なら表の先頭側、一致がなければ`Refaccion`。
    pub fn detect(&self, name: &str, part_number: &str) -> ProductType {
        let text = format!("{} {}", name, part_number).to_lowercase();

        let mut best: Option<(ProductType, usize)> = None;
        for (product_type, keywords) in &self.entries {
            let score = keywords.iter().filter(|k| text.contains(k.as_str())).count();
            if score == 0 {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((*product_type, score));
            }
        }

        best.map(|(t, _)| t).unwrap_or_default()
    }
}

/// キーワード表による基本補完
#[derive(Debug, Clone, Default)]
pub struct KeywordEnricher {
    table: KeywordTable,
}

impl KeywordEnricher {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }
}

impl Enricher for KeywordEnricher {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn enrich(&self, product: &InputProduct) -> Enrichment {
        let mut search_keywords = vec![product.name.to_lowercase()];
        if !product.part_number.is_empty() {
            search_keywords.push(product.part_number.clone());
        }

        Enrichment {
            description: format!("{}. Producto de calidad para vehículos.", product.name),
            product_type: self.table.detect(&product.name, &product.part_number),
            suggested_category: "General".to_string(),
            technical_specs: BASIC_SPEC_KEYS.iter().map(|k| (*k, "")).collect::<TechnicalSpecs>(),
            search_keywords,
        }
    }
}
