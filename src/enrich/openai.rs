//! OpenAI Chat Completions APIによる補完
//!
//! 応答はJSONとして解釈し、不正な商品タイプはキーワード表で置き換えます。
//! 通信・解析のいずれかで失敗した場合は、キーワード表による基本補完を返します。

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::ProductType;
use crate::specs::TechnicalSpecs;
use crate::types::{Enrichment, InputProduct};

use super::keywords::{KeywordEnricher, KeywordTable};
use super::{Enricher, OracleError};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

const SYSTEM_PROMPT: &str =
    "Eres un experto en autopartes. Responde siempre en formato JSON válido.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// モデルが返すJSON
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Suggestion {
    description: Option<String>,
    product_type: Option<String>,
    suggested_category: Option<String>,
    technical_specs: Option<Map<String, Value>>,
    search_keywords: Option<Vec<String>>,
}

/// OpenAIによる補完
pub struct AiEnricher {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    fallback: KeywordEnricher,
}

impl AiEnricher {
    /// HTTPクライアントを構築する
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
        table: KeywordTable,
    ) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: OPENAI_API_URL.to_string(),
            api_key,
            model,
            fallback: KeywordEnricher::new(table),
        })
    }

    /// 呼び出し先のURLを変更する（互換API・プロキシ向け）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// APIを呼び出して応答テキストを取得する
    fn request(&self, product: &InputProduct) -> Result<String, OracleError> {
        let prompt = build_prompt(product);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json()?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(OracleError::EmptyContent)
    }

    /// 応答テキストを補完結果に変換する
    fn interpret(&self, product: &InputProduct, reply: &str) -> Result<Enrichment, OracleError> {
        parse_reply(reply, product, self.fallback.table())
    }
}

impl Enricher for AiEnricher {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn enrich(&self, product: &InputProduct) -> Enrichment {
        match self
            .request(product)
            .and_then(|reply| self.interpret(product, &reply))
        {
            Ok(enrichment) => enrichment,
            Err(e) => {
                tracing::warn!(
                    "AI enrichment failed for '{}' ({}); using keyword enrichment",
                    product.name,
                    e
                );
                self.fallback.enrich(product)
            }
        }
    }
}

fn build_prompt(product: &InputProduct) -> String {
    format!(
        r#"Eres un experto en autopartes y productos automotrices.
Analiza el siguiente producto y proporciona información detallada en formato JSON:

Producto: {name}
Número de Parte: {part}
Precio: ${price:.2}

Proporciona la siguiente información en formato JSON válido:
{{
    "description": "Descripción detallada del producto (2-4 oraciones)",
    "product_type": "refaccion|accesorio|servicio_instalacion|servicio_mantenimiento|fluido",
    "suggested_category": "Categoría sugerida basada en el tipo de producto",
    "technical_specs": {{
        "marca_compatible": "Marcas de vehículos compatibles (si aplica)",
        "modelos_compatibles": "Modelos de vehículos compatibles (si aplica)",
        "años_compatibles": "Rango de años compatibles (si aplica)",
        "especificaciones": "Otras especificaciones técnicas relevantes"
    }},
    "search_keywords": ["palabra1", "palabra2", "palabra3"]
}}

Responde SOLO con el JSON, sin texto adicional."#,
        name = product.name,
        part = product.part_number,
        price = product.price,
    )
}

/// Markdownのコードフェンス（言語タグ`json`付きを含む）を除去する
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// モデルの応答を解釈する
///
/// 商品タイプが欠落または不正な場合はキーワード表で判定し、
/// 説明が空の場合は基本補完の説明を使用します。
fn parse_reply(
    reply: &str,
    product: &InputProduct,
    table: &KeywordTable,
) -> Result<Enrichment, OracleError> {
    let suggestion: Suggestion = serde_json::from_str(strip_code_fences(reply))?;

    let product_type = suggestion
        .product_type
        .as_deref()
        .and_then(|t| t.parse::<ProductType>().ok())
        .unwrap_or_else(|| {
            tracing::debug!(
                "Invalid product_type {:?} for '{}'; detecting from keywords",
                suggestion.product_type,
                product.name
            );
            table.detect(&product.name, &product.part_number)
        });

    let description = suggestion
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("{}. Producto de calidad para vehículos.", product.name));

    let technical_specs = suggestion
        .technical_specs
        .map(|map| specs_from_json(&map))
        .unwrap_or_default();

    Ok(Enrichment {
        description,
        product_type,
        suggested_category: suggestion.suggested_category.unwrap_or_default(),
        technical_specs,
        search_keywords: suggestion.search_keywords.unwrap_or_default(),
    })
}

/// JSONオブジェクトを技術仕様に変換する
///
/// 文字列はそのまま、数値と論理値は文字列化、配列は`", "`で連結、nullは省略します。
/// キーはモデルが返した順序のまま保持されます。
fn specs_from_json(map: &Map<String, Value>) -> TechnicalSpecs {
    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.trim().to_string(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
