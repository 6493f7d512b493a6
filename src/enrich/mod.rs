//! Enrichment Module
//!
//! 商品ごとに説明、商品タイプ、技術仕様、画像URLを補完します。
//!
//! - `KeywordEnricher`: キーワード表による決定的な補完（外部通信なし）
//! - `AiEnricher`: OpenAI Chat Completions APIによる補完（失敗時はキーワード表にフォールバック）
//!
//! 画像URLは`ImageLookup`トレイトの実装（`UnsplashLookup`または`NoImages`）で検索します。
//! 外部サービスのエラーは`OracleError`として扱われ、このモジュールの外には出ません。

mod keywords;
mod openai;
mod unsplash;

pub use keywords::{KeywordEnricher, KeywordTable};
pub use openai::AiEnricher;
pub use unsplash::{build_image_query, ImageLookup, NoImages, UnsplashLookup};

use thiserror::Error;

use crate::config::Settings;
use crate::types::{Enrichment, InputProduct};

/// 外部オラクル（OpenAI、Unsplash）の呼び出しエラー
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Oracle returned empty content")]
    EmptyContent,
}

/// 商品情報の補完方式
pub trait Enricher {
    /// ログ出力用の名前
    fn name(&self) -> &'static str;

    /// 1商品を補完する
    ///
    /// 失敗しても常に結果を返します（フォールバックは実装側の責務）。
    fn enrich(&self, product: &InputProduct) -> Enrichment;
}

/// 設定から補完方式を選択する
///
/// `use_ai`が真でOpenAI APIキーがある場合は`AiEnricher`、それ以外は`KeywordEnricher`。
/// HTTPクライアントの構築に失敗した場合もキーワード表を使用します。
pub fn select_enricher(settings: &Settings, use_ai: bool, table: KeywordTable) -> Box<dyn Enricher> {
    let key = match (&settings.openai_api_key, use_ai) {
        (Some(key), true) => key.clone(),
        (None, true) => {
            tracing::info!("OpenAI API key not configured; using keyword enrichment");
            return Box::new(KeywordEnricher::new(table));
        }
        (_, false) => return Box::new(KeywordEnricher::new(table)),
    };

    match AiEnricher::new(key, settings.openai_model.clone(), settings.ai_timeout, table.clone()) {
        Ok(enricher) => Box::new(enricher),
        Err(e) => {
            tracing::warn!("Failed to initialize AI enrichment ({}); using keyword enrichment", e);
            Box::new(KeywordEnricher::new(table))
        }
    }
}

/// 設定から画像検索方式を選択する
pub fn select_image_lookup(settings: &Settings, search_images: bool) -> Box<dyn ImageLookup> {
    if !search_images {
        return Box::new(NoImages);
    }
    let Some(key) = settings.unsplash_access_key.clone() else {
        tracing::info!("Unsplash access key not configured; image search disabled");
        return Box::new(NoImages);
    };
    match UnsplashLookup::new(key, settings.image_timeout) {
        Ok(lookup) => Box::new(lookup),
        Err(e) => {
            tracing::warn!("Failed to initialize image search ({}); continuing without images", e);
            Box::new(NoImages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_enricher_without_key() {
        let enricher = select_enricher(&Settings::default(), true, KeywordTable::default());
        assert_eq!(enricher.name(), "keyword");
    }

    #[test]
    fn test_select_enricher_ai_disabled() {
        let settings = Settings::default().with_openai_key(Some("sk-test".to_string()));
        let enricher = select_enricher(&settings, false, KeywordTable::default());
        assert_eq!(enricher.name(), "keyword");
    }

    #[test]
    fn test_select_image_lookup_without_key() {
        let lookup = select_image_lookup(&Settings::default(), true);
        assert_eq!(lookup.find_image("filtro aire"), None);
    }

    #[test]
    fn test_oracle_error_display() {
        let err = OracleError::Api {
            status: 401,
            message: "invalid key".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 401): invalid key");
    }
}
