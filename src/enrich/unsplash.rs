//! 画像URLの検索

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::OracleError;

const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

const STOP_WORDS: [&str; 8] = ["de", "del", "la", "el", "para", "con", "y", "o"];
const MAX_NAME_WORDS: usize = 3;
const MAX_KEYWORDS: usize = 2;
const MAX_TERMS: usize = 5;

/// 画像検索方式
pub trait ImageLookup {
    /// 検索クエリに一致する画像URLを返す（見つからない・失敗した場合は`None`）
    fn find_image(&self, query: &str) -> Option<String>;
}

/// 画像検索を行わない
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageLookup for NoImages {
    fn find_image(&self, _query: &str) -> Option<String> {
        None
    }
}

/// Unsplash Search APIによる画像検索
pub struct UnsplashLookup {
    client: Client,
    endpoint: String,
    access_key: String,
}

impl UnsplashLookup {
    pub fn new(access_key: String, timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: UNSPLASH_SEARCH_URL.to_string(),
            access_key,
        })
    }

    /// 検索APIのURLを変更する
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn search(&self, query: &str) -> Result<Option<String>, OracleError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let body: Value = response.json()?;
        Ok(first_image_url(&body))
    }
}

impl ImageLookup for UnsplashLookup {
    fn find_image(&self, query: &str) -> Option<String> {
        if query.is_empty() {
            return None;
        }
        match self.search(query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Image search failed for '{}': {}", query, e);
                None
            }
        }
    }
}

/// 検索結果から最初の画像URL（`results[0].urls.regular`）を取り出す
fn first_image_url(body: &Value) -> Option<String> {
    body.get("results")?
        .get(0)?
        .get("urls")?
        .get("regular")?
        .as_str()
        .map(str::to_string)
}

/// 画像検索クエリを組み立てる
///
/// 品番、商品名の単語（小文字、3文字以上、ストップワード除外）から最大3語、
/// 検索キーワードから最大2語を順に並べ、先頭5語を空白で連結します。
pub fn build_image_query(name: &str, part_number: &str, keywords: &[String]) -> String {
    let mut terms: Vec<String> = Vec::new();
    if !part_number.is_empty() {
        terms.push(part_number.to_string());
    }

    let lowered = name.to_lowercase();
    terms.extend(
        lowered
            .split_whitespace()
            .filter(|w| !STOP_WORDS.contains(w) && w.chars().count() > 2)
            .take(MAX_NAME_WORDS)
            .map(str::to_string),
    );
    terms.extend(keywords.iter().take(MAX_KEYWORDS).cloned());

    terms.truncate(MAX_TERMS);
    terms.join(" ")
}
